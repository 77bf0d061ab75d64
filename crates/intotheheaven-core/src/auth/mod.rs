//! Device-local session state.
//!
//! This module provides `DeviceStorage`, which keeps the values the client
//! needs between runs: the access token, the selected church, the
//! provisioning token for administrator-created accounts, and an in-progress
//! signup form. State is persisted as JSON in the data directory.

pub mod storage;

pub use storage::{DeviceState, DeviceStorage, SignupDraft};
