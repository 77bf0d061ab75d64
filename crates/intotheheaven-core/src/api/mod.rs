//! REST API client module for the IntoTheHeaven backend.
//!
//! This module provides the `ApiClient` for communicating with the backend
//! to sign in, browse churches and groups, record gatherings, and manage
//! prayer requests and messages, and upload gathering and group photos.
//!
//! Authenticated calls carry the access token from `DeviceStorage`. When the
//! backend reports that the session has expired, the client clears the
//! stored session and reports it through the injected `NotificationPort`.

pub mod client;
pub mod error;
pub mod port;

pub use client::ApiClient;
pub use error::ApiError;
pub use port::NotificationPort;
