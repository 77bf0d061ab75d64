//! Core library for IntoTheHeaven, a small-group community app.
//!
//! The centre of this crate is the offline cache controller in [`worker`]:
//! it keeps the app shell and recently visited pages available without a
//! network connection while preferring fresh content when online. Around it
//! sit the pieces the client needs to talk to the backend: [`api`] for the
//! REST client, [`auth`] for device-local session state, and [`models`] for
//! the wire types.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod http;
pub mod models;
pub mod utils;
pub mod worker;

pub use api::{ApiClient, ApiError, NotificationPort};
pub use auth::DeviceStorage;
pub use cache::{CacheError, CacheStorage};
pub use config::Config;
pub use http::{Destination, FetchOutcome, NetworkError, Request, Response};
pub use worker::{ControllerConfig, OfflineController};
