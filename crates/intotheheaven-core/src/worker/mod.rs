//! Offline cache controller.
//!
//! The controller sits between the application and the network. It precaches
//! the app shell on install, evicts stores from older versions on activate,
//! and answers intercepted requests from the network or the cache depending
//! on what kind of resource is being requested:
//!
//! - Pages: network first, then any cached copy, then the cached app shell,
//!   then a self-contained offline page.
//! - Images, scripts, styles, fonts: cache first, then network, then an
//!   empty 404.
//! - Everything else: cache if present, otherwise network without caching.
//!
//! It also turns push messages into notifications and opens the app when a
//! notification is clicked.

pub mod config;
pub mod controller;
pub mod host;
pub mod network;
pub mod offline_page;
pub mod push;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ControllerConfig;
pub use controller::{ActivationReport, FetchResponse, InstallReport, OfflineController, WorkerState};
pub use host::{HostError, WorkerHost};
pub use network::{HttpNetwork, Network};
pub use offline_page::OfflinePage;
pub use push::{NotificationClick, NotificationDefaults, NotificationOptions, PushMessage};
