use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

use super::push::NotificationOptions;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Host rejected the operation: {0}")]
    Rejected(String),

    #[error("Host unavailable: {0}")]
    Unavailable(String),
}

/// The environment the controller runs inside: the thing that owns the
/// application windows and can show notifications.
///
/// Failures reported here are logged by the controller, never propagated.
#[async_trait]
pub trait WorkerHost: Send + Sync {
    /// Ask to become active without waiting for older instances to drain.
    async fn skip_waiting(&self) -> Result<(), HostError>;

    /// Take control of every open application instance immediately.
    async fn claim_clients(&self) -> Result<(), HostError>;

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), HostError>;

    async fn close_notification(&self, tag: Option<&str>) -> Result<(), HostError>;

    /// Focus or open an application window at `url`.
    async fn open_window(&self, url: &Url) -> Result<(), HostError>;
}
