//! Terminal implementations of the seams the core library leaves open.

use async_trait::async_trait;
use intotheheaven_core::api::NotificationPort;
use intotheheaven_core::worker::{HostError, HttpNetwork, Network, NotificationOptions, WorkerHost};
use intotheheaven_core::http::Url;
use intotheheaven_core::{NetworkError, Request, Response};
use tracing::debug;

/// Host that prints what a browser would do.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleHost;

#[async_trait]
impl WorkerHost for ConsoleHost {
    async fn skip_waiting(&self) -> Result<(), HostError> {
        debug!("skip_waiting");
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), HostError> {
        debug!("claim_clients");
        Ok(())
    }

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), HostError> {
        println!("[{}] {}", title, options.body);
        println!("  icon {}  badge {}  vibrate {:?}", options.icon, options.badge, options.vibrate);
        Ok(())
    }

    async fn close_notification(&self, tag: Option<&str>) -> Result<(), HostError> {
        println!("Notification closed{}", tag.map(|t| format!(" ({})", t)).unwrap_or_default());
        Ok(())
    }

    async fn open_window(&self, url: &Url) -> Result<(), HostError> {
        println!("Open {}", url);
        Ok(())
    }
}

/// Prints API client notices to stderr so they don't mix with command output.
#[derive(Debug, Clone, Copy)]
pub struct ConsolePort;

impl NotificationPort for ConsolePort {
    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn navigate(&self, path: &str, _replace: bool) {
        if path == "/login" {
            eprintln!("Run `intotheheaven login` to sign in again.");
        } else {
            debug!(path, "Navigation requested");
        }
    }
}

/// Real network, or one that is always unreachable for `--offline`.
#[derive(Clone)]
pub enum ShellNetwork {
    Online(HttpNetwork),
    Offline,
}

impl ShellNetwork {
    pub fn online() -> Result<Self, NetworkError> {
        Ok(Self::Online(HttpNetwork::new()?))
    }
}

#[async_trait]
impl Network for ShellNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        match self {
            Self::Online(network) => network.fetch(request).await,
            Self::Offline => Err(NetworkError::Offline),
        }
    }
}
