//! Lifecycle and request interception for the offline cache controller.

use std::sync::Arc;

use futures::future::try_join_all;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::config::ControllerConfig;
use super::host::WorkerHost;
use super::network::Network;
use super::push::{NotificationClick, PushMessage};
use crate::cache::{CacheError, CacheStorage};
use crate::http::{FetchOutcome, Request, Response};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    /// Superseded by a newer version.
    Redundant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallReport {
    Precached { store: String, count: usize },
    /// Installation still completed; the app shell is simply not cached.
    Failed { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationReport {
    pub deleted: Vec<String>,
}

/// What the host should do with an intercepted request.
#[derive(Debug)]
pub enum FetchResponse {
    Respond(Response),
    /// Not intercepted: the host performs the request itself.
    Passthrough,
}

impl FetchResponse {
    pub fn into_response(self) -> Option<Response> {
        match self {
            FetchResponse::Respond(response) => Some(response),
            FetchResponse::Passthrough => None,
        }
    }
}

#[derive(Error, Debug)]
enum PrecacheError {
    #[error("Invalid precache path {0}")]
    InvalidPath(String),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error(transparent)]
    Cache(#[from] CacheError),
}

pub struct OfflineController<N, H> {
    config: ControllerConfig,
    storage: Arc<CacheStorage>,
    network: N,
    host: H,
    state: RwLock<WorkerState>,
}

impl<N: Network, H: WorkerHost> OfflineController<N, H> {
    pub fn new(config: ControllerConfig, storage: Arc<CacheStorage>, network: N, host: H) -> Self {
        Self {
            config,
            storage,
            network,
            host,
            state: RwLock::new(WorkerState::Parsed),
        }
    }

    /// A controller for a version that already installed and activated in
    /// an earlier run, e.g. after the host restarted it.
    pub fn resume(config: ControllerConfig, storage: Arc<CacheStorage>, network: N, host: H) -> Self {
        Self {
            state: RwLock::new(WorkerState::Activated),
            ..Self::new(config, storage, network, host)
        }
    }

    /// Bring up a controller over stores left by earlier runs. A version
    /// without its static store installs first; any store from another
    /// version triggers activation. Otherwise it resumes as activated.
    pub async fn start(
        config: ControllerConfig,
        storage: Arc<CacheStorage>,
        network: N,
        host: H,
    ) -> Self {
        let installed = storage.has(&config.static_store_name()).await;
        let outdated = storage
            .keys()
            .await
            .iter()
            .any(|name| !config.is_current_store(name));

        if installed && !outdated {
            return Self::resume(config, storage, network, host);
        }

        let controller = Self::new(config, storage, network, host);
        if !installed {
            info!(version = %controller.config.version, "No cache for this version yet, installing");
            controller.install().await;
        }
        controller.activate().await;
        controller
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    async fn set_state(&self, state: WorkerState) {
        let mut current = self.state.write().await;
        debug!(from = ?*current, to = ?state, "Controller state change");
        *current = state;
    }

    // ===== Lifecycle =====

    /// Precache the app shell into the static store.
    ///
    /// A precache failure is logged and installation still completes, but
    /// skip-waiting is only requested once the shell is cached.
    pub async fn install(&self) -> InstallReport {
        self.set_state(WorkerState::Installing).await;

        let report = match self.precache().await {
            Ok(count) => {
                let store = self.config.static_store_name();
                info!(cache = %store, count, "Cached static assets");
                if let Err(e) = self.host.skip_waiting().await {
                    warn!(error = %e, "skip_waiting failed");
                }
                InstallReport::Precached { store, count }
            }
            Err(e) => {
                error!(error = %e, "Failed to cache static assets");
                InstallReport::Failed {
                    reason: e.to_string(),
                }
            }
        };

        self.set_state(WorkerState::Installed).await;
        report
    }

    async fn precache(&self) -> Result<usize, PrecacheError> {
        let store = self.storage.open(&self.config.static_store_name()).await?;
        let requests = self
            .config
            .precache_requests()
            .map_err(PrecacheError::InvalidPath)?;

        let pairs = try_join_all(requests.into_iter().map(|request| async move {
            match FetchOutcome::from(self.network.fetch(&request).await) {
                FetchOutcome::Success(response) => Ok((request, response)),
                FetchOutcome::Failure(failure) => Err(PrecacheError::Fetch {
                    url: request.url.to_string(),
                    reason: failure.to_string(),
                }),
            }
        }))
        .await?;

        let count = pairs.len();
        store.put_all(pairs).await?;
        Ok(count)
    }

    /// Delete every store not owned by this version, then claim all clients.
    pub async fn activate(&self) -> ActivationReport {
        self.set_state(WorkerState::Activating).await;

        let mut report = ActivationReport::default();
        for name in self.storage.keys().await {
            if self.config.is_current_store(&name) {
                continue;
            }
            match self.storage.delete(&name).await {
                Ok(true) => {
                    info!(cache = %name, "Deleted outdated cache");
                    report.deleted.push(name);
                }
                Ok(false) => {}
                Err(e) => warn!(cache = %name, error = %e, "Failed to delete outdated cache"),
            }
        }

        if let Err(e) = self.host.claim_clients().await {
            warn!(error = %e, "claim_clients failed");
        }

        self.set_state(WorkerState::Activated).await;
        report
    }

    /// Mark this controller as superseded by a newer version.
    pub async fn retire(&self) {
        self.set_state(WorkerState::Redundant).await;
    }

    // ===== Request interception =====

    pub async fn handle_fetch(&self, request: Request) -> FetchResponse {
        if self.state().await != WorkerState::Activated {
            return FetchResponse::Passthrough;
        }

        if !self.config.is_same_origin(&request.url) {
            debug!(url = %request.url, "Cross-origin request, not intercepting");
            return FetchResponse::Passthrough;
        }

        let response = if request.accepts_html() {
            self.handle_page(&request).await
        } else if request.destination.is_static_asset() {
            self.handle_static_asset(&request).await
        } else {
            self.handle_other(&request).await
        };
        FetchResponse::Respond(response)
    }

    /// Network first; on failure fall back to any cached copy, then the
    /// cached app shell, then the offline page.
    async fn handle_page(&self, request: &Request) -> Response {
        match FetchOutcome::from(self.network.fetch(request).await) {
            FetchOutcome::Success(response) => {
                self.cache_response(&self.config.dynamic_store_name(), request, &response)
                    .await;
                response
            }
            FetchOutcome::Failure(failure) => {
                debug!(url = %request.url, %failure, "Page fetch failed, using offline fallback");
                self.page_fallback(request).await
            }
        }
    }

    async fn page_fallback(&self, request: &Request) -> Response {
        if let Some(cached) = self.storage.match_any(request).await {
            return cached;
        }

        if let Some(store) = self.storage.store(&self.config.static_store_name()).await {
            if let Some(shell) = store.match_request(&self.config.root_request()).await {
                debug!(url = %request.url, "Serving cached app shell");
                return shell;
            }
        }

        info!(url = %request.url, "Serving offline page");
        self.config.offline_page.response()
    }

    /// Cache first; on a miss fetch and cache, or answer with an empty 404.
    async fn handle_static_asset(&self, request: &Request) -> Response {
        if let Some(cached) = self.storage.match_any(request).await {
            return cached;
        }

        match FetchOutcome::from(self.network.fetch(request).await) {
            FetchOutcome::Success(response) => {
                self.cache_response(&self.config.static_store_name(), request, &response)
                    .await;
                response
            }
            FetchOutcome::Failure(failure) => {
                debug!(url = %request.url, %failure, "Static asset unavailable");
                Response::not_found()
            }
        }
    }

    /// Cache if present, otherwise the network response as-is, uncached.
    async fn handle_other(&self, request: &Request) -> Response {
        if let Some(cached) = self.storage.match_any(request).await {
            return cached;
        }

        match self.network.fetch(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %request.url, error = %e, "Request failed with no cached copy");
                Response::unavailable()
            }
        }
    }

    async fn cache_response(&self, store_name: &str, request: &Request, response: &Response) {
        let result = match self.storage.open(store_name).await {
            Ok(store) => store.put(request, response.clone()).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!(cache = store_name, url = %request.url, error = %e, "Failed to cache response");
        }
    }

    // ===== Notifications =====

    pub async fn handle_push(&self, message: PushMessage) {
        let notification = &self.config.notification;
        let options = notification.options_for(&message);
        if let Err(e) = self.host.show_notification(&notification.title, &options).await {
            warn!(error = %e, "Failed to show notification");
        }
    }

    /// Dismiss the notification and bring the app up at its root.
    pub async fn handle_notification_click(&self, click: NotificationClick) {
        if let Err(e) = self.host.close_notification(click.tag.as_deref()).await {
            warn!(error = %e, "Failed to close notification");
        }
        if let Err(e) = self.host.open_window(&self.config.root_url()).await {
            warn!(error = %e, "Failed to open window");
        }
    }
}
