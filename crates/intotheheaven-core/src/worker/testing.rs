//! In-memory stand-ins for the network and host, for controller tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Url;

use super::host::{HostError, WorkerHost};
use super::network::Network;
use super::push::NotificationOptions;
use crate::cache::store::cache_key;
use crate::http::{NetworkError, Request, Response};

#[derive(Default)]
struct FakeNetworkState {
    routes: HashMap<String, Response>,
    offline: bool,
    calls: Vec<String>,
}

/// Serves canned responses by URL; unknown URLs get a 404.
#[derive(Clone, Default)]
pub(crate) struct FakeNetwork {
    state: Arc<Mutex<FakeNetworkState>>,
}

impl FakeNetwork {
    pub(crate) fn online() -> Self {
        Self::default()
    }

    pub(crate) fn offline() -> Self {
        let network = Self::default();
        network.set_offline(true);
        network
    }

    pub(crate) fn route(&self, url: &str, response: Response) -> &Self {
        let url = Url::parse(url).unwrap();
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(cache_key(&url), response);
        self
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(request.url.to_string());
        if state.offline {
            return Err(NetworkError::Offline);
        }
        Ok(state
            .routes
            .get(&cache_key(&request.url))
            .cloned()
            .unwrap_or_else(Response::not_found))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostEvent {
    SkipWaiting,
    ClaimClients,
    ShowNotification(String, NotificationOptions),
    CloseNotification(Option<String>),
    OpenWindow(String),
}

/// Records every call. A failing host records the call, then rejects it.
#[derive(Clone, Default)]
pub(crate) struct RecordingHost {
    events: Arc<Mutex<Vec<HostEvent>>>,
    failing: bool,
}

impl RecordingHost {
    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(crate) fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: HostEvent) -> Result<(), HostError> {
        self.events.lock().unwrap().push(event);
        if self.failing {
            return Err(HostError::Unavailable("no window system".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl WorkerHost for RecordingHost {
    async fn skip_waiting(&self) -> Result<(), HostError> {
        self.record(HostEvent::SkipWaiting)
    }

    async fn claim_clients(&self) -> Result<(), HostError> {
        self.record(HostEvent::ClaimClients)
    }

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), HostError> {
        self.record(HostEvent::ShowNotification(title.to_string(), options.clone()))
    }

    async fn close_notification(&self, tag: Option<&str>) -> Result<(), HostError> {
        self.record(HostEvent::CloseNotification(tag.map(str::to_string)))
    }

    async fn open_window(&self, url: &Url) -> Result<(), HostError> {
        self.record(HostEvent::OpenWindow(url.to_string()))
    }
}
