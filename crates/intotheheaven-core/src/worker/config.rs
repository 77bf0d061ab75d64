use reqwest::Url;

use super::offline_page::OfflinePage;
use super::push::NotificationDefaults;
use crate::http::{Destination, Request};

/// Prefix shared by both store names.
pub const DEFAULT_CACHE_PREFIX: &str = "intotheheaven";

/// Bump on deploy to evict every store from the previous version.
pub const DEFAULT_CACHE_VERSION: &str = "v2";

/// App shell assets fetched into the static store at install.
pub const PRECACHE_MANIFEST: &[&str] = &[
    "/",
    "/index.html",
    "/site.webmanifest",
    "/icon-192.png",
    "/icon-512.png",
];

/// Path of the app shell document, used as the last cached page fallback.
const ROOT_PATH: &str = "/";

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// The application's own origin. Requests elsewhere are never intercepted.
    pub origin: Url,
    pub cache_prefix: String,
    pub version: String,
    /// Paths, relative to `origin`, to precache at install.
    pub precache: Vec<String>,
    pub offline_page: OfflinePage,
    pub notification: NotificationDefaults,
}

impl ControllerConfig {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
            version: DEFAULT_CACHE_VERSION.to_string(),
            precache: PRECACHE_MANIFEST.iter().map(|p| p.to_string()).collect(),
            offline_page: OfflinePage::default(),
            notification: NotificationDefaults::default(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_precache(mut self, paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.precache = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_offline_page(mut self, page: OfflinePage) -> Self {
        self.offline_page = page;
        self
    }

    pub fn static_store_name(&self) -> String {
        format!("{}-static-{}", self.cache_prefix, self.version)
    }

    pub fn dynamic_store_name(&self) -> String {
        format!("{}-dynamic-{}", self.cache_prefix, self.version)
    }

    /// True for the two store names owned by this version.
    pub fn is_current_store(&self, name: &str) -> bool {
        name == self.static_store_name() || name == self.dynamic_store_name()
    }

    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin.origin()
    }

    pub fn root_url(&self) -> Url {
        let mut url = self.origin.clone();
        url.set_path(ROOT_PATH);
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    pub fn root_request(&self) -> Request {
        Request::page(self.root_url())
    }

    /// Requests for every manifest entry, resolved against the origin.
    pub fn precache_requests(&self) -> Result<Vec<Request>, String> {
        let root = self.root_url();
        self.precache
            .iter()
            .map(|path| {
                let url = root
                    .join(path)
                    .map_err(|e| format!("{}: {}", path, e))?;
                let destination = Destination::from_path(url.path());
                Ok(Request::asset(url, destination))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ControllerConfig {
        ControllerConfig::new(Url::parse("https://app.example").unwrap())
    }

    #[test]
    fn test_store_names_carry_version() {
        let config = config();
        assert_eq!(config.static_store_name(), "intotheheaven-static-v2");
        assert_eq!(config.dynamic_store_name(), "intotheheaven-dynamic-v2");

        let bumped = config.with_version("v3");
        assert!(bumped.is_current_store("intotheheaven-static-v3"));
        assert!(!bumped.is_current_store("intotheheaven-static-v2"));
    }

    #[test]
    fn test_same_origin() {
        let config = config();
        assert!(config.is_same_origin(&Url::parse("https://app.example/groups").unwrap()));
        assert!(!config.is_same_origin(&Url::parse("http://app.example/groups").unwrap()));
        assert!(!config.is_same_origin(&Url::parse("https://media.r2.dev/a.png").unwrap()));
        assert!(!config.is_same_origin(&Url::parse("https://app.example:8443/").unwrap()));
    }

    #[test]
    fn test_precache_requests_resolve_against_origin() {
        let requests = config().precache_requests().unwrap();
        let urls: Vec<String> = requests.iter().map(|r| r.url.to_string()).collect();
        assert_eq!(
            urls,
            vec![
                "https://app.example/",
                "https://app.example/index.html",
                "https://app.example/site.webmanifest",
                "https://app.example/icon-192.png",
                "https://app.example/icon-512.png",
            ]
        );
    }
}
