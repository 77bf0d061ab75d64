//! Request and response values passed between the offline cache controller,
//! its cache stores, and the network.
//!
//! These are plain data: a `Response` clone shares its body
//! buffer, so storing a copy in a cache and returning the original to the
//! caller costs no extra allocation.

use std::fmt;

use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use thiserror::Error;

pub use reqwest::Url;

/// Accept header a browser sends for a top-level navigation.
const DOCUMENT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// What kind of resource a request is for, as labelled by the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    Document,
    Image,
    Script,
    Style,
    Font,
    Manifest,
    #[default]
    Empty,
}

impl Destination {
    /// Infer the destination from the last segment of a URL path.
    ///
    /// Paths without an extension are treated as documents, since the
    /// application routes pages by bare path (`/groups`, `/prayers`).
    pub fn from_path(path: &str) -> Self {
        let segment = path.rsplit('/').next().unwrap_or_default();
        let Some((_, ext)) = segment.rsplit_once('.') else {
            return Destination::Document;
        };

        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Destination::Document,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "ico" | "avif" => Destination::Image,
            "js" | "mjs" => Destination::Script,
            "css" => Destination::Style,
            "woff" | "woff2" | "ttf" | "otf" | "eot" => Destination::Font,
            "webmanifest" => Destination::Manifest,
            _ => Destination::Empty,
        }
    }

    /// Images, scripts, styles and fonts are served cache-first.
    pub fn is_static_asset(self) -> bool {
        matches!(
            self,
            Destination::Image | Destination::Script | Destination::Style | Destination::Font
        )
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub destination: Destination,
    pub body: Option<Bytes>,
}

impl Request {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            destination: Destination::Empty,
            body: None,
        }
    }

    /// A navigation request, as the browser would issue it for a page.
    pub fn page(url: Url) -> Self {
        let mut request = Self::get(url);
        request.destination = Destination::Document;
        request
            .headers
            .insert(header::ACCEPT, HeaderValue::from_static(DOCUMENT_ACCEPT));
        request
    }

    pub fn asset(url: Url, destination: Destination) -> Self {
        let mut request = Self::get(url);
        request.destination = destination;
        request
    }

    /// Build a request the way a browser would label it, from the URL alone.
    pub fn infer(url: Url) -> Self {
        match Destination::from_path(url.path()) {
            Destination::Document => Self::page(url),
            destination => Self::asset(url, destination),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// True when any `Accept` header value mentions `text/html`.
    pub fn accepts_html(&self) -> bool {
        self.headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| value.contains("text/html"))
    }
}

#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// A 200 response with the given body and no headers.
    pub fn with_body(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK, HeaderMap::new(), body)
    }

    /// A 200 HTML document. `Content-Type` is the only header set.
    pub fn html(body: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        Self::new(StatusCode::OK, headers, body.into())
    }

    /// Empty-bodied 404, used when a static asset is neither cached nor reachable.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, HeaderMap::new(), Bytes::new())
    }

    /// Empty-bodied 503, used when an uncached request cannot reach the network.
    pub fn unavailable() -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, HeaderMap::new(), Bytes::new())
    }

    /// Mirrors the fetch `ok` flag: status in 200..=299.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Network unreachable")]
    Offline,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Why a fetch did not produce a usable response.
#[derive(Debug)]
pub enum FetchFailure {
    /// The request never produced a response.
    Network(NetworkError),
    /// The server answered, but outside 200..=299.
    NotOk(Response),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Network(e) => write!(f, "{}", e),
            FetchFailure::NotOk(response) => write!(f, "response not ok ({})", response.status),
        }
    }
}

/// Result of a network fetch as the caching strategies see it: a single type
/// covering both transport errors and non-ok statuses.
#[derive(Debug)]
pub enum FetchOutcome {
    Success(Response),
    Failure(FetchFailure),
}

impl From<Result<Response, NetworkError>> for FetchOutcome {
    fn from(result: Result<Response, NetworkError>) -> Self {
        match result {
            Ok(response) if response.ok() => FetchOutcome::Success(response),
            Ok(response) => FetchOutcome::Failure(FetchFailure::NotOk(response)),
            Err(e) => FetchOutcome::Failure(FetchFailure::Network(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_destination_from_path() {
        assert_eq!(Destination::from_path("/"), Destination::Document);
        assert_eq!(Destination::from_path("/groups"), Destination::Document);
        assert_eq!(Destination::from_path("/index.html"), Destination::Document);
        assert_eq!(Destination::from_path("/icon-192.png"), Destination::Image);
        assert_eq!(Destination::from_path("/assets/app.3f2a.js"), Destination::Script);
        assert_eq!(Destination::from_path("/assets/app.css"), Destination::Style);
        assert_eq!(Destination::from_path("/fonts/Pretendard.WOFF2"), Destination::Font);
        assert_eq!(Destination::from_path("/site.webmanifest"), Destination::Manifest);
        assert_eq!(Destination::from_path("/data.json"), Destination::Empty);
    }

    #[test]
    fn test_static_asset_destinations() {
        assert!(Destination::Image.is_static_asset());
        assert!(Destination::Font.is_static_asset());
        assert!(!Destination::Document.is_static_asset());
        assert!(!Destination::Manifest.is_static_asset());
        assert!(!Destination::Empty.is_static_asset());
    }

    #[test]
    fn test_accepts_html() {
        let page = Request::page(url("https://app.example/groups"));
        assert!(page.accepts_html());

        let json = Request::get(url("https://app.example/api"))
            .with_header(header::ACCEPT, HeaderValue::from_static("application/json"));
        assert!(!json.accepts_html());

        assert!(!Request::get(url("https://app.example/")).accepts_html());
    }

    #[test]
    fn test_html_response_headers() {
        let response = Response::html("<p>hi</p>");
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_type(), Some("text/html"));
        assert_eq!(response.headers.len(), 1);
    }

    #[test]
    fn test_fetch_outcome_classification() {
        let ok = FetchOutcome::from(Ok(Response::with_body("x")));
        assert!(matches!(ok, FetchOutcome::Success(_)));

        let redirect = Response::new(StatusCode::FOUND, HeaderMap::new(), Bytes::new());
        assert!(matches!(
            FetchOutcome::from(Ok(redirect)),
            FetchOutcome::Failure(FetchFailure::NotOk(_))
        ));

        let offline = FetchOutcome::from(Err(NetworkError::Offline));
        assert!(matches!(offline, FetchOutcome::Failure(FetchFailure::Network(_))));
    }
}
