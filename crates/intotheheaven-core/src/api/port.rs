/// How the API client reaches the user interface: a short message and a
/// route change. Passed to `ApiClient::new` once at start-up.
pub trait NotificationPort: Send + Sync {
    fn notify(&self, message: &str);

    fn navigate(&self, path: &str, replace: bool);
}
