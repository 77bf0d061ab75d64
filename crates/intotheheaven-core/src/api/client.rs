//! API client for communicating with the IntoTheHeaven REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! API requests on behalf of the signed-in member.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::future::try_join_all;
use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::port::NotificationPort;
use super::ApiError;
use crate::auth::DeviceStorage;
use crate::models::{
    Availability, BirthdayMember, Church, CompleteUploadRequest, CompleteUploadResponse,
    CompletedUpload, CreateGatheringRequest, Gathering, GatheringDetail, GatheringMemberRecord,
    GatheringResponse, Group, JoinRequest, JoinStatus, LoginRequest, LoginResponse,
    MediaEntityType, MediaType, Message, MyPrayer, PrayerRequestCount, PresignedUpload,
    PresignedUrlRequest, PresignedUrls, SendMessage, SignupRequest, SignupResponse, UnreadCount,
    UpdateGatheringMember, UpdateGatheringRequest, UpdateMyInfo, User, VerificationPurpose,
};

// ============================================================================
// Constants
// ============================================================================

/// Backend used when nothing else is configured (local development server).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// HTTP request timeout in seconds.
/// Generous enough for slow gathering detail responses.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shown when the backend rejects an expired session.
const SESSION_EXPIRED_MESSAGE: &str = "로그인이 만료되었어요. 다시 로그인해주세요!";

/// Where the member is sent after the session expires.
const LOGIN_PATH: &str = "/login";

/// Content type for uploads whose file type is unknown.
const DEFAULT_UPLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// Which credentials a request carries.
enum Auth {
    /// The session token from device storage, if any.
    Session,
    /// An explicit token, e.g. the provisioning token.
    Token(String),
    None,
}

/// API client for the IntoTheHeaven backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    storage: Arc<Mutex<DeviceStorage>>,
    port: Arc<dyn NotificationPort>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        storage: Arc<Mutex<DeviceStorage>>,
        port: Arc<dyn NotificationPort>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            storage,
            port,
        })
    }

    pub fn storage(&self) -> &Arc<Mutex<DeviceStorage>> {
        &self.storage
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn bearer(token: &str) -> String {
        if token.starts_with("Bearer ") {
            token.to_string()
        } else {
            format!("Bearer {}", token)
        }
    }

    fn decode<T: DeserializeOwned>(text: &str, url: &str) -> Result<T, ApiError> {
        let text = if text.trim().is_empty() { "null" } else { text };
        serde_json::from_str(text)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))
    }

    async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
        auth: Auth,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);

        let (token, session_auth) = match auth {
            Auth::Session => (self.storage.lock().await.token().map(str::to_string), true),
            Auth::Token(token) => (Some(token), false),
            Auth::None => (None, false),
        };

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(ref token) = token {
            request = request.header(header::AUTHORIZATION, Self::bearer(token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_status(status, &text);
            warn!(%method, url = %url, %status, error = %err, "API request failed");

            let expired = err.is_session_expired() || status == StatusCode::UNAUTHORIZED;
            if session_auth && token.is_some() && expired {
                self.handle_session_expired().await;
            }
            return Err(err);
        }

        debug!(%method, url = %url, %status, bytes = text.len(), "API response");
        Self::decode(&text, &url)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::GET, endpoint, &[], None, Auth::Session)
            .await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, endpoint, &[], Some(body), Auth::Session)
            .await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::PATCH, endpoint, &[], Some(body), Auth::Session)
            .await
    }

    async fn delete(&self, endpoint: &str) -> Result<(), ApiError> {
        self.send::<(), ()>(Method::DELETE, endpoint, &[], None, Auth::Session)
            .await
    }

    fn persist(storage: &DeviceStorage) {
        if let Err(e) = storage.save() {
            warn!(error = %e, "Failed to save device state");
        }
    }

    // ===== Session =====

    /// Clear the stored session and send the member back to the login screen.
    pub async fn handle_session_expired(&self) {
        {
            let mut storage = self.storage.lock().await;
            storage.logout();
            Self::persist(&storage);
        }
        info!("Session expired, returning to login");
        self.port.notify(SESSION_EXPIRED_MESSAGE);
        self.port.navigate(LOGIN_PATH, true);
    }

    /// Sign in and store the returned token. Provisioned accounts get a
    /// provisioning token instead of a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .send(Method::POST, "/auth/login", &[], Some(&body), Auth::None)
            .await?;

        if !response.access_token.is_empty() {
            let mut storage = self.storage.lock().await;
            if response.is_provisioned() {
                storage.set_provisioning(response.access_token.clone());
            } else {
                storage.set_token(response.access_token.clone());
            }
            Self::persist(&storage);
        }
        Ok(response)
    }

    pub async fn logout(&self) {
        let mut storage = self.storage.lock().await;
        storage.logout();
        Self::persist(&storage);
    }

    pub async fn is_authenticated(&self) -> bool {
        self.storage.lock().await.is_authenticated()
    }

    /// Remember the church the member is browsing.
    pub async fn select_church(&self, church_id: &str) {
        let mut storage = self.storage.lock().await;
        storage.set_church_id(church_id.to_string());
        Self::persist(&storage);
    }

    // ===== Auth =====

    pub async fn send_email_verification(
        &self,
        email: &str,
        purpose: VerificationPurpose,
    ) -> Result<(), ApiError> {
        let body = json!({ "email": email, "type": purpose });
        self.send(Method::POST, "/auth/verification/email", &[], Some(&body), Auth::None)
            .await
    }

    pub async fn confirm_email_verification(
        &self,
        email: &str,
        code: &str,
        purpose: VerificationPurpose,
    ) -> Result<(), ApiError> {
        let body = json!({ "email": email, "code": code, "type": purpose });
        self.send(
            Method::POST,
            "/auth/verification/email/confirm",
            &[],
            Some(&body),
            Auth::None,
        )
        .await
    }

    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), ApiError> {
        let body = json!({ "email": email, "newPassword": new_password });
        self.send(Method::POST, "/auth/password/reset", &[], Some(&body), Auth::None)
            .await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError> {
        self.send(Method::POST, "/auth/signup", &[], Some(request), Auth::None)
            .await
    }

    pub async fn check_phone_availability(&self, phone: &str) -> Result<bool, ApiError> {
        let availability: Availability = self
            .send::<_, ()>(
                Method::GET,
                "/auth/availability/phone",
                &[("value", phone)],
                None,
                Auth::None,
            )
            .await?;
        Ok(availability.available)
    }

    pub async fn check_email_availability(&self, email: &str) -> Result<bool, ApiError> {
        let availability: Availability = self
            .send::<_, ()>(
                Method::GET,
                "/auth/availability/email",
                &[("value", email)],
                None,
                Auth::None,
            )
            .await?;
        Ok(availability.available)
    }

    // ===== Members =====

    pub async fn my_info(&self) -> Result<User, ApiError> {
        self.get("/members/me").await
    }

    pub async fn update_my_info(&self, update: &UpdateMyInfo) -> Result<User, ApiError> {
        self.patch("/members/me", update).await
    }

    /// Check that an administrator-created member record matches.
    pub async fn verify_member(&self, email: &str, name: &str) -> Result<(), ApiError> {
        self.send::<(), ()>(
            Method::GET,
            "/auth/member/verify",
            &[("email", email), ("name", name)],
            None,
            Auth::Session,
        )
        .await
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let body = json!({ "currentPassword": current_password, "newPassword": new_password });
        self.post("/members/password/change", &body).await
    }

    /// Change the account email. Provisioned accounts pass their
    /// provisioning token, since they have no session yet.
    pub async fn change_email(
        &self,
        new_email: &str,
        token_override: Option<String>,
    ) -> Result<(), ApiError> {
        let body = json!({ "newEmail": new_email });
        let auth = token_override.map(Auth::Token).unwrap_or(Auth::Session);
        self.send(Method::POST, "/members/email/change", &[], Some(&body), auth)
            .await
    }

    // ===== Churches =====

    pub async fn my_churches(&self) -> Result<Vec<Church>, ApiError> {
        self.get("/churches").await
    }

    pub async fn all_churches(&self) -> Result<Vec<Church>, ApiError> {
        self.get("/churches/all").await
    }

    pub async fn prayer_request_count(&self, church_id: &str) -> Result<u32, ApiError> {
        let count: PrayerRequestCount = self
            .get(&format!("/churches/{}/prayer-request-count", church_id))
            .await?;
        Ok(count.count)
    }

    pub async fn birthday_members(
        &self,
        church_id: &str,
        month: u32,
    ) -> Result<Vec<BirthdayMember>, ApiError> {
        let month = month.to_string();
        self.send::<_, ()>(
            Method::GET,
            &format!("/churches/{}/birthday-members", church_id),
            &[("month", month.as_str())],
            None,
            Auth::Session,
        )
        .await
    }

    pub async fn request_registration(&self, church_id: &str) -> Result<JoinRequest, ApiError> {
        self.send::<_, ()>(
            Method::POST,
            &format!("/churches/{}/join-request", church_id),
            &[],
            None,
            Auth::Session,
        )
        .await
    }

    pub async fn my_join_requests(&self) -> Result<Vec<JoinRequest>, ApiError> {
        self.get("/churches/join-request/status").await
    }

    /// Whether any join request is still awaiting approval. Errors count as no.
    pub async fn has_pending_request(&self) -> bool {
        match self.my_join_requests().await {
            Ok(requests) => requests.iter().any(|r| r.status == JoinStatus::Pending),
            Err(e) => {
                debug!(error = %e, "Failed to check join requests");
                false
            }
        }
    }

    // ===== Groups =====

    pub async fn groups_by_church(&self, church_id: &str) -> Result<Vec<Group>, ApiError> {
        self.get(&format!("/churches/{}/groups", church_id)).await
    }

    pub async fn group_members(&self, group_id: &str) -> Result<Vec<User>, ApiError> {
        self.get(&format!("/groups/{}/members", group_id)).await
    }

    pub async fn group_gatherings(&self, group_id: &str) -> Result<Vec<Gathering>, ApiError> {
        self.get(&format!("/groups/{}/gatherings", group_id)).await
    }

    pub async fn my_info_in_group(&self, group_id: &str) -> Result<User, ApiError> {
        self.get(&format!("/groups/{}/me", group_id)).await
    }

    pub async fn change_member_role(
        &self,
        group_id: &str,
        group_member_id: &str,
        new_role: &str,
    ) -> Result<User, ApiError> {
        let body = json!({ "newRole": new_role });
        self.patch(
            &format!("/groups/{}/groupMembers/{}/role", group_id, group_member_id),
            &body,
        )
        .await
    }

    // ===== Gatherings =====

    pub async fn create_gathering(
        &self,
        request: &CreateGatheringRequest,
    ) -> Result<GatheringResponse, ApiError> {
        self.post("/gatherings", request).await
    }

    pub async fn gathering_detail(&self, gathering_id: &str) -> Result<GatheringDetail, ApiError> {
        self.get(&format!("/gatherings/{}", gathering_id)).await
    }

    pub async fn update_gathering(
        &self,
        gathering_id: &str,
        update: &UpdateGatheringRequest,
    ) -> Result<GatheringResponse, ApiError> {
        self.patch(&format!("/gatherings/{}", gathering_id), update)
            .await
    }

    pub async fn update_gathering_member(
        &self,
        gathering_id: &str,
        group_member_id: &str,
        update: &UpdateGatheringMember,
    ) -> Result<GatheringMemberRecord, ApiError> {
        self.patch(
            &format!("/gatherings/{}/groupMember/{}", gathering_id, group_member_id),
            update,
        )
        .await
    }

    // ===== Messages =====

    pub async fn send_message(&self, message: &SendMessage) -> Result<Message, ApiError> {
        self.post("/messages", message).await
    }

    pub async fn my_messages(&self) -> Result<Vec<Message>, ApiError> {
        self.get("/messages").await
    }

    pub async fn sent_messages(&self) -> Result<Vec<Message>, ApiError> {
        self.get("/messages/sent").await
    }

    pub async fn unread_count(&self) -> Result<u32, ApiError> {
        let count: UnreadCount = self.get("/messages/unread-count").await?;
        Ok(count.count)
    }

    pub async fn mark_as_read(&self, message_id: &str) -> Result<(), ApiError> {
        self.send::<(), ()>(
            Method::PATCH,
            &format!("/messages/{}/read", message_id),
            &[],
            None,
            Auth::Session,
        )
        .await
    }

    // ===== Prayers =====

    pub async fn my_prayers(&self) -> Result<Vec<MyPrayer>, ApiError> {
        self.get("/prayers/me").await
    }

    pub async fn update_prayer_answered(
        &self,
        prayer_id: &str,
        is_answered: bool,
    ) -> Result<(), ApiError> {
        let body = json!({ "isAnswered": is_answered });
        self.patch(&format!("/prayers/{}/answered", prayer_id), &body)
            .await
    }

    pub async fn delete_prayer(&self, prayer_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/prayers/{}", prayer_id)).await
    }

    // ===== Media =====

    pub async fn presigned_urls(
        &self,
        request: &PresignedUrlRequest,
    ) -> Result<PresignedUrls, ApiError> {
        self.post("/media/presigned-urls", request).await
    }

    /// PUT to a presigned object storage URL. The URL is its own credential,
    /// so no bearer token is attached.
    fn upload_request(&self, upload_url: &str, content_type: &str, body: Bytes) -> RequestBuilder {
        let content_type = if content_type.is_empty() {
            DEFAULT_UPLOAD_CONTENT_TYPE
        } else {
            content_type
        };
        self.client
            .put(upload_url)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
    }

    /// Upload file contents to a presigned URL. Failures here never count
    /// as an expired session.
    pub async fn upload_file(
        &self,
        upload_url: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<(), ApiError> {
        let size = body.len();
        let response = self
            .upload_request(upload_url, content_type, body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, bytes = size, "Media upload failed");
            return Err(ApiError::Http {
                status,
                message: format!("Upload failed: {}", status.as_u16()),
                body: None,
            });
        }
        debug!(%status, bytes = size, "Media uploaded");
        Ok(())
    }

    pub async fn complete_upload(
        &self,
        request: &CompleteUploadRequest,
    ) -> Result<CompleteUploadResponse, ApiError> {
        self.post("/media/complete", request).await
    }

    /// Request upload URLs, upload the file to each requested rendition and
    /// record the result. An empty `renditions` uploads every rendition the
    /// backend offers.
    pub async fn upload_media(
        &self,
        entity_type: MediaEntityType,
        entity_id: &str,
        file_name: &str,
        content_type: &str,
        body: Bytes,
        renditions: &[MediaType],
    ) -> Result<CompleteUploadResponse, ApiError> {
        let urls = self
            .presigned_urls(&PresignedUrlRequest {
                entity_type,
                entity_id: entity_id.to_string(),
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                file_size: body.len() as u64,
            })
            .await?;

        let uploads: Vec<&PresignedUpload> = urls
            .uploads
            .iter()
            .filter(|u| renditions.is_empty() || renditions.contains(&u.media_type))
            .collect();
        if uploads.is_empty() {
            return Err(ApiError::InvalidResponse(format!(
                "No upload URL for {:?}",
                renditions
            )));
        }

        try_join_all(
            uploads
                .iter()
                .map(|u| self.upload_file(&u.upload_url, content_type, body.clone())),
        )
        .await?;

        self.complete_upload(&CompleteUploadRequest {
            entity_type,
            entity_id: entity_id.to_string(),
            uploads: uploads.into_iter().map(CompletedUpload::from).collect(),
        })
        .await
    }

    pub async fn delete_media(&self, media_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/media/{}", media_id)).await
    }

    /// Delete every media item attached to a group or gathering.
    pub async fn delete_entity_media(&self, entity_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/media/entity/{}", entity_id)).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct RecordingPort {
        calls: StdMutex<Vec<String>>,
    }

    impl NotificationPort for RecordingPort {
        fn notify(&self, message: &str) {
            self.calls.lock().unwrap().push(format!("notify:{}", message));
        }

        fn navigate(&self, path: &str, replace: bool) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("navigate:{}:{}", path, replace));
        }
    }

    fn client_with(
        base_url: &str,
        storage: DeviceStorage,
    ) -> (ApiClient, Arc<RecordingPort>) {
        let port = Arc::new(RecordingPort::default());
        let client = ApiClient::new(
            base_url,
            Arc::new(Mutex::new(storage)),
            port.clone() as Arc<dyn NotificationPort>,
        )
        .unwrap();
        (client, port)
    }

    #[test]
    fn test_url_joins_base_and_endpoint() {
        let (client, _) = client_with("http://localhost:8080/", DeviceStorage::in_memory());
        assert_eq!(client.url("/members/me"), "http://localhost:8080/members/me");
    }

    #[test]
    fn test_bearer_prefix() {
        assert_eq!(ApiClient::bearer("abc"), "Bearer abc");
        assert_eq!(ApiClient::bearer("Bearer abc"), "Bearer abc");
    }

    #[test]
    fn test_decode_empty_body() {
        ApiClient::decode::<()>("", "u").unwrap();
        let none: Option<User> = ApiClient::decode("  ", "u").unwrap();
        assert!(none.is_none());
        let err = ApiClient::decode::<Vec<Church>>("{oops", "u").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_session_expiry_clears_session_and_redirects() {
        let mut storage = DeviceStorage::in_memory();
        storage.set_token("expired".to_string());
        storage.set_church_id("c1".to_string());
        let (client, port) = client_with(DEFAULT_API_BASE_URL, storage);

        client.handle_session_expired().await;

        assert!(!client.is_authenticated().await);
        assert!(client.storage().lock().await.church_id().is_none());
        assert_eq!(
            *port.calls.lock().unwrap(),
            vec![
                format!("notify:{}", SESSION_EXPIRED_MESSAGE),
                "navigate:/login:true".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let mut storage = DeviceStorage::in_memory();
        storage.set_token("token".to_string());
        let (client, port) = client_with("http://127.0.0.1:1", storage);

        let err = client.my_info().await.unwrap_err();
        assert!(matches!(err, ApiError::NetworkError(_)));
        assert!(client.is_authenticated().await);
        assert!(port.calls.lock().unwrap().is_empty());
    }

    /// Accept one connection, answer with `status_line`, and hand back the
    /// raw request that was received.
    async fn serve_once(status_line: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/upload?sig=abc", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                received.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&received).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|l| {
                            l.to_ascii_lowercase()
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if received.len() >= end + 4 + length || n == 0 {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                status_line
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&received).to_string()
        });

        (url, handle)
    }

    #[test]
    fn test_upload_request_carries_no_credentials() {
        let mut storage = DeviceStorage::in_memory();
        storage.set_token("session".to_string());
        let (client, _) = client_with(DEFAULT_API_BASE_URL, storage);

        let request = client
            .upload_request("https://r2.example/m.jpg?sig=2", "", Bytes::from_static(b"jpg"))
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::PUT);
        assert_eq!(request.url().as_str(), "https://r2.example/m.jpg?sig=2");
        assert!(request.headers().get(header::AUTHORIZATION).is_none());
        assert_eq!(
            request.headers().get(header::CONTENT_TYPE).unwrap(),
            DEFAULT_UPLOAD_CONTENT_TYPE
        );
    }

    #[tokio::test]
    async fn test_upload_file_sends_body_without_bearer() {
        let mut storage = DeviceStorage::in_memory();
        storage.set_token("session".to_string());
        let (client, _) = client_with(DEFAULT_API_BASE_URL, storage);
        let (url, server) = serve_once("200 OK").await;

        client
            .upload_file(&url, "image/jpeg", Bytes::from_static(b"jpeg-bytes"))
            .await
            .unwrap();

        let received = server.await.unwrap();
        assert!(received.starts_with("PUT /upload?sig=abc"));
        assert!(received.to_ascii_lowercase().contains("content-type: image/jpeg"));
        assert!(!received.to_ascii_lowercase().contains("authorization"));
        assert!(received.ends_with("jpeg-bytes"));
    }

    #[tokio::test]
    async fn test_rejected_upload_keeps_session() {
        let mut storage = DeviceStorage::in_memory();
        storage.set_token("session".to_string());
        let (client, port) = client_with(DEFAULT_API_BASE_URL, storage);
        let (url, server) = serve_once("401 Unauthorized").await;

        let err = client
            .upload_file(&url, "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap_err();
        server.await.unwrap();

        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.to_string(), "Upload failed: 401");
        assert!(client.is_authenticated().await);
        assert!(port.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_select_church_is_remembered() {
        let (client, _) = client_with(DEFAULT_API_BASE_URL, DeviceStorage::in_memory());
        client.select_church("c42").await;
        assert_eq!(client.storage().lock().await.church_id(), Some("c42"));
    }
}
