use serde::{Deserialize, Serialize};

/// What a piece of media is attached to.
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaEntityType {
    Group,
    Gathering,
}

/// Rendition of an uploaded image. The backend hands out one upload URL
/// per rendition.
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Thumbnail,
    Medium,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrlRequest {
    pub entity_type: MediaEntityType,
    pub entity_id: String,
    pub file_name: String,
    pub content_type: String,
    pub file_size: u64,
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub media_type: MediaType,
    /// Object storage URL the file is PUT to. Not on the API origin.
    pub upload_url: String,
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresignedUrls {
    pub uploads: Vec<PresignedUpload>,
}

impl PresignedUrls {
    pub fn upload(&self, media_type: MediaType) -> Option<&PresignedUpload> {
        self.uploads.iter().find(|u| u.media_type == media_type)
    }
}

/// A finished upload, reported back so the backend records it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedUpload {
    pub media_type: MediaType,
    pub public_url: String,
}

impl From<&PresignedUpload> for CompletedUpload {
    fn from(upload: &PresignedUpload) -> Self {
        Self {
            media_type: upload.media_type,
            public_url: upload.public_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadRequest {
    pub entity_type: MediaEntityType,
    pub entity_id: String,
    pub uploads: Vec<CompletedUpload>,
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedMedia {
    pub media_id: String,
    pub media_type: MediaType,
    pub public_url: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadResponse {
    pub medias: Vec<UploadedMedia>,
    pub total_count: u32,
    pub completed_at: String,
}

impl CompleteUploadResponse {
    /// Public URL of the given rendition, e.g. the medium image a group shows.
    pub fn public_url(&self, media_type: MediaType) -> Option<&str> {
        self.medias
            .iter()
            .find(|m| m.media_type == media_type)
            .map(|m| m.public_url.as_str())
    }
}
