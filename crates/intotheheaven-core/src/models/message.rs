use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_name: String,
    #[serde(default)]
    pub receiver_name: Option<String>,
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub receiver_id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UnreadCount {
    pub count: u32,
}
