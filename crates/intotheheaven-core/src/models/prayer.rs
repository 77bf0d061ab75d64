use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyPrayer {
    pub id: String,
    pub prayer_request: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_answered: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub gathering_date: Option<String>,
}

impl MyPrayer {
    pub fn status_label(&self) -> &'static str {
        if self.is_answered {
            "응답됨"
        } else {
            "기도 중"
        }
    }
}
