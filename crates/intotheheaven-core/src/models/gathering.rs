use serde::{Deserialize, Serialize};

/// Summary row in a group's gathering list.
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gathering {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
    pub place: String,
    pub total_worship_attendance_count: u32,
    pub total_gathering_attendance_count: u32,
    pub total_prayer_request_count: u32,
    #[serde(default)]
    pub leader_comment: Option<String>,
    #[serde(default)]
    pub admin_comment: Option<String>,
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prayer {
    pub id: String,
    pub prayer_request: String,
    #[serde(default)]
    pub description: Option<String>,
    pub answered: bool,
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatheringMember {
    pub member_id: String,
    pub group_member_id: String,
    pub name: String,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub worship_attendance: bool,
    pub gathering_attendance: bool,
    #[serde(default)]
    pub story: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub prayers: Vec<Prayer>,
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: String,
    pub media_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub url: String,
    pub created_at: String,
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatheringDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
    pub started_at: String,
    pub ended_at: String,
    pub place: String,
    #[serde(default)]
    pub gathering_members: Vec<GatheringMember>,
    #[serde(default)]
    pub leader_comment: Option<String>,
    #[serde(default)]
    pub admin_comment: Option<String>,
    #[serde(default)]
    pub medias: Vec<Media>,
}

impl GatheringDetail {
    pub fn worship_attendance(&self) -> usize {
        self.gathering_members
            .iter()
            .filter(|m| m.worship_attendance)
            .count()
    }

    pub fn gathering_attendance(&self) -> usize {
        self.gathering_members
            .iter()
            .filter(|m| m.gathering_attendance)
            .count()
    }

    pub fn prayer_count(&self) -> usize {
        self.gathering_members.iter().map(|m| m.prayers.len()).sum()
    }
}

/// Gathering as returned by create and update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatheringResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
    pub started_at: String,
    pub ended_at: String,
    pub place: String,
    #[serde(default)]
    pub leader_comment: Option<String>,
    #[serde(default)]
    pub admin_comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGatheringRequest {
    pub group_id: String,
    pub name: String,
    pub description: String,
    pub date: String,
    pub started_at: String,
    pub ended_at: String,
    pub place: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGatheringRequest {
    pub name: String,
    pub date: String,
    pub place: String,
    pub started_at: String,
    pub ended_at: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader_comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerInput {
    pub prayer_request: String,
    pub description: String,
}

/// Attendance, story and prayers recorded for one member at one gathering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGatheringMember {
    pub worship_attendance: bool,
    pub gathering_attendance: bool,
    pub story: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    pub prayers: Vec<PrayerInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatheringMemberRecord {
    pub id: String,
    pub worship_attendance: bool,
    pub gathering_attendance: bool,
    #[serde(default)]
    pub story: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub prayers: Vec<Prayer>,
}
