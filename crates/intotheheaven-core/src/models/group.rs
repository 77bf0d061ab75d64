use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupType {
    Normal,
    Newcomer,
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub church_id: String,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    pub start_date: String,
    pub end_date: String,
    pub group_member_count: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Group {
    pub fn display_member_count(&self) -> String {
        format!("{}명", self.group_member_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_type_field() {
        let json = r#"{"id":"g1","name":"청년 1셀","churchId":"c1","type":"NEWCOMER",
            "startDate":"2025-01-01","endDate":"2025-06-30","groupMemberCount":7}"#;
        let group: Group = serde_json::from_str(json).unwrap();
        assert_eq!(group.group_type, GroupType::Newcomer);
        assert_eq!(group.display_member_count(), "7명");
    }
}
