use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaptismStatus {
    Baptized,
    NotBaptized,
    Paedobaptism,
}

impl BaptismStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            BaptismStatus::Baptized => "세례",
            BaptismStatus::NotBaptized => "미세례",
            BaptismStatus::Paedobaptism => "유아세례",
        }
    }
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub sex: String,
    pub birthday: String,
    pub phone: String,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub baptism_status: Option<BaptismStatus>,
    #[serde(default)]
    pub mbti: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMyInfo {
    pub id: String,
    pub name: String,
    pub sex: Sex,
    pub birthday: String,
    pub phone: String,
}
