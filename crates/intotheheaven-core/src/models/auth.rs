use serde::{Deserialize, Serialize};

use super::member::Sex;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    /// Set for accounts created by an administrator that still need the
    /// member to confirm their details.
    #[serde(default)]
    pub is_provisioned: Option<bool>,
}

impl LoginResponse {
    pub fn is_provisioned(&self) -> bool {
        self.is_provisioned == Some(true)
    }
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub password: String,
    pub name: String,
    pub email: String,
    pub birthdate: String,
    pub sex: Sex,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub member_id: String,
    pub message: String,
}

/// Why an email verification code is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationPurpose {
    Signup,
    PasswordReset,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Availability {
    pub available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_provisioning_flag() {
        let plain: LoginResponse = serde_json::from_str(r#"{"accessToken":"t"}"#).unwrap();
        assert!(!plain.is_provisioned());

        let provisioned: LoginResponse =
            serde_json::from_str(r#"{"accessToken":"t","isProvisioned":true}"#).unwrap();
        assert!(provisioned.is_provisioned());
    }

    #[test]
    fn test_verification_purpose_wire_format() {
        assert_eq!(
            serde_json::to_string(&VerificationPurpose::PasswordReset).unwrap(),
            r#""PASSWORD_RESET""#
        );
    }
}
