use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::Sex;

/// Device state file name in the data directory
const DEVICE_FILE: &str = "device.json";

/// Signup form fields kept while the member moves between signup steps.
/// Passwords are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupDraft {
    pub name: String,
    pub birth_date: String,
    pub sex: Option<Sex>,
    pub phone: String,
    pub email: String,
    pub postcode: String,
    pub address1: String,
    pub address2: String,
    pub phone_checked: bool,
    pub email_verified: bool,
}

impl SignupDraft {
    /// Street address and detail joined the way the signup request expects.
    pub fn full_address(&self) -> String {
        [self.address1.trim(), self.address2.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceState {
    pub auth_token: Option<String>,
    pub church_id: Option<String>,
    pub provision_token: Option<String>,
    #[serde(default)]
    pub provision_pending: bool,
    pub signup_draft: Option<SignupDraft>,
}

pub struct DeviceStorage {
    path: Option<PathBuf>,
    pub state: DeviceState,
}

impl DeviceStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            path: Some(data_dir.join(DEVICE_FILE)),
            state: DeviceState::default(),
        }
    }

    /// Storage that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: DeviceState::default(),
        }
    }

    /// Load state from disk. Returns whether a saved state was found.
    pub fn load(&mut self) -> Result<bool> {
        let Some(ref path) = self.path else {
            return Ok(false);
        };
        if !path.exists() {
            return Ok(false);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read device state file")?;
        self.state = serde_json::from_str(&contents).context("Failed to parse device state file")?;
        Ok(true)
    }

    pub fn save(&self) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.state)?;
        std::fs::write(path, contents).context("Failed to write device state file")?;
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.state.auth_token.as_deref()
    }

    pub fn set_token(&mut self, token: String) {
        self.state.auth_token = Some(token);
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.auth_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn church_id(&self) -> Option<&str> {
        self.state.church_id.as_deref()
    }

    pub fn set_church_id(&mut self, church_id: String) {
        self.state.church_id = Some(church_id);
    }

    /// Hold a provisioning token instead of a session token until the
    /// member confirms their account details.
    pub fn set_provisioning(&mut self, token: String) {
        self.state.provision_token = Some(token);
        self.state.provision_pending = true;
    }

    pub fn provision_token(&self) -> Option<&str> {
        self.state.provision_token.as_deref()
    }

    pub fn save_signup_draft(&mut self, draft: SignupDraft) {
        self.state.signup_draft = Some(draft);
    }

    pub fn signup_draft(&self) -> Option<&SignupDraft> {
        self.state.signup_draft.as_ref()
    }

    pub fn clear_signup_draft(&mut self) {
        self.state.signup_draft = None;
    }

    /// Forget the session: token, church selection and provisioning state.
    /// A signup draft in progress is kept.
    pub fn logout(&mut self) {
        self.state.auth_token = None;
        self.state.church_id = None;
        self.state.provision_token = None;
        self.state.provision_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logout_clears_session_but_keeps_draft() {
        let mut storage = DeviceStorage::in_memory();
        storage.set_token("token".to_string());
        storage.set_church_id("c1".to_string());
        storage.set_provisioning("prov".to_string());
        storage.save_signup_draft(SignupDraft {
            name: "김은혜".to_string(),
            ..Default::default()
        });

        storage.logout();

        assert!(!storage.is_authenticated());
        assert!(storage.church_id().is_none());
        assert!(storage.provision_token().is_none());
        assert!(!storage.state.provision_pending);
        assert!(storage.signup_draft().is_some());
    }

    #[test]
    fn test_state_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = DeviceStorage::new(dir.path().to_path_buf());
        storage.set_token("token".to_string());
        storage.set_church_id("c1".to_string());
        storage.save().unwrap();

        let mut reloaded = DeviceStorage::new(dir.path().to_path_buf());
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.token(), Some("token"));
        assert_eq!(reloaded.church_id(), Some("c1"));
    }

    #[test]
    fn test_load_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = DeviceStorage::new(dir.path().to_path_buf());
        assert!(!storage.load().unwrap());
        assert!(!storage.is_authenticated());
    }

    #[test]
    fn test_full_address() {
        let draft = SignupDraft {
            address1: "서울시 강남구 테헤란로 1".to_string(),
            address2: " 101호 ".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.full_address(), "서울시 강남구 테헤란로 1 101호");

        let street_only = SignupDraft {
            address1: "서울시".to_string(),
            ..Default::default()
        };
        assert_eq!(street_only.full_address(), "서울시");
    }
}
