use bytes::Bytes;

/// Title shown on every push notification.
const NOTIFICATION_TITLE: &str = "IntoTheHeaven";

/// Body used when a push arrives without a payload.
const DEFAULT_NOTIFICATION_BODY: &str = "새로운 알림이 있습니다.";

const NOTIFICATION_ICON: &str = "/icon-192.png";

/// Vibrate, pause, vibrate (milliseconds).
const VIBRATION_PATTERN: [u32; 3] = [100, 50, 100];

/// An incoming push message. The payload, if any, is plain text.
#[derive(Debug, Clone, Default)]
pub struct PushMessage {
    pub data: Option<Bytes>,
}

impl PushMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            data: Some(Bytes::from(text.into())),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Payload as text, or `None` when absent or empty.
    pub fn body(&self) -> Option<String> {
        self.data
            .as_ref()
            .filter(|data| !data.is_empty())
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub tag: Option<String>,
}

/// A click on a notification the controller showed.
#[derive(Debug, Clone, Default)]
pub struct NotificationClick {
    pub tag: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NotificationDefaults {
    pub title: String,
    pub default_body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            default_body: DEFAULT_NOTIFICATION_BODY.to_string(),
            icon: NOTIFICATION_ICON.to_string(),
            badge: NOTIFICATION_ICON.to_string(),
            vibrate: VIBRATION_PATTERN.to_vec(),
        }
    }
}

impl NotificationDefaults {
    pub fn options_for(&self, message: &PushMessage) -> NotificationOptions {
        NotificationOptions {
            body: message.body().unwrap_or_else(|| self.default_body.clone()),
            icon: self.icon.clone(),
            badge: self.badge.clone(),
            vibrate: self.vibrate.clone(),
            tag: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_uses_default_body() {
        let defaults = NotificationDefaults::default();
        assert_eq!(
            defaults.options_for(&PushMessage::empty()).body,
            "새로운 알림이 있습니다."
        );
        assert_eq!(
            defaults.options_for(&PushMessage::text("")).body,
            "새로운 알림이 있습니다."
        );
    }

    #[test]
    fn test_payload_becomes_body() {
        let options = NotificationDefaults::default().options_for(&PushMessage::text("새 기도제목"));
        assert_eq!(options.body, "새 기도제목");
        assert_eq!(options.icon, "/icon-192.png");
        assert_eq!(options.badge, "/icon-192.png");
        assert_eq!(options.vibrate, vec![100, 50, 100]);
    }
}
