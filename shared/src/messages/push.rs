//! Push event payloads and the notifications built from them

use serde::{Deserialize, Serialize};

/// Title of every notification
pub const NOTIFICATION_TITLE: &str = "Speakerbot";

/// Body used when the push payload carries no message
pub const DEFAULT_NOTIFICATION_BODY: &str = "Síntese concluída";

/// Microphone glyph on a black square, used as both icon and badge
pub const NOTIFICATION_ICON: &str = concat!(
    "data:image/svg+xml,<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 192 192\">",
    "<rect fill=\"%23000\" width=\"192\" height=\"192\"/>",
    "<text x=\"50%\" y=\"50%\" font-size=\"100\" font-weight=\"bold\" fill=\"%23fff\" ",
    "text-anchor=\"middle\" dominant-baseline=\"middle\">🎙️</text></svg>"
);

/// JSON body of a push event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushPayload {
    pub message: Option<String>,
}

/// User-visible notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
}

impl Notification {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body: body.into(),
            icon: NOTIFICATION_ICON.to_string(),
            badge: NOTIFICATION_ICON.to_string(),
        }
    }

    /// Build the notification for raw push data
    ///
    /// Data that is not a JSON object with a string `message` falls back to
    /// the default body instead of failing.
    pub fn from_push_data(data: &[u8]) -> Self {
        let message = serde_json::from_slice::<PushPayload>(data).ok().and_then(|payload| payload.message);
        Self::with_body(message.unwrap_or_else(|| DEFAULT_NOTIFICATION_BODY.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_becomes_body() {
        let notification = Notification::from_push_data(r#"{"message":"Áudio pronto"}"#.as_bytes());
        assert_eq!(notification.title, NOTIFICATION_TITLE);
        assert_eq!(notification.body, "Áudio pronto");
        assert_eq!(notification.icon, NOTIFICATION_ICON);
        assert_eq!(notification.badge, NOTIFICATION_ICON);
    }

    #[test]
    fn test_missing_message_uses_default_body() {
        assert_eq!(Notification::from_push_data(b"{}").body, DEFAULT_NOTIFICATION_BODY);
        assert_eq!(Notification::from_push_data(br#"{"message":null}"#).body, DEFAULT_NOTIFICATION_BODY);
    }

    #[test]
    fn test_malformed_payload_uses_default_body() {
        assert_eq!(Notification::from_push_data(b"plain text").body, DEFAULT_NOTIFICATION_BODY);
        assert_eq!(Notification::from_push_data(br#"{"message":42}"#).body, DEFAULT_NOTIFICATION_BODY);
    }
}
