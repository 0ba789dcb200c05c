use serde::{Deserialize, Serialize};

/// Shared secret for webhook signature verification, injected as app data.
#[derive(Clone)]
pub struct IdentityWebhookSecret(pub String);

// Identity provider lifecycle event envelope
#[derive(Debug, Deserialize)]
pub struct IdentityEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: IdentityUserData,
}

#[derive(Debug, Deserialize)]
pub struct IdentityUserData {
    pub id: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

#[derive(Serialize)]
pub struct WebhookResponse {
    pub received: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_envelope_deserializes() {
        let event: IdentityEvent = serde_json::from_str(
            r#"{"type":"user.created","data":{"id":"ext_42","user_name":"Dana","user_email":"dana@example.com"}}"#,
        )
        .unwrap();
        assert_eq!(event.kind, "user.created");
        assert_eq!(event.data.id, "ext_42");
        assert_eq!(event.data.user_email.as_deref(), Some("dana@example.com"));
    }

    #[test]
    fn deleted_event_needs_only_the_id() {
        let event: IdentityEvent =
            serde_json::from_str(r#"{"type":"user.deleted","data":{"id":"ext_42"}}"#).unwrap();
        assert_eq!(event.kind, "user.deleted");
        assert!(event.data.user_name.is_none());
    }
}
