use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Webhook body posted by the voice platform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequest {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub context: Option<Context>,
    pub request: RequestPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub application: Option<Application>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "System", default)]
    pub system: Option<SystemContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemContext {
    #[serde(default)]
    pub application: Option<Application>,
}

/// Common header of every request payload plus its classified body.
///
/// Read leniently from any JSON value so that a malformed body never fails
/// the whole request before the caller has been identified.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Value", into = "RawRequest")]
pub struct RequestPayload {
    pub request_id: Option<String>,
    pub locale: Option<String>,
    /// Raw platform timestamp; see [`RequestPayload::parsed_timestamp`]
    pub timestamp: Option<String>,
    pub kind: RequestKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestKind {
    Launch,
    Intent(IntentPayload),
    /// Any `AudioPlayer.*` event, keyed by its type
    AudioPlayer(String),
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, Slot>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HashMap<String, Slot>>::deserialize(deserializer)?.unwrap_or_default())
}

impl IntentPayload {
    /// Value of the named slot, ignoring slots the user left unfilled
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .and_then(|slot| slot.value.as_deref())
            .filter(|value| !value.trim().is_empty())
    }
}

impl SkillRequest {
    /// Application id from the session, or from the context for sessionless events
    pub fn application_id(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|s| s.application.as_ref())
            .or_else(|| {
                self.context
                    .as_ref()
                    .and_then(|c| c.system.as_ref())
                    .and_then(|system| system.application.as_ref())
            })
            .map(|app| app.application_id.as_str())
    }
}

impl RequestPayload {
    /// Timestamp as UTC, or `None` when absent or not RFC 3339
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }
}

impl RequestKind {
    pub fn type_name(&self) -> &str {
        match self {
            RequestKind::Launch => "LaunchRequest",
            RequestKind::Intent(_) => "IntentRequest",
            RequestKind::AudioPlayer(t) | RequestKind::Other(t) => t,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawRequest {
    #[serde(rename = "type")]
    request_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    intent: Option<IntentPayload>,
}

impl From<Value> for RequestPayload {
    fn from(value: Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        let request_type = field("type").unwrap_or_default();
        // An intent that does not parse leaves the request unclassified
        let intent = value
            .get("intent")
            .and_then(|intent| IntentPayload::deserialize(intent).ok());

        let kind = match (request_type.as_str(), intent) {
            ("LaunchRequest", _) => RequestKind::Launch,
            ("IntentRequest", Some(intent)) => RequestKind::Intent(intent),
            (t, _) if t == "AudioPlayerRequest" || t.starts_with("AudioPlayer.") => {
                RequestKind::AudioPlayer(t.to_string())
            }
            (t, _) => RequestKind::Other(t.to_string()),
        };

        Self {
            request_id: field("requestId"),
            locale: field("locale"),
            timestamp: field("timestamp"),
            kind,
        }
    }
}

impl From<RequestPayload> for RawRequest {
    fn from(payload: RequestPayload) -> Self {
        let request_type = payload.kind.type_name().to_string();
        let intent = match payload.kind {
            RequestKind::Intent(intent) => Some(intent),
            _ => None,
        };
        Self {
            request_type,
            request_id: payload.request_id,
            locale: payload.locale,
            timestamp: payload.timestamp,
            intent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> SkillRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn classifies_intent_request_with_slots() {
        let request = parse(json!({
            "version": "1.0",
            "session": {
                "sessionId": "amzn1.echo-api.session.1",
                "new": true,
                "application": { "applicationId": "app-1" }
            },
            "request": {
                "type": "IntentRequest",
                "requestId": "req-1",
                "locale": "en-US",
                "timestamp": "2017-09-01T10:00:00Z",
                "intent": {
                    "name": "CatchAllIntent",
                    "slots": { "phrase": { "name": "phrase", "value": "hello there" } }
                }
            }
        }));

        assert_eq!(request.application_id(), Some("app-1"));
        assert_eq!(request.request.request_id.as_deref(), Some("req-1"));
        match request.request.kind {
            RequestKind::Intent(intent) => {
                assert_eq!(intent.name, "CatchAllIntent");
                assert_eq!(intent.slot_value("phrase"), Some("hello there"));
            }
            other => panic!("expected intent, got {:?}", other),
        }
    }

    #[test]
    fn classifies_audio_player_events() {
        for t in ["AudioPlayerRequest", "AudioPlayer.PlaybackStarted"] {
            let request = parse(json!({ "request": { "type": t } }));
            assert_eq!(request.request.kind, RequestKind::AudioPlayer(t.to_string()));
        }
    }

    #[test]
    fn unknown_types_and_bare_intent_requests_are_other() {
        let ended = parse(json!({ "request": { "type": "SessionEndedRequest" } }));
        assert_eq!(
            ended.request.kind,
            RequestKind::Other("SessionEndedRequest".to_string())
        );

        let bare = parse(json!({ "request": { "type": "IntentRequest" } }));
        assert_eq!(bare.request.kind, RequestKind::Other("IntentRequest".to_string()));
    }

    #[test]
    fn application_id_falls_back_to_context() {
        let request = parse(json!({
            "context": { "System": { "application": { "applicationId": "app-ctx" } } },
            "request": { "type": "AudioPlayer.PlaybackStopped" }
        }));
        assert_eq!(request.application_id(), Some("app-ctx"));

        let anonymous = parse(json!({ "request": { "type": "LaunchRequest" } }));
        assert_eq!(anonymous.application_id(), None);
    }

    #[test]
    fn blank_or_missing_slot_values_are_absent() {
        let intent: IntentPayload = serde_json::from_value(json!({
            "name": "CatchAllIntent",
            "slots": { "phrase": { "name": "phrase" }, "other": { "value": "  " } }
        }))
        .unwrap();
        assert_eq!(intent.slot_value("phrase"), None);
        assert_eq!(intent.slot_value("other"), None);
        assert_eq!(intent.slot_value("missing"), None);
    }

    #[test]
    fn tolerates_malformed_optional_fields() {
        let request = parse(json!({
            "session": { "application": { "applicationId": "app-1" } },
            "request": {
                "type": "IntentRequest",
                "timestamp": "2017-09-01T10:00:00",
                "intent": { "slots": null }
            }
        }));

        assert_eq!(request.request.timestamp.as_deref(), Some("2017-09-01T10:00:00"));
        assert_eq!(request.request.parsed_timestamp(), None);
        match request.request.kind {
            RequestKind::Intent(intent) => {
                assert_eq!(intent.name, "");
                assert!(intent.slots.is_empty());
            }
            other => panic!("expected intent, got {:?}", other),
        }
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        let request = parse(json!({
            "request": { "type": "LaunchRequest", "timestamp": "2017-09-01T10:00:00Z" }
        }));
        assert_eq!(
            request.request.parsed_timestamp().map(|ts| ts.to_rfc3339()),
            Some("2017-09-01T10:00:00+00:00".to_string())
        );
    }

    #[test]
    fn unparseable_intent_or_missing_type_is_other() {
        let bad_intent = parse(json!({
            "request": { "type": "IntentRequest", "intent": { "name": 42 } }
        }));
        assert_eq!(
            bad_intent.request.kind,
            RequestKind::Other("IntentRequest".to_string())
        );

        let untyped = parse(json!({ "request": {} }));
        assert_eq!(untyped.request.kind, RequestKind::Other(String::new()));
    }

    #[test]
    fn session_without_application_falls_back_to_context() {
        let request = parse(json!({
            "session": { "sessionId": "s" },
            "context": { "System": { "application": { "applicationId": "app-ctx" } } },
            "request": { "type": "LaunchRequest" }
        }));
        assert_eq!(request.application_id(), Some("app-ctx"));
    }
}
