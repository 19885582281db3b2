//! Domain types shared across the board engine and the REST layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque card identifier. Backends are inconsistent about whether ids are
/// JSON strings or integers, so both are accepted and compared structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardId {
    Num(i64),
    Text(String),
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardId::Num(n) => write!(f, "{}", n),
            CardId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for CardId {
    fn from(n: i64) -> Self {
        CardId::Num(n)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        CardId::Text(s.to_string())
    }
}

/// A status-bearing record on the board (an audit finding, generalized).
///
/// `status` is the only field the board engine ever writes. Everything else
/// the backend sends rides along in `payload`, which is opaque to the
/// engine: it is carried, resent on update, and rendered — never read for
/// control flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub status: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Card {
    pub fn new(id: impl Into<CardId>, status: impl Into<String>) -> Self {
        Card {
            id: id.into(),
            status: status.into(),
            payload: Map::new(),
        }
    }

    /// Builder-style payload insertion, mostly for tests and fixtures.
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.payload.insert(key.to_string(), value);
        self
    }

    /// A payload field as text, if it is present and a string.
    pub fn text_field(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

/// A board column. Lanes are statically declared (config or
/// [`default_lanes`]) — never created or destroyed at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub key: String,
    pub label: String,
}

impl Lane {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Lane {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// The stock three-lane board used when config declares nothing else.
pub fn default_lanes() -> Vec<Lane> {
    vec![
        Lane::new("not_started", "Not Started"),
        Lane::new("in_progress", "In Progress"),
        Lane::new("done", "Done"),
    ]
}

/// The JSON envelope every backend this system talks to wraps its payloads
/// in: `{ success, data, error }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_card_id_accepts_string_and_number() {
        let from_num: CardId = serde_json::from_value(json!(7)).unwrap();
        let from_text: CardId = serde_json::from_value(json!("F-7")).unwrap();
        assert_eq!(from_num, CardId::Num(7));
        assert_eq!(from_text, CardId::Text("F-7".to_string()));
        assert_ne!(from_num, from_text);
    }

    #[test]
    fn test_card_id_display() {
        assert_eq!(CardId::Num(42).to_string(), "42");
        assert_eq!(CardId::from("F-42").to_string(), "F-42");
    }

    #[test]
    fn test_card_flattens_payload() {
        let card: Card = serde_json::from_value(json!({
            "id": 1,
            "status": "not_started",
            "findingName": "Firewall Audit",
            "owner": "ops",
        }))
        .unwrap();
        assert_eq!(card.id, CardId::Num(1));
        assert_eq!(card.status, "not_started");
        assert_eq!(card.text_field("findingName"), Some("Firewall Audit"));
        assert_eq!(card.text_field("owner"), Some("ops"));
        assert_eq!(card.text_field("missing"), None);
    }

    #[test]
    fn test_card_serializes_payload_at_top_level() {
        let card = Card::new(1, "done").with_field("findingName", json!("Backup Policy"));
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["id"], json!(1));
        assert_eq!(value["status"], json!("done"));
        assert_eq!(value["findingName"], json!("Backup Policy"));
    }

    #[test]
    fn test_text_field_ignores_non_string_values() {
        let card = Card::new(1, "done").with_field("score", json!(3));
        assert_eq!(card.text_field("score"), None);
    }

    #[test]
    fn test_default_lanes_are_the_three_stock_columns() {
        let lanes = default_lanes();
        let keys: Vec<&str> = lanes.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["not_started", "in_progress", "done"]);
    }

    #[test]
    fn test_envelope_defaults_when_fields_missing() {
        let env: ApiEnvelope<Vec<Card>> = serde_json::from_value(json!({})).unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        assert!(env.error.is_none());
    }

    #[test]
    fn test_envelope_carries_error_string() {
        let env: ApiEnvelope<Card> =
            serde_json::from_value(json!({ "success": false, "error": "finding not found" }))
                .unwrap();
        assert!(!env.success);
        assert_eq!(env.error.as_deref(), Some("finding not found"));
    }
}
