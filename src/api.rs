//! REST collaborator layer.
//!
//! Every backend this system talks to (findings, audit universe, policy,
//! finance, portfolio) speaks the same `{ success, data, error }` envelope
//! with snake_case field names. [`HttpStore`] owns that contract and applies
//! the key transcoder at the boundary in both directions, so the rest of the
//! crate only ever sees camelCase payloads.
//!
//! The board engine depends on the [`RecordStore`] trait, never on the HTTP
//! type — tests substitute an in-memory implementation.

use crate::casing::{to_camel, to_snake};
use crate::errors::ApiError;
use crate::model::{ApiEnvelope, Card, CardId};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// The remote system of record for one card collection.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the full collection. Replaces local state wholesale.
    async fn fetch_all(&self) -> Result<Vec<Card>, ApiError>;

    /// Persist a full card record; returns the server's canonical copy,
    /// which may include server-computed fields.
    async fn update(&self, card: &Card) -> Result<Card, ApiError>;

    /// Create a new record; returns the server's canonical copy.
    async fn create(&self, card: &Card) -> Result<Card, ApiError>;

    /// Delete a record by id.
    async fn delete(&self, id: &CardId) -> Result<(), ApiError>;
}

/// HTTP implementation of [`RecordStore`] against one collection URL
/// (e.g. `http://host/api/findings`).
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Transport)?;
        Ok(HttpStore {
            client,
            base_url: base_url.into(),
        })
    }

    fn record_url(&self, id: &CardId) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), id)
    }

    /// Read a response body as JSON. The envelope is parsed even on non-2xx
    /// statuses: backends report application errors through `success: false`
    /// rather than relying on the status code alone.
    async fn read_json(&self, resp: reqwest::Response) -> Result<Value, ApiError> {
        resp.json().await.map_err(ApiError::Transport)
    }
}

#[async_trait]
impl RecordStore for HttpStore {
    async fn fetch_all(&self) -> Result<Vec<Card>, ApiError> {
        debug!(url = %self.base_url, "fetching card collection");
        let resp = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let raw = self.read_json(resp).await?;
        unwrap_envelope(&raw)
    }

    async fn update(&self, card: &Card) -> Result<Card, ApiError> {
        let url = self.record_url(&card.id);
        debug!(url = %url, status = %card.status, "persisting card update");
        let resp = self
            .client
            .put(&url)
            .json(&wire_body(card)?)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let raw = self.read_json(resp).await?;
        unwrap_envelope(&raw)
    }

    async fn create(&self, card: &Card) -> Result<Card, ApiError> {
        debug!(url = %self.base_url, "creating card");
        let resp = self
            .client
            .post(&self.base_url)
            .json(&wire_body(card)?)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let raw = self.read_json(resp).await?;
        unwrap_envelope(&raw)
    }

    async fn delete(&self, id: &CardId) -> Result<(), ApiError> {
        let url = self.record_url(id);
        debug!(url = %url, "deleting card");
        let resp = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let raw = self.read_json(resp).await?;
        check_envelope(&raw)
    }
}

/// Serialize a card for the wire: snake_case keys throughout, including the
/// opaque payload.
fn wire_body(card: &Card) -> Result<Value, ApiError> {
    let value = serde_json::to_value(card).map_err(ApiError::Decode)?;
    Ok(to_snake(&value))
}

/// Transcode a raw envelope to camelCase, verify `success`, and pull out the
/// payload. `success: true` without `data` is a contract violation.
fn unwrap_envelope<T: DeserializeOwned>(raw: &Value) -> Result<T, ApiError> {
    let envelope: ApiEnvelope<T> =
        serde_json::from_value(to_camel(raw)).map_err(ApiError::Decode)?;
    if !envelope.success {
        return Err(backend_error(envelope.error));
    }
    envelope.data.ok_or(ApiError::MissingData)
}

/// Like [`unwrap_envelope`] but for operations whose success carries no
/// payload (delete).
fn check_envelope(raw: &Value) -> Result<(), ApiError> {
    let envelope: ApiEnvelope<Value> =
        serde_json::from_value(to_camel(raw)).map_err(ApiError::Decode)?;
    if !envelope.success {
        return Err(backend_error(envelope.error));
    }
    Ok(())
}

fn backend_error(error: Option<String>) -> ApiError {
    ApiError::Backend {
        message: error.unwrap_or_else(|| "backend did not provide an error message".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CardId;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope_transcodes_payload_keys() {
        let raw = json!({
            "success": true,
            "data": [
                { "id": 1, "status": "not_started", "finding_name": "Firewall Audit", "no_pks_po": "PKS-01" },
            ],
        });
        let cards: Vec<Card> = unwrap_envelope(&raw).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, CardId::Num(1));
        assert_eq!(cards[0].text_field("findingName"), Some("Firewall Audit"));
        // Irregular key went through the override table.
        assert_eq!(cards[0].text_field("noPKSPO"), Some("PKS-01"));
        assert!(cards[0].payload.get("finding_name").is_none());
    }

    #[test]
    fn test_unwrap_envelope_surfaces_backend_error_verbatim() {
        let raw = json!({ "success": false, "error": "finding not found" });
        let result: Result<Card, ApiError> = unwrap_envelope(&raw);
        match result {
            Err(ApiError::Backend { message }) => assert_eq!(message, "finding not found"),
            other => panic!("Expected Backend error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_unwrap_envelope_missing_data_on_success() {
        let raw = json!({ "success": true });
        let result: Result<Card, ApiError> = unwrap_envelope(&raw);
        assert!(matches!(result, Err(ApiError::MissingData)));
    }

    #[test]
    fn test_unwrap_envelope_backend_error_without_message() {
        let raw = json!({ "success": false });
        let result: Result<Card, ApiError> = unwrap_envelope(&raw);
        match result {
            Err(ApiError::Backend { message }) => assert!(!message.is_empty()),
            other => panic!("Expected Backend error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_check_envelope_accepts_dataless_success() {
        let raw = json!({ "success": true });
        assert!(check_envelope(&raw).is_ok());
    }

    #[test]
    fn test_wire_body_snake_cases_payload() {
        let card = Card::new(7, "in_progress")
            .with_field("findingName", json!("Backup Policy"))
            .with_field("noPKSPO", json!("PKS-02"));
        let body = wire_body(&card).unwrap();
        assert_eq!(body["id"], json!(7));
        assert_eq!(body["status"], json!("in_progress"));
        assert_eq!(body["finding_name"], json!("Backup Policy"));
        assert_eq!(body["no_pks_po"], json!("PKS-02"));
        assert!(body.get("findingName").is_none());
    }

    #[test]
    fn test_record_url_joins_without_double_slash() {
        let store = HttpStore::new("http://localhost:8080/api/findings/", Duration::from_secs(5))
            .unwrap();
        assert_eq!(
            store.record_url(&CardId::Num(3)),
            "http://localhost:8080/api/findings/3"
        );
        let store =
            HttpStore::new("http://localhost:8080/api/findings", Duration::from_secs(5)).unwrap();
        assert_eq!(
            store.record_url(&CardId::from("F-3")),
            "http://localhost:8080/api/findings/F-3"
        );
    }
}
