//! Salesforce REST client.
//!
//! Pre-authenticated per request: every call takes the organization's cached
//! `ConnectionDescriptor` (instance endpoint + access token), so one client instance
//! serves all tenants.

use crate::domain::{
    ConnectionDescriptor, ContactRecord, CrmDataClient, DomainError, DomainResult, QueryPage,
    SaveResult,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// REST API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "v59.0";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(rename = "totalSize")]
    total_size: u32,
    done: bool,
    #[serde(rename = "nextRecordsUrl")]
    next_records_url: Option<String>,
    #[serde(default)]
    records: Vec<serde_json::Map<String, Value>>,
}

#[derive(Debug, Serialize)]
struct CompositeUpdateRequest {
    #[serde(rename = "allOrNone")]
    all_or_none: bool,
    records: Vec<serde_json::Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct CompositeSaveResult {
    id: Option<String>,
    success: bool,
    #[serde(default)]
    errors: Vec<CompositeSaveError>,
}

#[derive(Debug, Deserialize)]
struct CompositeSaveError {
    message: String,
    #[serde(rename = "statusCode")]
    status_code: Option<String>,
}

#[derive(Clone)]
pub struct SalesforceClient {
    client: Client,
    api_version: String,
}

impl SalesforceClient {
    pub fn new(api_version: impl Into<String>) -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DomainError::QueryError(format!("http client build: {e}")))?;
        Ok(Self {
            client,
            api_version: api_version.into(),
        })
    }

    fn data_url(&self, conn: &ConnectionDescriptor, path: &str) -> String {
        format!(
            "{}/services/data/{}/{}",
            conn.instance_url, self.api_version, path
        )
    }

    async fn fetch_page(
        &self,
        conn: &ConnectionDescriptor,
        url: &str,
        query: Option<&str>,
    ) -> DomainResult<QueryPage> {
        let mut req = self.client.get(url).bearer_auth(&conn.access_token);
        if let Some(q) = query {
            req = req.query(&[("q", q)]);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| DomainError::QueryError(e.to_string()))?
            .error_for_status()
            .map_err(|e| DomainError::QueryError(e.to_string()))?;

        let body: QueryResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::QueryError(e.to_string()))?;

        let records = body
            .records
            .into_iter()
            .map(record_from_wire)
            .collect::<DomainResult<Vec<_>>>()?;

        debug!(
            total_size = body.total_size,
            fetched = records.len(),
            done = body.done,
            "query page fetched"
        );

        Ok(QueryPage {
            total_size: body.total_size,
            done: body.done,
            next_records_url: body.next_records_url,
            records,
        })
    }
}

/// Strip the REST `attributes` envelope and pull out the record id.
fn record_from_wire(mut wire: serde_json::Map<String, Value>) -> DomainResult<ContactRecord> {
    wire.remove("attributes");
    let id = wire
        .remove("Id")
        .and_then(|v| v.as_str().map(str::to_string))
        .ok_or_else(|| DomainError::QueryError("query record missing Id".to_string()))?;
    Ok(ContactRecord { id, fields: wire })
}

/// Rebuild the composite-update wire form: attributes envelope + Id + payload fields.
fn record_to_wire(record: &ContactRecord) -> serde_json::Map<String, Value> {
    let mut wire = serde_json::Map::new();
    wire.insert(
        "attributes".to_string(),
        serde_json::json!({ "type": "Contact" }),
    );
    wire.insert("Id".to_string(), Value::from(record.id.clone()));
    for (key, value) in &record.fields {
        wire.insert(key.clone(), value.clone());
    }
    wire
}

#[async_trait]
impl CrmDataClient for SalesforceClient {
    #[instrument(skip(self, conn, soql))]
    async fn query(&self, conn: &ConnectionDescriptor, soql: &str) -> DomainResult<QueryPage> {
        let url = self.data_url(conn, "query");
        self.fetch_page(conn, &url, Some(soql)).await
    }

    #[instrument(skip(self, conn))]
    async fn query_more(
        &self,
        conn: &ConnectionDescriptor,
        next_records_url: &str,
    ) -> DomainResult<QueryPage> {
        let url = format!("{}{}", conn.instance_url, next_records_url);
        self.fetch_page(conn, &url, None).await
    }

    #[instrument(skip(self, conn, records), fields(record_count = records.len()))]
    async fn update_contacts(
        &self,
        conn: &ConnectionDescriptor,
        records: &[ContactRecord],
    ) -> DomainResult<Vec<SaveResult>> {
        let url = self.data_url(conn, "composite/sobjects");
        let body = CompositeUpdateRequest {
            all_or_none: false,
            records: records.iter().map(record_to_wire).collect(),
        };

        let resp = self
            .client
            .patch(url)
            .bearer_auth(&conn.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::UpdateError(e.to_string()))?
            .error_for_status()
            .map_err(|e| DomainError::UpdateError(e.to_string()))?;

        let results: Vec<CompositeSaveResult> = resp
            .json()
            .await
            .map_err(|e| DomainError::UpdateError(e.to_string()))?;

        Ok(results
            .into_iter()
            .map(|r| SaveResult {
                id: r.id,
                success: r.success,
                errors: r
                    .errors
                    .into_iter()
                    .map(|e| match e.status_code {
                        Some(code) => format!("{}: {}", code, e.message),
                        None => e.message,
                    })
                    .collect(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_wire_strips_envelope() {
        let wire: serde_json::Map<String, Value> = serde_json::from_str(
            r#"{
                "attributes": {"type": "Contact", "url": "/services/data/v59.0/sobjects/Contact/003A"},
                "Id": "003A",
                "FirstName": "Ada",
                "LastName": "Lovelace",
                "Last_Processed_TS__c": null
            }"#,
        )
        .unwrap();

        let record = record_from_wire(wire).unwrap();
        assert_eq!(record.id, "003A");
        assert!(!record.fields.contains_key("attributes"));
        assert!(!record.fields.contains_key("Id"));
        assert_eq!(record.fields["FirstName"], Value::from("Ada"));
    }

    #[test]
    fn test_record_from_wire_requires_id() {
        let wire: serde_json::Map<String, Value> =
            serde_json::from_str(r#"{"FirstName": "Ada"}"#).unwrap();
        assert!(matches!(
            record_from_wire(wire),
            Err(DomainError::QueryError(_))
        ));
    }

    #[test]
    fn test_record_to_wire_round_trip() {
        let mut fields = serde_json::Map::new();
        fields.insert("FirstName".to_string(), Value::from("Ada"));
        fields.insert("Last_Processed_TS__c".to_string(), Value::from(1700000000000i64));
        let record = ContactRecord {
            id: "003A".to_string(),
            fields,
        };

        let wire = record_to_wire(&record);
        assert_eq!(wire["Id"], Value::from("003A"));
        assert_eq!(wire["attributes"]["type"], Value::from("Contact"));
        assert_eq!(wire["Last_Processed_TS__c"], Value::from(1700000000000i64));
    }

    #[test]
    fn test_save_result_wire_decoding() {
        let raw = r#"[
            {"id": "003A", "success": true, "errors": []},
            {"success": false, "errors": [{"message": "entity is locked", "statusCode": "UNABLE_TO_LOCK_ROW"}]}
        ]"#;
        let results: Vec<CompositeSaveResult> = serde_json::from_str(raw).unwrap();
        assert!(results[0].success);
        assert_eq!(results[0].id.as_deref(), Some("003A"));
        assert!(!results[1].success);
        assert_eq!(results[1].errors[0].message, "entity is locked");
    }
}
