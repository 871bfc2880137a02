use crate::domain::connection::ConnectionDescriptor;
use crate::domain::result::DomainResult;
use async_trait::async_trait;
use serde_json::Value;

/// Server-side fetch cap for one query; the remote system paginates up to this
/// many records and the pipeline stops following pages beyond it.
pub const MAX_FETCH_RECORDS: usize = 4000;

/// One CRM record, transient to a single pipeline invocation.
///
/// Payload fields (FirstName, LastName, the last-processed timestamp field) are kept
/// as raw JSON so the namespaced field name never leaks into the type.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactRecord {
    pub id: String,
    pub fields: serde_json::Map<String, Value>,
}

impl ContactRecord {
    /// Set the last-processed timestamp field to `now_millis`, leaving every other
    /// field untouched.
    pub fn stamp_last_processed(&mut self, field: &str, now_millis: i64) {
        self.fields
            .insert(field.to_string(), Value::from(now_millis));
    }
}

/// One page of query results as returned by the remote system.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage {
    pub total_size: u32,
    pub done: bool,
    /// Locator for the next page when `done` is false.
    pub next_records_url: Option<String>,
    pub records: Vec<ContactRecord>,
}

/// Per-record result of a batch update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveResult {
    pub id: Option<String>,
    pub success: bool,
    pub errors: Vec<String>,
}

/// Authenticated client against the external CRM system.
///
/// Implementations should:
/// - Issue the SOQL query and expose server-side pagination via `query_more`
/// - Submit batch updates keyed by record id, one `SaveResult` per input record
/// - Map transport and non-2xx failures to `DomainError` query/update variants
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CrmDataClient: Send + Sync {
    /// Execute a SOQL query and return the first page of results.
    async fn query(&self, conn: &ConnectionDescriptor, soql: &str) -> DomainResult<QueryPage>;

    /// Fetch the next page of a previously started query.
    async fn query_more(
        &self,
        conn: &ConnectionDescriptor,
        next_records_url: &str,
    ) -> DomainResult<QueryPage>;

    /// Batch-update Contact records by id.
    async fn update_contacts(
        &self,
        conn: &ConnectionDescriptor,
        records: &[ContactRecord],
    ) -> DomainResult<Vec<SaveResult>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_sets_only_the_timestamp_field() {
        let mut fields = serde_json::Map::new();
        fields.insert("FirstName".to_string(), Value::from("Ada"));
        fields.insert("LastName".to_string(), Value::from("Lovelace"));
        let mut record = ContactRecord {
            id: "003A".to_string(),
            fields,
        };

        let start = chrono::Utc::now().timestamp_millis();
        let now = chrono::Utc::now().timestamp_millis();
        record.stamp_last_processed("Last_Processed_TS__c", now);
        let end = chrono::Utc::now().timestamp_millis();

        let stamped = record.fields["Last_Processed_TS__c"].as_i64().unwrap();
        assert!(stamped >= start && stamped <= end);
        assert_eq!(record.fields["FirstName"], Value::from("Ada"));
        assert_eq!(record.fields["LastName"], Value::from("Lovelace"));
        assert_eq!(record.fields.len(), 3);
    }

    #[test]
    fn test_stamp_overwrites_previous_value() {
        let mut record = ContactRecord {
            id: "003A".to_string(),
            fields: serde_json::Map::new(),
        };
        record.stamp_last_processed("Last_Processed_TS__c", 1);
        record.stamp_last_processed("Last_Processed_TS__c", 2);
        assert_eq!(record.fields["Last_Processed_TS__c"], Value::from(2));
    }
}
