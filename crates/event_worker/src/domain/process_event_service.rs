use chrono::Utc;
use common::{
    soql, status_key, validate_struct, ConnectionDescriptor, ContactRecord, CredentialStore,
    CrmDataClient, DomainResult, EventRequest, ProcessOutcome, ProcessingStatus, SkipReason,
    StatusRecord, StatusStore, MAX_FETCH_RECORDS,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Domain service that orchestrates the record-reprocessing pipeline
///
/// Flow:
/// 1. Validate the inbound request (org + event id required)
/// 2. Look up the cached connection descriptor for the org
/// 3. Resolve the attempt count from the status store
/// 4. Query the named Contact records, following server-side pages
/// 5. Stamp the last-processed timestamp on each record
/// 6. Submit one batch update and fold per-record results into a status
/// 7. Write the status record under `{org}-{event}`
///
/// Nothing propagates to the caller as an error; every path ends in a
/// `ProcessOutcome` the ingress renders as a plain acknowledgment.
pub struct ProcessEventService {
    credential_store: Arc<dyn CredentialStore>,
    status_store: Arc<dyn StatusStore>,
    crm_client: Arc<dyn CrmDataClient>,
}

impl ProcessEventService {
    /// Create a new ProcessEventService with dependencies
    pub fn new(
        credential_store: Arc<dyn CredentialStore>,
        status_store: Arc<dyn StatusStore>,
        crm_client: Arc<dyn CrmDataClient>,
    ) -> Self {
        Self {
            credential_store,
            status_store,
            crm_client,
        }
    }

    /// Process one change notification end to end.
    #[instrument(skip(self, request), fields(organization_id = %request.organization_id, event_id = %request.event_id))]
    pub async fn process_event(&self, request: EventRequest) -> ProcessOutcome {
        // 1. Required identifiers; rejection must leave zero side effects
        if let Err(e) = validate_struct(&request) {
            warn!(error = %e, "rejecting event with missing identifiers");
            return ProcessOutcome::Rejected {
                reason: e.to_string(),
            };
        }

        info!(
            record_count = request.record_ids.len(),
            namespace = request.namespace.as_deref().unwrap_or(""),
            "received event"
        );

        // 2. Credential lookup; a miss is a deliberate no-op, not an error.
        // A failing read logs and takes the same skip path.
        let conn = match self
            .credential_store
            .get_connection(&request.organization_id)
            .await
        {
            Ok(Some(conn)) => conn,
            Ok(None) => {
                info!("no connection info cached for org, skipping");
                return ProcessOutcome::Skipped {
                    reason: SkipReason::NoConnectionInfo,
                };
            }
            Err(e) => {
                error!(error = %e, "credential store read failed, skipping");
                return ProcessOutcome::Skipped {
                    reason: SkipReason::NoConnectionInfo,
                };
            }
        };

        // 3. Nothing to query
        if request.record_ids.is_empty() {
            info!("no record ids provided");
            return ProcessOutcome::Skipped {
                reason: SkipReason::NoRecordIds,
            };
        }

        let key = status_key(&request.organization_id, &request.event_id);
        let attempt_count = self.next_attempt_count(&key).await;

        let field = soql::last_processed_field(request.namespace.as_deref());
        let query = soql::contact_query(&request.record_ids, request.namespace.as_deref());

        // 4-6. Query stream, stamp, batch update. A stream error fails the event
        // without attempting the update.
        let status = match self.collect_and_stamp(&conn, &query, &field).await {
            Ok(contacts) => self.update_batch(&conn, &contacts).await,
            Err(e) => {
                error!(error = %e, "query stream failed");
                ProcessingStatus::Failed
            }
        };

        // 7. Status write happens on both success and failure paths; a write
        // failure is logged and does not alter the outcome.
        let record = StatusRecord {
            status,
            last_update: Utc::now().timestamp_millis(),
            attempt_count,
        };
        if let Err(e) = self.status_store.put_status(&key, &record).await {
            error!(error = %e, key, "failed to write status record");
        } else {
            info!(key, status = %status, attempt_count, "status record written");
        }

        ProcessOutcome::Completed {
            status,
            attempt_count,
        }
    }

    /// Read the prior attempt count and increment it; first attempt counts as 1.
    /// A failing read degrades to 1 rather than aborting the event.
    async fn next_attempt_count(&self, key: &str) -> u32 {
        match self.status_store.get_status(key).await {
            Ok(Some(prev)) => prev.attempt_count.saturating_add(1),
            Ok(None) => 1,
            Err(e) => {
                warn!(error = %e, key, "attempt count read failed, defaulting to 1");
                1
            }
        }
    }

    /// Drive the paginated query to completion (or the fetch cap), stamping the
    /// last-processed field on each record as it arrives.
    async fn collect_and_stamp(
        &self,
        conn: &ConnectionDescriptor,
        query: &str,
        field: &str,
    ) -> DomainResult<Vec<ContactRecord>> {
        let mut contacts: Vec<ContactRecord> = Vec::new();
        let mut page = self.crm_client.query(conn, query).await?;
        let total_size = page.total_size;

        loop {
            for mut record in page.records {
                debug!(id = %record.id, "processing contact");
                record.stamp_last_processed(field, Utc::now().timestamp_millis());
                contacts.push(record);
            }

            if page.done || contacts.len() >= MAX_FETCH_RECORDS {
                break;
            }
            match page.next_records_url {
                Some(next) => page = self.crm_client.query_more(conn, &next).await?,
                None => break,
            }
        }

        contacts.truncate(MAX_FETCH_RECORDS);
        debug!(
            total_in_org = total_size,
            total_fetched = contacts.len(),
            "query stream complete"
        );
        Ok(contacts)
    }

    /// Submit the accumulated batch and fold per-record results into one status.
    async fn update_batch(
        &self,
        conn: &ConnectionDescriptor,
        contacts: &[ContactRecord],
    ) -> ProcessingStatus {
        let results = match self.crm_client.update_contacts(conn, contacts).await {
            Ok(results) => results,
            Err(e) => {
                error!(error = %e, "batch update call failed");
                return ProcessingStatus::Failed;
            }
        };

        let mut status = ProcessingStatus::Processed;
        for result in &results {
            if result.success {
                debug!(id = ?result.id, "updated successfully");
            } else {
                warn!(id = ?result.id, errors = ?result.errors, "failed to update record");
                status = ProcessingStatus::Failed;
            }
        }
        status
    }
}
