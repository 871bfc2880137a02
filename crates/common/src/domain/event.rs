use garde::Validate;

/// Inbound change notification for one organization/event pair.
///
/// `record_ids` is the batch of CRM record ids to reprocess; `namespace` optionally
/// prefixes the managed-package field name used for the last-processed timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct EventRequest {
    #[garde(length(min = 1))]
    pub organization_id: String,

    #[garde(length(min = 1))]
    pub event_id: String,

    #[garde(skip)]
    pub record_ids: Vec<String>,

    #[garde(skip)]
    pub namespace: Option<String>,
}

/// Why an invocation ended without touching the remote system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No cached connection descriptor for the organization.
    NoConnectionInfo,
    /// The notification carried no record ids.
    NoRecordIds,
}

/// Explicit outcome of one pipeline invocation.
///
/// The ingress maps every variant to a plain acknowledgment string; nothing is
/// propagated to the caller as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Required identifiers missing; no side effects occurred.
    Rejected { reason: String },
    /// Deliberate no-op path; no status record was written.
    Skipped { reason: SkipReason },
    /// Query/update ran (or failed) and a status record was written.
    Completed {
        status: crate::domain::ProcessingStatus,
        attempt_count: u32,
    },
}
