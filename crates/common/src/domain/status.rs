use crate::domain::result::DomainResult;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// Terminal status of one processing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    Processed,
    Failed,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Processed => "Processed",
            ProcessingStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Processed" => Ok(ProcessingStatus::Processed),
            "Failed" => Ok(ProcessingStatus::Failed),
            other => Err(format!("unknown processing status: {other}")),
        }
    }
}

/// Durable record of the latest processing attempt for one event key.
///
/// `attempt_count` is advisory bookkeeping for an external retry driver and is
/// monotonically non-decreasing per key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub status: ProcessingStatus,
    /// Epoch milliseconds of the write.
    pub last_update: i64,
    pub attempt_count: u32,
}

/// Composite key for status records: `{organization_id}-{event_id}`.
pub fn status_key(organization_id: &str, event_id: &str) -> String {
    format!("{organization_id}-{event_id}")
}

/// Read-modify-write store for per-event processing status.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Fetch the status record for a composite key, if one was ever written.
    async fn get_status(&self, key: &str) -> DomainResult<Option<StatusRecord>>;

    /// Write (create or overwrite) the status record for a composite key.
    async fn put_status(&self, key: &str, record: &StatusRecord) -> DomainResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_key_shape() {
        assert_eq!(status_key("00Dxx", "e1"), "00Dxx-e1");
    }

    #[test]
    fn test_status_round_trips_through_string_form() {
        for status in [ProcessingStatus::Processed, ProcessingStatus::Failed] {
            assert_eq!(status.as_str().parse::<ProcessingStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!("Pending".parse::<ProcessingStatus>().is_err());
    }
}
