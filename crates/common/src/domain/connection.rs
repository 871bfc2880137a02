use crate::domain::result::DomainResult;
use async_trait::async_trait;
use serde::Deserialize;

/// Pre-authenticated connection details for one organization.
///
/// Populated by an external OAuth flow; this pipeline only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionDescriptor {
    pub instance_url: String,
    pub access_token: String,
}

/// Read-only lookup of cached per-organization connection descriptors.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the connection descriptor for an organization.
    ///
    /// # Returns
    /// `Ok(None)` on a cache miss (an expected condition, not an error).
    async fn get_connection(
        &self,
        organization_id: &str,
    ) -> DomainResult<Option<ConnectionDescriptor>>;
}
