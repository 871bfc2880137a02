use crate::domain::ProcessEventService;
use common::{RedisClient, RedisCredentialStore, RedisStatusStore, SalesforceClient};
use std::sync::Arc;
use tracing::debug;

pub struct EventWorkerConfig {
    /// Salesforce REST API version, e.g. "v59.0".
    pub sf_api_version: String,
}

/// Assembles the concrete pipeline dependencies around one Redis connection.
pub struct EventWorker {
    service: Arc<ProcessEventService>,
}

impl EventWorker {
    pub fn new(redis_client: RedisClient, config: EventWorkerConfig) -> anyhow::Result<Self> {
        debug!("initializing event worker module");

        let credential_store = Arc::new(RedisCredentialStore::new(redis_client.clone()));
        let status_store = Arc::new(RedisStatusStore::new(redis_client));
        let crm_client = Arc::new(SalesforceClient::new(config.sf_api_version)?);

        let service = Arc::new(ProcessEventService::new(
            credential_store,
            status_store,
            crm_client,
        ));

        Ok(Self { service })
    }

    pub fn service(&self) -> Arc<ProcessEventService> {
        self.service.clone()
    }
}
