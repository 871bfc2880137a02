use crate::domain::{DomainError, DomainResult, ProcessingStatus, StatusRecord, StatusStore};
use crate::redis::RedisClient;
use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, instrument};

/// Redis implementation of StatusStore trait
///
/// Key layout: hash at `{organization_id}-{event_id}` with fields `status`,
/// `last_update` (epoch millis) and `attempt_count`.
#[derive(Clone)]
pub struct RedisStatusStore {
    client: RedisClient,
}

impl RedisStatusStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusStore for RedisStatusStore {
    #[instrument(skip(self))]
    async fn get_status(&self, key: &str) -> DomainResult<Option<StatusRecord>> {
        let mut conn = self.client.connection();

        let (status, last_update, attempt_count): (Option<String>, Option<i64>, Option<u32>) =
            conn.hget(key, &["status", "last_update", "attempt_count"])
                .await
                .map_err(|e| DomainError::StoreError(e.into()))?;

        let Some(status) = status else {
            return Ok(None);
        };

        let status: ProcessingStatus = status
            .parse()
            .map_err(|e: String| DomainError::StoreError(anyhow::anyhow!(e)))?;

        Ok(Some(StatusRecord {
            status,
            last_update: last_update.unwrap_or_default(),
            attempt_count: attempt_count.unwrap_or_default(),
        }))
    }

    #[instrument(skip(self, record), fields(status = %record.status, attempt_count = record.attempt_count))]
    async fn put_status(&self, key: &str, record: &StatusRecord) -> DomainResult<()> {
        let mut conn = self.client.connection();

        conn.hset_multiple::<_, _, _, ()>(
            key,
            &[
                ("status", record.status.as_str().to_string()),
                ("last_update", record.last_update.to_string()),
                ("attempt_count", record.attempt_count.to_string()),
            ],
        )
        .await
        .map_err(|e| DomainError::StoreError(e.into()))?;

        debug!(key, "status record written");
        Ok(())
    }
}
