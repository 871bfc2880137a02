use anyhow::Result;
use redis::aio::ConnectionManager;
use tracing::debug;

/// Redis client wrapper with automatic reconnection
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

impl RedisClient {
    /// Connects to Redis and builds a multiplexed connection manager
    ///
    /// # Arguments
    /// * `url` - Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self { manager })
    }

    /// Pings the server to verify connectivity
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.connection();
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        debug!("redis connection successful");
        Ok(())
    }

    /// Gets a cheap-clone connection handle
    pub fn connection(&self) -> ConnectionManager {
        self.manager.clone()
    }
}
