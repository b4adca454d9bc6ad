use anyhow::{anyhow, Result};
use async_trait::async_trait;
use deadpool_redis::{
    redis::{cmd, ToRedisArgs},
    Config, Connection, Pool, Runtime,
};

use crate::{config, declare::QuoteRecord, nosql::QuoteStore};

pub struct Redis {
    pub pool: Pool,
}

impl Redis {
    pub fn new(settings: &config::Redis) -> Result<Self> {
        let cfg = Config::from_url(settings.connection_url());
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|why| anyhow!("wrong redis URL {} because {:?}", settings.addr, why))?;

        Ok(Redis { pool })
    }

    pub async fn ping(&self) -> Result<String> {
        let mut conn: Connection = self.pool.get().await?;
        let pong: String = cmd("PING").query_async(&mut conn).await?;

        Ok(pong)
    }

    /// Sets a key-value pair in the Redis server without expiry, replacing any previous value.
    pub async fn set<K, V>(&self, key: K, value: V) -> Result<()>
    where
        K: ToRedisArgs + Send + Sync,
        V: ToRedisArgs + Send + Sync,
    {
        let mut conn = self.pool.get().await?;
        let _: () = cmd("SET").arg(key).arg(value).query_async(&mut conn).await?;

        Ok(())
    }
}

#[async_trait]
impl QuoteStore for Redis {
    async fn upsert(&self, key: &str, record: &QuoteRecord) -> Result<()> {
        let value = serde_json::to_string(record)?;
        self.set(key, value).await
    }
}
