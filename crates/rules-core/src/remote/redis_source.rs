//! Redis-backed desired-state source

use async_trait::async_trait;
use redis::{AsyncCommands, ConnectionInfo, IntoConnectionInfo};
use tracing::debug;

use super::RemoteSource;
use crate::{Error, Result};

/// Reads the desired-state list with `LRANGE <key> 0 -1`.
///
/// A connection is opened per fetch and dropped afterwards.
#[derive(Clone)]
pub struct RedisSource {
    address: String,
    password: String,
    database: i64,
    list_key: String,
}

impl RedisSource {
    /// `address` is `host:port`; an empty `password` skips AUTH.
    pub fn new(
        address: impl Into<String>,
        password: impl Into<String>,
        database: i64,
        list_key: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            password: password.into(),
            database,
            list_key: list_key.into(),
        }
    }

    pub fn connection_info(&self) -> Result<ConnectionInfo> {
        let mut info = format!("redis://{}/{}", self.address, self.database).into_connection_info()?;
        if !self.password.is_empty() {
            info.redis.password = Some(self.password.clone());
        }
        Ok(info)
    }
}

impl std::fmt::Debug for RedisSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSource")
            .field("address", &self.address)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("list_key", &self.list_key)
            .finish()
    }
}

#[async_trait]
impl RemoteSource for RedisSource {
    async fn fetch(&self) -> Result<Vec<String>> {
        let client = redis::Client::open(self.connection_info()?)?;
        let mut connection = client.get_multiplexed_async_connection().await?;
        let entries: Vec<String> = connection
            .lrange(self.list_key.as_str(), 0, -1)
            .await
            .map_err(|e| Error::Fetch {
                message: format!("LRANGE {} failed: {e}", self.list_key),
            })?;

        debug!(
            address = %self.address,
            key = %self.list_key,
            count = entries.len(),
            "fetched desired rules"
        );
        Ok(entries)
    }
}
