//! Cache Layer (C4): a keyed, TTL-bounded blob store for OHLCV payloads.
//! The store may be unavailable; callers treat that as a miss and fall back
//! to refetching (spec §4.4, §5). Encoding is internal — consumers see
//! candle lists, not bytes.

mod error;

use arbspread_types::{PeId, RawCandleRow};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::warn;

pub use error::CacheError;

pub struct Cache {
    client: redis::Client,
    manager: OnceCell<ConnectionManager>,
}

impl Cache {
    pub fn new(redis_url: &str) -> Result<Self, CacheError> {
        Ok(Self {
            client: redis::Client::open(redis_url)?,
            manager: OnceCell::new(),
        })
    }

    fn key(pe_id: PeId) -> String {
        format!("OHLC:{pe_id}")
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let conn = self
            .manager
            .get_or_try_init(|| async { ConnectionManager::new(self.client.clone()).await })
            .await?;
        Ok(conn.clone())
    }

    /// Best-effort write-through. A failure here degrades latency, not
    /// correctness — the corresponding PE simply stays uncached and is
    /// refetched on the next run (spec §4.4).
    pub async fn set(&self, pe_id: PeId, candles: &[RawCandleRow], ttl: Duration) {
        if let Err(err) = self.try_set(pe_id, candles, ttl).await {
            warn!(%pe_id, error = %err, "cache write failed, continuing without caching");
        }
    }

    async fn try_set(&self, pe_id: PeId, candles: &[RawCandleRow], ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let payload = serde_json::to_vec(candles)?;
        let ttl_secs = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(Self::key(pe_id), payload, ttl_secs).await?;
        Ok(())
    }

    /// Returns `None` on a miss or any cache-layer failure.
    pub async fn get(&self, pe_id: PeId) -> Option<Vec<RawCandleRow>> {
        match self.try_get(pe_id).await {
            Ok(value) => value,
            Err(err) => {
                warn!(%pe_id, error = %err, "cache read failed, treating as miss");
                None
            }
        }
    }

    async fn try_get(&self, pe_id: PeId) -> Result<Option<Vec<RawCandleRow>>, CacheError> {
        let mut conn = self.connection().await?;
        let payload: Option<Vec<u8>> = conn.get(Self::key(pe_id)).await?;
        match payload {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Health probe backing `GET /cache/status` (SPEC_FULL §B): `true` iff
    /// the store answered a `PING`. Never the sole correctness signal — the
    /// store being down just means the next read degrades to a miss.
    pub async fn is_reachable(&self) -> bool {
        match self.connection().await {
            Ok(mut conn) => redis::cmd("PING").query_async::<_, String>(&mut conn).await.is_ok(),
            Err(_) => false,
        }
    }

    /// Deletes every `OHLC:*` entry, returning the number removed. Backs
    /// `POST /cache/clear` (SPEC_FULL §B) — scoped to this store's own key
    /// space rather than a blanket `FLUSHDB`, since the cache may be a
    /// shared Redis instance.
    pub async fn clear_all(&self) -> Result<u64, CacheError> {
        let mut conn = self.connection().await?;
        let mut removed = 0u64;
        let mut cursor = 0u64;
        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg("OHLC:*")
                .arg("COUNT")
                .arg(200)
                .query_async(&mut conn)
                .await?;
            if !keys.is_empty() {
                removed += conn.del::<_, u64>(&keys).await?;
            }
            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_uses_ohlc_prefix() {
        assert_eq!(Cache::key(PeId(42)), "OHLC:42");
    }
}
