use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("cached payload was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
