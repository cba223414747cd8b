use thiserror::Error;

/// Transient gateway-level failures. Per spec §4.1/§7, none of these ever
/// escape the gateway: callers see an absent value, this type exists so the
/// gateway itself has something concrete to log before swallowing it.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected response shape from exchange: {0}")]
    Decode(String),
    #[error("exchange reported an error: {0}")]
    ExchangeRejected(String),
}
