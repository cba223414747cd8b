use crate::error::GatewayError;
use serde_json::Value;

/// Shared GET-JSON helper: every exchange client is a thin wrapper around
/// one REST call, so there is no benefit to a heavier HTTP abstraction here.
pub(crate) async fn get_json(client: &reqwest::Client, url: &str) -> Result<Value, GatewayError> {
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.json::<Value>().await?;
    Ok(body)
}

/// Exchanges mix JSON numbers and numeric strings in their kline payloads
/// (spec §6: "numeric strings or floats — the gateway normalizes to
/// float"). This is where that normalization happens.
pub(crate) fn number(value: &Value) -> Result<f64, GatewayError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| GatewayError::Decode(format!("number out of f64 range: {n}"))),
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|_| GatewayError::Decode(format!("non-numeric field: {s}"))),
        other => Err(GatewayError::Decode(format!("expected number or numeric string, got {other}"))),
    }
}

pub(crate) fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, GatewayError> {
    value.as_array().ok_or_else(|| GatewayError::Decode(format!("expected {what} to be a JSON array")))
}
