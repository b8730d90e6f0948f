//! Utility functions for the orientation server

use super::protocol::{error_codes, Response};
use serde::de::DeserializeOwned;

/// Decode handler params; missing or `null` params decode like `{}`.
/// On failure the `INVALID_PARAMS` response is returned for the handler to send.
pub fn parse_params<T: DeserializeOwned>(
    id: &Option<serde_json::Value>,
    params: Option<serde_json::Value>,
    expected: &str,
) -> Result<T, Response> {
    let value = match params {
        None | Some(serde_json::Value::Null) => serde_json::json!({}),
        Some(value) => value,
    };
    serde_json::from_value(value).map_err(|e| {
        Response::error(
            id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Invalid params: expected {} ({})", expected, e),
        )
    })
}

/// Log to stderr so stdout stays free for responses. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .try_init();
}
