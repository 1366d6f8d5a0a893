use std::time::{Duration, Instant};

use serde_json::Value;

use crate::error::ProbeError;

use super::request::RequestInput;
use super::response::HttpResponse;

pub fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, ProbeError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(ProbeError::Client)
}

pub async fn send_request(
    client: &reqwest::Client,
    request: RequestInput,
) -> Result<HttpResponse, ProbeError> {
    let method: reqwest::Method = request.method.into();
    let mut req_builder = client.request(method, request.url);
    if let Some(body) = &request.body {
        req_builder = req_builder.json(body);
    }

    let started = Instant::now();
    let response = req_builder.send().await.map_err(ProbeError::Transport)?;
    let elapsed = started.elapsed().as_millis();

    let status = response.status();
    let bytes = response.bytes().await.map_err(ProbeError::Body)?;
    let size_bytes = bytes.len();

    Ok(HttpResponse {
        status: status.as_u16(),
        duration_ms: elapsed,
        size_bytes,
        body: parse_body(&bytes),
    })
}

/// Empty bodies become `null`; anything that is not JSON is kept as a string
/// so the status can still be asserted on.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
