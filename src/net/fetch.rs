use std::time::Duration;

use http::header::{CACHE_CONTROL, PRAGMA};

use crate::errors::StorefrontError;
use crate::net::Response;

/// Builds the shared HTTP client used for catalog calls.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, StorefrontError> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Marks the request as uncacheable so catalog reads always hit the origin.
pub fn no_cache(request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    request
        .header(CACHE_CONTROL, "no-cache")
        .header(PRAGMA, "no-cache")
}

// Sends a prepared request and buffers the whole response
pub async fn send(request: reqwest::RequestBuilder) -> Result<Response, StorefrontError> {
    let res = request.send().await?;

    // Fetch results
    let final_url = res.url().clone();
    let status = res.status().as_u16();
    let status_text = res.status().canonical_reason().unwrap_or("Unknown").to_string();
    let headers = res.headers().clone();

    // Fetch body. We don't do streaming
    let body = res.bytes().await?.to_vec();

    Ok(Response {
        url: final_url,
        status,
        status_text,
        headers,
        body,
    })
}
