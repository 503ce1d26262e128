//! Minimal HTTP response model.
//!
//! This struct represents a **fully buffered** HTTP response returned by the
//! network layer. It contains the final URL (after redirects, if the client
//! follows them), status code + reason, response headers, and the raw body bytes.
//!
//! ## Notes
//! - The body is stored as raw `Vec<u8>`. The catalog API speaks JSON, so most
//!   callers go through [`Response::json`]; [`Response::text`] covers the rest.
//! - `headers` is an `http::HeaderMap`, which is **case-insensitive** for
//!   header names.
//! - `status_text` is typically derived from the status code’s canonical
//!   reason phrase and may be `"Unknown"` for non-standard codes.
//!
use std::borrow::Cow;

use http::HeaderMap;
use serde::de::DeserializeOwned;

use crate::errors::StorefrontError;

/// Simple structure for HTTP responses.
///
/// All fields reflect the **received** response as-is; no additional parsing
/// or transformation is performed by this type.
#[derive(Debug)]
pub struct Response {
    /// Final URL of the response (after redirects, if any).
    pub url: url::Url,

    /// Numeric HTTP status code (e.g., `200`, `404`).
    pub status: u16,

    /// Human-readable reason phrase (e.g., `"OK"`, `"Not Found"`).
    ///
    /// May be `"Unknown"` for non-standard codes.
    pub status_text: String,

    /// Response headers as a case-insensitive map.
    pub headers: HeaderMap,

    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl Response {
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body interpreted as UTF-8 text, lossily.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decodes the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, StorefrontError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with(status: u16, body: &str) -> Response {
        Response {
            url: url::Url::parse("https://cms.example/api/items").unwrap(),
            status,
            status_text: http::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown")
                .to_string(),
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn success_covers_2xx_only() {
        assert!(response_with(200, "").is_success());
        assert!(response_with(204, "").is_success());
        assert!(!response_with(301, "").is_success());
        assert!(!response_with(404, "").is_success());
    }

    #[test]
    fn json_decodes_body() {
        let resp = response_with(200, r#"{"answer": 42}"#);
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["answer"], 42);
    }

    #[test]
    fn json_error_is_payload() {
        let resp = response_with(200, "<html>not json</html>");
        let err = resp.json::<serde_json::Value>();
        assert!(matches!(err, Err(StorefrontError::Payload(_))));
    }
}
