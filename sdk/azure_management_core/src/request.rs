//! Per-call request and response values.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::Method;
use url::Url;

/// Header carrying the Service Management API version.
pub const VERSION_HEADER: &str = "x-ms-version";

/// Response header carrying the server-assigned request (operation) ID.
pub const REQUEST_ID_HEADER: &str = "x-ms-request-id";

/// Content type of every request body.
pub const XML_CONTENT_TYPE: &str = "application/xml";

/// A fully resolved request, ready to be executed.
///
/// Created by [`ManagementClient::build_request`](crate::client::ManagementClient::build_request).
#[derive(Debug, Clone)]
pub struct ManagementRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// A response whose body has been read completely.
#[derive(Debug, Clone)]
pub struct ManagementResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ManagementResponse {
    /// The `x-ms-request-id` header, if present and valid UTF-8.
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }
}
