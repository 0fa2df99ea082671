//! HTTP client for the Azure Service Management API.
//!
//! This module provides [`ManagementClient`], the entry point every resource
//! client builds on. The client owns the subscription ID and a transport that
//! presents the management certificate on every connection, composes request
//! URLs, and turns responses into bytes or typed errors.
//!
//! # Examples
//!
//! ```rust,no_run
//! use azure_management_core::auth::ManagementCertificate;
//! use azure_management_core::client::ManagementClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ManagementClient::builder()
//!     .subscription_id("00000000-0000-0000-0000-000000000000")
//!     .certificate(ManagementCertificate::from_file("management.pem")?)
//!     .build()?;
//!
//! let body = client.get("services/storageservices").await?;
//! println!("{}", String::from_utf8_lossy(&body));
//! # Ok(())
//! # }
//! ```

use crate::auth::ManagementCertificate;
use crate::error::{ManagementError, ManagementResult};
use crate::request::{ManagementRequest, ManagementResponse, VERSION_HEADER, XML_CONTENT_TYPE};
use crate::xml;
use bytes::{Bytes, BytesMut};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use std::time::Duration;

/// Default management endpoint for the public Azure cloud.
pub const DEFAULT_ENDPOINT: &str = "https://management.core.windows.net";

/// Default value of the `x-ms-version` header.
pub const DEFAULT_API_VERSION: &str = "2014-05-01";

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Default interval between asynchronous operation status polls (2 seconds).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Environment variable consulted when no subscription ID is given to the builder.
pub const SUBSCRIPTION_ID_ENV: &str = "AZURE_SUBSCRIPTION_ID";

/// Environment variable consulted when no endpoint is given to the builder.
pub const ENDPOINT_ENV: &str = "AZURE_MANAGEMENT_ENDPOINT";

/// Upper bound on the buffer reserved up front from a declared content length.
const MAX_PREALLOCATION: u64 = 1024 * 1024;

/// The base client for the Service Management API.
///
/// All configuration is fixed at construction. The client is cheaply
/// cloneable and can be shared across tasks and threads; concurrent calls
/// never share per-call state.
#[derive(Debug, Clone)]
pub struct ManagementClient {
    pub(crate) http: HttpClient,
    pub(crate) endpoint: String,
    pub(crate) subscription_id: String,
    pub(crate) api_version: HeaderValue,
    pub(crate) poll_interval: Duration,
}

/// Builder for constructing a [`ManagementClient`].
///
/// Use [`ManagementClient::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct ManagementClientBuilder {
    subscription_id: Option<String>,
    certificate: Option<ManagementCertificate>,
    endpoint: Option<String>,
    api_version: Option<String>,
    http_client: Option<HttpClient>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    poll_interval: Option<Duration>,
}

impl ManagementClient {
    /// Create a new builder for configuring a `ManagementClient`.
    pub fn builder() -> ManagementClientBuilder {
        ManagementClientBuilder::default()
    }

    /// Get the management endpoint (without a trailing slash).
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the subscription every request is scoped to.
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Get the API version sent in `x-ms-version`.
    pub fn api_version(&self) -> &str {
        // Only ever constructed from a `&str`.
        self.api_version.to_str().unwrap_or_default()
    }

    /// Get the interval used between operation status polls.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Build the absolute URL for a path relative to the subscription.
    ///
    /// The result is `<endpoint>/<subscription-id>/<path>` with `path`
    /// appended verbatim, so it should not start with `/`. Paths containing
    /// `.` or `..` segments are rejected, since the URL parser would fold
    /// them and the request could leave the subscription.
    pub fn url(&self, path: &str) -> ManagementResult<Url> {
        let raw = format!("{}/{}/{}", self.endpoint, self.subscription_id, path);
        if has_dot_segment(path) {
            return Err(ManagementError::malformed_url(
                raw,
                "path contains a dot segment",
            ));
        }
        Url::parse(&raw).map_err(|e| ManagementError::malformed_url(raw, e))
    }

    /// Build a request for a path relative to the subscription.
    ///
    /// Every request carries `x-ms-version` and `Content-Type: application/xml`.
    /// The body, when given, is sent verbatim.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> ManagementResult<ManagementRequest> {
        let url = self.url(path)?;

        let mut headers = HeaderMap::new();
        headers.insert(VERSION_HEADER, self.api_version.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE));

        Ok(ManagementRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Send a request and read its response completely.
    ///
    /// Status codes up to 299 are success. Anything above is decoded as an
    /// XML error envelope into [`ManagementError::AzureService`], or
    /// [`ManagementError::MalformedErrorBody`] if the body is not one.
    /// Nothing is retried.
    #[tracing::instrument(
        name = "management::client::execute",
        skip(self, request),
        fields(method = %request.method, url = %request.url)
    )]
    pub async fn execute(&self, request: ManagementRequest) -> ManagementResult<ManagementResponse> {
        let ManagementRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.http.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = read_body(response).await?;

        tracing::debug!(status, bytes = body.len(), "response received");

        if status > 299 {
            return Err(xml::error_from_response(status, &body));
        }

        Ok(ManagementResponse {
            status,
            headers,
            body,
        })
    }

    /// Send a GET request and return the response body.
    #[tracing::instrument(name = "management::client::get", skip(self))]
    pub async fn get(&self, path: &str) -> ManagementResult<Bytes> {
        let request = self.build_request(Method::GET, path, None)?;
        let response = self.execute(request).await?;
        Ok(response.body)
    }

    /// Send a GET request and decode the XML response body.
    pub async fn get_xml<T: DeserializeOwned>(&self, path: &str) -> ManagementResult<T> {
        let body = self.get(path).await?;
        xml::from_xml(&body)
    }

    /// Send a POST request and return the server-assigned request ID.
    ///
    /// The ID comes from the `x-ms-request-id` header and identifies the
    /// asynchronous operation started by the call.
    #[tracing::instrument(name = "management::client::post", skip(self, body))]
    pub async fn post(&self, path: &str, body: impl Into<Bytes>) -> ManagementResult<String> {
        let request = self.build_request(Method::POST, path, Some(body.into()))?;
        let response = self.execute(request).await?;

        let request_id = response
            .request_id()
            .map(str::to_owned)
            .ok_or(ManagementError::MissingRequestId)?;

        tracing::debug!(request_id = %request_id, "request accepted");
        Ok(request_id)
    }

    /// Encode `payload` as XML and POST it, returning the request ID.
    pub async fn post_xml<T: Serialize>(&self, path: &str, payload: &T) -> ManagementResult<String> {
        let body = xml::to_xml(payload)?;
        self.post(path, body).await
    }
}

/// Whether the path part of `path` has a `.` or `..` segment, including
/// percent-encoded forms.
fn has_dot_segment(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

/// Read the whole body, failing if it ends before the declared length.
async fn read_body(mut response: reqwest::Response) -> ManagementResult<Bytes> {
    let expected = response.content_length();
    let capacity = expected.map_or(0, |n| n.min(MAX_PREALLOCATION));
    let mut body = BytesMut::with_capacity(usize::try_from(capacity).unwrap_or(0));

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => body.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(e) => {
                let received = body.len() as u64;
                return Err(match expected {
                    Some(expected) if received < expected && !e.is_timeout() => {
                        ManagementError::TruncatedResponse { expected, received }
                    }
                    _ => ManagementError::Transport(e),
                });
            }
        }
    }

    let received = body.len() as u64;
    if let Some(expected) = expected {
        if received < expected {
            return Err(ManagementError::TruncatedResponse { expected, received });
        }
    }

    Ok(body.freeze())
}

impl ManagementClientBuilder {
    /// Set the subscription ID every request is scoped to.
    ///
    /// If not set, the builder will check the `AZURE_SUBSCRIPTION_ID`
    /// environment variable.
    pub fn subscription_id(mut self, subscription_id: impl Into<String>) -> Self {
        self.subscription_id = Some(subscription_id.into());
        self
    }

    /// Set the management certificate presented on every connection.
    ///
    /// If not set, the builder will use [`ManagementCertificate::from_env()`].
    pub fn certificate(mut self, certificate: ManagementCertificate) -> Self {
        self.certificate = Some(certificate);
        self
    }

    /// Set the management endpoint.
    ///
    /// Defaults to [`DEFAULT_ENDPOINT`], or the `AZURE_MANAGEMENT_ENDPOINT`
    /// environment variable when set. Sovereign clouds use a different host.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the API version.
    ///
    /// Defaults to [`DEFAULT_API_VERSION`] (`2014-05-01`).
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set a custom HTTP client.
    ///
    /// **Note:** A custom client is used as-is: no certificate is loaded and
    /// the timeout settings of this builder are ignored.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout, covering the whole request/response cycle.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the interval between asynchronous operation status polls.
    ///
    /// Defaults to [`DEFAULT_POLL_INTERVAL`] (2 seconds).
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Build the `ManagementClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No subscription ID is provided and `AZURE_SUBSCRIPTION_ID` is not set
    /// - The endpoint URL is invalid
    /// - The certificate cannot be loaded or used to build the TLS transport
    pub fn build(self) -> ManagementResult<ManagementClient> {
        let subscription_id = self
            .subscription_id
            .or_else(|| std::env::var(SUBSCRIPTION_ID_ENV).ok())
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                ManagementError::MissingConfig(format!(
                    "subscription ID is required. Set it via builder or {SUBSCRIPTION_ID_ENV} env var."
                ))
            })?;

        let endpoint = self
            .endpoint
            .or_else(|| std::env::var(ENDPOINT_ENV).ok())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = endpoint.trim_end_matches('/').to_string();
        Url::parse(&endpoint).map_err(|e| ManagementError::malformed_url(endpoint.clone(), e))?;

        let api_version = self
            .api_version
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let api_version = HeaderValue::from_str(&api_version).map_err(|_| {
            ManagementError::MissingConfig(format!("invalid API version '{api_version}'"))
        })?;

        let http = match self.http_client {
            Some(http) => http,
            None => {
                let certificate = match self.certificate {
                    Some(certificate) => certificate,
                    None => ManagementCertificate::from_env()?,
                };
                certificate.build_transport(
                    self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
                    self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT),
                )?
            }
        };

        Ok(ManagementClient {
            http,
            endpoint,
            subscription_id,
            api_version,
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
        })
    }
}
