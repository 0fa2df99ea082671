use thiserror::Error;

/// Errors that can occur when interacting with the Azure Service Management API.
#[derive(Error, Debug)]
pub enum ManagementError {
    /// The management certificate could not be loaded or used.
    #[error("Failed to load management certificate: {0}")]
    CredentialLoad(String),

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// The composed request URL could not be parsed, or its path would not
    /// be sent as given.
    #[error("Malformed URL {url}: {reason}")]
    MalformedUrl { url: String, reason: String },

    /// The HTTP request failed at the transport level (DNS, connect, TLS).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body ended before the declared content length.
    #[error("Truncated response: expected {expected} bytes, received {received}")]
    TruncatedResponse { expected: u64, received: u64 },

    /// A non-success response carried a body that is not an XML error envelope.
    #[error("HTTP {status} with malformed error body: {source}")]
    MalformedErrorBody {
        status: u16,
        #[source]
        source: quick_xml::DeError,
    },

    /// The service returned an error envelope.
    #[error("Azure service error (HTTP {status}) {code}: {message}")]
    AzureService {
        status: u16,
        code: String,
        message: String,
    },

    /// A successful mutating call did not return an `x-ms-request-id` header.
    #[error("Response is missing the x-ms-request-id header")]
    MissingRequestId,

    /// An asynchronous operation finished in the `Failed` state.
    #[error("Operation {operation_id} failed: {message}")]
    OperationFailed {
        operation_id: String,
        code: String,
        message: String,
    },

    /// An asynchronous operation reported a status outside the known set.
    #[error("Operation {operation_id} reported unknown status '{status}'")]
    UnknownOperationStatus {
        operation_id: String,
        status: String,
    },

    /// Polling was cancelled by the caller.
    #[error("Operation {operation_id} polling was cancelled")]
    Cancelled { operation_id: String },

    /// A success response body could not be decoded.
    #[error("XML decode error: {0}")]
    XmlDecode(#[from] quick_xml::DeError),

    /// A request payload could not be encoded.
    #[error("XML encode error: {0}")]
    XmlEncode(#[from] quick_xml::SeError),

    /// A required argument was empty or otherwise invalid.
    #[error("Parameter {0} is not specified.")]
    InvalidParameter(String),

    /// The storage service exposes no blob endpoint.
    #[error("Blob endpoint was not found in storage service {0}")]
    BlobEndpointNotFound(String),
}

impl ManagementError {
    /// Create a [`ManagementError::MalformedUrl`] for the given URL.
    pub fn malformed_url(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::MalformedUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a [`ManagementError::InvalidParameter`] naming the parameter.
    pub fn invalid_parameter(name: impl Into<String>) -> Self {
        Self::InvalidParameter(name.into())
    }

    /// Returns the service error code, if the error carries one.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::AzureService { code, .. } | Self::OperationFailed { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns the HTTP status of the failed response, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AzureService { status, .. } | Self::MalformedErrorBody { status, .. } => {
                Some(*status)
            }
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// A distinct non-zero process exit code for each kind of error.
    ///
    /// The library never exits on its own; tools built on it can use this
    /// to terminate with a code that identifies the failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CredentialLoad(_) => 10,
            Self::MissingConfig(_) => 11,
            Self::MalformedUrl { .. } => 12,
            Self::Transport(_) => 20,
            Self::TruncatedResponse { .. } => 21,
            Self::MalformedErrorBody { .. } => 22,
            Self::AzureService { .. } => 23,
            Self::MissingRequestId => 24,
            Self::OperationFailed { .. } => 30,
            Self::UnknownOperationStatus { .. } => 31,
            Self::Cancelled { .. } => 32,
            Self::XmlDecode(_) => 40,
            Self::XmlEncode(_) => 41,
            Self::InvalidParameter(_) => 50,
            Self::BlobEndpointNotFound(_) => 51,
        }
    }
}

/// Result type alias for management operations.
pub type ManagementResult<T> = std::result::Result<T, ManagementError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn azure_service_error_display() {
        let err = ManagementError::AzureService {
            status: 409,
            code: "ConflictError".to_string(),
            message: "The storage account name is already taken.".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("409"));
        assert!(msg.contains("ConflictError"));
        assert!(msg.contains("The storage account name is already taken."));
    }

    #[test]
    fn operation_failed_display_carries_service_message() {
        let err = ManagementError::OperationFailed {
            operation_id: "op-1".into(),
            code: "X".into(),
            message: "Y".into(),
        };
        assert_eq!(err.to_string(), "Operation op-1 failed: Y");
    }

    #[test]
    fn invalid_parameter_display() {
        let err = ManagementError::invalid_parameter("serviceName");
        assert_eq!(err.to_string(), "Parameter serviceName is not specified.");
    }

    #[test]
    fn error_code_only_for_service_errors() {
        let err = ManagementError::AzureService {
            status: 404,
            code: "ResourceNotFound".into(),
            message: "missing".into(),
        };
        assert_eq!(err.error_code(), Some("ResourceNotFound"));
        assert_eq!(err.status(), Some(404));
        assert_eq!(ManagementError::MissingRequestId.error_code(), None);
        assert_eq!(ManagementError::MissingRequestId.status(), None);
    }

    fn transport_error() -> reqwest::Error {
        reqwest::Client::new()
            .get("not a url")
            .build()
            .expect_err("relative URL must not build")
    }

    #[test]
    fn exit_codes_are_distinct_and_non_zero() {
        let errors = [
            ManagementError::CredentialLoad("x".into()),
            ManagementError::MissingConfig("x".into()),
            ManagementError::malformed_url("x", url::ParseError::EmptyHost),
            ManagementError::Transport(transport_error()),
            ManagementError::TruncatedResponse {
                expected: 2,
                received: 1,
            },
            ManagementError::MalformedErrorBody {
                status: 503,
                source: quick_xml::DeError::Custom("x".into()),
            },
            ManagementError::AzureService {
                status: 400,
                code: "c".into(),
                message: "m".into(),
            },
            ManagementError::MissingRequestId,
            ManagementError::OperationFailed {
                operation_id: "o".into(),
                code: "c".into(),
                message: "m".into(),
            },
            ManagementError::UnknownOperationStatus {
                operation_id: "o".into(),
                status: "s".into(),
            },
            ManagementError::Cancelled {
                operation_id: "o".into(),
            },
            ManagementError::XmlDecode(quick_xml::DeError::Custom("x".into())),
            ManagementError::XmlEncode(quick_xml::SeError::Custom("x".into())),
            ManagementError::invalid_parameter("p"),
            ManagementError::BlobEndpointNotFound("s".into()),
        ];
        assert_eq!(errors.len(), 15);

        let mut codes: Vec<i32> = errors.iter().map(ManagementError::exit_code).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
