//! Common XML payloads shared across all management crates.

use serde::Deserialize;

/// Namespace used by Service Management request and response documents.
pub const AZURE_XMLNS: &str = "http://schemas.microsoft.com/windowsazure";

/// Error envelope returned by the API: `<Error><Code/><Message/></Error>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AzureError {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl std::fmt::Display for AzureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Code: {}, Message: {}", self.code, self.message)
    }
}

impl std::error::Error for AzureError {}

/// Status of an asynchronous operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum OperationStatus {
    InProgress,
    Succeeded,
    Failed,
    /// Any value outside the documented set, kept verbatim.
    Unknown(String),
}

impl OperationStatus {
    /// Whether polling should stop at this status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::InProgress => "InProgress",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for OperationStatus {
    fn from(value: String) -> Self {
        match value.trim() {
            "InProgress" => Self::InProgress,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::Unknown(value),
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation status envelope returned by `GET operations/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Operation {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: OperationStatus,
    #[serde(rename = "HttpStatusCode", default)]
    pub http_status_code: Option<String>,
    /// Populated by the service only when `status` is `Failed`.
    #[serde(rename = "Error", default)]
    pub error: Option<OperationError>,
}

/// Error embedded in an [`Operation`].
///
/// Unlike [`AzureError`], missing `Code` or `Message` elements decode as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OperationError {
    #[serde(rename = "Code", default)]
    pub code: String,
    #[serde(rename = "Message", default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn azure_error_deserialization() {
        let xml = r#"<Error xmlns="http://schemas.microsoft.com/windowsazure" xmlns:i="http://www.w3.org/2001/XMLSchema-instance"><Code>ResourceNotFound</Code><Message>The storage account 'foo' was not found.</Message></Error>"#;
        let err: AzureError = quick_xml::de::from_str(xml).expect("should deserialize");
        assert_eq!(err.code, "ResourceNotFound");
        assert_eq!(err.message, "The storage account 'foo' was not found.");
    }

    #[test]
    fn azure_error_display() {
        let err = AzureError {
            code: "BadRequest".into(),
            message: "Label is invalid".into(),
        };
        assert_eq!(err.to_string(), "Code: BadRequest, Message: Label is invalid");
    }

    #[test]
    fn operation_status_classification() {
        assert_eq!(
            OperationStatus::from("InProgress".to_string()),
            OperationStatus::InProgress
        );
        assert_eq!(
            OperationStatus::from("Succeeded".to_string()),
            OperationStatus::Succeeded
        );
        assert_eq!(
            OperationStatus::from("Failed".to_string()),
            OperationStatus::Failed
        );
        assert_eq!(
            OperationStatus::from("Paused".to_string()),
            OperationStatus::Unknown("Paused".into())
        );
        assert!(!OperationStatus::InProgress.is_terminal());
        assert!(OperationStatus::Unknown("Paused".into()).is_terminal());
    }

    #[test]
    fn in_progress_operation_deserialization() {
        let xml = r#"<Operation xmlns="http://schemas.microsoft.com/windowsazure">
            <ID>op-123</ID>
            <Status>InProgress</Status>
        </Operation>"#;
        let op: Operation = quick_xml::de::from_str(xml).expect("should deserialize");
        assert_eq!(op.id, "op-123");
        assert_eq!(op.status, OperationStatus::InProgress);
        assert!(op.http_status_code.is_none());
        assert!(op.error.is_none());
    }

    #[test]
    fn failed_operation_deserialization() {
        let xml = r#"<Operation xmlns="http://schemas.microsoft.com/windowsazure">
            <ID>op-456</ID>
            <Status>Failed</Status>
            <HttpStatusCode>409</HttpStatusCode>
            <Error><Code>ConflictError</Code><Message>Name taken</Message></Error>
        </Operation>"#;
        let op: Operation = quick_xml::de::from_str(xml).expect("should deserialize");
        assert_eq!(op.status, OperationStatus::Failed);
        assert_eq!(op.http_status_code.as_deref(), Some("409"));
        let err = op.error.expect("error should be present");
        assert_eq!(err.code, "ConflictError");
        assert_eq!(err.message, "Name taken");
    }

    #[test]
    fn operation_with_partial_error_deserialization() {
        let xml = r#"<Operation>
            <ID>op-789</ID>
            <Status>Failed</Status>
            <Error><Code>InternalError</Code></Error>
        </Operation>"#;
        let op: Operation = quick_xml::de::from_str(xml).expect("should deserialize");
        let err = op.error.expect("error should be present");
        assert_eq!(err.code, "InternalError");
        assert_eq!(err.message, "");
    }

    #[test]
    fn azure_error_still_requires_both_fields() {
        let result = quick_xml::de::from_str::<AzureError>("<Error><Code>Only</Code></Error>");
        assert!(result.is_err());
    }
}
