//! XML encoding and decoding for request and response bodies.

use crate::error::{ManagementError, ManagementResult};
use crate::models::AzureError;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Decode a success response body.
pub fn from_xml<T: DeserializeOwned>(body: &[u8]) -> ManagementResult<T> {
    let text = std::str::from_utf8(body).map_err(|e| {
        ManagementError::XmlDecode(quick_xml::DeError::Custom(format!(
            "response body is not valid UTF-8: {e}"
        )))
    })?;
    Ok(quick_xml::de::from_str(strip_bom(text))?)
}

/// Encode a request payload. The root element name comes from the type's
/// serde name.
pub fn to_xml<T: Serialize>(value: &T) -> ManagementResult<Bytes> {
    let xml = quick_xml::se::to_string(value)?;
    Ok(Bytes::from(xml))
}

/// Turn the body of a non-success response into a typed error.
pub(crate) fn error_from_response(status: u16, body: &[u8]) -> ManagementError {
    let text = String::from_utf8_lossy(body);
    match quick_xml::de::from_str::<AzureError>(strip_bom(&text)) {
        Ok(AzureError { code, message }) => ManagementError::AzureService {
            status,
            code,
            message,
        },
        Err(source) => ManagementError::MalformedErrorBody { status, source },
    }
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize)]
    #[serde(rename = "Thing")]
    struct Thing {
        #[serde(rename = "@xmlns")]
        xmlns: &'static str,
        #[serde(rename = "Name")]
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct Named {
        #[serde(rename = "Name")]
        name: String,
    }

    #[test]
    fn to_xml_uses_serde_names() {
        let body = to_xml(&Thing {
            xmlns: "urn:test",
            name: "alpha".into(),
        })
        .unwrap();
        assert_eq!(
            std::str::from_utf8(&body).unwrap(),
            r#"<Thing xmlns="urn:test"><Name>alpha</Name></Thing>"#
        );
    }

    #[test]
    fn from_xml_skips_byte_order_mark() {
        let body = "\u{feff}<Thing><Name>beta</Name></Thing>".as_bytes();
        let named: Named = from_xml(body).expect("should decode");
        assert_eq!(named.name, "beta");
    }

    #[test]
    fn from_xml_reports_decode_errors() {
        let err = from_xml::<Named>(b"<Thing></Thing>").expect_err("missing field");
        assert!(matches!(err, ManagementError::XmlDecode(_)));
    }

    #[test]
    fn from_xml_rejects_invalid_utf8() {
        let err = from_xml::<Named>(&[0xff, 0xfe, 0x00]).expect_err("bad utf-8");
        assert!(matches!(err, ManagementError::XmlDecode(_)));
    }

    #[test]
    fn error_envelope_becomes_service_error() {
        let body = b"<Error><Code>BadRequest</Code><Message>Bad label</Message></Error>";
        match error_from_response(400, body) {
            ManagementError::AzureService {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "BadRequest");
                assert_eq!(message, "Bad label");
            }
            other => panic!("Expected AzureService, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_error_body_is_malformed() {
        for body in [&b""[..], b"Service Unavailable", b"<Error><Code>Only</Code></Error>"] {
            let err = error_from_response(503, body);
            assert!(
                matches!(err, ManagementError::MalformedErrorBody { status: 503, .. }),
                "unexpected error for {:?}: {err:?}",
                String::from_utf8_lossy(body)
            );
        }
    }
}
