//! Metadata response decoding.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use vimirror_core::RenditionDescriptor;
use vimirror_error::{FetchError, FetchErrorKind};

/// Body of `GET /videos/{id}?fields=download`.
#[derive(Debug, Deserialize)]
struct MetadataResponse {
    #[serde(default)]
    download: Vec<RenditionDescriptor>,
}

/// Decode a metadata response body.
///
/// A payload carrying an `error` field is an API error even when it decodes,
/// and a payload without `download` means there is nothing to mirror.
///
/// # Examples
///
/// ```
/// use vimirror_vimeo::parse_metadata;
///
/// let renditions = parse_metadata(r#"{"download": []}"#).unwrap();
/// assert!(renditions.is_empty());
///
/// assert!(parse_metadata(r#"{"error": "The requested video couldn't be found."}"#).is_err());
/// assert!(parse_metadata("<html>").is_err());
/// ```
pub fn parse_metadata(body: &str) -> Result<Vec<RenditionDescriptor>, FetchError> {
    let value: JsonValue = serde_json::from_str(body)
        .map_err(|e| FetchError::new(FetchErrorKind::Decode(e.to_string())))?;

    if !value.is_object() {
        return Err(FetchError::new(FetchErrorKind::Decode(format!(
            "expected a JSON object, got {}",
            value
        ))));
    }

    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        let message = match error {
            JsonValue::String(message) => message.clone(),
            other => other.to_string(),
        };
        return Err(FetchError::new(FetchErrorKind::Api(message)));
    }

    let response: MetadataResponse = serde_json::from_value(value)
        .map_err(|e| FetchError::new(FetchErrorKind::Decode(e.to_string())))?;
    Ok(response.download)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_download_list() {
        let body = r#"{
            "download": [
                {"rendition": "1080p", "width": 1920, "created_time": "2024-03-01T12:00:00+00:00",
                 "size": 1000, "link": "https://example.com/a.mp4"},
                {"rendition": "360p", "width": 640, "created_time": "2024-03-01T12:00:00+00:00",
                 "size": 200, "link": "https://example.com/b.mp4"}
            ]
        }"#;

        let renditions = parse_metadata(body).unwrap();
        assert_eq!(renditions.len(), 2);
        assert_eq!(renditions[0].rendition(), "1080p");
        assert_eq!(*renditions[1].width(), 640);
    }

    #[test]
    fn missing_download_is_empty() {
        assert!(parse_metadata("{}").unwrap().is_empty());
    }

    #[test]
    fn error_field_is_api_error() {
        let err = parse_metadata(r#"{"error": "Not found", "error_code": 5000}"#).unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Api("Not found".to_string()));
    }

    #[test]
    fn null_error_field_is_ignored() {
        assert!(parse_metadata(r#"{"error": null, "download": []}"#).is_ok());
    }

    #[test]
    fn malformed_bodies_are_decode_errors() {
        for body in ["", "not json", "[1, 2]", r#"{"download": [{"rendition": 1}]}"#] {
            let err = parse_metadata(body).unwrap_err();
            assert!(matches!(err.kind, FetchErrorKind::Decode(_)), "body: {body}");
        }
    }
}
