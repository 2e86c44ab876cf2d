//! Response normalization for chat completions.
//!
//! The gateway answers `text/plain` when asked to, but may still fall back
//! to JSON, and occasionally omits the content type entirely. The body is
//! therefore branched on the advertised type rather than sniffed.

use super::errors::ClientError;
use super::types::ChatCompletionResponse;

/// How a response body should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    PlainText,
    Json,
    /// Unknown or missing content type; treated as text.
    Other,
}

impl BodyKind {
    /// Classify a `Content-Type` header value (parameters are ignored).
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase());

        match mime.as_deref() {
            Some("text/plain") => BodyKind::PlainText,
            Some("application/json") => BodyKind::Json,
            _ => BodyKind::Other,
        }
    }
}

/// Extract the assistant's reply text from a 2xx body.
///
/// Returns `EmptyResponse` when the resulting text is blank so the sequencer
/// can move on to the next candidate.
pub fn extract_reply(model: &str, kind: BodyKind, body: &str) -> Result<String, ClientError> {
    let text = match kind {
        BodyKind::PlainText | BodyKind::Other => body.to_string(),
        BodyKind::Json => {
            let parsed: ChatCompletionResponse =
                serde_json::from_str(body).map_err(|e| ClientError::MalformedResponse {
                    model: model.to_string(),
                    reason: e.to_string(),
                })?;
            parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message)
                .and_then(|m| m.content)
                .unwrap_or_default()
        }
    };

    if text.trim().is_empty() {
        return Err(ClientError::EmptyResponse {
            model: model.to_string(),
        });
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_classification() {
        assert_eq!(
            BodyKind::from_content_type(Some("text/plain; charset=utf-8")),
            BodyKind::PlainText
        );
        assert_eq!(
            BodyKind::from_content_type(Some("Application/JSON")),
            BodyKind::Json
        );
        assert_eq!(
            BodyKind::from_content_type(Some("text/html")),
            BodyKind::Other
        );
        assert_eq!(BodyKind::from_content_type(None), BodyKind::Other);
    }

    #[test]
    fn test_plain_text_passthrough() {
        let reply = extract_reply("m", BodyKind::PlainText, "hi there").unwrap();
        assert_eq!(reply, "hi there");
    }

    #[test]
    fn test_json_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"first"}},{"message":{"content":"second"}}]}"#;
        let reply = extract_reply("m", BodyKind::Json, body).unwrap();
        assert_eq!(reply, "first");
    }

    #[test]
    fn test_json_shaped_text_without_json_content_type_is_text() {
        let body = r#"{"choices":[]}"#;
        let reply = extract_reply("m", BodyKind::Other, body).unwrap();
        assert_eq!(reply, body);
    }

    #[test]
    fn test_blank_replies_are_empty_response() {
        assert!(matches!(
            extract_reply("m", BodyKind::PlainText, "  \n\t"),
            Err(ClientError::EmptyResponse { .. })
        ));
        assert!(matches!(
            extract_reply("m", BodyKind::Json, r#"{"choices":[]}"#),
            Err(ClientError::EmptyResponse { .. })
        ));
        assert!(matches!(
            extract_reply("m", BodyKind::Json, r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(ClientError::EmptyResponse { .. })
        ));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = extract_reply("m", BodyKind::Json, "not json").unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse { .. }));
        assert!(err.is_retryable());
    }
}
