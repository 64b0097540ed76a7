use thiserror::Error;

/// Terminal failures of a single webhook call.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("read request body: {message}")]
    Body { message: String },
    #[error("decode request: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("unknown tag: {tag}")]
    UnknownTag { tag: String },
    #[error("encode response: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("render reply for tag `{tag}`: {message}")]
    Render { tag: String, message: String },
}

impl WebhookError {
    /// Stable classifier used in logs and CLI output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Body { .. } => "body",
            Self::Decode(_) => "decode",
            Self::UnknownTag { .. } => "unknown_tag",
            Self::Encode(_) => "encode",
            Self::Render { .. } => "render",
        }
    }

    /// Whether the caller sent something this service cannot handle.
    pub fn is_caller_fault(&self) -> bool {
        matches!(self, Self::Body { .. } | Self::Decode(_) | Self::UnknownTag { .. })
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::WebhookError;

    #[test]
    fn unknown_tag_message_names_the_tag() {
        let error = WebhookError::UnknownTag { tag: "foo".to_owned() };

        assert_eq!(error.to_string(), "unknown tag: foo");
        assert_eq!(error.error_class(), "unknown_tag");
        assert!(error.is_caller_fault());
    }

    #[test]
    fn render_failure_is_not_caller_fault() {
        let error =
            WebhookError::Render { tag: "confirm".to_owned(), message: "boom".to_owned() };

        assert_eq!(error.to_string(), "render reply for tag `confirm`: boom");
        assert!(!error.is_caller_fault());
    }

    #[test]
    fn decode_failure_carries_parser_detail() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        let error = WebhookError::Decode(source);

        assert!(error.to_string().starts_with("decode request: "));
        assert_eq!(error.error_class(), "decode");
    }
}
