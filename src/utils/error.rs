use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream returned status {status}")]
    UpstreamStatusError { status: u16, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl AdvisorError {
    /// 對外回應使用的 HTTP 狀態碼
    pub fn status_code(&self) -> u16 {
        match self {
            AdvisorError::UpstreamStatusError { .. } => 502,
            _ => 500,
        }
    }

    /// 對呼叫端顯示的通用訊息，不包含任何上游診斷內容
    pub fn user_friendly_message(&self) -> &'static str {
        match self {
            AdvisorError::UpstreamStatusError { .. } => "Upstream error",
            _ => "Server error",
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AdvisorError::ConfigError { .. }
                | AdvisorError::MissingConfigError { .. }
                | AdvisorError::InvalidConfigValueError { .. }
                | AdvisorError::ConfigValidationError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_maps_to_bad_gateway() {
        let err = AdvisorError::UpstreamStatusError {
            status: 429,
            body: "rate limited: org-123".to_string(),
        };
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.user_friendly_message(), "Upstream error");
        assert!(!err.user_friendly_message().contains("org-123"));
    }

    #[test]
    fn test_other_errors_map_to_server_error() {
        let err = AdvisorError::ConfigError {
            message: "boom".to_string(),
        };
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.user_friendly_message(), "Server error");
        assert!(err.is_config_error());
    }
}
