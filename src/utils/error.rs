use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail provider rejected the request (status {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("Template registration error: {0}")]
    TemplateRegistration(#[from] handlebars::TemplateError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl PortalError {
    /// 給 CLI 使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            PortalError::Http(_) => "Could not reach the mail provider".to_string(),
            PortalError::Provider { status, .. } => {
                format!("The mail provider refused the message (HTTP {})", status)
            }
            PortalError::MissingConfigError { field } => {
                format!("Required setting {} is not configured", field)
            }
            PortalError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting {} is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PortalError::ConfigError { .. }
                | PortalError::MissingConfigError { .. }
                | PortalError::InvalidConfigValueError { .. }
                | PortalError::ConfigValidationError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
