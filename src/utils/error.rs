use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Server responded with status {status}")]
    HttpStatusError {
        status: u16,
        body: serde_json::Value,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Storage,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WizardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WizardError::ApiError(_) | WizardError::NetworkError { .. } => ErrorCategory::Network,
            WizardError::HttpStatusError { .. } => ErrorCategory::Server,
            WizardError::IoError(_) | WizardError::StorageError { .. } => ErrorCategory::Storage,
            WizardError::SerializationError(_) => ErrorCategory::Data,
            WizardError::UrlError(_)
            | WizardError::ConfigError { .. }
            | WizardError::ConfigValidationError { .. }
            | WizardError::InvalidConfigValueError { .. }
            | WizardError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    /// 錯誤嚴重程度，CLI 以此決定退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者可直接重送
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Server | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Low,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 連線類錯誤：表單狀態保留，使用者重送即可
    pub fn is_network(&self) -> bool {
        match self {
            WizardError::NetworkError { .. } => true,
            WizardError::ApiError(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            WizardError::HttpStatusError { status, .. } => Some(*status),
            WizardError::ApiError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            WizardError::ApiError(_) | WizardError::NetworkError { .. } => {
                "Something went wrong. Please check your internet connection and try again."
                    .to_string()
            }
            WizardError::HttpStatusError { status, .. } if *status == 404 => {
                "The requested gig could not be found.".to_string()
            }
            WizardError::HttpStatusError { .. } => {
                "The server could not complete the request. Please try again.".to_string()
            }
            WizardError::IoError(_) | WizardError::StorageError { .. } => {
                "Saved progress could not be read or written.".to_string()
            }
            WizardError::SerializationError(_) => {
                "Received data in an unexpected format.".to_string()
            }
            WizardError::MissingConfigError { field } => {
                format!("Missing configuration value: {}", field)
            }
            other => format!("Invalid configuration: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your connection and resubmit the form",
            ErrorCategory::Server => "Retry later; if the problem persists contact support",
            ErrorCategory::Storage => "Check the data directory permissions and free space",
            ErrorCategory::Data => "Run `reset` to discard the saved draft and start over",
            ErrorCategory::Configuration => {
                "Fix the configuration file or environment variables and run again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, WizardError>;
