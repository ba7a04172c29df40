use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelerError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Download of {url} failed after {attempts} attempts: {message}")]
    DownloadError {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid cookie name pattern: {0}")]
    PatternError(#[from] regex::Error),

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

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LabelerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LabelerError::ApiError(_) | LabelerError::DownloadError { .. } => ErrorCategory::Network,
            LabelerError::IoError(_) => ErrorCategory::Storage,
            LabelerError::SerializationError(_) | LabelerError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            LabelerError::PatternError(_)
            | LabelerError::ConfigError { .. }
            | LabelerError::ConfigValidationError { .. }
            | LabelerError::InvalidConfigValueError { .. }
            | LabelerError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LabelerError::ApiError(_) | LabelerError::DownloadError { .. } => {
                "Check network connectivity or pre-populate the tracker list cache directory"
            }
            LabelerError::IoError(_) => "Check that the input file exists and the output directory is writable",
            LabelerError::SerializationError(_) => {
                "Make sure the input file is a JSON array of cookie objects"
            }
            LabelerError::PatternError(_) => "Fix the regular expression syntax of the cookie name patterns",
            LabelerError::ConfigError { .. }
            | LabelerError::ConfigValidationError { .. }
            | LabelerError::InvalidConfigValueError { .. } => {
                "Review the configuration values and try again"
            }
            LabelerError::MissingConfigError { .. } => {
                "Provide the missing configuration file or field"
            }
            LabelerError::ProcessingError { .. } => "Inspect the input data for malformed records",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LabelerError::DownloadError { url, .. } => {
                format!("Could not download tracker list from {}", url)
            }
            LabelerError::ApiError(e) => format!("Network request failed: {}", e),
            LabelerError::IoError(e) => format!("File operation failed: {}", e),
            LabelerError::SerializationError(e) => format!("Invalid JSON data: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LabelerError>;
