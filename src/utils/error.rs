use thiserror::Error;

/// Failure to transform a single catalog row. Never aborts a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("missing source field '{field}'")]
    MissingField { field: String },

    #[error("malformed value '{value}' in field '{field}': {reason}")]
    MalformedValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl TransformError {
    pub fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field } | Self::MalformedValue { field, .. } => field,
        }
    }
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

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

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::CsvError(_) | Self::ValidationError { .. } => ErrorCategory::Input,
            Self::IoError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CsvError(e) if !e.is_io_error() => ErrorSeverity::Medium,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ValidationError { .. } => ErrorSeverity::High,
            Self::CsvError(_) | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Whether the error ends the whole run rather than a single row.
    /// Only a malformed CSV record is row-level.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::CsvError(e) => e.is_io_error(),
            _ => true,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the configuration file and command line arguments"
            }
            ErrorCategory::Input => {
                "Make sure the input and template files exist and are valid CSV with a header row"
            }
            ErrorCategory::Output => {
                "Make sure the output location is writable and the disk is not full"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not access a file: {}", e),
            Self::CsvError(e) => format!("Could not read or write CSV data: {}", e),
            Self::ValidationError { message } => format!("Invalid input: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
