use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Unknown example: {id}")]
    UnknownExample { id: String },

    #[error("Example '{id}' failed: {details}")]
    ExampleFailed { id: String, details: String },

    #[error("Unsupported database type: {db_type}")]
    UnsupportedBackend { db_type: String },

    #[error("{service} does not support {operation}")]
    NotSupported { service: String, operation: String },

    #[error("{message}")]
    ContractViolation { message: String },

    #[error("Chain not registered: {chain}")]
    ChainNotRegistered { chain: String },

    #[error("Unsupported OS: {os}")]
    UnsupportedPlatform { os: String },

    #[error("UI not created")]
    UiNotCreated,

    #[error("Build error: {message}")]
    BuildError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Serialization,
    Catalog,
    Example,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PatternError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PatternError::ConfigError { .. }
            | PatternError::ConfigValidationError { .. }
            | PatternError::InvalidConfigValueError { .. }
            | PatternError::MissingConfigError { .. }
            | PatternError::ValidationError { .. } => ErrorCategory::Configuration,
            PatternError::IoError(_) | PatternError::ZipError(_) => ErrorCategory::Io,
            PatternError::CsvError(_) | PatternError::SerializationError(_) => {
                ErrorCategory::Serialization
            }
            PatternError::UnknownExample { .. } | PatternError::ExampleFailed { .. } => {
                ErrorCategory::Catalog
            }
            _ => ErrorCategory::Example,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 範例本身示範的錯誤是預期內的
            ErrorCategory::Example => ErrorSeverity::Low,
            ErrorCategory::Catalog => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Serialization => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PatternError::UnknownExample { .. } => {
                "Run `lld-patterns list` to see the available example ids".to_string()
            }
            PatternError::InvalidConfigValueError { field, .. }
            | PatternError::ConfigValidationError { field, .. }
            | PatternError::MissingConfigError { field } => {
                format!("Check the '{}' setting in your configuration", field)
            }
            PatternError::ConfigError { .. } | PatternError::ValidationError { .. } => {
                "Check the configuration file syntax and values".to_string()
            }
            PatternError::IoError(_) | PatternError::ZipError(_) => {
                "Make sure the output path exists and is writable".to_string()
            }
            PatternError::CsvError(_) | PatternError::SerializationError(_) => {
                "Re-run with --verbose to see which report failed to serialize".to_string()
            }
            _ => "This error is part of the example's demonstration".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("Could not write output: {}", self),
            ErrorCategory::Serialization => format!("Could not build report: {}", self),
            ErrorCategory::Catalog => format!("Catalog problem: {}", self),
            ErrorCategory::Example => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PatternError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_low_severity() {
        let err = PatternError::UnsupportedPlatform {
            os: "BeOS".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Example);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.to_string(), "Unsupported OS: BeOS");
    }

    #[test]
    fn test_config_errors_suggest_field() {
        let err = PatternError::MissingConfigError {
            field: "output.output_path".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("output.output_path"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = PatternError::from(std::io::Error::other("disk full"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().starts_with("Could not write output"));
    }
}
