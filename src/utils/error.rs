use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to write output file {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl ExportError {
    pub fn write_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CsvError(_) | Self::IoError(_) => ErrorCategory::Input,
            Self::WriteFailure { .. } => ErrorCategory::Output,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CsvError(_)
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::WriteFailure { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::CsvError(_) => {
                "Check that the input file is a comma-separated export with a header row"
            }
            Self::IoError(_) => "Check that the input path exists and is readable",
            Self::WriteFailure { .. } => {
                "Check that the output directory exists, is writable and has free space"
            }
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Check the TOML configuration file syntax"
            }
            Self::InvalidConfigValueError { .. } => {
                "Fix the named setting in the configuration file or on the command line"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::CsvError(e) => format!("The input CSV could not be parsed: {}", e),
            Self::IoError(e) => format!("A file could not be read: {}", e),
            Self::WriteFailure { path, .. } => {
                format!("The draft listing file {} could not be written", path.display())
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_failure_is_critical_output_error() {
        let err = ExportError::write_failure(
            "out/listings.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );

        assert_eq!(err.category(), ErrorCategory::Output);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.to_string().contains("out/listings.csv"));
        assert!(err.user_friendly_message().contains("could not be written"));
    }

    #[test]
    fn test_config_errors_share_category() {
        let parse = ExportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: "expected `=`".to_string(),
        };
        let invalid = ExportError::InvalidConfigValueError {
            field: "selection.listed_sentinel".to_string(),
            value: "".to_string(),
            reason: "Value cannot be empty".to_string(),
        };

        assert_eq!(parse.category(), ErrorCategory::Configuration);
        assert_eq!(invalid.category(), ErrorCategory::Configuration);
        assert_eq!(invalid.severity(), ErrorSeverity::High);
        assert_eq!(
            invalid.user_friendly_message(),
            "Setting 'selection.listed_sentinel' is invalid: Value cannot be empty"
        );
    }
}
