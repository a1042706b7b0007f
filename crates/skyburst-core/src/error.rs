//! Error types for Skyburst

use thiserror::Error;

/// The main error type for Skyburst operations
#[derive(Debug, Error)]
pub enum SkyburstError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown shell type: {0}")]
    UnknownShell(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Audio error: {0}")]
    AudioError(String),
}

impl SkyburstError {
    /// True for errors the simulation recovers from by substituting a default
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SkyburstError::Config(_)
                | SkyburstError::UnknownShell(_)
                | SkyburstError::ValueOutOfRange { .. }
        )
    }
}

/// Result type alias for Skyburst operations
pub type Result<T> = std::result::Result<T, SkyburstError>;

impl From<toml::de::Error> for SkyburstError {
    fn from(err: toml::de::Error) -> Self {
        SkyburstError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for SkyburstError {
    fn from(err: toml::ser::Error) -> Self {
        SkyburstError::TomlSerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_shell_is_configuration_error() {
        let err = SkyburstError::UnknownShell("peony".into());
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "Unknown shell type: peony");
    }

    #[test]
    fn toml_errors_convert() {
        let err: SkyburstError = toml::from_str::<toml::Value>("= broken")
            .unwrap_err()
            .into();
        assert!(matches!(err, SkyburstError::TomlParseError(_)));
        assert!(!err.is_configuration());
    }
}
