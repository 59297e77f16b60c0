use thiserror::Error;

/// 執行流程中的階段，用於判斷哪一個步驟失敗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Fetch,
    Write,
}

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Config parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Source '{source_name}' failed: {message}")]
    SourceError {
        source_name: String,
        message: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl AgentError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn source_failed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceError {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::ConfigError { .. } | Self::YamlError(_) | Self::InvalidConfigValueError { .. } => {
                Stage::Config
            }
            Self::SourceError { .. } | Self::ApiError(_) => Stage::Fetch,
            Self::IoError(_) | Self::SerializationError(_) => Stage::Write,
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_stage_mapping() {
        assert_eq!(AgentError::config("missing").stage(), Stage::Config);
        assert_eq!(AgentError::source_failed("usajobs", "boom").stage(), Stage::Fetch);

        let io = AgentError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        assert_eq!(io.stage(), Stage::Write);
    }

    #[test]
    fn test_source_error_message_names_source() {
        let err = AgentError::source_failed("usajobs", "HTTP 503");
        assert_eq!(err.to_string(), "Source 'usajobs' failed: HTTP 503");
    }
}
