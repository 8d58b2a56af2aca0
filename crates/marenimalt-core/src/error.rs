/// Core error types for Marenimalt.
use std::path::PathBuf;

/// A specialized Result type for Marenimalt operations.
pub type MarenimaltResult<T> = Result<T, MarenimaltError>;

/// Which lookup table a key was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMap {
    /// Raw speaker value to display image.
    Image,
    /// Raw type value to display label.
    Type,
}

impl std::fmt::Display for LookupMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupMap::Image => write!(f, "image_map"),
            LookupMap::Type => write!(f, "type_map"),
        }
    }
}

/// Top-level error type encompassing every stage of an export.
#[derive(Debug, thiserror::Error)]
pub enum MarenimaltError {
    #[error("record {record} is missing field '{key}'")]
    MissingField { record: usize, key: String },

    #[error("record {record} has an invalid value for '{key}': {message}")]
    InvalidField {
        record: usize,
        key: String,
        message: String,
    },

    #[error("{map} has no entry for '{key}'")]
    UnmappedKey { map: LookupMap, key: String },

    #[error("audio decode error: {message} ({path:?})")]
    AudioDecode { message: String, path: PathBuf },

    #[error("render error: {0}")]
    Render(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("data error: {message} in {file}")]
    Data { message: String, file: String },

    #[error("timeline validation error: {0}")]
    TimelineValidation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl MarenimaltError {
    /// Create a missing-field error for the record at `record` (0-based).
    pub fn missing_field(record: usize, key: impl Into<String>) -> Self {
        MarenimaltError::MissingField {
            record,
            key: key.into(),
        }
    }

    /// Create an unmapped-key error.
    pub fn unmapped(map: LookupMap, key: impl Into<String>) -> Self {
        MarenimaltError::UnmappedKey {
            map,
            key: key.into(),
        }
    }

    /// Create an audio decode error.
    pub fn audio(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        MarenimaltError::AudioDecode {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a data-file error.
    pub fn data(message: impl Into<String>, file: impl Into<String>) -> Self {
        MarenimaltError::Data {
            message: message.into(),
            file: file.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = MarenimaltError::missing_field(3, "utterance");
        assert_eq!(err.to_string(), "record 3 is missing field 'utterance'");
    }

    #[test]
    fn test_unmapped_display() {
        let err = MarenimaltError::unmapped(LookupMap::Image, "twilight");
        assert_eq!(err.to_string(), "image_map has no entry for 'twilight'");
    }

    #[test]
    fn test_audio_error_display() {
        let err = MarenimaltError::audio("ffprobe failed", "/clips/a.flac");
        assert!(err.to_string().contains("ffprobe failed"));
        assert!(err.to_string().contains("a.flac"));
    }
}
