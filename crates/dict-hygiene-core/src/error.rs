//! Error types for dict-hygiene-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Coarse classification of a [`HygieneError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The dictionary resource could not be read or parsed.
    Load,
    /// A caller-supplied value was rejected before any I/O.
    Validation,
    /// The backup or the overwrite failed.
    Save,
    /// The requested action is not allowed in the session's current state.
    State,
}

/// Errors raised by dictionary scans, saves, and analyzer sessions.
#[derive(Error, Debug)]
pub enum HygieneError {
    /// The dictionary file could not be read.
    #[error("failed to read dictionary {path}: {source}")]
    Load {
        /// File that was being read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The dictionary file is not a JSON array of `{word, freq}`.
    #[error("failed to parse dictionary {path}: {source}")]
    Parse {
        /// File that was being parsed.
        path: Utf8PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// The language code is not on the allow-list.
    #[error("unsupported language: {code:?} (supported: {allowed})")]
    UnsupportedLanguage {
        /// The rejected code.
        code: String,
        /// Comma-separated allow-list.
        allowed: String,
    },

    /// A save payload was empty or malformed.
    #[error("invalid dictionary payload: {0}")]
    InvalidPayload(String),

    /// A search was started with a blank term.
    #[error("search term is empty")]
    EmptySearchTerm,

    /// The pre-write backup copy failed; the dictionary was not touched.
    #[error("failed to back up {path}: {source}")]
    Backup {
        /// Backup file that could not be written.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Writing the updated dictionary failed.
    #[error("failed to write dictionary {path}: {source}")]
    Write {
        /// Dictionary file being replaced.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The updated entry list could not be serialized.
    #[error("failed to serialize dictionary: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Another operation already holds this analyzer.
    #[error("{analyzer} analyzer is busy")]
    Busy {
        /// Analyzer name.
        analyzer: String,
    },

    /// The action is not valid from the session's current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        /// What the caller tried to do.
        action: &'static str,
        /// The state the session was in.
        state: &'static str,
    },

    /// The filtered view selects nothing to delete.
    #[error("nothing to delete: the current filters select no words")]
    NothingToDelete,
}

impl HygieneError {
    /// Map this error onto its coarse kind.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Load { .. } | Self::Parse { .. } => ErrorKind::Load,
            Self::UnsupportedLanguage { .. }
            | Self::InvalidPayload(_)
            | Self::EmptySearchTerm
            | Self::NothingToDelete => ErrorKind::Validation,
            Self::Backup { .. } | Self::Write { .. } | Self::Serialize(_) => ErrorKind::Save,
            Self::Busy { .. } | Self::InvalidTransition { .. } => ErrorKind::State,
        }
    }
}

/// Result type alias using [`HygieneError`].
pub type HygieneResult<T> = Result<T, HygieneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_variants() {
        let err = HygieneError::EmptySearchTerm;
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = HygieneError::Load {
            path: "uk_words.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.kind(), ErrorKind::Load);

        let err = HygieneError::Busy {
            analyzer: "case".into(),
        };
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn unsupported_language_lists_allowed() {
        let err = HygieneError::UnsupportedLanguage {
            code: "de".into(),
            allowed: "uk, en, es".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"de\""));
        assert!(msg.contains("uk, en, es"));
    }
}
