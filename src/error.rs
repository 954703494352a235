//! Error types for reading, merging and loading configuration.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading a configuration file.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The file could not be opened. The OS error is kept as-is.
    #[error("open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was opened but could not be read.
    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON content did not decode into the target type.
    #[error("{}", describe_json(.token, .source))]
    Json {
        /// Character at the failing position, for syntax errors.
        token: Option<char>,
        #[source]
        source: serde_json::Error,
    },

    /// YAML content parsed, but its tree did not decode into the target type.
    #[error("while decoding JSON: {0}")]
    Yaml(#[source] serde_json::Error),

    /// YAML content is not well-formed.
    #[error("while parsing YAML: {0}")]
    YamlSyntax(#[source] serde_yaml::Error),
}

impl ReadError {
    /// Kind of the underlying I/O error, if this is an I/O failure.
    pub fn kind(&self) -> Option<io::ErrorKind> {
        match self {
            ReadError::Open { source, .. } | ReadError::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    /// Whether the file does not exist.
    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(io::ErrorKind::NotFound)
    }

    /// Whether this is a decode failure rather than an I/O failure.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            ReadError::Json { .. } | ReadError::Yaml(_) | ReadError::YamlSyntax(_)
        )
    }
}

fn describe_json(token: &Option<char>, source: &serde_json::Error) -> String {
    match token {
        Some(c) => format!("invalid character {c:?}: {source}"),
        None => source.to_string(),
    }
}

/// Failure while merging configuration values.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The same path holds differently shaped values in two inputs.
    #[error("cannot merge {src} into {dst} at {path}")]
    TypeMismatch {
        path: String,
        dst: &'static str,
        src: &'static str,
    },

    /// An input could not be turned into a value tree.
    #[error("failed to encode merge input: {0}")]
    Encode(#[source] serde_json::Error),

    /// The merged tree does not fit the target type.
    #[error("failed to decode merged value: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Failure while loading layered configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file layer could not be read.
    #[error("failed to load {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
