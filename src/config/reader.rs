//! Reading configuration files into typed values.
//!
//! JSON and YAML are both decoded with `serde_json`'s typing rules: YAML is
//! first parsed into a generic tree and that tree is then decoded like JSON
//! would be. Both formats therefore report the same type errors.

use crate::error::ReadError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Structured text format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick the format from a file extension. Anything that is not
    /// `.yaml` or `.yml` is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Format::Yaml
            }
            _ => Format::Json,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Yaml => write!(f, "yaml"),
        }
    }
}

/// Read the file at `path` into `target`.
///
/// `target` is only assigned when decoding succeeds.
pub fn read<T, P>(path: P, target: &mut T) -> Result<(), ReadError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    *target = read_as(path)?;
    Ok(())
}

/// Read the file at `path` into a new value.
pub fn read_as<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ReadError> {
    let path = path.as_ref();
    let format = Format::from_path(path);

    let mut file = File::open(path).map_err(|source| ReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), %format, bytes = bytes.len(), "decoding config file");
    decode(format, &bytes)
}

/// Decode `bytes` in the given format.
pub fn decode<T: DeserializeOwned>(format: Format, bytes: &[u8]) -> Result<T, ReadError> {
    match format {
        Format::Json => serde_json::from_slice(bytes).map_err(|source| ReadError::Json {
            token: offending_char(bytes, &source),
            source,
        }),
        Format::Yaml => {
            let tree: Value = serde_yaml::from_slice(bytes).map_err(ReadError::YamlSyntax)?;
            serde_json::from_value(tree).map_err(ReadError::Yaml)
        }
    }
}

/// First character of the token a JSON syntax error points into.
///
/// serde_json reports literal errors past the character that began the
/// literal, so the position is walked back to the start of the word.
fn offending_char(bytes: &[u8], err: &serde_json::Error) -> Option<char> {
    if !err.is_syntax() || err.line() == 0 || err.column() == 0 {
        return None;
    }
    let text = std::str::from_utf8(bytes).ok()?;
    let line = text.lines().nth(err.line() - 1)?;
    let before = line.get(..err.column() - 1)?;
    let start = before.trim_end_matches(char::is_alphanumeric).len();
    line.get(start..)?.chars().next()
}
