//! Rendering configuration values as YAML or JSON text.

use anyhow::Result;
use serde::Serialize;
use tracing::warn;

/// Output format for rendered configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl OutputFormat {
    /// Render `value` in this format, ending with a newline.
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => {
                let mut out = serde_json::to_string_pretty(value)?;
                out.push('\n');
                Ok(out)
            }
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

/// Render any serializable value as raw YAML.
///
/// Values that cannot be encoded render as the empty string.
pub fn to_raw_yaml<T: Serialize>(data: &T) -> String {
    match serde_yaml::to_string(data) {
        Ok(yaml) => yaml,
        Err(e) => {
            warn!(error = %e, "failed to render value as YAML");
            String::new()
        }
    }
}
