//! String indirection for configuration values.
//!
//! A string leaf can point somewhere else instead of carrying a literal:
//! - `_NAME_` - value of environment variable `NAME`
//! - `$NAME` - value of environment variable `NAME`
//! - `file://PATH` - trimmed contents of the file at `PATH`
//!
//! Anything else is a literal and passes through unchanged. Resolution never
//! fails: an unset variable leaves the token as-is and an unreadable file
//! resolves to the empty string.

use std::collections::HashMap;
use tracing::{trace, warn};

/// Prefix marking a file-backed value.
pub const FILE_VALUE_PREFIX: &str = "file://";

/// Source of environment variables used during resolution.
pub trait EnvSource {
    /// Look up a variable by name. `None` means the variable is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Adapts a lookup function into an [`EnvSource`].
pub struct FnEnv<F>(pub F);

impl<F> EnvSource for FnEnv<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        (self.0)(name)
    }
}

/// Resolves indirection tokens against an environment source.
#[derive(Debug, Clone, Default)]
pub struct Resolver<E = ProcessEnv> {
    env: E,
}

impl Resolver<ProcessEnv> {
    /// Resolver backed by the process environment.
    pub fn new() -> Self {
        Self { env: ProcessEnv }
    }
}

impl<E: EnvSource> Resolver<E> {
    /// Resolver backed by an explicit environment source.
    pub fn with_env(env: E) -> Self {
        Self { env }
    }

    /// Resolve a single value.
    pub fn resolve(&self, value: &str) -> String {
        if check_prefix_and_suffix(value, "_", "_") {
            let name = &value[1..value.len() - 1];
            if let Some(resolved) = self.env.var(name) {
                trace!(name, "resolved value from environment");
                return resolved;
            }
        }

        if let Some(name) = value.strip_prefix('$')
            && let Some(resolved) = self.env.var(name)
        {
            trace!(name, "resolved value from environment");
            return resolved;
        }

        if let Some(path) = value.strip_prefix(FILE_VALUE_PREFIX) {
            return match std::fs::read_to_string(path) {
                Ok(contents) => {
                    trace!(path, "resolved value from file");
                    contents.trim().to_string()
                }
                Err(e) => {
                    warn!(path, error = %e, "failed to read file-backed value");
                    String::new()
                }
            };
        }

        value.to_string()
    }

    /// Resolve each value, keeping order and count.
    pub fn resolve_all<S: AsRef<str>>(&self, values: &[S]) -> Vec<String> {
        values.iter().map(|v| self.resolve(v.as_ref())).collect()
    }
}

/// Resolve a value against the process environment.
pub fn get_actual_value(value: &str) -> String {
    Resolver::new().resolve(value)
}

/// Resolve each value against the process environment.
pub fn get_actual_values<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    Resolver::new().resolve_all(values)
}

/// Check that `s` starts with `prefix` and ends with `suffix` without the
/// two overlapping.
pub fn check_prefix_and_suffix(s: &str, prefix: &str, suffix: &str) -> bool {
    s.len() >= prefix.len() + suffix.len() && s.starts_with(prefix) && s.ends_with(suffix)
}
