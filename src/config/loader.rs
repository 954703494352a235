//! Layered configuration loading.
//!
//! A loader holds an ordered list of layers, lowest priority first. Loading
//! reads every file layer, binds every layer's tokens, then merges them.

use super::bind::Bind;
use super::merge::merge;
use super::reader::read_as;
use super::resolve::{EnvSource, ProcessEnv, Resolver};
use crate::error::{ConfigError, ConfigResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One source of configuration.
#[derive(Debug, Clone)]
pub enum Layer<T> {
    /// A file on disk. Optional files that do not exist are skipped.
    File { path: PathBuf, required: bool },
    /// A value built in memory, such as defaults.
    Value(T),
}

impl<T> std::fmt::Display for Layer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::File { path, .. } => write!(f, "{}", path.display()),
            Layer::Value(_) => write!(f, "<value>"),
        }
    }
}

/// Loads a configuration value from ordered layers.
#[derive(Debug, Clone)]
pub struct ConfigLoader<T, E = ProcessEnv> {
    layers: Vec<Layer<T>>,
    resolver: Resolver<E>,
}

impl<T> Default for ConfigLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ConfigLoader<T> {
    /// Loader with no layers that resolves tokens from the process environment.
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            resolver: Resolver::new(),
        }
    }
}

impl<T, E: EnvSource> ConfigLoader<T, E> {
    /// Resolve tokens with a different resolver.
    pub fn with_resolver<F: EnvSource>(self, resolver: Resolver<F>) -> ConfigLoader<T, F> {
        ConfigLoader {
            layers: self.layers,
            resolver,
        }
    }

    /// Add a file that must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.layers.push(Layer::File {
            path: path.into(),
            required: true,
        });
        self
    }

    /// Add a file that is skipped when it does not exist.
    pub fn with_optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.layers.push(Layer::File {
            path: path.into(),
            required: false,
        });
        self
    }

    /// Add an in-memory value.
    pub fn with_value(mut self, value: T) -> Self {
        self.layers.push(Layer::Value(value));
        self
    }

    /// Read, bind and merge all layers.
    pub fn load(self) -> ConfigResult<T>
    where
        T: Bind + Serialize + DeserializeOwned + Default,
    {
        let mut values = Vec::with_capacity(self.layers.len());
        for layer in self.layers {
            debug!(%layer, "loading config layer");
            let mut value = match layer {
                Layer::Value(value) => value,
                Layer::File { path, required } => match read_layer(&path, required)? {
                    Some(value) => value,
                    None => continue,
                },
            };
            value.bind_with(&self.resolver);
            values.push(value);
        }

        debug!(layers = values.len(), "loaded config layers");
        Ok(merge(values)?)
    }
}

fn read_layer<T: DeserializeOwned>(path: &Path, required: bool) -> ConfigResult<Option<T>> {
    match read_as(path) {
        Ok(value) => Ok(Some(value)),
        Err(e) if !required && e.is_not_found() => {
            debug!(path = %path.display(), "optional config layer not found, skipping");
            Ok(None)
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
