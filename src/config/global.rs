//! Settings shared by every component: version, time zone and logging.

use super::bind::Bind;
use super::resolve::{EnvSource, Resolver};
use serde::{Deserialize, Serialize};

/// Global configuration common to all components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Configuration version.
    #[serde(default)]
    pub version: String,

    /// Time zone name, e.g. `UTC`.
    #[serde(default)]
    pub time_zone: String,

    /// Logging settings.
    #[serde(default)]
    pub logging: Option<Logging>,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logging {
    /// Logger implementation name.
    #[serde(default)]
    pub logger: String,

    /// Minimum level, e.g. `warn`.
    #[serde(default)]
    pub level: String,

    /// Output format, e.g. `json` or `raw`.
    #[serde(default)]
    pub format: String,
}

impl Bind for GlobalConfig {
    fn bind_with<E: EnvSource>(&mut self, resolver: &Resolver<E>) -> &mut Self {
        self.version = resolver.resolve(&self.version);
        self.time_zone = resolver.resolve(&self.time_zone);
        self.logging.bind_with(resolver);
        self
    }
}

impl Bind for Logging {
    fn bind_with<E: EnvSource>(&mut self, resolver: &Resolver<E>) -> &mut Self {
        self.logger = resolver.resolve(&self.logger);
        self.level = resolver.resolve(&self.level);
        self.format = resolver.resolve(&self.format);
        self
    }
}
