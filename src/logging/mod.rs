//! Subscriber setup for the `tracing` events the path core emits.
//!
//! The library itself only emits events. A binary installs the subscriber
//! with [`init_tracing`]; `RUST_LOG`, when set, replaces the configured
//! filter.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::error::{PathError, PathResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&LevelFilter::from(*self), f)
    }
}

/// Filter and output format of the installed subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    /// Per-target overrides, e.g. `("echo_core::grid::launcher", Debug)`
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_targets: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![("echo_core::grid::launcher".to_string(), LogLevel::Debug)],
            show_targets: true,
        }
    }
}

impl TracingConfig {
    /// The default level followed by one directive per module override
    pub fn directives(&self) -> PathResult<Vec<Directive>> {
        let mut directives = vec![Directive::from(LevelFilter::from(self.default_level))];
        for (module, level) in &self.module_filters {
            let well_formed = module.split("::").all(|part| {
                !part.is_empty()
                    && part
                        .chars()
                        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
            });
            if !well_formed {
                return Err(PathError::Configuration(format!(
                    "log filter target `{module}` is not a module path"
                )));
            }
            let directive = format!("{module}={level}").parse().map_err(|e| {
                PathError::Configuration(format!("bad log filter for `{module}`: {e}"))
            })?;
            directives.push(directive);
        }
        Ok(directives)
    }

    fn env_filter(&self) -> PathResult<EnvFilter> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        Ok(self
            .directives()?
            .into_iter()
            .fold(EnvFilter::default(), EnvFilter::add_directive))
    }
}

/// Install a compact fmt subscriber. Returns `false` when a global subscriber
/// was already installed, in which case nothing changes.
pub fn init_tracing(config: &TracingConfig) -> PathResult<bool> {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter()?)
        .with_target(config.show_targets)
        .compact()
        .try_init()
        .is_ok();
    Ok(installed)
}
