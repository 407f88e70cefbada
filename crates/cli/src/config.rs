//! `appraise.toml` configuration.
//!
//! # Example
//!
//! ```toml
//! [engine]
//! scale = 2
//! max_passes = 8
//!
//! [defaults]
//! offering_adjustment_pct = 5
//! selling_adjustment_year_pct = 3
//! qualitative_magnitude = 5
//! final_value_step = 1000
//!
//! [log]
//! level = "warn"
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::Deserialize;

use appraise_engine::{Engine, RoundingPolicy};
use appraise_pricing::PricingDefaults;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "appraise.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppraiseConfig {
    pub engine: EngineConfig,
    pub defaults: PricingDefaults,
    pub log: LogConfig,
}

/// `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Decimal places kept when a computed number is written.
    pub scale: u32,
    /// Upper bound on full passes when settling a form.
    pub max_passes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            scale: 2,
            max_passes: appraise_engine::session::DEFAULT_MAX_PASSES,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"appraise.engine=debug"`.
    pub level: Option<String>,
}

impl AppraiseConfig {
    pub fn engine(&self) -> Engine {
        Engine::new(RoundingPolicy::with_scale(self.engine.scale))
    }
}

/// Load `path`, or `appraise.toml` from the working directory when present,
/// or the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppraiseConfig, String> {
    match path {
        Some(path) => read_config(path),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.is_file() {
                read_config(fallback)
            } else {
                Ok(AppraiseConfig::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<AppraiseConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppraiseConfig = toml::from_str(
            r#"
            [defaults]
            final_value_step = 1000

            [log]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.defaults.final_value_step, Decimal::from(1000));
        assert_eq!(config.defaults.offering_adjustment_pct, Decimal::from(5));
        assert_eq!(config.engine.scale, 2);
        assert_eq!(config.engine.max_passes, 8);
        assert_eq!(config.log.level.as_deref(), Some("debug"));
    }

    #[test]
    fn decimal_strings_are_accepted() {
        let config: AppraiseConfig =
            toml::from_str("[defaults]\nqualitative_magnitude = \"7.5\"\n").unwrap();
        assert_eq!(config.defaults.qualitative_magnitude, Decimal::new(75, 1));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/appraise.toml"))).unwrap_err();
        assert!(err.contains("could not read"));
    }
}
