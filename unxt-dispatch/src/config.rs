//! Runtime configuration

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, LazyLock};
use unxt_core::{Object, UnregisteredConverterWarning, UnxtError};

/// Environment variable selecting the [`WarningPolicy`] for unregistered converters
pub const UNREGISTERED_CONVERTER_ENV: &str = "UNXT_UNREGISTERED_CONVERTER";

static CONFIG: LazyLock<RwLock<Arc<DispatchConfig>>> =
    LazyLock::new(|| RwLock::new(Arc::new(DispatchConfig::from_env())));

/// What to do when a foreign array value has no registered converter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningPolicy {
    #[default]
    Warn,
    Ignore,
    Error,
}

impl FromStr for WarningPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warn" | "warning" => Ok(WarningPolicy::Warn),
            "ignore" | "off" => Ok(WarningPolicy::Ignore),
            "error" => Ok(WarningPolicy::Error),
            other => Err(format!("unknown warning policy '{}'", other)),
        }
    }
}

/// Process-wide dispatch settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub unregistered_converter: WarningPolicy,
}

impl DispatchConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup. Unparseable values keep
    /// the default and are logged.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(UNREGISTERED_CONVERTER_ENV) {
            match raw.parse() {
                Ok(policy) => config.unregistered_converter = policy,
                Err(e) => tracing::warn!(var = UNREGISTERED_CONVERTER_ENV, "{}, using default", e),
            }
        }
        config
    }

    /// Current process-wide configuration
    pub fn global() -> Arc<DispatchConfig> {
        Arc::clone(&CONFIG.read())
    }
}

/// Replace the process-wide configuration
pub fn set_config(config: DispatchConfig) {
    tracing::debug!(?config, "dispatch config replaced");
    *CONFIG.write() = Arc::new(config);
}

/// Report a foreign array value passed through without conversion.
///
/// Emits one `WARN` event on target `unxt::value`, stays silent, or fails,
/// according to the global policy.
pub fn report_unregistered(obj: &Object) -> Result<(), UnxtError> {
    let warning = UnregisteredConverterWarning::new(obj.type_name());
    match DispatchConfig::global().unregistered_converter {
        WarningPolicy::Warn => {
            tracing::warn!(target: "unxt::value", type_name = obj.type_name(), "{}", warning);
            Ok(())
        }
        WarningPolicy::Ignore => Ok(()),
        WarningPolicy::Error => Err(UnxtError::UnregisteredConverter(warning)),
    }
}
