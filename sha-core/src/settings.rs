use config::{Config, ConfigError, Environment, File};
use lazy_static::lazy_static;
use log::warn;
use serde::{Deserialize, Serialize};

lazy_static! {
    pub static ref SETTINGS: Settings = Settings::new().unwrap_or_else(|err| {
        warn!("invalid sha-core configuration, using defaults: {}", err);
        Settings::default()
    });
}

const SETTINGS_PATH: &str = "./sha-core.config.toml";
const PREFIX: &str = "SHA_CORE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Lanes per batched compression: 1, 2, 4, 8 or 16. Anything else runs scalar.
    pub lanes: usize,
    /// Use 128-bit SIMD registers when the CPU has them and the lane count matches.
    pub native: bool,
    /// Use the precomputed schedules of the padding block for short whole-block messages.
    pub cache_padding: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            lanes: 4,
            native: true,
            cache_padding: true,
        }
    }
}

impl Settings {
    fn new() -> Result<Settings, ConfigError> {
        Config::builder()
            .add_source(File::with_name(SETTINGS_PATH).required(false))
            .add_source(Environment::with_prefix(PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
