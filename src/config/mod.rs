//! Layered configuration
//!
//! Four layers, later ones winning:
//! 1. Built-in defaults
//! 2. User config (~/.config/playkit/config.toml)
//! 3. Project config (./playkit.toml)
//! 4. CLI flags

mod defaults;
mod effective;
mod settings;

pub use defaults::BuiltinDefaults;
pub use effective::{
    default_project_config_path, default_user_config_path, ConfigError, ConfigOrigin, ConfigSource,
    EffectiveConfig, SCHEMA_ID,
};
pub use settings::{LogLevel, Settings};
