//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `STAGEKEEPER_DISCORD_TOKEN` - Discord bot token
//! - `STAGEKEEPER_COMMAND_PREFIX` - command prefix
//! - `STAGEKEEPER_CONFIG` - path to the config file

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "STAGEKEEPER";

/// Apply environment variable overrides to a config.
///
/// This allows sensitive values like the bot token to be provided via
/// environment variables instead of the config file.
pub fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(token) = env::var(format!("{}_DISCORD_TOKEN", ENV_PREFIX)) {
        config.discord.token = token;
    }

    if let Ok(prefix) = env::var(format!("{}_COMMAND_PREFIX", ENV_PREFIX)) {
        config.discord.command_prefix = prefix;
    }

    config
}

/// Get the config file path from environment or use default.
///
/// Checks `STAGEKEEPER_CONFIG`, otherwise returns "stagekeeper.conf".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "stagekeeper.conf".to_string())
}
