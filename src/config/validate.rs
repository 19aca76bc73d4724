//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use crate::arena::Mode;
use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    // Validate Discord config
    if config.discord.token.is_empty() {
        errors.push("discord.token is required".to_string());
    }
    if config.discord.token == "YOUR_DISCORD_TOKEN_HERE" {
        errors.push("discord.token has not been configured (still using placeholder)".to_string());
    }
    if config.discord.command_prefix.is_empty() {
        errors.push("discord.command-prefix must not be empty".to_string());
    }
    if config.discord.command_prefix.len() > 3 {
        errors.push(format!(
            "discord.command-prefix must be at most 3 characters (got {})",
            config.discord.command_prefix.len()
        ));
    }

    // Validate arena defaults
    if Mode::from_name(&config.arena.default_mode).is_none() {
        errors.push(format!(
            "arena.default-mode '{}' is invalid (use: open, elimination, lockout, horn)",
            config.arena.default_mode
        ));
    }
    if config.arena.idle_timeout_secs == 0 {
        errors.push("arena.idle-timeout-secs must be non-zero".to_string());
    }
    if config.arena.confirm_timeout_secs == 0 {
        errors.push("arena.confirm-timeout-secs must be non-zero".to_string());
    }
    if config.arena.notice_ttl_secs == 0 {
        errors.push("arena.notice-ttl-secs must be non-zero".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}
