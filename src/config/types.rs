//! Configuration type definitions.

use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    pub token: String,
    /// Command prefix, e.g. "!".
    #[serde(rename = "command-prefix", default = "default_prefix")]
    pub command_prefix: String,
}

/// Match engine defaults and timers.
#[derive(Debug, Clone, Deserialize)]
pub struct ArenaConfig {
    /// Mode applied when the start command names none.
    #[serde(rename = "default-mode", default = "default_mode")]
    pub default_mode: String,
    /// Wins needed to end a match; 0 = unbounded.
    #[serde(rename = "default-winning-score", default = "default_winning_score")]
    pub default_winning_score: u32,
    /// Per-player ban bound; 0 = unlimited.
    #[serde(rename = "default-max-bans", default)]
    pub default_max_bans: usize,
    /// Idle seconds before the watchdog asks whether the match is alive.
    #[serde(rename = "idle-timeout-secs", default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    /// Seconds the confirmation prompt waits before expiring the match.
    #[serde(rename = "confirm-timeout-secs", default = "default_confirm_timeout")]
    pub confirm_timeout_secs: u64,
    /// Lifetime of transient error notices before auto-delete.
    #[serde(rename = "notice-ttl-secs", default = "default_notice_ttl")]
    pub notice_ttl_secs: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            default_winning_score: default_winning_score(),
            default_max_bans: 0,
            idle_timeout_secs: default_idle_timeout(),
            confirm_timeout_secs: default_confirm_timeout(),
            notice_ttl_secs: default_notice_ttl(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_mode() -> String {
    "open".to_string()
}

fn default_winning_score() -> u32 {
    3
}

fn default_idle_timeout() -> u64 {
    1800
}

fn default_confirm_timeout() -> u64 {
    120
}

fn default_notice_ttl() -> u64 {
    10
}
