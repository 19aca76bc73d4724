//! Discord bot integration.
//!
//! Event handling, command routing, and the embed renderer that turns
//! engine payloads into Discord messages.

pub mod bot;
pub mod commands;
pub mod handler;
pub mod renderer;

// Re-export main types for external use
pub use bot::{BotBuilder, StagekeeperBot};
