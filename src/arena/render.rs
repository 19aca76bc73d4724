//! Platform-neutral display payload and the transport the engine renders
//! through.
//!
//! The engine never formats platform markup; it fills the generic fields
//! below and hands them to whatever `Transport` the process was wired
//! with. State is authoritative on the engine side: a failed send or edit
//! is reported, never rolled back.

use chrono::{DateTime, Utc};
use serenity::async_trait;

use crate::common::error::TransportResult;
use crate::common::types::ChannelKey;

/// Accent used while no real pick leads the match.
pub const NEUTRAL_COLOR: u32 = 0x99AAB5;

/// Upper bound on the estimated payload size before earliest rounds get
/// hidden. Chosen under the platform's 6000-char embed ceiling.
pub const MAX_PAYLOAD_LEN: usize = 5500;

/// One per-player block in the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderField {
    pub name: String,
    pub value: String,
}

/// The structured document a match renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPayload {
    pub title: String,
    pub description: Vec<String>,
    pub fields: Vec<RenderField>,
    pub footer: String,
    pub timestamp: DateTime<Utc>,
    pub color: u32,
}

impl RenderPayload {
    /// Rough character count used for the size-degradation loop.
    pub fn estimated_len(&self) -> usize {
        self.title.len()
            + self.description.iter().map(|l| l.len() + 1).sum::<usize>()
            + self
                .fields
                .iter()
                .map(|f| f.name.len() + f.value.len())
                .sum::<usize>()
            + self.footer.len()
    }
}

/// Identity of a live display message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHandle {
    pub channel: ChannelKey,
    pub message: u64,
}

/// Outbound side of the engine. Implemented by the Discord renderer and
/// by test doubles.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post a new display message.
    async fn send(&self, channel: ChannelKey, payload: &RenderPayload)
        -> TransportResult<MessageHandle>;

    /// Edit an existing display message in place.
    async fn edit(&self, handle: MessageHandle, payload: &RenderPayload) -> TransportResult<()>;

    /// Delete a message previously sent through this transport.
    async fn delete(&self, handle: MessageHandle) -> TransportResult<()>;

    /// Post a plain-text message whose handle the caller keeps.
    async fn send_text(&self, channel: ChannelKey, text: &str) -> TransportResult<MessageHandle>;

    /// Post a short-lived notice; the transport owns its cleanup.
    async fn notice(&self, channel: ChannelKey, text: &str) -> TransportResult<()>;
}
