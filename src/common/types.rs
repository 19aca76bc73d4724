//! Shared types used across the application.

/// Unique identifier for a match participant (the platform's user ID).
pub type MemberId = u64;

/// Unique identifier for the text channel a match lives in.
pub type ChannelKey = u64;

/// A match participant as supplied by the command surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: MemberId,
    /// Display name at the time the participant joined the match.
    pub name: String,
}

impl Participant {
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
