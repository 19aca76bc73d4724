//! A round's pick slot.
//!
//! The two placeholders are not catalog entries: `Empty` marks a round a
//! player skipped (a later real pick may overwrite it in place), `Unknown`
//! marks a pick nobody could resolve and has to be replaced explicitly.

use crate::roster::{FighterId, Roster};

/// What occupies one round slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Fighter(FighterId),
    Empty,
    Unknown,
}

impl Pick {
    /// Exact-literal sentinel parsing. Placeholder tokens never go
    /// through fuzzy resolution.
    pub fn from_token(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "empty" | "none" | "-" => Some(Self::Empty),
            "unknown" | "?" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn fighter(&self) -> Option<FighterId> {
        match self {
            Self::Fighter(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[allow(dead_code)]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Empty | Self::Unknown)
    }

    /// Display token for the match board.
    pub fn label(&self, roster: &Roster) -> &'static str {
        match self {
            Self::Fighter(id) => roster.name(*id),
            Self::Empty => "—",
            Self::Unknown => "???",
        }
    }
}
