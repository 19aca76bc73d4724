//! Error types for the application.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Arena error: {0}")]
    Arena(#[from] ArenaError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Fighter catalog lookup errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("No fighter matches '{query}'")]
    NotFound { query: String },
}

/// Match engine errors.
///
/// Domain rule violations and command preconditions. None of these are
/// fatal and none of them leave the match partially mutated; they surface
/// to the caller as a short-lived notice.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArenaError {
    #[error("{fighter} cannot be picked: {reason}")]
    IllegalPick { fighter: String, reason: String },

    #[error("{fighter} cannot be banned: {reason}")]
    IllegalBan { fighter: String, reason: String },

    #[error("{fighter} is not currently banned")]
    NotBanned { fighter: String },

    #[error("No round {index} to act on")]
    NoSuchRound { index: usize },

    #[error("Round {index} is already marked as a win")]
    RoundAlreadyWon { index: usize },

    #[error("That round is a recorded win; undo the play (`z p`) or the win (`z w`)")]
    AmbiguousUndo,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Unknown mode '{name}' (use open, elimination, lockout, or horn)")]
    UnknownMode { name: String },

    #[error("Invalid {field}: {message}")]
    InvalidSetting { field: String, message: String },

    #[error("{name} is already in a match")]
    AlreadyInMatch { name: String },

    #[error("You are not in a match")]
    NotInMatch,

    #[error("That match lives in a different channel")]
    WrongChannel,

    #[error("The match is already wrapping up")]
    MatchEnding,

    #[error("A match needs at least two distinct players (got {got})")]
    NotEnoughPlayers { got: usize },

    #[error("You already left this match")]
    AlreadyInactive,

    #[error("You have not left this match")]
    StillActive,
}

/// Display transport errors.
///
/// Platform-neutral: the engine only sees these, never the underlying
/// client error type. A transport failure never rolls back match state.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to send display message: {message}")]
    SendFailed { message: String },

    #[error("Failed to edit display message: {message}")]
    EditFailed { message: String },

    #[error("Failed to delete display message: {message}")]
    DeleteFailed { message: String },
}

/// Result type alias using AppError.
#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for match engine operations.
pub type ArenaResult<T> = std::result::Result<T, ArenaError>;

/// Result type alias for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;
