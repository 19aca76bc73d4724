//! The match engine: fighters, rule modes, player and match state, the
//! registry, and the render/transport boundary.

pub mod game;
pub mod mode;
pub mod pick;
pub mod player;
pub mod registry;
pub mod render;
pub mod session;

pub use game::{EndVote, Game, Outcome};
pub use mode::Mode;
pub use pick::Pick;
pub use player::UndoKind;
pub use registry::{MatchRegistry, SharedSession};
pub use render::{MessageHandle, RenderPayload, Transport};
