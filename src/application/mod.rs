//! Application layer: use-case orchestration.

pub mod handlers;

pub use handlers::{ChatTurnError, ChatTurnHandler, TurnRequest};
