//! Use-case handlers orchestrating domain logic over the ports.

pub mod chat_turn;
pub mod keyed_locks;

pub use chat_turn::{ChatTurnError, ChatTurnHandler, TurnRequest};
pub use keyed_locks::KeyedLocks;
