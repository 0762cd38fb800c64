//! Finova Assistant - Banking Demo Chat Backend
//!
//! This crate implements the conversational flow engine behind the Finova
//! bank demo assistant: intent routing, the loan verification wizard, and
//! the handoff to the external form service.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
