//! Adapter implementations of the ports, plus the HTTP surface.

pub mod ai;
pub mod form_service;
pub mod http;
pub mod session;
