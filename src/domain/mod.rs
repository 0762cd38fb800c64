//! Core domain logic, free of I/O and framework concerns.

pub mod flow;
pub mod wizard;
