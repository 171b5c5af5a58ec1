//! Deterministic race logic.
//!
//! Core modules never touch the terminal, the network or the clock. They
//! mutate in-memory state and push display updates through the sink traits in
//! [`sink`], which keeps every tick reproducible in tests.

pub mod contestant;
pub mod finish_line;
pub mod race;
pub mod sink;
pub mod steps;
pub mod types;
