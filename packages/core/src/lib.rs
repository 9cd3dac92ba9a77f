//! Core of the Spinwheel chat lottery.
//!
//! Viewers join a wheel by sending `!join` in chat while the host keeps joins open;
//! the host then spins the wheel and a winner is resolved from the final rotation.

// layers
pub mod domain;
pub mod infrastructure;
pub mod usecase;
