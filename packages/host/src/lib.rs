//! Headless host for the Spinwheel chat lottery.
//!
//! Wires the core together: console commands stand in for key and pointer input, a
//! fixed-interval loop drives the round state machine, and the status view renders
//! the snapshot as text.

pub mod console;
pub mod countdown;
pub mod formatter;
pub mod runner;
pub mod signal;

pub use runner::{HostOptions, run_host};
