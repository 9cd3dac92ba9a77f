//! Utilities shared by the Spinwheel binaries.

pub mod logger;
