//! Domain layer: entities, value objects and pure functions of the wheel.

pub mod authorization;
pub mod chat_line;
pub mod config;
pub mod gate;
pub mod participant;
pub mod physics;
pub mod registry;
pub mod round;

pub use authorization::{ALLOWED_STREAMS, is_allowed};
pub use chat_line::{ChatLine, JOIN_COMMAND, is_join_command, parse_line};
pub use config::SessionConfig;
pub use gate::{CountdownTimer, EngagementGate, NoopCountdown};
pub use participant::{Color, PALETTE, PaletteCursor, Participant};
pub use physics::{SpinDraw, SpinState, SpinStep, resolve_winner_index, sanitize_dt};
pub use registry::ParticipantRegistry;
pub use round::{Celebration, HoldSource, ResetHold, RoundPhase, RoundSnapshot, RoundState, WinnerFlash};
