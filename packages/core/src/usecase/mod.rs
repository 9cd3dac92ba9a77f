//! UseCase layer: operations triggered by chat input and by the host.

pub mod join_participant;
pub mod round_machine;

pub use join_participant::{JoinOutcome, JoinParticipantUseCase};
pub use round_machine::{DEFAULT_COUNTDOWN_SECS, RoundSettings, RoundStateMachine};
