//! Round state of the wheel and the read-only snapshot handed to presentation.

use super::{Color, Participant, SpinState};

/// How long the reset input must be held, in seconds.
pub const RESET_HOLD_SECS: f32 = 1.0;

/// How long the winning slice blinks, in seconds.
pub const WINNER_FLASH_SECS: f32 = 2.0;

/// Half period of the winner blink, in seconds.
pub const WINNER_FLASH_PERIOD_SECS: f32 = 0.15;

/// Phase of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// Joins closed, no winner shown. Initial phase.
    Closed,
    /// Joins open.
    Open,
    /// The wheel is turning.
    Spinning,
    /// The wheel stopped and a winner is shown.
    WinnerDisplay,
    /// A winner is shown and the reset input is being held.
    ResetHoldPending,
}

/// Input that started a reset hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HoldSource {
    #[default]
    None,
    Key,
    Pointer,
}

/// Progress of the reset gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResetHold {
    pub active: bool,
    /// Seconds held so far
    pub elapsed: f32,
    pub source: HoldSource,
}

impl ResetHold {
    pub fn begin(&mut self, source: HoldSource) {
        *self = Self {
            active: true,
            elapsed: 0.0,
            source,
        };
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Fraction of [`RESET_HOLD_SECS`] held, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if !self.active {
            return 0.0;
        }
        (self.elapsed / RESET_HOLD_SECS).clamp(0.0, 1.0)
    }
}

/// Square-wave blink of the winning slice.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WinnerFlash {
    /// Seconds of blinking left
    pub remaining: f32,
    /// Seconds since the blink was armed
    pub elapsed: f32,
}

impl WinnerFlash {
    pub fn arm(&mut self) {
        self.remaining = WINNER_FLASH_SECS;
        self.elapsed = 0.0;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.is_active() {
            return;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        self.elapsed += dt;
    }

    /// Whether the slice is lit. Visibility toggles every [`WINNER_FLASH_PERIOD_SECS`].
    pub fn is_on(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        let phase = (self.elapsed / WINNER_FLASH_PERIOD_SECS).floor() as u64;
        phase % 2 == 0
    }
}

/// Winner shown after the wheel stops.
///
/// Holds a copy of the winning participant, so it survives a registry clear.
#[derive(Debug, Clone, PartialEq)]
pub struct Celebration {
    pub name: String,
    pub color: Color,
    /// Seconds since the winner was resolved
    pub elapsed: f32,
}

impl Celebration {
    pub fn new(winner: &Participant) -> Self {
        Self {
            name: winner.name().to_string(),
            color: winner.color(),
            elapsed: 0.0,
        }
    }
}

/// State owned by the round state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundState {
    pub spin: SpinState,
    pub winner_index: Option<usize>,
    pub celebration: Option<Celebration>,
    pub flash: WinnerFlash,
    pub reset_hold: ResetHold,
}

impl RoundState {
    pub fn is_winner_displayed(&self) -> bool {
        self.celebration.is_some() || self.winner_index.is_some()
    }

    /// Phase of the round given the current gate state.
    pub fn phase(&self, engagement_open: bool) -> RoundPhase {
        if self.reset_hold.active && self.is_winner_displayed() {
            RoundPhase::ResetHoldPending
        } else if self.is_winner_displayed() {
            RoundPhase::WinnerDisplay
        } else if self.spin.spinning {
            RoundPhase::Spinning
        } else if engagement_open {
            RoundPhase::Open
        } else {
            RoundPhase::Closed
        }
    }

    /// Drop the winner and all post-spin timers.
    pub fn clear_winner(&mut self) {
        self.winner_index = None;
        self.celebration = None;
        self.flash.clear();
        self.reset_hold.cancel();
    }

    /// Advance an active reset hold by `dt` seconds.
    ///
    /// Returns `true` when the hold reaches [`RESET_HOLD_SECS`]; the hold is cleared then.
    /// A hold with no winner displayed is cancelled instead. Holds only begin while a winner is
    /// shown and [`RoundState::clear_winner`] cancels them, so that case needs a state built
    /// field by field.
    pub fn advance_reset_hold(&mut self, dt: f32) -> bool {
        if !self.reset_hold.active {
            return false;
        }
        if !self.is_winner_displayed() {
            self.reset_hold.cancel();
            return false;
        }

        self.reset_hold.elapsed += dt;
        if self.reset_hold.elapsed < RESET_HOLD_SECS {
            return false;
        }

        self.reset_hold.cancel();
        true
    }
}

/// Read-only copy of everything presentation needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub participants: Vec<Participant>,
    pub rotation_angle: f32,
    pub angular_velocity: f32,
    pub is_spinning: bool,
    /// Slice under the pointer while spinning
    pub highlighted_index: Option<usize>,
    pub winner_index: Option<usize>,
    pub celebration: Option<Celebration>,
    pub engagement_open: bool,
    pub flash_on: bool,
    pub flash_remaining: f32,
    pub reset_hold: ResetHold,
    pub authorized: bool,
}
