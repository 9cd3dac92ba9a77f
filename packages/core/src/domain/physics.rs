//! Spin physics and winner resolution.
//!
//! The wheel rotates at `angular_velocity` rad/s and slows down under constant
//! (linear) friction. When it stops, the slice under the fixed pointer wins.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::Range;

use rand::Rng;

/// Bearing of the pointer in wheel space: 12 o'clock.
pub const POINTER_BEARING: f32 = -FRAC_PI_2;

/// Initial angular velocity range of a spin, in rad/s.
pub const SPIN_SPEED_RANGE: Range<f32> = 10.0..13.0;

/// Friction range of a spin, in rad/s².
pub const SPIN_FRICTION_RANGE: Range<f32> = 1.8..5.6;

/// Friction used before the first spin is drawn.
pub const DEFAULT_FRICTION: f32 = 3.0;

/// Wrap an angle into `[0, 2π)`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Clamp a time step to a usable value: negative, NaN and infinite steps become zero.
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.max(0.0) } else { 0.0 }
}

/// Index of the slice under the pointer for a wheel rotated by `rotation_angle`.
///
/// Slices are `2π / participant_count` wide, laid out in insertion order from angle 0.
/// Returns `None` for an empty wheel. The index is clamped to the last slice to absorb
/// rounding at the exact boundary.
///
/// # Examples
///
/// ```
/// use spinwheel_core::domain::resolve_winner_index;
///
/// // Rotating the wheel forward moves earlier slices under the pointer.
/// assert_eq!(resolve_winner_index(0.1, 4), Some(2));
/// assert_eq!(resolve_winner_index(0.0, 0), None);
/// ```
pub fn resolve_winner_index(rotation_angle: f32, participant_count: usize) -> Option<usize> {
    if participant_count == 0 {
        return None;
    }

    let slice_width = TAU / participant_count as f32;
    let pointer = wrap_angle(POINTER_BEARING - rotation_angle);
    let index = (pointer / slice_width).floor() as usize;

    Some(index.min(participant_count - 1))
}

/// Randomized launch parameters of one spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinDraw {
    pub angular_velocity: f32,
    pub friction: f32,
}

impl SpinDraw {
    /// Draw velocity and friction uniformly from [`SPIN_SPEED_RANGE`] and [`SPIN_FRICTION_RANGE`].
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let friction = rng.gen_range(SPIN_FRICTION_RANGE);
        let angular_velocity = rng.gen_range(SPIN_SPEED_RANGE);
        Self {
            angular_velocity,
            friction,
        }
    }
}

/// Result of advancing the wheel by one time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinStep {
    /// The wheel was not spinning.
    Idle,
    /// The wheel is still turning.
    Rolling,
    /// The wheel came to rest during this step.
    Stopped { winner: Option<usize> },
}

/// Rotation state of the wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinState {
    /// Radians in `[0, 2π)`
    pub rotation_angle: f32,
    /// Radians per second, never negative
    pub angular_velocity: f32,
    /// Radians per second squared
    pub friction: f32,
    pub spinning: bool,
}

impl Default for SpinState {
    fn default() -> Self {
        Self {
            rotation_angle: 0.0,
            angular_velocity: 0.0,
            friction: DEFAULT_FRICTION,
            spinning: false,
        }
    }
}

impl SpinState {
    /// Set the wheel turning with the drawn parameters. The angle carries over.
    pub fn launch(&mut self, draw: SpinDraw) {
        self.angular_velocity = draw.angular_velocity;
        self.friction = draw.friction;
        self.spinning = true;
    }

    /// Bring the wheel to rest without resolving a winner.
    pub fn halt(&mut self) {
        self.angular_velocity = 0.0;
        self.spinning = false;
    }

    /// Integrate one step of `dt` seconds.
    ///
    /// Negative or non-finite `dt` is treated as zero. Friction below zero is treated as zero, so the
    /// velocity never grows. [`SpinStep::Stopped`] is returned exactly once per spin,
    /// on the step where the velocity reaches zero, carrying the slice under the pointer.
    pub fn advance(&mut self, dt: f32, participant_count: usize) -> SpinStep {
        if !self.spinning {
            return SpinStep::Idle;
        }
        let dt = sanitize_dt(dt);

        self.rotation_angle = wrap_angle(self.rotation_angle + self.angular_velocity * dt);
        self.angular_velocity -= self.friction.max(0.0) * dt;

        if self.angular_velocity <= 0.0 {
            self.halt();
            return SpinStep::Stopped {
                winner: resolve_winner_index(self.rotation_angle, participant_count),
            };
        }

        SpinStep::Rolling
    }

    /// Slice currently under the pointer while the wheel turns.
    pub fn highlighted_index(&self, participant_count: usize) -> Option<usize> {
        if !self.spinning {
            return None;
        }
        resolve_winner_index(self.rotation_angle, participant_count)
    }
}
