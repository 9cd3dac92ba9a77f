//! Participant entity and the wheel palette.

/// RGBA color of a wheel slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Slice colors, handed out round-robin.
pub const PALETTE: [Color; 4] = [
    Color::opaque(0, 100, 0), // dark green
    Color::opaque(100, 170, 120), // light green
    Color::opaque(255, 165, 0), // orange
    Color::opaque(240, 210, 60), // yellow
];

/// Free-running position in [`PALETTE`].
///
/// The cursor only ever moves forward. It is not reset when the wheel is cleared,
/// so a reseeded wheel does not repeat the previous round's colors slot for slot.
#[derive(Debug, Default, Clone)]
pub struct PaletteCursor {
    position: u64,
}

impl PaletteCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the color at the current position and advance.
    pub fn next_color(&mut self) -> Color {
        let index = (self.position % PALETTE.len() as u64) as usize;
        self.position = self.position.wrapping_add(1);
        PALETTE[index]
    }

    /// Number of colors handed out so far.
    pub fn position(&self) -> u64 {
        self.position
    }
}

/// An entrant of the current round.
///
/// Created on the first valid join (or host auto-seed) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    name: String,
    color: Color,
}

impl Participant {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }
}
