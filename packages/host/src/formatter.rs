//! Text rendering of the wheel for the host console.

use std::time::Duration;

use spinwheel_core::{
    domain::{Celebration, Color, Participant, RoundPhase, RoundSnapshot},
    infrastructure::SessionState,
};

const RULE: &str = "============================================================";

/// Status formatter for the host console
pub struct StatusFormatter;

impl StatusFormatter {
    /// Human-readable name of a round phase
    pub fn format_phase(phase: RoundPhase) -> &'static str {
        match phase {
            RoundPhase::Closed => "closed",
            RoundPhase::Open => "open for joins",
            RoundPhase::Spinning => "spinning",
            RoundPhase::WinnerDisplay => "winner",
            RoundPhase::ResetHoldPending => "resetting",
        }
    }

    /// Format a color as `#rrggbb`
    pub fn format_color(color: Color) -> String {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    }

    /// Format the participant list
    ///
    /// # Arguments
    ///
    /// * `participants` - Participants in wheel order
    /// * `marked` - Index to mark, such as the highlighted slice or the winner
    ///
    /// # Returns
    ///
    /// One line per participant, or a placeholder when the wheel is empty
    pub fn format_participants(participants: &[Participant], marked: Option<usize>) -> String {
        if participants.is_empty() {
            return "(No participants)\n".to_string();
        }

        let mut output = String::new();
        for (index, participant) in participants.iter().enumerate() {
            let marker = if marked == Some(index) { ">" } else { " " };
            output.push_str(&format!(
                "{} {:>2}. {} [{}]\n",
                marker,
                index + 1,
                participant.name(),
                Self::format_color(participant.color())
            ));
        }
        output
    }

    /// Format the winner announcement
    pub fn format_winner(celebration: &Celebration) -> String {
        format!(
            "\n{}\n  Winner: {} [{}]\n  Type 'hold' and wait one second to start the next round\n{}\n",
            RULE,
            celebration.name,
            Self::format_color(celebration.color),
            RULE
        )
    }

    /// Format the full status view
    ///
    /// # Arguments
    ///
    /// * `snapshot` - Current round snapshot
    /// * `countdown` - Remaining join countdown, if running
    /// * `session` - Chat session state, or `None` without chat
    pub fn format_status(
        snapshot: &RoundSnapshot,
        countdown: Option<Duration>,
        session: Option<SessionState>,
    ) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", RULE));
        output.push_str(&format!("Phase: {}\n", Self::format_phase(snapshot.phase)));
        output.push_str(&format!(
            "Joins: {}",
            if snapshot.engagement_open { "open" } else { "closed" }
        ));
        if let Some(remaining) = countdown {
            output.push_str(&format!(" ({}s left)", remaining.as_secs()));
        }
        output.push('\n');

        output.push_str(&format!(
            "Wheel: {:.0}°{}\n",
            snapshot.rotation_angle.to_degrees(),
            if snapshot.is_spinning {
                format!(" at {:.1} rad/s", snapshot.angular_velocity)
            } else {
                String::new()
            }
        ));

        if let Some(celebration) = &snapshot.celebration {
            output.push_str(&format!(
                "Winner: {} [{}]\n",
                celebration.name,
                Self::format_color(celebration.color)
            ));
        }

        if snapshot.reset_hold.active {
            output.push_str(&format!(
                "Reset: {:.0}%\n",
                snapshot.reset_hold.progress() * 100.0
            ));
        }

        output.push_str(&format!(
            "Chat: {} / stream {}\n",
            match session {
                Some(state) => Self::format_session(state),
                None => "disabled",
            },
            if snapshot.authorized {
                "authorized"
            } else {
                "not authorized"
            }
        ));

        output.push_str(&format!("Participants ({}):\n", snapshot.participants.len()));
        let marked = snapshot.winner_index.or(snapshot.highlighted_index);
        output.push_str(&Self::format_participants(&snapshot.participants, marked));
        output.push_str(RULE);
        output.push('\n');
        output
    }

    fn format_session(state: SessionState) -> &'static str {
        match state {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::LoggedIn => "logged in",
            SessionState::Receiving => "connected",
            SessionState::Closed => "closed",
        }
    }
}
