//! Participant registry trait.
//!
//! The registry is the only resource shared between the chat receive thread and the
//! simulation tick. Implementations guard it with a single exclusive lock that is held
//! only for the duration of one mutation or one snapshot copy.

use super::Participant;

/// Ordered collection of unique participants.
#[cfg_attr(test, mockall::automock)]
pub trait ParticipantRegistry: Send + Sync {
    /// Append `name` with the next palette color unless it is empty or already present.
    ///
    /// Names are compared exactly (case-sensitive). Returns `true` when a participant was added.
    fn add_if_absent(&self, name: &str) -> bool;

    /// Remove every participant. The palette cursor keeps its position.
    fn clear(&self);

    /// Copy of the participants in insertion order.
    fn snapshot(&self) -> Vec<Participant>;

    /// Number of participants.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
