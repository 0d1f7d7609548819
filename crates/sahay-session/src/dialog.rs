//! Location sub-dialog state machine.
//!
//! A short, stateful interruption of normal Q&A: after the clinic flow is
//! begun, the next submitted text is read as a city name rather than a
//! free-form question.
//!
//! Transitions:
//! - Idle -> AwaitingLocation (begin clinic flow)
//! - AwaitingLocation -> AwaitingLocation (begin again: re-announce, no-op)
//! - AwaitingLocation -> Idle (city submitted)

use std::fmt;

/// State of the location sub-dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LocationDialog {
    /// Normal Q&A; submitted text goes to the assistant.
    #[default]
    Idle,
    /// The next submitted text is a city name for the clinic search.
    AwaitingLocation,
}

impl fmt::Display for LocationDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationDialog::Idle => write!(f, "Idle"),
            LocationDialog::AwaitingLocation => write!(f, "AwaitingLocation"),
        }
    }
}

impl LocationDialog {
    /// Whether the next submission is a location answer.
    pub fn is_awaiting(&self) -> bool {
        matches!(self, LocationDialog::AwaitingLocation)
    }

    /// Enter the awaiting state. Idempotent: beginning while already
    /// awaiting stays awaiting.
    pub fn begin(&mut self) {
        if !self.is_awaiting() {
            tracing::debug!("Location dialog: {} -> AwaitingLocation", self);
        }
        *self = LocationDialog::AwaitingLocation;
    }

    /// Return to idle after the location answer was consumed (or the
    /// conversation was reset).
    pub fn resolve(&mut self) {
        if self.is_awaiting() {
            tracing::debug!("Location dialog: AwaitingLocation -> Idle");
        }
        *self = LocationDialog::Idle;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let dialog = LocationDialog::default();
        assert_eq!(dialog, LocationDialog::Idle);
        assert!(!dialog.is_awaiting());
    }

    #[test]
    fn test_begin_then_resolve() {
        let mut dialog = LocationDialog::Idle;
        dialog.begin();
        assert!(dialog.is_awaiting());
        dialog.resolve();
        assert!(!dialog.is_awaiting());
    }

    #[test]
    fn test_begin_is_idempotent() {
        let mut dialog = LocationDialog::Idle;
        dialog.begin();
        dialog.begin();
        assert!(dialog.is_awaiting());
    }

    #[test]
    fn test_resolve_from_idle_stays_idle() {
        let mut dialog = LocationDialog::Idle;
        dialog.resolve();
        assert_eq!(dialog, LocationDialog::Idle);
    }

    #[test]
    fn test_display() {
        assert_eq!(LocationDialog::Idle.to_string(), "Idle");
        assert_eq!(
            LocationDialog::AwaitingLocation.to_string(),
            "AwaitingLocation"
        );
    }
}
