//! Screen state published by the controllers for the presentation layer
//!
//! These snapshots form the output port from the application layer to the
//! view. Derived values (button visibility, history text) are computed from
//! the snapshot on demand, so they can never disagree with it.

use crate::config::DisplayConfig;
use crate::history::format_nights;
use sleep_domain::SleepNight;

/// A one-shot notification
///
/// The view handles a pending value once, then consumes it with
/// [`Pending::take`] or resets it with an acknowledge call on the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending<T> {
    Idle,
    Pending(T),
}

impl<T> Default for Pending<T> {
    fn default() -> Self {
        Pending::Idle
    }
}

impl<T> Pending<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Pending::Pending(_))
    }

    /// Borrow the pending value without consuming it.
    pub fn peek(&self) -> Option<&T> {
        match self {
            Pending::Pending(value) => Some(value),
            Pending::Idle => None,
        }
    }

    /// Consume the pending value, leaving the slot idle.
    pub fn take(&mut self) -> Option<T> {
        match std::mem::replace(self, Pending::Idle) {
            Pending::Pending(value) => Some(value),
            Pending::Idle => None,
        }
    }

    pub fn fire(&mut self, value: T) {
        *self = Pending::Pending(value);
    }

    pub fn acknowledge(&mut self) {
        *self = Pending::Idle;
    }
}

/// Transient notifications shown by the tracker screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snackbar {
    /// All sleep data was deleted
    Cleared,
}

impl Snackbar {
    pub fn message(&self) -> &'static str {
        match self {
            Snackbar::Cleared => "All your data is gone forever ((|)).",
        }
    }
}

/// Snapshot of the sleep tracker screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SleepScreenState {
    /// The session for tonight, if one was started on this screen visit
    pub tonight: Option<SleepNight>,
    /// Full history from the store, most recent first
    pub nights: Vec<SleepNight>,
    pub snackbar: Pending<Snackbar>,
    /// A just-stopped night whose rating screen should open
    pub navigation: Pending<SleepNight>,
    /// Message of the last failed action
    pub error: Pending<String>,
}

impl SleepScreenState {
    pub fn start_visible(&self) -> bool {
        self.tonight.is_none()
    }

    pub fn stop_visible(&self) -> bool {
        self.tonight.is_some()
    }

    pub fn clear_visible(&self) -> bool {
        !self.nights.is_empty()
    }

    /// Whether tonight's session is still running.
    pub fn is_tracking(&self) -> bool {
        self.tonight.as_ref().is_some_and(SleepNight::is_active)
    }

    pub fn formatted_history(&self, display: &DisplayConfig) -> String {
        format_nights(&self.nights, display)
    }
}

/// Snapshot of the sleep quality screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityScreenState {
    /// The rating was saved; return to the tracker screen
    pub navigate_back: Pending<()>,
    pub error: Pending<String>,
}
