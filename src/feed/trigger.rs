//! Load-more trigger state machine.
//!
//! One `VisibilityTrigger` exists per sort order. The active order's machine
//! watches the last rendered item of the displayed sequence and fires exactly
//! once each time that item becomes visible; while the resulting fetch is
//! outstanding it refuses to re-fire, which is what enforces the
//! at-most-one-in-flight-per-order guarantee.

use std::sync::Arc;

// ============================================================================
// State Machine
// ============================================================================

/// `Idle → Observing → Triggered → Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerState {
    /// Not watching any element.
    Idle,
    /// Watching the element currently rendered as the last displayed item.
    Observing { item: Arc<str> },
    /// A load-more request is outstanding; visibility events are ignored.
    Triggered,
}

#[derive(Debug)]
pub struct VisibilityTrigger {
    state: TriggerState,
}

impl Default for VisibilityTrigger {
    fn default() -> Self {
        Self {
            state: TriggerState::Idle,
        }
    }
}

impl VisibilityTrigger {
    pub fn state(&self) -> &TriggerState {
        &self.state
    }

    /// True while a load-more request minted by this trigger is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, TriggerState::Triggered)
    }

    /// Install an observation on `item`, tearing down any prior one.
    /// At most one element is observed at a time.
    ///
    /// Ignored while Triggered: the in-flight fetch owns the slot and
    /// re-attachment happens after [`complete`](Self::complete).
    pub fn observe(&mut self, item: Arc<str>) {
        match self.state {
            TriggerState::Triggered => {
                tracing::warn!(item = %item, "observe() while request outstanding, ignored");
                debug_assert!(false, "observe() called in Triggered state");
            }
            _ => self.state = TriggerState::Observing { item },
        }
    }

    /// Tear down the current observation.
    ///
    /// A Triggered machine stays Triggered: switching order cancels no
    /// in-flight fetch, and the completion still needs to release the slot.
    pub fn detach(&mut self) {
        if let TriggerState::Observing { .. } = self.state {
            self.state = TriggerState::Idle;
        }
    }

    /// Report that `item` crossed into the viewport. Returns true exactly
    /// when this crossing should start a load-more fetch: the machine must be
    /// Observing that same item. Repeat events on the same element while
    /// Triggered are ignored (guards against duplicate fetches from
    /// overlapping viewport events).
    pub fn notify_visible(&mut self, item: &str) -> bool {
        match &self.state {
            TriggerState::Observing { item: observed } if &**observed == item => {
                self.state = TriggerState::Triggered;
                true
            }
            TriggerState::Observing { item: observed } => {
                tracing::debug!(seen = %item, observed = %observed, "Visibility event for unobserved item");
                false
            }
            _ => false,
        }
    }

    /// The outstanding fetch completed (success or failure). Returns to Idle;
    /// the caller re-attaches if the displayed list changed. Completion
    /// without an outstanding request is a logic error.
    pub fn complete(&mut self) {
        if !matches!(self.state, TriggerState::Triggered) {
            tracing::error!(state = ?self.state, "complete() without outstanding request");
            debug_assert!(false, "complete() called in {:?}", self.state);
            return;
        }
        self.state = TriggerState::Idle;
    }
}

// ============================================================================
// Tests
// ============================================================================
