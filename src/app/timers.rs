//! Timer bookkeeping for the controller.
//!
//! The controller cannot sleep. It asks the host to start a timer with
//! [`Action::StartTimer`] and later receives `Event::TimerFired` with the same handle.
//! Handles are never reused, so a fire for a cancelled or already-fired timer is
//! recognized as unknown and ignored.

use crate::app::actions::Action;
use crate::ui::ControlId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Delays of the two navigation-highlight passes scheduled by every dispatch.
pub const NAV_HIGHLIGHT_DELAYS: [Duration; 2] = [Duration::from_millis(50), Duration::from_millis(200)];

/// How long a copy confirmation stays on its button.
pub const COPY_FEEDBACK: Duration = Duration::from_secs(2);

/// Opaque handle of a started timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// Why a timer was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerPurpose {
    /// Quiet period of the admin code capture.
    AdminDebounce,
    /// Deferred navigation highlight after a dispatch.
    NavHighlight,
    /// Restores a copy button label.
    CopyFeedback(ControlId),
}

/// Live timers and the handle counter.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    next: u64,
    active: BTreeMap<TimerHandle, TimerPurpose>,
}

impl Timers {
    /// Registers a timer and returns the action that starts it.
    pub fn start(&mut self, purpose: TimerPurpose, after: Duration) -> (TimerHandle, Action) {
        self.next += 1;
        let handle = TimerHandle(self.next);
        self.active.insert(handle, purpose);
        tracing::trace!(handle = handle.0, ?purpose, ?after, "timer started");
        (handle, Action::StartTimer { handle, after })
    }

    /// Forgets a timer and returns the action that cancels it, if it was live.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<Action> {
        self.active.remove(&handle).map(|_| Action::CancelTimer(handle))
    }

    /// Consumes a fired timer. Unknown handles yield `None`.
    pub fn fire(&mut self, handle: TimerHandle) -> Option<TimerPurpose> {
        self.active.remove(&handle)
    }

    /// Number of live timers with the given purpose.
    #[must_use]
    pub fn pending(&self, purpose: TimerPurpose) -> usize {
        self.active.values().filter(|p| **p == purpose).count()
    }
}
