//! Covert admin elevation by blind keystroke capture.
//!
//! Printable keys typed while focus is outside any text-entry surface accumulate in a
//! bounded buffer. After a quiet period the buffer is offered to the backend as a
//! candidate code. A positive answer elevates the session for good: the durable flag
//! and the accepted code are persisted and the admin entry is revealed.
//!
//! # States
//!
//! ```text
//!            printable key            debounce fires (len >= min)
//!   Idle ───────────────────▶ Accumulating ───────────────────▶ verify request
//!    ▲                          │   ▲                               │
//!    └──── Escape / empty ──────┘   └──── invalid reply ────────────┤
//!                                                                   ▼ valid reply
//!                                                                Verified (sticky)
//! ```
//!
//! Validation failures are silent. Once verified, keystrokes are no longer captured.

use crate::api::ApiRequest;
use crate::app::actions::Action;
use crate::app::handler::{Key, KeyTarget};
use crate::app::timers::{TimerHandle, TimerPurpose, Timers};
use crate::domain::VerifyReply;
use crate::storage::DurableKey;
use std::time::Duration;

/// Shortest buffer that is worth validating.
pub const ADMIN_CODE_MIN_LEN: usize = 3;

/// Longest buffer kept; older characters slide out at the front.
pub const ADMIN_CODE_MAX_LEN: usize = 50;

/// Observable phase of the elevation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminPhase {
    Idle,
    Accumulating,
    Verified,
}

/// Elevation state of the session.
#[derive(Debug, Clone)]
pub struct AdminSession {
    verified: bool,
    buffer: String,
    pending_timer: Option<TimerHandle>,
    debounce: Duration,
}

impl AdminSession {
    /// Creates the session; `verified` comes from the durable flag.
    #[must_use]
    pub const fn new(verified: bool, debounce: Duration) -> Self {
        Self {
            verified,
            buffer: String::new(),
            pending_timer: None,
            debounce,
        }
    }

    #[must_use]
    pub fn phase(&self) -> AdminPhase {
        if self.verified {
            AdminPhase::Verified
        } else if self.buffer.is_empty() && self.pending_timer.is_none() {
            AdminPhase::Idle
        } else {
            AdminPhase::Accumulating
        }
    }

    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.verified
    }

    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub const fn pending_timer(&self) -> Option<TimerHandle> {
        self.pending_timer
    }

    /// Feeds one key press. Keys aimed at text-entry surfaces are never captured.
    ///
    /// # Returns
    ///
    /// Timer actions: a printable key cancels any pending debounce and starts a new
    /// one; Escape cancels the pending debounce.
    pub fn on_key(&mut self, key: &Key, target: KeyTarget, timers: &mut Timers) -> Vec<Action> {
        if target == KeyTarget::TextEntry || self.verified {
            return vec![];
        }

        let mut actions = vec![];
        match key {
            Key::Char(c) if !c.is_control() => {
                self.buffer.push(*c);
                let overflow = self.buffer.chars().count().saturating_sub(ADMIN_CODE_MAX_LEN);
                if overflow > 0 {
                    self.buffer = self.buffer.chars().skip(overflow).collect();
                }

                actions.extend(self.cancel_pending(timers));
                let (handle, start) = timers.start(TimerPurpose::AdminDebounce, self.debounce);
                self.pending_timer = Some(handle);
                actions.push(start);
            }
            Key::Backspace | Key::Delete => {
                self.buffer.pop();
            }
            Key::Escape => {
                self.buffer.clear();
                actions.extend(self.cancel_pending(timers));
            }
            _ => {}
        }

        tracing::trace!(len = self.buffer.chars().count(), phase = ?self.phase(), "admin capture");
        actions
    }

    fn cancel_pending(&mut self, timers: &mut Timers) -> Option<Action> {
        self.pending_timer.take().and_then(|handle| timers.cancel(handle))
    }

    /// Handles the debounce timer firing.
    ///
    /// # Returns
    ///
    /// The validation request when the buffer reached the minimum length.
    pub fn on_debounce(&mut self, handle: TimerHandle) -> Option<ApiRequest> {
        if self.pending_timer != Some(handle) {
            return None;
        }
        self.pending_timer = None;

        if self.verified || self.buffer.chars().count() < ADMIN_CODE_MIN_LEN {
            tracing::trace!("admin buffer below threshold");
            return None;
        }

        Some(ApiRequest::VerifyAdminCode { code: self.buffer.clone() })
    }

    /// Handles a validation reply for `code`.
    ///
    /// # Returns
    ///
    /// `Some(actions)` when the session just became verified: both durable writes and
    /// the admin-entry reveal. `None` otherwise, with the buffer untouched.
    pub fn on_verify_reply(&mut self, reply: VerifyReply, code: &str) -> Option<Vec<Action>> {
        if self.verified || !(reply.ok && reply.valid) {
            return None;
        }

        tracing::info!("admin session elevated");
        self.verified = true;
        self.buffer.clear();

        Some(vec![
            Action::RevealAdminEntry,
            Action::Persist { key: DurableKey::AdminVerified, value: "true".to_string() },
            Action::Persist { key: DurableKey::AdminCode, value: code.to_string() },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (AdminSession, Timers) {
        (AdminSession::new(false, Duration::from_millis(500)), Timers::default())
    }

    fn type_str(admin: &mut AdminSession, timers: &mut Timers, text: &str) -> Vec<Action> {
        text.chars()
            .flat_map(|c| admin.on_key(&Key::Char(c), KeyTarget::Document, timers))
            .collect()
    }

    #[test]
    fn below_threshold_issues_no_request() {
        let (mut admin, mut timers) = session();
        type_str(&mut admin, &mut timers, "ab");
        let handle = admin.pending_timer().unwrap();
        assert_eq!(timers.fire(handle), Some(TimerPurpose::AdminDebounce));
        assert_eq!(admin.on_debounce(handle), None);
        assert_eq!(admin.buffer(), "ab");
    }

    #[test]
    fn new_key_reschedules_instead_of_stacking() {
        let (mut admin, mut timers) = session();
        let actions = type_str(&mut admin, &mut timers, "abc");
        let starts = actions.iter().filter(|a| matches!(a, Action::StartTimer { .. })).count();
        let cancels = actions.iter().filter(|a| matches!(a, Action::CancelTimer(_))).count();
        assert_eq!((starts, cancels), (3, 2));
        assert_eq!(timers.pending(TimerPurpose::AdminDebounce), 1);
    }

    #[test]
    fn text_entry_keys_are_ignored() {
        let (mut admin, mut timers) = session();
        assert!(admin.on_key(&Key::Char('x'), KeyTarget::TextEntry, &mut timers).is_empty());
        assert_eq!(admin.phase(), AdminPhase::Idle);
    }

    #[test]
    fn backspace_never_underflows() {
        let (mut admin, mut timers) = session();
        admin.on_key(&Key::Backspace, KeyTarget::Document, &mut timers);
        type_str(&mut admin, &mut timers, "ab");
        admin.on_key(&Key::Delete, KeyTarget::Document, &mut timers);
        assert_eq!(admin.buffer(), "a");
    }

    #[test]
    fn escape_clears_and_cancels() {
        let (mut admin, mut timers) = session();
        type_str(&mut admin, &mut timers, "abcd");
        let handle = admin.pending_timer().unwrap();

        let actions = admin.on_key(&Key::Escape, KeyTarget::Document, &mut timers);
        assert_eq!(actions, vec![Action::CancelTimer(handle)]);
        assert_eq!(admin.phase(), AdminPhase::Idle);
        assert_eq!(timers.fire(handle), None);
    }

    #[test]
    fn buffer_slides_at_max_length() {
        let (mut admin, mut timers) = session();
        let long: String = std::iter::repeat('a').take(ADMIN_CODE_MAX_LEN).collect();
        type_str(&mut admin, &mut timers, &long);
        type_str(&mut admin, &mut timers, "xyz");
        assert_eq!(admin.buffer().chars().count(), ADMIN_CODE_MAX_LEN);
        assert!(admin.buffer().ends_with("xyz"));
    }

    #[test]
    fn invalid_reply_keeps_buffer() {
        let (mut admin, mut timers) = session();
        type_str(&mut admin, &mut timers, "nope");
        assert!(admin.on_verify_reply(VerifyReply { ok: true, valid: false }, "nope").is_none());
        assert_eq!(admin.buffer(), "nope");
        assert!(!admin.is_verified());
    }

    #[test]
    fn valid_reply_is_sticky_and_stops_capture() {
        let (mut admin, mut timers) = session();
        type_str(&mut admin, &mut timers, "s3cret");
        let actions = admin.on_verify_reply(VerifyReply { ok: true, valid: true }, "s3cret").unwrap();
        assert!(actions.contains(&Action::Persist { key: DurableKey::AdminCode, value: "s3cret".into() }));
        assert_eq!(admin.phase(), AdminPhase::Verified);
        assert_eq!(admin.buffer(), "");
        assert!(type_str(&mut admin, &mut timers, "more").is_empty());
    }
}
