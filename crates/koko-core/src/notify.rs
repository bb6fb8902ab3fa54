//! # Notification and Loading Coordination
//!
//! Transient UI feedback: the single active notification banner and the
//! staged loading status sequence.
//!
//! ## Coordination Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Notification Lifecycle                                │
//! │                                                                         │
//! │  publish(A) ──► A displayed                                            │
//! │  publish(B) ──► A retired immediately, B displayed                     │
//! │  (3.5s after B's display) ──► current() returns None                   │
//! │                                                                         │
//! │  At most ONE banner is ever active. The dismiss window is measured     │
//! │  from display, and display happens at publish time.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both types are pure: callers pass the current instant in, so expiry and
//! cadence are computed, never scheduled. The loading sequence is cosmetic
//! and must never gate resolution completion.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{LOADING_STEP_MS, NOTIFICATION_DISMISS_MS};

// =============================================================================
// Notifications
// =============================================================================

/// Severity of a notification banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient notification banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Notification {
            severity,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notification::new(Severity::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notification::new(Severity::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notification::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification::new(Severity::Error, message)
    }
}

/// Serializes access to the single active banner.
///
/// Issuing a new notification immediately retires the current one; expiry is
/// computed from the display instant on read.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    active: Option<(Notification, Instant)>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        NotificationCenter { active: None }
    }

    /// Displays a notification, retiring any currently displayed one.
    pub fn publish(&mut self, notification: Notification, shown_at: Instant) {
        self.active = Some((notification, shown_at));
    }

    /// Returns the active banner, if it is still within its display window.
    pub fn current(&self, now: Instant) -> Option<&Notification> {
        let (notification, shown_at) = self.active.as_ref()?;
        let window = Duration::from_millis(NOTIFICATION_DISMISS_MS);
        if now.saturating_duration_since(*shown_at) < window {
            Some(notification)
        } else {
            None
        }
    }

    /// Retires the active banner without waiting for expiry.
    pub fn clear(&mut self) {
        self.active = None;
    }
}

// =============================================================================
// Loading Sequence
// =============================================================================

/// The ordered status strings cycled through while a resolution is in flight.
///
/// Purely cosmetic perceived-progress feedback: messages advance at a fixed
/// 900 ms cadence and clamp at the last one. Resolution completion is never
/// gated on this sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingSequence {
    messages: Vec<String>,
}

impl LoadingSequence {
    /// Builds a sequence from the given messages.
    ///
    /// Empty input falls back to the default set, so `status_at` can always
    /// return something to display.
    pub fn new(messages: Vec<String>) -> Self {
        if messages.is_empty() {
            return LoadingSequence::default();
        }
        LoadingSequence { messages }
    }

    /// Returns the status text for the given time since entering `Loading`.
    pub fn status_at(&self, elapsed: Duration) -> &str {
        let step = (elapsed.as_millis() / u128::from(LOADING_STEP_MS)) as usize;
        let index = step.min(self.messages.len() - 1);
        &self.messages[index]
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Default for LoadingSequence {
    fn default() -> Self {
        LoadingSequence {
            messages: vec![
                "Recognizing the product...".to_string(),
                "Searching the database...".to_string(),
                "Collecting reviews and ratings...".to_string(),
                "Preparing the analysis result...".to_string(),
            ],
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_replaces_active_banner() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::new();

        center.publish(Notification::info("first"), t0);
        center.publish(Notification::success("second"), t0);

        let current = center.current(t0).unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.severity, Severity::Success);
    }

    #[test]
    fn test_banner_expires_after_window() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::new();
        center.publish(Notification::warning("slow down"), t0);

        assert!(center.current(t0 + Duration::from_millis(3_499)).is_some());
        assert!(center.current(t0 + Duration::from_millis(3_500)).is_none());
    }

    #[test]
    fn test_window_is_measured_from_display() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::new();

        center.publish(Notification::info("first"), t0);
        // Re-publish two seconds later restarts the window
        center.publish(Notification::info("second"), t0 + Duration::from_secs(2));

        assert!(center.current(t0 + Duration::from_millis(5_000)).is_some());
        assert!(center.current(t0 + Duration::from_millis(5_500)).is_none());
    }

    #[test]
    fn test_clear_retires_immediately() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::new();
        center.publish(Notification::info("bye"), t0);
        center.clear();
        assert!(center.current(t0).is_none());
    }

    #[test]
    fn test_loading_sequence_cadence() {
        let seq = LoadingSequence::default();

        assert_eq!(seq.status_at(Duration::ZERO), "Recognizing the product...");
        assert_eq!(
            seq.status_at(Duration::from_millis(899)),
            "Recognizing the product..."
        );
        assert_eq!(
            seq.status_at(Duration::from_millis(900)),
            "Searching the database..."
        );
        assert_eq!(
            seq.status_at(Duration::from_millis(2_700)),
            "Preparing the analysis result..."
        );
    }

    #[test]
    fn test_loading_sequence_clamps_at_last_message() {
        let seq = LoadingSequence::default();
        assert_eq!(
            seq.status_at(Duration::from_secs(3_600)),
            "Preparing the analysis result..."
        );
    }

    #[test]
    fn test_empty_sequence_falls_back_to_default() {
        let seq = LoadingSequence::new(Vec::new());
        assert!(!seq.messages().is_empty());
    }
}
