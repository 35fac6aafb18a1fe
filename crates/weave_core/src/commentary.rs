//! Commentary feed: the boundary to an external text-generation service.
//!
//! The physics engine never touches this. The service is a black box whose
//! only contract is "given a summary string, return a string or fail", with
//! failures classified as quota exhaustion versus everything else. The feed
//! wraps it with the polling discipline the orchestration layer needs: a
//! bounded newest-first log, at most one outstanding request, and an
//! explicit phase machine (active, cooling down, manually paused). The
//! cooldown entered on quota exhaustion suppresses further requests until
//! it is cleared explicitly.

use std::collections::VecDeque;
use thiserror::Error;

use crate::constants::COMMENTARY_LOG_CAPACITY;
use crate::profiles::VibrationProfiles;
use crate::state::SimulationState;
use crate::traits::Scalar;

/// Classified failure modes of the external text service.
#[derive(Debug, Error)]
pub enum CommentaryError {
    /// The service reported quota exhaustion; the caller should stop
    /// polling until the cooldown is cleared.
    #[error("commentary quota exhausted")]
    QuotaExhausted,
    /// Any other transient failure; the caller shows a fallback line.
    #[error("commentary service unavailable: {0}")]
    Unavailable(String),
}

/// The injectable black-box text service.
pub trait CommentarySource {
    fn bridge_commentary(&mut self, summary: &str) -> Result<String, CommentaryError>;
}

/// Phase of the polling state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FeedPhase {
    Active,
    CoolingDown,
    Paused,
}

/// Shown in place of a response on a generic service failure.
pub const FALLBACK_MESSAGE: &str = "Communication with higher dimensions interrupted.";

/// Logged when quota exhaustion forces the feed into cooldown.
pub const COOLDOWN_MESSAGE: &str =
    "Commentary quota exhausted. The bridge enters power-saving mode.";

/// Bounded commentary log plus the request-gating state machine.
pub struct CommentaryFeed {
    entries: VecDeque<String>,
    capacity: usize,
    phase: FeedPhase,
    in_flight: bool,
}

impl CommentaryFeed {
    pub fn new() -> Self {
        Self::with_capacity(COMMENTARY_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        CommentaryFeed {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            phase: FeedPhase::Active,
            in_flight: false,
        }
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    /// Newest entry first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a new request may be issued right now.
    pub fn should_request(&self) -> bool {
        self.phase == FeedPhase::Active && !self.in_flight
    }

    /// Marks a request as outstanding. Returns false (and changes nothing)
    /// if the feed is not accepting requests, which is how overlapping
    /// invocations are rejected.
    pub fn begin_request(&mut self) -> bool {
        if !self.should_request() {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn record_success(&mut self, message: &str) {
        self.in_flight = false;
        self.push(message.to_string());
    }

    pub fn record_failure(&mut self) {
        self.in_flight = false;
        self.push(FALLBACK_MESSAGE.to_string());
    }

    pub fn record_quota_exhausted(&mut self) {
        self.in_flight = false;
        self.phase = FeedPhase::CoolingDown;
        self.push(COOLDOWN_MESSAGE.to_string());
    }

    /// Manually clears a quota cooldown. No effect in other phases.
    pub fn clear_cooldown(&mut self) {
        if self.phase == FeedPhase::CoolingDown {
            self.phase = FeedPhase::Active;
        }
    }

    pub fn pause(&mut self) {
        self.phase = FeedPhase::Paused;
    }

    pub fn resume(&mut self) {
        if self.phase == FeedPhase::Paused {
            self.phase = FeedPhase::Active;
        }
    }

    /// Drives one guarded request against a source. Returns false if the
    /// gate rejected the request.
    pub fn poll<S: CommentarySource + ?Sized>(&mut self, source: &mut S, summary: &str) -> bool {
        if !self.begin_request() {
            return false;
        }
        match source.bridge_commentary(summary) {
            Ok(message) => self.record_success(&message),
            Err(CommentaryError::QuotaExhausted) => self.record_quota_exhausted(),
            Err(CommentaryError::Unavailable(_)) => self.record_failure(),
        }
        true
    }

    fn push(&mut self, message: String) {
        self.entries.push_front(message);
        self.entries.truncate(self.capacity);
    }
}

impl Default for CommentaryFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles the free-text state summary handed to the service.
pub fn summarize<T: Scalar>(state: &SimulationState<T>, profiles: &VibrationProfiles<T>) -> String {
    format!(
        "Vibration A: {:?}, Q-Charge: {:?}, Stability: {:?}",
        profiles.a(),
        state.total_charge,
        state.stability_ratio
    )
}
