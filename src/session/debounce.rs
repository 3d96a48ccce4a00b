//! Debounce/gate state machine for live search-term input.
//!
//! Free text arrives character by character and must be coalesced so an
//! expensive backend does not see one request per keystroke; discrete
//! actions (facet toggles, page changes) are already coalesced events and
//! bypass the gate. The machine is pure: callers inject the clock, so
//! admission and suppression decisions are testable without timers.

use std::time::{Duration, Instant};
use strum::Display;
use tracing::debug;

/// Gate states. `Admitted`/`Suppressed` record the outcome of the most
/// recent deadline evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum GateState {
    Idle,
    Pending { term: String, deadline: Instant },
    Admitted { term: String },
    Suppressed { term: String },
}

/// Outcome of a deadline evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEvent {
    /// No transition occurred
    None,

    /// The term was admitted; issue exactly one query with it
    Admit { term: String },

    /// The term was below threshold. `cleared` is true when the previously
    /// admitted term was non-empty and has been reset to empty; when it was
    /// already empty there is nothing to clear and no action is needed.
    Suppress { cleared: bool },
}

pub struct DebounceGate {
    state: GateState,
    delay: Duration,
    min_term_len: usize,

    /// The current API-visible term: the last value actually admitted
    admitted: String,
}

impl DebounceGate {
    pub fn new(delay: Duration, min_term_len: usize) -> Self {
        Self {
            state: GateState::Idle,
            delay,
            min_term_len,
            admitted: String::new(),
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// The last admitted (API-visible) term
    pub fn admitted_term(&self) -> &str {
        &self.admitted
    }

    /// Record a keystroke: cancels any pending deadline and starts a fresh
    /// one, coalescing rapid typing into a single evaluation.
    pub fn keystroke(&mut self, term: impl Into<String>, now: Instant) {
        self.state = GateState::Pending {
            term: term.into(),
            deadline: now + self.delay,
        };
    }

    /// Evaluate the pending term once its deadline has elapsed
    pub fn poll(&mut self, now: Instant) -> GateEvent {
        let (term, deadline) = match &self.state {
            GateState::Pending { term, deadline } => (term.clone(), *deadline),
            _ => return GateEvent::None,
        };

        if now < deadline {
            return GateEvent::None;
        }

        let len = term.chars().count();
        if len == 0 || len >= self.min_term_len {
            self.admitted = term.clone();
            self.state = GateState::Admitted { term: term.clone() };
            GateEvent::Admit { term }
        } else {
            let cleared = !self.admitted.is_empty();
            self.admitted.clear();
            debug!(len, cleared, "search term below threshold, suppressed");
            self.state = GateState::Suppressed { term };
            GateEvent::Suppress { cleared }
        }
    }

    /// Discrete-action path: return the admitted term without waiting on the
    /// debounce. A pending burst keeps its deadline; otherwise the gate
    /// settles in `Admitted` with the current term.
    pub fn force_admit(&mut self) -> String {
        if !matches!(self.state, GateState::Pending { .. }) {
            self.state = GateState::Admitted {
                term: self.admitted.clone(),
            };
        }
        self.admitted.clone()
    }
}
