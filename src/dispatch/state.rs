//! Dispatch state machine
//!
//! Valid transitions:
//! 1. ResolveBest → AttemptBest  (on: BestResolved)
//! 2. ResolveBest → Exhausted    (on: NoWorkingTool)
//! 3. AttemptBest → Answered     (on: BestSucceeded)
//! 4. AttemptBest → Fallback     (on: BestFailed, autocheck on)
//! 5. AttemptBest → Exhausted    (on: BestFailed, autocheck off)
//! 6. Fallback    → Answered     (on: CandidateSucceeded)
//! 7. Fallback    → Exhausted    (on: CandidatesExhausted)
//!
//! `Answered` and `Exhausted` are terminal.

use crate::errors::{DispatchError, Result};

/// Dispatch states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchState {
    /// Working out which tool to try first
    ResolveBest,

    /// Running the best tool
    AttemptBest,

    /// Walking the latency-ranked alternatives
    Fallback,

    /// Some tool answered (terminal)
    Answered,

    /// No tool could answer (terminal)
    Exhausted,
}

/// Events that move the dispatcher between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEvent {
    BestResolved,
    NoWorkingTool,
    BestSucceeded,
    BestFailed { autocheck: bool },
    CandidateSucceeded,
    CandidatesExhausted,
}

impl DispatchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DispatchState::Answered | DispatchState::Exhausted)
    }

    /// Attempt a transition
    pub fn transition(&self, event: DispatchEvent) -> Result<DispatchState> {
        use DispatchEvent::*;
        use DispatchState::*;

        let next = match (self, event) {
            (ResolveBest, BestResolved) => AttemptBest,
            (ResolveBest, NoWorkingTool) => Exhausted,

            (AttemptBest, BestSucceeded) => Answered,
            (AttemptBest, BestFailed { autocheck: true }) => Fallback,
            (AttemptBest, BestFailed { autocheck: false }) => Exhausted,

            (Fallback, CandidateSucceeded) => Answered,
            (Fallback, CandidatesExhausted) => Exhausted,

            (from, event) => {
                return Err(DispatchError::InvalidTransition {
                    from: format!("{:?}", from),
                    event: format!("{:?}", event),
                })
            }
        };

        Ok(next)
    }
}
