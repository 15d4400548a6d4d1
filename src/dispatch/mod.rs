//! Prompt dispatch: best-tool selection with latency-ranked fallback

pub mod state;
pub mod orchestrator;

pub use state::{DispatchEvent, DispatchState};
pub use orchestrator::{
    DispatchOptions, DispatchOutcome, DispatchSettings, Dispatcher, FailureReason,
};
