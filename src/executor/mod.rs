//! Tool execution
//!
//! Template substitution is kept pure so it can be tested without spawning
//! anything; the runner owns process lifetime and timeouts.

pub mod template;
pub mod runner;

pub use template::{build_invocation, Invocation, PROMPT_PLACEHOLDER};
pub use runner::{ExecMode, ExecutionResult, ProcessRunner, ToolRunner};
