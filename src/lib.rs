//! agent-dispatch
//!
//! Routes a prompt to one of several installed AI command-line tools,
//! preferring the historically fastest working one and falling back
//! through the rest when it fails.
//!
//! # Architecture
//!
//! - **executor**: runs one tool against one prompt
//! - **benchmark**: sweeps all tools and elects the best
//! - **dispatch**: best-tool selection and fallback state machine
//! - **registry**: persisted tool definitions and the best pointer

pub mod errors;
pub mod registry;
pub mod executor;
pub mod benchmark;
pub mod dispatch;

// Re-export commonly used types
pub use errors::{DispatchError, Result};

// Terminal-facing layer
pub mod console;
pub mod notify;
pub mod cli;
pub mod commands;
pub mod logging;
