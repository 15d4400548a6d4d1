//! Tool registry
//!
//! Tool definitions, their health/timing metadata and the best-tool pointer,
//! persisted as a single JSON document.

pub mod types;
pub mod document;
pub mod store;

pub use types::{Health, ToolDefinition, ToolUpdate};
pub use document::RegistryDocument;
pub use store::{FileStore, MemoryStore, ToolStore};
