//! Registry stores
//!
//! `ToolStore` is the key-based interface the dispatcher reads and writes
//! through. Every mutating call is one load-modify-save cycle, so a tool
//! record is never left half-updated.

use crate::errors::Result;
use crate::registry::document::RegistryDocument;
use crate::registry::types::{ToolDefinition, ToolUpdate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Persistent tool registry
pub trait ToolStore: Send {
    /// Read the whole registry
    fn load(&self) -> Result<RegistryDocument>;

    /// Replace the whole registry
    fn save(&mut self, doc: &RegistryDocument) -> Result<()>;

    /// All tools in registration order
    fn tools(&self) -> Result<Vec<ToolDefinition>> {
        Ok(self.load()?.tools)
    }

    /// One tool by case-insensitive name
    fn tool(&self, name: &str) -> Result<Option<ToolDefinition>> {
        Ok(self.load()?.find(name).cloned())
    }

    /// Apply a partial update to one tool
    fn update_tool(&mut self, name: &str, update: &ToolUpdate) -> Result<()> {
        let mut doc = self.load()?;
        doc.update_tool(name, update)?;
        debug!(tool = name, ?update, "registry update");
        self.save(&doc)
    }

    /// Current best tool name
    fn best(&self) -> Result<Option<String>> {
        Ok(self.load()?.best)
    }

    /// Set or clear the best tool
    fn set_best(&mut self, name: Option<&str>) -> Result<()> {
        let mut doc = self.load()?;
        doc.set_best(name)?;
        debug!(best = ?doc.best, "best tool updated");
        self.save(&doc)
    }

    /// Register a new tool
    fn add_tool(&mut self, tool: ToolDefinition) -> Result<()> {
        let mut doc = self.load()?;
        doc.add_tool(tool)?;
        self.save(&doc)
    }

    /// Delete a tool
    fn remove_tool(&mut self, name: &str) -> Result<ToolDefinition> {
        let mut doc = self.load()?;
        let removed = doc.remove_tool(name)?;
        self.save(&doc)?;
        Ok(removed)
    }
}

/// Volatile store, used for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    doc: RegistryDocument,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with tools in the given order
    pub fn with_tools(tools: Vec<ToolDefinition>) -> Self {
        Self {
            doc: RegistryDocument { best: None, tools },
        }
    }
}

impl ToolStore for MemoryStore {
    fn load(&self) -> Result<RegistryDocument> {
        Ok(self.doc.clone())
    }

    fn save(&mut self, doc: &RegistryDocument) -> Result<()> {
        self.doc = doc.clone();
        Ok(())
    }
}

/// JSON file store
///
/// A missing file reads as an empty registry. Writes go to a sibling temp
/// file which is then renamed over the target.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate a registry document from an arbitrary file
    pub fn read_document(path: &Path) -> Result<RegistryDocument> {
        let json = fs::read_to_string(path)?;
        let doc: RegistryDocument = serde_json::from_str(&json)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Write a registry document to an arbitrary file
    pub fn write_document(path: &Path, doc: &RegistryDocument) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(doc)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl ToolStore for FileStore {
    fn load(&self) -> Result<RegistryDocument> {
        if !self.path.exists() {
            return Ok(RegistryDocument::default());
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&mut self, doc: &RegistryDocument) -> Result<()> {
        Self::write_document(&self.path, doc)
    }
}
