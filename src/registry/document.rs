//! In-memory registry document
//!
//! The whole registry (tool list plus best pointer) as one serializable value.
//! Stores load it, mutate it through these methods and write it back whole.

use crate::errors::{DispatchError, Result};
use crate::registry::types::{ToolDefinition, ToolUpdate};
use serde::{Deserialize, Serialize};

/// Persisted registry layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryDocument {
    /// Name of the currently preferred tool
    #[serde(default)]
    pub best: Option<String>,

    /// Tools in registration order
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
}

impl RegistryDocument {
    pub fn find(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.is_named(name))
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.tools
            .iter()
            .position(|t| t.is_named(name))
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))
    }

    /// Register a new tool
    pub fn add_tool(&mut self, tool: ToolDefinition) -> Result<()> {
        validate_definition(&tool)?;
        if self.find(&tool.name).is_some() {
            return Err(DispatchError::DuplicateTool(tool.name));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Apply a partial update to one tool
    ///
    /// Renames are checked for collisions and carry the best pointer along.
    pub fn update_tool(&mut self, name: &str, update: &ToolUpdate) -> Result<()> {
        let index = self.position(name)?;

        if let Some(new_name) = &update.name {
            if new_name.trim().is_empty() {
                return Err(DispatchError::InvalidTool("name cannot be empty".to_string()));
            }
            let collides = self
                .tools
                .iter()
                .enumerate()
                .any(|(i, t)| i != index && t.is_named(new_name));
            if collides {
                return Err(DispatchError::DuplicateTool(new_name.clone()));
            }
        }
        if let Some(command) = &update.command {
            if command.trim().is_empty() {
                return Err(DispatchError::InvalidTool("command cannot be empty".to_string()));
            }
        }

        let old_name = self.tools[index].name.clone();
        self.tools[index].apply(update);

        if let Some(new_name) = &update.name {
            if self.best_is(&old_name) {
                self.best = Some(new_name.clone());
            }
        }
        Ok(())
    }

    /// Remove a tool, clearing the best pointer if it pointed there
    pub fn remove_tool(&mut self, name: &str) -> Result<ToolDefinition> {
        let index = self.position(name)?;
        let removed = self.tools.remove(index);
        if self.best_is(&removed.name) {
            self.best = None;
        }
        Ok(removed)
    }

    /// Set or clear the best pointer; a name must reference a registered tool
    pub fn set_best(&mut self, name: Option<&str>) -> Result<()> {
        self.best = match name {
            Some(name) => Some(self.tools[self.position(name)?].name.clone()),
            None => None,
        };
        Ok(())
    }

    fn best_is(&self, name: &str) -> bool {
        self.best
            .as_deref()
            .map_or(false, |best| best.to_lowercase() == name.to_lowercase())
    }

    /// Check the whole document, as done before an import replaces the store
    pub fn validate(&self) -> Result<()> {
        for (i, tool) in self.tools.iter().enumerate() {
            validate_definition(tool)?;
            if self.tools[..i].iter().any(|t| t.is_named(&tool.name)) {
                return Err(DispatchError::DuplicateTool(tool.name.clone()));
            }
        }
        if let Some(best) = &self.best {
            if self.find(best).is_none() {
                return Err(DispatchError::UnknownTool(best.clone()));
            }
        }
        Ok(())
    }
}

fn validate_definition(tool: &ToolDefinition) -> Result<()> {
    if tool.name.trim().is_empty() {
        return Err(DispatchError::InvalidTool("name cannot be empty".to_string()));
    }
    if tool.command.trim().is_empty() {
        return Err(DispatchError::InvalidTool(format!(
            "command for '{}' cannot be empty",
            tool.name
        )));
    }
    Ok(())
}
