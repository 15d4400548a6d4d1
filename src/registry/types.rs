//! Tool registry types
//!
//! Core types for configured tools, their health and partial updates.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Health of a tool as of its most recent run
///
/// Persisted as `true` / `false` / `null` so registry files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Health {
    /// Tool has never been executed
    #[default]
    NeverRun,

    /// Last run succeeded
    Succeeded,

    /// Last run failed
    Failed,
}

impl Health {
    /// Whether the tool has been attempted at least once
    pub fn has_run(&self) -> bool {
        !matches!(self, Health::NeverRun)
    }

    /// Short label for listings
    pub fn label(&self) -> &'static str {
        match self {
            Health::NeverRun => "never run",
            Health::Succeeded => "ok",
            Health::Failed => "failing",
        }
    }
}

impl From<Option<bool>> for Health {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Health::NeverRun,
            Some(true) => Health::Succeeded,
            Some(false) => Health::Failed,
        }
    }
}

impl From<Health> for Option<bool> {
    fn from(value: Health) -> Self {
        match value {
            Health::NeverRun => None,
            Health::Succeeded => Some(true),
            Health::Failed => Some(false),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// A configured external AI command-line tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name, compared case-insensitively
    pub name: String,

    /// Command template the prompt is substituted into
    pub command: String,

    /// Free-text description (display only)
    #[serde(default)]
    pub description: String,

    /// Disabled tools are skipped by check and fallback
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Health flag from the most recent run
    #[serde(default)]
    pub okay: Health,

    /// When the tool was last executed
    #[serde(default)]
    pub last_ran: Option<DateTime<Utc>>,

    /// Failure detail from the most recent failed run
    #[serde(default)]
    pub last_error: Option<String>,

    /// Seconds taken by the most recent successful run
    #[serde(default)]
    pub time_taken: Option<f64>,
}

impl ToolDefinition {
    /// Create a new, never-run, enabled tool
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            description: description.into(),
            enabled: true,
            okay: Health::NeverRun,
            last_ran: None,
            last_error: None,
            time_taken: None,
        }
    }

    /// Case-insensitive name comparison
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Succeeded within `window` of `now` and has a recorded time
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.okay == Health::Succeeded
            && self.time_taken.is_some()
            && self.last_ran.map_or(false, |ran| ran > now - window)
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: &ToolUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(command) = &update.command {
            self.command = command.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(enabled) = update.enabled {
            self.enabled = enabled;
        }
        if let Some(okay) = update.okay {
            self.okay = okay;
        }
        if let Some(last_ran) = update.last_ran {
            self.last_ran = Some(last_ran);
        }
        if let Some(last_error) = &update.last_error {
            self.last_error = last_error.clone();
        }
        if let Some(time_taken) = update.time_taken {
            self.time_taken = Some(time_taken);
        }
    }

    /// Ranking key for fallback ordering; unrecorded times sort last
    pub fn speed_key(&self) -> f64 {
        self.time_taken.unwrap_or(f64::INFINITY)
    }
}

/// Partial update of a tool record
///
/// `None` leaves a field untouched. `last_error: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolUpdate {
    pub name: Option<String>,
    pub command: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub okay: Option<Health>,
    pub last_ran: Option<DateTime<Utc>>,
    pub last_error: Option<Option<String>>,
    pub time_taken: Option<f64>,
}

impl ToolUpdate {
    /// Runtime fields after a successful run
    pub fn success(seconds: f64, now: DateTime<Utc>) -> Self {
        Self {
            okay: Some(Health::Succeeded),
            last_ran: Some(now),
            last_error: Some(None),
            time_taken: Some(seconds),
            ..Default::default()
        }
    }

    /// Runtime fields after a failed run; `time_taken` is left alone
    pub fn failure(error: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            okay: Some(Health::Failed),
            last_ran: Some(now),
            last_error: Some(error),
            ..Default::default()
        }
    }

    /// Toggle the enabled flag
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    /// Whether any field would change
    pub fn is_empty(&self) -> bool {
        *self == ToolUpdate::default()
    }
}
