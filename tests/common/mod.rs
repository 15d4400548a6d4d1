//! Shared fixtures for integration tests

#![allow(dead_code)]

use agent_dispatch::executor::{ExecMode, ExecutionResult, ToolRunner};
use agent_dispatch::notify::Notifier;
use agent_dispatch::registry::{Health, ToolDefinition};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Reply {
    Answer(String),
    Fail(String),
}

/// Runner that answers from a script instead of spawning processes
///
/// Replies are keyed by lowercase tool name, optionally narrowed to one
/// prompt. Unscripted tools fail.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: HashMap<(String, Option<String>), Reply>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, tool: &str, output: &str) -> Self {
        self.replies
            .insert((tool.to_lowercase(), None), Reply::Answer(output.to_string()));
        self
    }

    pub fn fail(mut self, tool: &str, error: &str) -> Self {
        self.replies
            .insert((tool.to_lowercase(), None), Reply::Fail(error.to_string()));
        self
    }

    pub fn answer_to(mut self, tool: &str, prompt: &str, output: &str) -> Self {
        self.replies.insert(
            (tool.to_lowercase(), Some(prompt.to_string())),
            Reply::Answer(output.to_string()),
        );
        self
    }

    pub fn fail_on(mut self, tool: &str, prompt: &str, error: &str) -> Self {
        self.replies.insert(
            (tool.to_lowercase(), Some(prompt.to_string())),
            Reply::Fail(error.to_string()),
        );
        self
    }

    /// (tool, prompt) pairs in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Tool names in call order
    pub fn tools_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|(tool, _)| tool).collect()
    }
}

#[async_trait]
impl ToolRunner for ScriptedRunner {
    async fn execute(&self, tool: &ToolDefinition, prompt: &str, _mode: ExecMode) -> ExecutionResult {
        self.calls
            .lock()
            .unwrap()
            .push((tool.name.clone(), prompt.to_string()));

        let name = tool.name.to_lowercase();
        let reply = self
            .replies
            .get(&(name.clone(), Some(prompt.to_string())))
            .or_else(|| self.replies.get(&(name, None)));

        let duration = Duration::from_millis(5);
        match reply {
            Some(Reply::Answer(output)) => ExecutionResult::success(output.clone(), duration),
            Some(Reply::Fail(error)) => ExecutionResult::failure(error.clone(), duration),
            None => ExecutionResult::failure("no scripted reply", duration),
        }
    }
}

/// Notifier that remembers which tools it was asked to announce
#[derive(Default)]
pub struct RecordingNotifier {
    notified: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn notified(&self) -> Vec<String> {
        self.notified.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, tool: &str) {
        self.notified.lock().unwrap().push(tool.to_string());
    }
}

/// Tool with explicit runtime state
pub fn tool(
    name: &str,
    okay: Health,
    time_taken: Option<f64>,
    last_ran: Option<DateTime<Utc>>,
) -> ToolDefinition {
    let mut tool = ToolDefinition::new(name, format!("{} -p", name), "");
    tool.okay = okay;
    tool.time_taken = time_taken;
    tool.last_ran = last_ran;
    tool
}
