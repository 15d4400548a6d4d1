//! Selector / fallback orchestrator (the default `agent <prompt>` path)
//!
//! Picks the best tool (pointer, recent history, or a fresh benchmark),
//! runs it, and on failure walks the remaining tools fastest first until
//! one answers. Tool executions are strictly sequential.

use crate::benchmark::{Benchmarker, DEFAULT_BENCHMARK_PROMPT};
use crate::console::Console;
use crate::dispatch::state::{DispatchEvent, DispatchState};
use crate::errors::Result;
use crate::executor::{ExecMode, ExecutionResult, ToolRunner};
use crate::notify::Notifier;
use crate::registry::{ToolDefinition, ToolStore, ToolUpdate};
use chrono::Utc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Tunables for best-tool selection
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// How recent a successful run must be to skip benchmarking
    pub freshness: chrono::Duration,

    /// Prompt used if a benchmark has to run
    pub benchmark_prompt: String,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            freshness: chrono::Duration::hours(1),
            benchmark_prompt: DEFAULT_BENCHMARK_PROMPT.to_string(),
        }
    }
}

/// Per-invocation switches from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Fall back to other tools when the best one fails
    pub autocheck: bool,

    /// Show a desktop notification once answered
    pub notify: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            autocheck: true,
            notify: true,
        }
    }
}

/// Why no answer was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Benchmark found no working tool
    NoToolPassed,

    /// Best tool failed and fallback was disabled
    BestFailed { tool: String },

    /// Best tool and every fallback candidate failed
    AllFailed,
}

/// Final result of a dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Answered {
        tool: String,
        via_best: bool,
        output: String,
        elapsed: Duration,
    },
    Failed {
        reason: FailureReason,
    },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Answered { .. })
    }

    /// Process exit status: 0 when some tool answered
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Routes one prompt to a working tool
pub struct Dispatcher<'a> {
    store: &'a mut dyn ToolStore,
    runner: &'a dyn ToolRunner,
    notifier: &'a dyn Notifier,
    console: &'a Console,
    settings: DispatchSettings,
    state: DispatchState,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        store: &'a mut dyn ToolStore,
        runner: &'a dyn ToolRunner,
        notifier: &'a dyn Notifier,
        console: &'a Console,
    ) -> Self {
        Self {
            store,
            runner,
            notifier,
            console,
            settings: DispatchSettings::default(),
            state: DispatchState::ResolveBest,
        }
    }

    pub fn with_settings(mut self, settings: DispatchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Current state (terminal once `dispatch` returns)
    pub fn state(&self) -> DispatchState {
        self.state
    }

    fn advance(&mut self, event: DispatchEvent) -> Result<()> {
        let next = self.state.transition(event)?;
        debug!(from = ?self.state, to = ?next, ?event, "dispatch transition");
        self.state = next;
        Ok(())
    }

    /// Answer `prompt` with the best available tool
    pub async fn dispatch(&mut self, prompt: &str, options: DispatchOptions) -> Result<DispatchOutcome> {
        let started = Instant::now();
        self.state = DispatchState::ResolveBest;

        let best = match self.resolve_best().await? {
            Some(tool) => {
                self.advance(DispatchEvent::BestResolved)?;
                tool
            }
            None => {
                self.advance(DispatchEvent::NoWorkingTool)?;
                self.console.error("No tools passed the benchmark.");
                return Ok(DispatchOutcome::Failed {
                    reason: FailureReason::NoToolPassed,
                });
            }
        };

        info!(tool = %best.name, "attempting best tool");
        let result = self.runner.execute(&best, prompt, ExecMode::silent()).await;
        if result.success {
            self.advance(DispatchEvent::BestSucceeded)?;
            return Ok(self.answer(&best.name, true, result.output, started, options));
        }

        self.record_failure(&best.name, &result)?;
        self.advance(DispatchEvent::BestFailed {
            autocheck: options.autocheck,
        })?;

        if !options.autocheck {
            self.console.error(&format!(
                "{} failed: {}",
                best.name,
                result.error.as_deref().unwrap_or("unknown error")
            ));
            return Ok(DispatchOutcome::Failed {
                reason: FailureReason::BestFailed { tool: best.name },
            });
        }

        for candidate in self.fallback_candidates(&best.name)? {
            info!(tool = %candidate.name, "attempting fallback tool");
            let result = self.runner.execute(&candidate, prompt, ExecMode::silent()).await;
            if result.success {
                self.store.set_best(Some(&candidate.name))?;
                self.advance(DispatchEvent::CandidateSucceeded)?;
                return Ok(self.answer(&candidate.name, false, result.output, started, options));
            }
            self.record_failure(&candidate.name, &result)?;
        }

        self.advance(DispatchEvent::CandidatesExhausted)?;
        self.console.error("All tools failed to provide a response.");
        Ok(DispatchOutcome::Failed {
            reason: FailureReason::AllFailed,
        })
    }

    /// Best pointer, else freshest-fastest recent success, else benchmark
    async fn resolve_best(&mut self) -> Result<Option<ToolDefinition>> {
        if let Some(name) = self.store.best()? {
            match self.store.tool(&name)? {
                Some(tool) => return Ok(Some(tool)),
                None => {
                    warn!(best = %name, "best tool no longer registered");
                    self.store.set_best(None)?;
                }
            }
        }

        if let Some(tool) = self.recent_fastest()? {
            self.store.set_best(Some(&tool.name))?;
            self.console
                .success(&format!("Using cached best tool: {}", tool.name));
            return Ok(Some(tool));
        }

        self.console
            .notice("No best tool configured. Running benchmark...");
        let report = Benchmarker::new(self.runner, self.console, self.settings.benchmark_prompt.clone())
            .run(&mut *self.store, false)
            .await?;
        report.render(self.console);

        match report.best {
            Some(name) => self.store.tool(&name),
            None => Ok(None),
        }
    }

    /// Fastest tool that succeeded inside the freshness window
    fn recent_fastest(&self) -> Result<Option<ToolDefinition>> {
        let now = Utc::now();
        let freshness = self.settings.freshness;
        Ok(self
            .store
            .tools()?
            .into_iter()
            .filter(|t| t.is_fresh(now, freshness))
            .min_by(|a, b| a.speed_key().total_cmp(&b.speed_key())))
    }

    /// Previously-run, enabled tools other than `attempted`, fastest first
    fn fallback_candidates(&self, attempted: &str) -> Result<Vec<ToolDefinition>> {
        let mut candidates: Vec<_> = self
            .store
            .tools()?
            .into_iter()
            .filter(|t| t.okay.has_run() && t.enabled && !t.is_named(attempted))
            .collect();
        candidates.sort_by(|a, b| a.speed_key().total_cmp(&b.speed_key()));
        Ok(candidates)
    }

    fn record_failure(&mut self, name: &str, result: &ExecutionResult) -> Result<()> {
        warn!(tool = name, error = ?result.error, "tool failed");
        self.store
            .update_tool(name, &ToolUpdate::failure(result.error.clone(), Utc::now()))
    }

    fn answer(
        &self,
        tool: &str,
        via_best: bool,
        output: String,
        started: Instant,
        options: DispatchOptions,
    ) -> DispatchOutcome {
        let elapsed = started.elapsed();
        self.console.output(&output);
        self.console.answered(tool, via_best, elapsed);
        if options.notify {
            self.notifier.notify(tool);
        }
        DispatchOutcome::Answered {
            tool: tool.to_string(),
            via_best,
            output,
            elapsed,
        }
    }
}
