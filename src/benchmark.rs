//! Benchmarker (`agent check`)
//!
//! Runs every eligible tool once, strictly one after another, with a fixed
//! prompt; records health and timing on each tool and re-elects the best.

use crate::console::Console;
use crate::errors::Result;
use crate::executor::{ExecMode, ToolRunner};
use crate::registry::{ToolStore, ToolUpdate};
use chrono::Utc;
use colored::Colorize;
use std::time::Instant;
use tracing::info;

/// Default prompt used to probe tools
pub const DEFAULT_BENCHMARK_PROMPT: &str = "What is 2+2? Reply with only the number.";

/// One tool's benchmark run
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkEntry {
    pub name: String,
    pub success: bool,
    pub seconds: f64,
    pub error: Option<String>,
}

/// Result of a full sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkReport {
    /// Entries in registration order
    pub entries: Vec<BenchmarkEntry>,

    /// Newly elected best tool, if any passed
    pub best: Option<String>,
}

impl BenchmarkReport {
    pub fn passed(&self) -> usize {
        self.entries.iter().filter(|e| e.success).count()
    }

    /// Fastest passing entry; the earliest registered wins a tie
    pub fn fastest(entries: &[BenchmarkEntry]) -> Option<&BenchmarkEntry> {
        entries
            .iter()
            .filter(|e| e.success)
            .min_by(|a, b| a.seconds.total_cmp(&b.seconds))
    }

    pub fn render(&self, console: &Console) {
        if self.entries.is_empty() {
            console.notice("No tools to check. Add one with `agent add`.");
            return;
        }

        for entry in &self.entries {
            match console {
                Console::Terminal => {
                    let status = if entry.success { "PASS".green() } else { "FAIL".red() };
                    println!(
                        "  {} {:<20} {}",
                        status,
                        entry.name,
                        format!("{:.1}s", entry.seconds).dimmed()
                    );
                    if let Some(error) = &entry.error {
                        println!("       {}", first_line(error).dimmed());
                    }
                }
                Console::Buffer(_) => console.info(&format!(
                    "{} {} {:.1}s",
                    if entry.success { "PASS" } else { "FAIL" },
                    entry.name,
                    entry.seconds
                )),
            }
        }

        match &self.best {
            Some(best) => console.success(&format!(
                "{}/{} tools passed. Best: {}",
                self.passed(),
                self.entries.len(),
                best
            )),
            None => console.error("No tools passed the benchmark."),
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text)
}

/// Sequential benchmark over the registry
pub struct Benchmarker<'a> {
    runner: &'a dyn ToolRunner,
    console: &'a Console,
    prompt: String,
    debug: bool,
}

impl<'a> Benchmarker<'a> {
    pub fn new(runner: &'a dyn ToolRunner, console: &'a Console, prompt: impl Into<String>) -> Self {
        Self {
            runner,
            console,
            prompt: prompt.into(),
            debug: false,
        }
    }

    /// Show resolved commands as tools are run
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Run every enabled tool (and disabled ones if asked)
    ///
    /// The best pointer is set to the fastest passing tool, or cleared when
    /// nothing passed.
    pub async fn run(&self, store: &mut dyn ToolStore, include_disabled: bool) -> Result<BenchmarkReport> {
        let candidates: Vec<_> = store
            .tools()?
            .into_iter()
            .filter(|t| t.enabled || include_disabled)
            .collect();

        info!(count = candidates.len(), "benchmark started");
        let mode = ExecMode::silent().with_debug(self.debug);
        let mut entries = Vec::with_capacity(candidates.len());

        for tool in &candidates {
            let spinner = self.console.spinner(&format!("Checking {}", tool.name));
            let started = Instant::now();
            let result = self.runner.execute(tool, &self.prompt, mode).await;
            let seconds = started.elapsed().as_secs_f64();
            spinner.finish_and_clear();

            let update = if result.success {
                ToolUpdate::success(seconds, Utc::now())
            } else {
                ToolUpdate::failure(result.error.clone(), Utc::now())
            };
            store.update_tool(&tool.name, &update)?;

            info!(tool = %tool.name, success = result.success, seconds, "benchmarked");
            entries.push(BenchmarkEntry {
                name: tool.name.clone(),
                success: result.success,
                seconds,
                error: result.error,
            });
        }

        let best = BenchmarkReport::fastest(&entries).map(|e| e.name.clone());
        store.set_best(best.as_deref())?;

        Ok(BenchmarkReport { entries, best })
    }
}
