//! Console rendering
//!
//! The dispatcher and benchmarker print through `Console` so the same code
//! can write to the terminal or into a buffer that tests inspect.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Where user-facing output goes
#[derive(Clone)]
pub enum Console {
    /// Colored terminal output
    Terminal,

    /// Plain lines collected in memory
    Buffer(Arc<Mutex<Vec<String>>>),
}

impl Console {
    pub fn terminal() -> Self {
        Self::Terminal
    }

    pub fn buffer() -> Self {
        Self::Buffer(Arc::new(Mutex::new(Vec::new())))
    }

    fn push(&self, line: String) {
        if let Self::Buffer(lines) = self {
            if let Ok(mut lines) = lines.lock() {
                lines.push(line);
            }
        }
    }

    /// Captured lines (always empty for the terminal)
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Terminal => Vec::new(),
            Self::Buffer(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
        }
    }

    /// Tool answer text, printed verbatim
    pub fn output(&self, text: &str) {
        match self {
            Self::Terminal => println!("{}", text),
            Self::Buffer(_) => self.push(text.to_string()),
        }
    }

    pub fn info(&self, message: &str) {
        match self {
            Self::Terminal => println!("{}", message),
            Self::Buffer(_) => self.push(message.to_string()),
        }
    }

    pub fn success(&self, message: &str) {
        match self {
            Self::Terminal => println!("{}", message.green()),
            Self::Buffer(_) => self.push(message.to_string()),
        }
    }

    pub fn notice(&self, message: &str) {
        match self {
            Self::Terminal => println!("{}", message.yellow()),
            Self::Buffer(_) => self.push(message.to_string()),
        }
    }

    pub fn error(&self, message: &str) {
        match self {
            Self::Terminal => eprintln!("{}", message.red()),
            Self::Buffer(_) => self.push(message.to_string()),
        }
    }

    /// Dimmed secondary detail
    pub fn detail(&self, message: &str) {
        match self {
            Self::Terminal => println!("{}", message.dimmed()),
            Self::Buffer(_) => self.push(message.to_string()),
        }
    }

    /// Closing line after an answer
    pub fn answered(&self, tool: &str, via_best: bool, elapsed: Duration) {
        let line = answered_line(tool, via_best, elapsed);
        match self {
            Self::Terminal => println!("\n{}", line.dimmed().italic()),
            Self::Buffer(_) => self.push(line),
        }
    }

    /// Spinner on stderr for long-running steps; hidden when buffering
    pub fn spinner(&self, message: &str) -> ProgressBar {
        match self {
            Self::Terminal => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.cyan} {msg} {elapsed:.dim}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                pb.set_message(message.to_string());
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            }
            Self::Buffer(_) => ProgressBar::hidden(),
        }
    }
}

/// `Answered via CLAUDE (BEST) in 1.2s`
pub fn answered_line(tool: &str, via_best: bool, elapsed: Duration) -> String {
    format!(
        "Answered via {}{} in {:.1}s",
        tool.to_uppercase(),
        if via_best { " (BEST)" } else { "" },
        elapsed.as_secs_f64()
    )
}
