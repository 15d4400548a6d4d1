//! Command-line argument parsing for agent
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::dispatch::DispatchOptions;
use crate::errors::{DispatchError, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

const EXAMPLES: &str = "Examples:
  $ agent \"What is the weather today?\"
  $ agent What is the weather today?
  $ agent --file ./path/to/prompt.txt
  $ agent \"Explain quantum computing\" --no-autocheck
  $ agent \"Explain this code\" --no-notify";

/// agent - Ask whichever AI command-line tool is currently fastest
#[derive(Parser, Debug)]
#[command(name = "agent")]
#[command(version)]
#[command(about = "A CLI-based app for inference from popular AI CLI tools", long_about = None)]
#[command(after_help = EXAMPLES)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    /// Prompt to send; multiple words are joined with spaces
    #[arg(value_name = "PROMPT")]
    pub prompt: Vec<String>,

    /// Read prompt from file
    #[arg(short, long, value_name = "FILE-PATH")]
    pub file: Option<PathBuf>,

    /// Skip automatic fallback if best tool fails
    #[arg(long)]
    pub no_autocheck: bool,

    /// Disable desktop notification when done
    #[arg(long)]
    pub no_notify: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new tool
    Add {
        /// Tool name
        #[arg(short, long)]
        name: String,

        /// Tool command
        #[arg(short, long)]
        command: String,

        /// Tool description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Edit an existing tool
    Edit {
        #[arg(value_name = "TOOL-NAME")]
        target: Option<String>,

        /// Tool to edit (alternative to positional arg)
        #[arg(short = 't', long = "tool-name")]
        tool_name: Option<String>,

        /// New tool name
        #[arg(short, long)]
        name: Option<String>,

        /// New tool command
        #[arg(short, long)]
        command: Option<String>,

        /// New tool description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a tool
    Delete {
        #[arg(value_name = "TOOL-NAME")]
        target: Option<String>,

        /// Tool to delete (alternative to positional arg)
        #[arg(short = 't', long = "tool-name")]
        tool_name: Option<String>,

        /// Confirm deletion
        #[arg(short, long)]
        yes: bool,
    },

    /// View detailed information about a tool
    View {
        #[arg(value_name = "TOOL-NAME")]
        tool_name: String,
    },

    /// List all tools
    List,

    /// Search for tools by name or description
    Find { query: String },

    /// Run all tools to benchmark and verify functionality
    Check {
        /// Show the commands being executed
        #[arg(long)]
        debug: bool,

        /// Include disabled tools in the benchmark
        #[arg(long)]
        include_disabled: bool,
    },

    /// Run a specific tool with an optional prompt
    Run {
        #[arg(value_name = "TOOL-NAME")]
        tool_name: String,

        prompt: Option<String>,

        /// Show the actual command being executed
        #[arg(long)]
        debug: bool,
    },

    /// Export configuration to a file
    Export { path: Option<PathBuf> },

    /// Import configuration from a file
    Import { path: PathBuf },

    /// Enable a tool
    Enable {
        #[arg(value_name = "TOOL-NAME")]
        tool_name: String,
    },

    /// Disable a tool
    Disable {
        #[arg(value_name = "TOOL-NAME")]
        tool_name: String,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Dispatch switches from the `--no-*` flags
    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            autocheck: !self.no_autocheck,
            notify: !self.no_notify,
        }
    }

    /// Prompt from `--file` or positional words; `None` when neither given
    pub fn resolve_prompt(&self) -> Result<Option<String>> {
        if let Some(path) = &self.file {
            return read_prompt_file(path).map(Some);
        }

        if self.prompt.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.prompt.join(" ")))
    }
}

/// Read a prompt file and flatten it into a single-line instruction
pub fn read_prompt_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DispatchError::Generic(format!(
            "File does not exist: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(DispatchError::Generic(format!(
            "Path is not a file: {}",
            path.display()
        )));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        DispatchError::Generic(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Ok(wrap_file_prompt(&contents))
}

/// Newlines become literal `\n` so the prompt stays one argument line
pub fn wrap_file_prompt(contents: &str) -> String {
    let single_line = contents.replace('\n', "\\n");
    format!(
        "Instructions: {}. Please follow these instructions exactly.",
        single_line.trim()
    )
}

impl Verbosity {
    /// Default tracing filter for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }
}
