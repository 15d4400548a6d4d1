//! Desktop notification when an answer is ready
//!
//! Fire-and-forget: the notifier process is spawned and never waited on,
//! and every error is dropped.

use std::process::{Command, Stdio};
use tracing::debug;

/// Announces that a tool finished answering
pub trait Notifier: Send + Sync {
    fn notify(&self, tool: &str);
}

/// Shows a desktop toast via the platform's notification command
#[derive(Debug, Clone, Default)]
pub struct DesktopNotifier;

/// Does nothing; used when notifications are turned off
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

const DONE_MESSAGE: &str = "Agent is done!";

impl Notifier for DesktopNotifier {
    fn notify(&self, tool: &str) {
        let Some(mut cmd) = desktop_command(&tool.to_uppercase(), DONE_MESSAGE) else {
            return;
        };
        // The child outlives us when the process exits right after answering
        match cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => debug!(pid = child.id(), "notification sent"),
            Err(e) => debug!(error = %e, "notification skipped"),
        }
    }
}

impl Notifier for NoopNotifier {
    fn notify(&self, _tool: &str) {}
}

fn desktop_command(title: &str, message: &str) -> Option<Command> {
    if cfg!(target_os = "macos") {
        let script = format!(
            "display notification {:?} with title {:?}",
            message, title
        );
        let mut cmd = Command::new("osascript");
        cmd.arg("-e").arg(script);
        Some(cmd)
    } else if cfg!(target_os = "linux") {
        let mut cmd = Command::new("notify-send");
        cmd.arg(title).arg(message);
        Some(cmd)
    } else {
        None
    }
}
