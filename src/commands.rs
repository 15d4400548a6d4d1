//! Registry management commands
//!
//! The thin glue behind `agent add/edit/delete/view/list/find/enable/
//! disable/export/import/run/check`.

use crate::benchmark::Benchmarker;
use crate::console::{answered_line, Console};
use crate::errors::{DispatchError, Result};
use crate::executor::{ExecMode, ToolRunner};
use crate::registry::{FileStore, ToolDefinition, ToolStore, ToolUpdate};
use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// Default export target when no path is given
pub const DEFAULT_EXPORT_FILE: &str = "agent-config.json";

pub fn add(
    store: &mut dyn ToolStore,
    console: &Console,
    name: &str,
    command: &str,
    description: &str,
) -> Result<()> {
    let tool = ToolDefinition::new(name.trim(), command.trim(), description.trim());
    store.add_tool(tool)?;
    info!(tool = name, "tool added");
    console.success(&format!("Added tool '{}'", name.trim()));
    Ok(())
}

pub fn edit(
    store: &mut dyn ToolStore,
    console: &Console,
    target: &str,
    update: ToolUpdate,
) -> Result<()> {
    if update.is_empty() {
        return Err(DispatchError::Generic(
            "Nothing to change; pass --name, --command or --description".to_string(),
        ));
    }
    store.update_tool(target, &update)?;
    let shown = update.name.as_deref().unwrap_or(target);
    console.success(&format!("Updated tool '{}'", shown));
    Ok(())
}

pub fn delete(store: &mut dyn ToolStore, console: &Console, target: &str, yes: bool) -> Result<()> {
    if store.tool(target)?.is_none() {
        return Err(DispatchError::UnknownTool(target.to_string()));
    }
    if !yes {
        return Err(DispatchError::Generic(format!(
            "Refusing to delete '{}' without --yes",
            target
        )));
    }
    let removed = store.remove_tool(target)?;
    console.success(&format!("Deleted tool '{}'", removed.name));
    Ok(())
}

pub fn set_enabled(
    store: &mut dyn ToolStore,
    console: &Console,
    name: &str,
    enabled: bool,
) -> Result<()> {
    store.update_tool(name, &ToolUpdate::enabled(enabled))?;
    let verb = if enabled { "Enabled" } else { "Disabled" };
    console.success(&format!("{} tool '{}'", verb, name));
    Ok(())
}

/// One-line listing entry
pub fn summary_line(tool: &ToolDefinition, is_best: bool) -> String {
    let mut line = format!("{} [{}]", tool.name, tool.okay.label());
    if let Some(seconds) = tool.time_taken {
        line.push_str(&format!(" {:.1}s", seconds));
    }
    if !tool.enabled {
        line.push_str(" (disabled)");
    }
    if is_best {
        line.push_str(" (BEST)");
    }
    if !tool.description.is_empty() {
        line.push_str(&format!(": {}", tool.description));
    }
    line
}

fn is_best(best: Option<&str>, tool: &ToolDefinition) -> bool {
    best.map_or(false, |b| tool.is_named(b))
}

pub fn list(store: &dyn ToolStore, console: &Console) -> Result<()> {
    let doc = store.load()?;
    if doc.tools.is_empty() {
        console.notice("No tools configured. Add one with `agent add`.");
        return Ok(());
    }
    for tool in &doc.tools {
        console.info(&summary_line(tool, is_best(doc.best.as_deref(), tool)));
    }
    Ok(())
}

/// Case-insensitive match on name or description
pub fn find(store: &dyn ToolStore, console: &Console, query: &str) -> Result<usize> {
    let doc = store.load()?;
    let needle = query.to_lowercase();
    let matches: Vec<_> = doc
        .tools
        .iter()
        .filter(|t| {
            t.name.to_lowercase().contains(&needle) || t.description.to_lowercase().contains(&needle)
        })
        .collect();

    if matches.is_empty() {
        console.notice(&format!("No tools match '{}'", query));
    }
    for tool in &matches {
        console.info(&summary_line(tool, is_best(doc.best.as_deref(), tool)));
    }
    Ok(matches.len())
}

pub fn view(store: &dyn ToolStore, console: &Console, name: &str) -> Result<()> {
    let doc = store.load()?;
    let tool = doc
        .find(name)
        .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

    console.info(&format!("Name:        {}", tool.name));
    console.info(&format!("Command:     {}", tool.command));
    console.info(&format!("Description: {}", tool.description));
    console.info(&format!("Enabled:     {}", tool.enabled));
    console.info(&format!("Status:      {}", tool.okay.label()));
    console.info(&format!(
        "Last ran:    {}",
        tool.last_ran
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "never".to_string())
    ));
    console.info(&format!(
        "Time taken:  {}",
        tool.time_taken
            .map(|s| format!("{:.1}s", s))
            .unwrap_or_else(|| "-".to_string())
    ));
    if let Some(error) = &tool.last_error {
        console.detail(&format!("Last error:  {}", error));
    }
    if is_best(doc.best.as_deref(), tool) {
        console.success("This is the current best tool.");
    }
    Ok(())
}

pub fn export(store: &dyn ToolStore, console: &Console, path: Option<&Path>) -> Result<PathBuf> {
    let target = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));
    FileStore::write_document(&target, &store.load()?)?;
    console.success(&format!("Exported configuration to {}", target.display()));
    Ok(target)
}

/// Replace the registry with a validated document from `path`
pub fn import(store: &mut dyn ToolStore, console: &Console, path: &Path) -> Result<usize> {
    let doc = FileStore::read_document(path)?;
    let count = doc.tools.len();
    store.save(&doc)?;
    console.success(&format!("Imported {} tools from {}", count, path.display()));
    Ok(count)
}

/// Run one tool with live output and record the outcome; returns exit code
pub async fn run(
    store: &mut dyn ToolStore,
    runner: &dyn ToolRunner,
    console: &Console,
    name: &str,
    prompt: &str,
    debug: bool,
) -> Result<i32> {
    let tool = store
        .tool(name)?
        .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

    let result = runner.execute(&tool, prompt, ExecMode::interactive(debug)).await;
    let update = if result.success {
        ToolUpdate::success(result.duration.as_secs_f64(), Utc::now())
    } else {
        ToolUpdate::failure(result.error.clone(), Utc::now())
    };
    store.update_tool(&tool.name, &update)?;

    if result.success {
        console.detail(&answered_line(&tool.name, false, result.duration));
        Ok(0)
    } else {
        console.error(&format!(
            "{} failed: {}",
            tool.name,
            result.error.as_deref().unwrap_or("unknown error")
        ));
        Ok(1)
    }
}

/// Benchmark all tools and print the report; exit code 1 if none passed
pub async fn check(
    store: &mut dyn ToolStore,
    runner: &dyn ToolRunner,
    console: &Console,
    prompt: &str,
    debug: bool,
    include_disabled: bool,
) -> Result<i32> {
    let report = Benchmarker::new(runner, console, prompt)
        .with_debug(debug)
        .run(store, include_disabled)
        .await?;
    report.render(console);
    Ok(if report.best.is_some() { 0 } else { 1 })
}
