//! End-to-end tests with real child processes and the JSON file store

#![cfg(unix)]

use agent_dispatch::commands;
use agent_dispatch::console::Console;
use agent_dispatch::dispatch::{DispatchOptions, DispatchOutcome, Dispatcher};
use agent_dispatch::executor::ProcessRunner;
use agent_dispatch::notify::NoopNotifier;
use agent_dispatch::registry::{FileStore, Health, ToolDefinition, ToolStore, ToolUpdate};
use chrono::Utc;
use std::time::Duration;
use tempfile::TempDir;

fn setup_store() -> (FileStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path().join("tools.json"));
    (store, temp_dir)
}

#[tokio::test]
async fn test_check_with_real_tools() {
    let (mut store, _temp) = setup_store();
    store.add_tool(ToolDefinition::new("mute", "true", "prints nothing")).unwrap();
    store.add_tool(ToolDefinition::new("echoer", "echo", "repeats the prompt")).unwrap();
    store
        .add_tool(ToolDefinition::new("missing", "no-such-ai-cli-4c1d", "not installed"))
        .unwrap();

    let runner = ProcessRunner::new(Duration::from_secs(10));
    let console = Console::buffer();
    let code = commands::check(&mut store, &runner, &console, "2+2", false, false)
        .await
        .unwrap();

    assert_eq!(code, 0);
    assert_eq!(store.best().unwrap().as_deref(), Some("echoer"));

    let mute = store.tool("mute").unwrap().unwrap();
    assert_eq!(mute.okay, Health::Failed);
    assert!(mute.last_error.unwrap().contains("no output"));

    let missing = store.tool("missing").unwrap().unwrap();
    assert_eq!(missing.okay, Health::Failed);
    assert!(missing.last_error.unwrap().contains("Command not found"));
}

#[tokio::test]
async fn test_dispatch_falls_back_to_working_process() {
    let (mut store, temp) = setup_store();
    store
        .add_tool(ToolDefinition::new("broken", "sh -c 'exit 3' sh", ""))
        .unwrap();
    store.add_tool(ToolDefinition::new("echoer", "echo", "")).unwrap();
    store
        .update_tool("echoer", &ToolUpdate::success(0.2, Utc::now()))
        .unwrap();
    store.set_best(Some("broken")).unwrap();

    let runner = ProcessRunner::new(Duration::from_secs(10));
    let console = Console::buffer();
    let outcome = Dispatcher::new(&mut store, &runner, &NoopNotifier, &console)
        .dispatch("what's  up?", DispatchOptions::default())
        .await
        .unwrap();

    match outcome {
        DispatchOutcome::Answered { tool, output, .. } => {
            assert_eq!(tool, "echoer");
            assert_eq!(output, "what's  up?");
        }
        other => panic!("expected answer, got {:?}", other),
    }

    let reopened = FileStore::new(temp.path().join("tools.json"));
    assert_eq!(reopened.best().unwrap().as_deref(), Some("echoer"));
    let broken = reopened.tool("broken").unwrap().unwrap();
    assert_eq!(broken.okay, Health::Failed);
    assert_eq!(broken.last_error.as_deref(), Some("Tool exited with code 3"));
}

#[tokio::test]
async fn test_run_records_outcome() {
    let (mut store, _temp) = setup_store();
    store.add_tool(ToolDefinition::new("echoer", "echo", "")).unwrap();

    let runner = ProcessRunner::new(Duration::from_secs(10));
    let console = Console::buffer();
    let code = commands::run(&mut store, &runner, &console, "ECHOER", "ping", false)
        .await
        .unwrap();

    assert_eq!(code, 0);
    let echoer = store.tool("echoer").unwrap().unwrap();
    assert_eq!(echoer.okay, Health::Succeeded);
    assert!(echoer.time_taken.is_some());
}

#[tokio::test]
async fn test_export_then_import() {
    let (mut store, temp) = setup_store();
    store.add_tool(ToolDefinition::new("echoer", "echo", "repeats")).unwrap();
    store.set_best(Some("echoer")).unwrap();
    let console = Console::buffer();

    let exported = commands::export(&store, &console, Some(temp.path().join("backup.json").as_path())).unwrap();

    let mut other = FileStore::new(temp.path().join("other").join("tools.json"));
    let count = commands::import(&mut other, &console, &exported).unwrap();

    assert_eq!(count, 1);
    assert_eq!(other.best().unwrap().as_deref(), Some("echoer"));
    assert_eq!(other.tool("echoer").unwrap().unwrap().description, "repeats");
}
