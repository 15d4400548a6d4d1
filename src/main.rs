//! agent - Main CLI Entry Point

use agent_dispatch::{
    cli::{Args, Commands, Config},
    commands,
    console::Console,
    dispatch::Dispatcher,
    executor::ProcessRunner,
    logging,
    notify::{DesktopNotifier, NoopNotifier, Notifier},
    registry::{FileStore, ToolUpdate},
};
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init(args.verbosity());

    let code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            1
        }
    };
    std::process::exit(code);
}

async fn run(mut args: Args) -> Result<i32> {
    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    let mut store = FileStore::new(config.registry_path());
    let runner = ProcessRunner::new(config.timeout());
    let console = Console::terminal();

    match args.command.take() {
        Some(Commands::Add {
            name,
            command,
            description,
        }) => {
            commands::add(&mut store, &console, &name, &command, &description)?;
        }
        Some(Commands::Edit {
            target,
            tool_name,
            name,
            command,
            description,
        }) => {
            let target = target
                .or(tool_name)
                .context("Specify the tool to edit (positional or --tool-name)")?;
            let update = ToolUpdate {
                name,
                command,
                description,
                ..Default::default()
            };
            commands::edit(&mut store, &console, &target, update)?;
        }
        Some(Commands::Delete {
            target,
            tool_name,
            yes,
        }) => {
            let target = target
                .or(tool_name)
                .context("Specify the tool to delete (positional or --tool-name)")?;
            commands::delete(&mut store, &console, &target, yes)?;
        }
        Some(Commands::View { tool_name }) => {
            commands::view(&store, &console, &tool_name)?;
        }
        Some(Commands::List) => {
            commands::list(&store, &console)?;
        }
        Some(Commands::Find { query }) => {
            commands::find(&store, &console, &query)?;
        }
        Some(Commands::Check {
            debug,
            include_disabled,
        }) => {
            return Ok(commands::check(
                &mut store,
                &runner,
                &console,
                &config.selection.benchmark_prompt,
                debug,
                include_disabled,
            )
            .await?);
        }
        Some(Commands::Run {
            tool_name,
            prompt,
            debug,
        }) => {
            let prompt = prompt.unwrap_or_else(|| config.selection.benchmark_prompt.clone());
            return Ok(commands::run(&mut store, &runner, &console, &tool_name, &prompt, debug).await?);
        }
        Some(Commands::Export { path }) => {
            commands::export(&store, &console, path.as_deref())?;
        }
        Some(Commands::Import { path }) => {
            commands::import(&mut store, &console, &path)?;
        }
        Some(Commands::Enable { tool_name }) => {
            commands::set_enabled(&mut store, &console, &tool_name, true)?;
        }
        Some(Commands::Disable { tool_name }) => {
            commands::set_enabled(&mut store, &console, &tool_name, false)?;
        }
        None => {
            let Some(prompt) = args.resolve_prompt()? else {
                Args::command().print_help()?;
                return Ok(0);
            };
            if let Some(path) = &args.file {
                console.detail(&format!("Reading prompt from file: {}", path.display()));
            }

            let notifier: Box<dyn Notifier> = if config.notify.enabled {
                Box::new(DesktopNotifier)
            } else {
                Box::new(NoopNotifier)
            };

            let outcome = Dispatcher::new(&mut store, &runner, notifier.as_ref(), &console)
                .with_settings(config.dispatch_settings())
                .dispatch(&prompt, args.dispatch_options())
                .await?;
            return Ok(outcome.exit_code());
        }
    }

    Ok(0)
}
