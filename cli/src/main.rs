use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::*;
use std::path::Path;
use std::process::ExitCode;
use study_core::StudyConfig;

mod app;
mod cli;
mod config;
mod logging;
mod output;

use crate::app::App;
use crate::cli::{Args, Command, ConfigAction};
use crate::logging::{log_error, log_info};
use crate::output::print_usage_instructions;

#[tokio::main]
async fn main() -> ExitCode {
    // Load a .env file if present so STUDY_BUDDY_* variables can live there
    dotenvy::dotenv().ok();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    // `config init` rewrites the file, so it must not depend on the file parsing
    if let Some(Command::Config {
        action: ConfigAction::Init { force },
    }) = &args.command
    {
        return init_config(&config::config_path(&args)?, *force);
    }

    let (config, config_path) = config::resolve(&args)?;
    logging::init(config.log_level.as_deref());
    log_info(&format!("Configuration file: {}", config_path.display()));

    let Some(command) = args.command else {
        print_usage_instructions();
        return Ok(());
    };

    match command {
        Command::Config {
            action: ConfigAction::Show,
        } => show_config(&config, &config_path),
        command => {
            let mut app = App::new(config)?;
            app.dispatch(command).await
        }
    }
}

fn show_config(config: &StudyConfig, path: &Path) -> Result<()> {
    println!("{} {}", "Config file:".cyan(), path.display());
    let rendered = toml::to_string_pretty(config)
        .context("Failed to serialize configuration")?;
    println!("{}", rendered);
    println!("{} {}", "Effective endpoint:".cyan(), config.endpoint());
    println!("{} {}", "Effective model:".cyan(), config.model_name());
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    StudyConfig::with_defaults()
        .save_to_file(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    output::print_success(&format!("Wrote {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_args(path: &Path, force: bool) -> Args {
        let mut argv = vec!["study-buddy", "--config", path.to_str().unwrap(), "config", "init"];
        if force {
            argv.push("--force");
        }
        Args::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_init_force_replaces_unreadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "item_count = 99
endpoint = [not toml").unwrap();

        assert!(run(init_args(&path, false)).await.is_err());
        run(init_args(&path, true)).await.unwrap();

        let rewritten = StudyConfig::load_from_file(&path).unwrap();
        assert_eq!(rewritten, StudyConfig::with_defaults());
    }
}
