//! notecraft CLI binary.
//!
//! This binary provides command-line access to notecraft:
//! - Generate topics, post content and images
//! - Generate complete notes, one at a time or in batches
//! - Browse saved notes
//! - Serve the browser form interface

use clap::Parser;
use notecraft::{LogOptions, NoteGenerator, NotecraftConfig, init_logging, serve};
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

mod cli;

use cli::{Cli, Commands, ConfigCommands, Mode, handle_command, run_interactive};

#[tokio::main]
async fn main() -> ExitCode {
    // Values from .env become visible to the NOTECRAFT_* config layer.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = NotecraftConfig::load(cli.config.as_deref())?;

    let _guard = init_logging(&LogOptions {
        level: cli.log_level.clone(),
        verbose: cli.verbose,
        file: cli.log_file.clone(),
        dir: Some(config.output.log_dir.clone()),
    })?;

    if let Some(Commands::Config(ConfigCommands::Show)) = &cli.command {
        print!("{}", config.to_redacted_toml()?);
        return Ok(());
    }

    let generator = Arc::new(NoteGenerator::from_config(&config)?);

    match (cli.mode, cli.command) {
        (_, Some(Commands::Web)) | (Mode::Web, None) => {
            let mut web = config.web.clone();
            if let Some(port) = cli.port {
                web.port = port;
            }
            info!(host = %web.host, port = web.port, "Starting web mode");
            serve(&web, generator).await?;
            Ok(())
        }

        (Mode::Web, Some(cmd)) => {
            Err(format!("--mode web runs the web interface and takes no command, got {:?}", cmd).into())
        }

        (Mode::Cli, command) => {
            let result: Result<(), Box<dyn Error>> = match command {
                None | Some(Commands::Interactive) => {
                    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                    run_interactive(&generator, stdin, &mut std::io::stdout())
                        .await
                        .map_err(Into::into)
                }
                Some(cmd) => handle_command(cmd, &generator).await,
            };
            generator.release().await;
            result
        }
    }
}
