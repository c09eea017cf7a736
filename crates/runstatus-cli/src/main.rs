//! Runstatus CLI binary entrypoint.
//!
//! This is the main entry point for the `runstatus` command-line tool.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use runstatus_cli::cli::{Cli, Commands};
use runstatus_cli::client::ApiClient;
use runstatus_cli::commands::{IncidentCommand, InfoCommand, ServicesCommand};
use runstatus_cli::config::Config;
use runstatus_cli::output::OutputFormat;
use runstatus_cli::prompt::TerminalPrompter;
use runstatus_cli::sign::ExoscaleSigner;
use runstatus_cli::transport::HttpTransport;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let format = OutputFormat::new(cli.format)
        .with_color(use_color(cli.no_color, io::stdout().is_terminal()));
    let error_format = OutputFormat::new(cli.format)
        .with_color(use_color(cli.no_color, io::stderr().is_terminal()));

    // One request at a time on the calling thread
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli, &format)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let mut stderr = io::stderr().lock();
            if error_format.write_error(&mut stderr, &e).is_err() {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,runstatus_cli={level},runstatus={level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Color only when writing to a terminal and neither `--no-color` nor the
/// environment (`NO_COLOR`, `CLICOLOR`) turns it off.
fn use_color(no_color: bool, is_terminal: bool) -> bool {
    !no_color && is_terminal && colored::control::SHOULD_COLORIZE.should_colorize()
}

async fn run(cli: Cli, format: &OutputFormat) -> Result<(), runstatus_cli::CliError> {
    let config = Config::load(&cli.config)?;
    debug!(page = %config.page, endpoint = %config.endpoint, "Loaded configuration");

    let signer = ExoscaleSigner::new(&config.api_key, &config.secret_key);
    let client = ApiClient::new(&config, HttpTransport::new(signer)?);
    let prompter = TerminalPrompter::new();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Info => {
            let cmd = InfoCommand::new(&client);
            cmd.execute(&mut stdout, format).await?;
        }
        Commands::Services { action, name } => {
            let cmd = ServicesCommand::new(&client);
            cmd.execute(&mut stdout, format, action, &name).await?;
        }
        Commands::Create(args) => {
            let cmd = IncidentCommand::new(&client, &prompter);
            cmd.create(&mut stdout, format, &args).await?;
        }
        Commands::Update(args) => {
            let cmd = IncidentCommand::new(&client, &prompter);
            cmd.update(&mut stdout, format, &args).await?;
        }
        Commands::Resolve(args) => {
            let cmd = IncidentCommand::new(&client, &prompter);
            cmd.resolve(&mut stdout, format, &args).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use runstatus_cli::CliError;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> String {
        let path = dir.path().join("runstatus");
        std::fs::write(&path, contents).expect("write config");
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn cli_parses_info() {
        let cli = Cli::parse_from(["runstatus", "info"]);
        assert!(matches!(cli.command, Commands::Info));
    }

    #[test]
    fn no_color_flag_disables_color() {
        assert!(!use_color(true, true));
    }

    #[test]
    fn redirected_stream_is_not_colored() {
        assert!(!use_color(false, false));
    }

    #[tokio::test]
    async fn run_without_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").to_string_lossy().into_owned();
        let cli = Cli::parse_from(["runstatus", "-c", &path, "info"]);
        let result = run(cli, &OutputFormat::default()).await;
        assert!(matches!(result, Err(CliError::ConfigMissing { .. })));
    }

    #[tokio::test]
    async fn run_with_incomplete_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, "page = x\nkey = y\n");
        let cli = Cli::parse_from(["runstatus", "-c", &path, "info"]);
        let result = run(cli, &OutputFormat::default()).await;
        assert!(matches!(result, Err(CliError::ConfigIncomplete { .. })));
    }

    #[tokio::test]
    async fn run_with_unreachable_endpoint() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, "page = x\nkey = y\nsecret = z\nendpoint = http://127.0.0.1:9\n");
        let cli = Cli::parse_from(["runstatus", "-c", &path, "services", "add", "api"]);
        let result = run(cli, &OutputFormat::default()).await;
        assert!(matches!(result, Err(CliError::Transport(_))));
    }
}
