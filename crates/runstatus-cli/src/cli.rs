//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_CONFIG_PATH;
use crate::model::{IncidentStatus, OperationalState};

/// Runstatus CLI - manage a hosted status page.
#[derive(Parser, Debug, Clone)]
#[command(name = "runstatus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, env = "RUNSTATUS_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Increase output verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[derive(Default)]
pub enum Format {
    /// Human-readable format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Display the status information.
    Info,

    /// Manage services listed on the status page.
    Services {
        /// Whether to add or remove the service.
        #[arg(value_enum)]
        action: ServiceAction,

        /// Service name (exact, case-sensitive).
        name: String,
    },

    /// Open a new incident.
    Create(CreateArgs),

    /// Update an open incident.
    Update(UpdateArgs),

    /// Resolve an open incident.
    Resolve(ResolveArgs),
}

/// Action for the `services` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceAction {
    /// Add a service.
    Add,
    /// Remove a service.
    Remove,
}

/// Incident status as a command-line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Cause unknown.
    Investigating,
    /// Cause found.
    Identified,
    /// Fix applied, watching.
    Monitoring,
    /// Over.
    Resolved,
}

impl From<StatusArg> for IncidentStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Investigating => Self::Investigating,
            StatusArg::Identified => Self::Identified,
            StatusArg::Monitoring => Self::Monitoring,
            StatusArg::Resolved => Self::Resolved,
        }
    }
}

/// Operational state as a command-line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    /// Everything works.
    #[value(name = "operational")]
    Operational,
    /// Slower than usual.
    #[value(name = "degraded_performance")]
    DegradedPerformance,
    /// Some functionality is unavailable.
    #[value(name = "partial_outage")]
    PartialOutage,
    /// Unavailable.
    #[value(name = "major_outage")]
    MajorOutage,
}

impl From<StateArg> for OperationalState {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Operational => Self::Operational,
            StateArg::DegradedPerformance => Self::DegradedPerformance,
            StateArg::PartialOutage => Self::PartialOutage,
            StateArg::MajorOutage => Self::MajorOutage,
        }
    }
}

/// Arguments for the create command. Missing values are prompted for.
#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    /// Incident title.
    #[arg(long)]
    pub title: Option<String>,

    /// Affected services (comma-separated list).
    #[arg(long)]
    pub services: Option<String>,

    /// Initial status.
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Initial state.
    #[arg(long, value_enum)]
    pub state: Option<StateArg>,

    /// Text of the first update.
    #[arg(long)]
    pub text: Option<String>,
}

/// Arguments for the update command. Missing values are prompted for.
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Incident id.
    pub incident: u64,

    /// New status.
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// New state.
    #[arg(long, value_enum)]
    pub state: Option<StateArg>,

    /// Update text.
    #[arg(long)]
    pub text: Option<String>,
}

/// Arguments for the resolve command.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Incident id.
    pub incident: u64,

    /// Resolution text.
    #[arg(long)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_info() {
        let cli = Cli::parse_from(["runstatus", "info"]);
        assert!(matches!(cli.command, Commands::Info));
        assert_eq!(cli.format, Format::Table);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.no_color);
    }

    #[test]
    fn parse_config_flag() {
        let cli = Cli::parse_from(["runstatus", "-c", "/etc/runstatus", "info"]);
        assert_eq!(cli.config, PathBuf::from("/etc/runstatus"));
    }

    #[test]
    fn parse_verbosity_count() {
        let cli = Cli::parse_from(["runstatus", "-vvv", "info"]);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn parse_services_add() {
        let cli = Cli::parse_from(["runstatus", "services", "add", "api"]);
        match cli.command {
            Commands::Services { action, name } => {
                assert_eq!(action, ServiceAction::Add);
                assert_eq!(name, "api");
            }
            _ => panic!("expected services command"),
        }
    }

    #[test]
    fn parse_services_remove() {
        let cli = Cli::parse_from(["runstatus", "services", "remove", "My Service"]);
        assert!(matches!(
            cli.command,
            Commands::Services { action: ServiceAction::Remove, ref name } if name == "My Service"
        ));
    }

    #[test]
    fn services_rejects_unknown_action() {
        assert!(Cli::try_parse_from(["runstatus", "services", "rename", "api"]).is_err());
    }

    #[test]
    fn parse_create_all_options() {
        let cli = Cli::parse_from([
            "runstatus", "create",
            "--title", "Database down",
            "--services", "db,api",
            "--status", "identified",
            "--state", "major_outage",
            "--text", "Failing over",
        ]);
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.title.as_deref(), Some("Database down"));
                assert_eq!(args.services.as_deref(), Some("db,api"));
                assert_eq!(args.status, Some(StatusArg::Identified));
                assert_eq!(args.state, Some(StateArg::MajorOutage));
                assert_eq!(args.text.as_deref(), Some("Failing over"));
            }
            _ => panic!("expected create command"),
        }
    }

    #[test]
    fn parse_create_without_options() {
        let cli = Cli::parse_from(["runstatus", "create"]);
        match cli.command {
            Commands::Create(args) => {
                assert!(args.title.is_none());
                assert!(args.status.is_none());
            }
            _ => panic!("expected create command"),
        }
    }

    #[test]
    fn parse_update() {
        let cli = Cli::parse_from([
            "runstatus", "update", "12",
            "--status", "monitoring",
            "--state", "degraded_performance",
        ]);
        match cli.command {
            Commands::Update(args) => {
                assert_eq!(args.incident, 12);
                assert_eq!(args.status, Some(StatusArg::Monitoring));
                assert_eq!(args.state, Some(StateArg::DegradedPerformance));
                assert!(args.text.is_none());
            }
            _ => panic!("expected update command"),
        }
    }

    #[test]
    fn update_requires_numeric_incident() {
        assert!(Cli::try_parse_from(["runstatus", "update", "abc"]).is_err());
    }

    #[test]
    fn state_rejects_kebab_case() {
        assert!(Cli::try_parse_from([
            "runstatus", "update", "1", "--state", "major-outage",
        ])
        .is_err());
    }

    #[test]
    fn parse_resolve() {
        let cli = Cli::parse_from(["runstatus", "resolve", "7", "--text", "All good"]);
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.incident, 7);
                assert_eq!(args.text.as_deref(), Some("All good"));
            }
            _ => panic!("expected resolve command"),
        }
    }

    #[test]
    fn arg_enums_map_to_model() {
        assert_eq!(IncidentStatus::from(StatusArg::Resolved), IncidentStatus::Resolved);
        assert_eq!(
            OperationalState::from(StateArg::PartialOutage),
            OperationalState::PartialOutage
        );
    }

    #[test]
    fn cli_respects_format_flag() {
        let cli = Cli::parse_from(["runstatus", "--format", "json", "info"]);
        assert_eq!(cli.format, Format::Json);
    }
}
