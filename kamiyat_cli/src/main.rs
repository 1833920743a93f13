//! # Kamiyat CLI
//!
//! Command-line front end for the quantity engine: validate and calculate
//! element inputs stored as JSON, sum concrete tabs, and manage the quantity
//! reports in a shared JSON store.
//!
//! ```text
//! kamiyat compute roof.json
//! kamiyat save roof.json --project villa-12 --overwrite
//! kamiyat reports --project villa-12 --format json
//! ```

mod calc;
mod config;
mod output;
mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use kamiyat_core::project::ProjectInfo;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "kamiyat", about = "Concrete and steel quantities for structural elements", version)]
struct Cli {
    /// Config file (defaults to ./kamiyat.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level regardless of RUST_LOG
    #[arg(long, global = true)]
    debug: bool,

    /// Output format
    #[arg(long, short, global = true, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check an input file and list every violation
    Validate {
        /// Raw input JSON
        input: PathBuf,
    },

    /// Validate and calculate an input file
    Compute {
        /// Raw input JSON
        input: PathBuf,
    },

    /// Sum the concrete volume of several input files
    Aggregate {
        /// Raw input JSON files, one tab each
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Calculate an input file and save it as the project's report
    Save {
        /// Raw input JSON
        input: PathBuf,

        /// Project the report belongs to
        #[arg(long)]
        project: String,

        /// Replace the existing report for this calculation type
        #[arg(long)]
        overwrite: bool,
    },

    /// List the reports saved for a project
    Reports {
        #[arg(long)]
        project: String,
    },

    /// Send a saved report to the project owner
    Send {
        report_id: Uuid,
    },

    /// Manage projects in the store
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Print the soil, building and iron bar tables
    Reference,
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Add or replace a project
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// Owner shown on reports
        #[arg(long)]
        client: String,
        /// Owner account reports are sent to
        #[arg(long)]
        owner_email: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// JSON
    Json,
}

fn init_tracing(config: &CliConfig, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter.as_str().into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    init_tracing(&config, cli.debug);

    let mut reference = config.reference_cache()?;
    let format = cli.format;

    match cli.command {
        Commands::Validate { input } => calc::run_validate(&input, reference.tables()?, format),
        Commands::Compute { input } => calc::run_compute(&input, reference.tables()?, format),
        Commands::Aggregate { inputs } => calc::run_aggregate(&inputs, reference.tables()?, format),
        Commands::Save {
            input,
            project,
            overwrite,
        } => report::run_save(&input, &project, overwrite, &config, reference.tables()?, format),
        Commands::Reports { project } => report::run_reports(&project, &config, format),
        Commands::Send { report_id } => report::run_send(report_id, &config, format),
        Commands::Project {
            command:
                ProjectCommands::Add {
                    id,
                    name,
                    client,
                    owner_email,
                },
        } => {
            let mut project = ProjectInfo::new(id, name, client);
            if let Some(email) = owner_email {
                project = project.with_owner_email(email);
            }
            report::run_project_add(project, &config)
        }
        Commands::Reference => calc::run_reference(reference.tables()?, format),
    }
}
