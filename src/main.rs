mod commands;
mod config;
mod context;
mod error;
mod output;
mod settings;
mod tower;
mod traits;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{
    ComputeEnvsArgs, ComputeEnvsCommand, LaunchArgs, LaunchCommand, PipelinesArgs,
    PipelinesCommand,
};
use context::Context;
use error::TowerError;
use settings::Settings;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "towerctl")]
#[command(about = "Automate pipelines and compute environments in a workflow platform workspace", long_about = None)]
#[command(version)]
struct Cli {
    /// Workspace to operate on (defaults to TOWER_WORKSPACE_ID)
    #[arg(short = 'w', long, global = true, value_name = "NAME")]
    workspace: Option<String>,

    /// The desired log level
    #[arg(
        short = 'l',
        long = "log_level",
        global = true,
        value_enum,
        default_value_t = LogLevel::Info
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export, import, add and launch pipelines in a workspace
    Pipelines(PipelinesArgs),

    /// Export and import compute environments
    #[command(name = "compute-envs")]
    ComputeEnvs(ComputeEnvsArgs),

    /// Launch every pipeline of a YAML run config
    Launch(LaunchArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn init_tracing(level: LogLevel) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_filter())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn run(cli: &Cli, ctx: &Context) -> Result<usize, TowerError> {
    match &cli.command {
        Commands::Pipelines(args) => {
            let settings = Settings::resolve(cli.workspace.as_deref())?;
            PipelinesCommand::execute(ctx, &settings, args)
        }
        Commands::ComputeEnvs(args) => {
            let settings = Settings::resolve(cli.workspace.as_deref())?;
            ComputeEnvsCommand::execute(ctx, &settings, args)
        }
        Commands::Launch(args) => LaunchCommand::execute(ctx, cli.workspace.as_deref(), args),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let ctx = Context::new();

    match run(&cli, &ctx) {
        Ok(0) => {}
        Ok(failures) => {
            output::error(&format!("{failures} operation(s) failed"));
            std::process::exit(2);
        }
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(e.exit_code());
        }
    }
}
