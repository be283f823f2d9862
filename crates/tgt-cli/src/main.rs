use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tgt_core::permissions::Capability;
use tgt_infrastructure::{ConfigService, ServiceType, TgtPaths};

mod app;
mod commands;
mod logging;

use app::App;

#[derive(Parser)]
#[command(name = "tgt")]
#[command(about = "TGT CLI - team growth tracker account and session tool", long_about = None)]
struct Cli {
    /// Root directory for config and data (defaults to TGT_HOME, then the platform directories)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Also write logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and its profile, then sign in
    Register(commands::register::RegisterArgs),
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show the current session
    Status {
        /// Print the session snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update fields of the signed-in profile
    Update(commands::update::UpdateArgs),
    /// Sign out and forget the cached session
    Logout,
    /// Manage team members (admin only)
    Team {
        #[command(subcommand)]
        action: commands::team::TeamAction,
    },
    /// Check one capability, or list all of them
    Can {
        /// Capability name, e.g. manageUsers
        capability: Option<Capability>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let paths = TgtPaths::new(cli.home.clone());
    let config = ConfigService::from_paths(&paths)?.load_or_create()?;
    let paths = paths.with_data_dir(config.storage.data_dir.clone());

    let _log_guard = logging::init(
        &paths.get_path(ServiceType::Logs)?,
        &config.logging.level,
        cli.verbose,
    )?;
    tracing::debug!("[tgt] Data directory: {}", paths.data_dir()?.display());

    let app = App::open(&paths, &config)?;
    let result = match cli.command {
        Commands::Register(args) => commands::register::run(&app, args)
            .await
            .map(|_| ExitCode::SUCCESS),
        Commands::Login { email, password } => commands::login::run(&app, &email, &password)
            .await
            .map(|_| ExitCode::SUCCESS),
        Commands::Status { json } => commands::status::run(&app, json)
            .await
            .map(|_| ExitCode::SUCCESS),
        Commands::Update(args) => commands::update::run(&app, args)
            .await
            .map(|_| ExitCode::SUCCESS),
        Commands::Logout => commands::logout::run(&app).await.map(|_| ExitCode::SUCCESS),
        Commands::Team { action } => commands::team::run(&app, action)
            .await
            .map(|_| ExitCode::SUCCESS),
        Commands::Can { capability } => commands::can::run(&app, capability).await,
    };
    app.shutdown();

    if let Err(e) = &result {
        tracing::error!("[tgt] Command failed: {:#}", e);
    }
    result
}
