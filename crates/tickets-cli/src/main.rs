use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tickets_cli::cmd::{
    config::ConfigSubcommand, incident::IncidentSubcommand, report::ReportSubcommand,
    user::UserSubcommand,
};
use tickets_cli::{cmd, project::Project, root};

#[derive(Parser)]
#[command(
    name = "tickets",
    about = "Track users and their incidents in a local SQLite store",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: nearest directory holding .tickets/, else cwd)
    #[arg(long, global = true, env = "TICKETS_ROOT")]
    root: Option<PathBuf>,

    /// Database file, overriding the config (relative to the root)
    #[arg(long, global = true, env = "TICKETS_DB")]
    db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Without a subcommand the interactive application starts
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive two-tab application
    App,

    /// Manage users
    User {
        #[command(subcommand)]
        subcommand: UserSubcommand,
    },

    /// Manage incidents
    Incident {
        #[command(subcommand)]
        subcommand: IncidentSubcommand,
    },

    /// Run the canned reports
    Report {
        #[command(subcommand)]
        subcommand: ReportSubcommand,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let project = Project::new(root, cli.db);

    let result = match cli.command {
        None | Some(Commands::App) => cmd::app::run(&project),
        Some(Commands::User { subcommand }) => cmd::user::run(&project, subcommand, cli.json),
        Some(Commands::Incident { subcommand }) => {
            cmd::incident::run(&project, subcommand, cli.json)
        }
        Some(Commands::Report { subcommand }) => cmd::report::run(&project, subcommand, cli.json),
        Some(Commands::Config { subcommand }) => cmd::config::run(&project, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
