use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "screentime-cli", version, about = "Screen time accountability CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign up, sign in, passwords
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Daily limits and usage
    Limits {
        #[command(subcommand)]
        action: commands::limits::LimitsAction,
    },
    /// Accountability group management
    Group {
        #[command(subcommand)]
        action: commands::group::GroupAction,
    },
    /// Time extension requests
    Extension {
        #[command(subcommand)]
        action: commands::extension::ExtensionAction,
    },
    /// Notification inbox
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Load demo data
    Seed {
        /// Overwrite existing data
        #[arg(long)]
        force: bool,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("SCREENTIME_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Limits { action } => commands::limits::run(action),
        Commands::Group { action } => commands::group::run(action),
        Commands::Extension { action } => commands::extension::run(action),
        Commands::Notify { action } => commands::notify::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Seed { force } => commands::seed::run(force),
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout();
            clap_complete::generate(shell, &mut Cli::command(), "screentime-cli", &mut stdout);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
