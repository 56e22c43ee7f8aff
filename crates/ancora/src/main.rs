mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ancora",
    version,
    about = "Keeps application windows anchored to their assigned monitor"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration files
    Init,
    /// Start the window keeper daemon
    Start,
    /// Stop the window keeper daemon
    Stop,
    /// Show whether the daemon is running
    Status,
    /// Switch the running daemon between base and dormant poll cadence
    Dormant {
        #[command(subcommand)]
        state: DormantCommands,
    },
    /// Debugging and inspection tools
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
    /// Run the daemon (internal — not for direct use)
    #[command(hide = true)]
    Daemon,
}

#[derive(Subcommand)]
enum DormantCommands {
    /// Poll at the stretched dormant interval
    On,
    /// Poll at the base interval
    Off,
}

#[derive(Subcommand)]
enum DebugCommands {
    /// List all visible windows and their resolved monitors
    List,
    /// Run the keeper in the foreground, printing events
    Watch,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Start => commands::start::execute(),
        Commands::Stop => commands::stop::execute(),
        Commands::Status => commands::status::execute(),
        Commands::Daemon => commands::daemon::execute(),
        Commands::Dormant { state } => {
            let enabled = matches!(state, DormantCommands::On);
            commands::dormant::execute(enabled);
        }
        Commands::Debug { command } => match command {
            DebugCommands::List => commands::debug::list::execute(),
            DebugCommands::Watch => commands::debug::watch::execute(),
        },
    }
}
