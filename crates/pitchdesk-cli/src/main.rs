mod generate;
mod history;
mod profiles;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::history::HistoryCommands;
use crate::profiles::ProfileCommands;

#[derive(Debug, Parser)]
#[command(name = "pitchdesk")]
#[command(about = "Research companies and draft sponsorship outreach emails")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage rightsholder profiles
    Profiles {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Research a company and draft three outreach emails
    Generate {
        /// Target company name
        company: String,

        /// Print the result as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
    /// Browse previous generations
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = pitchdesk_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Profiles { command }) => profiles::run(&config, command),
        Some(Commands::Generate { company, json }) => {
            generate::run(&config, &company, json).await
        }
        Some(Commands::History { command }) => history::run(&config, command),
        None => {
            println!("pitchdesk: run `pitchdesk --help` for available commands");
            Ok(())
        }
    }
}
