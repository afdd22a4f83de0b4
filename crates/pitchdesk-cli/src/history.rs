//! `history` command handlers.

use clap::Subcommand;
use pitchdesk_core::AppConfig;
use pitchdesk_store::HistoryLog;

use crate::generate::print_drafts;

/// Sub-commands available under `history`.
#[derive(Debug, Subcommand)]
pub enum HistoryCommands {
    /// List previous generations, newest first
    List {
        /// Show at most this many entries
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show the research and drafts of one generation
    Show { id: String },
}

pub(crate) fn run(config: &AppConfig, command: HistoryCommands) -> anyhow::Result<()> {
    let log = HistoryLog::new(config.history_path());

    match command {
        HistoryCommands::List { limit } => {
            let entries = log.list()?;
            if entries.is_empty() {
                println!("no generations yet");
                return Ok(());
            }
            for entry in entries.iter().take(limit) {
                println!(
                    "{}  {:<24} {:<28} {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.company,
                    entry.rightsholder,
                    entry.id
                );
            }
        }
        HistoryCommands::Show { id } => {
            let entry = log
                .get(&id)?
                .ok_or_else(|| anyhow::anyhow!("history entry '{id}' not found"))?;
            println!("{} for {}", entry.company, entry.rightsholder);
            println!("{}", entry.timestamp.to_rfc3339());
            println!();
            println!("RESEARCH");
            println!("{}", entry.research.trim_end());
            println!();
            print_drafts(&entry.drafts);
        }
    }

    Ok(())
}
