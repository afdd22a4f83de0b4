//! `profiles` command handlers.

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::Subcommand;
use pitchdesk_core::{AppConfig, ProfileDetails, RightsholderProfile};
use pitchdesk_store::ProfileRepository;

/// Sub-commands available under `profiles`.
#[derive(Debug, Subcommand)]
pub enum ProfileCommands {
    /// List all profiles; the active one is marked with `*`
    List,
    /// Print one profile as JSON
    Show { id: String },
    /// Add every profile from a YAML file (`profiles: [...]`)
    Import { path: PathBuf },
    /// Replace a profile's details with the single profile in a YAML file
    Update { id: String, path: PathBuf },
    /// Make a profile the active one
    Activate { id: String },
    /// Delete a profile
    Delete { id: String },
}

pub(crate) fn run(config: &AppConfig, command: ProfileCommands) -> anyhow::Result<()> {
    let mut repo = ProfileRepository::open(config.profiles_path(), Utc::now())?;

    match command {
        ProfileCommands::List => {
            if repo.list().is_empty() {
                println!("no profiles; add one with `pitchdesk profiles import <file>`");
            }
            for profile in repo.list() {
                println!("{}", list_line(profile));
            }
        }
        ProfileCommands::Show { id } => {
            let profile = repo
                .get(&id)
                .ok_or_else(|| anyhow::anyhow!("profile '{id}' not found"))?;
            println!("{}", serde_json::to_string_pretty(profile)?);
        }
        ProfileCommands::Import { path } => {
            let file = pitchdesk_core::load_profiles(&path)?;
            for details in file.profiles {
                let added = repo.add(details, Utc::now())?;
                println!("added {} ({})", added.id, added.name());
            }
        }
        ProfileCommands::Update { id, path } => {
            let details = single_profile(&path)?;
            repo.update(&id, details)?;
            println!("updated {id}");
        }
        ProfileCommands::Activate { id } => {
            let profile = repo.activate(&id)?;
            println!("active profile: {} ({})", profile.name(), profile.id);
        }
        ProfileCommands::Delete { id } => {
            let removed = repo.delete(&id)?;
            println!("deleted {} ({})", removed.id, removed.name());
            match repo.active() {
                Some(active) if removed.active => {
                    println!("active profile is now {} ({})", active.name(), active.id);
                }
                None => println!("no active profile"),
                Some(_) => {}
            }
        }
    }

    Ok(())
}

pub(crate) fn list_line(profile: &RightsholderProfile) -> String {
    let marker = if profile.active { "*" } else { " " };
    let league = &profile.details.league;
    if league.is_empty() {
        format!("{marker} {:<20} {}", profile.id, profile.name())
    } else {
        format!("{marker} {:<20} {} ({league})", profile.id, profile.name())
    }
}

pub(crate) fn single_profile(path: &Path) -> anyhow::Result<ProfileDetails> {
    let mut file = pitchdesk_core::load_profiles(path)?;
    if file.profiles.len() != 1 {
        anyhow::bail!(
            "{} must contain exactly one profile, found {}",
            path.display(),
            file.profiles.len()
        );
    }
    Ok(file.profiles.remove(0))
}
