use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pitchdesk_core::{default_profile, ProfileDetails, RightsholderProfile};
use uuid::Uuid;

use crate::{read_json_array, write_json_array, StoreError};

/// The persisted set of rightsholder profiles.
///
/// At most one profile is active at any time. Every mutating call rewrites
/// the backing file before returning.
#[derive(Debug)]
pub struct ProfileRepository {
    path: PathBuf,
    profiles: Vec<RightsholderProfile>,
}

impl ProfileRepository {
    /// Open the repository at `path`, seeding it with the default profile when
    /// the file does not exist yet.
    ///
    /// A file that marks several profiles active is repaired by keeping the
    /// first one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read, parsed or written.
    pub fn open(path: impl Into<PathBuf>, now: DateTime<Utc>) -> Result<Self, StoreError> {
        let path = path.into();
        let Some(profiles) = read_json_array::<RightsholderProfile>(&path)? else {
            tracing::info!(path = %path.display(), "no profile file found, seeding default profile");
            let repo = Self {
                path,
                profiles: vec![default_profile(now)],
            };
            repo.save()?;
            return Ok(repo);
        };

        let mut repo = Self { path, profiles };
        if repo.profiles.iter().filter(|p| p.active).count() > 1 {
            tracing::warn!(
                path = %repo.path.display(),
                "multiple active profiles on disk, keeping the first"
            );
            let mut seen = false;
            for profile in &mut repo.profiles {
                if profile.active {
                    profile.active = !seen;
                    seen = true;
                }
            }
            repo.save()?;
        }
        Ok(repo)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn list(&self) -> &[RightsholderProfile] {
        &self.profiles
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RightsholderProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn active(&self) -> Option<&RightsholderProfile> {
        self.profiles.iter().find(|p| p.active)
    }

    /// Append a new, inactive profile and return it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be written.
    pub fn add(
        &mut self,
        details: ProfileDetails,
        now: DateTime<Utc>,
    ) -> Result<&RightsholderProfile, StoreError> {
        let profile = RightsholderProfile {
            id: format!("rh-{}", Uuid::new_v4().simple()),
            active: false,
            created: now,
            details,
        };
        tracing::debug!(id = %profile.id, name = %profile.details.name, "adding profile");
        let mut next = self.profiles.clone();
        next.push(profile);
        self.commit(next)?;
        Ok(&self.profiles[self.profiles.len() - 1])
    }

    /// Replace the editable fields of profile `id`, keeping its identity,
    /// creation time and active flag.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id, or an I/O error.
    pub fn update(&mut self, id: &str, details: ProfileDetails) -> Result<(), StoreError> {
        let index = self.index_of(id)?;
        let mut next = self.profiles.clone();
        next[index].details = details;
        self.commit(next)
    }

    /// Remove profile `id`. If it was active, the first remaining profile
    /// becomes active; an emptied repository has no active profile.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id, or an I/O error.
    pub fn delete(&mut self, id: &str) -> Result<RightsholderProfile, StoreError> {
        let index = self.index_of(id)?;
        let mut next = self.profiles.clone();
        let removed = next.remove(index);

        if removed.active {
            if let Some(first) = next.first_mut() {
                tracing::info!(id = %first.id, "active profile deleted, activating next");
                first.active = true;
            }
        }

        self.commit(next)?;
        Ok(removed)
    }

    /// Make `id` the only active profile.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id, or an I/O error.
    /// Either way the in-memory set is unchanged.
    pub fn activate(&mut self, id: &str) -> Result<&RightsholderProfile, StoreError> {
        let index = self.index_of(id)?;
        let next = self
            .profiles
            .iter()
            .map(|p| RightsholderProfile {
                active: p.id == id,
                ..p.clone()
            })
            .collect();
        self.commit(next)?;
        Ok(&self.profiles[index])
    }

    fn index_of(&self, id: &str) -> Result<usize, StoreError> {
        self.profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Persist `next`, then adopt it. A failed write leaves memory matching disk.
    fn commit(&mut self, next: Vec<RightsholderProfile>) -> Result<(), StoreError> {
        write_json_array(&self.path, &next)?;
        self.profiles = next;
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        write_json_array(&self.path, &self.profiles)
    }
}
