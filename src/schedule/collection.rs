//! The in-memory activity collection and its persistence.

use anyhow::Context;
use log::{debug, info, warn};
use thiserror::Error;

use super::conflict::{find_conflicts, BatchPolicy, Conflict};
use super::types::Activity;
use crate::storage::KeyValueStore;

/// Storage key holding the JSON array of activities
pub const ACTIVITIES_KEY: &str = "activities";

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule conflicts detected:\n{}", format_conflicts(.0))]
    Conflicts(Vec<Conflict>),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

fn format_conflicts(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(|c| format!("- {}", c))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Owns the activities for a session. All additions go through the conflict
/// detector, and every mutation is written back to the store.
pub struct ActivityCollection {
    activities: Vec<Activity>,
    store: Box<dyn KeyValueStore>,
    batch_policy: BatchPolicy,
}

impl ActivityCollection {
    /// Load from the store. Missing or unreadable data gives an empty collection.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let activities = match store.get(ACTIVITIES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Activity>>(&raw) {
                Ok(activities) => {
                    info!("Loaded {} activities", activities.len());
                    activities
                }
                Err(e) => {
                    warn!("Stored activities are corrupt, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read stored activities, starting empty: {:#}", e);
                Vec::new()
            }
        };

        Self {
            activities,
            store,
            batch_policy: BatchPolicy::default(),
        }
    }

    pub fn with_batch_policy(mut self, policy: BatchPolicy) -> Self {
        self.batch_policy = policy;
        self
    }

    pub fn set_batch_policy(&mut self, policy: BatchPolicy) {
        self.batch_policy = policy;
    }

    pub fn add(&mut self, activity: Activity) -> Result<(), ScheduleError> {
        self.add_batch(vec![activity])
    }

    /// Add all candidates or none of them.
    ///
    /// Every candidate is checked before anything is committed; if any of them
    /// conflicts the batch is dropped and all conflicting pairs are returned.
    pub fn add_batch(&mut self, batch: Vec<Activity>) -> Result<(), ScheduleError> {
        let conflicts = find_conflicts(&batch, &self.activities, self.batch_policy);
        if !conflicts.is_empty() {
            info!("Rejected batch of {} activities: {} conflicts", batch.len(), conflicts.len());
            return Err(ScheduleError::Conflicts(conflicts));
        }
        if batch.is_empty() {
            return Ok(());
        }

        debug!("Adding {} activities", batch.len());
        self.activities.extend(batch);
        self.persist()
    }

    /// Remove by id. Returns whether anything was removed; an unknown id is not an error.
    pub fn remove(&mut self, id: &str) -> Result<bool, ScheduleError> {
        let before = self.activities.len();
        self.activities.retain(|a| a.id != id);
        if self.activities.len() == before {
            debug!("Remove ignored, no activity with id {}", id);
            return Ok(false);
        }

        self.persist()?;
        Ok(true)
    }

    /// Snapshot in insertion order
    pub fn list(&self) -> Vec<Activity> {
        self.activities.clone()
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    fn persist(&mut self) -> Result<(), ScheduleError> {
        let json = serde_json::to_string(&self.activities).context("Failed to serialize activities")?;
        self.store
            .set(ACTIVITIES_KEY, &json)
            .context("Failed to save activities")?;
        Ok(())
    }
}
