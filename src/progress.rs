//! Player progress
//!
//! Tracks completed stages, currency, the premium unlock and route choices.
//! Loaded once at startup, saved after every change, cleared on reset.
//! Storage trouble never reaches the player: a bad record loads as fresh
//! progress and failed saves are only logged.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{STAGES, Stage, first_stage, stage_by_id};
use crate::error::RaceError;
use crate::persistence::ProgressStorage;

/// Persisted progress record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerProgress {
    pub current_stage: u32,
    pub completed_stages: BTreeSet<u32>,
    pub total_coins: u64,
    pub total_experience: u64,
    pub has_paid: bool,
    /// Stage id -> route choice id
    pub choices: BTreeMap<u32, String>,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            current_stage: 1,
            completed_stages: BTreeSet::new(),
            total_coins: 0,
            total_experience: 0,
            has_paid: false,
            choices: BTreeMap::new(),
        }
    }
}

/// Lock/completion status of one catalog stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageStatus {
    pub stage: &'static Stage,
    pub is_locked: bool,
    pub is_completed: bool,
    pub can_access: bool,
}

/// Progress plus the storage it persists to
#[derive(Debug)]
pub struct ProgressStore<S: ProgressStorage> {
    progress: PlayerProgress,
    storage: S,
}

impl<S: ProgressStorage> ProgressStore<S> {
    /// Load saved progress, falling back to a fresh start
    pub fn load(storage: S) -> Self {
        let progress = match storage.load() {
            Ok(Some(progress)) => {
                log::info!(
                    "Loaded progress: {} stages completed, {} coins",
                    progress.completed_stages.len(),
                    progress.total_coins
                );
                progress
            }
            Ok(None) => {
                log::info!("No saved progress, starting fresh");
                PlayerProgress::default()
            }
            Err(e) => {
                log::warn!("Discarding unreadable progress: {}", e);
                PlayerProgress::default()
            }
        };
        Self { progress, storage }
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Record a finished race.
    ///
    /// Replaying a completed stage pays out again but does not duplicate it.
    /// Ids outside the catalog are rejected and change nothing.
    pub fn complete_stage(
        &mut self,
        stage_id: u32,
        coins: u32,
        experience: u32,
    ) -> Result<(), RaceError> {
        let stage = stage_by_id(stage_id).ok_or(RaceError::UnknownStage(stage_id))?;
        let next_id = stage.id.saturating_add(1);

        let p = &mut self.progress;
        let first_clear = p.completed_stages.insert(stage.id);
        p.current_stage = p.current_stage.max(next_id);
        p.total_coins += u64::from(coins);
        p.total_experience += u64::from(experience);

        if first_clear {
            match stage_by_id(next_id) {
                Some(next) => log::info!("Stage {} completed, {} unlocked", stage.id, next.name),
                None => log::info!("Stage {} completed", stage.id),
            }
        }
        self.persist();
        Ok(())
    }

    /// Remember which route the player took on a stage
    pub fn record_choice(&mut self, stage_id: u32, choice_id: &str) {
        self.progress
            .choices
            .insert(stage_id, choice_id.to_string());
        self.persist();
    }

    /// Grant access to paid stages
    pub fn unlock_paid_content(&mut self) {
        self.progress.has_paid = true;
        log::info!("Premium content unlocked");
        self.persist();
    }

    /// Back to a fresh start and wipe the saved record
    pub fn reset_progress(&mut self) {
        self.progress = PlayerProgress::default();
        if let Err(e) = self.storage.clear() {
            log::warn!("Failed to clear saved progress: {}", e);
        }
        log::info!("Progress reset");
    }

    /// Stage `n > 1` is locked until stage `n - 1` is completed
    pub fn is_locked(&self, stage: &Stage) -> bool {
        stage.id > 1 && !self.progress.completed_stages.contains(&(stage.id - 1))
    }

    pub fn is_completed(&self, stage: &Stage) -> bool {
        self.progress.completed_stages.contains(&stage.id)
    }

    /// Unlocked, and paid for if the stage requires it
    pub fn can_access(&self, stage: &Stage) -> bool {
        (!stage.requires_payment || self.progress.has_paid) && !self.is_locked(stage)
    }

    /// Status of every catalog stage, in order
    pub fn stage_statuses(&self) -> Vec<StageStatus> {
        STAGES
            .iter()
            .map(|stage| StageStatus {
                stage,
                is_locked: self.is_locked(stage),
                is_completed: self.is_completed(stage),
                can_access: self.can_access(stage),
            })
            .collect()
    }

    /// The stage the player is up to (the first one once everything is done)
    pub fn current_stage_data(&self) -> &'static Stage {
        stage_by_id(self.progress.current_stage).unwrap_or_else(first_stage)
    }

    /// Share of the catalog completed, 0-100
    pub fn completion_percentage(&self) -> f32 {
        let completed = self
            .progress
            .completed_stages
            .iter()
            .filter(|id| stage_by_id(**id).is_some())
            .count();
        completed as f32 / STAGES.len() as f32 * 100.0
    }

    fn persist(&mut self) {
        if let Err(e) = self.storage.save(&self.progress) {
            log::warn!("Failed to save progress: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::persistence::{MemoryStorage, decode};

    fn fresh() -> ProgressStore<MemoryStorage> {
        ProgressStore::load(MemoryStorage::new())
    }

    fn stage(id: u32) -> &'static Stage {
        stage_by_id(id).unwrap()
    }

    /// Backend whose writes always fail
    struct BrokenStorage;

    impl ProgressStorage for BrokenStorage {
        fn load(&self) -> Result<Option<PlayerProgress>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn save(&mut self, _progress: &PlayerProgress) -> Result<(), StorageError> {
            Err(StorageError::Backend("quota exceeded".to_string()))
        }

        fn clear(&mut self) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_fresh_store_unlocks_only_stage_one() {
        let store = fresh();
        assert!(!store.is_locked(stage(1)));
        assert!(store.can_access(stage(1)));
        assert!(store.is_locked(stage(2)));
        assert!(!store.can_access(stage(2)));
    }

    #[test]
    fn test_completing_unlocks_next() {
        let mut store = fresh();
        store.complete_stage(1, 60, 120).unwrap();

        assert!(store.is_completed(stage(1)));
        assert!(store.can_access(stage(2)));
        assert!(store.is_locked(stage(3)));
        assert_eq!(store.progress().current_stage, 2);
        assert_eq!(store.progress().total_coins, 60);
        assert_eq!(store.progress().total_experience, 120);
    }

    #[test]
    fn test_complete_stage_twice_accumulates_without_duplicates() {
        let mut store = fresh();
        store.complete_stage(1, 50, 100).unwrap();
        store.complete_stage(1, 50, 100).unwrap();

        assert_eq!(store.progress().completed_stages.len(), 1);
        assert_eq!(store.progress().total_coins, 100);
        assert_eq!(store.progress().total_experience, 200);
        assert_eq!(store.progress().current_stage, 2);
    }

    #[test]
    fn test_current_stage_never_moves_back() {
        let mut store = fresh();
        store.complete_stage(5, 0, 0).unwrap();
        store.complete_stage(2, 0, 0).unwrap();
        assert_eq!(store.progress().current_stage, 6);
    }

    #[test]
    fn test_paid_stage_needs_unlock() {
        let mut store = fresh();
        store.complete_stage(19, 0, 0).unwrap();
        assert!(!store.is_locked(stage(20)));
        assert!(!store.can_access(stage(20)));

        store.unlock_paid_content();
        assert!(store.can_access(stage(20)));
    }

    #[test]
    fn test_payment_does_not_skip_lock() {
        let mut store = fresh();
        store.unlock_paid_content();
        assert!(!store.can_access(stage(20)));
    }

    #[test]
    fn test_every_mutation_is_saved() {
        let mut store = fresh();
        store.record_choice(1, "safe");
        let saved = decode(store.storage().raw().unwrap()).unwrap();
        assert_eq!(saved.choices.get(&1).map(String::as_str), Some("safe"));

        store.record_choice(1, "risky");
        store.complete_stage(1, 10, 20).unwrap();
        let saved = decode(store.storage().raw().unwrap()).unwrap();
        assert_eq!(saved, *store.progress());
        assert_eq!(saved.choices.get(&1).map(String::as_str), Some("risky"));
    }

    #[test]
    fn test_reload_restores_progress() {
        let mut store = fresh();
        store.complete_stage(1, 75, 150).unwrap();
        store.unlock_paid_content();

        let reloaded = ProgressStore::load(store.storage().clone());
        assert_eq!(reloaded.progress(), store.progress());
        assert!(reloaded.can_access(stage(2)));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut store = fresh();
        store.complete_stage(1, 75, 150).unwrap();
        store.unlock_paid_content();
        store.reset_progress();

        assert_eq!(*store.progress(), PlayerProgress::default());
        assert!(store.storage().raw().is_none());
        assert!(store.is_locked(stage(2)));
    }

    #[test]
    fn test_corrupt_record_falls_back_to_defaults() {
        let store = ProgressStore::load(MemoryStorage::with_raw("{\"completedStages\": 7"));
        assert_eq!(*store.progress(), PlayerProgress::default());
    }

    #[test]
    fn test_storage_failures_are_silent() {
        let mut store = ProgressStore::load(BrokenStorage);
        store.complete_stage(1, 5, 5).unwrap();
        store.reset_progress();
        assert_eq!(*store.progress(), PlayerProgress::default());
    }

    #[test]
    fn test_unknown_stage_rejected() {
        let mut store = fresh();
        store.complete_stage(1, 10, 10).unwrap();
        let before = store.progress().clone();

        assert_eq!(
            store.complete_stage(999, 10, 10),
            Err(RaceError::UnknownStage(999))
        );
        assert_eq!(
            store.complete_stage(u32::MAX, 1, 1),
            Err(RaceError::UnknownStage(u32::MAX))
        );
        assert_eq!(
            store.complete_stage(0, 1, 1),
            Err(RaceError::UnknownStage(0))
        );
        assert_eq!(*store.progress(), before);
        assert_eq!(decode(store.storage().raw().unwrap()).unwrap(), before);
    }

    #[test]
    fn test_stage_views() {
        let mut store = fresh();
        assert_eq!(store.current_stage_data().id, 1);
        assert_eq!(store.completion_percentage(), 0.0);

        store.complete_stage(1, 0, 0).unwrap();
        store.complete_stage(2, 0, 0).unwrap();
        assert_eq!(store.current_stage_data().id, 3);
        assert_eq!(store.completion_percentage(), 10.0);

        let statuses = store.stage_statuses();
        assert_eq!(statuses.len(), 20);
        assert!(statuses[1].is_completed);
        assert!(statuses[2].can_access);
        assert!(statuses[3].is_locked);

        // Past the last stage the map points back at the first
        store.complete_stage(20, 0, 0).unwrap();
        assert_eq!(store.current_stage_data().id, 1);
    }
}
