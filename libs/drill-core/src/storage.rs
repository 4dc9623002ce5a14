//! In-process storage for tests and embedding.

use std::sync::{Mutex, MutexGuard};

use crate::collab::Storage;
use crate::error::StorageError;
use crate::types::{DrillCriteria, WordId, WordRecord, WordUpdate};

/// Word list kept in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    words: Mutex<Vec<WordRecord>>,
}

impl MemoryStorage {
    pub fn new(words: Vec<WordRecord>) -> Self {
        Self {
            words: Mutex::new(words),
        }
    }

    /// Snapshot of every stored word.
    pub fn words(&self) -> Result<Vec<WordRecord>, StorageError> {
        Ok(self.lock()?.clone())
    }

    pub fn get(&self, id: &WordId) -> Result<Option<WordRecord>, StorageError> {
        Ok(self.lock()?.iter().find(|w| &w.id == id).cloned())
    }

    pub fn insert(&self, word: WordRecord) -> Result<(), StorageError> {
        self.lock()?.push(word);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<WordRecord>>, StorageError> {
        self.words
            .lock()
            .map_err(|_| StorageError::Backend("memory storage lock poisoned".to_string()))
    }
}

impl Storage for MemoryStorage {
    async fn fetch_drill_words(
        &self,
        criteria: &DrillCriteria,
    ) -> Result<Vec<WordRecord>, StorageError> {
        let mut eligible: Vec<WordRecord> = self
            .lock()?
            .iter()
            .filter(|w| w.is_drillable() && !w.status.has(criteria.exclude))
            .cloned()
            .collect();
        eligible.sort_by_key(|w| w.updated_at);
        eligible.truncate(criteria.limit);
        Ok(eligible)
    }

    async fn batch_update(&self, updates: Vec<WordUpdate>) -> Result<(), StorageError> {
        let mut words = self.lock()?;

        let mut targets = Vec::with_capacity(updates.len());
        for update in &updates {
            let index = words
                .iter()
                .position(|w| w.id == update.id)
                .ok_or_else(|| StorageError::NotFound(update.id.clone()))?;
            targets.push(index);
        }

        for (index, update) in targets.into_iter().zip(&updates) {
            words[index].apply(update);
        }
        Ok(())
    }
}
