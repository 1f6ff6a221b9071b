//! The persistence seam.
//!
//! The record set can be saved to any keyed store. Only the full-load and
//! the write-all paths are used by the engine.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::config::ScoredRecord;
use crate::error::JudgeResult;
use crate::identity::IdentityKey;
use crate::reconcile::RecordSet;

pub trait RecordStore {
    fn put(&mut self, record: &ScoredRecord) -> JudgeResult<()>;
    fn get(&self, id: &IdentityKey) -> JudgeResult<Option<ScoredRecord>>;
    fn get_all(&self) -> JudgeResult<Vec<ScoredRecord>>;
    fn delete(&mut self, id: &IdentityKey) -> JudgeResult<()>;
    fn clear(&mut self) -> JudgeResult<()>;

    /// Writes a batch of records and returns the ones that could not be
    /// written. Stores that pay per write should save the batch once.
    fn put_all(&mut self, records: &[&ScoredRecord]) -> Vec<(IdentityKey, String)> {
        let mut failed: Vec<(IdentityKey, String)> = Vec::new();
        for rec in records.iter() {
            if let Err(e) = self.put(rec) {
                failed.push((rec.id.clone(), e.to_string()));
            }
        }
        failed
    }
}

/// A store that lives as long as the session.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<IdentityKey, ScoredRecord>,
}

impl RecordStore for MemoryStore {
    fn put(&mut self, record: &ScoredRecord) -> JudgeResult<()> {
        self.records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn get(&self, id: &IdentityKey) -> JudgeResult<Option<ScoredRecord>> {
        Ok(self.records.get(id).cloned())
    }

    fn get_all(&self) -> JudgeResult<Vec<ScoredRecord>> {
        Ok(self.records.values().cloned().collect())
    }

    fn delete(&mut self, id: &IdentityKey) -> JudgeResult<()> {
        self.records.remove(id);
        Ok(())
    }

    fn clear(&mut self) -> JudgeResult<()> {
        self.records.clear();
        Ok(())
    }
}

/// Writes every record of the set. A failing record is logged and returned,
/// the others are still written.
pub fn persist_all(set: &RecordSet, store: &mut dyn RecordStore) -> Vec<(IdentityKey, String)> {
    let records: Vec<&ScoredRecord> = set.records().collect();
    let failed = store.put_all(&records);
    for (id, e) in failed.iter() {
        warn!("persist_all: could not save {}: {}", id, e);
    }
    debug!(
        "persist_all: saved {} records, {} failures",
        set.len() - failed.len(),
        failed.len()
    );
    failed
}
