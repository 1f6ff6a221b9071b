// A record store kept in a JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use photo_ranking::*;
use snafu::prelude::*;

use crate::judge::*;

/// Holds the records in memory and rewrites the whole file after every change.
/// A batch written through `put_all` costs a single rewrite.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: BTreeMap<IdentityKey, ScoredRecord>,
}

impl JsonFileStore {
    /// Opens the store. A file that does not exist yet is an empty store.
    pub fn open(path: &Path) -> BAppResult<JsonFileStore> {
        let path_s = path.display().to_string();
        let mut records: BTreeMap<IdentityKey, ScoredRecord> = BTreeMap::new();
        if path.exists() {
            let contents = fs::read_to_string(path).context(OpeningFileSnafu {
                path: path_s.clone(),
            })?;
            let saved: Vec<ScoredRecord> =
                serde_json::from_str(&contents).context(ParsingJsonSnafu { path: path_s })?;
            for rec in saved {
                records.insert(rec.id.clone(), rec);
            }
            info!("JsonFileStore: {} records in {}", records.len(), path.display());
        } else {
            info!("JsonFileStore: {} does not exist, starting empty", path.display());
        }
        Ok(JsonFileStore {
            path: path.to_path_buf(),
            records,
        })
    }

    fn save(&self, key: &str) -> JudgeResult<()> {
        let failed = |e: Box<dyn std::error::Error + Send + Sync>| JudgeError::StoreFailure {
            key: key.to_string(),
            source: e,
        };
        let saved: Vec<&ScoredRecord> = self.records.values().collect();
        let js = serde_json::to_string_pretty(&saved).map_err(|e| failed(Box::new(e)))?;
        fs::write(&self.path, js).map_err(|e| failed(Box::new(e)))?;
        debug!("JsonFileStore: saved {} records", saved.len());
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn put(&mut self, record: &ScoredRecord) -> JudgeResult<()> {
        let previous = self.records.insert(record.id.clone(), record.clone());
        let res = self.save(record.id.as_str());
        if res.is_err() {
            // Keep memory and disk in step.
            match previous {
                Some(p) => self.records.insert(record.id.clone(), p),
                None => self.records.remove(&record.id),
            };
        }
        res
    }

    fn get(&self, id: &IdentityKey) -> JudgeResult<Option<ScoredRecord>> {
        Ok(self.records.get(id).cloned())
    }

    fn get_all(&self) -> JudgeResult<Vec<ScoredRecord>> {
        Ok(self.records.values().cloned().collect())
    }

    fn delete(&mut self, id: &IdentityKey) -> JudgeResult<()> {
        if self.records.remove(id).is_some() {
            self.save(id.as_str())?;
        }
        Ok(())
    }

    fn clear(&mut self) -> JudgeResult<()> {
        self.records.clear();
        self.save("*")
    }

    fn put_all(&mut self, records: &[&ScoredRecord]) -> Vec<(IdentityKey, String)> {
        let mut previous: Vec<(IdentityKey, Option<ScoredRecord>)> = Vec::new();
        for rec in records.iter() {
            let p = self.records.insert(rec.id.clone(), (*rec).clone());
            previous.push((rec.id.clone(), p));
        }
        match self.save("*") {
            Ok(()) => Vec::new(),
            Err(e) => {
                let msg = e.to_string();
                // Undo in reverse so a key repeated in the batch gets its oldest value back.
                for (id, p) in previous.into_iter().rev() {
                    match p {
                        Some(p) => self.records.insert(id, p),
                        None => self.records.remove(&id),
                    };
                }
                records.iter().map(|r| (r.id.clone(), msg.clone())).collect()
            }
        }
    }
}
