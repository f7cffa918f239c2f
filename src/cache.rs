use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, error};

use crate::config::StatementMapping;
use crate::data::{self, Statement, StatementError};

struct CacheEntry {
    modified: SystemTime,
    statement: Statement,
}

/// Parsed statements keyed by path. An entry is reused only while the file's
/// modification time is unchanged.
pub struct TransactionCache {
    mapping: StatementMapping,
    entries: HashMap<PathBuf, CacheEntry>,
}

impl TransactionCache {
    pub fn new(mapping: StatementMapping) -> TransactionCache {
        TransactionCache {
            mapping,
            entries: HashMap::new(),
        }
    }

    pub fn get_or_parse(&mut self, path: impl AsRef<Path>) -> Result<&Statement, StatementError> {
        let path = path.as_ref();
        let modified = fs::metadata(path)?.modified()?;

        let entry = match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().modified == modified {
                    debug!("cache hit, path={}", path.display());
                } else {
                    debug!("stale cache entry, path={}", path.display());
                    match data::parse_file(path, &self.mapping) {
                        Ok(statement) => {
                            occupied.insert(CacheEntry { modified, statement });
                        },
                        Err(err) => {
                            occupied.remove();
                            return Err(err);
                        },
                    }
                }
                occupied.into_mut()
            },
            Entry::Vacant(vacant) => {
                debug!("cache miss, path={}", path.display());
                let statement = data::parse_file(path, &self.mapping)?;
                vacant.insert(CacheEntry { modified, statement })
            },
        };

        Ok(&entry.statement)
    }

    /// Parses every statement in `dir` and returns the paths that loaded, newest first.
    pub fn load_all(&mut self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, StatementError> {
        let mut loaded = Vec::new();

        for path in data::statement_files(dir)? {
            match self.get_or_parse(&path) {
                Ok(_) => loaded.push(path),
                Err(err) => error!("failed to load statement, path={}, err={}", path.display(), err),
            }
        }

        Ok(loaded)
    }

    pub fn invalidate(&mut self, path: impl AsRef<Path>) -> bool {
        self.entries.remove(path.as_ref()).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
