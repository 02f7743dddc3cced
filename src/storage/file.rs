use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::traits::{IdSeed, Repository};
use crate::model::TodoItem;

/// Flat-file backend. All items live in one JSON object keyed by decimal
/// string ids; the file is authoritative only at `load` and `flush`
/// boundaries, reads in between are served from the in-memory map.
pub struct FileRepository {
    path: PathBuf,
    file: Option<File>,
    data: BTreeMap<u64, TodoItem>,
    index_counter: u64,
    id_seed: IdSeed,
}

impl FileRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_seed(path, IdSeed::default())
    }

    pub fn open_with_seed<P: AsRef<Path>>(path: P, id_seed: IdSeed) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
            .with_context(|| format!("opening todo store {}", path.display()))?;
        Ok(Self {
            path,
            file: Some(file),
            data: BTreeMap::new(),
            index_counter: 0,
            id_seed,
        })
    }

    fn handle(&mut self) -> Result<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("todo store {} already closed", self.path.display()))
    }
}

impl Repository for FileRepository {
    fn load(&mut self) -> Result<()> {
        let path = self.path.clone();
        let file = self.handle()?;
        file.seek(SeekFrom::Start(0))?;
        let mut raw = String::new();
        file.read_to_string(&mut raw)
            .with_context(|| format!("reading todo store {}", path.display()))?;

        self.data = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(err) => {
                log::warn!(
                    "Todo store {} is empty or malformed ({}); starting from an empty map",
                    path.display(),
                    err
                );
                BTreeMap::new()
            }
        };
        self.index_counter = match self.id_seed {
            IdSeed::Count => self.data.len() as u64,
            IdSeed::MaxId => self.data.keys().next_back().copied().unwrap_or(0),
        };
        Ok(())
    }

    fn add(&mut self, item: TodoItem) -> Result<TodoItem> {
        self.index_counter += 1;
        self.data.insert(self.index_counter, item.clone());
        Ok(item)
    }

    fn remove(&mut self, id: u64) -> Result<Option<TodoItem>> {
        Ok(self.data.remove(&id))
    }

    fn update(&mut self, id: u64, item: TodoItem) -> Result<Option<TodoItem>> {
        match self.data.get_mut(&id) {
            Some(slot) => {
                *slot = item.clone();
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    fn flush(&mut self) -> Result<()> {
        let payload = serde_json::to_vec(&self.data)?;
        let path = self.path.clone();
        let file = self.handle()?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&payload)
            .with_context(|| format!("rewriting todo store {}", path.display()))?;
        file.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the handle releases the descriptor on all exit paths.
        self.file.take();
        Ok(())
    }

    fn items(&self) -> &BTreeMap<u64, TodoItem> {
        &self.data
    }

    fn next_id_hint(&self) -> Option<u64> {
        Some(self.index_counter)
    }
}
