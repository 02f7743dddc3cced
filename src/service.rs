use std::collections::BTreeMap;
use std::sync::Mutex;

use thiserror::Error;

use crate::model::TodoItem;
use crate::storage::Repository;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service is closed")]
    Closed,
    #[error("service lock poisoned")]
    LockPoisoned,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// A todo item together with the id it is stored under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredTodo {
    pub id: u64,
    pub item: TodoItem,
}

struct Inner {
    repo: Box<dyn Repository + Send>,
    closed: bool,
}

/// Orchestrates the repository lifecycle: load on construction, flush/close
/// on shutdown, id resolution on add. One coarse mutex guards the whole
/// repository; operations are short and contention is low.
pub struct TodoService {
    inner: Mutex<Inner>,
}

impl TodoService {
    /// Wraps the repository and loads durable state immediately.
    pub fn new(mut repo: Box<dyn Repository + Send>) -> Result<Self, ServiceError> {
        repo.load()?;
        Ok(Self {
            inner: Mutex::new(Inner {
                repo,
                closed: false,
            }),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, ServiceError> {
        let guard = self.inner.lock().map_err(|_| ServiceError::LockPoisoned)?;
        if guard.closed {
            return Err(ServiceError::Closed);
        }
        Ok(guard)
    }

    pub fn get_all(&self) -> Result<BTreeMap<u64, TodoItem>, ServiceError> {
        Ok(self.lock()?.repo.items().clone())
    }

    /// Adds the item and reports the id it was stored under. Backends that
    /// assign ids in-process expose them through `next_id_hint`; for
    /// engine-assigned ids the largest key in the map is the one just
    /// inserted.
    pub fn add(&self, item: TodoItem) -> Result<StoredTodo, ServiceError> {
        let mut guard = self.lock()?;
        let item = guard.repo.add(item)?;
        let id = match guard.repo.next_id_hint() {
            Some(id) => id,
            None => guard
                .repo
                .items()
                .keys()
                .next_back()
                .copied()
                .ok_or_else(|| anyhow::anyhow!("repository reported no id after add"))?,
        };
        Ok(StoredTodo { id, item })
    }

    /// Returns whether an entry existed under `id`. Absence is a normal
    /// outcome, not an error.
    pub fn remove(&self, id: u64) -> Result<bool, ServiceError> {
        Ok(self.lock()?.repo.remove(id)?.is_some())
    }

    /// Returns whether an entry existed under `id`; never inserts.
    pub fn update(&self, id: u64, item: TodoItem) -> Result<bool, ServiceError> {
        Ok(self.lock()?.repo.update(id, item)?.is_some())
    }

    /// Flushes, then releases the storage handle. Every later operation
    /// fails fast with `ServiceError::Closed`.
    pub fn close(&self) -> Result<(), ServiceError> {
        let mut guard = self.lock()?;
        guard.repo.flush()?;
        guard.repo.close()?;
        guard.closed = true;
        Ok(())
    }
}
