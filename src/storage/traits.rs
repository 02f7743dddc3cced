use std::collections::BTreeMap;

use anyhow::Result;

use crate::model::TodoItem;

/// Policy for reseeding the file backend's id counter on `load`.
///
/// `Count` replays the historical behavior of seeding the counter with the
/// number of loaded items; after deletions a fresh `add` can collide with a
/// surviving id. `MaxId` seeds from the largest loaded id and never collides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdSeed {
    #[default]
    Count,
    MaxId,
}

/// Persistence abstraction over the todo map.
///
/// Unknown ids on `remove`/`update` are reported as `None`, never as an
/// error. Storage-engine failures propagate as `anyhow::Error`.
pub trait Repository {
    /// Replaces in-memory state with what durable storage holds.
    fn load(&mut self) -> Result<()>;

    /// Assigns a fresh id, inserts the item, returns it as stored.
    fn add(&mut self, item: TodoItem) -> Result<TodoItem>;

    /// Removes the entry if present.
    fn remove(&mut self, id: u64) -> Result<Option<TodoItem>>;

    /// Replaces the entry if present. Never inserts on an unknown id.
    fn update(&mut self, id: u64, item: TodoItem) -> Result<Option<TodoItem>>;

    /// Durably persists current in-memory state. No-op for backends that
    /// commit on every mutation.
    fn flush(&mut self) -> Result<()>;

    /// Releases the underlying storage handle.
    fn close(&mut self) -> Result<()>;

    /// Current in-memory state.
    fn items(&self) -> &BTreeMap<u64, TodoItem>;

    /// The id the backend just assigned, when id assignment happens
    /// in-process (file counter). Backends whose storage engine assigns ids
    /// return `None` and the caller falls back to the largest key.
    fn next_id_hint(&self) -> Option<u64>;
}
