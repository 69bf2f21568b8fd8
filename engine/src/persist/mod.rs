//! Persistence adapters.
//!
//! A [`Persistence`] implementation hides the backing medium from the
//! [`Store`](crate::Store). Three media are provided:
//!
//! - [`MemoryAdapter`]: a key/value [`MemoryStorage`] handle, the in-process
//!   stand-in for browser local storage.
//! - [`FileAdapter`]: one JSON file per namespace.
//! - [`RemoteAdapter`] (feature `remote`): a REST resource over HTTP.

mod file;
mod memory;
#[cfg(feature = "remote")]
mod remote;

pub use file::FileAdapter;
pub use memory::{MemoryAdapter, MemoryStorage};
#[cfg(feature = "remote")]
pub use remote::RemoteAdapter;

use crate::entity::Entity;
use crate::error::Result;
use async_trait::async_trait;

/// One mutation, as handed to [`Persistence::persist`].
#[derive(Debug, Clone)]
pub enum Change<E: Entity> {
    Created(E),
    Updated { before: E, after: E, patch: E::Patch },
    Removed(E),
    /// The whole collection was overwritten
    Replaced(Vec<E>),
    Cleared,
}

impl<E: Entity> Change<E> {
    /// Identifier of the single entity this change is about, if any.
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            Change::Created(entity) | Change::Removed(entity) => Some(entity.id()),
            Change::Updated { after, .. } => Some(after.id()),
            Change::Replaced(_) | Change::Cleared => None,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Change::Created(_) => "create",
            Change::Updated { .. } => "update",
            Change::Removed(_) => "remove",
            Change::Replaced(_) => "replace",
            Change::Cleared => "clear",
        }
    }
}

/// Reads and writes a collection to a backing medium.
#[async_trait]
pub trait Persistence<E: Entity>: Send + Sync {
    /// Name of the collection in the medium (storage key, file stem, resource).
    fn namespace(&self) -> &str;

    /// The persisted collection, or empty when nothing is stored.
    ///
    /// A medium that cannot be read returns [`Error::Unavailable`](crate::Error::Unavailable)
    /// rather than an empty collection, so the store never mistakes it for
    /// real data and writes over what is still persisted.
    async fn load(&self) -> Result<Vec<E>>;

    /// Overwrite the persisted collection.
    async fn save(&self, entities: &[E]) -> Result<()>;

    /// Remove everything persisted under this namespace.
    async fn clear(&self) -> Result<()>;

    /// Write one mutation through. `entities` is the full collection after
    /// the change.
    ///
    /// Returns the entity as confirmed by the medium when it may differ from
    /// the local one (e.g. a server assigning its own id).
    async fn persist(&self, change: &Change<E>, entities: &[E]) -> Result<Option<E>> {
        match change {
            Change::Cleared => self.clear().await?,
            _ => self.save(entities).await?,
        }
        Ok(None)
    }
}
