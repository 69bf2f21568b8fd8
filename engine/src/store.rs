//! Store - the in-memory state container.
//!
//! The Store owns one collection and its cache, applies mutations, and
//! writes each one through its persistence adapter. All operations take the
//! store's lock for their whole duration, persistence round trip included,
//! so mutations on one store never interleave.

use crate::cache::{Cache, CacheStats};
use crate::clock::{Clock, SystemClock};
use crate::collection::Collection;
use crate::entity::{CollectionOrder, Entity, Timestamps};
use crate::id::{IdGenerator, IdStrategy};
use crate::persist::{Change, Persistence};
use crate::{error::Result, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

const EVENT_CAPACITY: usize = 64;

/// When mutations become visible relative to the persistence call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Apply locally, then persist; roll back if persisting fails
    #[default]
    Optimistic,
    /// Persist first, apply only once it succeeded
    Pessimistic,
}

impl FromStr for WriteMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(WriteMode::Optimistic),
            "pessimistic" => Ok(WriteMode::Pessimistic),
            other => Err(Error::validation(
                "writeMode",
                format!("unknown write mode '{other}'"),
            )),
        }
    }
}

/// Store construction options.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Overrides the entity's default order
    pub order: Option<CollectionOrder>,
    /// Keep a cache snapshot for `list`
    pub cache: bool,
    pub write_mode: WriteMode,
    pub ids: IdStrategy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            order: None,
            cache: true,
            write_mode: WriteMode::Optimistic,
            ids: IdStrategy::Uuid,
        }
    }
}

/// Lifecycle of the in-memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Nothing has been read from the adapter yet
    Uninitialized,
    Loaded,
}

/// Options for [`Store::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    /// Bypass the cache and re-read the adapter
    #[serde(default)]
    pub fresh: bool,
}

impl ListOptions {
    pub fn fresh() -> Self {
        Self { fresh: true }
    }
}

/// Snapshot of store bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub phase: Phase,
    pub len: usize,
    /// Whether a cache snapshot is currently held
    pub cached: bool,
    pub cache: CacheStats,
}

/// Notification for subscribers (view bindings).
#[derive(Debug, Clone)]
pub enum StoreEvent<E: Entity> {
    /// A mutation was applied locally and is being persisted
    Applied(Change<E>),
    /// A mutation was persisted
    Committed(Change<E>),
    /// Persisting failed and local state was restored
    RolledBack { change: Change<E>, error: Error },
    /// The collection was (re)read from the adapter
    Reloaded { len: usize },
}

struct State<E> {
    phase: Phase,
    collection: Collection<E>,
    cache: Cache<E>,
}

/// Result of staging a mutation before persisting it.
enum Staged<E> {
    /// Already installed; `previous` is what to restore on failure
    Applied { previous: Collection<E> },
    /// Installed only once persisting succeeds
    Pending { next: Collection<E> },
}

/// The mutation store for one collection.
pub struct Store<E: Entity> {
    adapter: Arc<dyn Persistence<E>>,
    clock: Arc<dyn Clock>,
    ids: IdGenerator,
    write_mode: WriteMode,
    state: Mutex<State<E>>,
    events: broadcast::Sender<StoreEvent<E>>,
}

impl<E: Entity> Store<E> {
    /// Create a store with default options.
    pub fn new(adapter: Arc<dyn Persistence<E>>) -> Self {
        Self::with_config(adapter, StoreConfig::default())
    }

    pub fn with_config(adapter: Arc<dyn Persistence<E>>, config: StoreConfig) -> Self {
        let order = config.order.unwrap_or(E::ORDER);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            adapter,
            clock: Arc::new(SystemClock),
            ids: IdGenerator::new(config.ids),
            write_mode: config.write_mode,
            state: Mutex::new(State {
                phase: Phase::Uninitialized,
                collection: Collection::new(order),
                cache: Cache::new(config.cache),
            }),
            events,
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn namespace(&self) -> &str {
        self.adapter.namespace()
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    /// Subscribe to store events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent<E>> {
        self.events.subscribe()
    }

    /// Create an entity from a draft.
    pub async fn add(&self, draft: E::Draft) -> Result<E> {
        E::validate_draft(&draft)?;

        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;

        let id = self.ids.fresh_id(|id| state.collection.contains(id));
        let entity = E::from_draft(id, draft, Timestamps::created(self.clock.now()));

        let mut next = state.collection.clone();
        next.insert(entity.clone())?;

        let confirmed = self
            .write(&mut state, next, Change::Created(entity.clone()))
            .await?;
        Ok(confirmed.unwrap_or(entity))
    }

    /// Merge a patch into an existing entity.
    pub async fn update(&self, id: &str, patch: E::Patch) -> Result<E> {
        E::validate_patch(&patch)?;

        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;

        let before = state
            .collection
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let mut after = before.clone();
        after.merge(patch.clone());
        let stamp = self.clock.after(before.updated_at());
        after.timestamps_mut().touch(stamp);

        let mut next = state.collection.clone();
        next.replace(id, after.clone())?;

        let change = Change::Updated {
            before,
            after: after.clone(),
            patch,
        };
        let confirmed = self.write(&mut state, next, change).await?;
        Ok(confirmed.unwrap_or(after))
    }

    /// Remove an entity. Returns false when there was nothing to remove.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;

        let Some(removed) = state.collection.get(id).cloned() else {
            return Ok(false);
        };

        let mut next = state.collection.clone();
        next.remove(id);

        self.write(&mut state, next, Change::Removed(removed))
            .await?;
        Ok(true)
    }

    /// Current collection, from the cache when possible.
    pub async fn list(&self, options: ListOptions) -> Result<Vec<E>> {
        let mut state = self.state.lock().await;

        if !options.fresh && state.phase == Phase::Loaded {
            if let Some(snapshot) = state.cache.hit() {
                return Ok(snapshot);
            }
        }

        state.cache.record_miss();
        match self.adapter.load().await {
            Ok(entities) => {
                self.install(&mut state, entities);
                Ok(state.collection.to_vec())
            }
            Err(Error::Unavailable(namespace)) => {
                // nothing installed or cached: the next write reloads first
                warn!(%namespace, phase = ?state.phase, "storage unavailable, listing unconfirmed state");
                Ok(state.collection.to_vec())
            }
            Err(error) => Err(error),
        }
    }

    /// Look up one entity.
    pub async fn get(&self, id: &str) -> Result<Option<E>> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        Ok(state.collection.get(id).cloned())
    }

    /// Overwrite the whole collection.
    ///
    /// Every entity is validated before anything is staged.
    pub async fn replace_all(&self, entities: Vec<E>) -> Result<()> {
        for entity in &entities {
            if entity.id().trim().is_empty() {
                return Err(Error::validation(
                    "id",
                    format!("{} without an id", E::KIND),
                ));
            }
            entity.validate()?;
        }

        let mut state = self.state.lock().await;
        let order = state.collection.order();
        let (next, duplicates) = Collection::from_entities(order, entities);
        if let Some(id) = duplicates.into_iter().next() {
            return Err(Error::DuplicateId(id));
        }

        let change = Change::Replaced(next.to_vec());
        self.write(&mut state, next, change).await?;
        Ok(())
    }

    /// Remove everything, locally and in the backing medium.
    pub async fn clear(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        let order = state.collection.order();
        self.write(&mut state, Collection::new(order), Change::Cleared)
            .await?;
        Ok(())
    }

    /// Drop the cache snapshot so the next `list` reads the adapter.
    pub async fn invalidate_cache(&self) {
        self.state.lock().await.cache.invalidate();
    }

    pub async fn stats(&self) -> StoreStats {
        let state = self.state.lock().await;
        StoreStats {
            phase: state.phase,
            len: state.collection.len(),
            cached: state.cache.is_present(),
            cache: state.cache.stats(),
        }
    }

    async fn ensure_loaded(&self, state: &mut State<E>) -> Result<()> {
        if state.phase == Phase::Loaded {
            return Ok(());
        }
        let entities = self.adapter.load().await?;
        self.install(state, entities);
        Ok(())
    }

    /// Replace in-memory state with what the adapter returned.
    fn install(&self, state: &mut State<E>, entities: Vec<E>) {
        let order = state.collection.order();
        let (collection, duplicates) = Collection::from_entities(order, entities);
        if !duplicates.is_empty() {
            warn!(
                namespace = self.namespace(),
                ?duplicates,
                "dropped persisted entities with duplicate ids"
            );
        }

        state.collection = collection;
        state.phase = Phase::Loaded;
        state
            .cache
            .synced(state.collection.as_slice(), self.clock.now());

        let len = state.collection.len();
        debug!(namespace = self.namespace(), len, "collection loaded");
        self.emit(StoreEvent::Reloaded { len });
    }

    /// Stage `next`, persist `change`, then commit or roll back.
    ///
    /// Returns the entity confirmed by the adapter once it has been
    /// reconciled into the collection.
    async fn write(
        &self,
        state: &mut State<E>,
        next: Collection<E>,
        change: Change<E>,
    ) -> Result<Option<E>> {
        let staged = match self.write_mode {
            WriteMode::Optimistic => {
                let previous = std::mem::replace(&mut state.collection, next);
                self.emit(StoreEvent::Applied(change.clone()));
                Staged::Applied { previous }
            }
            WriteMode::Pessimistic => Staged::Pending { next },
        };

        let entities = match &staged {
            Staged::Applied { .. } => state.collection.as_slice(),
            Staged::Pending { next } => next.as_slice(),
        };
        let result = self.adapter.persist(&change, entities).await;

        match result {
            Ok(confirmed) => {
                if let Staged::Pending { next } = staged {
                    state.collection = next;
                }
                let confirmed = confirmed.filter(|c| self.reconcile(state, &change, c.clone()));

                state.phase = Phase::Loaded;
                state
                    .cache
                    .mutated(state.collection.as_slice(), self.clock.now());
                debug!(
                    namespace = self.namespace(),
                    change = change.label(),
                    len = state.collection.len(),
                    "write committed"
                );
                self.emit(StoreEvent::Committed(change));
                Ok(confirmed)
            }
            Err(error) => {
                if let Staged::Applied { previous } = staged {
                    state.collection = previous;
                }
                warn!(
                    namespace = self.namespace(),
                    change = change.label(),
                    %error,
                    "write failed, local state restored"
                );
                self.emit(StoreEvent::RolledBack {
                    change,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Swap the optimistic entity for the one the adapter confirmed.
    fn reconcile(&self, state: &mut State<E>, change: &Change<E>, confirmed: E) -> bool {
        let Some(id) = change.entity_id() else {
            return false;
        };
        match state.collection.replace(id, confirmed) {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(error) => {
                warn!(
                    namespace = self.namespace(),
                    id,
                    %error,
                    "ignoring confirmed entity"
                );
                false
            }
        }
    }

    fn emit(&self, event: StoreEvent<E>) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}
