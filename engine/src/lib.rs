//! # Stow Engine
//!
//! An optimistic mutation store for small collections of records.
//!
//! A [`Store`] owns one ordered [`Collection`] of entities, applies
//! mutations to it immediately, and writes each mutation through a
//! [`Persistence`] adapter. If the write fails the local state is restored,
//! so the in-memory collection never drifts from what the medium accepted.
//!
//! ## Core Concepts
//!
//! ### Entities
//!
//! Anything implementing [`Entity`]: a string id, domain fields, and
//! `createdAt` / `updatedAt` timestamps. Each entity type declares a `Draft`
//! (input to [`Store::add`]) and a `Patch` (input to [`Store::update`]) with
//! an explicit merge. [`Todo`], [`Note`] and [`CartItem`] ship with the
//! crate.
//!
//! ### Persistence
//!
//! - [`MemoryAdapter`] - key/value [`MemoryStorage`], the in-process
//!   equivalent of browser local storage
//! - [`FileAdapter`] - one JSON file per collection
//! - [`RemoteAdapter`] - a REST resource over HTTP (feature `remote`)
//!
//! Loading is fail-soft: missing or corrupt data loads as an empty
//! collection (corruption is logged). Failed writes are errors.
//!
//! ### Cache
//!
//! [`Store::list`] serves a snapshot of the last known state when one is
//! held, counting hits and misses. Every successful write refreshes the
//! snapshot.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use stow_engine::{ListOptions, MemoryAdapter, MemoryStorage, Store, Todo, TodoDraft, TodoPatch};
//!
//! # tokio_test();
//! # fn tokio_test() {
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let storage = MemoryStorage::new();
//! let store: Store<Todo> = Store::new(Arc::new(MemoryAdapter::new(storage, "todos")));
//!
//! let todo = store.add(TodoDraft::new("Buy milk")).await.unwrap();
//! store.update(&todo.id, TodoPatch::done(true)).await.unwrap();
//!
//! let todos = store.list(ListOptions::default()).await.unwrap();
//! assert!(todos[0].done);
//! # });
//! # }
//! ```

pub mod cache;
pub mod clock;
pub mod codec;
pub mod collection;
pub mod entity;
pub mod error;
pub mod id;
pub mod model;
pub mod persist;
pub mod store;
pub mod validate;

// Re-export main types at crate root
pub use cache::CacheStats;
pub use clock::{Clock, ManualClock, SystemClock};
pub use collection::Collection;
pub use entity::{CollectionOrder, Entity, Timestamps};
pub use error::{Error, Result};
pub use id::IdStrategy;
pub use model::{
    CartItem, CartItemDraft, CartItemPatch, Note, NoteDraft, NotePatch, Todo, TodoDraft, TodoPatch,
};
pub use persist::{Change, FileAdapter, MemoryAdapter, MemoryStorage, Persistence};
#[cfg(feature = "remote")]
pub use persist::RemoteAdapter;
pub use store::{ListOptions, Phase, Store, StoreConfig, StoreEvent, StoreStats, WriteMode};

/// Type aliases for clarity
pub type EntityId = String;
pub type Timestamp = chrono::DateTime<chrono::Utc>;
