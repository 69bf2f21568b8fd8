//! Stow Server - REST service hosting stow stores.
//!
//! Each collection is exposed as a resource (`/todos`, `/notes`, `/cart`)
//! with the REST shape that `stow_engine::RemoteAdapter` consumes, so one
//! store can persist into another running behind this server.

pub mod config;
pub mod error;
mod routes;

use crate::config::Config;
use axum::Router;
use std::sync::Arc;
use stow_engine::{
    CartItem, Entity, FileAdapter, MemoryAdapter, MemoryStorage, Note, Persistence, Store,
    StoreConfig, Todo,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<Store<Todo>>,
    pub notes: Arc<Store<Note>>,
    pub cart: Arc<Store<CartItem>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build the stores described by `config`.
    ///
    /// Collections are JSON files under `data_dir` when it is set, and
    /// entries of one in-process [`MemoryStorage`] otherwise.
    pub fn from_config(config: Config) -> stow_engine::Result<Self> {
        match config.data_dir.clone() {
            Some(dir) => Ok(Self::with_adapters(
                Arc::new(FileAdapter::<Todo>::new(&dir, "todos")?),
                Arc::new(FileAdapter::<Note>::new(&dir, "notes")?),
                Arc::new(FileAdapter::<CartItem>::new(&dir, "cart")?),
                config,
            )),
            None => Ok(Self::in_memory(MemoryStorage::new(), config)),
        }
    }

    /// Stores backed by entries of `storage`.
    pub fn in_memory(storage: MemoryStorage, config: Config) -> Self {
        Self::with_adapters(
            Arc::new(MemoryAdapter::new(storage.clone(), "todos")),
            Arc::new(MemoryAdapter::new(storage.clone(), "notes")),
            Arc::new(MemoryAdapter::new(storage, "cart")),
            config,
        )
    }

    fn with_adapters(
        todos: Arc<dyn Persistence<Todo>>,
        notes: Arc<dyn Persistence<Note>>,
        cart: Arc<dyn Persistence<CartItem>>,
        config: Config,
    ) -> Self {
        Self {
            todos: store(todos, &config),
            notes: store(notes, &config),
            cart: store(cart, &config),
            config: Arc::new(config),
        }
    }
}

fn store<E: Entity>(adapter: Arc<dyn Persistence<E>>, config: &Config) -> Arc<Store<E>> {
    Arc::new(Store::with_config(
        adapter,
        StoreConfig {
            cache: config.cache_enabled,
            write_mode: config.write_mode,
            ..StoreConfig::default()
        },
    ))
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
