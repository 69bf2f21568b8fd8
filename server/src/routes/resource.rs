//! REST routes for one entity collection.
//!
//! | Method   | Path        | Body        | Response                 |
//! |----------|-------------|-------------|--------------------------|
//! | `GET`    | `/`         |             | entity array             |
//! | `POST`   | `/`         | draft       | 201 + created entity     |
//! | `PUT`    | `/`         | array       | `{"success": true}`      |
//! | `DELETE` | `/?id=..`   |             | `{"success": true}`, 404 |
//! | `DELETE` | `/`         |             | `{"success": true}`      |
//! | `PUT`    | `/{id}`     | patch       | updated entity, 404      |
//! | `DELETE` | `/{id}`     |             | `{"success": true}`, 404 |

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stow_engine::{Entity, ListOptions, Store};

use crate::error::{AppError, Result};
use crate::AppState;

type Body<T> = std::result::Result<Json<T>, JsonRejection>;

/// Acknowledgement for writes that return no entity.
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    pub id: Option<String>,
}

/// Create the routes for one collection, bound to its store.
pub fn routes<E: Entity>(store: Arc<Store<E>>) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::<E>)
                .post(create::<E>)
                .put(replace::<E>)
                .delete(remove_by_query::<E>),
        )
        .route("/{id}", put(update::<E>).delete(remove::<E>))
        .with_state(store)
}

/// GET / - current collection (`?fresh=true` bypasses the cache).
async fn list<E: Entity>(
    State(store): State<Arc<Store<E>>>,
    Query(options): Query<ListOptions>,
) -> Result<Json<Vec<E>>> {
    Ok(Json(store.list(options).await?))
}

/// POST / - create from a draft. Any client-side id is ignored.
async fn create<E: Entity>(
    State(store): State<Arc<Store<E>>>,
    body: Body<E::Draft>,
) -> Result<(StatusCode, Json<E>)> {
    let Json(draft) = body?;
    let entity = store.add(draft).await?;
    tracing::debug!(kind = E::KIND, id = entity.id(), "created");
    Ok((StatusCode::CREATED, Json(entity)))
}

/// PUT / - replace the whole collection.
async fn replace<E: Entity>(
    State(store): State<Arc<Store<E>>>,
    body: Body<Vec<E>>,
) -> Result<Json<Success>> {
    let Json(entities) = body?;
    store.replace_all(entities).await?;
    Ok(Success::ok())
}

/// PUT /{id} - merge a patch.
async fn update<E: Entity>(
    State(store): State<Arc<Store<E>>>,
    Path(id): Path<String>,
    body: Body<E::Patch>,
) -> Result<Json<E>> {
    let Json(patch) = body?;
    Ok(Json(store.update(&id, patch).await?))
}

/// DELETE /{id}
async fn remove<E: Entity>(
    State(store): State<Arc<Store<E>>>,
    Path(id): Path<String>,
) -> Result<Json<Success>> {
    remove_one(&store, id).await
}

/// DELETE /?id=.. removes one entity; without `id` it clears everything.
async fn remove_by_query<E: Entity>(
    State(store): State<Arc<Store<E>>>,
    Query(query): Query<RemoveQuery>,
) -> Result<Json<Success>> {
    match query.id {
        Some(id) => remove_one(&store, id).await,
        None => {
            store.clear().await?;
            tracing::debug!(kind = E::KIND, "cleared");
            Ok(Success::ok())
        }
    }
}

async fn remove_one<E: Entity>(store: &Store<E>, id: String) -> Result<Json<Success>> {
    if store.remove(&id).await? {
        Ok(Success::ok())
    } else {
        Err(AppError::NotFound(id))
    }
}
