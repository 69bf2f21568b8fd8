//! HTTP persistence against a REST resource.
//!
//! | Call                  | Request                      |
//! |-----------------------|------------------------------|
//! | `load`                | `GET /{resource}`            |
//! | `save`                | `PUT /{resource}` (array)    |
//! | `clear`               | `DELETE /{resource}`         |
//! | create                | `POST /{resource}`           |
//! | update                | `PUT /{resource}/{id}` patch |
//! | remove                | `DELETE /{resource}/{id}`    |

use super::{Change, Persistence};
use crate::entity::Entity;
use crate::{error::Result, Error};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::debug;

/// Failure body. Servers disagree on the field name, so both are accepted.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Persists a collection through a remote REST resource.
#[derive(Debug, Clone)]
pub struct RemoteAdapter<E> {
    client: Client,
    base: Url,
    resource: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> RemoteAdapter<E> {
    /// Adapter for `{base_url}/{resource}`.
    pub fn new(base_url: &str, resource: impl Into<String>) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| Error::validation("baseUrl", format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::validation("baseUrl", format!("{base_url}: not a base URL")));
        }
        Ok(Self {
            client: Client::new(),
            base,
            resource: resource.into(),
            _entity: PhantomData,
        })
    }

    /// Apply a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::transport(e.to_string()))?;
        Ok(self)
    }

    fn url(&self, id: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&self.resource);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    /// Pass successful responses through; turn the rest into transport errors.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let message = body
            .error
            .or(body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        Err(Error::Transport {
            status: Some(status.as_u16()),
            message,
        })
    }

    /// Parse the entity a mutation response echoes back, if it does.
    async fn confirmed(response: Response) -> Option<E> {
        let text = response.text().await.ok()?;
        serde_json::from_str(&text).ok()
    }
}

fn send_error(err: reqwest::Error) -> Error {
    Error::Transport {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}

#[async_trait]
impl<E: Entity> Persistence<E> for RemoteAdapter<E> {
    fn namespace(&self) -> &str {
        &self.resource
    }

    async fn load(&self) -> Result<Vec<E>> {
        let response = self
            .client
            .get(self.url(None))
            .send()
            .await
            .map_err(send_error)?;
        let text = Self::check(response)
            .await?
            .text()
            .await
            .map_err(send_error)?;
        let entities: Vec<E> = serde_json::from_str(&text)?;
        debug!(resource = %self.resource, count = entities.len(), "fetched collection");
        Ok(entities)
    }

    async fn save(&self, entities: &[E]) -> Result<()> {
        let response = self
            .client
            .put(self.url(None))
            .json(entities)
            .send()
            .await
            .map_err(send_error)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let response = self
            .client
            .delete(self.url(None))
            .send()
            .await
            .map_err(send_error)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn persist(&self, change: &Change<E>, _entities: &[E]) -> Result<Option<E>> {
        match change {
            Change::Created(entity) => {
                let response = self
                    .client
                    .post(self.url(None))
                    .json(entity)
                    .send()
                    .await
                    .map_err(send_error)?;
                let response = Self::check(response).await?;
                Ok(Self::confirmed(response).await)
            }
            Change::Updated { after, patch, .. } => {
                let response = self
                    .client
                    .put(self.url(Some(after.id())))
                    .json(patch)
                    .send()
                    .await
                    .map_err(send_error)?;
                let response = Self::check(response).await?;
                Ok(Self::confirmed(response).await)
            }
            Change::Removed(entity) => {
                let response = self
                    .client
                    .delete(self.url(Some(entity.id())))
                    .send()
                    .await
                    .map_err(send_error)?;
                if response.status() == StatusCode::NOT_FOUND {
                    debug!(resource = %self.resource, id = entity.id(), "already removed remotely");
                    return Ok(None);
                }
                Self::check(response).await?;
                Ok(None)
            }
            Change::Replaced(entities) => {
                self.save(entities).await?;
                Ok(None)
            }
            Change::Cleared => {
                self.clear().await?;
                Ok(None)
            }
        }
    }
}
