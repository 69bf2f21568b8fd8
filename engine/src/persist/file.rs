//! File-backed persistence: `<dir>/<namespace>.json`.

use super::Persistence;
use crate::codec;
use crate::entity::Entity;
use crate::{error::Result, Error};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Stores one collection as a JSON file.
///
/// Writes go to a temporary file that is renamed over the target, so a
/// crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct FileAdapter<E> {
    path: PathBuf,
    tmp_path: PathBuf,
    namespace: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> FileAdapter<E> {
    /// Create an adapter for `namespace` inside `dir`.
    ///
    /// The namespace becomes a file name, so it must be non-empty and may
    /// only contain ASCII letters, digits, `-` and `_`.
    pub fn new(dir: impl AsRef<Path>, namespace: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        let valid = !namespace.is_empty()
            && namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::validation(
                "namespace",
                format!("'{namespace}' is not a valid file name"),
            ));
        }

        let dir = dir.as_ref();
        Ok(Self {
            path: dir.join(format!("{namespace}.json")),
            tmp_path: dir.join(format!(".{namespace}.json.tmp")),
            namespace,
            _entity: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_error(action: &str, path: &Path, err: std::io::Error) -> Error {
    Error::Storage(format!("failed to {action} {}: {err}", path.display()))
}

#[async_trait]
impl<E: Entity> Persistence<E> for FileAdapter<E> {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn load(&self) -> Result<Vec<E>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(codec::decode(&raw).or_empty(&self.namespace)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted collection yet");
                Ok(Vec::new())
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read collection");
                Err(Error::Unavailable(self.namespace.clone()))
            }
        }
    }

    async fn save(&self, entities: &[E]) -> Result<()> {
        let raw = codec::encode(entities)?;

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| storage_error("create", dir, e))?;
        }
        tokio::fs::write(&self.tmp_path, raw)
            .await
            .map_err(|e| storage_error("write", &self.tmp_path, e))?;
        tokio::fs::rename(&self.tmp_path, &self.path)
            .await
            .map_err(|e| storage_error("replace", &self.path, e))?;

        debug!(path = %self.path.display(), count = entities.len(), "saved collection");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", &self.path, e)),
        }
    }
}
