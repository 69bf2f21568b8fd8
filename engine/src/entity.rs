//! The entity abstraction shared by every collection.

use crate::{error::Result, EntityId, Timestamp};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::Debug;

/// Creation and modification times carried by every entity.
///
/// Serialized flattened into the entity as `createdAt` / `updatedAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timestamps {
    /// When the entity was created
    #[serde(with = "iso_millis")]
    pub created_at: Timestamp,
    /// When the entity was last modified
    #[serde(with = "iso_millis")]
    pub updated_at: Timestamp,
}

impl Timestamps {
    /// Timestamps for an entity created at `at`.
    pub fn created(at: Timestamp) -> Self {
        Self {
            created_at: at,
            updated_at: at,
        }
    }

    /// Record a modification. Never moves `updated_at` backwards.
    pub fn touch(&mut self, at: Timestamp) {
        self.updated_at = self.updated_at.max(at);
    }
}

/// How a collection orders its entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionOrder {
    /// New entities are prepended
    NewestFirst,
    /// New entities are appended
    InsertionOrder,
    /// Sorted by `updated_at`, most recent first
    RecentlyUpdated,
}

/// A uniquely identified record that a [`Store`](crate::Store) can manage.
///
/// `Draft` is what callers hand to `add` (no id, no timestamps). `Patch`
/// carries optional replacements for the mutable fields and is applied with
/// [`Entity::merge`].
pub trait Entity:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Draft: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;
    type Patch: Clone + Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Short name used in logs and generated ids.
    const KIND: &'static str;

    /// Order used when the store config doesn't override it.
    const ORDER: CollectionOrder;

    fn id(&self) -> &str;

    fn timestamps(&self) -> &Timestamps;

    fn timestamps_mut(&mut self) -> &mut Timestamps;

    /// Check a draft before anything is mutated.
    fn validate_draft(draft: &Self::Draft) -> Result<()>;

    /// Check a complete entity, as received for a bulk replace.
    fn validate(&self) -> Result<()>;

    /// Check a patch before anything is mutated.
    fn validate_patch(_patch: &Self::Patch) -> Result<()> {
        Ok(())
    }

    /// Build an entity from a validated draft.
    fn from_draft(id: EntityId, draft: Self::Draft, timestamps: Timestamps) -> Self;

    /// Apply a validated patch. Timestamps are handled by the caller.
    fn merge(&mut self, patch: Self::Patch);

    fn updated_at(&self) -> Timestamp {
        self.timestamps().updated_at
    }
}

/// Serde adapter for ISO-8601 UTC timestamps with millisecond precision
/// (`2024-02-01T09:30:00.000Z`).
pub mod iso_millis {
    use crate::Timestamp;
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
