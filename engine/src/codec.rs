//! Encoding of a collection in its persisted form: a JSON array of entities.
//!
//! Decoding is fail-soft. Corrupt data is not an error for the store, but it
//! is reported as [`Decoded::Corrupt`] so adapters can log it instead of
//! silently treating it as empty.

use crate::entity::Entity;
use crate::error::Result;
use tracing::warn;

/// Outcome of decoding persisted data.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<E> {
    /// Nothing was stored (blank payload)
    Empty,
    /// A well-formed array
    Entities(Vec<E>),
    /// The payload could not be parsed; carries the parser message
    Corrupt(String),
}

impl<E> Decoded<E> {
    /// Resolve to a collection, logging and discarding corrupt data.
    pub fn or_empty(self, namespace: &str) -> Vec<E> {
        match self {
            Decoded::Empty => Vec::new(),
            Decoded::Entities(entities) => entities,
            Decoded::Corrupt(reason) => {
                warn!(namespace, %reason, "discarding corrupt persisted collection");
                Vec::new()
            }
        }
    }
}

/// Serialize entities in order.
pub fn encode<E: Entity>(entities: &[E]) -> Result<String> {
    Ok(serde_json::to_string(entities)?)
}

/// Parse a persisted payload.
pub fn decode<E: Entity>(raw: &str) -> Decoded<E> {
    if raw.trim().is_empty() {
        return Decoded::Empty;
    }
    match serde_json::from_str::<Vec<E>>(raw) {
        Ok(entities) => Decoded::Entities(entities),
        Err(e) => Decoded::Corrupt(e.to_string()),
    }
}
