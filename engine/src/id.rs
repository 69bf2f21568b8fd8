//! Identifier generation for new entities.

use crate::EntityId;
use std::sync::atomic::{AtomicU64, Ordering};

/// How a store names new entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdStrategy {
    /// Random v4 UUIDs
    #[default]
    Uuid,
    /// `prefix1`, `prefix2`, ... Useful for tests and fixtures.
    Sequential { prefix: String },
}

/// Produces identifiers according to an [`IdStrategy`].
#[derive(Debug)]
pub struct IdGenerator {
    strategy: IdStrategy,
    counter: AtomicU64,
}

impl IdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            counter: AtomicU64::new(0),
        }
    }

    /// Next candidate identifier.
    pub fn next_id(&self) -> EntityId {
        match &self.strategy {
            IdStrategy::Uuid => uuid::Uuid::new_v4().to_string(),
            IdStrategy::Sequential { prefix } => {
                let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
                format!("{prefix}{n}")
            }
        }
    }

    /// Next identifier for which `taken` returns false.
    pub fn fresh_id(&self, taken: impl Fn(&str) -> bool) -> EntityId {
        loop {
            let id = self.next_id();
            if !taken(&id) {
                return id;
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(IdStrategy::default())
    }
}
