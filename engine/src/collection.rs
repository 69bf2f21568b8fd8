//! Ordered collection of uniquely identified entities.

use crate::entity::{CollectionOrder, Entity};
use crate::{error::Result, EntityId, Error};

/// An ordered sequence of entities with no duplicate identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<E> {
    entities: Vec<E>,
    order: CollectionOrder,
}

impl<E: Entity> Collection<E> {
    /// Create an empty collection.
    pub fn new(order: CollectionOrder) -> Self {
        Self {
            entities: Vec::new(),
            order,
        }
    }

    /// Build a collection from loaded entities.
    ///
    /// The first occurrence of an identifier wins; the identifiers of the
    /// dropped duplicates are returned so the caller can report them. The
    /// given order is kept unless the collection sorts by recency.
    pub fn from_entities(order: CollectionOrder, entities: Vec<E>) -> (Self, Vec<EntityId>) {
        let mut collection = Self::new(order);
        let mut duplicates = Vec::new();

        for entity in entities {
            if collection.contains(entity.id()) {
                duplicates.push(entity.id().to_string());
            } else {
                collection.entities.push(entity);
            }
        }

        collection.resort();
        (collection, duplicates)
    }

    pub fn order(&self) -> CollectionOrder {
        self.order
    }

    /// Get an entity by ID.
    pub fn get(&self, id: &str) -> Option<&E> {
        self.entities.iter().find(|e| e.id() == id)
    }

    /// Index of an entity in collection order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entities.iter().position(|e| e.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Insert a new entity where the collection order puts it.
    pub fn insert(&mut self, entity: E) -> Result<()> {
        if self.contains(entity.id()) {
            return Err(Error::DuplicateId(entity.id().to_string()));
        }

        match self.order {
            CollectionOrder::NewestFirst => self.entities.insert(0, entity),
            CollectionOrder::InsertionOrder => self.entities.push(entity),
            CollectionOrder::RecentlyUpdated => {
                self.entities.insert(0, entity);
                self.resort();
            }
        }
        Ok(())
    }

    /// Replace the entity stored under `id`, keeping its position.
    ///
    /// The replacement may carry a different identifier, as long as no other
    /// entity already uses it. Returns the previous entity, or `None` when
    /// `id` is not present.
    pub fn replace(&mut self, id: &str, entity: E) -> Result<Option<E>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        if entity.id() != id && self.contains(entity.id()) {
            return Err(Error::DuplicateId(entity.id().to_string()));
        }

        let previous = std::mem::replace(&mut self.entities[index], entity);
        self.resort();
        Ok(Some(previous))
    }

    /// Remove an entity, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<E> {
        let index = self.position(id)?;
        Some(self.entities.remove(index))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.entities
    }

    /// Owned copy of the entities in order.
    pub fn to_vec(&self) -> Vec<E> {
        self.entities.clone()
    }

    fn resort(&mut self) {
        if self.order == CollectionOrder::RecentlyUpdated {
            // stable: ties keep their current relative order
            self.entities
                .sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Timestamps;
    use crate::model::{Note, NoteDraft, Todo, TodoDraft};
    use crate::Timestamp;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn at(secs: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap() + TimeDelta::seconds(secs)
    }

    fn todo(id: &str) -> Todo {
        Todo::from_draft(id.into(), TodoDraft::new(id), Timestamps::created(at(0)))
    }

    fn note(id: &str, updated: i64) -> Note {
        Note::from_draft(
            id.into(),
            NoteDraft::new(id, ""),
            Timestamps::created(at(updated)),
        )
    }

    fn ids<E: Entity>(collection: &Collection<E>) -> Vec<&str> {
        collection.iter().map(|e| e.id()).collect()
    }

    #[test]
    fn newest_first_prepends() {
        let mut collection = Collection::new(CollectionOrder::NewestFirst);
        collection.insert(todo("a")).unwrap();
        collection.insert(todo("b")).unwrap();
        assert_eq!(ids(&collection), vec!["b", "a"]);
    }

    #[test]
    fn insertion_order_appends() {
        let mut collection = Collection::new(CollectionOrder::InsertionOrder);
        collection.insert(todo("a")).unwrap();
        collection.insert(todo("b")).unwrap();
        assert_eq!(ids(&collection), vec!["a", "b"]);
    }

    #[test]
    fn recently_updated_sorts_descending() {
        let mut collection = Collection::new(CollectionOrder::RecentlyUpdated);
        collection.insert(note("old", 1)).unwrap();
        collection.insert(note("new", 3)).unwrap();
        collection.insert(note("mid", 2)).unwrap();
        assert_eq!(ids(&collection), vec!["new", "mid", "old"]);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut collection = Collection::new(CollectionOrder::NewestFirst);
        collection.insert(todo("a")).unwrap();
        let err = collection.insert(todo("a")).unwrap_err();
        assert_eq!(err, Error::DuplicateId("a".into()));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn from_entities_drops_duplicates() {
        let mut first = todo("a");
        first.title = "first".into();
        let mut second = todo("a");
        second.title = "second".into();

        let (collection, dropped) = Collection::from_entities(
            CollectionOrder::NewestFirst,
            vec![first, todo("b"), second],
        );

        assert_eq!(ids(&collection), vec!["a", "b"]);
        assert_eq!(collection.get("a").unwrap().title, "first");
        assert_eq!(dropped, vec!["a".to_string()]);
    }

    #[test]
    fn from_entities_keeps_loaded_order() {
        let (collection, _) = Collection::from_entities(
            CollectionOrder::NewestFirst,
            vec![todo("c"), todo("a"), todo("b")],
        );
        assert_eq!(ids(&collection), vec!["c", "a", "b"]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut collection = Collection::new(CollectionOrder::InsertionOrder);
        for id in ["a", "b", "c"] {
            collection.insert(todo(id)).unwrap();
        }
        let mut updated = todo("b");
        updated.done = true;

        let previous = collection.replace("b", updated).unwrap().unwrap();
        assert!(!previous.done);
        assert_eq!(ids(&collection), vec!["a", "b", "c"]);
        assert!(collection.get("b").unwrap().done);
    }

    #[test]
    fn replace_can_change_id() {
        let mut collection = Collection::new(CollectionOrder::InsertionOrder);
        collection.insert(todo("local")).unwrap();
        collection.replace("local", todo("server")).unwrap();
        assert_eq!(ids(&collection), vec!["server"]);
    }

    #[test]
    fn replace_rejects_id_collision() {
        let mut collection = Collection::new(CollectionOrder::InsertionOrder);
        collection.insert(todo("a")).unwrap();
        collection.insert(todo("b")).unwrap();
        assert!(collection.replace("a", todo("b")).is_err());
        assert_eq!(ids(&collection), vec!["a", "b"]);
    }

    #[test]
    fn replace_missing_is_none() {
        let mut collection: Collection<Todo> = Collection::new(CollectionOrder::NewestFirst);
        assert!(collection.replace("x", todo("x")).unwrap().is_none());
        assert!(collection.is_empty());
    }

    #[test]
    fn replace_resorts_by_recency() {
        let mut collection = Collection::new(CollectionOrder::RecentlyUpdated);
        collection.insert(note("a", 1)).unwrap();
        collection.insert(note("b", 2)).unwrap();
        assert_eq!(ids(&collection), vec!["b", "a"]);

        let mut touched = note("a", 1);
        touched.timestamps.touch(at(5));
        collection.replace("a", touched).unwrap();
        assert_eq!(ids(&collection), vec!["a", "b"]);
    }

    #[test]
    fn remove() {
        let mut collection = Collection::new(CollectionOrder::InsertionOrder);
        collection.insert(todo("a")).unwrap();
        collection.insert(todo("b")).unwrap();

        assert!(collection.remove("a").is_some());
        assert!(collection.remove("a").is_none());
        assert_eq!(ids(&collection), vec!["b"]);
    }

    #[test]
    fn to_vec_is_detached() {
        let mut collection = Collection::new(CollectionOrder::InsertionOrder);
        collection.insert(todo("a")).unwrap();

        let mut copy = collection.to_vec();
        copy[0].title = "changed".into();
        copy.clear();

        assert_eq!(collection.get("a").unwrap().title, "a");
    }
}
