//! Edge case tests for stow-engine
//!
//! These tests cover boundary conditions and unusual inputs.

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use stow_engine::{
    CartItem, CartItemDraft, CartItemPatch, CollectionOrder, Entity, Error, FileAdapter,
    IdStrategy, ListOptions, ManualClock, MemoryAdapter, MemoryStorage, Note, NoteDraft,
    Persistence, Store, StoreConfig, Todo, TodoDraft, TodoPatch,
};

fn todo_store() -> Store<Todo> {
    Store::new(Arc::new(MemoryAdapter::new(MemoryStorage::new(), "todos")))
}

fn cart_store(storage: &MemoryStorage) -> Store<CartItem> {
    Store::with_config(
        Arc::new(MemoryAdapter::new(storage.clone(), "cart")),
        StoreConfig {
            ids: IdStrategy::Sequential {
                prefix: "c".into(),
            },
            ..StoreConfig::default()
        },
    )
}

fn draft(product: &str, price: f64, quantity: u32) -> CartItemDraft {
    CartItemDraft {
        product_id: product.into(),
        title: format!("Product {product}"),
        price,
        quantity,
    }
}

// ============================================================================
// String Edge Cases
// ============================================================================

#[tokio::test]
async fn unicode_titles_survive_persistence() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = Arc::new(FileAdapter::<Todo>::new(dir.path(), "todos").unwrap());
    let store = Store::new(adapter.clone());

    let titles = [
        "日本語テスト",
        "Привет мир",
        "مرحبا بالعالم",
        "🎉🚀💯",
        "Hello\nWorld\tTab",
        "Null\0Test",
    ];
    for title in titles {
        store.add(TodoDraft::new(title)).await.unwrap();
    }

    let mut loaded: Vec<_> = adapter
        .load()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    loaded.reverse();
    assert_eq!(loaded, titles);
}

#[tokio::test]
async fn very_long_title() {
    let store = todo_store();
    let title = "x".repeat(100_000);

    let todo = store.add(TodoDraft::new(title.clone())).await.unwrap();
    assert_eq!(todo.title.len(), 100_000);
    assert_eq!(
        store.list(ListOptions::fresh()).await.unwrap()[0].title,
        title
    );
}

#[tokio::test]
async fn titles_are_trimmed() {
    let store = todo_store();
    let todo = store.add(TodoDraft::new("  Buy milk \n")).await.unwrap();
    assert_eq!(todo.title, "Buy milk");

    let renamed = store
        .update(&todo.id, TodoPatch::title("\tOat milk "))
        .await
        .unwrap();
    assert_eq!(renamed.title, "Oat milk");
}

#[tokio::test]
async fn unicode_whitespace_is_blank() {
    let store = todo_store();
    // no-break space and ideographic space
    let err = store.add(TodoDraft::new("\u{a0}\u{3000}")).await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn ids_with_path_characters_are_plain_keys() {
    let storage = MemoryStorage::new();
    let store: Store<Todo> = Store::new(Arc::new(MemoryAdapter::new(storage.clone(), "todos")));
    let mut todo = store.add(TodoDraft::new("a")).await.unwrap();
    todo.id = "../../etc/passwd".into();

    store.replace_all(vec![todo]).await.unwrap();
    assert!(store.get("../../etc/passwd").await.unwrap().is_some());
    assert!(store.remove("../../etc/passwd").await.unwrap());
}

// ============================================================================
// Cart Boundaries
// ============================================================================

#[tokio::test]
async fn cart_rejects_bad_drafts() {
    let store = cart_store(&MemoryStorage::new());

    let cases = [
        (draft("p1", -0.01, 1), "price"),
        (draft("p1", f64::NAN, 1), "price"),
        (draft("p1", f64::INFINITY, 1), "price"),
        (draft("p1", 1.0, 0), "quantity"),
        (draft(" ", 1.0, 1), "productId"),
    ];
    for (draft, expected) in cases {
        match store.add(draft).await {
            Err(Error::Validation { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected {expected} rejection, got {other:?}"),
        }
    }
    assert_eq!(store.stats().await.len, 0);
}

#[tokio::test]
async fn free_items_are_allowed() {
    let store = cart_store(&MemoryStorage::new());
    let item = store.add(draft("sample", 0.0, 3)).await.unwrap();
    assert_eq!(item.line_total(), 0.0);
}

#[tokio::test]
async fn cart_keeps_insertion_order() {
    let store = cart_store(&MemoryStorage::new());
    for product in ["p1", "p2", "p3"] {
        store.add(draft(product, 2.5, 1)).await.unwrap();
    }
    store
        .update(
            "c1",
            CartItemPatch {
                quantity: Some(4),
                ..CartItemPatch::default()
            },
        )
        .await
        .unwrap();

    let items = store.list(ListOptions::default()).await.unwrap();
    let products: Vec<_> = items.iter().map(|i| i.product_id.as_str()).collect();
    assert_eq!(products, vec!["p1", "p2", "p3"]);
    assert_eq!(items[0].line_total(), 10.0);
}

#[tokio::test]
async fn cart_patch_rejects_zero_quantity() {
    let store = cart_store(&MemoryStorage::new());
    store.add(draft("p1", 1.0, 2)).await.unwrap();

    let err = store
        .update(
            "c1",
            CartItemPatch {
                quantity: Some(0),
                ..CartItemPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(store.get("c1").await.unwrap().unwrap().quantity, 2);
}

#[test]
fn cart_draft_quantity_defaults_to_one() {
    let draft: CartItemDraft =
        serde_json::from_str(r#"{"productId":"p1","title":"Mug","price":12.5}"#).unwrap();
    assert_eq!(draft.quantity, 1);
}

// ============================================================================
// Persistence Edge Cases
// ============================================================================

#[tokio::test]
async fn unavailable_storage_lists_empty_and_refuses_writes() {
    let storage = MemoryStorage::new();
    storage.set_available(false);
    let store: Store<Todo> = Store::new(Arc::new(MemoryAdapter::new(storage.clone(), "todos")));

    assert!(store.list(ListOptions::default()).await.unwrap().is_empty());
    assert_eq!(
        store.add(TodoDraft::new("a")).await.unwrap_err(),
        Error::Unavailable("todos".into())
    );
    assert_eq!(store.stats().await.len, 0);

    storage.set_available(true);
    store.add(TodoDraft::new("a")).await.unwrap();
    assert_eq!(storage.keys().await, vec!["todos".to_string()]);
}

#[tokio::test]
async fn collections_share_storage_by_key() {
    let storage = MemoryStorage::new();
    let todos: Store<Todo> = Store::new(Arc::new(MemoryAdapter::new(storage.clone(), "todos")));
    let notes: Store<Note> = Store::new(Arc::new(MemoryAdapter::new(storage.clone(), "notes")));

    todos.add(TodoDraft::new("a")).await.unwrap();
    notes.add(NoteDraft::new("n", "body")).await.unwrap();
    todos.clear().await.unwrap();

    assert_eq!(storage.keys().await, vec!["notes".to_string()]);
    assert_eq!(notes.list(ListOptions::fresh()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn wrong_shape_loads_empty() {
    let storage = MemoryStorage::new();
    for raw in ["{}", "42", "null", r#"[{"id":"a"}]"#, ""] {
        storage.set_item("todos", raw).await;
        let adapter = MemoryAdapter::<Todo>::new(storage.clone(), "todos");
        assert!(adapter.load().await.unwrap().is_empty(), "loaded {raw:?}");
    }
}

#[tokio::test]
async fn file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let open = || -> Store<Note> {
        Store::new(Arc::new(FileAdapter::new(dir.path(), "notes").unwrap()))
    };

    let first = open();
    let note = first.add(NoteDraft::new("Groceries", "milk")).await.unwrap();
    drop(first);

    let second = open();
    assert_eq!(second.get(&note.id).await.unwrap(), Some(note));
}

// ============================================================================
// Timestamps
// ============================================================================

#[tokio::test]
async fn timestamps_are_millisecond_precision() {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap()
            + chrono::TimeDelta::nanoseconds(123_456_789),
    ));
    let storage = MemoryStorage::new();
    let store: Store<Todo> =
        Store::new(Arc::new(MemoryAdapter::new(storage.clone(), "todos"))).with_clock(clock);

    store.add(TodoDraft::new("a")).await.unwrap();

    let raw = storage.get_item("todos").await.unwrap();
    assert!(raw.contains(r#""createdAt":"2024-02-01T09:30:00.123Z""#), "{raw}");

    // what was persisted equals what is held in memory
    let fresh = store.list(ListOptions::fresh()).await.unwrap();
    let cached = store.list(ListOptions::default()).await.unwrap();
    assert_eq!(fresh, cached);
}

#[tokio::test]
async fn updated_at_never_goes_backwards() {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap(),
    ));
    let store = todo_store().with_clock(clock.clone());
    let todo = store.add(TodoDraft::new("a")).await.unwrap();

    clock.set(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
    let updated = store.update(&todo.id, TodoPatch::done(true)).await.unwrap();
    assert!(updated.timestamps.updated_at > todo.timestamps.updated_at);
}

#[tokio::test]
async fn empty_patch_still_touches() {
    let store = todo_store();
    let todo = store.add(TodoDraft::new("a")).await.unwrap();

    let same = store.update(&todo.id, TodoPatch::default()).await.unwrap();
    assert_eq!(same.title, todo.title);
    assert_eq!(same.done, todo.done);
    assert!(same.timestamps.updated_at > todo.timestamps.updated_at);
}

// ============================================================================
// Ordering
// ============================================================================

#[tokio::test]
async fn order_override() {
    let store: Store<Todo> = Store::with_config(
        Arc::new(MemoryAdapter::new(MemoryStorage::new(), "todos")),
        StoreConfig {
            order: Some(CollectionOrder::InsertionOrder),
            ..StoreConfig::default()
        },
    );
    store.add(TodoDraft::new("first")).await.unwrap();
    store.add(TodoDraft::new("second")).await.unwrap();

    let titles: Vec<_> = store
        .list(ListOptions::default())
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["first", "second"]);
}

#[test]
fn default_orders() {
    assert_eq!(Todo::ORDER, CollectionOrder::NewestFirst);
    assert_eq!(Note::ORDER, CollectionOrder::RecentlyUpdated);
    assert_eq!(CartItem::ORDER, CollectionOrder::InsertionOrder);
}
