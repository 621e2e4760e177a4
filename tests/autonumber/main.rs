//! Integration tests for AutoNumber installed on in-memory collections.


use std::collections::HashSet;
use std::thread;

use autonumber_rust::{
    AutoNumber, AutoNumberError, AutoNumberOptions, CollectionError, CounterKey, CounterStore,
    Document, InMemoryCollection, InMemoryCounterStore, JsonDocument, PrefixOptions, Schema,
};
use models::{Item, Order, Product, Ticket};

fn orders(store: &InMemoryCounterStore) -> InMemoryCollection<Order> {
    let mut schema = Schema::new("Order");
    AutoNumber::install(
        store.clone(),
        AutoNumberOptions::new("Order", "id"),
        &mut schema,
    )
    .unwrap();
    InMemoryCollection::new(schema)
}

fn items(store: &InMemoryCounterStore) -> InMemoryCollection<Item> {
    let mut schema = Schema::new("Item");
    AutoNumber::install(
        store.clone(),
        AutoNumberOptions::new("Item", "id").group_by("order"),
        &mut schema,
    )
    .unwrap();
    InMemoryCollection::new(schema)
}

#[test]
fn increments_id_on_insert() {
    let store = InMemoryCounterStore::new();
    let orders = orders(&store);

    let first = orders.insert(Order::new("Some description one")).unwrap();
    let second = orders.insert(Order::new("Some description two")).unwrap();

    assert_eq!(first.id.as_deref(), Some("1"));
    assert_eq!(second.id.as_deref(), Some("2"));
    assert!(first.saved && second.saved);
}

#[test]
fn increments_id_only_inside_group() {
    let store = InMemoryCounterStore::new();
    let items = items(&store);

    let ids: Vec<_> = [
        Item::new("Test item title 1", 1),
        Item::new("Test item title 2", 1),
        Item::new("Test item title 3", 1),
        Item::new("Test item title 4", 2),
    ]
    .into_iter()
    .map(|item| items.insert(item).unwrap().id.unwrap())
    .collect();

    assert_eq!(ids, vec!["1", "2", "3", "1"]);
    assert_eq!(
        store
            .find_counter(&CounterKey::grouped("Item", "id", "1"))
            .unwrap()
            .unwrap()
            .count,
        3
    );
}

#[test]
fn models_sharing_a_store_have_separate_counters() {
    let store = InMemoryCounterStore::new();
    let orders = orders(&store);
    let items = items(&store);

    orders.insert(Order::new("a")).unwrap();
    orders.insert(Order::new("b")).unwrap();
    let item = items.insert(Item::new("x", 1)).unwrap();
    let order = orders.insert(Order::new("c")).unwrap();

    assert_eq!(item.id.as_deref(), Some("1"));
    assert_eq!(order.id.as_deref(), Some("3"));
    assert_eq!(store.len().unwrap(), 2);
}

#[test]
fn separate_stores_are_isolated() {
    let first = orders(&InMemoryCounterStore::new());
    let second = orders(&InMemoryCounterStore::new());

    first.insert(Order::new("a")).unwrap();
    first.insert(Order::new("b")).unwrap();
    let other = second.insert(Order::new("c")).unwrap();

    assert_eq!(other.id.as_deref(), Some("1"));
}

#[test]
fn field_prefix() {
    let store = InMemoryCounterStore::new();
    let mut schema = Schema::new("Product");
    AutoNumber::install(
        store.clone(),
        AutoNumberOptions::new("Product", "code").prefix(PrefixOptions::field("sku", "-")),
        &mut schema,
    )
    .unwrap();
    let products = InMemoryCollection::new(schema);

    let first = products.insert(Product::new("ABC")).unwrap();
    let second = products.insert(Product::new("ABC")).unwrap();

    assert_eq!(first.code.as_deref(), Some("ABC-1"));
    assert_eq!(second.code.as_deref(), Some("ABC-2"));
}

#[test]
fn missing_prefix_source_fails_without_consuming_a_value() {
    let store = InMemoryCounterStore::new();
    let mut schema = Schema::new("Product");
    AutoNumber::install(
        store.clone(),
        AutoNumberOptions::new("Product", "code").prefix(PrefixOptions::field("sku", "-")),
        &mut schema,
    )
    .unwrap();
    let products = InMemoryCollection::new(schema);
    let key = CounterKey::new("Product", "code");

    products.insert(Product::new("ABC")).unwrap();
    let before = store.find_counter(&key).unwrap().unwrap().count;

    let err = products.insert(Product::new("")).unwrap_err();
    assert_eq!(
        err,
        CollectionError::Hook(AutoNumberError::InvalidPrefixSource {
            model: "Product".into(),
            field: "sku".into(),
        })
    );

    assert_eq!(store.find_counter(&key).unwrap().unwrap().count, before);
    assert_eq!(products.len().unwrap(), 1);
}

#[test]
fn missing_prefix_source_on_first_use_creates_no_counter() {
    let store = InMemoryCounterStore::new();
    let mut schema = Schema::new("Product");
    AutoNumber::install(
        store.clone(),
        AutoNumberOptions::new("Product", "code").prefix(PrefixOptions::field("sku", "-")),
        &mut schema,
    )
    .unwrap();
    let products = InMemoryCollection::new(schema);

    assert!(products.insert(Product::new("")).is_err());
    assert!(store.is_empty().unwrap());
}

#[test]
fn zero_prefix_source_fails_without_consuming_a_value() {
    let store = InMemoryCounterStore::new();
    let mut schema = Schema::new("Ticket");
    AutoNumber::install(
        store.clone(),
        AutoNumberOptions::new("Ticket", "number").prefix(PrefixOptions::field("year", "-")),
        &mut schema,
    )
    .unwrap();
    let tickets = InMemoryCollection::new(schema);
    let key = CounterKey::new("Ticket", "number");

    let first = tickets.insert(Ticket::new(2024)).unwrap();
    assert_eq!(first.number.as_deref(), Some("2024-1"));

    let err = tickets.insert(Ticket::default()).unwrap_err();
    assert_eq!(
        err,
        CollectionError::Hook(AutoNumberError::InvalidPrefixSource {
            model: "Ticket".into(),
            field: "year".into(),
        })
    );
    assert_eq!(store.find_counter(&key).unwrap().unwrap().count, 1);

    let next = tickets.insert(Ticket::new(2024)).unwrap();
    assert_eq!(next.number.as_deref(), Some("2024-2"));
}

#[test]
fn literal_prefix_with_custom_start_and_step() {
    let store = InMemoryCounterStore::new();
    let mut schema = Schema::new("Invoice");
    AutoNumber::install(
        store,
        AutoNumberOptions::from_json(
            r#"{
                "model": "Invoice",
                "counterField": "number",
                "startsWith": 1000,
                "incrementBy": 5,
                "prefix": { "type": "literal", "value": "INV", "delimiter": "/" }
            }"#,
        )
        .unwrap(),
        &mut schema,
    )
    .unwrap();
    let invoices = InMemoryCollection::new(schema);

    let numbers: Vec<_> = (0..3)
        .map(|_| {
            invoices
                .insert(JsonDocument::new())
                .unwrap()
                .field("number")
                .unwrap()
        })
        .collect();

    assert_eq!(numbers, vec!["INV/1005", "INV/1010", "INV/1015"]);
}

#[test]
fn concurrent_inserts_receive_distinct_consecutive_values() {
    let store = InMemoryCounterStore::new();
    let orders = orders(&store);

    thread::scope(|scope| {
        for worker in 0..8 {
            let orders = &orders;
            scope.spawn(move || {
                for n in 0..25 {
                    orders
                        .insert(Order::new(&format!("worker {} order {}", worker, n)))
                        .unwrap();
                }
            });
        }
    });

    let ids: HashSet<i64> = orders
        .all()
        .unwrap()
        .into_iter()
        .map(|order| order.id.unwrap().parse().unwrap())
        .collect();

    assert_eq!(ids.len(), 200);
    assert_eq!(ids, (1..=200).collect::<HashSet<_>>());
}

#[test]
fn concurrent_grouped_inserts_number_each_group_independently() {
    let store = InMemoryCounterStore::new();
    let mut schema = Schema::new("Item");
    AutoNumber::install(
        store.clone(),
        AutoNumberOptions::new("Item", "id")
            .group_by("order")
            .starts_with(10)
            .increment_by(2),
        &mut schema,
    )
    .unwrap();
    let items = InMemoryCollection::new(schema);

    thread::scope(|scope| {
        for worker in 0..6 {
            let items = &items;
            scope.spawn(move || {
                for n in 0..20 {
                    let order = (worker + n) % 3;
                    items.insert(Item::new("item", order)).unwrap();
                }
            });
        }
    });

    let expected: HashSet<i64> = (1..=40).map(|n| 10 + 2 * n).collect();
    for order in 0..3u32 {
        let ids: HashSet<i64> = items
            .find(&|item| item.order == Some(order))
            .unwrap()
            .into_iter()
            .map(|item| item.id.unwrap().parse().unwrap())
            .collect();
        assert_eq!(ids, expected, "group {}", order);
    }
}

#[test]
fn unique_violation_leaves_a_gap() {
    let store = InMemoryCounterStore::new();
    let mut schema = Schema::new("Order");
    AutoNumber::install(
        store.clone(),
        AutoNumberOptions::new("Order", "id").unique(true),
        &mut schema,
    )
    .unwrap();
    assert!(schema.field("id").unwrap().unique);
    let orders = InMemoryCollection::new(schema);

    orders.insert(Order::new("first")).unwrap();

    // Someone rewinds the counter behind the plugin's back.
    store.delete_counter(&CounterKey::new("Order", "id")).unwrap();

    let err = orders.insert(Order::new("collides")).unwrap_err();
    assert_eq!(
        err,
        CollectionError::DuplicateKey {
            field: "id".into(),
            value: "1".into(),
        }
    );

    // The rejected insert consumed "1" a second time; numbering moves on.
    let next = orders.insert(Order::new("next")).unwrap();
    assert_eq!(next.id.as_deref(), Some("2"));
    assert_eq!(orders.len().unwrap(), 2);
}

#[test]
fn persisted_documents_are_not_renumbered() {
    let store = InMemoryCounterStore::new();
    let plugin = AutoNumber::new(store.clone(), AutoNumberOptions::new("Order", "id")).unwrap();
    let orders = orders(&store);

    let mut stored = orders.insert(Order::new("saved once")).unwrap();
    assert_eq!(plugin.assign(&mut stored).unwrap(), None);
    assert_eq!(stored.id.as_deref(), Some("1"));
    assert_eq!(plugin.current_value(None).unwrap(), Some(1));
}

#[test]
fn missing_group_value_fails() {
    let store = InMemoryCounterStore::new();
    let items = items(&store);

    let mut item = Item::new("orphan", 0);
    item.order = None;

    let err = items.insert(item).unwrap_err();
    assert!(matches!(
        err,
        CollectionError::Hook(AutoNumberError::MissingGroupValue { .. })
    ));
    assert!(store.is_empty().unwrap());
}

#[test]
fn empty_group_value_numbers_its_own_group() {
    let store = InMemoryCounterStore::new();
    let mut schema = Schema::new("Note");
    AutoNumber::install(
        store.clone(),
        AutoNumberOptions::new("Note", "id").group_by("thread"),
        &mut schema,
    )
    .unwrap();
    let notes = InMemoryCollection::new(schema);

    let ids: Vec<_> = ["", "", "a"]
        .into_iter()
        .map(|thread| {
            notes
                .insert(JsonDocument::new().with("thread", thread))
                .unwrap()
                .field("id")
                .unwrap()
        })
        .collect();

    assert_eq!(ids, vec!["1", "2", "1"]);
    assert_eq!(
        store
            .find_counter(&CounterKey::grouped("Note", "id", ""))
            .unwrap()
            .unwrap()
            .count,
        2
    );
}

#[test]
fn counters_survive_snapshot_restore() {
    let store = InMemoryCounterStore::new();
    let orders = orders(&store);

    orders.insert(Order::new("a")).unwrap();
    orders.insert(Order::new("b")).unwrap();
    let snapshot = store.snapshot().unwrap();
    let json = serde_json::to_string(&snapshot).unwrap();

    let restored_store = InMemoryCounterStore::new();
    restored_store
        .restore(&serde_json::from_str(&json).unwrap())
        .unwrap();
    let restored = self::orders(&restored_store);

    let next = restored.insert(Order::new("c")).unwrap();
    assert_eq!(next.id.as_deref(), Some("3"));
}
