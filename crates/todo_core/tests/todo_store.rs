use rusqlite::Connection;
use std::collections::HashSet;
use todo_core::db::migrations::latest_version;
use todo_core::db::open_db_in_memory;
use todo_core::{SqliteTodoStore, StoreError, Todo, TodoRepository, TodoStore};

fn sample(title: &str) -> Todo {
    Todo::with_created_at(title, format!("{title} details"), "2024-01-01 10:00:00")
}

#[tokio::test]
async fn insert_without_id_assigns_fresh_identifier() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    let first = store.insert(sample("first")).await.unwrap();
    store
        .delete(Todo {
            id: Some(first),
            ..sample("first")
        })
        .await
        .unwrap();

    let second = store.insert(sample("second")).await.unwrap();
    assert_ne!(first, second);

    let todos = store.observe_all().current();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, Some(second));
}

#[tokio::test]
async fn insert_then_observe_round_trips_all_fields() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    let input = Todo::with_created_at("", "", "2023-12-31 23:59:59");

    let id = store.insert(input.clone()).await.unwrap();

    let todos = store.observe_all().current();
    assert_eq!(todos, vec![Todo { id: Some(id), ..input }]);
}

#[tokio::test]
async fn insert_with_existing_id_replaces_the_record() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    let id = store.insert(sample("original")).await.unwrap();
    store.insert(sample("other")).await.unwrap();

    let replacement = Todo {
        id: Some(id),
        ..Todo::with_created_at("replaced", "new body", "2025-06-01 08:30:00")
    };
    let returned = store.insert(replacement.clone()).await.unwrap();
    assert_eq!(returned, id);

    let todos = store.observe_all().current();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos.iter().find(|todo| todo.id == Some(id)), Some(&replacement));
}

#[tokio::test]
async fn update_of_missing_identifier_is_a_silent_no_op() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    store.insert(sample("kept")).await.unwrap();
    let before = store.observe_all().current();

    let ghost = Todo {
        id: Some(4242),
        ..sample("ghost")
    };
    store.update(ghost).await.unwrap();
    store.update(sample("unsaved")).await.unwrap();

    assert_eq!(store.observe_all().current(), before);
}

#[tokio::test]
async fn update_replaces_fields_but_keeps_identity() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    let id = store.insert(sample("draft")).await.unwrap();
    let saved = store.observe_all().current().remove(0);

    store.update(saved.edited("final", "")).await.unwrap();

    let todos = store.observe_all().current();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, Some(id));
    assert_eq!(todos[0].title, "final");
    assert_eq!(todos[0].description, "");
    assert_eq!(todos[0].created_at, saved.created_at);
}

#[tokio::test]
async fn delete_removes_exactly_the_matching_record() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    let mut ids = Vec::new();
    for title in ["a", "b", "c", "d"] {
        ids.push(store.insert(sample(title)).await.unwrap());
    }
    let victim = store
        .observe_all()
        .current()
        .into_iter()
        .find(|todo| todo.id == Some(ids[2]))
        .unwrap();

    store.delete(victim).await.unwrap();
    store
        .delete(Todo {
            id: Some(9999),
            ..sample("missing")
        })
        .await
        .unwrap();

    let remaining: HashSet<_> = store
        .observe_all()
        .current()
        .into_iter()
        .filter_map(|todo| todo.id)
        .collect();
    assert_eq!(remaining, HashSet::from([ids[0], ids[1], ids[3]]));
}

#[tokio::test]
async fn observe_all_is_ordered_by_identifier() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    store
        .insert(Todo {
            id: Some(10),
            ..sample("ten")
        })
        .await
        .unwrap();
    store
        .insert(Todo {
            id: Some(3),
            ..sample("three")
        })
        .await
        .unwrap();
    store.insert(sample("auto")).await.unwrap();

    let ids: Vec<_> = store
        .observe_all()
        .current()
        .into_iter()
        .filter_map(|todo| todo.id)
        .collect();
    assert_eq!(ids, vec![3, 10, 11]);
}

#[tokio::test]
async fn subscription_is_notified_after_each_mutation() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    let mut live = store.observe_all();
    assert!(live.current().is_empty());

    let id = store.insert(sample("Buy milk")).await.unwrap();
    let after_insert = live.next().await.unwrap();
    assert_eq!(after_insert.len(), 1);

    store.delete(after_insert[0].clone()).await.unwrap();
    let after_delete = live.next().await.unwrap();
    assert!(after_delete.iter().all(|todo| todo.id != Some(id)));
}

#[tokio::test]
async fn subscription_ends_when_store_is_dropped() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    let mut live = store.observe_all();
    drop(store);

    assert!(live.next().await.is_none());
}

#[tokio::test]
async fn milk_scenario_flows_through_repository() {
    let repository = TodoRepository::new(SqliteTodoStore::open_in_memory().unwrap());
    let mut live = repository.observe_all();
    assert!(live.current().is_empty());

    repository
        .insert(Todo::with_created_at("Buy milk", "2%", "2024-01-01 10:00:00"))
        .await
        .unwrap();
    let todos = live.wait_for(|todos| todos.len() == 1).await.unwrap();
    assert_eq!(todos[0].title, "Buy milk");
    assert_eq!(todos[0].description, "2%");
    assert_eq!(todos[0].created_at, "2024-01-01 10:00:00");

    repository
        .update(todos[0].edited("Buy oat milk", "2%"))
        .await
        .unwrap();
    let todos = live
        .wait_for(|todos| todos.first().map(|todo| todo.title.as_str()) == Some("Buy oat milk"))
        .await
        .unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].description, "2%");
    assert_eq!(todos[0].created_at, "2024-01-01 10:00:00");

    repository.delete(todos[0].clone()).await.unwrap();
    let todos = live.wait_for(|todos| todos.is_empty()).await.unwrap();
    assert!(todos.is_empty());
}

#[tokio::test]
async fn reopening_file_store_restores_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.sqlite3");

    let store = SqliteTodoStore::open(&path).unwrap();
    store.insert(sample("persisted")).await.unwrap();
    drop(store);

    let reopened = SqliteTodoStore::open(&path).unwrap();
    let todos = reopened.observe_all().current();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "persisted");
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTodoStore::from_connection(conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_todos_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTodoStore::from_connection(conn);
    assert!(matches!(result, Err(StoreError::MissingRequiredTable("todos"))));
}

#[test]
fn store_rejects_connection_missing_date_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTodoStore::from_connection(conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredColumn {
            table: "todos",
            column: "date"
        })
    ));
}

#[test]
fn store_accepts_bootstrapped_connection() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::from_connection(conn).unwrap();
    assert!(store.observe_all().current().is_empty());
}
