//! Soft delete through a full store, using the in-memory backend

use serde_json::json;
use softhaus::prelude::*;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub deleted: i32,
}

impl TableMetadata for Note {
    type Id = i64;

    fn table_name() -> &'static str {
        "notes"
    }

    fn columns() -> &'static [&'static str] {
        &["id", "title", "deleted"]
    }

    fn extract_id(&self) -> i64 {
        self.id
    }
}

fn note(id: i64, title: &str) -> Note {
    Note {
        id,
        title: title.to_string(),
        deleted: 0,
    }
}

fn note_store() -> GenericStore<Note, MemoryBackend> {
    GenericStore::<Note, MemoryBackend>::new(MemoryBackend::new(), None)
        .with_soft_delete(&SoftDeleteConfig::flag_only("deleted"))
        .unwrap()
}

#[tokio::test]
async fn test_delete_and_undelete_round() {
    let store = note_store();
    let created = store.create(note(1, "groceries")).await.unwrap();
    assert_eq!(created.deleted, 0);

    assert!(store.delete(&1).await.unwrap());

    // Row still stored, flagged
    let rows = store.backend().raw_rows("notes");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("deleted"), Some(&json!(1)));

    // Hidden from default reads, visible to the unfiltered one
    assert!(store.get_by_id(&1).await.unwrap().is_none());
    assert!(store.list_all().await.unwrap().is_empty());
    let mut hidden = store
        .find_with_deleted(QueryBuilder::new())
        .await
        .unwrap()
        .pop()
        .unwrap();
    assert_eq!(hidden.deleted, 1);

    assert!(store.undelete(&mut hidden).await.unwrap());

    assert_eq!(hidden.deleted, 0);
    assert_eq!(store.get_by_id(&1).await.unwrap(), Some(note(1, "groceries")));
}

#[tokio::test]
async fn test_default_config_on_flag_only_entity() {
    // dt_deleted is configured by default but Note does not declare it
    let config = SoftDeleteConfig::default();
    let store = GenericStore::<Note, MemoryBackend>::new(MemoryBackend::new(), None)
        .with_soft_delete(&config)
        .unwrap();
    store.create(note(1, "a")).await.unwrap();

    let mut record = note(1, "a");
    assert!(store.delete_record(&mut record).await.unwrap());

    assert_eq!(record.deleted, 1);
    assert_eq!(store.count_with_deleted(QueryBuilder::new()).await.unwrap(), 1);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_policy_from_toml_config() {
    let config = AppConfig::from_toml_str(
        r#"
        [database]
        host = "localhost"
        port = 5432
        database = "notes"
        username = "postgres"
        password = "password"
        min_connections = 1
        max_connections = 5
        connection_timeout_seconds = 30
        idle_timeout_seconds = 600
        max_lifetime_seconds = 3600

        [soft_delete]
        flag_column = "deleted"
        timestamp_column = ""
        active_value = 0
        deleted_value = 2
        "#,
    )
    .unwrap();

    let store = GenericStore::<Note, MemoryBackend>::new(MemoryBackend::new(), None)
        .with_soft_delete(&config.soft_delete)
        .unwrap();
    store.create(note(7, "custom sentinel")).await.unwrap();
    store.delete(&7).await.unwrap();

    let deleted = store.find_deleted(QueryBuilder::new()).await.unwrap();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].deleted, 2);
}

#[tokio::test]
async fn test_signals_carry_record_payload() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let manager = SignalManager::new();
    let sink = Arc::clone(&events);
    manager.add_callback(move |event: &DatabaseEvent| {
        sink.lock().unwrap().push(event.clone());
    });

    let store = GenericStore::<Note, MemoryBackend>::new(MemoryBackend::new(), Some(Arc::new(manager)))
        .with_soft_delete(&SoftDeleteConfig::flag_only("deleted"))
        .unwrap();
    store.create(note(3, "signal")).await.unwrap();
    store.delete(&3).await.unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, EventType::Create);
    assert_eq!(events[1].event_type, EventType::SoftDelete);
    assert_eq!(events[1].table_name, "notes");
    assert_eq!(events[1].record_id.as_deref(), Some("3"));
    assert_eq!(events[1].payload.get("deleted"), Some(&json!(1)));
}
