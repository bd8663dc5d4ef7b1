//! # Soft Delete Demo
//!
//! Runs the whole soft-delete cycle against the in-memory backend, so no
//! database is needed:
//! - attaching the default policy (`deleted` flag plus `dt_deleted` stamp)
//! - deleting a record and seeing it disappear from normal reads
//! - listing deleted rows and restoring one
//! - removing a row for good with `hard_delete`
//!
//! Run with `cargo run --example soft_delete_demo`.

use softhaus::prelude::*;
use std::sync::Arc;

/// A note kept in the `notes` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub deleted: i32,
    pub dt_deleted: Option<chrono::DateTime<chrono::Utc>>,
}

impl TableMetadata for Note {
    type Id = i64;

    fn table_name() -> &'static str {
        "notes"
    }

    fn columns() -> &'static [&'static str] {
        &["id", "title", "deleted", "dt_deleted"]
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
        dt_deleted: None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🗑️  SoftHaus Soft Delete Demo");
    println!("============================");

    // 1. Store with the default policy and a signal listener
    println!("\n📊 Step 1: Store Setup");
    println!("----------------------");

    let signals = SignalManager::new();
    signals.add_callback(|event: &DatabaseEvent| {
        println!(
            "   📡 {:?} on {} (id {:?})",
            event.event_type, event.table_name, event.record_id
        );
    });

    let store = GenericStore::<Note, MemoryBackend>::new(MemoryBackend::new(), Some(Arc::new(signals)))
        .with_soft_delete(&SoftDeleteConfig::default())?;
    if let Some(policy) = store.soft_delete_policy() {
        println!(
            "✅ Policy on '{}': flag {:?}, timestamp {:?}",
            policy.table(),
            policy.flag_column(),
            policy.timestamp_column()
        );
    }

    for (id, title) in [(1, "Groceries"), (2, "Call the bank"), (3, "Book flights")] {
        store.create(note(id, title)).await?;
    }
    println!("✅ Created {} notes", store.count().await?);

    // 2. Soft delete
    println!("\n🗑️  Step 2: Soft Delete");
    println!("----------------------");

    store.delete(&2).await?;
    let visible: Vec<String> = store.list_all().await?.into_iter().map(|n| n.title).collect();
    println!("✅ Visible notes: {:?}", visible);
    println!(
        "✅ Rows still stored: {}",
        store.count_with_deleted(QueryBuilder::new()).await?
    );

    // 3. Inspect and restore
    println!("\n♻️  Step 3: Undelete");
    println!("-------------------");

    for deleted in store.find_deleted(QueryBuilder::new()).await? {
        println!(
            "   '{}' deleted at {:?}",
            deleted.title, deleted.dt_deleted
        );
    }

    if let Some(mut record) = store.get_by_id_with_deleted(&2).await? {
        let restored = store.undelete(&mut record).await?;
        println!("✅ Restored '{}': {}", record.title, restored);
    }
    println!("✅ Visible count: {}", store.count().await?);

    // 4. Physical removal
    println!("\n💥 Step 4: Hard Delete");
    println!("----------------------");

    if let Some(record) = store.get_by_id(&3).await? {
        store.hard_delete(&record).await?;
    }
    println!(
        "✅ Rows stored after hard delete: {}",
        store.backend().raw_rows("notes").len()
    );

    println!("\n🎉 Demo complete");
    Ok(())
}
