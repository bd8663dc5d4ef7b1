//! PostgreSQL integration tests
//!
//! Run with `DATABASE_URL` pointing at a scratch database:
//! `cargo test --test postgres_soft_delete -- --ignored`

use softhaus::prelude::*;
use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Memo {
    pub id: i64,
    pub body: String,
    pub deleted: i32,
    pub dt_deleted: Option<chrono::DateTime<chrono::Utc>>,
}

impl TableMetadata for Memo {
    type Id = i64;

    fn table_name() -> &'static str {
        "softhaus_memos"
    }

    fn columns() -> &'static [&'static str] {
        &["id", "body", "deleted", "dt_deleted"]
    }

    fn extract_id(&self) -> i64 {
        self.id
    }
}

async fn setup_pool() -> PgPool {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::query("DROP TABLE IF EXISTS softhaus_memos")
        .execute(&pool)
        .await
        .expect("Failed to drop table");
    sqlx::query(
        "CREATE TABLE softhaus_memos (
            id BIGINT PRIMARY KEY,
            body TEXT NOT NULL,
            deleted INTEGER NOT NULL DEFAULT 0,
            dt_deleted TIMESTAMPTZ
        )",
    )
    .execute(&pool)
    .await
    .expect("Failed to create table");

    pool
}

fn memo(id: i64, body: &str) -> Memo {
    Memo {
        id,
        body: body.to_string(),
        deleted: 0,
        dt_deleted: None,
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_postgres_soft_delete_cycle() {
    let pool = setup_pool().await;
    let softhaus = SoftHaus::with_pool(pool.clone(), SoftDeleteConfig::default());
    softhaus.health_check().await.unwrap();
    let store = softhaus.store::<Memo>().unwrap();

    store.create(memo(1, "keep")).await.unwrap();
    store.create(memo(2, "drop")).await.unwrap();

    assert!(store.delete(&2).await.unwrap());

    let (stored_flag, stamped): (i32, bool) =
        sqlx::query_as("SELECT deleted, dt_deleted <= NOW() FROM softhaus_memos WHERE id = 2")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored_flag, 1);
    assert!(stamped);

    let visible = store
        .find(QueryBuilder::new().filter(QueryFilter::like("body", "%")))
        .await
        .unwrap();
    assert_eq!(visible, vec![memo(1, "keep")]);
    assert_eq!(store.count_with_deleted(QueryBuilder::new()).await.unwrap(), 2);

    let mut dropped = store.get_by_id_with_deleted(&2).await.unwrap().unwrap();
    let deleted_at = dropped.dt_deleted;
    assert!(deleted_at.is_some());

    assert!(store.undelete(&mut dropped).await.unwrap());
    assert_eq!(dropped.deleted, 0);
    assert_eq!(dropped.dt_deleted, deleted_at);
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_postgres_flag_and_stamp_in_one_transaction() {
    let pool = setup_pool().await;
    let softhaus = SoftHaus::with_pool(pool.clone(), SoftDeleteConfig::default());
    let store = softhaus.store::<Memo>().unwrap();
    store.create(memo(5, "atomic")).await.unwrap();

    let mut tx = store.begin_transaction().await.unwrap();
    sqlx::query("UPDATE softhaus_memos SET deleted = 1, dt_deleted = NOW() WHERE id = $1")
        .bind(5_i64)
        .execute(&mut **tx.as_mut())
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    assert_eq!(store.get_by_id(&5).await.unwrap(), Some(memo(5, "atomic")));
}
