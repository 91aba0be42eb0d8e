//! Database bootstrap tests: file-backed pool creation, migrations, and
//! reopening an existing database.

use ledger_server::db;
use ledger_server::db::repository::neighborhood;
use shared::models::NeighborhoodCreate;

#[tokio::test]
async fn init_pool_creates_and_migrates_a_file_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("ledger.db");
    let url = format!("sqlite:{}", db_path.display());

    let pool = db::init_pool(&url).await.expect("pool should initialize");

    let created = neighborhood::create(
        &pool,
        NeighborhoodCreate {
            name: "Centro".to_string(),
            delivery_fee: 5.0,
            delivery_time_minutes: 40,
        },
    )
    .await
    .expect("insert should work after migration");
    pool.close().await;

    // Reopening the same file finds the persisted data; migrations are a
    // no-op the second time.
    let pool = db::init_pool(&url).await.expect("reopen should work");
    let found = neighborhood::find_by_name(&pool, "centro")
        .await
        .expect("query should work")
        .expect("row should persist");
    assert_eq!(found.id, created.id);
    assert_eq!(found.delivery_fee, 5.0);
    pool.close().await;
}
