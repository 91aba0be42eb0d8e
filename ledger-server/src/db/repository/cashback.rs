//! Cashback Transaction Repository

use super::RepoResult;
use shared::models::{CashbackTransaction, CashbackType};
use sqlx::{SqliteConnection, SqlitePool};

const TRANSACTION_SELECT: &str = "SELECT id, customer_id, order_id, transaction_type, amount, balance_after, description, created_at FROM cashback_transaction";

/// Record one cashback transaction. Runs inside the order transaction so a
/// failed order never leaves a dangling ledger row.
pub async fn insert(
    conn: &mut SqliteConnection,
    customer_id: i64,
    order_id: Option<i64>,
    kind: CashbackType,
    amount: f64,
    balance_after: f64,
    description: Option<&str>,
) -> RepoResult<CashbackTransaction> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO cashback_transaction (id, customer_id, order_id, transaction_type, amount, balance_after, description, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(id)
    .bind(customer_id)
    .bind(order_id)
    .bind(kind)
    .bind(amount)
    .bind(balance_after)
    .bind(description)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(CashbackTransaction {
        id,
        customer_id,
        order_id,
        kind,
        amount,
        balance_after,
        description: description.map(str::to_string),
        created_at: now,
    })
}

pub async fn list_by_customer(
    pool: &SqlitePool,
    customer_id: i64,
    limit: i32,
) -> RepoResult<Vec<CashbackTransaction>> {
    let sql = format!("{TRANSACTION_SELECT} WHERE customer_id = ? ORDER BY created_at DESC LIMIT ?");
    let rows = sqlx::query_as::<_, CashbackTransaction>(&sql)
        .bind(customer_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
