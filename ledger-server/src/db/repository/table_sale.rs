//! Table Sale Repository

use super::{RepoError, RepoResult};
use shared::models::{PaymentMethod, TableSale, TableSaleItem, TableSaleStatus};
use sqlx::{SqliteConnection, SqlitePool};

const TABLE_SALE_SELECT: &str = "SELECT id, table_number, items, subtotal, discount_amount, total_amount, payment_method, change_amount, status, opened_at, closed_at FROM table_sale";

#[derive(sqlx::FromRow)]
struct TableSaleRow {
    id: i64,
    table_number: i32,
    items: String,
    subtotal: f64,
    discount_amount: f64,
    total_amount: f64,
    payment_method: Option<PaymentMethod>,
    change_amount: Option<f64>,
    status: TableSaleStatus,
    opened_at: i64,
    closed_at: Option<i64>,
}

impl TableSaleRow {
    fn into_table_sale(self) -> RepoResult<TableSale> {
        let items: Vec<TableSaleItem> = serde_json::from_str(&self.items)?;
        Ok(TableSale {
            id: self.id,
            table_number: self.table_number,
            items,
            subtotal: self.subtotal,
            discount_amount: self.discount_amount,
            total_amount: self.total_amount,
            payment_method: self.payment_method,
            change_amount: self.change_amount,
            status: self.status,
            opened_at: self.opened_at,
            closed_at: self.closed_at,
        })
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<TableSale>> {
    let sql = format!("{TABLE_SALE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, TableSaleRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(TableSaleRow::into_table_sale).transpose()
}

async fn find_by_id_conn(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<TableSale>> {
    let sql = format!("{TABLE_SALE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, TableSaleRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    row.map(TableSaleRow::into_table_sale).transpose()
}

pub async fn find_open(pool: &SqlitePool) -> RepoResult<Vec<TableSale>> {
    let sql = format!("{TABLE_SALE_SELECT} WHERE status = 'OPEN' ORDER BY table_number");
    let rows = sqlx::query_as::<_, TableSaleRow>(&sql).fetch_all(pool).await?;
    rows.into_iter().map(TableSaleRow::into_table_sale).collect()
}

pub async fn find_all(pool: &SqlitePool, limit: i32, offset: i32) -> RepoResult<Vec<TableSale>> {
    let sql = format!("{TABLE_SALE_SELECT} ORDER BY opened_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, TableSaleRow>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(TableSaleRow::into_table_sale).collect()
}

/// Open a table. One open sale per table at a time.
pub async fn open(pool: &SqlitePool, table_number: i32) -> RepoResult<TableSale> {
    if table_number < 1 {
        return Err(RepoError::Validation(format!(
            "table_number must be positive: {table_number}"
        )));
    }

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM table_sale WHERE table_number = ? AND status = 'OPEN'")
            .bind(table_number)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Err(RepoError::Duplicate(format!(
            "table {table_number} already has an open sale"
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO table_sale (id, table_number, items, subtotal, discount_amount, total_amount, status, opened_at) VALUES (?1, ?2, '[]', 0, 0, 0, 'OPEN', ?3)",
    )
    .bind(id)
    .bind(table_number)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to open table sale".into()))
}

/// Replace the item list of an open sale with freshly priced snapshots.
pub async fn set_items(
    pool: &SqlitePool,
    id: i64,
    items: &[TableSaleItem],
    subtotal: f64,
) -> RepoResult<TableSale> {
    let items_json = serde_json::to_string(items)?;
    let rows = sqlx::query(
        "UPDATE table_sale SET items = ?1, subtotal = ?2, total_amount = ?2 - discount_amount WHERE id = ?3 AND status = 'OPEN'",
    )
    .bind(items_json)
    .bind(subtotal)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::BusinessRule(format!(
            "table sale {id} is not open"
        )));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table sale {id} not found")))
}

/// Close the sale with its final totals. Runs on the caller's connection so
/// the register entry posted for the payment commits with it.
pub async fn close_in_tx(
    conn: &mut SqliteConnection,
    id: i64,
    discount_amount: f64,
    total_amount: f64,
    payment_method: PaymentMethod,
    change_amount: Option<f64>,
) -> RepoResult<TableSale> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE table_sale SET status = 'CLOSED', discount_amount = ?1, total_amount = ?2, payment_method = ?3, change_amount = ?4, closed_at = ?5 WHERE id = ?6 AND status = 'OPEN'",
    )
    .bind(discount_amount)
    .bind(total_amount)
    .bind(payment_method)
    .bind(change_amount)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::BusinessRule(format!(
            "table sale {id} is not open"
        )));
    }
    find_by_id_conn(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table sale {id} not found")))
}

pub async fn cancel(pool: &SqlitePool, id: i64) -> RepoResult<TableSale> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE table_sale SET status = 'CANCELLED', closed_at = ?1 WHERE id = ?2 AND status = 'OPEN'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::BusinessRule(format!(
            "table sale {id} is not open"
        )));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table sale {id} not found")))
}

/// Closed sales for the rollup window, filtered at the source query.
pub async fn find_for_rollup(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<TableSale>> {
    let sql = format!(
        "{TABLE_SALE_SELECT} WHERE status = 'CLOSED' AND closed_at >= ? AND closed_at < ? ORDER BY closed_at"
    );
    let rows = sqlx::query_as::<_, TableSaleRow>(&sql)
        .bind(start_millis)
        .bind(end_millis)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(TableSaleRow::into_table_sale).collect()
}
