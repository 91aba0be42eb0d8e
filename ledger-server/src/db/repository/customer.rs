//! Customer Repository
//!
//! Balance mutations are conditional updates so concurrent redemptions can
//! never overdraw: a debit that finds less balance than requested affects
//! zero rows and the surrounding transaction rolls back.

use super::{RepoError, RepoResult};
use shared::models::{Customer, CustomerCreate, CustomerUpdate};
use sqlx::{SqliteConnection, SqlitePool};

const CUSTOMER_SELECT: &str = "SELECT id, name, phone, available_balance, total_spent, is_active, created_at, updated_at FROM customer";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE is_active = 1 ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Customer>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Exact match on the normalized 11-digit phone.
pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE phone = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(phone)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn search(pool: &SqlitePool, query: &str) -> RepoResult<Vec<Customer>> {
    let pattern = format!("%{query}%");
    let sql = format!(
        "{CUSTOMER_SELECT} WHERE is_active = 1 AND (name LIKE ?1 OR phone LIKE ?1) ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, Customer>(&sql)
        .bind(&pattern)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: CustomerCreate) -> RepoResult<Customer> {
    if find_by_phone(pool, &data.phone).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Customer with phone {} already exists",
            data.phone
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO customer (id, name, phone, available_balance, total_spent, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, 0, 0, 1, ?4, ?4)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.phone)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CustomerUpdate) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET name = COALESCE(?1, name), phone = COALESCE(?2, phone), is_active = COALESCE(?3, is_active), updated_at = ?4 WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.phone)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Customer {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))
}

/// Find by phone or create with the given name — checkout path, runs inside
/// the order transaction.
pub async fn find_or_create(
    conn: &mut SqliteConnection,
    name: &str,
    phone: &str,
) -> RepoResult<Customer> {
    let sql = format!("{CUSTOMER_SELECT} WHERE phone = ?");
    if let Some(existing) = sqlx::query_as::<_, Customer>(&sql)
        .bind(phone)
        .fetch_optional(&mut *conn)
        .await?
    {
        return Ok(existing);
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO customer (id, name, phone, available_balance, total_spent, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, 0, 0, 1, ?4, ?4)",
    )
    .bind(id)
    .bind(name)
    .bind(phone)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let sql = format!("{CUSTOMER_SELECT} WHERE id = ?");
    sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}

/// Conditionally debit the cashback balance; returns the balance after.
///
/// Zero rows affected means the balance moved under us — the caller must
/// roll back the whole transaction.
pub async fn debit_balance(
    conn: &mut SqliteConnection,
    customer_id: i64,
    amount: f64,
) -> RepoResult<f64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET available_balance = available_balance - ?1, updated_at = ?2 WHERE id = ?3 AND available_balance >= ?1",
    )
    .bind(amount)
    .bind(now)
    .bind(customer_id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::BusinessRule(
            "insufficient cashback balance".into(),
        ));
    }
    balance_of(conn, customer_id).await
}

/// Credit the cashback balance; returns the balance after.
pub async fn credit_balance(
    conn: &mut SqliteConnection,
    customer_id: i64,
    amount: f64,
) -> RepoResult<f64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET available_balance = available_balance + ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(amount)
    .bind(now)
    .bind(customer_id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Customer {customer_id} not found"
        )));
    }
    balance_of(conn, customer_id).await
}

/// Accumulate lifetime spend after a finalized sale.
pub async fn add_spent(
    conn: &mut SqliteConnection,
    customer_id: i64,
    amount: f64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE customer SET total_spent = total_spent + ?1, updated_at = ?2 WHERE id = ?3")
        .bind(amount)
        .bind(now)
        .bind(customer_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn balance_of(conn: &mut SqliteConnection, customer_id: i64) -> RepoResult<f64> {
    let balance: f64 =
        sqlx::query_scalar("SELECT available_balance FROM customer WHERE id = ?")
            .bind(customer_id)
            .fetch_one(&mut *conn)
            .await?;
    Ok(balance)
}
