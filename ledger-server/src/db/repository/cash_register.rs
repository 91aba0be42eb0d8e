//! Cash Register Repository
//!
//! Lifecycle invariants are enforced here regardless of caller checks:
//! a single open register per store (backed by a partial unique index),
//! entries only attach while the register is open, and closing freezes the
//! reconciliation figures computed from the entries it actually holds.

use super::{RepoError, RepoResult};
use shared::models::{
    CashEntry, CashEntryCreate, CashRegister, EntryType, PaymentMethod, RegisterClose,
    RegisterOpen, RegisterStatus, SaleChannel,
};
use sqlx::{SqliteConnection, SqlitePool};

use crate::money::{to_decimal, to_f64};
use crate::registers::{self, RegisterError};

const REGISTER_SELECT: &str = "SELECT id, store_id, status, opening_amount, closing_amount, expected_balance, difference, operator_name, opened_at, closed_at, note, created_at, updated_at FROM cash_register";

const ENTRY_SELECT: &str = "SELECT id, register_id, entry_type, channel, payment_method, amount, description, source_id, created_at FROM cash_entry";

/// Entry fields supplied by the service layer
pub struct NewCashEntry<'a> {
    pub entry_type: EntryType,
    pub channel: SaleChannel,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub description: &'a str,
    pub source_id: Option<i64>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CashRegister>> {
    let sql = format!("{REGISTER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, CashRegister>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_open(pool: &SqlitePool, store_id: &str) -> RepoResult<Option<CashRegister>> {
    let sql = format!("{REGISTER_SELECT} WHERE store_id = ? AND status = 'OPEN' LIMIT 1");
    let row = sqlx::query_as::<_, CashRegister>(&sql)
        .bind(store_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Same as [`find_open`] but inside an ongoing transaction.
pub async fn find_open_conn(
    conn: &mut SqliteConnection,
    store_id: &str,
) -> RepoResult<Option<CashRegister>> {
    let sql = format!("{REGISTER_SELECT} WHERE store_id = ? AND status = 'OPEN' LIMIT 1");
    let row = sqlx::query_as::<_, CashRegister>(&sql)
        .bind(store_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

pub async fn find_all(pool: &SqlitePool, limit: i32, offset: i32) -> RepoResult<Vec<CashRegister>> {
    let sql = format!("{REGISTER_SELECT} ORDER BY opened_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, CashRegister>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Open a register (abertura). Only one may be open per store at a time.
pub async fn open(pool: &SqlitePool, store_id: &str, data: RegisterOpen) -> RepoResult<CashRegister> {
    registers::validate_session_amount(data.opening_amount, "opening_amount")
        .map_err(|e| RepoError::Validation(e.to_string()))?;

    if find_open(pool, store_id).await?.is_some() {
        return Err(RepoError::BusinessRule(
            RegisterError::AlreadyOpen.to_string(),
        ));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO cash_register (id, store_id, status, opening_amount, operator_name, opened_at, note, created_at, updated_at) VALUES (?1, ?2, 'OPEN', ?3, ?4, ?5, ?6, ?5, ?5)",
    )
    .bind(id)
    .bind(store_id)
    .bind(data.opening_amount)
    .bind(&data.operator_name)
    .bind(now)
    .bind(&data.note)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to open cash register".into()))
}

/// Attach an entry to an open register. Runs on the caller's connection so
/// sale finalization and its drawer entry commit together.
pub async fn insert_entry(
    conn: &mut SqliteConnection,
    register_id: i64,
    entry: NewCashEntry<'_>,
) -> RepoResult<CashEntry> {
    registers::validate_entry_amount(entry.amount)
        .map_err(|e| RepoError::Validation(e.to_string()))?;

    // Re-check the register is still open; closed registers are terminal
    let sql = format!("{REGISTER_SELECT} WHERE id = ?");
    let register = sqlx::query_as::<_, CashRegister>(&sql)
        .bind(register_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cash register {register_id} not found")))?;
    registers::ensure_open(&register).map_err(|e| RepoError::BusinessRule(e.to_string()))?;

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO cash_entry (id, register_id, entry_type, channel, payment_method, amount, description, source_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(register_id)
    .bind(entry.entry_type)
    .bind(entry.channel)
    .bind(entry.payment_method)
    .bind(entry.amount)
    .bind(entry.description)
    .bind(entry.source_id)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(CashEntry {
        id,
        register_id,
        entry_type: entry.entry_type,
        channel: entry.channel,
        payment_method: entry.payment_method,
        amount: entry.amount,
        description: entry.description.to_string(),
        source_id: entry.source_id,
        created_at: now,
    })
}

/// Post a manual income/expense entry to the currently open register.
pub async fn add_manual_entry(
    pool: &SqlitePool,
    store_id: &str,
    data: CashEntryCreate,
) -> RepoResult<CashEntry> {
    let mut tx = pool.begin().await?;

    let register = find_open_conn(&mut tx, store_id)
        .await?
        .ok_or_else(|| RepoError::BusinessRule("no cash register is open".into()))?;

    let entry = insert_entry(
        &mut tx,
        register.id,
        NewCashEntry {
            entry_type: data.entry_type,
            channel: SaleChannel::Manual,
            payment_method: data.payment_method,
            amount: data.amount,
            description: &data.description,
            source_id: None,
        },
    )
    .await?;

    tx.commit().await?;
    Ok(entry)
}

pub async fn list_entries(pool: &SqlitePool, register_id: i64) -> RepoResult<Vec<CashEntry>> {
    let sql = format!("{ENTRY_SELECT} WHERE register_id = ? ORDER BY created_at");
    let rows = sqlx::query_as::<_, CashEntry>(&sql)
        .bind(register_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

async fn list_entries_conn(
    conn: &mut SqliteConnection,
    register_id: i64,
) -> RepoResult<Vec<CashEntry>> {
    let sql = format!("{ENTRY_SELECT} WHERE register_id = ? ORDER BY created_at");
    let rows = sqlx::query_as::<_, CashEntry>(&sql)
        .bind(register_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

/// Close a register (fechamento): freeze expected balance and difference
/// from the entries recorded during the session. Terminal.
pub async fn close(pool: &SqlitePool, id: i64, data: RegisterClose) -> RepoResult<CashRegister> {
    registers::validate_session_amount(data.closing_amount, "closing_amount")
        .map_err(|e| RepoError::Validation(e.to_string()))?;

    let mut tx = pool.begin().await?;

    let sql = format!("{REGISTER_SELECT} WHERE id = ?");
    let register = sqlx::query_as::<_, CashRegister>(&sql)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cash register {id} not found")))?;

    if register.status == RegisterStatus::Closed {
        return Err(RepoError::BusinessRule(
            "cash register is already closed".into(),
        ));
    }

    let entries = list_entries_conn(&mut tx, id).await?;
    let expected = registers::expected_balance(&register, &entries);
    let difference = to_f64(to_decimal(data.closing_amount) - to_decimal(expected));

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE cash_register SET status = 'CLOSED', closing_amount = ?1, expected_balance = ?2, difference = ?3, closed_at = ?4, note = COALESCE(?5, note), updated_at = ?4 WHERE id = ?6 AND status = 'OPEN'",
    )
    .bind(data.closing_amount)
    .bind(expected)
    .bind(difference)
    .bind(now)
    .bind(&data.note)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::BusinessRule(
            "cash register is already closed".into(),
        ));
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cash register {id} not found")))
}
