//! Order Repository (delivery + PDV)
//!
//! Item snapshots are stored as JSON; the row type stays internal and the
//! public functions speak `shared::models::Order`.

use super::{RepoError, RepoResult};
use shared::models::{CartItem, Order, OrderChannel, OrderStatus, PaymentMethod};
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_SELECT: &str = "SELECT id, channel, customer_id, customer_name, customer_phone, address, neighborhood, items, subtotal, delivery_fee, cashback_applied, cashback_earned, total_amount, payment_method, change_for, status, created_at, updated_at FROM orders";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    channel: OrderChannel,
    customer_id: Option<i64>,
    customer_name: String,
    customer_phone: Option<String>,
    address: Option<String>,
    neighborhood: Option<String>,
    items: String,
    subtotal: f64,
    delivery_fee: f64,
    cashback_applied: f64,
    cashback_earned: f64,
    total_amount: f64,
    payment_method: PaymentMethod,
    change_for: Option<f64>,
    status: OrderStatus,
    created_at: i64,
    updated_at: i64,
}

impl OrderRow {
    fn into_order(self) -> RepoResult<Order> {
        let items: Vec<CartItem> = serde_json::from_str(&self.items)?;
        Ok(Order {
            id: self.id,
            channel: self.channel,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            address: self.address,
            neighborhood: self.neighborhood,
            items,
            subtotal: self.subtotal,
            delivery_fee: self.delivery_fee,
            cashback_applied: self.cashback_applied,
            cashback_earned: self.cashback_earned,
            total_amount: self.total_amount,
            payment_method: self.payment_method,
            change_for: self.change_for,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insert a finalized order. Runs on the caller's connection so the order,
/// its cashback transactions, and the register entry commit together.
pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    let items = serde_json::to_string(&order.items)?;
    sqlx::query(
        "INSERT INTO orders (id, channel, customer_id, customer_name, customer_phone, address, neighborhood, items, subtotal, delivery_fee, cashback_applied, cashback_earned, total_amount, payment_method, change_for, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
    )
    .bind(order.id)
    .bind(order.channel)
    .bind(order.customer_id)
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(&order.address)
    .bind(&order.neighborhood)
    .bind(items)
    .bind(order.subtotal)
    .bind(order.delivery_fee)
    .bind(order.cashback_applied)
    .bind(order.cashback_earned)
    .bind(order.total_amount)
    .bind(order.payment_method)
    .bind(order.change_for)
    .bind(order.status)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(OrderRow::into_order).transpose()
}

pub async fn find_all(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Order>> {
    let rows = match status {
        Some(status) => {
            let sql =
                format!("{ORDER_SELECT} WHERE status = ? ORDER BY created_at DESC LIMIT ? OFFSET ?");
            sqlx::query_as::<_, OrderRow>(&sql)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{ORDER_SELECT} ORDER BY created_at DESC LIMIT ? OFFSET ?");
            sqlx::query_as::<_, OrderRow>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
    };
    rows.into_iter().map(OrderRow::into_order).collect()
}

/// Advance the order lifecycle, re-validating the transition.
///
/// The update is conditioned on the status we read, so two attendants
/// racing the same order cannot both win.
pub async fn update_status(pool: &SqlitePool, id: i64, next: OrderStatus) -> RepoResult<Order> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))?;

    if !current.status.can_transition_to(next) {
        return Err(RepoError::BusinessRule(format!(
            "invalid status transition {:?} -> {:?}",
            current.status, next
        )));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4")
        .bind(next)
        .bind(now)
        .bind(id)
        .bind(current.status)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::BusinessRule(
            "order status changed concurrently, retry".into(),
        ));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Orders for the rollup window. Cancelled orders are excluded here, at the
/// source query, never by post-filtering.
pub async fn find_for_rollup(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "{ORDER_SELECT} WHERE status != 'CANCELLED' AND created_at >= ? AND created_at < ? ORDER BY created_at"
    );
    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(start_millis)
        .bind(end_millis)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(OrderRow::into_order).collect()
}
