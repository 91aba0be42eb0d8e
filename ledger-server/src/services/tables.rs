//! Table service: open tables, price item lists, close with payment
//!
//! Closing a table posts a TABLE-channel entry to the open register in the
//! same transaction that marks the sale closed — table service requires an
//! open register, unlike delivery checkout.

use shared::models::{
    EntryType, SaleChannel, TableSale, TableSaleClose, TableSaleOpen, TableSaleSetItems,
};

use crate::core::ServerState;
use crate::db::repository::cash_register::{self, NewCashEntry};
use crate::db::repository::table_sale;
use crate::money::{covers, to_decimal, to_f64};
use crate::pricing;
use crate::registers::RegisterError;
use crate::utils::{AppError, AppResult};

pub async fn open_table(state: &ServerState, req: TableSaleOpen) -> AppResult<TableSale> {
    Ok(table_sale::open(&state.pool, req.table_number).await?)
}

/// Replace the item list of an open table with freshly priced snapshots.
pub async fn set_items(
    state: &ServerState,
    id: i64,
    req: TableSaleSetItems,
) -> AppResult<TableSale> {
    let (items, subtotal) = pricing::price_table_items(&req.items)?;
    Ok(table_sale::set_items(&state.pool, id, &items, subtotal).await?)
}

/// Close the table: apply the discount, compute change, post the register
/// entry, all in one transaction.
pub async fn close_table(state: &ServerState, id: i64, req: TableSaleClose) -> AppResult<TableSale> {
    let sale = table_sale::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table sale {id} not found")))?;

    let discount = req.discount_amount.unwrap_or(0.0);
    if !discount.is_finite() || discount < 0.0 {
        return Err(AppError::validation(format!(
            "discount_amount must be non-negative, got {discount}"
        )));
    }
    if to_decimal(discount) > to_decimal(sale.subtotal) {
        return Err(AppError::business_rule(format!(
            "discount ({discount}) exceeds the sale subtotal ({})",
            sale.subtotal
        )));
    }

    let total = to_f64(to_decimal(sale.subtotal) - to_decimal(discount));

    let change = match req.amount_tendered {
        Some(tendered) => {
            if !req.payment_method.is_cash() {
                return Err(AppError::validation(
                    "amount_tendered is only valid for money payments",
                ));
            }
            if !covers(tendered, total) {
                return Err(AppError::validation(format!(
                    "amount_tendered ({tendered}) does not cover the total ({total})"
                )));
            }
            Some(to_f64(to_decimal(tendered) - to_decimal(total)))
        }
        None => None,
    };

    let mut tx = state
        .pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let register = cash_register::find_open_conn(&mut tx, &state.config.store_id)
        .await?
        .ok_or_else(|| AppError::from(RegisterError::NotOpen))?;

    let closed =
        table_sale::close_in_tx(&mut tx, id, discount, total, req.payment_method, change).await?;

    if total > 0.0 {
        cash_register::insert_entry(
            &mut tx,
            register.id,
            NewCashEntry {
                entry_type: EntryType::Income,
                channel: SaleChannel::Table,
                payment_method: req.payment_method,
                amount: total,
                description: &format!("table {} sale #{}", closed.table_number, closed.id),
                source_id: Some(closed.id),
            },
        )
        .await?;
    }

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(
        table_sale_id = closed.id,
        table_number = closed.table_number,
        total = closed.total_amount,
        "Table sale closed"
    );

    Ok(closed)
}

pub async fn cancel_table(state: &ServerState, id: i64) -> AppResult<TableSale> {
    Ok(table_sale::cancel(&state.pool, id).await?)
}
