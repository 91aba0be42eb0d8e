//! Checkout service: delivery and PDV sale finalization
//!
//! The whole finalization is one database transaction: order row, balance
//! debit/credit, cashback ledger rows, lifetime-spend update, and the
//! register entry either all commit or none do. The legacy system created
//! the order first and silently carried on when the cashback commit failed;
//! that partial-failure path does not exist here.

use serde::Serialize;
use shared::models::{
    CartItem, CashbackType, CheckoutRequest, EntryType, Order, OrderChannel, OrderStatus,
    PaymentMethod, PdvSaleRequest, SaleChannel,
};

use crate::cashback;
use crate::core::ServerState;
use crate::db::repository::{cash_register, cashback as cashback_repo, customer, order};
use crate::db::repository::cash_register::NewCashEntry;
use crate::delivery;
use crate::money;
use crate::pricing;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, validate_phone, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Checkout result returned to the storefront
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutOutcome {
    pub order: Order,
    /// Estimated delivery time quoted to the customer (delivery only)
    pub eta_minutes: Option<i32>,
    /// Total formatted as BRL, ready for the receipt/confirmation message
    pub formatted_total: String,
}

struct SaleContext {
    channel: OrderChannel,
    customer: Option<(String, String)>,
    address: Option<String>,
    neighborhood: Option<String>,
    delivery_fee: f64,
    items: Vec<CartItem>,
    subtotal: f64,
    payment_method: PaymentMethod,
    change_for: Option<f64>,
    cashback_to_apply: f64,
    initial_status: OrderStatus,
    /// PDV/table flows must have an open register; delivery must not block
    require_register: bool,
}

/// Submit a delivery order from the storefront checkout.
pub async fn submit_delivery_order(
    state: &ServerState,
    req: CheckoutRequest,
) -> AppResult<CheckoutOutcome> {
    validate_required_text(&req.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_required_text(&req.address, "address", MAX_ADDRESS_LEN)?;
    validate_required_text(&req.neighborhood, "neighborhood", MAX_NAME_LEN)?;
    let phone = validate_phone(&req.customer_phone)?;

    if req.items.is_empty() {
        return Err(AppError::validation("order must have at least one item"));
    }
    let (items, subtotal) = pricing::price_cart(&req.items)?;

    let neighborhood =
        crate::db::repository::neighborhood::find_by_name(&state.pool, &req.neighborhood).await?;
    let quote = delivery::resolve(
        neighborhood.as_ref(),
        state.config.default_delivery_eta_minutes,
    );
    if !quote.matched {
        if state.config.block_unknown_neighborhood {
            return Err(AppError::validation(format!(
                "neighborhood '{}' is not served",
                req.neighborhood
            )));
        }
        tracing::warn!(
            neighborhood = %req.neighborhood,
            "Unknown neighborhood at checkout, applying zero delivery fee"
        );
    }

    let ctx = SaleContext {
        channel: OrderChannel::Delivery,
        customer: Some((req.customer_name, phone)),
        address: Some(req.address),
        neighborhood: Some(req.neighborhood),
        delivery_fee: quote.fee,
        items,
        subtotal,
        payment_method: req.payment_method,
        change_for: req.change_for,
        cashback_to_apply: req.cashback_to_apply.unwrap_or(0.0),
        initial_status: OrderStatus::Pending,
        require_register: false,
    };

    let order = finalize(state, ctx).await?;
    let formatted_total = money::format_price(order.total_amount);
    Ok(CheckoutOutcome {
        order,
        eta_minutes: Some(quote.eta_minutes),
        formatted_total,
    })
}

/// Finalize an in-person PDV sale. The sale is paid on the spot, so the
/// order lands directly in its terminal delivered state.
pub async fn submit_pdv_sale(state: &ServerState, req: PdvSaleRequest) -> AppResult<CheckoutOutcome> {
    if req.items.is_empty() {
        return Err(AppError::validation("sale must have at least one item"));
    }
    let (items, subtotal) = pricing::price_cart(&req.items)?;

    let customer = match (&req.customer_name, &req.customer_phone) {
        (Some(name), Some(raw)) => {
            validate_required_text(name, "customer_name", MAX_NAME_LEN)?;
            Some((name.clone(), validate_phone(raw)?))
        }
        (None, None) => None,
        _ => {
            return Err(AppError::validation(
                "customer_name and customer_phone must be provided together",
            ));
        }
    };

    let ctx = SaleContext {
        channel: OrderChannel::Pdv,
        customer,
        address: None,
        neighborhood: None,
        delivery_fee: 0.0,
        items,
        subtotal,
        payment_method: req.payment_method,
        change_for: req.change_for,
        cashback_to_apply: req.cashback_to_apply.unwrap_or(0.0),
        initial_status: OrderStatus::Delivered,
        require_register: true,
    };

    let order = finalize(state, ctx).await?;
    let formatted_total = money::format_price(order.total_amount);
    Ok(CheckoutOutcome {
        order,
        eta_minutes: None,
        formatted_total,
    })
}

async fn finalize(state: &ServerState, ctx: SaleContext) -> AppResult<Order> {
    let payable_base = pricing::order_subtotal(ctx.subtotal, ctx.delivery_fee);

    if ctx.cashback_to_apply > 0.0 && ctx.customer.is_none() {
        return Err(AppError::validation(
            "a customer phone is required to redeem cashback",
        ));
    }

    let mut tx = state.pool.begin().await.map_err(db_err)?;

    // Resolve (or create) the customer inside the transaction so a failed
    // order never strands a half-registered customer balance.
    let customer_record = match &ctx.customer {
        Some((name, phone)) => Some(customer::find_or_create(&mut tx, name, phone).await?),
        None => None,
    };

    let applied = match (&customer_record, ctx.cashback_to_apply > 0.0) {
        (Some(record), true) => {
            cashback::validate_redemption(
                ctx.cashback_to_apply,
                record.available_balance,
                payable_base,
            )?;
            money::round_money(ctx.cashback_to_apply)
        }
        _ => 0.0,
    };

    let total = cashback::payable_total(ctx.subtotal, ctx.delivery_fee, applied);

    // Change only makes sense for cash payments and must cover the total
    if let Some(change_for) = ctx.change_for {
        if !ctx.payment_method.is_cash() {
            return Err(AppError::validation(
                "change_for is only valid for money payments",
            ));
        }
        if !money::covers(change_for, total) {
            return Err(AppError::validation(format!(
                "change_for ({change_for}) does not cover the order total ({total})"
            )));
        }
    }

    let earned = match &customer_record {
        Some(_) => cashback::accrual_amount(total, state.config.cashback_accrual_percent),
        None => 0.0,
    };

    let now = shared::util::now_millis();
    let order_record = Order {
        id: shared::util::snowflake_id(),
        channel: ctx.channel,
        customer_id: customer_record.as_ref().map(|c| c.id),
        customer_name: ctx
            .customer
            .as_ref()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "Consumidor".to_string()),
        customer_phone: ctx.customer.as_ref().map(|(_, phone)| phone.clone()),
        address: ctx.address,
        neighborhood: ctx.neighborhood,
        items: ctx.items,
        subtotal: ctx.subtotal,
        delivery_fee: ctx.delivery_fee,
        cashback_applied: applied,
        cashback_earned: earned,
        total_amount: total,
        payment_method: ctx.payment_method,
        change_for: ctx.change_for,
        status: ctx.initial_status,
        created_at: now,
        updated_at: now,
    };

    order::insert(&mut tx, &order_record).await?;

    if let Some(record) = &customer_record {
        if applied > 0.0 {
            // Conditional debit: aborts the whole transaction if the balance
            // moved concurrently since validation.
            let balance_after = customer::debit_balance(&mut tx, record.id, applied).await?;
            cashback_repo::insert(
                &mut tx,
                record.id,
                Some(order_record.id),
                CashbackType::Redemption,
                applied,
                balance_after,
                Some("redeemed at checkout"),
            )
            .await?;
        }

        if earned > 0.0 {
            let balance_after = customer::credit_balance(&mut tx, record.id, earned).await?;
            cashback_repo::insert(
                &mut tx,
                record.id,
                Some(order_record.id),
                CashbackType::Purchase,
                earned,
                balance_after,
                Some("earned on purchase"),
            )
            .await?;
        }

        customer::add_spent(&mut tx, record.id, total).await?;
    }

    // Register attribution: PDV requires an open register; a delivery order
    // still completes without one, with an operator-visible warning for
    // manual reconciliation.
    let open_register = cash_register::find_open_conn(&mut tx, &state.config.store_id).await?;
    match (&open_register, ctx.require_register) {
        (None, true) => {
            return Err(crate::registers::RegisterError::NotOpen.into());
        }
        (None, false) => {
            tracing::warn!(
                order_id = order_record.id,
                total = total,
                "Sale finalized with no open register; drawer attribution missing"
            );
        }
        (Some(register), _) => {
            if total > 0.0 {
                let channel = match ctx.channel {
                    OrderChannel::Delivery => SaleChannel::Delivery,
                    OrderChannel::Pdv => SaleChannel::Pdv,
                };
                cash_register::insert_entry(
                    &mut tx,
                    register.id,
                    NewCashEntry {
                        entry_type: EntryType::Income,
                        channel,
                        payment_method: ctx.payment_method,
                        amount: total,
                        description: &format!("sale #{}", order_record.id),
                        source_id: Some(order_record.id),
                    },
                )
                .await?;
            }
        }
    }

    tx.commit().await.map_err(db_err)?;

    tracing::info!(
        order_id = order_record.id,
        channel = ?order_record.channel,
        total = order_record.total_amount,
        cashback_applied = order_record.cashback_applied,
        cashback_earned = order_record.cashback_earned,
        "Sale finalized"
    );

    Ok(order_record)
}

fn db_err(err: sqlx::Error) -> AppError {
    AppError::database(err.to_string())
}
