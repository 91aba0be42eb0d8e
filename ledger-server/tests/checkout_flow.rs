//! Checkout flow integration tests: pricing, delivery fees, cashback
//! accrual/redemption, and the atomicity of the finalization transaction.

use ledger_server::db::repository::{cash_register, cashback, customer, neighborhood, order};
use ledger_server::services::checkout;
use ledger_server::{Config, ServerState};
use shared::models::{
    CartItemInput, CashbackType, CheckoutRequest, NeighborhoodCreate, OrderStatus, PaymentMethod,
    PdvSaleRequest, RegisterOpen, SelectedComplement,
};

async fn test_state() -> ServerState {
    let mut config = Config::for_tests();
    config.cashback_accrual_percent = 5.0;
    config.block_unknown_neighborhood = false;
    ServerState::for_tests(config)
        .await
        .expect("state should initialize")
}

async fn seed_neighborhood(state: &ServerState, name: &str, fee: f64, minutes: i32) {
    neighborhood::create(
        &state.pool,
        NeighborhoodCreate {
            name: name.to_string(),
            delivery_fee: fee,
            delivery_time_minutes: minutes,
        },
    )
    .await
    .expect("neighborhood should be created");
}

fn acai_item(price: f64, quantity: i32) -> CartItemInput {
    CartItemInput {
        product_id: 1,
        name: "Açaí 300ml".to_string(),
        price,
        selected_size: None,
        complements: vec![],
        quantity,
        observations: None,
    }
}

fn delivery_request(items: Vec<CartItemInput>) -> CheckoutRequest {
    CheckoutRequest {
        customer_name: "João Silva".to_string(),
        customer_phone: "(85) 99123-4567".to_string(),
        address: "Rua das Flores, 123".to_string(),
        neighborhood: "Centro".to_string(),
        items,
        payment_method: PaymentMethod::Pix,
        change_for: None,
        cashback_to_apply: None,
    }
}

#[tokio::test]
async fn delivery_checkout_prices_cart_and_accrues_cashback() {
    let state = test_state().await;
    seed_neighborhood(&state, "Centro", 5.0, 40).await;

    let mut item = acai_item(15.90, 3);
    item.complements.push(SelectedComplement {
        name: "Granola".to_string(),
        price: 2.00,
    });

    let outcome = checkout::submit_delivery_order(&state, delivery_request(vec![item]))
        .await
        .expect("checkout should succeed");

    let o = &outcome.order;
    // unit 17.90 x 3 = 53.70, + fee 5.00
    assert_eq!(o.subtotal, 53.70);
    assert_eq!(o.delivery_fee, 5.0);
    assert_eq!(o.total_amount, 58.70);
    assert_eq!(o.status, OrderStatus::Pending);
    assert_eq!(outcome.eta_minutes, Some(40));
    assert_eq!(outcome.formatted_total, "R$ 58,70");
    // 5% of 58.70 = 2.935 -> 2.94
    assert_eq!(o.cashback_earned, 2.94);

    // Customer was created by phone and credited
    let found = customer::find_by_phone(&state.pool, "85991234567")
        .await
        .unwrap()
        .expect("customer should exist");
    assert_eq!(found.available_balance, 2.94);
    assert_eq!(found.total_spent, 58.70);

    let history = cashback::list_by_customer(&state.pool, found.id, 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, CashbackType::Purchase);
    assert_eq!(history[0].balance_after, 2.94);
}

#[tokio::test]
async fn accrual_is_computed_on_post_redemption_payable() {
    let state = test_state().await;
    seed_neighborhood(&state, "Centro", 5.0, 40).await;

    // Give the customer a balance to redeem
    let created = customer::create(
        &state.pool,
        shared::models::CustomerCreate {
            name: "João Silva".to_string(),
            phone: "85991234567".to_string(),
        },
    )
    .await
    .unwrap();
    let mut conn = state.pool.acquire().await.unwrap();
    customer::credit_balance(&mut conn, created.id, 20.0)
        .await
        .unwrap();
    drop(conn);

    let mut req = delivery_request(vec![acai_item(100.0, 1)]);
    req.cashback_to_apply = Some(10.0);

    let outcome = checkout::submit_delivery_order(&state, req)
        .await
        .expect("checkout should succeed");

    // subtotal 100 + fee 5 - redeemed 10 = 95; 5% of 95 = 4.75 (not 5.25)
    let o = &outcome.order;
    assert_eq!(o.cashback_applied, 10.0);
    assert_eq!(o.total_amount, 95.0);
    assert_eq!(o.cashback_earned, 4.75);

    // 20 - 10 + 4.75
    let after = customer::find_by_id(&state.pool, created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.available_balance, 14.75);

    let history = cashback::list_by_customer(&state.pool, created.id, 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|t| t.kind == CashbackType::Redemption));
    assert!(history.iter().any(|t| t.kind == CashbackType::Purchase));
}

#[tokio::test]
async fn rejected_redemption_leaves_nothing_behind() {
    let state = test_state().await;
    seed_neighborhood(&state, "Centro", 5.0, 40).await;

    let created = customer::create(
        &state.pool,
        shared::models::CustomerCreate {
            name: "João Silva".to_string(),
            phone: "85991234567".to_string(),
        },
    )
    .await
    .unwrap();

    // Balance is zero; redemption must be rejected before any commit
    let mut req = delivery_request(vec![acai_item(100.0, 1)]);
    req.cashback_to_apply = Some(10.0);

    let err = checkout::submit_delivery_order(&state, req).await;
    assert!(err.is_err());

    // No order, no transactions, balance untouched
    let orders = order::find_all(&state.pool, None, 10, 0).await.unwrap();
    assert!(orders.is_empty());
    let history = cashback::list_by_customer(&state.pool, created.id, 10)
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn redemption_above_order_total_is_rejected() {
    let state = test_state().await;
    seed_neighborhood(&state, "Centro", 5.0, 40).await;

    let created = customer::create(
        &state.pool,
        shared::models::CustomerCreate {
            name: "João Silva".to_string(),
            phone: "85991234567".to_string(),
        },
    )
    .await
    .unwrap();
    let mut conn = state.pool.acquire().await.unwrap();
    customer::credit_balance(&mut conn, created.id, 500.0)
        .await
        .unwrap();
    drop(conn);

    // Order is 15 + 5 = 20; asking for 30 exceeds the payable base
    let mut req = delivery_request(vec![acai_item(15.0, 1)]);
    req.cashback_to_apply = Some(30.0);

    assert!(checkout::submit_delivery_order(&state, req).await.is_err());
}

#[tokio::test]
async fn unknown_neighborhood_defaults_to_zero_fee() {
    let state = test_state().await;

    let mut req = delivery_request(vec![acai_item(20.0, 1)]);
    req.neighborhood = "Bairro Fantasma".to_string();

    let outcome = checkout::submit_delivery_order(&state, req)
        .await
        .expect("fallback policy must not block checkout");

    assert_eq!(outcome.order.delivery_fee, 0.0);
    assert_eq!(outcome.order.total_amount, 20.0);
    assert_eq!(outcome.eta_minutes, Some(50));
}

#[tokio::test]
async fn unknown_neighborhood_blocks_when_configured() {
    let mut config = Config::for_tests();
    config.block_unknown_neighborhood = true;
    let state = ServerState::for_tests(config).await.unwrap();

    let mut req = delivery_request(vec![acai_item(20.0, 1)]);
    req.neighborhood = "Bairro Fantasma".to_string();

    assert!(checkout::submit_delivery_order(&state, req).await.is_err());
}

#[tokio::test]
async fn change_for_must_cover_the_total() {
    let state = test_state().await;
    seed_neighborhood(&state, "Centro", 5.0, 40).await;

    let mut req = delivery_request(vec![acai_item(20.0, 1)]);
    req.payment_method = PaymentMethod::Money;
    req.change_for = Some(20.0); // total is 25.00

    assert!(checkout::submit_delivery_order(&state, req).await.is_err());

    let mut req = delivery_request(vec![acai_item(20.0, 1)]);
    req.payment_method = PaymentMethod::Money;
    req.change_for = Some(50.0);
    assert!(checkout::submit_delivery_order(&state, req).await.is_ok());
}

#[tokio::test]
async fn change_for_is_invalid_for_non_cash_payments() {
    let state = test_state().await;
    seed_neighborhood(&state, "Centro", 5.0, 40).await;

    let mut req = delivery_request(vec![acai_item(20.0, 1)]);
    req.payment_method = PaymentMethod::Pix;
    req.change_for = Some(50.0);

    assert!(checkout::submit_delivery_order(&state, req).await.is_err());
}

#[tokio::test]
async fn pdv_sale_requires_an_open_register() {
    let state = test_state().await;

    let req = PdvSaleRequest {
        items: vec![acai_item(10.0, 1)],
        payment_method: PaymentMethod::Money,
        change_for: None,
        customer_name: None,
        customer_phone: None,
        cashback_to_apply: None,
    };

    // No register open yet
    assert!(checkout::submit_pdv_sale(&state, req.clone()).await.is_err());

    cash_register::open(
        &state.pool,
        &state.config.store_id,
        RegisterOpen {
            operator_name: "Maria".to_string(),
            opening_amount: 50.0,
            note: None,
        },
    )
    .await
    .unwrap();

    let outcome = checkout::submit_pdv_sale(&state, req).await.unwrap();
    assert_eq!(outcome.order.status, OrderStatus::Delivered);
    assert_eq!(outcome.order.total_amount, 10.0);
    // Anonymous sale earns no cashback
    assert_eq!(outcome.order.cashback_earned, 0.0);
}

#[tokio::test]
async fn delivery_sale_posts_a_register_entry_when_open() {
    let state = test_state().await;
    seed_neighborhood(&state, "Centro", 5.0, 40).await;

    let register = cash_register::open(
        &state.pool,
        &state.config.store_id,
        RegisterOpen {
            operator_name: "Maria".to_string(),
            opening_amount: 50.0,
            note: None,
        },
    )
    .await
    .unwrap();

    let outcome = checkout::submit_delivery_order(&state, delivery_request(vec![acai_item(35.0, 1)]))
        .await
        .unwrap();

    let entries = cash_register::list_entries(&state.pool, register.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, 40.0); // 35 + 5 fee
    assert_eq!(entries[0].source_id, Some(outcome.order.id));
}
