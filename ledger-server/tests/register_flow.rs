//! Cash register lifecycle integration tests: opening, entries across
//! channels, reconciliation, closing, and the daily rollup on top.

use ledger_server::db::repository::cash_register;
use ledger_server::registers;
use ledger_server::services::{checkout, reporting, tables};
use ledger_server::{Config, ServerState};
use shared::models::{
    CartItemInput, CashEntryCreate, CheckoutRequest, DailyReportGenerate, EntryType,
    PaymentMethod, RegisterClose, RegisterOpen, RegisterStatus, TableSaleClose, TableSaleItemInput,
    TableSaleOpen, TableSaleSetItems,
};

async fn test_state() -> ServerState {
    let mut config = Config::for_tests();
    config.cashback_accrual_percent = 5.0;
    config.block_unknown_neighborhood = false;
    ServerState::for_tests(config)
        .await
        .expect("state should initialize")
}

async fn open_register(state: &ServerState, opening: f64) -> shared::models::CashRegister {
    cash_register::open(
        &state.pool,
        &state.config.store_id,
        RegisterOpen {
            operator_name: "Maria".to_string(),
            opening_amount: opening,
            note: None,
        },
    )
    .await
    .expect("register should open")
}

fn pdv_sale(amount: f64, method: PaymentMethod) -> shared::models::PdvSaleRequest {
    shared::models::PdvSaleRequest {
        items: vec![CartItemInput {
            product_id: 1,
            name: "Açaí".to_string(),
            price: amount,
            selected_size: None,
            complements: vec![],
            quantity: 1,
            observations: None,
        }],
        payment_method: method,
        change_for: None,
        customer_name: None,
        customer_phone: None,
        cashback_to_apply: None,
    }
}

#[tokio::test]
async fn only_one_register_open_per_store() {
    let state = test_state().await;
    open_register(&state, 50.0).await;

    let second = cash_register::open(
        &state.pool,
        &state.config.store_id,
        RegisterOpen {
            operator_name: "Pedro".to_string(),
            opening_amount: 30.0,
            note: None,
        },
    )
    .await;
    assert!(second.is_err(), "second open must be rejected");
}

#[tokio::test]
async fn opening_amount_must_be_positive() {
    let state = test_state().await;
    let result = cash_register::open(
        &state.pool,
        &state.config.store_id,
        RegisterOpen {
            operator_name: "Maria".to_string(),
            opening_amount: 0.0,
            note: None,
        },
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn full_day_reconciliation_scenario() {
    // Register opens at R$50; three PDV cash sales of 20/15/10; one delivery
    // order by card of 40; one manual cash expense of 5.
    let state = test_state().await;
    let register = open_register(&state, 50.0).await;

    for amount in [20.0, 15.0, 10.0] {
        checkout::submit_pdv_sale(&state, pdv_sale(amount, PaymentMethod::Money))
            .await
            .unwrap();
    }

    checkout::submit_delivery_order(
        &state,
        CheckoutRequest {
            customer_name: "João Silva".to_string(),
            customer_phone: "(85) 99123-4567".to_string(),
            address: "Rua das Flores, 123".to_string(),
            neighborhood: "Desconhecido".to_string(), // zero-fee fallback
            items: vec![CartItemInput {
                product_id: 2,
                name: "Combo".to_string(),
                price: 40.0,
                selected_size: None,
                complements: vec![],
                quantity: 1,
                observations: None,
            }],
            payment_method: PaymentMethod::Card,
            change_for: None,
            cashback_to_apply: None,
        },
    )
    .await
    .unwrap();

    cash_register::add_manual_entry(
        &state.pool,
        &state.config.store_id,
        CashEntryCreate {
            entry_type: EntryType::Expense,
            payment_method: PaymentMethod::Money,
            amount: 5.0,
            description: "gelo".to_string(),
        },
    )
    .await
    .unwrap();

    let entries = cash_register::list_entries(&state.pool, register.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 5);

    let summary = registers::summarize(&register, &entries);
    // Card sale excluded from the drawer: 50 + 45 - 5 = 90
    assert_eq!(summary.expected_balance, 90.0);
    // All channels, all methods: 20 + 15 + 10 + 40 = 85
    assert_eq!(summary.sales_total, 85.0);

    // Counting exactly the expected drawer closes with zero difference
    let closed = cash_register::close(
        &state.pool,
        register.id,
        RegisterClose {
            closing_amount: 90.0,
            note: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(closed.status, RegisterStatus::Closed);
    assert_eq!(closed.expected_balance, Some(90.0));
    assert_eq!(closed.difference, Some(0.0));
}

#[tokio::test]
async fn closing_short_reports_a_negative_difference() {
    let state = test_state().await;
    let register = open_register(&state, 100.0).await;

    checkout::submit_pdv_sale(&state, pdv_sale(50.0, PaymentMethod::Money))
        .await
        .unwrap();
    checkout::submit_pdv_sale(&state, pdv_sale(30.0, PaymentMethod::Card))
        .await
        .unwrap();
    cash_register::add_manual_entry(
        &state.pool,
        &state.config.store_id,
        CashEntryCreate {
            entry_type: EntryType::Expense,
            payment_method: PaymentMethod::Money,
            amount: 20.0,
            description: "fornecedor".to_string(),
        },
    )
    .await
    .unwrap();

    // expected = 100 + 50 - 20 = 130; drawer counted 125
    let closed = cash_register::close(
        &state.pool,
        register.id,
        RegisterClose {
            closing_amount: 125.0,
            note: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(closed.expected_balance, Some(130.0));
    assert_eq!(closed.difference, Some(-5.0));
}

#[tokio::test]
async fn closed_register_accepts_nothing_further() {
    let state = test_state().await;
    let register = open_register(&state, 50.0).await;

    cash_register::close(
        &state.pool,
        register.id,
        RegisterClose {
            closing_amount: 50.0,
            note: None,
        },
    )
    .await
    .unwrap();

    // Closing again is rejected
    let again = cash_register::close(
        &state.pool,
        register.id,
        RegisterClose {
            closing_amount: 50.0,
            note: None,
        },
    )
    .await;
    assert!(again.is_err());

    // Manual entries no longer attach (no open register)
    let entry = cash_register::add_manual_entry(
        &state.pool,
        &state.config.store_id,
        CashEntryCreate {
            entry_type: EntryType::Income,
            payment_method: PaymentMethod::Money,
            amount: 10.0,
            description: "late".to_string(),
        },
    )
    .await;
    assert!(entry.is_err());

    // PDV sales are blocked too
    let sale = checkout::submit_pdv_sale(&state, pdv_sale(10.0, PaymentMethod::Money)).await;
    assert!(sale.is_err());
}

#[tokio::test]
async fn table_sale_flows_into_register_and_rollup() {
    let state = test_state().await;
    let register = open_register(&state, 50.0).await;

    let sale = tables::open_table(&state, TableSaleOpen { table_number: 3 })
        .await
        .unwrap();

    let sale = tables::set_items(
        &state,
        sale.id,
        TableSaleSetItems {
            items: vec![TableSaleItemInput {
                product_code: "ACAI-KG".to_string(),
                name: "Açaí no peso".to_string(),
                quantity: 0.5,
                unit_price: 50.0,
            }],
        },
    )
    .await
    .unwrap();
    assert_eq!(sale.subtotal, 25.0);

    let closed = tables::close_table(
        &state,
        sale.id,
        TableSaleClose {
            discount_amount: Some(5.0),
            payment_method: PaymentMethod::Money,
            amount_tendered: Some(50.0),
        },
    )
    .await
    .unwrap();
    assert_eq!(closed.total_amount, 20.0);
    assert_eq!(closed.change_amount, Some(30.0));

    let entries = cash_register::list_entries(&state.pool, register.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, 20.0);

    // One PDV sale alongside, then roll up the business day
    checkout::submit_pdv_sale(&state, pdv_sale(30.0, PaymentMethod::Pix))
        .await
        .unwrap();

    let today = ledger_server::utils::time::current_business_date(
        state.config.business_day_cutoff,
        state.config.timezone,
    )
    .format("%Y-%m-%d")
    .to_string();

    let report = reporting::generate_daily(
        &state,
        DailyReportGenerate {
            business_date: today.clone(),
            note: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(report.total_transactions, 2);
    assert_eq!(report.table_sales, 1);
    assert_eq!(report.pdv_orders, 1);
    assert_eq!(report.gross_sales, 50.0);
    assert_eq!(report.discounts, 5.0);
    assert_eq!(report.ticket_average, 25.0);

    // Regeneration replaces, never accumulates
    let again = reporting::generate_daily(
        &state,
        DailyReportGenerate {
            business_date: today,
            note: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(again.total_transactions, 2);
    assert_eq!(again.gross_sales, 50.0);
}

#[tokio::test]
async fn discount_above_subtotal_is_rejected() {
    let state = test_state().await;
    open_register(&state, 50.0).await;

    let sale = tables::open_table(&state, TableSaleOpen { table_number: 1 })
        .await
        .unwrap();
    let sale = tables::set_items(
        &state,
        sale.id,
        TableSaleSetItems {
            items: vec![TableSaleItemInput {
                product_code: "A1".to_string(),
                name: "Item".to_string(),
                quantity: 1.0,
                unit_price: 10.0,
            }],
        },
    )
    .await
    .unwrap();

    let result = tables::close_table(
        &state,
        sale.id,
        TableSaleClose {
            discount_amount: Some(15.0),
            payment_method: PaymentMethod::Money,
            amount_tendered: None,
        },
    )
    .await;
    assert!(result.is_err());
}
