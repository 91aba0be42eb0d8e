//! Cash Register Reconciliation Engine
//!
//! Pure aggregation of register entries into a reconciliation summary.
//! Only entries paid in physical cash move the expected drawer balance;
//! card/PIX sales are tracked for revenue totals but never counted in the
//! drawer. Opening/closing preconditions are re-validated here no matter
//! what the caller already checked — delivery, PDV, and table sales all
//! feed the same register.

use rust_decimal::prelude::*;
use shared::models::{
    CashEntry, CashRegister, CashRegisterSummary, ChannelBreakdown, EntryType, MethodBreakdown,
    PaymentMethod, RegisterStatus, SaleChannel,
};

use crate::money::{to_decimal, to_f64};

/// Register lifecycle violations
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("a cash register is already open for this store")]
    AlreadyOpen,

    #[error("no cash register is open")]
    NotOpen,

    #[error("cash register is already closed")]
    AlreadyClosed,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

pub type RegisterResult<T> = Result<T, RegisterError>;

/// Display/aggregation order for payment method breakdowns
const METHOD_ORDER: [PaymentMethod; 5] = [
    PaymentMethod::Money,
    PaymentMethod::Pix,
    PaymentMethod::Card,
    PaymentMethod::CreditCard,
    PaymentMethod::DebitCard,
];

/// Display/aggregation order for channel breakdowns
const CHANNEL_ORDER: [SaleChannel; 4] = [
    SaleChannel::Pdv,
    SaleChannel::Delivery,
    SaleChannel::Table,
    SaleChannel::Manual,
];

/// Validate an amount used to open or close a register (must be > 0).
pub fn validate_session_amount(value: f64, field: &str) -> RegisterResult<()> {
    if !value.is_finite() {
        return Err(RegisterError::InvalidAmount(format!(
            "{field} must be a finite number"
        )));
    }
    if value <= 0.0 {
        return Err(RegisterError::InvalidAmount(format!(
            "{field} must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Validate an entry amount (must be > 0; the entry type gives direction).
pub fn validate_entry_amount(value: f64) -> RegisterResult<()> {
    if !value.is_finite() {
        return Err(RegisterError::InvalidAmount(
            "amount must be a finite number".to_string(),
        ));
    }
    if value <= 0.0 {
        return Err(RegisterError::InvalidAmount(format!(
            "amount must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Expected drawer balance: opening + cash income - cash expense.
pub fn expected_balance(register: &CashRegister, entries: &[CashEntry]) -> f64 {
    let mut balance = to_decimal(register.opening_amount);
    for entry in entries {
        if !entry.payment_method.is_cash() {
            continue;
        }
        match entry.entry_type {
            EntryType::Income => balance += to_decimal(entry.amount),
            EntryType::Expense => balance -= to_decimal(entry.amount),
        }
    }
    to_f64(balance)
}

/// Aggregate one register session's entries into its reconciliation view.
///
/// When the register is already closed the stored `closing_amount` yields
/// the `difference`; while open both stay `None`.
pub fn summarize(register: &CashRegister, entries: &[CashEntry]) -> CashRegisterSummary {
    let mut income_total = Decimal::ZERO;
    let mut expense_total = Decimal::ZERO;
    let mut sales_total = Decimal::ZERO;
    let mut cash_income = Decimal::ZERO;
    let mut cash_expense = Decimal::ZERO;

    for entry in entries {
        let amount = to_decimal(entry.amount);
        match entry.entry_type {
            EntryType::Income => {
                income_total += amount;
                if entry.channel.is_sale() {
                    sales_total += amount;
                }
                if entry.payment_method.is_cash() {
                    cash_income += amount;
                }
            }
            EntryType::Expense => {
                expense_total += amount;
                if entry.payment_method.is_cash() {
                    cash_expense += amount;
                }
            }
        }
    }

    let expected = to_decimal(register.opening_amount) + cash_income - cash_expense;
    let difference = register
        .closing_amount
        .map(|closing| to_f64(to_decimal(closing) - expected));

    CashRegisterSummary {
        register_id: register.id,
        opening_amount: register.opening_amount,
        income_total: to_f64(income_total),
        expense_total: to_f64(expense_total),
        sales_total: to_f64(sales_total),
        cash_income: to_f64(cash_income),
        cash_expense: to_f64(cash_expense),
        expected_balance: to_f64(expected),
        closing_amount: register.closing_amount,
        difference,
        by_method: method_breakdowns(entries),
        by_channel: channel_breakdowns(entries),
    }
}

/// Check that an entry may still attach to this register.
pub fn ensure_open(register: &CashRegister) -> RegisterResult<()> {
    if register.status == RegisterStatus::Closed || register.closed_at.is_some() {
        return Err(RegisterError::AlreadyClosed);
    }
    Ok(())
}

fn method_breakdowns(entries: &[CashEntry]) -> Vec<MethodBreakdown> {
    METHOD_ORDER
        .iter()
        .filter_map(|&method| {
            let mut income = Decimal::ZERO;
            let mut expense = Decimal::ZERO;
            let mut count = 0;
            for entry in entries.iter().filter(|e| e.payment_method == method) {
                match entry.entry_type {
                    EntryType::Income => income += to_decimal(entry.amount),
                    EntryType::Expense => expense += to_decimal(entry.amount),
                }
                count += 1;
            }
            (count > 0).then(|| MethodBreakdown {
                method,
                income: to_f64(income),
                expense: to_f64(expense),
                count,
            })
        })
        .collect()
}

fn channel_breakdowns(entries: &[CashEntry]) -> Vec<ChannelBreakdown> {
    CHANNEL_ORDER
        .iter()
        .filter_map(|&channel| {
            let mut income = Decimal::ZERO;
            let mut count = 0;
            for entry in entries
                .iter()
                .filter(|e| e.channel == channel && e.entry_type == EntryType::Income)
            {
                income += to_decimal(entry.amount);
                count += 1;
            }
            (count > 0).then(|| ChannelBreakdown {
                channel,
                income: to_f64(income),
                count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_register(opening: f64) -> CashRegister {
        CashRegister {
            id: 1,
            store_id: "loja-1".to_string(),
            status: RegisterStatus::Open,
            opening_amount: opening,
            closing_amount: None,
            expected_balance: None,
            difference: None,
            operator_name: "Maria".to_string(),
            opened_at: 0,
            closed_at: None,
            note: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn make_entry(
        entry_type: EntryType,
        channel: SaleChannel,
        method: PaymentMethod,
        amount: f64,
    ) -> CashEntry {
        CashEntry {
            id: 0,
            register_id: 1,
            entry_type,
            channel,
            payment_method: method,
            amount,
            description: "test".to_string(),
            source_id: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_expected_balance_cash_only() {
        // opening 100, cash sale 50, card sale 30, cash expense 20
        // expected = 100 + 50 - 20 = 130 (card excluded)
        let register = make_register(100.0);
        let entries = vec![
            make_entry(EntryType::Income, SaleChannel::Pdv, PaymentMethod::Money, 50.0),
            make_entry(EntryType::Income, SaleChannel::Pdv, PaymentMethod::Card, 30.0),
            make_entry(EntryType::Expense, SaleChannel::Manual, PaymentMethod::Money, 20.0),
        ];
        assert_eq!(expected_balance(&register, &entries), 130.0);
    }

    #[test]
    fn test_closing_difference() {
        let mut register = make_register(100.0);
        let entries = vec![
            make_entry(EntryType::Income, SaleChannel::Pdv, PaymentMethod::Money, 50.0),
            make_entry(EntryType::Income, SaleChannel::Pdv, PaymentMethod::Card, 30.0),
            make_entry(EntryType::Expense, SaleChannel::Manual, PaymentMethod::Money, 20.0),
        ];

        register.closing_amount = Some(130.0);
        let summary = summarize(&register, &entries);
        assert_eq!(summary.expected_balance, 130.0);
        assert_eq!(summary.difference, Some(0.0));

        register.closing_amount = Some(125.0);
        let summary = summarize(&register, &entries);
        assert_eq!(summary.difference, Some(-5.0));
    }

    #[test]
    fn test_full_day_scenario() {
        // Opens with R$50; three PDV cash sales 20/15/10; one delivery card
        // sale 40; one manual cash expense 5.
        let register = make_register(50.0);
        let entries = vec![
            make_entry(EntryType::Income, SaleChannel::Pdv, PaymentMethod::Money, 20.0),
            make_entry(EntryType::Income, SaleChannel::Pdv, PaymentMethod::Money, 15.0),
            make_entry(EntryType::Income, SaleChannel::Pdv, PaymentMethod::Money, 10.0),
            make_entry(EntryType::Income, SaleChannel::Delivery, PaymentMethod::Card, 40.0),
            make_entry(EntryType::Expense, SaleChannel::Manual, PaymentMethod::Money, 5.0),
        ];
        let summary = summarize(&register, &entries);

        // expected drawer = 50 + 45 - 5 = 90
        assert_eq!(summary.expected_balance, 90.0);
        // sales across all channels and methods = 85
        assert_eq!(summary.sales_total, 85.0);
        assert_eq!(summary.income_total, 85.0);
        assert_eq!(summary.expense_total, 5.0);
    }

    #[test]
    fn test_manual_income_is_not_a_sale() {
        let register = make_register(10.0);
        let entries = vec![make_entry(
            EntryType::Income,
            SaleChannel::Manual,
            PaymentMethod::Money,
            25.0,
        )];
        let summary = summarize(&register, &entries);
        assert_eq!(summary.sales_total, 0.0);
        assert_eq!(summary.income_total, 25.0);
        // Manual cash still lands in the drawer
        assert_eq!(summary.expected_balance, 35.0);
    }

    #[test]
    fn test_breakdowns_group_by_method_and_channel() {
        let register = make_register(0.0);
        let entries = vec![
            make_entry(EntryType::Income, SaleChannel::Pdv, PaymentMethod::Money, 10.0),
            make_entry(EntryType::Income, SaleChannel::Pdv, PaymentMethod::Money, 5.0),
            make_entry(EntryType::Income, SaleChannel::Delivery, PaymentMethod::Pix, 8.0),
            make_entry(EntryType::Expense, SaleChannel::Manual, PaymentMethod::Money, 3.0),
        ];
        let summary = summarize(&register, &entries);

        assert_eq!(summary.by_method.len(), 2);
        let money = &summary.by_method[0];
        assert_eq!(money.method, PaymentMethod::Money);
        assert_eq!(money.income, 15.0);
        assert_eq!(money.expense, 3.0);
        assert_eq!(money.count, 3);

        assert_eq!(summary.by_channel.len(), 2);
        assert_eq!(summary.by_channel[0].channel, SaleChannel::Pdv);
        assert_eq!(summary.by_channel[0].income, 15.0);
        assert_eq!(summary.by_channel[1].channel, SaleChannel::Delivery);
        assert_eq!(summary.by_channel[1].income, 8.0);
    }

    #[test]
    fn test_session_amount_validation() {
        assert!(validate_session_amount(100.0, "opening_amount").is_ok());
        assert!(validate_session_amount(0.0, "opening_amount").is_err());
        assert!(validate_session_amount(-1.0, "closing_amount").is_err());
        assert!(validate_session_amount(f64::NAN, "closing_amount").is_err());
    }

    #[test]
    fn test_ensure_open_rejects_closed() {
        let mut register = make_register(50.0);
        assert!(ensure_open(&register).is_ok());

        register.status = RegisterStatus::Closed;
        register.closed_at = Some(1);
        assert!(matches!(
            ensure_open(&register),
            Err(RegisterError::AlreadyClosed)
        ));
    }
}
