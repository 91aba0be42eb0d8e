//! Daily/Monthly Rollup Aggregator
//!
//! Folds sale records (delivery + PDV orders, closed table sales) into
//! report rows. The fold is pure: running it twice over the same records
//! yields identical totals. Cancelled orders and open table sales must be
//! excluded by the source query, not filtered here — the reporting service
//! owns that contract.

use rust_decimal::prelude::*;
use shared::models::{
    ChannelSummary, DailyReport, MonthlyReport, PaymentBreakdown, PaymentMethod, SaleChannel,
};

use crate::money::{DECIMAL_PLACES, to_decimal, to_f64};

/// One finalized transaction, normalized across channels.
///
/// This is the unified `Sale` shape the legacy system lacked — channel is
/// an explicit discriminant, never parsed out of a description.
#[derive(Debug, Clone)]
pub struct SaleRecord {
    pub channel: SaleChannel,
    pub payment_method: PaymentMethod,
    /// Final charged amount
    pub amount: f64,
    pub delivery_fee: f64,
    pub discount: f64,
    pub cashback_applied: f64,
    pub cashback_earned: f64,
    /// Business date (YYYY-MM-DD) the transaction belongs to
    pub business_date: String,
}

const CHANNEL_ORDER: [SaleChannel; 3] = [
    SaleChannel::Pdv,
    SaleChannel::Delivery,
    SaleChannel::Table,
];

const METHOD_ORDER: [PaymentMethod; 5] = [
    PaymentMethod::Money,
    PaymentMethod::Pix,
    PaymentMethod::Card,
    PaymentMethod::CreditCard,
    PaymentMethod::DebitCard,
];

/// Ticket average: total / count, zero when there were no transactions.
pub fn ticket_average(total: f64, count: i32) -> f64 {
    if count <= 0 {
        return 0.0;
    }
    to_f64(
        (to_decimal(total) / Decimal::from(count))
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero),
    )
}

/// Fold a day's records into the persisted daily report.
///
/// The caller assigns the row ID before insertion; regeneration for the
/// same date replaces the stored row.
pub fn fold_daily(
    store_id: &str,
    business_date: &str,
    records: &[SaleRecord],
    generated_at: i64,
    note: Option<String>,
) -> DailyReport {
    let mut gross = Decimal::ZERO;
    let mut fees = Decimal::ZERO;
    let mut discounts = Decimal::ZERO;
    let mut redeemed = Decimal::ZERO;
    let mut earned = Decimal::ZERO;
    let mut delivery_orders = 0;
    let mut pdv_orders = 0;
    let mut table_sales = 0;

    for record in records {
        gross += to_decimal(record.amount);
        fees += to_decimal(record.delivery_fee);
        discounts += to_decimal(record.discount);
        redeemed += to_decimal(record.cashback_applied);
        earned += to_decimal(record.cashback_earned);
        match record.channel {
            SaleChannel::Delivery => delivery_orders += 1,
            SaleChannel::Pdv => pdv_orders += 1,
            SaleChannel::Table => table_sales += 1,
            SaleChannel::Manual => {}
        }
    }

    let total_transactions = records.len() as i32;
    let gross_sales = to_f64(gross);

    DailyReport {
        id: 0,
        store_id: store_id.to_string(),
        business_date: business_date.to_string(),
        total_transactions,
        delivery_orders,
        pdv_orders,
        table_sales,
        gross_sales,
        delivery_fees: to_f64(fees),
        discounts: to_f64(discounts),
        cashback_redeemed: to_f64(redeemed),
        cashback_earned: to_f64(earned),
        ticket_average: ticket_average(gross_sales, total_transactions),
        channel_breakdowns: channel_summaries(records),
        payment_breakdowns: payment_summaries(records),
        generated_at,
        note,
    }
}

/// Fold a month's records into the on-demand monthly view.
pub fn fold_monthly(store_id: &str, month: &str, records: &[SaleRecord]) -> MonthlyReport {
    let mut gross = Decimal::ZERO;
    let mut dates: Vec<&str> = Vec::new();

    for record in records {
        gross += to_decimal(record.amount);
        if !dates.contains(&record.business_date.as_str()) {
            dates.push(&record.business_date);
        }
    }

    let total_transactions = records.len() as i32;
    let gross_sales = to_f64(gross);

    MonthlyReport {
        store_id: store_id.to_string(),
        month: month.to_string(),
        active_days: dates.len() as i32,
        total_transactions,
        gross_sales,
        ticket_average: ticket_average(gross_sales, total_transactions),
        channel_breakdowns: channel_summaries(records),
        payment_breakdowns: payment_summaries(records),
    }
}

/// Per-channel totals with the share of the overall transaction count.
fn channel_summaries(records: &[SaleRecord]) -> Vec<ChannelSummary> {
    let total_count = records.len() as i32;
    CHANNEL_ORDER
        .iter()
        .filter_map(|&channel| {
            let mut total = Decimal::ZERO;
            let mut count = 0;
            for record in records.iter().filter(|r| r.channel == channel) {
                total += to_decimal(record.amount);
                count += 1;
            }
            if count == 0 {
                return None;
            }
            let percentage = if total_count > 0 {
                to_f64(
                    (Decimal::from(count) * Decimal::ONE_HUNDRED / Decimal::from(total_count))
                        .round_dp(DECIMAL_PLACES),
                )
            } else {
                0.0
            };
            Some(ChannelSummary {
                channel,
                total: to_f64(total),
                count,
                percentage,
            })
        })
        .collect()
}

fn payment_summaries(records: &[SaleRecord]) -> Vec<PaymentBreakdown> {
    METHOD_ORDER
        .iter()
        .filter_map(|&method| {
            let mut total = Decimal::ZERO;
            let mut count = 0;
            for record in records.iter().filter(|r| r.payment_method == method) {
                total += to_decimal(record.amount);
                count += 1;
            }
            (count > 0).then(|| PaymentBreakdown {
                method,
                total: to_f64(total),
                count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(channel: SaleChannel, method: PaymentMethod, amount: f64) -> SaleRecord {
        SaleRecord {
            channel,
            payment_method: method,
            amount,
            delivery_fee: 0.0,
            discount: 0.0,
            cashback_applied: 0.0,
            cashback_earned: 0.0,
            business_date: "2026-08-07".to_string(),
        }
    }

    #[test]
    fn test_empty_day_has_zero_ticket_average() {
        let report = fold_daily("loja-1", "2026-08-07", &[], 0, None);
        assert_eq!(report.total_transactions, 0);
        assert_eq!(report.gross_sales, 0.0);
        assert_eq!(report.ticket_average, 0.0);
        assert!(report.channel_breakdowns.is_empty());
    }

    #[test]
    fn test_daily_fold_totals_and_counts() {
        let records = vec![
            make_record(SaleChannel::Pdv, PaymentMethod::Money, 20.0),
            make_record(SaleChannel::Pdv, PaymentMethod::Money, 15.0),
            make_record(SaleChannel::Delivery, PaymentMethod::Card, 40.0),
            make_record(SaleChannel::Table, PaymentMethod::Pix, 25.0),
        ];
        let report = fold_daily("loja-1", "2026-08-07", &records, 123, None);

        assert_eq!(report.total_transactions, 4);
        assert_eq!(report.pdv_orders, 2);
        assert_eq!(report.delivery_orders, 1);
        assert_eq!(report.table_sales, 1);
        assert_eq!(report.gross_sales, 100.0);
        assert_eq!(report.ticket_average, 25.0);
    }

    #[test]
    fn test_channel_percentages() {
        let records = vec![
            make_record(SaleChannel::Pdv, PaymentMethod::Money, 10.0),
            make_record(SaleChannel::Pdv, PaymentMethod::Money, 10.0),
            make_record(SaleChannel::Pdv, PaymentMethod::Money, 10.0),
            make_record(SaleChannel::Delivery, PaymentMethod::Card, 10.0),
        ];
        let report = fold_daily("loja-1", "2026-08-07", &records, 0, None);

        let pdv = &report.channel_breakdowns[0];
        assert_eq!(pdv.channel, SaleChannel::Pdv);
        assert_eq!(pdv.count, 3);
        assert_eq!(pdv.percentage, 75.0);

        let delivery = &report.channel_breakdowns[1];
        assert_eq!(delivery.percentage, 25.0);
    }

    #[test]
    fn test_fold_is_idempotent() {
        // Same inputs -> identical totals; the fold never accumulates.
        let records = vec![
            make_record(SaleChannel::Pdv, PaymentMethod::Money, 17.9),
            make_record(SaleChannel::Delivery, PaymentMethod::Pix, 33.33),
        ];
        let a = fold_daily("loja-1", "2026-08-07", &records, 0, None);
        let b = fold_daily("loja-1", "2026-08-07", &records, 0, None);
        assert_eq!(a.gross_sales, b.gross_sales);
        assert_eq!(a.total_transactions, b.total_transactions);
        assert_eq!(a.ticket_average, b.ticket_average);
        assert_eq!(a.channel_breakdowns.len(), b.channel_breakdowns.len());
    }

    #[test]
    fn test_monthly_fold_counts_active_days() {
        let mut r1 = make_record(SaleChannel::Pdv, PaymentMethod::Money, 10.0);
        r1.business_date = "2026-08-01".to_string();
        let mut r2 = make_record(SaleChannel::Pdv, PaymentMethod::Money, 20.0);
        r2.business_date = "2026-08-01".to_string();
        let mut r3 = make_record(SaleChannel::Delivery, PaymentMethod::Card, 30.0);
        r3.business_date = "2026-08-02".to_string();

        let report = fold_monthly("loja-1", "2026-08", &[r1, r2, r3]);
        assert_eq!(report.active_days, 2);
        assert_eq!(report.total_transactions, 3);
        assert_eq!(report.gross_sales, 60.0);
        assert_eq!(report.ticket_average, 20.0);
    }

    #[test]
    fn test_cashback_and_fee_columns_accumulate() {
        let mut record = make_record(SaleChannel::Delivery, PaymentMethod::Money, 95.0);
        record.delivery_fee = 5.0;
        record.cashback_applied = 10.0;
        record.cashback_earned = 4.75;

        let report = fold_daily("loja-1", "2026-08-07", &[record], 0, None);
        assert_eq!(report.delivery_fees, 5.0);
        assert_eq!(report.cashback_redeemed, 10.0);
        assert_eq!(report.cashback_earned, 4.75);
    }
}
