//! Aggregation of transaction records into the dashboard summary.
//!
//! `summarize` is a pure, single-pass transform. It never fails: parsing happens before it is
//! called, and an empty sequence is a valid input that puts every bucket in the "no transactions"
//! state.
//!
//! Dates are shown on the calendar day they fall on for the viewer. `summarize` uses the local
//! time zone and `summarize_in` takes an explicit one.

use crate::format;
use crate::model::{Amount, Category, TransactionDate, TransactionRecord, TransactionType};
use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;

/// Shown instead of a date when a bucket has no transactions.
pub const NO_TRANSACTIONS: &str = "Não há transações";

/// Which summary card a bucket belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketKind {
    Entries,
    Expenses,
    Total,
}

impl BucketKind {
    /// The card title.
    pub fn title(&self) -> &'static str {
        match self {
            BucketKind::Entries => "Entradas",
            BucketKind::Expenses => "Saídas",
            BucketKind::Total => "Total",
        }
    }
}

/// The aggregate total and most recent date for one summary card.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SummaryBucket {
    kind: BucketKind,
    total_amount: Amount,
    last_transaction_date: Option<TransactionDate>,
    last_transaction_day: Option<NaiveDate>,
}

impl SummaryBucket {
    pub fn kind(&self) -> BucketKind {
        self.kind
    }

    pub fn total_amount(&self) -> Amount {
        self.total_amount
    }

    /// `None` is the explicit "no transactions" state.
    pub fn last_transaction_date(&self) -> Option<&TransactionDate> {
        self.last_transaction_date.as_ref()
    }

    /// The calendar day `last_transaction_date` is shown on.
    pub fn last_transaction_day(&self) -> Option<NaiveDate> {
        self.last_transaction_day
    }

    pub fn has_transactions(&self) -> bool {
        self.last_transaction_date.is_some()
    }

    /// The line shown under the amount on the card.
    pub fn last_transaction_label(&self) -> String {
        let Some(date) = self.last_transaction_day else {
            return NO_TRANSACTIONS.to_string();
        };
        let day = format::day_and_month(date);
        match self.kind {
            BucketKind::Entries => format!("Última entrada dia {day}"),
            BucketKind::Expenses => format!("Última saída dia {day}"),
            BucketKind::Total => format!("01 a {day}"),
        }
    }
}

/// The three summary cards.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Highlights {
    entries: SummaryBucket,
    expenses: SummaryBucket,
    total: SummaryBucket,
}

impl Highlights {
    pub fn entries(&self) -> &SummaryBucket {
        &self.entries
    }

    pub fn expenses(&self) -> &SummaryBucket {
        &self.expenses
    }

    /// Net total. Its amount is always `entries - expenses` and its date is the latest expense.
    pub fn total(&self) -> &SummaryBucket {
        &self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = &SummaryBucket> {
        [&self.entries, &self.expenses, &self.total].into_iter()
    }
}

/// A display-ready projection of a `TransactionRecord`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct FormattedTransaction {
    id: String,
    name: String,
    amount: String,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    category: Category,
    date: String,
}

impl FormattedTransaction {
    fn new<Tz: TimeZone>(record: &TransactionRecord, tz: &Tz) -> Self {
        Self {
            id: record.id().to_string(),
            name: record.name().to_string(),
            amount: record.amount().to_string(),
            transaction_type: record.transaction_type(),
            category: record.category().clone(),
            date: format::short_date(record.date().date_in(tz)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// e.g. `R$ 1.234,56`
    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// e.g. `05/01/23`
    pub fn date(&self) -> &str {
        &self.date
    }
}

/// Everything the dashboard needs to render.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Summary {
    transactions: Vec<FormattedTransaction>,
    highlights: Highlights,
}

impl Summary {
    /// Same order and length as the records that were summarized.
    pub fn transactions(&self) -> &[FormattedTransaction] {
        &self.transactions
    }

    pub fn highlights(&self) -> &Highlights {
        &self.highlights
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Running totals for one type partition.
#[derive(Default)]
struct Partition {
    total: Amount,
    last: Option<TransactionDate>,
}

impl Partition {
    fn add(&mut self, record: &TransactionRecord) {
        self.total = self.total + record.amount();
        let date = record.date();
        if self.last.as_ref().map_or(true, |last| date > last) {
            self.last = Some(date.clone());
        }
    }

    fn into_bucket<Tz: TimeZone>(self, kind: BucketKind, tz: &Tz) -> SummaryBucket {
        bucket(kind, self.total, self.last, tz)
    }
}

fn bucket<Tz: TimeZone>(
    kind: BucketKind,
    total_amount: Amount,
    last_transaction_date: Option<TransactionDate>,
    tz: &Tz,
) -> SummaryBucket {
    SummaryBucket {
        kind,
        total_amount,
        last_transaction_day: last_transaction_date.as_ref().map(|d| d.date_in(tz)),
        last_transaction_date,
    }
}

/// Summarizes `records` into display-ready transactions and the three summary buckets, showing
/// dates in the local time zone.
///
/// Every record lands in exactly one of the entries or expenses partitions according to its type.
pub fn summarize(records: &[TransactionRecord]) -> Summary {
    summarize_in(records, &Local)
}

/// Like `summarize`, with dates shown in `tz`.
pub fn summarize_in<Tz: TimeZone>(records: &[TransactionRecord], tz: &Tz) -> Summary {
    let mut entries = Partition::default();
    let mut expenses = Partition::default();

    let transactions: Vec<FormattedTransaction> = records
        .iter()
        .map(|record| {
            match record.transaction_type() {
                TransactionType::Positive => entries.add(record),
                TransactionType::Negative => expenses.add(record),
            }
            FormattedTransaction::new(record, tz)
        })
        .collect();

    let total = bucket(
        BucketKind::Total,
        entries.total - expenses.total,
        expenses.last.clone(),
        tz,
    );

    Summary {
        transactions,
        highlights: Highlights {
            entries: entries.into_bucket(BucketKind::Entries, tz),
            expenses: expenses.into_bucket(BucketKind::Expenses, tz),
            total,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn record(id: &str, ty: TransactionType, amount: &str, date: &str) -> TransactionRecord {
        TransactionRecord::new(
            id,
            format!("Transaction {id}"),
            Amount::from_str(amount).unwrap(),
            ty,
            Category::new("Casa", "home"),
            TransactionDate::from_str(date).unwrap(),
        )
    }

    fn sample() -> Vec<TransactionRecord> {
        vec![
            record("1", TransactionType::Positive, "100", "2023-01-05"),
            record("2", TransactionType::Negative, "40", "2023-01-10"),
        ]
    }

    #[test]
    fn test_example_totals() {
        let summary = summarize(&sample());
        let h = summary.highlights();
        assert_eq!(h.entries().total_amount().value(), dec!(100));
        assert_eq!(h.expenses().total_amount().value(), dec!(40));
        assert_eq!(h.total().total_amount().value(), dec!(60));
        assert_eq!(
            h.expenses().last_transaction_date().unwrap(),
            &TransactionDate::from_str("2023-01-10").unwrap()
        );
        assert_eq!(
            h.entries().last_transaction_date().unwrap(),
            &TransactionDate::from_str("2023-01-05").unwrap()
        );
    }

    #[test]
    fn test_example_labels() {
        let summary = summarize(&sample());
        let h = summary.highlights();
        assert_eq!(h.entries().total_amount().to_string(), "R$ 100,00");
        assert_eq!(
            h.entries().last_transaction_label(),
            "Última entrada dia 5 de janeiro"
        );
        assert_eq!(
            h.expenses().last_transaction_label(),
            "Última saída dia 10 de janeiro"
        );
        assert_eq!(h.total().last_transaction_label(), "01 a 10 de janeiro");
        assert_eq!(h.total().total_amount().to_string(), "R$ 60,00");
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize(&[]);
        assert!(summary.is_empty());
        for bucket in summary.highlights().iter() {
            assert!(!bucket.has_transactions());
            assert!(bucket.total_amount().is_zero());
            assert_eq!(bucket.last_transaction_label(), NO_TRANSACTIONS);
        }
    }

    #[test]
    fn test_only_entries_total_has_no_interval() {
        let records = vec![record("1", TransactionType::Positive, "10", "2023-05-01")];
        let summary = summarize(&records);
        let h = summary.highlights();
        assert!(h.entries().has_transactions());
        assert!(!h.expenses().has_transactions());
        assert_eq!(h.total().last_transaction_label(), NO_TRANSACTIONS);
        assert_eq!(h.total().total_amount().value(), dec!(10));
    }

    #[test]
    fn test_negative_net_total() {
        let records = vec![
            record("1", TransactionType::Positive, "10", "2023-05-01"),
            record("2", TransactionType::Negative, "25.50", "2023-05-02"),
        ];
        let summary = summarize(&records);
        assert_eq!(
            summary.highlights().total().total_amount().to_string(),
            "-R$ 15,50"
        );
    }

    #[test]
    fn test_total_identity_holds_exactly() {
        let records = vec![
            record("1", TransactionType::Positive, "0.1", "2023-05-01"),
            record("2", TransactionType::Positive, "0.2", "2023-05-02"),
            record("3", TransactionType::Negative, "0.3", "2023-05-03"),
            record("4", TransactionType::Negative, "1234567.891", "2023-05-04"),
        ];
        let h = summarize(&records).highlights().clone();
        assert_eq!(
            h.entries().total_amount().value() + -h.expenses().total_amount().value(),
            h.total().total_amount().value()
        );
        assert_eq!(h.entries().total_amount().value(), dec!(0.3));
    }

    #[test]
    fn test_last_date_compares_timestamps() {
        let records = vec![
            record("1", TransactionType::Negative, "1", "2023-01-10T09:00:00-03:00"),
            record("2", TransactionType::Negative, "1", "2023-01-10T11:00:00Z"),
        ];
        let summary = summarize(&records);
        // 09:00 at -03:00 is 12:00 UTC, which is later than 11:00 UTC.
        assert_eq!(
            summary
                .highlights()
                .expenses()
                .last_transaction_date()
                .unwrap()
                .as_str(),
            "2023-01-10T09:00:00-03:00"
        );
    }

    #[test]
    fn test_latest_date_need_not_be_last_record() {
        let records = vec![
            record("1", TransactionType::Positive, "1", "2023-03-20"),
            record("2", TransactionType::Positive, "1", "2023-01-02"),
        ];
        let summary = summarize(&records);
        assert_eq!(
            summary.highlights().entries().last_transaction_label(),
            "Última entrada dia 20 de março"
        );
    }

    #[test]
    fn test_order_and_length_preserved() {
        let records = vec![
            record("c", TransactionType::Negative, "3", "2023-01-03"),
            record("a", TransactionType::Positive, "1", "2023-01-01"),
            record("b", TransactionType::Negative, "2", "2023-01-02"),
        ];
        let summary = summarize(&records);
        let ids: Vec<&str> = summary.transactions().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_formatted_transaction_fields() {
        let summary = summarize(&sample());
        let t = &summary.transactions()[1];
        assert_eq!(t.id(), "2");
        assert_eq!(t.name(), "Transaction 2");
        assert_eq!(t.amount(), "R$ 40,00");
        assert_eq!(t.date(), "10/01/23");
        assert_eq!(t.transaction_type(), TransactionType::Negative);
        assert_eq!(t.category().name(), "Casa");
    }

    #[test]
    fn test_partition_is_total() {
        let records = vec![
            record("1", TransactionType::Positive, "5", "2023-01-01"),
            record("2", TransactionType::Negative, "7", "2023-01-02"),
            record("3", TransactionType::Positive, "11", "2023-01-03"),
        ];
        let h = summarize(&records).highlights().clone();
        let all: Amount = records.iter().map(|r| r.amount()).collect::<Vec<_>>().iter().sum();
        assert_eq!(
            h.entries().total_amount() + h.expenses().total_amount(),
            all
        );
    }

    #[test]
    fn test_late_evening_expense_keeps_viewer_day() {
        // 22:00 in Brasília, stored as UTC the way `register` writes it.
        let records = vec![
            record("1", TransactionType::Positive, "100", "2023-01-05"),
            record("2", TransactionType::Negative, "40", "2023-01-11T01:00:00.000Z"),
        ];
        let brasilia = FixedOffset::west_opt(3 * 3600).unwrap();
        let summary = summarize_in(&records, &brasilia);
        let h = summary.highlights();
        assert_eq!(summary.transactions()[1].date(), "10/01/23");
        assert_eq!(summary.transactions()[0].date(), "05/01/23");
        assert_eq!(
            h.expenses().last_transaction_label(),
            "Última saída dia 10 de janeiro"
        );
        assert_eq!(h.total().last_transaction_label(), "01 a 10 de janeiro");

        let utc = summarize_in(&records, &Utc);
        assert_eq!(utc.transactions()[1].date(), "11/01/23");
        assert_eq!(utc.transactions()[0].date(), "05/01/23");
    }

    #[test]
    fn test_amounts_at_limit_sum_without_overflow() {
        let records = vec![
            record("1", TransactionType::Positive, "1000000000000000", "2023-01-01"),
            record("2", TransactionType::Positive, "1000000000000000", "2023-01-02"),
            record("3", TransactionType::Negative, "1000000000000000", "2023-01-03"),
        ];
        let h = summarize(&records).highlights().clone();
        assert_eq!(h.entries().total_amount().value(), dec!(2000000000000000));
        assert_eq!(h.total().total_amount().value(), dec!(1000000000000000));
    }

    #[test]
    fn test_idempotent() {
        let records = sample();
        assert_eq!(summarize(&records), summarize(&records));
    }
}
