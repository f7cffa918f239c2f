use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Transaction, TransactionType};

const PRECISION: u32 = 4;

pub const NO_DATE_RANGE: &str = "No date range available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub total_transactions: usize,
    /// Sum of the outflows, so zero or negative.
    pub total_spent: Decimal,
    pub total_received: Decimal,
    pub average_transaction: Decimal,
    pub date_range: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    /// Magnitude of the month's outflows.
    pub total_spent: Decimal,
    pub total_received: Decimal,
    pub transaction_count: usize,
    pub largest_transaction: Decimal,
    pub most_common_type: TransactionType,
}

/// Everything the display layer needs for one statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub transactions: Vec<Transaction>,
    pub summary: TransactionSummary,
    pub monthly_stats: BTreeMap<String, MonthlyStats>,
}

impl Dashboard {
    pub fn new(transactions: Vec<Transaction>) -> Dashboard {
        let summary = summarize(&transactions);
        let monthly_stats = monthly_breakdown(&transactions);

        Dashboard {
            transactions,
            summary,
            monthly_stats,
        }
    }
}

pub fn summarize(transactions: &[Transaction]) -> TransactionSummary {
    let amounts = || transactions.iter().map(Transaction::amount);

    let total_spent: Decimal = amounts().filter(|amount| *amount < Decimal::ZERO).sum();
    let total_received: Decimal = amounts().filter(|amount| *amount > Decimal::ZERO).sum();

    let average_transaction = if transactions.is_empty() {
        Decimal::ZERO
    } else {
        (amounts().sum::<Decimal>() / Decimal::from(transactions.len())).round_dp(PRECISION)
    };

    TransactionSummary {
        total_transactions: transactions.len(),
        total_spent,
        total_received,
        average_transaction,
        date_range: date_range(transactions),
    }
}

fn date_range(transactions: &[Transaction]) -> String {
    let dates = || transactions.iter().map(Transaction::posting_date);

    match (dates().min(), dates().max()) {
        (Some(first), Some(last)) => format!("{} to {}", first.format("%Y-%m-%d"), last.format("%Y-%m-%d")),
        _ => NO_DATE_RANGE.to_string(),
    }
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Groups transactions by `YYYY-MM` of their posting date.
pub fn monthly_breakdown(transactions: &[Transaction]) -> BTreeMap<String, MonthlyStats> {
    let mut months: BTreeMap<String, MonthAccumulator> = BTreeMap::new();

    for transaction in transactions {
        months
            .entry(month_key(transaction.posting_date()))
            .or_default()
            .add(transaction);
    }

    months
        .into_iter()
        .map(|(key, month)| (key, month.finish()))
        .collect()
}

#[derive(Default)]
struct MonthAccumulator {
    spent: Decimal,
    received: Decimal,
    count: usize,
    largest: Decimal,
    // insertion ordered so ties go to the first type seen
    type_counts: Vec<(TransactionType, usize)>,
}

impl MonthAccumulator {
    fn add(&mut self, transaction: &Transaction) {
        let amount = transaction.amount();

        if amount < Decimal::ZERO {
            self.spent += amount.abs();
        } else {
            self.received += amount;
        }

        self.count += 1;
        self.largest = self.largest.max(amount.abs());

        let transaction_type = transaction.transaction_type();
        match self.type_counts.iter_mut().find(|(seen, _)| *seen == transaction_type) {
            Some((_, count)) => *count += 1,
            None => self.type_counts.push((transaction_type, 1)),
        }
    }

    fn finish(self) -> MonthlyStats {
        let mut most_common: Option<(TransactionType, usize)> = None;
        for (transaction_type, count) in self.type_counts {
            if most_common.map_or(true, |(_, best)| count > best) {
                most_common = Some((transaction_type, count));
            }
        }

        MonthlyStats {
            total_spent: self.spent,
            total_received: self.received,
            transaction_count: self.count,
            largest_transaction: self.largest,
            most_common_type: most_common.map_or(TransactionType::MiscDebit, |(transaction_type, _)| transaction_type),
        }
    }
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod summary_tests;
