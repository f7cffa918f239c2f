use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use getset::{CopyGetters, Getters};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod amount;
pub mod classifier;
pub mod summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    DebitCard,
    AchCredit,
    AchDebit,
    FeeTransaction,
    CheckDeposit,
    MiscDebit,
    Deposit,
}

impl TransactionType {
    pub const ALL: [TransactionType; 7] = [
        TransactionType::DebitCard,
        TransactionType::AchCredit,
        TransactionType::AchDebit,
        TransactionType::FeeTransaction,
        TransactionType::CheckDeposit,
        TransactionType::MiscDebit,
        TransactionType::Deposit,
    ];

    /// Type code as it appears in bank exports.
    pub fn code(&self) -> &'static str {
        match self {
            TransactionType::DebitCard => "DEBIT_CARD",
            TransactionType::AchCredit => "ACH_CREDIT",
            TransactionType::AchDebit => "ACH_DEBIT",
            TransactionType::FeeTransaction => "FEE_TRANSACTION",
            TransactionType::CheckDeposit => "CHECK_DEPOSIT",
            TransactionType::MiscDebit => "MISC_DEBIT",
            TransactionType::Deposit => "DEPOSIT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, PartialEq, Error)]
#[error("unknown transaction type code `{0}`")]
pub struct UnknownTransactionType(pub String);

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    /// Only exact codes are accepted, partial matches are left to the keyword rules.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|transaction_type| transaction_type.code() == code)
            .ok_or_else(|| UnknownTransactionType(code.to_string()))
    }
}

/// Canonical record built from one statement row. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct Transaction {
    #[getset(get = "pub")]
    details: String,
    #[getset(get_copy = "pub")]
    posting_date: NaiveDate,
    #[getset(get = "pub")]
    description: String,
    #[getset(get_copy = "pub")]
    amount: Decimal,
    #[getset(get_copy = "pub")]
    transaction_type: TransactionType,
    #[getset(get_copy = "pub")]
    balance: Decimal,
    #[getset(get = "pub")]
    check_number: Option<String>,
}

impl Transaction {
    pub fn new(
        details: String,
        posting_date: NaiveDate,
        description: String,
        amount: Decimal,
        transaction_type: TransactionType,
        balance: Decimal,
        check_number: Option<String>,
    ) -> Transaction {
        Transaction {
            details,
            posting_date,
            description,
            amount,
            transaction_type,
            balance,
            check_number,
        }
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum RowErrorKind {
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error("unparseable posting date `{0}`")]
    InvalidDate(String),
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// A statement row that was excluded from the output.
#[derive(Debug, PartialEq, Error)]
#[error("row {row}: {kind}")]
pub struct RowParseError {
    pub row: usize,
    pub raw: Vec<String>,
    pub kind: RowErrorKind,
}
