use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use super::*;

fn classify(details: &str, type_code: &str, amount: Decimal) -> TransactionType {
    Classifier::new().classify(&RowSignals {
        details,
        type_code,
        amount,
    })
}

#[test]
fn test_explicit_code_wins_over_keyword() {
    assert_eq!(classify("CREDIT", "ACH_DEBIT", dec!(-10)), TransactionType::AchDebit);
    assert_eq!(classify("DSLIP", "ACH_CREDIT", dec!(10)), TransactionType::AchCredit);
    assert_eq!(classify("DEBIT", "FEE_TRANSACTION", dec!(-12)), TransactionType::FeeTransaction);
    assert_eq!(classify("CREDIT", "MISC_DEBIT", dec!(5)), TransactionType::MiscDebit);
}

#[test]
fn test_every_code_is_recognised() {
    for transaction_type in TransactionType::ALL {
        assert_eq!(classify("", transaction_type.code(), dec!(0)), transaction_type);
    }
}

#[test]
fn test_details_keywords() {
    assert_eq!(classify("DSLIP", "", dec!(250)), TransactionType::CheckDeposit);
    assert_eq!(classify("CREDIT", "QUICKPAY_CREDIT", dec!(40)), TransactionType::AchCredit);
}

#[test]
fn test_type_keywords() {
    assert_eq!(classify("DEBIT", "CHECK_PAID", dec!(-75)), TransactionType::CheckDeposit);
    assert_eq!(classify("DEBIT", "MONTHLY_FEE", dec!(-12)), TransactionType::FeeTransaction);
    assert_eq!(classify("DEBIT", "ACH_DEBIT_RETURN", dec!(-3)), TransactionType::AchDebit);
    assert_eq!(classify("DEBIT", "DEBIT_CARD_REFUND", dec!(3)), TransactionType::DebitCard);
    assert_eq!(classify("", "ATM_DEPOSIT", dec!(60)), TransactionType::Deposit);
}

#[test]
fn test_keyword_wins_over_sign() {
    assert_eq!(classify("DEBIT", "MONTHLY_FEE", dec!(12)), TransactionType::FeeTransaction);
    assert_eq!(classify("DSLIP", "", dec!(-1)), TransactionType::CheckDeposit);
}

#[test]
fn test_sign_tiebreak() {
    assert_eq!(classify("", "", dec!(42.00)), TransactionType::Deposit);
    assert_eq!(classify("", "", dec!(-42.00)), TransactionType::MiscDebit);
}

#[test]
fn test_default_is_misc_debit() {
    assert_eq!(classify("", "", dec!(0)), TransactionType::MiscDebit);
    assert_eq!(classify("DEBIT", "WIRE_OUTGOING", Decimal::ZERO), TransactionType::MiscDebit);
}

#[test]
fn test_type_code_parsing_is_exact() {
    assert_eq!("ACH_CREDIT".parse::<TransactionType>(), Ok(TransactionType::AchCredit));
    assert!("ach_credit".parse::<TransactionType>().is_err());
    assert!("ACH_CREDIT_X".parse::<TransactionType>().is_err());
}
