use enum_dispatch::enum_dispatch;
use rust_decimal::Decimal;

use super::TransactionType;

/// Raw row text the rules look at. `details` and `type_code` are expected uppercased.
#[derive(Debug, Clone, Copy)]
pub struct RowSignals<'a> {
    pub details: &'a str,
    pub type_code: &'a str,
    pub amount: Decimal,
}

#[enum_dispatch]
pub trait ClassificationRule {
    fn classify(&self, signals: &RowSignals) -> Option<TransactionType>;
}

#[enum_dispatch(ClassificationRule)]
#[derive(Debug, Clone)]
pub enum Rule {
    ExplicitCode,
    Keyword,
    AmountSign,
}

/// `Type` holds one of the known codes verbatim.
#[derive(Debug, Clone)]
pub struct ExplicitCode;

impl ClassificationRule for ExplicitCode {
    fn classify(&self, signals: &RowSignals) -> Option<TransactionType> {
        signals.type_code.parse().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeywordField {
    Details,
    Type,
}

/// Substring match against one of the text columns.
#[derive(Debug, Clone)]
pub struct Keyword {
    field: KeywordField,
    keyword: &'static str,
    transaction_type: TransactionType,
}

impl Keyword {
    pub const fn new(field: KeywordField, keyword: &'static str, transaction_type: TransactionType) -> Keyword {
        Keyword {
            field,
            keyword,
            transaction_type,
        }
    }
}

impl ClassificationRule for Keyword {
    fn classify(&self, signals: &RowSignals) -> Option<TransactionType> {
        let text = match self.field {
            KeywordField::Details => signals.details,
            KeywordField::Type => signals.type_code,
        };

        text.contains(self.keyword).then_some(self.transaction_type)
    }
}

/// Last resort: inflows are deposits, outflows are misc debits, zero says nothing.
#[derive(Debug, Clone)]
pub struct AmountSign;

impl ClassificationRule for AmountSign {
    fn classify(&self, signals: &RowSignals) -> Option<TransactionType> {
        if signals.amount > Decimal::ZERO {
            Some(TransactionType::Deposit)
        } else if signals.amount < Decimal::ZERO {
            Some(TransactionType::MiscDebit)
        } else {
            None
        }
    }
}

// Checked in order, first match wins.
const KEYWORDS: [Keyword; 8] = [
    Keyword::new(KeywordField::Details, "CREDIT", TransactionType::AchCredit),
    Keyword::new(KeywordField::Type, "ACH_CREDIT", TransactionType::AchCredit),
    Keyword::new(KeywordField::Details, "DSLIP", TransactionType::CheckDeposit),
    Keyword::new(KeywordField::Type, "CHECK", TransactionType::CheckDeposit),
    Keyword::new(KeywordField::Type, "FEE", TransactionType::FeeTransaction),
    Keyword::new(KeywordField::Type, "ACH_DEBIT", TransactionType::AchDebit),
    Keyword::new(KeywordField::Type, "DEBIT_CARD", TransactionType::DebitCard),
    Keyword::new(KeywordField::Type, "DEPOSIT", TransactionType::Deposit),
];

/// Resolves every row to exactly one [`TransactionType`].
///
/// Precedence is fixed: explicit type code, then keywords, then the sign of
/// the amount, then [`TransactionType::MiscDebit`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        let mut rules: Vec<Rule> = vec![ExplicitCode.into()];
        rules.extend(KEYWORDS.into_iter().map(Rule::from));
        rules.push(AmountSign.into());

        Classifier { rules }
    }
}

impl Classifier {
    pub fn new() -> Classifier {
        Classifier::default()
    }

    pub fn classify(&self, signals: &RowSignals) -> TransactionType {
        self.rules
            .iter()
            .find_map(|rule| rule.classify(signals))
            .unwrap_or(TransactionType::MiscDebit)
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod classifier_tests;
