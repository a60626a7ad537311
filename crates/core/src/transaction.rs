use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::category::Category;

/// Canonical transaction record emitted by the import/extract pipelines.
///
/// `amount` is signed: negative means money left the account (debit),
/// positive means money came in (credit). Rows that would produce a zero
/// amount are never emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        amount: Decimal,
        description: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            date,
            amount,
            description: description.into(),
            category,
        }
    }

    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn subcategory(&self) -> &'static str {
        self.category.subcategory()
    }
}
