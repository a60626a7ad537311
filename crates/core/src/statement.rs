use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::bank::BankInfo;
use crate::transaction::Transaction;

/// The result of processing one uploaded statement end-to-end. Consumed by
/// the external aggregation/reporting layer; nothing is persisted.
#[derive(Debug, Clone)]
pub struct StatementResult {
    pub transactions: Vec<Transaction>,
    pub bank_info: BankInfo,
    pub total_rows: usize,
    pub processing_mode: String,
}

impl StatementResult {
    pub fn new(
        transactions: Vec<Transaction>,
        bank_info: BankInfo,
        processing_mode: impl Into<String>,
    ) -> Self {
        let total_rows = transactions.len();
        Self {
            transactions,
            bank_info,
            total_rows,
            processing_mode: processing_mode.into(),
        }
    }

    /// Wire-format view: amounts as plain numbers, categories as their
    /// human labels, derived subcategory filled in.
    pub fn report(&self) -> StatementReport {
        StatementReport {
            transactions: self.transactions.iter().map(TransactionRecord::from).collect(),
            bank_info: self.bank_info.clone(),
            total_rows: self.total_rows,
            processing_mode: self.processing_mode.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatementReport {
    pub transactions: Vec<TransactionRecord>,
    pub bank_info: BankInfo,
    pub total_rows: usize,
    pub processing_mode: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub date: String,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub subcategory: String,
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            date: tx.date.format("%Y-%m-%d").to_string(),
            amount: tx.amount.to_f64().unwrap_or(0.0),
            description: tx.description.clone(),
            category: tx.category.to_string(),
            subcategory: tx.subcategory().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn tx(amount: &str, category: Category) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            Decimal::from_str(amount).unwrap(),
            "CARREFOUR MALL",
            category,
        )
    }

    #[test]
    fn total_rows_matches_transaction_count() {
        let result = StatementResult::new(
            vec![tx("-50", Category::FoodAndDining), tx("5000", Category::Income)],
            BankInfo::default(),
            "test",
        );
        assert_eq!(result.total_rows, 2);
    }

    #[test]
    fn report_serializes_amounts_as_numbers() {
        let result = StatementResult::new(
            vec![tx("-50.25", Category::FoodAndDining)],
            BankInfo::default(),
            "test",
        );
        let json = serde_json::to_value(result.report()).unwrap();
        assert_eq!(json["transactions"][0]["amount"], serde_json::json!(-50.25));
        assert_eq!(json["transactions"][0]["date"], "2024-02-01");
        assert_eq!(json["transactions"][0]["category"], "Food & Dining");
        assert_eq!(json["transactions"][0]["subcategory"], "Food");
        assert_eq!(json["total_rows"], 1);
    }

    #[test]
    fn report_includes_bank_info() {
        let mut info = BankInfo::default();
        info.bank_name = "Emirates NBD".to_string();
        let result = StatementResult::new(vec![], info, "test");
        let json = serde_json::to_value(result.report()).unwrap();
        assert_eq!(json["bank_info"]["bank_name"], "Emirates NBD");
        assert_eq!(json["bank_info"]["account_number"], "XXXX-XXXX-XXXX");
    }
}
