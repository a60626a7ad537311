use ledgerlens_classify::{BatchCategorizer, LanguageModel, RuleSet};
use ledgerlens_core::{
    date, detect_bank, mask_account_number, BankInfo, StatementResult, Transaction,
};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::ai::{ai_extract, ExtractedStatement, RawBankInfo};
use crate::backend::{PdfBackend, PdfError};
use crate::scan::fallback_extract;

pub const PROCESSING_MODE: &str = "AI-powered PDF processing";

/// How much leading text is probed for bank registry patterns.
const BANK_PROBE_CHARS: usize = 2000;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Backend(#[from] PdfError),
    #[error("Could not extract any text or tables from the PDF — it may be encrypted or image-based")]
    NothingExtracted,
    #[error("No transactions could be extracted from the PDF")]
    NoTransactions,
}

/// PDF statement pipeline: backend extraction, model extraction with a
/// deterministic line-scan fallback, canonicalization, registry enrichment,
/// then the usual batched recategorization. Degraded extraction is success
/// with reduced fidelity, never an error.
pub fn process_pdf(
    bytes: &[u8],
    backend: &dyn PdfBackend,
    rules: &RuleSet,
    model: Option<&dyn LanguageModel>,
) -> Result<StatementResult, ExtractError> {
    let content = backend.extract(bytes)?;
    if content.is_empty() {
        return Err(ExtractError::NothingExtracted);
    }
    info!(
        text_chars = content.text.len(),
        tables = content.tables.len(),
        "PDF content extracted"
    );

    let extracted = match model {
        Some(model) => match ai_extract(model, &content) {
            Ok(extracted) => extracted,
            Err(err) => {
                warn!(%err, "model extraction unusable; falling back to line scan");
                fallback_extract(&content.text)
            }
        },
        None => fallback_extract(&content.text),
    };

    let bank_info = resolve_bank_info(extracted.bank_info.as_ref(), &content.text);
    let mut transactions = canonicalize(&extracted, rules);
    if transactions.is_empty() {
        return Err(ExtractError::NoTransactions);
    }

    if let Some(model) = model {
        BatchCategorizer::new(model).recategorize(&mut transactions);
    }

    Ok(StatementResult::new(transactions, bank_info, PROCESSING_MODE))
}

/// Raw extracted rows → canonical transactions: dates normalized, zero
/// amounts dropped, blank descriptions synthesized, rule category assigned.
fn canonicalize(extracted: &ExtractedStatement, rules: &RuleSet) -> Vec<Transaction> {
    let mut transactions = Vec::with_capacity(extracted.transactions.len());
    for raw in &extracted.transactions {
        if raw.amount == Decimal::ZERO {
            continue;
        }
        let description = {
            let trimmed = raw.description.trim();
            if trimmed.is_empty() {
                format!("Transaction {}", transactions.len() + 1)
            } else {
                trimmed.to_string()
            }
        };
        let category = rules.categorize(&description);
        transactions.push(Transaction::new(
            date::normalize(&raw.date),
            raw.amount,
            description,
            category,
        ));
    }
    transactions
}

/// Merge model-reported bank metadata with registry enrichment. The account
/// number only ever surfaces masked; anything not real-looking keeps the
/// placeholder.
fn resolve_bank_info(raw: Option<&RawBankInfo>, text: &str) -> BankInfo {
    let mut info = BankInfo::default();

    if let Some(raw) = raw {
        if let Some(name) = nonempty(&raw.bank_name) {
            info.bank_name = name.to_string();
        }
        if let Some(holder) = nonempty(&raw.account_holder) {
            info.account_holder = holder.to_string();
        }
        if let Some(number) = nonempty(&raw.account_number) {
            if let Some(masked) = mask_account_number(number) {
                info.account_number = masked;
            }
        }
        if let Some(currency) = nonempty(&raw.currency) {
            info.currency = currency.to_string();
        }
    }

    let probe: String = text.chars().take(BANK_PROBE_CHARS).collect();
    if let Some(entry) = detect_bank(&info.bank_name).or_else(|| detect_bank(&probe)) {
        info.apply_registry(entry);
    }

    info
}

fn nonempty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("unknown"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockPdfBackend;
    use chrono::NaiveDate;
    use ledgerlens_classify::MockModel;
    use ledgerlens_core::Category;

    fn rules() -> &'static RuleSet {
        RuleSet::builtin()
    }

    const STATEMENT_TEXT: &str = "\
EMIRATES NBD BANK STATEMENT
01/02/2024  CARREFOUR HYPERMARKET  150.50
02/02/2024  SALARY CREDIT WPS  5000.00
";

    fn extraction_reply() -> String {
        r#"{
            "bank_info": {
                "bank_name": "Emirates NBD",
                "account_holder": "John Smith",
                "account_number": "1234567890123",
                "currency": "AED"
            },
            "transactions": [
                {"date": "01/02/2024", "description": "CARREFOUR HYPERMARKET", "amount": -150.50},
                {"date": "02/02/2024", "description": "SALARY CREDIT", "amount": 5000.00}
            ]
        }"#
        .to_string()
    }

    #[test]
    fn model_path_builds_canonical_statement() {
        let backend = MockPdfBackend::new(STATEMENT_TEXT);
        // One scripted reply for extraction, one for recategorization.
        let model = MockModel::scripted(vec![
            Ok(extraction_reply()),
            Ok(r#"["Food & Dining", "Income"]"#.to_string()),
        ]);

        let result = process_pdf(b"pdf bytes", &backend, rules(), Some(&model)).unwrap();

        assert_eq!(result.total_rows, 2);
        assert_eq!(result.processing_mode, PROCESSING_MODE);

        assert_eq!(
            result.transactions[0].date,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert!(result.transactions[0].is_debit());
        assert_eq!(result.transactions[0].category, Category::FoodAndDining);
        assert_eq!(result.transactions[1].category, Category::Income);

        assert_eq!(result.bank_info.bank_name, "Emirates NBD");
        assert_eq!(result.bank_info.currency, "AED");
        assert_eq!(result.bank_info.account_holder, "John Smith");
        assert_eq!(result.bank_info.account_number, "1234-****-0123");
    }

    #[test]
    fn unusable_model_reply_falls_back_to_line_scan() {
        let backend = MockPdfBackend::new(STATEMENT_TEXT);
        let model = MockModel::failing();

        let result = process_pdf(b"pdf bytes", &backend, rules(), Some(&model)).unwrap();

        // The line scanner recovered the transaction rows.
        assert_eq!(result.total_rows, 2);
        // Bank identity comes from the registry probe over the raw text.
        assert_eq!(result.bank_info.bank_name, "Emirates NBD");
        assert_eq!(result.bank_info.currency, "AED");
        // No model categorization happened — rules only.
        assert_eq!(result.transactions[0].category, Category::FoodAndDining);
    }

    #[test]
    fn no_model_goes_straight_to_line_scan() {
        let backend = MockPdfBackend::new(STATEMENT_TEXT);
        let result = process_pdf(b"pdf bytes", &backend, rules(), None).unwrap();
        assert_eq!(result.total_rows, 2);
    }

    #[test]
    fn empty_content_is_fatal() {
        let backend = MockPdfBackend::new("");
        assert!(matches!(
            process_pdf(b"pdf bytes", &backend, rules(), None),
            Err(ExtractError::NothingExtracted)
        ));
    }

    #[test]
    fn text_without_transactions_is_fatal() {
        let backend = MockPdfBackend::new("This page intentionally left blank.");
        assert!(matches!(
            process_pdf(b"pdf bytes", &backend, rules(), None),
            Err(ExtractError::NoTransactions)
        ));
    }

    #[test]
    fn zero_amount_rows_are_dropped() {
        let backend = MockPdfBackend::new(STATEMENT_TEXT);
        let model = MockModel::scripted(vec![
            Ok(r#"{"transactions": [
                {"date": "01/02/2024", "description": "VOID", "amount": 0.0},
                {"date": "01/02/2024", "description": "KEPT", "amount": -1.0}
            ]}"#
            .to_string()),
            Err(ledgerlens_classify::ModelError::EmptyCompletion),
        ]);

        let result = process_pdf(b"pdf bytes", &backend, rules(), Some(&model)).unwrap();
        assert_eq!(result.total_rows, 1);
        assert_eq!(result.transactions[0].description, "KEPT");
    }

    #[test]
    fn blank_descriptions_are_synthesized() {
        let backend = MockPdfBackend::new(STATEMENT_TEXT);
        let model = MockModel::scripted(vec![
            Ok(r#"{"transactions": [
                {"date": "01/02/2024", "description": "  ", "amount": -1.0}
            ]}"#
            .to_string()),
            Err(ledgerlens_classify::ModelError::EmptyCompletion),
        ]);

        let result = process_pdf(b"pdf bytes", &backend, rules(), Some(&model)).unwrap();
        assert_eq!(result.transactions[0].description, "Transaction 1");
    }

    #[test]
    fn unknown_placeholders_from_model_are_ignored() {
        let raw = RawBankInfo {
            bank_name: Some("Unknown".to_string()),
            account_holder: Some("Unknown".to_string()),
            account_number: Some("Unknown".to_string()),
            currency: Some("EUR".to_string()),
        };
        let info = resolve_bank_info(Some(&raw), "no bank patterns here");
        assert_eq!(info.bank_name, "Unknown Bank");
        assert_eq!(info.account_holder, "Account Holder");
        assert_eq!(info.account_number, "XXXX-XXXX-XXXX");
        // Model currency survives when the registry finds nothing.
        assert_eq!(info.currency, "EUR");
    }

    #[test]
    fn registry_overrides_model_currency() {
        let raw = RawBankInfo {
            bank_name: Some("Wells Fargo".to_string()),
            account_holder: None,
            account_number: None,
            currency: Some("AED".to_string()),
        };
        let info = resolve_bank_info(Some(&raw), "");
        assert_eq!(info.bank_name, "Wells Fargo");
        assert_eq!(info.currency, "USD");
        assert_eq!(info.country, "USA");
    }
}
