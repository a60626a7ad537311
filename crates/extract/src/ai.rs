use std::fmt::Write as _;

use ledgerlens_classify::{strip_code_fences, LanguageModel, ModelError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::backend::{PdfContent, PdfTable};

/// Caps applied when embedding extracted content into the prompt.
const TEXT_PROMPT_LIMIT: usize = 8000;
const TABLE_PROMPT_LIMIT: usize = 5;
const TABLE_ROW_LIMIT: usize = 20;

const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.1;

const SYSTEM_PROMPT: &str = "You are a financial data extraction expert. \
    Extract transaction data accurately and return ONLY valid JSON. \
    No markdown, no explanations.";

#[derive(Debug, Error)]
pub enum AiExtractionError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Unparseable extraction reply: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Extraction reply contained no transactions")]
    Empty,
}

/// Bank metadata as the model reports it — every field optional, sanitized
/// later against the registry and the masking rules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBankInfo {
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_holder: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// One transaction as extracted — dates still raw, amounts already signed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedStatement {
    #[serde(default)]
    pub bank_info: Option<RawBankInfo>,
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
}

/// Ask the model to pull structured transactions out of the extracted text
/// and tables. Callers must treat failure as routine and fall back to the
/// deterministic line scanner.
pub fn ai_extract(
    model: &dyn LanguageModel,
    content: &PdfContent,
) -> Result<ExtractedStatement, AiExtractionError> {
    let prompt = build_extraction_prompt(&content.text, &content.tables);
    let raw = model.complete(SYSTEM_PROMPT, &prompt, MAX_TOKENS, TEMPERATURE)?;
    let extracted: ExtractedStatement = serde_json::from_str(strip_code_fences(&raw))?;
    if extracted.transactions.is_empty() {
        return Err(AiExtractionError::Empty);
    }
    Ok(extracted)
}

pub fn build_extraction_prompt(text: &str, tables: &[PdfTable]) -> String {
    let text_excerpt: String = text.chars().take(TEXT_PROMPT_LIMIT).collect();

    let mut table_block = String::new();
    if !tables.is_empty() {
        let _ = writeln!(table_block, "\nEXTRACTED TABLES ({} tables):", tables.len());
        for (i, table) in tables.iter().take(TABLE_PROMPT_LIMIT).enumerate() {
            let _ = writeln!(table_block, "\nTable {} (Page {}):", i + 1, table.page);
            for row in table.data.iter().take(TABLE_ROW_LIMIT) {
                let _ = writeln!(table_block, "{}", row.join(" | "));
            }
        }
    }

    format!(
        "Extract ALL transactions from this PDF bank statement.\n\n\
         PDF CONTENT:\n{text_excerpt}\n{table_block}\n\
         INSTRUCTIONS:\n\
         1. Extract ALL transactions with: date, description, amount\n\
         2. Determine if each amount is a debit (expense, negative) or a credit (income, positive)\n\
         3. Parse dates to YYYY-MM-DD format\n\
         4. Extract the account holder name and account number if visible\n\
         5. Identify the bank name\n\
         6. Determine the currency (AED, USD, EUR, GBP, INR, etc.)\n\n\
         CRITICAL RULES:\n\
         - Debits/withdrawals/payments are NEGATIVE amounts (-100.00)\n\
         - Credits/deposits/income are POSITIVE amounts (100.00)\n\
         - Skip opening/closing balance rows\n\
         - Skip headers and summary rows\n\
         - Parse all date formats correctly (DD/MM/YYYY, MM/DD/YYYY, etc.)\n\
         - Include transaction reference numbers in the description if available\n\n\
         OUTPUT FORMAT (JSON only, no markdown):\n\
         {{\n\
           \"bank_info\": {{\n\
             \"bank_name\": \"Bank Name\",\n\
             \"account_holder\": \"Holder Name or Unknown\",\n\
             \"account_number\": \"Account number or Unknown\",\n\
             \"currency\": \"USD or AED or EUR etc\"\n\
           }},\n\
           \"transactions\": [\n\
             {{\"date\": \"2024-01-15\", \"description\": \"Transaction description\", \"amount\": -50.00}},\n\
             {{\"date\": \"2024-01-20\", \"description\": \"Salary deposit\", \"amount\": 5000.00}}\n\
           ]\n\
         }}\n\n\
         Extract ALL transactions you can find. Return ONLY valid JSON."
    )
}
