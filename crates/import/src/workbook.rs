use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use ledgerlens_classify::{BatchCategorizer, LanguageModel, RuleSet};
use ledgerlens_core::{BankInfo, StatementResult, Transaction};
use thiserror::Error;
use tracing::info;

use crate::builder::RowIter;
use crate::detect::detect_columns;
use crate::scan::{read_account_info, scan_for_bank_info, ACCOUNT_INFO_SHEET};
use crate::sheet::{Cell, Worksheet};

pub const PROCESSING_MODE: &str = "Dynamic spreadsheet processing with AI categorization";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// calamine-backed worksheet. Coordinates are absolute, so leading blank
/// rows and columns keep their spreadsheet positions.
pub struct SheetData {
    name: String,
    range: Range<Data>,
}

impl Worksheet for SheetData {
    fn name(&self) -> &str {
        &self.name
    }

    fn cell(&self, row: u32, col: u32) -> Cell {
        if row == 0 || col == 0 {
            return Cell::Empty;
        }
        match self.range.get_value((row - 1, col - 1)) {
            None | Some(Data::Empty) | Some(Data::Error(_)) => Cell::Empty,
            Some(Data::String(s)) => Cell::Text(s.clone()),
            Some(Data::Float(f)) => Cell::Number(*f),
            Some(Data::Int(i)) => Cell::Number(*i as f64),
            Some(Data::Bool(b)) => Cell::Text(b.to_string()),
            Some(Data::DateTime(dt)) => dt
                .as_datetime()
                .map(|ndt| Cell::Date(ndt.date()))
                .unwrap_or(Cell::Number(dt.as_f64())),
            Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => Cell::Text(s.clone()),
        }
    }

    fn max_row(&self) -> u32 {
        self.range.end().map(|(row, _)| row + 1).unwrap_or(0)
    }

    fn max_column(&self) -> u32 {
        self.range.end().map(|(_, col)| col + 1).unwrap_or(0)
    }
}

/// Load every sheet of a workbook into memory. The reader is scoped to this
/// call — the handle is released before processing begins.
pub fn load_workbook(bytes: &[u8]) -> Result<Vec<SheetData>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let names = workbook.sheet_names().to_owned();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        sheets.push(SheetData { name, range });
    }
    Ok(sheets)
}

/// Spreadsheet statement pipeline: bank metadata, then per-sheet column
/// detection and row building, then one model recategorization pass over the
/// combined list. A sheet with no valid rows simply contributes nothing.
pub fn process_sheets(
    sheets: &[&dyn Worksheet],
    rules: &RuleSet,
    model: Option<&dyn LanguageModel>,
) -> StatementResult {
    let mut bank_info = BankInfo::default();
    if let Some(info_sheet) = sheets.iter().find(|s| s.name() == ACCOUNT_INFO_SHEET) {
        read_account_info(*info_sheet, &mut bank_info);
    } else if let Some(first) = sheets.first() {
        scan_for_bank_info(*first, &mut bank_info);
    }
    info!(bank = %bank_info.bank_name, currency = %bank_info.currency, "bank metadata resolved");

    let mut transactions: Vec<Transaction> = Vec::new();
    for sheet in sheets.iter().filter(|s| s.name() != ACCOUNT_INFO_SHEET) {
        let map = detect_columns(*sheet);
        let before = transactions.len();
        transactions.extend(RowIter::new(*sheet, &map, rules, before));
        info!(
            sheet = sheet.name(),
            header_row = map.header_row,
            rows = transactions.len() - before,
            "sheet processed"
        );
    }

    if let Some(model) = model {
        BatchCategorizer::new(model).recategorize(&mut transactions);
    }

    StatementResult::new(transactions, bank_info, PROCESSING_MODE)
}

/// Process an uploaded workbook from raw bytes.
pub fn process_workbook(
    bytes: &[u8],
    rules: &RuleSet,
    model: Option<&dyn LanguageModel>,
) -> Result<StatementResult, ImportError> {
    let sheets = load_workbook(bytes)?;
    let views: Vec<&dyn Worksheet> = sheets.iter().map(|s| s as &dyn Worksheet).collect();
    Ok(process_sheets(&views, rules, model))
}

pub fn process_workbook_path(
    path: &Path,
    rules: &RuleSet,
    model: Option<&dyn LanguageModel>,
) -> Result<StatementResult, ImportError> {
    let bytes = std::fs::read(path)?;
    process_workbook(&bytes, rules, model)
}
