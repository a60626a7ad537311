use ledgerlens_classify::RuleSet;
use ledgerlens_core::{date, Transaction};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::detect::ColumnMap;
use crate::sheet::{Cell, Worksheet};

/// Rows whose date or description text contains any of these markers are
/// statement furniture (totals, balances), not transactions.
const SUMMARY_MARKERS: &[&str] = &["TOTAL", "SUMMARY", "BALANCE", "OPENING", "CLOSING", "MONTHLY"];

/// Debit/credit cell contents that mean "no value".
const PLACEHOLDER_VALUES: &[&str] = &["", "-", "None"];

/// Lazy, restartable iterator over the data rows of one sheet — one
/// canonical [`Transaction`] per valid row. A malformed row never aborts the
/// sheet; it is simply skipped.
pub struct RowIter<'a> {
    sheet: &'a dyn Worksheet,
    map: &'a ColumnMap,
    rules: &'a RuleSet,
    row: u32,
    /// Transactions emitted before and during this sheet — synthesized
    /// descriptions are numbered workbook-wide.
    emitted: usize,
}

impl<'a> RowIter<'a> {
    pub fn new(
        sheet: &'a dyn Worksheet,
        map: &'a ColumnMap,
        rules: &'a RuleSet,
        start_index: usize,
    ) -> Self {
        Self {
            sheet,
            map,
            rules,
            row: map.header_row,
            emitted: start_index,
        }
    }

    fn cell_at(&self, col: Option<u32>) -> Cell {
        col.map(|c| self.sheet.cell(self.row, c)).unwrap_or(Cell::Empty)
    }

    fn resolve_amount(&self) -> Decimal {
        if let Some(col) = self.map.amount_col {
            // Single signed amount column.
            return parse_decimal(&self.sheet.cell(self.row, col)).unwrap_or(Decimal::ZERO);
        }

        let debit = self.cell_at(self.map.debit_col);
        if has_value(&debit) {
            return parse_decimal(&debit).map(|v| -v.abs()).unwrap_or(Decimal::ZERO);
        }

        let credit = self.cell_at(self.map.credit_col);
        if has_value(&credit) {
            return parse_decimal(&credit).map(|v| v.abs()).unwrap_or(Decimal::ZERO);
        }

        Decimal::ZERO
    }
}

impl Iterator for RowIter<'_> {
    type Item = Transaction;

    fn next(&mut self) -> Option<Transaction> {
        loop {
            if self.row >= self.sheet.max_row() {
                return None;
            }
            self.row += 1;

            let date_cell = self.cell_at(self.map.date_col);
            if date_cell.is_empty() {
                continue;
            }

            let description_cell = self.cell_at(self.map.description_col);
            if is_summary(&date_cell.text()) || is_summary(&description_cell.text()) {
                continue;
            }

            let amount = self.resolve_amount();
            if amount == Decimal::ZERO {
                continue;
            }

            let description = {
                let text = description_cell.text();
                if text.is_empty() {
                    format!("Transaction {}", self.emitted + 1)
                } else {
                    text
                }
            };

            let tx_date = match date_cell {
                Cell::Date(d) => d,
                other => date::normalize(&other.text()),
            };
            let category = self.rules.categorize(&description);

            self.emitted += 1;
            return Some(Transaction::new(tx_date, amount, description, category));
        }
    }
}

fn is_summary(text: &str) -> bool {
    let upper = text.to_uppercase();
    SUMMARY_MARKERS.iter().any(|m| upper.contains(m))
}

fn has_value(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => false,
        Cell::Text(s) => !PLACEHOLDER_VALUES.contains(&s.trim()),
        Cell::Number(_) | Cell::Date(_) => true,
    }
}

fn parse_decimal(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(n) => Decimal::from_f64(*n),
        Cell::Text(s) => {
            let cleaned: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
            cleaned.parse().ok()
        }
        _ => None,
    }
}
