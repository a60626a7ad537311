use serde::{Deserialize, Serialize};

use crate::sheet::Worksheet;

/// Statements place headers near the top; only this window is scanned.
pub const HEADER_SCAN_ROWS: u32 = 20;
pub const HEADER_SCAN_COLS: u32 = 10;
const HEADER_HIT_THRESHOLD: usize = 3;

/// Inferred mapping from semantic field to spreadsheet column for one sheet.
/// Transient — produced per sheet and consumed immediately by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub header_row: u32,
    pub date_col: Option<u32>,
    pub description_col: Option<u32>,
    pub debit_col: Option<u32>,
    pub credit_col: Option<u32>,
    pub amount_col: Option<u32>,
    pub type_col: Option<u32>,
    pub reference_col: Option<u32>,
}

impl Default for ColumnMap {
    /// Best-effort fallback layout used when no header row qualifies.
    fn default() -> Self {
        Self {
            header_row: 1,
            date_col: Some(1),
            description_col: Some(2),
            debit_col: Some(4),
            credit_col: Some(5),
            amount_col: None,
            type_col: None,
            reference_col: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Date,
    Description,
    Type,
    Reference,
    Debit,
    Credit,
    Amount,
    /// Counts toward header detection but maps to no column.
    Balance,
}

/// Keyword → role table. Order matters: when a cell matches several
/// keywords, the last match decides its role, so "Particulars / Date" is a
/// description column rather than a date column.
const HEADER_KEYWORDS: &[(&str, Role)] = &[
    ("date", Role::Date),
    ("amount", Role::Amount),
    ("description", Role::Description),
    ("particular", Role::Description),
    ("narration", Role::Description),
    ("debit", Role::Debit),
    ("credit", Role::Credit),
    ("balance", Role::Balance),
    ("type", Role::Type),
    ("reference", Role::Reference),
];

/// Locate the header row and column roles for one sheet. The first row in
/// the scan window with at least three keyword hits wins; if none does, the
/// hardcoded default layout is returned — deliberately a best-effort
/// fallback, not a failure.
pub fn detect_columns(sheet: &dyn Worksheet) -> ColumnMap {
    let last_row = sheet.max_row().min(HEADER_SCAN_ROWS);
    let last_col = sheet.max_column().min(HEADER_SCAN_COLS);

    for row in 1..=last_row {
        let mut map = ColumnMap {
            header_row: row,
            date_col: None,
            description_col: None,
            debit_col: None,
            credit_col: None,
            amount_col: None,
            type_col: None,
            reference_col: None,
        };
        let mut hits = 0usize;

        for col in 1..=last_col {
            let text = sheet.cell(row, col).text().to_lowercase();
            if text.is_empty() {
                continue;
            }

            let mut role = None;
            for (keyword, candidate) in HEADER_KEYWORDS {
                if text.contains(keyword) {
                    role = Some(*candidate);
                }
            }
            let Some(role) = role else { continue };
            hits += 1;

            let slot = match role {
                Role::Date => &mut map.date_col,
                Role::Description => &mut map.description_col,
                Role::Type => &mut map.type_col,
                Role::Reference => &mut map.reference_col,
                Role::Debit => &mut map.debit_col,
                Role::Credit => &mut map.credit_col,
                Role::Amount => &mut map.amount_col,
                Role::Balance => continue,
            };
            // First column per role wins.
            if slot.is_none() {
                *slot = Some(col);
            }
        }

        if hits >= HEADER_HIT_THRESHOLD {
            return map;
        }
    }

    ColumnMap::default()
}
