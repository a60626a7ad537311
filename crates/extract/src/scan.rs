use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::ai::{ExtractedStatement, RawTransaction};

/// Deterministic fallback for when the model reply is unusable: a line
/// scanner over the raw extracted text. Best-effort by design.
const MIN_LINE_LEN: usize = 10;
const MAX_FALLBACK_ROWS: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 100;

/// Lines carrying these words are headers or summary furniture.
const SKIP_WORDS: &[&str] = &["TOTAL", "BALANCE", "OPENING", "CLOSING", "DATE", "DESCRIPTION"];

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_date_like, r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}[/-]\d{1,2}[/-]\d{1,2}");
re!(re_amount, r"-?[\d,]+\.\d{2}");
re!(re_strip, r"[\d/\-,.]+");

/// Scan raw statement text line by line: a date-like substring plus the
/// first standalone decimal number make a transaction; the stripped
/// remainder is the description. Output is capped at 100 rows.
pub fn fallback_extract(text: &str) -> ExtractedStatement {
    let mut transactions = Vec::new();

    for line in text.lines() {
        if transactions.len() >= MAX_FALLBACK_ROWS {
            break;
        }

        let line = line.trim();
        if line.len() < MIN_LINE_LEN {
            continue;
        }
        let upper = line.to_uppercase();
        if SKIP_WORDS.iter().any(|w| upper.contains(w)) {
            continue;
        }

        let Some(date_match) = re_date_like().find(line) else {
            continue;
        };
        let Some(amount) = first_amount(line) else {
            continue;
        };

        let description: String = re_strip()
            .replace_all(line, " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(MAX_DESCRIPTION_LEN)
            .collect();
        if description.is_empty() {
            continue;
        }

        transactions.push(RawTransaction {
            date: date_match.as_str().to_string(),
            description,
            amount,
        });
    }

    debug!(rows = transactions.len(), "fallback line scan complete");
    ExtractedStatement { bank_info: None, transactions }
}

fn first_amount(line: &str) -> Option<Decimal> {
    let m = re_amount().find(line)?;
    let cleaned: String = m.as_str().chars().filter(|c| *c != ',').collect();
    cleaned.parse().ok().filter(|d: &Decimal| !d.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_simple_statement_lines() {
        let text = "\
ACME BANK STATEMENT PAGE 1
01/02/2024  CARREFOUR HYPERMARKET  150.50
02/02/2024  ADNOC STATION 114  85.00
";
        let extracted = fallback_extract(text);
        assert_eq!(extracted.transactions.len(), 2);
        assert_eq!(extracted.transactions[0].date, "01/02/2024");
        assert_eq!(extracted.transactions[0].description, "CARREFOUR HYPERMARKET");
        assert_eq!(
            extracted.transactions[0].amount,
            "150.50".parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn keeps_negative_amounts_signed() {
        let extracted = fallback_extract("01/02/2024 REFUND REVERSAL -42.00 END");
        assert_eq!(
            extracted.transactions[0].amount,
            "-42.00".parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn skips_header_and_summary_lines() {
        let text = "\
DATE        DESCRIPTION        AMOUNT
OPENING BALANCE            1,000.00
01/02/2024  CARREFOUR MARKET  150.50
CLOSING BALANCE              849.50
";
        let extracted = fallback_extract(text);
        assert_eq!(extracted.transactions.len(), 1);
        assert_eq!(extracted.transactions[0].description, "CARREFOUR MARKET");
    }

    #[test]
    fn skips_short_lines_and_lines_without_dates_or_amounts() {
        let text = "\
x 1.00
01/02/2024 NO AMOUNT HERE
JUST A DESCRIPTION 50.00 WITHOUT THE THING BEFORE IT
";
        assert!(fallback_extract(text).transactions.is_empty());
    }

    #[test]
    fn strips_numerics_out_of_descriptions() {
        let extracted = fallback_extract("15-01-2024 TRN 0042 LULU CENTER 75.25");
        assert_eq!(extracted.transactions[0].description, "TRN LULU CENTER");
    }

    #[test]
    fn iso_dates_are_recognized() {
        let extracted = fallback_extract("2024-01-15 METRO CARD TOPUP 20.00");
        assert_eq!(extracted.transactions[0].date, "2024-01-15");
    }

    #[test]
    fn output_is_capped_at_one_hundred_rows() {
        let mut text = String::new();
        for i in 0..150 {
            text.push_str(&format!("01/02/2024 MERCHANT NUMBER {i} 10.50\n"));
        }
        let extracted = fallback_extract(&text);
        assert_eq!(extracted.transactions.len(), MAX_FALLBACK_ROWS);
    }

    #[test]
    fn zero_amounts_are_ignored() {
        let extracted = fallback_extract("01/02/2024 VOID TRANSACTION 0.00");
        assert!(extracted.transactions.is_empty());
    }
}
