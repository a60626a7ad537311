use ledgerlens_core::{detect_bank, mask_account_number, BankInfo};

use crate::sheet::Worksheet;

/// Dedicated metadata sheet some exports carry; never treated as a
/// transaction sheet.
pub const ACCOUNT_INFO_SHEET: &str = "Account Info";

const SCAN_ROWS: u32 = 20;
const SCAN_COLS: u32 = 10;

/// Read the field/value pairs of an "Account Info" sheet (column 1 names
/// the field, column 2 holds the value).
pub fn read_account_info(sheet: &dyn Worksheet, info: &mut BankInfo) {
    for row in 1..=sheet.max_row() {
        let field = sheet.cell(row, 1).text().to_lowercase();
        let value = sheet.cell(row, 2).text();
        if value.is_empty() {
            continue;
        }

        if field.contains("account holder") {
            info.account_holder = value;
        } else if field.contains("account number") {
            if let Some(masked) = mask_account_number(&value) {
                info.account_number = masked;
            }
        } else if field.contains("bank name") {
            if let Some(entry) = detect_bank(&value) {
                info.apply_registry(entry);
            }
        }
    }
}

/// Best-effort metadata scan over the top of a transaction sheet: bank
/// patterns, a titled account-holder name, and maskable account numbers.
pub fn scan_for_bank_info(sheet: &dyn Worksheet, info: &mut BankInfo) {
    let last_row = sheet.max_row().min(SCAN_ROWS);
    let last_col = sheet.max_column().min(SCAN_COLS);

    for row in 1..=last_row {
        for col in 1..=last_col {
            let text = sheet.cell(row, col).text();
            if text.is_empty() {
                continue;
            }

            if let Some(entry) = detect_bank(&text) {
                info.apply_registry(entry);
            }

            if looks_like_holder_name(&text) {
                info.account_holder = title_case(&text);
            }

            if let Some(masked) = mask_account_number(&text) {
                info.account_number = masked;
            }
        }
    }
}

/// Names are 2–4 words, carry no digits, and include a title (Mr/Ms/Mrs/Dr).
fn looks_like_holder_name(text: &str) -> bool {
    let words = text.split_whitespace().count();
    if !(2..=4).contains(&words) {
        return false;
    }
    if text.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    let lower = text.to_lowercase();
    ["mr", "ms", "mrs", "dr"].iter().any(|t| lower.contains(t))
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::MemSheet;

    #[test]
    fn account_info_sheet_fills_all_fields() {
        let sheet = MemSheet::from_text(
            ACCOUNT_INFO_SHEET,
            &[
                &["Account Holder", "JOHN DOE"],
                &["Account Number", "1234567890123"],
                &["Bank Name", "Emirates NBD"],
            ],
        );
        let mut info = BankInfo::default();
        read_account_info(&sheet, &mut info);

        assert_eq!(info.account_holder, "JOHN DOE");
        assert_eq!(info.account_number, "1234-****-0123");
        assert_eq!(info.bank_name, "Emirates NBD");
        assert_eq!(info.currency, "AED");
        assert_eq!(info.bank_code, "ENBD");
    }

    #[test]
    fn unknown_bank_name_keeps_defaults() {
        let sheet =
            MemSheet::from_text(ACCOUNT_INFO_SHEET, &[&["Bank Name", "Village Credit Union"]]);
        let mut info = BankInfo::default();
        read_account_info(&sheet, &mut info);
        assert_eq!(info.bank_name, "Unknown Bank");
        assert_eq!(info.currency, "USD");
    }

    #[test]
    fn unmaskable_account_number_keeps_placeholder() {
        let sheet = MemSheet::from_text(ACCOUNT_INFO_SHEET, &[&["Account Number", "ACC-42"]]);
        let mut info = BankInfo::default();
        read_account_info(&sheet, &mut info);
        assert_eq!(info.account_number, "XXXX-XXXX-XXXX");
    }

    #[test]
    fn header_scan_finds_bank_holder_and_account() {
        let sheet = MemSheet::from_text(
            "Statement",
            &[
                &["WELLS FARGO BANK"],
                &["MR JOHN SMITH"],
                &["Account: ", "1234567890"],
                &["Date", "Description", "Debit", "Credit"],
            ],
        );
        let mut info = BankInfo::default();
        scan_for_bank_info(&sheet, &mut info);

        assert_eq!(info.bank_name, "Wells Fargo");
        assert_eq!(info.currency, "USD");
        assert_eq!(info.account_holder, "Mr John Smith");
        assert_eq!(info.account_number, "1234-****-7890");
    }

    #[test]
    fn holder_heuristic_rejects_non_names() {
        assert!(!looks_like_holder_name("SINGLEWORD"));
        assert!(!looks_like_holder_name("MR JOHN SMITH 42"));
        assert!(!looks_like_holder_name("one two three four five"));
        assert!(looks_like_holder_name("MRS JANE DOE"));
    }

    #[test]
    fn title_case_normalizes_shouting() {
        assert_eq!(title_case("MR JOHN SMITH"), "Mr John Smith");
        assert_eq!(title_case("dr  a  khan"), "Dr A Khan");
    }
}
