use serde::{Deserialize, Serialize};

/// Bank-level metadata for one statement. Constructed once per statement
/// from the header/metadata scan (spreadsheet path) or from the AI
/// extraction (PDF path), then enriched from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankInfo {
    pub bank_name: String,
    pub account_holder: String,
    /// Masked form only — never the raw digits (see [`mask_account_number`]).
    pub account_number: String,
    pub currency: String,
    pub country: String,
    pub bank_code: String,
}

impl Default for BankInfo {
    fn default() -> Self {
        Self {
            bank_name: "Unknown Bank".to_string(),
            account_holder: "Account Holder".to_string(),
            account_number: "XXXX-XXXX-XXXX".to_string(),
            currency: "USD".to_string(),
            country: "Unknown".to_string(),
            bank_code: "UNKNOWN".to_string(),
        }
    }
}

impl BankInfo {
    /// Copy registry fields onto this record after a successful detection.
    pub fn apply_registry(&mut self, entry: &BankEntry) {
        self.bank_name = entry.name.to_string();
        self.bank_code = entry.code.to_string();
        self.country = entry.country.to_string();
        self.currency = entry.currency.to_string();
    }
}

/// One row of the static bank registry: a lowercase substring pattern and
/// the identity it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankEntry {
    pub pattern: &'static str,
    pub name: &'static str,
    pub code: &'static str,
    pub country: &'static str,
    pub currency: &'static str,
}

const fn entry(
    pattern: &'static str,
    name: &'static str,
    code: &'static str,
    country: &'static str,
    currency: &'static str,
) -> BankEntry {
    BankEntry { pattern, name, code, country, currency }
}

/// Process-wide, read-only registry. Scanned in order; the first pattern
/// found as a substring of the (lowercased) input wins.
pub const BANK_REGISTRY: &[BankEntry] = &[
    // UAE
    entry("abu dhabi commercial bank", "Abu Dhabi Commercial Bank", "ADCB", "UAE", "AED"),
    entry("adcb", "Abu Dhabi Commercial Bank", "ADCB", "UAE", "AED"),
    entry("first abu dhabi bank", "First Abu Dhabi Bank", "FAB", "UAE", "AED"),
    entry("fab", "First Abu Dhabi Bank", "FAB", "UAE", "AED"),
    entry("emirates nbd", "Emirates NBD", "ENBD", "UAE", "AED"),
    entry("enbd", "Emirates NBD", "ENBD", "UAE", "AED"),
    entry("mashreq bank", "Mashreq Bank", "MASHREQ", "UAE", "AED"),
    entry("mashreq", "Mashreq Bank", "MASHREQ", "UAE", "AED"),
    entry("commercial bank of dubai", "Commercial Bank of Dubai", "CBD", "UAE", "AED"),
    entry("cbd", "Commercial Bank of Dubai", "CBD", "UAE", "AED"),
    entry("rak bank", "RAKBank", "RAKBANK", "UAE", "AED"),
    entry("rakbank", "RAKBank", "RAKBANK", "UAE", "AED"),
    entry("abu dhabi islamic bank", "Abu Dhabi Islamic Bank", "ADIB", "UAE", "AED"),
    entry("adib", "Abu Dhabi Islamic Bank", "ADIB", "UAE", "AED"),
    // HSBC UK before the bare "hsbc" pattern, which defaults to the Middle
    // East entity.
    entry("hsbc uk", "HSBC UK", "HSBC", "UK", "GBP"),
    entry("hsbc", "HSBC Bank Middle East", "HSBC", "UAE", "AED"),
    // USA
    entry("bank of america", "Bank of America", "BOA", "USA", "USD"),
    entry("bofa", "Bank of America", "BOA", "USA", "USD"),
    entry("b of a", "Bank of America", "BOA", "USA", "USD"),
    entry("jp morgan chase", "Chase Bank", "CHASE", "USA", "USD"),
    entry("jpmorgan", "Chase Bank", "CHASE", "USA", "USD"),
    entry("chase", "Chase Bank", "CHASE", "USA", "USD"),
    entry("wells fargo", "Wells Fargo", "WF", "USA", "USD"),
    entry("wells", "Wells Fargo", "WF", "USA", "USD"),
    entry("citibank", "Citibank", "CITI", "USA", "USD"),
    entry("citi", "Citibank", "CITI", "USA", "USD"),
    // UK
    entry("barclays", "Barclays", "BARCLAYS", "UK", "GBP"),
    entry("lloyds", "Lloyds Bank", "LLOYDS", "UK", "GBP"),
    // India
    entry("state bank of india", "State Bank of India", "SBI", "India", "INR"),
    entry("sbi", "State Bank of India", "SBI", "India", "INR"),
    entry("hdfc bank", "HDFC Bank", "HDFC", "India", "INR"),
    entry("hdfc", "HDFC Bank", "HDFC", "India", "INR"),
    entry("icici bank", "ICICI Bank", "ICICI", "India", "INR"),
    entry("icici", "ICICI Bank", "ICICI", "India", "INR"),
    // Europe
    entry("deutsche bank", "Deutsche Bank", "DB", "Germany", "EUR"),
    entry("bnp paribas", "BNP Paribas", "BNP", "France", "EUR"),
    entry("ing bank", "ING Bank", "ING", "Netherlands", "EUR"),
];

/// Find the first registry entry whose pattern occurs in `text`
/// (case-insensitive substring match).
pub fn detect_bank(text: &str) -> Option<&'static BankEntry> {
    let lower = text.to_lowercase();
    BANK_REGISTRY.iter().find(|e| lower.contains(e.pattern))
}

/// Mask a real-looking account number (10–16 digits, ignoring spaces and
/// dashes) to `first4-****-last4`. Anything else returns `None` and the
/// caller keeps its placeholder.
pub fn mask_account_number(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    if digits.len() < 10 || digits.len() > 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!(
        "{}-****-{}",
        &digits[..4],
        &digits[digits.len() - 4..]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Registry lookup ───────────────────────────────────────────────────────

    #[test]
    fn detects_uae_bank_with_currency() {
        let e = detect_bank("EMIRATES NBD - Statement of Account").unwrap();
        assert_eq!(e.code, "ENBD");
        assert_eq!(e.currency, "AED");
        assert_eq!(e.country, "UAE");
    }

    #[test]
    fn detects_us_bank_with_usd() {
        let e = detect_bank("Wells Fargo Everyday Checking").unwrap();
        assert_eq!(e.code, "WF");
        assert_eq!(e.currency, "USD");
    }

    #[test]
    fn long_pattern_wins_over_short_alias() {
        // "abu dhabi commercial bank" must match before the bare "adcb".
        let e = detect_bank("ABU DHABI COMMERCIAL BANK PJSC").unwrap();
        assert_eq!(e.name, "Abu Dhabi Commercial Bank");
    }

    #[test]
    fn hsbc_uk_resolves_to_gbp() {
        assert_eq!(detect_bank("HSBC UK Bank plc").unwrap().currency, "GBP");
        assert_eq!(detect_bank("HSBC").unwrap().currency, "AED");
    }

    #[test]
    fn unknown_text_finds_nothing() {
        assert!(detect_bank("CORNER GROCERY LLC").is_none());
        assert!(detect_bank("").is_none());
    }

    #[test]
    fn apply_registry_overwrites_identity_fields() {
        let mut info = BankInfo::default();
        info.apply_registry(detect_bank("chase").unwrap());
        assert_eq!(info.bank_name, "Chase Bank");
        assert_eq!(info.bank_code, "CHASE");
        assert_eq!(info.currency, "USD");
        // Holder/account fields untouched.
        assert_eq!(info.account_holder, "Account Holder");
    }

    // ── Masking ───────────────────────────────────────────────────────────────

    #[test]
    fn masks_plain_digit_runs() {
        assert_eq!(mask_account_number("1234567890").unwrap(), "1234-****-7890");
        assert_eq!(
            mask_account_number("1234567890123456").unwrap(),
            "1234-****-3456"
        );
    }

    #[test]
    fn masks_ignore_separators() {
        assert_eq!(
            mask_account_number("1234 5678 9012").unwrap(),
            "1234-****-9012"
        );
        assert_eq!(
            mask_account_number("1234-5678-9012").unwrap(),
            "1234-****-9012"
        );
    }

    #[test]
    fn never_leaks_raw_digits() {
        let masked = mask_account_number("9876543210123").unwrap();
        assert!(!masked.contains("543210"));
        assert!(masked.contains("****"));
    }

    #[test]
    fn rejects_short_long_and_non_numeric() {
        assert!(mask_account_number("123456789").is_none()); // 9 digits
        assert!(mask_account_number("12345678901234567").is_none()); // 17 digits
        assert!(mask_account_number("ACCT-12345678").is_none());
        assert!(mask_account_number("").is_none());
    }
}
