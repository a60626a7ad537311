use std::sync::OnceLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;

// ── Compiled pattern cache ───────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_slash_y4, r"^(\d{1,2})/(\d{1,2})/(\d{4})$");
re!(re_slash_y2, r"^(\d{1,2})/(\d{1,2})/(\d{2})$");
re!(re_iso, r"^(\d{4})-(\d{1,2})-(\d{1,2})$");

// ── Normalization ────────────────────────────────────────────────────────────

/// Total date normalizer: always returns *some* date. A malformed date must
/// not abort an otherwise valid transaction row, so the ultimate fallback is
/// today's date.
pub fn normalize(raw: &str) -> NaiveDate {
    parse(raw).unwrap_or_else(|| Utc::now().date_naive())
}

/// Structural disambiguation, first match wins:
/// 1. `DD/MM/YYYY` — default reading for slash dates with 4-digit years.
///    When that is not a valid calendar date (e.g. `12/25/2024`), the same
///    digits are re-read as `MM/DD/YYYY`.
/// 2. `MM/DD/YY` — 2-digit years pivot at 50 (`<50` → 2000s, `>=50` → 1900s).
/// 3. `YYYY-MM-DD`.
pub fn parse(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();

    if let Some(c) = re_slash_y4().captures(s) {
        let a: u32 = c.get(1)?.as_str().parse().ok()?;
        let b: u32 = c.get(2)?.as_str().parse().ok()?;
        let year: i32 = c.get(3)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, b, a)
            .or_else(|| NaiveDate::from_ymd_opt(year, a, b));
    }

    if let Some(c) = re_slash_y2().captures(s) {
        let month: u32 = c.get(1)?.as_str().parse().ok()?;
        let day: u32 = c.get(2)?.as_str().parse().ok()?;
        let year = expand_year(c.get(3)?.as_str().parse().ok()?);
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(c) = re_iso().captures(s) {
        let year: i32 = c.get(1)?.as_str().parse().ok()?;
        let month: u32 = c.get(2)?.as_str().parse().ok()?;
        let day: u32 = c.get(3)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

fn expand_year(y: i32) -> i32 {
    if y < 50 {
        2000 + y
    } else {
        1900 + y
    }
}
