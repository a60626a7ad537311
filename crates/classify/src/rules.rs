use ledgerlens_core::Category;

/// One priority-scan rule: a category, its keyword substrings, and an
/// optional guard. Guarded categories only win when a guard term is also
/// present — this keeps generic keyword overlap (a grocery store whose name
/// happens to contain "fee") from mis-tagging a transaction.
struct PriorityRule {
    category: Category,
    keywords: &'static [&'static str],
    guard: Option<&'static [&'static str]>,
}

const fn rule(
    category: Category,
    keywords: &'static [&'static str],
    guard: Option<&'static [&'static str]>,
) -> PriorityRule {
    PriorityRule { category, keywords, guard }
}

/// Scanned in `Category::PRIORITY` order; first satisfied (keyword AND
/// guard) match wins. No scoring, no weighting.
const PRIORITY_RULES: &[PriorityRule] = &[
    rule(
        Category::AtmAndCashWithdrawals,
        &[
            "atm", "cash withdrawal", "withdrawal", "atm withdrawal", "cash advance",
            "atm fee", "withdrawal fee",
        ],
        Some(&["atm", "withdrawal", "cash"]),
    ),
    rule(
        Category::SubscriptionsAndDigitalServices,
        &[
            "netflix", "spotify", "youtube premium", "amazon prime", "disney+", "adobe",
            "microsoft", "google", "icloud", "dropbox", "zoom", "subscription", "monthly",
            "annual", "recurring", "saas", "software", "app store", "play store", "itunes",
            "office 365",
        ],
        Some(&[
            "subscription", "monthly", "netflix", "spotify", "prime", "office", "adobe",
            "google", "microsoft", "icloud",
        ]),
    ),
    rule(
        Category::FoodAndDining,
        &[
            "carrefour", "lulu", "spinneys", "choithrams", "union coop", "waitrose",
            "restaurant", "cafe", "kfc", "mcdonald", "pizza", "subway", "dominos",
            "starbucks", "costa", "dunkin", "burger", "food", "dining", "eat", "grocery",
            "supermarket", "hypermarket", "bakery", "deli", "bistro", "catering",
            "takeaway", "delivery", "zomato", "talabat", "deliveroo", "doordash",
            "grubhub", "uber eats", "postmates", "chipotle", "panera", "whole foods",
            "trader joe", "safeway", "kroger", "target", "walmart", "donuts", "coffee",
            "espresso", "bacio di latte", "butchery", "zinque", "ralphs", "albertsons",
            "vons", "pavilions", "publix", "wegmans", "harris teeter",
        ],
        None,
    ),
    rule(
        Category::Transportation,
        &[
            "adnoc", "eppco", "enoc", "petrol", "fuel", "gas", "gasoline", "taxi", "uber",
            "careem", "metro", "bus", "rta", "parking", "salik", "toll", "car wash",
            "transport", "emirates", "etihad", "flydubai", "air arabia", "airline",
            "flight", "airport", "chevron", "shell", "bp", "76", "exxon", "mobil", "lyft",
            "parking services", "toll roads", "valet",
        ],
        None,
    ),
    rule(
        Category::Healthcare,
        &[
            "hospital", "clinic", "pharmacy", "medical", "doctor", "health", "dental",
            "medicare", "aster", "nmc", "mediclinic", "life pharmacy", "boots",
            "aster pharmacy", "day today pharmacy",
        ],
        None,
    ),
    rule(
        Category::UtilitiesAndBills,
        &[
            "dewa", "addc", "sewa", "fewa", "etisalat", "du", "internet", "mobile",
            "telecom", "electricity", "water", "gas", "utility", "bill", "wifi",
            "broadband", "phone bill", "electric bill",
        ],
        None,
    ),
    rule(
        Category::Entertainment,
        &[
            "cinema", "movie", "vox", "reel", "netflix", "osn", "gaming", "entertainment",
            "park", "beach", "attraction", "ticket", "event", "spotify", "youtube",
            "disney", "amazon prime", "hulu", "shahid", "disneyland", "balloon museum",
            "sawdust festival", "museum", "amusement",
        ],
        None,
    ),
    rule(
        Category::ShoppingAndRetail,
        &[
            "mall", "centrepoint", "max", "home centre", "ikea", "ace", "sharaf dg",
            "jumbo", "electronics", "clothing", "fashion", "shop", "store", "retail",
            "amazon", "noon", "souq", "namshi", "h&m", "zara", "nike", "adidas", "apple",
            "samsung", "virgin", "uniqlo", "target", "walmart", "costco", "best buy",
            "macy", "nordstrom", "kohls", "tj maxx", "ross", "marshalls",
        ],
        None,
    ),
    rule(
        Category::PersonalCare,
        &[
            "salon", "spa", "barbershop", "beauty", "cosmetics", "skincare", "haircut",
            "manicure", "pedicure", "massage", "gym", "fitness", "24hourfitness",
            "planet fitness", "la fitness", "crunch", "equinox", "flex fitness",
            "orangetheory",
        ],
        None,
    ),
    rule(
        Category::BankingAndFinance,
        &[
            "transfer", "fee", "charge", "finance", "loan", "interest", "bank fee",
            "service charge", "maintenance fee", "overdraft", "wire transfer",
            "remittance", "exchange",
        ],
        Some(&["transfer", "fee", "charge", "interest", "maintenance"]),
    ),
];

/// Broad single-word checks run after the priority scan misses.
const BROAD_FALLBACKS: &[(Category, &[&str])] = &[
    (Category::Transportation, &["taxi", "uber", "careem", "rta"]),
    (Category::FoodAndDining, &["restaurant", "cafe", "food", "dining", "eat"]),
    (Category::ShoppingAndRetail, &["mall", "shop", "store", "retail"]),
];

/// Exact merchant names, tried last before the catch-all.
const MERCHANT_TABLE: &[(&str, Category)] = &[
    ("careem", Category::Transportation),
    ("talabat", Category::FoodAndDining),
    ("zomato", Category::FoodAndDining),
    ("netflix", Category::SubscriptionsAndDigitalServices),
    ("spotify", Category::SubscriptionsAndDigitalServices),
    ("amazon", Category::ShoppingAndRetail),
    ("noon", Category::ShoppingAndRetail),
    ("adnoc", Category::Transportation),
    ("enoc", Category::Transportation),
    ("eppco", Category::Transportation),
];

/// Immutable, process-wide rule tables. Built once; shared by reference into
/// every pipeline invocation.
pub struct RuleSet {
    priority: &'static [PriorityRule],
    fallbacks: &'static [(Category, &'static [&'static str])],
    merchants: &'static [(&'static str, Category)],
}

static BUILTIN: RuleSet = RuleSet {
    priority: PRIORITY_RULES,
    fallbacks: BROAD_FALLBACKS,
    merchants: MERCHANT_TABLE,
};

impl RuleSet {
    pub fn builtin() -> &'static RuleSet {
        &BUILTIN
    }

    /// Pure, total categorization: always returns a label, with
    /// `Other Expenses` as the catch-all.
    pub fn categorize(&self, description: &str) -> Category {
        let desc = description.to_lowercase();
        let desc = desc.trim();

        for rule in self.priority {
            if !rule.keywords.iter().any(|k| desc.contains(k)) {
                continue;
            }
            match rule.guard {
                Some(terms) if !terms.iter().any(|t| desc.contains(t)) => continue,
                _ => return rule.category,
            }
        }

        for (category, words) in self.fallbacks {
            if words.iter().any(|w| desc.contains(w)) {
                return *category;
            }
        }

        for (merchant, category) in self.merchants {
            if desc.contains(merchant) {
                return *category;
            }
        }

        Category::OtherExpenses
    }
}
