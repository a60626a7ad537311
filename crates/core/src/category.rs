use std::fmt;

/// Closed set of spending categories a transaction can carry.
///
/// `PRIORITY` is the order the rule-based categorizer scans; `ALL` is the
/// full vocabulary offered to the language-model classifier (it adds Travel,
/// Income and the catch-all, which have no keyword rules of their own).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    FoodAndDining,
    Transportation,
    ShoppingAndRetail,
    Healthcare,
    UtilitiesAndBills,
    Entertainment,
    SubscriptionsAndDigitalServices,
    AtmAndCashWithdrawals,
    BankingAndFinance,
    PersonalCare,
    Travel,
    Income,
    OtherExpenses,
}

impl Category {
    /// Rule-scan order. Behaviorally significant: the first category whose
    /// keyword (and guard, where present) matches wins.
    pub const PRIORITY: [Category; 10] = [
        Category::AtmAndCashWithdrawals,
        Category::SubscriptionsAndDigitalServices,
        Category::FoodAndDining,
        Category::Transportation,
        Category::Healthcare,
        Category::UtilitiesAndBills,
        Category::Entertainment,
        Category::ShoppingAndRetail,
        Category::PersonalCare,
        Category::BankingAndFinance,
    ];

    pub const ALL: [Category; 13] = [
        Category::FoodAndDining,
        Category::Transportation,
        Category::ShoppingAndRetail,
        Category::Healthcare,
        Category::UtilitiesAndBills,
        Category::Entertainment,
        Category::SubscriptionsAndDigitalServices,
        Category::AtmAndCashWithdrawals,
        Category::BankingAndFinance,
        Category::PersonalCare,
        Category::Travel,
        Category::Income,
        Category::OtherExpenses,
    ];

    /// Derived subcategory label: the first word of the category name, or
    /// "Miscellaneous" for the catch-all.
    pub fn subcategory(self) -> &'static str {
        match self {
            Category::FoodAndDining => "Food",
            Category::Transportation => "Transportation",
            Category::ShoppingAndRetail => "Shopping",
            Category::Healthcare => "Healthcare",
            Category::UtilitiesAndBills => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::SubscriptionsAndDigitalServices => "Subscriptions",
            Category::AtmAndCashWithdrawals => "ATM",
            Category::BankingAndFinance => "Banking",
            Category::PersonalCare => "Personal",
            Category::Travel => "Travel",
            Category::Income => "Income",
            Category::OtherExpenses => "Miscellaneous",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::FoodAndDining => "Food & Dining",
            Category::Transportation => "Transportation",
            Category::ShoppingAndRetail => "Shopping & Retail",
            Category::Healthcare => "Healthcare",
            Category::UtilitiesAndBills => "Utilities & Bills",
            Category::Entertainment => "Entertainment",
            Category::SubscriptionsAndDigitalServices => "Subscriptions & Digital Services",
            Category::AtmAndCashWithdrawals => "ATM & Cash Withdrawals",
            Category::BankingAndFinance => "Banking & Finance",
            Category::PersonalCare => "Personal Care",
            Category::Travel => "Travel",
            Category::Income => "Income",
            Category::OtherExpenses => "Other Expenses",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Food & Dining" => Ok(Category::FoodAndDining),
            "Transportation" => Ok(Category::Transportation),
            "Shopping & Retail" => Ok(Category::ShoppingAndRetail),
            "Healthcare" => Ok(Category::Healthcare),
            "Utilities & Bills" => Ok(Category::UtilitiesAndBills),
            "Entertainment" => Ok(Category::Entertainment),
            "Subscriptions & Digital Services" => Ok(Category::SubscriptionsAndDigitalServices),
            "ATM & Cash Withdrawals" => Ok(Category::AtmAndCashWithdrawals),
            "Banking & Finance" => Ok(Category::BankingAndFinance),
            "Personal Care" => Ok(Category::PersonalCare),
            "Travel" => Ok(Category::Travel),
            "Income" => Ok(Category::Income),
            "Other Expenses" => Ok(Category::OtherExpenses),
            other => Err(format!("Unknown category: '{other}'")),
        }
    }
}
