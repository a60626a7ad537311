use std::fmt::Write as _;

use ledgerlens_core::{Category, Transaction};
use tracing::{debug, warn};

use crate::model::{strip_code_fences, LanguageModel};

/// Transactions are re-categorized in batches of this size.
pub const BATCH_SIZE: usize = 50;

/// Only this many descriptions of each batch are listed in the prompt.
/// Batch entries past the limit are never described to the model and keep
/// their rule-based category (see DESIGN.md for the rationale).
pub const PROMPT_DESCRIPTION_LIMIT: usize = 30;

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.1;

const SYSTEM_PROMPT: &str = "You are a financial categorization expert. \
    Respond only with a JSON array of categories, no additional text.";

/// Second-pass categorizer: asks the model to label each batch and applies
/// the labels positionally. Never fails — on any call or parse problem the
/// affected batch keeps its rule-based categories and every other batch is
/// processed independently.
pub struct BatchCategorizer<'a> {
    model: &'a dyn LanguageModel,
}

impl<'a> BatchCategorizer<'a> {
    pub fn new(model: &'a dyn LanguageModel) -> Self {
        Self { model }
    }

    pub fn recategorize(&self, transactions: &mut [Transaction]) {
        if transactions.is_empty() {
            return;
        }

        let mut start = 0usize;
        for batch in transactions.chunks_mut(BATCH_SIZE) {
            let prompt = build_prompt(batch, start);
            match self.model.complete(SYSTEM_PROMPT, &prompt, MAX_TOKENS, TEMPERATURE) {
                Ok(raw) => match parse_labels(&raw) {
                    Ok(labels) => {
                        debug!(batch_start = start, labels = labels.len(), "applying model labels");
                        apply_labels(batch, &labels);
                    }
                    Err(err) => {
                        warn!(batch_start = start, %err, "unparseable classification reply; batch keeps rule-based categories");
                    }
                },
                Err(err) => {
                    warn!(batch_start = start, %err, "classification call failed; batch keeps rule-based categories");
                }
            }
            start += batch.len();
        }
    }
}

/// Numbered description listing (numbering continues the global index) plus
/// the closed vocabulary and output-format contract.
fn build_prompt(batch: &[Transaction], start: usize) -> String {
    let vocabulary = Category::ALL
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let mut listing = String::new();
    for (offset, tx) in batch.iter().take(PROMPT_DESCRIPTION_LIMIT).enumerate() {
        let _ = writeln!(listing, "{}. {}", start + offset, tx.description);
    }

    format!(
        "Categorize these financial transactions into the most appropriate \
         category. Read each description carefully.\n\n\
         Available categories: {vocabulary}\n\n\
         Rules:\n\
         - Restaurants, cafes, coffee shops, grocery stores and food delivery are Food & Dining.\n\
         - Fuel stations, rideshare, taxis, parking and tolls are Transportation.\n\
         - Phone, internet and utility providers are Utilities & Bills.\n\
         - Streaming services, budgeting apps and any recurring digital service are Subscriptions & Digital Services, not Utilities & Bills.\n\
         - Gyms, salons and spas are Personal Care.\n\
         - Bank transfers, fees and charges are Banking & Finance; ATM withdrawals are ATM & Cash Withdrawals.\n\
         - Salaries, deposits and refunds are Income.\n\
         - Hotels, airlines and rental cars are Travel.\n\
         - Use Other Expenses only when nothing fits.\n\n\
         Transactions to categorize:\n\
         {listing}\n\
         Respond ONLY with a JSON array of category names in the EXACT order of \
         transactions, nothing else.\n\
         Example format: [\"Food & Dining\", \"Transportation\", \"Shopping & Retail\"]"
    )
}

fn parse_labels(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(strip_code_fences(raw))
}

/// Positional apply: `labels[i]` → `batch[i]`. Indices beyond the returned
/// array keep their prior category, as do entries whose label is outside the
/// closed category set.
fn apply_labels(batch: &mut [Transaction], labels: &[String]) {
    for (tx, label) in batch.iter_mut().zip(labels) {
        match label.parse::<Category>() {
            Ok(category) => tx.category = category,
            Err(_) => {
                debug!(label = %label, "label outside the closed category set; keeping rule-based category");
            }
        }
    }
}
