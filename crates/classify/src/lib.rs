pub mod batch;
pub mod model;
pub mod rules;

pub use batch::{BatchCategorizer, BATCH_SIZE, PROMPT_DESCRIPTION_LIMIT};
pub use model::{strip_code_fences, LanguageModel, MockModel, ModelError, OpenAiModel};
pub use rules::RuleSet;
