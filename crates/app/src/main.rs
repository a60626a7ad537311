use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use ledgerlens_classify::{LanguageModel, OpenAiModel, RuleSet};

/// Normalize a bank statement (spreadsheet or PDF) into categorized
/// transactions and print the result as JSON.
#[derive(Parser)]
#[command(name = "ledgerlens", version, about)]
struct Args {
    /// Statement file to process (.xlsx/.xlsm/.xls/.ods workbook or .pdf)
    statement: PathBuf,

    /// Skip model-backed categorization even when OPENAI_API_KEY is set
    #[arg(long)]
    no_ai: bool,

    /// Chat model used for classification and PDF extraction
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let model = if args.no_ai {
        None
    } else {
        match std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()) {
            Some(key) => Some(OpenAiModel::new(key, &args.model)?),
            None => {
                tracing::warn!("OPENAI_API_KEY not set; running with rule-based categories only");
                None
            }
        }
    };
    let model_ref: Option<&dyn LanguageModel> = model.as_ref().map(|m| m as &dyn LanguageModel);

    let rules = RuleSet::builtin();
    let extension = args
        .statement
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    let result = match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => {
            ledgerlens_import::process_workbook_path(&args.statement, rules, model_ref)
                .with_context(|| format!("processing {}", args.statement.display()))?
        }
        "pdf" => {
            let bytes = std::fs::read(&args.statement)
                .with_context(|| format!("reading {}", args.statement.display()))?;
            let backend = ledgerlens_extract::default_backend()?;
            ledgerlens_extract::process_pdf(&bytes, backend.as_ref(), rules, model_ref)?
        }
        other => bail!("Unsupported statement format: '.{other}' (expected a spreadsheet or PDF)"),
    };

    println!("{}", serde_json::to_string_pretty(&result.report())?);
    Ok(())
}
