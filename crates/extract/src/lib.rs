pub mod ai;
pub mod backend;
pub mod pipeline;
pub mod scan;

pub use ai::{ai_extract, build_extraction_prompt, AiExtractionError, ExtractedStatement};
pub use backend::{default_backend, MockPdfBackend, PdfBackend, PdfContent, PdfError, PdfTable};
pub use pipeline::{process_pdf, ExtractError};
pub use scan::fallback_extract;
