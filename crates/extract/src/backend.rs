use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parse error: {0}")]
    Parse(String),
    #[error("No PDF extraction backend available — build with the `pdf-extract` feature")]
    NotAvailable,
}

/// One tabular region recovered from a PDF page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfTable {
    pub page: u32,
    pub data: Vec<Vec<String>>,
}

/// Everything an extraction backend recovers from a statement PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfContent {
    pub text: String,
    pub tables: Vec<PdfTable>,
}

impl PdfContent {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.tables.is_empty()
    }
}

/// Abstraction over the PDF text/table extraction mechanics. Implementations
/// take raw statement bytes and return whatever text and tabular structure
/// they can recover.
pub trait PdfBackend: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<PdfContent, PdfError>;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns pre-set content — lets the extraction pipeline be tested without
/// real PDF bytes.
pub struct MockPdfBackend {
    content: PdfContent,
}

impl MockPdfBackend {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            content: PdfContent { text: text.into(), tables: vec![] },
        }
    }

    pub fn with_tables(text: impl Into<String>, tables: Vec<PdfTable>) -> Self {
        Self {
            content: PdfContent { text: text.into(), tables },
        }
    }
}

impl PdfBackend for MockPdfBackend {
    fn extract(&self, _bytes: &[u8]) -> Result<PdfContent, PdfError> {
        Ok(self.content.clone())
    }
}

// ── pdf-extract backend (optional, gated behind `pdf-extract` feature) ────────

#[cfg(feature = "pdf-extract")]
pub mod pdf_extract_backend {
    use super::{PdfBackend, PdfContent, PdfError};

    /// Text-only backend; tabular structure is not recovered, which the
    /// downstream prompt and fallback scanner both tolerate.
    pub struct PdfExtractBackend;

    impl PdfBackend for PdfExtractBackend {
        fn extract(&self, bytes: &[u8]) -> Result<PdfContent, PdfError> {
            let text = pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| PdfError::Parse(e.to_string()))?;
            Ok(PdfContent { text, tables: vec![] })
        }
    }
}

/// The backend compiled into this build, if any.
pub fn default_backend() -> Result<Box<dyn PdfBackend>, PdfError> {
    #[cfg(feature = "pdf-extract")]
    {
        Ok(Box::new(pdf_extract_backend::PdfExtractBackend))
    }
    #[cfg(not(feature = "pdf-extract"))]
    {
        Err(PdfError::NotAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_preset_content() {
        let backend = MockPdfBackend::new("01/02/2024 CARREFOUR 50.00");
        let content = backend.extract(b"ignored").unwrap();
        assert_eq!(content.text, "01/02/2024 CARREFOUR 50.00");
        assert!(content.tables.is_empty());
    }

    #[test]
    fn empty_content_is_detected() {
        assert!(PdfContent::default().is_empty());
        assert!(PdfContent { text: "  \n ".into(), tables: vec![] }.is_empty());
        assert!(!PdfContent { text: "x".into(), tables: vec![] }.is_empty());
        let with_table = PdfContent {
            text: String::new(),
            tables: vec![PdfTable { page: 1, data: vec![] }],
        };
        assert!(!with_table.is_empty());
    }
}
