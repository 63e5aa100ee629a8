use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChapterSplitterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to load PDF '{path}': {reason}")]
    PdfLoad { path: String, reason: String },

    #[error("PDF '{path}' is encrypted")]
    Encrypted { path: String },

    #[error("PDF '{path}' has no pages")]
    EmptyDocument { path: String },

    #[error("No bookmarks (outline) found in '{path}'")]
    NoOutline { path: String },

    #[error("No bookmark points to a page of the document")]
    NoAnchors,

    #[error("No chapter-level bookmarks survived filtering")]
    NoChapters,

    #[error("No segments could be derived from the bookmarks")]
    EmptyPlan,

    #[error("Segments do not cover the document: {reason}")]
    PartitionViolation { reason: String },

    #[error("Invalid classification rule: {reason}")]
    InvalidRule { reason: String },

    #[error("Invalid page range {start}-{end} (document has {total} pages)")]
    InvalidRange { start: usize, end: usize, total: usize },

    #[error("Output directory error: {reason}")]
    OutputDirectory { reason: String },

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl From<regex::Error> for ChapterSplitterError {
    fn from(e: regex::Error) -> Self {
        ChapterSplitterError::InvalidRule {
            reason: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChapterSplitterError>;
