use crate::services::ClassificationRules;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A bookmark as read from the document outline, before page resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub title: String,
    pub page_index: Option<usize>,
    pub depth: usize,
}

/// A bookmark bound to a 0-based page index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub title: String,
    pub page_index: usize,
    pub depth: usize,
}

impl Anchor {
    pub fn new(title: impl Into<String>, page_index: usize, depth: usize) -> Self {
        Self {
            title: title.into(),
            page_index,
            depth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Chapter,
    Unidentified,
}

/// A named, closed page range. Page numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub start_page: usize,
    pub end_page: usize,
    pub page_count: usize,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn new(name: impl Into<String>, start_page: usize, end_page: usize, kind: SegmentKind) -> Self {
        Self {
            name: name.into(),
            start_page,
            end_page,
            page_count: (end_page + 1).saturating_sub(start_page),
            kind,
        }
    }

    pub fn chapter(name: impl Into<String>, start_page: usize, end_page: usize) -> Self {
        Self::new(name, start_page, end_page, SegmentKind::Chapter)
    }

    pub fn unidentified(start_page: usize, end_page: usize) -> Self {
        Self::new(
            format!("Unidentified Pages {}-{}", start_page, end_page),
            start_page,
            end_page,
            SegmentKind::Unidentified,
        )
    }

    pub fn is_unidentified(&self) -> bool {
        self.kind == SegmentKind::Unidentified
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub filename: String,
    pub path: PathBuf,
    pub total_pages: usize,
    pub outline_entries: usize,
    pub created_at: String,
}

/// What to do when no bookmark survives the classification filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackPolicy {
    /// Use every bookmark with a resolved page, at any depth.
    #[default]
    Unfiltered,
    /// Fail the run with `NoChapters`.
    Strict,
}

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub output_dir: Option<PathBuf>,
    pub sequence_prefix: bool,
    pub max_depth: usize,
    pub fallback: FallbackPolicy,
    pub rules: ClassificationRules,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            sequence_prefix: true,
            max_depth: 0,
            fallback: FallbackPolicy::default(),
            rules: ClassificationRules::default(),
        }
    }
}

/// Outcome of the planning phase. Nothing has been written yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitPlan {
    pub metadata: DocumentMetadata,
    pub segments: Vec<Segment>,
    pub chapter_count: usize,
    pub gap_count: usize,
    pub fallback_used: bool,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedSegment {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct SplitResult {
    pub output_dir: PathBuf,
    pub output_files: Vec<PathBuf>,
    pub skipped: Vec<SkippedSegment>,
    pub manifest_file: Option<PathBuf>,
}
