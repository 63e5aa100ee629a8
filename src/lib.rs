//! # PDF Chapter Splitter
//!
//! Splits a PDF into one file per chapter using its bookmark outline, and
//! writes a CSV summary of the resulting page ranges. Pages no chapter
//! bookmark claims are written out as "Unidentified Pages" segments, so the
//! output always covers the whole document.
//!
//! ## Example Usage
//!
//! ```no_run
//! use pdf_chapter_splitter::{AutoConfirm, ChapterSplitter, SplitConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let splitter = ChapterSplitter::new(SplitConfig::default());
//!
//!     // Planning only, nothing is written
//!     let plan = splitter.plan(Path::new("book.pdf"))?;
//!     println!("{} segments", plan.segments.len());
//!
//!     if let Some(result) = splitter.run(Path::new("book.pdf"), &mut AutoConfirm(true))? {
//!         println!("Created {} files", result.output_files.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod services;
pub mod types;

// Re-export main types and services for easier usage
pub use error::{ChapterSplitterError, Result};
pub use services::{
    check_partition, AnchorNormalizer, ArtifactWriter, AutoConfirm, ClassificationRules, Confirm,
    DocumentSplitter, ManifestWriter, OutlineReader, PdfDocument, RangeCalculator, TerminalPrompt,
};
pub use types::{
    Anchor, DocumentMetadata, FallbackPolicy, OutlineEntry, Segment, SegmentKind, SkippedSegment,
    SplitConfig, SplitPlan, SplitResult,
};

use services::merge_segments;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs the whole split: plan, confirm, write artifacts, write manifest.
pub struct ChapterSplitter {
    config: SplitConfig,
}

impl ChapterSplitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn plan(&self, path: &Path) -> Result<SplitPlan> {
        let pdf = OutlineReader::open(path)?;
        self.plan_document(&pdf)
    }

    /// Planning phase. Reads bookmarks and derives the segments; touches
    /// nothing on disk.
    pub fn plan_document(&self, pdf: &PdfDocument) -> Result<SplitPlan> {
        let total_pages = pdf.total_pages();
        let entries = pdf.outline_entries()?;

        let normalizer = AnchorNormalizer::new(
            self.config.rules.clone(),
            self.config.max_depth,
            self.config.fallback,
        );
        let selected = normalizer.select(&entries)?;

        let (chapters, gaps) = RangeCalculator::calculate(&selected.anchors, total_pages);
        if chapters.is_empty() {
            return Err(ChapterSplitterError::EmptyPlan);
        }

        let chapter_count = chapters.len();
        let gap_count = gaps.len();
        let segments = merge_segments(chapters, gaps);
        check_partition(&segments, total_pages)?;

        info!(
            "Planned {} chapters and {} unidentified ranges over {} pages",
            chapter_count, gap_count, total_pages
        );

        let metadata = DocumentMetadata {
            filename: pdf
                .path()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document.pdf".to_string()),
            path: pdf.path().to_path_buf(),
            total_pages,
            outline_entries: entries.len(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        Ok(SplitPlan {
            metadata,
            segments,
            chapter_count,
            gap_count,
            fallback_used: selected.fallback_used,
            output_dir: self.output_dir_for(pdf.path()),
        })
    }

    /// `<output>/<basename>_chapters`, where `<output>` defaults to the
    /// directory holding the source file.
    pub fn output_dir_for(&self, source: &Path) -> PathBuf {
        let base = match &self.config.output_dir {
            Some(dir) => dir.clone(),
            None => source
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        base.join(format!("{}_chapters", source_basename(source)))
    }

    /// Plans, asks for confirmation, then writes. Returns `None` when the
    /// split is declined; nothing is written in that case.
    pub fn run(&self, path: &Path, confirm: &mut dyn Confirm) -> Result<Option<SplitResult>> {
        let pdf = OutlineReader::open(path)?;
        let plan = self.plan_document(&pdf)?;

        self.print_plan(&plan);

        let prompt = format!(
            "Split '{}' into {} files in {}?",
            plan.metadata.filename,
            plan.segments.len(),
            plan.output_dir.display()
        );
        if !confirm.confirm(&prompt)? {
            info!("Split cancelled, nothing was written");
            return Ok(None);
        }

        self.execute(&pdf, &plan).map(Some)
    }

    /// Write phase. A failed segment or manifest is logged and reported in
    /// the result; already written files are kept.
    pub fn execute(&self, source: &dyn ArtifactWriter, plan: &SplitPlan) -> Result<SplitResult> {
        let (output_files, skipped) = DocumentSplitter::split_document(
            source,
            &plan.segments,
            &plan.output_dir,
            self.config.sequence_prefix,
        )?;

        let rows = ManifestWriter::build_rows(&plan.segments, &self.config.rules);
        let manifest_path =
            ManifestWriter::manifest_path(&plan.output_dir, &source_basename(&plan.metadata.path));

        let manifest_file = match ManifestWriter::write_manifest(&manifest_path, &rows) {
            Ok(()) => Some(manifest_path),
            Err(e) => {
                error!(
                    "Failed to write chapter summary {}: {}",
                    manifest_path.display(),
                    e
                );
                None
            }
        };

        Ok(SplitResult {
            output_dir: plan.output_dir.clone(),
            output_files,
            skipped,
            manifest_file,
        })
    }

    pub fn print_plan(&self, plan: &SplitPlan) {
        println!("\n=== Split plan for '{}' ===", plan.metadata.filename);
        println!("Total pages: {}", plan.metadata.total_pages);
        println!("Bookmarks read: {}", plan.metadata.outline_entries);
        println!(
            "Chapters: {}, unidentified ranges: {}",
            plan.chapter_count, plan.gap_count
        );
        if plan.fallback_used {
            println!("Note: no chapter-level bookmarks matched, every bookmark is used");
        }
        println!("Output directory: {}", plan.output_dir.display());

        for (idx, segment) in plan.segments.iter().enumerate() {
            let filename = DocumentSplitter::generate_output_filename(
                &segment.name,
                idx + 1,
                plan.segments.len(),
                self.config.sequence_prefix,
            );
            println!(
                "  {}: pages {}-{} ({} pages)",
                filename, segment.start_page, segment.end_page, segment.page_count
            );
        }
    }
}

fn source_basename(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}
