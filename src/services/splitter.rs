use crate::error::{ChapterSplitterError, Result};
use crate::services::PdfDocument;
use crate::types::{Segment, SkippedSegment};
use lopdf::Object;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Produces one output artifact from a closed, 0-based page range of a
/// source document.
pub trait ArtifactWriter {
    fn total_pages(&self) -> usize;

    fn write_pages(&self, start_index: usize, end_index: usize, output_path: &Path) -> Result<()>;
}

impl ArtifactWriter for PdfDocument {
    fn total_pages(&self) -> usize {
        PdfDocument::total_pages(self)
    }

    fn write_pages(&self, start_index: usize, end_index: usize, output_path: &Path) -> Result<()> {
        let total = PdfDocument::total_pages(self);
        if start_index > end_index || end_index >= total {
            return Err(ChapterSplitterError::InvalidRange {
                start: start_index + 1,
                end: end_index + 1,
                total,
            });
        }

        let mut doc = self.document().clone();

        // Bookmarks of the source would point at deleted pages.
        let root = match doc.trailer.get(b"Root") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        };
        if let Some(root) = root {
            if let Ok(Object::Dictionary(catalog)) = doc.get_object_mut(root) {
                catalog.remove(b"Outlines");
            }
        }

        let to_delete: Vec<u32> = (1..=total as u32)
            .filter(|number| {
                let index = *number as usize - 1;
                index < start_index || index > end_index
            })
            .collect();

        doc.delete_pages(&to_delete);
        doc.prune_objects();
        doc.compress();
        doc.save(output_path)?;

        Ok(())
    }
}

pub struct DocumentSplitter;

impl DocumentSplitter {
    /// Writes one file per segment into `output_dir`. A segment that fails
    /// validation or writing is skipped and reported; the rest still run.
    pub fn split_document(
        source: &dyn ArtifactWriter,
        segments: &[Segment],
        output_dir: &Path,
        sequence_prefix: bool,
    ) -> Result<(Vec<PathBuf>, Vec<SkippedSegment>)> {
        info!(
            "Writing {} segments to {}",
            segments.len(),
            output_dir.display()
        );

        Self::ensure_output_directory(output_dir)?;

        let total_pages = source.total_pages();
        let mut output_files = Vec::new();
        let mut skipped = Vec::new();
        let mut used_names = HashSet::new();

        for (idx, segment) in segments.iter().enumerate() {
            if let Err(e) = Self::validate_segment(segment, total_pages) {
                warn!("Skipping '{}': {}", segment.name, e);
                skipped.push(SkippedSegment {
                    name: segment.name.clone(),
                    reason: e.to_string(),
                });
                continue;
            }

            let filename = Self::generate_output_filename(
                &segment.name,
                idx + 1,
                segments.len(),
                sequence_prefix,
            );
            let filename = Self::unique_filename(filename, &mut used_names);
            let output_path = output_dir.join(&filename);

            match source.write_pages(segment.start_page - 1, segment.end_page - 1, &output_path) {
                Ok(()) => {
                    info!(
                        "Created {} (pages {}-{})",
                        filename, segment.start_page, segment.end_page
                    );
                    output_files.push(output_path);
                }
                Err(e) => {
                    warn!("Failed to write '{}': {}", output_path.display(), e);
                    skipped.push(SkippedSegment {
                        name: segment.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok((output_files, skipped))
    }

    pub fn validate_segment(segment: &Segment, total_pages: usize) -> Result<()> {
        if segment.start_page < 1
            || segment.start_page > segment.end_page
            || segment.end_page > total_pages
        {
            return Err(ChapterSplitterError::InvalidRange {
                start: segment.start_page,
                end: segment.end_page,
                total: total_pages,
            });
        }
        Ok(())
    }

    pub fn ensure_output_directory(output_dir: &Path) -> Result<()> {
        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir).map_err(|e| {
                ChapterSplitterError::OutputDirectory {
                    reason: format!("Failed to create {}: {}", output_dir.display(), e),
                }
            })?;
            info!("Created output directory: {}", output_dir.display());
        }
        Ok(())
    }

    /// `"<n>_<name>.pdf"` with `n` zero-padded to the width of
    /// `total_segments`, or `"<name>.pdf"` without a sequence prefix.
    pub fn generate_output_filename(
        name: &str,
        position: usize,
        total_segments: usize,
        sequence_prefix: bool,
    ) -> String {
        let name = sanitize_filename(name);
        if sequence_prefix {
            format!(
                "{:0width$}_{}.pdf",
                position,
                name,
                width = total_segments.to_string().len()
            )
        } else {
            format!("{}.pdf", name)
        }
    }

    fn unique_filename(filename: String, used: &mut HashSet<String>) -> String {
        if used.insert(filename.clone()) {
            return filename;
        }

        let stem = filename.trim_end_matches(".pdf");
        let mut counter = 2;
        loop {
            let candidate = format!("{} ({}).pdf", stem, counter);
            if used.insert(candidate.clone()) {
                debug!("Renamed duplicate output '{}' to '{}'", filename, candidate);
                return candidate;
            }
            counter += 1;
        }
    }
}

/// Replaces characters that are not allowed in file names.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim().trim_end_matches('.').trim_end();
    if cleaned.is_empty() {
        "Untitled".to_string()
    } else {
        cleaned.to_string()
    }
}
