use crate::error::Result;
use crate::services::ClassificationRules;
use crate::types::Segment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// One row of the chapter summary CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRow {
    #[serde(rename = "Chapter Number")]
    pub chapter_number: String,
    #[serde(rename = "Chapter Name")]
    pub chapter_name: String,
    #[serde(rename = "Start Page")]
    pub start_page: usize,
    #[serde(rename = "End Page")]
    pub end_page: usize,
    #[serde(rename = "Total Pages")]
    pub total_pages: usize,
}

pub struct ManifestWriter;

impl ManifestWriter {
    /// Rows in segment order. Segments without a chapter or appendix key
    /// are labelled `"Unidentified <row>"`, counting rows from 1.
    pub fn build_rows(segments: &[Segment], rules: &ClassificationRules) -> Vec<ManifestRow> {
        segments
            .iter()
            .enumerate()
            .map(|(idx, segment)| ManifestRow {
                chapter_number: rules
                    .canonical_key(&segment.name)
                    .unwrap_or_else(|| format!("Unidentified {}", idx + 1)),
                chapter_name: segment.name.clone(),
                start_page: segment.start_page,
                end_page: segment.end_page,
                total_pages: segment.page_count,
            })
            .collect()
    }

    pub fn manifest_path(output_dir: &Path, source_basename: &str) -> PathBuf {
        output_dir.join(format!("{}_chapter_summary.csv", source_basename))
    }

    pub fn write_manifest(path: &Path, rows: &[ManifestRow]) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!("Generated chapter summary: {} ({} rows)", path.display(), rows.len());
        Ok(())
    }
}
