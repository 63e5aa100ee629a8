use crate::error::{ChapterSplitterError, Result};
use crate::types::{Anchor, Segment};
use tracing::{debug, warn};

pub struct RangeCalculator;

impl RangeCalculator {
    /// Derives chapter segments from anchors and fills every uncovered page
    /// run with an unidentified segment. Returns `(chapters, gaps)`, both in
    /// page order.
    pub fn calculate(anchors: &[Anchor], total_pages: usize) -> (Vec<Segment>, Vec<Segment>) {
        let mut sorted: Vec<&Anchor> = anchors
            .iter()
            .filter(|anchor| {
                if anchor.page_index >= total_pages {
                    warn!(
                        "Dropping bookmark '{}': page {} is past the end of the document ({} pages)",
                        anchor.title,
                        anchor.page_index + 1,
                        total_pages
                    );
                    return false;
                }
                true
            })
            .collect();

        // Stable: anchors sharing a page keep their outline order.
        sorted.sort_by_key(|anchor| anchor.page_index);

        let mut chapters = Vec::new();
        let mut ranges = Vec::new();

        for (idx, anchor) in sorted.iter().enumerate() {
            let start_index = anchor.page_index;
            let end_index = match sorted.get(idx + 1) {
                Some(next) => next.page_index.checked_sub(1),
                None => total_pages.checked_sub(1),
            };

            let end_index = match end_index {
                Some(end_index) if start_index <= end_index => end_index,
                _ => {
                    warn!(
                        "Skipping bookmark '{}': it shares page {} with the next bookmark",
                        anchor.title,
                        start_index + 1
                    );
                    continue;
                }
            };

            debug!("Chapter '{}': pages {}-{}", anchor.title, start_index + 1, end_index + 1);
            chapters.push(Segment::chapter(anchor.title.clone(), start_index + 1, end_index + 1));
            ranges.push((start_index, end_index));
        }

        ranges.sort_unstable();
        let gaps = find_gaps(&ranges, total_pages)
            .into_iter()
            .map(|(start, end)| {
                debug!("Unidentified pages {}-{}", start + 1, end + 1);
                Segment::unidentified(start + 1, end + 1)
            })
            .collect();

        (chapters, gaps)
    }

    /// Calculates and merges into a single page-ordered sequence.
    pub fn plan_segments(anchors: &[Anchor], total_pages: usize) -> Vec<Segment> {
        let (chapters, gaps) = Self::calculate(anchors, total_pages);
        merge_segments(chapters, gaps)
    }
}

/// Uncovered runs of `[0, total_pages)` given sorted, non-overlapping,
/// 0-based inclusive ranges.
pub fn find_gaps(ranges: &[(usize, usize)], total_pages: usize) -> Vec<(usize, usize)> {
    let mut gaps = Vec::new();
    let mut cursor = 0;

    for &(start, end) in ranges {
        if start > cursor {
            gaps.push((cursor, start - 1));
        }
        cursor = cursor.max(end + 1);
    }

    if cursor < total_pages {
        gaps.push((cursor, total_pages - 1));
    }

    gaps
}

pub fn merge_segments(chapters: Vec<Segment>, gaps: Vec<Segment>) -> Vec<Segment> {
    let mut segments = chapters;
    segments.extend(gaps);
    segments.sort_by_key(|segment| segment.start_page);
    segments
}

/// Checks that `segments` tile `[1, total_pages]` exactly, in order.
pub fn check_partition(segments: &[Segment], total_pages: usize) -> Result<()> {
    let violation = |reason: String| Err(ChapterSplitterError::PartitionViolation { reason });

    let mut expected_start = 1;
    for segment in segments {
        if segment.start_page != expected_start {
            return violation(format!(
                "'{}' starts at page {}, expected {}",
                segment.name, segment.start_page, expected_start
            ));
        }
        if segment.end_page < segment.start_page {
            return violation(format!(
                "'{}' ends at page {} before it starts at page {}",
                segment.name, segment.end_page, segment.start_page
            ));
        }
        expected_start = segment.end_page + 1;
    }

    if expected_start != total_pages + 1 {
        return violation(format!(
            "segments end at page {}, document has {} pages",
            expected_start - 1,
            total_pages
        ));
    }

    Ok(())
}
