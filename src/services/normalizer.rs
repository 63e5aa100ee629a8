use crate::error::{ChapterSplitterError, Result};
use crate::services::ClassificationRules;
use crate::types::{Anchor, FallbackPolicy, OutlineEntry};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Anchors chosen for splitting, and whether they came from the fallback.
#[derive(Debug, Clone)]
pub struct NormalizedAnchors {
    pub anchors: Vec<Anchor>,
    pub fallback_used: bool,
}

/// Turns raw outline entries into the chapter-level anchors that drive
/// the split.
pub struct AnchorNormalizer {
    rules: ClassificationRules,
    max_depth: usize,
    fallback: FallbackPolicy,
}

impl AnchorNormalizer {
    pub fn new(rules: ClassificationRules, max_depth: usize, fallback: FallbackPolicy) -> Self {
        Self {
            rules,
            max_depth,
            fallback,
        }
    }

    /// Drops entries whose destination could not be resolved to a page.
    pub fn resolve_pages(entries: &[OutlineEntry]) -> Vec<Anchor> {
        entries
            .iter()
            .filter_map(|entry| match entry.page_index {
                Some(page_index) => Some(Anchor::new(entry.title.clone(), page_index, entry.depth)),
                None => {
                    warn!("Dropping bookmark '{}': destination page could not be resolved", entry.title);
                    None
                }
            })
            .collect()
    }

    /// Depth restriction, classification and chapter-key deduplication.
    /// The first anchor with a given key wins; anchors without a key are
    /// never deduplicated.
    pub fn filter_chapters(&self, anchors: &[Anchor]) -> Vec<Anchor> {
        let mut seen_keys = HashSet::new();
        let mut kept = Vec::new();

        for anchor in anchors {
            if anchor.depth > self.max_depth {
                continue;
            }

            if !self.rules.is_chapter_level(&anchor.title, anchor.depth) {
                debug!("Skipping non-chapter bookmark '{}' (depth {})", anchor.title, anchor.depth);
                continue;
            }

            if let Some(key) = self.rules.canonical_key(&anchor.title) {
                if !seen_keys.insert(key.clone()) {
                    debug!(
                        "Skipping duplicate bookmark '{}' on page {} ({} already seen)",
                        anchor.title,
                        anchor.page_index + 1,
                        key
                    );
                    continue;
                }
            }

            kept.push(anchor.clone());
        }

        kept
    }

    pub fn normalize(&self, entries: &[OutlineEntry]) -> Vec<Anchor> {
        self.filter_chapters(&Self::resolve_pages(entries))
    }

    /// Normalizes and applies the fallback policy when nothing survives
    /// the filter.
    pub fn select(&self, entries: &[OutlineEntry]) -> Result<NormalizedAnchors> {
        let resolved = Self::resolve_pages(entries);
        if resolved.is_empty() {
            return Err(ChapterSplitterError::NoAnchors);
        }

        let anchors = self.filter_chapters(&resolved);
        if !anchors.is_empty() {
            info!(
                "Selected {} chapter-level bookmarks out of {} (max depth {})",
                anchors.len(),
                resolved.len(),
                self.max_depth
            );
            return Ok(NormalizedAnchors {
                anchors,
                fallback_used: false,
            });
        }

        match self.fallback {
            FallbackPolicy::Unfiltered => {
                warn!(
                    "No chapter-level bookmarks found; falling back to all {} bookmarks at every depth",
                    resolved.len()
                );
                Ok(NormalizedAnchors {
                    anchors: resolved,
                    fallback_used: true,
                })
            }
            FallbackPolicy::Strict => Err(ChapterSplitterError::NoChapters),
        }
    }
}

impl Default for AnchorNormalizer {
    fn default() -> Self {
        Self::new(ClassificationRules::default(), 0, FallbackPolicy::default())
    }
}
