pub mod calculator;
pub mod confirm;
pub mod manifest;
pub mod normalizer;
pub mod outline;
pub mod rules;
pub mod splitter;

#[cfg(test)]
pub(crate) mod test_support;

pub use calculator::{check_partition, find_gaps, merge_segments, RangeCalculator};
pub use confirm::{AutoConfirm, Confirm, TerminalPrompt};
pub use manifest::{ManifestRow, ManifestWriter};
pub use normalizer::{AnchorNormalizer, NormalizedAnchors};
pub use outline::{OutlineReader, PdfDocument};
pub use rules::{ClassificationRule, ClassificationRules, RuleAction};
pub use splitter::{sanitize_filename, ArtifactWriter, DocumentSplitter};
