use crate::error::{ChapterSplitterError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Include,
    Exclude,
}

#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub pattern: Regex,
    pub action: RuleAction,
}

impl ClassificationRule {
    pub fn new(pattern: &str, action: RuleAction) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| ChapterSplitterError::InvalidRule {
            reason: format!("'{}': {}", pattern, e),
        })?;
        Ok(Self { pattern, action })
    }
}

// Chapter and appendix headings are checked before the exclusions so that
// a heading is kept even when a back-matter pattern would also match.
const DEFAULT_RULES: &[(&str, RuleAction)] = &[
    (r"(?i)^\s*chapter\s+\d+\b", RuleAction::Include),
    (r"(?i)^\s*appendix\s+[a-z]\b", RuleAction::Include),
    (r"^\s*\d+\.\d+", RuleAction::Exclude),
    (
        r"(?i)^\s*(glossary|references|index|solutions|review questions|critical thinking questions|self-check questions|key concepts)",
        RuleAction::Exclude,
    ),
];

const DEFAULT_KEY_PATTERN: &str = r"(?i)^\s*(chapter|appendix)\s+(\d+|[a-z])\b";

/// Ordered `(pattern, action)` table deciding which bookmarks become
/// chapter segments. The first matching rule wins; a title no rule matches
/// is kept only at the top outline level.
#[derive(Debug, Clone)]
pub struct ClassificationRules {
    rules: Vec<ClassificationRule>,
    key_pattern: Regex,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    rules: Vec<RuleSpec>,
    #[serde(default)]
    key_pattern: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RuleSpec {
    pattern: String,
    action: RuleAction,
}

impl ClassificationRules {
    pub fn new(rules: Vec<ClassificationRule>, key_pattern: &str) -> Result<Self> {
        let key_pattern = Regex::new(key_pattern)?;

        // Group 1 is the kind ("Chapter"), group 2 the identifier ("3").
        if key_pattern.captures_len() < 3 {
            return Err(ChapterSplitterError::InvalidRule {
                reason: format!(
                    "key pattern '{}' needs two capture groups (kind, identifier)",
                    key_pattern.as_str()
                ),
            });
        }

        Ok(Self { rules, key_pattern })
    }

    /// Loads a rule table from JSON:
    /// `{"rules": [{"pattern": "...", "action": "include"}], "key_pattern": "..."}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        info!("Loading classification rules from: {}", path.display());

        if !path.exists() {
            return Err(ChapterSplitterError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: RuleFile = serde_json::from_str(content)?;

        let rules = file
            .rules
            .iter()
            .map(|spec| ClassificationRule::new(&spec.pattern, spec.action))
            .collect::<Result<Vec<_>>>()?;

        debug!("Loaded {} classification rules", rules.len());

        Self::new(
            rules,
            file.key_pattern.as_deref().unwrap_or(DEFAULT_KEY_PATTERN),
        )
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Returns true if a bookmark with this title at this depth is a
    /// chapter-level entry.
    pub fn is_chapter_level(&self, title: &str, depth: usize) -> bool {
        match self.rules.iter().find(|rule| rule.pattern.is_match(title)) {
            Some(rule) => rule.action == RuleAction::Include,
            None => depth == 0,
        }
    }

    /// Canonical `"Chapter 3"` / `"Appendix A"` key for a title, if it has one.
    pub fn canonical_key(&self, title: &str) -> Option<String> {
        let captures = self.key_pattern.captures(title)?;
        let kind = captures.get(1)?.as_str();
        let identifier = captures.get(2)?.as_str();

        let mut chars = kind.chars();
        let kind: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
            None => String::new(),
        };

        Some(format!("{} {}", kind, identifier.to_uppercase()))
    }
}

impl Default for ClassificationRules {
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|(pattern, action)| ClassificationRule {
                pattern: Regex::new(pattern).unwrap(),
                action: *action,
            })
            .collect();

        Self {
            rules,
            key_pattern: Regex::new(DEFAULT_KEY_PATTERN).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_rules_keep_chapters_and_appendices() {
        let rules = ClassificationRules::default();

        assert!(rules.is_chapter_level("Chapter 1", 0));
        assert!(rules.is_chapter_level("CHAPTER 12: Thermodynamics", 0));
        assert!(rules.is_chapter_level("Appendix A", 0));
        // Headings are kept below the top level as well.
        assert!(rules.is_chapter_level("Chapter 4", 1));
    }

    #[test]
    fn test_default_rules_drop_subsections_and_back_matter() {
        let rules = ClassificationRules::default();

        assert!(!rules.is_chapter_level("1.1 Subsection", 0));
        assert!(!rules.is_chapter_level("12.4 Entropy", 0));
        assert!(!rules.is_chapter_level("Glossary", 0));
        assert!(!rules.is_chapter_level("references", 0));
        assert!(!rules.is_chapter_level("Index", 0));
        assert!(!rules.is_chapter_level("Review Questions", 0));
        assert!(!rules.is_chapter_level("Key Concepts and Summary", 0));
    }

    #[test]
    fn test_unmatched_titles_depend_on_depth() {
        let rules = ClassificationRules::default();

        assert!(rules.is_chapter_level("Preface", 0));
        assert!(!rules.is_chapter_level("Preface", 1));
    }

    #[test]
    fn test_canonical_key() {
        let rules = ClassificationRules::default();

        assert_eq!(rules.canonical_key("Chapter 3 Motion").as_deref(), Some("Chapter 3"));
        assert_eq!(rules.canonical_key("chapter 3").as_deref(), Some("Chapter 3"));
        assert_eq!(rules.canonical_key("APPENDIX b: Units").as_deref(), Some("Appendix B"));
        assert_eq!(rules.canonical_key("Preface"), None);
        assert_eq!(rules.canonical_key("1.1 Subsection"), None);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = ClassificationRules::new(
            vec![
                ClassificationRule::new(r"^Index of", RuleAction::Include).unwrap(),
                ClassificationRule::new(r"^Index", RuleAction::Exclude).unwrap(),
            ],
            DEFAULT_KEY_PATTERN,
        )
        .unwrap();

        assert!(rules.is_chapter_level("Index of Symbols", 3));
        assert!(!rules.is_chapter_level("Index", 0));
    }

    #[test]
    fn test_rules_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"rules": [
                {{"pattern": "(?i)^part\\s+[ivx]+", "action": "include"}},
                {{"pattern": "(?i)^exercises", "action": "exclude"}}
            ]}}"#
        )
        .unwrap();

        let rules = ClassificationRules::from_json_file(file.path()).unwrap();

        assert_eq!(rules.rules().len(), 2);
        assert!(rules.is_chapter_level("Part IV", 2));
        assert!(!rules.is_chapter_level("Exercises", 0));
        // Default key pattern is used when none is given.
        assert_eq!(rules.canonical_key("Chapter 7").as_deref(), Some("Chapter 7"));
    }

    #[test]
    fn test_invalid_rules_are_rejected() {
        let bad_pattern = r#"{"rules": [{"pattern": "(unclosed", "action": "include"}]}"#;
        assert!(matches!(
            ClassificationRules::from_json(bad_pattern),
            Err(ChapterSplitterError::InvalidRule { .. })
        ));

        let bad_key = r#"{"rules": [], "key_pattern": "^Chapter \\d+"}"#;
        assert!(matches!(
            ClassificationRules::from_json(bad_key),
            Err(ChapterSplitterError::InvalidRule { .. })
        ));

        let missing = ClassificationRules::from_json_file(Path::new("/nonexistent/rules.json"));
        assert!(matches!(missing, Err(ChapterSplitterError::FileNotFound { .. })));
    }
}
