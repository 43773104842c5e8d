//! Fingerprint rule set. Ordered vendor/device-type regexes matched against free text
//! collected from a device (TLS subject/issuer, HTTP banners, page bodies).
//!
//! All patterns are compiled case-insensitively, whether or not the source string
//! carries an inline `(?i)`. Rules keep their source position as priority: the first
//! rule that matches wins.

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::error::LoadError;
use crate::evidence::TextArtifact;

/// Raw fingerprint rule as read from a rule file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FingerprintRuleEntry {
    pub regex: String,
    pub vendor: String,
    pub device_type: String,
}

impl FingerprintRuleEntry {
    pub fn new(
        regex: impl Into<String>,
        vendor: impl Into<String>,
        device_type: impl Into<String>,
    ) -> Self {
        Self {
            regex: regex.into(),
            vendor: vendor.into(),
            device_type: device_type.into(),
        }
    }
}

/// Compiled fingerprint rule
#[derive(Debug, Clone)]
pub struct FingerprintRule {
    pattern: Regex,
    vendor: String,
    device_type: String,
    priority: usize,
}

impl FingerprintRule {
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    /// Position in the source list; lower wins
    pub fn priority(&self) -> usize {
        self.priority
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Unanchored search anywhere in `text`
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// A rule hit, tagged with the label of the artifact that produced it
#[derive(Debug, Clone, Copy)]
pub struct FingerprintMatch<'a> {
    pub rule: &'a FingerprintRule,
    pub source: &'a str,
}

/// Immutable, priority-ordered list of compiled rules
#[derive(Debug, Clone, Default)]
pub struct FingerprintRuleSet {
    rules: Vec<FingerprintRule>,
    max_text_len: Option<usize>,
}

impl FingerprintRuleSet {
    /// Compile every entry, preserving source order as priority.
    pub fn load<I>(entries: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = FingerprintRuleEntry>,
    {
        let rules = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| compile_rule(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(rules = rules.len(), "compiled fingerprint rules");
        Ok(Self {
            rules,
            max_text_len: None,
        })
    }

    /// Only the first `max_text_len` bytes of each text are searched.
    pub fn with_max_text_len(mut self, max_text_len: usize) -> Self {
        self.max_text_len = Some(max_text_len);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[FingerprintRule] {
        &self.rules
    }

    /// First rule, in priority order, that matches anywhere in `text`.
    /// Blank text never matches.
    pub fn match_first(&self, text: &str) -> Option<&FingerprintRule> {
        let text = match self.max_text_len {
            Some(limit) => truncate_at_char_boundary(text, limit),
            None => text,
        };
        if text.trim().is_empty() {
            return None;
        }
        self.rules.iter().find(|rule| rule.is_match(text))
    }

    /// Apply `match_first` to each artifact in the order given and return the first hit.
    /// Artifact order is the caller's precedence (e.g. TLS subject before HTTP body).
    pub fn match_any<'a>(&'a self, artifacts: &'a [TextArtifact]) -> Option<FingerprintMatch<'a>> {
        artifacts.iter().find_map(|artifact| {
            self.match_first(&artifact.text).map(|rule| {
                tracing::trace!(
                    source = %artifact.source,
                    vendor = %rule.vendor,
                    pattern = rule.pattern(),
                    priority = rule.priority,
                    "fingerprint rule matched"
                );
                FingerprintMatch {
                    rule,
                    source: artifact.source.as_str(),
                }
            })
        })
    }
}

fn compile_rule(index: usize, entry: FingerprintRuleEntry) -> Result<FingerprintRule, LoadError> {
    let pattern = RegexBuilder::new(&entry.regex)
        .case_insensitive(true)
        .build()
        .map_err(|source| LoadError::InvalidPattern {
            index,
            vendor: entry.vendor.clone(),
            source,
        })?;

    Ok(FingerprintRule {
        pattern,
        vendor: entry.vendor,
        device_type: entry.device_type,
        priority: index,
    })
}

/// Longest prefix of `text` no longer than `limit` bytes that ends on a char boundary
fn truncate_at_char_boundary(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::sources;

    fn sample_rules() -> FingerprintRuleSet {
        FingerprintRuleSet::load(vec![
            FingerprintRuleEntry::new("(?i)cisco", "Cisco", "Router"),
            FingerprintRuleEntry::new("(?i)unifi", "Ubiquiti", "Access Point"),
            FingerprintRuleEntry::new("(?i)ubnt", "Ubiquiti", "Router"),
            FingerprintRuleEntry::new("yealink", "Yealink", "VoIP Phone"),
        ])
        .unwrap()
    }

    #[test]
    fn test_priority_is_source_order() {
        let rules = sample_rules();
        let priorities: Vec<usize> = rules.rules().iter().map(|r| r.priority()).collect();
        assert_eq!(priorities, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_case_insensitive_without_inline_flag() {
        let rules = sample_rules();
        for text in ["YEALINK", "yealink", "Yealink", "SIP-T46S Yealink phone"] {
            let rule = rules.match_first(text).unwrap();
            assert_eq!(rule.vendor(), "Yealink", "text {:?}", text);
        }
    }

    #[test]
    fn test_substring_search() {
        let rules = sample_rules();
        let rule = rules.match_first("O=Cisco Systems Inc.").unwrap();
        assert_eq!(rule.vendor(), "Cisco");
        assert_eq!(rule.device_type(), "Router");
    }

    #[test]
    fn test_earlier_rule_wins_on_overlap() {
        let rules = sample_rules();
        let rule = rules.match_first("ubnt unifi controller").unwrap();
        assert_eq!(rule.device_type(), "Access Point");

        let rule = rules.match_first("ubnt edgeos").unwrap();
        assert_eq!(rule.device_type(), "Router");
    }

    #[test]
    fn test_blank_text_never_matches() {
        let rules = FingerprintRuleSet::load(vec![FingerprintRuleEntry::new(".*", "Any", "Any")])
            .unwrap();
        assert!(rules.match_first("").is_none());
        assert!(rules.match_first("   \n\t").is_none());
    }

    #[test]
    fn test_no_match() {
        let rules = sample_rules();
        assert!(rules.match_first("nginx/1.24.0").is_none());
    }

    #[test]
    fn test_pattern_keeps_source_text() {
        let rules = sample_rules();
        assert_eq!(rules.rules()[0].pattern(), "(?i)cisco");
        assert_eq!(rules.rules()[3].pattern(), "yealink");
    }

    #[test]
    fn test_invalid_pattern_names_rule() {
        let result = FingerprintRuleSet::load(vec![
            FingerprintRuleEntry::new("(?i)cisco", "Cisco", "Router"),
            FingerprintRuleEntry::new("(?i)broken[", "Acme", "Widget"),
        ]);
        match result {
            Err(LoadError::InvalidPattern { index, vendor, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(vendor, "Acme");
            }
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_match_any_tags_source() {
        let rules = sample_rules();
        let artifacts = vec![
            TextArtifact::new(sources::TLS_SUBJECT, "CN=localhost"),
            TextArtifact::new(sources::HTTP_BODY, "<title>UniFi Network</title>"),
        ];
        let hit = rules.match_any(&artifacts).unwrap();
        assert_eq!(hit.source, sources::HTTP_BODY);
        assert_eq!(hit.rule.vendor(), "Ubiquiti");
    }

    #[test]
    fn test_match_any_respects_artifact_order() {
        let rules = sample_rules();
        let artifacts = vec![
            TextArtifact::new(sources::TLS_SUBJECT, "CN=yealink"),
            TextArtifact::new(sources::HTTP_BODY, "Cisco"),
        ];
        let hit = rules.match_any(&artifacts).unwrap();
        assert_eq!(hit.source, sources::TLS_SUBJECT);
        assert_eq!(hit.rule.vendor(), "Yealink");
    }

    #[test]
    fn test_match_any_empty() {
        let rules = sample_rules();
        assert!(rules.match_any(&[]).is_none());
    }

    #[test]
    fn test_max_text_len_limits_search() {
        let rules = sample_rules().with_max_text_len(16);
        let text = format!("{}cisco", "x".repeat(32));
        assert!(rules.match_first(&text).is_none());
        assert!(rules.match_first("cisco ios").is_some());
    }

    #[test]
    fn test_truncate_at_char_boundary() {
        assert_eq!(truncate_at_char_boundary("héllo", 2), "h");
        assert_eq!(truncate_at_char_boundary("héllo", 3), "hé");
        assert_eq!(truncate_at_char_boundary("abc", 10), "abc");
    }
}
