#![allow(dead_code)]

use device_classifier::{Classifier, RulesFile};

/// Rules shipped at the repository root
pub const SAMPLE_RULES: &str = include_str!("../mappings.yaml");

pub fn sample_rules() -> RulesFile {
    RulesFile::from_yaml_str(SAMPLE_RULES).expect("sample rules should parse")
}

pub fn sample_classifier() -> Classifier {
    sample_rules()
        .into_classifier()
        .expect("sample rules should load")
}
