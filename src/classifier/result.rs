use serde::{Deserialize, Serialize};

use crate::rules::{FingerprintMatch, PortRole};

/// Which evidence category produced a classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedBy {
    /// A fingerprint rule matched one of the text artifacts
    Fingerprint,
    /// An open port was found in the port role table
    Port,
    /// Nothing matched
    #[default]
    None,
}

impl MatchedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchedBy::Fingerprint => "fingerprint",
            MatchedBy::Port => "port",
            MatchedBy::None => "none",
        }
    }
}

impl std::fmt::Display for MatchedBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Best-guess identity of one device. Fields are left unset rather than defaulted
/// when the evidence does not say.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub role: Option<String>,
    pub vendor: Option<String>,
    pub device_type: Option<String>,
    pub matched_by: MatchedBy,
    /// Source label of the matching artifact, or `tcp/<port>` for port matches
    pub evidence_ref: Option<String>,
}

impl ClassificationResult {
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn from_fingerprint(hit: &FingerprintMatch<'_>) -> Self {
        Self {
            role: None,
            vendor: Some(hit.rule.vendor().to_string()),
            device_type: Some(hit.rule.device_type().to_string()),
            matched_by: MatchedBy::Fingerprint,
            evidence_ref: Some(hit.source.to_string()),
        }
    }

    pub fn from_port(port: u16, role: &PortRole) -> Self {
        Self {
            role: Some(role.role.clone()),
            vendor: None,
            device_type: Some(role.device_type.clone()),
            matched_by: MatchedBy::Port,
            evidence_ref: Some(format!("tcp/{}", port)),
        }
    }

    pub fn is_identified(&self) -> bool {
        self.matched_by != MatchedBy::None
    }
}
