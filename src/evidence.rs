//! Per-device evidence handed to the classifier: open TCP ports plus labelled text
//! artifacts (certificate fields, banners, page bodies).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Well-known artifact source labels
pub mod sources {
    pub const TLS_SUBJECT: &str = "tls_subject";
    pub const TLS_ISSUER: &str = "tls_issuer";
    pub const HTTP_BANNER: &str = "http_banner";
    pub const HTTP_BODY: &str = "http_body";
}

/// A piece of free text and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextArtifact {
    pub source: String,
    pub text: String,
}

impl TextArtifact {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// Evidence collected for one device. Artifact order is significant: earlier
/// artifacts are checked first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(default)]
    pub open_ports: BTreeSet<u16>,
    #[serde(default)]
    pub text_artifacts: Vec<TextArtifact>,
}

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.open_ports.insert(port);
        self
    }

    pub fn with_ports(mut self, ports: impl IntoIterator<Item = u16>) -> Self {
        self.open_ports.extend(ports);
        self
    }

    pub fn with_artifact(mut self, source: impl Into<String>, text: impl Into<String>) -> Self {
        self.text_artifacts.push(TextArtifact::new(source, text));
        self
    }

    pub fn has_text(&self) -> bool {
        !self.text_artifacts.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.open_ports.is_empty() && self.text_artifacts.is_empty()
    }
}

/// One scanned host as handed over by the scanner: addressing plus its evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEvidence {
    pub ip_addr: String,
    #[serde(default)]
    pub mac_addr: Option<String>,
    #[serde(flatten)]
    pub evidence: Evidence,
}
