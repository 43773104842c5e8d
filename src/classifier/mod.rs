//! Device classifier. Resolves one device's evidence against the port role table and
//! the fingerprint rule set with a fixed precedence: text fingerprints first, then the
//! lowest open port with a known role, otherwise unknown.

mod result;

pub use result::{ClassificationResult, MatchedBy};

use crate::error::LoadError;
use crate::evidence::Evidence;
use crate::rules::{FingerprintRuleEntry, FingerprintRuleSet, PortRoleEntry, PortRoleTable};

/// Owns both rule tables. Immutable after construction, so a single instance can be
/// shared across threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    ports: PortRoleTable,
    rules: FingerprintRuleSet,
}

impl Classifier {
    pub fn new(ports: PortRoleTable, rules: FingerprintRuleSet) -> Self {
        Self { ports, rules }
    }

    pub fn from_entries<P, F>(port_entries: P, rule_entries: F) -> Result<Self, LoadError>
    where
        P: IntoIterator<Item = PortRoleEntry>,
        F: IntoIterator<Item = FingerprintRuleEntry>,
    {
        Ok(Self::new(
            PortRoleTable::load(port_entries)?,
            FingerprintRuleSet::load(rule_entries)?,
        ))
    }

    pub fn port_roles(&self) -> &PortRoleTable {
        &self.ports
    }

    pub fn fingerprint_rules(&self) -> &FingerprintRuleSet {
        &self.rules
    }

    pub fn classify(&self, evidence: &Evidence) -> ClassificationResult {
        classify(&self.ports, &self.rules, evidence)
    }
}

/// Classify one device. Never fails: "unknown" is a normal result.
pub fn classify(
    ports: &PortRoleTable,
    rules: &FingerprintRuleSet,
    evidence: &Evidence,
) -> ClassificationResult {
    // Fingerprint evidence wins outright; ports are not consulted after a hit
    if evidence.has_text()
        && let Some(hit) = rules.match_any(&evidence.text_artifacts)
    {
        tracing::debug!(
            vendor = hit.rule.vendor(),
            device_type = hit.rule.device_type(),
            source = hit.source,
            "classified by fingerprint"
        );
        return ClassificationResult::from_fingerprint(&hit);
    }

    // BTreeSet iterates ascending, so the lowest known port wins
    for &port in &evidence.open_ports {
        if let Some(role) = ports.lookup(port) {
            tracing::debug!(
                port,
                role = %role.role,
                device_type = %role.device_type,
                "classified by port"
            );
            return ClassificationResult::from_port(port, role);
        }
    }

    tracing::debug!(
        open_ports = evidence.open_ports.len(),
        artifacts = evidence.text_artifacts.len(),
        "no classification evidence matched"
    );
    ClassificationResult::unknown()
}
