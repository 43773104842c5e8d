//! Network device classification engine.
//!
//! Resolves a device's role, vendor and device type from two evidence sources:
//! open TCP ports (via a [`PortRoleTable`]) and free text such as TLS certificate
//! fields or HTTP pages (via a [`FingerprintRuleSet`]). Fingerprint matches take
//! precedence over port matches; when neither matches the device stays unknown.

pub mod classifier;
pub mod config;
pub mod error;
pub mod evidence;
pub mod oui;
pub mod report;
pub mod rules;

pub use classifier::{ClassificationResult, Classifier, MatchedBy, classify};
pub use error::{LoadError, RulesFileError};
pub use evidence::{Evidence, HostEvidence, TextArtifact};
pub use oui::OuiTable;
pub use rules::{
    FingerprintMatch, FingerprintRule, FingerprintRuleEntry, FingerprintRuleSet, PortRole,
    PortRoleEntry, PortRoleTable, RulesFile,
};
