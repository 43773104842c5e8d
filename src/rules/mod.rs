mod file;
mod fingerprint;
mod port_roles;

pub use file::RulesFile;
pub use fingerprint::{FingerprintMatch, FingerprintRule, FingerprintRuleEntry, FingerprintRuleSet};
pub use port_roles::{PortRole, PortRoleEntry, PortRoleTable};
