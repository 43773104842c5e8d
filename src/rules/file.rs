//! YAML rule file (`mappings.yaml`): a `port_roles` mapping and an ordered
//! `fingerprint_patterns` sequence.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use super::{FingerprintRuleEntry, FingerprintRuleSet, PortRoleEntry, PortRoleTable};
use crate::classifier::Classifier;
use crate::error::{LoadError, RulesFileError};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesFile {
    /// Kept in document order with repeated keys preserved, so the table loader can
    /// report duplicates instead of the YAML map silently keeping one.
    #[serde(default, deserialize_with = "ordered_port_roles")]
    pub port_roles: Vec<PortRoleEntry>,

    #[serde(default)]
    pub fingerprint_patterns: Vec<FingerprintRuleEntry>,
}

impl RulesFile {
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, RulesFileError> {
        let content = fs::read_to_string(path).map_err(|source| RulesFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rules = Self::from_yaml_str(&content).map_err(|source| RulesFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            port_roles = rules.port_roles.len(),
            fingerprint_patterns = rules.fingerprint_patterns.len(),
            "loaded rules file"
        );
        Ok(rules)
    }

    pub fn port_role_table(&self) -> Result<PortRoleTable, LoadError> {
        PortRoleTable::load(self.port_roles.iter().cloned())
    }

    pub fn fingerprint_rule_set(&self) -> Result<FingerprintRuleSet, LoadError> {
        FingerprintRuleSet::load(self.fingerprint_patterns.iter().cloned())
    }

    pub fn into_classifier(self) -> Result<Classifier, LoadError> {
        Classifier::from_entries(self.port_roles, self.fingerprint_patterns)
    }
}

#[derive(Deserialize)]
struct PortRoleSpec {
    role: String,
    device_type: String,
}

/// Port key as written in the file. YAML may hand over an integer (`22:`), a quoted
/// string (`"22":`) or any other scalar; all of them become text so that the table
/// loader can reject non-integers by name. Floats keep their decimal point, so
/// `22.0` stays invalid instead of collapsing to `22`.
struct PortKey(String);

impl<'de> Deserialize<'de> for PortKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PortKeyVisitor;

        impl<'de> Visitor<'de> for PortKeyVisitor {
            type Value = PortKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a port number")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<PortKey, E> {
                Ok(PortKey(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<PortKey, E> {
                Ok(PortKey(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<PortKey, E> {
                Ok(PortKey(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<PortKey, E> {
                Ok(PortKey(format!("{:?}", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PortKey, E> {
                Ok(PortKey(v.to_string()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<PortKey, E> {
                Ok(PortKey("null".to_string()))
            }
        }

        deserializer.deserialize_any(PortKeyVisitor)
    }
}

fn ordered_port_roles<'de, D>(deserializer: D) -> Result<Vec<PortRoleEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<PortRoleEntry>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of port numbers to {role, device_type}")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, spec)) = map.next_entry::<PortKey, PortRoleSpec>()? {
                entries.push(PortRoleEntry {
                    port: key.0,
                    role: spec.role,
                    device_type: spec.device_type,
                });
            }
            Ok(entries)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}
