//! Port role table. Maps a single open TCP port to the role and device type it implies
//! (e.g. 9100 -> printer, 445 -> workstation).

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Role and device type implied by an open port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRole {
    pub role: String,
    pub device_type: String,
}

/// Raw port rule as read from a rule file. The port is still a string here so that
/// malformed keys can be reported verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PortRoleEntry {
    pub port: String,
    pub role: String,
    pub device_type: String,
}

impl PortRoleEntry {
    pub fn new(
        port: impl Into<String>,
        role: impl Into<String>,
        device_type: impl Into<String>,
    ) -> Self {
        Self {
            port: port.into(),
            role: role.into(),
            device_type: device_type.into(),
        }
    }
}

/// Immutable port -> role mapping
#[derive(Debug, Clone, Default)]
pub struct PortRoleTable {
    roles: BTreeMap<u16, PortRole>,
}

impl PortRoleTable {
    /// Build the table, rejecting malformed and repeated ports.
    pub fn load<I>(entries: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = PortRoleEntry>,
    {
        let mut roles = BTreeMap::new();

        for entry in entries {
            let port = parse_port(&entry.port)?;
            match roles.entry(port) {
                Entry::Occupied(_) => return Err(LoadError::DuplicatePort { port }),
                Entry::Vacant(slot) => {
                    slot.insert(PortRole {
                        role: entry.role,
                        device_type: entry.device_type,
                    });
                }
            }
        }

        tracing::debug!(ports = roles.len(), "loaded port role table");
        Ok(Self { roles })
    }

    pub fn lookup(&self, port: u16) -> Option<&PortRole> {
        self.roles.get(&port)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Loaded ports in ascending order
    pub fn ports(&self) -> impl Iterator<Item = u16> + '_ {
        self.roles.keys().copied()
    }
}

/// Parse a port key, accepting only integers in 1..=65535
fn parse_port(key: &str) -> Result<u16, LoadError> {
    key.trim()
        .parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .ok_or_else(|| LoadError::InvalidPort {
            key: key.to_string(),
        })
}
