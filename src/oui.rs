//! MAC OUI vendor table. Parses `oui.txt` style listings and maps the first three
//! octets of a MAC address to a manufacturer name.
//!
//! Only used as a hint in host reports; it never feeds into a classification result.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::RulesFileError;

#[derive(Debug, Clone, Default)]
pub struct OuiTable {
    vendors: HashMap<String, String>,
}

impl OuiTable {
    /// Parse tab-separated lines: `PREFIX<TAB>vendor` or `PREFIX<TAB>short<TAB>vendor`.
    /// Blank lines, `#` comments and lines without a vendor are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut vendors = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').collect();
            let (prefix, vendor) = match parts.as_slice() {
                [prefix, vendor] => (*prefix, *vendor),
                [prefix, _, vendor, ..] => (*prefix, *vendor),
                _ => continue,
            };
            let vendor = vendor.trim();
            if let Some(key) = normalize_prefix(prefix)
                && !vendor.is_empty()
            {
                vendors.insert(key, vendor.to_string());
            }
        }

        Self { vendors }
    }

    pub fn load(path: &Path) -> Result<Self, RulesFileError> {
        let contents = fs::read_to_string(path).map_err(|source| RulesFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&contents);
        tracing::info!(path = %path.display(), prefixes = table.len(), "loaded OUI table");
        Ok(table)
    }

    /// Vendor for a MAC address in any common notation (`aa:bb:cc:..`, `AA-BB-CC-..`)
    pub fn lookup(&self, mac: &str) -> Option<&str> {
        let key = normalize_prefix(mac)?;
        self.vendors.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

/// First three octets as `AA:BB:CC`, or None if they are not hex
fn normalize_prefix(value: &str) -> Option<String> {
    let hex: String = value
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .take(6)
        .collect();
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let hex = hex.to_ascii_uppercase();
    Some(format!("{}:{}:{}", &hex[0..2], &hex[2..4], &hex[4..6]))
}
