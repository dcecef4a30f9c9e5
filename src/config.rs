// ⚙️ Configuration - namespace prefixes and ledger selection
//
// Prefixes are chosen once at process start and handed to the Registry.
// Nothing changes them afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entities::EntityKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("namespace prefix for {0} must not be empty")]
    EmptyPrefix(EntityKind),

    #[error("namespace prefix '{shorter}' ({shorter_kind}) overlaps '{longer}' ({longer_kind})")]
    OverlappingPrefixes {
        shorter_kind: EntityKind,
        shorter: String,
        longer_kind: EntityKind,
        longer: String,
    },

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

// ============================================================================
// NAMESPACE CONFIG
// ============================================================================

/// `{kind -> prefix}` mapping used to build ledger keys
///
/// Loadable from JSON; missing entries fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct NamespaceConfig {
    pub vendor: String,
    pub commercial_paper: String,
    pub account: String,
    pub customer: String,
    pub regulator: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        NamespaceConfig {
            vendor: "vendor:".to_string(),
            commercial_paper: "cp:".to_string(),
            account: "acct:".to_string(),
            customer: "cust:".to_string(),
            regulator: "reg:".to_string(),
        }
    }
}

impl NamespaceConfig {
    pub fn prefix(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Vendor => &self.vendor,
            EntityKind::CommercialPaper => &self.commercial_paper,
            EntityKind::Account => &self.account,
            EntityKind::Customer => &self.customer,
            EntityKind::Regulator => &self.regulator,
        }
    }

    /// Ensure no two kinds can ever produce the same ledger key
    ///
    /// Keys are `prefix + id` with arbitrary ids, so a prefix that starts
    /// another prefix (or equals it) would let keys collide.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in EntityKind::ALL {
            if self.prefix(kind).is_empty() {
                return Err(ConfigError::EmptyPrefix(kind));
            }
        }

        for (i, a) in EntityKind::ALL.iter().enumerate() {
            for b in EntityKind::ALL.iter().skip(i + 1) {
                let (pa, pb) = (self.prefix(*a), self.prefix(*b));
                let (shorter_kind, shorter, longer_kind, longer) = if pa.len() <= pb.len() {
                    (*a, pa, *b, pb)
                } else {
                    (*b, pb, *a, pa)
                };
                if longer.starts_with(shorter) {
                    return Err(ConfigError::OverlappingPrefixes {
                        shorter_kind,
                        shorter: shorter.to_string(),
                        longer_kind,
                        longer: longer.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Load from a JSON file and validate
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: NamespaceConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// LEDGER SELECTION
// ============================================================================

/// Which ledger backend the binaries run against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerConfig {
    /// Process memory only; gone on exit
    Memory,
    /// Append-only SQLite file
    Sqlite { path: PathBuf },
}

impl LedgerConfig {
    pub fn label(&self) -> &'static str {
        match self {
            LedgerConfig::Memory => "memory",
            LedgerConfig::Sqlite { .. } => "sqlite",
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig::Memory
    }
}

/// Everything needed to stand up a registry
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub ledger: LedgerConfig,
    pub namespaces: NamespaceConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid_and_disjoint() {
        let config = NamespaceConfig::default();
        config.validate().unwrap();

        assert_eq!(config.prefix(EntityKind::CommercialPaper), "cp:");
        assert_eq!(config.prefix(EntityKind::Account), "acct:");
        assert_ne!(config.prefix(EntityKind::Vendor), config.prefix(EntityKind::Account));
    }

    #[test]
    fn test_rejects_duplicate_prefixes() {
        let config = NamespaceConfig {
            vendor: "acct:".to_string(),
            ..NamespaceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OverlappingPrefixes { .. })
        ));
    }

    #[test]
    fn test_rejects_nested_prefixes() {
        // "a" + "cct:X" would collide with "acct:" + "X"
        let config = NamespaceConfig {
            customer: "a".to_string(),
            ..NamespaceConfig::default()
        };
        match config.validate() {
            Err(ConfigError::OverlappingPrefixes { shorter, longer, .. }) => {
                assert_eq!(shorter, "a");
                assert_eq!(longer, "acct:");
            }
            other => panic!("expected overlap error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_empty_prefix() {
        let config = NamespaceConfig {
            regulator: String::new(),
            ..NamespaceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyPrefix(EntityKind::Regulator))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: NamespaceConfig = serde_json::from_str(r#"{"vendor": "vnd/"}"#).unwrap();
        assert_eq!(config.vendor, "vnd/");
        assert_eq!(config.commercial_paper, "cp:");
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = NamespaceConfig::from_json_file(Path::new("/nonexistent/namespaces.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
