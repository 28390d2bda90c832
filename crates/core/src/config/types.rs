use serde::{Deserialize, Serialize};

use crate::responder::Tier;
use crate::sweeper::SweeperConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub responders: RespondersConfig,
    #[serde(default)]
    pub desk: DeskConfig,
    #[serde(default)]
    pub sweeper: SweeperConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Desk behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeskConfig {
    /// Hours a completed ticket waits before the sweep archives it.
    #[serde(default = "default_archive_after_hours")]
    pub archive_after_hours: u32,
    /// Seed for the tie-break generator. Unset means OS entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            archive_after_hours: default_archive_after_hours(),
            random_seed: None,
        }
    }
}

impl DeskConfig {
    /// The archival window as a chrono duration.
    pub fn archive_window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.archive_after_hours))
    }
}

fn default_archive_after_hours() -> u32 {
    24
}

/// Audit channel configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_buffer_size() -> usize {
    1000
}

/// Responder pools, listed in assignment order.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RespondersConfig {
    #[serde(default)]
    pub tier1: Vec<ResponderConfig>,
    #[serde(default)]
    pub tier2: Vec<ResponderConfig>,
}

impl RespondersConfig {
    /// Configured responders for one tier.
    pub fn pool(&self, tier: Tier) -> &[ResponderConfig] {
        match tier {
            Tier::Tier1 => &self.tier1,
            Tier::Tier2 => &self.tier2,
        }
    }
}

/// A single responder entry
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ResponderConfig {
    /// Unique identifier, usually an e-mail address.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[desk]
archive_after_hours = 48
random_seed = 7

[sweeper]
enabled = false
interval_ms = 1000

[audit]
buffer_size = 16

[[responders.tier1]]
id = "harry@sentinel.example"
name = "Harry Styles"

[[responders.tier1]]
id = "niall@sentinel.example"
name = "Niall Horan"

[[responders.tier2]]
id = "louis@sentinel.example"
name = "Louis Tomlinson"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.desk.archive_after_hours, 48);
        assert_eq!(config.desk.random_seed, Some(7));
        assert!(!config.sweeper.enabled);
        assert_eq!(config.sweeper.interval_ms, 1000);
        assert_eq!(config.audit.buffer_size, 16);
        assert_eq!(config.responders.tier1.len(), 2);
        assert_eq!(config.responders.pool(Tier::Tier2)[0].name, "Louis Tomlinson");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let toml = r#"
[responders]
tier1 = [{ id = "a@example.com" }]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.desk.archive_after_hours, 24);
        assert!(config.desk.random_seed.is_none());
        assert!(config.sweeper.enabled);
        assert_eq!(config.audit.buffer_size, 1000);
        assert!(config.responders.tier2.is_empty());
        assert_eq!(config.responders.tier1[0].name, "");
    }

    #[test]
    fn test_deserialize_missing_responders_fails() {
        let toml = r#"
[desk]
archive_after_hours = 24
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_archive_window() {
        let desk = DeskConfig {
            archive_after_hours: 36,
            random_seed: None,
        };
        assert_eq!(desk.archive_window(), chrono::Duration::hours(36));
    }
}
