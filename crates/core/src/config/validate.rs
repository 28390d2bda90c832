use std::collections::HashSet;

use super::{types::Config, ConfigError};
use crate::responder::Tier;

/// Validate configuration
/// Currently validates:
/// - Responders section exists (enforced by serde)
/// - Archival window, sweep interval and audit buffer are non-zero
/// - Responder ids are non-empty and unique across both tiers
///
/// An empty pool is allowed; tickets routed to it fail with `EmptyPool`.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.desk.archive_after_hours == 0 {
        return Err(ConfigError::ValidationError(
            "desk.archive_after_hours cannot be 0".to_string(),
        ));
    }

    if config.sweeper.interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "sweeper.interval_ms cannot be 0".to_string(),
        ));
    }

    if config.audit.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "audit.buffer_size cannot be 0".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for tier in Tier::ALL {
        let pool = config.responders.pool(tier);
        if pool.is_empty() {
            tracing::warn!(%tier, "No responders configured for tier");
        }
        for responder in pool {
            if responder.id.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "responders.{} contains an entry with an empty id",
                    tier.config_key()
                )));
            }
            if !seen.insert(responder.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "responder id '{}' is listed more than once",
                    responder.id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuditConfig, DeskConfig, ResponderConfig, RespondersConfig};
    use crate::sweeper::SweeperConfig;

    fn responder(id: &str) -> ResponderConfig {
        ResponderConfig {
            id: id.to_string(),
            name: String::new(),
        }
    }

    fn valid_config() -> Config {
        Config {
            responders: RespondersConfig {
                tier1: vec![responder("a@example.com"), responder("b@example.com")],
                tier2: vec![responder("c@example.com")],
            },
            desk: DeskConfig::default(),
            sweeper: SweeperConfig::default(),
            audit: AuditConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_empty_pool_is_allowed() {
        let mut config = valid_config();
        config.responders.tier2.clear();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_archive_window_fails() {
        let mut config = valid_config();
        config.desk.archive_after_hours = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_interval_fails() {
        let mut config = valid_config();
        config.sweeper.interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_audit_buffer_fails() {
        let mut config = valid_config();
        config.audit.buffer_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_id_fails() {
        let mut config = valid_config();
        config.responders.tier1.push(responder("  "));
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("tier1"));
    }

    #[test]
    fn test_validate_duplicate_across_tiers_fails() {
        let mut config = valid_config();
        config.responders.tier2.push(responder("a@example.com"));
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("a@example.com"));
    }
}
