//! Engine configuration.
//!
//! Fixed at board construction. Build from defaults, JSON, or `GEM_CASCADE_*`
//! environment variables, then [`EngineConfig::validate`].

use std::env;

use serde::{Deserialize, Serialize};

use crate::behavior::BehaviorOdds;
use crate::error::ConfigError;
use crate::types::{
    BASE_POINTS_PER_TILE, BONUS_PER_ADDITIONAL_TILE, DEFAULT_GEM_KINDS, DEFAULT_TILE_COUNT,
    MAX_CASCADE_ROUNDS, MAX_GEM_KINDS, MAX_GENERATION_ATTEMPTS, MAX_SPECIALS, MAX_TILE_COUNT,
    MINIMUM_MATCH_COUNT, MIN_GEM_KINDS, POOL_CLEANUP_MS, POOL_WAIT_MS,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tile_count: usize,
    pub minimum_match_count: usize,
    pub base_points_per_tile: i64,
    pub bonus_per_additional_tile: i64,
    pub max_specials: usize,
    pub gem_kinds: u8,
    pub behavior_odds: BehaviorOdds,
    /// Advisory pool capacity; `None` sizes it from the board
    pub pool_size: Option<usize>,
    pub pool_wait_ms: u64,
    pub pool_cleanup_ms: u64,
    pub max_generation_attempts: u32,
    pub max_cascade_rounds: u32,
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_count: DEFAULT_TILE_COUNT,
            minimum_match_count: MINIMUM_MATCH_COUNT,
            base_points_per_tile: BASE_POINTS_PER_TILE,
            bonus_per_additional_tile: BONUS_PER_ADDITIONAL_TILE,
            max_specials: MAX_SPECIALS,
            gem_kinds: DEFAULT_GEM_KINDS,
            behavior_odds: BehaviorOdds::default(),
            pool_size: None,
            pool_wait_ms: POOL_WAIT_MS,
            pool_cleanup_ms: POOL_CLEANUP_MS,
            max_generation_attempts: MAX_GENERATION_ATTEMPTS,
            max_cascade_rounds: MAX_CASCADE_ROUNDS,
            seed: 1,
        }
    }
}

/// Default pool capacity for a board edge: every cell plus half again as spares
pub fn default_pool_size(tile_count: usize) -> usize {
    let cells = tile_count * tile_count;
    cells + cells / 2
}

impl EngineConfig {
    /// Defaults overlaid with `GEM_CASCADE_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`, keyed by environment variable name
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        overlay(&lookup, "GEM_CASCADE_TILE_COUNT", &mut config.tile_count)?;
        overlay(&lookup, "GEM_CASCADE_MIN_MATCH", &mut config.minimum_match_count)?;
        overlay(&lookup, "GEM_CASCADE_BASE_POINTS", &mut config.base_points_per_tile)?;
        overlay(&lookup, "GEM_CASCADE_BONUS_POINTS", &mut config.bonus_per_additional_tile)?;
        overlay(&lookup, "GEM_CASCADE_MAX_SPECIALS", &mut config.max_specials)?;
        overlay(&lookup, "GEM_CASCADE_GEM_KINDS", &mut config.gem_kinds)?;
        overlay(&lookup, "GEM_CASCADE_POOL_WAIT_MS", &mut config.pool_wait_ms)?;
        overlay(&lookup, "GEM_CASCADE_POOL_CLEANUP_MS", &mut config.pool_cleanup_ms)?;
        overlay(&lookup, "GEM_CASCADE_SEED", &mut config.seed)?;

        if let Some(raw) = lookup("GEM_CASCADE_POOL_SIZE") {
            let raw = raw.trim().to_string();
            if !raw.is_empty() {
                let size = raw.parse().map_err(|_| ConfigError::InvalidEnv {
                    key: "GEM_CASCADE_POOL_SIZE".to_string(),
                    value: raw.clone(),
                })?;
                config.pool_size = Some(size);
            }
        }

        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn with_tile_count(mut self, tile_count: usize) -> Self {
        self.tile_count = tile_count;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_specials(mut self, max_specials: usize) -> Self {
        self.max_specials = max_specials;
        self
    }

    pub fn with_gem_kinds(mut self, gem_kinds: u8) -> Self {
        self.gem_kinds = gem_kinds;
        self
    }

    /// Resolved pool capacity
    pub fn pool_capacity(&self) -> usize {
        self.pool_size
            .unwrap_or_else(|| default_pool_size(self.tile_count))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_match_count < MINIMUM_MATCH_COUNT {
            return Err(ConfigError::MinimumMatchCount(self.minimum_match_count));
        }
        if self.tile_count < self.minimum_match_count || self.tile_count > MAX_TILE_COUNT {
            return Err(ConfigError::TileCount {
                found: self.tile_count,
                min: self.minimum_match_count,
                max: MAX_TILE_COUNT,
            });
        }
        if !(MIN_GEM_KINDS..=MAX_GEM_KINDS).contains(&self.gem_kinds) {
            return Err(ConfigError::GemKinds {
                found: self.gem_kinds,
                min: MIN_GEM_KINDS,
                max: MAX_GEM_KINDS,
            });
        }
        if self.behavior_odds.total() == 0 || self.behavior_odds.total() > u32::MAX as u64 {
            return Err(ConfigError::BehaviorOdds);
        }
        let cells = self.tile_count * self.tile_count;
        if self.pool_capacity() < cells {
            return Err(ConfigError::PoolSize {
                found: self.pool_capacity(),
                cells,
            });
        }
        if self.max_generation_attempts == 0 {
            return Err(ConfigError::ZeroLimit("max_generation_attempts"));
        }
        if self.max_cascade_rounds == 0 {
            return Err(ConfigError::ZeroLimit("max_cascade_rounds"));
        }
        Ok(())
    }
}

fn overlay<F, T>(lookup: &F, key: &str, slot: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(key) else {
        return Ok(());
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(());
    }
    *slot = raw.parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: raw.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.tile_count, 9);
        assert_eq!(config.pool_capacity(), 81 + 40);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lookup_overlay() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("GEM_CASCADE_TILE_COUNT", "7"),
            ("GEM_CASCADE_SEED", " 42 "),
            ("GEM_CASCADE_POOL_SIZE", "100"),
            ("GEM_CASCADE_GEM_KINDS", ""),
        ]))
        .unwrap();
        assert_eq!(config.tile_count, 7);
        assert_eq!(config.seed, 42);
        assert_eq!(config.pool_size, Some(100));
        assert_eq!(config.gem_kinds, 6);
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = EngineConfig::from_lookup(lookup_from(&[("GEM_CASCADE_MIN_MATCH", "three")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                key: "GEM_CASCADE_MIN_MATCH".to_string(),
                value: "three".to_string()
            }
        );
    }

    #[test]
    fn test_json_fills_missing_fields() {
        let config =
            EngineConfig::from_json_str(r#"{"tile_count": 6, "behavior_odds": {"double_points": 0}}"#)
                .unwrap();
        assert_eq!(config.tile_count, 6);
        assert_eq!(config.minimum_match_count, 3);
        assert_eq!(config.behavior_odds.double_points, 0);
        assert_eq!(config.behavior_odds.default_weight, 36);

        assert!(matches!(
            EngineConfig::from_json_str("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_validation() {
        let bad = EngineConfig::default().with_tile_count(2);
        assert!(matches!(bad.validate(), Err(ConfigError::TileCount { .. })));

        let bad = EngineConfig::default().with_tile_count(17);
        assert!(matches!(bad.validate(), Err(ConfigError::TileCount { .. })));

        let bad = EngineConfig::default().with_gem_kinds(2);
        assert!(matches!(bad.validate(), Err(ConfigError::GemKinds { .. })));

        let bad = EngineConfig {
            pool_size: Some(10),
            ..EngineConfig::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::PoolSize { .. })));

        let bad = EngineConfig {
            behavior_odds: BehaviorOdds {
                default_weight: 0,
                double_points: 0,
                row_column_elimination: 0,
            },
            ..EngineConfig::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::BehaviorOdds));
    }
}
