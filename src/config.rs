//! Combat configuration.
//!
//! The tunables of a combat: round limit, grid row size, the hitpoint
//! threshold for focusing wounded characters, and the random seed.

use crate::error::CombatError;
use crate::team::DEFAULT_MAX_ROW_SIZE;
use serde::{Deserialize, Serialize};

/// Default number of rounds before the victory condition must decide.
pub const DEFAULT_ROUND_LIMIT: u32 = 30;

/// Default share of max hitpoints at or below which a character is
/// considered wounded.
pub const DEFAULT_HEAL_THRESHOLD: f64 = 0.5;

/// Settings for a [`Combat`](crate::Combat).
///
/// Missing fields take their defaults when deserializing.
///
/// # Examples
///
/// ```rust
/// use zzcombat::CombatConfig;
///
/// let config = CombatConfig::from_json(r#"{ "round_limit": 10, "seed": 42 }"#).unwrap();
/// assert_eq!(config.round_limit, 10);
/// assert_eq!(config.max_row_size, 5);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub round_limit: u32,
    pub max_row_size: u32,
    pub heal_threshold: f64,
    pub seed: Option<u64>,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            round_limit: DEFAULT_ROUND_LIMIT,
            max_row_size: DEFAULT_MAX_ROW_SIZE,
            heal_threshold: DEFAULT_HEAL_THRESHOLD,
            seed: None,
        }
    }
}

impl CombatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, CombatError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, CombatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), CombatError> {
        if self.max_row_size == 0 {
            return Err(CombatError::Config("max_row_size must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.heal_threshold) {
            return Err(CombatError::Config(format!(
                "heal_threshold {} is outside 0..=1",
                self.heal_threshold
            )));
        }
        Ok(())
    }

    pub fn with_round_limit(mut self, round_limit: u32) -> Self {
        self.round_limit = round_limit;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
