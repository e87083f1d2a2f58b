//! Game settings
//!
//! Loaded once at startup from an optional JSON file; every field falls
//! back to its production default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// What happens to an enemy that touches the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContactPolicy {
    /// Touching enemies are removed after dealing their (capped) damage
    #[default]
    Consume,
    /// Touching enemies stay and keep dealing capped damage every frame
    Persist,
}

impl ContactPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactPolicy::Consume => "consume",
            ContactPolicy::Persist => "persist",
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for spawns, upgrade offers and critical hits
    pub seed: u64,

    // === Timers ===
    /// Milliseconds between enemy spawns
    pub spawn_interval_ms: f64,
    /// Base milliseconds between volleys (before attack speed)
    pub attack_cooldown_ms: f64,
    /// Seconds a dropped orb stays on the field
    pub orb_lifetime_secs: f32,
    /// Frames simulated at most per `advance` call
    pub max_substeps: u32,

    // === Rules ===
    /// Pixels reserved for the HUD at the bottom of the viewport
    pub bottom_blocker: f32,
    /// Enemy fate after touching the player
    pub contact_policy: ContactPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,

            spawn_interval_ms: ENEMY_SPAWN_INTERVAL_MS,
            attack_cooldown_ms: ATTACK_COOLDOWN_MS,
            orb_lifetime_secs: ORB_LIFETIME_SECS,
            max_substeps: MAX_SUBSTEPS,

            bottom_blocker: BOTTOM_BLOCKER,
            contact_policy: ContactPolicy::Consume,
        }
    }
}

impl Settings {
    /// Default settings with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Check the values that can be judged without a viewport
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.spawn_interval_ms > 0.0) {
            return Err(ConfigError::SpawnInterval(self.spawn_interval_ms));
        }
        if !(self.attack_cooldown_ms > 0.0) {
            return Err(ConfigError::AttackCooldown(self.attack_cooldown_ms));
        }
        if !(self.orb_lifetime_secs > 0.0) {
            return Err(ConfigError::OrbLifetime(self.orb_lifetime_secs));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::MaxSubsteps);
        }
        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "contact_policy": "persist" }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.contact_policy, ContactPolicy::Persist);
        assert_eq!(settings.spawn_interval_ms, ENEMY_SPAWN_INTERVAL_MS);
    }

    #[test]
    fn test_rejects_non_positive_spawn_interval() {
        let result = Settings::from_json(r#"{ "spawn_interval_ms": 0 }"#);
        assert!(matches!(result, Err(ConfigError::SpawnInterval(_))));

        let settings = Settings {
            spawn_interval_ms: -5.0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::SpawnInterval(_))));
    }

    #[test]
    fn test_rejects_zero_substeps() {
        let settings = Settings {
            max_substeps: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::MaxSubsteps)));
    }

    #[test]
    fn test_contact_policy_names_match_json() {
        for policy in [ContactPolicy::Consume, ContactPolicy::Persist] {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(json, format!("\"{}\"", policy.as_str()));
        }
        assert!(Settings::from_json(r#"{ "contact_policy": "keep" }"#).is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
