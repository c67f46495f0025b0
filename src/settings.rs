//! Match configuration
//!
//! Fighter stats come from an external roster; the arena id is opaque to the
//! simulation. Configs round-trip through JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// CPU opponent difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Chance (0-1) the CPU reacts to an incoming attack by blocking
    pub fn block_chance(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.15,
            Difficulty::Normal => 0.35,
            Difficulty::Hard => 0.6,
        }
    }

    /// Multiplier on per-action cooldowns (higher = slower CPU)
    pub fn cooldown_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.6,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.7,
        }
    }
}

/// Per-fighter stat block from the roster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FighterStats {
    /// Starting (and maximum) health
    pub health: u32,
    /// Outgoing damage multiplier
    #[serde(default = "one")]
    pub attack: f32,
    /// Incoming damage divisor
    #[serde(default = "one")]
    pub defense: f32,
    /// Walk speed multiplier
    #[serde(default = "one")]
    pub speed: f32,
}

fn one() -> f32 {
    1.0
}

impl Default for FighterStats {
    fn default() -> Self {
        Self {
            health: 1000,
            attack: 1.0,
            defense: 1.0,
            speed: 1.0,
        }
    }
}

impl FighterStats {
    fn validate(&self, slot: usize) -> Result<(), ConfigError> {
        if self.health == 0 {
            return Err(ConfigError::InvalidStats {
                slot,
                reason: "health must be positive",
            });
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.attack) || !positive(self.defense) || !positive(self.speed) {
            return Err(ConfigError::InvalidStats {
                slot,
                reason: "attack, defense and speed must be positive",
            });
        }
        Ok(())
    }
}

/// Everything needed to start a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Stats for slot 0 and slot 1
    pub fighters: [FighterStats; 2],
    /// Arena identifier (presentation only)
    #[serde(default)]
    pub arena: String,
    /// Seed for CPU decisions
    #[serde(default)]
    pub seed: u64,
    /// CPU difficulty per slot (None = externally driven)
    #[serde(default)]
    pub cpu: [Option<Difficulty>; 2],
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            fighters: [FighterStats::default(); 2],
            arena: String::from("dojo"),
            seed: 0,
            cpu: [None, None],
        }
    }
}

impl MatchConfig {
    /// Parse and validate a config from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded match config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (slot, stats) in self.fighters.iter().enumerate() {
            stats.validate(slot)?;
        }
        Ok(())
    }
}
