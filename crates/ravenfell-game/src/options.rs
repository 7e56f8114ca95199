//! Engine options loaded from RON. The chunk distance here is the streaming
//! radius the whole world simulation runs at.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("failed to parse options RON: {0}")]
    Parse(String),

    #[error("chunk distance must be at least 1, got {0}")]
    InvalidChunkDistance(i32),

    #[error("volume must be within [0, 1], got {0}")]
    InvalidVolume(f64),
}

/// Star field density for exterior sky generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StarDensity {
    Low,
    Medium,
    High,
}

impl StarDensity {
    pub fn star_count(self) -> usize {
        match self {
            StarDensity::Low => 200,
            StarDensity::Medium => 400,
            StarDensity::High => 800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Streaming radius in chunks around the player.
    pub chunk_distance: i32,
    pub star_density: StarDensity,
    pub sound_volume: f64,
    pub music_volume: f64,
    /// Whether the player carries a light source at night.
    pub player_has_light: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            chunk_distance: 2,
            star_density: StarDensity::Medium,
            sound_volume: 1.0,
            music_volume: 1.0,
            player_has_light: true,
        }
    }
}

impl Options {
    /// Parses options from a RON string and validates them. Missing fields
    /// fall back to defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, OptionsError> {
        let options: Options = ron::Options::default()
            .from_str(source)
            .map_err(|e| OptionsError::Parse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.chunk_distance < 1 {
            return Err(OptionsError::InvalidChunkDistance(self.chunk_distance));
        }
        for volume in [self.sound_volume, self.music_volume] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(OptionsError::InvalidVolume(volume));
            }
        }
        Ok(())
    }
}
