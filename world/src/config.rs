//! Tunable parameters for a world session.

use path_defence_core::GridSize;
use path_defence_system_wave_generation::WaveTuning;
use serde::{Deserialize, Serialize};

use crate::levels::{builtin_definitions, LevelDefinition};

/// Configuration consumed when constructing a [`crate::World`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Dimensions of the play field.
    pub grid: GridSize,
    /// Economy and pacing rules.
    pub rules: Rules,
    /// Wave size, composition and cadence.
    pub waves: WaveTuning,
    /// Level definitions, played in identifier order.
    pub levels: Vec<LevelDefinition>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::new(12, 18),
            rules: Rules::default(),
            waves: WaveTuning::default(),
            levels: builtin_definitions(),
        }
    }
}

/// Starting resources and pacing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Currency at the start of a fresh game.
    pub starting_money: u32,
    /// Base hit points at the start of a fresh game.
    pub starting_base_hit_points: u32,
    /// Seconds between a completed wave and the automatic start of the next.
    pub intermission: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_money: 120,
            starting_base_hit_points: 20,
            intermission: 4.0,
        }
    }
}
