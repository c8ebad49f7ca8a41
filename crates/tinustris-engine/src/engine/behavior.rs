use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    ClassicLevelSystem, ConstantCurve, GeneratorSeed, LevelSystem, ParseBehaviorError,
    SpeedCurve, TableCurve, TheGrandMasterLevelSystem,
};

/// A named rule preset: speed curve plus level system.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Behavior {
    #[default]
    #[serde(rename = "tinustris")]
    Tinustris,
    #[serde(rename = "game-boy")]
    GameBoy,
    #[serde(rename = "nes")]
    Nes,
    #[serde(rename = "the-grand-master")]
    TheGrandMaster,
    #[serde(rename = "the-grand-master-2-normal")]
    TheGrandMaster2Normal,
    #[serde(rename = "the-grand-master-2-master")]
    TheGrandMaster2Master,
    #[serde(rename = "always-20g")]
    Always20G,
}

impl Behavior {
    pub const ALL: [Self; 7] = [
        Self::Tinustris,
        Self::GameBoy,
        Self::Nes,
        Self::TheGrandMaster,
        Self::TheGrandMaster2Normal,
        Self::TheGrandMaster2Master,
        Self::Always20G,
    ];

    /// Identifier used in configuration files and on the command line.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Tinustris => "tinustris",
            Self::GameBoy => "game-boy",
            Self::Nes => "nes",
            Self::TheGrandMaster => "the-grand-master",
            Self::TheGrandMaster2Normal => "the-grand-master-2-normal",
            Self::TheGrandMaster2Master => "the-grand-master-2-master",
            Self::Always20G => "always-20g",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tinustris => "Tinustris",
            Self::GameBoy => "Game Boy Tetris",
            Self::Nes => "NES Tetris",
            Self::TheGrandMaster => "Tetris: The Grand Master",
            Self::TheGrandMaster2Normal => "Tetris: The Grand Master 2 Normal Mode",
            Self::TheGrandMaster2Master => "Tetris: The Grand Master 2 Master Mode",
            Self::Always20G => "20 G Forever",
        }
    }

    #[must_use]
    pub fn speed_curve(self) -> Box<dyn SpeedCurve> {
        match self {
            Self::Tinustris => Box::new(TableCurve::tinustris()),
            Self::GameBoy => Box::new(TableCurve::game_boy()),
            Self::Nes => Box::new(TableCurve::nes()),
            Self::TheGrandMaster => Box::new(TableCurve::the_grand_master()),
            Self::TheGrandMaster2Normal => Box::new(TableCurve::the_grand_master_2_normal()),
            Self::TheGrandMaster2Master => Box::new(TableCurve::the_grand_master_2_master()),
            Self::Always20G => Box::new(ConstantCurve::ALWAYS_20G),
        }
    }

    /// Level system of this preset; `start_level` only matters when
    /// [`Self::start_level_supported`] is true.
    #[must_use]
    pub fn level_system(self, start_level: u32) -> Box<dyn LevelSystem> {
        if self.start_level_supported() {
            Box::new(ClassicLevelSystem::new(start_level))
        } else {
            Box::new(TheGrandMasterLevelSystem)
        }
    }

    #[must_use]
    pub const fn start_level_supported(self) -> bool {
        matches!(self, Self::Tinustris | Self::GameBoy | Self::Nes)
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Behavior {
    type Err = ParseBehaviorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|behavior| behavior.id() == s)
            .ok_or_else(|| ParseBehaviorError { name: s.to_owned() })
    }
}

/// Game settings, loadable from JSON.
///
/// Missing fields take their defaults; a missing seed means a random one.
///
/// # Example
///
/// ```
/// use tinustris_engine::{Behavior, GameConfig};
///
/// let config: GameConfig =
///     serde_json::from_str(r#"{ "behavior": "game-boy", "tetromino_seed": "000000000000002a" }"#)
///         .unwrap();
/// assert_eq!(config.behavior, Behavior::GameBoy);
/// assert_eq!(config.start_level, 0);
/// assert_eq!(config.tetromino_seed.map(|s| s.value()), Some(42));
/// assert!(config.gap_seed.is_none());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub behavior: Behavior,
    pub start_level: u32,
    pub tetromino_seed: Option<GeneratorSeed>,
    pub gap_seed: Option<GeneratorSeed>,
}
