#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the systems it runs. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened. Systems operate on the entity records defined here and never
//! touch adapter concerns such as rendering or storage.

mod catalog;
mod entities;
mod geometry;
mod path;
mod rng;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{
    BossScaling, CriticalHit, EnemyKind, EnemyProfile, SlowEffect, TowerKind, TowerParams,
    BOSS_LEAK_DAMAGE, BULLET_OVERSHOOT, HIT_RADIUS, SELL_REFUND_PERCENT,
};
pub use entities::{
    Bullet, Enemy, IdAllocator, SpawnUnit, Stats, Tower, TowerLevel, WaveState, WaveStatus,
};
pub use geometry::{segment_distance_squared, CellPoint};
pub use path::{validate_path, GridSize, Path, PathError};
pub use rng::{RandomSource, SeededRandom};

/// Describes the active mode of the play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    /// Nothing is running yet; the first toggle or wave start begins play.
    Idle,
    /// Simulation ticks advance the world.
    Running,
    /// Simulation is suspended until toggled back.
    Paused,
    /// Every wave of the current level has been cleared.
    LevelComplete,
    /// Base hit points ran out; the session has been reset behind an end screen.
    GameOver,
    /// The final level has been cleared; the session has been reset behind an end screen.
    AllLevelsComplete,
}

/// Terminal screen shown after the session resets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndScreen {
    /// The base was overrun.
    GameOver,
    /// The last level was completed.
    AllLevelsComplete,
}

impl EndScreen {
    /// Play mode presented while this end screen is active.
    #[must_use]
    pub const fn play_mode(self) -> PlayMode {
        match self {
            Self::GameOver => PlayMode::GameOver,
            Self::AllLevelsComplete => PlayMode::AllLevelsComplete,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Starts the current wave when the wave state is ready.
    StartWave,
    /// Flips between running and paused.
    TogglePause,
    /// Arms a tower kind for construction, or disarms placement with `None`.
    SelectTowerKind {
        /// Kind of tower to arm.
        kind: Option<TowerKind>,
    },
    /// Selects an existing tower for the upgrade/sell panel, or clears it with `None`.
    SelectTower {
        /// Identifier of the tower to select.
        tower: Option<TowerId>,
    },
    /// Requests construction of the armed tower kind at the provided cell.
    PlaceTower {
        /// Cell that should host the tower.
        cell: CellCoord,
    },
    /// Requests an upgrade of the selected tower.
    UpgradeSelectedTower,
    /// Requests the sale of the selected tower.
    SellSelectedTower,
    /// Loads a level while keeping the current stats.
    LoadLevel {
        /// Level to load.
        level: LevelId,
    },
    /// Enters a level from level select as a fresh game.
    GoToLevel {
        /// Level to enter.
        level: LevelId,
    },
    /// Advances to the following level, or finishes the campaign.
    NextLevel,
    /// Restarts the session on the first level.
    ResetGame {
        /// End screen to present after the reset, if any.
        end_screen: Option<EndScreen>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the session entered a new play mode.
    PlayModeChanged {
        /// Mode that became active after processing commands.
        mode: PlayMode,
    },
    /// A wave began spawning.
    WaveStarted {
        /// Wave number within the current level.
        wave: u32,
        /// Number of units queued for the wave.
        units: u32,
    },
    /// An enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of enemy spawned.
        kind: EnemyKind,
        /// Whether the enemy is a boss variant.
        boss: bool,
    },
    /// An enemy reached the end of the path and damaged the base.
    EnemyLeaked {
        /// Identifier of the enemy that leaked.
        enemy: EnemyId,
        /// Base hit points lost.
        damage: u32,
    },
    /// An enemy ran out of hit points.
    EnemyKilled {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
        /// Currency credited for the kill.
        reward: u32,
    },
    /// A tower launched a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Projectile that was created.
        bullet: BulletId,
        /// Enemy the projectile homes on.
        target: EnemyId,
        /// Whether the shot rolled a critical hit.
        critical: bool,
    },
    /// A projectile struck its target.
    ProjectileHit {
        /// Projectile that hit.
        bullet: BulletId,
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Damage carried by the projectile.
        damage: u32,
    },
    /// A projectile was removed without hitting.
    ProjectileDiscarded {
        /// Projectile that was removed.
        bullet: BulletId,
        /// Why the projectile was removed.
        reason: DiscardReason,
    },
    /// Every unit of a wave has been spawned and resolved.
    WaveCompleted {
        /// Wave number within the level that completed.
        wave: u32,
    },
    /// The last wave of a level has been completed.
    LevelCompleted {
        /// Level that was completed.
        level: LevelId,
    },
    /// A level was loaded into the world.
    LevelLoaded {
        /// Level that became active.
        level: LevelId,
    },
    /// The session was reset to the first level.
    GameReset {
        /// End screen presented after the reset.
        end_screen: Option<EndScreen>,
    },
    /// Persisted level progress should be discarded.
    ProgressCleared,
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
        /// Currency spent on construction.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was upgraded.
    TowerUpgraded {
        /// Tower that was upgraded.
        tower: TowerId,
        /// Level reached by the upgrade.
        level: TowerLevel,
        /// Currency spent on the upgrade.
        cost: u32,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Tower that was removed.
        tower: TowerId,
        /// Currency refunded.
        refund: u32,
    },
    /// Reports that a sale request was rejected.
    TowerSaleRejected {
        /// Specific reason the sale failed.
        reason: SaleError,
    },
}

/// Reasons a projectile may disappear without striking its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    /// The bound target no longer exists.
    TargetLost,
    /// The projectile exceeded its maximum travel distance.
    OutOfRange,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a level in the level catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(u32);

impl LevelId {
    /// Creates a new level identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier of the level that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Reasons a tower placement request may be rejected, in the order they are checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    #[error("cell is outside the field")]
    OutOfBounds,
    /// The requested cell belongs to the enemy path.
    #[error("cannot build on the path")]
    OnPath,
    /// Another tower already occupies the cell.
    #[error("cell occupied")]
    Occupied,
    /// No tower kind is armed for construction.
    #[error("select a tower first")]
    NoTowerSelected,
    /// The armed tower costs more than the available currency.
    #[error("not enough money: need {cost}")]
    InsufficientFunds {
        /// Base cost of the armed tower kind.
        cost: u32,
    },
}

/// Reasons a tower upgrade request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// No tower is selected.
    #[error("no tower selected")]
    NoSelection,
    /// The selected tower no longer exists.
    #[error("tower not found")]
    MissingTower,
    /// The selected tower is already at its top level.
    #[error("tower is at max level")]
    MaxLevel,
    /// The upgrade costs more than the available currency.
    #[error("not enough money: need {cost}")]
    InsufficientFunds {
        /// Cost of the next upgrade.
        cost: u32,
    },
}

/// Reasons a tower sale request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum SaleError {
    /// No tower is selected.
    #[error("no tower selected")]
    NoSelection,
    /// The selected tower no longer exists.
    #[error("tower not found")]
    MissingTower,
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, EndScreen, LevelId, PlacementError, PlayMode, TowerId, TowerKind};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn build_order_types_round_trip_through_bincode() {
        assert_round_trip(&TowerId::new(42));
        assert_round_trip(&TowerKind::Frost);
        assert_round_trip(&CellCoord::new(5, 7));
    }

    #[test]
    fn placement_reasons_read_like_messages() {
        assert_eq!(PlacementError::Occupied.to_string(), "cell occupied");
        assert_eq!(
            PlacementError::InsufficientFunds { cost: 90 }.to_string(),
            "not enough money: need 90"
        );
    }

    #[test]
    fn end_screens_map_to_terminal_modes() {
        assert_eq!(EndScreen::GameOver.play_mode(), PlayMode::GameOver);
        assert_eq!(
            EndScreen::AllLevelsComplete.play_mode(),
            PlayMode::AllLevelsComplete
        );
    }

    #[test]
    fn level_ids_advance_without_overflow() {
        assert_eq!(LevelId::new(2).next(), LevelId::new(3));
        assert_eq!(LevelId::new(u32::MAX).next(), LevelId::new(u32::MAX));
    }
}
