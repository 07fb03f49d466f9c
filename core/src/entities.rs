//! Entity records that make up the simulation state.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{
    BossScaling, BulletId, CellCoord, CellPoint, EnemyId, EnemyKind, EnemyProfile, SlowEffect,
    TowerId, TowerKind, TowerParams, SELL_REFUND_PERCENT,
};

/// Upgrade tier of a tower, from 1 to 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerLevel(u8);

impl TowerLevel {
    /// Level assigned to freshly built towers.
    pub const FIRST: TowerLevel = TowerLevel(1);
    /// Highest reachable level.
    pub const MAX: TowerLevel = TowerLevel(3);

    /// Creates a level, returning `None` outside `1..=3`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::FIRST.0 && value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Numeric value of the level.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Level reached by the next upgrade, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
}

/// Live enemy travelling along the path.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    /// Identifier assigned at spawn.
    pub id: EnemyId,
    /// Archetype of the enemy. Bosses report [`EnemyKind::Tank`].
    pub kind: EnemyKind,
    /// Remaining hit points.
    pub hit_points: u32,
    /// Hit points at spawn.
    pub max_hit_points: u32,
    /// Remaining shield that absorbs damage before hit points.
    pub shield: u32,
    /// Shield at spawn.
    pub max_shield: u32,
    /// Base movement speed in cells per second.
    pub speed: f32,
    /// Currency credited when the enemy dies.
    pub reward: u32,
    /// Base hit points lost when the enemy reaches the end of the path.
    pub leak_damage: u32,
    /// Fractional position along the path in `[0, path length - 1]`.
    pub progress: f32,
    /// Current slow multiplier; `1.0` when unaffected.
    pub slow_multiplier: f32,
    /// Seconds of slow remaining.
    pub slow_remaining: f32,
    /// Whether the enemy is a boss variant.
    pub boss: bool,
}

impl Enemy {
    /// Creates a fresh enemy of `kind` at the start of the path.
    #[must_use]
    pub fn spawn(id: EnemyId, kind: EnemyKind) -> Self {
        Self::from_profile(id, kind, kind.profile(), false)
    }

    /// Creates a boss derived from the tank archetype.
    #[must_use]
    pub fn boss(id: EnemyId, scaling: BossScaling) -> Self {
        Self::from_profile(id, EnemyKind::Tank, scaling.profile(), true)
    }

    fn from_profile(id: EnemyId, kind: EnemyKind, profile: EnemyProfile, boss: bool) -> Self {
        Self {
            id,
            kind,
            hit_points: profile.hit_points,
            max_hit_points: profile.hit_points,
            shield: profile.shield,
            max_shield: profile.shield,
            speed: profile.speed,
            reward: profile.reward,
            leak_damage: profile.leak_damage,
            progress: 0.0,
            slow_multiplier: 1.0,
            slow_remaining: 0.0,
            boss,
        }
    }

    /// Speed after applying any active slow.
    #[must_use]
    pub fn effective_speed(&self) -> f32 {
        if self.slow_remaining > 0.0 {
            self.speed * self.slow_multiplier
        } else {
            self.speed
        }
    }

    /// Hit points already lost.
    #[must_use]
    pub fn damage_taken(&self) -> u32 {
        self.max_hit_points.saturating_sub(self.hit_points)
    }

    /// Applies `amount` damage, draining the shield before hit points.
    ///
    /// Returns `true` when the enemy has no hit points left.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        let absorbed = self.shield.min(amount);
        self.shield -= absorbed;
        self.hit_points = self.hit_points.saturating_sub(amount - absorbed);
        self.hit_points == 0
    }

    /// Applies a slow. Overlapping slows keep the strongest multiplier and the
    /// longest remaining duration.
    pub fn apply_slow(&mut self, effect: SlowEffect) {
        self.slow_multiplier = self.slow_multiplier.min(effect.multiplier);
        self.slow_remaining = self.slow_remaining.max(effect.duration);
    }
}

/// Tower placed on the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    /// Identifier assigned at construction.
    pub id: TowerId,
    /// Type of tower.
    pub kind: TowerKind,
    /// Upgrade tier.
    pub level: TowerLevel,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Seconds until the tower may fire again.
    pub cooldown: f32,
    /// Currency spent on construction and upgrades.
    pub invested: u32,
}

impl Tower {
    /// Creates a level-1 tower ready to fire, with its base cost invested.
    #[must_use]
    pub fn new(id: TowerId, kind: TowerKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            level: TowerLevel::FIRST,
            cell,
            cooldown: 0.0,
            invested: kind.cost(),
        }
    }

    /// Combat parameters for the tower's current level.
    #[must_use]
    pub fn params(&self) -> TowerParams {
        self.kind.params(self.level)
    }

    /// Centre of the tower's cell.
    #[must_use]
    pub fn center(&self) -> CellPoint {
        CellPoint::center_of(self.cell)
    }

    /// Currency returned when the tower is sold.
    #[must_use]
    pub fn sell_refund(&self) -> u32 {
        self.invested.saturating_mul(SELL_REFUND_PERCENT) / 100
    }
}

/// Homing projectile in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    /// Identifier assigned at launch.
    pub id: BulletId,
    /// Current position in cell units.
    pub position: CellPoint,
    /// Unit direction of the most recent movement.
    pub direction: CellPoint,
    /// Travel speed in cells per second.
    pub speed: f32,
    /// Damage applied on hit.
    pub damage: u32,
    /// Enemy the projectile homes on.
    pub target: EnemyId,
    /// Distance travelled so far, in cells.
    pub traveled: f32,
    /// Distance after which the projectile is discarded, in cells.
    pub max_travel: f32,
    /// Slow payload applied on hit.
    pub slow: Option<SlowEffect>,
}

/// Pending unit in a wave's spawn queue.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpawnUnit {
    /// Standard enemy of the given kind.
    Enemy(EnemyKind),
    /// Boss derived from the tank archetype.
    Boss(BossScaling),
}

impl SpawnUnit {
    /// Instantiates the unit as a live enemy.
    #[must_use]
    pub fn instantiate(self, id: EnemyId) -> Enemy {
        match self {
            Self::Enemy(kind) => Enemy::spawn(id, kind),
            Self::Boss(scaling) => Enemy::boss(id, scaling),
        }
    }

    /// Reports whether the unit is a boss.
    #[must_use]
    pub const fn is_boss(&self) -> bool {
        matches!(self, Self::Boss(_))
    }
}

/// Progress of the current wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveStatus {
    /// Waiting for a manual start or for the intermission to elapse.
    Ready,
    /// Units are still being dequeued.
    Spawning,
    /// Every unit has spawned; live enemies remain.
    InProgress,
}

/// Spawn queue and timers for the current wave.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveState {
    /// Current status.
    pub status: WaveStatus,
    /// Units waiting to spawn, in order.
    pub queue: VecDeque<SpawnUnit>,
    /// Seconds until the next spawn.
    pub spawn_timer: f32,
    /// Seconds between spawns.
    pub spawn_interval: f32,
    /// Seconds until the next wave starts automatically.
    pub intermission: f32,
}

impl WaveState {
    /// Wave state awaiting a manual start.
    #[must_use]
    pub fn ready() -> Self {
        Self {
            status: WaveStatus::Ready,
            queue: VecDeque::new(),
            spawn_timer: 0.0,
            spawn_interval: 0.6,
            intermission: 0.0,
        }
    }

    /// Begins spawning `queue` at `interval` seconds apart, starting immediately.
    pub fn begin(&mut self, queue: Vec<SpawnUnit>, interval: f32) {
        self.status = WaveStatus::Spawning;
        self.queue = queue.into();
        self.spawn_timer = 0.0;
        self.spawn_interval = interval;
        self.intermission = 0.0;
    }
}

impl Default for WaveState {
    fn default() -> Self {
        Self::ready()
    }
}

/// Player-facing counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Stats {
    /// Remaining base hit points.
    pub base_hit_points: u32,
    /// Currency balance.
    pub money: u32,
    /// Wave number within the current level, starting at 1.
    pub wave_in_level: u32,
}

/// Monotonic identifier source shared by every entity kind in a session.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    next_enemy: u32,
    next_tower: u32,
    next_bullet: u32,
}

impl IdAllocator {
    /// Creates an allocator whose first identifiers are zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh enemy identifier.
    pub fn enemy(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy);
        self.next_enemy = self.next_enemy.wrapping_add(1);
        id
    }

    /// Allocates a fresh tower identifier.
    pub fn tower(&mut self) -> TowerId {
        let id = TowerId::new(self.next_tower);
        self.next_tower = self.next_tower.wrapping_add(1);
        id
    }

    /// Allocates a fresh projectile identifier.
    pub fn bullet(&mut self) -> BulletId {
        let id = BulletId::new(self.next_bullet);
        self.next_bullet = self.next_bullet.wrapping_add(1);
        id
    }
}
