//! Static per-type parameter tables for enemies and towers.

use serde::{Deserialize, Serialize};

use crate::TowerLevel;

/// Extra travel granted to projectiles beyond the firing tower's range, in cells.
pub const BULLET_OVERSHOOT: f32 = 0.35;

/// Distance in cells within which a projectile counts as striking its target.
pub const HIT_RADIUS: f32 = 0.22;

/// Share of a tower's invested currency returned on sale, in percent.
pub const SELL_REFUND_PERCENT: u32 = 70;

/// Base hit points lost when a boss reaches the end of the path.
pub const BOSS_LEAK_DAMAGE: u32 = 5;

/// Enemy archetypes that can appear in a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Fast enemy with little health.
    Runner,
    /// Slow enemy with a large health pool.
    Tank,
    /// Medium enemy protected by a depletable shield.
    Shielded,
}

/// Static statistics describing a freshly spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProfile {
    /// Starting and maximum hit points.
    pub hit_points: u32,
    /// Starting and maximum shield.
    pub shield: u32,
    /// Base movement speed in cells per second.
    pub speed: f32,
    /// Currency credited when the enemy dies.
    pub reward: u32,
    /// Base hit points lost when the enemy reaches the end of the path.
    pub leak_damage: u32,
}

impl EnemyKind {
    /// Looks up the static profile for the enemy kind.
    #[must_use]
    pub const fn profile(self) -> EnemyProfile {
        match self {
            Self::Runner => EnemyProfile {
                hit_points: 34,
                shield: 0,
                speed: 1.3,
                reward: 5,
                leak_damage: 1,
            },
            Self::Tank => EnemyProfile {
                hit_points: 140,
                shield: 0,
                speed: 0.7,
                reward: 12,
                leak_damage: 2,
            },
            Self::Shielded => EnemyProfile {
                hit_points: 78,
                shield: 50,
                speed: 0.95,
                reward: 9,
                leak_damage: 1,
            },
        }
    }
}

/// Multipliers applied to the tank profile to derive a boss.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossScaling {
    /// Hit point multiplier.
    pub hit_points: f32,
    /// Speed multiplier.
    pub speed: f32,
    /// Reward multiplier.
    pub reward: f32,
}

impl BossScaling {
    /// Profile of a boss derived from the tank archetype.
    ///
    /// Hit points and reward are rounded to whole numbers; leak damage is fixed
    /// at [`BOSS_LEAK_DAMAGE`].
    #[must_use]
    pub fn profile(self) -> EnemyProfile {
        let base = EnemyKind::Tank.profile();
        EnemyProfile {
            hit_points: scale_rounded(base.hit_points, f64::from(self.hit_points)),
            shield: 0,
            speed: base.speed * self.speed,
            reward: scale_rounded(base.reward, f64::from(self.reward)),
            leak_damage: BOSS_LEAK_DAMAGE,
        }
    }
}

impl Default for BossScaling {
    fn default() -> Self {
        Self {
            hit_points: 6.0,
            speed: 0.85,
            reward: 5.0,
        }
    }
}

/// Slow payload carried by frost projectiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlowEffect {
    /// Speed multiplier applied while the effect lasts; lower is stronger.
    pub multiplier: f32,
    /// Duration of the effect in seconds.
    pub duration: f32,
}

/// Critical strike configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CriticalHit {
    /// Probability in `[0, 1]` that a shot is critical.
    pub chance: f32,
    /// Damage multiplier applied to critical shots.
    pub multiplier: f32,
}

/// Combat parameters for a tower at a specific level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerParams {
    /// Targeting radius in cells.
    pub range: f32,
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Seconds between shots.
    pub cooldown: f32,
    /// Projectile speed in cells per second.
    pub bullet_speed: f32,
    /// Slow payload applied on hit.
    pub slow: Option<SlowEffect>,
    /// Critical strike chance and multiplier.
    pub critical: Option<CriticalHit>,
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Balanced tower that targets the enemy furthest along the path.
    Cannon,
    /// Tower whose projectiles slow the fastest enemy in range.
    Frost,
    /// Long-range, high-damage tower that gains critical strikes at its top level.
    Sniper,
}

impl TowerKind {
    /// Every constructible tower kind.
    pub const ALL: [TowerKind; 3] = [Self::Cannon, Self::Frost, Self::Sniper];

    /// Currency required to construct the tower.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Cannon => 50,
            Self::Frost => 65,
            Self::Sniper => 90,
        }
    }

    /// Cost of upgrading to `target`: the base cost scaled by 1.2 for level 2 or
    /// 1.6 for level 3, rounded up.
    ///
    /// Level 1 is never an upgrade target and yields `None`.
    #[must_use]
    pub const fn upgrade_cost(self, target: TowerLevel) -> Option<u32> {
        let percent = match target.get() {
            2 => 120,
            3 => 160,
            _ => return None,
        };
        Some((self.cost() * percent).div_ceil(100))
    }

    /// Combat parameters for the tower kind at `level`.
    #[must_use]
    pub fn params(self, level: TowerLevel) -> TowerParams {
        let level = level.get();
        match self {
            Self::Cannon => {
                let base = 12;
                let damage = match level {
                    1 => base,
                    2 => scale_rounded(base, 1.25),
                    _ => scale_rounded(base, 1.25 * 1.25),
                };
                TowerParams {
                    range: if level >= 2 { 2.6 * 1.1 } else { 2.6 },
                    damage,
                    cooldown: if level >= 3 { 0.6 * 0.85 } else { 0.6 },
                    bullet_speed: 8.5,
                    slow: None,
                    critical: None,
                }
            }
            Self::Frost => {
                let (damage, slow) = match level {
                    1 => (6, SlowEffect { multiplier: 0.65, duration: 1.2 }),
                    2 => (6, SlowEffect { multiplier: 0.55, duration: 1.4 }),
                    _ => (
                        scale_rounded(6, 1.2),
                        SlowEffect { multiplier: 0.45, duration: 1.4 },
                    ),
                };
                TowerParams {
                    range: 2.2,
                    damage,
                    cooldown: 0.8,
                    bullet_speed: 8.0,
                    slow: Some(slow),
                    critical: None,
                }
            }
            Self::Sniper => {
                let (damage, critical) = match level {
                    1 => (35, None),
                    2 => (scale_rounded(35, 1.3), None),
                    _ => (
                        35,
                        Some(CriticalHit {
                            chance: 0.15,
                            multiplier: 2.0,
                        }),
                    ),
                };
                TowerParams {
                    range: 4.2,
                    damage,
                    cooldown: 1.4,
                    bullet_speed: 12.0,
                    slow: None,
                    critical,
                }
            }
        }
    }
}

fn scale_rounded(value: u32, factor: f64) -> u32 {
    (f64::from(value) * factor).round().max(0.0) as u32
}
