#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! System that ticks tower cooldowns in place and launches projectiles at chosen targets.

use path_defence_core::{
    Bullet, CriticalHit, Enemy, Event, IdAllocator, Path, RandomSource, Tower, BULLET_OVERSHOOT,
};
use path_defence_system_tower_targeting::{TowerTarget, TowerTargeting};
use tracing::debug;

/// Tower combat system that fires projectiles for ready towers.
#[derive(Clone, Debug, Default)]
pub struct TowerCombat {
    targeting: TowerTargeting,
    targets: Vec<TowerTarget>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decays every cooldown by `dt` seconds, then fires from each ready tower
    /// that has an enemy in range.
    ///
    /// Each shot spawns a bullet at the tower centre aimed at the target's
    /// current position and resets the tower's cooldown. Towers with a critical
    /// strike roll once per shot.
    #[allow(clippy::too_many_arguments)]
    pub fn handle<R: RandomSource>(
        &mut self,
        towers: &mut [Tower],
        path: &Path,
        enemies: &[Enemy],
        dt: f32,
        ids: &mut IdAllocator,
        rng: &mut R,
        bullets: &mut Vec<Bullet>,
        out: &mut Vec<Event>,
    ) {
        let dt = dt.max(0.0);
        for tower in towers.iter_mut() {
            tower.cooldown = (tower.cooldown - dt).max(0.0);
        }

        self.targeting
            .handle(towers, path, enemies, &mut self.targets);

        for target in &self.targets {
            let Some(tower) = towers.iter_mut().find(|tower| tower.id == target.tower) else {
                continue;
            };
            let Some(direction) = target.tower_center.direction_to(target.enemy_position) else {
                continue;
            };

            let params = tower.params();
            let (damage, critical) = roll_damage(params.damage, params.critical, rng);
            let bullet = Bullet {
                id: ids.bullet(),
                position: target.tower_center,
                direction,
                speed: params.bullet_speed,
                damage,
                target: target.enemy,
                traveled: 0.0,
                max_travel: params.range + BULLET_OVERSHOOT,
                slow: params.slow,
            };

            debug!(
                tower = tower.id.get(),
                bullet = bullet.id.get(),
                target = target.enemy.get(),
                damage,
                critical,
                "projectile fired"
            );
            out.push(Event::ProjectileFired {
                tower: tower.id,
                bullet: bullet.id,
                target: target.enemy,
                critical,
            });
            bullets.push(bullet);
            tower.cooldown = params.cooldown;
        }
    }
}

fn roll_damage<R: RandomSource>(
    damage: u32,
    critical: Option<CriticalHit>,
    rng: &mut R,
) -> (u32, bool) {
    let Some(critical) = critical else {
        return (damage, false);
    };

    if rng.next_unit() < critical.chance {
        let boosted = (damage as f32 * critical.multiplier).round().max(0.0) as u32;
        (boosted, true)
    } else {
        (damage, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f32);

    impl RandomSource for Fixed {
        fn next_unit(&mut self) -> f32 {
            self.0
        }

        fn next_index(&mut self, _bound: usize) -> usize {
            0
        }
    }

    #[test]
    fn critical_rolls_below_chance_multiply_damage() {
        let critical = Some(CriticalHit {
            chance: 0.15,
            multiplier: 2.0,
        });
        assert_eq!(roll_damage(35, critical, &mut Fixed(0.1)), (70, true));
        assert_eq!(roll_damage(35, critical, &mut Fixed(0.15)), (35, false));
        assert_eq!(roll_damage(35, None, &mut Fixed(0.0)), (35, false));
    }
}
