#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile system that flies homing bullets and resolves their impacts.

use path_defence_core::{
    segment_distance_squared, Bullet, DiscardReason, Enemy, Event, Path, HIT_RADIUS,
};
use tracing::debug;

/// Advances bullets toward their targets, applying hits to enemies in place.
#[derive(Clone, Debug, Default)]
pub struct Projectiles;

impl Projectiles {
    /// Creates a new projectile system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Advances every bullet by `dt` seconds and resolves hits.
    ///
    /// A bullet re-aims at its target's current position, moves `speed * dt`
    /// along that heading and strikes when the target lies within
    /// [`HIT_RADIUS`] of the travelled segment. Killed enemies are removed
    /// immediately, so later bullets bound to them are discarded rather than
    /// crediting the reward again. Returns the currency earned from kills.
    pub fn handle(
        &mut self,
        bullets: &mut Vec<Bullet>,
        path: &Path,
        enemies: &mut Vec<Enemy>,
        dt: f32,
        out: &mut Vec<Event>,
    ) -> u32 {
        let dt = dt.max(0.0);
        let hit_radius_sq = HIT_RADIUS * HIT_RADIUS;
        let mut earned = 0_u32;

        bullets.retain_mut(|bullet| {
            let Some(index) = enemies.iter().position(|enemy| enemy.id == bullet.target) else {
                out.push(Event::ProjectileDiscarded {
                    bullet: bullet.id,
                    reason: DiscardReason::TargetLost,
                });
                return false;
            };

            let target = path.position_at(enemies[index].progress);
            let step = bullet.speed * dt;
            let heading = bullet.position.direction_to(target);

            // A bullet sitting on its target has no heading left to follow.
            let hit = match heading {
                Some(direction) => {
                    let next = bullet.position.offset(direction, step);
                    let hit =
                        segment_distance_squared(target, bullet.position, next) <= hit_radius_sq;
                    if !hit {
                        bullet.position = next;
                        bullet.direction = direction;
                    }
                    hit
                }
                None => true,
            };

            if hit {
                earned = earned.saturating_add(strike(bullet, enemies, index, out));
                return false;
            }

            bullet.traveled += step;
            if bullet.traveled >= bullet.max_travel {
                out.push(Event::ProjectileDiscarded {
                    bullet: bullet.id,
                    reason: DiscardReason::OutOfRange,
                });
                return false;
            }

            true
        });

        earned
    }
}

fn strike(bullet: &Bullet, enemies: &mut Vec<Enemy>, index: usize, out: &mut Vec<Event>) -> u32 {
    let enemy = &mut enemies[index];
    let dead = enemy.apply_damage(bullet.damage);
    out.push(Event::ProjectileHit {
        bullet: bullet.id,
        enemy: enemy.id,
        damage: bullet.damage,
    });

    if !dead {
        if let Some(slow) = bullet.slow {
            enemy.apply_slow(slow);
        }
        return 0;
    }

    let enemy = enemies.remove(index);
    debug!(enemy = enemy.id.get(), reward = enemy.reward, "enemy killed");
    out.push(Event::EnemyKilled {
        enemy: enemy.id,
        reward: enemy.reward,
    });
    enemy.reward
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{BulletId, CellCoord, CellPoint, EnemyId, EnemyKind, GridSize};

    #[test]
    fn bullet_on_top_of_target_hits() {
        let cells = (0..4).map(|column| CellCoord::new(column, 0)).collect();
        let path = Path::new(GridSize::new(4, 1), cells).expect("valid path");
        let mut enemies = vec![Enemy::spawn(EnemyId::new(0), EnemyKind::Runner)];
        let mut bullets = vec![Bullet {
            id: BulletId::new(0),
            position: CellPoint::new(0.5, 0.5),
            direction: CellPoint::new(1.0, 0.0),
            speed: 8.0,
            damage: 5,
            target: EnemyId::new(0),
            traveled: 0.0,
            max_travel: 3.0,
            slow: None,
        }];
        let mut events = Vec::new();

        let earned = Projectiles::new().handle(&mut bullets, &path, &mut enemies, 0.0, &mut events);

        assert_eq!(earned, 0);
        assert!(bullets.is_empty());
        assert_eq!(enemies[0].hit_points, 29);
    }
}
