#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that advances enemies along the path and resolves leaks.

use path_defence_core::{Enemy, Event, Path};
use tracing::debug;

/// Moves every live enemy in place by its effective speed.
#[derive(Clone, Debug, Default)]
pub struct Movement;

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Advances enemies by `dt` seconds.
    ///
    /// Slow timers decay first, floored at zero, and an expired slow resets the
    /// multiplier to `1.0` before the enemy moves. Enemies whose progress reaches
    /// the end of the path are removed and an [`Event::EnemyLeaked`] is emitted
    /// for each. Returns the base hit points lost this step.
    pub fn handle(
        &mut self,
        path: &Path,
        enemies: &mut Vec<Enemy>,
        dt: f32,
        out: &mut Vec<Event>,
    ) -> u32 {
        let dt = dt.max(0.0);
        let max_progress = path.max_progress();
        let mut leaked = 0_u32;

        enemies.retain_mut(|enemy| {
            enemy.slow_remaining = (enemy.slow_remaining - dt).max(0.0);
            if enemy.slow_remaining <= 0.0 {
                enemy.slow_multiplier = 1.0;
            }

            let progress = enemy.progress + enemy.effective_speed() * dt;
            if progress >= max_progress {
                leaked = leaked.saturating_add(enemy.leak_damage);
                debug!(
                    enemy = enemy.id.get(),
                    damage = enemy.leak_damage,
                    "enemy leaked"
                );
                out.push(Event::EnemyLeaked {
                    enemy: enemy.id,
                    damage: enemy.leak_damage,
                });
                return false;
            }

            enemy.progress = progress;
            true
        });

        leaked
    }
}
