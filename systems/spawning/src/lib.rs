#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system that dequeues wave units onto the path as the spawn timer elapses.

use path_defence_core::{Enemy, Event, IdAllocator, WaveState, WaveStatus};
use tracing::debug;

/// System that releases queued units at the wave's spawn cadence, updating the
/// wave and enemy list in place.
#[derive(Clone, Debug, Default)]
pub struct Spawning;

impl Spawning {
    /// Creates a new spawning system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Advances the spawn timer by `dt` seconds and instantiates every unit that
    /// became due.
    ///
    /// Several units may spawn in one call when `dt` spans multiple intervals; the
    /// loop is bounded by the queue length. Once the queue drains the wave moves to
    /// [`WaveStatus::InProgress`] with its timer at zero. Does nothing unless the
    /// wave is spawning.
    pub fn handle(
        &mut self,
        wave: &mut WaveState,
        dt: f32,
        ids: &mut IdAllocator,
        enemies: &mut Vec<Enemy>,
        out: &mut Vec<Event>,
    ) {
        if wave.status != WaveStatus::Spawning {
            return;
        }

        wave.spawn_timer -= dt.max(0.0);
        while wave.spawn_timer <= 0.0 {
            let Some(unit) = wave.queue.pop_front() else {
                break;
            };

            let enemy = unit.instantiate(ids.enemy());
            debug!(
                enemy = enemy.id.get(),
                kind = ?enemy.kind,
                boss = enemy.boss,
                "enemy spawned"
            );
            out.push(Event::EnemySpawned {
                enemy: enemy.id,
                kind: enemy.kind,
                boss: enemy.boss,
            });
            enemies.push(enemy);
            wave.spawn_timer += wave.spawn_interval;
        }

        if wave.queue.is_empty() {
            wave.status = WaveStatus::InProgress;
            wave.spawn_timer = 0.0;
        }
    }
}
