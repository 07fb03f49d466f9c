#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave generation system that turns a wave number into an ordered spawn queue.

use path_defence_core::{BossScaling, EnemyKind, RandomSource, SpawnUnit};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Aggregated tuning knobs controlling wave size, composition, bosses and pacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Units in a hypothetical wave zero; the count grows linearly from here.
    pub base_count: u32,
    /// Units added per wave number.
    pub count_per_wave: u32,
    /// Share of the wave made up of tanks.
    pub tank_share: ShareRamp,
    /// Share of the wave made up of shielded enemies.
    pub shielded_share: ShareRamp,
    /// Waves that are a multiple of this value append a boss. Zero disables bosses.
    pub boss_every: u32,
    /// Multipliers applied to the boss.
    pub boss: BossScaling,
    /// Spawn cadence.
    pub interval: IntervalTuning,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_count: 8,
            count_per_wave: 2,
            tank_share: ShareRamp {
                start_wave: 3,
                per_wave: 0.07,
                cap: 0.35,
            },
            shielded_share: ShareRamp {
                start_wave: 4,
                per_wave: 0.06,
                cap: 0.35,
            },
            boss_every: 5,
            boss: BossScaling::default(),
            interval: IntervalTuning::default(),
        }
    }
}

/// Linear ramp of a unit type's share, starting at a threshold wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShareRamp {
    /// First wave in which the type appears.
    pub start_wave: u32,
    /// Share gained per wave from `start_wave` onward.
    pub per_wave: f32,
    /// Upper bound on the share.
    pub cap: f32,
}

impl ShareRamp {
    /// Share of the wave assigned to this type, in `[0, cap]`.
    #[must_use]
    pub fn share(&self, wave: u32) -> f32 {
        if wave < self.start_wave {
            return 0.0;
        }
        let steps = (wave - self.start_wave + 1) as f32;
        (steps * self.per_wave).clamp(0.0, self.cap.max(0.0))
    }
}

/// Spawn cadence: `max(minimum, base - wave * per_wave)` seconds between spawns.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntervalTuning {
    /// Interval before wave scaling.
    pub base: f32,
    /// Reduction per wave number.
    pub per_wave: f32,
    /// Lower bound on the interval.
    pub minimum: f32,
}

impl Default for IntervalTuning {
    fn default() -> Self {
        Self {
            base: 0.65,
            per_wave: 0.02,
            minimum: 0.35,
        }
    }
}

/// Unit counts making up a single wave, before shuffling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveComposition {
    /// Number of runners.
    pub runners: u32,
    /// Number of tanks.
    pub tanks: u32,
    /// Number of shielded enemies.
    pub shielded: u32,
    /// Whether a boss follows the shuffled units.
    pub boss: bool,
}

impl WaveComposition {
    /// Total units in the wave, boss included.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.runners + self.tanks + self.shielded + u32::from(self.boss)
    }
}

/// Pure system producing spawn queues from a wave number.
#[derive(Clone, Debug, Default)]
pub struct WaveGeneration {
    tuning: WaveTuning,
}

impl WaveGeneration {
    /// Creates a generator using the provided tuning.
    #[must_use]
    pub fn new(tuning: WaveTuning) -> Self {
        Self { tuning }
    }

    /// Tuning the generator was built with.
    #[must_use]
    pub fn tuning(&self) -> &WaveTuning {
        &self.tuning
    }

    /// Unit counts for `wave`.
    #[must_use]
    pub fn composition(&self, wave: u32) -> WaveComposition {
        let tuning = &self.tuning;
        let total = tuning
            .base_count
            .saturating_add(tuning.count_per_wave.saturating_mul(wave));

        let tanks = share_of(total, tuning.tank_share.share(wave));
        let shielded = share_of(total, tuning.shielded_share.share(wave)).min(total - tanks);
        let runners = total - tanks - shielded;
        let boss = tuning.boss_every > 0 && wave > 0 && wave % tuning.boss_every == 0;

        WaveComposition {
            runners,
            tanks,
            shielded,
            boss,
        }
    }

    /// Ordered spawn queue for `wave`.
    ///
    /// Standard units are shuffled so types do not arrive in blocks; a boss, when
    /// due, is appended after the shuffle so it always spawns last.
    pub fn queue<R: RandomSource>(&self, wave: u32, rng: &mut R) -> Vec<SpawnUnit> {
        let composition = self.composition(wave);
        let mut queue = Vec::with_capacity(composition.total() as usize);
        push_units(&mut queue, EnemyKind::Runner, composition.runners);
        push_units(&mut queue, EnemyKind::Tank, composition.tanks);
        push_units(&mut queue, EnemyKind::Shielded, composition.shielded);
        rng.shuffle(&mut queue);

        if composition.boss {
            queue.push(SpawnUnit::Boss(self.tuning.boss));
        }

        debug!(
            wave,
            runners = composition.runners,
            tanks = composition.tanks,
            shielded = composition.shielded,
            boss = composition.boss,
            "generated wave queue"
        );
        queue
    }

    /// Seconds between spawns for `wave`.
    #[must_use]
    pub fn spawn_interval(&self, wave: u32) -> f32 {
        let interval = self.tuning.interval;
        (interval.base - wave as f32 * interval.per_wave).max(interval.minimum)
    }
}

fn share_of(total: u32, share: f32) -> u32 {
    let count = (total as f32 * share).round();
    if count <= 0.0 {
        0
    } else {
        (count as u32).min(total)
    }
}

fn push_units(queue: &mut Vec<SpawnUnit>, kind: EnemyKind, count: u32) {
    queue.extend((0..count).map(|_| SpawnUnit::Enemy(kind)));
}
