use path_defence_core::{EnemyKind, SeededRandom, SpawnUnit};
use path_defence_system_wave_generation::{WaveGeneration, WaveTuning};

fn count(queue: &[SpawnUnit], kind: EnemyKind) -> usize {
    queue
        .iter()
        .filter(|unit| **unit == SpawnUnit::Enemy(kind))
        .count()
}

#[test]
fn every_fifth_wave_appends_exactly_one_boss() {
    let generation = WaveGeneration::default();
    let mut rng = SeededRandom::new(0xb055);

    for wave in 1..=12 {
        let queue = generation.queue(wave, &mut rng);
        let bosses = queue.iter().filter(|unit| unit.is_boss()).count();
        if wave % 5 == 0 {
            assert_eq!(bosses, 1, "wave {wave} should carry a boss");
            assert!(queue.last().is_some_and(SpawnUnit::is_boss), "boss spawns last");
        } else {
            assert_eq!(bosses, 0, "wave {wave} should not carry a boss");
        }
    }
}

#[test]
fn queue_matches_composition() {
    let generation = WaveGeneration::default();
    let mut rng = SeededRandom::new(3);
    let queue = generation.queue(7, &mut rng);
    let composition = generation.composition(7);

    assert_eq!(queue.len() as u32, composition.total());
    assert_eq!(count(&queue, EnemyKind::Runner) as u32, composition.runners);
    assert_eq!(count(&queue, EnemyKind::Tank) as u32, composition.tanks);
    assert_eq!(count(&queue, EnemyKind::Shielded) as u32, composition.shielded);
}

#[test]
fn identical_seeds_produce_identical_queues() {
    let generation = WaveGeneration::default();
    let first = generation.queue(9, &mut SeededRandom::new(42));
    let second = generation.queue(9, &mut SeededRandom::new(42));
    assert_eq!(first, second);
}

#[test]
fn tuning_reads_partial_tables() {
    let tuning: WaveTuning = serde_json::from_str(r#"{ "base_count": 1, "count_per_wave": 0 }"#)
        .expect("partial tuning parses");
    assert_eq!(tuning.base_count, 1);
    assert_eq!(tuning.boss_every, WaveTuning::default().boss_every);
}
