use std::time::Duration;

use path_defence_core::{
    CellCoord, Command, EndScreen, Event, GridSize, LevelId, PlayMode, SeededRandom, TowerKind,
    TowerLevel, UpgradeError, WaveStatus,
};
use path_defence_system_wave_generation::WaveTuning;
use path_defence_world::{
    apply, persist_events, query, LevelDefinition, MemoryProgressStore, Palette, PathShape,
    Progress, ProgressStore, World, WorldConfig,
};

const FRAME: Duration = Duration::from_millis(50);

fn palette() -> Palette {
    Palette {
        background: "#000".to_owned(),
        grid: "#111".to_owned(),
        path_fill: "#222".to_owned(),
        path_stroke: "#333".to_owned(),
        tower_fill: "#444".to_owned(),
    }
}

fn short_level(id: u32, waves: u32) -> LevelDefinition {
    LevelDefinition {
        id: LevelId::new(id),
        name: format!("Corridor {id}"),
        palette: palette(),
        waves,
        path: PathShape::Cells {
            cells: (0..3).map(|column| CellCoord::new(column, 1)).collect(),
        },
    }
}

/// Two short levels where each wave is a single runner crossing three cells.
fn corridor_config() -> WorldConfig {
    WorldConfig {
        grid: GridSize::new(6, 4),
        waves: WaveTuning {
            base_count: 1,
            count_per_wave: 0,
            ..WaveTuning::default()
        },
        levels: vec![short_level(1, 1), short_level(2, 2)],
        ..WorldConfig::default()
    }
}

fn run_until<F>(world: &mut World, rng: &mut SeededRandom, limit: u32, done: F) -> Vec<Event>
where
    F: Fn(&Event) -> bool,
{
    let mut events = Vec::new();
    for _ in 0..limit {
        let start = events.len();
        apply(world, Command::Tick { dt: FRAME }, rng, &mut events);
        if events[start..].iter().any(&done) {
            break;
        }
    }
    events
}

#[test]
fn toggling_pause_gates_the_clock() {
    let mut world = World::new(corridor_config(), None).expect("valid config");
    let mut rng = SeededRandom::new(1);
    let mut events = Vec::new();

    apply(&mut world, Command::TogglePause, &mut rng, &mut events);
    assert_eq!(query::play_mode(&world), PlayMode::Running);
    apply(&mut world, Command::TogglePause, &mut rng, &mut events);
    assert_eq!(query::play_mode(&world), PlayMode::Paused);
    assert_eq!(
        events,
        vec![
            Event::PlayModeChanged {
                mode: PlayMode::Running
            },
            Event::PlayModeChanged {
                mode: PlayMode::Paused
            },
        ]
    );

    events.clear();
    apply(&mut world, Command::Tick { dt: FRAME }, &mut rng, &mut events);
    assert!(events.is_empty());

    apply(&mut world, Command::StartWave, &mut rng, &mut events);
    assert_eq!(query::play_mode(&world), PlayMode::Running);
    assert_eq!(query::wave(&world).status, WaveStatus::Spawning);

    events.clear();
    apply(&mut world, Command::StartWave, &mut rng, &mut events);
    assert!(events.is_empty());
}

#[test]
fn clearing_the_last_wave_completes_the_level() {
    let mut world = World::new(corridor_config(), None).expect("valid config");
    let mut rng = SeededRandom::new(5);
    let mut events = Vec::new();
    apply(&mut world, Command::StartWave, &mut rng, &mut events);

    let events = run_until(&mut world, &mut rng, 200, |event| {
        matches!(event, Event::LevelCompleted { .. })
    });

    assert!(events.contains(&Event::WaveCompleted { wave: 1 }));
    assert!(events.contains(&Event::LevelCompleted {
        level: LevelId::new(1)
    }));
    assert_eq!(query::play_mode(&world), PlayMode::LevelComplete);
    assert_eq!(query::wave(&world).status, WaveStatus::Ready);
    assert!(query::wave(&world).queue.is_empty());
    assert_eq!(query::stats(&world).base_hit_points, 19);

    let mut ignored = Vec::new();
    apply(&mut world, Command::StartWave, &mut rng, &mut ignored);
    assert!(ignored.is_empty());
}

#[test]
fn intermission_starts_the_next_wave() {
    let mut world = World::new(corridor_config(), Some(Progress { level: 2 })).expect("valid");
    let mut rng = SeededRandom::new(9);
    let mut events = Vec::new();
    apply(&mut world, Command::StartWave, &mut rng, &mut events);

    let _ = run_until(&mut world, &mut rng, 200, |event| {
        matches!(event, Event::WaveCompleted { .. })
    });
    assert_eq!(query::play_mode(&world), PlayMode::Running);
    assert_eq!(query::stats(&world).wave_in_level, 2);
    assert_eq!(query::wave(&world).status, WaveStatus::Ready);
    assert!(query::wave(&world).intermission > 3.9);

    events.clear();
    apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(3_900),
        },
        &mut rng,
        &mut events,
    );
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::WaveStarted { .. })));

    apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(100),
        },
        &mut rng,
        &mut events,
    );
    assert!(events.contains(&Event::WaveStarted { wave: 2, units: 1 }));
    assert_eq!(query::wave(&world).status, WaveStatus::Spawning);
}

#[test]
fn next_level_advances_then_finishes_the_campaign() {
    let mut world = World::new(corridor_config(), None).expect("valid config");
    let mut rng = SeededRandom::new(13);
    let mut store = MemoryProgressStore::new();
    let mut events = Vec::new();

    apply(
        &mut world,
        Command::SelectTowerKind {
            kind: Some(TowerKind::Cannon),
        },
        &mut rng,
        &mut events,
    );
    apply(
        &mut world,
        Command::PlaceTower {
            cell: CellCoord::new(1, 2),
        },
        &mut rng,
        &mut events,
    );

    events.clear();
    apply(&mut world, Command::NextLevel, &mut rng, &mut events);
    persist_events(&mut store, &events);
    assert_eq!(query::level(&world).id(), LevelId::new(2));
    assert_eq!(query::play_mode(&world), PlayMode::Paused);
    assert!(query::towers(&world).is_empty());
    assert_eq!(query::stats(&world).money, 70);
    assert_eq!(store.load(), Some(Progress { level: 2 }));

    events.clear();
    apply(&mut world, Command::NextLevel, &mut rng, &mut events);
    persist_events(&mut store, &events);
    assert_eq!(query::level(&world).id(), LevelId::new(1));
    assert_eq!(query::play_mode(&world), PlayMode::AllLevelsComplete);
    assert_eq!(query::end_screen(&world), Some(EndScreen::AllLevelsComplete));
    assert_eq!(query::stats(&world).money, 120);
    assert_eq!(store.load(), None);
    assert!(events.contains(&Event::GameReset {
        end_screen: Some(EndScreen::AllLevelsComplete),
    }));

    events.clear();
    apply(
        &mut world,
        Command::GoToLevel {
            level: LevelId::new(2),
        },
        &mut rng,
        &mut events,
    );
    assert_eq!(query::play_mode(&world), PlayMode::Idle);
    assert_eq!(query::end_screen(&world), None);
    assert_eq!(query::level(&world).id(), LevelId::new(2));
}

#[test]
fn plain_reset_returns_to_an_idle_first_level() {
    let mut world = World::new(corridor_config(), Some(Progress { level: 2 })).expect("valid");
    let mut rng = SeededRandom::new(17);
    let mut events = Vec::new();

    apply(
        &mut world,
        Command::ResetGame { end_screen: None },
        &mut rng,
        &mut events,
    );

    assert_eq!(
        events,
        vec![
            Event::LevelLoaded {
                level: LevelId::new(1)
            },
            Event::ProgressCleared,
            Event::GameReset { end_screen: None },
        ]
    );
    assert_eq!(query::play_mode(&world), PlayMode::Idle);
}

#[test]
fn upgrades_and_sales_flow_through_selection() {
    let mut world = World::new(corridor_config(), None).expect("valid config");
    let mut rng = SeededRandom::new(21);
    let mut events = Vec::new();

    apply(
        &mut world,
        Command::SelectTowerKind {
            kind: Some(TowerKind::Frost),
        },
        &mut rng,
        &mut events,
    );
    apply(
        &mut world,
        Command::PlaceTower {
            cell: CellCoord::new(2, 2),
        },
        &mut rng,
        &mut events,
    );
    let tower = query::towers(&world)[0].id;
    assert_eq!(query::stats(&world).money, 55);
    assert_eq!(
        query::can_upgrade_selected_tower(&world),
        Err(UpgradeError::NoSelection)
    );

    apply(
        &mut world,
        Command::SelectTower { tower: Some(tower) },
        &mut rng,
        &mut events,
    );
    assert_eq!(
        query::can_upgrade_selected_tower(&world),
        Err(UpgradeError::InsufficientFunds { cost: 78 })
    );
    apply(&mut world, Command::UpgradeSelectedTower, &mut rng, &mut events);
    assert_eq!(query::towers(&world)[0].level, TowerLevel::FIRST);

    apply(&mut world, Command::SellSelectedTower, &mut rng, &mut events);
    assert!(query::towers(&world).is_empty());
    assert_eq!(query::selected_tower(&world), None);
    assert_eq!(query::stats(&world).money, 55 + 45);
}

#[test]
fn identically_seeded_sessions_replay() {
    fn play(seed: u64) -> Vec<Event> {
        let mut world = World::new(WorldConfig::default(), None).expect("valid config");
        let mut rng = SeededRandom::new(seed);
        let mut events = Vec::new();
        for (kind, cell) in [
            (TowerKind::Frost, CellCoord::new(4, 1)),
            (TowerKind::Cannon, CellCoord::new(8, 6)),
        ] {
            apply(
                &mut world,
                Command::SelectTowerKind { kind: Some(kind) },
                &mut rng,
                &mut events,
            );
            apply(&mut world, Command::PlaceTower { cell }, &mut rng, &mut events);
        }
        apply(&mut world, Command::StartWave, &mut rng, &mut events);
        for _ in 0..1_200 {
            apply(&mut world, Command::Tick { dt: FRAME }, &mut rng, &mut events);
        }
        events
    }

    let first = play(99);
    assert_eq!(first, play(99));
    assert!(first
        .iter()
        .any(|event| matches!(event, Event::ProjectileHit { .. })));
}

#[test]
fn snapshots_continue_independently() {
    let mut world = World::new(corridor_config(), None).expect("valid config");
    let mut rng = SeededRandom::new(4);
    let mut events = Vec::new();
    apply(&mut world, Command::StartWave, &mut rng, &mut events);
    apply(&mut world, Command::Tick { dt: FRAME }, &mut rng, &mut events);

    let snapshot = world.clone();
    apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(1),
        },
        &mut rng,
        &mut events,
    );

    assert_eq!(query::enemies(&snapshot).len(), 1);
    assert!(query::enemies(&snapshot)[0].progress < query::enemies(&world)[0].progress);
}
