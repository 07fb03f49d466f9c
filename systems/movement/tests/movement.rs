use path_defence_core::{
    BossScaling, CellCoord, Enemy, EnemyId, EnemyKind, Event, GridSize, Path, SlowEffect,
    BOSS_LEAK_DAMAGE,
};
use path_defence_system_movement::Movement;

fn path(length: u32) -> Path {
    let cells = (0..length).map(|column| CellCoord::new(column, 0)).collect();
    Path::new(GridSize::new(length, 1), cells).expect("valid path")
}

#[test]
fn advances_by_speed_times_delta() {
    let path = path(10);
    let mut enemies = vec![
        Enemy::spawn(EnemyId::new(0), EnemyKind::Runner),
        Enemy::spawn(EnemyId::new(1), EnemyKind::Tank),
    ];
    let mut events = Vec::new();

    let leaked = Movement::new().handle(&path, &mut enemies, 0.5, &mut events);

    assert_eq!(leaked, 0);
    assert!(events.is_empty());
    assert!((enemies[0].progress - 0.65).abs() < 1e-6);
    assert!((enemies[1].progress - 0.35).abs() < 1e-6);
}

#[test]
fn slowed_enemies_move_at_reduced_speed_until_expiry() {
    let path = path(20);
    let mut enemies = vec![Enemy::spawn(EnemyId::new(0), EnemyKind::Runner)];
    enemies[0].apply_slow(SlowEffect {
        multiplier: 0.5,
        duration: 0.6,
    });
    let mut movement = Movement::new();
    let mut events = Vec::new();

    let _ = movement.handle(&path, &mut enemies, 0.5, &mut events);
    assert!((enemies[0].progress - 0.325).abs() < 1e-5);
    assert!((enemies[0].slow_remaining - 0.1).abs() < 1e-5);

    let _ = movement.handle(&path, &mut enemies, 0.5, &mut events);
    assert_eq!(enemies[0].slow_remaining, 0.0);
    assert_eq!(enemies[0].slow_multiplier, 1.0);
    assert!((enemies[0].progress - 0.975).abs() < 1e-5);
}

#[test]
fn reaching_the_last_cell_leaks_once() {
    let path = path(3);
    let mut enemies = vec![Enemy::spawn(EnemyId::new(4), EnemyKind::Tank)];
    enemies[0].progress = 1.9;
    let mut movement = Movement::new();
    let mut events = Vec::new();

    let leaked = movement.handle(&path, &mut enemies, 0.5, &mut events);
    assert_eq!(leaked, 2);
    assert!(enemies.is_empty());
    assert_eq!(
        events,
        vec![Event::EnemyLeaked {
            enemy: EnemyId::new(4),
            damage: 2,
        }]
    );

    let leaked = movement.handle(&path, &mut enemies, 0.5, &mut events);
    assert_eq!(leaked, 0, "removed enemies never leak twice");
    assert_eq!(events.len(), 1);
}

#[test]
fn bosses_leak_their_elevated_damage() {
    let path = path(2);
    let mut enemies = vec![
        Enemy::boss(EnemyId::new(0), BossScaling::default()),
        Enemy::spawn(EnemyId::new(1), EnemyKind::Runner),
    ];
    let mut events = Vec::new();

    let leaked = Movement::new().handle(&path, &mut enemies, 10.0, &mut events);

    assert_eq!(leaked, BOSS_LEAK_DAMAGE + 1);
    assert!(enemies.is_empty());
}
