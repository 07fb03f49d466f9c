use std::fmt;

use path_defence_core::{Command, EndScreen, Event, PlayMode, SeededRandom, Stats};
use path_defence_world::{apply, persist_events, query, ProgressStore, World};
use tracing::{debug, info, trace};

use crate::settings::Settings;

/// Summary of an autoplay session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub(crate) frames: u64,
    pub(crate) levels_completed: u32,
    pub(crate) kills: u32,
    pub(crate) end_screen: Option<EndScreen>,
    pub(crate) stats: Stats,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = match self.end_screen {
            Some(EndScreen::GameOver) => "game over",
            Some(EndScreen::AllLevelsComplete) => "all levels complete",
            None => "frame limit reached",
        };
        write!(
            f,
            "{result} after {} frames: {} levels cleared, {} enemies killed, \
             {} money, {} base hit points",
            self.frames,
            self.levels_completed,
            self.kills,
            self.stats.money,
            self.stats.base_hit_points
        )
    }
}

/// Drives `world` with fixed frames, rebuilding and restarting on every level.
pub(crate) fn run<S: ProgressStore>(
    world: &mut World,
    settings: &Settings,
    store: &mut S,
) -> Outcome {
    let mut rng = SeededRandom::new(settings.seed);
    let mut events = Vec::new();
    let dt = settings.tick_delta();
    let mut outcome = Outcome {
        frames: 0,
        levels_completed: 0,
        kills: 0,
        end_screen: None,
        stats: query::stats(world),
    };

    prepare_level(world, settings, &mut rng, &mut events);
    flush(store, &mut events, &mut outcome);

    while outcome.frames < settings.max_frames {
        outcome.frames += 1;
        apply(world, Command::Tick { dt }, &mut rng, &mut events);

        match query::play_mode(world) {
            PlayMode::LevelComplete => {
                apply(world, Command::NextLevel, &mut rng, &mut events);
                if query::play_mode(world) == PlayMode::Paused {
                    prepare_level(world, settings, &mut rng, &mut events);
                }
            }
            PlayMode::GameOver | PlayMode::AllLevelsComplete => {
                outcome.end_screen = query::end_screen(world);
            }
            _ => {}
        }

        flush(store, &mut events, &mut outcome);
        if outcome.end_screen.is_some() {
            break;
        }
    }

    outcome.stats = query::stats(world);
    outcome
}

fn prepare_level(
    world: &mut World,
    settings: &Settings,
    rng: &mut SeededRandom,
    events: &mut Vec<Event>,
) {
    let level = query::level(world);
    info!(level = level.id().get(), name = level.name(), "building defences");

    for order in &settings.build {
        apply(
            world,
            Command::SelectTowerKind {
                kind: Some(order.kind),
            },
            rng,
            events,
        );
        apply(world, Command::PlaceTower { cell: order.cell() }, rng, events);
    }
    apply(world, Command::StartWave, rng, events);
}

fn flush<S: ProgressStore>(store: &mut S, events: &mut Vec<Event>, outcome: &mut Outcome) {
    if events.is_empty() {
        return;
    }

    for event in events.iter() {
        trace!(?event, "event");
        match event {
            Event::LevelCompleted { .. } => outcome.levels_completed += 1,
            Event::EnemyKilled { .. } => outcome.kills += 1,
            Event::TowerPlacementRejected { cell, reason } => {
                debug!(column = cell.column(), row = cell.row(), %reason, "build order skipped");
            }
            _ => {}
        }
    }
    debug!(count = events.len(), frame = outcome.frames, "processed events");

    persist_events(store, events);
    events.clear();
}
