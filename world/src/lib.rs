#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.
//!
//! The [`World`] owns every entity of a play session. Adapters mutate it only
//! through [`apply`] (or the operation functions it dispatches to) and observe
//! it through the [`query`] module and the emitted [`Event`] stream.

mod config;
mod levels;
mod progress;

use std::time::Duration;

use path_defence_core::{
    Bullet, CellCoord, Command, Enemy, EndScreen, Event, IdAllocator, LevelId, PlayMode,
    RandomSource, Stats, Tower, TowerId, TowerKind, WaveState, WaveStatus,
};
use path_defence_system_builder::Builder;
use path_defence_system_movement::Movement;
use path_defence_system_projectiles::Projectiles;
use path_defence_system_spawning::Spawning;
use path_defence_system_tower_combat::TowerCombat;
use path_defence_system_wave_generation::WaveGeneration;
use tracing::{debug, info};

pub use config::{Rules, WorldConfig};
pub use levels::{
    builtin_definitions, Level, LevelCatalog, LevelDefinition, LevelError, Palette, PathShape,
};
pub use progress::{persist_events, MemoryProgressStore, Progress, ProgressError, ProgressStore};

/// Systems owned by the world, kept between calls so their scratch buffers are reused.
#[derive(Clone, Debug, Default)]
struct Systems {
    spawning: Spawning,
    movement: Movement,
    tower_combat: TowerCombat,
    projectiles: Projectiles,
    builder: Builder,
}

/// Represents the authoritative Path Defence world state.
#[derive(Clone, Debug)]
pub struct World {
    config: WorldConfig,
    catalog: LevelCatalog,
    level: Level,
    generation: WaveGeneration,
    towers: Vec<Tower>,
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    wave: WaveState,
    stats: Stats,
    mode: PlayMode,
    armed: Option<TowerKind>,
    selected_tower: Option<TowerId>,
    end_screen: Option<EndScreen>,
    ids: IdAllocator,
    systems: Systems,
}

impl World {
    /// Creates a world on the level recorded in `progress`, or the first level.
    ///
    /// Fails when the configured levels do not form a valid catalog.
    pub fn new(config: WorldConfig, progress: Option<Progress>) -> Result<Self, LevelError> {
        let catalog = if config.levels.is_empty() {
            LevelCatalog::builtin(config.grid)?
        } else {
            LevelCatalog::new(config.grid, config.levels.clone())?
        };

        let level = match progress {
            Some(progress) => catalog.resolve(progress.level_id()).clone(),
            None => catalog.resolve(catalog.first_id()).clone(),
        };
        info!(level = level.id().get(), name = level.name(), "world created");

        Ok(Self {
            generation: WaveGeneration::new(config.waves.clone()),
            stats: starting_stats(&config.rules),
            catalog,
            level,
            config,
            towers: Vec::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            wave: WaveState::ready(),
            mode: PlayMode::Idle,
            armed: None,
            selected_tower: None,
            end_screen: None,
            ids: IdAllocator::new(),
            systems: Systems::default(),
        })
    }

    fn set_mode(&mut self, mode: PlayMode, out_events: &mut Vec<Event>) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "play mode changed");
            self.mode = mode;
            out_events.push(Event::PlayModeChanged { mode });
        }
    }

    fn begin_wave<R: RandomSource>(&mut self, rng: &mut R, out_events: &mut Vec<Event>) {
        let wave = self.stats.wave_in_level;
        let queue = self.generation.queue(wave, rng);
        let units = u32::try_from(queue.len()).unwrap_or(u32::MAX);
        self.wave.begin(queue, self.generation.spawn_interval(wave));

        info!(level = self.level.id().get(), wave, units, "wave started");
        out_events.push(Event::WaveStarted { wave, units });
    }

    fn complete_wave_if_cleared(&mut self, out_events: &mut Vec<Event>) {
        let cleared = self.wave.status == WaveStatus::InProgress
            && self.wave.queue.is_empty()
            && self.enemies.is_empty();
        if !cleared {
            return;
        }

        let wave = self.stats.wave_in_level;
        info!(level = self.level.id().get(), wave, "wave completed");
        out_events.push(Event::WaveCompleted { wave });

        if wave >= self.level.waves() {
            self.wave = WaveState::ready();
            info!(level = self.level.id().get(), "level completed");
            out_events.push(Event::LevelCompleted {
                level: self.level.id(),
            });
            self.set_mode(PlayMode::LevelComplete, out_events);
        } else {
            self.stats.wave_in_level = wave + 1;
            self.wave = WaveState::ready();
            self.wave.intermission = self.config.rules.intermission;
        }
    }

    fn advance_intermission<R: RandomSource>(
        &mut self,
        dt: f32,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) {
        if self.mode != PlayMode::Running
            || self.wave.status != WaveStatus::Ready
            || self.wave.intermission <= 0.0
        {
            return;
        }

        self.wave.intermission = (self.wave.intermission - dt).max(0.0);
        if self.wave.intermission <= 0.0 {
            self.begin_wave(rng, out_events);
        }
    }

    fn enter_level(&mut self, id: LevelId, out_events: &mut Vec<Event>) {
        self.level = self.catalog.resolve(id).clone();
        self.towers.clear();
        self.enemies.clear();
        self.bullets.clear();
        self.armed = None;
        self.selected_tower = None;
        self.wave = WaveState::ready();
        self.stats.wave_in_level = 1;

        info!(level = self.level.id().get(), name = self.level.name(), "level loaded");
        out_events.push(Event::LevelLoaded {
            level: self.level.id(),
        });
    }
}

fn starting_stats(rules: &Rules) -> Stats {
    Stats {
        base_hit_points: rules.starting_base_hit_points,
        money: rules.starting_money,
        wave_in_level: 1,
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply<R: RandomSource>(
    world: &mut World,
    command: Command,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) {
    match command {
        Command::Tick { dt } => step(world, dt, rng, out_events),
        Command::StartWave => start_wave(world, rng, out_events),
        Command::TogglePause => toggle_pause(world, out_events),
        Command::SelectTowerKind { kind } => select_tower_kind(world, kind),
        Command::SelectTower { tower } => select_tower(world, tower),
        Command::PlaceTower { cell } => {
            let _ = place_tower(world, cell, out_events);
        }
        Command::UpgradeSelectedTower => upgrade_selected_tower(world, out_events),
        Command::SellSelectedTower => sell_selected_tower(world, out_events),
        Command::LoadLevel { level } => load_level(world, level, out_events),
        Command::GoToLevel { level } => go_to_level(world, level, out_events),
        Command::NextLevel => next_level(world, out_events),
        Command::ResetGame { end_screen } => reset_game(world, end_screen, out_events),
    }
}

/// Advances the simulation by `dt`. Does nothing unless the world is running.
///
/// Sub-steps run in a fixed order: spawning, movement and leaks, tower fire,
/// projectile flight, wave completion, then the intermission countdown. A base
/// with no hit points left resets the session behind the game-over screen.
pub fn step<R: RandomSource>(
    world: &mut World,
    dt: Duration,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) {
    if world.mode != PlayMode::Running {
        return;
    }
    out_events.push(Event::TimeAdvanced { dt });
    let seconds = dt.as_secs_f32();

    world.systems.spawning.handle(
        &mut world.wave,
        seconds,
        &mut world.ids,
        &mut world.enemies,
        out_events,
    );

    let leaked = world.systems.movement.handle(
        world.level.path(),
        &mut world.enemies,
        seconds,
        out_events,
    );
    world.stats.base_hit_points = world.stats.base_hit_points.saturating_sub(leaked);

    world.systems.tower_combat.handle(
        &mut world.towers,
        world.level.path(),
        &world.enemies,
        seconds,
        &mut world.ids,
        rng,
        &mut world.bullets,
        out_events,
    );

    let earned = world.systems.projectiles.handle(
        &mut world.bullets,
        world.level.path(),
        &mut world.enemies,
        seconds,
        out_events,
    );
    world.stats.money = world.stats.money.saturating_add(earned);

    world.complete_wave_if_cleared(out_events);
    world.advance_intermission(seconds, rng, out_events);

    if world.stats.base_hit_points == 0 {
        info!(level = world.level.id().get(), "base destroyed");
        reset_game(world, Some(EndScreen::GameOver), out_events);
    }
}

/// Starts the current wave when the wave state is ready.
///
/// Ignored behind an end screen and while a completed level awaits the next one.
pub fn start_wave<R: RandomSource>(world: &mut World, rng: &mut R, out_events: &mut Vec<Event>) {
    if world.wave.status != WaveStatus::Ready {
        debug!(status = ?world.wave.status, "wave already under way");
        return;
    }
    if matches!(
        world.mode,
        PlayMode::GameOver | PlayMode::AllLevelsComplete | PlayMode::LevelComplete
    ) {
        debug!(mode = ?world.mode, "wave start ignored");
        return;
    }

    world.begin_wave(rng, out_events);
    world.set_mode(PlayMode::Running, out_events);
}

/// Flips between running and paused. An idle world starts running.
pub fn toggle_pause(world: &mut World, out_events: &mut Vec<Event>) {
    let mode = match world.mode {
        PlayMode::Running => PlayMode::Paused,
        PlayMode::Paused | PlayMode::Idle => PlayMode::Running,
        _ => return,
    };
    world.set_mode(mode, out_events);
}

/// Arms `kind` for construction. Arming a kind clears the tower selection.
pub fn select_tower_kind(world: &mut World, kind: Option<TowerKind>) {
    world.armed = kind;
    if kind.is_some() {
        world.selected_tower = None;
    }
}

/// Selects a tower for the upgrade and sell panel. Selecting disarms construction.
pub fn select_tower(world: &mut World, tower: Option<TowerId>) {
    world.selected_tower = tower;
    if tower.is_some() {
        world.armed = None;
    }
}

/// Places the armed tower kind at `cell`, returning the new tower on success.
pub fn place_tower(
    world: &mut World,
    cell: CellCoord,
    out_events: &mut Vec<Event>,
) -> Option<TowerId> {
    world.systems.builder.place(
        world.config.grid,
        world.level.path(),
        &mut world.towers,
        &mut world.armed,
        &mut world.stats.money,
        &mut world.ids,
        cell,
        out_events,
    )
}

/// Upgrades the selected tower by one level.
pub fn upgrade_selected_tower(world: &mut World, out_events: &mut Vec<Event>) {
    let _ = world.systems.builder.upgrade(
        &mut world.towers,
        world.selected_tower,
        &mut world.stats.money,
        out_events,
    );
}

/// Sells the selected tower and clears the selection.
pub fn sell_selected_tower(world: &mut World, out_events: &mut Vec<Event>) {
    let _ = world.systems.builder.sell(
        &mut world.towers,
        &mut world.selected_tower,
        &mut world.stats.money,
        out_events,
    );
}

/// Loads `level` while keeping money and base hit points. The world is left paused.
///
/// Unknown identifiers load the first level.
pub fn load_level(world: &mut World, level: LevelId, out_events: &mut Vec<Event>) {
    world.enter_level(level, out_events);
    world.set_mode(PlayMode::Paused, out_events);
}

/// Enters `level` from level select as a fresh game.
pub fn go_to_level(world: &mut World, level: LevelId, out_events: &mut Vec<Event>) {
    world.enter_level(level, out_events);
    world.stats = starting_stats(&world.config.rules);
    world.end_screen = None;
    world.set_mode(PlayMode::Idle, out_events);
}

/// Loads the following level, or finishes the campaign after the last one.
pub fn next_level(world: &mut World, out_events: &mut Vec<Event>) {
    let next = world.level.id().next();
    if next != world.level.id() && world.catalog.contains(next) {
        load_level(world, next, out_events);
    } else {
        info!(level = world.level.id().get(), "campaign finished");
        reset_game(world, Some(EndScreen::AllLevelsComplete), out_events);
    }
}

/// Restarts on the first level with starting stats and clears saved progress.
///
/// The world is left behind `end_screen` when one is given, idle otherwise.
pub fn reset_game(world: &mut World, end_screen: Option<EndScreen>, out_events: &mut Vec<Event>) {
    let first = world.catalog.first_id();
    world.enter_level(first, out_events);
    out_events.push(Event::ProgressCleared);

    world.stats = starting_stats(&world.config.rules);
    world.end_screen = end_screen;
    info!(?end_screen, "game reset");
    out_events.push(Event::GameReset { end_screen });

    let mode = end_screen.map_or(PlayMode::Idle, EndScreen::play_mode);
    world.set_mode(mode, out_events);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use path_defence_core::{
        Bullet, CellCoord, CellPoint, EndScreen, Enemy, EnemyId, GridSize, Path, PlayMode, Stats,
        Tower, TowerId, TowerKind, UpgradeError, WaveState,
    };
    use path_defence_system_builder::{upgrade_quote, BuildSite, PlacementPreview, UpgradeQuote};

    use super::World;
    use crate::{Level, LevelCatalog, WorldConfig};

    /// Active play mode.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.mode
    }

    /// Base hit points, currency and wave counter.
    #[must_use]
    pub fn stats(world: &World) -> Stats {
        world.stats
    }

    /// Level currently loaded.
    #[must_use]
    pub fn level(world: &World) -> &Level {
        &world.level
    }

    /// Every level available for selection.
    #[must_use]
    pub fn catalog(world: &World) -> &LevelCatalog {
        &world.catalog
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Dimensions of the play field.
    #[must_use]
    pub fn grid(world: &World) -> GridSize {
        world.config.grid
    }

    /// Path of the current level.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        world.level.path()
    }

    /// Towers in construction order.
    #[must_use]
    pub fn towers(world: &World) -> &[Tower] {
        &world.towers
    }

    /// Live enemies in spawn order.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        &world.enemies
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn bullets(world: &World) -> &[Bullet] {
        &world.bullets
    }

    /// Spawn queue and timers of the current wave.
    #[must_use]
    pub fn wave(world: &World) -> &WaveState {
        &world.wave
    }

    /// Tower kind armed for construction.
    #[must_use]
    pub fn armed_tower_kind(world: &World) -> Option<TowerKind> {
        world.armed
    }

    /// Tower selected for the upgrade and sell panel.
    #[must_use]
    pub fn selected_tower(world: &World) -> Option<TowerId> {
        world.selected_tower
    }

    /// End screen shown after the last reset, if any.
    #[must_use]
    pub fn end_screen(world: &World) -> Option<EndScreen> {
        world.end_screen
    }

    fn build_site(world: &World) -> BuildSite<'_> {
        BuildSite {
            grid: world.config.grid,
            path: world.level.path(),
            towers: &world.towers,
        }
    }

    /// Describes whether the armed kind could be built at `cell`, and why not.
    #[must_use]
    pub fn can_place_tower(world: &World, cell: CellCoord) -> PlacementPreview {
        build_site(world).preview(world.armed, world.stats.money, cell)
    }

    /// Tower standing on `cell`, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<&Tower> {
        world.towers.iter().find(|tower| tower.cell == cell)
    }

    /// Quotes the upgrade of the selected tower, or reports why it is unavailable.
    pub fn can_upgrade_selected_tower(world: &World) -> Result<UpgradeQuote, UpgradeError> {
        upgrade_quote(&world.towers, world.selected_tower, world.stats.money)
    }

    /// Continuous positions of the live enemies, for drawing.
    pub fn enemy_positions(world: &World) -> impl Iterator<Item = (EnemyId, CellPoint)> + '_ {
        let path = world.level.path();
        world
            .enemies
            .iter()
            .map(move |enemy| (enemy.id, path.position_at(enemy.progress)))
    }
}
