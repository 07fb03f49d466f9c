use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use path_defence_core::{CellCoord, TowerKind};
use path_defence_world::WorldConfig;
use serde::Deserialize;

const DEFAULT_SEED: u64 = 0x5eed_0f_7041;
const DEFAULT_FRAME_MS: u64 = 16;
const DEFAULT_MAX_FRAME_MS: u64 = 50;

/// Headless Path Defence driver that plays a scripted build order.
#[derive(Debug, Parser)]
#[command(name = "path-defence", version)]
pub(crate) struct Cli {
    /// TOML file with world settings and build orders.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Seed for wave shuffles and critical rolls.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Simulated milliseconds per frame.
    #[arg(long)]
    pub(crate) frame_ms: Option<u64>,
    /// Upper bound on the delta handed to a single tick.
    #[arg(long)]
    pub(crate) max_frame_ms: Option<u64>,
    /// File holding saved level progress.
    #[arg(long, default_value = "path-defence-progress.json")]
    pub(crate) progress: PathBuf,
    /// Frames to simulate before giving up.
    #[arg(long, default_value_t = 500_000)]
    pub(crate) max_frames: u64,
    /// Ignore saved progress and start on the first level.
    #[arg(long)]
    pub(crate) fresh: bool,
}

/// Tower the driver builds at the start of every level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct BuildOrder {
    pub(crate) kind: TowerKind,
    pub(crate) column: u32,
    pub(crate) row: u32,
}

impl BuildOrder {
    pub(crate) fn cell(&self) -> CellCoord {
        CellCoord::new(self.column, self.row)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FileSettings {
    seed: Option<u64>,
    frame_ms: Option<u64>,
    max_frame_ms: Option<u64>,
    world: WorldConfig,
    build: Vec<BuildOrder>,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            seed: None,
            frame_ms: None,
            max_frame_ms: None,
            world: WorldConfig::default(),
            build: default_build_orders(),
        }
    }
}

fn default_build_orders() -> Vec<BuildOrder> {
    vec![
        BuildOrder {
            kind: TowerKind::Cannon,
            column: 4,
            row: 0,
        },
        BuildOrder {
            kind: TowerKind::Frost,
            column: 7,
            row: 7,
        },
    ]
}

fn parse_file(contents: &str) -> Result<FileSettings> {
    toml::from_str(contents).context("failed to parse settings TOML")
}

/// Fully resolved driver settings; command-line flags win over the file.
#[derive(Debug)]
pub(crate) struct Settings {
    pub(crate) world: WorldConfig,
    pub(crate) build: Vec<BuildOrder>,
    pub(crate) seed: u64,
    pub(crate) frame: Duration,
    pub(crate) max_frame: Duration,
    pub(crate) progress: PathBuf,
    pub(crate) max_frames: u64,
    pub(crate) fresh: bool,
}

impl Settings {
    pub(crate) fn resolve(cli: Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read settings from {}", path.display()))?;
                parse_file(&contents)
                    .with_context(|| format!("invalid settings in {}", path.display()))?
            }
            None => FileSettings::default(),
        };
        Ok(Self::merge(cli, file))
    }

    fn merge(cli: Cli, file: FileSettings) -> Self {
        let frame_ms = cli.frame_ms.or(file.frame_ms).unwrap_or(DEFAULT_FRAME_MS);
        let max_frame_ms = cli
            .max_frame_ms
            .or(file.max_frame_ms)
            .unwrap_or(DEFAULT_MAX_FRAME_MS);

        Self {
            world: file.world,
            build: file.build,
            seed: cli.seed.or(file.seed).unwrap_or(DEFAULT_SEED),
            frame: Duration::from_millis(frame_ms),
            max_frame: Duration::from_millis(max_frame_ms),
            progress: cli.progress,
            max_frames: cli.max_frames,
            fresh: cli.fresh,
        }
    }

    /// Delta handed to each tick, clamped so a slow frame cannot skip collisions.
    pub(crate) fn tick_delta(&self) -> Duration {
        self.frame.min(self.max_frame)
    }
}
