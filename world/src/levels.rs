//! Level definitions and the validated level catalog.

use std::collections::BTreeMap;

use path_defence_core::{CellCoord, GridSize, LevelId, Path, PathError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Share of the grid above which a path is reported as crowding out tower space.
const CROWDED_PATH_SHARE: f64 = 0.45;

/// Colours used to draw a level, as CSS colour strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Field background.
    pub background: String,
    /// Grid lines.
    pub grid: String,
    /// Path cell fill.
    pub path_fill: String,
    /// Path cell outline.
    pub path_stroke: String,
    /// Tower body fill.
    pub tower_fill: String,
}

impl Palette {
    fn new(
        background: &str,
        grid: &str,
        path_fill: &str,
        path_stroke: &str,
        tower_fill: &str,
    ) -> Self {
        Self {
            background: background.to_owned(),
            grid: grid.to_owned(),
            path_fill: path_fill.to_owned(),
            path_stroke: path_stroke.to_owned(),
            tower_fill: tower_fill.to_owned(),
        }
    }
}

/// Shape of a level's enemy path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PathShape {
    /// Rows walked edge to edge in alternating directions, starting left to right.
    Serpentine {
        /// First row covered by the path.
        first_row: u32,
        /// Last row covered by the path.
        last_row: u32,
    },
    /// Explicit list of cells from entrance to exit.
    Cells {
        /// Ordered path cells.
        cells: Vec<CellCoord>,
    },
}

impl PathShape {
    /// Expands the shape into ordered cells for `grid`.
    ///
    /// Serpentine rows are clamped into the grid.
    #[must_use]
    pub fn cells(&self, grid: GridSize) -> Vec<CellCoord> {
        match self {
            Self::Serpentine {
                first_row,
                last_row,
            } => serpentine(grid, *first_row, *last_row),
            Self::Cells { cells } => cells.clone(),
        }
    }
}

fn serpentine(grid: GridSize, first_row: u32, last_row: u32) -> Vec<CellCoord> {
    let max_row = grid.rows().saturating_sub(1);
    let first = first_row.min(max_row);
    let last = last_row.min(max_row);
    let columns = grid.columns();

    let mut cells = Vec::new();
    for row in first..=last {
        if (row - first) % 2 == 0 {
            cells.extend((0..columns).map(|column| CellCoord::new(column, row)));
        } else {
            cells.extend((0..columns).rev().map(|column| CellCoord::new(column, row)));
        }
    }
    cells
}

/// Static description of a playable level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Identifier of the level.
    pub id: LevelId,
    /// Display name.
    pub name: String,
    /// Colour palette.
    pub palette: Palette,
    /// Number of waves that must be cleared to complete the level.
    pub waves: u32,
    /// Enemy path.
    pub path: PathShape,
}

/// Defects that make a level catalog unusable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The catalog contains no levels.
    #[error("level catalog is empty")]
    Empty,
    /// Two levels share an identifier.
    #[error("duplicate level id {}", level.get())]
    DuplicateId {
        /// Repeated identifier.
        level: LevelId,
    },
    /// A level has no waves to play.
    #[error("level {} has no waves", level.get())]
    NoWaves {
        /// Offending level.
        level: LevelId,
    },
    /// A level path failed validation.
    #[error("level {} has an invalid path", level.get())]
    InvalidPath {
        /// Offending level.
        level: LevelId,
        /// Path defect.
        #[source]
        source: PathError,
    },
}

/// Level with its validated path.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    definition: LevelDefinition,
    path: Path,
}

impl Level {
    /// Identifier of the level.
    #[must_use]
    pub fn id(&self) -> LevelId {
        self.definition.id
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Colour palette of the level.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.definition.palette
    }

    /// Number of waves in the level.
    #[must_use]
    pub fn waves(&self) -> u32 {
        self.definition.waves
    }

    /// Validated enemy path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Ordered collection of validated levels.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelCatalog {
    levels: BTreeMap<LevelId, Level>,
    first: Level,
}

impl LevelCatalog {
    /// Validates every definition against `grid` and builds the catalog.
    pub fn new(grid: GridSize, definitions: Vec<LevelDefinition>) -> Result<Self, LevelError> {
        let mut levels = BTreeMap::new();
        for definition in definitions {
            let level = definition.id;
            if definition.waves == 0 {
                return Err(LevelError::NoWaves { level });
            }

            let path = Path::new(grid, definition.path.cells(grid))
                .map_err(|source| LevelError::InvalidPath { level, source })?;

            let share = path.len() as f64 / grid.cell_count().max(1) as f64;
            if share > CROWDED_PATH_SHARE {
                warn!(
                    level = level.get(),
                    cells = path.len(),
                    share,
                    "level path covers most of the grid"
                );
            }

            if levels
                .insert(level, Level { definition, path })
                .is_some()
            {
                return Err(LevelError::DuplicateId { level });
            }
        }

        let first = levels
            .values()
            .next()
            .cloned()
            .ok_or(LevelError::Empty)?;
        Ok(Self { levels, first })
    }

    /// Catalog of the three built-in levels.
    pub fn builtin(grid: GridSize) -> Result<Self, LevelError> {
        Self::new(grid, builtin_definitions())
    }

    /// Identifier of the lowest-numbered level.
    #[must_use]
    pub fn first_id(&self) -> LevelId {
        self.first().id()
    }

    fn first(&self) -> &Level {
        &self.first
    }

    /// Reports whether a level with `id` exists.
    #[must_use]
    pub fn contains(&self, id: LevelId) -> bool {
        self.levels.contains_key(&id)
    }

    /// Looks up a level by identifier.
    #[must_use]
    pub fn get(&self, id: LevelId) -> Option<&Level> {
        self.levels.get(&id)
    }

    /// Looks up a level, falling back to the first level for unknown ids.
    #[must_use]
    pub fn resolve(&self, id: LevelId) -> &Level {
        match self.levels.get(&id) {
            Some(level) => level,
            None => {
                let fallback = self.first();
                warn!(
                    requested = id.get(),
                    fallback = fallback.id().get(),
                    "unknown level, loading the first level"
                );
                fallback
            }
        }
    }

    /// Number of levels in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Reports whether the catalog is empty. Constructed catalogs never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Levels in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.values()
    }
}

/// Definitions of the built-in levels.
#[must_use]
pub fn builtin_definitions() -> Vec<LevelDefinition> {
    vec![
        LevelDefinition {
            id: LevelId::new(1),
            name: "Training Ground".to_owned(),
            palette: Palette::new(
                "#0b1020",
                "rgba(255,255,255,0.10)",
                "rgba(255, 210, 100, 0.22)",
                "rgba(255, 210, 100, 0.40)",
                "rgba(120, 220, 255, 0.18)",
            ),
            waves: 5,
            path: PathShape::Serpentine {
                first_row: 2,
                last_row: 5,
            },
        },
        LevelDefinition {
            id: LevelId::new(2),
            name: "Sand Dunes".to_owned(),
            palette: Palette::new(
                "#1b140c",
                "rgba(255,240,200,0.10)",
                "rgba(255, 170, 70, 0.20)",
                "rgba(255, 170, 70, 0.42)",
                "rgba(170, 255, 200, 0.16)",
            ),
            waves: 7,
            path: PathShape::Serpentine {
                first_row: 1,
                last_row: 4,
            },
        },
        LevelDefinition {
            id: LevelId::new(3),
            name: "Neon Quarter".to_owned(),
            palette: Palette::new(
                "#070812",
                "rgba(190,170,255,0.10)",
                "rgba(180, 120, 255, 0.18)",
                "rgba(180, 120, 255, 0.45)",
                "rgba(120, 255, 220, 0.16)",
            ),
            waves: 10,
            path: PathShape::Serpentine {
                first_row: 3,
                last_row: 6,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridSize {
        GridSize::new(12, 18)
    }

    #[test]
    fn builtin_levels_validate() {
        let catalog = LevelCatalog::builtin(grid()).expect("built-in levels are valid");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.first_id(), LevelId::new(1));
        for level in catalog.iter() {
            assert_eq!(level.path().len(), 48);
        }
    }

    #[test]
    fn serpentine_turns_at_the_edges() {
        let cells = serpentine(GridSize::new(3, 4), 1, 2);
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 1),
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
                CellCoord::new(2, 2),
                CellCoord::new(1, 2),
                CellCoord::new(0, 2),
            ]
        );
    }

    #[test]
    fn unknown_ids_resolve_to_the_first_level() {
        let catalog = LevelCatalog::builtin(grid()).expect("valid");
        assert_eq!(catalog.resolve(LevelId::new(99)).id(), LevelId::new(1));
        assert_eq!(catalog.resolve(LevelId::new(3)).id(), LevelId::new(3));
    }

    #[test]
    fn invalid_paths_name_the_level() {
        let mut definitions = builtin_definitions();
        definitions[1].path = PathShape::Cells {
            cells: vec![CellCoord::new(0, 0), CellCoord::new(2, 0)],
        };
        let error = LevelCatalog::new(grid(), definitions).expect_err("broken path");
        assert!(matches!(
            error,
            LevelError::InvalidPath {
                source: PathError::NonAdjacent { .. },
                ..
            }
        ));
        assert_eq!(error.to_string(), "level 2 has an invalid path");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut definitions = builtin_definitions();
        definitions[2].id = LevelId::new(1);
        assert_eq!(
            LevelCatalog::new(grid(), definitions),
            Err(LevelError::DuplicateId {
                level: LevelId::new(1)
            })
        );
    }

    #[test]
    fn empty_catalogs_are_rejected() {
        assert_eq!(LevelCatalog::new(grid(), Vec::new()), Err(LevelError::Empty));
    }
}
