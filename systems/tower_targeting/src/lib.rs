#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks a target for every tower ready to fire.

use path_defence_core::{CellPoint, Enemy, EnemyId, Path, Tower, TowerId, TowerKind};

/// Ordering a tower uses to choose among enemies in range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetPriority {
    /// Highest effective speed first, ties broken by greater progress.
    Fastest,
    /// Greatest progress first, ties broken by the most damage already taken.
    Furthest,
}

impl TargetPriority {
    /// Priority used by towers of the provided kind.
    #[must_use]
    pub const fn for_kind(kind: TowerKind) -> Self {
        match kind {
            TowerKind::Frost => Self::Fastest,
            TowerKind::Cannon | TowerKind::Sniper => Self::Furthest,
        }
    }
}

/// Target chosen for a tower during the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that will fire.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Centre of the tower's cell.
    pub tower_center: CellPoint,
    /// Current interpolated position of the enemy.
    pub enemy_position: CellPoint,
}

/// Tower targeting system that reuses a scratch buffer of enemy positions.
#[derive(Clone, Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes targets for every tower whose cooldown has elapsed.
    ///
    /// The output buffer is cleared before populating it. Towers still cooling
    /// down, or with no enemy in range, produce no entry.
    pub fn handle(
        &mut self,
        towers: &[Tower],
        path: &Path,
        enemies: &[Enemy],
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(path, enemies);

        for tower in towers {
            if tower.cooldown > 0.0 {
                continue;
            }

            let center = tower.center();
            let range = tower.params().range;
            if let Some(best) = self.select(TargetPriority::for_kind(tower.kind), center, range) {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best.id,
                    tower_center: center,
                    enemy_position: best.position,
                });
            }
        }
    }

    fn prepare_enemy_workspace(&mut self, path: &Path, enemies: &[Enemy]) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for enemy in enemies {
            self.enemy_workspace.push(EnemyCandidate {
                id: enemy.id,
                position: path.position_at(enemy.progress),
                progress: enemy.progress,
                effective_speed: enemy.effective_speed(),
                damage_taken: enemy.damage_taken(),
            });
        }
    }

    fn select(
        &self,
        priority: TargetPriority,
        center: CellPoint,
        range: f32,
    ) -> Option<EnemyCandidate> {
        let range_sq = range * range;
        let mut best: Option<BestCandidate> = None;

        for candidate in &self.enemy_workspace {
            if center.distance_squared(candidate.position) > range_sq {
                continue;
            }

            let current = BestCandidate::score(priority, *candidate);
            match &mut best {
                Some(existing) => {
                    if current.precedes(existing) {
                        *existing = current;
                    }
                }
                None => best = Some(current),
            }
        }

        best.map(|best| best.candidate)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: CellPoint,
    progress: f32,
    effective_speed: f32,
    damage_taken: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    primary: f32,
    secondary: f32,
    candidate: EnemyCandidate,
}

impl BestCandidate {
    fn score(priority: TargetPriority, candidate: EnemyCandidate) -> Self {
        let (primary, secondary) = match priority {
            TargetPriority::Fastest => (candidate.effective_speed, candidate.progress),
            TargetPriority::Furthest => (candidate.progress, candidate.damage_taken as f32),
        };
        Self {
            primary,
            secondary,
            candidate,
        }
    }

    // Strict comparisons keep the earliest candidate on exact ties.
    fn precedes(&self, other: &Self) -> bool {
        if self.primary != other.primary {
            return self.primary > other.primary;
        }

        self.secondary > other.secondary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{CellCoord, EnemyKind, GridSize};

    fn path() -> Path {
        let cells = (0..10).map(|column| CellCoord::new(column, 0)).collect();
        Path::new(GridSize::new(10, 3), cells).expect("valid path")
    }

    fn enemy(id: u32, kind: EnemyKind, progress: f32) -> Enemy {
        let mut enemy = Enemy::spawn(EnemyId::new(id), kind);
        enemy.progress = progress;
        enemy
    }

    #[test]
    fn priority_follows_tower_kind() {
        assert_eq!(TargetPriority::for_kind(TowerKind::Frost), TargetPriority::Fastest);
        assert_eq!(TargetPriority::for_kind(TowerKind::Cannon), TargetPriority::Furthest);
        assert_eq!(TargetPriority::for_kind(TowerKind::Sniper), TargetPriority::Furthest);
    }

    #[test]
    fn exact_ties_keep_first_enemy() {
        let mut system = TowerTargeting::new();
        let towers = vec![Tower::new(TowerId::new(0), TowerKind::Cannon, CellCoord::new(3, 1))];
        let enemies = vec![
            enemy(5, EnemyKind::Runner, 3.0),
            enemy(2, EnemyKind::Runner, 3.0),
        ];
        let mut out = Vec::new();

        system.handle(&towers, &path(), &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(5));
    }

    #[test]
    fn cooling_towers_do_not_target() {
        let mut system = TowerTargeting::new();
        let mut tower = Tower::new(TowerId::new(0), TowerKind::Cannon, CellCoord::new(3, 1));
        tower.cooldown = 0.2;
        let enemies = vec![enemy(1, EnemyKind::Runner, 3.0)];
        let mut out = vec![TowerTarget {
            tower: TowerId::new(9),
            enemy: EnemyId::new(9),
            tower_center: CellPoint::default(),
            enemy_position: CellPoint::default(),
        }];

        system.handle(&[tower], &path(), &enemies, &mut out);

        assert!(out.is_empty());
    }
}
