#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement and economy rules for constructing, upgrading and selling towers.

use path_defence_core::{
    CellCoord, Event, GridSize, IdAllocator, Path, PlacementError, SaleError, Tower, TowerId,
    TowerKind, TowerLevel, UpgradeError,
};
use tracing::{debug, info};

/// Read-only view of the ground towers are built on.
#[derive(Clone, Copy, Debug)]
pub struct BuildSite<'a> {
    /// Dimensions of the play field.
    pub grid: GridSize,
    /// Enemy path; its cells are never buildable.
    pub path: &'a Path,
    /// Towers already standing.
    pub towers: &'a [Tower],
}

impl BuildSite<'_> {
    /// Tower occupying `cell`, if any.
    #[must_use]
    pub fn tower_at(&self, cell: CellCoord) -> Option<&Tower> {
        self.towers.iter().find(|tower| tower.cell == cell)
    }

    /// Validates a placement of the `armed` kind at `cell` against `money`.
    ///
    /// Checks run in a fixed order and the first failure wins: bounds, path,
    /// occupancy, armed kind, funds.
    pub fn check_placement(
        &self,
        armed: Option<TowerKind>,
        money: u32,
        cell: CellCoord,
    ) -> Result<TowerKind, PlacementError> {
        if !self.grid.contains(cell) {
            return Err(PlacementError::OutOfBounds);
        }
        if self.path.contains(cell) {
            return Err(PlacementError::OnPath);
        }
        if self.tower_at(cell).is_some() {
            return Err(PlacementError::Occupied);
        }
        let kind = armed.ok_or(PlacementError::NoTowerSelected)?;
        let cost = kind.cost();
        if money < cost {
            return Err(PlacementError::InsufficientFunds { cost });
        }
        Ok(kind)
    }

    /// Builds a preview descriptor for `cell`.
    #[must_use]
    pub fn preview(
        &self,
        armed: Option<TowerKind>,
        money: u32,
        cell: CellCoord,
    ) -> PlacementPreview {
        PlacementPreview {
            kind: armed,
            cell,
            verdict: self.check_placement(armed, money, cell).map(|_| ()),
        }
    }
}

/// Declarative placement preview describing a potential tower construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Kind armed for construction, if any.
    pub kind: Option<TowerKind>,
    /// Cell under consideration.
    pub cell: CellCoord,
    /// Whether the placement would succeed, with the first failing reason otherwise.
    pub verdict: Result<(), PlacementError>,
}

impl PlacementPreview {
    /// Reports whether the preview represents a valid placement location.
    #[must_use]
    pub const fn placeable(&self) -> bool {
        self.verdict.is_ok()
    }
}

/// Price of upgrading the selected tower to its next level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeQuote {
    /// Tower that would be upgraded.
    pub tower: TowerId,
    /// Level the tower would reach.
    pub level: TowerLevel,
    /// Currency the upgrade costs.
    pub cost: u32,
}

/// Quotes the upgrade of the `selected` tower against `money`.
pub fn upgrade_quote(
    towers: &[Tower],
    selected: Option<TowerId>,
    money: u32,
) -> Result<UpgradeQuote, UpgradeError> {
    let id = selected.ok_or(UpgradeError::NoSelection)?;
    let tower = towers
        .iter()
        .find(|tower| tower.id == id)
        .ok_or(UpgradeError::MissingTower)?;
    let level = tower.level.next().ok_or(UpgradeError::MaxLevel)?;
    let cost = tower.kind.upgrade_cost(level).ok_or(UpgradeError::MaxLevel)?;
    if money < cost {
        return Err(UpgradeError::InsufficientFunds { cost });
    }
    Ok(UpgradeQuote {
        tower: id,
        level,
        cost,
    })
}

/// Builder system applying validated construction, upgrade and sale requests.
///
/// Every operation validates first and leaves state untouched on failure,
/// reporting the reason through a rejection event.
#[derive(Debug, Default, Clone)]
pub struct Builder;

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Places the armed tower kind at `cell`.
    ///
    /// On success the cost is deducted, a level-1 tower is appended and the
    /// armed kind is cleared.
    #[allow(clippy::too_many_arguments)]
    pub fn place(
        &mut self,
        grid: GridSize,
        path: &Path,
        towers: &mut Vec<Tower>,
        armed: &mut Option<TowerKind>,
        money: &mut u32,
        ids: &mut IdAllocator,
        cell: CellCoord,
        out: &mut Vec<Event>,
    ) -> Option<TowerId> {
        let site = BuildSite {
            grid,
            path,
            towers: towers.as_slice(),
        };
        let kind = match site.check_placement(*armed, *money, cell) {
            Ok(kind) => kind,
            Err(reason) => {
                debug!(column = cell.column(), row = cell.row(), %reason, "placement rejected");
                out.push(Event::TowerPlacementRejected { cell, reason });
                return None;
            }
        };

        let tower = Tower::new(ids.tower(), kind, cell);
        let cost = tower.invested;
        *money -= cost;
        *armed = None;

        info!(
            tower = tower.id.get(),
            ?kind,
            column = cell.column(),
            row = cell.row(),
            cost,
            "tower placed"
        );
        out.push(Event::TowerPlaced {
            tower: tower.id,
            kind,
            cell,
            cost,
        });
        let id = tower.id;
        towers.push(tower);
        Some(id)
    }

    /// Upgrades the `selected` tower by one level.
    pub fn upgrade(
        &mut self,
        towers: &mut [Tower],
        selected: Option<TowerId>,
        money: &mut u32,
        out: &mut Vec<Event>,
    ) -> Option<UpgradeQuote> {
        let quote = match upgrade_quote(towers, selected, *money) {
            Ok(quote) => quote,
            Err(reason) => {
                debug!(%reason, "upgrade rejected");
                out.push(Event::TowerUpgradeRejected { reason });
                return None;
            }
        };

        let tower = towers.iter_mut().find(|tower| tower.id == quote.tower)?;
        tower.level = quote.level;
        tower.invested += quote.cost;
        *money -= quote.cost;

        info!(
            tower = quote.tower.get(),
            level = quote.level.get(),
            cost = quote.cost,
            "tower upgraded"
        );
        out.push(Event::TowerUpgraded {
            tower: quote.tower,
            level: quote.level,
            cost: quote.cost,
        });
        Some(quote)
    }

    /// Sells the `selected` tower for its refund and clears the selection.
    ///
    /// A stale selection is cleared without refunding anything.
    pub fn sell(
        &mut self,
        towers: &mut Vec<Tower>,
        selected: &mut Option<TowerId>,
        money: &mut u32,
        out: &mut Vec<Event>,
    ) -> Option<u32> {
        let Some(id) = *selected else {
            out.push(Event::TowerSaleRejected {
                reason: SaleError::NoSelection,
            });
            return None;
        };
        *selected = None;

        let Some(index) = towers.iter().position(|tower| tower.id == id) else {
            debug!(tower = id.get(), "sale of missing tower");
            out.push(Event::TowerSaleRejected {
                reason: SaleError::MissingTower,
            });
            return None;
        };

        let tower = towers.remove(index);
        let refund = tower.sell_refund();
        *money = money.saturating_add(refund);

        info!(tower = id.get(), refund, "tower sold");
        out.push(Event::TowerSold { tower: id, refund });
        Some(refund)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_quote_requires_selection() {
        assert_eq!(
            upgrade_quote(&[], None, 500),
            Err(UpgradeError::NoSelection)
        );
        assert_eq!(
            upgrade_quote(&[], Some(TowerId::new(3)), 500),
            Err(UpgradeError::MissingTower)
        );
    }

    #[test]
    fn preview_reports_first_failure() {
        let path = Path::new(
            GridSize::new(3, 3),
            vec![CellCoord::new(0, 0), CellCoord::new(1, 0)],
        )
        .expect("valid path");
        let site = BuildSite {
            grid: GridSize::new(3, 3),
            path: &path,
            towers: &[],
        };

        let preview = site.preview(None, 0, CellCoord::new(0, 0));
        assert_eq!(preview.verdict, Err(PlacementError::OnPath));
        assert!(!preview.placeable());
        assert!(site
            .preview(Some(TowerKind::Cannon), 50, CellCoord::new(2, 2))
            .placeable());
    }
}
