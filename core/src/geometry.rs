//! Continuous geometry expressed in cell units.

use crate::CellCoord;

const DIRECTION_EPSILON: f32 = 1e-6;
const DEGENERATE_SEGMENT: f32 = 1e-9;

/// Continuous position measured in cell units, where `(column + 0.5, row + 0.5)`
/// is the centre of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellPoint {
    column: f32,
    row: f32,
}

impl CellPoint {
    /// Creates a new point from fractional column and row coordinates.
    #[must_use]
    pub const fn new(column: f32, row: f32) -> Self {
        Self { column, row }
    }

    /// Centre of the provided cell.
    #[must_use]
    pub fn center_of(cell: CellCoord) -> Self {
        Self::new(cell.column() as f32 + 0.5, cell.row() as f32 + 0.5)
    }

    /// Horizontal coordinate in cell units.
    #[must_use]
    pub const fn column(&self) -> f32 {
        self.column
    }

    /// Vertical coordinate in cell units.
    #[must_use]
    pub const fn row(&self) -> f32 {
        self.row
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: CellPoint) -> f32 {
        let dx = other.column - self.column;
        let dy = other.row - self.row;
        dx * dx + dy * dy
    }

    /// Linear interpolation toward `other` by `t` in `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: CellPoint, t: f32) -> Self {
        Self::new(
            self.column + (other.column - self.column) * t,
            self.row + (other.row - self.row) * t,
        )
    }

    /// Unit vector pointing from `self` toward `target`.
    ///
    /// Returns `None` when the points coincide.
    #[must_use]
    pub fn direction_to(self, target: CellPoint) -> Option<CellPoint> {
        let dx = target.column - self.column;
        let dy = target.row - self.row;
        let length = dx.hypot(dy);
        if length <= DIRECTION_EPSILON {
            return None;
        }
        Some(Self::new(dx / length, dy / length))
    }

    /// Translates the point along `direction` by `distance`.
    #[must_use]
    pub fn offset(self, direction: CellPoint, distance: f32) -> Self {
        Self::new(
            self.column + direction.column * distance,
            self.row + direction.row * distance,
        )
    }
}

/// Squared distance from `point` to the closest point on the segment `start..end`.
#[must_use]
pub fn segment_distance_squared(point: CellPoint, start: CellPoint, end: CellPoint) -> f32 {
    let abx = end.column - start.column;
    let aby = end.row - start.row;
    let apx = point.column - start.column;
    let apy = point.row - start.row;

    let length_sq = abx * abx + aby * aby;
    if length_sq <= DEGENERATE_SEGMENT {
        return apx * apx + apy * apy;
    }

    let t = ((apx * abx + apy * aby) / length_sq).clamp(0.0, 1.0);
    let closest = CellPoint::new(start.column + abx * t, start.row + aby * t);
    point.distance_squared(closest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_center_sits_half_a_cell_in() {
        let center = CellPoint::center_of(CellCoord::new(3, 4));
        assert_eq!(center, CellPoint::new(3.5, 4.5));
    }

    #[test]
    fn direction_is_normalised() {
        let direction = CellPoint::new(0.0, 0.0)
            .direction_to(CellPoint::new(3.0, 4.0))
            .expect("points differ");
        assert!((direction.column() - 0.6).abs() < 1e-6);
        assert!((direction.row() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn coincident_points_have_no_direction() {
        let point = CellPoint::new(1.5, 1.5);
        assert!(point.direction_to(point).is_none());
    }

    #[test]
    fn segment_distance_uses_closest_interior_point() {
        let distance = segment_distance_squared(
            CellPoint::new(1.0, 1.0),
            CellPoint::new(0.0, 0.0),
            CellPoint::new(2.0, 0.0),
        );
        assert!((distance - 1.0).abs() < 1e-6);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let distance = segment_distance_squared(
            CellPoint::new(5.0, 0.0),
            CellPoint::new(0.0, 0.0),
            CellPoint::new(2.0, 0.0),
        );
        assert!((distance - 9.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_segment_measures_to_start() {
        let start = CellPoint::new(1.0, 1.0);
        let distance = segment_distance_squared(CellPoint::new(1.0, 2.0), start, start);
        assert!((distance - 1.0).abs() < 1e-6);
    }
}
