//! Candidate position generation.
//!
//! A [`CandidateQuery`] describes one search: a footprint, its zone, the
//! fixed obstacles and the items already placed in the run. Iterating it
//! yields feasible top-left positions lazily, so callers can stop at the
//! first acceptable one. The query borrows everything it needs and holds no
//! mutable state, so it can be iterated any number of times.

use crate::collision::{clears_obstacles, clears_placed};
use roomfit_core::{Obstacle, Rect, SpacingPolicy, EPSILON};

/// One candidate search.
#[derive(Debug, Clone)]
pub struct CandidateQuery<'a> {
    zone: Rect,
    footprint: Rect,
    obstacles: &'a [Obstacle],
    placed: &'a [Rect],
    wall_margin: f64,
    obstacle_margin: f64,
    spacing: f64,
    spacing_policy: Option<&'a SpacingPolicy>,
    grid_step: f64,
    strategic: bool,
}

impl<'a> CandidateQuery<'a> {
    /// Creates a query for a `length x width` footprint in `zone`.
    ///
    /// Defaults: no obstacles, nothing placed, zero margins and spacing,
    /// grid step 0.2, raster order only.
    pub fn new(zone: Rect, length: f64, width: f64) -> roomfit_core::Result<Self> {
        Ok(Self {
            zone,
            footprint: Rect::new(zone.x(), zone.y(), length, width)?,
            obstacles: &[],
            placed: &[],
            wall_margin: 0.0,
            obstacle_margin: 0.0,
            spacing: 0.0,
            spacing_policy: None,
            grid_step: 0.2,
            strategic: false,
        })
    }

    pub fn with_obstacles(mut self, obstacles: &'a [Obstacle]) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn with_placed(mut self, placed: &'a [Rect]) -> Self {
        self.placed = placed;
        self
    }

    pub fn with_wall_margin(mut self, margin: f64) -> Self {
        self.wall_margin = margin;
        self
    }

    pub fn with_obstacle_margin(mut self, margin: f64) -> Self {
        self.obstacle_margin = margin;
        self
    }

    /// Sets the spacing to placed items, optionally scaled by an adaptive policy.
    pub fn with_spacing(mut self, spacing: f64, policy: Option<&'a SpacingPolicy>) -> Self {
        self.spacing = spacing;
        self.spacing_policy = policy;
        self
    }

    pub fn with_grid_step(mut self, step: f64) -> Self {
        self.grid_step = step;
        self
    }

    /// Tries the zone center, corners and mid-wall points before the raster scan.
    pub fn with_strategic_positions(mut self, enabled: bool) -> Self {
        self.strategic = enabled;
        self
    }

    /// Spacing used against placed items.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// The footprint at `(x, y)`.
    pub fn footprint_at(&self, x: f64, y: f64) -> Rect {
        self.footprint.at(x, y)
    }

    /// Checks one position against containment, obstacles and placed items.
    pub fn is_feasible(&self, x: f64, y: f64) -> bool {
        let Some(interior) = self.zone.shrink(self.wall_margin) else {
            return false;
        };
        let rect = self.footprint.at(x, y);
        if !interior.contains(&rect) {
            return false;
        }
        if !clears_obstacles(&rect, self.obstacles, self.obstacle_margin) {
            return false;
        }
        let fixed = SpacingPolicy::fixed();
        let policy = self.spacing_policy.unwrap_or(&fixed);
        clears_placed(&rect, self.placed, self.spacing, policy)
    }

    /// Lazily yields feasible positions.
    pub fn iter(&self) -> Candidates<'_, 'a> {
        Candidates::new(self)
    }

    /// Number of feasible positions (walks the whole sequence).
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    fn scan_axis(&self, origin: f64, extent: f64, size: f64) -> Axis {
        let start = origin + self.wall_margin;
        let end = origin + extent - self.wall_margin - size;
        if end < start - EPSILON || self.grid_step <= 0.0 {
            return Axis {
                start,
                end,
                steps: 0,
            };
        }
        let steps = ((end - start) / self.grid_step + EPSILON).floor().max(0.0) as usize + 1;
        Axis { start, end, steps }
    }

    fn strategic_positions(&self, x_axis: &Axis, y_axis: &Axis) -> Vec<(f64, f64)> {
        let (length, width) = (self.footprint.width(), self.footprint.height());
        let (x_lo, x_hi) = (x_axis.start, x_axis.end);
        let (y_lo, y_hi) = (y_axis.start, y_axis.end);
        let y_mid = self.zone.y() + self.zone.height() / 2.0 - width / 2.0;
        vec![
            (
                self.zone.x() + (self.zone.width() - length) / 2.0,
                self.zone.y() + (self.zone.height() - width) / 2.0,
            ),
            (x_lo, y_lo),
            (x_hi, y_lo),
            (x_lo, y_hi),
            (x_hi, y_hi),
            (x_lo, y_mid),
            (x_hi, y_mid),
        ]
    }
}

#[derive(Debug, Clone, Copy)]
struct Axis {
    start: f64,
    end: f64,
    steps: usize,
}

impl Axis {
    /// `i`-th grid coordinate, computed from the start to avoid drift.
    fn at(&self, i: usize, step: f64) -> f64 {
        (self.start + i as f64 * step).min(self.end)
    }
}

/// Iterator over feasible positions of a [`CandidateQuery`].
///
/// Strategic positions (when enabled) come first, then a raster scan with
/// x as the outer loop and y as the inner loop.
#[derive(Debug)]
pub struct Candidates<'q, 'a> {
    query: &'q CandidateQuery<'a>,
    x_axis: Axis,
    y_axis: Axis,
    strategic: Vec<(f64, f64)>,
    strategic_index: usize,
    i: usize,
    j: usize,
}

impl<'q, 'a> Candidates<'q, 'a> {
    fn new(query: &'q CandidateQuery<'a>) -> Self {
        let x_axis = query.scan_axis(query.zone.x(), query.zone.width(), query.footprint.width());
        let y_axis = query.scan_axis(
            query.zone.y(),
            query.zone.height(),
            query.footprint.height(),
        );
        let strategic = if query.strategic && x_axis.steps > 0 && y_axis.steps > 0 {
            query.strategic_positions(&x_axis, &y_axis)
        } else {
            Vec::new()
        };
        Self {
            query,
            x_axis,
            y_axis,
            strategic,
            strategic_index: 0,
            i: 0,
            j: 0,
        }
    }

    /// True if `(x, y)` is among the first `upto` strategic positions.
    fn tried(&self, upto: usize, x: f64, y: f64) -> bool {
        self.strategic[..upto]
            .iter()
            .any(|&(sx, sy)| (sx - x).abs() < EPSILON && (sy - y).abs() < EPSILON)
    }
}

impl Iterator for Candidates<'_, '_> {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        while self.strategic_index < self.strategic.len() {
            let (x, y) = self.strategic[self.strategic_index];
            self.strategic_index += 1;
            if !self.tried(self.strategic_index - 1, x, y) && self.query.is_feasible(x, y) {
                return Some((x, y));
            }
        }

        let step = self.query.grid_step;
        while self.i < self.x_axis.steps {
            let x = self.x_axis.at(self.i, step);
            while self.j < self.y_axis.steps {
                let y = self.y_axis.at(self.j, step);
                self.j += 1;
                if self.tried(self.strategic.len(), x, y) {
                    continue;
                }
                if self.query.is_feasible(x, y) {
                    return Some((x, y));
                }
            }
            self.j = 0;
            self.i += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    #[test]
    fn test_raster_order() {
        let query = CandidateQuery::new(rect(0.0, 0.0, 2.0, 2.0), 1.0, 1.0)
            .unwrap()
            .with_grid_step(0.5);
        let points: Vec<_> = query.iter().collect();
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], (0.0, 0.0));
        assert_eq!(points[1], (0.0, 0.5));
        assert_eq!(points[3], (0.5, 0.0));
        assert_eq!(points[8], (1.0, 1.0));
    }

    #[test]
    fn test_respects_wall_margin() {
        let zone = rect(1.0, 1.0, 7.5, 5.5);
        let query = CandidateQuery::new(zone, 2.6, 1.0)
            .unwrap()
            .with_wall_margin(0.5);
        let interior = rect(1.5, 1.5, 6.5, 4.5);
        let mut n = 0;
        for (x, y) in query.iter() {
            assert!(interior.contains(&query.footprint_at(x, y)));
            n += 1;
        }
        assert!(n > 0);
        let (x, y) = query.iter().next().unwrap();
        assert_relative_eq!(x, 1.5, epsilon = 1e-9);
        assert_relative_eq!(y, 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_inclusive_upper_bound() {
        // The only fitting position sits exactly on both bounds.
        let query = CandidateQuery::new(rect(0.0, 0.0, 3.0, 3.0), 3.0, 3.0).unwrap();
        assert_eq!(query.iter().collect::<Vec<_>>(), vec![(0.0, 0.0)]);

        // 1.0 / 0.3 is not integral; the scan stops at the last grid point inside the bound.
        let query = CandidateQuery::new(rect(0.0, 0.0, 2.0, 1.0), 1.0, 1.0)
            .unwrap()
            .with_grid_step(0.3);
        let xs: Vec<f64> = query.iter().map(|(x, _)| x).collect();
        assert_eq!(xs.len(), 4);
        assert!(xs.iter().all(|&x| x <= 1.0 + EPSILON));
    }

    #[test]
    fn test_too_large_footprint_is_empty() {
        let query = CandidateQuery::new(rect(0.0, 0.0, 2.0, 2.0), 2.5, 1.0).unwrap();
        assert_eq!(query.iter().next(), None);
        let query = CandidateQuery::new(rect(0.0, 0.0, 2.0, 2.0), 1.5, 1.0)
            .unwrap()
            .with_wall_margin(0.5);
        assert_eq!(query.count(), 0);
    }

    #[test]
    fn test_obstacles_and_placed_are_avoided() {
        let obstacles = vec![Obstacle::new("Column", rect(2.0, 0.0, 1.0, 1.0))];
        let placed = vec![rect(0.0, 0.0, 1.0, 1.0)];
        let query = CandidateQuery::new(rect(0.0, 0.0, 5.0, 1.0), 1.0, 1.0)
            .unwrap()
            .with_grid_step(0.5)
            .with_obstacles(&obstacles)
            .with_obstacle_margin(0.5)
            .with_placed(&placed)
            .with_spacing(0.5, None);
        let xs: Vec<f64> = query.iter().map(|(x, _)| x).collect();
        assert_eq!(xs, vec![3.5, 4.0]);
    }

    #[test]
    fn test_strategic_positions_first() {
        let zone = rect(1.0, 1.0, 6.0, 4.0);
        let query = CandidateQuery::new(zone, 2.0, 1.0)
            .unwrap()
            .with_wall_margin(0.45)
            .with_grid_step(0.5)
            .with_strategic_positions(true);
        let first: Vec<_> = query.iter().take(3).collect();
        // Zone center.
        assert_relative_eq!(first[0].0, 3.0, epsilon = 1e-9);
        assert_relative_eq!(first[0].1, 2.5, epsilon = 1e-9);
        // Top-left, then top-right corner.
        assert_relative_eq!(first[1].0, 1.45, epsilon = 1e-9);
        assert_relative_eq!(first[1].1, 1.45, epsilon = 1e-9);
        assert_relative_eq!(first[2].0, 4.55, epsilon = 1e-9);
        assert_relative_eq!(first[2].1, 1.45, epsilon = 1e-9);

        // Strategic points already yielded are not repeated by the raster scan.
        let all: Vec<_> = query.iter().collect();
        let top_left = all
            .iter()
            .filter(|&&(x, y)| (x - 1.45).abs() < 1e-9 && (y - 1.45).abs() < 1e-9)
            .count();
        assert_eq!(top_left, 1);
    }

    #[test]
    fn test_is_restartable() {
        let query = CandidateQuery::new(rect(0.0, 0.0, 4.0, 3.0), 1.0, 1.0)
            .unwrap()
            .with_grid_step(0.25);
        let a: Vec<_> = query.iter().collect();
        let b: Vec<_> = query.iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_lower_spacing_never_removes_candidates() {
        let placed = vec![rect(1.5, 1.5, 1.0, 1.0), rect(4.0, 3.0, 1.5, 1.0)];
        let zone = rect(0.0, 0.0, 7.0, 5.0);
        let mut previous = 0;
        for spacing in [1.2, 1.0, 0.8, 0.6, 0.4, 0.2, 0.0] {
            let count = CandidateQuery::new(zone, 1.2, 0.8)
                .unwrap()
                .with_placed(&placed)
                .with_spacing(spacing, None)
                .count();
            assert!(count >= previous);
            previous = count;
        }
    }
}
