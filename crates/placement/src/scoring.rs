//! Feature extraction and the default heuristic scorer.

use roomfit_core::{
    Features, HeuristicWeights, Obstacle, Proximity, Rect, Result, Scorer, DENSITY_RADIUS,
};

/// What a candidate is scored against.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub zone: &'a Rect,
    /// Fixed zone code, see [`roomfit_core::zone_code`].
    pub zone_code: Option<usize>,
    pub archetype_index: usize,
    pub obstacles: &'a [Obstacle],
    pub placed: &'a [Rect],
}

/// Computes the feature vector for a footprint placed at a candidate position.
///
/// Zone offsets and neighbour distances are taken from the top-left corner.
pub fn compute_features(ctx: &ScoringContext<'_>, footprint: &Rect) -> Features {
    let (center_x, center_y) = footprint.center();
    let (zone_cx, zone_cy) = ctx.zone.center();

    let nearest_obstacle = ctx
        .obstacles
        .iter()
        .map(|obstacle| footprint.corner_distance(&obstacle.rect))
        .min_by(f64::total_cmp);

    let distances: Vec<f64> = ctx
        .placed
        .iter()
        .map(|other| footprint.corner_distance(other))
        .collect();
    let nearest_furniture = distances.iter().copied().min_by(f64::total_cmp);
    let nearby_count = distances.iter().filter(|&&d| d < DENSITY_RADIUS).count();

    Features {
        x: footprint.x(),
        y: footprint.y(),
        length: footprint.width(),
        width: footprint.height(),
        right: footprint.right(),
        bottom: footprint.bottom(),
        center_x,
        center_y,
        zone_dx: (footprint.x() - zone_cx).abs(),
        zone_dy: (footprint.y() - zone_cy).abs(),
        zone_width: ctx.zone.width(),
        zone_height: ctx.zone.height(),
        nearest_obstacle,
        nearest_furniture,
        nearby_count,
        archetype_index: ctx.archetype_index,
        zone_code: ctx.zone_code,
        proximity: proximity(ctx, footprint),
    }
}

/// Footprint-aware distances: center offset from the zone center, edge
/// clearance to obstacles and mean center distance to placed items.
pub fn proximity(ctx: &ScoringContext<'_>, footprint: &Rect) -> Proximity {
    let (center_x, center_y) = footprint.center();
    let (zone_cx, zone_cy) = ctx.zone.center();

    let obstacle_clearance = ctx
        .obstacles
        .iter()
        .map(|obstacle| footprint.edge_distance(&obstacle.rect))
        .min_by(f64::total_cmp);

    let mean_furniture_distance = if ctx.placed.is_empty() {
        None
    } else {
        let total: f64 = ctx
            .placed
            .iter()
            .map(|other| footprint.center_distance(other))
            .sum();
        Some(total / ctx.placed.len() as f64)
    };

    Proximity {
        center_dx: center_x - zone_cx,
        center_dy: center_y - zone_cy,
        obstacle_clearance,
        mean_furniture_distance,
    }
}

/// Rule-based scorer used when no oracle is configured or the oracle fails.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeuristicScorer {
    weights: HeuristicWeights,
}

impl HeuristicScorer {
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    /// Infallible scoring.
    pub fn evaluate(&self, features: &Features) -> f64 {
        let w = &self.weights;
        let mut score = 1.0;

        let near = &features.proximity;
        let center_penalty =
            (near.zone_center_distance() / w.center_falloff).min(w.max_center_penalty);
        score *= 1.0 - center_penalty;

        if near
            .obstacle_clearance
            .is_some_and(|d| d < w.obstacle_threshold)
        {
            score *= w.obstacle_factor;
        }

        if near
            .mean_furniture_distance
            .is_some_and(|d| d < w.cluster_threshold)
        {
            score *= w.cluster_factor;
        }

        score.max(w.floor)
    }
}

impl Scorer for HeuristicScorer {
    fn score(&self, features: &Features) -> Result<f64> {
        Ok(self.evaluate(features))
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
