//! Candidate scoring contract.
//!
//! The scheduler ranks feasible candidates through the [`Scorer`] trait.
//! Two kinds of scorer exist: the built-in heuristic (see
//! `roomfit_placement::scoring::HeuristicScorer`) and external oracles such
//! as a trained regression model. Both consume the same [`Features`].

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distance reported when there is no obstacle or no placed item to measure against.
pub const NO_NEIGHBOR_DISTANCE: f64 = 999.0;

/// Radius (meters) within which placed items count towards local density.
pub const DENSITY_RADIUS: f64 = 2.0;

/// Number of values in [`Features::to_vec`].
pub const FEATURE_COUNT: usize = 17;

/// Zone names with a fixed oracle code, in code order.
pub const ZONE_CODES: [&str; 4] = ["living", "dining", "outdoor", "decoration"];

/// Oracle code of zones missing from [`ZONE_CODES`].
pub const UNKNOWN_ZONE_CODE: f64 = -1.0;

/// Fixed oracle code of a zone name.
pub fn zone_code(name: &str) -> Option<usize> {
    ZONE_CODES.iter().position(|&known| known == name)
}

/// Feature vector computed for one candidate position.
///
/// Position and neighbour features are measured from top-left corners, so a
/// model trained on recorded layouts sees the same inputs. The heuristic
/// ranks on [`Proximity`] instead.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Features {
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub width: f64,
    /// Right edge (`x + length`).
    pub right: f64,
    /// Bottom edge (`y + width`).
    pub bottom: f64,
    pub center_x: f64,
    pub center_y: f64,
    /// `|x - zone center x|`.
    pub zone_dx: f64,
    /// `|y - zone center y|`.
    pub zone_dy: f64,
    pub zone_width: f64,
    pub zone_height: f64,
    /// Corner distance to the nearest obstacle, if any.
    pub nearest_obstacle: Option<f64>,
    /// Corner distance to the nearest placed item, if any.
    pub nearest_furniture: Option<f64>,
    /// Placed items whose corners lie within [`DENSITY_RADIUS`].
    pub nearby_count: usize,
    /// Index of the archetype in the catalog.
    pub archetype_index: usize,
    /// See [`zone_code`].
    pub zone_code: Option<usize>,
    /// Not part of [`to_vec`](Self::to_vec).
    pub proximity: Proximity,
}

/// Footprint-aware distances of one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Proximity {
    /// Horizontal offset of the footprint center from the zone center.
    pub center_dx: f64,
    /// Vertical offset of the footprint center from the zone center.
    pub center_dy: f64,
    /// Edge distance to the nearest obstacle, if any.
    pub obstacle_clearance: Option<f64>,
    /// Mean center distance to all placed items, if any.
    pub mean_furniture_distance: Option<f64>,
}

impl Proximity {
    /// Distance of the footprint center from the zone center.
    pub fn zone_center_distance(&self) -> f64 {
        self.center_dx.hypot(self.center_dy)
    }
}

impl Features {
    /// Flattens the features into the oracle input vector.
    ///
    /// Order: `x, y, length, width, right, bottom, center_x, center_y,
    /// zone_dx, zone_dy, zone_width, zone_height, nearest_obstacle,
    /// nearest_furniture, nearby_count, archetype_index, zone_code`.
    /// Missing neighbours are encoded as [`NO_NEIGHBOR_DISTANCE`], zones
    /// without a code as [`UNKNOWN_ZONE_CODE`].
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.x,
            self.y,
            self.length,
            self.width,
            self.right,
            self.bottom,
            self.center_x,
            self.center_y,
            self.zone_dx,
            self.zone_dy,
            self.zone_width,
            self.zone_height,
            self.nearest_obstacle.unwrap_or(NO_NEIGHBOR_DISTANCE),
            self.nearest_furniture.unwrap_or(NO_NEIGHBOR_DISTANCE),
            self.nearby_count as f64,
            self.archetype_index as f64,
            self.zone_code.map_or(UNKNOWN_ZONE_CODE, |code| code as f64),
        ]
    }
}

/// Ranks a candidate position. Higher is better.
///
/// Implementations must be deterministic for fixed inputs. Returning an
/// error (or a non-finite value) makes the engine fall back to the
/// heuristic scorer for that candidate set.
pub trait Scorer: Send + Sync {
    /// Scores one candidate.
    fn score(&self, features: &Features) -> Result<f64>;

    /// Short name used in logs and results.
    fn name(&self) -> &str {
        "oracle"
    }
}

impl<F> Scorer for F
where
    F: Fn(&Features) -> Result<f64> + Send + Sync,
{
    fn score(&self, features: &Features) -> Result<f64> {
        self(features)
    }
}

/// Scores a candidate and rejects non-finite values.
pub fn checked_score(scorer: &dyn Scorer, features: &Features) -> Result<f64> {
    let value = scorer.score(features)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::Oracle(format!(
            "{} returned non-finite score {value}",
            scorer.name()
        )))
    }
}

/// Parameters of the default heuristic scorer.
///
/// The score starts at 1.0 and is reduced multiplicatively:
/// - by `min(center_distance / center_falloff, max_center_penalty)`,
/// - by `obstacle_factor` when the nearest obstacle is closer than `obstacle_threshold`,
/// - by `cluster_factor` when the mean distance to placed items is below `cluster_threshold`.
///
/// The result is clamped to at least `floor`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeuristicWeights {
    pub center_falloff: f64,
    pub max_center_penalty: f64,
    pub obstacle_threshold: f64,
    pub obstacle_factor: f64,
    pub cluster_threshold: f64,
    pub cluster_factor: f64,
    pub floor: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            center_falloff: 10.0,
            max_center_penalty: 0.5,
            obstacle_threshold: 1.0,
            obstacle_factor: 0.5,
            cluster_threshold: 1.0,
            cluster_factor: 0.7,
            floor: 0.1,
        }
    }
}

impl HeuristicWeights {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.center_falloff.is_finite() && self.center_falloff > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "heuristic center_falloff must be positive, got {}",
                self.center_falloff
            )));
        }
        if !(self.floor.is_finite() && self.floor > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "heuristic floor must be positive, got {}",
                self.floor
            )));
        }
        for (name, value) in [
            ("max_center_penalty", self.max_center_penalty),
            ("obstacle_factor", self.obstacle_factor),
            ("cluster_factor", self.cluster_factor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration(format!(
                    "heuristic {name} must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Features {
        Features {
            x: 1.5,
            y: 1.5,
            length: 2.6,
            width: 1.0,
            right: 4.1,
            bottom: 2.5,
            center_x: 2.8,
            center_y: 2.0,
            zone_dx: 2.0,
            zone_dy: 1.5,
            zone_width: 6.5,
            zone_height: 4.5,
            nearest_obstacle: None,
            nearest_furniture: Some(3.0),
            nearby_count: 0,
            archetype_index: 2,
            zone_code: None,
            proximity: Proximity {
                center_dx: -1.5,
                center_dy: -2.0,
                obstacle_clearance: None,
                mean_furniture_distance: Some(3.0),
            },
        }
    }

    #[test]
    fn test_to_vec_layout() {
        let v = sample().to_vec();
        assert_eq!(v.len(), FEATURE_COUNT);
        assert_eq!(v[8], 2.0);
        assert_eq!(v[9], 1.5);
        assert_eq!(v[12], NO_NEIGHBOR_DISTANCE);
        assert_eq!(v[13], 3.0);
        assert_eq!(v[15], 2.0);
        assert_eq!(v[16], UNKNOWN_ZONE_CODE);

        let dining = Features {
            zone_code: zone_code("dining"),
            ..sample()
        };
        assert_eq!(dining.to_vec()[16], 1.0);
    }

    #[test]
    fn test_zone_codes() {
        assert_eq!(zone_code("living"), Some(0));
        assert_eq!(zone_code("dining"), Some(1));
        assert_eq!(zone_code("outdoor"), Some(2));
        assert_eq!(zone_code("decoration"), Some(3));
        assert_eq!(zone_code("Living"), None);
        assert_eq!(zone_code("garage"), None);
    }

    #[test]
    fn test_zone_center_distance() {
        assert_eq!(sample().proximity.zone_center_distance(), 2.5);
    }

    #[test]
    fn test_closure_scorer() {
        let scorer = |f: &Features| -> Result<f64> { Ok(-f.x) };
        assert_eq!(checked_score(&scorer, &sample()), Ok(-1.5));
    }

    #[test]
    fn test_non_finite_is_rejected() {
        let scorer = |_: &Features| -> Result<f64> { Ok(f64::NAN) };
        assert!(matches!(
            checked_score(&scorer, &sample()),
            Err(Error::Oracle(_))
        ));
    }

    #[test]
    fn test_default_weights_are_valid() {
        assert!(HeuristicWeights::default().validate().is_ok());
        let bad = HeuristicWeights {
            floor: 0.0,
            ..HeuristicWeights::default()
        };
        assert!(bad.validate().is_err());
    }
}
