//! Planner trait and run configuration.

use crate::catalog::{FurnitureArchetype, Room};
use crate::geometry::Rect;
use crate::result::LayoutResult;
use crate::scorer::HeuristicWeights;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the scheduler picks among feasible candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SelectionMode {
    /// Score every feasible candidate and keep the maximum (first found wins ties).
    #[default]
    BestScore,
    /// Take the first feasible candidate in generator order.
    FirstFit,
}

/// One adaptive spacing tier: pairs whose mean extent is below `below`
/// use `factor * nominal` spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpacingTier {
    /// Mean extent threshold in meters (exclusive).
    pub below: f64,
    /// Multiplier applied to the nominal spacing, in `(0, 1]`.
    pub factor: f64,
}

/// Adaptive spacing policy for small items.
///
/// A fixed absolute gap is disproportionately restrictive for small
/// decorative pieces, so pairs of small footprints get a scaled-down buffer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpacingPolicy {
    /// Tiers, checked in ascending `below` order.
    pub tiers: Vec<SpacingTier>,
}

impl Default for SpacingPolicy {
    fn default() -> Self {
        Self {
            tiers: vec![
                SpacingTier {
                    below: 0.6,
                    factor: 0.5,
                },
                SpacingTier {
                    below: 1.2,
                    factor: 0.6,
                },
            ],
        }
    }
}

impl SpacingPolicy {
    /// A policy that always uses the nominal spacing.
    pub fn fixed() -> Self {
        Self { tiers: Vec::new() }
    }

    /// Returns true if no tier can scale spacing.
    pub fn is_fixed(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Scale factor for a pair of rectangles.
    pub fn factor_for(&self, a: &Rect, b: &Rect) -> f64 {
        let mean = (a.width() + a.height() + b.width() + b.height()) / 4.0;
        self.tiers
            .iter()
            .find(|tier| mean < tier.below)
            .map_or(1.0, |tier| tier.factor)
    }

    /// Effective spacing buffer between `a` and `b` for a nominal spacing.
    pub fn effective_spacing(&self, a: &Rect, b: &Rect, nominal: f64) -> f64 {
        nominal * self.factor_for(a, b)
    }

    fn validate(&self) -> Result<()> {
        let mut previous = 0.0;
        for tier in &self.tiers {
            if !(tier.below.is_finite() && tier.below > previous) {
                return Err(Error::InvalidConfiguration(format!(
                    "spacing tiers must have increasing positive thresholds, got {}",
                    tier.below
                )));
            }
            if !(tier.factor > 0.0 && tier.factor <= 1.0) {
                return Err(Error::InvalidConfiguration(format!(
                    "spacing tier factor must be in (0, 1], got {}",
                    tier.factor
                )));
            }
            previous = tier.below;
        }
        Ok(())
    }
}

/// Progressive spacing relaxation across retry attempts.
///
/// Attempt `k` (0-based) uses the nominal spacing while `k < grace_attempts`;
/// afterwards the spacing drops by `step` per attempt, by at most
/// `max_reduction`, and never below `floor`. The sequence never rises above
/// the nominal value and is non-increasing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelaxationSchedule {
    pub grace_attempts: u32,
    pub step: f64,
    pub max_reduction: f64,
    pub floor: f64,
}

impl Default for RelaxationSchedule {
    fn default() -> Self {
        Self {
            grace_attempts: 2,
            step: 0.08,
            max_reduction: 0.4,
            floor: 0.25,
        }
    }
}

impl RelaxationSchedule {
    /// A schedule that never relaxes.
    pub fn none() -> Self {
        Self {
            grace_attempts: 0,
            step: 0.0,
            max_reduction: 0.0,
            floor: 0.0,
        }
    }

    /// Spacing to use on attempt `attempt` (0-based).
    pub fn spacing_for_attempt(&self, nominal: f64, attempt: u32) -> f64 {
        if attempt < self.grace_attempts {
            return nominal;
        }
        let steps = f64::from(attempt - self.grace_attempts + 1);
        let reduction = (self.step * steps).min(self.max_reduction);
        (nominal - reduction).max(self.floor).min(nominal)
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("step", self.step),
            ("max_reduction", self.max_reduction),
            ("floor", self.floor),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfiguration(format!(
                    "relaxation {name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Immutable per-run configuration.
///
/// Every tunable parameter of a run lives here and is passed down
/// explicitly; the engine never mutates it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Nominal minimum gap between two placed items (meters).
    pub min_spacing: f64,

    /// Margin kept between items and their zone's edges.
    pub wall_margin: f64,

    /// Minimum gap between items and obstacles.
    pub obstacle_margin: f64,

    /// Base grid step for candidate scans.
    pub grid_step: f64,

    /// Use `max(grid_step, min(length, width) / 2)` per archetype.
    pub adaptive_grid_step: bool,

    /// Maximum number of placed items per run.
    pub max_items: Option<usize>,

    /// Stop scheduling once `max_items` is reached; the rest are reported in bulk.
    pub halt_at_item_limit: bool,

    /// Largest allowed footprint dimension.
    pub max_footprint_dim: Option<f64>,

    /// Smallest allowed footprint dimension.
    pub min_footprint_dim: Option<f64>,

    /// Maximum fraction of the room floor covered by furniture.
    pub max_area_ratio: Option<f64>,

    /// Candidate searches per instance (the first one at nominal spacing).
    pub max_retry_attempts: u32,

    /// Spacing relaxation across attempts.
    pub relaxation: RelaxationSchedule,

    /// Adaptive spacing for small items.
    pub spacing_policy: SpacingPolicy,

    /// Archetypes with `priority <= cutoff` try strategic positions first.
    pub strategic_priority_cutoff: Option<u32>,

    /// Candidate selection mode.
    pub selection: SelectionMode,

    /// In best-score mode, accept the first candidate scoring at least this.
    pub accept_score: Option<f64>,

    /// Weights of the default heuristic scorer.
    pub heuristic: HeuristicWeights,

    /// Maximum run time in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_spacing: 0.8,
            wall_margin: 0.5,
            obstacle_margin: 0.7,
            grid_step: 0.2,
            adaptive_grid_step: false,
            max_items: None,
            halt_at_item_limit: false,
            max_footprint_dim: None,
            min_footprint_dim: None,
            max_area_ratio: None,
            max_retry_attempts: 15,
            relaxation: RelaxationSchedule::default(),
            spacing_policy: SpacingPolicy::default(),
            strategic_priority_cutoff: None,
            selection: SelectionMode::BestScore,
            accept_score: None,
            heuristic: HeuristicWeights::default(),
            time_limit_ms: 0,
        }
    }
}

impl LayoutConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the nominal spacing between items.
    pub fn with_min_spacing(mut self, spacing: f64) -> Self {
        self.min_spacing = spacing;
        self
    }

    /// Sets the margin from zone edges.
    pub fn with_wall_margin(mut self, margin: f64) -> Self {
        self.wall_margin = margin;
        self
    }

    /// Sets the margin around obstacles.
    pub fn with_obstacle_margin(mut self, margin: f64) -> Self {
        self.obstacle_margin = margin;
        self
    }

    /// Sets the base grid step.
    pub fn with_grid_step(mut self, step: f64) -> Self {
        self.grid_step = step;
        self
    }

    /// Enables or disables the per-archetype adaptive grid step.
    pub fn with_adaptive_grid_step(mut self, enabled: bool) -> Self {
        self.adaptive_grid_step = enabled;
        self
    }

    /// Caps the number of placed items.
    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Stops the run once the item cap is reached.
    pub fn with_halt_at_item_limit(mut self, halt: bool) -> Self {
        self.halt_at_item_limit = halt;
        self
    }

    /// Sets the allowed footprint dimension range.
    pub fn with_footprint_limits(mut self, min: f64, max: f64) -> Self {
        self.min_footprint_dim = Some(min);
        self.max_footprint_dim = Some(max);
        self
    }

    /// Caps the covered fraction of the floor.
    pub fn with_max_area_ratio(mut self, ratio: f64) -> Self {
        self.max_area_ratio = Some(ratio);
        self
    }

    /// Sets the number of candidate searches per instance.
    pub fn with_max_retry_attempts(mut self, attempts: u32) -> Self {
        self.max_retry_attempts = attempts;
        self
    }

    /// Sets the relaxation schedule.
    pub fn with_relaxation(mut self, relaxation: RelaxationSchedule) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Sets the adaptive spacing policy.
    pub fn with_spacing_policy(mut self, policy: SpacingPolicy) -> Self {
        self.spacing_policy = policy;
        self
    }

    /// Enables strategic-first candidate order for `priority <= cutoff`.
    pub fn with_strategic_priority_cutoff(mut self, cutoff: u32) -> Self {
        self.strategic_priority_cutoff = Some(cutoff);
        self
    }

    /// Sets the candidate selection mode.
    pub fn with_selection(mut self, selection: SelectionMode) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the good-enough score for early acceptance.
    pub fn with_accept_score(mut self, score: f64) -> Self {
        self.accept_score = Some(score);
        self
    }

    /// Sets the heuristic scorer weights.
    pub fn with_heuristic(mut self, weights: HeuristicWeights) -> Self {
        self.heuristic = weights;
        self
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Grid step for an archetype in a zone with an optional override.
    pub fn grid_step_for(&self, archetype: &FurnitureArchetype, zone_step: Option<f64>) -> f64 {
        let base = zone_step.unwrap_or(self.grid_step);
        if self.adaptive_grid_step {
            base.max(archetype.length.min(archetype.width) / 2.0)
        } else {
            base
        }
    }

    /// Whether an archetype gets strategic positions before the raster scan.
    pub fn uses_strategic_positions(&self, archetype: &FurnitureArchetype) -> bool {
        self.strategic_priority_cutoff
            .is_some_and(|cutoff| archetype.priority <= cutoff)
    }

    /// Validates all values.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_spacing", self.min_spacing),
            ("wall_margin", self.wall_margin),
            ("obstacle_margin", self.obstacle_margin),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfiguration(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        if !(self.grid_step.is_finite() && self.grid_step > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "grid_step must be positive, got {}",
                self.grid_step
            )));
        }
        if self.max_retry_attempts == 0 {
            return Err(Error::InvalidConfiguration(
                "max_retry_attempts must be at least 1".into(),
            ));
        }
        if let Some(ratio) = self.max_area_ratio {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(Error::InvalidConfiguration(format!(
                    "max_area_ratio must be positive, got {ratio}"
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_footprint_dim, self.max_footprint_dim) {
            if min > max {
                return Err(Error::InvalidConfiguration(format!(
                    "min_footprint_dim {min} exceeds max_footprint_dim {max}"
                )));
            }
        }
        self.relaxation.validate()?;
        self.spacing_policy.validate()?;
        self.heuristic.validate()?;
        Ok(())
    }
}

/// A furniture placement planner.
pub trait Planner {
    /// Places the catalog into the room.
    ///
    /// Fails only on invalid input; individual placement failures are
    /// reported inside the result.
    fn plan(&self, room: &Room, catalog: &[FurnitureArchetype]) -> Result<LayoutResult>;

    /// Requests cancellation of the runs in flight.
    ///
    /// Runs started after the call are not affected.
    fn cancel(&self);
}
