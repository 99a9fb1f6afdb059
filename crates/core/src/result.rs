//! Placement run result representation.

use crate::placement::PlacedItem;
use crate::validation::ValidationReport;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A size, count or capacity limit an instance was rejected by.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "constraint", rename_all = "snake_case"))]
pub enum ConstraintViolation {
    /// The run already holds the maximum number of items.
    ItemLimit { limit: usize },
    /// A footprint dimension exceeds the maximum.
    TooLarge { max: f64 },
    /// A footprint dimension is below the minimum.
    TooSmall { min: f64 },
    /// Placing the item would exceed the floor coverage cap.
    FloorCapacity { ratio: f64, limit: f64 },
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemLimit { limit } => write!(f, "maximum {limit} items limit reached"),
            Self::TooLarge { max } => {
                write!(f, "furniture too large (max {max}m per dimension)")
            }
            Self::TooSmall { min } => {
                write!(f, "furniture too small (min {min}m per dimension)")
            }
            Self::FloorCapacity { ratio, limit } => write!(
                f,
                "floor capacity exceeded ({:.1}% > {:.1}% limit)",
                ratio * 100.0,
                limit * 100.0
            ),
        }
    }
}

/// Why an instance ended in the `Failed` state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum FailureReason {
    /// A configured limit rejected the instance before any search.
    ConstraintViolation(ConstraintViolation),
    /// The candidate search was empty at every tried spacing.
    NoFeasiblePosition { attempts: u32 },
    /// The run was cancelled before this instance was attempted.
    Cancelled,
    /// The run's time limit expired before this instance was attempted.
    TimeLimit,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConstraintViolation(violation) => write!(f, "{violation}"),
            Self::NoFeasiblePosition { attempts } => {
                write!(f, "no valid position after {attempts} attempts")
            }
            Self::Cancelled => write!(f, "run cancelled before placement"),
            Self::TimeLimit => write!(f, "time limit reached before placement"),
        }
    }
}

/// An instance that could not be placed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FailedItem {
    pub name: String,
    pub instance: usize,
    pub reason: FailureReason,
}

impl FailedItem {
    pub fn new(name: impl Into<String>, instance: usize, reason: FailureReason) -> Self {
        Self {
            name: name.into(),
            instance,
            reason,
        }
    }
}

/// Output of one placement run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutResult {
    /// Placed instances, in placement order.
    pub placed_items: Vec<PlacedItem>,
    /// Failed instances, in scheduling order.
    pub failed_items: Vec<FailedItem>,
    /// Sum of archetype quantities.
    pub total_requested: usize,
    pub placed_count: usize,
    /// `placed_count / total_requested` (0.0 when nothing was requested).
    pub success_rate: f64,
    /// Placed area divided by room area.
    pub floor_coverage_ratio: f64,
    /// Overlap audit of `placed_items`.
    pub validation: ValidationReport,
    /// Name of the scorer that ranked candidates.
    pub scorer: String,
    /// Computation time in milliseconds.
    pub computation_time_ms: u64,
    /// Whether the run was cancelled or timed out.
    pub cancelled: bool,
}

impl LayoutResult {
    /// Assembles a result and derives its statistics.
    pub fn new(
        placed_items: Vec<PlacedItem>,
        failed_items: Vec<FailedItem>,
        total_requested: usize,
        room_area: f64,
        validation: ValidationReport,
    ) -> Self {
        let placed_count = placed_items.len();
        let success_rate = if total_requested > 0 {
            placed_count as f64 / total_requested as f64
        } else {
            0.0
        };
        let covered: f64 = placed_items.iter().map(PlacedItem::area).sum();
        let floor_coverage_ratio = if room_area > 0.0 {
            covered / room_area
        } else {
            0.0
        };
        Self {
            placed_items,
            failed_items,
            total_requested,
            placed_count,
            success_rate,
            floor_coverage_ratio,
            validation,
            scorer: String::new(),
            computation_time_ms: 0,
            cancelled: false,
        }
    }

    /// Number of failed instances.
    pub fn failed_count(&self) -> usize {
        self.failed_items.len()
    }

    /// Returns true if every requested instance was placed.
    pub fn all_placed(&self) -> bool {
        self.failed_items.is_empty()
    }

    /// Success rate as a percentage string.
    pub fn success_percent(&self) -> String {
        format!("{:.1}%", self.success_rate * 100.0)
    }

    /// Sets the scorer name.
    pub fn with_scorer(mut self, scorer: impl Into<String>) -> Self {
        self.scorer = scorer.into();
        self
    }

    /// Compact statistics.
    pub fn summary(&self) -> LayoutSummary {
        LayoutSummary::from(self)
    }
}

/// Summary statistics for a layout result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutSummary {
    pub total_requested: usize,
    pub placed: usize,
    pub failed: usize,
    pub success_percent: f64,
    pub coverage_percent: f64,
    pub overlaps: usize,
    pub warnings: usize,
    pub time_ms: u64,
}

impl From<&LayoutResult> for LayoutSummary {
    fn from(result: &LayoutResult) -> Self {
        Self {
            total_requested: result.total_requested,
            placed: result.placed_count,
            failed: result.failed_items.len(),
            success_percent: result.success_rate * 100.0,
            coverage_percent: result.floor_coverage_ratio * 100.0,
            overlaps: result.validation.overlap_count,
            warnings: result.validation.warning_count,
            time_ms: result.computation_time_ms,
        }
    }
}
