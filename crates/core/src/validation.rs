//! Validation report types.
//!
//! Reports are derived data: recomputed from a placed-item list and never
//! persisted by the engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Overall outcome of an overlap sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ValidationStatus {
    /// No two items overlap.
    #[default]
    Clean,
    /// At least one pair of items overlaps.
    HasOverlap,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clean => write!(f, "CLEAN"),
            Self::HasOverlap => write!(f, "HAS_OVERLAP"),
        }
    }
}

/// A pair of items whose footprints truly overlap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Collision {
    pub first: String,
    pub second: String,
    pub first_position: (f64, f64),
    pub second_position: (f64, f64),
}

/// A pair of items that do not overlap but sit closer than the minimum spacing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpacingWarning {
    pub first: String,
    pub second: String,
    /// Edge-to-edge gap on the dominant separating axis.
    pub distance: f64,
}

/// Result of the all-pairs overlap sweep.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationReport {
    pub overlap_count: usize,
    pub warning_count: usize,
    pub collisions: Vec<Collision>,
    pub warnings: Vec<SpacingWarning>,
    pub status: ValidationStatus,
    /// Items left out of the sweep because their footprint is degenerate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub skipped: Vec<String>,
}

impl ValidationReport {
    /// Builds a report from its collisions and warnings.
    pub fn new(collisions: Vec<Collision>, warnings: Vec<SpacingWarning>) -> Self {
        let status = if collisions.is_empty() {
            ValidationStatus::Clean
        } else {
            ValidationStatus::HasOverlap
        };
        Self {
            overlap_count: collisions.len(),
            warning_count: warnings.len(),
            collisions,
            warnings,
            status,
            skipped: Vec::new(),
        }
    }

    /// Records items that could not be checked.
    pub fn with_skipped(mut self, skipped: Vec<String>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Returns true if no items overlap and every item was checked.
    pub fn is_clean(&self) -> bool {
        self.status == ValidationStatus::Clean && self.skipped.is_empty()
    }
}

/// What an audited item violates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum BoundaryViolation {
    /// The item's zone is not defined in the room.
    UnknownZone { item: String, zone: String },
    /// The item is not inside its zone shrunk by the wall margin.
    OutsideZone { item: String, zone: String },
    /// The item is closer to an obstacle than the obstacle margin.
    ObstacleClearance {
        item: String,
        obstacle: String,
        gap: f64,
    },
    /// The item's footprint is degenerate.
    InvalidFootprint { item: String },
}

impl std::fmt::Display for BoundaryViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownZone { item, zone } => {
                write!(f, "{item} references unknown zone '{zone}'")
            }
            Self::OutsideZone { item, zone } => {
                write!(f, "{item} is outside zone '{zone}' or within its wall margin")
            }
            Self::ObstacleClearance {
                item,
                obstacle,
                gap,
            } => write!(f, "{item} is {gap:.2}m from obstacle '{obstacle}'"),
            Self::InvalidFootprint { item } => write!(f, "{item} has an invalid footprint"),
        }
    }
}

/// Overlap report plus zone/obstacle compliance, for externally supplied layouts.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AuditReport {
    pub validation: ValidationReport,
    pub violations: Vec<BoundaryViolation>,
}

impl AuditReport {
    /// Returns true if the layout is overlap-free and respects every boundary.
    pub fn is_compliant(&self) -> bool {
        self.validation.is_clean() && self.violations.is_empty()
    }
}
