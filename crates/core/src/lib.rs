//! # Roomfit Core
//!
//! Core types and traits for the roomfit furniture placement engine.
//!
//! This crate holds the data model shared by the placement engine and the
//! runner: room geometry, the furniture catalog, the run configuration, the
//! scoring contract and the result/report types. It contains no search logic.
//!
//! ## Core Components
//!
//! - **Geometry**: [`Rect`], axis-aligned rectangles in meters
//! - **Catalog**: [`Room`], [`Zone`], [`Obstacle`], [`FurnitureArchetype`]
//! - **Configuration**: [`LayoutConfig`], [`SpacingPolicy`], [`RelaxationSchedule`]
//! - **Planner trait**: [`Planner`], the interface of a placement engine
//! - **Scoring**: [`Scorer`], [`Features`], [`HeuristicWeights`]
//! - **Results**: [`LayoutResult`], [`PlacedItem`], [`FailedItem`], [`ValidationReport`]
//!
//! ## Configuration
//!
//! ```rust
//! use roomfit_core::{LayoutConfig, SelectionMode};
//!
//! let config = LayoutConfig::new()
//!     .with_min_spacing(0.6)
//!     .with_wall_margin(0.3)
//!     .with_max_items(5)
//!     .with_selection(SelectionMode::BestScore);
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod catalog;
pub mod error;
pub mod geometry;
pub mod placement;
pub mod result;
pub mod scorer;
pub mod solver;
pub mod validation;

// Re-exports
pub use catalog::{total_quantity, FurnitureArchetype, Obstacle, Room, Zone};
pub use error::{Error, Result};
pub use geometry::{Rect, EPSILON};
pub use placement::PlacedItem;
pub use result::{ConstraintViolation, FailedItem, FailureReason, LayoutResult, LayoutSummary};
pub use scorer::{
    checked_score, zone_code, Features, HeuristicWeights, Proximity, Scorer, DENSITY_RADIUS,
    FEATURE_COUNT, NO_NEIGHBOR_DISTANCE, UNKNOWN_ZONE_CODE, ZONE_CODES,
};
pub use solver::{
    LayoutConfig, Planner, RelaxationSchedule, SelectionMode, SpacingPolicy, SpacingTier,
};
pub use validation::{
    AuditReport, BoundaryViolation, Collision, SpacingWarning, ValidationReport, ValidationStatus,
};
