//! # Roomfit Placement
//!
//! Zone-constrained automatic furniture placement for the roomfit engine.
//!
//! Furniture archetypes are instantiated and placed one at a time, in
//! priority order, at grid positions inside their zone. Every position is
//! checked against the zone's wall margin, the room's obstacles and all items
//! placed so far; feasible positions are ranked by a scorer.
//!
//! ## Features
//!
//! - Pure rectangle collision tests with spacing buffers and adaptive spacing
//! - Lazy, restartable candidate search (raster or strategic-first order)
//! - Heuristic scoring, or an external oracle with automatic fallback
//! - Progressive spacing relaxation per instance, never shared between runs
//! - Per-run caps: item count, footprint size, floor coverage
//! - Overlap validation and full layout audits
//! - Presets for the reference floor plan
//!
//! ## Quick Start
//!
//! ```rust
//! use roomfit_placement::{LayoutEngine, Planner, Preset};
//!
//! let preset = Preset::Limited;
//! let room = preset.room().unwrap();
//! let engine = LayoutEngine::new(preset.config());
//! let result = engine.plan(&room, &preset.catalog()).unwrap();
//!
//! assert!(result.validation.is_clean());
//! println!("Placed {}/{} items ({})",
//!     result.placed_count,
//!     result.total_requested,
//!     result.success_percent());
//! ```
//!
//! ## Custom Rooms
//!
//! ```rust
//! use roomfit_placement::{
//!     FurnitureArchetype, LayoutConfig, LayoutEngine, Obstacle, Planner, Rect, Room, Zone,
//! };
//!
//! let room = Room::new(17.0, 11.0)
//!     .with_zone(Zone::new("living", Rect::new(1.0, 1.0, 7.5, 5.5).unwrap()))
//!     .with_obstacle(Obstacle::new("Column", Rect::new(8.5, 5.0, 0.36, 0.36).unwrap()));
//!
//! let catalog = vec![
//!     FurnitureArchetype::new("SOFA 3 Seat", 2.6, 1.0, "living"),
//!     FurnitureArchetype::new("SOFA 1 Seat", 1.14, 1.0, "living")
//!         .with_quantity(2)
//!         .with_priority(2),
//! ];
//!
//! let config = LayoutConfig::new().with_min_spacing(0.8).with_wall_margin(0.5);
//! let result = LayoutEngine::new(config).plan(&room, &catalog).unwrap();
//! assert_eq!(result.placed_count + result.failed_count(), 3);
//! ```

pub mod candidates;
pub mod collision;
pub mod engine;
pub mod presets;
pub mod scoring;
pub mod validator;

// Re-exports
pub use candidates::{CandidateQuery, Candidates};
pub use collision::{clears_obstacles, clears_placed, obstacle_conflict, overlaps, overlaps_strict};
pub use engine::{CancelHandle, LayoutEngine};
pub use presets::Preset;
pub use scoring::{compute_features, proximity, HeuristicScorer, ScoringContext};
pub use validator::{audit, validate};
pub use roomfit_core::{
    AuditReport, Error, FailedItem, FailureReason, Features, FurnitureArchetype, LayoutConfig,
    LayoutResult, Obstacle, PlacedItem, Planner, Proximity, Rect, Result, Room, Scorer,
    SelectionMode, ValidationReport, ValidationStatus, Zone,
};
