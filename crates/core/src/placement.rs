//! Placed item representation.

use crate::geometry::Rect;
use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One furniture instance placed by a successful scheduling decision.
///
/// Owned by the run result that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedItem {
    /// Archetype name.
    pub name: String,
    /// 0-based instance number within the archetype.
    #[cfg_attr(feature = "serde", serde(default))]
    pub instance: usize,
    pub x: f64,
    pub y: f64,
    /// Extent along x.
    pub length: f64,
    /// Extent along y.
    pub width: f64,
    /// Zone the item was placed in.
    pub zone: String,
    /// Score of the chosen candidate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub score: f64,
}

impl PlacedItem {
    /// Creates a placed item.
    pub fn new(
        name: impl Into<String>,
        instance: usize,
        rect: Rect,
        zone: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            name: name.into(),
            instance,
            x: rect.x(),
            y: rect.y(),
            length: rect.width(),
            width: rect.height(),
            zone: zone.into(),
            score,
        }
    }

    /// The item's footprint rectangle.
    pub fn rect(&self) -> Result<Rect> {
        Rect::new(self.x, self.y, self.length, self.width)
    }

    /// Footprint area.
    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    /// Display label, e.g. `SOFA 1 Seat#2`.
    pub fn label(&self) -> String {
        format!("{}#{}", self.name, self.instance)
    }
}
