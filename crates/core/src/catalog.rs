//! Room description: zones, obstacles and the furniture catalog.

use crate::geometry::Rect;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named rectangular region in which furniture of some category may be placed.
///
/// Zones may overlap each other and never move.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Zone {
    /// Zone name (`living`, `dining`, ...), referenced by archetypes.
    pub name: String,
    /// Zone bounds.
    pub rect: Rect,
    /// Grid step override for candidate scans inside this zone.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grid_step: Option<f64>,
}

impl Zone {
    pub fn new(name: impl Into<String>, rect: Rect) -> Self {
        Self {
            name: name.into(),
            rect,
            grid_step: None,
        }
    }

    /// Sets a zone-specific grid step.
    pub fn with_grid_step(mut self, step: f64) -> Self {
        self.grid_step = Some(step);
        self
    }
}

/// A permanent exclusion region such as a stairway or a structural column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Obstacle {
    pub name: String,
    pub rect: Rect,
}

impl Obstacle {
    pub fn new(name: impl Into<String>, rect: Rect) -> Self {
        Self {
            name: name.into(),
            rect,
        }
    }
}

/// A furniture type definition before instantiation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FurnitureArchetype {
    /// Display name; also used as the identity of placed instances.
    pub name: String,
    /// Extent along the x axis, in meters.
    pub length: f64,
    /// Extent along the y axis, in meters.
    pub width: f64,
    /// Name of the zone instances must be placed in.
    pub zone: String,
    /// Number of instances to place per run.
    #[cfg_attr(feature = "serde", serde(default = "default_rank"))]
    pub quantity: usize,
    /// Ascending rank: 1 is placed first.
    #[cfg_attr(feature = "serde", serde(default = "default_rank"))]
    pub priority: u32,
}

#[cfg(feature = "serde")]
fn default_rank<T: From<u8>>() -> T {
    T::from(1)
}

impl FurnitureArchetype {
    /// Creates an archetype with quantity 1 and priority 1.
    pub fn new(name: impl Into<String>, length: f64, width: f64, zone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length,
            width,
            zone: zone.into(),
            quantity: 1,
            priority: 1,
        }
    }

    pub fn with_quantity(mut self, quantity: usize) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Footprint area in square meters.
    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    /// Footprint rectangle at `(x, y)`.
    pub fn footprint_at(&self, x: f64, y: f64) -> Result<Rect> {
        Rect::new(x, y, self.length, self.width)
    }

    /// Validates the archetype's own fields (zone references are checked by [`Room`]).
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidConfiguration(
                "furniture archetype name must not be empty".into(),
            ));
        }
        if !(self.length.is_finite() && self.width.is_finite())
            || self.length <= 0.0
            || self.width <= 0.0
        {
            return Err(Error::InvalidGeometry(format!(
                "archetype '{}' has invalid footprint {} x {}",
                self.name, self.length, self.width
            )));
        }
        Ok(())
    }
}

/// The fixed part of a placement run: room extents, zones and obstacles.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Room {
    /// Room width in meters (x extent).
    pub width: f64,
    /// Room height in meters (y extent).
    pub height: f64,
    /// Placement zones, in declaration order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub zones: Vec<Zone>,
    /// Fixed obstacles.
    #[cfg_attr(feature = "serde", serde(default))]
    pub obstacles: Vec<Obstacle>,
}

impl Room {
    /// Creates an empty room of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            zones: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    /// Adds a zone.
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zones.push(zone);
        self
    }

    /// Adds an obstacle.
    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    /// Floor area in square meters.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Looks up a zone by name.
    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }

    /// Position of a zone in declaration order.
    pub fn zone_index(&self, name: &str) -> Option<usize> {
        self.zones.iter().position(|z| z.name == name)
    }

    /// Room bounds as a rectangle.
    pub fn bounds(&self) -> Result<Rect> {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Validates the room on its own.
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(Error::InvalidConfiguration(format!(
                "room dimensions must be positive, got {} x {}",
                self.width, self.height
            )));
        }
        let bounds = self.bounds()?;

        if self.zones.is_empty() {
            return Err(Error::InvalidConfiguration("room defines no zones".into()));
        }
        for (i, zone) in self.zones.iter().enumerate() {
            if zone.name.trim().is_empty() {
                return Err(Error::InvalidConfiguration(format!(
                    "zone #{i} has an empty name"
                )));
            }
            if self.zones[..i].iter().any(|z| z.name == zone.name) {
                return Err(Error::InvalidConfiguration(format!(
                    "duplicate zone name '{}'",
                    zone.name
                )));
            }
            // Rect fields can bypass `Rect::new` through deserialization.
            Rect::new(
                zone.rect.x(),
                zone.rect.y(),
                zone.rect.width(),
                zone.rect.height(),
            )
            .map_err(|e| Error::InvalidGeometry(format!("zone '{}': {e}", zone.name)))?;
            if !bounds.contains(&zone.rect) {
                return Err(Error::InvalidConfiguration(format!(
                    "zone '{}' {} extends beyond the room",
                    zone.name, zone.rect
                )));
            }
            if let Some(step) = zone.grid_step {
                if !(step.is_finite() && step > 0.0) {
                    return Err(Error::InvalidConfiguration(format!(
                        "zone '{}' grid step must be positive, got {step}",
                        zone.name
                    )));
                }
            }
        }

        for obstacle in &self.obstacles {
            Rect::new(
                obstacle.rect.x(),
                obstacle.rect.y(),
                obstacle.rect.width(),
                obstacle.rect.height(),
            )
            .map_err(|e| Error::InvalidGeometry(format!("obstacle '{}': {e}", obstacle.name)))?;
        }

        Ok(())
    }

    /// Validates a catalog against this room: non-empty, well-formed
    /// archetypes, and every referenced zone defined.
    pub fn validate_catalog(&self, catalog: &[FurnitureArchetype]) -> Result<()> {
        if catalog.is_empty() {
            return Err(Error::InvalidConfiguration(
                "furniture catalog is empty".into(),
            ));
        }
        for archetype in catalog {
            archetype.validate()?;
            if self.zone(&archetype.zone).is_none() {
                return Err(Error::UnknownZone(format!(
                    "'{}' (referenced by '{}')",
                    archetype.zone, archetype.name
                )));
            }
        }
        Ok(())
    }
}

/// Total number of instances a catalog requests.
pub fn total_quantity(catalog: &[FurnitureArchetype]) -> usize {
    catalog.iter().map(|a| a.quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn living_room() -> Room {
        Room::new(17.0, 11.0).with_zone(Zone::new(
            "living",
            Rect::new(1.0, 1.0, 7.5, 5.5).unwrap(),
        ))
    }

    #[test]
    fn test_valid_room() {
        let room = living_room();
        assert!(room.validate().is_ok());
        assert_eq!(room.zone_index("living"), Some(0));
        assert!(room.zone("dining").is_none());
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let room = Room::new(0.0, 11.0);
        assert!(matches!(
            room.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
        let room = Room::new(17.0, -1.0);
        assert!(room.validate().is_err());
    }

    #[test]
    fn test_rejects_zone_outside_room() {
        let room = Room::new(5.0, 5.0).with_zone(Zone::new(
            "living",
            Rect::new(1.0, 1.0, 7.5, 5.5).unwrap(),
        ));
        assert!(room.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_zone() {
        let room = living_room().with_zone(Zone::new(
            "living",
            Rect::new(2.0, 2.0, 1.0, 1.0).unwrap(),
        ));
        assert!(room.validate().is_err());
    }

    #[test]
    fn test_catalog_validation() {
        let room = living_room();
        assert!(room.validate_catalog(&[]).is_err());

        let sofa = FurnitureArchetype::new("SOFA 3 Seat", 2.6, 1.0, "living");
        assert!(room.validate_catalog(&[sofa.clone()]).is_ok());

        let stray = FurnitureArchetype::new("Meja Makan", 2.4, 1.0, "dining");
        assert!(matches!(
            room.validate_catalog(&[sofa, stray]),
            Err(Error::UnknownZone(_))
        ));

        let flat = FurnitureArchetype::new("Rug", 0.0, 1.0, "living");
        assert!(matches!(
            room.validate_catalog(&[flat]),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_total_quantity() {
        let catalog = vec![
            FurnitureArchetype::new("A", 1.0, 1.0, "living").with_quantity(3),
            FurnitureArchetype::new("B", 1.0, 1.0, "living").with_quantity(2),
        ];
        assert_eq!(total_quantity(&catalog), 5);
    }
}
