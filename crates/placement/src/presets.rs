//! Reference floor plan and named default configurations.
//!
//! All presets describe the same 17 m x 11 m floor with its stairways and
//! structural columns. They differ in zone bounds, catalog quantities and
//! run configuration.

use roomfit_core::{
    Error, FurnitureArchetype, LayoutConfig, Obstacle, Rect, RelaxationSchedule, Result, Room,
    SelectionMode, SpacingPolicy, Zone,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reference room width in meters.
pub const ROOM_WIDTH: f64 = 17.0;
/// Reference room height in meters.
pub const ROOM_HEIGHT: f64 = 11.0;

/// `(name, x, y, width, height)`
type RectRow = (&'static str, f64, f64, f64, f64);
/// `(name, length, width, zone, quantity, priority)`
type ArchetypeRow = (&'static str, f64, f64, &'static str, usize, u32);

const STAIRS: [RectRow; 3] = [
    ("Tangga Up L1", 12.4, 1.6, 1.6, 2.8),
    ("Tangga Down L2", 9.0, 7.6, 2.0, 1.6),
    ("Tangga Up L2", 11.6, 7.6, 2.0, 1.6),
];

const COLUMN_SIZE: f64 = 0.36;

const BOUNDED_COLUMNS: [(f64, f64); 4] = [(3.2, 3.6), (11.6, 3.6), (3.2, 7.6), (11.6, 7.6)];
const OPEN_COLUMNS: [(f64, f64); 4] = [(8.5, 5.0), (15.0, 5.0), (8.5, 6.5), (15.0, 6.5)];

const WIDE_ZONES: [RectRow; 4] = [
    ("living", 1.0, 1.0, 6.5, 4.5),
    ("dining", 9.0, 1.0, 6.5, 4.5),
    ("outdoor", 1.5, 7.0, 14.0, 2.5),
    ("decoration", 1.0, 1.0, 15.0, 9.0),
];

const COMPACT_ZONES: [RectRow; 4] = [
    ("living", 1.0, 1.0, 6.0, 4.0),
    ("dining", 9.5, 1.0, 5.5, 4.0),
    ("outdoor", 2.0, 7.2, 13.0, 1.8),
    ("decoration", 2.5, 2.0, 12.5, 7.0),
];

const LIMITED_CATALOG: [ArchetypeRow; 5] = [
    ("SOFA 3 Seat", 2.6, 1.0, "living", 1, 1),
    ("SOFA 1 Seat Besar", 1.15, 1.0, "living", 1, 2),
    ("Meja Lingkaran Kecil", 0.5, 0.5, "living", 1, 5),
    ("Meja Makan", 2.4, 1.0, "dining", 1, 1),
    ("Kursi Makan", 0.46, 0.75, "dining", 1, 2),
];

const FULL_CATALOG: [ArchetypeRow; 15] = [
    ("SOFA 3 Seat", 2.6, 1.0, "living", 4, 1),
    ("SOFA 1 Seat", 1.14, 1.0, "living", 4, 2),
    ("Meja Makan", 2.4, 1.0, "dining", 2, 3),
    ("Kursi Makan", 0.46, 0.75, "dining", 8, 8),
    ("Lemari Piring", 1.2, 0.6, "dining", 2, 5),
    ("Lukisan Besar", 4.0, 1.5, "decoration", 1, 4),
    ("Lukisan Kecil", 0.6, 0.6, "decoration", 3, 9),
    ("Stand Lukisan", 0.6, 0.75, "decoration", 3, 10),
    ("Meja Teras", 2.4, 1.0, "outdoor", 2, 6),
    ("Kursi Teras", 0.46, 0.75, "outdoor", 4, 11),
    ("Rak Display", 2.0, 0.5, "decoration", 2, 7),
    ("Pot Bunga Small", 0.36, 0.36, "decoration", 4, 12),
    ("Pot Bunga Medium", 0.43, 0.43, "decoration", 3, 13),
    ("Pot Bunga Large", 0.6, 0.6, "decoration", 3, 14),
    ("Standing AC", 0.5, 0.4, "living", 2, 15),
];

/// Quantities of [`FULL_CATALOG`] in the deterministic preset, by name.
const DETERMINISTIC_QUANTITIES: [(&str, usize); 15] = [
    ("SOFA 3 Seat", 1),
    ("SOFA 1 Seat", 2),
    ("Meja Makan", 1),
    ("Kursi Makan", 4),
    ("Lemari Piring", 1),
    ("Lukisan Besar", 1),
    ("Lukisan Kecil", 2),
    ("Stand Lukisan", 2),
    ("Meja Teras", 1),
    ("Kursi Teras", 2),
    ("Rak Display", 1),
    ("Pot Bunga Small", 3),
    ("Pot Bunga Medium", 2),
    ("Pot Bunga Large", 2),
    ("Standing AC", 1),
];

/// Named default configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Preset {
    /// Small bounded layout: at most 5 items, size and floor coverage caps,
    /// spacing relaxation and adaptive spacing for small pieces.
    Limited,
    /// Full catalog ranked by score (heuristic or oracle), fixed spacing.
    #[default]
    Scored,
    /// Full catalog at reduced quantities, first-fit selection with
    /// strategic positions for large items.
    Deterministic,
}

impl Preset {
    /// All presets.
    pub fn all() -> &'static [Preset] {
        &[Preset::Limited, Preset::Scored, Preset::Deterministic]
    }

    /// Short name.
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Limited => "limited",
            Preset::Scored => "scored",
            Preset::Deterministic => "deterministic",
        }
    }

    /// One-line description.
    pub fn description(&self) -> &'static str {
        match self {
            Preset::Limited => "bounded 5-item layout with size and coverage caps",
            Preset::Scored => "full catalog, best-scoring position per item",
            Preset::Deterministic => "reduced catalog, first-fit with strategic positions",
        }
    }

    /// The reference room with this preset's zones and obstacles.
    pub fn room(&self) -> Result<Room> {
        let (zones, columns) = match self {
            Preset::Limited => (&WIDE_ZONES, &BOUNDED_COLUMNS),
            Preset::Scored => (&WIDE_ZONES, &OPEN_COLUMNS),
            Preset::Deterministic => (&COMPACT_ZONES, &OPEN_COLUMNS),
        };

        let mut room = Room::new(ROOM_WIDTH, ROOM_HEIGHT);
        for &(name, x, y, w, h) in zones {
            let mut zone = Zone::new(name, Rect::new(x, y, w, h)?);
            if *self == Preset::Limited {
                match name {
                    "dining" => zone = zone.with_grid_step(0.25),
                    "outdoor" => zone = zone.with_grid_step(0.4),
                    _ => {}
                }
            }
            room = room.with_zone(zone);
        }
        for &(name, x, y, w, h) in &STAIRS {
            room = room.with_obstacle(Obstacle::new(name, Rect::new(x, y, w, h)?));
        }
        for (i, &(x, y)) in columns.iter().enumerate() {
            room = room.with_obstacle(Obstacle::new(
                format!("Column {}", i + 1),
                Rect::new(x, y, COLUMN_SIZE, COLUMN_SIZE)?,
            ));
        }
        Ok(room)
    }

    /// This preset's furniture catalog.
    pub fn catalog(&self) -> Vec<FurnitureArchetype> {
        let archetype = |&(name, length, width, zone, quantity, priority): &ArchetypeRow| {
            FurnitureArchetype::new(name, length, width, zone)
                .with_quantity(quantity)
                .with_priority(priority)
        };
        match self {
            Preset::Limited => LIMITED_CATALOG.iter().map(archetype).collect(),
            Preset::Scored => FULL_CATALOG.iter().map(archetype).collect(),
            Preset::Deterministic => FULL_CATALOG
                .iter()
                .map(|row| {
                    let quantity = DETERMINISTIC_QUANTITIES
                        .iter()
                        .find(|(name, _)| *name == row.0)
                        .map_or(row.4, |&(_, q)| q);
                    archetype(row).with_quantity(quantity)
                })
                .collect(),
        }
    }

    /// This preset's run configuration.
    pub fn config(&self) -> LayoutConfig {
        match self {
            Preset::Limited => LayoutConfig::new()
                .with_min_spacing(0.6)
                .with_wall_margin(0.3)
                .with_obstacle_margin(0.6)
                .with_grid_step(0.3)
                .with_max_items(5)
                .with_halt_at_item_limit(true)
                .with_footprint_limits(0.3, 7.5)
                .with_max_area_ratio(0.30)
                .with_max_retry_attempts(15)
                .with_relaxation(RelaxationSchedule::default())
                .with_spacing_policy(SpacingPolicy::default())
                .with_selection(SelectionMode::BestScore),
            Preset::Scored => LayoutConfig::new()
                .with_min_spacing(0.8)
                .with_wall_margin(0.5)
                .with_obstacle_margin(0.7)
                .with_grid_step(0.2)
                .with_max_retry_attempts(1)
                .with_relaxation(RelaxationSchedule::none())
                .with_spacing_policy(SpacingPolicy::fixed())
                .with_selection(SelectionMode::BestScore),
            Preset::Deterministic => LayoutConfig::new()
                .with_min_spacing(0.65)
                .with_wall_margin(0.45)
                .with_obstacle_margin(0.65)
                .with_grid_step(0.3)
                .with_adaptive_grid_step(true)
                .with_strategic_priority_cutoff(5)
                .with_max_retry_attempts(1)
                .with_relaxation(RelaxationSchedule::none())
                .with_spacing_policy(SpacingPolicy::fixed())
                .with_selection(SelectionMode::FirstFit),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Preset::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "unknown preset '{s}' (expected limited, scored or deterministic)"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomfit_core::total_quantity;

    #[test]
    fn test_presets_are_valid() {
        for preset in Preset::all() {
            let room = preset.room().unwrap();
            room.validate().unwrap();
            room.validate_catalog(&preset.catalog()).unwrap();
            preset.config().validate().unwrap();
        }
    }

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(total_quantity(&Preset::Limited.catalog()), 5);
        assert_eq!(total_quantity(&Preset::Scored.catalog()), 47);
        assert_eq!(total_quantity(&Preset::Deterministic.catalog()), 26);
    }

    #[test]
    fn test_room_layout() {
        let room = Preset::Limited.room().unwrap();
        assert_eq!(room.zones.len(), 4);
        assert_eq!(room.obstacles.len(), 7);
        assert_eq!(room.zone("dining").unwrap().grid_step, Some(0.25));
        assert_eq!(room.obstacles[3].name, "Column 1");

        let room = Preset::Deterministic.room().unwrap();
        assert_eq!(room.zone("living").unwrap().rect.right(), 7.0);
        assert_eq!(room.zone("living").unwrap().grid_step, None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("scored".parse::<Preset>().unwrap(), Preset::Scored);
        assert_eq!(" Limited ".parse::<Preset>().unwrap(), Preset::Limited);
        assert!("ai".parse::<Preset>().is_err());
        assert_eq!(Preset::default(), Preset::Scored);
        assert_eq!(Preset::Deterministic.to_string(), "deterministic");
    }
}
