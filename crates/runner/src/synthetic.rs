//! Synthetic catalog generator for stress runs.
//!
//! Generates furniture catalogs sized to the zones of a room, so the same
//! floor plan can be exercised with many piece mixes.

use crate::scenario::Scenario;
use rand::prelude::*;
use roomfit_core::{FurnitureArchetype, Room};
use roomfit_placement::Preset;

/// Smallest generated footprint dimension in meters.
const MIN_DIM: f64 = 0.3;

/// Generator for synthetic furniture catalogs.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    rng: StdRng,
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticGenerator {
    /// Creates a new generator with a random seed.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new generator with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates `count` archetypes with dimensions in `[MIN_DIM, max_dim]`,
    /// capped at half of the target zone's shorter side.
    fn catalog(&mut self, room: &Room, count: usize, max_dim: f64) -> Vec<FurnitureArchetype> {
        if room.zones.is_empty() {
            return Vec::new();
        }

        (0..count)
            .map(|i| {
                let zone = &room.zones[self.rng.gen_range(0..room.zones.len())];
                let cap = (zone.rect.width().min(zone.rect.height()) / 2.0)
                    .min(max_dim)
                    .max(MIN_DIM);
                let length = self.dimension(cap);
                let width = self.dimension(cap);
                let quantity = self.rng.gen_range(1..=4);
                let priority = self.rng.gen_range(1..=15);

                FurnitureArchetype::new(format!("Piece {:02}", i + 1), length, width, &zone.name)
                    .with_quantity(quantity)
                    .with_priority(priority)
            })
            .collect()
    }

    fn dimension(&mut self, cap: f64) -> f64 {
        if cap <= MIN_DIM {
            return MIN_DIM;
        }
        // Centimeter resolution keeps generated files readable.
        (self.rng.gen_range(MIN_DIM..=cap) * 100.0).round() / 100.0
    }

    /// Many small pieces (decorations, pots, side tables).
    pub fn small_pieces(&mut self, room: &Room, count: usize) -> Vec<FurnitureArchetype> {
        self.catalog(room, count, 0.8)
    }

    /// Few large pieces (sofas, tables, cabinets).
    pub fn large_pieces(&mut self, room: &Room, count: usize) -> Vec<FurnitureArchetype> {
        let mut catalog = self.catalog(room, count, 3.0);
        for archetype in &mut catalog {
            archetype.length = archetype.length.max(1.0);
            archetype.quantity = archetype.quantity.min(2);
        }
        catalog
    }

    /// A mix of small and large pieces.
    pub fn mixed(&mut self, room: &Room, count: usize) -> Vec<FurnitureArchetype> {
        self.catalog(room, count, 2.5)
    }

    /// A scenario placing a synthetic catalog into a preset's room.
    pub fn scenario(
        name: impl Into<String>,
        preset: Preset,
        catalog: Vec<FurnitureArchetype>,
    ) -> Scenario {
        let mut scenario = Scenario::from_preset(preset);
        scenario.name = name.into();
        scenario.description = format!(
            "synthetic catalog of {} archetypes in the {} room",
            catalog.len(),
            preset
        );
        scenario.catalog = Some(catalog);
        scenario
    }
}

/// Standard synthetic scenario set.
pub struct SyntheticScenarios;

impl SyntheticScenarios {
    /// Generates the standard synthetic scenarios, `count` archetypes each.
    pub fn all(seed: u64, count: usize) -> Vec<Scenario> {
        let mut generator = SyntheticGenerator::with_seed(seed);
        let mut scenarios = Vec::new();

        for preset in Preset::all().iter().copied() {
            let Ok(room) = preset.room() else {
                log::warn!("skipping synthetic scenarios for preset {preset}: invalid room");
                continue;
            };
            let catalogs = [
                ("small", generator.small_pieces(&room, count)),
                ("large", generator.large_pieces(&room, count)),
                ("mixed", generator.mixed(&room, count)),
            ];
            for (kind, catalog) in catalogs {
                let name = format!("synthetic_{kind}_{preset}");
                scenarios.push(SyntheticGenerator::scenario(name, preset, catalog));
            }
        }

        scenarios
    }
}
