//! Furniture layout engine.

use crate::candidates::CandidateQuery;
use crate::scoring::{compute_features, HeuristicScorer, ScoringContext};
use crate::validator::validate;
use rayon::prelude::*;
use roomfit_core::{
    checked_score, total_quantity, zone_code, ConstraintViolation, FailedItem, FailureReason,
    FurnitureArchetype, LayoutConfig, LayoutResult, PlacedItem, Planner, Rect, Result, Room,
    Scorer, SelectionMode, EPSILON,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Cancels the runs of one engine that are in flight.
///
/// Every `plan` call registers its own flag here for its duration. A
/// cancel reaches exactly the runs registered at that moment; runs started
/// afterwards begin uncancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    runs: Arc<Mutex<Vec<Arc<AtomicBool>>>>,
}

impl CancelHandle {
    /// Cancels every run currently in flight.
    pub fn cancel(&self) {
        let runs = self.lock();
        if !runs.is_empty() {
            log::info!("cancelling {} run(s) in flight", runs.len());
        }
        for flag in runs.iter() {
            flag.store(true, Ordering::Relaxed);
        }
    }

    /// Number of runs currently in flight.
    pub fn active_runs(&self) -> usize {
        self.lock().len()
    }

    fn register(&self) -> RunToken<'_> {
        let flag = Arc::new(AtomicBool::new(false));
        self.lock().push(flag.clone());
        RunToken {
            handle: self,
            flag,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<AtomicBool>>> {
        // The list stays consistent even if a holder panicked.
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cancellation flag of a single run. Unregisters itself on drop.
struct RunToken<'a> {
    handle: &'a CancelHandle,
    flag: Arc<AtomicBool>,
}

impl RunToken<'_> {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl Drop for RunToken<'_> {
    fn drop(&mut self) {
        self.handle
            .lock()
            .retain(|flag| !Arc::ptr_eq(flag, &self.flag));
    }
}

/// Outcome of the position search for one instance.
#[derive(Debug)]
enum Search {
    Placed(Rect, f64),
    Exhausted,
    Interrupted(FailureReason),
}

/// Mutable accumulator of one run. Never outlives the `plan` call.
#[derive(Debug, Default)]
struct RunState {
    placed: Vec<PlacedItem>,
    rects: Vec<Rect>,
    failed: Vec<FailedItem>,
    placed_area: f64,
}

impl RunState {
    fn place(&mut self, archetype: &FurnitureArchetype, instance: usize, rect: Rect, score: f64) {
        self.placed_area += rect.area();
        self.rects.push(rect);
        self.placed.push(PlacedItem::new(
            archetype.name.clone(),
            instance,
            rect,
            archetype.zone.clone(),
            score,
        ));
    }

    fn fail(&mut self, archetype: &FurnitureArchetype, instance: usize, reason: FailureReason) {
        self.failed
            .push(FailedItem::new(archetype.name.clone(), instance, reason));
    }
}

/// Greedy, priority-ordered furniture placement engine.
///
/// Each instance is placed at the best (or first) feasible grid position in
/// its zone. When no position exists, the search is repeated with
/// progressively relaxed spacing. Runs share nothing: spacing, margins and
/// counters live in the immutable config or in the per-call accumulator,
/// and each run gets its own cancellation flag.
pub struct LayoutEngine {
    config: LayoutConfig,
    oracle: Option<Arc<dyn Scorer>>,
    runs: CancelHandle,
}

impl LayoutEngine {
    /// Creates a new engine with the given configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            oracle: None,
            runs: CancelHandle::default(),
        }
    }

    /// Creates an engine with default configuration.
    pub fn default_config() -> Self {
        Self::new(LayoutConfig::default())
    }

    /// Ranks candidates with an external oracle instead of the heuristic.
    pub fn with_oracle<S: Scorer + 'static>(self, oracle: S) -> Self {
        self.with_shared_oracle(Arc::new(oracle))
    }

    /// Same as [`with_oracle`](Self::with_oracle) for an already shared scorer.
    pub fn with_shared_oracle(mut self, oracle: Arc<dyn Scorer>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Returns a handle that cancels the runs in flight, usable from other
    /// threads or from inside an oracle.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.runs.clone()
    }

    /// Name of the scorer ranking candidates.
    pub fn scorer_name(&self) -> &str {
        self.oracle
            .as_deref()
            .map_or("heuristic", |oracle| oracle.name())
    }

    /// Priority ascending, then footprint area descending. Stable.
    fn schedule(catalog: &[FurnitureArchetype]) -> Vec<(usize, usize)> {
        let mut order: Vec<usize> = (0..catalog.len()).collect();
        order.sort_by(|&a, &b| {
            catalog[a]
                .priority
                .cmp(&catalog[b].priority)
                .then_with(|| catalog[b].area().total_cmp(&catalog[a].area()))
        });
        order
            .into_iter()
            .flat_map(|a| (0..catalog[a].quantity).map(move |instance| (a, instance)))
            .collect()
    }

    fn interruption(&self, start: &Instant, token: &RunToken<'_>) -> Option<FailureReason> {
        if token.is_cancelled() {
            return Some(FailureReason::Cancelled);
        }
        // Check time limit (0 = unlimited)
        if self.config.time_limit_ms > 0
            && start.elapsed().as_millis() as u64 >= self.config.time_limit_ms
        {
            return Some(FailureReason::TimeLimit);
        }
        None
    }

    fn check_constraints(
        &self,
        archetype: &FurnitureArchetype,
        state: &RunState,
        room_area: f64,
    ) -> Option<ConstraintViolation> {
        let config = &self.config;
        if let Some(limit) = config.max_items {
            if state.placed.len() >= limit {
                return Some(ConstraintViolation::ItemLimit { limit });
            }
        }
        if let Some(max) = config.max_footprint_dim {
            if archetype.length > max || archetype.width > max {
                return Some(ConstraintViolation::TooLarge { max });
            }
        }
        if let Some(min) = config.min_footprint_dim {
            if archetype.length < min || archetype.width < min {
                return Some(ConstraintViolation::TooSmall { min });
            }
        }
        if let Some(limit) = config.max_area_ratio {
            let ratio = (state.placed_area + archetype.area()) / room_area;
            if ratio > limit {
                return Some(ConstraintViolation::FloorCapacity { ratio, limit });
            }
        }
        None
    }

    /// Searches for a position, relaxing spacing across attempts.
    ///
    /// Cancellation and the time limit are checked before every attempt.
    fn place_instance(
        &self,
        room: &Room,
        catalog: &[FurnitureArchetype],
        archetype_index: usize,
        state: &RunState,
        start: &Instant,
        token: &RunToken<'_>,
    ) -> Result<Search> {
        let config = &self.config;
        let archetype = &catalog[archetype_index];
        let Some(zone_index) = room.zone_index(&archetype.zone) else {
            return Err(roomfit_core::Error::UnknownZone(archetype.zone.clone()));
        };
        let zone = &room.zones[zone_index];
        let grid_step = config.grid_step_for(archetype, zone.grid_step);
        let policy = (!config.spacing_policy.is_fixed()).then_some(&config.spacing_policy);
        let ctx = ScoringContext {
            zone: &zone.rect,
            zone_code: zone_code(&zone.name),
            archetype_index,
            obstacles: &room.obstacles,
            placed: &state.rects,
        };

        let mut last_spacing: Option<f64> = None;
        for attempt in 0..config.max_retry_attempts {
            if let Some(reason) = self.interruption(start, token) {
                return Ok(Search::Interrupted(reason));
            }
            let spacing = config
                .relaxation
                .spacing_for_attempt(config.min_spacing, attempt);
            if last_spacing.is_some_and(|previous| (previous - spacing).abs() < EPSILON) {
                continue;
            }
            last_spacing = Some(spacing);

            let query = CandidateQuery::new(zone.rect, archetype.length, archetype.width)?
                .with_obstacles(&room.obstacles)
                .with_placed(&state.rects)
                .with_wall_margin(config.wall_margin)
                .with_obstacle_margin(config.obstacle_margin)
                .with_spacing(spacing, policy)
                .with_grid_step(grid_step)
                .with_strategic_positions(config.uses_strategic_positions(archetype));

            if let Some((rect, score)) = self.select(&query, &ctx)? {
                if attempt > 0 {
                    log::debug!(
                        "{} placed after relaxing spacing to {:.2}m (attempt {})",
                        archetype.name,
                        spacing,
                        attempt + 1
                    );
                }
                return Ok(Search::Placed(rect, score));
            }
            log::debug!(
                "{}: no candidate in '{}' at spacing {:.2}m (attempt {}/{})",
                archetype.name,
                zone.name,
                spacing,
                attempt + 1,
                config.max_retry_attempts
            );
        }
        Ok(Search::Exhausted)
    }

    /// Picks a candidate with the oracle, falling back to the heuristic.
    fn select(
        &self,
        query: &CandidateQuery<'_>,
        ctx: &ScoringContext<'_>,
    ) -> Result<Option<(Rect, f64)>> {
        if let Some(oracle) = &self.oracle {
            match self.select_with(query, ctx, oracle.as_ref()) {
                Ok(choice) => return Ok(choice),
                Err(e) => log::warn!("{e}; rescoring candidates with the heuristic"),
            }
        }
        let heuristic = HeuristicScorer::new(self.config.heuristic);
        self.select_with(query, ctx, &heuristic)
    }

    fn select_with(
        &self,
        query: &CandidateQuery<'_>,
        ctx: &ScoringContext<'_>,
        scorer: &dyn Scorer,
    ) -> Result<Option<(Rect, f64)>> {
        let score_at = |(x, y): (f64, f64)| -> Result<(Rect, f64)> {
            let rect = query.footprint_at(x, y);
            let score = checked_score(scorer, &compute_features(ctx, &rect))?;
            Ok((rect, score))
        };

        match (self.config.selection, self.config.accept_score) {
            (SelectionMode::FirstFit, _) => query.iter().next().map(&score_at).transpose(),
            (SelectionMode::BestScore, Some(threshold)) => {
                let mut best: Option<(Rect, f64)> = None;
                for position in query.iter() {
                    let (rect, score) = score_at(position)?;
                    if score >= threshold {
                        return Ok(Some((rect, score)));
                    }
                    if best.map_or(true, |(_, top)| score > top) {
                        best = Some((rect, score));
                    }
                }
                Ok(best)
            }
            (SelectionMode::BestScore, None) => {
                let positions: Vec<(f64, f64)> = query.iter().collect();
                let scored = positions
                    .par_iter()
                    .map(|&position| score_at(position))
                    .collect::<Result<Vec<_>>>()?;
                // First found wins ties.
                Ok(scored.into_iter().fold(None, |best, (rect, score)| match best {
                    Some((_, top)) if top >= score => best,
                    _ => Some((rect, score)),
                }))
            }
        }
    }

    fn run(
        &self,
        room: &Room,
        catalog: &[FurnitureArchetype],
        token: &RunToken<'_>,
    ) -> Result<LayoutResult> {
        let start = Instant::now();
        let room_area = room.area();
        let total_requested = total_quantity(catalog);
        let jobs = Self::schedule(catalog);
        let mut state = RunState::default();
        let mut cancelled = false;

        for (position, &(archetype_index, instance)) in jobs.iter().enumerate() {
            let archetype = &catalog[archetype_index];

            if let Some(reason) = self.interruption(&start, token) {
                Self::abandon(&mut state, catalog, &jobs[position..], reason);
                cancelled = true;
                break;
            }

            if let Some(violation) = self.check_constraints(archetype, &state, room_area) {
                let halt = self.config.halt_at_item_limit
                    && matches!(violation, ConstraintViolation::ItemLimit { .. });
                let reason = FailureReason::ConstraintViolation(violation);
                if halt {
                    log::info!(
                        "{reason}; {} remaining instances not attempted",
                        jobs.len() - position
                    );
                    for &(a, i) in &jobs[position..] {
                        state.fail(&catalog[a], i, reason.clone());
                    }
                    break;
                }
                log::warn!("{}#{instance} rejected: {reason}", archetype.name);
                state.fail(archetype, instance, reason);
                continue;
            }

            match self.place_instance(room, catalog, archetype_index, &state, &start, token)? {
                Search::Placed(rect, score) => {
                    log::debug!("{}#{instance} -> {rect} (score {score:.3})", archetype.name);
                    state.place(archetype, instance, rect, score);
                }
                Search::Interrupted(reason) => {
                    Self::abandon(&mut state, catalog, &jobs[position..], reason);
                    cancelled = true;
                    break;
                }
                Search::Exhausted => {
                    let reason = FailureReason::NoFeasiblePosition {
                        attempts: self.config.max_retry_attempts,
                    };
                    log::debug!("{}#{instance}: {reason}", archetype.name);
                    state.fail(archetype, instance, reason);
                }
            }
        }

        let validation = validate(&state.placed, self.config.min_spacing);
        let mut result = LayoutResult::new(
            state.placed,
            state.failed,
            total_requested,
            room_area,
            validation,
        )
        .with_scorer(self.scorer_name());
        result.computation_time_ms = start.elapsed().as_millis() as u64;
        result.cancelled = cancelled;

        log::info!(
            "placed {}/{} items ({}), coverage {:.1}%, validation {} in {} ms",
            result.placed_count,
            result.total_requested,
            result.success_percent(),
            result.floor_coverage_ratio * 100.0,
            result.validation.status,
            result.computation_time_ms
        );
        Ok(result)
    }

    /// Fails every remaining instance with the interruption reason.
    fn abandon(
        state: &mut RunState,
        catalog: &[FurnitureArchetype],
        remaining: &[(usize, usize)],
        reason: FailureReason,
    ) {
        log::info!(
            "run interrupted ({reason}); {} instances left unplaced",
            remaining.len()
        );
        for &(a, i) in remaining {
            state.fail(&catalog[a], i, reason.clone());
        }
    }
}

impl Planner for LayoutEngine {
    fn plan(&self, room: &Room, catalog: &[FurnitureArchetype]) -> Result<LayoutResult> {
        self.config.validate()?;
        room.validate()?;
        room.validate_catalog(catalog)?;

        let token = self.runs.register();
        self.run(room, catalog, &token)
    }

    fn cancel(&self) {
        self.runs.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomfit_core::{Error, Obstacle, Zone};

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    fn living_room() -> Room {
        Room::new(17.0, 11.0).with_zone(Zone::new("living", rect(1.0, 1.0, 7.5, 5.5)))
    }

    #[test]
    fn test_schedule_order() {
        let catalog = vec![
            FurnitureArchetype::new("small", 0.5, 0.5, "living").with_priority(2),
            FurnitureArchetype::new("late", 3.0, 3.0, "living").with_priority(3),
            FurnitureArchetype::new("big", 2.0, 2.0, "living")
                .with_priority(2)
                .with_quantity(2),
            FurnitureArchetype::new("first", 0.2, 0.2, "living").with_priority(1),
        ];
        let names: Vec<_> = LayoutEngine::schedule(&catalog)
            .into_iter()
            .map(|(a, i)| format!("{}#{i}", catalog[a].name))
            .collect();
        assert_eq!(names, vec!["first#0", "big#0", "big#1", "small#0", "late#0"]);
    }

    #[test]
    fn test_single_sofa() {
        let engine = LayoutEngine::new(
            LayoutConfig::new()
                .with_wall_margin(0.5)
                .with_min_spacing(0.8),
        );
        let catalog = vec![FurnitureArchetype::new("SOFA 3 Seat", 2.6, 1.0, "living")];
        let result = engine.plan(&living_room(), &catalog).unwrap();
        assert_eq!(result.placed_count, 1);
        assert!(result.validation.is_clean());
        assert_eq!(result.scorer, "heuristic");
        let placed = result.placed_items[0].rect().unwrap();
        assert!(rect(1.5, 1.5, 6.5, 4.5).contains(&placed));
    }

    #[test]
    fn test_item_limit_without_halt() {
        let engine = LayoutEngine::new(LayoutConfig::new().with_max_items(1));
        let catalog = vec![FurnitureArchetype::new("Pot", 0.4, 0.4, "living").with_quantity(3)];
        let result = engine.plan(&living_room(), &catalog).unwrap();
        assert_eq!(result.placed_count, 1);
        assert_eq!(result.failed_count(), 2);
        assert!(result.failed_items.iter().all(|f| matches!(
            f.reason,
            FailureReason::ConstraintViolation(ConstraintViolation::ItemLimit { limit: 1 })
        )));
    }

    #[test]
    fn test_footprint_limits() {
        let engine = LayoutEngine::new(LayoutConfig::new().with_footprint_limits(0.3, 2.0));
        let catalog = vec![
            FurnitureArchetype::new("Huge", 2.5, 1.0, "living"),
            FurnitureArchetype::new("Tiny", 0.2, 0.5, "living"),
        ];
        let result = engine.plan(&living_room(), &catalog).unwrap();
        assert_eq!(result.placed_count, 0);
        let reasons: Vec<String> = result
            .failed_items
            .iter()
            .map(|f| f.reason.to_string())
            .collect();
        assert_eq!(
            reasons,
            vec![
                "furniture too large (max 2m per dimension)",
                "furniture too small (min 0.3m per dimension)"
            ]
        );
    }

    #[test]
    fn test_floor_capacity() {
        let room = Room::new(10.0, 10.0).with_zone(Zone::new("living", rect(0.0, 0.0, 10.0, 10.0)));
        let engine = LayoutEngine::new(
            LayoutConfig::new()
                .with_max_area_ratio(0.05)
                .with_wall_margin(0.0),
        );
        let catalog = vec![FurnitureArchetype::new("Table", 2.0, 2.0, "living").with_quantity(2)];
        let result = engine.plan(&room, &catalog).unwrap();
        assert_eq!(result.placed_count, 1);
        assert!(matches!(
            result.failed_items[0].reason,
            FailureReason::ConstraintViolation(ConstraintViolation::FloorCapacity { .. })
        ));
    }

    #[test]
    fn test_first_fit_takes_first_raster_position() {
        let engine = LayoutEngine::new(
            LayoutConfig::new()
                .with_selection(SelectionMode::FirstFit)
                .with_wall_margin(0.5),
        );
        let catalog = vec![FurnitureArchetype::new("Lemari", 1.2, 0.6, "living")];
        let result = engine.plan(&living_room(), &catalog).unwrap();
        let item = &result.placed_items[0];
        assert!((item.x - 1.5).abs() < 1e-9);
        assert!((item.y - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_accept_score_short_circuits() {
        let engine = LayoutEngine::new(LayoutConfig::new().with_accept_score(0.0));
        let catalog = vec![FurnitureArchetype::new("Lemari", 1.2, 0.6, "living")];
        let result = engine.plan(&living_room(), &catalog).unwrap();
        // Every score clears 0.0, so the first raster position wins.
        assert!((result.placed_items[0].x - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_relaxation_rescues_placement() {
        // Two 1.0m items in a 2.6m-wide strip: they fit only at spacing <= 0.6.
        let room = Room::new(5.0, 3.0).with_zone(Zone::new("living", rect(0.0, 0.0, 2.6, 1.0)));
        let catalog = vec![FurnitureArchetype::new("Chair", 1.0, 1.0, "living").with_quantity(2)];
        let base = LayoutConfig::new()
            .with_wall_margin(0.0)
            .with_min_spacing(0.8)
            .with_grid_step(0.1)
            .with_selection(SelectionMode::FirstFit)
            .with_spacing_policy(roomfit_core::SpacingPolicy::fixed());

        let strict = LayoutEngine::new(base.clone().with_max_retry_attempts(1));
        let result = strict.plan(&room, &catalog).unwrap();
        assert_eq!(result.placed_count, 1);
        assert_eq!(
            result.failed_items[0].reason.to_string(),
            "no valid position after 1 attempts"
        );

        let relaxed = LayoutEngine::new(base.with_max_retry_attempts(5));
        let result = relaxed.plan(&room, &catalog).unwrap();
        assert_eq!(result.placed_count, 2);
        assert!(result.validation.is_clean());
    }

    #[test]
    fn test_invalid_input_is_fatal() {
        let engine = LayoutEngine::default_config();
        let catalog = vec![FurnitureArchetype::new("Sofa", 2.0, 1.0, "garage")];
        assert!(matches!(
            engine.plan(&living_room(), &catalog),
            Err(Error::UnknownZone(_))
        ));
        assert!(matches!(
            engine.plan(&living_room(), &[]),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            engine.plan(&Room::new(0.0, 11.0), &catalog),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_search_checks_interruption_per_attempt() {
        let room = living_room();
        let catalog = vec![FurnitureArchetype::new("SOFA 3 Seat", 2.6, 1.0, "living")];
        let engine = LayoutEngine::new(LayoutConfig::new().with_max_retry_attempts(50));
        let state = RunState::default();
        let start = Instant::now();
        let token = engine.runs.register();
        assert_eq!(engine.cancel_handle().active_runs(), 1);

        let search = engine
            .place_instance(&room, &catalog, 0, &state, &start, &token)
            .unwrap();
        assert!(matches!(search, Search::Placed(..)));

        engine.cancel();
        let search = engine
            .place_instance(&room, &catalog, 0, &state, &start, &token)
            .unwrap();
        assert!(matches!(search, Search::Interrupted(FailureReason::Cancelled)));

        drop(token);
        assert_eq!(engine.cancel_handle().active_runs(), 0);
    }

    #[test]
    fn test_search_stops_at_time_limit() {
        let catalog = vec![FurnitureArchetype::new("SOFA 3 Seat", 2.6, 1.0, "living")];
        let engine = LayoutEngine::new(LayoutConfig::new().with_time_limit(1));
        let token = engine.runs.register();
        let start = Instant::now()
            .checked_sub(std::time::Duration::from_millis(10))
            .unwrap();
        let search = engine
            .place_instance(&living_room(), &catalog, 0, &RunState::default(), &start, &token)
            .unwrap();
        assert!(matches!(search, Search::Interrupted(FailureReason::TimeLimit)));
    }

    #[test]
    fn test_obstacle_blocks_zone() {
        let room = living_room().with_obstacle(Obstacle::new("Stairs", rect(1.0, 1.0, 7.5, 5.5)));
        let catalog = vec![FurnitureArchetype::new("SOFA 3 Seat", 2.6, 1.0, "living")];
        let result = LayoutEngine::default_config().plan(&room, &catalog).unwrap();
        assert_eq!(result.placed_count, 0);
        assert_eq!(
            result.failed_items[0].reason.to_string(),
            "no valid position after 15 attempts"
        );
    }
}
