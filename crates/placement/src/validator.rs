//! Layout validation.
//!
//! [`validate`] is the overlap sweep run at the end of every placement run;
//! [`audit`] extends it with zone and obstacle checks so that layouts edited
//! or produced elsewhere can be checked against a room.

use crate::collision::{obstacle_conflict, overlaps_strict};
use roomfit_core::{
    AuditReport, BoundaryViolation, Collision, LayoutConfig, PlacedItem, Rect, Room,
    SpacingWarning, ValidationReport,
};

/// All-pairs overlap sweep over a placed-item list.
///
/// Overlapping pairs are collisions. Non-overlapping pairs whose dominant-axis
/// gap is below `min_spacing` are warnings. Items with a degenerate footprint
/// cannot be compared; they are listed in [`ValidationReport::skipped`] and
/// the report is not clean.
pub fn validate(placed: &[PlacedItem], min_spacing: f64) -> ValidationReport {
    let rects: Vec<Option<Rect>> = placed.iter().map(|item| item.rect().ok()).collect();
    let skipped: Vec<String> = placed
        .iter()
        .zip(&rects)
        .filter(|(_, rect)| rect.is_none())
        .map(|(item, _)| item.label())
        .collect();
    if !skipped.is_empty() {
        log::warn!(
            "{} item(s) with a degenerate footprint skipped: {}",
            skipped.len(),
            skipped.join(", ")
        );
    }
    let mut collisions = Vec::new();
    let mut warnings = Vec::new();

    for i in 0..placed.len() {
        let Some(a) = rects[i] else { continue };
        for j in (i + 1)..placed.len() {
            let Some(b) = rects[j] else { continue };
            if overlaps_strict(&a, &b) {
                collisions.push(Collision {
                    first: placed[i].label(),
                    second: placed[j].label(),
                    first_position: (a.x(), a.y()),
                    second_position: (b.x(), b.y()),
                });
                continue;
            }
            let gap = a.dominant_gap(&b);
            if gap < min_spacing {
                warnings.push(SpacingWarning {
                    first: placed[i].label(),
                    second: placed[j].label(),
                    distance: gap,
                });
            }
        }
    }

    ValidationReport::new(collisions, warnings).with_skipped(skipped)
}

/// Checks a layout against a room: overlaps, zone containment (with the wall
/// margin) and obstacle clearance (with the obstacle margin).
pub fn audit(room: &Room, config: &LayoutConfig, placed: &[PlacedItem]) -> AuditReport {
    let mut violations = Vec::new();

    for item in placed {
        let Ok(rect) = item.rect() else {
            violations.push(BoundaryViolation::InvalidFootprint { item: item.label() });
            continue;
        };

        match room.zone(&item.zone) {
            None => violations.push(BoundaryViolation::UnknownZone {
                item: item.label(),
                zone: item.zone.clone(),
            }),
            Some(zone) => {
                let inside = zone
                    .rect
                    .shrink(config.wall_margin)
                    .is_some_and(|interior| interior.contains(&rect));
                if !inside {
                    violations.push(BoundaryViolation::OutsideZone {
                        item: item.label(),
                        zone: zone.name.clone(),
                    });
                }
            }
        }

        if let Some(obstacle) = obstacle_conflict(&rect, &room.obstacles, config.obstacle_margin) {
            violations.push(BoundaryViolation::ObstacleClearance {
                item: item.label(),
                obstacle: obstacle.name.clone(),
                gap: rect.dominant_gap(&obstacle.rect),
            });
        }
    }

    AuditReport {
        validation: validate(placed, config.min_spacing),
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use roomfit_core::{Obstacle, ValidationStatus, Zone};

    fn item(name: &str, x: f64, y: f64, l: f64, w: f64) -> PlacedItem {
        PlacedItem::new(name, 0, Rect::new(x, y, l, w).unwrap(), "living", 1.0)
    }

    #[test]
    fn test_clean_layout() {
        let placed = vec![item("A", 0.0, 0.0, 1.0, 1.0), item("B", 2.0, 0.0, 1.0, 1.0)];
        let report = validate(&placed, 0.8);
        assert_eq!(report.status, ValidationStatus::Clean);
        assert_eq!(report.warning_count, 0);
    }

    #[test]
    fn test_overlap_is_collision() {
        let placed = vec![item("A", 0.0, 0.0, 2.0, 2.0), item("B", 1.0, 1.0, 2.0, 2.0)];
        let report = validate(&placed, 0.8);
        assert_eq!(report.status, ValidationStatus::HasOverlap);
        assert_eq!(report.overlap_count, 1);
        assert_eq!(report.collisions[0].first, "A#0");
        assert_eq!(report.collisions[0].second_position, (1.0, 1.0));
        assert_eq!(report.warning_count, 0);
    }

    #[test]
    fn test_close_pair_is_warning() {
        let placed = vec![item("A", 0.0, 0.0, 1.0, 1.0), item("B", 1.3, 0.2, 1.0, 1.0)];
        let report = validate(&placed, 0.8);
        assert!(report.is_clean());
        assert_eq!(report.warning_count, 1);
        assert_relative_eq!(report.warnings[0].distance, 0.3, epsilon = 1e-9);
    }

    #[test]
    fn test_touching_is_not_collision() {
        let placed = vec![item("A", 0.0, 0.0, 1.0, 1.0), item("B", 1.0, 0.0, 1.0, 1.0)];
        let report = validate(&placed, 0.0);
        assert!(report.is_clean());
        assert_eq!(report.warning_count, 0);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let placed = vec![
            item("A", 0.0, 0.0, 2.0, 2.0),
            item("B", 1.0, 1.0, 2.0, 2.0),
            item("C", 3.5, 0.0, 1.0, 1.0),
        ];
        assert_eq!(validate(&placed, 0.8), validate(&placed, 0.8));
    }

    #[test]
    fn test_degenerate_item_is_recorded() {
        let mut broken = item("Broken", 0.5, 0.5, 1.0, 1.0);
        broken.width = f64::NAN;
        let placed = vec![
            item("A", 0.0, 0.0, 1.0, 1.0),
            broken,
            item("B", 2.0, 0.0, 1.0, 1.0),
        ];
        let report = validate(&placed, 0.8);
        assert_eq!(report.status, ValidationStatus::Clean);
        assert_eq!(report.overlap_count, 0);
        assert_eq!(report.skipped, vec!["Broken#0".to_string()]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_audit_boundaries() {
        let room = Room::new(17.0, 11.0)
            .with_zone(Zone::new("living", Rect::new(1.0, 1.0, 6.5, 4.5).unwrap()))
            .with_obstacle(Obstacle::new(
                "Column 1",
                Rect::new(5.0, 3.0, 0.36, 0.36).unwrap(),
            ));
        let config = LayoutConfig::new()
            .with_wall_margin(0.5)
            .with_obstacle_margin(0.7);

        let mut stray = item("Stray", 1.5, 1.5, 1.0, 1.0);
        stray.zone = "garage".into();
        let placed = vec![
            item("Ok", 1.5, 1.5, 1.0, 1.0),
            item("Edge", 1.2, 4.0, 1.0, 1.0),
            item("Column", 4.0, 2.8, 0.5, 0.5),
            stray,
        ];
        let audit = audit(&room, &config, &placed);
        assert!(!audit.is_compliant());
        assert_eq!(audit.violations.len(), 3);
        assert!(matches!(
            &audit.violations[0],
            BoundaryViolation::OutsideZone { item, .. } if item == "Edge#0"
        ));
        assert!(matches!(
            &audit.violations[1],
            BoundaryViolation::ObstacleClearance { obstacle, .. } if obstacle == "Column 1"
        ));
        assert!(matches!(
            &audit.violations[2],
            BoundaryViolation::UnknownZone { zone, .. } if zone == "garage"
        ));
        // Ok#0 and Stray#0 share a footprint.
        assert_eq!(audit.validation.overlap_count, 1);
    }
}
