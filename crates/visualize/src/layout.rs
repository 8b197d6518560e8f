use serde::Serialize;
use std::f64::consts::TAU;

use extract::Importance;

use crate::config::{Layout, VisualConfig};

/// Keeps nodes clear of the canvas edge, in node sizes.
const MARGIN_NODE_SIZES: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Deterministic positions, one per entry of `importances`, in order.
pub fn compute(layout: Layout, importances: &[Importance], config: &VisualConfig) -> Vec<Position> {
    match layout {
        Layout::Circular => circular(importances.len(), config),
        Layout::Hierarchical => hierarchical(importances, config),
        Layout::Radial => radial(importances, config),
    }
}

fn center(config: &VisualConfig) -> Position {
    Position {
        x: config.width / 2.0,
        y: config.height / 2.0,
    }
}

fn outer_radius(config: &VisualConfig) -> f64 {
    (config.width.min(config.height) / 2.0 - MARGIN_NODE_SIZES * config.node_size).max(0.0)
}

fn on_circle(center: Position, radius: f64, index: usize, count: usize) -> Position {
    let angle = TAU * index as f64 / count as f64;
    Position {
        x: center.x + radius * angle.cos(),
        y: center.y + radius * angle.sin(),
    }
}

/// Evenly spaced on one circle.
pub fn circular(count: usize, config: &VisualConfig) -> Vec<Position> {
    let center = center(config);
    if count == 1 {
        return vec![center];
    }

    let radius = outer_radius(config);
    (0..count).map(|i| on_circle(center, radius, i, count)).collect()
}

/// Rows by importance (high, medium, then the rest), top to bottom. Empty
/// tiers take no row.
pub fn hierarchical(importances: &[Importance], config: &VisualConfig) -> Vec<Position> {
    let tiers: Vec<Vec<usize>> = [Importance::High, Importance::Medium, Importance::Low]
        .iter()
        .map(|tier| {
            importances
                .iter()
                .enumerate()
                .filter(|(_, importance)| *importance == tier)
                .map(|(idx, _)| idx)
                .collect::<Vec<_>>()
        })
        .filter(|members| !members.is_empty())
        .collect();

    let mut positions = vec![center(config); importances.len()];
    let rows = tiers.len() as f64;

    for (row, members) in tiers.iter().enumerate() {
        let y = config.height * (row as f64 + 1.0) / (rows + 1.0);
        let columns = members.len() as f64;
        for (column, &idx) in members.iter().enumerate() {
            positions[idx] = Position {
                x: config.width * (column as f64 + 1.0) / (columns + 1.0),
                y,
            };
        }
    }

    positions
}

/// Even angular spacing around the centre; more important nodes sit on
/// inner rings.
pub fn radial(importances: &[Importance], config: &VisualConfig) -> Vec<Position> {
    let center = center(config);
    let count = importances.len();
    if count == 1 {
        return vec![center];
    }

    let radius = outer_radius(config);
    importances
        .iter()
        .enumerate()
        .map(|(i, importance)| on_circle(center, radius * ring_factor(*importance), i, count))
        .collect()
}

fn ring_factor(importance: Importance) -> f64 {
    match importance {
        Importance::High => 0.35,
        Importance::Medium => 0.7,
        Importance::Low => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: Position, b: Position) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    #[test]
    fn test_circular_radius() {
        let config = VisualConfig::default();
        let positions = circular(4, &config);
        let center = Position { x: 400.0, y: 300.0 };

        // min(800, 600) / 2 - 1.5 * 20
        for p in &positions {
            assert!((distance(*p, center) - 270.0).abs() < 1e-9);
        }
        assert!((positions[0].x - 670.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_node_is_centered() {
        let config = VisualConfig::default();
        assert_eq!(circular(1, &config), vec![Position { x: 400.0, y: 300.0 }]);
        assert_eq!(radial(&[Importance::Low], &config), vec![Position { x: 400.0, y: 300.0 }]);
    }

    #[test]
    fn test_hierarchical_tiers() {
        let config = VisualConfig::default();
        let importances = [Importance::Low, Importance::High, Importance::Low, Importance::Medium];
        let positions = hierarchical(&importances, &config);

        // three tiers over a 600 high canvas
        assert_eq!(positions[1].y, 150.0);
        assert_eq!(positions[3].y, 300.0);
        assert_eq!(positions[0].y, 450.0);
        assert_eq!(positions[2].y, 450.0);

        assert_eq!(positions[1].x, 400.0);
        assert!(positions[0].x < positions[2].x);
    }

    #[test]
    fn test_radial_rings_by_importance() {
        let config = VisualConfig::default();
        let center = Position { x: 400.0, y: 300.0 };
        let positions = radial(&[Importance::High, Importance::Medium, Importance::Low], &config);

        let high = distance(positions[0], center);
        let medium = distance(positions[1], center);
        let low = distance(positions[2], center);
        assert!(high < medium && medium < low);
    }

    #[test]
    fn test_layouts_are_deterministic() {
        let config = VisualConfig::default();
        let importances = [Importance::High, Importance::Low, Importance::Medium, Importance::Low];
        for layout in [Layout::Circular, Layout::Hierarchical, Layout::Radial] {
            assert_eq!(compute(layout, &importances, &config), compute(layout, &importances, &config));
            assert_eq!(compute(layout, &importances, &config).len(), importances.len());
        }
    }
}
