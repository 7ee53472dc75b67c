//! Obstacle placement.

use super::Offset;
use crate::project::Project;
use crate::refactor::{transform_instances, Edit, Selector};
use tracing::debug;

/// Translate every selected obstacle by `offset`, then round its position to
/// a multiple of `snap` when given.
pub fn move_obstacles(
    project: &mut Project,
    selector: &Selector,
    offset: Offset,
    snap: Option<f64>,
) -> usize {
    transform_instances(project, selector, |instance, layout| {
        instance.x = snap_to(instance.x + offset.dx, snap);
        instance.y = snap_to(instance.y + offset.dy, snap);
        debug!(
            "{} in {} -> ({}, {})",
            instance.name, layout.name, instance.x, instance.y
        );
        Edit::Keep
    })
}

fn snap_to(value: f64, grid: Option<f64>) -> f64 {
    match grid {
        Some(grid) if grid > 0.0 => (value / grid).round() * grid,
        _ => value,
    }
}
