//! Key-binding indicator edits.

use super::Offset;
use crate::project::Project;
use crate::refactor::{transform_instances, Edit, Selector};
use tracing::debug;

/// Instance name of the on-screen key-binding hint.
pub const BIND_INDICATOR: &str = "BindIndicator";

/// Translate every selected indicator by `offset`, optionally moving it to
/// `layer`. Returns the number of indicators visited.
pub fn move_indicators(
    project: &mut Project,
    selector: &Selector,
    offset: Offset,
    layer: Option<&str>,
) -> usize {
    transform_instances(project, selector, |instance, layout| {
        instance.x += offset.dx;
        instance.y += offset.dy;
        if let Some(layer) = layer {
            instance.layer = layer.to_string();
        }
        debug!(
            "{} in {} -> ({}, {}) on '{}'",
            instance.name, layout.name, instance.x, instance.y, instance.layer
        );
        Edit::Keep
    })
}

/// Drop every instance named exactly `BindIndicator`.
pub fn remove_bind_indicators(project: &mut Project) -> usize {
    transform_instances(project, &Selector::exact_name(BIND_INDICATOR), |_, layout| {
        debug!("Removing {} from {}", BIND_INDICATOR, layout.name);
        Edit::Remove
    })
}
