//! Z-order cleanup.
//!
//! Editors accumulate sparse, duplicated, or huge z-orders over time. Tidying
//! renumbers them per layer while keeping the draw order intact.

use crate::error::{RefactorError, Result};
use crate::project::Project;
use crate::refactor::{transform_layouts, Selector};
use std::collections::BTreeMap;
use tracing::debug;

/// Renumber z-orders of each layer in every selected layout to
/// `start, start + step, ...`.
///
/// Instances are ranked by their current z-order; ties keep their position
/// in the instance list. The instance list itself is not reordered.
/// Returns the number of instances whose z-order changed, or an error if a
/// z-order does not fit in an `i64`.
pub fn tidy_z_order(project: &mut Project, selector: &Selector, start: i64, step: i64) -> Result<usize> {
    let mut changed = 0;
    let mut overflow = None;

    transform_layouts(project, selector, |layout| {
        if overflow.is_some() {
            return;
        }

        let mut by_layer: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (index, instance) in layout.instances.iter().enumerate() {
            by_layer.entry(instance.layer.as_str()).or_default().push(index);
        }

        let mut assignments = Vec::with_capacity(layout.instances.len());
        for indices in by_layer.into_values() {
            let mut ranked = indices;
            ranked.sort_by_key(|&index| layout.instances[index].z_order);
            for (rank, index) in ranked.into_iter().enumerate() {
                let Some(z_order) = nth_z_order(start, step, rank) else {
                    overflow = Some(layout.name.clone());
                    return;
                };
                assignments.push((index, z_order));
            }
        }

        for (index, z_order) in assignments {
            let instance = &mut layout.instances[index];
            if instance.z_order != z_order {
                debug!(
                    "{} in {}: zOrder {} -> {}",
                    instance.name, layout.name, instance.z_order, z_order
                );
                instance.z_order = z_order;
                changed += 1;
            }
        }
    });

    match overflow {
        Some(layout) => Err(RefactorError::ZOrderOverflow { layout, start, step }),
        None => Ok(changed),
    }
}

fn nth_z_order(start: i64, step: i64, rank: usize) -> Option<i64> {
    let rank = i64::try_from(rank).ok()?;
    start.checked_add(step.checked_mul(rank)?)
}
