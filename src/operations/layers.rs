//! Copy layers between scenes.

use crate::error::{RefactorError, Result};
use crate::project::{Layer, Project};
use crate::refactor::{transform_layouts, Selector};
use tracing::debug;

/// Which layers to copy and how to treat layers the target already has.
#[derive(Debug, Clone, Default)]
pub struct CopyLayers {
    /// Layout to copy from.
    pub from: String,
    /// Only these layer names; empty copies every layer of the source.
    pub names: Vec<String>,
    /// Replace same-named layers in the target instead of skipping them.
    pub overwrite: bool,
}

/// Copy layers of `copy.from` into every layout `targets` selects.
///
/// The source layout is never a target. Missing layers are appended in
/// source order. Returns the number of layers added or replaced.
pub fn copy_layers(project: &mut Project, targets: &Selector, copy: &CopyLayers) -> Result<usize> {
    let source = project
        .layouts
        .iter()
        .find(|layout| layout.name == copy.from)
        .ok_or_else(|| RefactorError::UnknownLayout(copy.from.clone()))?;

    let layers: Vec<Layer> = source
        .layers
        .iter()
        .filter(|layer| copy.names.is_empty() || copy.names.contains(&layer.name))
        .cloned()
        .collect();

    for name in &copy.names {
        if !layers.iter().any(|layer| &layer.name == name) {
            debug!("Layout {} has no layer '{}'", copy.from, name);
        }
    }

    let mut copied = 0;
    transform_layouts(project, targets, |layout| {
        if layout.name == copy.from {
            return;
        }
        for layer in &layers {
            match layout.layers.iter().position(|l| l.name == layer.name) {
                Some(index) if copy.overwrite => {
                    let existing = &mut layout.layers[index];
                    if existing != layer {
                        *existing = layer.clone();
                        copied += 1;
                        debug!("Replaced layer '{}' in {}", layer.name, layout.name);
                    }
                }
                Some(_) => {}
                None => {
                    layout.layers.push(layer.clone());
                    copied += 1;
                    debug!("Added layer '{}' to {}", layer.name, layout.name);
                }
            }
        }
    });

    Ok(copied)
}
