//! Helpers that walk the nested collections of a project.

use super::selector::Selector;
use crate::project::{Instance, Layer, Layout, Object, Project};

/// What to do with an entry after a transform callback ran on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Keep,
    Remove,
}

/// Read-only view of the layout that owns the entry being transformed.
#[derive(Debug, Clone, Copy)]
pub struct LayoutView<'a> {
    pub name: &'a str,
    pub layers: &'a [Layer],
    pub objects: &'a [Object],
}

impl<'a> LayoutView<'a> {
    pub fn object(&self, name: &str) -> Option<&'a Object> {
        self.objects.iter().find(|o| o.name == name)
    }
}

/// Run `callback` on every selected instance.
///
/// Instances the selector skips are left alone; those the callback marks
/// [`Edit::Remove`] are dropped. Returns the number of instances visited.
pub fn transform_instances<F>(project: &mut Project, selector: &Selector, mut callback: F) -> usize
where
    F: FnMut(&mut Instance, &LayoutView<'_>) -> Edit,
{
    let mut visited = 0;

    for layout in selected_layouts(project, selector) {
        let Layout {
            name,
            instances,
            layers,
            objects,
            ..
        } = layout;
        let view = LayoutView {
            name: name.as_str(),
            layers: layers.as_slice(),
            objects: objects.as_slice(),
        };

        instances.retain_mut(|instance| {
            if !selector.matches_name(&instance.name) {
                return true;
            }
            visited += 1;
            callback(instance, &view) == Edit::Keep
        });
    }

    visited
}

/// Run `callback` on every selected layout object.
pub fn transform_objects<F>(project: &mut Project, selector: &Selector, mut callback: F) -> usize
where
    F: FnMut(&mut Object, &str) -> Edit,
{
    let mut visited = 0;

    for layout in selected_layouts(project, selector) {
        let layout_name = layout.name.as_str();
        layout.objects.retain_mut(|object| {
            if !selector.matches_name(&object.name) {
                return true;
            }
            visited += 1;
            callback(object, layout_name) == Edit::Keep
        });
    }

    visited
}

/// Run `callback` on every layout the selector's layout pattern accepts.
pub fn transform_layouts<F>(project: &mut Project, selector: &Selector, mut callback: F) -> usize
where
    F: FnMut(&mut Layout),
{
    let mut visited = 0;
    for layout in selected_layouts(project, selector) {
        visited += 1;
        callback(layout);
    }
    visited
}

fn selected_layouts<'p>(
    project: &'p mut Project,
    selector: &'p Selector,
) -> impl Iterator<Item = &'p mut Layout> + 'p {
    project
        .layouts
        .iter_mut()
        .filter(move |layout| selector.matches_layout(&layout.name))
}
