//! Project transformations behind the CLI subcommands.
//!
//! Each operation takes the already-loaded [`Project`](crate::project::Project)
//! and edits it in place; loading, diffing, and writing are left to
//! [`refactor`](crate::refactor::refactor). Operations return how many
//! entries they touched so the caller can log it.

pub mod hud;
pub mod indicators;
pub mod layers;
pub mod obstacles;
pub mod text_timing;
pub mod zorder;

/// Translation applied to matched instances, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

impl From<&crate::cli::Offset> for Offset {
    fn from(offset: &crate::cli::Offset) -> Self {
        Self::new(offset.dx, offset.dy)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::project::{Coord, Instance, Layer, Layout, Object, Project, Rect};

    pub fn instance(name: &str, x: f64, y: f64) -> Instance {
        Instance::new(name, Rect::new(16.0, 16.0), Coord::new(x, y), "")
    }

    pub fn on_layer(mut instance: Instance, layer: &str, z_order: i64) -> Instance {
        instance.layer = layer.to_string();
        instance.z_order = z_order;
        instance
    }

    pub fn layer(name: &str) -> Layer {
        Layer {
            name: name.to_string(),
            visibility: true,
            ..Default::default()
        }
    }

    pub fn text_object(name: &str, text: &str) -> Object {
        Object {
            name: name.to_string(),
            kind: crate::project::TEXT_OBJECT_TYPE.to_string(),
            string: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn layout(name: &str, instances: Vec<Instance>) -> Layout {
        Layout {
            name: name.to_string(),
            instances,
            layers: vec![layer("")],
            ..Default::default()
        }
    }

    pub fn project(layouts: Vec<Layout>) -> Project {
        Project {
            layouts,
            ..Default::default()
        }
    }
}
