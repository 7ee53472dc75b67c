//! HUD elements shared by every level: reminders, counters, transitions.

use crate::config::SceneConfig;
use crate::project::{Coord, Instance, Layer, Project, Rect};
use crate::refactor::{transform_instances, transform_layouts, transform_objects, Edit, Selector};
use serde_json::json;
use tracing::debug;

pub const PAUSE_REMINDER: &str = "PauseReminder";
pub const RESET_REMINDER: &str = "ResetReminder";
pub const TRANSITION: &str = "Transition";
pub const UI_LAYER: &str = "UI";
pub const COUNTER_VALUE: &str = "Unbound_Val";
pub const COUNTER_DESCRIPTION: &str = "Unbound_Desc";

/// The game window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub rect: Rect,
}

impl Window {
    pub fn center(&self) -> Coord {
        Coord::new(self.rect.width / 2.0, self.rect.height / 2.0)
    }
}

impl From<&SceneConfig> for Window {
    fn from(config: &SceneConfig) -> Self {
        Self {
            rect: Rect::new(config.window_width, config.window_height),
        }
    }
}

/// Remove the per-scene counter objects now provided by global objects.
pub fn remove_non_global_counters(project: &mut Project) -> usize {
    let selector = Selector::any_name(&[COUNTER_VALUE, COUNTER_DESCRIPTION]);

    transform_objects(project, &selector, |object, layout| {
        debug!("Removing object {} from {}", object.name, layout);
        Edit::Remove
    })
}

/// Add a pause reminder to every level that does not have one yet.
pub fn add_pause_reminders(project: &mut Project, level_prefix: &str) -> usize {
    let mut added = 0;
    let levels = Selector::all().layout_prefix(level_prefix);

    transform_layouts(project, &levels, |layout| {
        if layout.has_instance(PAUSE_REMINDER) {
            return;
        }
        layout.instances.push(Instance::new(
            PAUSE_REMINDER,
            Rect::new(24.0, 32.0),
            Coord::new(34.0, 19.0),
            UI_LAYER,
        ));
        debug!("Added {} to {}", PAUSE_REMINDER, layout.name);
        added += 1;
    });

    added
}

/// Add the full-screen transition instance and its hidden layer to every
/// level missing them.
pub fn add_transitions(project: &mut Project, level_prefix: &str) -> usize {
    let mut added = 0;
    let levels = Selector::all().layout_prefix(level_prefix);

    transform_layouts(project, &levels, |layout| {
        if !layout.has_instance(TRANSITION) {
            layout.instances.push(Instance::new(
                TRANSITION,
                Rect::new(810.0, 610.0),
                Coord::new(-5.0, -5.0),
                TRANSITION,
            ));
            debug!("Added {} instance to {}", TRANSITION, layout.name);
            added += 1;
        }

        if !layout.has_layer(TRANSITION) {
            layout.layers.push(transition_layer());
            debug!("Added {} layer to {}", TRANSITION, layout.name);
            added += 1;
        }
    });

    added
}

/// Hidden layer tinted by an adjustment effect, faded in by scene events.
fn transition_layer() -> Layer {
    Layer {
        name: TRANSITION.to_string(),
        visibility: false,
        cameras: Vec::new(),
        effects: vec![json!({
            "effectType": "Adjustment",
            "name": "AlphaAdjustment",
            "doubleParameters": {
                "alpha": 0,
                "blue": 0.6,
                "brightness": 1,
                "contrast": 1,
                "gamma": 1,
                "green": 1,
                "red": 1,
                "saturation": 2
            },
            "stringParameters": {},
            "booleanParameters": {}
        })],
        ..Default::default()
    }
}

/// Size and place the reset and pause reminders.
///
/// The reset reminder sits centered, 20px above the bottom of the window;
/// the pause reminder sits in the top-left corner.
pub fn position_reminders(project: &mut Project, window: Window) -> usize {
    let reset = Rect::new(74.0, 50.0);
    let reset_at = Coord::new(
        window.center().x - reset.width / 2.0,
        window.rect.height - 20.0 - reset.height,
    );
    let pause = Rect::new(37.0, 50.0);
    let pause_at = Coord::new(20.0, 20.0);

    let selector = Selector::any_name(&[RESET_REMINDER, PAUSE_REMINDER]);

    transform_instances(project, &selector, |instance, layout| {
        if instance.name == RESET_REMINDER {
            instance.place(reset, reset_at);
        } else {
            instance.place(pause, pause_at);
        }
        debug!("Placed {} in {}", instance.name, layout.name);
        Edit::Keep
    })
}

/// Move the unbound-key counters into the top-right corner of the UI layer.
pub fn position_counters(project: &mut Project) -> usize {
    let selector = Selector::any_name(&[COUNTER_VALUE, COUNTER_DESCRIPTION]);

    transform_instances(project, &selector, |instance, layout| {
        instance.x = if instance.name == COUNTER_DESCRIPTION {
            575.0
        } else {
            745.0
        };
        instance.y = 20.0;
        instance.layer = UI_LAYER.to_string();
        debug!("Placed {} in {}", instance.name, layout.name);
        Edit::Keep
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::fixtures::{instance, layer, layout, project};
    use crate::project::Object;

    fn window() -> Window {
        Window::from(&SceneConfig::default())
    }

    #[test]
    fn test_remove_non_global_counters() {
        let mut scene = layout("L_1", vec![]);
        scene.objects = ["Unbound_Val", "Player", "Unbound_Desc", "Unbound_Value"]
            .iter()
            .map(|name| Object {
                name: name.to_string(),
                ..Default::default()
            })
            .collect();
        let mut project = project(vec![scene]);

        assert_eq!(remove_non_global_counters(&mut project), 2);
        let names: Vec<&str> = project.layouts[0].objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Player", "Unbound_Value"]);
    }

    #[test]
    fn test_add_pause_reminders_only_to_levels_missing_one() {
        let mut project = project(vec![
            layout("L_1", vec![]),
            layout("L_2", vec![instance(PAUSE_REMINDER, 1.0, 1.0)]),
            layout("Menu", vec![]),
        ]);

        assert_eq!(add_pause_reminders(&mut project, "L_"), 1);

        let added = &project.layouts[0].instances[0];
        assert_eq!(added.name, PAUSE_REMINDER);
        assert_eq!((added.x, added.y, added.width, added.height), (34.0, 19.0, 24.0, 32.0));
        assert_eq!(added.layer, UI_LAYER);
        assert_eq!(project.layouts[1].instances.len(), 1);
        assert!(project.layouts[2].instances.is_empty());

        assert_eq!(add_pause_reminders(&mut project, "L_"), 0);
    }

    #[test]
    fn test_add_transitions() {
        let mut with_layer = layout("L_2", vec![]);
        with_layer.layers.push(layer(TRANSITION));
        let mut project = project(vec![layout("L_1", vec![]), with_layer, layout("Menu", vec![])]);

        assert_eq!(add_transitions(&mut project, "L_"), 3);

        let level = &project.layouts[0];
        assert!(level.has_instance(TRANSITION));
        let transition = level.layers.iter().find(|l| l.name == TRANSITION).unwrap();
        assert!(!transition.visibility);
        assert_eq!(transition.effects[0]["name"], "AlphaAdjustment");

        assert_eq!(project.layouts[1].layers.len(), 2);
        assert!(project.layouts[1].has_instance(TRANSITION));
        assert!(!project.layouts[2].has_instance(TRANSITION));

        assert_eq!(add_transitions(&mut project, "L_"), 0);
    }

    #[test]
    fn test_position_reminders() {
        let mut project = project(vec![layout(
            "L_1",
            vec![
                instance(RESET_REMINDER, 0.0, 0.0),
                instance(PAUSE_REMINDER, 0.0, 0.0),
                instance("ResetReminderOld", 0.0, 0.0),
            ],
        )]);

        assert_eq!(position_reminders(&mut project, window()), 2);

        let instances = &project.layouts[0].instances;
        assert_eq!(
            (instances[0].x, instances[0].y, instances[0].width, instances[0].height),
            (363.0, 530.0, 74.0, 50.0)
        );
        assert_eq!(
            (instances[1].x, instances[1].y, instances[1].width, instances[1].height),
            (20.0, 20.0, 37.0, 50.0)
        );
        assert_eq!((instances[2].x, instances[2].y), (0.0, 0.0));
    }

    #[test]
    fn test_position_counters() {
        let mut project = project(vec![layout(
            "L_1",
            vec![
                instance(COUNTER_DESCRIPTION, 1.0, 1.0),
                instance(COUNTER_VALUE, 2.0, 2.0),
            ],
        )]);

        assert_eq!(position_counters(&mut project), 2);

        let instances = &project.layouts[0].instances;
        assert_eq!((instances[0].x, instances[0].y), (575.0, 20.0));
        assert_eq!((instances[1].x, instances[1].y), (745.0, 20.0));
        assert!(instances.iter().all(|i| i.layer == UI_LAYER));
    }
}
