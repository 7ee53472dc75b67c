//! Data model for GDevelop project files.
//!
//! Only the parts of the export the refactor commands touch are typed.
//! Everything else rides along in the flattened `rest` maps so a load and
//! save cycle never drops data.

pub mod document;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Object type tag GDevelop uses for text objects.
pub const TEXT_OBJECT_TYPE: &str = "TextObject::Text";

/// Root of an exported project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub layouts: Vec<Layout>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// A scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub instances: Vec<Instance>,

    #[serde(default)]
    pub layers: Vec<Layer>,

    #[serde(default)]
    pub objects: Vec<Object>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Layout {
    /// Whether any instance in this layout is named `name`.
    pub fn has_instance(&self, name: &str) -> bool {
        self.instances.iter().any(|i| i.name == name)
    }

    /// Whether this layout has a layer named `name`.
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l.name == name)
    }

    /// Look up a layout object by name.
    pub fn object(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name == name)
    }
}

/// A placed object inside a layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub custom_size: bool,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub layer: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z_order: i64,
    #[serde(default)]
    pub number_properties: Vec<NumberProperty>,
    #[serde(default)]
    pub string_properties: Vec<StringProperty>,
    #[serde(default)]
    pub initial_variables: Vec<Variable>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Instance {
    /// A fresh instance with a custom size, the way the editor creates one.
    pub fn new(name: &str, rect: Rect, at: Coord, layer: &str) -> Self {
        Self {
            angle: 0.0,
            custom_size: true,
            height: rect.height,
            layer: layer.to_string(),
            locked: false,
            name: name.to_string(),
            width: rect.width,
            x: at.x,
            y: at.y,
            z_order: 1,
            ..Default::default()
        }
    }

    /// Resize and move the instance in one go.
    pub fn place(&mut self, rect: Rect, at: Coord) {
        self.width = rect.width;
        self.height = rect.height;
        self.x = at.x;
        self.y = at.y;
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.initial_variables.iter().find(|v| v.name == name)
    }

    /// Set an initial variable, updating it in place if it already exists.
    pub fn set_variable(&mut self, name: &str, value: Value) {
        match self.initial_variables.iter_mut().find(|v| v.name == name) {
            Some(existing) => existing.value = value,
            None => self.initial_variables.push(Variable {
                name: name.to_string(),
                value,
                rest: Map::new(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberProperty {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringProperty {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// An instance's initial variable.
///
/// Older exports store every value as a string, newer ones carry a `type`
/// next to a typed value, so the value is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Value,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// A rendering layer of a layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub visibility: bool,
    #[serde(default)]
    pub cameras: Vec<Value>,
    #[serde(default)]
    pub effects: Vec<Value>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// An object definition. Instances refer to objects by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Object {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    /// Displayed text, only present on text objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Object {
    pub fn is_text(&self) -> bool {
        self.kind == TEXT_OBJECT_TYPE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_instance_keeps_unknown_fields() {
        let raw = json!({
            "name": "Player",
            "x": 10,
            "y": 20,
            "persistentUuid": "abc-123"
        });

        let instance: Instance = serde_json::from_value(raw).unwrap();
        assert_eq!(instance.name, "Player");
        assert_eq!(instance.x, 10.0);
        assert_eq!(instance.rest["persistentUuid"], "abc-123");

        let back = serde_json::to_value(&instance).unwrap();
        assert_eq!(back["persistentUuid"], "abc-123");
        assert_eq!(back["zOrder"], 0);
    }

    #[test]
    fn test_text_object_detection() {
        let text: Object = serde_json::from_value(json!({
            "name": "Hint",
            "type": "TextObject::Text",
            "string": "Hello"
        }))
        .unwrap();
        let sprite: Object = serde_json::from_value(json!({
            "name": "Player",
            "type": "Sprite",
            "animations": []
        }))
        .unwrap();

        assert!(text.is_text());
        assert_eq!(text.string.as_deref(), Some("Hello"));
        assert!(!sprite.is_text());
        assert!(sprite.string.is_none());
        assert!(!serde_json::to_value(&sprite).unwrap().as_object().unwrap().contains_key("string"));
    }

    #[test]
    fn test_set_variable_updates_in_place() {
        let mut instance = Instance::new("Hint", Rect::new(10.0, 10.0), Coord::new(0.0, 0.0), "");
        instance.set_variable("ReadTime", json!("1500"));
        instance.set_variable("ReadTime", json!("2000"));

        assert_eq!(instance.initial_variables.len(), 1);
        assert_eq!(instance.variable("ReadTime").unwrap().value, json!("2000"));
    }

    #[test]
    fn test_new_instance_defaults() {
        let instance = Instance::new(
            "PauseReminder",
            Rect::new(24.0, 32.0),
            Coord::new(34.0, 19.0),
            "UI",
        );
        assert!(instance.custom_size);
        assert!(!instance.locked);
        assert_eq!(instance.z_order, 1);
        assert_eq!(instance.layer, "UI");
        assert!(instance.initial_variables.is_empty());
    }
}
