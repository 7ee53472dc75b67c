//! Order-preserving write-back of an edited project.
//!
//! The typed [`Project`] does not remember key order or how numbers were
//! spelled in the source file. [`overlay`] folds an edited value back onto
//! the document it was parsed from, so untouched parts of the file come out
//! byte-for-byte the same and diffs stay small.

use super::Project;
use crate::error::{RefactorError, Result};
use serde_json::{Map, Number, Value};
use std::path::Path;

/// A parsed project file together with its raw JSON tree.
#[derive(Debug, Clone)]
pub struct Document {
    raw: Value,
}

impl Document {
    /// Read and parse a project file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RefactorError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = serde_json::from_str(&content).map_err(|source| RefactorError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { raw })
    }

    #[cfg(test)]
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// Typed view of the document.
    pub fn project(&self) -> Result<Project> {
        serde_json::from_value(self.raw.clone()).map_err(RefactorError::Serialize)
    }

    /// Return a new document with `project` folded onto this one.
    pub fn with_project(&self, project: &Project) -> Result<Self> {
        let edited = serde_json::to_value(project).map_err(RefactorError::Serialize)?;
        let mut raw = self.raw.clone();
        overlay(&mut raw, edited);
        Ok(Self { raw })
    }

    /// Pretty JSON with two-space indentation and a trailing newline.
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&self.raw).map_err(RefactorError::Serialize)?;
        out.push('\n');
        Ok(out)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

/// Fold `source` onto `target`.
///
/// - Keys already in `target` keep their position.
/// - Keys only in `source` are appended, unless the value is empty or zero:
///   a missing key and a default value mean the same thing to the engine.
/// - Keys only in `target` are removed.
/// - Numbers that are numerically equal keep `target`'s spelling.
/// - Array elements are folded onto the original they came from (see
///   [`overlay_array`]). Elements with no original are written in full.
pub fn overlay(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => overlay_map(target, source),
        (Value::Array(target), Value::Array(source)) => overlay_array(target, source),
        (Value::Number(old), Value::Number(new)) => {
            if old.as_f64() != new.as_f64() {
                *old = normalize_number(new);
            }
        }
        (target, source) => *target = normalize(source),
    }
}

fn overlay_map(target: &mut Map<String, Value>, mut source: Map<String, Value>) {
    target.retain(|key, _| source.contains_key(key));
    for (key, slot) in target.iter_mut() {
        if let Some(value) = source.remove(key) {
            overlay(slot, value);
        }
    }
    for (key, value) in source {
        if !is_empty_default(&value) {
            target.insert(key, normalize(value));
        }
    }
}

/// Rebuild `target` in `source` order, pairing each element with its
/// original so removals and insertions never shift fields between
/// neighbours. Originals left unpaired are dropped.
fn overlay_array(target: &mut Vec<Value>, source: Vec<Value>) {
    let mut originals: Vec<Option<Value>> = target.drain(..).map(Some).collect();
    for (position, value) in source.into_iter().enumerate() {
        match original_of(&originals, position, &value) {
            Some(index) => {
                let mut slot = originals[index].take().unwrap_or(Value::Null);
                overlay(&mut slot, value);
                target.push(slot);
            }
            None => target.push(normalize(value)),
        }
    }
}

/// Index of the unpaired original `value` was most likely parsed from.
///
/// An unchanged element at the same position is taken as is. Otherwise
/// candidates must share the identity of `value`: `persistentUuid`, else
/// `name`, else neither. Among candidates the one with the most equal
/// fields wins, the earliest on ties.
fn original_of(originals: &[Option<Value>], position: usize, value: &Value) -> Option<usize> {
    if let Some(Some(original)) = originals.get(position) {
        if same(original, value) {
            return Some(position);
        }
    }

    let wanted = identity(value);
    let mut best: Option<(usize, usize)> = None;
    for (index, original) in originals.iter().enumerate() {
        let Some(original) = original else {
            continue;
        };
        if identity(original) != wanted {
            continue;
        }
        let score = shared_fields(original, value);
        if best.map_or(true, |(_, max)| score > max) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

fn identity(value: &Value) -> Option<(&'static str, &str)> {
    let fields = value.as_object()?;
    ["persistentUuid", "name"]
        .into_iter()
        .find_map(|key| fields.get(key)?.as_str().map(|id| (key, id)))
}

fn shared_fields(original: &Value, value: &Value) -> usize {
    match (original, value) {
        (Value::Object(original), Value::Object(value)) => original
            .iter()
            .filter(|&(key, field)| value.get(key.as_str()).is_some_and(|other| same(field, other)))
            .count(),
        (original, value) => usize::from(same(original, value)),
    }
}

/// Structural equality that compares numbers by value.
fn same(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Array(a), Value::Array(b)) => a.len() == b.len() && a.iter().zip(b).all(|(a, b)| same(a, b)),
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len() && a.iter().all(|(key, field)| b.get(key.as_str()).is_some_and(|other| same(field, other)))
        }
        _ => a == b,
    }
}

fn is_empty_default(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Write integral floats as integers, recursively.
fn normalize(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(normalize_number(n)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, normalize(v))).collect()),
        other => other,
    }
}

fn normalize_number(n: Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9.0e15 => Number::from(f as i64),
        _ => n,
    }
}
