//! Name filters for layouts, instances, and objects.

use crate::error::{RefactorError, Result};
use regex::Regex;

/// Picks which layouts and which named entries inside them a transform sees.
///
/// A missing pattern matches everything.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    name: Option<Regex>,
    layout: Option<Regex>,
}

impl Selector {
    /// Match every layout and every name.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a selector from optional pattern strings.
    pub fn new(name: Option<&str>, layout: Option<&str>) -> Result<Self> {
        Ok(Self {
            name: name.map(compile).transpose()?,
            layout: layout.map(compile).transpose()?,
        })
    }

    /// Restrict to names equal to `name`.
    pub fn exact_name(name: &str) -> Self {
        Self {
            name: Some(literal(&format!("^{}$", regex::escape(name)))),
            layout: None,
        }
    }

    /// Restrict to names equal to any of `names`.
    pub fn any_name(names: &[&str]) -> Self {
        let alternatives: Vec<String> = names.iter().map(|n| regex::escape(n)).collect();
        Self {
            name: Some(literal(&format!("^(?:{})$", alternatives.join("|")))),
            layout: None,
        }
    }

    /// Restrict to layouts whose names start with `prefix`.
    pub fn layout_prefix(mut self, prefix: &str) -> Self {
        self.layout = Some(literal(&format!("^{}", regex::escape(prefix))));
        self
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.as_ref().map_or(true, |re| re.is_match(name))
    }

    pub fn matches_layout(&self, layout_name: &str) -> bool {
        self.layout.as_ref().map_or(true, |re| re.is_match(layout_name))
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| RefactorError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn literal(pattern: &str) -> Regex {
    Regex::new(pattern).expect("escaped literal is a valid regex")
}
