//! Reading times for on-screen text.
//!
//! A text instance keeps its reading time, in milliseconds, in an initial
//! variable so scene events can hold the text on screen long enough.

use crate::config::TextTimingConfig;
use crate::project::{Instance, Project};
use crate::refactor::{transform_instances, Edit, Selector};
use crate::text::{dedent, visible_chars};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// How long a text takes to read.
#[derive(Debug, Clone, Copy)]
pub struct ReadingTime<'a> {
    config: &'a TextTimingConfig,
}

impl<'a> ReadingTime<'a> {
    pub fn new(config: &'a TextTimingConfig) -> Self {
        Self { config }
    }

    /// Reading time in milliseconds, clamped to the configured bounds.
    pub fn for_text(&self, text: &str) -> u64 {
        let chars = visible_chars(&dedent(text)) as u64;
        let raw = self.config.base_ms + self.config.per_char_ms * chars;
        let (low, high) = if self.config.min_ms <= self.config.max_ms {
            (self.config.min_ms, self.config.max_ms)
        } else {
            (self.config.max_ms, self.config.min_ms)
        };
        raw.clamp(low, high)
    }

    /// The reading time currently stored on an instance, if any.
    pub fn assigned(&self, instance: &Instance) -> Option<u64> {
        let variable = instance.variable(&self.config.variable)?;
        match &variable.value {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.round() as u64)),
            _ => None,
        }
    }
}

/// One text instance in the timing report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextTiming {
    pub layout: String,
    pub instance: String,
    pub text: String,
    pub chars: usize,
    pub assigned_ms: Option<u64>,
    pub recommended_ms: u64,
}

impl TextTiming {
    /// Whether the stored time differs from the recommended one.
    pub fn is_stale(&self) -> bool {
        self.assigned_ms != Some(self.recommended_ms)
    }
}

/// Store the recommended reading time on every selected text instance.
///
/// Returns the number of instances whose stored time changed.
pub fn assign_text_timing(project: &mut Project, selector: &Selector, config: &TextTimingConfig) -> usize {
    let timing = ReadingTime::new(config);
    let mut changed = 0;

    transform_instances(project, selector, |instance, layout| {
        let Some(object) = layout.object(&instance.name).filter(|o| o.is_text()) else {
            return Edit::Keep;
        };
        let Some(text) = object.string.as_deref() else {
            warn!("Text object {} in {} has no string", object.name, layout.name);
            return Edit::Keep;
        };

        let recommended = timing.for_text(text);
        if timing.assigned(instance) != Some(recommended) {
            debug!(
                "{} in {}: {} = {}ms",
                instance.name, layout.name, config.variable, recommended
            );
            instance.set_variable(&config.variable, Value::String(recommended.to_string()));
            changed += 1;
        }
        Edit::Keep
    });

    changed
}

/// Collect the timing of every selected text instance without editing.
pub fn report_text_timing(project: &Project, selector: &Selector, config: &TextTimingConfig) -> Vec<TextTiming> {
    let timing = ReadingTime::new(config);

    project
        .layouts
        .iter()
        .filter(|layout| selector.matches_layout(&layout.name))
        .flat_map(move |layout| {
            layout
                .instances
                .iter()
                .filter(move |instance| selector.matches_name(&instance.name))
                .filter_map(move |instance| {
                    let object = layout.object(&instance.name).filter(|o| o.is_text())?;
                    let raw = object.string.as_deref().unwrap_or_default();
                    let text = dedent(raw);
                    Some(TextTiming {
                        layout: layout.name.clone(),
                        instance: instance.name.clone(),
                        chars: visible_chars(&text),
                        assigned_ms: timing.assigned(instance),
                        recommended_ms: timing.for_text(raw),
                        text,
                    })
                })
        })
        .collect()
}
