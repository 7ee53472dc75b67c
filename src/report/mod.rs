//! Read-only reports.
//!
//! Reports never touch the project file. They are built from a loaded
//! project or user-data file and rendered by [`generator`].

pub mod generator;

use crate::operations::text_timing::TextTiming;
use crate::user_data::{KeyCode, Millis, Options, SavedGame, UserData};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

/// Where a report came from and when it was made.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub source: String,
    pub generated_at: DateTime<Utc>,
}

impl ReportMetadata {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            generated_at: Utc::now(),
        }
    }
}

/// Reading times of every selected text instance.
#[derive(Debug, Clone, Serialize)]
pub struct TextTimingReport {
    pub metadata: ReportMetadata,
    pub total: usize,
    pub stale: usize,
    pub entries: Vec<TextTiming>,
}

impl TextTimingReport {
    pub fn new(metadata: ReportMetadata, entries: Vec<TextTiming>) -> Self {
        Self {
            metadata,
            total: entries.len(),
            stale: entries.iter().filter(|e| e.is_stale()).count(),
            entries,
        }
    }
}

/// Summary of one saved game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveSummary {
    pub created_at: Millis,
    pub updated_at: Millis,
    pub levels_played: usize,
    pub levels_completed: usize,
    pub last_played_level: Option<String>,
    pub collectables: Vec<String>,
    pub top_keys: Vec<KeyCode>,
    pub disabled_keys: Vec<KeyCode>,
}

/// Every saved game in a user-data file, plus the player's options.
#[derive(Debug, Clone, Serialize)]
pub struct SavesReport {
    pub metadata: ReportMetadata,
    pub options: Options,
    pub saves: Vec<SaveSummary>,
}

impl SavesReport {
    /// Summarize each save as it looks once resumed.
    pub fn new(metadata: ReportMetadata, user_data: &UserData) -> Self {
        let any = Regex::new("").expect("empty regex is valid");
        let saves = user_data
            .saved_games
            .iter()
            .map(|saved_game| summarize(user_data, saved_game, &any))
            .collect();

        Self {
            metadata,
            options: user_data.options.clone(),
            saves,
        }
    }
}

fn summarize(user_data: &UserData, saved_game: &SavedGame, any: &Regex) -> SaveSummary {
    let mut resumed = UserData {
        saved_games: user_data.saved_games.clone(),
        ..Default::default()
    };
    resumed.resume_game(Some(saved_game.created_at));

    let session = &resumed.session;
    SaveSummary {
        created_at: saved_game.created_at,
        updated_at: saved_game.updated_at,
        levels_played: session.levels.len(),
        levels_completed: session.levels.iter().filter(|l| l.is_completed()).count(),
        last_played_level: saved_game.last_played_level_name().map(str::to_string),
        collectables: resumed
            .find_collectables(any)
            .into_iter()
            .map(|c| c.id.clone())
            .collect(),
        top_keys: resumed.top_keys(),
        disabled_keys: session.disabled_keys.clone().unwrap_or_default(),
    }
}
