//! Player progress: saved games, level sessions, collectables, key usage.
//!
//! This is plain in-memory data. Callers decide where the stored JSON comes
//! from and where it goes; [`UserData::from_json`] and [`UserData::to_json`]
//! only convert.

mod session;

use session::first_max_by_key;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

/// A keyboard key code.
pub type KeyCode = u32;

/// How often each key was pressed.
pub type KeyCounts = BTreeMap<KeyCode, u32>;

/// Fields every stored saved game must carry.
const SAVED_GAME_KEYS: [&str; 5] = ["levels", "createdAt", "updatedAt", "keyCounts", "disabledKeys"];

pub(crate) fn now() -> Millis {
    Utc::now().timestamp_millis()
}

/// Everything the game knows about the player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserData {
    pub saved_games: Vec<SavedGame>,
    pub session: Session,
    pub options: Options,
}

/// The part of [`UserData`] that is persisted between runs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)] // Gameplay API
struct StoredUserData<'a> {
    saved_games: &'a [SavedGame],
    options: &'a Options,
}

/// The game being played right now.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// The save this session writes into, if a game was started or resumed.
    pub saved_game: Option<SavedGame>,
    /// Levels played this session, oldest first.
    pub levels: Vec<LevelSession>,
    /// Index into `levels` of the level being played.
    #[allow(dead_code)] // Gameplay API
    pub level: Option<usize>,
    pub key_counts: Option<KeyCounts>,
    pub disabled_keys: Option<Vec<KeyCode>>,
}

impl Session {
    /// The level being played, if any.
    #[allow(dead_code)] // Gameplay API
    pub fn active_level(&self) -> Option<&LevelSession> {
        self.level.and_then(|index| self.levels.get(index))
    }

    #[allow(dead_code)] // Gameplay API
    pub fn active_level_mut(&mut self) -> Option<&mut LevelSession> {
        self.level.and_then(|index| self.levels.get_mut(index))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    pub levels: Vec<LevelSession>,
    pub key_counts: KeyCounts,
    pub disabled_keys: Vec<KeyCode>,
    pub created_at: Millis,
    pub updated_at: Millis,
}

impl SavedGame {
    /// A blank save created at `at`.
    #[allow(dead_code)] // Gameplay API
    pub fn new(at: Millis) -> Self {
        Self {
            created_at: at,
            updated_at: at,
            ..Default::default()
        }
    }

    /// Scene name of the most recently started level.
    pub fn last_played_level_name(&self) -> Option<&str> {
        first_max_by_key(&self.levels, |level| level.started_at).map(|level| level.scene_name.as_str())
    }
}

/// One play-through of a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSession {
    pub scene_name: String,
    pub started_at: Millis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Millis>,
    #[serde(default)]
    pub collectables: Vec<Collectable>,
}

impl LevelSession {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collectable {
    pub id: String,
    pub collected_at: Millis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    On,
    Off,
}

/// Player settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    pub fullscreen: Toggle,
    pub bind_hints: Toggle,
    pub music_volume: f64,
    pub effects_volume: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fullscreen: Toggle::On,
            bind_hints: Toggle::Off,
            music_volume: 75.0,
            effects_volume: 75.0,
        }
    }
}

impl UserData {
    /// No saved games, a blank session, default options.
    pub fn create_default() -> Self {
        Self::default()
    }

    /// Load stored user data.
    ///
    /// Never fails: malformed JSON or an unrecognized shape is logged and
    /// yields the defaults. The session always starts blank.
    pub fn from_json(json: &str) -> Self {
        let mut user_data = Self::create_default();

        let parsed: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                warn!("User data is not valid JSON ({}), starting fresh", e);
                return user_data;
            }
        };

        if !is_stored_data(&parsed) {
            warn!("User data has no usable saved games, starting fresh");
            return user_data;
        }

        match serde_json::from_value(parsed["savedGames"].clone()) {
            Ok(saved_games) => user_data.saved_games = saved_games,
            Err(e) => {
                warn!("Saved games could not be read ({}), starting fresh", e);
                return user_data;
            }
        }

        if let Some(stored) = parsed.get("options").and_then(Value::as_object) {
            user_data.options = merge_options(&user_data.options, stored);
        }

        user_data
    }

    /// Serialize the persisted part: saved games and options.
    #[allow(dead_code)] // Gameplay API
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&StoredUserData {
            saved_games: &self.saved_games,
            options: &self.options,
        })
    }
}

/// Whether `value` looks like stored user data: an object with a
/// `savedGames` array whose entries all carry the saved-game fields.
pub fn is_stored_data(value: &Value) -> bool {
    let Some(saved_games) = value.get("savedGames").and_then(Value::as_array) else {
        return false;
    };
    saved_games.iter().all(|saved_game| {
        saved_game
            .as_object()
            .is_some_and(|fields| SAVED_GAME_KEYS.iter().all(|key| fields.contains_key(*key)))
    })
}

/// Lay stored option fields over `defaults`, one at a time. A field that
/// does not parse keeps its default.
fn merge_options(defaults: &Options, stored: &Map<String, Value>) -> Options {
    let mut options = defaults.clone();
    merge_option(stored, "fullscreen", &mut options.fullscreen);
    merge_option(stored, "bindHints", &mut options.bind_hints);
    merge_option(stored, "musicVolume", &mut options.music_volume);
    merge_option(stored, "effectsVolume", &mut options.effects_volume);
    options
}

fn merge_option<T: DeserializeOwned>(stored: &Map<String, Value>, key: &str, slot: &mut T) {
    let Some(value) = stored.get(key) else {
        return;
    };
    match T::deserialize(value) {
        Ok(parsed) => *slot = parsed,
        Err(e) => warn!("Ignoring stored option {} ({})", key, e),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::saved_games;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_default() {
        let user_data = UserData::create_default();
        assert!(user_data.saved_games.is_empty());
        assert_eq!(user_data.session, Session::default());
        assert!(user_data.session.saved_game.is_none());
        assert!(user_data.session.active_level().is_none());
        assert_eq!(user_data.options.fullscreen, Toggle::On);
        assert_eq!(user_data.options.bind_hints, Toggle::Off);
        assert_eq!(user_data.options.music_volume, 75.0);
    }

    #[test]
    fn test_from_json_handles_invalid_json() {
        let user_data = UserData::from_json("horx;ma-dorks");
        assert!(user_data.saved_games.is_empty());
        assert!(user_data.session.levels.is_empty());
    }

    #[test]
    fn test_from_json_handles_wrong_structure() {
        for json in ["0", "null", "[]", r#"{"savedGames": 3}"#, r#"{"savedGames": [{"levels": []}]}"#] {
            let user_data = UserData::from_json(json);
            assert!(user_data.saved_games.is_empty(), "{}", json);
        }
    }

    #[test]
    fn test_from_json_loads_saved_games() {
        let stored = json!({ "savedGames": saved_games() });
        let user_data = UserData::from_json(&stored.to_string());

        assert_eq!(user_data.saved_games, saved_games());
        assert!(user_data.session.levels.is_empty());
        assert_eq!(user_data.options, Options::default());
    }

    #[test]
    fn test_from_json_merges_options() {
        let stored = json!({
            "savedGames": [],
            "options": { "musicVolume": 10, "bindHints": "on" }
        });
        let user_data = UserData::from_json(&stored.to_string());

        assert_eq!(user_data.options.music_volume, 10.0);
        assert_eq!(user_data.options.bind_hints, Toggle::On);
        assert_eq!(user_data.options.fullscreen, Toggle::On);
        assert_eq!(user_data.options.effects_volume, 75.0);
    }

    #[test]
    fn test_from_json_ignores_bad_options() {
        let stored = json!({ "savedGames": [], "options": { "musicVolume": "loud" } });
        let user_data = UserData::from_json(&stored.to_string());
        assert_eq!(user_data.options, Options::default());
    }

    #[test]
    fn test_from_json_keeps_valid_options_next_to_bad_ones() {
        let stored = json!({
            "savedGames": [],
            "options": { "musicVolume": 10, "effectsVolume": 50.5, "fullscreen": "sideways" }
        });
        let user_data = UserData::from_json(&stored.to_string());

        assert_eq!(user_data.options.music_volume, 10.0);
        assert_eq!(user_data.options.effects_volume, 50.5);
        assert_eq!(user_data.options.fullscreen, Toggle::On);
        assert_eq!(user_data.options.bind_hints, Toggle::Off);
    }

    #[test]
    fn test_to_json_round_trip() {
        let mut user_data = UserData::create_default();
        user_data.saved_games = saved_games();
        user_data.options.effects_volume = 30.5;

        let json = user_data.to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert!(is_stored_data(&value));
        assert_eq!(value["savedGames"][1]["keyCounts"]["420"], 200);
        assert!(value.get("session").is_none());

        let loaded = UserData::from_json(&json);
        assert_eq!(loaded.saved_games, user_data.saved_games);
        assert_eq!(loaded.options.effects_volume, 30.5);
    }

    #[test]
    fn test_last_played_level_name() {
        let mut save = saved_games()[0].clone();
        save.levels.clear();
        assert_eq!(save.last_played_level_name(), None);

        let mut levels = fixtures::levels();
        levels.push(LevelSession {
            scene_name: "L_last_played".to_string(),
            started_at: 10_000,
            ..Default::default()
        });
        levels.extend(fixtures::levels());
        save.levels = levels;
        assert_eq!(save.last_played_level_name(), Some("L_last_played"));
    }
}
