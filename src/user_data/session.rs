//! Gameplay operations on [`UserData`].

use super::{now, Collectable, KeyCode, LevelSession, Millis, SavedGame, Session, UserData};
use regex::Regex;
use tracing::debug;

/// Scene names starting with this are playable levels.
#[allow(dead_code)] // Gameplay API
pub const LEVEL_PREFIX: &str = "L_";

/// Whether a scene is a playable level.
#[allow(dead_code)] // Gameplay API
pub fn is_level(scene_name: &str) -> bool {
    scene_name.starts_with(LEVEL_PREFIX)
}

/// The entry with the greatest key. The first one wins ties.
pub fn first_max_by_key<T, K, F>(items: &[T], mut key: F) -> Option<&T>
where
    K: PartialOrd,
    F: FnMut(&T) -> K,
{
    let mut best: Option<(&T, K)> = None;
    for item in items {
        let candidate = key(item);
        if best.as_ref().map_or(true, |(_, max)| *max < candidate) {
            best = Some((item, candidate));
        }
    }
    best.map(|(item, _)| item)
}

impl UserData {
    /// Save the running game, then start a blank one in a fresh session.
    ///
    /// The blank game joins `saved_games` on its first [`save_game`](Self::save_game).
    #[allow(dead_code)] // Gameplay API
    pub fn new_game(&mut self) -> &SavedGame {
        self.save_game();
        self.start_session(SavedGame::new(now()))
    }

    /// Save the running game, then continue the save created at `created_at`,
    /// or the most recently updated save when `None`.
    pub fn resume_game(&mut self, created_at: Option<Millis>) -> Option<&SavedGame> {
        self.save_game();

        let previous = match created_at {
            Some(created_at) => self.saved_games.iter().find(|s| s.created_at == created_at),
            None => first_max_by_key(&self.saved_games, |s| s.updated_at),
        }?
        .clone();

        debug!("Resuming game created at {}", previous.created_at);
        Some(self.start_session(previous))
    }

    fn start_session(&mut self, saved_game: SavedGame) -> &SavedGame {
        self.session = Session {
            levels: saved_game.levels.clone(),
            level: None,
            key_counts: Some(saved_game.key_counts.clone()),
            disabled_keys: Some(saved_game.disabled_keys.clone()),
            saved_game: None,
        };
        self.session.saved_game.insert(saved_game)
    }

    /// Write the session's progress into its saved game and store it,
    /// replacing the save with the same creation time.
    pub fn save_game(&mut self) -> Option<&SavedGame> {
        let session = &mut self.session;
        let saved_game = session.saved_game.as_mut()?;

        saved_game.updated_at = now();
        saved_game.levels = session.levels.clone();
        saved_game.key_counts = session.key_counts.clone().unwrap_or_default();
        saved_game.disabled_keys = session.disabled_keys.clone().unwrap_or_default();

        let snapshot = saved_game.clone();
        let index = match self.saved_games.iter().position(|s| s.created_at == snapshot.created_at) {
            Some(index) => {
                self.saved_games[index] = snapshot;
                index
            }
            None => {
                self.saved_games.push(snapshot);
                self.saved_games.len() - 1
            }
        };
        self.saved_games.get(index)
    }

    /// Start playing `scene_name`.
    #[allow(dead_code)] // Gameplay API
    pub fn push_level(&mut self, scene_name: &str) -> &LevelSession {
        let session = &mut self.session;
        session.levels.push(LevelSession {
            scene_name: scene_name.to_string(),
            started_at: now(),
            completed_at: None,
            collectables: Vec::new(),
        });
        let index = session.levels.len() - 1;
        session.level = Some(index);
        &session.levels[index]
    }

    /// Scene name `depth` levels back from the latest, or `default`.
    #[allow(dead_code)] // Gameplay API
    pub fn peek_level_name<'a>(&'a self, default: &'a str, depth: usize) -> &'a str {
        let levels = &self.session.levels;
        levels
            .len()
            .checked_sub(depth + 1)
            .map_or(default, |index| levels[index].scene_name.as_str())
    }

    /// Finish the active level.
    #[allow(dead_code)] // Gameplay API
    pub fn complete_level(&mut self) -> Option<&LevelSession> {
        let session = &mut self.session;
        let index = session.level.take()?;
        let level = session.levels.get_mut(index)?;
        level.completed_at = Some(now());
        Some(&*level)
    }

    /// Pick up a collectable in the active level.
    ///
    /// A collectable already held by a completed level is returned as is.
    #[allow(dead_code)] // Gameplay API
    pub fn collect(&mut self, id: &str) -> Option<Collectable> {
        self.session.active_level()?;

        if let Some(existing) = self.find_collectable(id) {
            return Some(existing.clone());
        }

        let collectable = Collectable {
            id: id.to_string(),
            collected_at: now(),
        };
        self.session.active_level_mut()?.collectables.push(collectable.clone());
        Some(collectable)
    }

    /// First collectable with this id among completed levels.
    #[allow(dead_code)] // Gameplay API
    pub fn find_collectable(&self, id: &str) -> Option<&Collectable> {
        self.completed_collectables().find(|c| c.id == id)
    }

    /// Every collectable among completed levels whose id matches `pattern`.
    pub fn find_collectables(&self, pattern: &Regex) -> Vec<&Collectable> {
        self.completed_collectables().filter(|c| pattern.is_match(&c.id)).collect()
    }

    fn completed_collectables(&self) -> impl Iterator<Item = &Collectable> {
        self.session
            .levels
            .iter()
            .filter(|level| level.is_completed())
            .flat_map(|level| level.collectables.iter())
    }

    /// Count a key press and return the new count.
    #[allow(dead_code)] // Gameplay API
    pub fn increment_key_count(&mut self, key: KeyCode) -> u32 {
        let count = self
            .session
            .key_counts
            .get_or_insert_with(Default::default)
            .entry(key)
            .or_insert(0);
        *count += 1;
        *count
    }

    /// Keys by descending press count.
    pub fn top_keys(&self) -> Vec<KeyCode> {
        let Some(key_counts) = &self.session.key_counts else {
            return Vec::new();
        };
        let mut entries: Vec<(KeyCode, u32)> = key_counts.iter().map(|(&k, &c)| (k, c)).collect();
        entries.sort_by(|(k1, c1), (k2, c2)| c2.cmp(c1).then(k1.cmp(k2)));
        entries.into_iter().map(|(key, _)| key).collect()
    }

    #[allow(dead_code)] // Gameplay API
    pub fn is_disabled(&self, key: KeyCode) -> bool {
        self.session
            .disabled_keys
            .as_ref()
            .is_some_and(|keys| keys.contains(&key))
    }

    /// Disable a key. Disabling a new key resets the key counts.
    #[allow(dead_code)] // Gameplay API
    pub fn disable(&mut self, key: KeyCode) -> &[KeyCode] {
        let session = &mut self.session;
        let disabled = session.disabled_keys.get_or_insert_with(Vec::new);
        if !disabled.contains(&key) {
            disabled.push(key);
            session.key_counts = Some(Default::default());
        }
        disabled
    }

    #[allow(dead_code)] // Gameplay API
    pub fn disabled_count(&self) -> usize {
        self.session.disabled_keys.as_ref().map_or(0, Vec::len)
    }
}
