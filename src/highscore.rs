use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const APP_DIR_NAME: &str = "hazard-snake";
const SCORE_FILE_NAME: &str = "highscores.json";

/// Entries kept in the table.
pub const MAX_HIGH_SCORES: usize = 10;

/// Longest player name accepted on the game over screen.
pub const MAX_NAME_LEN: usize = 12;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
}

/// Top scores, sorted by descending score.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
}

impl HighScores {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `score` would make it onto the table.
    #[must_use]
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        self.entries.len() < MAX_HIGH_SCORES
            || self.entries.last().is_some_and(|last| score > last.score)
    }

    /// Inserts the score after any equal ones and trims to [`MAX_HIGH_SCORES`].
    /// Returns the 1-based rank, or `None` when it did not qualify.
    pub fn add_score(&mut self, name: &str, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let index = self
            .entries
            .iter()
            .position(|entry| score > entry.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            index,
            HighScoreEntry {
                name: clean_name(name),
                score,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(index + 1)
    }

    #[must_use]
    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    #[must_use]
    pub fn best(&self) -> u32 {
        self.entries.first().map_or(0, |entry| entry.score)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads the table from the platform data directory.
    ///
    /// A missing file is a first run and yields an empty table; an unreadable
    /// or malformed file is an error so the caller can warn before raw mode.
    pub fn load() -> io::Result<Self> {
        Self::load_from_path(&scores_path())
    }

    /// Saves to the platform data directory, creating parent directories.
    pub fn save(&self) -> io::Result<()> {
        self.save_to_path(&scores_path())
    }

    pub fn load_from_path(path: &Path) -> io::Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e),
        };

        let mut scores: Self = serde_json::from_str(&raw)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        // Files edited by hand may be unsorted or too long.
        scores
            .entries
            .sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::debug!("loaded {} high scores from {}", scores.entries.len(), path.display());
        Ok(scores)
    }

    pub fn save_to_path(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;

        fs::write(path, json)
    }
}

/// Returns the platform-correct high score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

fn clean_name(name: &str) -> String {
    let trimmed: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    if trimmed.is_empty() {
        "Anonymous".to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{HighScores, MAX_HIGH_SCORES};

    #[test]
    fn entries_stay_sorted_and_ties_go_after_existing() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score("ann", 5), Some(1));
        assert_eq!(scores.add_score("bob", 9), Some(1));
        assert_eq!(scores.add_score("cat", 5), Some(3));

        let names: Vec<&str> = scores.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["bob", "ann", "cat"]);
        assert_eq!(scores.best(), 9);
    }

    #[test]
    fn table_keeps_only_top_ten() {
        let mut scores = HighScores::new();
        for score in 1..=MAX_HIGH_SCORES as u32 {
            scores.add_score("p", score);
        }

        assert!(!scores.qualifies(1));
        assert_eq!(scores.add_score("late", 1), None);
        assert_eq!(scores.add_score("top", 50), Some(1));
        assert_eq!(scores.entries().len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries().last().map(|e| e.score), Some(2));
    }

    #[test]
    fn zero_never_qualifies_and_blank_names_are_filled() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score("zero", 0), None);

        scores.add_score("   ", 3);
        assert_eq!(scores.entries()[0].name, "Anonymous");
    }

    #[test]
    fn table_survives_save_and_load() {
        let path = unique_test_path("round_trip");
        let mut scores = HighScores::new();
        scores.add_score("ann", 7);
        scores.add_score("bob", 3);

        scores.save_to_path(&path).expect("save should succeed");
        let loaded = HighScores::load_from_path(&path).expect("load should succeed");

        assert_eq!(loaded, scores);
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_file_is_an_empty_table() {
        let path = unique_test_path("missing");
        let loaded = HighScores::load_from_path(&path).expect("missing file should be Ok");
        assert!(loaded.is_empty());
    }

    #[test]
    fn malformed_file_returns_error() {
        let path = unique_test_path("malformed");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "not-json").expect("test file write should succeed");

        assert!(HighScores::load_from_path(&path).is_err());
        cleanup_test_path(&path);
    }

    #[test]
    fn unsorted_file_is_normalized_on_load() {
        let path = unique_test_path("unsorted");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(
            &path,
            r#"[{"name":"low","score":1},{"name":"high","score":8}]"#,
        )
        .expect("test file write should succeed");

        let loaded = HighScores::load_from_path(&path).expect("load should succeed");

        assert_eq!(loaded.entries()[0].name, "high");
        cleanup_test_path(&path);
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("hazard-snake-score-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
