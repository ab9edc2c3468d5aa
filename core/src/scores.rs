use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Storage key the score table lives under.
pub const HIGH_SCORES_KEY: &str = "minesweeperHighScores";

/// Entries kept per board size.
pub const MAX_SCORES_PER_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    #[serde(rename = "time")]
    pub elapsed_seconds: u32,
    /// ISO-8601 timestamp of the win.
    #[serde(rename = "date")]
    pub timestamp: String,
}

/// Best times per board size, fastest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScoreTable {
    scores: BTreeMap<BoardSize, Vec<HighScoreEntry>>,
}

impl HighScoreTable {
    /// Parses the stored text form.
    ///
    /// Each size is decoded on its own: unknown keys and unreadable lists are skipped,
    /// and text that is not a JSON object counts as an empty table.
    pub fn from_json(text: &str) -> Self {
        let raw = match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(text) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("discarding unreadable high scores: {}", err);
                return Self::default();
            }
        };

        let mut table = Self::default();
        for (key, value) in raw {
            let Some(size) = BoardSize::from_key(&key) else {
                log::warn!("skipping high scores for unknown board size {:?}", key);
                continue;
            };
            match serde_json::from_value::<Vec<HighScoreEntry>>(value) {
                Ok(entries) => {
                    table.scores.insert(size, entries);
                }
                Err(err) => log::warn!("skipping unreadable {} high scores: {}", key, err),
            }
        }
        table.normalize();
        table
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.values().all(Vec::is_empty)
    }

    pub fn entries(&self, size: BoardSize) -> &[HighScoreEntry] {
        self.scores
            .get(&size)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Non-empty score lists, smallest board first.
    pub fn iter(&self) -> impl Iterator<Item = (BoardSize, &[HighScoreEntry])> {
        self.scores
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(&size, entries)| (size, entries.as_slice()))
    }

    /// Adds a win, keeping the list ordered and capped. Returns the zero-based rank if the time made the list.
    ///
    /// Equal times rank after the ones already present.
    pub fn record(
        &mut self,
        size: BoardSize,
        elapsed_seconds: u32,
        timestamp: impl Into<String>,
    ) -> Option<usize> {
        let entries = self.scores.entry(size).or_default();
        let rank = entries.partition_point(|entry| entry.elapsed_seconds <= elapsed_seconds);
        if rank >= MAX_SCORES_PER_SIZE {
            return None;
        }

        entries.insert(
            rank,
            HighScoreEntry {
                elapsed_seconds,
                timestamp: timestamp.into(),
            },
        );
        entries.truncate(MAX_SCORES_PER_SIZE);
        Some(rank)
    }

    fn normalize(&mut self) {
        for entries in self.scores.values_mut() {
            entries.sort_by_key(|entry| entry.elapsed_seconds);
            entries.truncate(MAX_SCORES_PER_SIZE);
        }
    }
}

/// Text key-value store the score table is persisted in.
pub trait ScoreStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process store, for hosts without persistent storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl ScoreStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads the table from `store`; a missing or malformed value gives an empty table.
pub fn load_scores<S: ScoreStore + ?Sized>(store: &S) -> HighScoreTable {
    store
        .read(HIGH_SCORES_KEY)
        .map(|text| HighScoreTable::from_json(&text))
        .unwrap_or_default()
}

/// Records a win for `size` and writes the updated table back.
pub fn save_score<S: ScoreStore + ?Sized>(
    store: &mut S,
    size: BoardSize,
    elapsed_seconds: u32,
    timestamp: impl Into<String>,
) -> Result<Option<usize>> {
    let mut table = load_scores(store);
    let rank = table.record(size, elapsed_seconds, timestamp);
    let text = table.to_json().map_err(|err| {
        log::error!("could not serialize high scores: {}", err);
        GameError::StorageUnavailable
    })?;
    store.write(HIGH_SCORES_KEY, &text)?;
    log::debug!(
        "saved {}s on {} board, rank {:?}",
        elapsed_seconds,
        size.key(),
        rank
    );
    Ok(rank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    const DATE: &str = "2024-05-01T12:00:00.000Z";

    #[test]
    fn record_keeps_fastest_ten() {
        let mut table = HighScoreTable::default();
        for time in [50, 20, 90, 10, 70, 30, 60, 40, 80, 100, 5, 200] {
            table.record(BoardSize::Small, time, DATE);
        }

        let times: Vec<_> = table
            .entries(BoardSize::Small)
            .iter()
            .map(|entry| entry.elapsed_seconds)
            .collect();
        assert_eq!(times, [5, 10, 20, 30, 40, 50, 60, 70, 80, 90]);
        assert!(table.entries(BoardSize::Large).is_empty());
    }

    #[test]
    fn record_reports_rank() {
        let mut table = HighScoreTable::default();
        assert_eq!(table.record(BoardSize::Medium, 30, "a"), Some(0));
        assert_eq!(table.record(BoardSize::Medium, 10, "b"), Some(0));
        assert_eq!(table.record(BoardSize::Medium, 30, "c"), Some(2));
        assert_eq!(table.entries(BoardSize::Medium)[1].timestamp, "a");

        for _ in 0..7 {
            table.record(BoardSize::Medium, 1, "d");
        }
        assert_eq!(table.record(BoardSize::Medium, 31, "late"), None);
        assert_eq!(table.entries(BoardSize::Medium).len(), MAX_SCORES_PER_SIZE);
    }

    #[test]
    fn json_uses_size_keys_and_time_date_fields() {
        let mut table = HighScoreTable::default();
        table.record(BoardSize::Large, 42, DATE);

        let json = table.to_json().unwrap();

        assert_eq!(json, format!(r#"{{"large":[{{"time":42,"date":"{DATE}"}}]}}"#));
        assert_eq!(HighScoreTable::from_json(&json), table);
    }

    #[test]
    fn malformed_json_is_empty_table() {
        for text in ["", "not json", "[]", r#"{"small": 5}"#, r#"{"huge": []}"#] {
            assert!(HighScoreTable::from_json(text).is_empty(), "{text}");
        }
    }

    #[test]
    fn unreadable_sizes_do_not_drop_the_others() {
        let text = format!(
            r#"{{"small":[{{"time":5,"date":"{DATE}"}}],"custom":[],"large":"oops"}}"#
        );

        let table = HighScoreTable::from_json(&text);

        assert_eq!(table.entries(BoardSize::Small).len(), 1);
        assert!(table.entries(BoardSize::Large).is_empty());
        assert_eq!(table.iter().count(), 1);
    }

    #[test]
    fn saving_keeps_scores_next_to_unknown_sizes() {
        let mut store = MemoryStore::default();
        let text = format!(r#"{{"small":[{{"time":5,"date":"{DATE}"}}],"custom":[]}}"#);
        store.write(HIGH_SCORES_KEY, &text).unwrap();

        assert_eq!(save_score(&mut store, BoardSize::Medium, 9, DATE), Ok(Some(0)));

        let table = load_scores(&store);
        assert_eq!(table.entries(BoardSize::Small)[0].elapsed_seconds, 5);
        assert_eq!(table.entries(BoardSize::Medium)[0].elapsed_seconds, 9);
    }

    #[test]
    fn loaded_lists_are_sorted_and_capped() {
        let entries: Vec<String> = (0..12)
            .rev()
            .map(|time| format!(r#"{{"time":{time},"date":"{DATE}"}}"#))
            .collect();
        let text = format!(r#"{{"small":[{}]}}"#, entries.join(","));

        let table = HighScoreTable::from_json(&text);

        let small = table.entries(BoardSize::Small);
        assert_eq!(small.len(), MAX_SCORES_PER_SIZE);
        assert_eq!(small[0].elapsed_seconds, 0);
        assert_eq!(small[9].elapsed_seconds, 9);
    }

    #[test]
    fn save_and_load_through_store() {
        let mut store = MemoryStore::default();
        assert!(load_scores(&store).is_empty());

        assert_eq!(save_score(&mut store, BoardSize::Small, 12, DATE), Ok(Some(0)));
        assert_eq!(save_score(&mut store, BoardSize::Small, 8, DATE), Ok(Some(0)));

        let table = load_scores(&store);
        let times: Vec<_> = table
            .entries(BoardSize::Small)
            .iter()
            .map(|entry| entry.elapsed_seconds)
            .collect();
        assert_eq!(times, [8, 12]);
        assert_eq!(table.iter().count(), 1);
    }

    #[test]
    fn corrupt_store_is_overwritten_on_save() {
        let mut store = MemoryStore::default();
        store.write(HIGH_SCORES_KEY, "{broken").unwrap();

        save_score(&mut store, BoardSize::Medium, 77, DATE).unwrap();

        let table = load_scores(&store);
        assert_eq!(table.entries(BoardSize::Medium).len(), 1);
    }
}
