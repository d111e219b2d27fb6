use std::collections::HashMap;

use tracing::info;

use crate::board::PuzzleMode;

pub fn best_time_key(mode: PuzzleMode, rows: u32, cols: u32, image_src: &str) -> String {
    format!("bestTime_{}_{}x{}_{}", mode.as_str(), rows, cols, image_src)
}

pub trait BestTimeStore {
    fn load(&self, key: &str) -> Option<u64>;
    fn store(&mut self, key: &str, elapsed_ms: u64);
}

#[derive(Clone, Debug, Default)]
pub struct MemoryBestTimes {
    records: HashMap<String, u64>,
}

impl MemoryBestTimes {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BestTimeStore for MemoryBestTimes {
    fn load(&self, key: &str) -> Option<u64> {
        self.records.get(key).copied()
    }

    fn store(&mut self, key: &str, elapsed_ms: u64) {
        self.records.insert(key.to_string(), elapsed_ms);
    }
}

/// Writes `elapsed_ms` when no usable record exists or it beats the stored
/// one. A stored zero counts as missing. Returns whether it was written.
pub fn record_best_time(store: &mut dyn BestTimeStore, key: &str, elapsed_ms: u64) -> bool {
    let improved = match store.load(key) {
        None | Some(0) => true,
        Some(previous) => elapsed_ms < previous,
    };
    if improved {
        store.store(key, elapsed_ms);
        info!(key, elapsed_ms, "new best time");
    }
    improved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_matches_storage_layout() {
        assert_eq!(
            best_time_key(PuzzleMode::Jigsaw, 4, 5, "IMG/pieces/image2.jpg"),
            "bestTime_jigsaw_4x5_IMG/pieces/image2.jpg"
        );
    }

    #[test]
    fn zero_record_is_replaced() {
        let mut store = MemoryBestTimes::new();
        store.store("k", 0);
        assert!(record_best_time(&mut store, "k", 90_000));
        assert_eq!(store.load("k"), Some(90_000));
    }

    #[test]
    fn ties_do_not_count() {
        let mut store = MemoryBestTimes::new();
        store.store("k", 30_000);
        assert!(!record_best_time(&mut store, "k", 30_000));
    }
}
