use std::collections::VecDeque;

use crate::rules::{HISTORY_CAPACITY_DEFAULT, HISTORY_DEBOUNCE_MS_DEFAULT};

/// Bounded linear undo log. Saving after an undo drops the redo branch.
#[derive(Clone, Debug)]
pub struct History<T> {
    entries: VecDeque<T>,
    cursor: Option<usize>,
    capacity: usize,
    debounce_ms: f64,
    last_save_ms: Option<f64>,
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY_DEFAULT, HISTORY_DEBOUNCE_MS_DEFAULT)
    }
}

impl<T: Clone> History<T> {
    pub fn new(capacity: usize, debounce_ms: f64) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            cursor: None,
            capacity: capacity.max(1),
            debounce_ms,
            last_save_ms: None,
        }
    }

    pub fn save(&mut self, state: T, now_ms: f64) -> bool {
        if let Some(last) = self.last_save_ms {
            if now_ms - last < self.debounce_ms {
                return false;
            }
        }
        self.last_save_ms = Some(now_ms);
        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
        } else {
            self.entries.clear();
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(state);
        self.cursor = Some(self.entries.len() - 1);
        true
    }

    pub fn undo(&mut self) -> Option<&T> {
        let cursor = self.cursor.filter(|cursor| *cursor > 0)? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor)
    }

    pub fn redo(&mut self) -> Option<&T> {
        let cursor = self.cursor.filter(|cursor| cursor + 1 < self.entries.len())? + 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor)
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor + 1 < self.entries.len())
    }

    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|cursor| self.entries.get(cursor))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter()
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.entries.iter_mut()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
        self.last_save_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_skips_rapid_saves() {
        let mut history = History::new(5, 100.0);
        assert!(history.save(1, 0.0));
        assert!(!history.save(2, 50.0));
        assert!(history.save(3, 150.0));
        assert_eq!(history.entries().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn save_after_undo_drops_redo_branch() {
        let mut history = History::new(5, 0.0);
        for (i, value) in [1, 2, 3].into_iter().enumerate() {
            history.save(value, i as f64);
        }
        assert_eq!(history.undo(), Some(&2));
        history.save(9, 10.0);
        assert!(!history.can_redo());
        assert_eq!(history.entries().copied().collect::<Vec<_>>(), vec![1, 2, 9]);
    }

    #[test]
    fn bounds_are_no_ops() {
        let mut history: History<u8> = History::new(3, 0.0);
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        history.save(1, 0.0);
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.current(), Some(&1));
    }
}
