use tracing::trace;

use super::error::EditorError;

pub const DEFAULT_UNDO_LIMIT: usize = 100;

type Snapshot = Vec<String>;

/// Linear undo/redo over whole-document snapshots.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Records the pre-edit document and drops the redo branch. A snapshot
    /// equal to the top of the undo stack is not pushed twice.
    pub fn record(&mut self, current: &[String]) {
        self.redo_stack.clear();
        if self.undo_stack.last().is_some_and(|top| top.as_slice() == current) {
            trace!(target: "history", "snapshot_skipped");
            return;
        }
        self.undo_stack.push(current.to_vec());
        if self.undo_stack.len() > self.limit {
            let overflow = self.undo_stack.len() - self.limit;
            self.undo_stack.drain(0..overflow);
        }
    }

    /// Swaps `current` for the previous snapshot, keeping `current` for redo.
    pub fn undo(&mut self, current: Snapshot) -> Result<Snapshot, EditorError> {
        let previous = self.undo_stack.pop().ok_or(EditorError::NothingToUndo)?;
        self.redo_stack.push(current);
        Ok(previous)
    }

    pub fn redo(&mut self, current: Snapshot) -> Result<Snapshot, EditorError> {
        let next = self.redo_stack.pop().ok_or(EditorError::NothingToRedo)?;
        self.undo_stack.push(current);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn undo_then_redo_round_trips() {
        let mut h = History::default();
        let before = doc(&["a"]);
        let after = doc(&["ab"]);
        h.record(&before);
        let restored = h.undo(after.clone()).unwrap();
        assert_eq!(restored, before);
        let again = h.redo(restored).unwrap();
        assert_eq!(again, after);
    }

    #[test]
    fn empty_stacks_report_errors() {
        let mut h = History::default();
        assert!(matches!(h.undo(doc(&[""])), Err(EditorError::NothingToUndo)));
        assert!(matches!(h.redo(doc(&[""])), Err(EditorError::NothingToRedo)));
    }

    #[test]
    fn new_record_discards_redo_branch() {
        let mut h = History::default();
        h.record(&doc(&["a"]));
        h.undo(doc(&["ab"])).unwrap();
        assert_eq!(h.redo_len(), 1);
        h.record(&doc(&["a"]));
        assert_eq!(h.redo_len(), 0);
    }

    #[test]
    fn duplicate_snapshot_is_not_pushed() {
        let mut h = History::default();
        h.record(&doc(&["same"]));
        h.record(&doc(&["same"]));
        assert_eq!(h.undo_len(), 1);
    }

    #[test]
    fn oldest_snapshot_evicted_past_limit() {
        let mut h = History::new(3);
        for i in 0..5 {
            h.record(&doc(&[&i.to_string()]));
        }
        assert_eq!(h.undo_len(), 3);
        let mut current = doc(&["5"]);
        for expected in ["4", "3", "2"] {
            current = h.undo(current).unwrap();
            assert_eq!(current, doc(&[expected]));
        }
        assert!(h.undo(current).is_err());
    }
}
