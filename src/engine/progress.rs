use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::engine::stats::{self, LearningStats};
use crate::store::schema::PROGRESS_KEY;
use crate::store::{self, Storage};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningAction {
    Visit,
    Complete,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningEntry {
    /// Full id (`chapter/section`).
    pub section_id: String,
    pub timestamp: i64,
    pub action: LearningAction,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressState {
    pub completed_sections: Vec<String>,
    pub last_visited: Option<String>,
    pub bookmarks: Vec<String>,
    pub learning_history: Vec<LearningEntry>,
    pub learning_start_date: Option<i64>,
}

impl ProgressState {
    /// Drop repeated entries from the two id sets, keeping first occurrences.
    fn dedup_sets(&mut self) {
        dedup_in_order(&mut self.completed_sections);
        dedup_in_order(&mut self.bookmarks);
    }
}

fn dedup_in_order(ids: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}

/// Completion, bookmark and visit-history state for one learner.
///
/// Every mutation is written through to `storage` before it returns. Write
/// failures are logged and otherwise ignored, so the in-memory state stays
/// authoritative for the rest of the session.
pub struct ProgressStore {
    state: ProgressState,
    storage: Rc<dyn Storage>,
    clock: Rc<dyn Clock>,
    history_limit: Option<usize>,
}

impl ProgressStore {
    pub fn new(storage: Rc<dyn Storage>, clock: Rc<dyn Clock>) -> Self {
        let state = match store::load_state::<ProgressState>(storage.as_ref(), PROGRESS_KEY) {
            Some(mut state) => {
                state.dedup_sets();
                tracing::debug!(
                    completed = state.completed_sections.len(),
                    bookmarks = state.bookmarks.len(),
                    history = state.learning_history.len(),
                    "restored progress"
                );
                state
            }
            None => ProgressState::default(),
        };
        Self {
            state,
            storage,
            clock,
            history_limit: None,
        }
    }

    /// Keep at most `limit` history entries, dropping the oldest. 0 disables
    /// the bound.
    ///
    /// Trimming never clears `learning_start_date`, so with a bound set the
    /// start date can outlive every `visit` entry it was derived from.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = (limit > 0).then_some(limit);
        self
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn mark_as_completed(&mut self, full_id: &str) {
        if self.is_completed(full_id) {
            return;
        }
        self.state.completed_sections.push(full_id.to_string());
        self.record(full_id, LearningAction::Complete);
        self.persist();
    }

    /// History entries for the section are left in place.
    pub fn mark_as_incomplete(&mut self, full_id: &str) {
        self.state.completed_sections.retain(|id| id != full_id);
        self.persist();
    }

    pub fn is_completed(&self, full_id: &str) -> bool {
        self.state.completed_sections.iter().any(|id| id == full_id)
    }

    pub fn toggle_bookmark(&mut self, full_id: &str) {
        if self.is_bookmarked(full_id) {
            self.state.bookmarks.retain(|id| id != full_id);
        } else {
            self.state.bookmarks.push(full_id.to_string());
        }
        self.persist();
    }

    pub fn is_bookmarked(&self, full_id: &str) -> bool {
        self.state.bookmarks.iter().any(|id| id == full_id)
    }

    /// Records a visit. The first visit ever also fixes the learning start date.
    pub fn set_last_visited(&mut self, full_id: &str) {
        let now = self.clock.now_ms();
        self.state.last_visited = Some(full_id.to_string());
        self.state.learning_start_date.get_or_insert(now);
        self.record(full_id, LearningAction::Visit);
        self.persist();
    }

    pub fn reset_progress(&mut self) {
        self.state = ProgressState::default();
        tracing::info!("progress reset");
        self.persist();
    }

    /// Replace the whole state, e.g. after an import.
    pub fn replace_state(&mut self, mut state: ProgressState) {
        state.dedup_sets();
        self.state = state;
        self.persist();
    }

    /// Percentage of `candidates` that are completed, counting only the
    /// candidates whose text starts with `chapter_id`.
    ///
    /// This is a textual prefix test: with ids like `chapter-1` and
    /// `chapter-10` the shorter one also claims the longer one's sections.
    /// The builtin ids are zero-padded, which keeps them apart.
    pub fn chapter_progress<S: AsRef<str>>(&self, chapter_id: &str, candidates: &[S]) -> u8 {
        let in_chapter: Vec<&str> = candidates
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| id.starts_with(chapter_id))
            .collect();
        let completed = in_chapter
            .iter()
            .filter(|id| self.is_completed(id))
            .count();
        stats::percent(completed, in_chapter.len())
    }

    pub fn total_progress(&self, total_sections: usize) -> u8 {
        stats::percent(self.state.completed_sections.len(), total_sections)
    }

    pub fn learning_stats(&self) -> LearningStats {
        stats::compute(
            &self.state.learning_history,
            self.state.learning_start_date,
            self.clock.now_ms(),
        )
    }

    /// Newest entries first.
    pub fn recent_history(&self, limit: usize) -> impl Iterator<Item = &LearningEntry> {
        self.state.learning_history.iter().rev().take(limit)
    }

    fn record(&mut self, full_id: &str, action: LearningAction) {
        self.state.learning_history.push(LearningEntry {
            section_id: full_id.to_string(),
            timestamp: self.clock.now_ms(),
            action,
        });
        if let Some(limit) = self.history_limit {
            let len = self.state.learning_history.len();
            if len > limit {
                self.state.learning_history.drain(..len - limit);
            }
        }
    }

    fn persist(&self) {
        if let Err(err) = store::save_state(self.storage.as_ref(), PROGRESS_KEY, &self.state) {
            tracing::warn!(?err, "failed to persist progress");
        }
    }
}
