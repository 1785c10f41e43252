//! Per-course lesson progress.
//!
//! Progress lives under one `tutorialProgress` key as a JSON map of
//! course id to completion state, matching what the tutorials page keeps
//! in local storage.

use std::collections::HashMap;

use common::KeyValueStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::courses::course;

/// Storage key of the serialized progress map.
pub const PROGRESS_KEY: &str = "tutorialProgress";

/// Completion state of one course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseProgress {
    /// Index of the next lesson to take (0-based).
    #[serde(rename = "currentLesson")]
    pub current_lesson: u32,
    /// Completion percentage, 0 to 100.
    pub progress: u8,
}

/// Lesson-completion tracking across the course catalog.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    entries: HashMap<String, CourseProgress>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the progress map from storage.
    ///
    /// A missing or malformed blob yields empty progress; entries for
    /// course ids no longer in the catalog are dropped.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(PROGRESS_KEY) else {
            return Self::default();
        };

        let mut entries: HashMap<String, CourseProgress> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "discarding malformed progress blob");
                return Self::default();
            }
        };

        entries.retain(|id, _| {
            let known = course(id).is_some();
            if !known {
                debug!(course = %id, "dropping progress for unknown course");
            }
            known
        });

        Self { entries }
    }

    /// Serialize the progress map back into storage.
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(&self.entries) {
            Ok(raw) => store.set(PROGRESS_KEY, &raw),
            Err(e) => warn!(error = %e, "failed to serialize progress"),
        }
    }

    /// Progress for one course, if any has been made.
    pub fn course_progress(&self, course_id: &str) -> Option<CourseProgress> {
        self.entries.get(course_id).copied()
    }

    /// Next lesson to take for a course (0 when untouched).
    pub fn current_lesson(&self, course_id: &str) -> u32 {
        self.course_progress(course_id)
            .map(|p| p.current_lesson)
            .unwrap_or(0)
    }

    /// Mark the current lesson of a course as completed.
    ///
    /// Advances the lesson index (clamped to the course's lesson count)
    /// and recomputes the percentage. Unknown course ids are ignored.
    pub fn complete_lesson(&mut self, course_id: &str) {
        let Some(course) = course(course_id) else {
            return;
        };

        let entry = self.entries.entry(course_id.to_string()).or_default();
        entry.current_lesson = (entry.current_lesson + 1).min(course.lessons);
        entry.progress = ((entry.current_lesson * 100) / course.lessons.max(1)) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::MemoryStore;

    #[test]
    fn test_empty_store_yields_empty_progress() {
        let store = MemoryStore::new();
        let tracker = ProgressTracker::load(&store);
        assert_eq!(tracker.current_lesson("risk-management"), 0);
        assert!(tracker.course_progress("risk-management").is_none());
    }

    #[test]
    fn test_complete_lesson_advances_and_saves() {
        let mut store = MemoryStore::new();
        let mut tracker = ProgressTracker::new();

        // risk-management has 8 lessons
        tracker.complete_lesson("risk-management");
        tracker.complete_lesson("risk-management");
        tracker.save(&mut store);

        let reloaded = ProgressTracker::load(&store);
        let progress = reloaded.course_progress("risk-management").unwrap();
        assert_eq!(progress.current_lesson, 2);
        assert_eq!(progress.progress, 25);
    }

    #[test]
    fn test_complete_lesson_clamps_at_course_end() {
        let mut tracker = ProgressTracker::new();

        for _ in 0..20 {
            tracker.complete_lesson("risk-management");
        }

        let progress = tracker.course_progress("risk-management").unwrap();
        assert_eq!(progress.current_lesson, 8);
        assert_eq!(progress.progress, 100);
    }

    #[test]
    fn test_unknown_course_is_ignored() {
        let mut tracker = ProgressTracker::new();
        tracker.complete_lesson("no-such-course");
        assert!(tracker.course_progress("no-such-course").is_none());
    }

    #[test]
    fn test_load_drops_stale_and_malformed_entries() {
        let mut store = MemoryStore::new();
        store.set(
            PROGRESS_KEY,
            r#"{"risk-management":{"currentLesson":3,"progress":37},
                "retired-course":{"currentLesson":1,"progress":10}}"#,
        );

        let tracker = ProgressTracker::load(&store);
        assert_eq!(tracker.current_lesson("risk-management"), 3);
        assert!(tracker.course_progress("retired-course").is_none());

        store.set(PROGRESS_KEY, "not json");
        let tracker = ProgressTracker::load(&store);
        assert!(tracker.course_progress("risk-management").is_none());
    }
}
