//! Static tutorial content and lesson-progress tracking.

mod courses;
mod progress;

pub use courses::{course, Course, CourseLevel, COURSES};
pub use progress::{CourseProgress, ProgressTracker, PROGRESS_KEY};
