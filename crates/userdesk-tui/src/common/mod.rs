//! Shared TUI building blocks.

pub mod render_utils;
pub mod task;
pub mod text;

pub use task::{TaskCompleted, TaskId, TaskKind, TaskSeq, TaskState, Tasks};
pub use text::{mask, pop_char, push_char, push_str, truncate_start};
