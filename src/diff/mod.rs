mod engine;
mod stats;
mod types;

// Re-export public types
pub use engine::{compute_diff, diff_lines, group_into_rows, render_unified};
pub use stats::{DiffStats, calculate_stats};
pub use types::{DiffKind, DiffRecord, DiffRow, EditScript};
