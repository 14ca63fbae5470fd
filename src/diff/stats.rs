use super::types::DiffRow;
use similar::{ChangeTag, TextDiff};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub added_count: usize,
    pub removed_count: usize,
}

/// Calculate character-level statistics from diff rows
pub fn calculate_stats(rows: &[DiffRow]) -> DiffStats {
    let mut stats = DiffStats::default();

    for row in rows {
        match row {
            DiffRow::Pair(left, right) => {
                let left_str: String = left.iter().map(|l| l.value.as_str()).collect();
                let right_str: String = right.iter().map(|r| r.value.as_str()).collect();

                let diff = TextDiff::from_chars(&left_str, &right_str);
                for change in diff.iter_all_changes() {
                    match change.tag() {
                        ChangeTag::Insert => stats.added_count += change.value().chars().count(),
                        ChangeTag::Delete => stats.removed_count += change.value().chars().count(),
                        _ => {}
                    }
                }
            }
            DiffRow::Context(_) => {}
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{compute_diff, group_into_rows};

    #[test]
    fn test_stats_replacement() {
        let script = compute_diff("hello cat\n", "hello dog\n");
        let rows = group_into_rows(&script);
        let stats = calculate_stats(&rows);
        // "cat" -> "dog": 3 chars out, 3 chars in
        assert_eq!(stats.added_count, 3);
        assert_eq!(stats.removed_count, 3);
    }

    #[test]
    fn test_stats_pure_addition() {
        let script = compute_diff("replicas: 1\n", "replicas: 1\npaused: true\n");
        let rows = group_into_rows(&script);
        let stats = calculate_stats(&rows);
        assert_eq!(stats.added_count, "paused: true".chars().count());
        assert_eq!(stats.removed_count, 0);
    }

    #[test]
    fn test_stats_context_only() {
        let script = compute_diff("a\nb\n", "a\nb\n");
        let rows = group_into_rows(&script);
        assert_eq!(calculate_stats(&rows), DiffStats::default());
    }
}
