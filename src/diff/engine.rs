use super::types::{DiffKind, DiffRecord, DiffRow, EditScript};

/// Compute line-based diff between original and modified text.
///
/// Both texts are split on line boundaries; no other normalization is
/// performed (trailing newlines and whitespace are the caller's concern).
pub fn compute_diff(original: &str, modified: &str) -> EditScript {
    let original_lines: Vec<&str> = original.lines().collect();
    let modified_lines: Vec<&str> = modified.lines().collect();
    diff_lines(&original_lines, &modified_lines)
}

/// Compute the minimal line-level edit classification between two line
/// sequences, each line treated as an atomic token compared by equality.
///
/// Builds the standard `(n+1) x (m+1)` longest-common-subsequence table and
/// backtracks from the bottom-right corner. When the table gives no
/// preference between an insertion and a deletion, the insertion is taken;
/// after the final reversal this places removed blocks before the added
/// blocks that replace them. That ordering is relied upon by the row
/// grouping below and must not change.
pub fn diff_lines(original: &[&str], modified: &[&str]) -> EditScript {
    let n = original.len();
    let m = modified.len();

    let mut table = vec![vec![0usize; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            table[i][j] = if original[i - 1] == modified[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }

    // Backtrack runs end-to-start, so records accumulate in reverse.
    let mut records = Vec::with_capacity(n + m);
    let mut i = n;
    let mut j = m;
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && original[i - 1] == modified[j - 1] {
            records.push(DiffRecord::new(DiffKind::Context, original[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[i][j - 1] >= table[i - 1][j]) {
            records.push(DiffRecord::new(DiffKind::Added, modified[j - 1]));
            j -= 1;
        } else {
            records.push(DiffRecord::new(DiffKind::Removed, original[i - 1]));
            i -= 1;
        }
    }
    records.reverse();

    EditScript(records)
}

/// Group raw diff records into rows where unchanged lines are single rows,
/// and contiguous removed/added blocks become paired rows.
pub fn group_into_rows(script: &EditScript) -> Vec<DiffRow> {
    let records = script.records();
    let mut rows = Vec::new();
    let mut i = 0usize;

    while i < records.len() {
        match records[i].kind {
            DiffKind::Context => {
                rows.push(DiffRow::Context(records[i].value.clone()));
                i += 1;
            }
            DiffKind::Removed => {
                // collect removed block
                let mut removed_block = Vec::new();
                removed_block.push(records[i].clone());
                i += 1;
                while i < records.len() && records[i].kind == DiffKind::Removed {
                    removed_block.push(records[i].clone());
                    i += 1;
                }

                // collect following added block (if any)
                let mut added_block = Vec::new();
                let mut j = i;
                while j < records.len() && records[j].kind == DiffKind::Added {
                    added_block.push(records[j].clone());
                    j += 1;
                }

                rows.push(DiffRow::Pair(removed_block, added_block));
                i = j;
            }
            DiffKind::Added => {
                // added without preceding removal -> right-only
                rows.push(DiffRow::Pair(Vec::new(), vec![records[i].clone()]));
                i += 1;
            }
        }
    }

    rows
}

/// Render an edit script as unified (+/-/space prefixed) text, one line per
/// record, preserving record order exactly.
pub fn render_unified(script: &EditScript) -> String {
    let mut out = String::new();
    for record in script.records() {
        let prefix = match record.kind {
            DiffKind::Context => ' ',
            DiffKind::Added => '+',
            DiffKind::Removed => '-',
        };
        out.push(prefix);
        out.push_str(&record.value);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(script: &EditScript) -> Vec<DiffKind> {
        script.records().iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_single_line_replacement() {
        let script = diff_lines(&["a", "b", "c"], &["a", "x", "c"]);
        assert_eq!(
            script.records(),
            &[
                DiffRecord::new(DiffKind::Context, "a"),
                DiffRecord::new(DiffKind::Removed, "b"),
                DiffRecord::new(DiffKind::Added, "x"),
                DiffRecord::new(DiffKind::Context, "c"),
            ]
        );
    }

    #[test]
    fn test_trailing_addition() {
        let script = diff_lines(&["a", "b"], &["a", "b", "c"]);
        assert_eq!(
            script.records(),
            &[
                DiffRecord::new(DiffKind::Context, "a"),
                DiffRecord::new(DiffKind::Context, "b"),
                DiffRecord::new(DiffKind::Added, "c"),
            ]
        );
    }

    #[test]
    fn test_middle_removal() {
        let script = diff_lines(&["a", "b", "c"], &["a", "c"]);
        assert_eq!(
            script.records(),
            &[
                DiffRecord::new(DiffKind::Context, "a"),
                DiffRecord::new(DiffKind::Removed, "b"),
                DiffRecord::new(DiffKind::Context, "c"),
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(diff_lines(&[], &[]).is_empty());

        let added_only = diff_lines(&[], &["a"]);
        assert_eq!(
            added_only.records(),
            &[DiffRecord::new(DiffKind::Added, "a")]
        );

        let removed_only = diff_lines(&["a", "b"], &[]);
        assert_eq!(
            kinds(&removed_only),
            vec![DiffKind::Removed, DiffKind::Removed]
        );
    }

    #[test]
    fn test_identical_texts_are_all_context() {
        let lines = ["host: web-1", "port: 8080", "replicas: 3"];
        let script = diff_lines(&lines, &lines);
        assert_eq!(script.len(), lines.len());
        assert!(script.records().iter().all(|r| r.kind == DiffKind::Context));
        assert!(!script.has_meaningful_changes());
    }

    #[test]
    fn test_disjoint_texts_group_removed_before_added() {
        let script = diff_lines(&["a", "b"], &["x", "y", "z"]);
        assert_eq!(
            kinds(&script),
            vec![
                DiffKind::Removed,
                DiffKind::Removed,
                DiffKind::Added,
                DiffKind::Added,
                DiffKind::Added,
            ]
        );
    }

    #[test]
    fn test_reconstruction_invariants() {
        let original = ["apiVersion: v1", "kind: ConfigMap", "data:", "  a: 1"];
        let modified = ["apiVersion: v1", "kind: ConfigMap", "data:", "  a: 2", "  b: 3"];
        let script = diff_lines(&original, &modified);
        assert_eq!(script.reconstruct_original(), original);
        assert_eq!(script.reconstruct_modified(), modified);
    }

    #[test]
    fn test_determinism() {
        let original = ["a", "b", "c", "d"];
        let modified = ["b", "x", "c", "y"];
        let first = diff_lines(&original, &modified);
        for _ in 0..10 {
            assert_eq!(diff_lines(&original, &modified), first);
        }
    }

    #[test]
    fn test_compute_diff_splits_on_lines() {
        let script = compute_diff("a\nb\nc\n", "a\nx\nc\n");
        assert_eq!(
            kinds(&script),
            vec![
                DiffKind::Context,
                DiffKind::Removed,
                DiffKind::Added,
                DiffKind::Context,
            ]
        );
        assert!(compute_diff("", "").is_empty());
    }

    #[test]
    fn test_grouping_pairs_removed_with_added() {
        let script = compute_diff("a\nold\nc\n", "a\nnew\nc\n");
        let rows = group_into_rows(&script);
        assert_eq!(rows.len(), 3);
        match &rows[0] {
            DiffRow::Context(s) => assert_eq!(s, "a"),
            _ => panic!(),
        }
        match &rows[1] {
            DiffRow::Pair(l, r) => {
                assert_eq!(l.len(), 1);
                assert_eq!(r.len(), 1);
                assert_eq!(l[0].value, "old");
                assert_eq!(r[0].value, "new");
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_grouping_added_without_removal() {
        let script = compute_diff("a\n", "a\nb\n");
        let rows = group_into_rows(&script);
        assert_eq!(rows.len(), 2);
        match &rows[1] {
            DiffRow::Pair(l, r) => {
                assert!(l.is_empty());
                assert_eq!(r[0].value, "b");
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_render_unified() {
        let script = compute_diff("a\nb\n", "a\nx\n");
        assert_eq!(render_unified(&script), " a\n-b\n+x\n");
    }
}
