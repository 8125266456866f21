// src/compare/mod.rs — Verdicts against ground truth

use crate::agent::types::Verdict;
use crate::table::Table;

/// Produces a [`Verdict`] by diffing parser output against the expected
/// table. Trait-shaped so tests can script verdict sequences.
pub trait Comparator: Send + Sync {
    fn compare(&self, actual: &Table, expected: &Table) -> Verdict;
}

/// Structural comparison: headers, then row count, then cells.
///
/// Failure descriptions are written for the planner, not for humans
/// scanning logs: concrete locations, concrete values, bounded length.
pub struct TableComparator {
    /// Cell diffs reported before "and N more" elision.
    max_cell_diffs: usize,
    /// Numeric cells equal within this tolerance pass even when their
    /// string forms differ ("100.0" vs "100.00").
    float_tolerance: f64,
}

impl Default for TableComparator {
    fn default() -> Self {
        Self {
            max_cell_diffs: 5,
            float_tolerance: 1e-9,
        }
    }
}

impl Comparator for TableComparator {
    fn compare(&self, actual: &Table, expected: &Table) -> Verdict {
        if actual.headers() != expected.headers() {
            return Verdict::Fail {
                description: format!(
                    "column headers do not match. Expected [{}] but the parser produced [{}]. \
                     Column names and order must match exactly.",
                    expected.headers().join(", "),
                    actual.headers().join(", "),
                ),
            };
        }

        if actual.n_rows() != expected.n_rows() {
            return Verdict::Fail {
                description: format!(
                    "row count mismatch: the parser produced {} rows but the expected table has {}. \
                     Check for skipped transactions, duplicated rows, or header/footer lines \
                     parsed as data.",
                    actual.n_rows(),
                    expected.n_rows(),
                ),
            };
        }

        let mut diffs: Vec<String> = Vec::new();
        let mut total_diffs = 0usize;
        for (row_idx, (got_row, want_row)) in
            actual.rows().iter().zip(expected.rows().iter()).enumerate()
        {
            for (col_idx, (got, want)) in got_row.iter().zip(want_row.iter()).enumerate() {
                if !self.cells_equal(got, want) {
                    total_diffs += 1;
                    if diffs.len() < self.max_cell_diffs {
                        diffs.push(format!(
                            "row {}, column '{}': got '{}', want '{}'",
                            row_idx + 1,
                            expected.headers()[col_idx],
                            got.trim(),
                            want.trim(),
                        ));
                    }
                }
            }
        }

        if total_diffs > 0 {
            let mut description = format!(
                "{} cell(s) differ from the expected table:\n  {}",
                total_diffs,
                diffs.join("\n  "),
            );
            if total_diffs > diffs.len() {
                description.push_str(&format!("\n  ... and {} more", total_diffs - diffs.len()));
            }
            return Verdict::Fail { description };
        }

        Verdict::Pass {
            summary: format!(
                "{} rows x {} columns match the expected table",
                expected.n_rows(),
                expected.n_cols(),
            ),
        }
    }
}

impl TableComparator {
    fn cells_equal(&self, got: &str, want: &str) -> bool {
        let got = got.trim();
        let want = want.trim();
        if got == want {
            return true;
        }
        match (got.parse::<f64>(), want.parse::<f64>()) {
            (Ok(g), Ok(w)) => (g - w).abs() <= self.float_tolerance,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(text: &str) -> Table {
        Table::from_csv_str(text).unwrap()
    }

    const TRUTH: &str = "\
Date,Description,Amount
2024-01-02,COFFEE,-3.50
2024-01-03,SALARY,2500.00
";

    #[test]
    fn test_identical_tables_pass() {
        let v = TableComparator::default().compare(&table(TRUTH), &table(TRUTH));
        match v {
            Verdict::Pass { summary } => {
                assert_eq!(summary, "2 rows x 3 columns match the expected table")
            }
            Verdict::Fail { description } => panic!("unexpected fail: {description}"),
        }
    }

    #[test]
    fn test_numeric_formatting_differences_pass() {
        let actual = table("Date,Description,Amount\n2024-01-02,COFFEE,-3.5\n2024-01-03,SALARY,2500\n");
        let v = TableComparator::default().compare(&actual, &table(TRUTH));
        assert!(v.passed());
    }

    #[test]
    fn test_whitespace_differences_pass() {
        let actual = table("Date,Description,Amount\n2024-01-02, COFFEE ,-3.50\n2024-01-03,SALARY,2500.00\n");
        let v = TableComparator::default().compare(&actual, &table(TRUTH));
        assert!(v.passed());
    }

    #[test]
    fn test_header_mismatch_names_both_sides() {
        let actual = table("date,desc,amount\n2024-01-02,COFFEE,-3.50\n2024-01-03,SALARY,2500.00\n");
        let v = TableComparator::default().compare(&actual, &table(TRUTH));
        match v {
            Verdict::Fail { description } => {
                assert!(description.contains("Date, Description, Amount"));
                assert!(description.contains("date, desc, amount"));
            }
            Verdict::Pass { .. } => panic!("header mismatch must fail"),
        }
    }

    #[test]
    fn test_row_count_mismatch_reports_counts() {
        let actual = table("Date,Description,Amount\n2024-01-02,COFFEE,-3.50\n");
        let v = TableComparator::default().compare(&actual, &table(TRUTH));
        match v {
            Verdict::Fail { description } => {
                assert!(description.contains("produced 1 rows"));
                assert!(description.contains("has 2"));
            }
            Verdict::Pass { .. } => panic!("row count mismatch must fail"),
        }
    }

    #[test]
    fn test_cell_diff_locates_value() {
        let actual = table("Date,Description,Amount\n2024-01-02,TEA,-3.50\n2024-01-03,SALARY,2500.00\n");
        let v = TableComparator::default().compare(&actual, &table(TRUTH));
        match v {
            Verdict::Fail { description } => {
                assert!(description.contains("row 1, column 'Description'"));
                assert!(description.contains("got 'TEA'"));
                assert!(description.contains("want 'COFFEE'"));
            }
            Verdict::Pass { .. } => panic!("cell diff must fail"),
        }
    }

    #[test]
    fn test_cell_diffs_are_bounded() {
        let mut truth = String::from("A\n");
        let mut actual = String::from("A\n");
        for i in 0..20 {
            truth.push_str(&format!("t{i}\n"));
            actual.push_str(&format!("x{i}\n"));
        }
        let v = TableComparator::default().compare(&table(&actual), &table(&truth));
        match v {
            Verdict::Fail { description } => {
                assert!(description.starts_with("20 cell(s) differ"));
                assert!(description.contains("... and 15 more"));
            }
            Verdict::Pass { .. } => panic!("differing tables must fail"),
        }
    }

    #[test]
    fn test_numeric_tolerance_is_tight() {
        // A real value difference is not forgiven by the epsilon.
        let actual = table("Date,Description,Amount\n2024-01-02,COFFEE,-3.51\n2024-01-03,SALARY,2500.00\n");
        let v = TableComparator::default().compare(&actual, &table(TRUTH));
        assert!(!v.passed());
    }
}
