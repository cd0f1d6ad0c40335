//! Keyword-addressed intersection lookup within a single grid.

use chrono::NaiveDate;
use tracing::{debug, trace};

use super::rules::{normalize_number, KeywordSet};
use crate::models::Grid;

/// Default number of leading rows searched for header candidates.
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 40;

/// A numeric cell at the crossing of the data row and a header column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intersection {
    /// Row holding the metric keyword.
    pub header_row: usize,
    /// Row holding the subject keyword.
    pub data_row: usize,
    /// Column of the first metric keyword in the header row.
    pub column: usize,
    /// Raw cell text.
    pub text: String,
    /// Normalized value.
    pub value: i64,
}

/// Finds the value cell addressed by a subject (row) and a metric (column) keyword set.
#[derive(Debug, Clone)]
pub struct IntersectionLocator {
    subject: KeywordSet,
    metric: KeywordSet,
    header_scan_rows: usize,
}

impl IntersectionLocator {
    pub fn new(subject: KeywordSet, metric: KeywordSet) -> Self {
        Self {
            subject,
            metric,
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
        }
    }

    /// Set how many leading rows are searched for header candidates.
    pub fn with_header_scan_rows(mut self, rows: usize) -> Self {
        self.header_scan_rows = rows;
        self
    }

    pub fn subject(&self) -> &KeywordSet {
        &self.subject
    }

    pub fn metric(&self) -> &KeywordSet {
        &self.metric
    }

    /// Indices of rows within the scan window that contain a metric keyword.
    pub fn header_candidates(&self, grid: &Grid) -> Vec<usize> {
        grid.rows()
            .iter()
            .take(self.header_scan_rows)
            .enumerate()
            .filter(|(_, row)| self.metric.matches_row(row))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Index of the first row that contains a subject keyword.
    pub fn data_row(&self, grid: &Grid) -> Option<usize> {
        grid.rows().iter().position(|row| self.subject.matches_row(row))
    }

    /// Numeric intersections in header-candidate order.
    ///
    /// Headers at or below the data row, blank cells, and cells without
    /// digits are skipped. An empty result means the grid has nothing to offer.
    pub fn candidates(&self, grid: &Grid) -> Vec<Intersection> {
        let Some(data_row) = self.data_row(grid) else {
            trace!("no subject row in grid");
            return Vec::new();
        };

        let mut found = Vec::new();
        for header_row in self.header_candidates(grid) {
            if header_row >= data_row {
                continue;
            }

            let Some(column) = grid.row(header_row).and_then(|row| self.metric.first_match(row))
            else {
                continue;
            };

            let Some(text) = grid.cell(data_row, column).filter(|t| !t.trim().is_empty()) else {
                trace!("blank cell at row {} col {}", data_row, column);
                continue;
            };

            match normalize_number(text) {
                Some(value) => found.push(Intersection {
                    header_row,
                    data_row,
                    column,
                    text: text.to_string(),
                    value,
                }),
                None => trace!("non-numeric cell {:?} at row {} col {}", text, data_row, column),
            }
        }

        found
    }

    /// First candidate for which `resolve_date` yields a date.
    ///
    /// `resolve_date` receives `(header_row, column)`.
    pub fn locate<F>(&self, grid: &Grid, mut resolve_date: F) -> Option<(Intersection, NaiveDate)>
    where
        F: FnMut(usize, usize) -> Option<NaiveDate>,
    {
        for candidate in self.candidates(grid) {
            if let Some(date) = resolve_date(candidate.header_row, candidate.column) {
                debug!(
                    "located {} at ({}, {}) dated {}",
                    candidate.value, candidate.data_row, candidate.column, date
                );
                return Some((candidate, date));
            }
            trace!(
                "no date for header row {} col {}, trying next candidate",
                candidate.header_row, candidate.column
            );
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn locator() -> IntersectionLocator {
        IntersectionLocator::new(
            KeywordSet::new(["財政"]),
            KeywordSet::new(["当社需給予想", "需給予想"]),
        )
    }

    fn any_date(_: usize, _: usize) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 1, 1)
    }

    #[test]
    fn test_single_header_single_data_row() {
        let grid = Grid::from_strs([
            vec!["項目", "前日", "当社需給予想", "備考"],
            vec!["日銀", "1", "2", "3"],
            vec!["財政", "▲10", "▲1,234", "x"],
            vec!["合計", "5", "6", "7"],
        ]);

        let (hit, _) = locator().locate(&grid, any_date).unwrap();
        assert_eq!(hit.header_row, 0);
        assert_eq!(hit.data_row, 2);
        assert_eq!(hit.column, 2);
        assert_eq!(hit.text, "▲1,234");
        assert_eq!(hit.value, -1234);
    }

    #[test]
    fn test_first_subject_row_is_the_data_row() {
        let grid = Grid::from_strs([
            vec!["", "需給予想"],
            vec!["財政", "100"],
            vec!["財政等", "200"],
        ]);
        let candidates = locator().candidates(&grid);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].value, 100);
    }

    #[test]
    fn test_headers_below_data_row_ignored() {
        let grid = Grid::from_strs([
            vec!["財政", "100"],
            vec!["", "当社需給予想"],
        ]);
        assert!(locator().candidates(&grid).is_empty());
    }

    #[test]
    fn test_retry_on_blank_cell() {
        let grid = Grid::from_strs([
            vec!["", "当社需給予想", ""],
            vec!["", "", "需給予想"],
            vec!["財政", "", "500"],
        ]);
        let candidates = locator().candidates(&grid);
        assert_eq!(candidates.len(), 1);
        assert_eq!((candidates[0].header_row, candidates[0].column), (1, 2));
    }

    #[test]
    fn test_retry_until_date_resolves() {
        let grid = Grid::from_strs([
            vec!["", "当社需給予想"],
            vec!["", "", "需給予想"],
            vec!["財政", "10", "20"],
        ]);

        let (hit, _) = locator()
            .locate(&grid, |header_row, _| {
                (header_row == 1).then(|| NaiveDate::from_ymd_opt(2024, 2, 2).unwrap())
            })
            .unwrap();
        assert_eq!(hit.value, 20);
    }

    #[test]
    fn test_header_scan_window() {
        let mut rows = vec![vec!["".to_string(); 2]; 5];
        rows.push(vec!["".to_string(), "当社需給予想".to_string()]);
        rows.push(vec!["財政".to_string(), "7".to_string()]);
        let grid = Grid::from_strs(rows);

        assert_eq!(locator().candidates(&grid).len(), 1);
        assert!(locator().with_header_scan_rows(5).candidates(&grid).is_empty());
    }

    #[test]
    fn test_ragged_data_row() {
        let grid = Grid::from_strs([
            vec!["", "", "当社需給予想"],
            vec!["財政"],
        ]);
        assert!(locator().candidates(&grid).is_empty());
    }

    #[test]
    fn test_non_numeric_cell_skipped() {
        let grid = Grid::from_strs([
            vec!["", "当社需給予想"],
            vec!["財政", "―"],
        ]);
        assert!(locator().locate(&grid, any_date).is_none());
    }

    #[test]
    fn test_no_subject_row() {
        let grid = Grid::from_strs([vec!["", "当社需給予想"], vec!["日銀", "1"]]);
        assert_eq!(locator().data_row(&grid), None);
        assert!(locator().candidates(&grid).is_empty());
    }
}
