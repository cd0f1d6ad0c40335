//! Date resolution for a located value.
//!
//! Forecast dates are printed near the column header rather than next to the
//! value, so a fixed sequence of cells in the header's column is searched and
//! the first `M月D日` found wins:
//!
//! 1. the header cell itself;
//! 2. the rows at [`ROW_OFFSETS`] from the header;
//! 3. up to [`ROWS_ABOVE`] rows above the header, top to bottom.

use chrono::{Datelike, NaiveDate};
use tracing::trace;

use super::rules::resolve_cell_date;
use crate::models::Grid;

/// Row offsets from the header searched after the header cell, in priority order.
pub const ROW_OFFSETS: [isize; 5] = [1, -1, 2, -2, 3];

/// Number of rows above the header scanned last.
pub const ROWS_ABOVE: usize = 5;

/// Resolve the date for the value under `(header_row, col)`.
///
/// In-cell dates carry no year, so the document's publication date supplies
/// it; without one nothing can be resolved.
pub fn resolve_value_date(
    grid: &Grid,
    header_row: usize,
    col: usize,
    document_date: Option<NaiveDate>,
) -> Option<NaiveDate> {
    let year = document_date?.year();

    search_rows(header_row, grid.len()).find_map(|row| {
        let date = grid.cell(row, col).and_then(|text| resolve_cell_date(text, year));
        if let Some(date) = date {
            trace!("date {} found at row {} col {}", date, row, col);
        }
        date
    })
}

/// Rows searched for a header at `header_row`, in order. Out-of-range rows are skipped.
pub fn search_rows(header_row: usize, row_count: usize) -> impl Iterator<Item = usize> {
    let offsets = ROW_OFFSETS
        .into_iter()
        .filter_map(move |offset| header_row.checked_add_signed(offset));
    let above = header_row.saturating_sub(ROWS_ABOVE)..header_row;

    std::iter::once(header_row)
        .chain(offsets)
        .chain(above)
        .filter(move |row| *row < row_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn doc_date() -> Option<NaiveDate> {
        Some(date(2024, 9, 30))
    }

    #[test]
    fn test_search_order() {
        let rows: Vec<usize> = search_rows(6, 20).collect();
        assert_eq!(rows, vec![6, 7, 5, 8, 4, 9, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_search_order_near_edges() {
        let rows: Vec<usize> = search_rows(0, 2).collect();
        assert_eq!(rows, vec![0, 1]);

        let rows: Vec<usize> = search_rows(2, 4).collect();
        assert_eq!(rows, vec![2, 3, 1, 0, 0, 1]);
    }

    #[test]
    fn test_header_cell_wins_over_row_below() {
        let grid = Grid::from_strs([
            vec!["", "当社需給予想(10月1日)"],
            vec!["", "10月2日"],
            vec!["財政", "100"],
        ]);
        assert_eq!(resolve_value_date(&grid, 0, 1, doc_date()), Some(date(2024, 10, 1)));
    }

    #[test]
    fn test_row_below_wins_over_row_above() {
        let grid = Grid::from_strs([
            vec!["", "9月1日"],
            vec!["", "当社需給予想"],
            vec!["", "10月2日"],
            vec!["財政", "100"],
        ]);
        assert_eq!(resolve_value_date(&grid, 1, 1, doc_date()), Some(date(2024, 10, 2)));
    }

    #[test]
    fn test_falls_back_to_rows_above() {
        let grid = Grid::from_strs([
            vec!["", "8月5日"],
            vec!["", ""],
            vec!["", ""],
            vec!["", ""],
            vec!["", "当社需給予想"],
            vec!["財政", "100"],
        ]);
        // header 4: offsets cover 5, 3, 2 (6, 7 out of range); scan 0..4 finds row 0
        assert_eq!(resolve_value_date(&grid, 4, 1, doc_date()), Some(date(2024, 8, 5)));
    }

    #[test]
    fn test_other_columns_ignored() {
        let grid = Grid::from_strs([
            vec!["10月3日", "当社需給予想"],
            vec!["財政", "100"],
        ]);
        assert_eq!(resolve_value_date(&grid, 0, 1, doc_date()), None);
    }

    #[test]
    fn test_requires_document_date() {
        let grid = Grid::from_strs([vec!["", "当社需給予想(10月1日)"]]);
        assert_eq!(resolve_value_date(&grid, 0, 1, None), None);
    }

    #[test]
    fn test_invalid_cell_date_keeps_searching() {
        let grid = Grid::from_strs([
            vec!["当社需給予想(2月30日)"],
            vec!["3月1日"],
        ]);
        assert_eq!(resolve_value_date(&grid, 0, 0, doc_date()), Some(date(2024, 3, 1)));
    }
}
