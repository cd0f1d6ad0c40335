//! Split page text into row-major grids.
//!
//! Consecutive non-blank lines form one grid. Within a line, cells are
//! separated by tabs or by runs of two or more spaces (ASCII or
//! ideographic). Empty fields, including a leading one produced by
//! indentation, become absent cells so column positions survive.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{Cell, Grid};

lazy_static! {
    static ref CELL_SEPARATOR: Regex = Regex::new(r"\t+|[ \u{3000}]{2,}").unwrap();
}

/// Segment page text into grids.
pub fn text_to_grids(text: &str) -> Vec<Grid> {
    let mut grids = Vec::new();
    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            if !rows.is_empty() {
                grids.push(Grid::new(std::mem::take(&mut rows)));
            }
            continue;
        }
        rows.push(split_cells(line));
    }

    if !rows.is_empty() {
        grids.push(Grid::new(rows));
    }

    grids
}

fn split_cells(line: &str) -> Vec<Cell> {
    CELL_SEPARATOR
        .split(line)
        .map(|field| {
            let field = field.trim();
            (!field.is_empty()).then(|| field.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_lines_separate_grids() {
        let text = "a  b\nc  d\n\n\ne  f\n";
        let grids = text_to_grids(text);

        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0], Grid::from_strs([vec!["a", "b"], vec!["c", "d"]]));
        assert_eq!(grids[1], Grid::from_strs([vec!["e", "f"]]));
    }

    #[test]
    fn test_single_space_stays_inside_cell() {
        let grids = text_to_grids("当社 需給予想\t10月3日");
        assert_eq!(grids[0].cell(0, 0), Some("当社 需給予想"));
        assert_eq!(grids[0].cell(0, 1), Some("10月3日"));
    }

    #[test]
    fn test_indentation_yields_absent_leading_cell() {
        let grids = text_to_grids("財政  ▲1,234\n    10月3日");
        assert_eq!(grids[0].cell(1, 0), None);
        assert_eq!(grids[0].cell(1, 1), Some("10月3日"));
    }

    #[test]
    fn test_ideographic_space_run() {
        let grids = text_to_grids("財政\u{3000}\u{3000}1,000");
        assert_eq!(grids[0].cell(0, 1), Some("1,000"));
    }
}
