//! Positioned text from page content streams and its assembly into grids.
//!
//! Text-showing operators are placed with the text matrix (`Tm`, `Td`,
//! `TD`, `T*`, `'`, `"`) composed with the graphics CTM (`cm`, `q`/`Q`).
//! Fragments are then grouped into rows by baseline, rows are split into
//! blocks at unusually large vertical gaps, and each block gets column
//! bands from the clustered left edges of its fragments.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Document, Encoding, Object, ObjectId};
use tracing::trace;

use super::Result;
use crate::error::PdfError;
use crate::models::{Cell, Grid};

/// Baselines closer than this (in points) share a row.
pub const ROW_TOLERANCE: f32 = 2.0;

/// Left edges closer than this (in points) share a column.
pub const COLUMN_TOLERANCE: f32 = 4.0;

/// A row gap larger than this multiple of the median gap starts a new grid.
pub const BLOCK_GAP_FACTOR: f32 = 2.0;

/// A run of text at its device-space origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

impl TextFragment {
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

/// Affine matrix `[a b c d e f]` in PDF row-vector convention.
type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

fn multiply(m: &Matrix, n: &Matrix) -> Matrix {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn translation(tx: f32, ty: f32) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

fn number(operands: &[Object], idx: usize) -> Option<f32> {
    operands.get(idx).and_then(|o| o.as_float().ok())
}

fn matrix_operands(operands: &[Object]) -> Option<Matrix> {
    let mut m = IDENTITY;
    for (i, slot) in m.iter_mut().enumerate() {
        *slot = number(operands, i)?;
    }
    Some(m)
}

/// Decode the operands of `Tj`, `TJ`, `'` or `"`.
///
/// Large negative kerning inside `TJ` is read as a word space.
fn shown_text(encoding: &Encoding, operands: &[Object], out: &mut String) {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => match encoding.bytes_to_string(bytes) {
                Ok(text) => out.push_str(&text),
                Err(e) => trace!("undecodable text run: {}", e),
            },
            Object::Array(items) => shown_text(encoding, items, out),
            Object::Integer(i) if *i < -100 => out.push(' '),
            Object::Real(r) if *r < -100.0 => out.push(' '),
            _ => {}
        }
    }
}

#[derive(Clone, Copy)]
struct TextState {
    ctm: Matrix,
    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f32,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: IDENTITY,
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            leading: 0.0,
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = multiply(&translation(tx, ty), &self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn origin(&self) -> (f32, f32) {
        let m = multiply(&self.text_matrix, &self.ctm);
        (m[4], m[5])
    }
}

/// Collect the positioned text fragments of one page.
///
/// Consecutive shows with no repositioning in between extend the same
/// fragment. Runs in fonts whose encoding lopdf cannot resolve are dropped.
pub fn page_fragments(doc: &Document, page_id: ObjectId) -> Result<Vec<TextFragment>> {
    let fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
    let encodings: BTreeMap<Vec<u8>, Encoding> = fonts
        .into_iter()
        .filter_map(|(name, font)| match font.get_font_encoding(doc) {
            Ok(encoding) => Some((name, encoding)),
            Err(e) => {
                trace!("no encoding for font {}: {}", String::from_utf8_lossy(&name), e);
                None
            }
        })
        .collect();

    let data = doc
        .get_page_content(page_id)
        .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
    let content = Content::decode(&data).map_err(|e| PdfError::TextExtraction(e.to_string()))?;

    let mut fragments: Vec<TextFragment> = Vec::new();
    let mut state = TextState::new();
    let mut saved: Vec<Matrix> = Vec::new();
    let mut encoding: Option<&Encoding> = None;
    // Index of the fragment a show without repositioning appends to.
    let mut open: Option<usize> = None;

    for op in &content.operations {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => saved.push(state.ctm),
            "Q" => {
                if let Some(ctm) = saved.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operands(operands) {
                    state.ctm = multiply(&m, &state.ctm);
                }
            }
            "BT" => {
                state.text_matrix = IDENTITY;
                state.line_matrix = IDENTITY;
                open = None;
            }
            "ET" => open = None,
            "Tf" => {
                encoding = operands
                    .first()
                    .and_then(|o| o.as_name().ok())
                    .and_then(|name| encodings.get(name));
            }
            "TL" => {
                if let Some(leading) = number(operands, 0) {
                    state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                    open = None;
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operands(operands) {
                    state.text_matrix = m;
                    state.line_matrix = m;
                    open = None;
                }
            }
            "T*" => {
                state.move_line(0.0, -state.leading);
                open = None;
            }
            "Tj" | "TJ" | "'" | "\"" => {
                if op.operator == "'" || op.operator == "\"" {
                    state.move_line(0.0, -state.leading);
                    open = None;
                }
                let Some(encoding) = encoding else {
                    continue;
                };

                // `"` carries word and character spacing before the string.
                let strings = if op.operator == "\"" {
                    operands.get(2..).unwrap_or_default()
                } else {
                    operands
                };
                let mut text = String::new();
                shown_text(encoding, strings, &mut text);

                match open {
                    Some(idx) => fragments[idx].text.push_str(&text),
                    None => {
                        let (x, y) = state.origin();
                        fragments.push(TextFragment::new(x, y, text));
                        open = Some(fragments.len() - 1);
                    }
                }
            }
            _ => {}
        }
    }

    fragments.retain(|f| !f.text.trim().is_empty());
    Ok(fragments)
}

struct Row {
    y: f32,
    fragments: Vec<TextFragment>,
}

/// Assemble positioned fragments into grids.
pub fn fragments_to_grids(mut fragments: Vec<TextFragment>) -> Vec<Grid> {
    fragments.retain(|f| !f.text.trim().is_empty());
    // Top of the page first, then left to right.
    fragments.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut rows: Vec<Row> = Vec::new();
    for fragment in fragments {
        match rows.last_mut() {
            Some(row) if (row.y - fragment.y).abs() <= ROW_TOLERANCE => row.fragments.push(fragment),
            _ => {
                let y = fragment.y;
                rows.push(Row {
                    y,
                    fragments: vec![fragment],
                });
            }
        }
    }
    for row in &mut rows {
        row.fragments.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    split_blocks(rows).into_iter().map(block_to_grid).collect()
}

fn split_blocks(rows: Vec<Row>) -> Vec<Vec<Row>> {
    let mut gaps: Vec<f32> = rows.windows(2).map(|w| w[0].y - w[1].y).collect();
    gaps.sort_by(f32::total_cmp);
    let limit = gaps.get(gaps.len() / 2).map(|median| median * BLOCK_GAP_FACTOR);

    let mut blocks: Vec<Vec<Row>> = Vec::new();
    let mut previous_y: Option<f32> = None;
    for row in rows {
        let starts_block = match (previous_y, limit) {
            (Some(prev), Some(limit)) => prev - row.y > limit,
            (None, _) => true,
            _ => false,
        };
        previous_y = Some(row.y);
        if starts_block {
            blocks.push(Vec::new());
        }
        if let Some(block) = blocks.last_mut() {
            block.push(row);
        }
    }
    blocks
}

fn block_to_grid(rows: Vec<Row>) -> Grid {
    let mut edges: Vec<f32> = rows
        .iter()
        .flat_map(|r| r.fragments.iter().map(|f| f.x))
        .collect();
    edges.sort_by(f32::total_cmp);

    // Column bands as (first edge, last edge) of each cluster.
    let mut bands: Vec<(f32, f32)> = Vec::new();
    for x in edges {
        match bands.last_mut() {
            Some(band) if x - band.1 <= COLUMN_TOLERANCE => band.1 = x,
            _ => bands.push((x, x)),
        }
    }

    let column_of = |x: f32| {
        bands
            .iter()
            .position(|&(_, last)| x <= last)
            .unwrap_or(bands.len().saturating_sub(1))
    };

    let grid_rows: Vec<Vec<Cell>> = rows
        .into_iter()
        .map(|row| {
            let mut cells: Vec<Cell> = vec![None; bands.len()];
            for fragment in row.fragments {
                let text = fragment.text.trim();
                let slot = &mut cells[column_of(fragment.x)];
                *slot = Some(match slot.take() {
                    Some(existing) => format!("{} {}", existing, text),
                    None => text.to_string(),
                });
            }
            cells
        })
        .collect();

    Grid::new(grid_rows)
}
