//! Dot-matrix word layouts
//!
//! Each word is rasterized from fixed 7x5 glyph bitmaps into one target point
//! per set bit, glyph by glyph, left to right. The whole block is centered in
//! the drawing area and shrunk to fit when the area is too small for it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Glyph bitmap height
pub const GLYPH_ROWS: usize = 7;
/// Glyph bitmap width
pub const GLYPH_COLS: usize = 5;

/// A 7x5 glyph, one bit per cell
pub type Glyph = [[u8; GLYPH_COLS]; GLYPH_ROWS];

const GLYPH_H: Glyph = [
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 1, 1, 1, 1],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
];

const GLYPH_E: Glyph = [
    [1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0],
    [1, 1, 1, 1, 0],
    [1, 0, 0, 0, 0],
    [1, 0, 0, 0, 0],
    [1, 0, 0, 0, 0],
    [1, 1, 1, 1, 1],
];

const GLYPH_L: Glyph = [
    [1, 0, 0, 0, 0],
    [1, 0, 0, 0, 0],
    [1, 0, 0, 0, 0],
    [1, 0, 0, 0, 0],
    [1, 0, 0, 0, 0],
    [1, 0, 0, 0, 0],
    [1, 1, 1, 1, 1],
];

const GLYPH_O: Glyph = [
    [0, 1, 1, 1, 0],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [0, 1, 1, 1, 0],
];

const GLYPH_W: Glyph = [
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 0, 1, 0, 1],
    [1, 0, 1, 0, 1],
    [1, 0, 1, 0, 1],
    [1, 1, 0, 1, 1],
    [1, 0, 0, 0, 1],
];

const GLYPH_R: Glyph = [
    [1, 1, 1, 1, 0],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 1, 1, 1, 0],
    [1, 0, 1, 0, 0],
    [1, 0, 0, 1, 0],
    [1, 0, 0, 0, 1],
];

const GLYPH_D: Glyph = [
    [1, 1, 1, 1, 0],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 1, 1, 1, 0],
];

/// Spacing of a word, in multiples of the dot size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordSpacing {
    /// Horizontal distance between columns
    pub column: f32,
    /// Vertical distance between rows
    pub row: f32,
    /// Gap between letters (rounded to whole columns)
    pub letter: f32,
}

/// Dot size as a fraction of the shorter area side
pub const DOT_SIZE_FACTOR: f32 = 0.013;

/// The two words blobs converge into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Word {
    Hello,
    World,
}

impl Word {
    pub fn as_str(&self) -> &'static str {
        match self {
            Word::Hello => "HELLO",
            Word::World => "WORLD",
        }
    }

    /// The word shown after this one
    pub fn other(self) -> Self {
        match self {
            Word::Hello => Word::World,
            Word::World => Word::Hello,
        }
    }

    pub fn glyphs(&self) -> [&'static Glyph; 5] {
        match self {
            Word::Hello => [&GLYPH_H, &GLYPH_E, &GLYPH_L, &GLYPH_L, &GLYPH_O],
            Word::World => [&GLYPH_W, &GLYPH_O, &GLYPH_R, &GLYPH_L, &GLYPH_D],
        }
    }

    /// Tuned separately so both words read well at the same dot size
    pub fn spacing(&self) -> WordSpacing {
        match self {
            Word::Hello => WordSpacing {
                column: 3.4,
                row: 4.0,
                letter: 4.6,
            },
            Word::World => WordSpacing {
                column: 2.9,
                row: 3.6,
                letter: 6.2,
            },
        }
    }

    /// Number of set cells, i.e. the number of targets the word produces
    pub fn dot_count(&self) -> usize {
        self.glyphs()
            .iter()
            .flat_map(|g| g.iter())
            .flat_map(|row| row.iter())
            .filter(|&&bit| bit != 0)
            .count()
    }
}

/// Lay out `word` centered in a `width` x `height` area.
///
/// Returns one point per set glyph cell, ordered glyph by glyph, row-major
/// inside each glyph. Returns an empty list only for non-positive areas.
pub fn layout_word(word: Word, width: f32, height: f32) -> Vec<Vec2> {
    if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
        return Vec::new();
    }

    let glyphs = word.glyphs();
    let spacing = word.spacing();

    let dot = width.min(height) * DOT_SIZE_FACTOR;
    let mut col_step = dot * spacing.column;
    let mut row_step = dot * spacing.row;
    let gap_cols = (spacing.letter / spacing.column).round() as usize;

    let total_cols = glyphs.len() * GLYPH_COLS + (glyphs.len() - 1) * gap_cols;
    let total_rows = GLYPH_ROWS;

    // Shrink uniformly when the block would not fit
    let block_w = total_cols as f32 * col_step;
    let block_h = total_rows as f32 * row_step;
    let fit = (width / block_w).min(height / block_h).min(1.0);
    col_step *= fit;
    row_step *= fit;

    let start_x = (width - total_cols as f32 * col_step) * 0.5;
    let start_y = (height - total_rows as f32 * row_step) * 0.5;

    let mut targets = Vec::with_capacity(word.dot_count());
    let mut col_offset = 0;
    for glyph in glyphs {
        for (r, row) in glyph.iter().enumerate() {
            for (c, &bit) in row.iter().enumerate() {
                if bit != 0 {
                    let x = start_x + (col_offset + c) as f32 * col_step;
                    let y = start_y + r as f32 * row_step;
                    targets.push(Vec2::new(x.clamp(0.0, width), y.clamp(0.0, height)));
                }
            }
        }
        col_offset += GLYPH_COLS + gap_cols;
    }
    targets
}

/// Evenly spaced grid of `count` points covering the area.
///
/// Used in place of a word layout whenever that layout comes back empty.
pub fn fallback_grid(width: f32, height: f32, count: usize) -> Vec<Vec2> {
    if count == 0 || !(width > 0.0 && height > 0.0) {
        return Vec::new();
    }

    let aspect = width / height;
    let cols = ((count as f32 * aspect).sqrt().ceil() as usize).clamp(1, count);
    let rows = count.div_ceil(cols);
    let cell_w = width / cols as f32;
    let cell_h = height / rows as f32;

    (0..count)
        .map(|i| {
            let (r, c) = (i / cols, i % cols);
            Vec2::new((c as f32 + 0.5) * cell_w, (r as f32 + 0.5) * cell_h)
        })
        .collect()
}

/// Target index for body `index` out of `body_count` bodies.
///
/// With at least as many targets as bodies each body takes its own slot;
/// otherwise bodies are spread proportionally over the targets.
pub fn target_index(index: usize, body_count: usize, target_count: usize) -> usize {
    if target_count == 0 {
        return 0;
    }
    if body_count <= target_count {
        index.min(target_count - 1)
    } else {
        let denom = body_count.saturating_sub(1).max(1) as f32;
        let factor = index as f32 / denom;
        ((factor * (target_count - 1) as f32).floor() as usize).min(target_count - 1)
    }
}
