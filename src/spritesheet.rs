//! Sprite sheet packing - lays rendered frames out in equally sized cells

use crate::color::TRANSPARENT;
use image::{imageops, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted gap between cells, in source pixels.
pub const MAX_PADDING: u32 = 256;

/// Errors from sheet packing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SheetError {
    #[error("padding {0} exceeds the maximum of {}", MAX_PADDING)]
    PaddingTooLarge(u32),
    #[error("{frames} frame(s) of {cell_w}x{cell_h} do not fit in one sheet")]
    TooLarge { frames: usize, cell_w: u32, cell_h: u32 },
}

/// How frames are arranged on the sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetLayout {
    /// One row, left to right
    #[default]
    Horizontal,
    /// One column, top to bottom
    Vertical,
    /// Rows of `columns` cells
    Grid,
}

impl std::str::FromStr for SheetLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "horizontal" => Ok(SheetLayout::Horizontal),
            "vertical" => Ok(SheetLayout::Vertical),
            "grid" => Ok(SheetLayout::Grid),
            other => Err(format!("unknown layout '{}' (expected horizontal, vertical or grid)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOptions {
    pub layout: SheetLayout,
    /// Columns for [`SheetLayout::Grid`]; ignored otherwise
    pub columns: Option<u32>,
    /// Transparent pixels between neighbouring cells
    pub padding: u32,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self { layout: SheetLayout::Horizontal, columns: None, padding: 0 }
    }
}

impl SheetOptions {
    /// Resolve the grid shape for `count` frames.
    pub fn grid(&self, count: u32) -> (u32, u32) {
        let count = count.max(1);
        let columns = match self.layout {
            SheetLayout::Horizontal => count,
            SheetLayout::Vertical => 1,
            SheetLayout::Grid => self.columns.unwrap_or(count).clamp(1, count),
        };
        (columns, count.div_ceil(columns))
    }
}

/// Pixel rectangle of one frame on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone)]
pub struct PackedSheet {
    pub image: RgbaImage,
    /// One cell per input frame, in order
    pub cells: Vec<Cell>,
}

/// Pack frames into a sprite sheet.
///
/// Cells are sized to the largest frame; each frame sits at the top-left of
/// its cell and the rest of the cell stays transparent.
///
/// # Examples
///
/// ```
/// use digrig::spritesheet::{pack_sheet, SheetLayout, SheetOptions};
/// use image::{Rgba, RgbaImage};
///
/// let frame = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
/// let frames = vec![frame.clone(), frame.clone(), frame.clone(), frame];
///
/// // Default: one row
/// let sheet = pack_sheet(&frames, &SheetOptions::default()).unwrap();
/// assert_eq!(sheet.image.dimensions(), (8, 2));
///
/// // Two columns with a pixel of padding between cells
/// let options = SheetOptions { layout: SheetLayout::Grid, columns: Some(2), padding: 1 };
/// let sheet = pack_sheet(&frames, &options).unwrap();
/// assert_eq!(sheet.image.dimensions(), (5, 5));
/// assert_eq!(sheet.cells[3].x, 3);
/// ```
pub fn pack_sheet(frames: &[RgbaImage], options: &SheetOptions) -> Result<PackedSheet, SheetError> {
    if options.padding > MAX_PADDING {
        return Err(SheetError::PaddingTooLarge(options.padding));
    }
    if frames.is_empty() {
        return Ok(PackedSheet { image: RgbaImage::from_pixel(1, 1, TRANSPARENT), cells: Vec::new() });
    }

    let cell_w = frames.iter().map(|f| f.width()).max().unwrap_or(1);
    let cell_h = frames.iter().map(|f| f.height()).max().unwrap_or(1);
    let count = u32::try_from(frames.len()).unwrap_or(u32::MAX);
    let (columns, rows) = options.grid(count);
    let pad = options.padding;

    let too_large = || SheetError::TooLarge { frames: frames.len(), cell_w, cell_h };
    let sheet_w = span(columns, cell_w, pad).ok_or_else(too_large)?;
    let sheet_h = span(rows, cell_h, pad).ok_or_else(too_large)?;
    let mut image = RgbaImage::from_pixel(sheet_w.max(1), sheet_h.max(1), TRANSPARENT);
    let mut cells = Vec::with_capacity(frames.len());

    for (i, frame) in frames.iter().enumerate() {
        let col = i as u32 % columns;
        let row = i as u32 / columns;
        // Bounded by the sheet size checked above
        let x = col * cell_w + col * pad;
        let y = row * cell_h + row * pad;

        imageops::replace(&mut image, frame, x as i64, y as i64);
        cells.push(Cell { x, y, w: frame.width(), h: frame.height() });
    }

    log::debug!(
        "packed {} frame(s) into {}x{} sheet ({}x{} cells)",
        frames.len(),
        sheet_w,
        sheet_h,
        columns,
        rows
    );

    Ok(PackedSheet { image, cells })
}

/// Length of `n` cells of `cell` pixels with `pad` between neighbours.
/// `None` when it does not fit in a `u32`.
fn span(n: u32, cell: u32, pad: u32) -> Option<u32> {
    n.checked_mul(cell)?.checked_add((n - 1).checked_mul(pad)?)
}
