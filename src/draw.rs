//! Painter for procedurally generated components.
//!
//! Shapes are painted in order, each one overwriting what is underneath
//! (no blending), and clipped to the canvas.

use crate::models::Shape;
use crate::palettes::{Palette, PaletteError};
use image::{Rgba, RgbaImage};

/// Paint every shape onto `canvas` in declaration order.
pub fn paint_shapes(
    canvas: &mut RgbaImage,
    shapes: &[Shape],
    palette: &Palette,
) -> Result<(), PaletteError> {
    for shape in shapes {
        let color = palette.resolve(shape.color())?;
        paint_shape(canvas, shape, color);
    }
    Ok(())
}

/// Paint a single shape in a fixed color.
pub fn paint_shape(canvas: &mut RgbaImage, shape: &Shape, color: Rgba<u8>) {
    match shape {
        Shape::Pixel { x, y, .. } => plot(canvas, *x, *y, color),
        Shape::Rect { x, y, w, h, .. } => fill_rect(canvas, *x, *y, *w, *h, color),
        Shape::Outline { x, y, w, h, .. } => stroke_rect(canvas, *x, *y, *w, *h, color),
        Shape::Line { from, to, .. } => {
            draw_line(canvas, (from[0], from[1]), (to[0], to[1]), color)
        }
        Shape::Ellipse { cx, cy, rx, ry, .. } => fill_ellipse(canvas, *cx, *cy, *rx, *ry, color),
        Shape::Polygon { points, .. } => {
            let vertices: Vec<(i32, i32)> = points.iter().map(|p| (p[0], p[1])).collect();
            fill_polygon(canvas, &vertices, color);
        }
    }
}

/// Set one pixel, ignoring coordinates off the canvas.
pub fn plot(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

fn hline(canvas: &mut RgbaImage, x0: i32, x1: i32, y: i32, color: Rgba<u8>) {
    for x in x0.min(x1)..=x0.max(x1) {
        plot(canvas, x, y, color);
    }
}

pub fn fill_rect(canvas: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, color: Rgba<u8>) {
    for dy in 0..h as i32 {
        for dx in 0..w as i32 {
            plot(canvas, x + dx, y + dy, color);
        }
    }
}

pub fn stroke_rect(canvas: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, color: Rgba<u8>) {
    if w == 0 || h == 0 {
        return;
    }
    let (right, bottom) = (x + w as i32 - 1, y + h as i32 - 1);
    hline(canvas, x, right, y, color);
    hline(canvas, x, right, bottom, color);
    for yy in y..=bottom {
        plot(canvas, x, yy, color);
        plot(canvas, right, yy, color);
    }
}

/// Bresenham line, both endpoints included.
pub fn draw_line(canvas: &mut RgbaImage, p0: (i32, i32), p1: (i32, i32), color: Rgba<u8>) {
    let (mut x, mut y) = p0;
    let dx = (p1.0 - x).abs();
    let dy = -(p1.1 - y).abs();
    let sx = if x < p1.0 { 1 } else { -1 };
    let sy = if y < p1.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(canvas, x, y, color);
        if x == p1.0 && y == p1.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Filled ellipse spanning `cx ± rx`, `cy ± ry`.
///
/// A zero radius degenerates to a line along the other axis.
pub fn fill_ellipse(canvas: &mut RgbaImage, cx: i32, cy: i32, rx: u32, ry: u32, color: Rgba<u8>) {
    let (rx, ry) = (rx as i64, ry as i64);
    if rx == 0 || ry == 0 {
        draw_line(
            canvas,
            (cx - rx as i32, cy - ry as i32),
            (cx + rx as i32, cy + ry as i32),
            color,
        );
        return;
    }

    // Inside test against a radius grown by half a pixel keeps small
    // ellipses from collapsing to diamonds
    let (ax, ay) = (2 * rx + 1, 2 * ry + 1);
    for dy in -ry..=ry {
        let mut half_span = 0;
        for dx in 0..=rx {
            let (px, py) = (2 * dx, 2 * dy);
            if px * px * ay * ay + py * py * ax * ax <= ax * ax * ay * ay {
                half_span = dx;
            }
        }
        let row = cy + dy as i32;
        hline(canvas, cx - half_span as i32, cx + half_span as i32, row, color);
    }
}

/// Filled polygon, even-odd rule sampled at pixel centers, plus its edges.
pub fn fill_polygon(canvas: &mut RgbaImage, vertices: &[(i32, i32)], color: Rgba<u8>) {
    if vertices.is_empty() {
        return;
    }

    let min_y = vertices.iter().map(|v| v.1).min().unwrap_or(0);
    let max_y = vertices.iter().map(|v| v.1).max().unwrap_or(0);

    for y in min_y..=max_y {
        let scan = y as f64 + 0.5;
        let mut crossings: Vec<f64> = Vec::new();
        for (i, &(x0, y0)) in vertices.iter().enumerate() {
            let (x1, y1) = vertices[(i + 1) % vertices.len()];
            let (y0f, y1f) = (y0 as f64 + 0.5, y1 as f64 + 0.5);
            // Half-open so shared vertices are counted once
            if (y0f <= scan && scan < y1f) || (y1f <= scan && scan < y0f) {
                let t = (scan - y0f) / (y1f - y0f);
                crossings.push(x0 as f64 + 0.5 + t * (x1 - x0) as f64);
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for pair in crossings.chunks_exact(2) {
            let start = (pair[0] - 0.5).ceil() as i32;
            let end = (pair[1] - 0.5).floor() as i32;
            if start <= end {
                hline(canvas, start, end, y, color);
            }
        }
    }

    for (i, &v) in vertices.iter().enumerate() {
        draw_line(canvas, v, vertices[(i + 1) % vertices.len()], color);
    }
}
