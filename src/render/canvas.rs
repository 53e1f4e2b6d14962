//! ASCII drawing of the graph layout.

use crate::layout::{Layout, Viewport};
use crate::models::{GraphData, MemoryId};

/// Glyph for link segments.
pub const LINK_GLYPH: char = '·';
/// Glyph for nodes.
pub const NODE_GLYPH: char = 'o';
/// Glyph for the selected node.
pub const SELECTED_GLYPH: char = '@';

/// Draws nodes and links into a `width` x `height` character grid.
///
/// Links are drawn first so nodes sit on top; the selected node is drawn
/// last. Anything projecting off the canvas is clipped.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_canvas(
    data: &GraphData,
    layout: &Layout,
    viewport: &Viewport,
    selected: Option<&MemoryId>,
    width: usize,
    height: usize,
) -> String {
    if width == 0 || height == 0 {
        return String::new();
    }
    let mut grid = vec![vec![' '; width]; height];

    for link in &data.links {
        let (Some(a), Some(b)) = (layout.get(&link.source), layout.get(&link.target)) else {
            continue;
        };
        let (ax, ay) = viewport.to_canvas(a, width, height);
        let (bx, by) = viewport.to_canvas(b, width, height);
        let steps = (bx - ax).abs().max((by - ay).abs()).ceil().min(4_096.0) as usize;
        for step in 1..steps {
            let t = step as f64 / steps as f64;
            let (x, y) = ((bx - ax).mul_add(t, ax).floor(), (by - ay).mul_add(t, ay).floor());
            if x >= 0.0 && y >= 0.0 && x < width as f64 && y < height as f64 {
                grid[y as usize][x as usize] = LINK_GLYPH;
            }
        }
    }

    for (id, point) in layout.iter() {
        if Some(id) == selected {
            continue;
        }
        if let Some((col, row)) = viewport.project(point, width, height) {
            grid[row][col] = NODE_GLYPH;
        }
    }
    if let Some((col, row)) = selected
        .and_then(|id| layout.get(id))
        .and_then(|p| viewport.project(p, width, height))
    {
        grid[row][col] = SELECTED_GLYPH;
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
