//! Saving and restoring the flat per-cell tag list.

use log::warn;
use wiregrid_core::{CellCoord, ElementTag, GridLayout, LayoutCell};

use crate::grid::Grid;

/// Captures every cell of the grid in row-major order.
pub(crate) fn save(grid: &Grid) -> GridLayout {
    let cells = grid
        .cells()
        .map(|cell| LayoutCell {
            x: cell.position().column(),
            y: cell.position().row(),
            tag: ElementTag::from(cell.element().map(|element| element.kind())),
        })
        .collect();

    GridLayout {
        width: grid.width(),
        height: grid.height(),
        cells,
    }
}

/// Result of restoring a layout into a grid.
#[derive(Debug, Default)]
pub(crate) struct LoadSummary {
    /// Saved elements that fell outside the current grid.
    pub(crate) skipped: u32,
}

/// Rebuilds `grid` from `layout`, keeping the grid's current dimensions.
///
/// Cells are reconstructed first, then elements in their default constructed
/// state. Saved entries outside the current bounds are dropped, and cells the
/// layout does not cover stay empty; a mismatched layout never aborts the load.
pub(crate) fn load(grid: &mut Grid, layout: &GridLayout) -> LoadSummary {
    *grid = Grid::new(grid.width(), grid.height());

    for row in 0..layout.height.min(grid.height()) {
        for column in 0..layout.width.min(grid.width()) {
            let Some(kind) = layout.tag_at(column, row).kind() else {
                continue;
            };
            // Every cell in this range is empty and in bounds.
            let _ = grid.attach(CellCoord::new(column, row), kind);
        }
    }

    let summary = LoadSummary {
        skipped: count_out_of_bounds(grid, layout),
    };
    if summary.skipped > 0 {
        warn!(
            "layout saved as {}x{} does not fit the {}x{} grid; dropped {} elements",
            layout.width,
            layout.height,
            grid.width(),
            grid.height(),
            summary.skipped
        );
    }

    summary
}

/// Counts saved elements whose positional slot lies outside `grid`.
fn count_out_of_bounds(grid: &Grid, layout: &GridLayout) -> u32 {
    let width = u64::from(layout.width);
    let limit = width.saturating_mul(u64::from(layout.height));
    let mut skipped = 0_u32;
    for (index, cell) in (0..limit).zip(&layout.cells) {
        if cell.tag.kind().is_none() {
            continue;
        }
        let column = index % width;
        let row = index / width;
        if column >= u64::from(grid.width()) || row >= u64::from(grid.height()) {
            skipped = skipped.saturating_add(1);
        }
    }
    skipped
}
