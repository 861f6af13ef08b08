//! Dense cell storage backing the authoritative world.

use wiregrid_core::{CellCoord, Direction, ElementKind, PlacementError, MAX_GRID_DIMENSION};

use crate::element::Element;

/// Addressable grid slot holding at most one element.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    position: CellCoord,
    element: Option<Element>,
}

impl Cell {
    const fn empty(position: CellCoord) -> Self {
        Self {
            position,
            element: None,
        }
    }

    /// Coordinates of the cell, fixed at construction.
    pub(crate) const fn position(&self) -> CellCoord {
        self.position
    }

    /// Element stored in the cell, if any.
    pub(crate) const fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }
}

/// Fixed-size, fully populated two-dimensional array of cells.
///
/// Only the contents of a cell may be empty; every coordinate within the
/// dimensions always resolves to a [`Cell`].
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds an empty grid, clamping each dimension to
    /// `1..=MAX_GRID_DIMENSION`.
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let width = width.clamp(1, MAX_GRID_DIMENSION);
        let height = height.clamp(1, MAX_GRID_DIMENSION);
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut cells = Vec::with_capacity(capacity);
        for row in 0..height {
            for column in 0..width {
                cells.push(Cell::empty(CellCoord::new(column, row)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub(crate) const fn width(&self) -> u32 {
        self.width
    }

    pub(crate) const fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells, which is also the size of per-pass visited sets.
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            row.checked_mul(width)?.checked_add(column)
        } else {
            None
        }
    }

    pub(crate) fn element(&self, cell: CellCoord) -> Option<&Element> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .and_then(|slot| slot.element.as_ref())
    }

    pub(crate) fn element_mut(&mut self, cell: CellCoord) -> Option<&mut Element> {
        let index = self.index(cell)?;
        self.cells
            .get_mut(index)
            .and_then(|slot| slot.element.as_mut())
    }

    pub(crate) fn kind_at(&self, cell: CellCoord) -> Option<ElementKind> {
        self.element(cell).map(Element::kind)
    }

    /// Attaches a freshly constructed element to an empty cell.
    pub(crate) fn attach(&mut self, cell: CellCoord, kind: ElementKind) -> Result<(), PlacementError> {
        let index = self.index(cell).ok_or(PlacementError::OutOfBounds)?;
        let slot = self
            .cells
            .get_mut(index)
            .ok_or(PlacementError::OutOfBounds)?;
        if slot.element.is_some() {
            return Err(PlacementError::Occupied);
        }
        slot.element = Some(Element::new(kind));
        Ok(())
    }

    /// Releases the element stored in `cell`, returning it to the caller.
    pub(crate) fn detach(&mut self, cell: CellCoord) -> Option<Element> {
        let index = self.index(cell)?;
        self.cells.get_mut(index).and_then(|slot| slot.element.take())
    }

    /// Removes every element while keeping the cells.
    pub(crate) fn clear(&mut self) {
        for slot in &mut self.cells {
            slot.element = None;
        }
    }

    /// Orthogonal neighbours of `cell` that lie within the grid bounds.
    pub(crate) fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let (width, height) = (self.width, self.height);
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| cell.neighbor(direction, width, height))
    }

    /// Cells in row-major order.
    pub(crate) fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_fully_populated_and_empty() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.len(), 12);
        assert!(grid.cells().all(|cell| cell.element().is_none()));
        let positions: Vec<_> = grid.cells().map(Cell::position).take(5).collect();
        assert_eq!(
            positions,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(2, 0),
                CellCoord::new(3, 0),
                CellCoord::new(0, 1),
            ]
        );
    }

    #[test]
    fn zero_dimensions_are_raised_to_one() {
        let grid = Grid::new(0, 0);
        assert_eq!((grid.width(), grid.height()), (1, 1));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn oversized_dimensions_are_capped() {
        let grid = Grid::new(u32::MAX, 2);
        assert_eq!((grid.width(), grid.height()), (MAX_GRID_DIMENSION, 2));
        assert_eq!(grid.len(), MAX_GRID_DIMENSION as usize * 2);
    }

    #[test]
    fn attach_rejects_occupied_and_out_of_bounds_cells() {
        let mut grid = Grid::new(2, 2);
        let cell = CellCoord::new(1, 1);
        assert_eq!(grid.attach(cell, ElementKind::Wire), Ok(()));
        assert_eq!(
            grid.attach(cell, ElementKind::Switch),
            Err(PlacementError::Occupied)
        );
        assert_eq!(
            grid.attach(CellCoord::new(2, 0), ElementKind::Wire),
            Err(PlacementError::OutOfBounds)
        );
        assert_eq!(grid.kind_at(cell), Some(ElementKind::Wire));
    }

    #[test]
    fn detach_releases_ownership() {
        let mut grid = Grid::new(2, 1);
        let cell = CellCoord::new(0, 0);
        grid.attach(cell, ElementKind::PowerSource)
            .expect("empty cell accepts element");
        let released = grid.detach(cell).expect("element present");
        assert_eq!(released.kind(), ElementKind::PowerSource);
        assert!(grid.element(cell).is_none());
        assert!(grid.detach(cell).is_none());
    }

    #[test]
    fn corner_neighbors_stay_in_bounds() {
        let grid = Grid::new(3, 3);
        let neighbors: Vec<_> = grid.neighbors(CellCoord::new(2, 0)).collect();
        assert_eq!(neighbors, vec![CellCoord::new(2, 1), CellCoord::new(1, 0)]);
    }
}
