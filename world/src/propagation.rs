//! Two-phase, single-visit traversal of the occupied cell graph.
//!
//! Every top-level pass owns a fresh visited bitmap and a FIFO frontier. When
//! a node expands, all of its in-bounds, occupied and not yet visited
//! neighbours are first claimed in the visited set (mark phase) and queued;
//! they are dispatched to the order-specific handler when popped (fire phase).
//! A node is therefore dispatched at most once per pass, which bounds the work
//! by the number of cells even when the wire graph contains cycles. Nothing is
//! stored on the elements themselves, so no bookkeeping survives the pass.

use std::collections::{BTreeMap, VecDeque};

use log::debug;
use wiregrid_core::{CellCoord, PropagationOrder};

use crate::{
    element::{Element, PowerResponse, ScanResponse},
    grid::Grid,
};

/// Summary of a completed pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PassReport {
    pub(crate) origin: CellCoord,
    pub(crate) order: PropagationOrder,
    pub(crate) visited: u32,
}

/// Outcome accumulated over every pass triggered by a single command.
///
/// Records the power value each wire held before it was first changed so the
/// net effect of the command can be reported once it settles.
#[derive(Debug, Default)]
pub(crate) struct Settlement {
    initial_power: BTreeMap<CellCoord, bool>,
    reports: Vec<PassReport>,
}

impl Settlement {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Remembers the value a wire held before this command touched it.
    pub(crate) fn record_power(&mut self, cell: CellCoord, previous: bool) {
        let _ = self.initial_power.entry(cell).or_insert(previous);
    }

    fn record_pass(&mut self, report: PassReport) {
        self.reports.push(report);
    }

    /// Passes in the order they completed.
    pub(crate) fn reports(&self) -> &[PassReport] {
        &self.reports
    }

    /// Wires whose power differs from the value held before the command,
    /// ordered row-major. Wires that no longer exist are omitted.
    pub(crate) fn power_changes(&self, grid: &Grid) -> Vec<(CellCoord, bool)> {
        let mut changes: Vec<(CellCoord, bool)> = self
            .initial_power
            .iter()
            .filter_map(|(cell, previous)| match grid.element(*cell) {
                Some(Element::Wire { powered }) if powered != previous => Some((*cell, *powered)),
                _ => None,
            })
            .collect();
        changes.sort_by_key(|(cell, _)| (cell.row(), cell.column()));
        changes
    }
}

/// Transient state of one traversal.
struct Pass {
    origin: CellCoord,
    order: PropagationOrder,
    visited: Vec<bool>,
    frontier: VecDeque<CellCoord>,
    dispatched: u32,
}

impl Pass {
    fn begin(grid: &Grid, origin: CellCoord, order: PropagationOrder) -> Self {
        let mut pass = Self {
            origin,
            order,
            visited: vec![false; grid.len()],
            frontier: VecDeque::new(),
            dispatched: 0,
        };
        if let Some(index) = grid.index(origin) {
            pass.visited[index] = true;
        }
        pass
    }

    /// Mark phase: claims every unvisited occupied neighbour of `cell`.
    fn mark_neighbors(&mut self, grid: &Grid, cell: CellCoord) {
        for neighbor in grid.neighbors(cell) {
            if grid.element(neighbor).is_none() {
                continue;
            }
            let Some(index) = grid.index(neighbor) else {
                continue;
            };
            if self.visited[index] {
                continue;
            }
            self.visited[index] = true;
            self.frontier.push_back(neighbor);
        }
    }

    /// Fire phase: yields the next claimed node.
    fn fire(&mut self) -> Option<CellCoord> {
        let next = self.frontier.pop_front()?;
        self.dispatched = self.dispatched.saturating_add(1);
        Some(next)
    }

    fn finish(self, settlement: &mut Settlement) {
        debug!(
            "{:?} pass from ({}, {}) dispatched to {} elements",
            self.order,
            self.origin.column(),
            self.origin.row(),
            self.dispatched
        );
        settlement.record_pass(PassReport {
            origin: self.origin,
            order: self.order,
            visited: self.dispatched,
        });
    }
}

/// Pushes `value` from `origin` through every reachable wire whose value it
/// changes.
///
/// Returns the enabled sources that a de-assertion reached; they must
/// re-assert themselves once the caller is done editing the grid.
pub(crate) fn propagate_power(
    grid: &mut Grid,
    origin: CellCoord,
    value: bool,
    settlement: &mut Settlement,
) -> Vec<CellCoord> {
    let mut pass = Pass::begin(grid, origin, PropagationOrder::PropagatePower);
    let mut reassert = Vec::new();
    pass.mark_neighbors(grid, origin);

    while let Some(cell) = pass.fire() {
        let Some(element) = grid.element_mut(cell) else {
            continue;
        };
        let previous = element.output();
        match element.on_propagate_power(value) {
            PowerResponse::Relay => {
                settlement.record_power(cell, previous);
                pass.mark_neighbors(grid, cell);
            }
            PowerResponse::Reassert => reassert.push(cell),
            PowerResponse::Unchanged => {}
        }
    }

    pass.finish(settlement);
    reassert
}

/// Collects the enabled sources reachable from `origin` through wires.
///
/// The origin itself is never reported.
pub(crate) fn scan_for_sources(
    grid: &Grid,
    origin: CellCoord,
    settlement: &mut Settlement,
) -> Vec<CellCoord> {
    let mut pass = Pass::begin(grid, origin, PropagationOrder::ScanForSource);
    let mut found = Vec::new();
    pass.mark_neighbors(grid, origin);

    while let Some(cell) = pass.fire() {
        let Some(element) = grid.element(cell) else {
            continue;
        };
        match element.on_scan_for_source() {
            ScanResponse::Relay => pass.mark_neighbors(grid, cell),
            ScanResponse::Found => found.push(cell),
            ScanResponse::Ignore => {}
        }
    }

    pass.finish(settlement);
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiregrid_core::ElementKind;

    fn grid_with(width: u32, height: u32, elements: &[(u32, u32, ElementKind)]) -> Grid {
        let mut grid = Grid::new(width, height);
        for &(column, row, kind) in elements {
            grid.attach(CellCoord::new(column, row), kind)
                .expect("test layout cells are empty and in bounds");
        }
        grid
    }

    fn ring_of_wires() -> Grid {
        let mut elements = Vec::new();
        for row in 0..3 {
            for column in 0..3 {
                if (column, row) != (1, 1) {
                    elements.push((column, row, ElementKind::Wire));
                }
            }
        }
        grid_with(3, 3, &elements)
    }

    #[test]
    fn power_pass_terminates_on_cycles_and_visits_each_node_once() {
        let mut grid = ring_of_wires();
        let mut settlement = Settlement::new();

        let reassert = propagate_power(&mut grid, CellCoord::new(0, 0), true, &mut settlement);

        assert!(reassert.is_empty());
        for cell in grid.cells() {
            if cell.position() != CellCoord::new(0, 0) {
                if let Some(element) = cell.element() {
                    assert!(element.output(), "wire {:?} stayed dark", cell.position());
                }
            }
        }
        assert_eq!(settlement.reports().len(), 1);
        assert_eq!(settlement.reports()[0].visited, 7);
    }

    #[test]
    fn power_pass_stops_at_unchanged_wires() {
        let mut grid = grid_with(
            3,
            1,
            &[
                (0, 0, ElementKind::Wire),
                (1, 0, ElementKind::Wire),
                (2, 0, ElementKind::Wire),
            ],
        );
        let mut settlement = Settlement::new();

        let _ = propagate_power(&mut grid, CellCoord::new(0, 0), false, &mut settlement);

        assert_eq!(settlement.reports()[0].visited, 1);
        assert!(settlement.power_changes(&grid).is_empty());
    }

    #[test]
    fn deassertion_reports_enabled_sources() {
        let mut grid = grid_with(
            3,
            1,
            &[
                (0, 0, ElementKind::Wire),
                (1, 0, ElementKind::Wire),
                (2, 0, ElementKind::PowerSource),
            ],
        );
        let mut settlement = Settlement::new();
        let _ = propagate_power(&mut grid, CellCoord::new(2, 0), true, &mut settlement);

        let reassert = propagate_power(&mut grid, CellCoord::new(0, 0), false, &mut settlement);

        assert_eq!(reassert, vec![CellCoord::new(2, 0)]);
        assert_eq!(
            grid.element(CellCoord::new(1, 0)),
            Some(&Element::Wire { powered: false })
        );
    }

    #[test]
    fn scan_relays_through_wires_only() {
        let mut grid = grid_with(
            4,
            1,
            &[
                (0, 0, ElementKind::Wire),
                (1, 0, ElementKind::PowerSource),
                (2, 0, ElementKind::Wire),
                (3, 0, ElementKind::PowerSource),
            ],
        );
        let mut settlement = Settlement::new();

        let found = scan_for_sources(&grid, CellCoord::new(0, 0), &mut settlement);
        assert_eq!(found, vec![CellCoord::new(1, 0)]);

        grid.element_mut(CellCoord::new(1, 0))
            .expect("source present")
            .set_output(false);
        let found = scan_for_sources(&grid, CellCoord::new(2, 0), &mut settlement);
        assert_eq!(found, vec![CellCoord::new(3, 0)]);
    }

    #[test]
    fn scan_never_reports_its_origin() {
        let grid = grid_with(
            2,
            1,
            &[(0, 0, ElementKind::PowerSource), (1, 0, ElementKind::Wire)],
        );
        let mut settlement = Settlement::new();

        let found = scan_for_sources(&grid, CellCoord::new(0, 0), &mut settlement);

        assert!(found.is_empty());
        assert_eq!(settlement.reports()[0].visited, 1);
    }

    #[test]
    fn power_changes_report_net_difference() {
        let mut grid = grid_with(2, 1, &[(0, 0, ElementKind::PowerSource), (1, 0, ElementKind::Wire)]);
        let mut settlement = Settlement::new();

        let _ = propagate_power(&mut grid, CellCoord::new(0, 0), true, &mut settlement);
        assert_eq!(
            settlement.power_changes(&grid),
            vec![(CellCoord::new(1, 0), true)]
        );

        let _ = propagate_power(&mut grid, CellCoord::new(0, 0), false, &mut settlement);
        assert!(settlement.power_changes(&grid).is_empty());
    }
}
