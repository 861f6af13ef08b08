#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state and signal propagation for Wiregrid.
//!
//! The world owns the cell grid and every element placed on it. Edits arrive
//! as [`Command`] values through [`apply`]; each edit runs the affected
//! element's update behaviour to completion, re-asserts any sources that are
//! still live, and reports the settled outcome as [`Event`] values.

mod element;
mod grid;
mod layout;
mod propagation;

use log::info;
use wiregrid_core::{
    CellCoord, Command, ElementKind, Event, InteractionError, RemovalError, DEFAULT_GRID_HEIGHT,
    DEFAULT_GRID_WIDTH,
};

use crate::{
    element::{settle_sources, update_behaviour, Element},
    grid::Grid,
    propagation::Settlement,
};

/// Represents the authoritative Wiregrid world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    debug_mode: bool,
}

impl World {
    /// Creates an empty world using the default grid dimensions.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dimensions(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT)
    }

    /// Creates an empty world of the provided dimensions.
    ///
    /// Each dimension is clamped to `1..=MAX_GRID_DIMENSION`.
    #[must_use]
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            grid: Grid::new(width, height),
            debug_mode: false,
        }
    }

    fn place(&mut self, cell: CellCoord, kind: ElementKind, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.grid.attach(cell, kind) {
            out_events.push(Event::PlacementRejected { cell, kind, reason });
            return;
        }
        out_events.push(Event::ElementPlaced { cell, kind });

        if self.debug_mode {
            return;
        }

        let mut settlement = Settlement::new();
        let follow_up = update_behaviour(&mut self.grid, cell, &mut settlement);
        settle_sources(&mut self.grid, follow_up, &mut settlement);
        self.report(&settlement, out_events);
    }

    fn remove(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if !self.grid.contains(cell) {
            out_events.push(Event::RemovalRejected {
                cell,
                reason: RemovalError::OutOfBounds,
            });
            return;
        }
        let Some(element) = self.grid.element_mut(cell) else {
            out_events.push(Event::RemovalRejected {
                cell,
                reason: RemovalError::EmptyCell,
            });
            return;
        };

        // The element stops asserting before it leaves the network.
        let kind = element.kind();
        element.set_output(false);

        let mut settlement = Settlement::new();
        let follow_up = update_behaviour(&mut self.grid, cell, &mut settlement);
        let _ = self.grid.detach(cell);
        settle_sources(&mut self.grid, follow_up, &mut settlement);

        out_events.push(Event::ElementRemoved { cell, kind });
        self.report(&settlement, out_events);
    }

    fn toggle_switch(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let in_bounds = self.grid.contains(cell);
        let enabled = match self.grid.element_mut(cell) {
            Some(Element::Switch { enabled }) => {
                *enabled = !*enabled;
                *enabled
            }
            _ => {
                let reason = if in_bounds {
                    InteractionError::WrongElement
                } else {
                    InteractionError::OutOfBounds
                };
                out_events.push(Event::InteractionRejected { cell, reason });
                return;
            }
        };
        out_events.push(Event::SwitchToggled { cell, enabled });

        if self.debug_mode {
            return;
        }

        let mut settlement = Settlement::new();
        let follow_up = update_behaviour(&mut self.grid, cell, &mut settlement);
        settle_sources(&mut self.grid, follow_up, &mut settlement);
        self.report(&settlement, out_events);
    }

    fn force_wire_power(&mut self, cell: CellCoord, powered: bool, out_events: &mut Vec<Event>) {
        if !self.debug_mode {
            out_events.push(Event::InteractionRejected {
                cell,
                reason: InteractionError::DebugModeRequired,
            });
            return;
        }
        let in_bounds = self.grid.contains(cell);
        match self.grid.element_mut(cell) {
            Some(Element::Wire { powered: current }) => {
                if *current != powered {
                    *current = powered;
                    out_events.push(Event::WirePowerChanged { cell, powered });
                }
            }
            _ => {
                let reason = if in_bounds {
                    InteractionError::WrongElement
                } else {
                    InteractionError::OutOfBounds
                };
                out_events.push(Event::InteractionRejected { cell, reason });
            }
        }
    }

    fn load_layout(&mut self, layout: &wiregrid_core::GridLayout, out_events: &mut Vec<Event>) {
        let summary = layout::load(&mut self.grid, layout);
        info!(
            "loaded {} saved elements into a {}x{} grid",
            layout.element_count(),
            self.grid.width(),
            self.grid.height()
        );
        out_events.push(Event::LayoutLoaded {
            width: self.grid.width(),
            height: self.grid.height(),
            skipped: summary.skipped,
        });

        let sources: Vec<CellCoord> = self
            .grid
            .cells()
            .filter(|cell| cell.element().is_some_and(Element::is_enabled_source))
            .map(|cell| cell.position())
            .collect();
        let mut settlement = Settlement::new();
        settle_sources(&mut self.grid, sources, &mut settlement);
        self.report(&settlement, out_events);
    }

    fn report(&self, settlement: &Settlement, out_events: &mut Vec<Event>) {
        for report in settlement.reports() {
            out_events.push(Event::PropagationCompleted {
                origin: report.origin,
                order: report.order,
                visited: report.visited,
            });
        }
        for (cell, powered) in settlement.power_changes(&self.grid) {
            out_events.push(Event::WirePowerChanged { cell, powered });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { width, height } => {
            world.grid = Grid::new(width, height);
            info!(
                "configured {}x{} grid",
                world.grid.width(),
                world.grid.height()
            );
            out_events.push(Event::GridConfigured {
                width: world.grid.width(),
                height: world.grid.height(),
            });
        }
        Command::PlaceElement { cell, kind } => world.place(cell, kind, out_events),
        Command::RemoveElement { cell } => world.remove(cell, out_events),
        Command::ToggleSwitch { cell } => world.toggle_switch(cell, out_events),
        Command::SetDebugMode { enabled } => {
            if world.debug_mode != enabled {
                world.debug_mode = enabled;
                out_events.push(Event::DebugModeChanged { enabled });
            }
        }
        Command::ForceWirePower { cell, powered } => {
            world.force_wire_power(cell, powered, out_events);
        }
        Command::LoadLayout { layout } => world.load_layout(&layout, out_events),
        Command::ClearGrid => {
            world.grid.clear();
            out_events.push(Event::GridCleared);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use wiregrid_core::{CellCoord, ElementKind, ElementSnapshot, ElementState, ElementView, GridLayout};

    use super::{layout, World};

    /// Width and height of the grid in cells.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.grid.width(), world.grid.height())
    }

    /// Kind of element stored at `cell`, if any.
    #[must_use]
    pub fn element_kind_at(world: &World, cell: CellCoord) -> Option<ElementKind> {
        world.grid.kind_at(cell)
    }

    /// Observable state of the element stored at `cell`, if any.
    #[must_use]
    pub fn element_at(world: &World, cell: CellCoord) -> Option<ElementState> {
        world.grid.element(cell).map(|element| element.state())
    }

    /// Captures a read-only view of every element on the grid.
    #[must_use]
    pub fn element_view(world: &World) -> ElementView {
        let snapshots = world
            .grid
            .cells()
            .filter_map(|cell| {
                cell.element().map(|element| ElementSnapshot {
                    cell: cell.position(),
                    state: element.state(),
                })
            })
            .collect();
        ElementView::from_snapshots(snapshots)
    }

    /// Saves the grid as a flat row-major list of element tags.
    #[must_use]
    pub fn layout(world: &World) -> GridLayout {
        layout::save(&world.grid)
    }

    /// Reports whether debug editing is active.
    #[must_use]
    pub fn is_debug_mode(world: &World) -> bool {
        world.debug_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiregrid_core::{ElementState, PlacementError, MAX_GRID_DIMENSION};

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    #[test]
    fn configure_grid_clamps_and_empties() {
        let mut world = World::new();
        let _ = run(
            &mut world,
            Command::PlaceElement {
                cell: CellCoord::new(0, 0),
                kind: ElementKind::Wire,
            },
        );

        let events = run(
            &mut world,
            Command::ConfigureGrid {
                width: 0,
                height: 5,
            },
        );

        assert_eq!(events, vec![Event::GridConfigured { width: 1, height: 5 }]);
        assert_eq!(query::dimensions(&world), (1, 5));
        assert!(query::element_view(&world).is_empty());
    }

    #[test]
    fn configure_grid_caps_oversized_dimensions() {
        let mut world = World::new();

        let events = run(
            &mut world,
            Command::ConfigureGrid {
                width: u32::MAX,
                height: u32::MAX,
            },
        );

        assert_eq!(
            events,
            vec![Event::GridConfigured {
                width: MAX_GRID_DIMENSION,
                height: MAX_GRID_DIMENSION,
            }]
        );
        assert_eq!(
            query::dimensions(&world),
            (MAX_GRID_DIMENSION, MAX_GRID_DIMENSION)
        );
    }

    #[test]
    fn placement_on_occupied_cell_is_rejected() {
        let mut world = World::new();
        let cell = CellCoord::new(1, 1);
        let _ = run(
            &mut world,
            Command::PlaceElement {
                cell,
                kind: ElementKind::Wire,
            },
        );

        let events = run(
            &mut world,
            Command::PlaceElement {
                cell,
                kind: ElementKind::PowerSource,
            },
        );

        assert_eq!(
            events,
            vec![Event::PlacementRejected {
                cell,
                kind: ElementKind::PowerSource,
                reason: PlacementError::Occupied,
            }]
        );
        assert_eq!(query::element_kind_at(&world, cell), Some(ElementKind::Wire));
    }

    #[test]
    fn removal_reports_bounds_and_empty_cells() {
        let mut world = World::new();
        assert_eq!(
            run(
                &mut world,
                Command::RemoveElement {
                    cell: CellCoord::new(9, 9),
                }
            ),
            vec![Event::RemovalRejected {
                cell: CellCoord::new(9, 9),
                reason: RemovalError::OutOfBounds,
            }]
        );
        assert_eq!(
            run(
                &mut world,
                Command::RemoveElement {
                    cell: CellCoord::new(0, 0),
                }
            ),
            vec![Event::RemovalRejected {
                cell: CellCoord::new(0, 0),
                reason: RemovalError::EmptyCell,
            }]
        );
    }

    #[test]
    fn toggle_rejects_non_switch_cells() {
        let mut world = World::new();
        let cell = CellCoord::new(0, 0);
        let _ = run(
            &mut world,
            Command::PlaceElement {
                cell,
                kind: ElementKind::PowerSource,
            },
        );

        let events = run(&mut world, Command::ToggleSwitch { cell });

        assert_eq!(
            events,
            vec![Event::InteractionRejected {
                cell,
                reason: InteractionError::WrongElement,
            }]
        );
        assert_eq!(
            query::element_at(&world, cell),
            Some(ElementState::PowerSource { enabled: true })
        );
    }

    #[test]
    fn debug_mode_is_reported_once_per_change() {
        let mut world = World::new();
        assert_eq!(
            run(&mut world, Command::SetDebugMode { enabled: true }),
            vec![Event::DebugModeChanged { enabled: true }]
        );
        assert!(run(&mut world, Command::SetDebugMode { enabled: true }).is_empty());
        assert!(query::is_debug_mode(&world));
    }

    #[test]
    fn force_wire_power_requires_debug_mode() {
        let mut world = World::new();
        let cell = CellCoord::new(0, 0);
        let _ = run(
            &mut world,
            Command::PlaceElement {
                cell,
                kind: ElementKind::Wire,
            },
        );

        let events = run(&mut world, Command::ForceWirePower { cell, powered: true });
        assert_eq!(
            events,
            vec![Event::InteractionRejected {
                cell,
                reason: InteractionError::DebugModeRequired,
            }]
        );

        let _ = run(&mut world, Command::SetDebugMode { enabled: true });
        let events = run(&mut world, Command::ForceWirePower { cell, powered: true });
        assert_eq!(events, vec![Event::WirePowerChanged { cell, powered: true }]);
        assert_eq!(
            query::element_at(&world, cell),
            Some(ElementState::Wire { powered: true })
        );
    }

    #[test]
    fn clear_grid_keeps_dimensions() {
        let mut world = World::with_dimensions(4, 2);
        let _ = run(
            &mut world,
            Command::PlaceElement {
                cell: CellCoord::new(3, 1),
                kind: ElementKind::Switch,
            },
        );

        assert_eq!(run(&mut world, Command::ClearGrid), vec![Event::GridCleared]);
        assert_eq!(query::dimensions(&world), (4, 2));
        assert!(query::element_view(&world).is_empty());
    }
}
