#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wiregrid circuit engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired grid edits, the world executes those commands via its
//! `apply` entry point, propagates power through the affected network and then
//! broadcasts [`Event`] values describing the outcome. Systems consume event
//! streams, query immutable snapshots, and respond exclusively with new command
//! batches.

use serde::{Deserialize, Serialize};

/// Width used when no explicit grid configuration was provided.
pub const DEFAULT_GRID_WIDTH: u32 = 3;

/// Height used when no explicit grid configuration was provided.
pub const DEFAULT_GRID_HEIGHT: u32 = 3;

/// Largest width or height a grid may be configured with.
pub const MAX_GRID_DIMENSION: u32 = 1024;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the grid with an empty one of the provided dimensions.
    ///
    /// Dimensions below one are raised to one.
    ConfigureGrid {
        /// Number of cell columns.
        width: u32,
        /// Number of cell rows.
        height: u32,
    },
    /// Requests a new element on an empty cell.
    PlaceElement {
        /// Cell that should receive the element.
        cell: CellCoord,
        /// Kind of element to construct.
        kind: ElementKind,
    },
    /// Requests removal of the element stored in a cell.
    RemoveElement {
        /// Cell whose element should be destroyed.
        cell: CellCoord,
    },
    /// Flips the enabled state of a switch.
    ToggleSwitch {
        /// Cell holding the switch.
        cell: CellCoord,
    },
    /// Enables or disables debug editing.
    ///
    /// While debug editing is active placements and toggles do not propagate
    /// and wires may be forced to an arbitrary power value.
    SetDebugMode {
        /// Whether debug editing should be active.
        enabled: bool,
    },
    /// Overrides the power value of a wire without propagating it.
    ///
    /// Only honoured while debug editing is active.
    ForceWirePower {
        /// Cell holding the wire.
        cell: CellCoord,
        /// Power value the wire should report.
        powered: bool,
    },
    /// Rebuilds the grid contents from a persisted layout.
    LoadLayout {
        /// Layout captured by an earlier save.
        layout: GridLayout,
    },
    /// Removes every element while keeping the grid dimensions.
    ClearGrid,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the grid was rebuilt with new dimensions.
    GridConfigured {
        /// Number of cell columns.
        width: u32,
        /// Number of cell rows.
        height: u32,
    },
    /// Confirms that an element was attached to a cell.
    ElementPlaced {
        /// Cell that received the element.
        cell: CellCoord,
        /// Kind of element that was constructed.
        kind: ElementKind,
    },
    /// Confirms that an element was destroyed.
    ElementRemoved {
        /// Cell that held the element.
        cell: CellCoord,
        /// Kind of element that was destroyed.
        kind: ElementKind,
    },
    /// Confirms that a switch changed its enabled state.
    SwitchToggled {
        /// Cell holding the switch.
        cell: CellCoord,
        /// Enabled state after the toggle.
        enabled: bool,
    },
    /// Reports the net change of a wire's power value caused by one command.
    WirePowerChanged {
        /// Cell holding the wire.
        cell: CellCoord,
        /// Power value after the command settled.
        powered: bool,
    },
    /// Reports that a single propagation pass ran to completion.
    PropagationCompleted {
        /// Element at which the pass started.
        origin: CellCoord,
        /// Order carried by the pass.
        order: PropagationOrder,
        /// Number of neighbouring elements the pass dispatched to.
        visited: u32,
    },
    /// Confirms that a persisted layout was applied to the grid.
    LayoutLoaded {
        /// Number of cell columns of the current grid.
        width: u32,
        /// Number of cell rows of the current grid.
        height: u32,
        /// Number of saved elements dropped because they fell outside the grid.
        skipped: u32,
    },
    /// Confirms that every element was removed from the grid.
    GridCleared,
    /// Announces that debug editing was switched on or off.
    DebugModeChanged {
        /// Whether debug editing is now active.
        enabled: bool,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Kind of element requested.
        kind: ElementKind,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a removal request was rejected.
    RemovalRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Reports that a switch toggle or forced wire update was rejected.
    InteractionRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the interaction failed.
        reason: InteractionError,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the orthogonal neighbour in `direction`, if it lies within a
    /// grid of the provided dimensions.
    #[must_use]
    pub fn neighbor(self, direction: Direction, width: u32, height: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
        };
        let (column, row) = (column?, row?);
        if column < width && row < height {
            Some(CellCoord::new(column, row))
        } else {
            None
        }
    }
}

/// Cardinal directions linking orthogonally adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in the fixed order used for neighbour iteration.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
}

/// Kinds of element that can occupy a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    /// Conductor relaying the value asserted by its neighbours.
    Wire,
    /// Power source whose enabled state is flipped by the player.
    Switch,
    /// Power source that is enabled from construction until destruction.
    PowerSource,
}

impl ElementKind {
    /// Reports whether the kind asserts power of its own.
    #[must_use]
    pub const fn is_source(self) -> bool {
        matches!(self, Self::Switch | Self::PowerSource)
    }
}

/// Persisted per-cell tag describing which element, if any, a cell holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementTag {
    /// No element.
    #[default]
    Empty,
    /// A wire.
    Wire,
    /// A switch.
    Switch,
    /// A power source.
    PowerSource,
}

impl ElementTag {
    /// Element kind encoded by the tag, or `None` for [`ElementTag::Empty`].
    #[must_use]
    pub const fn kind(self) -> Option<ElementKind> {
        match self {
            Self::Empty => None,
            Self::Wire => Some(ElementKind::Wire),
            Self::Switch => Some(ElementKind::Switch),
            Self::PowerSource => Some(ElementKind::PowerSource),
        }
    }
}

impl From<Option<ElementKind>> for ElementTag {
    fn from(kind: Option<ElementKind>) -> Self {
        match kind {
            None => Self::Empty,
            Some(ElementKind::Wire) => Self::Wire,
            Some(ElementKind::Switch) => Self::Switch,
            Some(ElementKind::PowerSource) => Self::PowerSource,
        }
    }
}

/// Operation carried by a propagation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropagationOrder {
    /// Push the origin's asserted power value outward through wires.
    PropagatePower,
    /// Search the wires reachable from the origin for enabled sources.
    ScanForSource,
}

/// Boolean state of an element as observed by presenters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementState {
    /// Wire state.
    Wire {
        /// Value the wire currently outputs to its neighbours.
        powered: bool,
    },
    /// Switch state.
    Switch {
        /// Whether the switch currently asserts power.
        enabled: bool,
    },
    /// Power source state.
    PowerSource {
        /// Whether the source currently asserts power.
        enabled: bool,
    },
}

impl ElementState {
    /// Kind of element described by the state.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Wire { .. } => ElementKind::Wire,
            Self::Switch { .. } => ElementKind::Switch,
            Self::PowerSource { .. } => ElementKind::PowerSource,
        }
    }

    /// `powered` for wires, `enabled` for sources.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        match *self {
            Self::Wire { powered } => powered,
            Self::Switch { enabled } | Self::PowerSource { enabled } => enabled,
        }
    }
}

/// Immutable representation of a single element used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementSnapshot {
    /// Cell holding the element.
    pub cell: CellCoord,
    /// Observable state of the element.
    pub state: ElementState,
}

/// Read-only snapshot describing every element on the grid.
#[derive(Clone, Debug, Default)]
pub struct ElementView {
    snapshots: Vec<ElementSnapshot>,
}

impl ElementView {
    /// Creates a new element view, ordering snapshots row-major.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ElementSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| (snapshot.cell.row(), snapshot.cell.column()));
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &ElementSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the element stored at `cell`, if any.
    #[must_use]
    pub fn at(&self, cell: CellCoord) -> Option<&ElementSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.cell == cell)
    }

    /// Number of captured elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ElementSnapshot> {
        self.snapshots
    }
}

/// Single persisted cell entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutCell {
    /// Column of the saved cell.
    pub x: u32,
    /// Row of the saved cell.
    pub y: u32,
    /// Element held by the saved cell.
    pub tag: ElementTag,
}

/// Flat, row-major list of per-cell element tags together with the grid
/// dimensions it was saved from.
///
/// Transient state (wire power, source enablement) is never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Number of columns of the grid the layout was saved from.
    pub width: u32,
    /// Number of rows of the grid the layout was saved from.
    pub height: u32,
    /// One entry per cell in row-major order.
    pub cells: Vec<LayoutCell>,
}

impl GridLayout {
    /// Tag saved for the cell at `column`/`row`, resolved positionally.
    ///
    /// Coordinates outside the saved dimensions and entries missing from a
    /// truncated list both resolve to [`ElementTag::Empty`].
    #[must_use]
    pub fn tag_at(&self, column: u32, row: u32) -> ElementTag {
        if column >= self.width || row >= self.height {
            return ElementTag::Empty;
        }
        let index = u64::from(row) * u64::from(self.width) + u64::from(column);
        usize::try_from(index)
            .ok()
            .and_then(|index| self.cells.get(index))
            .map_or(ElementTag::Empty, |cell| cell.tag)
    }

    /// Number of non-empty entries in the layout.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.tag != ElementTag::Empty)
            .count()
    }
}

/// Reasons a placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell already holds an element.
    Occupied,
}

/// Reasons a removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell holds no element.
    EmptyCell,
}

/// Reasons a switch toggle or forced wire update may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell does not hold the expected kind of element.
    WrongElement,
    /// Forcing wire power requires debug editing.
    DebugModeRequired,
}
