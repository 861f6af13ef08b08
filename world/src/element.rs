//! Element variants and their update behaviour.

use wiregrid_core::{CellCoord, ElementKind, ElementState};

use crate::{
    grid::Grid,
    propagation::{self, Settlement},
};

/// Value placed in a cell.
///
/// Elements hold only their boolean output; all traversal bookkeeping lives in
/// the pass that is currently visiting them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Element {
    Wire { powered: bool },
    Switch { enabled: bool },
    PowerSource { enabled: bool },
}

/// Reaction of an element to a power value pushed onto it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PowerResponse {
    /// The wire adopted a new value and downstream neighbours must be re-evaluated.
    Relay,
    /// An enabled source was reached by a de-assertion and must re-assert itself.
    Reassert,
    /// Nothing changed.
    Unchanged,
}

/// Reaction of an element to a source scan reaching it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScanResponse {
    /// Wires let the scan continue.
    Relay,
    /// An enabled source was found.
    Found,
    /// Disabled sources neither relay nor count.
    Ignore,
}

impl Element {
    /// Default constructed element of `kind`.
    pub(crate) const fn new(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Wire => Self::Wire { powered: false },
            ElementKind::Switch => Self::Switch { enabled: false },
            ElementKind::PowerSource => Self::PowerSource { enabled: true },
        }
    }

    pub(crate) const fn kind(&self) -> ElementKind {
        match self {
            Self::Wire { .. } => ElementKind::Wire,
            Self::Switch { .. } => ElementKind::Switch,
            Self::PowerSource { .. } => ElementKind::PowerSource,
        }
    }

    pub(crate) const fn state(&self) -> ElementState {
        match *self {
            Self::Wire { powered } => ElementState::Wire { powered },
            Self::Switch { enabled } => ElementState::Switch { enabled },
            Self::PowerSource { enabled } => ElementState::PowerSource { enabled },
        }
    }

    /// Value the element asserts onto its neighbours.
    pub(crate) const fn output(&self) -> bool {
        match *self {
            Self::Wire { powered } => powered,
            Self::Switch { enabled } | Self::PowerSource { enabled } => enabled,
        }
    }

    /// Overwrites the asserted value without propagating it.
    pub(crate) fn set_output(&mut self, value: bool) {
        match self {
            Self::Wire { powered } => *powered = value,
            Self::Switch { enabled } | Self::PowerSource { enabled } => *enabled = value,
        }
    }

    pub(crate) const fn is_enabled_source(&self) -> bool {
        matches!(
            self,
            Self::Switch { enabled: true } | Self::PowerSource { enabled: true }
        )
    }

    pub(crate) fn on_propagate_power(&mut self, value: bool) -> PowerResponse {
        match self {
            Self::Wire { powered } if *powered != value => {
                *powered = value;
                PowerResponse::Relay
            }
            Self::Wire { .. } => PowerResponse::Unchanged,
            Self::Switch { enabled } | Self::PowerSource { enabled } => {
                if *enabled && !value {
                    PowerResponse::Reassert
                } else {
                    PowerResponse::Unchanged
                }
            }
        }
    }

    pub(crate) const fn on_scan_for_source(&self) -> ScanResponse {
        match self {
            Self::Wire { .. } => ScanResponse::Relay,
            _ if self.is_enabled_source() => ScanResponse::Found,
            _ => ScanResponse::Ignore,
        }
    }
}

/// Runs the update behaviour of the element stored at `cell`.
///
/// Every element pushes its output onto the network. Wires and disabled
/// sources additionally scan for enabled sources still reachable through the
/// surviving wires. The returned sources (scan results together with sources
/// reached by a de-assertion) must be updated by the caller once it has
/// finished mutating the grid; see [`settle_sources`].
pub(crate) fn update_behaviour(
    grid: &mut Grid,
    cell: CellCoord,
    settlement: &mut Settlement,
) -> Vec<CellCoord> {
    let Some(element) = grid.element(cell).copied() else {
        return Vec::new();
    };

    let mut follow_up = propagation::propagate_power(grid, cell, element.output(), settlement);

    let needs_scan = match element {
        Element::Wire { .. } => true,
        Element::Switch { enabled } | Element::PowerSource { enabled } => !enabled,
    };
    if needs_scan {
        for source in propagation::scan_for_sources(grid, cell, settlement) {
            if !follow_up.contains(&source) {
                follow_up.push(source);
            }
        }
    }

    follow_up
}

/// Updates each pending source that is still present and enabled until no
/// further re-assertions are requested.
pub(crate) fn settle_sources(
    grid: &mut Grid,
    pending: Vec<CellCoord>,
    settlement: &mut Settlement,
) {
    let mut queue = std::collections::VecDeque::new();
    let mut queued = std::collections::BTreeSet::new();
    for cell in pending {
        if queued.insert(cell) {
            queue.push_back(cell);
        }
    }

    while let Some(cell) = queue.pop_front() {
        let _ = queued.remove(&cell);
        if !grid.element(cell).is_some_and(Element::is_enabled_source) {
            continue;
        }
        for next in update_behaviour(grid, cell, settlement) {
            if queued.insert(next) {
                queue.push_back(next);
            }
        }
    }
}
