#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure grid editor system translating pointer input into world commands.

use wiregrid_core::{CellCoord, Command, ElementKind, ElementState, Event};

/// Element the editor paints onto empty cells; an empty brush paints nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Brush(Option<ElementKind>);

impl Brush {
    /// Brush that never places elements.
    pub const EMPTY: Self = Self(None);

    /// Creates a brush that paints the provided element kind.
    #[must_use]
    pub const fn new(kind: ElementKind) -> Self {
        Self(Some(kind))
    }

    /// Kind of element painted by the brush, if any.
    #[must_use]
    pub const fn kind(&self) -> Option<ElementKind> {
        self.0
    }
}

impl From<Option<ElementKind>> for Brush {
    fn from(kind: Option<ElementKind>) -> Self {
        Self(kind)
    }
}

/// Input snapshot distilled from adapter-provided pointer data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditorInput {
    /// Primary button went down on this frame.
    pub primary_pressed: bool,
    /// Primary button is held down.
    pub primary_held: bool,
    /// Secondary button is held down.
    pub secondary_held: bool,
    /// Cell currently under the pointer, if the pointer is over the grid.
    pub cursor_cell: Option<CellCoord>,
}

impl EditorInput {
    /// Input for a single primary click on `cell`.
    #[must_use]
    pub const fn click(cell: CellCoord) -> Self {
        Self {
            primary_pressed: true,
            primary_held: true,
            secondary_held: false,
            cursor_cell: Some(cell),
        }
    }

    /// Input for dragging the primary button across `cell`.
    #[must_use]
    pub const fn paint(cell: CellCoord) -> Self {
        Self {
            primary_pressed: false,
            primary_held: true,
            secondary_held: false,
            cursor_cell: Some(cell),
        }
    }

    /// Input for dragging the secondary button across `cell`.
    #[must_use]
    pub const fn erase(cell: CellCoord) -> Self {
        Self {
            primary_pressed: false,
            primary_held: false,
            secondary_held: true,
            cursor_cell: Some(cell),
        }
    }
}

/// Editor system that turns pointer gestures into edit commands.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    debug_mode: bool,
}

impl Editor {
    /// Creates a new editor system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self { debug_mode: false }
    }

    /// Reports whether the editor last observed debug mode as enabled.
    #[must_use]
    pub const fn is_debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Consumes world events and adapter-derived input to emit edit commands.
    ///
    /// The `element_at` closure should mirror the semantics of the world's
    /// `query::element_at` helper so the system can inspect the hovered cell.
    /// Erasing takes precedence over every primary-button gesture.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: EditorInput,
        brush: Brush,
        mut element_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(CellCoord) -> Option<ElementState>,
    {
        for event in events {
            if let Event::DebugModeChanged { enabled } = event {
                self.debug_mode = *enabled;
            }
        }

        let Some(cell) = input.cursor_cell else {
            return;
        };
        let hovered = element_at(cell);

        if input.secondary_held {
            if hovered.is_some() {
                out.push(Command::RemoveElement { cell });
            }
            return;
        }

        match hovered {
            Some(ElementState::Switch { .. }) if input.primary_pressed => {
                out.push(Command::ToggleSwitch { cell });
            }
            Some(ElementState::Wire { powered }) if input.primary_pressed && self.debug_mode => {
                out.push(Command::ForceWirePower {
                    cell,
                    powered: !powered,
                });
            }
            None if input.primary_held => {
                if let Some(kind) = brush.kind() {
                    out.push(Command::PlaceElement { cell, kind });
                }
            }
            _ => {}
        }
    }
}
