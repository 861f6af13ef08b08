#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Wiregrid adapters.

use anyhow::Result as AnyResult;
use wiregrid_core::{CellCoord, ElementState, ElementView};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque mid gray.
    pub const GRAY: Self = Self::new(0.5, 0.5, 0.5, 1.0);
    /// Opaque magenta.
    pub const MAGENTA: Self = Self::new(1.0, 0.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Quantises the color channels to bytes, ignoring alpha.
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        (
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        )
    }

    /// Reports whether the color draws nothing.
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.alpha <= 0.0
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    // Clamped to 0..=255 before the cast.
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Fill color of a cell holding `state`, or of an empty cell.
#[must_use]
pub fn appearance(state: Option<ElementState>) -> Color {
    match state {
        None => Color::TRANSPARENT,
        Some(ElementState::Wire { powered: true }) => Color::new(1.0, 0.2, 0.2, 1.0),
        Some(ElementState::Wire { powered: false }) => Color::new(0.5, 0.0, 0.0, 1.0),
        Some(ElementState::Switch { enabled: true }) => Color::WHITE,
        Some(ElementState::Switch { enabled: false }) => Color::BLACK,
        Some(ElementState::PowerSource { enabled: true }) => Color::GRAY,
        Some(ElementState::PowerSource { enabled: false }) => Color::MAGENTA,
    }
}

/// Presentation of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPresentation {
    /// Coordinates of the presented cell.
    pub cell: CellCoord,
    /// Element held by the cell, if any.
    pub state: Option<ElementState>,
    /// Fill color derived from the element state.
    pub fill: Color,
}

impl CellPresentation {
    /// Creates a cell presentation, deriving the fill from the palette.
    #[must_use]
    pub fn new(cell: CellCoord, state: Option<ElementState>) -> Self {
        Self {
            cell,
            state,
            fill: appearance(state),
        }
    }
}

/// Scene description covering every cell of the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Every cell in row-major order, empty cells included.
    pub cells: Vec<CellPresentation>,
    /// Whether the world accepts debug edits.
    pub debug_mode: bool,
}

impl Scene {
    /// Builds a scene from a read-only element view.
    ///
    /// Snapshots outside `columns` x `rows` are not presented.
    #[must_use]
    pub fn new(columns: u32, rows: u32, view: &ElementView, debug_mode: bool) -> Self {
        let mut cells = Vec::new();
        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                let state = view.at(cell).map(|snapshot| snapshot.state);
                cells.push(CellPresentation::new(cell, state));
            }
        }

        Self {
            columns,
            rows,
            cells,
            debug_mode,
        }
    }

    /// Presentation of `cell`, if it lies within the scene.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<&CellPresentation> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let index = u64::from(cell.row()) * u64::from(self.columns) + u64::from(cell.column());
        self.cells.get(usize::try_from(index).ok()?)
    }

    /// Iterates over the scene one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[CellPresentation]> {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX).max(1);
        self.cells.chunks(width)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown above the scene.
    pub title: String,
    /// Solid color used behind transparent cells.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Wiregrid scenes.
pub trait RenderingBackend {
    /// Draws a single presentation.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}
