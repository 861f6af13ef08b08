//! Text rendering backend writing one glyph per cell.

use std::io::Write;

use anyhow::{Context, Result};
use wiregrid_core::ElementState;
use wiregrid_rendering::{CellPresentation, Color, Presentation, RenderingBackend};

/// Backend drawing scenes as text into any writer.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W> {
    out: W,
    color: bool,
}

impl<W: Write> TerminalBackend<W> {
    /// Creates a backend; `color` enables 24-bit ANSI escapes.
    pub(crate) const fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    fn cell(&self, cell: &CellPresentation, clear_color: Color) -> String {
        let glyph = glyph(cell.state);
        if !self.color {
            return glyph.to_string();
        }
        let fill = if cell.fill.is_transparent() {
            clear_color
        } else {
            cell.fill
        };
        let (red, green, blue) = fill.to_rgb_u8();
        format!("\x1b[38;2;{red};{green};{blue}m{glyph}\x1b[0m")
    }
}

/// Character drawn for a cell holding `state`.
const fn glyph(state: Option<ElementState>) -> char {
    match state {
        None => '.',
        Some(ElementState::Wire { powered: true }) => '#',
        Some(ElementState::Wire { powered: false }) => '-',
        Some(ElementState::Switch { enabled: true }) => 'S',
        Some(ElementState::Switch { enabled: false }) => 's',
        Some(ElementState::PowerSource { enabled: true }) => 'P',
        Some(ElementState::PowerSource { enabled: false }) => 'p',
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> Result<()> {
        let scene = &presentation.scene;
        let mut text = format!("{} ({}x{}", presentation.title, scene.columns, scene.rows);
        if scene.debug_mode {
            text.push_str(", debug");
        }
        text.push_str(")\n");
        for row in scene.rows() {
            for cell in row {
                text.push_str(&self.cell(cell, presentation.clear_color));
            }
            text.push('\n');
        }

        self.out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
            .context("failed to write scene to the terminal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiregrid_core::{CellCoord, ElementSnapshot, ElementView};
    use wiregrid_rendering::Scene;

    fn presentation(debug_mode: bool) -> Presentation {
        let view = ElementView::from_snapshots(vec![
            ElementSnapshot {
                cell: CellCoord::new(0, 0),
                state: ElementState::PowerSource { enabled: true },
            },
            ElementSnapshot {
                cell: CellCoord::new(1, 0),
                state: ElementState::Wire { powered: true },
            },
            ElementSnapshot {
                cell: CellCoord::new(1, 1),
                state: ElementState::Switch { enabled: false },
            },
        ]);
        Presentation::new(
            "wiregrid",
            Color::BLACK,
            Scene::new(3, 2, &view, debug_mode),
        )
    }

    #[test]
    fn plain_output_draws_one_glyph_per_cell() {
        let mut backend = TerminalBackend::new(Vec::new(), false);

        backend
            .present(&presentation(false))
            .expect("writing to a vector succeeds");

        let text = String::from_utf8(backend.out).expect("utf-8 output");
        assert_eq!(text, "wiregrid (3x2)\nP#.\n.s.\n");
    }

    #[test]
    fn colored_output_uses_palette() {
        let mut backend = TerminalBackend::new(Vec::new(), true);

        backend
            .present(&presentation(true))
            .expect("writing to a vector succeeds");

        let text = String::from_utf8(backend.out).expect("utf-8 output");
        assert!(text.starts_with("wiregrid (3x2, debug)\n"));
        assert!(text.contains("\x1b[38;2;255;51;51m#\x1b[0m"));
        assert!(text.contains("\x1b[38;2;0;0;0m.\x1b[0m"));
    }
}
