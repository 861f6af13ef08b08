//! TOML session configuration.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use wiregrid_core::{ElementKind, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH};
use wiregrid_system_editor::Brush;

/// Brush names accepted by the config file, the command line and scripts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum BrushChoice {
    /// Paints nothing.
    #[default]
    Empty,
    /// Paints wires.
    Wire,
    /// Paints switches.
    Switch,
    /// Paints power sources.
    #[serde(alias = "source")]
    #[value(alias = "source")]
    PowerSource,
}

impl BrushChoice {
    /// Editor brush matching the choice.
    pub(crate) const fn brush(self) -> Brush {
        match self {
            Self::Empty => Brush::EMPTY,
            Self::Wire => Brush::new(ElementKind::Wire),
            Self::Switch => Brush::new(ElementKind::Switch),
            Self::PowerSource => Brush::new(ElementKind::PowerSource),
        }
    }
}

/// Initial state of an editing session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    /// Grid width in cells.
    pub(crate) width: u32,
    /// Grid height in cells.
    pub(crate) height: u32,
    /// Whether the session starts in debug mode.
    pub(crate) debug_mode: bool,
    /// Brush selected when the session starts.
    pub(crate) brush: BrushChoice,
    /// Layout transfer string loaded after the grid is configured.
    pub(crate) layout: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            debug_mode: false,
            brush: BrushChoice::Empty,
            layout: None,
        }
    }
}

impl SessionConfig {
    /// Reads and parses the session config stored at `path`.
    pub(crate) fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid session config at {}", path.display()))
    }

    /// Parses a session config from TOML text. Missing keys keep their defaults.
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse session config toml contents")
    }
}
