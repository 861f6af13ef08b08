//! Interactive editing session wiring the world, the editor and a backend.

use std::io::Write;

use anyhow::{Context, Result};
use log::{debug, warn};
use wiregrid_core::{CellCoord, Command, Event};
use wiregrid_rendering::{Color, Presentation, RenderingBackend, Scene};
use wiregrid_system_editor::{Brush, Editor, EditorInput};
use wiregrid_world::{self as world, query, World};

use crate::{config::SessionConfig, layout_transfer, script::ScriptStep};

const TITLE: &str = "wiregrid";

/// World plus the editor state driving it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    editor: Editor,
    brush: Brush,
}

impl Session {
    /// Boots a session from its configuration.
    pub(crate) fn new(config: &SessionConfig) -> Result<Self> {
        let mut session = Self {
            world: World::new(),
            editor: Editor::new(),
            brush: config.brush.brush(),
        };
        session.apply(Command::ConfigureGrid {
            width: config.width,
            height: config.height,
        });
        if let Some(encoded) = &config.layout {
            let layout = layout_transfer::decode(encoded)
                .context("failed to decode the configured layout")?;
            session.apply(Command::LoadLayout { layout });
        }
        session.apply(Command::SetDebugMode {
            enabled: config.debug_mode,
        });
        Ok(session)
    }

    /// Runs a single scripted step, writing exported layouts to `out`.
    pub(crate) fn run_step(
        &mut self,
        step: ScriptStep,
        backend: &mut impl RenderingBackend,
        out: &mut impl Write,
    ) -> Result<()> {
        match step {
            ScriptStep::Brush(choice) => self.brush = choice.brush(),
            ScriptStep::Click(cell) => self.gesture(EditorInput::click(cell)),
            ScriptStep::Paint(cell) => self.gesture(EditorInput::paint(cell)),
            ScriptStep::Erase(cell) => self.gesture(EditorInput::erase(cell)),
            ScriptStep::Place(cell, kind) => self.apply(Command::PlaceElement { cell, kind }),
            ScriptStep::Remove(cell) => self.apply(Command::RemoveElement { cell }),
            ScriptStep::Toggle(cell) => self.apply(Command::ToggleSwitch { cell }),
            ScriptStep::Force(cell, powered) => {
                self.apply(Command::ForceWirePower { cell, powered });
            }
            ScriptStep::Debug(enabled) => self.apply(Command::SetDebugMode { enabled }),
            ScriptStep::Resize(width, height) => {
                self.apply(Command::ConfigureGrid { width, height });
            }
            ScriptStep::Clear => self.apply(Command::ClearGrid),
            ScriptStep::Show => backend.present(&self.presentation())?,
            ScriptStep::Export => {
                let encoded = layout_transfer::encode(&query::layout(&self.world))
                    .context("failed to encode the current layout")?;
                writeln!(out, "{encoded}").context("failed to write exported layout")?;
            }
            ScriptStep::Import(encoded) => {
                let layout = layout_transfer::decode(&encoded)
                    .context("failed to decode the imported layout")?;
                self.apply(Command::LoadLayout { layout });
            }
        }
        Ok(())
    }

    /// Presentation of the current world state.
    pub(crate) fn presentation(&self) -> Presentation {
        let (columns, rows) = query::dimensions(&self.world);
        let scene = Scene::new(
            columns,
            rows,
            &query::element_view(&self.world),
            query::is_debug_mode(&self.world),
        );
        Presentation::new(TITLE, Color::from_rgb_u8(32, 32, 32), scene)
    }

    fn gesture(&mut self, input: EditorInput) {
        let mut commands = Vec::new();
        let world = &self.world;
        self.editor.handle(
            &[],
            input,
            self.brush,
            |cell: CellCoord| query::element_at(world, cell),
            &mut commands,
        );
        for command in commands {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        for event in &events {
            log_event(event);
        }
        // The editor only reacts to events; with no cursor it emits nothing.
        let mut ignored = Vec::new();
        self.editor.handle(
            &events,
            EditorInput::default(),
            self.brush,
            |_| None,
            &mut ignored,
        );
    }
}

fn log_event(event: &Event) {
    match event {
        Event::PlacementRejected { cell, kind, reason } => warn!(
            "cannot place {kind:?} at ({}, {}): {reason:?}",
            cell.column(),
            cell.row()
        ),
        Event::RemovalRejected { cell, reason } => warn!(
            "cannot remove element at ({}, {}): {reason:?}",
            cell.column(),
            cell.row()
        ),
        Event::InteractionRejected { cell, reason } => warn!(
            "cannot interact with ({}, {}): {reason:?}",
            cell.column(),
            cell.row()
        ),
        other => debug!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiregrid_core::{ElementKind, ElementState};

    struct Recorder(Vec<Presentation>);

    impl RenderingBackend for Recorder {
        fn present(&mut self, presentation: &Presentation) -> Result<()> {
            self.0.push(presentation.clone());
            Ok(())
        }
    }

    fn run(session: &mut Session, steps: Vec<ScriptStep>) -> (Vec<Presentation>, String) {
        let mut recorder = Recorder(Vec::new());
        let mut out = Vec::new();
        for step in steps {
            session
                .run_step(step, &mut recorder, &mut out)
                .expect("step succeeds");
        }
        (recorder.0, String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn session_applies_configuration() {
        let session = Session::new(&SessionConfig {
            width: 5,
            height: 2,
            debug_mode: true,
            ..SessionConfig::default()
        })
        .expect("session boots");

        assert_eq!(query::dimensions(&session.world), (5, 2));
        assert!(query::is_debug_mode(&session.world));
    }

    #[test]
    fn painting_and_clicking_power_a_line() {
        let mut session = Session::new(&SessionConfig::default()).expect("session boots");

        let (shown, _) = run(
            &mut session,
            vec![
                ScriptStep::Brush(crate::config::BrushChoice::Switch),
                ScriptStep::Paint(CellCoord::new(0, 0)),
                ScriptStep::Brush(crate::config::BrushChoice::Wire),
                ScriptStep::Paint(CellCoord::new(1, 0)),
                ScriptStep::Paint(CellCoord::new(2, 0)),
                ScriptStep::Click(CellCoord::new(0, 0)),
                ScriptStep::Show,
            ],
        );

        assert_eq!(shown.len(), 1);
        assert_eq!(
            shown[0]
                .scene
                .cell(CellCoord::new(2, 0))
                .and_then(|cell| cell.state),
            Some(ElementState::Wire { powered: true })
        );
    }

    #[test]
    fn debug_clicks_reach_the_editor() {
        let mut session = Session::new(&SessionConfig::default()).expect("session boots");

        let _ = run(
            &mut session,
            vec![
                ScriptStep::Place(CellCoord::new(1, 1), ElementKind::Wire),
                ScriptStep::Debug(true),
                ScriptStep::Click(CellCoord::new(1, 1)),
            ],
        );

        assert_eq!(
            query::element_at(&session.world, CellCoord::new(1, 1)),
            Some(ElementState::Wire { powered: true })
        );
    }

    #[test]
    fn editor_tracks_debug_mode_without_a_gesture() {
        let mut session = Session::new(&SessionConfig::default()).expect("session boots");
        assert!(!session.editor.is_debug_mode());

        for _ in 0..3 {
            let _ = run(
                &mut session,
                vec![ScriptStep::Debug(true), ScriptStep::Debug(false)],
            );
        }
        let _ = run(&mut session, vec![ScriptStep::Debug(true)]);

        assert!(session.editor.is_debug_mode());
        assert!(query::is_debug_mode(&session.world));
    }

    #[test]
    fn export_then_import_restores_layout() {
        let mut session = Session::new(&SessionConfig::default()).expect("session boots");
        let (_, exported) = run(
            &mut session,
            vec![
                ScriptStep::Place(CellCoord::new(0, 0), ElementKind::PowerSource),
                ScriptStep::Place(CellCoord::new(0, 1), ElementKind::Wire),
                ScriptStep::Export,
            ],
        );
        assert!(exported.starts_with("wiregrid:v1:3x3:"));

        let _ = run(
            &mut session,
            vec![
                ScriptStep::Clear,
                ScriptStep::Import(exported.trim().to_owned()),
            ],
        );

        assert_eq!(
            query::element_at(&session.world, CellCoord::new(0, 1)),
            Some(ElementState::Wire { powered: true })
        );
    }

    #[test]
    fn configured_layout_must_decode() {
        let error = Session::new(&SessionConfig {
            layout: Some("not a layout".to_owned()),
            ..SessionConfig::default()
        })
        .expect_err("invalid layout");

        assert!(error.to_string().contains("configured layout"));
    }
}
