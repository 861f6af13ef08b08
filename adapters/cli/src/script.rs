//! Line-oriented edit scripts replayed against a session.
//!
//! Each non-blank line holds one step; `#` starts a comment. Coordinates are
//! `column row`, zero-based.

use clap::ValueEnum;
use thiserror::Error;
use wiregrid_core::{CellCoord, ElementKind};

use crate::config::BrushChoice;

/// Single scripted action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScriptStep {
    /// Selects the brush used by `paint` and `click`.
    Brush(BrushChoice),
    /// Presses and releases the primary button over a cell.
    Click(CellCoord),
    /// Drags the primary button across a cell.
    Paint(CellCoord),
    /// Drags the secondary button across a cell.
    Erase(CellCoord),
    /// Places an element directly, bypassing the editor.
    Place(CellCoord, ElementKind),
    /// Removes an element directly, bypassing the editor.
    Remove(CellCoord),
    /// Toggles a switch directly, bypassing the editor.
    Toggle(CellCoord),
    /// Forces a wire's power; requires debug mode.
    Force(CellCoord, bool),
    /// Turns debug mode on or off.
    Debug(bool),
    /// Rebuilds an empty grid of the given size.
    Resize(u32, u32),
    /// Empties every cell.
    Clear,
    /// Presents the current scene.
    Show,
    /// Prints the layout as a transfer string.
    Export,
    /// Loads a layout from a transfer string.
    Import(String),
}

/// Errors raised while parsing an edit script.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The first word of a line is not a known step.
    #[error("line {line}: unknown step `{word}`")]
    UnknownStep {
        /// One-based line number.
        line: usize,
        /// Offending word.
        word: String,
    },
    /// A step was given too few arguments.
    #[error("line {line}: `{step}` expects {expected}")]
    MissingArgument {
        /// One-based line number.
        line: usize,
        /// Step being parsed.
        step: &'static str,
        /// Description of the expected arguments.
        expected: &'static str,
    },
    /// A step was given more arguments than it accepts.
    #[error("line {line}: unexpected argument `{argument}`")]
    TrailingArgument {
        /// One-based line number.
        line: usize,
        /// First surplus argument.
        argument: String,
    },
    /// An argument could not be parsed.
    #[error("line {line}: invalid {what} `{value}`")]
    InvalidArgument {
        /// One-based line number.
        line: usize,
        /// Kind of value that was expected.
        what: &'static str,
        /// Offending text.
        value: String,
    },
}

/// Parses a complete script, stopping at the first malformed line.
pub(crate) fn parse(source: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        steps.push(parse_line(index + 1, text)?);
    }
    Ok(steps)
}

struct Arguments<'a> {
    line: usize,
    step: &'static str,
    expected: &'static str,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Arguments<'a> {
    fn next(&mut self) -> Result<&'a str, ScriptError> {
        self.words.next().ok_or(ScriptError::MissingArgument {
            line: self.line,
            step: self.step,
            expected: self.expected,
        })
    }

    fn number(&mut self) -> Result<u32, ScriptError> {
        let word = self.next()?;
        word.parse().map_err(|_| self.invalid("number", word))
    }

    fn cell(&mut self) -> Result<CellCoord, ScriptError> {
        let column = self.number()?;
        let row = self.number()?;
        Ok(CellCoord::new(column, row))
    }

    fn switch(&mut self) -> Result<bool, ScriptError> {
        match self.next()? {
            "on" => Ok(true),
            "off" => Ok(false),
            other => Err(self.invalid("on/off value", other)),
        }
    }

    fn brush(&mut self) -> Result<BrushChoice, ScriptError> {
        let word = self.next()?;
        BrushChoice::from_str(word, true).map_err(|_| self.invalid("brush", word))
    }

    fn kind(&mut self) -> Result<ElementKind, ScriptError> {
        let word = self.next()?;
        BrushChoice::from_str(word, true)
            .ok()
            .and_then(|choice| choice.brush().kind())
            .ok_or_else(|| self.invalid("element", word))
    }

    fn invalid(&self, what: &'static str, value: &str) -> ScriptError {
        ScriptError::InvalidArgument {
            line: self.line,
            what,
            value: value.to_owned(),
        }
    }

    fn finish(mut self, step: ScriptStep) -> Result<ScriptStep, ScriptError> {
        match self.words.next() {
            Some(argument) => Err(ScriptError::TrailingArgument {
                line: self.line,
                argument: argument.to_owned(),
            }),
            None => Ok(step),
        }
    }
}

fn parse_line(line: usize, text: &str) -> Result<ScriptStep, ScriptError> {
    let mut words = text.split_whitespace();
    let word = words.next().unwrap_or_default();
    let (step, expected): (&'static str, &'static str) = match word {
        "brush" => ("brush", "a brush name"),
        "click" => ("click", "a column and a row"),
        "paint" => ("paint", "a column and a row"),
        "erase" => ("erase", "a column and a row"),
        "place" => ("place", "a column, a row and an element"),
        "remove" => ("remove", "a column and a row"),
        "toggle" => ("toggle", "a column and a row"),
        "force" => ("force", "a column, a row and on/off"),
        "debug" => ("debug", "on/off"),
        "resize" => ("resize", "a width and a height"),
        "clear" => ("clear", "no arguments"),
        "show" => ("show", "no arguments"),
        "export" => ("export", "no arguments"),
        "import" => ("import", "a layout string"),
        other => {
            return Err(ScriptError::UnknownStep {
                line,
                word: other.to_owned(),
            })
        }
    };
    let mut args = Arguments {
        line,
        step,
        expected,
        words,
    };

    let parsed = match step {
        "brush" => ScriptStep::Brush(args.brush()?),
        "click" => ScriptStep::Click(args.cell()?),
        "paint" => ScriptStep::Paint(args.cell()?),
        "erase" => ScriptStep::Erase(args.cell()?),
        "place" => {
            let cell = args.cell()?;
            ScriptStep::Place(cell, args.kind()?)
        }
        "remove" => ScriptStep::Remove(args.cell()?),
        "toggle" => ScriptStep::Toggle(args.cell()?),
        "force" => {
            let cell = args.cell()?;
            ScriptStep::Force(cell, args.switch()?)
        }
        "debug" => ScriptStep::Debug(args.switch()?),
        "resize" => {
            let width = args.number()?;
            ScriptStep::Resize(width, args.number()?)
        }
        "clear" => ScriptStep::Clear,
        "show" => ScriptStep::Show,
        "export" => ScriptStep::Export,
        _ => ScriptStep::Import(args.next()?.to_owned()),
    };
    args.finish(parsed)
}
