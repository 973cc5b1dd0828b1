//! Gesture scripts.
//!
//! A script is a JSON list of editor inputs replayed against an
//! [`EventRouter`]. It drives the engine headlessly, for reproducing bug
//! reports and for end-to-end tests.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use diagramkit_designer::{EventRouter, Modifiers, Point, RecordingSurface};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GestureScript {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<Step>,
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Tool { name: String },
    Down(PointerStep),
    Move(PointerStep),
    Up(PointerStep),
    /// Down, move and up at once.
    Drag {
        from: [f64; 2],
        to: [f64; 2],
        #[serde(default)]
        shift: bool,
    },
    Cancel,
    Undo,
    Redo,
    Delete,
    SelectAll,
    ClearSelection,
    Cycle,
    Nudge { dx: f64, dy: f64 },
    Zoom { zoom: f64 },
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerStep {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub ctrl: bool,
}

impl PointerStep {
    fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn modifiers(&self) -> Modifiers {
        Modifiers {
            shift: self.shift,
            alt: self.alt,
            ctrl: self.ctrl,
        }
    }
}

/// Counts gathered while replaying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScriptReport {
    pub steps: usize,
    pub commits: usize,
    /// Steps the editor refused, e.g. an unknown tool or an empty undo.
    pub rejected: usize,
}

impl GestureScript {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse script: {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replays every step. Refused steps are logged and counted, never fatal.
    pub fn run(&self, router: &mut EventRouter) -> ScriptReport {
        let mut report = ScriptReport::default();
        let mut surface = RecordingSurface::new();
        for (index, step) in self.steps.iter().enumerate() {
            report.steps += 1;
            let accepted = match step {
                Step::Tool { name } => match router.switch_tool(name) {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!("Step {}: {}", index, e);
                        false
                    }
                },
                Step::Down(s) => {
                    let outcome = router.pointer_down(s.point(), s.modifiers());
                    report.commits += outcome.committed as usize;
                    true
                }
                Step::Move(s) => {
                    let outcome = router.pointer_move(s.point(), s.modifiers());
                    report.commits += outcome.committed as usize;
                    true
                }
                Step::Up(s) => {
                    let outcome = router.pointer_up(s.point(), s.modifiers());
                    report.commits += outcome.committed as usize;
                    true
                }
                Step::Drag { from, to, shift } => {
                    let modifiers = Modifiers {
                        shift: *shift,
                        ..Modifiers::NONE
                    };
                    let (from, to) = (Point::new(from[0], from[1]), Point::new(to[0], to[1]));
                    for outcome in [
                        router.pointer_down(from, modifiers),
                        router.pointer_move(to, modifiers),
                        router.pointer_up(to, modifiers),
                    ] {
                        report.commits += outcome.committed as usize;
                    }
                    true
                }
                Step::Cancel => {
                    router.cancel();
                    true
                }
                Step::Undo => router.undo(),
                Step::Redo => router.redo(),
                Step::Delete => router.delete_selection(),
                Step::SelectAll => {
                    router.select_all();
                    true
                }
                Step::ClearSelection => {
                    router.clear_selection();
                    true
                }
                Step::Cycle => router.cycle_selection().is_some(),
                Step::Nudge { dx, dy } => router.nudge_selection(*dx, *dy),
                Step::Zoom { zoom } => {
                    router.set_zoom(*zoom);
                    true
                }
                Step::Render => {
                    surface.clear();
                    router.render(&mut surface);
                    true
                }
            };
            if !accepted {
                tracing::debug!("Step {} ({:?}) had no effect", index, step);
                report.rejected += 1;
            }
        }
        report
    }
}
