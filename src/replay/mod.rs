//! Scripted replay of host events through a [`ZoomSurfaceController`].
//!
//! A scenario is a JSON document with the widget config, image sources, an
//! initial layout and an ordered list of steps. Each step produces one
//! [`Frame`] describing the machine and the view after it ran.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, MoveType, ZoomConfig};
use crate::geometry::{Point, Position, Size};
use crate::presentation::{FigureView, ImageSources};
use crate::state::{LayoutSnapshot, MoveEventKind, StateKind, ZoomEvent};
use crate::surface::{SurfaceHost, ZoomSurfaceController};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid scenario json: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid scenario settings: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to write frame: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write frame: {0}")]
    Output(#[source] io::Error),
}

pub type ScenarioResult<T> = std::result::Result<T, ScenarioError>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: Option<ZoomConfig>,
    pub sources: ImageSources,
    pub layout: LayoutSnapshot,
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    PointerEnter { x: f64, y: f64 },
    TouchStart,
    Click { x: f64, y: f64 },
    ZoomImageLoaded { width: f64, height: f64 },
    PointerMove { x: f64, y: f64 },
    DragStart { x: f64, y: f64 },
    DragMove { x: f64, y: f64 },
    DragEnd { x: f64, y: f64 },
    PointerLeave { x: f64, y: f64 },
    Close,
    Advance { ms: u64 },
    Relayout { layout: LayoutSnapshot },
}

impl ScenarioStep {
    fn event(self) -> Option<ZoomEvent> {
        let event = match self {
            Self::PointerEnter { x, y } => ZoomEvent::PointerEnter { at: Point::new(x, y) },
            Self::TouchStart => ZoomEvent::TouchStart,
            Self::Click { x, y } => ZoomEvent::Click { at: Point::new(x, y) },
            Self::ZoomImageLoaded { width, height } => ZoomEvent::ZoomImageLoaded {
                rendered: Size::new(width, height),
            },
            Self::PointerMove { x, y } => ZoomEvent::PointerMove { at: Point::new(x, y) },
            Self::DragStart { x, y } => ZoomEvent::DragStart { at: Point::new(x, y) },
            Self::DragMove { x, y } => ZoomEvent::DragMove { at: Point::new(x, y) },
            Self::DragEnd { x, y } => ZoomEvent::DragEnd { at: Point::new(x, y) },
            Self::PointerLeave { x, y } => ZoomEvent::PointerLeave { at: Point::new(x, y) },
            Self::Close | Self::Advance { .. } | Self::Relayout { .. } => return None,
        };
        Some(event)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    ApplyPosition { left: f64, top: f64 },
    AttachMoveListener { event: &'static str },
    DetachMoveListener { event: &'static str },
    AfterZoomIn,
    AfterZoomOut,
}

/// Host that records every command instead of touching a real surface.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    layout: LayoutSnapshot,
    calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn new(layout: LayoutSnapshot) -> Self {
        Self {
            layout,
            calls: Vec::new(),
        }
    }

    pub fn set_layout(&mut self, layout: LayoutSnapshot) {
        self.layout = layout;
    }

    pub fn drain_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }
}

impl SurfaceHost for RecordingHost {
    fn layout(&self) -> LayoutSnapshot {
        self.layout
    }

    fn apply_position(&mut self, position: Position) {
        self.calls.push(HostCall::ApplyPosition {
            left: position.left,
            top: position.top,
        });
    }

    fn attach_move_listener(&mut self, kind: MoveEventKind) {
        self.calls.push(HostCall::AttachMoveListener {
            event: kind.dom_name(),
        });
    }

    fn detach_move_listener(&mut self, kind: MoveEventKind) {
        self.calls.push(HostCall::DetachMoveListener {
            event: kind.dom_name(),
        });
    }

    fn after_zoom_in(&mut self) {
        self.calls.push(HostCall::AfterZoomIn);
    }

    fn after_zoom_out(&mut self) {
        self.calls.push(HostCall::AfterZoomOut);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub step: usize,
    pub elapsed_ms: u64,
    pub handled: bool,
    pub state: StateKind,
    pub zoomed: bool,
    pub touch: bool,
    pub fullscreen: bool,
    pub dragging: bool,
    pub move_type: MoveType,
    pub position: Position,
    pub host_calls: Vec<HostCall>,
    pub view: FigureView,
}

pub fn parse_scenario(json: &str) -> ScenarioResult<Scenario> {
    let scenario: Scenario = serde_json::from_str(json).map_err(ScenarioError::Parse)?;
    if let Some(config) = &scenario.config {
        config.validate()?;
    }
    scenario.sources.validate()?;
    Ok(scenario)
}

pub fn load_scenario(path: &Path) -> ScenarioResult<Scenario> {
    let json = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scenario(&json)
}

/// Runs every step on a virtual clock starting at `Instant::now()`.
///
/// `fallback_config` applies when the scenario carries no config of its own.
pub fn replay(scenario: &Scenario, fallback_config: ZoomConfig) -> Vec<Frame> {
    let config = scenario.config.clone().unwrap_or(fallback_config);
    let mut controller =
        ZoomSurfaceController::new(config, RecordingHost::new(scenario.layout));
    let start = Instant::now();
    let mut elapsed = Duration::ZERO;
    let mut frames = Vec::with_capacity(scenario.steps.len());

    for (index, step) in scenario.steps.iter().enumerate() {
        let now = start + elapsed;
        controller.tick(now);
        let handled = match *step {
            ScenarioStep::Advance { ms } => {
                elapsed += Duration::from_millis(ms);
                controller.tick(start + elapsed);
                true
            }
            ScenarioStep::Relayout { layout } => {
                controller.host_mut().set_layout(layout);
                true
            }
            ScenarioStep::Close => controller.close(now).is_some(),
            other => other
                .event()
                .is_some_and(|event| controller.handle(event, now).is_some()),
        };
        if !handled {
            tracing::debug!(step = index, ?step, "step had no effect on the widget");
        }

        let machine = controller.machine();
        let frame = Frame {
            step: index,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            handled,
            state: machine.kind(),
            zoomed: machine.is_zoomed(),
            touch: machine.is_touch(),
            fullscreen: machine.is_fullscreen(),
            dragging: machine.is_dragging(),
            move_type: machine.move_type(),
            position: machine.position(),
            host_calls: Vec::new(),
            view: FigureView::build(&controller, &scenario.sources),
        };
        let host_calls = controller.host_mut().drain_calls();
        frames.push(Frame { host_calls, ..frame });
    }

    frames
}

/// Writes frames as JSON lines.
pub fn write_frames<W: Write>(mut writer: W, frames: &[Frame]) -> ScenarioResult<()> {
    for frame in frames {
        serde_json::to_writer(&mut writer, frame).map_err(ScenarioError::Encode)?;
        writeln!(writer).map_err(ScenarioError::Output)?;
    }
    writer.flush().map_err(ScenarioError::Output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAN_SCENARIO: &str = include_str!("../../demos/pan.json");
    const TOUCH_SCENARIO: &str = include_str!("../../demos/touch_fullscreen.json");

    fn count_calls(frames: &[Frame], call: &HostCall) -> usize {
        frames
            .iter()
            .flat_map(|frame| frame.host_calls.iter())
            .filter(|c| *c == call)
            .count()
    }

    #[test]
    fn pan_demo_zooms_once_and_tracks_pointer() {
        let scenario = parse_scenario(PAN_SCENARIO).expect("pan demo should parse");
        let frames = replay(&scenario, ZoomConfig::default());

        assert_eq!(frames.len(), scenario.steps.len());
        assert_eq!(count_calls(&frames, &HostCall::AfterZoomIn), 1);

        let zoomed = frames
            .iter()
            .find(|frame| frame.zoomed)
            .expect("a frame should be zoomed");
        assert_eq!(zoomed.state, StateKind::ZoomedPan);
        assert_eq!(zoomed.position, Position::new(-50.0, -50.0));

        let last = frames.last().expect("frames");
        assert_eq!(last.state, StateKind::Idle);
        assert_eq!(count_calls(&frames, &HostCall::AfterZoomOut), 1);
        assert!(last.view.zoom_image.is_none());
    }

    #[test]
    fn touch_demo_runs_fullscreen_drag_and_closes() {
        let scenario = parse_scenario(TOUCH_SCENARIO).expect("touch demo should parse");
        let frames = replay(&scenario, ZoomConfig::default());

        assert!(frames
            .iter()
            .any(|frame| frame.state == StateKind::ZoomedFullscreenDrag));
        let attaches = count_calls(&frames, &HostCall::AttachMoveListener { event: "touchmove" });
        let detaches = count_calls(&frames, &HostCall::DetachMoveListener { event: "touchmove" });
        assert_eq!(attaches, detaches);
        assert!(attaches >= 1);

        for frame in frames.iter().filter(|frame| frame.zoomed) {
            assert!(frame.position.left <= 0.0);
            assert!(frame.position.top <= 0.0);
        }

        let last = frames.last().expect("frames");
        assert_eq!(last.state, StateKind::Idle);
        assert!(!last.touch);
        assert_eq!(last.move_type, MoveType::Pan);
    }

    #[test]
    fn steps_that_do_not_apply_are_reported_unhandled() {
        let json = r#"{
            "sources": {"src": "/a.jpg"},
            "layout": {
                "element": {"width": 100, "height": 100, "left": 0, "top": 0},
                "viewport": {"width": 1024, "height": 768}
            },
            "steps": [
                {"type": "drag_move", "x": 1, "y": 1},
                {"type": "close"}
            ]
        }"#;
        let scenario = parse_scenario(json).expect("scenario should parse");
        let frames = replay(&scenario, ZoomConfig::default());

        assert!(frames.iter().all(|frame| !frame.handled));
        assert!(frames.iter().all(|frame| frame.state == StateKind::Idle));
    }

    #[test]
    fn parse_rejects_missing_source_and_bad_config() {
        let missing_src = r#"{
            "sources": {"src": ""},
            "layout": {"element": {"width": 1, "height": 1, "left": 0, "top": 0},
                       "viewport": {"width": 1, "height": 1}},
            "steps": []
        }"#;
        assert!(matches!(
            parse_scenario(missing_src),
            Err(ScenarioError::Config(ConfigError::MissingSource))
        ));

        let bad_scale = r#"{
            "config": {"zoom_scale": -1},
            "sources": {"src": "/a.jpg"},
            "layout": {"element": {"width": 1, "height": 1, "left": 0, "top": 0},
                       "viewport": {"width": 1, "height": 1}},
            "steps": []
        }"#;
        assert!(matches!(
            parse_scenario(bad_scale),
            Err(ScenarioError::Config(ConfigError::InvalidZoomScale(_)))
        ));

        assert!(matches!(
            parse_scenario("{not json"),
            Err(ScenarioError::Parse(_))
        ));
    }

    #[test]
    fn write_frames_emits_one_json_line_per_frame() {
        let scenario = parse_scenario(PAN_SCENARIO).expect("pan demo should parse");
        let frames = replay(&scenario, ZoomConfig::default());
        let mut buffer = Vec::new();

        write_frames(&mut buffer, &frames).expect("writing to memory should succeed");

        let text = String::from_utf8(buffer).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), frames.len());
        let first: serde_json::Value = serde_json::from_str(lines[0]).expect("json line");
        assert_eq!(first["step"], 0);
        assert_eq!(first["state"], "active-not-zoomed");
    }
}
