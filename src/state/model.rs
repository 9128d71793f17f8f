use std::fmt;

use serde::{Deserialize, Serialize};

use super::event::MoveEventKind;
use super::pending::PendingSlot;
use crate::config::MoveType;
use crate::geometry::{OffsetOrigin, Point, Position, ScaleRatios, Size, ViewportBounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateKind {
    Idle,
    ActiveNotZoomed,
    ZoomedPan,
    ZoomedDrag,
    ZoomedFullscreenDrag,
}

impl StateKind {
    pub const fn is_zoomed(self) -> bool {
        matches!(
            self,
            Self::ZoomedPan | Self::ZoomedDrag | Self::ZoomedFullscreenDrag
        )
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ActiveNotZoomed => "active-not-zoomed",
            Self::ZoomedPan => "zoomed-pan",
            Self::ZoomedDrag => "zoomed-drag",
            Self::ZoomedFullscreenDrag => "zoomed-fullscreen-drag",
        };
        f.write_str(name)
    }
}

/// Where input comes from. Fullscreen is only representable for touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Pointer,
    Touch {
        fullscreen: bool,
    },
}

impl InputMode {
    pub const fn is_touch(self) -> bool {
        matches!(self, Self::Touch { .. })
    }

    pub const fn is_fullscreen(self) -> bool {
        matches!(self, Self::Touch { fullscreen: true })
    }

    pub const fn move_event(self) -> MoveEventKind {
        match self {
            Self::Pointer => MoveEventKind::MouseMove,
            Self::Touch { .. } => MoveEventKind::TouchMove,
        }
    }

    /// Touch always drags; pointers follow the configured move type.
    pub const fn effective_move_type(self, configured: MoveType) -> MoveType {
        match self {
            Self::Pointer => configured,
            Self::Touch { .. } => MoveType::Drag,
        }
    }
}

/// Host measurements taken when an event is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Bounding client rect of the base image.
    pub element: ViewportBounds,
    pub viewport: Size,
    /// Page scroll offset.
    #[serde(default)]
    pub scroll: Point,
}

/// Zoom image facts established by its load event. Bounds and ratios are
/// measured at zoom-in, from the layout current at that moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomImageMetrics {
    /// Rendered size after `zoom_scale`.
    pub size: Size,
}

/// `active-not-zoomed` data: the surface may be mounted, a zoom-in may be queued.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Standby {
    pub input: InputMode,
    pub zoom_image: Option<ZoomImageMetrics>,
    pub pending_zoom_in: PendingSlot<Point>,
    /// Last position of the session that just ended, kept for the fade-out.
    pub outgoing: Position,
}

impl Standby {
    pub fn new(input: InputMode) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }
}

/// Drag in progress: the move listener is attached while this exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGrip {
    pub start: Point,
}

/// Geometry owned by one zoomed gesture, from zoom-in to reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub input: InputMode,
    pub zoom_image: ZoomImageMetrics,
    pub bounds: ViewportBounds,
    pub ratios: ScaleRatios,
    pub origin: OffsetOrigin,
    pub position: Position,
    pub grip: Option<DragGrip>,
    /// Last pointer drag moved past the click threshold.
    pub dragged: bool,
}

impl GestureSession {
    pub(crate) fn into_standby(self) -> Standby {
        Standby {
            input: self.input,
            zoom_image: Some(self.zoom_image),
            pending_zoom_in: PendingSlot::new(),
            outgoing: self.position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    ActiveNotZoomed(Standby),
    ZoomedPan(GestureSession),
    ZoomedDrag(GestureSession),
    ZoomedFullscreenDrag(GestureSession),
}

impl InteractionState {
    pub const fn kind(&self) -> StateKind {
        match self {
            Self::Idle => StateKind::Idle,
            Self::ActiveNotZoomed(_) => StateKind::ActiveNotZoomed,
            Self::ZoomedPan(_) => StateKind::ZoomedPan,
            Self::ZoomedDrag(_) => StateKind::ZoomedDrag,
            Self::ZoomedFullscreenDrag(_) => StateKind::ZoomedFullscreenDrag,
        }
    }

    pub fn session(&self) -> Option<&GestureSession> {
        match self {
            Self::ZoomedPan(session)
            | Self::ZoomedDrag(session)
            | Self::ZoomedFullscreenDrag(session) => Some(session),
            Self::Idle | Self::ActiveNotZoomed(_) => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut GestureSession> {
        match self {
            Self::ZoomedPan(session)
            | Self::ZoomedDrag(session)
            | Self::ZoomedFullscreenDrag(session) => Some(session),
            Self::Idle | Self::ActiveNotZoomed(_) => None,
        }
    }

    pub fn standby(&self) -> Option<&Standby> {
        match self {
            Self::ActiveNotZoomed(standby) => Some(standby),
            _ => None,
        }
    }

    pub fn input(&self) -> Option<InputMode> {
        match self {
            Self::Idle => None,
            Self::ActiveNotZoomed(standby) => Some(standby.input),
            Self::ZoomedPan(session)
            | Self::ZoomedDrag(session)
            | Self::ZoomedFullscreenDrag(session) => Some(session.input),
        }
    }

    pub fn zoom_image(&self) -> Option<ZoomImageMetrics> {
        match self {
            Self::Idle => None,
            Self::ActiveNotZoomed(standby) => standby.zoom_image,
            Self::ZoomedPan(session)
            | Self::ZoomedDrag(session)
            | Self::ZoomedFullscreenDrag(session) => Some(session.zoom_image),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Self::Idle => Position::default(),
            Self::ActiveNotZoomed(standby) => standby.outgoing,
            Self::ZoomedPan(session)
            | Self::ZoomedDrag(session)
            | Self::ZoomedFullscreenDrag(session) => session.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_input_always_drags() {
        assert_eq!(
            InputMode::Touch { fullscreen: false }.effective_move_type(MoveType::Pan),
            MoveType::Drag
        );
        assert_eq!(
            InputMode::Pointer.effective_move_type(MoveType::Pan),
            MoveType::Pan
        );
        assert_eq!(
            InputMode::Pointer.effective_move_type(MoveType::Drag),
            MoveType::Drag
        );
    }

    #[test]
    fn fullscreen_requires_touch() {
        assert!(!InputMode::Pointer.is_fullscreen());
        assert!(!InputMode::Touch { fullscreen: false }.is_fullscreen());
        assert!(InputMode::Touch { fullscreen: true }.is_fullscreen());
        assert_eq!(InputMode::Pointer.move_event(), MoveEventKind::MouseMove);
        assert_eq!(
            InputMode::Touch { fullscreen: true }.move_event(),
            MoveEventKind::TouchMove
        );
    }

    #[test]
    fn state_kind_display_uses_kebab_names() {
        assert_eq!(StateKind::ActiveNotZoomed.to_string(), "active-not-zoomed");
        assert_eq!(
            StateKind::ZoomedFullscreenDrag.to_string(),
            "zoomed-fullscreen-drag"
        );
        assert!(StateKind::ZoomedPan.is_zoomed());
        assert!(!StateKind::Idle.is_zoomed());
    }
}
