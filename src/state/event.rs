use serde::Serialize;

use super::model::StateKind;
use crate::geometry::{Point, Position, Size};

/// Raw input delivered by the host event loop.
///
/// Pointer coordinates are page coordinates; the layout they are measured
/// against arrives separately as a [`super::LayoutSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomEvent {
    PointerEnter { at: Point },
    TouchStart,
    Click { at: Point },
    /// The zoom image finished loading at `rendered` size, before `zoom_scale`.
    ZoomImageLoaded { rendered: Size },
    PointerMove { at: Point },
    DragStart { at: Point },
    DragMove { at: Point },
    DragEnd { at: Point },
    PointerLeave { at: Point },
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomEventKind {
    PointerEnter,
    TouchStart,
    Click,
    ZoomImageLoaded,
    PointerMove,
    DragStart,
    DragMove,
    DragEnd,
    PointerLeave,
    Close,
}

impl ZoomEvent {
    pub const fn kind(&self) -> ZoomEventKind {
        match self {
            Self::PointerEnter { .. } => ZoomEventKind::PointerEnter,
            Self::TouchStart => ZoomEventKind::TouchStart,
            Self::Click { .. } => ZoomEventKind::Click,
            Self::ZoomImageLoaded { .. } => ZoomEventKind::ZoomImageLoaded,
            Self::PointerMove { .. } => ZoomEventKind::PointerMove,
            Self::DragStart { .. } => ZoomEventKind::DragStart,
            Self::DragMove { .. } => ZoomEventKind::DragMove,
            Self::DragEnd { .. } => ZoomEventKind::DragEnd,
            Self::PointerLeave { .. } => ZoomEventKind::PointerLeave,
            Self::Close => ZoomEventKind::Close,
        }
    }
}

/// DOM event the drag-move listener is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveEventKind {
    MouseMove,
    TouchMove,
}

impl MoveEventKind {
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::MouseMove => "mousemove",
            Self::TouchMove => "touchmove",
        }
    }
}

/// Side effect requested by a transition, applied by the surface controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    PositionChanged { position: Position },
    AttachMoveListener { kind: MoveEventKind },
    DetachMoveListener { kind: MoveEventKind },
    AfterZoomIn,
    AfterZoomOut,
    ScheduleReset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub from: StateKind,
    pub to: StateKind,
    pub effects: Vec<Effect>,
}

impl Outcome {
    pub(crate) fn new(from: StateKind, to: StateKind, effects: Vec<Effect>) -> Self {
        Self { from, to, effects }
    }

    pub fn count(&self, predicate: impl Fn(&Effect) -> bool) -> usize {
        self.effects.iter().filter(|effect| predicate(effect)).count()
    }
}
