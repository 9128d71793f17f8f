use super::error::{StateError, StateResult};
use super::event::{Effect, Outcome, ZoomEvent, ZoomEventKind};
use super::model::{
    DragGrip, GestureSession, InputMode, InteractionState, LayoutSnapshot, StateKind, Standby,
    ZoomImageMetrics,
};
use crate::config::{MoveType, ZoomConfig, ZoomType};
use crate::geometry::{
    compute_bounds, compute_offset_origin, compute_scale_ratios, drag_position,
    exceeds_drag_threshold, pan_position, scaled_zoom_size, Point, Position, Size,
};

/// Turns pointer, touch and load events into zoom position updates and mode changes.
#[derive(Debug)]
pub struct InteractionMachine {
    config: ZoomConfig,
    state: InteractionState,
}

impl InteractionMachine {
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            state: initial_state(&config),
            config,
        }
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn kind(&self) -> StateKind {
        self.state.kind()
    }

    pub fn is_active(&self) -> bool {
        self.kind() != StateKind::Idle
    }

    pub fn is_zoomed(&self) -> bool {
        self.kind().is_zoomed()
    }

    pub fn is_touch(&self) -> bool {
        self.state.input().is_some_and(InputMode::is_touch)
    }

    pub fn is_fullscreen(&self) -> bool {
        self.state.input().is_some_and(InputMode::is_fullscreen)
    }

    pub fn is_dragging(&self) -> bool {
        self.state.session().is_some_and(|session| session.dragged)
    }

    pub fn move_type(&self) -> MoveType {
        self.state.input().map_or(self.config.move_type, |input| {
            input.effective_move_type(self.config.move_type)
        })
    }

    pub fn position(&self) -> Position {
        self.state.position()
    }

    pub fn is_zoom_image_loaded(&self) -> bool {
        self.state.zoom_image().is_some()
    }

    /// Size the host should render the zoom image at, once it has loaded.
    pub fn zoom_image_size(&self) -> Option<Size> {
        self.state.zoom_image().map(|metrics| metrics.size)
    }

    pub fn has_pending_zoom_in(&self) -> bool {
        self.state
            .standby()
            .is_some_and(|standby| standby.pending_zoom_in.is_pending())
    }

    fn grip_held(&self) -> bool {
        self.state
            .session()
            .is_some_and(|session| session.grip.is_some())
    }

    pub fn accepts(&self, event: ZoomEventKind) -> bool {
        use ZoomEventKind::*;
        let touch = self.is_touch();
        match (self.kind(), event) {
            (StateKind::Idle, PointerEnter | TouchStart | Click) => true,
            (StateKind::ActiveNotZoomed, PointerEnter | PointerLeave) => !touch,
            (StateKind::ActiveNotZoomed, TouchStart | Click | ZoomImageLoaded | Close) => true,
            (StateKind::ZoomedPan, PointerMove | Click | PointerLeave | Close) => true,
            (
                StateKind::ZoomedDrag | StateKind::ZoomedFullscreenDrag,
                DragStart | DragEnd | Click | Close,
            ) => true,
            (StateKind::ZoomedDrag | StateKind::ZoomedFullscreenDrag, DragMove) => {
                self.grip_held()
            }
            (StateKind::ZoomedDrag, PointerLeave) => !touch,
            _ => false,
        }
    }

    pub fn transition(
        &mut self,
        event: ZoomEvent,
        layout: &LayoutSnapshot,
    ) -> StateResult<Outcome> {
        let from = self.kind();
        let kind = event.kind();
        if !self.accepts(kind) {
            return Err(StateError::InvalidStateTransition { from, event: kind });
        }

        let mut effects = Vec::new();
        match event {
            ZoomEvent::PointerEnter { at } => self.pointer_enter(at, layout, &mut effects),
            ZoomEvent::TouchStart => self.touch_start(layout),
            ZoomEvent::Click { at } => self.click(at, layout, &mut effects),
            ZoomEvent::ZoomImageLoaded { rendered } => {
                self.zoom_image_loaded(rendered, layout, &mut effects)
            }
            ZoomEvent::PointerMove { at } => self.pointer_move(at, &mut effects),
            ZoomEvent::DragStart { at } => self.drag_start(at, &mut effects),
            ZoomEvent::DragMove { at } => self.drag_move(at, &mut effects),
            ZoomEvent::DragEnd { at } => self.drag_end(at, &mut effects),
            ZoomEvent::PointerLeave { at } => self.pointer_leave(at, &mut effects),
            ZoomEvent::Close => self.close(&mut effects),
        }

        let to = self.kind();
        if from != to {
            tracing::debug!(%from, %to, event = ?kind, "zoom state changed");
        }
        Ok(Outcome::new(from, to, effects))
    }

    /// Drops every session, flag and queued action. Valid from any state.
    pub fn reset(&mut self) -> Outcome {
        let from = self.kind();
        let mut effects = Vec::new();
        if let Some(session) = self.state.session() {
            if session.grip.is_some() {
                effects.push(Effect::DetachMoveListener {
                    kind: session.input.move_event(),
                });
            }
        }
        self.state = initial_state(&self.config);
        let to = self.kind();
        tracing::debug!(%from, %to, "zoom state reset");
        Outcome::new(from, to, effects)
    }

    fn activate(&mut self, input: InputMode) {
        if matches!(self.state, InteractionState::Idle) {
            self.state = InteractionState::ActiveNotZoomed(Standby::new(input));
        }
    }

    fn pointer_enter(&mut self, at: Point, layout: &LayoutSnapshot, effects: &mut Vec<Effect>) {
        self.activate(InputMode::Pointer);
        if self.config.zoom_type == ZoomType::Hover {
            self.request_zoom_in(at, layout, effects);
        }
    }

    fn touch_start(&mut self, layout: &LayoutSnapshot) {
        let fullscreen = self.config.fullscreen_on_mobile
            && self.config.matches_mobile_breakpoint(layout.viewport.width);
        let input = InputMode::Touch { fullscreen };
        if let InteractionState::ActiveNotZoomed(standby) = &mut self.state {
            standby.input = input;
            return;
        }
        self.activate(input);
    }

    fn click(&mut self, at: Point, layout: &LayoutSnapshot, effects: &mut Vec<Effect>) {
        if let Some(session) = self.state.session() {
            if !session.input.is_touch() && !session.dragged {
                self.zoom_out(effects);
            }
            return;
        }
        self.activate(InputMode::Pointer);
        self.request_zoom_in(at, layout, effects);
    }

    fn request_zoom_in(&mut self, at: Point, layout: &LayoutSnapshot, effects: &mut Vec<Effect>) {
        let InteractionState::ActiveNotZoomed(standby) = &mut self.state else {
            return;
        };
        let input = standby.input;
        let Some(metrics) = standby.zoom_image else {
            if standby.pending_zoom_in.queue(at).is_some() {
                tracing::trace!("replaced queued zoom-in");
            }
            tracing::debug!("zoom image not loaded; zoom-in queued");
            return;
        };
        self.zoom_in(at, metrics, input, layout, effects);
    }

    fn zoom_image_loaded(
        &mut self,
        rendered: Size,
        layout: &LayoutSnapshot,
        effects: &mut Vec<Effect>,
    ) {
        let zoom_scale = self.config.zoom_scale;
        let InteractionState::ActiveNotZoomed(standby) = &mut self.state else {
            return;
        };
        let size = scaled_zoom_size(rendered, zoom_scale);
        let metrics = ZoomImageMetrics { size };
        standby.zoom_image = Some(metrics);
        let input = standby.input;
        tracing::debug!(width = size.width, height = size.height, "zoom image loaded");

        if let Some(at) = standby.pending_zoom_in.take() {
            self.zoom_in(at, metrics, input, layout, effects);
        }
    }

    fn zoom_in(
        &mut self,
        at: Point,
        zoom_image: ZoomImageMetrics,
        input: InputMode,
        layout: &LayoutSnapshot,
        effects: &mut Vec<Effect>,
    ) {
        let bounds = compute_bounds(layout.element, layout.viewport, false);
        let ratios = compute_scale_ratios(bounds, zoom_image.size);

        self.state = match input.effective_move_type(self.config.move_type) {
            MoveType::Pan => {
                let origin = compute_offset_origin(
                    layout.scroll.x,
                    layout.scroll.y,
                    -bounds.left,
                    -bounds.top,
                );
                InteractionState::ZoomedPan(GestureSession {
                    input,
                    zoom_image,
                    bounds,
                    ratios,
                    origin,
                    position: pan_position(at, origin, bounds, ratios),
                    grip: None,
                    dragged: false,
                })
            }
            MoveType::Drag => {
                // The pointer is treated as a drag to the matching spot of the zoom image.
                let initial = Point::new(
                    (at.x - (layout.scroll.x + bounds.left)) * -ratios.x,
                    (at.y - (layout.scroll.y + bounds.top)) * -ratios.y,
                );
                let drag_bounds =
                    compute_bounds(layout.element, layout.viewport, input.is_fullscreen());
                let origin = compute_offset_origin(0.0, 0.0, 0.0, 0.0);
                let session = GestureSession {
                    input,
                    zoom_image,
                    bounds: drag_bounds,
                    ratios,
                    origin,
                    position: drag_position(initial, origin, drag_bounds, zoom_image.size),
                    grip: None,
                    dragged: false,
                };
                if input.is_fullscreen() {
                    InteractionState::ZoomedFullscreenDrag(session)
                } else {
                    InteractionState::ZoomedDrag(session)
                }
            }
        };

        let position = self.state.position();
        tracing::debug!(
            state = %self.kind(),
            left = position.left,
            top = position.top,
            "zoomed in"
        );
        effects.push(Effect::PositionChanged { position });
        effects.push(Effect::AfterZoomIn);
    }

    fn pointer_move(&mut self, at: Point, effects: &mut Vec<Effect>) {
        let Some(session) = self.state.session_mut() else {
            return;
        };
        session.position = pan_position(at, session.origin, session.bounds, session.ratios);
        tracing::trace!(left = session.position.left, top = session.position.top, "pan");
        effects.push(Effect::PositionChanged {
            position: session.position,
        });
    }

    fn drag_start(&mut self, at: Point, effects: &mut Vec<Effect>) {
        let Some(session) = self.state.session_mut() else {
            return;
        };
        session.origin =
            compute_offset_origin(at.x, at.y, session.position.left, session.position.top);
        if session.grip.is_none() {
            effects.push(Effect::AttachMoveListener {
                kind: session.input.move_event(),
            });
        }
        session.grip = Some(DragGrip { start: at });
    }

    fn drag_move(&mut self, at: Point, effects: &mut Vec<Effect>) {
        let Some(session) = self.state.session_mut() else {
            return;
        };
        session.position =
            drag_position(at, session.origin, session.bounds, session.zoom_image.size);
        tracing::trace!(left = session.position.left, top = session.position.top, "drag");
        effects.push(Effect::PositionChanged {
            position: session.position,
        });
    }

    fn drag_end(&mut self, at: Point, effects: &mut Vec<Effect>) {
        let Some(session) = self.state.session_mut() else {
            return;
        };
        let grip = session.grip.take();
        if grip.is_some() {
            effects.push(Effect::DetachMoveListener {
                kind: session.input.move_event(),
            });
        }
        if !session.input.is_touch() {
            session.dragged = grip.is_some_and(|grip| exceeds_drag_threshold(grip.start, at));
        }
    }

    fn pointer_leave(&mut self, at: Point, effects: &mut Vec<Effect>) {
        match self.kind() {
            StateKind::ZoomedDrag => self.drag_end(at, effects),
            _ => self.close(effects),
        }
    }

    fn zoom_out(&mut self, effects: &mut Vec<Effect>) {
        let Some(session) = self.state.session().copied() else {
            return;
        };
        if session.grip.is_some() {
            effects.push(Effect::DetachMoveListener {
                kind: session.input.move_event(),
            });
        }
        self.state = InteractionState::ActiveNotZoomed(session.into_standby());
        effects.push(Effect::AfterZoomOut);
    }

    fn close(&mut self, effects: &mut Vec<Effect>) {
        match self.kind() {
            StateKind::Idle => return,
            StateKind::ActiveNotZoomed => {
                if let InteractionState::ActiveNotZoomed(standby) = &mut self.state {
                    standby.pending_zoom_in.clear();
                }
            }
            _ => self.zoom_out(effects),
        }
        effects.push(Effect::ScheduleReset);
    }
}

fn initial_state(config: &ZoomConfig) -> InteractionState {
    if config.zoom_preload {
        InteractionState::ActiveNotZoomed(Standby::new(InputMode::Pointer))
    } else {
        InteractionState::Idle
    }
}

impl Default for InteractionMachine {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

impl std::fmt::Display for InteractionMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InteractionState::{}", self.kind())
    }
}
