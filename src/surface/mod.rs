//! Binds the interaction machine to a live zoom surface.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::ZoomConfig;
use crate::geometry::Position;
use crate::state::{
    Effect, InteractionMachine, LayoutSnapshot, MoveEventKind, Outcome, StateKind, ZoomEvent,
    ZoomEventKind,
};

/// Rendering side of the widget. Measurements come in, commands go out.
pub trait SurfaceHost {
    fn layout(&self) -> LayoutSnapshot;
    fn apply_position(&mut self, position: Position);
    fn attach_move_listener(&mut self, kind: MoveEventKind);
    fn detach_move_listener(&mut self, kind: MoveEventKind);
    fn after_zoom_in(&mut self) {}
    fn after_zoom_out(&mut self) {}
}

/// Linear opacity/visibility fade shared by the zoom image and close button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FadeTransition {
    pub duration_ms: u64,
}

impl FadeTransition {
    pub const fn new(duration_ms: u64) -> Self {
        Self { duration_ms }
    }

    pub fn css(&self) -> String {
        let ms = self.duration_ms;
        format!("opacity {ms}ms linear, visibility {ms}ms linear")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoomSurfaceStyle {
    pub left: f64,
    pub top: f64,
    pub transition: String,
    pub visible: bool,
}

#[derive(Debug)]
pub struct ZoomSurfaceController<H: SurfaceHost> {
    machine: InteractionMachine,
    host: H,
    fade_duration: Duration,
    attached: Option<MoveEventKind>,
    reset_at: Option<Instant>,
}

impl<H: SurfaceHost> ZoomSurfaceController<H> {
    pub fn new(config: ZoomConfig, host: H) -> Self {
        let fade_duration = config.fade_duration();
        Self {
            machine: InteractionMachine::new(config),
            host,
            fade_duration,
            attached: None,
            reset_at: None,
        }
    }

    pub fn machine(&self) -> &InteractionMachine {
        &self.machine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn attached_listener(&self) -> Option<MoveEventKind> {
        self.attached
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_at.is_some()
    }

    /// Feeds one host event through the machine. Events the current state
    /// does not handle are dropped; none of them is an error for the host.
    ///
    /// Any event that can start a zoom runs a pending post-fade reset first.
    pub fn handle(&mut self, event: ZoomEvent, now: Instant) -> Option<Outcome> {
        if self.reset_at.is_some()
            && matches!(
                event.kind(),
                ZoomEventKind::PointerEnter | ZoomEventKind::TouchStart | ZoomEventKind::Click
            )
        {
            tracing::debug!("new gesture during fade-out; resetting early");
            self.reset();
        }

        let layout = self.host.layout();
        match self.machine.transition(event, &layout) {
            Ok(outcome) => {
                self.apply(&outcome, now);
                Some(outcome)
            }
            Err(err) => {
                tracing::trace!(%err, "event ignored");
                None
            }
        }
    }

    /// Runs the post-fade reset once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.reset_at {
            if now >= deadline {
                self.reset();
            }
        }
    }

    /// Close button handler. Only touch sessions expose the button.
    pub fn close(&mut self, now: Instant) -> Option<Outcome> {
        if !self.close_affordance_visible() {
            tracing::debug!("close requested without a close affordance; ignored");
            return None;
        }
        self.handle(ZoomEvent::Close, now)
    }

    pub fn reset(&mut self) {
        let outcome = self.machine.reset();
        self.reset_at = None;
        self.apply_effects(&outcome.effects);
        self.release_listener();
    }

    pub fn close_affordance_visible(&self) -> bool {
        self.machine.is_touch()
    }

    /// Whether the zoom image should be mounted at all.
    pub fn surface_mounted(&self) -> bool {
        self.machine.is_active()
    }

    pub fn transition(&self) -> FadeTransition {
        if self.machine.is_fullscreen() {
            FadeTransition::new(0)
        } else {
            FadeTransition::new(duration_ms(self.fade_duration))
        }
    }

    pub fn style(&self) -> ZoomSurfaceStyle {
        let position = self.machine.position();
        ZoomSurfaceStyle {
            left: position.left,
            top: position.top,
            transition: self.transition().css(),
            visible: self.machine.is_zoomed(),
        }
    }

    fn apply(&mut self, outcome: &Outcome, now: Instant) {
        self.apply_effects(&outcome.effects);
        if outcome.effects.contains(&Effect::ScheduleReset) {
            self.reset_at = Some(now + self.fade_duration);
            tracing::debug!(fade_ms = duration_ms(self.fade_duration), "reset scheduled");
        }
        if outcome.to != StateKind::ZoomedDrag && outcome.to != StateKind::ZoomedFullscreenDrag {
            self.release_listener();
        }
    }

    fn apply_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match *effect {
                Effect::PositionChanged { position } => self.host.apply_position(position),
                Effect::AttachMoveListener { kind } => self.attach_listener(kind),
                Effect::DetachMoveListener { kind } => {
                    if self.attached == Some(kind) {
                        self.release_listener();
                    }
                }
                Effect::AfterZoomIn => self.host.after_zoom_in(),
                Effect::AfterZoomOut => self.host.after_zoom_out(),
                Effect::ScheduleReset => {}
            }
        }
    }

    fn attach_listener(&mut self, kind: MoveEventKind) {
        if self.attached == Some(kind) {
            return;
        }
        self.release_listener();
        tracing::trace!(event = kind.dom_name(), "attach move listener");
        self.host.attach_move_listener(kind);
        self.attached = Some(kind);
    }

    fn release_listener(&mut self) {
        if let Some(kind) = self.attached.take() {
            tracing::trace!(event = kind.dom_name(), "detach move listener");
            self.host.detach_move_listener(kind);
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
