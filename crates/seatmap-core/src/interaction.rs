//! Pointer gesture routing for a mounted scene.
//!
//! Every physical gesture resolves to at most one of:
//! - a selection toggle (press and release on a table region without
//!   travelling past the drag threshold), or
//! - camera updates (a drag from anywhere, or a wheel tick).
//!
//! Once a press has turned into a drag it can no longer toggle anything.

use crate::config::InteractionSettings;
use crate::layout::Scene;
use crate::selection::{SelectionStore, ToggleOutcome};
use crate::table::TableId;
use crate::viewport::{Point, ViewportController};

/// Wheel delta (in pixels) to zoom exponent, matching common browser zoom
/// behaviour: one 100px notch scales by 2^(-0.2).
const WHEEL_ZOOM_RATE: f64 = 0.002;

/// What a pointer event hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    Region(TableId),
    Canvas,
}

/// Raw pointer input on the scene surface, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Down {
        target: PointerTarget,
        position: Point,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
    Cancel,
    Wheel {
        target: PointerTarget,
        position: Point,
        delta_y: f64,
    },
}

/// Why an event had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The session has ended.
    Locked,
    /// No scene is mounted yet, or the session is still loading.
    NotMounted,
    /// The tapped region is not part of the mounted scene.
    UnknownTarget,
    /// Tap on empty canvas.
    EmptyCanvas,
    /// Move/up without a preceding press, or a cancelled gesture.
    NoGesture,
}

/// Effect of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A press is in progress and not yet resolved.
    Pending,
    Toggled(ToggleOutcome),
    CameraMoved,
    /// A drag was released.
    DragEnded,
    Ignored(IgnoreReason),
}

/// State the dispatcher routes into, borrowed for one event.
pub struct DispatchContext<'a> {
    pub scene: Option<&'a mut Scene>,
    pub selection: &'a mut SelectionStore,
    pub viewport: &'a mut ViewportController,
    /// Lock gate result, evaluated by the caller for this event.
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Pressed {
        target: PointerTarget,
        origin: Point,
    },
    Dragging {
        last: Point,
    },
}

/// Single entry point for pointer events on a mounted scene.
#[derive(Debug, Clone)]
pub struct InteractionDispatcher {
    drag_threshold: f64,
    allow_view_when_locked: bool,
    gesture: Option<Gesture>,
}

impl InteractionDispatcher {
    pub fn new(settings: &InteractionSettings) -> Self {
        Self {
            drag_threshold: settings.drag_threshold.max(0.0),
            allow_view_when_locked: settings.allow_view_when_locked,
            gesture: None,
        }
    }

    /// Whether camera gestures are honoured while the session is locked.
    pub fn allows_view_when_locked(&self) -> bool {
        self.allow_view_when_locked
    }

    /// Forgets any in-progress gesture.
    pub fn reset(&mut self) {
        self.gesture = None;
    }

    pub fn dispatch(&mut self, event: PointerEvent, ctx: DispatchContext<'_>) -> DispatchOutcome {
        if ctx.scene.is_none() {
            self.gesture = None;
            return DispatchOutcome::Ignored(IgnoreReason::NotMounted);
        }
        let camera_allowed = !ctx.locked || self.allow_view_when_locked;

        match event {
            PointerEvent::Down { target, position } => {
                self.gesture = Some(Gesture::Pressed {
                    target,
                    origin: position,
                });
                DispatchOutcome::Pending
            }
            PointerEvent::Move { position } => match self.gesture.take() {
                None => DispatchOutcome::Ignored(IgnoreReason::NoGesture),
                Some(Gesture::Pressed { target, origin }) => {
                    if origin.distance_to(position) <= self.drag_threshold {
                        self.gesture = Some(Gesture::Pressed { target, origin });
                        return DispatchOutcome::Pending;
                    }
                    self.gesture = Some(Gesture::Dragging { last: position });
                    pan(ctx.viewport, camera_allowed, origin, position)
                }
                Some(Gesture::Dragging { last }) => {
                    self.gesture = Some(Gesture::Dragging { last: position });
                    pan(ctx.viewport, camera_allowed, last, position)
                }
            },
            PointerEvent::Up { .. } => match self.gesture.take() {
                None => DispatchOutcome::Ignored(IgnoreReason::NoGesture),
                Some(Gesture::Dragging { .. }) => DispatchOutcome::DragEnded,
                Some(Gesture::Pressed {
                    target: PointerTarget::Canvas,
                    ..
                }) => DispatchOutcome::Ignored(IgnoreReason::EmptyCanvas),
                Some(Gesture::Pressed {
                    target: PointerTarget::Region(id),
                    ..
                }) => {
                    if ctx.locked {
                        tracing::debug!("[Interaction] Tap on '{}' suppressed: session ended", id);
                        return DispatchOutcome::Ignored(IgnoreReason::Locked);
                    }
                    let Some(scene) = ctx.scene else {
                        return DispatchOutcome::Ignored(IgnoreReason::NotMounted);
                    };
                    match ctx.selection.toggle(scene, &id) {
                        ToggleOutcome::Ignored => {
                            DispatchOutcome::Ignored(IgnoreReason::UnknownTarget)
                        }
                        outcome => DispatchOutcome::Toggled(outcome),
                    }
                }
            },
            PointerEvent::Cancel => {
                self.gesture = None;
                DispatchOutcome::Ignored(IgnoreReason::NoGesture)
            }
            PointerEvent::Wheel {
                position, delta_y, ..
            } => {
                // A wheel tick during a press turns it into a camera gesture.
                if let Some(Gesture::Pressed { origin, .. }) = self.gesture {
                    self.gesture = Some(Gesture::Dragging { last: origin });
                }
                if !camera_allowed {
                    return DispatchOutcome::Ignored(IgnoreReason::Locked);
                }
                let factor = 2f64.powf(-delta_y * WHEEL_ZOOM_RATE);
                ctx.viewport.zoom_by(factor, position);
                DispatchOutcome::CameraMoved
            }
        }
    }
}

impl Default for InteractionDispatcher {
    fn default() -> Self {
        Self::new(&InteractionSettings::default())
    }
}

fn pan(viewport: &mut ViewportController, allowed: bool, from: Point, to: Point) -> DispatchOutcome {
    if !allowed {
        return DispatchOutcome::Ignored(IgnoreReason::Locked);
    }
    viewport.pan(to.x - from.x, to.y - from.y);
    DispatchOutcome::CameraMoved
}
