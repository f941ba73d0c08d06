//! Pointer-driven element dragging.
//!
//! The host routes raw pointer input into a gesture lifecycle:
//! [`DragController::begin`] on pointer-down, [`DragController::pointer_move`]
//! for every move anywhere on the page, [`DragController::on_frame`] once per
//! display refresh when a frame was requested, and [`DragController::end`] on
//! pointer-up.
//!
//! While a drag is in progress the controller keeps a transient visual
//! position for the dragged element; the store is only written once, on
//! release. Renderers should read positions through
//! [`DragController::render_position`] so they pick up that override.

use crate::element::{Element, ElementId, ElementPatch};
use crate::geometry::{
    self, ElementStyle, FALLBACK_ELEMENT_SIZE, clamp_to_canvas, element_size,
    round_to_decimal_places,
};
use crate::store::DesignStore;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Pointer travel, in device pixels on either axis, that turns a press into a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;
/// Stacking order of an element while it is being dragged.
pub const DRAG_Z_INDEX: i32 = 1000;
/// Decimal places kept when committing a dragged position.
pub const COMMIT_PRECISION: u32 = 2;

/// Drag gesture tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Movement needed before a press becomes a drag.
    pub threshold_px: f64,
    /// Width assumed for elements without an explicit width.
    pub fallback_width: f64,
    /// Height assumed for elements without an explicit height.
    pub fallback_height: f64,
    /// Stacking order of the dragged element.
    pub drag_z_index: i32,
    /// Decimal places of committed coordinates.
    pub commit_precision: u32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            threshold_px: DRAG_THRESHOLD_PX,
            fallback_width: FALLBACK_ELEMENT_SIZE.width,
            fallback_height: FALLBACK_ELEMENT_SIZE.height,
            drag_z_index: DRAG_Z_INDEX,
            commit_precision: COMMIT_PRECISION,
        }
    }
}

impl DragConfig {
    fn fallback_size(&self) -> Size {
        Size::new(self.fallback_width, self.fallback_height)
    }
}

/// Resolves the canvas surface under the pointer.
pub trait CanvasAnchor {
    /// Bounding rectangle of the canvas in device pixels, or `None` if the
    /// canvas is not currently on screen.
    fn canvas_rect(&self) -> Option<Rect>;
}

impl CanvasAnchor for Rect {
    fn canvas_rect(&self) -> Option<Rect> {
        Some(*self)
    }
}

impl CanvasAnchor for Option<Rect> {
    fn canvas_rect(&self) -> Option<Rect> {
        *self
    }
}

/// Phase of the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// No element captured.
    Idle,
    /// Pointer is down on an element but hasn't moved past the threshold.
    Armed,
    /// The element is following the pointer.
    Dragging,
}

/// Page cursor requested by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Grabbing,
}

/// Result of [`DragController::pointer_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No gesture in progress.
    Ignored,
    /// Still within the click threshold.
    BelowThreshold,
    /// A frame callback should be scheduled.
    FrameRequested,
    /// Sample buffered; a frame is already scheduled.
    Coalesced,
    /// The captured element is gone; the gesture was dropped.
    Aborted,
}

/// Result of [`DragController::on_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Nothing was pending.
    Skipped,
    /// The visual position (device pixels, canvas-relative) was updated.
    Applied(Point),
    /// The captured element is gone; the gesture was dropped.
    Aborted,
}

/// Result of [`DragController::end`].
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// No gesture in progress.
    Idle,
    /// Released without crossing the threshold: a plain click.
    Clicked(ElementId),
    /// The element was moved and the position committed.
    Moved { id: ElementId, position: Point },
    /// The gesture was dropped without committing.
    Aborted,
}

/// Overrides the renderer applies to the dragged element.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualOverride {
    pub element_id: ElementId,
    /// Top-left in device pixels relative to the canvas.
    pub position: Point,
    pub z_index: i32,
    /// Transition animations are disabled for immediate feedback.
    pub transitions_enabled: bool,
}

/// State captured for one gesture.
#[derive(Debug, Clone)]
struct DragSession {
    element_id: ElementId,
    /// Element as it was on pointer-down, used for size lookups.
    snapshot: Element,
    /// Pointer position minus the element's on-screen origin.
    offset: Vec2,
    start_pointer: Point,
    last_pointer: Point,
    started: bool,
    frame_pending: bool,
    /// Clamped logical position computed by the last frame, and the scale
    /// that frame drew it at.
    logical: Option<(Point, f64)>,
}

/// Converts pointer motion into committed element moves.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    config: DragConfig,
    session: Option<DragSession>,
}

fn valid_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}

impl DragController {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn phase(&self) -> DragPhase {
        match &self.session {
            None => DragPhase::Idle,
            Some(s) if s.started => DragPhase::Dragging,
            Some(_) => DragPhase::Armed,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.phase() == DragPhase::Dragging
    }

    /// Whether a frame callback is outstanding.
    pub fn frame_pending(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.frame_pending)
    }

    /// Most recent pointer position seen by the gesture.
    pub fn last_pointer(&self) -> Option<Point> {
        self.session.as_ref().map(|s| s.last_pointer)
    }

    pub fn cursor(&self) -> Cursor {
        if self.is_dragging() {
            Cursor::Grabbing
        } else {
            Cursor::Default
        }
    }

    /// Text selection is suppressed on the page while dragging.
    pub fn text_selection_enabled(&self) -> bool {
        !self.is_dragging()
    }

    /// Overrides for the dragged element, while dragging.
    pub fn visual_override(&self) -> Option<VisualOverride> {
        let session = self.session.as_ref().filter(|s| s.started)?;
        Some(VisualOverride {
            element_id: session.element_id.clone(),
            position: session.logical.map(|(p, scale)| Point::new(p.x * scale, p.y * scale))?,
            z_index: self.config.drag_z_index,
            transitions_enabled: false,
        })
    }

    /// Canvas-relative device-pixel position an element should be drawn at.
    ///
    /// During a drag the dragged element uses the transient visual position;
    /// everything else uses the committed position times `scale`.
    pub fn render_position(&self, store: &DesignStore, id: &str, scale: f64) -> Option<Point> {
        if let Some(visual) = self.visual_override().filter(|v| v.element_id == id) {
            return Some(visual.position);
        }
        let element = store.element(id)?;
        Some(Point::new(element.x * scale, element.y * scale))
    }

    /// Render style of an element, with drag overrides applied.
    pub fn render_style(&self, store: &DesignStore, id: &str, scale: f64) -> Option<ElementStyle> {
        let mut style = geometry::element_style(store.element(id)?, scale);
        if let Some(visual) = self.visual_override().filter(|v| v.element_id == id) {
            style.left = visual.position.x;
            style.top = visual.position.y;
            style.z_index = visual.z_index;
        }
        Some(style)
    }

    /// Pointer-down on an element.
    ///
    /// Selects the element (so a click alone selects) and arms a gesture.
    /// Returns false when the element or canvas can't be resolved, in which
    /// case nothing changes.
    pub fn begin(
        &mut self,
        store: &mut DesignStore,
        element_id: &str,
        pointer: Point,
        anchor: &dyn CanvasAnchor,
        scale: f64,
    ) -> bool {
        let Some(snapshot) = store.element(element_id).cloned() else {
            log::debug!("Pointer-down on unknown element {element_id}");
            return false;
        };
        let Some(canvas) = anchor.canvas_rect() else {
            log::debug!("Pointer-down outside a canvas");
            return false;
        };

        if let Some(previous) = self.session.take() {
            log::debug!("Dropping unfinished gesture on {}", previous.element_id);
        }

        store.select(Some(element_id));

        let element_origin = canvas.origin() + Vec2::new(snapshot.x * scale, snapshot.y * scale);
        let offset = pointer - element_origin;
        log::debug!("Armed drag on {element_id}, offset {offset:?}");

        self.session = Some(DragSession {
            element_id: element_id.to_string(),
            snapshot,
            offset,
            start_pointer: pointer,
            last_pointer: pointer,
            started: false,
            frame_pending: false,
            logical: None,
        });
        true
    }

    /// Pointer moved anywhere on the page.
    ///
    /// Samples are coalesced: at most one frame is requested until
    /// [`on_frame`](Self::on_frame) runs, and only the latest sample is kept.
    pub fn pointer_move(&mut self, store: &DesignStore, pointer: Point) -> MoveOutcome {
        let Some(session) = self.session.as_mut() else {
            return MoveOutcome::Ignored;
        };
        if !store.design().contains(&session.element_id) {
            self.abort("captured element removed during move");
            return MoveOutcome::Aborted;
        }

        if !session.started {
            let delta = pointer - session.start_pointer;
            let threshold = self.config.threshold_px;
            if delta.x.abs() <= threshold && delta.y.abs() <= threshold {
                session.last_pointer = pointer;
                return MoveOutcome::BelowThreshold;
            }
            session.started = true;
            log::debug!("Drag started on {}", session.element_id);
        }

        session.last_pointer = pointer;
        if session.frame_pending {
            MoveOutcome::Coalesced
        } else {
            session.frame_pending = true;
            MoveOutcome::FrameRequested
        }
    }

    /// Display refresh: recompute the visual position from the latest sample.
    ///
    /// Canvas rectangle, canvas size and scale are read fresh on every call.
    pub fn on_frame(
        &mut self,
        store: &DesignStore,
        anchor: &dyn CanvasAnchor,
        scale: f64,
    ) -> FrameOutcome {
        let fallback = self.config.fallback_size();
        let Some(session) = self.session.as_mut().filter(|s| s.frame_pending) else {
            return FrameOutcome::Skipped;
        };
        session.frame_pending = false;

        if !store.design().contains(&session.element_id) {
            self.abort("captured element removed before frame");
            return FrameOutcome::Aborted;
        }
        let Some(canvas) = anchor.canvas_rect() else {
            return FrameOutcome::Skipped;
        };
        if !valid_scale(scale) {
            log::warn!("Ignoring drag frame with invalid scale {scale}");
            return FrameOutcome::Skipped;
        }

        let pixel = session.last_pointer - canvas.origin() - session.offset;
        let logical = Point::new(pixel.x / scale, pixel.y / scale);
        let size = element_size(&session.snapshot, fallback);
        let bounded = clamp_to_canvas(logical, size, store.design().canvas_size());
        session.logical = Some((bounded, scale));
        FrameOutcome::Applied(Point::new(bounded.x * scale, bounded.y * scale))
    }

    /// Pointer released.
    ///
    /// A press that never crossed the threshold is a click and commits
    /// nothing. Otherwise the position from the last frame is clamped
    /// against the canvas as it is now, rounded, committed with a single
    /// store update, and the element is selected again. Any pending frame
    /// is dropped.
    pub fn end(&mut self, store: &mut DesignStore, scale: f64) -> DragOutcome {
        let Some(session) = self.session.take() else {
            return DragOutcome::Idle;
        };
        if !store.design().contains(&session.element_id) {
            log::debug!("Captured element {} removed before release", session.element_id);
            return DragOutcome::Aborted;
        }
        if !session.started {
            return DragOutcome::Clicked(session.element_id);
        }
        if !valid_scale(scale) {
            log::warn!("Dropping drag on {} with invalid scale {scale}", session.element_id);
            return DragOutcome::Aborted;
        }

        let logical = session
            .logical
            .map_or(session.snapshot.position(), |(position, _)| position);
        let size = element_size(&session.snapshot, self.config.fallback_size());
        let canvas = store.design().canvas_size();
        let precision = self.config.commit_precision;
        let bounded = clamp_to_canvas(logical, size, canvas);
        let rounded = Point::new(
            round_to_decimal_places(bounded.x, precision),
            round_to_decimal_places(bounded.y, precision),
        );
        // Rounding can step past a fractional bound.
        let position = clamp_to_canvas(rounded, size, canvas);

        store.update_element(&session.element_id, &ElementPatch::position(position.x, position.y));
        store.select(Some(&session.element_id));
        log::debug!("Committed {} at {:?}", session.element_id, position);

        DragOutcome::Moved {
            id: session.element_id,
            position,
        }
    }

    /// Drop the current gesture without committing.
    pub fn cancel(&mut self) {
        self.abort("cancelled");
    }

    fn abort(&mut self, reason: &str) {
        if let Some(session) = self.session.take() {
            log::debug!("Drag on {} aborted: {reason}", session.element_id);
        }
    }
}
