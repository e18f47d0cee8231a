//! The canvas viewport: zoom and scroll.
//!
//! A document point `p` appears on screen at `p * scale + offset`.

use kurbo::{Affine, Point, Rect, Vec2};

use crate::config::CanvasConfig;

use super::gesture::{GesturePhase, PinchEvent};

/// Factor applied by a single zoom-in or zoom-out step.
const ZOOM_STEP: f64 = 2.0;

/// Viewport state captured when a pinch starts.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchStart {
    offset: Vec2,
    scale: f64,
    location: Point,
}

/// Scale and scroll position of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub offset: Vec2,
    scale: f64,
    min_scale: f64,
    max_scale: f64,
    pinch_start: Option<PinchStart>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl Viewport {
    /// Build a viewport for the configured zoom range. An unusable range
    /// falls back to the default one.
    pub fn new(config: &CanvasConfig) -> Self {
        let (min_scale, max_scale) = match config.validate() {
            Ok(()) => (config.min_scale, config.max_scale),
            Err(e) => {
                log::warn!("{e}, using the default zoom range");
                let defaults = CanvasConfig::default();
                (defaults.min_scale, defaults.max_scale)
            }
        };
        Self {
            offset: Vec2::ZERO,
            scale: max_scale.min(1.0).max(min_scale),
            min_scale,
            max_scale,
            pinch_start: None,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the scale, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(self.min_scale, self.max_scale);
    }

    /// Document to screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    pub fn screen_to_document(&self, point: Point) -> Point {
        self.transform().inverse() * point
    }

    pub fn document_to_screen(&self, point: Point) -> Point {
        self.transform() * point
    }

    pub fn document_rect_to_screen(&self, rect: Rect) -> Rect {
        self.transform().transform_rect_bbox(rect)
    }

    /// Convert a screen length to document units.
    pub fn screen_length(&self, length: f64) -> f64 {
        length / self.scale
    }

    /// Scroll by a delta in screen units.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Change the scale keeping the document point under `anchor` in place.
    pub fn zoom_at(&mut self, anchor: Point, scale: f64) {
        let document_point = self.screen_to_document(anchor);
        self.set_scale(scale);
        self.offset = anchor.to_vec2() - document_point.to_vec2() * self.scale;
    }

    pub fn zoom_in(&mut self, anchor: Point) {
        self.zoom_at(anchor, self.scale * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self, anchor: Point) {
        self.zoom_at(anchor, self.scale / ZOOM_STEP);
    }

    pub fn reset_zoom(&mut self) {
        self.set_scale(1.0);
        self.offset = Vec2::ZERO;
    }

    /// Apply a pinch gesture.
    ///
    /// The document point under the initial pinch location follows the
    /// fingers, so the pinch both zooms and scrolls.
    pub fn pinch(&mut self, event: &PinchEvent) {
        if !event.phase.is_active() {
            self.pinch_start = None;
            return;
        }
        let start = *self.pinch_start.get_or_insert(PinchStart {
            offset: self.offset,
            scale: self.scale,
            location: event.location,
        });
        self.set_scale(start.scale * event.scale);

        let anchor = start.location.to_vec2();
        let document_anchor = (anchor - start.offset) / start.scale;
        let translation = event.location - start.location;
        self.offset = anchor + translation - document_anchor * self.scale;
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch_start.is_some()
    }
}
