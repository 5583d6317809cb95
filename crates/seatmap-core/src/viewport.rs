//! Camera state for a mounted scene.
//!
//! The camera is an affine pan + uniform zoom applied to the drawable group
//! of the layout. Table regions keep their logical coordinates, so hit
//! testing maps screen points back through [`Camera::invert`].

use crate::config::ViewportSettings;
use serde::{Deserialize, Serialize};

/// A 2D point or vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Pan offset plus zoom scale, mapping scene space to screen space as
/// `screen = scene * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Camera {
    /// The identity transform.
    pub const HOME: Camera = Camera {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    pub fn is_home(&self) -> bool {
        *self == Self::HOME
    }

    /// Maps a scene point to the screen.
    pub fn apply(&self, point: Point) -> Point {
        Point::new(point.x * self.k + self.x, point.y * self.k + self.y)
    }

    /// Maps a screen point back into scene coordinates.
    pub fn invert(&self, point: Point) -> Point {
        Point::new((point.x - self.x) / self.k, (point.y - self.y) / self.k)
    }

    /// SVG `transform` attribute value.
    pub fn to_svg_transform(&self) -> String {
        format!("translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::HOME
    }
}

/// A single camera movement produced by a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportDelta {
    /// Translate by a screen-space offset.
    Pan { dx: f64, dy: f64 },
    /// Multiply the scale, keeping `anchor` (screen space) fixed.
    Zoom { factor: f64, anchor: Point },
}

/// Owns the camera of one mounted scene.
///
/// Any delta marks the view dirty the moment it arrives, even when the
/// resulting camera equals home; only [`ViewportController::reset_to_home`]
/// clears it.
#[derive(Debug, Clone)]
pub struct ViewportController {
    camera: Camera,
    view_dirty: bool,
    min_scale: f64,
    max_scale: f64,
}

impl ViewportController {
    pub fn new(settings: &ViewportSettings) -> Self {
        let min_scale = settings.min_scale.max(f64::MIN_POSITIVE);
        let max_scale = settings.max_scale.max(min_scale);
        Self {
            camera: Camera::HOME,
            view_dirty: false,
            min_scale,
            max_scale,
        }
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn is_view_dirty(&self) -> bool {
        self.view_dirty
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.apply(ViewportDelta::Pan { dx, dy });
    }

    pub fn zoom_by(&mut self, factor: f64, anchor: Point) {
        self.apply(ViewportDelta::Zoom { factor, anchor });
    }

    /// Applies a delta. Non-finite components are dropped but still dirty
    /// the view.
    pub fn apply(&mut self, delta: ViewportDelta) {
        self.view_dirty = true;
        match delta {
            ViewportDelta::Pan { dx, dy } => {
                if dx.is_finite() && dy.is_finite() {
                    self.camera.x += dx;
                    self.camera.y += dy;
                }
            }
            ViewportDelta::Zoom { factor, anchor } => {
                if !(factor.is_finite() && factor > 0.0) {
                    return;
                }
                let k = (self.camera.k * factor).clamp(self.min_scale, self.max_scale);
                let focus = self.camera.invert(anchor);
                self.camera = Camera {
                    x: anchor.x - focus.x * k,
                    y: anchor.y - focus.y * k,
                    k,
                };
            }
        }
        tracing::trace!("[Viewport] camera now {:?}", self.camera);
    }

    /// Restores the identity camera and clears view-dirty.
    pub fn reset_to_home(&mut self) {
        self.camera = Camera::HOME;
        self.view_dirty = false;
    }

    pub fn transform(&self) -> String {
        self.camera.to_svg_transform()
    }

    /// Maps a screen point into scene coordinates under the current camera.
    pub fn to_scene(&self, screen: Point) -> Point {
        self.camera.invert(screen)
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(&ViewportSettings::default())
    }
}
