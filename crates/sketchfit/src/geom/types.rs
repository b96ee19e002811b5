//! Basic 2D value types: tolerances, affine maps, bounds, coordinate spaces.
//!
//! - `GeomCfg`: centralizes epsilons for determinant and length checks.
//! - `Affine2`: 2D affine map `x ↦ M x + t` with compose/invert/apply.
//! - `Bounds2`: axis-aligned bounding box, empty until extended.
//! - `TransformContext`: raw-device → viewport → world chain.

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeomCfg {
    /// Normalized determinant below which three points count as collinear.
    pub eps_det: f64,
    /// Lengths at or below this are treated as zero.
    pub eps_len: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_det: 1e-6,
            eps_len: 1e-9,
        }
    }
}

/// 2D affine map: `x ↦ M x + t`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Affine2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine2 {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }
    #[inline]
    pub fn translation(t: Vector2<f64>) -> Self {
        Self {
            m: Matrix2::identity(),
            t,
        }
    }
    #[inline]
    pub fn scaling(s: f64) -> Self {
        Self {
            m: Matrix2::identity() * s,
            t: Vector2::zeros(),
        }
    }
    /// Counterclockwise rotation by `theta` radians about the origin.
    #[inline]
    pub fn rotation(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self {
            m: Matrix2::new(c, -s, s, c),
            t: Vector2::zeros(),
        }
    }
    #[inline]
    pub fn apply(&self, p: Vector2<f64>) -> Vector2<f64> {
        self.m * p + self.t
    }
    /// Linear part only (for displacements and velocities).
    #[inline]
    pub fn apply_vector(&self, v: Vector2<f64>) -> Vector2<f64> {
        self.m * v
    }
    /// `self ∘ inner`: apply `inner` first, then `self`.
    #[inline]
    pub fn compose(&self, inner: &Affine2) -> Affine2 {
        Affine2 {
            m: self.m * inner.m,
            t: self.m * inner.t + self.t,
        }
    }
    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        self.m.try_inverse().map(|minv| Self {
            m: minv,
            t: -minv * self.t,
        })
    }
    /// Uniform scale factor (sqrt of |det M|), used to map pixel thresholds.
    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.m.determinant().abs().sqrt()
    }
}

/// Axis-aligned bounding box. Starts empty (`min > max`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds2 {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

impl Default for Bounds2 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds2 {
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: Vector2::new(f64::INFINITY, f64::INFINITY),
            max: Vector2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }
    pub fn from_points(points: &[Vector2<f64>]) -> Self {
        let mut b = Self::empty();
        for p in points {
            b.extend(*p);
        }
        b
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }
    #[inline]
    pub fn extend(&mut self, p: Vector2<f64>) {
        self.min = self.min.inf(&p);
        self.max = self.max.sup(&p);
    }
    /// Width and height; zero for an empty box.
    #[inline]
    pub fn size(&self) -> Vector2<f64> {
        if self.is_empty() {
            Vector2::zeros()
        } else {
            self.max - self.min
        }
    }
    #[inline]
    pub fn center(&self) -> Option<Vector2<f64>> {
        (!self.is_empty()).then(|| (self.min + self.max) * 0.5)
    }
    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.size().norm()
    }
}

/// Coordinate spaces a pointer position can be expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordSpace {
    /// Device pixels as delivered by the platform.
    Raw,
    /// Viewport (CSS-like) pixels after device scaling.
    Viewport,
    /// Document/world units after pan, zoom and rotation.
    World,
}

/// Raw-device → viewport → world transform chain.
///
/// Held by value; swapping it mid-gesture only affects samples captured after
/// the swap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformContext {
    pub device_to_viewport: Affine2,
    pub viewport_to_world: Affine2,
}

impl TransformContext {
    pub fn new(device_to_viewport: Affine2, viewport_to_world: Affine2) -> Self {
        Self {
            device_to_viewport,
            viewport_to_world,
        }
    }
    #[inline]
    pub fn device_to_world(&self) -> Affine2 {
        self.viewport_to_world.compose(&self.device_to_viewport)
    }
    /// Express a raw device position in `space`.
    #[inline]
    pub fn to_space(&self, raw: Vector2<f64>, space: CoordSpace) -> Vector2<f64> {
        match space {
            CoordSpace::Raw => raw,
            CoordSpace::Viewport => self.device_to_viewport.apply(raw),
            CoordSpace::World => self.device_to_world().apply(raw),
        }
    }
    /// Map a world position back to raw device coordinates (None if singular).
    pub fn world_to_raw(&self, world: Vector2<f64>) -> Option<Vector2<f64>> {
        self.device_to_world().inverse().map(|inv| inv.apply(world))
    }
}
