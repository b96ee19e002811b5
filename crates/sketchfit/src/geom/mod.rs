//! Numeric primitives for stroke and touch processing.
//!
//! Purpose
//! - Provide the small 2D toolkit the rest of the crate leans on: affine maps,
//!   bounding boxes, coordinate-space conversion, and the handful of triangle
//!   and statistics helpers used by curvature analysis and curve fitting.
//! - Everything here is a pure value; no module holds transform state.
//!
//! Conventions
//! - Positions and vectors are `nalgebra::Vector2<f64>` (re-exported as `Vec2`).
//! - Tolerances are centralized in `GeomCfg`; helpers that can degenerate
//!   return `Option` instead of NaN.
//!
//! Code cross-refs: `corners::detect`, `fit::{line,arc,circle}`, `session::InputSession`

mod types;
mod util;

pub use types::{Affine2, Bounds2, CoordSpace, GeomCfg, TransformContext};
pub use util::{
    centroid, circumcircle, circumcurvature, coeff_of_variation, mean, median,
    perpendicular_distance, polyline_length, quantile, spread, triangle_area2, turning_angle,
    wrap_angle,
};
