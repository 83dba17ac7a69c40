// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
A composable 2D affine transform.

The matrix is a 2x3 block: a 2x2 rotation-and-uniform-scale part plus a
translation column. Only the operations here mutate it, which keeps the
matrix free of shear; [`AffineTransform::get_scale`] and
[`AffineTransform::rotation_angle`] use symmetric combinations of the entries
so they stay meaningful even after the matrix has drifted slightly over a
long interactive session.
 */

mod error;

pub use error::TransformError;

use std::fmt;

use crate::constants::{DET_EPSILON, TAU};

/// Normalize an angle into [0, 2π).
#[inline]
fn norm_rad(x: f64) -> f64 {
    x.rem_euclid(TAU)
}

/// A 2D affine map between world (focal-plane arcsec) and screen (pixel)
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransform {
    mat: [[f64; 3]; 2],
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl AffineTransform {
    /// The identity transform.
    pub fn new() -> AffineTransform {
        AffineTransform {
            mat: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        }
    }

    /// Reset to identity with a vertical offset.
    pub fn reset(&mut self, height_offset: f64) {
        self.mat = [[1.0, 0.0, 0.0], [0.0, 1.0, height_offset]];
    }

    /// Shift the translation column.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.mat[0][2] += dx;
        self.mat[1][2] += dy;
    }

    /// Replace the translation column.
    pub fn set_translation(&mut self, x: f64, y: f64) {
        self.mat[0][2] = x;
        self.mat[1][2] = y;
    }

    /// Rotate incrementally about the screen-space pivot (`cx`, `cy`).
    ///
    /// A single closed-form update (translate pivot to origin, rotate,
    /// translate back), rather than three chained multiplies, to limit
    /// accumulated floating error over many small interactive rotations.
    pub fn rotate_about(&mut self, angle_rad: f64, cx: f64, cy: f64) {
        let (sina, cosa) = norm_rad(angle_rad).sin_cos();

        let a = self.mat[0][0];
        let b = self.mat[0][1];
        let e = self.mat[0][2] - cx;
        let f = self.mat[1][2] - cy;

        self.mat[0][0] = a * cosa - b * sina;
        self.mat[0][1] = a * sina + b * cosa;
        // The lower 2x2 row is locked to the upper one; this is what keeps
        // shear from creeping in.
        self.mat[1][0] = -self.mat[0][1];
        self.mat[1][1] = self.mat[0][0];

        self.mat[0][2] = e * cosa - f * sina + cx;
        self.mat[1][2] = e * sina + f * cosa + cy;
    }

    /// Replace the rotational component, preserving the current scale and
    /// translation.
    pub fn set_rotation(&mut self, angle_rad: f64) {
        let s = self.get_scale();
        let (sina, cosa) = angle_rad.sin_cos();
        self.mat[0][0] = s * cosa;
        self.mat[1][1] = s * cosa;
        self.mat[0][1] = s * sina;
        self.mat[1][0] = -s * sina;
    }

    /// Uniform scale about the origin.
    pub fn scale(&mut self, s: f64) {
        self.mat[0][0] *= s;
        self.mat[0][1] *= s;
        self.mat[1][0] *= s;
        self.mat[1][1] *= s;
    }

    /// Uniform scale such that the screen point (`cx`, `cy`) stays put.
    pub fn scale_about(&mut self, s: f64, cx: f64, cy: f64) {
        self.scale(s);
        self.mat[0][2] = self.mat[0][2] * s + cx * (1.0 - s);
        self.mat[1][2] = self.mat[1][2] * s + cy * (1.0 - s);
    }

    /// The uniform scale factor, sqrt(|det|) of the 2x2 block.
    pub fn get_scale(&self) -> f64 {
        let ca2 = self.mat[0][0] * self.mat[1][1];
        let sa2 = self.mat[0][1] * self.mat[1][0];
        (ca2 - sa2).abs().sqrt()
    }

    /// The rotation angle \[radians\], in (-π, π]. Translation and scale do
    /// not affect the result.
    pub fn rotation_angle(&self) -> f64 {
        let ca = (self.mat[0][0] + self.mat[1][1]) / 2.0;
        let sa = (self.mat[0][1] - self.mat[1][0]) / 2.0;
        sa.atan2(ca)
    }

    /// The six canvas-style transform coefficients. The first four are the
    /// 2x2 rotation/scale block, the last two the translation. `flip_y`
    /// negates the second row for hosts whose y axis points down.
    pub fn coefficients(&self, flip_y: bool) -> [f64; 6] {
        let [r0, r1] = self.mat;
        if flip_y {
            [r0[0], r0[1], -r1[0], -r1[1], r0[2], r1[2]]
        } else {
            [r0[0], r0[1], r1[0], r1[1], r0[2], r1[2]]
        }
    }

    /// Rotate and scale a direction vector, ignoring translation.
    pub fn rotate_vec(&self, x: f64, y: f64, flip_y: bool) -> (f64, f64) {
        let t = self.coefficients(flip_y);
        (x * t[0] + y * t[1], x * t[2] + y * t[3])
    }

    /// World (arcsec) to screen (pixel) coordinates.
    pub fn world_to_screen(&self, x: f64, y: f64, flip_y: bool) -> (f64, f64) {
        let t = self.coefficients(flip_y);
        (x * t[0] - y * t[1] + t[4], -x * t[2] + y * t[3] + t[5])
    }

    /// Screen (pixel) to world (arcsec) coordinates; the inverse of
    /// [`AffineTransform::world_to_screen`].
    pub fn screen_to_world(
        &self,
        x: f64,
        y: f64,
        flip_y: bool,
    ) -> Result<(f64, f64), TransformError> {
        let t = self.coefficients(flip_y);
        let det = t[0] * t[3] - t[1] * t[2];
        if det.abs() < DET_EPSILON {
            return Err(TransformError::DegenerateTransform {
                det,
                eps: DET_EPSILON,
            });
        }
        let x1 = x - t[4];
        let y1 = y - t[5];
        Ok(((x1 * t[3] - y1 * t[2]) / det, (-x1 * t[1] + y1 * t[0]) / det))
    }

    /// True if every matrix entry is finite.
    pub fn is_finite(&self) -> bool {
        self.mat.iter().flatten().all(|v| v.is_finite())
    }

    /// If any entry has become NaN or infinite, reset to identity so the
    /// poison cannot spread into every subsequent frame. Returns true if a
    /// reset happened.
    pub fn repair_non_finite(&mut self) -> bool {
        if self.is_finite() {
            false
        } else {
            self.reset(0.0);
            true
        }
    }
}

impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let t = self.coefficients(false);
        writeln!(
            f,
            "[{:8.2} {:8.2}]   angle: {:7.2}°",
            t[0],
            t[1],
            self.rotation_angle().to_degrees()
        )?;
        writeln!(f, "[{:8.2} {:8.2}]   scale: {:7.4}", t[2], t[3], self.get_scale())?;
        write!(f, "[{:8.2} {:8.2}]", t[4], t[5])
    }
}
