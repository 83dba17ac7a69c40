// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision; the geometry accumulates many small
interactive updates and single precision drifts visibly within a session.
 */

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Priority code marking a target as a guide-star box rather than a science
/// slit.
pub const GUIDE_BOX: i32 = -1;

/// Priority code marking a target as an alignment box rather than a science
/// slit.
pub const ALIGN_BOX: i32 = -2;

/// Focal-plane x offset of the mask reference point \[arcsec\].
pub const MASK_OFFSET_X_AS: f64 = 0.0;

/// Focal-plane y offset of the mask reference point \[arcsec\]. The mask
/// sits above the optical axis in the focal plane.
pub const MASK_OFFSET_Y_AS: f64 = 270.0;

/// Default plate scale \[arcsec/micron\].
pub const DEFAULT_PLATE_SCALE_AS_PER_UM: f64 = 1.0;

/// Default detector pixel pitch \[micron/pixel\].
pub const DEFAULT_PIXEL_PITCH_UM: f64 = 1.0;

/// A 2x2 transform block with |determinant| below this cannot be inverted.
pub const DET_EPSILON: f64 = 1e-12;

/// cos(dec) is clamped to this floor when correcting RA offsets, so that
/// pointings near the pole stay finite.
pub const COS_DEC_FLOOR: f64 = 1e-4;

/// Nearest-target searches match within this many screen pixels (before the
/// adaptive division by view scale).
pub const HIT_THRESHOLD_PX: f64 = 7.0;

/// Sign-preserving floor on cos(slit PA) when projecting slit lengths, so
/// that slits near grazing incidence keep a finite drawn length.
pub const PROJECTION_COS_FLOOR: f64 = 0.01;
