// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Geometry core for an interactive astronomical slit-mask design tool.

Targets from a catalog are positioned relative to a physical slit mask. This
crate maps between the three coordinate spaces involved (sky RA/Dec,
focal-plane arcsec, screen pixels), tracks the independently pan/zoom/rotatable
view and sky frames, decides which targets fall inside the polygonal mask
boundary, and turns target + mask state into per-frame draw buckets and slit
quadrilaterals. Rendering, event plumbing and catalog I/O live in the host
application.
 */

pub mod constants;
pub mod containment;
pub mod engine;
mod error;
pub mod frames;
pub mod outline;
pub mod targets;
pub mod transform;

// Re-exports.
pub use constants::*;
pub use containment::EdgeTable;
pub use engine::{
    compute_frame, DisplayConfig, DrawBuckets, FrameResult, GeometryError, PriorityClass,
    SlitQuad, TargetBox,
};
pub use error::SlitmaskError;
pub use frames::{CoordinateFrames, MouseMode, PlateScaleConfig, Pointing};
pub use outline::{MaskLayout, MaskOutline, Opcode, Vertex};
pub use targets::{DesignEdit, Target, TargetArena, TargetId};
pub use transform::AffineTransform;

// External re-exports.
pub use log::{debug, error, info, trace, warn};
