// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Mask outlines.

An outline is an ordered list of opcoded vertices describing one or more
disjoint sub-paths in focal-plane arcsec: the mask body, the guider field of
view, detector bad columns, and a decorative centre cross. Sub-paths
terminated by [`Opcode::CloseLoop`] are closed polygons and participate in
containment testing; open polylines are drawn only.
 */

mod layouts;
#[cfg(test)]
mod tests;

pub use layouts::{CENTER_CROSS, DEIMOS_BAD_COLUMNS, DEIMOS_GUIDER_FOV, DEIMOS_MASK};

use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use crate::transform::AffineTransform;

/// What a vertex does to the pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opcode {
    /// Start a new sub-path.
    MoveTo,

    /// Extend the current sub-path.
    LineTo,

    /// Close the current sub-path back to its `MoveTo` vertex. The closing
    /// vertex's own coordinates are ignored; the loop always closes to the
    /// sub-path start.
    CloseLoop,
}

/// One outline vertex, in focal-plane arcsec (or screen pixels once
/// projected).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub op: Opcode,
}

/// An ordered sequence of opcoded vertices, possibly several disjoint
/// sub-paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskOutline {
    pub vertices: Vec<Vertex>,
}

/// Axis-aligned bounds of an outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// The full set of outlines a mask design works with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskLayout {
    pub mask: MaskOutline,
    pub guider_fov: MaskOutline,
    pub bad_columns: MaskOutline,
    pub center_cross: MaskOutline,
}

impl MaskLayout {
    /// The DEIMOS instrument layout.
    pub fn deimos() -> MaskLayout {
        MaskLayout {
            mask: DEIMOS_MASK.clone(),
            guider_fov: DEIMOS_GUIDER_FOV.clone(),
            bad_columns: DEIMOS_BAD_COLUMNS.clone(),
            center_cross: CENTER_CROSS.clone(),
        }
    }

    /// The combined outline containment tests run against: mask body plus
    /// guider FOV plus bad columns. The centre cross is open and draw-only.
    pub fn containment_outline(&self) -> MaskOutline {
        MaskOutline::combined(&[&self.mask, &self.guider_fov, &self.bad_columns])
    }
}

impl MaskOutline {
    pub fn new() -> MaskOutline {
        MaskOutline { vertices: vec![] }
    }

    /// Build an outline from (x, y, opcode) rows.
    pub fn from_rows(rows: &[(f64, f64, Opcode)]) -> MaskOutline {
        MaskOutline {
            vertices: rows
                .iter()
                .map(|&(x, y, op)| Vertex { x, y, op })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append another outline's sub-paths to this one.
    pub fn extend_from(&mut self, other: &MaskOutline) {
        self.vertices.extend_from_slice(&other.vertices);
    }

    /// Concatenate several outlines into one.
    pub fn combined(parts: &[&MaskOutline]) -> MaskOutline {
        let mut out = MaskOutline::new();
        for part in parts {
            out.extend_from(part);
        }
        out
    }

    /// Project every vertex through the view transform, producing a
    /// screen-space outline with the same opcodes.
    pub fn project(&self, view: &AffineTransform) -> MaskOutline {
        MaskOutline {
            vertices: self
                .vertices
                .iter()
                .map(|v| {
                    let (x, y) = view.world_to_screen(v.x, v.y, false);
                    Vertex { x, y, op: v.op }
                })
                .collect(),
        }
    }

    /// Axis-aligned bounding box over all vertices, or `None` if the outline
    /// is empty.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let xs = match self.vertices.iter().map(|v| v.x).minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(x) => (x, x),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        let ys = match self.vertices.iter().map(|v| v.y).minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(y) => (y, y),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        Some(BoundingBox {
            min_x: xs.0,
            min_y: ys.0,
            max_x: xs.1,
            max_y: ys.1,
        })
    }
}
