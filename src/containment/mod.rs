// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Scanline point-in-polygon containment.

An [`EdgeTable`] is built fresh each frame from a screen-projected
[`MaskOutline`]: for every closed sub-path, each non-horizontal edge deposits
an x-crossing on every integer scanline it spans, and queries pair the sorted
crossings with the even-odd rule. Build cost is the total scanline span of
all edges; a query costs the number of crossings on its row.

Vertex y values are floored on ingest and the scanline span is half-open
(`floor(y1) <= y < floor(y2)`), which gives a deterministic tie rule for
points exactly on a horizontal boundary. This feeds draw classification, not
physical mask cutting, so the exact boundary convention only has to be
deterministic.
 */

mod error;

pub use error::OutlineError;

use std::collections::HashMap;

use crate::outline::{MaskOutline, Opcode};

/// Ephemeral map from integer scanline row to the sorted x-crossings of all
/// closed sub-path edges.
#[derive(Debug, Default, PartialEq)]
pub struct EdgeTable {
    rows: HashMap<i64, Vec<f64>>,
}

impl EdgeTable {
    /// Build from a screen-projected outline. Open sub-paths (no
    /// `CloseLoop`) contribute no edges; a `LineTo` or `CloseLoop` with no
    /// open sub-path is malformed input.
    pub fn build(outline: &MaskOutline) -> Result<EdgeTable, OutlineError> {
        let mut rows: HashMap<i64, Vec<f64>> = HashMap::new();
        // The open sub-path, with vertex y floored on ingest.
        let mut subpath: Vec<(f64, i64)> = vec![];
        let mut open = false;

        for (index, v) in outline.vertices.iter().enumerate() {
            let point = (v.x, v.y.floor() as i64);
            match v.op {
                Opcode::MoveTo => {
                    // An unclosed predecessor is drawing-only; its buffered
                    // vertices are dropped.
                    subpath.clear();
                    subpath.push(point);
                    open = true;
                }
                Opcode::LineTo => {
                    if !open {
                        return Err(OutlineError::LineToWithoutMoveTo { index });
                    }
                    subpath.push(point);
                }
                Opcode::CloseLoop => {
                    if !open {
                        return Err(OutlineError::CloseLoopWithoutMoveTo { index });
                    }
                    // The closing vertex's coordinates are ignored; the loop
                    // closes back to its start.
                    for pair in subpath.windows(2) {
                        add_edge(&mut rows, pair[0], pair[1]);
                    }
                    if subpath.len() > 1 {
                        add_edge(&mut rows, subpath[subpath.len() - 1], subpath[0]);
                    }
                    subpath.clear();
                    open = false;
                }
            }
        }

        for crossings in rows.values_mut() {
            crossings.sort_by(|a, b| a.total_cmp(b));
        }

        Ok(EdgeTable { rows })
    }

    /// Even-odd containment query at screen point (`x`, `y`). Points
    /// strictly between a crossing pair are inside; a dangling unpaired
    /// final crossing (malformed input) is ignored.
    pub fn check_point(&self, x: f64, y: f64) -> bool {
        let crossings = match self.rows.get(&(y.floor() as i64)) {
            None => return false,
            Some(c) => c,
        };
        crossings
            .chunks_exact(2)
            .any(|pair| pair[0] < x && x < pair[1])
    }

    /// True if no closed sub-path contributed any edge.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Deposit one edge's x-crossings on every scanline in its half-open span.
fn add_edge(rows: &mut HashMap<i64, Vec<f64>>, a: (f64, i64), b: (f64, i64)) {
    let ((x1, y1), (x2, y2)) = if a.1 <= b.1 { (a, b) } else { (b, a) };
    if y1 == y2 {
        // Horizontal edges never cross a scanline.
        return;
    }
    let m = (x2 - x1) / (y2 - y1) as f64;
    let b = -m * y1 as f64 + x1;
    for y in y1..y2 {
        rows.entry(y).or_default().push(y as f64 * m + b);
    }
}
