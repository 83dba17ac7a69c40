// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The per-frame slit-geometry engine.

[`compute_frame`] is a pure, idempotent recomputation: it reads the transform
triple and the target arena, and writes freshly allocated output buckets,
slit quadrilaterals and box rectangles every invocation. Nothing is cached
across frames, so a wholesale target-list replacement can never leave stale
indices in the output. Non-fatal geometry failures (a degenerate transform, a
malformed outline) are logged, tagged in [`FrameResult::errors`], and skip
only the affected sub-draw.

The host's animation-frame scheduler is expected to coalesce redraw requests
and call [`crate::frames::CoordinateFrames::repair`] then `compute_frame`
once per frame.
 */

#[cfg(test)]
mod tests;

use log::warn;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

use crate::constants::{ALIGN_BOX, GUIDE_BOX, HIT_THRESHOLD_PX, PROJECTION_COS_FLOOR};
use crate::containment::{EdgeTable, OutlineError};
use crate::frames::{CoordinateFrames, FrameAngles, Pointing};
use crate::outline::{MaskLayout, MaskOutline};
use crate::targets::{Target, TargetArena, TargetId};
use crate::transform::TransformError;

/// How a priority code classifies a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, IntoStaticStr)]
pub enum PriorityClass {
    Guide,
    Align,
    Science,
}

/// Classify a priority code. Negative codes are reserved for the fixed-size
/// non-slit regions.
pub fn classify_priority(priority: i32) -> PriorityClass {
    match priority {
        GUIDE_BOX => PriorityClass::Guide,
        ALIGN_BOX => PriorityClass::Align,
        _ => PriorityClass::Science,
    }
}

/// The explicit display configuration for one frame. Replaces the ad hoc
/// checkbox reads of earlier revisions; `compute_frame` consults nothing
/// else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Widen the priority range to cover every science target.
    pub show_all: bool,
    /// Admit science targets into the shown buckets regardless of priority.
    pub show_selected: bool,
    /// Draw the by-priority buckets rather than the selected buckets.
    pub show_by_priority: bool,
    pub min_priority: i32,
    pub max_priority: i32,
    pub show_align_boxes: bool,
    pub show_guide_boxes: bool,
    pub show_guider_fov: bool,
    pub show_bad_columns: bool,
    /// Lengthen drawn slits by 1/cos of their angle to the mask rows.
    pub project_slit_lengths: bool,
    /// Slit positions have been computed server-side; draw slit outlines
    /// instead of selection markers.
    pub slits_ready: bool,
    /// Screen point of an active nearest-target search, if any.
    pub find_nearest: Option<(f64, f64)>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            show_all: false,
            show_selected: true,
            show_by_priority: false,
            min_priority: 0,
            max_priority: 99999,
            show_align_boxes: true,
            show_guide_boxes: true,
            show_guider_fov: false,
            show_bad_columns: false,
            project_slit_lengths: false,
            slits_ready: false,
            find_nearest: None,
        }
    }
}

/// Index buckets for one frame's draw pass, split by classification and
/// mask containment. Freshly allocated every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawBuckets {
    pub guide_in: Vec<TargetId>,
    pub guide_out: Vec<TargetId>,
    pub align_in: Vec<TargetId>,
    pub align_out: Vec<TargetId>,
    pub shown_in: Vec<TargetId>,
    pub shown_out: Vec<TargetId>,
    pub selected_in: Vec<TargetId>,
    pub selected_out: Vec<TargetId>,
}

/// A slit's on-screen quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlitQuad {
    pub id: TargetId,
    /// Corner order: end-1 +normal, end-1 -normal, end-2 -normal,
    /// end-2 +normal.
    pub corners: [(f64, f64); 4],
    /// The target's screen position.
    pub center: (f64, f64),
    /// Half the slit width on screen \[pixels\]
    pub half_width_px: f64,
}

/// A guide/align box's on-screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetBox {
    pub id: TargetId,
    pub class: PriorityClass,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Outlines projected to screen space for drawing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedOutlines {
    pub mask: MaskOutline,
    pub center_cross: MaskOutline,
    pub guider_fov: Option<MaskOutline>,
    pub bad_columns: Option<MaskOutline>,
}

/// A non-fatal, per-sub-draw geometry failure. One bad frame never crashes
/// the session; the caller logs these and skips the affected sub-draw.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("Mask containment skipped: {0}")]
    Containment(#[from] OutlineError),

    #[error("Pointing readout skipped: {0}")]
    Pointing(TransformError),

    #[error("Nearest-target search skipped: {0}")]
    HitTest(TransformError),
}

/// Everything the render collaborator needs for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameResult {
    pub buckets: DrawBuckets,
    /// Screen position of every target, in arena index order.
    pub screen_positions: Vec<(f64, f64)>,
    pub boxes: Vec<TargetBox>,
    pub slits: Vec<SlitQuad>,
    /// The nearest target to `find_nearest`, if one matched.
    pub hit_index: Option<TargetId>,
    pub pointing: Option<Pointing>,
    pub outlines: ProjectedOutlines,
    pub errors: Vec<GeometryError>,
}

/// The single per-frame entry point: classify every target, build slit and
/// box geometry, run the hit test, and read out the pointing.
pub fn compute_frame(
    frames: &CoordinateFrames,
    arena: &TargetArena,
    layout: &MaskLayout,
    config: &DisplayConfig,
) -> FrameResult {
    let mut result = FrameResult::default();

    let angles = frames.frame_angles();
    let view_scale = frames.view.get_scale();
    // Arcsec of slit length to screen pixels at the current zoom.
    let arc2pix = view_scale / frames.arcsec_per_pixel();

    match frames.current_pointing() {
        Ok(p) => result.pointing = Some(p),
        Err(e) => {
            warn!("pointing readout failed: {e}");
            result.errors.push(GeometryError::Pointing(e));
        }
    }

    // Rebuild the edge table from scratch, in current screen space. On
    // malformed input the mask sub-draw is skipped but targets still
    // classify (all outside).
    let containment = layout.containment_outline().project(&frames.view);
    let edge_table = match EdgeTable::build(&containment) {
        Ok(t) => t,
        Err(e) => {
            warn!("edge table build failed: {e}");
            result.errors.push(GeometryError::Containment(e));
            EdgeTable::default()
        }
    };

    result.outlines = ProjectedOutlines {
        mask: layout.mask.project(&frames.view),
        center_cross: layout.center_cross.project(&frames.view),
        guider_fov: config
            .show_guider_fov
            .then(|| layout.guider_fov.project(&frames.view)),
        bad_columns: config
            .show_bad_columns
            .then(|| layout.bad_columns.project(&frames.view)),
    };

    // Nearest-target search state, in focal-plane coordinates with an
    // adaptive threshold: fine when zoomed in, capped when zoomed out.
    let mut search = match config.find_nearest {
        None => None,
        Some((mx, my)) => match frames.view.screen_to_world(mx, my, false) {
            Ok(point) => Some(NearestSearch {
                point,
                threshold: (HIT_THRESHOLD_PX / view_scale).min(HIT_THRESHOLD_PX),
                min_dist: f64::INFINITY,
                best: None,
            }),
            Err(e) => {
                warn!("nearest-target search failed: {e}");
                result.errors.push(GeometryError::HitTest(e));
                None
            }
        },
    };

    let (min_p, max_p) = if config.show_all {
        (0, 99999)
    } else {
        (config.min_priority, config.max_priority)
    };

    for (id, target) in arena.iter() {
        let focal = frames.catalog_to_focal(target.x_arcsec, target.y_arcsec);
        let screen = frames.view.world_to_screen(focal.0, focal.1, false);
        result.screen_positions.push(screen);

        if let Some(s) = search.as_mut() {
            s.consider(id, focal);
        }

        let inside = edge_table.check_point(screen.0, screen.1);
        match classify_priority(target.priority) {
            PriorityClass::Guide => {
                if inside {
                    result.buckets.guide_in.push(id);
                } else {
                    result.buckets.guide_out.push(id);
                }
            }
            PriorityClass::Align => {
                if inside {
                    result.buckets.align_in.push(id);
                } else {
                    result.buckets.align_out.push(id);
                }
            }
            PriorityClass::Science => {
                if config.show_selected || (min_p <= target.priority && target.priority <= max_p) {
                    if inside {
                        result.buckets.shown_in.push(id);
                    } else {
                        result.buckets.shown_out.push(id);
                    }
                    if target.selected {
                        if inside {
                            result.buckets.selected_in.push(id);
                        } else {
                            result.buckets.selected_out.push(id);
                        }
                    }
                }
            }
        }
    }

    result.hit_index = search.and_then(|s| s.best);

    if config.show_guide_boxes {
        let boxes = boxes_for(
            &result.buckets.guide_in,
            &result.buckets.guide_out,
            &result.screen_positions,
            arena,
            PriorityClass::Guide,
            arc2pix,
        );
        result.boxes.extend(boxes);
    }
    if config.show_align_boxes {
        let boxes = boxes_for(
            &result.buckets.align_in,
            &result.buckets.align_out,
            &result.screen_positions,
            arena,
            PriorityClass::Align,
            arc2pix,
        );
        result.boxes.extend(boxes);
    }

    if config.slits_ready {
        let mut slits = Vec::with_capacity(result.buckets.selected_in.len());
        for &id in &result.buckets.selected_in {
            // Ids were just issued by this arena; get() cannot fail here.
            if let Ok(target) = arena.get(id) {
                let screen = result.screen_positions[id.index];
                slits.push(slit_quad(id, target, screen, &angles, arc2pix, config));
            }
        }
        result.slits = slits;
    }

    result
}

struct NearestSearch {
    point: (f64, f64),
    threshold: f64,
    min_dist: f64,
    best: Option<TargetId>,
}

impl NearestSearch {
    /// Track the closest candidate within the box threshold; ties keep the
    /// earlier (lower) index.
    fn consider(&mut self, id: TargetId, focal: (f64, f64)) {
        let dx = (self.point.0 - focal.0).abs();
        let dy = (self.point.1 - focal.1).abs();
        if dx < self.threshold && dy < self.threshold {
            let dist = dx.hypot(dy);
            if dist < self.min_dist {
                self.min_dist = dist;
                self.best = Some(id);
            }
        }
    }
}

fn boxes_for(
    bucket_in: &[TargetId],
    bucket_out: &[TargetId],
    positions: &[(f64, f64)],
    arena: &TargetArena,
    class: PriorityClass,
    arc2pix: f64,
) -> Vec<TargetBox> {
    let mut boxes = Vec::with_capacity(bucket_in.len() + bucket_out.len());
    for &id in bucket_in.iter().chain(bucket_out.iter()) {
        if let Ok(target) = arena.get(id) {
            let (x, y) = positions[id.index];
            let l1 = target.length1_arcsec * arc2pix;
            let l2 = target.length2_arcsec * arc2pix;
            boxes.push(TargetBox {
                id,
                class,
                x0: x - l1,
                y0: y - l1,
                x1: x + l2,
                y1: y + l2,
            });
        }
    }
    boxes
}

/// Compute one slit's screen-space quadrilateral.
///
/// Sign convention: slit position angle is measured on sky,
/// counter-clockwise positive; the slit's screen direction is the view+sky
/// base angle minus the slit PA. Width is laid along the mask-row normal
/// (view rotation + 90°), so slits stay flush with the mask as the display
/// rotates.
fn slit_quad(
    id: TargetId,
    target: &Target,
    (sx, sy): (f64, f64),
    angles: &FrameAngles,
    arc2pix: f64,
    config: &DisplayConfig,
) -> SlitQuad {
    let mut l1 = target.length1_arcsec * arc2pix;
    let mut l2 = target.length2_arcsec * arc2pix;
    let half_width = target.slit_width_arcsec * arc2pix * 0.5;

    let slit_pa_rad = target.slit_pa_deg.to_radians();

    if config.project_slit_lengths {
        // The drawn length grows as the slit tilts away from the mask rows.
        // The clamp keeps grazing-incidence slits finite; flagged for
        // validation against the server-side cutting algorithm.
        let c = (angles.sky_rot_rad - slit_pa_rad).cos();
        let c = if c < 0.0 {
            c.min(-PROJECTION_COS_FLOOR)
        } else {
            c.max(PROJECTION_COS_FLOOR)
        };
        l1 /= c;
        l2 /= c;
    }

    let (sin_t, cos_t) = (angles.slit_base_rad - slit_pa_rad).sin_cos();
    let (x11, y11) = (sx + cos_t * l1, sy + sin_t * l1);
    let (x12, y12) = (sx - cos_t * l2, sy - sin_t * l2);

    // Unit normal to the mask rows on screen.
    let (sin_m, cos_m) = angles.view_rot_rad.sin_cos();
    let (ox, oy) = (-sin_m * half_width, cos_m * half_width);

    SlitQuad {
        id,
        corners: [
            (x11 + ox, y11 + oy),
            (x11 - ox, y11 - oy),
            (x12 - ox, y12 - oy),
            (x12 + ox, y12 + oy),
        ],
        center: (sx, sy),
        half_width_px: half_width,
    }
}
