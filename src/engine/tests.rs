// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;

use super::*;
use crate::constants::{ALIGN_BOX, GUIDE_BOX};
use crate::frames::PlateScaleConfig;
use crate::outline::Opcode::*;

fn identity_frames() -> CoordinateFrames {
    CoordinateFrames::new(PlateScaleConfig::default(), 1000.0, 500.0)
}

fn square_layout() -> MaskLayout {
    MaskLayout {
        mask: MaskOutline::from_rows(&[
            (0.0, 0.0, MoveTo),
            (100.0, 0.0, LineTo),
            (100.0, 100.0, LineTo),
            (0.0, 100.0, LineTo),
            (0.0, 0.0, CloseLoop),
        ]),
        ..MaskLayout::default()
    }
}

fn target_at(name: &str, x: f64, y: f64, priority: i32, selected: bool) -> Target {
    let mut t = Target::new(name, 0.0, 0.0, x, y);
    t.priority = priority;
    t.selected = selected;
    t
}

fn arena_of(targets: Vec<Target>) -> TargetArena {
    let mut arena = TargetArena::new();
    arena.replace_all(targets);
    arena
}

#[test]
fn test_bucket_conservation_by_priority() {
    let arena = arena_of(vec![
        target_at("p1", 10.0, 10.0, 1, false),
        target_at("p2", 20.0, 10.0, 2, true),
        target_at("p3", 30.0, 10.0, 3, false),
        target_at("p4", 40.0, 10.0, 4, true),
        target_at("p5", 50.0, 10.0, 5, false),
        target_at("g", 60.0, 10.0, GUIDE_BOX, false),
        target_at("a", 70.0, 10.0, ALIGN_BOX, false),
    ]);
    let config = DisplayConfig {
        show_selected: false,
        show_by_priority: true,
        min_priority: 2,
        max_priority: 4,
        ..DisplayConfig::default()
    };
    let frames = identity_frames();
    let result = compute_frame(&frames, &arena, &square_layout(), &config);

    let mut shown: Vec<usize> = result
        .buckets
        .shown_in
        .iter()
        .chain(result.buckets.shown_out.iter())
        .map(|id| id.index)
        .collect();
    shown.sort_unstable();
    assert_eq!(shown, vec![1, 2, 3]);

    let mut selected: Vec<usize> = result
        .buckets
        .selected_in
        .iter()
        .chain(result.buckets.selected_out.iter())
        .map(|id| id.index)
        .collect();
    selected.sort_unstable();
    assert_eq!(selected, vec![1, 3]);

    // Guide/align targets never leak into the science buckets.
    let guide: Vec<usize> = result
        .buckets
        .guide_in
        .iter()
        .chain(result.buckets.guide_out.iter())
        .map(|id| id.index)
        .collect();
    assert_eq!(guide, vec![5]);
    let align: Vec<usize> = result
        .buckets
        .align_in
        .iter()
        .chain(result.buckets.align_out.iter())
        .map(|id| id.index)
        .collect();
    assert_eq!(align, vec![6]);
}

#[test]
fn test_show_all_widens_priority_range() {
    let arena = arena_of(vec![
        target_at("p0", 10.0, 10.0, 0, false),
        target_at("p9999", 20.0, 10.0, 9999, false),
    ]);
    let config = DisplayConfig {
        show_all: true,
        show_selected: false,
        show_by_priority: true,
        min_priority: 5,
        max_priority: 5,
        ..DisplayConfig::default()
    };
    let frames = identity_frames();
    let result = compute_frame(&frames, &arena, &square_layout(), &config);
    assert_eq!(
        result.buckets.shown_in.len() + result.buckets.shown_out.len(),
        2
    );
}

#[test]
fn test_containment_split() {
    let arena = arena_of(vec![
        target_at("in", 50.0, 50.0, 1, false),
        target_at("out", 150.0, 50.0, 1, false),
    ]);
    let config = DisplayConfig {
        show_selected: false,
        show_by_priority: true,
        min_priority: 0,
        max_priority: 10,
        ..DisplayConfig::default()
    };
    let frames = identity_frames();
    let result = compute_frame(&frames, &arena, &square_layout(), &config);

    assert_eq!(result.buckets.shown_in.len(), 1);
    assert_eq!(result.buckets.shown_in[0].index, 0);
    assert_eq!(result.buckets.shown_out.len(), 1);
    assert_eq!(result.buckets.shown_out[0].index, 1);
}

#[test]
fn test_guide_box_geometry() {
    let mut guide = target_at("g", 50.0, 50.0, GUIDE_BOX, false);
    guide.length1_arcsec = 4.0;
    guide.length2_arcsec = 6.0;
    let arena = arena_of(vec![guide]);
    let frames = identity_frames();
    let result = compute_frame(
        &frames,
        &arena,
        &square_layout(),
        &DisplayConfig::default(),
    );

    assert_eq!(result.buckets.guide_in.len(), 1);
    assert_eq!(result.boxes.len(), 1);
    let b = &result.boxes[0];
    assert_eq!(b.class, PriorityClass::Guide);
    assert_abs_diff_eq!(b.x0, 46.0);
    assert_abs_diff_eq!(b.y0, 46.0);
    assert_abs_diff_eq!(b.x1, 56.0);
    assert_abs_diff_eq!(b.y1, 56.0);
}

#[test]
fn test_boxes_respect_display_flags() {
    let arena = arena_of(vec![
        target_at("g", 50.0, 50.0, GUIDE_BOX, false),
        target_at("a", 60.0, 50.0, ALIGN_BOX, false),
    ]);
    let config = DisplayConfig {
        show_guide_boxes: false,
        show_align_boxes: true,
        ..DisplayConfig::default()
    };
    let frames = identity_frames();
    let result = compute_frame(&frames, &arena, &square_layout(), &config);

    // Classification always happens; only the box output is gated.
    assert_eq!(result.buckets.guide_in.len(), 1);
    assert_eq!(result.boxes.len(), 1);
    assert_eq!(result.boxes[0].class, PriorityClass::Align);
}

#[test]
fn test_nearest_target_selection() {
    let arena = arena_of(vec![
        target_at("t0", 0.0, 0.0, 1, false),
        target_at("t1", 5.0, 5.0, 1, false),
        target_at("t2", 100.0, 100.0, 1, false),
    ]);
    let config = DisplayConfig {
        find_nearest: Some((4.0, 4.0)),
        ..DisplayConfig::default()
    };
    let frames = identity_frames();
    let result = compute_frame(&frames, &arena, &square_layout(), &config);
    assert_eq!(result.hit_index.map(|id| id.index), Some(1));
}

#[test]
fn test_nearest_target_tie_keeps_lowest_index() {
    let arena = arena_of(vec![
        target_at("t0", 3.0, 4.0, 1, false),
        target_at("t1", 5.0, 4.0, 1, false),
    ]);
    let config = DisplayConfig {
        find_nearest: Some((4.0, 4.0)),
        ..DisplayConfig::default()
    };
    let frames = identity_frames();
    let result = compute_frame(&frames, &arena, &square_layout(), &config);
    assert_eq!(result.hit_index.map(|id| id.index), Some(0));
}

#[test]
fn test_nearest_target_threshold_adapts_to_zoom() {
    let arena = arena_of(vec![target_at("t", 0.0, 0.0, 1, false)]);
    let mut frames = identity_frames();
    frames.view.scale(2.0);
    // Threshold in focal-plane units is 7/2 = 3.5.
    let far = frames.view.world_to_screen(4.0, 0.0, false);
    let near = frames.view.world_to_screen(3.0, 0.0, false);

    let config = DisplayConfig {
        find_nearest: Some(far),
        ..DisplayConfig::default()
    };
    let result = compute_frame(&frames, &arena, &square_layout(), &config);
    assert_eq!(result.hit_index, None);

    let config = DisplayConfig {
        find_nearest: Some(near),
        ..DisplayConfig::default()
    };
    let result = compute_frame(&frames, &arena, &square_layout(), &config);
    assert_eq!(result.hit_index.map(|id| id.index), Some(0));
}

#[test]
fn test_slits_only_for_selected_inside_when_ready() {
    let arena = arena_of(vec![
        target_at("in-sel", 50.0, 50.0, 1, true),
        target_at("in-unsel", 40.0, 50.0, 1, false),
        target_at("out-sel", 150.0, 50.0, 1, true),
    ]);
    let frames = identity_frames();

    let config = DisplayConfig::default();
    let result = compute_frame(&frames, &arena, &square_layout(), &config);
    assert!(result.slits.is_empty());

    let config = DisplayConfig {
        slits_ready: true,
        ..DisplayConfig::default()
    };
    let result = compute_frame(&frames, &arena, &square_layout(), &config);
    assert_eq!(result.slits.len(), 1);
    assert_eq!(result.slits[0].id.index, 0);
}

#[test]
fn test_degenerate_slit_collapses_to_point() {
    let mut t = target_at("deg", 50.0, 50.0, 1, true);
    t.length1_arcsec = 0.0;
    t.length2_arcsec = 0.0;
    t.slit_width_arcsec = 0.0;
    let arena = arena_of(vec![t]);
    let config = DisplayConfig {
        slits_ready: true,
        ..DisplayConfig::default()
    };
    let frames = identity_frames();
    let result = compute_frame(&frames, &arena, &square_layout(), &config);

    assert_eq!(result.slits.len(), 1);
    let quad = &result.slits[0];
    for &(x, y) in &quad.corners {
        assert!(x.is_finite() && y.is_finite());
        assert_abs_diff_eq!(x, 50.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 50.0, epsilon = 1e-12);
    }
}

#[test]
fn test_slit_direction_convention() {
    // View and sky unrotated: a zero-PA slit lies along +x, a 90-degree
    // slit along -y.
    let mut flat = target_at("flat", 50.0, 50.0, 1, true);
    flat.length1_arcsec = 8.0;
    let mut steep = target_at("steep", 20.0, 20.0, 1, true);
    steep.length1_arcsec = 8.0;
    steep.slit_pa_deg = 90.0;
    let arena = arena_of(vec![flat, steep]);
    let config = DisplayConfig {
        slits_ready: true,
        ..DisplayConfig::default()
    };
    let frames = identity_frames();
    let result = compute_frame(&frames, &arena, &square_layout(), &config);

    let flat_quad = &result.slits[0];
    // End 1 is 8 px along +x from the target, offset half a width in y.
    assert_abs_diff_eq!(flat_quad.corners[0].0, 58.0, epsilon = 1e-9);
    assert_abs_diff_eq!(
        flat_quad.corners[0].1,
        50.0 + flat_quad.half_width_px,
        epsilon = 1e-9
    );

    // Width stays along the mask-row normal regardless of slit PA.
    let steep_quad = &result.slits[1];
    assert_abs_diff_eq!(steep_quad.corners[0].0, 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(
        steep_quad.corners[0].1,
        12.0 + steep_quad.half_width_px,
        epsilon = 1e-9
    );
}

#[test]
fn test_projected_length_clamped_near_grazing() {
    let mut t = target_at("grazing", 50.0, 50.0, 1, true);
    t.length1_arcsec = 4.0;
    t.length2_arcsec = 4.0;
    t.slit_pa_deg = 90.0;
    let arena = arena_of(vec![t]);
    let config = DisplayConfig {
        slits_ready: true,
        project_slit_lengths: true,
        ..DisplayConfig::default()
    };
    let frames = identity_frames();
    let result = compute_frame(&frames, &arena, &square_layout(), &config);

    let quad = &result.slits[0];
    let (cx, cy) = quad.center;
    // Midpoint of the first slit end, which cancels the width offset.
    let ex = (quad.corners[0].0 + quad.corners[1].0) / 2.0;
    let ey = (quad.corners[0].1 + quad.corners[1].1) / 2.0;
    let len = (ex - cx).hypot(ey - cy);
    assert!(len.is_finite());
    // cos is clamped at 0.01, so 4 arcsec projects to 400 px, no further.
    assert_abs_diff_eq!(len, 400.0, epsilon = 1e-6);
}

#[test]
fn test_malformed_outline_skips_containment_only() {
    let arena = arena_of(vec![target_at("t", 50.0, 50.0, 1, false)]);
    let layout = MaskLayout {
        mask: MaskOutline::from_rows(&[(0.0, 0.0, LineTo)]),
        ..MaskLayout::default()
    };
    let frames = identity_frames();
    let result = compute_frame(&frames, &arena, &layout, &DisplayConfig::default());

    assert!(matches!(
        result.errors.as_slice(),
        [GeometryError::Containment(_)]
    ));
    // Targets still classify, just all outside.
    assert_eq!(result.buckets.shown_out.len(), 1);
    assert!(result.buckets.shown_in.is_empty());
    // Pointing is unaffected.
    assert!(result.pointing.is_some());
}

#[test]
fn test_buckets_carry_current_generation() {
    let mut arena = arena_of(vec![
        target_at("a", 50.0, 50.0, 1, false),
        target_at("b", 60.0, 50.0, 1, false),
    ]);
    let frames = identity_frames();
    let config = DisplayConfig::default();

    let first = compute_frame(&frames, &arena, &square_layout(), &config);
    arena.replace_all(vec![target_at("c", 50.0, 50.0, 1, false)]);
    let second = compute_frame(&frames, &arena, &square_layout(), &config);

    // Fresh buckets, fresh generation: ids from the first frame are stale,
    // ids from the second resolve.
    let old_id = first.buckets.shown_in[0];
    assert!(arena.get(old_id).is_err());
    for id in &second.buckets.shown_in {
        assert!(arena.get(*id).is_ok());
    }
    assert_eq!(second.screen_positions.len(), 1);
}

#[test]
fn test_screen_positions_in_index_order() {
    let arena = arena_of(vec![
        target_at("a", 1.0, 2.0, 1, false),
        target_at("b", 3.0, 4.0, 1, false),
    ]);
    let frames = identity_frames();
    let result = compute_frame(
        &frames,
        &arena,
        &square_layout(),
        &DisplayConfig::default(),
    );
    assert_eq!(result.screen_positions, vec![(1.0, 2.0), (3.0, 4.0)]);
}

#[test]
fn test_frame_is_idempotent() {
    let arena = arena_of(vec![
        target_at("a", 50.0, 50.0, 1, true),
        target_at("g", 60.0, 50.0, GUIDE_BOX, false),
    ]);
    let frames = identity_frames();
    let config = DisplayConfig {
        slits_ready: true,
        find_nearest: Some((50.0, 50.0)),
        ..DisplayConfig::default()
    };
    let r1 = compute_frame(&frames, &arena, &square_layout(), &config);
    let r2 = compute_frame(&frames, &arena, &square_layout(), &config);
    assert_eq!(r1, r2);
}

#[test]
fn test_outline_projection_follows_view() {
    let arena = TargetArena::new();
    let mut frames = identity_frames();
    frames.view.scale(3.0);
    let config = DisplayConfig {
        show_guider_fov: true,
        ..DisplayConfig::default()
    };
    let result = compute_frame(&frames, &arena, &square_layout(), &config);

    assert_abs_diff_eq!(result.outlines.mask.vertices[1].x, 300.0, epsilon = 1e-12);
    // The guider FOV of this layout is empty but requested, so present.
    assert!(result.outlines.guider_fov.is_some());
    assert!(result.outlines.bad_columns.is_none());
}
