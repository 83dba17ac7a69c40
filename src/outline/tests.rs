// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;

use super::*;

#[test]
fn test_deimos_mask_bounding_box() {
    let bbox = DEIMOS_MASK.bounding_box().unwrap();
    assert_abs_diff_eq!(bbox.min_x, -498.0);
    assert_abs_diff_eq!(bbox.max_x, 498.0);
    assert_abs_diff_eq!(bbox.min_y, 187.0);
    assert_abs_diff_eq!(bbox.max_y, 479.0);
    assert_abs_diff_eq!(bbox.width(), 996.0);
    assert_abs_diff_eq!(bbox.height(), 292.0);
}

#[test]
fn test_empty_outline_has_no_bounding_box() {
    assert!(MaskOutline::new().bounding_box().is_none());
}

#[test]
fn test_project_through_identity_is_identity() {
    let view = AffineTransform::new();
    let projected = DEIMOS_MASK.project(&view);
    assert_eq!(projected, *DEIMOS_MASK);
}

#[test]
fn test_project_applies_view_scale() {
    let mut view = AffineTransform::new();
    view.scale(2.0);
    view.translate(10.0, 20.0);
    let square = MaskOutline::from_rows(&[
        (0.0, 0.0, Opcode::MoveTo),
        (5.0, 0.0, Opcode::LineTo),
        (5.0, 5.0, Opcode::LineTo),
        (0.0, 0.0, Opcode::CloseLoop),
    ]);
    let projected = square.project(&view);
    assert_abs_diff_eq!(projected.vertices[1].x, 20.0);
    assert_abs_diff_eq!(projected.vertices[1].y, 20.0);
    assert_abs_diff_eq!(projected.vertices[2].y, 30.0);
    assert_eq!(projected.vertices[3].op, Opcode::CloseLoop);
}

#[test]
fn test_combined_preserves_order() {
    let combined = MaskOutline::combined(&[&DEIMOS_MASK, &DEIMOS_GUIDER_FOV, &DEIMOS_BAD_COLUMNS]);
    let expected_len = DEIMOS_MASK.vertices.len()
        + DEIMOS_GUIDER_FOV.vertices.len()
        + DEIMOS_BAD_COLUMNS.vertices.len();
    assert_eq!(combined.vertices.len(), expected_len);
    assert_eq!(combined.vertices[0], DEIMOS_MASK.vertices[0]);
}

#[test]
fn test_center_cross_is_open() {
    assert!(CENTER_CROSS
        .vertices
        .iter()
        .all(|v| v.op != Opcode::CloseLoop));
}
