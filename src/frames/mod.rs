// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The three chained coordinate frames of the display.

- `view`: focal-plane arcsec to screen pixels. Panning, zooming and rotating
  the whole display act here.
- `sky`: catalog arcsec offsets to virtual sky position, further mapped by
  `view`. Panning or rotating the sky relative to the fixed mask acts here.
- `reference_sky`: shares `sky`'s manipulation lineage but starts rotated by
  the original mask position angle; inverting it at the mask reference point
  recovers the current pointing.

`current_pointing` is a pure function of transform state: N interactive
operations followed by a readout, then rebuilding the frames from that
readout, reproduces the same screen-space target positions to floating
tolerance.
 */


use log::warn;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::constants::{
    COS_DEC_FLOOR, DEFAULT_PIXEL_PITCH_UM, DEFAULT_PLATE_SCALE_AS_PER_UM, MASK_OFFSET_X_AS,
    MASK_OFFSET_Y_AS, PI,
};
use crate::outline::BoundingBox;
use crate::transform::{AffineTransform, TransformError};

/// Normalize degrees into (-180, 180].
fn norm180(x: f64) -> f64 {
    let x = x.rem_euclid(360.0);
    if x > 180.0 {
        x - 360.0
    } else {
        x
    }
}

/// Instrument scale factors used to derive arcsec per screen pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateScaleConfig {
    /// Plate scale \[arcsec/micron\]
    pub plate_scale_as_per_um: f64,
    /// Detector pixel pitch \[micron/pixel\]
    pub pixel_pitch_um: f64,
}

impl Default for PlateScaleConfig {
    fn default() -> Self {
        PlateScaleConfig {
            plate_scale_as_per_um: DEFAULT_PLATE_SCALE_AS_PER_UM,
            pixel_pitch_um: DEFAULT_PIXEL_PITCH_UM,
        }
    }
}

impl PlateScaleConfig {
    /// Arcsec per screen pixel at view scale 1.
    pub fn arcsec_per_pixel(&self) -> f64 {
        self.plate_scale_as_per_um * self.pixel_pitch_um
    }
}

/// The telescope pointing implied by the current transform state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointing {
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub pa_deg: f64,
}

/// Sky and focal-plane coordinates under a screen point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyReadout {
    pub ra_hour: f64,
    pub dec_deg: f64,
    /// Catalog-frame offset \[arcsec\]
    pub x_arcsec: f64,
    /// Catalog-frame offset \[arcsec\]
    pub y_arcsec: f64,
}

/// Screen-space angles derived once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameAngles {
    /// View rotation \[radians\]; also the mask base angle on screen.
    pub view_rot_rad: f64,
    /// Sky rotation relative to the mask \[radians\]
    pub sky_rot_rad: f64,
    /// Current telescope position angle \[degrees\]
    pub sky_pa_deg: f64,
    /// Screen angle of the compass-north arrow \[degrees\]
    pub compass_north_deg: f64,
    /// Base screen angle slits are measured from \[radians\]
    pub slit_base_rad: f64,
}

/// Which frame a mouse drag manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum MouseMode {
    PanAll,
    PanSky,
    RotateAll,
    RotateSky,
    Zoom,
}

/// One mouse-drag step: a pixel delta and the change of the angle subtended
/// at the canvas centre.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragDelta {
    pub dx: f64,
    pub dy: f64,
    pub dangle_rad: f64,
}

#[derive(Debug, Clone)]
pub struct CoordinateFrames {
    pub view: AffineTransform,
    pub sky: AffineTransform,
    pub reference_sky: AffineTransform,

    plate: PlateScaleConfig,
    canvas_width: f64,
    canvas_height: f64,

    /// Pointing centre RA at load time [degrees]
    center_ra_deg: f64,
    /// Pointing centre Dec at load time [degrees]
    center_dec_deg: f64,
    /// Mask position angle at load time [degrees]
    orig_pa_deg: f64,
}

impl CoordinateFrames {
    pub fn new(plate: PlateScaleConfig, canvas_width: f64, canvas_height: f64) -> CoordinateFrames {
        CoordinateFrames {
            view: AffineTransform::new(),
            sky: AffineTransform::new(),
            reference_sky: AffineTransform::new(),
            plate,
            canvas_width,
            canvas_height,
            center_ra_deg: 0.0,
            center_dec_deg: 0.0,
            orig_pa_deg: 0.0,
        }
    }

    /// Set the load-time pointing context and re-seed the sky frames.
    pub fn set_pointing_context(&mut self, ra_deg: f64, dec_deg: f64, pa_deg: f64) {
        self.center_ra_deg = ra_deg;
        self.center_dec_deg = dec_deg;
        self.orig_pa_deg = pa_deg;
        self.reset_offsets();
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    pub fn arcsec_per_pixel(&self) -> f64 {
        self.plate.arcsec_per_pixel()
    }

    pub fn orig_pa_deg(&self) -> f64 {
        self.orig_pa_deg
    }

    fn canvas_center(&self) -> (f64, f64) {
        (self.canvas_width / 2.0, self.canvas_height / 2.0)
    }

    // ------------------------------------------------------------------
    // View manipulation.

    /// Pan the whole display by a screen-pixel delta.
    pub fn pan_view(&mut self, dx: f64, dy: f64) {
        self.view.translate(dx, dy);
    }

    /// Zoom about the canvas centre; `steps` in wheel clicks of 1%.
    pub fn zoom_view(&mut self, steps: f64) {
        let (cx, cy) = self.canvas_center();
        self.view.scale_about(1.01_f64.powf(steps), cx, cy);
    }

    /// Rotate the whole display about the canvas centre.
    pub fn rotate_view(&mut self, dangle_rad: f64) {
        let (cx, cy) = self.canvas_center();
        self.view.rotate_about(dangle_rad, cx, cy);
    }

    // ------------------------------------------------------------------
    // Sky manipulation. Every operation moves `sky` and `reference_sky`
    // in lockstep so the pointing readout stays consistent.

    /// Pan the sky under the fixed mask by a screen-pixel delta.
    pub fn pan_sky(&mut self, dx: f64, dy: f64) {
        let scale = self.view.get_scale();
        let (ndx, ndy) = self.view.rotate_vec(dx, dy, false);
        let s2 = scale * scale;
        self.sky.translate(ndx / s2, ndy / s2);
        self.reference_sky.translate(ndx / s2, ndy / s2);
    }

    /// Shift the sky by an arcsec delta (keyboard nudges).
    pub fn nudge_sky(&mut self, dx_as: f64, dy_as: f64) {
        self.sky.translate(dx_as, dy_as);
        self.reference_sky.translate(dx_as, dy_as);
    }

    /// Rotate the sky about the mask reference point.
    pub fn rotate_sky(&mut self, dangle_rad: f64) {
        self.sky
            .rotate_about(dangle_rad, MASK_OFFSET_X_AS, MASK_OFFSET_Y_AS);
        self.reference_sky
            .rotate_about(dangle_rad, MASK_OFFSET_X_AS, MASK_OFFSET_Y_AS);
    }

    /// Rotate the sky so the mask position angle becomes `pa_deg`.
    pub fn set_mask_pa(&mut self, pa_deg: f64) {
        let current = norm180(self.sky.rotation_angle().to_degrees());
        let delta = (pa_deg - self.orig_pa_deg - current).to_radians();
        self.rotate_sky(delta);
    }

    /// Route a drag step to the frame the active mouse mode manipulates.
    pub fn apply_drag(&mut self, mode: MouseMode, delta: DragDelta) {
        match mode {
            MouseMode::PanAll => self.pan_view(delta.dx, delta.dy),
            MouseMode::PanSky => self.pan_sky(delta.dx, delta.dy),
            MouseMode::RotateAll => self.rotate_view(delta.dangle_rad),
            MouseMode::RotateSky => self.rotate_sky(delta.dangle_rad),
            MouseMode::Zoom => self.zoom_view(delta.dy),
        }
    }

    // ------------------------------------------------------------------
    // Fitting and resetting.

    /// Fit the view so `bbox` fills 90% of the canvas, centred at the world
    /// point (`atx`, `aty`).
    pub fn fit_mask(&mut self, bbox: &BoundingBox, atx: f64, aty: f64) {
        let sw = self.canvas_width / bbox.width();
        let sh = self.canvas_height / bbox.height();
        let scale = sw.min(sh) * 0.9;
        let (cx, cy) = self.canvas_center();

        self.view.reset(0.0);
        self.view.set_rotation(0.0);
        self.view.scale(scale);
        let (sx, sy) = self.view.world_to_screen(atx, aty, false);
        self.view.translate(cx + sx, cy + sy);
    }

    /// Refit the display on the mask and flip it upright.
    pub fn reset_display(&mut self, bbox: &BoundingBox) {
        self.fit_mask(bbox, MASK_OFFSET_X_AS, MASK_OFFSET_Y_AS + 60.0);
        let (x, y) = self.view.world_to_screen(0.0, 0.0, false);
        self.view.rotate_about(PI, x, y);
    }

    /// Reset the sky frames: `sky` to identity, `reference_sky` rotated by
    /// the original mask PA about the mask reference point.
    pub fn reset_offsets(&mut self) {
        self.sky.reset(0.0);
        self.reference_sky.reset(0.0);
        self.reference_sky.rotate_about(
            self.orig_pa_deg.to_radians(),
            MASK_OFFSET_X_AS,
            MASK_OFFSET_Y_AS,
        );
    }

    // ------------------------------------------------------------------
    // Readouts.

    /// The pointing (RA/Dec/PA) implied by the accumulated manipulation.
    pub fn current_pointing(&self) -> Result<Pointing, TransformError> {
        let (sx, sy) = self
            .reference_sky
            .screen_to_world(MASK_OFFSET_X_AS, MASK_OFFSET_Y_AS, false)?;

        let dec_deg = self.center_dec_deg + (sx + MASK_OFFSET_X_AS) / 3600.0;
        let cos_dec = dec_deg.to_radians().cos().max(COS_DEC_FLOOR);
        let ra_deg = self.center_ra_deg + (MASK_OFFSET_Y_AS - sy) / 3600.0 / cos_dec;
        let pa_deg = norm180(self.sky.rotation_angle().to_degrees()) + self.orig_pa_deg;

        Ok(Pointing {
            ra_deg,
            dec_deg,
            pa_deg,
        })
    }

    /// RA/Dec and catalog-frame arcsec under a screen point, for the
    /// mouse-position readout.
    pub fn screen_to_sky(&self, px: f64, py: f64) -> Result<SkyReadout, TransformError> {
        let as_per_px = self.arcsec_per_pixel();
        let (fx, fy) = self
            .view
            .screen_to_world(px * as_per_px, py * as_per_px, false)?;
        let (rx, ry) = self.reference_sky.screen_to_world(fx, fy, false)?;

        let dec_deg = self.center_dec_deg + (rx + MASK_OFFSET_X_AS) / 3600.0;
        let cos_dec = dec_deg.to_radians().cos().max(COS_DEC_FLOOR);
        let ry = (ry - MASK_OFFSET_Y_AS) / cos_dec;
        let ra_hour = ((self.center_ra_deg - ry / 3600.0) / 15.0).rem_euclid(24.0);

        let (x_arcsec, y_arcsec) = self.sky.screen_to_world(fx, fy, false)?;

        Ok(SkyReadout {
            ra_hour,
            dec_deg,
            x_arcsec,
            y_arcsec,
        })
    }

    /// Screen-space angles for the current frame.
    pub fn frame_angles(&self) -> FrameAngles {
        let view_rot_rad = self.view.rotation_angle();
        let sky_rot_rad = self.sky.rotation_angle();
        let sky_pa_deg = norm180(sky_rot_rad.to_degrees()) + self.orig_pa_deg;
        FrameAngles {
            view_rot_rad,
            sky_rot_rad,
            sky_pa_deg,
            compass_north_deg: norm180(view_rot_rad.to_degrees()) + 90.0 + sky_pa_deg,
            slit_base_rad: view_rot_rad + sky_rot_rad,
        }
    }

    /// Map a catalog-frame position through sky then view to screen pixels.
    pub fn catalog_to_screen(&self, x_arcsec: f64, y_arcsec: f64) -> (f64, f64) {
        let (vx, vy) = self.sky.world_to_screen(x_arcsec, y_arcsec, false);
        self.view.world_to_screen(vx, vy, false)
    }

    /// Map a catalog-frame position through sky only (the frame nearest-
    /// target searches run in).
    pub fn catalog_to_focal(&self, x_arcsec: f64, y_arcsec: f64) -> (f64, f64) {
        self.sky.world_to_screen(x_arcsec, y_arcsec, false)
    }

    /// Reset any transform whose entries have gone non-finite. Called once
    /// per frame by the scheduler, before geometry runs.
    pub fn repair(&mut self) -> bool {
        let mut repaired = false;
        for (t, name) in [
            (&mut self.view, "view"),
            (&mut self.sky, "sky"),
            (&mut self.reference_sky, "reference_sky"),
        ] {
            if t.repair_non_finite() {
                warn!("{name} transform had non-finite entries; reset to identity");
                repaired = true;
            }
        }
        repaired
    }
}
