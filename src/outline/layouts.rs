// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Instrument mask layouts.

Coordinates are in arcsec on sky, taken from the DEIMOS focal-plane data
(`foc_plane.dat` in dsimulator), flipped in y and shifted so y = 318 - yOld.
The mask body is four closed panels separated by the detector gaps.
 */

use lazy_static::lazy_static;

use super::{MaskOutline, Opcode::*};

lazy_static! {
    /// The DEIMOS slit-mask body: four closed panels.
    pub static ref DEIMOS_MASK: MaskOutline = MaskOutline::from_rows(&[
        (-498.0, 187.0, MoveTo),
        (-498.0, 332.0, LineTo),
        (-460.0, 385.0, LineTo),
        (-420.0, 428.0, LineTo),
        (-360.0, 479.0, LineTo),
        (-259.7, 479.0, LineTo),
        (-259.7, 187.0, LineTo),
        (-498.0, 187.0, CloseLoop),
        (-249.3, 187.0, MoveTo),
        (-249.3, 479.0, LineTo),
        (-5.2, 479.0, LineTo),
        (-5.2, 187.0, LineTo),
        (-249.3, 187.0, CloseLoop),
        (5.2, 187.0, MoveTo),
        (5.2, 479.0, LineTo),
        (249.3, 479.0, LineTo),
        (249.3, 187.0, LineTo),
        (5.2, 187.0, CloseLoop),
        (259.7, 187.0, MoveTo),
        (259.7, 479.0, LineTo),
        (360.0, 479.0, LineTo),
        (420.0, 428.0, LineTo),
        (460.0, 385.0, LineTo),
        (498.0, 332.0, LineTo),
        (498.0, 187.0, LineTo),
        (259.7, 187.0, CloseLoop),
    ]);

    /// The DEIMOS guider field of view: two closed panels.
    pub static ref DEIMOS_GUIDER_FOV: MaskOutline = MaskOutline::from_rows(&[
        (-1.0, 94.0, MoveTo),
        (-1.0, 174.0, LineTo),
        (208.0, 174.0, LineTo),
        (208.0, 94.0, LineTo),
        (-1.0, 94.0, CloseLoop),
        (-1.0, 174.0, MoveTo),
        (-1.0, 298.4, LineTo),
        (208.0, 302.7, LineTo),
        (208.0, 174.0, LineTo),
        (-1.0, 174.0, CloseLoop),
    ]);

    /// Known bad detector columns, as thin closed slivers.
    pub static ref DEIMOS_BAD_COLUMNS: MaskOutline = MaskOutline::from_rows(&[
        (-20.0, 196.0, MoveTo),
        (-11.0, 196.0, LineTo),
        (-11.0, 188.0, LineTo),
        (-20.0, 188.0, LineTo),
        (-20.0, 196.0, CloseLoop),
        (-185.0, 196.0, MoveTo),
        (-179.0, 196.0, LineTo),
        (-179.0, 189.0, LineTo),
        (-185.0, 189.0, LineTo),
        (-185.0, 196.0, CloseLoop),
        (377.0, 188.0, MoveTo),
        (379.0, 479.0, LineTo),
        (377.0, 188.0, CloseLoop),
        (205.0, 187.0, MoveTo),
        (206.0, 478.0, LineTo),
        (205.0, 187.0, CloseLoop),
        (-107.0, 186.0, MoveTo),
        (-107.0, 445.0, LineTo),
        (-107.0, 186.0, CloseLoop),
        (-376.0, 188.0, MoveTo),
        (-377.0, 455.0, LineTo),
        (-376.0, 188.0, CloseLoop),
        (-347.0, 188.0, MoveTo),
        (-347.0, 480.0, LineTo),
        (-347.0, 188.0, CloseLoop),
        (-214.0, 186.0, MoveTo),
        (-213.0, 480.0, LineTo),
        (-214.0, 186.0, CloseLoop),
        (-264.0, 188.0, MoveTo),
        (-265.0, 422.0, LineTo),
        (-264.0, 188.0, CloseLoop),
    ]);

    /// Decorative crosses at the mask centre and the optical axis. Open
    /// polylines; never part of containment.
    pub static ref CENTER_CROSS: MaskOutline = MaskOutline::from_rows(&[
        // Centre of mask.
        (-11.85, 0.0, MoveTo),
        (11.85, 0.0, LineTo),
        (0.0, -11.85, MoveTo),
        (0.0, 11.85, LineTo),
        // Optical axis.
        (-11.85, 270.0, MoveTo),
        (11.85, 270.0, LineTo),
        (0.0, 270.0 - 11.85, MoveTo),
        (0.0, 270.0 + 11.85, LineTo),
    ]);
}
