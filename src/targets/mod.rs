// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Catalog targets and the index-stable arena that owns them.

Targets are created on catalog load, mutated by user edits or mask
recalculation, and wholesale-replaced on reload. Replacement bumps the
arena's generation counter, so a [`TargetId`] issued before an in-flight
reload is detected and rejected rather than silently indexing the wrong
target.
 */

mod error;

pub use error::TargetError;

use serde::{Deserialize, Serialize};

/// One catalog target plus its slit design state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    // Catalog fields; fixed at load time.
    pub object_id: String,
    /// Right ascension [hours]
    pub ra_hour: f64,
    /// Declination [degrees]
    pub dec_deg: f64,
    pub magnitude: f64,
    /// Passband of `magnitude`, e.g. "R".
    pub band: String,
    /// Focal-plane offset from the pointing centre [arcsec]
    pub x_arcsec: f64,
    /// Focal-plane offset from the pointing centre [arcsec]
    pub y_arcsec: f64,

    // Design fields; mutated by user edits or mask recalculation.
    /// Priority code; negative codes mark guide/align boxes (see
    /// [`crate::constants::GUIDE_BOX`] and [`crate::constants::ALIGN_BOX`]).
    pub priority: i32,
    pub selected: bool,
    /// Slit position angle on sky [degrees]
    pub slit_pa_deg: f64,
    /// Slit width [arcsec]
    pub slit_width_arcsec: f64,
    /// Slit length on one side of the target [arcsec]
    pub length1_arcsec: f64,
    /// Slit length on the other side [arcsec]
    pub length2_arcsec: f64,
    /// Result of the last mask-containment pass.
    pub inside_mask: bool,
}

impl Target {
    /// A target with catalog fields set and design fields at their
    /// defaults: unselected science target, 1"-wide slit, 4" to each side.
    pub fn new(
        object_id: &str,
        ra_hour: f64,
        dec_deg: f64,
        x_arcsec: f64,
        y_arcsec: f64,
    ) -> Target {
        Target {
            object_id: object_id.to_string(),
            ra_hour,
            dec_deg,
            magnitude: 0.0,
            band: "R".to_string(),
            x_arcsec,
            y_arcsec,
            priority: 0,
            selected: false,
            slit_pa_deg: 0.0,
            slit_width_arcsec: 1.0,
            length1_arcsec: 4.0,
            length2_arcsec: 4.0,
            inside_mask: false,
        }
    }

    /// RA formatted as sexagesimal hours.
    pub fn ra_sexa(&self) -> String {
        to_sexagesimal(self.ra_hour)
    }

    /// Dec formatted as sexagesimal degrees.
    pub fn dec_sexa(&self) -> String {
        to_sexagesimal(self.dec_deg)
    }
}

/// One user edit of a target's design fields. The catalog fields are fixed
/// at load time and have no counterpart here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignEdit {
    pub priority: i32,
    pub selected: bool,
    pub slit_pa_deg: f64,
    pub slit_width_arcsec: f64,
    pub length1_arcsec: f64,
    pub length2_arcsec: f64,
}

/// A validated handle into a [`TargetArena`]. Ids from a previous target
/// list (an older generation) are rejected on use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId {
    pub index: usize,
    pub generation: u64,
}

/// Owns the target list and detects stale indices across reloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetArena {
    targets: Vec<Target>,
    generation: u64,
}

impl TargetArena {
    pub fn new() -> TargetArena {
        TargetArena::default()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the whole target list (e.g. after a catalog reload). All
    /// previously issued [`TargetId`]s become stale.
    pub fn replace_all(&mut self, targets: Vec<Target>) {
        self.targets = targets;
        self.generation += 1;
    }

    /// The id for a raw index in the current generation.
    pub fn id_at(&self, index: usize) -> Option<TargetId> {
        (index < self.targets.len()).then(|| TargetId {
            index,
            generation: self.generation,
        })
    }

    fn validate(&self, id: TargetId) -> Result<usize, TargetError> {
        if id.generation != self.generation {
            return Err(TargetError::StaleId {
                generation: id.generation,
                current: self.generation,
            });
        }
        if id.index >= self.targets.len() {
            return Err(TargetError::IndexOutOfRange {
                index: id.index,
                len: self.targets.len(),
            });
        }
        Ok(id.index)
    }

    pub fn get(&self, id: TargetId) -> Result<&Target, TargetError> {
        self.validate(id).map(|i| &self.targets[i])
    }

    pub fn get_mut(&mut self, id: TargetId) -> Result<&mut Target, TargetError> {
        let i = self.validate(id)?;
        Ok(&mut self.targets[i])
    }

    /// Iterate targets with their ids, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (TargetId, &Target)> {
        let generation = self.generation;
        self.targets
            .iter()
            .enumerate()
            .map(move |(index, t)| (TargetId { index, generation }, t))
    }

    /// Apply a user edit to one target's design fields.
    pub fn update_design_fields(
        &mut self,
        id: TargetId,
        edit: DesignEdit,
    ) -> Result<(), TargetError> {
        let t = self.get_mut(id)?;
        t.priority = edit.priority;
        t.selected = edit.selected;
        t.slit_pa_deg = edit.slit_pa_deg;
        t.slit_width_arcsec = edit.slit_width_arcsec;
        t.length1_arcsec = edit.length1_arcsec;
        t.length2_arcsec = edit.length2_arcsec;
        Ok(())
    }

    /// Write the containment results of a frame back into the targets'
    /// `inside_mask` flags.
    pub fn apply_containment(&mut self, inside: &[TargetId]) -> Result<(), TargetError> {
        for t in &mut self.targets {
            t.inside_mask = false;
        }
        for &id in inside {
            self.get_mut(id)?.inside_mask = true;
        }
        Ok(())
    }
}

/// Format degrees (or hours) as colon-separated sexagesimal, e.g.
/// `-22:58:52.56`.
pub fn to_sexagesimal(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { " " };
    let mut v = value.abs();
    let mut dd = v.floor();
    v = (v - dd) * 60.0;
    let mut mm = v.floor();
    // Round at the printed precision so 59.999 carries instead of showing
    // as "60.00".
    let mut ss = ((v - mm) * 60.0 * 100.0).round() / 100.0;
    if ss >= 60.0 {
        ss -= 60.0;
        mm += 1.0;
    }
    if mm >= 60.0 {
        mm -= 60.0;
        dd += 1.0;
    }
    format!("{sign}{:02}:{:02}:{:05.2}", dd as u32, mm as u32, ss)
}
