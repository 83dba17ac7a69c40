// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all slitmask-core-related errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlitmaskError {
    #[error(transparent)]
    Transform(#[from] crate::transform::TransformError),

    #[error(transparent)]
    Outline(#[from] crate::containment::OutlineError),

    #[error(transparent)]
    Target(#[from] crate::targets::TargetError),
}
