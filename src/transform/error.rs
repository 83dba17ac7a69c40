// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Errors associated with affine-transform operations.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TransformError {
    #[error("Cannot invert transform; |determinant| = {det:e} is below {eps:e}")]
    DegenerateTransform { det: f64, eps: f64 },
}
