// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Errors associated with building an edge table from a mask outline.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineError {
    #[error("Outline vertex {index}: CloseLoop without a matching MoveTo")]
    CloseLoopWithoutMoveTo { index: usize },

    #[error("Outline vertex {index}: LineTo without a preceding MoveTo")]
    LineToWithoutMoveTo { index: usize },
}
