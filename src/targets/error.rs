// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Errors associated with target-list access.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetError {
    #[error("Target index {index} is out of range; the list has {len} targets")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(
        "Stale target id (generation {generation}, list is at generation {current}); \
         the target list was replaced since this id was issued"
    )]
    StaleId { generation: u64, current: u64 },
}
