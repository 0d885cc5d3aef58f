// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the document model, GUID codec and STEP writer
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid GUID '{guid}': {reason}")]
    InvalidGuid { guid: String, reason: &'static str },

    #[error("Entity #{0} not found")]
    EntityNotFound(u32),

    #[error("Entity #{id} has no attribute at index {index}")]
    AttributeOutOfRange { id: u32, index: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_guid(guid: &str, reason: &'static str) -> Self {
        Error::InvalidGuid {
            guid: guid.to_string(),
            reason,
        }
    }
}
