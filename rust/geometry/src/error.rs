// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed mesh {mesh_id}: {reason}")]
    MalformedMesh { mesh_id: u64, reason: String },

    #[error("Material index {index} out of range ({count} materials)")]
    MaterialIndexOutOfRange { index: i32, count: usize },

    #[error("Core error: {0}")]
    CoreError(#[from] dotbim_ifc_core::Error),
}

impl Error {
    pub fn malformed(mesh_id: u64, reason: impl Into<String>) -> Self {
        Error::MalformedMesh {
            mesh_id,
            reason: reason.into(),
        }
    }
}
