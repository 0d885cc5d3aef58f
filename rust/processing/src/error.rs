// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for both conversion pipelines.
//!
//! Every error is fatal: the pipelines stop at the first one and the partially
//! built catalog or model is discarded.

use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Element '{0}' not found in source model")]
    ElementNotFound(String),

    #[error("Element '{guid}' references unknown mesh {mesh_id}")]
    UnknownMesh { guid: String, mesh_id: u64 },

    #[error("Mesh id {0} appears more than once")]
    DuplicateMesh(u64),

    #[error("Geometry stream used before initialization")]
    StreamNotInitialized,

    #[error("Geometry stream cannot be initialized twice")]
    StreamAlreadyInitialized,

    #[error("Model has no {0}")]
    MissingEntity(&'static str),

    #[error("Geometry error: {0}")]
    Geometry(#[from] dotbim_ifc_geometry::Error),

    #[error("Core error: {0}")]
    Core(#[from] dotbim_ifc_core::Error),
}
