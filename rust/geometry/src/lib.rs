// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! dotbim-ifc Geometry
//!
//! Geometry helpers shared by both conversion directions, using nalgebra for
//! the placement math.

pub mod error;
pub mod material;
pub mod mesh;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};

pub use error::{Error, Result};
pub use material::{dominant_material, resolve_mesh_color, SurfaceMaterial};
pub use mesh::TessellatedMesh;
pub use transform::{compose, decompose, decompose_matrix, matrix_from_compact, Placement};
