// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement codec
//!
//! Converts between the 4×4 homogeneous matrices used on the IFC side and the
//! translation + quaternion pairs stored on .bim elements.
//!
//! Tessellators hand placements over as 12 values: the 3×3 rotation block
//! column by column, followed by the translation. Row `r` of the matrix is
//! therefore `[m[r], m[r + 3], m[r + 6], m[r + 9]]`.

use dotbim_ifc_core::{Rotation, Vector};
use nalgebra::{Isometry3, Matrix3, Matrix4, Quaternion, Rotation3, Translation3, UnitQuaternion, Vector3};

/// Quaternions shorter than this are treated as "no rotation"
const DEGENERATE_NORM: f64 = 1e-12;

/// Rigid placement: rotation followed by translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub translation: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
}

impl Placement {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Build from the vector/rotation pair stored on a .bim element.
    ///
    /// The stored quaternion is renormalized; a zero quaternion yields the
    /// identity rotation.
    pub fn from_parts(vector: &Vector, rotation: &Rotation) -> Self {
        let q = Quaternion::new(rotation.qw, rotation.qx, rotation.qy, rotation.qz);
        let rotation = if q.norm() < DEGENERATE_NORM {
            UnitQuaternion::identity()
        } else {
            UnitQuaternion::from_quaternion(q)
        };
        Self {
            translation: Vector3::new(vector.x, vector.y, vector.z),
            rotation,
        }
    }

    pub fn vector(&self) -> Vector {
        Vector::new(self.translation.x, self.translation.y, self.translation.z)
    }

    pub fn rotation(&self) -> Rotation {
        Rotation {
            qx: self.rotation.i,
            qy: self.rotation.j,
            qz: self.rotation.k,
            qw: self.rotation.w,
        }
    }

    /// Homogeneous matrix for this placement
    pub fn to_matrix(&self) -> Matrix4<f64> {
        compose(&self.translation, &self.rotation)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

/// Expand the 12-value compact encoding into a full 4×4 matrix
pub fn matrix_from_compact(m: &[f64; 12]) -> Matrix4<f64> {
    Matrix4::new(
        m[0], m[3], m[6], m[9],
        m[1], m[4], m[7], m[10],
        m[2], m[5], m[8], m[11],
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Split a compact placement into translation and rotation.
///
/// The upper-left 3×3 block is assumed to be a proper rotation. Scaled or
/// sheared input is not rejected; the resulting quaternion is then only an
/// approximation of the block.
pub fn decompose(m: &[f64; 12]) -> Placement {
    let block = Matrix3::new(
        m[0], m[3], m[6],
        m[1], m[4], m[7],
        m[2], m[5], m[8],
    );
    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(block));

    Placement {
        translation: Vector3::new(m[9], m[10], m[11]),
        rotation,
    }
}

/// Decompose a full homogeneous matrix (bottom row ignored)
pub fn decompose_matrix(matrix: &Matrix4<f64>) -> Placement {
    let mut compact = [0.0; 12];
    for col in 0..4 {
        for row in 0..3 {
            compact[col * 3 + row] = matrix[(row, col)];
        }
    }
    decompose(&compact)
}

/// Build the homogeneous matrix for a translation and rotation
pub fn compose(translation: &Vector3<f64>, rotation: &UnitQuaternion<f64>) -> Matrix4<f64> {
    Isometry3::from_parts(Translation3::from(*translation), *rotation).to_homogeneous()
}
