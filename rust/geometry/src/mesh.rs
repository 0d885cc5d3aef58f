// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tessellated mesh built from flat .bim buffers

use crate::error::{Error, Result};
use dotbim_ifc_core::Mesh;
use nalgebra::Point3;

/// Point list plus indexed triangular faces
#[derive(Debug, Clone, PartialEq)]
pub struct TessellatedMesh {
    pub mesh_id: u64,
    pub points: Vec<Point3<f64>>,
    /// Triangles as 0-based point indices
    pub faces: Vec<[u32; 3]>,
}

impl TessellatedMesh {
    /// Group flat buffers into points and triangles.
    ///
    /// Fails when either buffer length is not a multiple of three or a face
    /// points past the last vertex. Degenerate faces are kept as-is.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self> {
        if mesh.coordinates.len() % 3 != 0 {
            return Err(Error::malformed(
                mesh.mesh_id,
                format!("{} coordinates is not a multiple of 3", mesh.coordinates.len()),
            ));
        }
        if mesh.indices.len() % 3 != 0 {
            return Err(Error::malformed(
                mesh.mesh_id,
                format!("{} indices is not a multiple of 3", mesh.indices.len()),
            ));
        }

        let points: Vec<Point3<f64>> = mesh
            .coordinates
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();

        let vertex_count = points.len();
        if let Some(&bad) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(Error::malformed(
                mesh.mesh_id,
                format!("index {} out of range ({} vertices)", bad, vertex_count),
            ));
        }

        let faces = mesh
            .indices
            .chunks_exact(3)
            .map(|f| [f[0], f[1], f[2]])
            .collect();

        Ok(Self {
            mesh_id: mesh.mesh_id,
            points,
            faces,
        })
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Faces with 1-based indices, as IFC indexed faces expect
    pub fn one_based_faces(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.faces.iter().map(|f| [f[0] + 1, f[1] + 1, f[2] + 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh::new(
            3,
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_groups_points_and_faces() {
        let mesh = TessellatedMesh::from_mesh(&quad()).unwrap();
        assert_eq!(mesh.mesh_id, 3);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.points[2], Point3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.faces[1], [0, 2, 3]);
    }

    #[test]
    fn test_one_based_faces() {
        let mesh = TessellatedMesh::from_mesh(&quad()).unwrap();
        let faces: Vec<_> = mesh.one_based_faces().collect();
        assert_eq!(faces, vec![[1, 2, 3], [1, 3, 4]]);
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let mut mesh = quad();
        mesh.indices[5] = 4;
        let err = TessellatedMesh::from_mesh(&mesh).unwrap_err();
        assert!(matches!(err, Error::MalformedMesh { mesh_id: 3, .. }));
    }

    #[test]
    fn test_rejects_ragged_buffers() {
        let mut mesh = quad();
        mesh.coordinates.pop();
        assert!(TessellatedMesh::from_mesh(&mesh).is_err());

        let mut mesh = quad();
        mesh.indices.push(0);
        assert!(TessellatedMesh::from_mesh(&mesh).is_err());
    }

    #[test]
    fn test_keeps_degenerate_faces() {
        let mesh = Mesh::new(0, vec![0.0; 9], vec![0, 0, 0]);
        let mesh = TessellatedMesh::from_mesh(&mesh).unwrap();
        assert_eq!(mesh.faces, vec![[0, 0, 0]]);
    }
}
