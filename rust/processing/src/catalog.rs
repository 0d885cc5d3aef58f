// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run-scoped mesh catalog for the IFC → .bim direction.
//!
//! Deduplicates meshes by geometry identity and remembers each mesh's
//! default color. Entries are only ever added.

use crate::error::Result;
use crate::source::ShapeRecord;
use dotbim_ifc_core::{Color, Mesh};
use dotbim_ifc_geometry::resolve_mesh_color;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct MeshCatalog {
    /// geometry identity -> mesh id
    ids: FxHashMap<String, u64>,
    meshes: Vec<Mesh>,
    colors: FxHashMap<u64, Color>,
}

impl MeshCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mesh id for the record's geometry, registering a new mesh on first sight.
    ///
    /// Returns the id and whether the mesh was created by this call.
    pub fn register(&mut self, record: &ShapeRecord) -> Result<(u64, bool)> {
        if let Some(&id) = self.ids.get(&record.geometry_id) {
            return Ok((id, false));
        }

        let id = self.meshes.len() as u64;
        if !record.materials.is_empty() {
            let color = resolve_mesh_color(&record.materials, &record.material_ids)?;
            self.colors.insert(id, color);
        }

        self.meshes
            .push(Mesh::new(id, record.vertices.clone(), record.faces.clone()));
        self.ids.insert(record.geometry_id.clone(), id);
        Ok((id, true))
    }

    /// Default color of a mesh; opaque white when none was recorded
    #[inline]
    pub fn color(&self, mesh_id: u64) -> Color {
        self.colors.get(&mesh_id).copied().unwrap_or(Color::WHITE)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Meshes in registration order
    pub fn into_meshes(self) -> Vec<Mesh> {
        self.meshes
    }
}
