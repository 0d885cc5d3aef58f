// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! .bim → IFC conversion.
//!
//! Mesh tessellations are prepared in parallel since they only read the
//! document; everything that touches the sink runs on the calling thread.

use crate::config::ConvertConfig;
use crate::error::{Error, Result};
use crate::reconcile::ColorReconciler;
use crate::sink::IfcSink;
use dotbim_ifc_core::{Document, Element};
use dotbim_ifc_geometry::{Placement, TessellatedMesh};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// Name given to elements whose info map carries no name
pub const UNNAMED: &str = "Unnamed";

/// Counters reported after a reverse run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReverseStats {
    pub meshes: usize,
    pub elements: usize,
    /// Representations created, base ones included
    pub representations: usize,
}

/// Converts a mesh-instance document into an IFC model
pub struct DotbimToIfc<'a> {
    document: &'a Document,
    config: &'a ConvertConfig,
}

impl<'a> DotbimToIfc<'a> {
    pub fn new(document: &'a Document, config: &'a ConvertConfig) -> Self {
        Self { document, config }
    }

    /// Populate `sink` with the whole document
    pub fn execute<S: IfcSink>(&self, sink: &mut S) -> Result<ReverseStats> {
        let document = self.document;
        tracing::info!(
            meshes = document.meshes.len(),
            elements = document.elements.len(),
            "Starting dotbim to IFC conversion"
        );

        sink.set_file_info(
            document.info.get("Author").map(String::as_str),
            document.info.get("Date").map(String::as_str),
        );
        sink.create_project(&self.config.project_name, &self.config.site_name)?;
        sink.create_body_context()?;

        let tessellations = self.tessellate()?;
        let mut base = FxHashMap::default();
        for mesh in &tessellations {
            let representation = sink.add_tessellation(mesh)?;
            tracing::debug!(
                mesh_id = mesh.mesh_id,
                vertices = mesh.vertex_count(),
                triangles = mesh.triangle_count(),
                ?representation,
                "Registered tessellation"
            );
            base.insert(mesh.mesh_id, representation);
        }

        let mut reconciler = ColorReconciler::new();
        for element in &document.elements {
            self.place(sink, element, &base, &mut reconciler)?;
        }
        sink.finish()?;

        let stats = ReverseStats {
            meshes: base.len(),
            elements: document.elements.len(),
            representations: base.len() + reconciler.clone_count(),
        };
        tracing::info!(
            meshes = stats.meshes,
            elements = stats.elements,
            representations = stats.representations,
            "dotbim to IFC conversion complete"
        );
        Ok(stats)
    }

    /// Validate and convert every mesh, in document order
    fn tessellate(&self) -> Result<Vec<TessellatedMesh>> {
        let mut seen = FxHashSet::default();
        for mesh in &self.document.meshes {
            if !seen.insert(mesh.mesh_id) {
                return Err(Error::DuplicateMesh(mesh.mesh_id));
            }
        }

        let meshes = self
            .document
            .meshes
            .par_iter()
            .map(TessellatedMesh::from_mesh)
            .collect::<dotbim_ifc_geometry::Result<Vec<_>>>()?;
        Ok(meshes)
    }

    fn place<S: IfcSink>(
        &self,
        sink: &mut S,
        element: &Element,
        base: &FxHashMap<u64, S::Representation>,
        reconciler: &mut ColorReconciler<S::Representation>,
    ) -> Result<()> {
        let &representation = base.get(&element.mesh_id).ok_or_else(|| Error::UnknownMesh {
            guid: element.guid.clone(),
            mesh_id: element.mesh_id,
        })?;

        let product = sink.add_proxy(element_name(element))?;
        if !element.info.is_empty() {
            sink.add_property_set(product, &self.config.info_pset_name, &element.info)?;
        }

        let styled = reconciler.resolve(sink, element.mesh_id, representation, element.color)?;
        sink.assign_representation(product, styled)?;

        let placement = Placement::from_parts(&element.vector, &element.rotation);
        sink.set_placement(product, &placement.to_matrix())?;

        tracing::trace!(guid = %element.guid, mesh_id = element.mesh_id, ?product, "Placed element");
        Ok(())
    }
}

/// Display name of an element: `Name`, then `name`, then [`UNNAMED`]
pub fn element_name(element: &Element) -> &str {
    element
        .info
        .get("Name")
        .or_else(|| element.info.get("name"))
        .map(String::as_str)
        .unwrap_or(UNNAMED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotbim_ifc_core::{Color, Info, Rotation, Vector};

    fn element(info: &[(&str, &str)]) -> Element {
        Element {
            info: info
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Info>(),
            color: Color::WHITE,
            guid: "g".into(),
            rotation: Rotation::IDENTITY,
            element_type: "Block".into(),
            vector: Vector::default(),
            mesh_id: 0,
        }
    }

    #[test]
    fn test_element_name_fallbacks() {
        assert_eq!(element_name(&element(&[("Name", "A"), ("name", "b")])), "A");
        assert_eq!(element_name(&element(&[("name", "b")])), "b");
        assert_eq!(element_name(&element(&[])), UNNAMED);
    }
}
