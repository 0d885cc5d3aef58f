// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-instance color → per-representation style.
//!
//! .bim stores one color per element, IFC styles a representation that many
//! products share. For each mesh the first color seen is attached to the
//! base representation; every further distinct color gets its own clone.
//! Variants are memoized by (mesh, color), so there is exactly one
//! representation per pair that occurs.

use crate::error::Result;
use crate::sink::IfcSink;
use dotbim_ifc_core::Color;
use rustc_hash::FxHashMap;

#[derive(Debug)]
pub struct ColorReconciler<R> {
    variants: FxHashMap<u64, FxHashMap<Color, R>>,
}

impl<R: Copy> ColorReconciler<R> {
    pub fn new() -> Self {
        Self {
            variants: FxHashMap::default(),
        }
    }

    /// Representation to use for an instance of `mesh_id` with `color`
    pub fn resolve<S>(&mut self, sink: &mut S, mesh_id: u64, base: R, color: Color) -> Result<R>
    where
        S: IfcSink<Representation = R>,
    {
        let variants = self.variants.entry(mesh_id).or_default();

        if let Some(&representation) = variants.get(&color) {
            return Ok(representation);
        }

        let representation = if variants.is_empty() {
            base
        } else {
            let clone = sink.clone_representation(base)?;
            tracing::debug!(mesh_id, ?color, variants = variants.len() + 1, "Cloned representation for color");
            clone
        };

        sink.assign_color(representation, color)?;
        variants.insert(color, representation);
        Ok(representation)
    }

    /// Number of variants created for a mesh
    pub fn variant_count(&self, mesh_id: u64) -> usize {
        self.variants.get(&mesh_id).map_or(0, |v| v.len())
    }

    /// Total number of variants across all meshes
    pub fn total_variants(&self) -> usize {
        self.variants.values().map(|v| v.len()).sum()
    }

    /// Variants that required a cloned representation
    pub fn clone_count(&self) -> usize {
        self.variants.values().map(|v| v.len().saturating_sub(1)).sum()
    }
}

impl<R: Copy> Default for ColorReconciler<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::IfcWriter;
    use dotbim_ifc_core::Mesh;
    use dotbim_ifc_geometry::TessellatedMesh;

    const RED: Color = Color::new(255, 0, 0, 255);
    const GREEN: Color = Color::new(0, 255, 0, 255);

    fn writer_with_mesh() -> (IfcWriter, u32) {
        let mut writer = IfcWriter::new();
        writer.create_body_context().unwrap();
        let mesh = Mesh::new(0, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], vec![0, 1, 2]);
        let rep = writer
            .add_tessellation(&TessellatedMesh::from_mesh(&mesh).unwrap())
            .unwrap();
        (writer, rep)
    }

    #[test]
    fn test_first_color_reuses_base() {
        let (mut writer, base) = writer_with_mesh();
        let mut reconciler = ColorReconciler::new();
        assert_eq!(reconciler.resolve(&mut writer, 0, base, RED).unwrap(), base);
        assert_eq!(reconciler.resolve(&mut writer, 0, base, RED).unwrap(), base);
        assert_eq!(reconciler.variant_count(0), 1);
    }

    #[test]
    fn test_new_color_clones_once() {
        let (mut writer, base) = writer_with_mesh();
        let mut reconciler = ColorReconciler::new();
        reconciler.resolve(&mut writer, 0, base, RED).unwrap();
        let green = reconciler.resolve(&mut writer, 0, base, GREEN).unwrap();
        assert_ne!(green, base);
        assert_eq!(reconciler.resolve(&mut writer, 0, base, GREEN).unwrap(), green);
        assert_eq!(reconciler.resolve(&mut writer, 0, base, RED).unwrap(), base);
        assert_eq!(reconciler.variant_count(0), 2);
        assert_eq!(reconciler.total_variants(), 2);
        assert_eq!(reconciler.clone_count(), 1);
        assert_eq!(writer.model().by_type("IfcShapeRepresentation").count(), 2);
        assert_eq!(writer.model().by_type("IfcSurfaceStyle").count(), 2);
    }

    #[test]
    fn test_alpha_distinguishes_colors() {
        let (mut writer, base) = writer_with_mesh();
        let mut reconciler = ColorReconciler::new();
        reconciler.resolve(&mut writer, 0, base, RED).unwrap();
        let translucent = Color { a: 100, ..RED };
        assert_ne!(reconciler.resolve(&mut writer, 0, base, translucent).unwrap(), base);
    }
}
