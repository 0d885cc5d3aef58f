// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC → .bim conversion.
//!
//! Pulls shape records one at a time and fully processes each before asking
//! for the next: mesh registration, color lookup, placement decomposition,
//! property flattening and element assembly. The catalog and element list
//! have a single writer, so nothing here is shared or locked.

use crate::catalog::MeshCatalog;
use crate::config::ConvertConfig;
use crate::error::Result;
use crate::properties::flatten_properties;
use crate::source::{body_context_ids, GeometrySettings, IfcSource, ShapeRecord};
use dotbim_ifc_core::{guid, Document, Element, Info};
use dotbim_ifc_geometry::decompose;
use serde::Serialize;

/// Counters reported after a forward run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForwardStats {
    pub shapes: usize,
    pub skipped: usize,
    pub meshes: usize,
    pub elements: usize,
}

/// Converts a rich IFC model into a mesh-instance document
pub struct IfcToDotbim<'a, S: IfcSource + ?Sized> {
    source: &'a S,
    config: &'a ConvertConfig,
}

impl<'a, S: IfcSource + ?Sized> IfcToDotbim<'a, S> {
    pub fn new(source: &'a S, config: &'a ConvertConfig) -> Self {
        Self { source, config }
    }

    /// Run the conversion
    pub fn execute(&self) -> Result<Document> {
        self.execute_with_stats().map(|(doc, _)| doc)
    }

    /// Run the conversion and report counters
    pub fn execute_with_stats(&self) -> Result<(Document, ForwardStats)> {
        let settings = GeometrySettings {
            context_ids: body_context_ids(
                &self.source.representation_contexts(),
                &self.config.body_context_identifiers,
            ),
            worker_threads: self.config.worker_threads,
        };
        tracing::info!(
            contexts = settings.context_ids.len(),
            worker_threads = settings.worker_threads,
            "Starting IFC to dotbim conversion"
        );

        let mut catalog = MeshCatalog::new();
        let mut elements = Vec::new();
        let mut stats = ForwardStats::default();

        let mut shapes = self.source.shapes(&settings);
        if shapes.initialize()? {
            while let Some(record) = shapes.next_shape()? {
                stats.shapes += 1;
                match self.assemble(&record, &mut catalog)? {
                    Some(element) => elements.push(element),
                    None => stats.skipped += 1,
                }
            }
        } else {
            tracing::info!("Geometry stream is empty");
        }

        stats.meshes = catalog.len();
        stats.elements = elements.len();
        tracing::info!(
            shapes = stats.shapes,
            skipped = stats.skipped,
            meshes = stats.meshes,
            elements = stats.elements,
            "IFC to dotbim conversion complete"
        );

        let document = Document::new(catalog.into_meshes(), elements, self.file_info());
        Ok((document, stats))
    }

    /// Build the element for one record, or `None` if its category is excluded
    fn assemble(&self, record: &ShapeRecord, catalog: &mut MeshCatalog) -> Result<Option<Element>> {
        let element = self.source.element(&record.guid)?;
        let category = element.category();
        if category.is_excluded() {
            tracing::trace!(guid = %record.guid, class = %element.class, ?category, "Skipping shape");
            return Ok(None);
        }

        let (mesh_id, created) = catalog.register(record)?;
        if created {
            tracing::debug!(
                mesh_id,
                geometry_id = %record.geometry_id,
                vertices = record.vertices.len() / 3,
                triangles = record.faces.len() / 3,
                "Registered mesh"
            );
        }

        let placement = decompose(&record.matrix);

        Ok(Some(Element {
            info: flatten_properties(&element, self.config.property_precedence),
            color: catalog.color(mesh_id),
            guid: guid::expand(&element.global_id)?,
            rotation: placement.rotation(),
            element_type: element.class,
            vector: placement.vector(),
            mesh_id,
        }))
    }

    fn file_info(&self) -> Info {
        let header = self.source.header();
        let mut info = Info::new();
        info.insert("Author".to_string(), header.author.join(" "));
        info.insert("Date".to_string(), header.time_stamp);
        info
    }
}
