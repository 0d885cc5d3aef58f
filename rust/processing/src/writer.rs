// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC4 writer backed by an in-memory STEP model.
//!
//! Spatial layout is always Project → Site → proxies. Geometry is written as
//! `IfcPolygonalFaceSet` on the `Body` sub-context, colors as surface styles
//! on the face sets.

use crate::error::{Error, Result};
use crate::sink::IfcSink;
use dotbim_ifc_core::guid::new_global_id;
use dotbim_ifc_core::AttributeValue::{self, EntityRef, Null};
use dotbim_ifc_core::{Color, Info, StepModel};
use dotbim_ifc_geometry::{Matrix4, TessellatedMesh};
use rustc_hash::FxHashSet;
use std::path::Path;

/// Originating system written into the header
pub const ORIGINATING_SYSTEM: &str = "dotbim-ifc";

const SCHEMA: &str = "IFC4";
const PRECISION: f64 = 1.0e-5;

// Attribute slots filled after creation
const PROJECT_CONTEXTS: usize = 7;
const PRODUCT_PLACEMENT: usize = 5;
const PRODUCT_REPRESENTATION: usize = 6;
const REPRESENTATION_ITEMS: usize = 3;

/// Entities created by [`IfcWriter::create_project`]
#[derive(Debug, Clone, Copy)]
struct SpatialRoot {
    project: u32,
    site: u32,
    site_placement: u32,
}

#[derive(Debug, Clone, Copy)]
struct Contexts {
    model: u32,
    body: u32,
}

/// [`IfcSink`] producing an IFC4 STEP file
#[derive(Debug)]
pub struct IfcWriter {
    model: StepModel,
    root: Option<SpatialRoot>,
    contexts: Option<Contexts>,
    /// Products waiting for the site containment relationship
    contained: Vec<u32>,
}

impl IfcWriter {
    pub fn new() -> Self {
        let mut model = StepModel::new(SCHEMA);
        let header = model.header_mut();
        header.originating_system = ORIGINATING_SYSTEM.to_string();
        header.preprocessor_version = format!("{} {}", ORIGINATING_SYSTEM, env!("CARGO_PKG_VERSION"));

        Self {
            model,
            root: None,
            contexts: None,
            contained: Vec::new(),
        }
    }

    pub fn model(&self) -> &StepModel {
        &self.model
    }

    pub fn into_model(self) -> StepModel {
        self.model
    }

    /// Write the model as an .ifc file
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.model.write(path)?;
        Ok(())
    }

    fn root(&self) -> Result<SpatialRoot> {
        self.root.ok_or(Error::MissingEntity("project"))
    }

    fn contexts(&self) -> Result<Contexts> {
        self.contexts.ok_or(Error::MissingEntity("body context"))
    }

    fn point(&mut self, coordinates: [f64; 3]) -> u32 {
        self.model
            .add("IfcCartesianPoint", vec![AttributeValue::reals(coordinates)])
    }

    fn direction(&mut self, ratios: [f64; 3]) -> u32 {
        self.model
            .add("IfcDirection", vec![AttributeValue::reals(ratios)])
    }

    /// Axis placement at the origin with default axes
    fn origin_placement(&mut self) -> u32 {
        let location = self.point([0.0, 0.0, 0.0]);
        self.model
            .add("IfcAxis2Placement3D", vec![EntityRef(location), Null, Null])
    }

    fn si_unit(&mut self, unit_type: &str, name: &str) -> u32 {
        self.model.add(
            "IfcSIUnit",
            vec![
                AttributeValue::Derived,
                AttributeValue::enumeration(unit_type),
                Null,
                AttributeValue::enumeration(name),
            ],
        )
    }

    /// Items of a shape representation
    fn representation_items(&self, representation: u32) -> Result<Vec<u32>> {
        let entity = self
            .model
            .get(representation)
            .ok_or(dotbim_ifc_core::Error::EntityNotFound(representation))?;
        Ok(entity
            .get(REPRESENTATION_ITEMS)
            .and_then(AttributeValue::as_list)
            .map(|items| items.iter().filter_map(AttributeValue::as_entity_ref).collect())
            .unwrap_or_default())
    }
}

impl Default for IfcWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl IfcSink for IfcWriter {
    type Representation = u32;
    type Product = u32;

    fn set_file_info(&mut self, author: Option<&str>, time_stamp: Option<&str>) {
        let header = self.model.header_mut();
        if let Some(author) = author {
            header.author = vec![author.to_string()];
        }
        if let Some(time_stamp) = time_stamp {
            header.time_stamp = time_stamp.to_string();
        }
    }

    fn create_project(&mut self, project_name: &str, site_name: &str) -> Result<()> {
        let units = [
            self.si_unit("LENGTHUNIT", "METRE"),
            self.si_unit("AREAUNIT", "SQUARE_METRE"),
            self.si_unit("VOLUMEUNIT", "CUBIC_METRE"),
            self.si_unit("PLANEANGLEUNIT", "RADIAN"),
        ];
        let assignment = self
            .model
            .add("IfcUnitAssignment", vec![AttributeValue::refs(units)]);

        let project = self.model.add(
            "IfcProject",
            vec![
                AttributeValue::string(new_global_id()),
                Null,
                AttributeValue::string(project_name),
                Null,
                Null,
                Null,
                Null,
                Null,
                EntityRef(assignment),
            ],
        );

        let axes = self.origin_placement();
        let site_placement = self
            .model
            .add("IfcLocalPlacement", vec![Null, EntityRef(axes)]);
        let site = self.model.add(
            "IfcSite",
            vec![
                AttributeValue::string(new_global_id()),
                Null,
                AttributeValue::string(site_name),
                Null,
                Null,
                EntityRef(site_placement),
                Null,
                Null,
                AttributeValue::enumeration("ELEMENT"),
                Null,
                Null,
                Null,
                Null,
                Null,
            ],
        );

        self.model.add(
            "IfcRelAggregates",
            vec![
                AttributeValue::string(new_global_id()),
                Null,
                Null,
                Null,
                EntityRef(project),
                AttributeValue::refs([site]),
            ],
        );

        self.root = Some(SpatialRoot {
            project,
            site,
            site_placement,
        });
        Ok(())
    }

    fn create_body_context(&mut self) -> Result<()> {
        let world = self.origin_placement();
        let model = self.model.add(
            "IfcGeometricRepresentationContext",
            vec![
                Null,
                AttributeValue::string("Model"),
                AttributeValue::Integer(3),
                AttributeValue::Float(PRECISION),
                EntityRef(world),
                Null,
            ],
        );
        let body = self.model.add(
            "IfcGeometricRepresentationSubContext",
            vec![
                AttributeValue::string("Body"),
                AttributeValue::string("Model"),
                AttributeValue::Derived,
                AttributeValue::Derived,
                AttributeValue::Derived,
                AttributeValue::Derived,
                EntityRef(model),
                Null,
                AttributeValue::enumeration("MODEL_VIEW"),
                Null,
            ],
        );

        if let Some(root) = self.root {
            self.model
                .set_attribute(root.project, PROJECT_CONTEXTS, AttributeValue::refs([model]))?;
        }
        self.contexts = Some(Contexts { model, body });
        Ok(())
    }

    fn add_tessellation(&mut self, mesh: &TessellatedMesh) -> Result<u32> {
        let contexts = self.contexts()?;

        let coordinates = AttributeValue::List(
            mesh.points
                .iter()
                .map(|p| AttributeValue::reals([p.x, p.y, p.z]))
                .collect(),
        );
        let point_list = self.model.add("IfcCartesianPointList3D", vec![coordinates]);

        let faces: Vec<u32> = mesh
            .one_based_faces()
            .map(|face| {
                let index = AttributeValue::List(
                    face.iter().map(|&i| AttributeValue::Integer(i64::from(i))).collect(),
                );
                self.model.add("IfcIndexedPolygonalFace", vec![index])
            })
            .collect();

        let face_set = self.model.add(
            "IfcPolygonalFaceSet",
            vec![EntityRef(point_list), Null, AttributeValue::refs(faces), Null],
        );

        Ok(self.model.add(
            "IfcShapeRepresentation",
            vec![
                EntityRef(contexts.body),
                AttributeValue::string("Body"),
                AttributeValue::string("Tessellation"),
                AttributeValue::refs([face_set]),
            ],
        ))
    }

    fn clone_representation(&mut self, representation: u32) -> Result<u32> {
        let contexts = self.contexts()?;
        let mut shared = FxHashSet::default();
        shared.insert(contexts.model);
        shared.insert(contexts.body);
        Ok(self.model.copy_deep(representation, &shared)?)
    }

    fn assign_color(&mut self, representation: u32, color: Color) -> Result<()> {
        let [r, g, b, a] = color.to_unit_rgba();
        let rgb = self.model.add(
            "IfcColourRgb",
            vec![
                Null,
                AttributeValue::Float(r),
                AttributeValue::Float(g),
                AttributeValue::Float(b),
            ],
        );
        let shading = self.model.add(
            "IfcSurfaceStyleShading",
            vec![EntityRef(rgb), AttributeValue::Float(1.0 - a)],
        );
        let style = self.model.add(
            "IfcSurfaceStyle",
            vec![
                Null,
                AttributeValue::enumeration("BOTH"),
                AttributeValue::refs([shading]),
            ],
        );

        for item in self.representation_items(representation)? {
            self.model.add(
                "IfcStyledItem",
                vec![EntityRef(item), AttributeValue::refs([style]), Null],
            );
        }
        Ok(())
    }

    fn add_proxy(&mut self, name: &str) -> Result<u32> {
        let product = self.model.add(
            "IfcBuildingElementProxy",
            vec![
                AttributeValue::string(new_global_id()),
                Null,
                AttributeValue::string(name),
                Null,
                Null,
                Null,
                Null,
                Null,
                Null,
            ],
        );
        self.contained.push(product);
        Ok(product)
    }

    fn add_property_set(&mut self, product: u32, name: &str, properties: &Info) -> Result<()> {
        let values: Vec<u32> = properties
            .iter()
            .map(|(key, value)| {
                self.model.add(
                    "IfcPropertySingleValue",
                    vec![
                        AttributeValue::string(key.as_str()),
                        Null,
                        AttributeValue::typed("IfcLabel", AttributeValue::string(value.as_str())),
                        Null,
                    ],
                )
            })
            .collect();

        let pset = self.model.add(
            "IfcPropertySet",
            vec![
                AttributeValue::string(new_global_id()),
                Null,
                AttributeValue::string(name),
                Null,
                AttributeValue::refs(values),
            ],
        );
        self.model.add(
            "IfcRelDefinesByProperties",
            vec![
                AttributeValue::string(new_global_id()),
                Null,
                Null,
                Null,
                AttributeValue::refs([product]),
                EntityRef(pset),
            ],
        );
        Ok(())
    }

    fn assign_representation(&mut self, product: u32, representation: u32) -> Result<()> {
        let shape = self.model.add(
            "IfcProductDefinitionShape",
            vec![Null, Null, AttributeValue::refs([representation])],
        );
        self.model
            .set_attribute(product, PRODUCT_REPRESENTATION, EntityRef(shape))?;
        Ok(())
    }

    fn set_placement(&mut self, product: u32, matrix: &Matrix4<f64>) -> Result<()> {
        let relative_to = self.root()?.site_placement;

        let location = self.point([matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]]);
        let axis = self.direction([matrix[(0, 2)], matrix[(1, 2)], matrix[(2, 2)]]);
        let ref_direction = self.direction([matrix[(0, 0)], matrix[(1, 0)], matrix[(2, 0)]]);
        let axes = self.model.add(
            "IfcAxis2Placement3D",
            vec![EntityRef(location), EntityRef(axis), EntityRef(ref_direction)],
        );
        let placement = self
            .model
            .add("IfcLocalPlacement", vec![EntityRef(relative_to), EntityRef(axes)]);

        self.model
            .set_attribute(product, PRODUCT_PLACEMENT, EntityRef(placement))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.contained.is_empty() {
            return Ok(());
        }
        let site = self.root()?.site;
        let related = AttributeValue::refs(std::mem::take(&mut self.contained));
        self.model.add(
            "IfcRelContainedInSpatialStructure",
            vec![
                AttributeValue::string(new_global_id()),
                Null,
                Null,
                Null,
                related,
                EntityRef(site),
            ],
        );
        Ok(())
    }

    fn serialize(&self) -> Result<String> {
        Ok(self.model.to_step())
    }
}
