// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input side of the IFC → .bim direction.
//!
//! The converter never parses or tessellates IFC itself. It consumes:
//!
//! - a [`ShapeStream`]: a finite, single-pass sequence of tessellated shape
//!   occurrences, one per placed solid
//! - an [`IfcSource`]: element lookup (attributes, property sets, type) plus
//!   file header fields

use crate::error::Result;
use dotbim_ifc_core::AttributeValue;
use dotbim_ifc_geometry::SurfaceMaterial;

/// One tessellated shape occurrence
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    /// Compact GlobalId of the owning element
    pub guid: String,
    /// Shared by every occurrence of the same tessellated geometry
    pub geometry_id: String,
    /// Representation context the geometry was tessellated from
    pub context_id: Option<u32>,
    /// Flat vertex buffer (x, y, z)
    pub vertices: Vec<f64>,
    /// Flat triangle buffer, 0-based
    pub faces: Vec<u32>,
    pub materials: Vec<SurfaceMaterial>,
    /// Material index per triangle, parallel to `faces`
    pub material_ids: Vec<i32>,
    /// Placement: 3×3 rotation column by column, then translation
    pub matrix: [f64; 12],
}

impl ShapeRecord {
    /// Unplaced record with no materials
    pub fn new(
        guid: impl Into<String>,
        geometry_id: impl Into<String>,
        vertices: Vec<f64>,
        faces: Vec<u32>,
    ) -> Self {
        Self {
            guid: guid.into(),
            geometry_id: geometry_id.into(),
            context_id: None,
            vertices,
            faces,
            materials: Vec::new(),
            material_ids: Vec::new(),
            matrix: IDENTITY_MATRIX,
        }
    }

    pub fn with_matrix(mut self, matrix: [f64; 12]) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn with_materials(mut self, materials: Vec<SurfaceMaterial>, material_ids: Vec<i32>) -> Self {
        self.materials = materials;
        self.material_ids = material_ids;
        self
    }

    pub fn with_context(mut self, context_id: u32) -> Self {
        self.context_id = Some(context_id);
        self
    }
}

/// Compact encoding of the identity placement
pub const IDENTITY_MATRIX: [f64; 12] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];

/// Options handed to the tessellator before enumeration starts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometrySettings {
    /// Representation contexts to tessellate; empty means no restriction
    pub context_ids: Vec<u32>,
    /// Threads the tessellator may use internally
    pub worker_threads: usize,
}

/// Lazy, non-restartable sequence of shape records.
///
/// The converter calls [`initialize`](ShapeStream::initialize) once, then
/// pulls records one at a time until `next_shape` yields `None`.
pub trait ShapeStream {
    /// Prepare the enumeration. `false` means there is nothing to enumerate.
    /// A second call is an error, never a rewind.
    fn initialize(&mut self) -> Result<bool>;

    /// Advance to the next record, `None` once exhausted
    fn next_shape(&mut self) -> Result<Option<ShapeRecord>>;
}

/// Coarse element classification, decided once per record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    /// IfcAnnotation: drawing helpers, never exported
    Annotation,
    /// IfcOpeningElement and subtypes: void volumes, never exported
    Opening,
    /// Everything else
    Physical,
}

impl ElementCategory {
    pub fn from_class(class: &str) -> Self {
        if class.eq_ignore_ascii_case("IfcAnnotation") {
            ElementCategory::Annotation
        } else if class.eq_ignore_ascii_case("IfcOpeningElement")
            || class.eq_ignore_ascii_case("IfcOpeningStandardCase")
        {
            ElementCategory::Opening
        } else {
            ElementCategory::Physical
        }
    }

    /// Whether elements of this category are left out of the output
    #[inline]
    pub fn is_excluded(self) -> bool {
        !matches!(self, ElementCategory::Physical)
    }
}

/// Named group of properties
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySet {
    pub id: u32,
    pub name: String,
    pub properties: Vec<(String, AttributeValue)>,
}

impl PropertySet {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }
}

/// Type object (e.g. IfcWallType) of an element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementType {
    pub id: u32,
    pub class: String,
    pub property_sets: Vec<PropertySet>,
}

/// An element with everything needed to build its info map
#[derive(Debug, Clone, PartialEq)]
pub struct SourceElement {
    /// Express id
    pub id: u32,
    /// Class name, e.g. `IfcWall`
    pub class: String,
    /// Compact GlobalId
    pub global_id: String,
    /// Direct attributes in schema order
    pub attributes: Vec<(String, AttributeValue)>,
    pub property_sets: Vec<PropertySet>,
    pub element_type: Option<ElementType>,
}

impl SourceElement {
    /// New element whose first attribute is its GlobalId
    pub fn new(id: u32, class: impl Into<String>, global_id: impl Into<String>) -> Self {
        let global_id = global_id.into();
        Self {
            id,
            class: class.into(),
            attributes: vec![("GlobalId".to_string(), AttributeValue::String(global_id.clone()))],
            global_id,
            property_sets: Vec::new(),
            element_type: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_property_set(mut self, pset: PropertySet) -> Self {
        self.property_sets.push(pset);
        self
    }

    pub fn with_type(mut self, element_type: ElementType) -> Self {
        self.element_type = Some(element_type);
        self
    }

    #[inline]
    pub fn category(&self) -> ElementCategory {
        ElementCategory::from_class(&self.class)
    }
}

/// Representation context as declared in the model
#[derive(Debug, Clone, PartialEq)]
pub struct RepresentationContext {
    pub id: u32,
    /// `ContextType`, e.g. `Model` or `Plan`
    pub context_type: Option<String>,
    /// `ContextIdentifier`, e.g. `Body` (sub-contexts)
    pub identifier: Option<String>,
    /// IfcGeometricRepresentationSubContext rather than a root context
    pub is_sub_context: bool,
}

/// FILE_NAME header fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileHeader {
    pub author: Vec<String>,
    pub time_stamp: String,
}

/// Rich-schema model the forward converter reads from
pub trait IfcSource {
    fn header(&self) -> FileHeader;

    fn representation_contexts(&self) -> Vec<RepresentationContext>;

    /// Start a tessellation pass
    fn shapes(&self, settings: &GeometrySettings) -> Box<dyn ShapeStream + '_>;

    /// Resolve an element, with its property sets and type, by compact GlobalId
    fn element(&self, guid: &str) -> Result<SourceElement>;
}

/// Contexts whose geometry should be tessellated.
///
/// Sub-contexts with one of the given identifiers, plus root contexts of
/// type `Model`, since some authoring tools put body geometry directly in
/// the root context.
pub fn body_context_ids(contexts: &[RepresentationContext], identifiers: &[String]) -> Vec<u32> {
    let sub_contexts = contexts.iter().filter(|c| {
        c.is_sub_context
            && c.identifier
                .as_deref()
                .is_some_and(|id| identifiers.iter().any(|wanted| wanted == id))
    });
    let roots = contexts
        .iter()
        .filter(|c| !c.is_sub_context && c.context_type.as_deref() == Some("Model"));

    sub_contexts.chain(roots).map(|c| c.id).collect()
}
