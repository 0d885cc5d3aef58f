// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # dotbim-ifc processing
//!
//! Bidirectional conversion between rich IFC models and flat
//! mesh-instance (.bim) documents.
//!
//! - [`IfcToDotbim`] pulls tessellated shapes from an [`IfcSource`],
//!   deduplicates meshes and flattens element properties.
//! - [`DotbimToIfc`] drives an [`IfcSink`] such as [`IfcWriter`], turning
//!   per-instance colors into per-representation styles.
//!
//! ```rust,ignore
//! use dotbim_ifc_core::Document;
//! use dotbim_ifc_processing::{ConvertConfig, DotbimToIfc, IfcWriter};
//!
//! let document = Document::open("house.bim")?;
//! let config = ConvertConfig::from_env();
//! let mut writer = IfcWriter::new();
//! DotbimToIfc::new(&document, &config).execute(&mut writer)?;
//! writer.write("house.ifc")?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod forward;
pub mod memory;
pub mod properties;
pub mod reconcile;
pub mod reverse;
pub mod sink;
pub mod source;
pub mod writer;

pub use catalog::MeshCatalog;
pub use config::{ConvertConfig, PropertyPrecedence};
pub use error::{Error, Result};
pub use forward::{ForwardStats, IfcToDotbim};
pub use memory::MemorySource;
pub use properties::flatten_properties;
pub use reconcile::ColorReconciler;
pub use reverse::{element_name, DotbimToIfc, ReverseStats};
pub use sink::IfcSink;
pub use source::{
    body_context_ids, ElementCategory, ElementType, FileHeader, GeometrySettings, IfcSource,
    PropertySet, RepresentationContext, ShapeRecord, ShapeStream, SourceElement,
};
pub use writer::IfcWriter;
