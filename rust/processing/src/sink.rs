// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output side of the .bim → IFC direction.
//!
//! The reverse converter drives an [`IfcSink`] and never touches entities
//! directly. Implementations own identifier allocation and are driven from
//! a single thread.

use crate::error::Result;
use dotbim_ifc_core::{Color, Info};
use dotbim_ifc_geometry::{Matrix4, TessellatedMesh};
use std::fmt::Debug;
use std::hash::Hash;

pub trait IfcSink {
    /// Handle to a shape representation
    type Representation: Copy + Eq + Hash + Debug;
    /// Handle to a placed product
    type Product: Copy + Debug;

    /// Header author and timestamp
    fn set_file_info(&mut self, author: Option<&str>, time_stamp: Option<&str>);

    /// Project with units, and a site aggregated under it
    fn create_project(&mut self, project_name: &str, site_name: &str) -> Result<()>;

    /// Model context with a `Body` sub-context for tessellated geometry
    fn create_body_context(&mut self) -> Result<()>;

    /// Representation holding a point list and indexed triangular faces
    fn add_tessellation(&mut self, mesh: &TessellatedMesh) -> Result<Self::Representation>;

    /// Duplicate a representation's geometry and topology, without styles
    fn clone_representation(&mut self, representation: Self::Representation) -> Result<Self::Representation>;

    /// Attach a surface style of the given color to every item of a representation
    fn assign_color(&mut self, representation: Self::Representation, color: Color) -> Result<()>;

    /// Generic placeholder product contained in the site
    fn add_proxy(&mut self, name: &str) -> Result<Self::Product>;

    /// Property set of string values attached to a product
    fn add_property_set(&mut self, product: Self::Product, name: &str, properties: &Info) -> Result<()>;

    fn assign_representation(&mut self, product: Self::Product, representation: Self::Representation) -> Result<()>;

    /// Absolute placement from a homogeneous transform
    fn set_placement(&mut self, product: Self::Product, matrix: &Matrix4<f64>) -> Result<()>;

    /// Write any relationships deferred until all products exist
    fn finish(&mut self) -> Result<()>;

    /// Serialized model
    fn serialize(&self) -> Result<String>;
}
