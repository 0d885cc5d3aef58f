// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # dotbim-ifc Core
//!
//! Data shared by both conversion directions:
//!
//! - **Document model**: the mesh-instance (.bim) document with serde JSON I/O
//! - **GlobalId codec**: compact 22-character IFC identifiers ↔ canonical UUID text
//! - **Attribute values**: IFC attribute values as read from, or written to, a model
//! - **STEP writer**: an append-only entity arena that serializes to ISO-10303-21
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dotbim_ifc_core::{guid, Document};
//!
//! let doc = Document::open("house.bim")?;
//! println!("{} meshes, {} elements", doc.meshes.len(), doc.elements.len());
//!
//! let canonical = guid::expand("2O2Fr$t4X7Zf8NOew3FLOH")?;
//! ```

pub mod attribute;
pub mod document;
pub mod error;
pub mod guid;
pub mod step;

pub use attribute::AttributeValue;
pub use document::{Color, Document, Element, Info, Mesh, Rotation, Vector, SCHEMA_VERSION};
pub use error::{Error, Result};
pub use step::{StepEntity, StepHeader, StepModel};
