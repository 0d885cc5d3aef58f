// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh-instance document model (.bim)
//!
//! A document is a flat list of reusable meshes plus a flat list of placed
//! elements. Each element points at one mesh by id and carries its own
//! placement, color and string metadata.

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Format version written into every document
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Flat string metadata attached to elements and documents.
///
/// Keys keep insertion order; overwriting a key keeps its first position.
pub type Info = IndexMap<String, String>;

/// Reusable triangle mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub mesh_id: u64,
    /// Vertex positions (x, y, z)
    pub coordinates: Vec<f64>,
    /// Triangle indices (i0, i1, i2), 0-based
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(mesh_id: u64, coordinates: Vec<f64>, indices: Vec<u32>) -> Self {
        Self {
            mesh_id,
            coordinates,
            indices,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.coordinates.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// RGBA color, one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque white, used whenever no material color is known
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as fractions of 255
    pub fn to_unit_rgba(self) -> [f64; 4] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Translation vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Rotation quaternion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub qx: f64,
    pub qy: f64,
    pub qz: f64,
    pub qw: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        qx: 0.0,
        qy: 0.0,
        qz: 0.0,
        qw: 1.0,
    };
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::IDENTITY
    }
}

/// Placed instance of a mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub info: Info,
    pub color: Color,
    pub guid: String,
    pub rotation: Rotation,
    /// Category of the originating element (e.g. "IfcWall")
    #[serde(rename = "type")]
    pub element_type: String,
    pub vector: Vector,
    pub mesh_id: u64,
}

/// Complete mesh-instance document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub schema_version: String,
    pub meshes: Vec<Mesh>,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub info: Info,
}

impl Document {
    /// Create a document tagged with the current format version
    pub fn new(meshes: Vec<Mesh>, elements: Vec<Element>, info: Info) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            meshes,
            elements,
            info,
        }
    }

    /// Look up a mesh by id
    pub fn mesh(&self, mesh_id: u64) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.mesh_id == mesh_id)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read a .bim file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write a .bim file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
