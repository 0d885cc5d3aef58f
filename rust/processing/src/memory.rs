// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory [`IfcSource`] for callers that already hold tessellated shapes.

use crate::error::{Error, Result};
use crate::source::{
    FileHeader, GeometrySettings, IfcSource, RepresentationContext, ShapeRecord, ShapeStream,
    SourceElement,
};
use rustc_hash::FxHashMap;

/// Elements and pre-tessellated shape records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    header: FileHeader,
    contexts: Vec<RepresentationContext>,
    elements: FxHashMap<String, SourceElement>,
    shapes: Vec<ShapeRecord>,
}

impl MemorySource {
    pub fn new(header: FileHeader) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }

    pub fn add_context(&mut self, context: RepresentationContext) {
        self.contexts.push(context);
    }

    /// Register an element, keyed by its GlobalId
    pub fn add_element(&mut self, element: SourceElement) {
        self.elements.insert(element.global_id.clone(), element);
    }

    /// Append a shape record; records are enumerated in insertion order
    pub fn add_shape(&mut self, shape: ShapeRecord) {
        self.shapes.push(shape);
    }
}

impl IfcSource for MemorySource {
    fn header(&self) -> FileHeader {
        self.header.clone()
    }

    fn representation_contexts(&self) -> Vec<RepresentationContext> {
        self.contexts.clone()
    }

    fn shapes(&self, settings: &GeometrySettings) -> Box<dyn ShapeStream + '_> {
        Box::new(MemoryShapeStream {
            shapes: &self.shapes,
            context_ids: settings.context_ids.clone(),
            cursor: None,
        })
    }

    fn element(&self, guid: &str) -> Result<SourceElement> {
        self.elements
            .get(guid)
            .cloned()
            .ok_or_else(|| Error::ElementNotFound(guid.to_string()))
    }
}

/// Stream over borrowed records, filtered by representation context
struct MemoryShapeStream<'a> {
    shapes: &'a [ShapeRecord],
    context_ids: Vec<u32>,
    /// `None` until initialized
    cursor: Option<usize>,
}

impl MemoryShapeStream<'_> {
    fn accepts(&self, shape: &ShapeRecord) -> bool {
        match shape.context_id {
            Some(id) if !self.context_ids.is_empty() => self.context_ids.contains(&id),
            _ => true,
        }
    }
}

impl ShapeStream for MemoryShapeStream<'_> {
    fn initialize(&mut self) -> Result<bool> {
        if self.cursor.is_some() {
            return Err(Error::StreamAlreadyInitialized);
        }
        self.cursor = Some(0);
        Ok(self.shapes.iter().any(|s| self.accepts(s)))
    }

    fn next_shape(&mut self) -> Result<Option<ShapeRecord>> {
        let mut cursor = self.cursor.ok_or(Error::StreamNotInitialized)?;
        let found = loop {
            match self.shapes.get(cursor) {
                Some(shape) => {
                    cursor += 1;
                    if self.accepts(shape) {
                        break Some(shape.clone());
                    }
                }
                None => break None,
            }
        };
        self.cursor = Some(cursor);
        Ok(found)
    }
}
