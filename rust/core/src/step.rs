// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP (ISO-10303-21) entity arena
//!
//! Entities are appended in creation order and addressed by their express
//! id (`#1`, `#2`, ...). Nothing is ever removed, so ids stay stable for the
//! lifetime of the model.

use crate::attribute::AttributeValue;
use crate::error::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt::Write as _;
use std::path::Path;

/// A single entity instance
#[derive(Debug, Clone, PartialEq)]
pub struct StepEntity {
    /// Upper-case class name, e.g. `IFCWALL`
    pub class: String,
    pub attributes: Vec<AttributeValue>,
}

impl StepEntity {
    /// Get attribute by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get entity reference at index
    #[inline]
    pub fn get_ref(&self, index: usize) -> Option<u32> {
        self.get(index).and_then(|a| a.as_entity_ref())
    }
}

/// HEADER section fields
#[derive(Debug, Clone, Default)]
pub struct StepHeader {
    pub description: Vec<String>,
    pub name: String,
    pub time_stamp: String,
    pub author: Vec<String>,
    pub organization: Vec<String>,
    pub preprocessor_version: String,
    pub originating_system: String,
    pub authorization: String,
    pub schema: String,
}

/// In-memory STEP model
#[derive(Debug, Clone)]
pub struct StepModel {
    header: StepHeader,
    entities: Vec<StepEntity>,
}

impl StepModel {
    /// Create an empty model for the given schema identifier (e.g. `IFC4`)
    pub fn new(schema: &str) -> Self {
        Self {
            header: StepHeader {
                description: vec!["ViewDefinition [CoordinationView]".to_string()],
                schema: schema.to_string(),
                ..StepHeader::default()
            },
            entities: Vec::new(),
        }
    }

    pub fn header(&self) -> &StepHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut StepHeader {
        &mut self.header
    }

    /// Append an entity and return its express id
    pub fn add(&mut self, class: &str, attributes: Vec<AttributeValue>) -> u32 {
        self.entities.push(StepEntity {
            class: class.to_ascii_uppercase(),
            attributes,
        });
        self.entities.len() as u32
    }

    /// Get entity by express id
    pub fn get(&self, id: u32) -> Option<&StepEntity> {
        if id == 0 {
            return None;
        }
        self.entities.get(id as usize - 1)
    }

    /// Replace one attribute of an existing entity
    pub fn set_attribute(&mut self, id: u32, index: usize, value: AttributeValue) -> Result<()> {
        let entity = match id {
            0 => None,
            _ => self.entities.get_mut(id as usize - 1),
        }
        .ok_or(Error::EntityNotFound(id))?;

        let slot = entity
            .attributes
            .get_mut(index)
            .ok_or(Error::AttributeOutOfRange { id, index })?;
        *slot = value;
        Ok(())
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate entities of a class (case-insensitive)
    pub fn by_type<'a>(&'a self, class: &'a str) -> impl Iterator<Item = (u32, &'a StepEntity)> + 'a {
        self.iter()
            .filter(move |(_, e)| e.class.eq_ignore_ascii_case(class))
    }

    /// Iterate all entities with their ids
    pub fn iter(&self) -> impl Iterator<Item = (u32, &StepEntity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (i as u32 + 1, e))
    }

    /// Structurally copy an entity and everything it references.
    ///
    /// Entities listed in `shared` are referenced by the copy instead of
    /// being duplicated. Sharing inside the copied subgraph is preserved:
    /// an entity reached twice is copied once. Returns the id of the copy.
    pub fn copy_deep(&mut self, id: u32, shared: &FxHashSet<u32>) -> Result<u32> {
        let mut copies = FxHashMap::default();
        self.copy_entity(id, shared, &mut copies)
    }

    fn copy_entity(
        &mut self,
        id: u32,
        shared: &FxHashSet<u32>,
        copies: &mut FxHashMap<u32, u32>,
    ) -> Result<u32> {
        if shared.contains(&id) {
            return Ok(id);
        }
        if let Some(&copy) = copies.get(&id) {
            return Ok(copy);
        }

        let entity = self.get(id).cloned().ok_or(Error::EntityNotFound(id))?;
        let mut attributes = Vec::with_capacity(entity.attributes.len());
        for attr in &entity.attributes {
            attributes.push(self.copy_value(attr, shared, copies)?);
        }

        let copy = self.add(&entity.class, attributes);
        copies.insert(id, copy);
        Ok(copy)
    }

    fn copy_value(
        &mut self,
        value: &AttributeValue,
        shared: &FxHashSet<u32>,
        copies: &mut FxHashMap<u32, u32>,
    ) -> Result<AttributeValue> {
        Ok(match value {
            AttributeValue::EntityRef(id) => {
                AttributeValue::EntityRef(self.copy_entity(*id, shared, copies)?)
            }
            AttributeValue::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.copy_value(item, shared, copies)?);
                }
                AttributeValue::List(out)
            }
            AttributeValue::Typed(name, inner) => AttributeValue::Typed(
                name.clone(),
                Box::new(self.copy_value(inner, shared, copies)?),
            ),
            other => other.clone(),
        })
    }

    /// Serialize to ISO-10303-21 text
    pub fn to_step(&self) -> String {
        let mut out = String::with_capacity(64 * (self.entities.len() + 8));
        let h = &self.header;

        out.push_str("ISO-10303-21;\nHEADER;\n");
        let _ = writeln!(
            out,
            "FILE_DESCRIPTION({},'2;1');",
            string_list(&h.description)
        );
        let _ = writeln!(
            out,
            "FILE_NAME({},{},{},{},{},{},{});",
            quote(&h.name),
            quote(&h.time_stamp),
            string_list(&h.author),
            string_list(&h.organization),
            quote(&h.preprocessor_version),
            quote(&h.originating_system),
            quote(&h.authorization)
        );
        let _ = writeln!(out, "FILE_SCHEMA(({}));", quote(&h.schema));
        out.push_str("ENDSEC;\nDATA;\n");

        for (id, entity) in self.iter() {
            let _ = write!(out, "#{}={}(", id, entity.class);
            for (i, attr) in entity.attributes.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(&mut out, attr);
            }
            out.push_str(");\n");
        }

        out.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
        out
    }

    /// Write the serialized model to disk
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_step())?;
        Ok(())
    }
}

fn write_value(out: &mut String, value: &AttributeValue) {
    match value {
        AttributeValue::EntityRef(id) => {
            let _ = write!(out, "#{}", id);
        }
        AttributeValue::String(s) => out.push_str(&quote(s)),
        AttributeValue::Integer(i) => {
            let _ = write!(out, "{}", i);
        }
        AttributeValue::Float(f) => out.push_str(&format_real(*f)),
        AttributeValue::Enum(e) => {
            let _ = write!(out, ".{}.", e);
        }
        AttributeValue::List(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(')');
        }
        AttributeValue::Typed(name, inner) => {
            out.push_str(&name.to_ascii_uppercase());
            out.push('(');
            write_value(out, inner);
            out.push(')');
        }
        AttributeValue::Null => out.push('$'),
        AttributeValue::Derived => out.push('*'),
    }
}

/// Format a REAL the way STEP expects: always a decimal point, `E` exponent
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return "0.".to_string();
    }
    let text = format!("{:?}", value);
    let (mantissa, exponent) = match text.split_once('e') {
        Some((m, e)) => (m, Some(e)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + 2);
    out.push_str(mantissa);
    if !mantissa.contains('.') {
        out.push('.');
    }
    if let Some(exp) = exponent {
        out.push('E');
        out.push_str(exp);
    }
    out
}

/// Encode a string literal: quotes doubled, backslashes escaped, non-ASCII
/// runs written as `\X2\` UTF-16 hex blocks
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    let mut in_unicode = false;
    for ch in value.chars() {
        if ch.is_ascii() {
            if in_unicode {
                out.push_str("\\X0\\");
                in_unicode = false;
            }
            match ch {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                _ => out.push(ch),
            }
        } else {
            if !in_unicode {
                out.push_str("\\X2\\");
                in_unicode = true;
            }
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                let _ = write!(out, "{:04X}", unit);
            }
        }
    }
    if in_unicode {
        out.push_str("\\X0\\");
    }
    out.push('\'');
    out
}

fn string_list(values: &[String]) -> String {
    if values.is_empty() {
        return "('')".to_string();
    }
    let parts: Vec<String> = values.iter().map(|v| quote(v)).collect();
    format!("({})", parts.join(","))
}
