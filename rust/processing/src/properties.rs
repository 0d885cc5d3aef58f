// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property flattening: element attributes and property sets → flat string map.
//!
//! Keys are written in three passes, later passes overwriting earlier ones:
//!
//! 1. `id`, `type` and the element's direct scalar attributes
//! 2. instance property sets, as `"{set}-{property}"`
//! 3. type property sets, same key format
//!
//! With [`PropertyPrecedence::InstanceWins`] passes 2 and 3 swap.

use crate::config::PropertyPrecedence;
use crate::source::{PropertySet, SourceElement};
use dotbim_ifc_core::Info;

/// Flatten an element into its info map
pub fn flatten_properties(element: &SourceElement, precedence: PropertyPrecedence) -> Info {
    let mut info = Info::new();
    info.insert("id".to_string(), element.id.to_string());
    info.insert("type".to_string(), element.class.clone());

    for (name, value) in &element.attributes {
        if let Some(text) = value.to_info_string() {
            info.insert(name.clone(), text);
        }
    }

    let type_sets: &[PropertySet] = element
        .element_type
        .as_ref()
        .map(|t| t.property_sets.as_slice())
        .unwrap_or_default();

    match precedence {
        PropertyPrecedence::TypeWins => {
            apply_property_sets(&mut info, &element.property_sets);
            apply_property_sets(&mut info, type_sets);
        }
        PropertyPrecedence::InstanceWins => {
            apply_property_sets(&mut info, type_sets);
            apply_property_sets(&mut info, &element.property_sets);
        }
    }

    info
}

fn apply_property_sets(info: &mut Info, sets: &[PropertySet]) {
    for pset in sets {
        info.insert(format!("{}-id", pset.name), pset.id.to_string());
        for (name, value) in &pset.properties {
            if let Some(text) = value.to_info_string() {
                info.insert(format!("{}-{}", pset.name, name), text);
            }
        }
    }
}
