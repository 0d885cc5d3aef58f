// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC attribute values
//!
//! Shared by the readers that describe source elements and by the STEP
//! writer that emits new entities.

/// IFC entity attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Entity reference
    EntityRef(u32),
    /// String value
    String(String),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Enum value, without the surrounding dots
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Typed value such as IFCLABEL('x')
    Typed(String, Box<AttributeValue>),
    /// Null/undefined ($)
    Null,
    /// Derived value (*)
    Derived,
}

impl AttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        AttributeValue::String(value.into())
    }

    pub fn enumeration(value: impl Into<String>) -> Self {
        AttributeValue::Enum(value.into())
    }

    pub fn typed(type_name: impl Into<String>, value: AttributeValue) -> Self {
        AttributeValue::Typed(type_name.into(), Box::new(value))
    }

    /// List of entity references
    pub fn refs<I: IntoIterator<Item = u32>>(ids: I) -> Self {
        AttributeValue::List(ids.into_iter().map(AttributeValue::EntityRef).collect())
    }

    /// List of reals
    pub fn reals<I: IntoIterator<Item = f64>>(values: I) -> Self {
        AttributeValue::List(values.into_iter().map(AttributeValue::Float).collect())
    }

    /// Get as entity reference
    #[inline]
    pub fn as_entity_ref(&self) -> Option<u32> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as list
    #[inline]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if null/derived
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null | AttributeValue::Derived)
    }

    /// True when the value is, or contains, a reference to another entity
    pub fn references_entity(&self) -> bool {
        match self {
            AttributeValue::EntityRef(_) => true,
            AttributeValue::List(items) => items.iter().any(Self::references_entity),
            AttributeValue::Typed(_, inner) => inner.references_entity(),
            _ => false,
        }
    }

    /// Render the value for a flat string map.
    ///
    /// Returns `None` for anything that points at another entity: such
    /// values are dropped rather than stringified.
    pub fn to_info_string(&self) -> Option<String> {
        if self.references_entity() {
            return None;
        }
        Some(self.render(false))
    }

    fn render(&self, nested: bool) -> String {
        match self {
            AttributeValue::String(s) if nested => format!("'{}'", s),
            AttributeValue::String(s) => s.clone(),
            AttributeValue::Integer(i) => i.to_string(),
            AttributeValue::Float(f) => format_float(*f),
            AttributeValue::Enum(e) => match e.as_str() {
                "T" => "True".to_string(),
                "F" => "False".to_string(),
                "U" => "UNKNOWN".to_string(),
                other => other.to_string(),
            },
            AttributeValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.render(true)).collect();
                if parts.len() == 1 {
                    format!("({},)", parts[0])
                } else {
                    format!("({})", parts.join(", "))
                }
            }
            AttributeValue::Typed(_, inner) => inner.render(nested),
            AttributeValue::Null | AttributeValue::Derived => "None".to_string(),
            // Filtered out by to_info_string
            AttributeValue::EntityRef(id) => format!("#{}", id),
        }
    }
}

/// Shortest round-trip text for a real, with the exponent written as a sign
/// and at least two digits (`1e+16`, `1.5e-07`)
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let text = format!("{:?}", value);
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Enum(if value { "T" } else { "F" }.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(AttributeValue::from("Wall-01").to_info_string().unwrap(), "Wall-01");
        assert_eq!(AttributeValue::Integer(42).to_info_string().unwrap(), "42");
        assert_eq!(AttributeValue::Float(1.0).to_info_string().unwrap(), "1.0");
        assert_eq!(AttributeValue::Float(0.25).to_info_string().unwrap(), "0.25");
        assert_eq!(AttributeValue::from(true).to_info_string().unwrap(), "True");
        assert_eq!(
            AttributeValue::enumeration("ELEMENT").to_info_string().unwrap(),
            "ELEMENT"
        );
        assert_eq!(AttributeValue::Null.to_info_string().unwrap(), "None");
    }

    #[test]
    fn test_float_exponents() {
        let render = |f: f64| AttributeValue::Float(f).to_info_string().unwrap();
        assert_eq!(render(1e16), "1e+16");
        assert_eq!(render(1e-7), "1e-07");
        assert_eq!(render(1.5e-7), "1.5e-07");
        assert_eq!(render(-2.5e100), "-2.5e+100");
        assert_eq!(render(1e15), "1000000000000000.0");
        assert_eq!(render(0.0001), "0.0001");
        assert_eq!(render(f64::INFINITY), "inf");
        assert_eq!(render(f64::NEG_INFINITY), "-inf");
        assert_eq!(render(f64::NAN), "nan");
    }

    #[test]
    fn test_logical_unknown() {
        assert_eq!(AttributeValue::enumeration("U").to_info_string().unwrap(), "UNKNOWN");
        assert_eq!(AttributeValue::enumeration("F").to_info_string().unwrap(), "False");
    }

    #[test]
    fn test_lists_render_like_tuples() {
        let pair = AttributeValue::reals([1.0, 2.5]);
        assert_eq!(pair.to_info_string().unwrap(), "(1.0, 2.5)");

        let single = AttributeValue::List(vec![AttributeValue::from("a")]);
        assert_eq!(single.to_info_string().unwrap(), "('a',)");
    }

    #[test]
    fn test_references_are_dropped() {
        assert!(AttributeValue::EntityRef(12).to_info_string().is_none());
        assert!(AttributeValue::refs([1, 2]).to_info_string().is_none());
        let mixed = AttributeValue::List(vec![AttributeValue::Integer(1), AttributeValue::EntityRef(3)]);
        assert!(mixed.to_info_string().is_none());
    }

    #[test]
    fn test_typed_value_renders_inner() {
        let label = AttributeValue::typed("IFCLABEL", AttributeValue::from("Concrete"));
        assert_eq!(label.to_info_string().unwrap(), "Concrete");
    }
}
