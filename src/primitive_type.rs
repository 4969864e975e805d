//! Primitive types of the JSON data model, as seen by the `type` keyword.
use serde_json::Value;
use std::{convert::TryFrom, fmt, ops::BitOrAssign};

/// One of the seven JSON Schema primitive types.
///
/// The only subtyping relation is `integer` is-a `number`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[allow(missing_docs)]
pub enum PrimitiveType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

/// All primitive types in their canonical order.
pub(crate) const ALL_TYPES: [PrimitiveType; 7] = [
    PrimitiveType::Array,
    PrimitiveType::Boolean,
    PrimitiveType::Integer,
    PrimitiveType::Null,
    PrimitiveType::Number,
    PrimitiveType::Object,
    PrimitiveType::String,
];

impl PrimitiveType {
    /// The most specific primitive type of `value`.
    ///
    /// A number is an `integer` only when it was written without a fractional part or an
    /// exponent, so `1.0` is a `number`.
    #[must_use]
    pub fn of(value: &Value) -> PrimitiveType {
        match value {
            Value::Null => PrimitiveType::Null,
            Value::Bool(_) => PrimitiveType::Boolean,
            Value::Number(number) => {
                if number.is_i64() || number.is_u64() {
                    PrimitiveType::Integer
                } else {
                    PrimitiveType::Number
                }
            }
            Value::String(_) => PrimitiveType::String,
            Value::Array(_) => PrimitiveType::Array,
            Value::Object(_) => PrimitiveType::Object,
        }
    }

    /// Whether a value of type `self` also satisfies `other`.
    #[must_use]
    pub const fn is_a(self, other: PrimitiveType) -> bool {
        matches!(
            (self, other),
            (PrimitiveType::Integer, PrimitiveType::Number)
                | (PrimitiveType::Array, PrimitiveType::Array)
                | (PrimitiveType::Boolean, PrimitiveType::Boolean)
                | (PrimitiveType::Integer, PrimitiveType::Integer)
                | (PrimitiveType::Null, PrimitiveType::Null)
                | (PrimitiveType::Number, PrimitiveType::Number)
                | (PrimitiveType::Object, PrimitiveType::Object)
                | (PrimitiveType::String, PrimitiveType::String)
        )
    }

    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Array => "array",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Null => "null",
            PrimitiveType::Number => "number",
            PrimitiveType::Object => "object",
            PrimitiveType::String => "string",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PrimitiveType {
    type Error = ();

    #[inline]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "array" => Ok(PrimitiveType::Array),
            "boolean" => Ok(PrimitiveType::Boolean),
            "integer" => Ok(PrimitiveType::Integer),
            "null" => Ok(PrimitiveType::Null),
            "number" => Ok(PrimitiveType::Number),
            "object" => Ok(PrimitiveType::Object),
            "string" => Ok(PrimitiveType::String),
            _ => Err(()),
        }
    }
}

impl From<&Value> for PrimitiveType {
    fn from(instance: &Value) -> Self {
        PrimitiveType::of(instance)
    }
}

const fn primitive_type_to_bit_map_representation(primitive_type: PrimitiveType) -> u8 {
    match primitive_type {
        PrimitiveType::Array => 1,
        PrimitiveType::Boolean => 2,
        PrimitiveType::Integer => 4,
        PrimitiveType::Null => 8,
        PrimitiveType::Number => 16,
        PrimitiveType::Object => 32,
        PrimitiveType::String => 64,
    }
}

/// Compact representation of multiple [`PrimitiveType`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrimitiveTypesBitMap {
    inner: u8,
}

impl PrimitiveTypesBitMap {
    pub(crate) const fn new() -> Self {
        Self { inner: 0 }
    }

    #[inline]
    pub(crate) const fn add_type(mut self, primitive_type: PrimitiveType) -> Self {
        self.inner |= primitive_type_to_bit_map_representation(primitive_type);
        self
    }

    /// Whether `primitive_type` was added to this set.
    #[must_use]
    pub const fn contains_type(self, primitive_type: PrimitiveType) -> bool {
        primitive_type_to_bit_map_representation(primitive_type) & self.inner != 0
    }

    /// Whether a value of type `instance_type` satisfies any type in this set.
    #[must_use]
    pub fn accepts(self, instance_type: PrimitiveType) -> bool {
        self.into_iter().any(|listed| instance_type.is_a(listed))
    }

    /// Whether no types were added.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.inner == 0
    }
}

impl BitOrAssign<PrimitiveType> for PrimitiveTypesBitMap {
    #[inline]
    fn bitor_assign(&mut self, rhs: PrimitiveType) {
        *self = self.add_type(rhs);
    }
}

impl IntoIterator for PrimitiveTypesBitMap {
    type Item = PrimitiveType;
    type IntoIter = PrimitiveTypesBitMapIterator;
    fn into_iter(self) -> Self::IntoIter {
        PrimitiveTypesBitMapIterator {
            bit_map: self,
            idx: 0,
        }
    }
}

impl FromIterator<PrimitiveType> for PrimitiveTypesBitMap {
    fn from_iter<I: IntoIterator<Item = PrimitiveType>>(iter: I) -> Self {
        let mut result = Self::new();
        for primitive_type in iter {
            result |= primitive_type;
        }
        result
    }
}

/// Iterator over all [`PrimitiveType`] present in a [`PrimitiveTypesBitMap`]
#[derive(Debug)]
pub struct PrimitiveTypesBitMapIterator {
    bit_map: PrimitiveTypesBitMap,
    idx: usize,
}

impl Iterator for PrimitiveTypesBitMapIterator {
    type Item = PrimitiveType;

    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < ALL_TYPES.len() {
            let candidate = ALL_TYPES[self.idx];
            self.idx += 1;
            if self.bit_map.contains_type(candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_multiple_types() {
        let mut types = PrimitiveTypesBitMap::new();
        types |= PrimitiveType::Null;
        types |= PrimitiveType::String;
        types |= PrimitiveType::Array;
        assert!(types.contains_type(PrimitiveType::Null));
        assert!(types.contains_type(PrimitiveType::String));
        assert!(types.contains_type(PrimitiveType::Array));
        assert_eq!(
            types.into_iter().collect::<Vec<PrimitiveType>>(),
            vec![
                PrimitiveType::Array,
                PrimitiveType::Null,
                PrimitiveType::String
            ]
        )
    }

    #[test_case(&json!(null), PrimitiveType::Null)]
    #[test_case(&json!(true), PrimitiveType::Boolean)]
    #[test_case(&json!(1), PrimitiveType::Integer)]
    #[test_case(&json!(-1), PrimitiveType::Integer)]
    #[test_case(&json!(1.0), PrimitiveType::Number)]
    #[test_case(&json!("1"), PrimitiveType::String)]
    #[test_case(&json!([]), PrimitiveType::Array)]
    #[test_case(&json!({}), PrimitiveType::Object)]
    fn type_of(value: &Value, expected: PrimitiveType) {
        assert_eq!(PrimitiveType::of(value), expected)
    }

    #[test]
    fn integer_is_a_number() {
        assert!(PrimitiveType::Integer.is_a(PrimitiveType::Number));
        assert!(!PrimitiveType::Number.is_a(PrimitiveType::Integer));
        let types: PrimitiveTypesBitMap = vec![PrimitiveType::Number].into_iter().collect();
        assert!(types.accepts(PrimitiveType::Integer));
    }
}
