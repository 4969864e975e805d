use crate::{
    node::{SchemaNode, EMPTY_SCHEMA},
    paths::{Location, LocationSegment},
    string_set::StringSet,
    validation::KeywordContext,
    value::HashedValue,
};
use ahash::AHashSet;
use once_cell::sync::Lazy;
use serde_json::{Map, Number, Value};

static FALSE: Value = Value::Bool(false);
static ZERO: Lazy<Value> = Lazy::new(|| Value::from(0));

pub(crate) fn empty_schema() -> &'static Value {
    &EMPTY_SCHEMA
}

pub(crate) fn falsy() -> &'static Value {
    &FALSE
}

pub(crate) fn zero() -> &'static Value {
    &ZERO
}

/// Location of `keyword` on `node`, used as the schema path of errors.
#[inline]
pub(crate) fn keyword_location(node: &SchemaNode<'_>, keyword: &str) -> Location {
    node.location().join(keyword)
}

pub(crate) fn expect_number<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) -> Option<&'s Number> {
    if let Value::Number(number) = value {
        Some(number)
    } else {
        ctx.error(format!("must be a number, found {value}"));
        None
    }
}

pub(crate) fn expect_boolean(ctx: &mut KeywordContext<'_, '_>, value: &Value) -> Option<bool> {
    if let Value::Bool(flag) = value {
        Some(*flag)
    } else {
        ctx.error(format!("must be a boolean, found {value}"));
        None
    }
}

pub(crate) fn expect_string<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) -> Option<&'s str> {
    if let Value::String(string) = value {
        Some(string)
    } else {
        ctx.error(format!("must be a string, found {value}"));
        None
    }
}

pub(crate) fn expect_object<'s>(
    ctx: &mut KeywordContext<'_, 's>,
    value: &'s Value,
) -> Option<&'s Map<String, Value>> {
    if let Value::Object(object) = value {
        Some(object)
    } else {
        ctx.error(format!("must be an object, found {value}"));
        None
    }
}

/// Draft 4 counts are JSON integers; `5.0` is not accepted.
pub(crate) fn expect_non_negative_integer(
    ctx: &mut KeywordContext<'_, '_>,
    value: &Value,
) -> Option<u64> {
    match value.as_u64() {
        Some(count) => Some(count),
        None => {
            ctx.error(format!("must be a non-negative integer, found {value}"));
            None
        }
    }
}

/// A non-empty array of schemas, each validated recursively.
pub(crate) fn expect_schema_array<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) -> bool {
    match value {
        Value::Array(items) if items.is_empty() => {
            ctx.error("must be a non-empty array of schemas");
            false
        }
        Value::Array(items) => {
            let mut valid = true;
            for (idx, item) in items.iter().enumerate() {
                valid &= ctx.validate_subschema(item, &[LocationSegment::Index(idx)]);
            }
            valid
        }
        _ => {
            ctx.error(format!("must be an array of schemas, found {value}"));
            false
        }
    }
}

/// A non-empty array of unique strings.
pub(crate) fn expect_unique_strings<'s>(
    ctx: &mut KeywordContext<'_, 's>,
    value: &'s Value,
    segments: &[LocationSegment<'_>],
) -> Option<StringSet> {
    let Value::Array(items) = value else {
        ctx.error_at(segments, format!("must be an array of strings, found {value}"));
        return None;
    };
    if items.is_empty() {
        ctx.error_at(segments, "must have at least one element");
        return None;
    }
    let mut valid = true;
    for (idx, item) in items.iter().enumerate() {
        if !item.is_string() {
            let mut location = segments.to_vec();
            location.push(LocationSegment::Index(idx));
            ctx.error_at(&location, format!("must be a string, found {item}"));
            valid = false;
        }
    }
    if !valid {
        return None;
    }
    if !is_unique(items) {
        ctx.error_at(segments, "elements must be unique");
        return None;
    }
    Some(StringSet::from_array_of_strings(items))
}

/// Nodes for the schemas of an array-valued keyword such as `allOf`.
pub(crate) fn branches<'n, 's>(
    node: &'n SchemaNode<'s>,
    keyword: &'static str,
    value: &'s Value,
) -> impl Iterator<Item = SchemaNode<'s>> + 'n {
    value
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(move |(idx, schema)| {
            node.subschema(
                schema,
                [LocationSegment::Property(keyword), LocationSegment::Index(idx)],
                false,
            )
        })
}

/// Whether no two elements are equal under schema equality.
pub(crate) fn is_unique(items: &[Value]) -> bool {
    let mut seen = AHashSet::with_capacity(items.len());
    items.iter().map(HashedValue).all(move |item| seen.insert(item))
}

#[cfg(test)]
mod tests {
    use super::is_unique;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!([]), true)]
    #[test_case(&json!([1, "1", [1]]), true)]
    #[test_case(&json!([1, 1.0]), false)]
    #[test_case(&json!([{"a": 1, "b": 2}, {"b": 2, "a": 1}]), false)]
    fn uniqueness(items: &Value, expected: bool) {
        assert_eq!(is_unique(items.as_array().expect("array")), expected)
    }
}
