use crate::{
    error::{GenerationError, ValidationError},
    generation::{Generator, InstanceSet},
    keywords::helpers::{is_unique, keyword_location},
    node::SchemaNode,
    paths::{LazyLocation, LocationSegment},
    primitive_type::{PrimitiveType, PrimitiveTypesBitMap},
    validation::KeywordContext,
};
use serde_json::{json, Value};
use std::convert::TryFrom;

pub(crate) fn validate<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    match value {
        Value::String(name) => {
            if PrimitiveType::try_from(name.as_str()).is_err() {
                ctx.error(format!("'{name}' is not a primitive type"));
            }
        }
        Value::Array(names) if names.is_empty() => {
            ctx.warning("is an empty array, no instance can be valid");
        }
        Value::Array(names) => {
            for (idx, name) in names.iter().enumerate() {
                let known = name
                    .as_str()
                    .map_or(false, |name| PrimitiveType::try_from(name).is_ok());
                if !known {
                    ctx.error_at(
                        &[LocationSegment::Index(idx)],
                        format!("{name} is not a primitive type"),
                    );
                }
            }
            if !is_unique(names) {
                ctx.error("elements must be unique");
            }
        }
        _ => ctx.error(format!("must be a string or an array of strings, found {value}")),
    }
}

/// Types named by the keyword value, unknown names are skipped.
pub(crate) fn types_of(value: &Value) -> PrimitiveTypesBitMap {
    match value {
        Value::String(name) => PrimitiveType::try_from(name.as_str())
            .map(|primitive_type| PrimitiveTypesBitMap::new().add_type(primitive_type))
            .unwrap_or_default(),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|name| PrimitiveType::try_from(name).ok())
            .collect(),
        _ => PrimitiveTypesBitMap::new(),
    }
}

pub(crate) fn apply<'s, 'i>(
    node: &SchemaNode<'s>,
    value: &'s Value,
    instance: &'i Value,
    location: &LazyLocation<'_>,
) -> Result<(), ValidationError<'i>> {
    let instance_type = PrimitiveType::of(instance);
    match value {
        Value::String(name) => {
            let Ok(expected) = PrimitiveType::try_from(name.as_str()) else {
                return Ok(());
            };
            if instance_type.is_a(expected) {
                Ok(())
            } else {
                Err(ValidationError::single_type_error(
                    keyword_location(node, "type"),
                    location.into(),
                    instance,
                    expected,
                ))
            }
        }
        _ => {
            let types = types_of(value);
            if types.accepts(instance_type) {
                Ok(())
            } else {
                Err(ValidationError::multiple_type_error(
                    keyword_location(node, "type"),
                    location.into(),
                    instance,
                    types,
                ))
            }
        }
    }
}

/// A minimal value of `primitive_type` and a value that only just misses it.
fn representatives(primitive_type: PrimitiveType) -> [Value; 2] {
    match primitive_type {
        PrimitiveType::Array => [json!([]), json!({})],
        PrimitiveType::Boolean => [json!(true), json!(0)],
        PrimitiveType::Integer => [json!(0), json!(0.5)],
        PrimitiveType::Null => [Value::Null, json!(false)],
        PrimitiveType::Number => [json!(0.5), json!("0")],
        PrimitiveType::Object => [json!({}), json!([])],
        PrimitiveType::String => [json!(""), Value::Null],
    }
}

pub(crate) fn generate<'s>(
    _: &mut Generator<'_>,
    _: &SchemaNode<'s>,
    value: &'s Value,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    for primitive_type in types_of(value) {
        output.extend(representatives(primitive_type));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"type": "integer"}), &json!(1))]
    #[test_case(&json!({"type": "number"}), &json!(1))]
    #[test_case(&json!({"type": "number"}), &json!(1.5))]
    #[test_case(&json!({"type": ["null", "string"]}), &json!(null))]
    #[test_case(&json!({"type": ["integer", "object"]}), &json!({}))]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(&json!({"type": "integer"}), &json!(1.0))]
    #[test_case(&json!({"type": "integer"}), &json!("1"))]
    #[test_case(&json!({"type": "boolean"}), &json!(0))]
    #[test_case(&json!({"type": ["null", "string"]}), &json!(1))]
    #[test_case(&json!({"type": []}), &json!(null))]
    fn invalid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test]
    fn generated() {
        tests_util::assert_generates(
            &json!({"type": ["integer", "null"]}),
            &["0", "null"],
            &["0.5", "false"],
        )
    }

    #[test_case(&json!({"type": "string"}), &json!(1), "/type")]
    #[test_case(&json!({"properties": {"a": {"type": "string"}}}), &json!({"a": 1}), "/properties/a/type")]
    fn schema_location(schema: &Value, instance: &Value, expected: &str) {
        tests_util::assert_schema_location(schema, instance, expected)
    }
}
