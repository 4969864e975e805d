use crate::{
    error::{GenerationError, ValidationError},
    generation::{Generator, InstanceSet},
    keywords::helpers::{expect_boolean, expect_number, keyword_location},
    node::SchemaNode,
    paths::LazyLocation,
    validation::KeywordContext,
    value::{compare_numbers, offset_number, other_subtype},
};
use serde_json::Value;
use std::cmp::Ordering;

pub(crate) fn validate<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    expect_number(ctx, value);
}

pub(crate) fn validate_exclusive<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    if expect_boolean(ctx, value).is_some() && !ctx.is_defaulted() && ctx.sibling("minimum").is_none() {
        ctx.error("requires 'minimum' to be present");
    }
}

fn is_exclusive(node: &SchemaNode<'_>) -> bool {
    matches!(node.get("exclusiveMinimum"), Some(Value::Bool(true)))
}

pub(crate) fn apply<'s, 'i>(
    node: &SchemaNode<'s>,
    limit: &'s Value,
    instance: &'i Value,
    location: &LazyLocation<'_>,
) -> Result<(), ValidationError<'i>> {
    if !instance.is_number() {
        return Ok(());
    }
    match (compare_numbers(instance, limit), is_exclusive(node)) {
        (Ordering::Greater, _) | (Ordering::Equal, false) => Ok(()),
        (_, true) => Err(ValidationError::exclusive_minimum(
            keyword_location(node, "exclusiveMinimum"),
            location.into(),
            instance,
            limit.clone(),
        )),
        (Ordering::Less, false) => Err(ValidationError::minimum(
            keyword_location(node, "minimum"),
            location.into(),
            instance,
            limit.clone(),
        )),
    }
}

pub(crate) fn generate<'s>(
    _: &mut Generator<'_>,
    node: &SchemaNode<'s>,
    limit: &'s Value,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    let delta = if is_exclusive(node) { 1 } else { -1 };
    output.extend(offset_number(limit, delta));
    output.insert(limit.clone());
    output.extend(other_subtype(limit));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"minimum": 1}), &json!(1))]
    #[test_case(&json!({"minimum": 1}), &json!(1.5))]
    #[test_case(&json!({"minimum": 1, "exclusiveMinimum": true}), &json!(2))]
    #[test_case(&json!({"minimum": -1}), &json!(null))]
    #[test_case(&json!({"minimum": 0}), &json!(18_446_744_073_709_551_615_u64))]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(&json!({"minimum": 1}), &json!(0))]
    #[test_case(&json!({"minimum": 1}), &json!(0.999))]
    #[test_case(&json!({"minimum": 1, "exclusiveMinimum": true}), &json!(1.0))]
    #[test_case(&json!({"minimum": 0}), &json!(-1))]
    fn invalid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test_case(&json!({"minimum": 1}), &json!(0), "/minimum")]
    #[test_case(&json!({"minimum": 1, "exclusiveMinimum": true}), &json!(1), "/exclusiveMinimum")]
    fn schema_location(schema: &Value, instance: &Value, expected: &str) {
        tests_util::assert_schema_location(schema, instance, expected)
    }

    #[test_case(&json!({"minimum": 3}), &["3", "3.0"], &["2"])]
    #[test_case(&json!({"minimum": 3, "exclusiveMinimum": true}), &["4"], &["3", "3.0"])]
    fn generated(schema: &Value, valid: &[&str], invalid: &[&str]) {
        tests_util::assert_generates(schema, valid, invalid)
    }
}
