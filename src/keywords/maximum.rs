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

/// Draft 4 `exclusiveMaximum` is a flag on `maximum`.
pub(crate) fn validate_exclusive<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    if expect_boolean(ctx, value).is_some() && !ctx.is_defaulted() && ctx.sibling("maximum").is_none() {
        ctx.error("requires 'maximum' to be present");
    }
}

fn is_exclusive(node: &SchemaNode<'_>) -> bool {
    matches!(node.get("exclusiveMaximum"), Some(Value::Bool(true)))
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
        (Ordering::Less, _) | (Ordering::Equal, false) => Ok(()),
        (_, true) => Err(ValidationError::exclusive_maximum(
            keyword_location(node, "exclusiveMaximum"),
            location.into(),
            instance,
            limit.clone(),
        )),
        (Ordering::Greater, false) => Err(ValidationError::maximum(
            keyword_location(node, "maximum"),
            location.into(),
            instance,
            limit.clone(),
        )),
    }
}

/// One below the bound when it is exclusive, the bound in both numeric forms, one above it when
/// it is inclusive.
pub(crate) fn generate<'s>(
    _: &mut Generator<'_>,
    node: &SchemaNode<'s>,
    limit: &'s Value,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    let delta = if is_exclusive(node) { -1 } else { 1 };
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

    #[test_case(&json!({"maximum": 5}), &json!(5))]
    #[test_case(&json!({"maximum": 5}), &json!(5.0))]
    #[test_case(&json!({"maximum": 5}), &json!(-10))]
    #[test_case(&json!({"maximum": 5}), &json!("6"))]
    #[test_case(&json!({"maximum": 5, "exclusiveMaximum": true}), &json!(4))]
    #[test_case(&json!({"maximum": 5, "exclusiveMaximum": true}), &json!(4.999))]
    #[test_case(&json!({"maximum": 5, "exclusiveMaximum": false}), &json!(5))]
    #[test_case(&json!({"maximum": 9_007_199_254_740_993_u64}), &json!(9_007_199_254_740_993_u64))]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(&json!({"maximum": 5}), &json!(6))]
    #[test_case(&json!({"maximum": 5}), &json!(5.5))]
    #[test_case(&json!({"maximum": 5, "exclusiveMaximum": true}), &json!(5))]
    #[test_case(&json!({"maximum": 5, "exclusiveMaximum": true}), &json!(5.0))]
    #[test_case(&json!({"maximum": 9_007_199_254_740_992_u64}), &json!(9_007_199_254_740_993_u64))]
    fn invalid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test_case(&json!({"maximum": 5}), &json!(6), "/maximum")]
    #[test_case(&json!({"maximum": 5, "exclusiveMaximum": true}), &json!(5), "/exclusiveMaximum")]
    fn schema_location(schema: &Value, instance: &Value, expected: &str) {
        tests_util::assert_schema_location(schema, instance, expected)
    }

    #[test_case(&json!({"maximum": 5}), &["5", "5.0"], &["6"])]
    #[test_case(&json!({"maximum": 5, "exclusiveMaximum": true}), &["4"], &["5", "5.0"])]
    #[test_case(&json!({"maximum": 2.5}), &["2.5"], &["3.5"])]
    fn generated(schema: &Value, valid: &[&str], invalid: &[&str]) {
        tests_util::assert_generates(schema, valid, invalid)
    }
}
