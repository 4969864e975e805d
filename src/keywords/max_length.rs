use crate::{
    error::{GenerationError, ValidationError},
    generation::{Generator, InstanceSet},
    keywords::helpers::{expect_non_negative_integer, keyword_location},
    node::SchemaNode,
    paths::LazyLocation,
    validation::KeywordContext,
};
use serde_json::Value;

pub(crate) fn validate<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    expect_non_negative_integer(ctx, value);
}

pub(crate) fn apply<'s, 'i>(
    node: &SchemaNode<'s>,
    limit: &'s Value,
    instance: &'i Value,
    location: &LazyLocation<'_>,
) -> Result<(), ValidationError<'i>> {
    if let (Value::String(item), Some(limit)) = (instance, limit.as_u64()) {
        if (char_count(item) as u64) > limit {
            return Err(ValidationError::max_length(
                keyword_location(node, "maxLength"),
                location.into(),
                instance,
                limit,
            ));
        }
    }
    Ok(())
}

/// Length in Unicode scalar values.
#[inline]
pub(crate) fn char_count(item: &str) -> usize {
    item.chars().count()
}

/// Strings one short of the bound, exactly at it and one past it.
pub(crate) fn generate<'s>(
    generator: &mut Generator<'_>,
    node: &SchemaNode<'s>,
    limit: &'s Value,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    let Some(limit) = limit.as_u64() else {
        return Ok(());
    };
    let limit = generator.check_limit(
        node,
        "maxLength",
        limit,
        generator.options().max_string_length(),
    )?;
    if let Some(shorter) = limit.checked_sub(1) {
        output.insert(Value::String("x".repeat(shorter)));
    }
    output.insert(Value::String("x".repeat(limit)));
    output.insert(Value::String("x".repeat(limit + 1)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"maxLength": 2}), &json!("ab"))]
    #[test_case(&json!({"maxLength": 2}), &json!("日本"))]
    #[test_case(&json!({"maxLength": 0}), &json!(""))]
    #[test_case(&json!({"maxLength": 2}), &json!(100))]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(&json!({"maxLength": 2}), &json!("abc"))]
    #[test_case(&json!({"maxLength": 0}), &json!("a"))]
    fn invalid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test]
    fn generated() {
        tests_util::assert_generates(
            &json!({"maxLength": 3}),
            &[r#""xx""#, r#""xxx""#],
            &[r#""xxxx""#],
        )
    }

    #[test]
    fn nothing_shorter_than_empty() {
        tests_util::assert_generates(&json!({"maxLength": 0}), &[r#""""#], &[r#""x""#])
    }

    #[test]
    fn limit_is_enforced() {
        tests_util::assert_limit_exceeded(&json!({"maxLength": 4_294_967_295_u64}), "maxLength")
    }
}
