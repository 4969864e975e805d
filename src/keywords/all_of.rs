use crate::{
    application,
    error::{GenerationError, ValidationError},
    generation::{Generator, InstanceSet},
    keywords::helpers::{branches, expect_schema_array},
    node::SchemaNode,
    paths::LazyLocation,
    validation::KeywordContext,
};
use serde_json::Value;

pub(crate) fn validate<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    expect_schema_array(ctx, value);
}

/// The first failing branch reports its own error.
pub(crate) fn apply<'s, 'i>(
    node: &SchemaNode<'s>,
    schemas: &'s Value,
    instance: &'i Value,
    location: &LazyLocation<'_>,
) -> Result<(), ValidationError<'i>> {
    for branch in branches(node, "allOf", schemas) {
        application::apply(&branch, instance, location)?;
    }
    Ok(())
}

pub(crate) fn generate<'s>(
    generator: &mut Generator<'_>,
    node: &SchemaNode<'s>,
    schemas: &'s Value,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    for branch in branches(node, "allOf", schemas) {
        generator.extend_with(&branch, output)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"allOf": [{"type": "integer"}, {"minimum": 2}]}), &json!(3))]
    #[test_case(&json!({"allOf": [{}]}), &json!("anything"))]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(&json!({"allOf": [{"type": "integer"}, {"minimum": 2}]}), &json!(1))]
    #[test_case(&json!({"allOf": [{"type": "integer"}, {"minimum": 2}]}), &json!(2.5))]
    fn invalid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test]
    fn schema_location() {
        tests_util::assert_schema_location(
            &json!({"allOf": [{"type": "integer"}, {"minimum": 2}]}),
            &json!(1),
            "/allOf/1/minimum",
        )
    }

    #[test]
    fn generated() {
        tests_util::assert_generates(
            &json!({"allOf": [{"type": "integer"}, {"maximum": 3}]}),
            &["0", "3"],
            &["0.5", "3.0", "4"],
        )
    }
}
