//! Keywords that annotate a schema without constraining instances.
use crate::{
    error::GenerationError,
    generation::{Generator, InstanceSet},
    keywords::helpers::{expect_object, expect_string},
    node::SchemaNode,
    paths::LocationSegment,
    validation::KeywordContext,
};
use serde_json::Value;

const DRAFT_4_URIS: [&str; 2] = [
    "http://json-schema.org/draft-04/schema#",
    "http://json-schema.org/draft-04/schema",
];

/// `title` and `description`.
pub(crate) fn validate_text<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    expect_string(ctx, value);
}

pub(crate) fn validate_definitions<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    if let Some(definitions) = expect_object(ctx, value) {
        for (name, schema) in definitions {
            ctx.validate_subschema(schema, &[LocationSegment::Property(name)]);
        }
    }
}

pub(crate) fn validate_dialect<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    if let Some(uri) = expect_string(ctx, value) {
        if !DRAFT_4_URIS.contains(&uri) {
            ctx.info(format!("'{uri}' is not draft 4, the schema is checked as draft 4"));
        }
    }
}

pub(crate) fn validate_id<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    expect_string(ctx, value);
}

/// The declared default is a likely instance, whatever its validity.
pub(crate) fn generate_default<'s>(
    _: &mut Generator<'_>,
    _: &SchemaNode<'s>,
    value: &'s Value,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    output.insert(value.clone());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{diagnostics::Severity, tests_util, validation::validate_schema};
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"title": 1}), "$['title']")]
    #[test_case(&json!({"description": []}), "$['description']")]
    #[test_case(&json!({"definitions": []}), "$['definitions']")]
    #[test_case(&json!({"definitions": {"a": {"type": 1}}}), "$['definitions']['a']")]
    #[test_case(&json!({"id": 5}), "$['id']")]
    fn malformed(schema: &Value, location: &str) {
        let (valid, diagnostics) = validate_schema(schema);
        assert!(!valid);
        assert_eq!(diagnostics[0].location(), location);
    }

    #[test]
    fn other_dialect_is_noted() {
        let (valid, diagnostics) =
            validate_schema(&json!({"$schema": "http://json-schema.org/draft-07/schema#"}));
        assert!(valid);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity(), Severity::Info);
    }

    #[test]
    fn draft_4_dialect() {
        let (valid, diagnostics) =
            validate_schema(&json!({"$schema": "http://json-schema.org/draft-04/schema#"}));
        assert!(valid);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn default_is_generated() {
        tests_util::assert_generates(
            &json!({"type": "string", "default": "hello"}),
            &[r#""hello""#],
            &[],
        )
    }

    #[test]
    fn definitions_do_not_constrain() {
        tests_util::is_valid(&json!({"definitions": {"a": {"type": "string"}}}), &json!(1))
    }
}
