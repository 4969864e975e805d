use crate::{
    application,
    error::{GenerationError, ValidationError},
    generation::{Generator, InstanceSet},
    keywords::helpers::{branches, expect_schema_array, keyword_location},
    node::SchemaNode,
    paths::LazyLocation,
    validation::KeywordContext,
};
use serde_json::Value;

pub(crate) fn validate<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    expect_schema_array(ctx, value);
}

pub(crate) fn apply<'s, 'i>(
    node: &SchemaNode<'s>,
    schemas: &'s Value,
    instance: &'i Value,
    location: &LazyLocation<'_>,
) -> Result<(), ValidationError<'i>> {
    let mut valid = branches(node, "oneOf", schemas)
        .filter(|branch| application::is_valid(branch, instance));
    match (valid.next(), valid.next()) {
        (Some(_), None) => Ok(()),
        (None, _) => Err(ValidationError::one_of_not_valid(
            keyword_location(node, "oneOf"),
            location.into(),
            instance,
        )),
        (Some(_), Some(_)) => Err(ValidationError::one_of_multiple_valid(
            keyword_location(node, "oneOf"),
            location.into(),
            instance,
        )),
    }
}

pub(crate) fn generate<'s>(
    generator: &mut Generator<'_>,
    node: &SchemaNode<'s>,
    schemas: &'s Value,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    for branch in branches(node, "oneOf", schemas) {
        generator.extend_with(&branch, output)?;
    }
    Ok(())
}
