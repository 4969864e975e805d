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
    if branches(node, "anyOf", schemas).any(|branch| application::is_valid(&branch, instance)) {
        Ok(())
    } else {
        Err(ValidationError::any_of(
            keyword_location(node, "anyOf"),
            location.into(),
            instance,
        ))
    }
}

pub(crate) fn generate<'s>(
    generator: &mut Generator<'_>,
    node: &SchemaNode<'s>,
    schemas: &'s Value,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    for branch in branches(node, "anyOf", schemas) {
        generator.extend_with(&branch, output)?;
    }
    Ok(())
}
