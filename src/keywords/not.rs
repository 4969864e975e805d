use crate::{
    application,
    error::{GenerationError, ValidationError},
    generation::{Generator, InstanceSet},
    keywords::helpers::keyword_location,
    node::SchemaNode,
    paths::{LazyLocation, LocationSegment},
    validation::KeywordContext,
};
use serde_json::Value;

pub(crate) fn validate<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    ctx.validate_subschema(value, &[]);
}

fn negated<'s>(node: &SchemaNode<'s>, schema: &'s Value) -> SchemaNode<'s> {
    node.subschema(schema, [LocationSegment::Property("not")], false)
}

pub(crate) fn apply<'s, 'i>(
    node: &SchemaNode<'s>,
    schema: &'s Value,
    instance: &'i Value,
    location: &LazyLocation<'_>,
) -> Result<(), ValidationError<'i>> {
    if application::is_valid(&negated(node, schema), instance) {
        Err(ValidationError::not(
            keyword_location(node, "not"),
            location.into(),
            instance,
            schema.clone(),
        ))
    } else {
        Ok(())
    }
}

/// Instances of the negated schema; their validity flips when classified against this node.
pub(crate) fn generate<'s>(
    generator: &mut Generator<'_>,
    node: &SchemaNode<'s>,
    schema: &'s Value,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    generator.extend_with(&negated(node, schema), output)
}
