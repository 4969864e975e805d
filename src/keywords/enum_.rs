use crate::{
    error::{GenerationError, ValidationError},
    generation::{Generator, InstanceSet},
    keywords::helpers::{is_unique, keyword_location},
    node::SchemaNode,
    paths::LazyLocation,
    validation::KeywordContext,
    value::equal,
};
use serde_json::Value;

pub(crate) fn validate<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    match value {
        Value::Array(options) if options.is_empty() => {
            ctx.error("must have at least one element");
        }
        Value::Array(options) => {
            if !is_unique(options) {
                ctx.error("elements must be unique");
            }
        }
        _ => ctx.error(format!("must be an array, found {value}")),
    }
}

pub(crate) fn apply<'s, 'i>(
    node: &SchemaNode<'s>,
    options: &'s Value,
    instance: &'i Value,
    location: &LazyLocation<'_>,
) -> Result<(), ValidationError<'i>> {
    if let Value::Array(items) = options {
        if !items.iter().any(|item| equal(instance, item)) {
            return Err(ValidationError::enumeration(
                keyword_location(node, "enum"),
                location.into(),
                instance,
                options.clone(),
            ));
        }
    }
    Ok(())
}

/// Every listed literal.
pub(crate) fn generate<'s>(
    _: &mut Generator<'_>,
    _: &SchemaNode<'s>,
    options: &'s Value,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    if let Value::Array(items) = options {
        output.extend(items.iter().cloned());
    }
    Ok(())
}
