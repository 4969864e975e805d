use crate::{
    error::{GenerationError, ValidationError},
    generation::{Generator, InstanceSet},
    keywords::{
        helpers::{expect_non_negative_integer, keyword_location},
        max_length::char_count,
    },
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
        if (char_count(item) as u64) < limit {
            return Err(ValidationError::min_length(
                keyword_location(node, "minLength"),
                location.into(),
                instance,
                limit,
            ));
        }
    }
    Ok(())
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
        "minLength",
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
