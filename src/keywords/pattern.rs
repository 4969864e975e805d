use crate::{
    error::{GenerationError, ValidationError},
    generation::{Generator, InstanceSet},
    keywords::helpers::{expect_string, keyword_location},
    node::SchemaNode,
    paths::LazyLocation,
    regex,
    validation::KeywordContext,
};
use serde_json::Value;

pub(crate) fn validate<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    if let Some(pattern) = expect_string(ctx, value) {
        if let Err(message) = regex::compile(pattern) {
            ctx.error(format!("is not a valid regular expression: {message}"));
        }
    }
}

pub(crate) fn apply<'s, 'i>(
    node: &SchemaNode<'s>,
    pattern: &'s Value,
    instance: &'i Value,
    location: &LazyLocation<'_>,
) -> Result<(), ValidationError<'i>> {
    if let (Value::String(item), Value::String(pattern)) = (instance, pattern) {
        match regex::is_match(pattern, item) {
            Ok(true) => {}
            Ok(false) => {
                return Err(ValidationError::pattern(
                    keyword_location(node, "pattern"),
                    location.into(),
                    instance,
                    pattern.clone(),
                ))
            }
            Err(error) => {
                return Err(ValidationError::backtrack_limit(
                    keyword_location(node, "pattern"),
                    location.into(),
                    instance,
                    error,
                ))
            }
        }
    }
    Ok(())
}

/// A string synthesized from the pattern and a short string outside of it.
pub(crate) fn generate<'s>(
    _: &mut Generator<'_>,
    _: &SchemaNode<'s>,
    pattern: &'s Value,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    if let Value::String(pattern) = pattern {
        output.extend(regex::sample(pattern).map(Value::String));
        output.extend(regex::non_matching(pattern).map(Value::String));
    }
    Ok(())
}
