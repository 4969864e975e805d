//! Applying a schema to an instance.
use crate::{
    error::ValidationError,
    keywords::{self, value_of},
    node::SchemaNode,
    paths::LazyLocation,
};
use serde_json::Value;

/// Apply every keyword of `node` to `instance`, stopping at the first failure.
///
/// Keywords missing from the node take part with their default values. Keyword families run
/// after the independent keywords, and only when one of their members is written, as their
/// defaults accept everything.
pub(crate) fn apply<'i>(
    node: &SchemaNode<'_>,
    instance: &'i Value,
    location: &LazyLocation<'_>,
) -> Result<(), ValidationError<'i>> {
    // `{}` accepts everything and is the default of several keywords
    if node.is_empty() {
        return Ok(());
    }
    for keyword in keywords::KEYWORDS {
        if let Some(apply) = keyword.apply {
            if let Some((value, _)) = value_of(node, keyword) {
                apply(node, value, instance, location)?;
            }
        }
    }
    for group in keywords::GROUPS {
        if group.is_present(node) {
            (group.apply)(node, instance, location)?;
        }
    }
    Ok(())
}

#[inline]
pub(crate) fn is_valid(node: &SchemaNode<'_>, instance: &Value) -> bool {
    apply(node, instance, &LazyLocation::new()).is_ok()
}
