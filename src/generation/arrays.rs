//! Arrays probing the items family.
use super::{
    template::{RoundRobin, Slots},
    Generator, InstanceSet,
};
use crate::{error::GenerationError, keywords::items::ItemSchemas, node::SchemaNode};
use serde_json::Value;
use std::collections::BTreeSet;

/// Lengths worth probing: both sides of every bound, plus the short ones.
fn candidate_lengths(min: usize, max: Option<usize>, tuple: Option<usize>) -> BTreeSet<usize> {
    let mut lengths = BTreeSet::from([0, 1, min, min + 1]);
    lengths.extend(min.checked_sub(1));
    for bound in [max, tuple].into_iter().flatten() {
        lengths.insert(bound);
        lengths.insert(bound + 1);
    }
    lengths
}

/// Count keywords as `usize`, once they are known to fit the collection limit.
fn bounds(generator: &Generator<'_>, node: &SchemaNode<'_>) -> Result<(usize, Option<usize>), GenerationError> {
    let limit = generator.options().max_collection_size();
    let min = match node.get("minItems").and_then(Value::as_u64) {
        Some(min) => generator.check_limit(node, "minItems", min, limit)?,
        None => 0,
    };
    let max = node
        .get("maxItems")
        .and_then(Value::as_u64)
        .map(|max| generator.check_limit(node, "maxItems", max, limit))
        .transpose()?;
    Ok((min, max))
}

/// A valid element for position `idx`, or any element when the position has none.
fn element(
    generator: &mut Generator<'_>,
    schemas: &ItemSchemas<'_>,
    idx: usize,
) -> Result<Option<Value>, GenerationError> {
    let pool = generator.pool(&schemas.at_or_empty(idx))?;
    Ok(pool.pick(true).first().cloned())
}

pub(crate) fn generate<'s>(
    generator: &mut Generator<'_>,
    node: &SchemaNode<'s>,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    let (min, max) = bounds(generator, node)?;
    let schemas = ItemSchemas::of(node);
    let mut all_valid: Vec<Vec<Value>> = Vec::new();
    for length in candidate_lengths(min, max, schemas.tuple_len()) {
        let mut slots = Slots::new();
        for idx in 0..length {
            let child = schemas.at_or_empty(idx);
            slots.push(child.location().clone(), || generator.pool(&child))?;
        }
        let mut round_robin = RoundRobin::default();
        for template in slots.templates() {
            if let Some(items) = slots.instantiate(&template, &mut round_robin) {
                if template.is_all_valid() {
                    all_valid.push(items.clone());
                }
                output.insert(Value::Array(items));
            }
        }
    }
    let Some(longest) = all_valid.iter().max_by_key(|items| items.len()).cloned() else {
        return Ok(());
    };
    // Around `minItems`
    for target in [Some(min), min.checked_sub(1)].into_iter().flatten() {
        if longest.len() > target {
            output.insert(Value::Array(longest[..target].to_vec()));
        }
    }
    // Around `maxItems`, repeating the first valid element of each position
    if let Some(max) = max {
        let mut padded = Vec::with_capacity(max + 1);
        while padded.len() <= max {
            match element(generator, &schemas, padded.len())? {
                Some(item) => padded.push(item),
                None => break,
            }
            if padded.len() >= max {
                output.insert(Value::Array(padded.clone()));
            }
        }
    }
    if node.get("uniqueItems") == Some(&Value::Bool(true)) {
        if let Some(last) = longest.last() {
            let mut duplicated = longest.clone();
            duplicated.push(last.clone());
            output.insert(Value::Array(duplicated));
        }
    }
    if let Some(allowed) = schemas.max_len() {
        if let Some(full) = all_valid.iter().find(|items| items.len() == allowed) {
            let mut extended = full.clone();
            extended.push(Value::Null);
            output.insert(Value::Array(extended));
        }
    }
    Ok(())
}
