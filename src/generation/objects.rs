//! Objects probing the properties family.
//!
//! Objects are assembled over a few candidate sets of property names; each name draws its value
//! from the pool of the schemas covering it, as a validity template says.
use super::{
    template::{RoundRobin, Slots},
    Generator, InstancePool, InstanceSet,
};
use crate::{
    error::GenerationError,
    keywords::{helpers::keyword_location, properties::PropertySchemas},
    node::SchemaNode,
    paths::{Location, LocationSegment},
    regex,
    string_set::StringSet,
};
use ahash::{AHashMap, AHashSet};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Synthetic names are tried at most this many times beyond the ones needed.
const MAX_NAME_ATTEMPTS: usize = 64;

/// Pools of the schemas covering a property name, merged when several schemas cover it.
struct Coverage<'c, 's> {
    schemas: &'c PropertySchemas<'s>,
    fallback: Location,
    pools: AHashMap<Vec<Location>, Arc<InstancePool>>,
}

impl<'c, 's> Coverage<'c, 's> {
    fn new(schemas: &'c PropertySchemas<'s>, node: &SchemaNode<'s>) -> Coverage<'c, 's> {
        Coverage {
            schemas,
            fallback: keyword_location(node, "additionalProperties"),
            pools: AHashMap::new(),
        }
    }

    /// Pool for values of `name`, with the locations of the schemas it was built from.
    fn pool(
        &mut self,
        generator: &mut Generator<'_>,
        name: &str,
    ) -> Result<(Vec<Location>, Arc<InstancePool>), GenerationError> {
        let mut nodes = self.schemas.covering(name);
        if nodes.is_empty() {
            // Any value is wrong for a forbidden name; its pool only has to be non-empty
            nodes.push(SchemaNode::empty(self.fallback.clone()));
        }
        let key: Vec<Location> = nodes.iter().map(|node| node.location().clone()).collect();
        if let Some(pool) = self.pools.get(&key) {
            return Ok((key, Arc::clone(pool)));
        }
        let pool = if let [node] = nodes.as_slice() {
            generator.pool(node)?
        } else {
            let mut instances = InstanceSet::new();
            for node in &nodes {
                generator.extend_with(node, &mut instances)?;
            }
            Arc::new(InstancePool::classify(&nodes, instances))
        };
        self.pools.insert(key.clone(), Arc::clone(&pool));
        Ok((key, pool))
    }

    fn valid_value(&mut self, generator: &mut Generator<'_>, name: &str) -> Result<Value, GenerationError> {
        let (_, pool) = self.pool(generator, name)?;
        Ok(pool.pick(true).first().cloned().unwrap_or(Value::Null))
    }
}

/// `count` names outside of `known`: `additional`, `additional1`, ...
fn fresh_names(known: &StringSet, count: usize) -> Vec<String> {
    (0..)
        .map(|idx: usize| {
            if idx == 0 {
                "additional".to_string()
            } else {
                format!("additional{idx}")
            }
        })
        .filter(|name| !known.contains(name))
        .take(count)
        .collect()
}

fn bounds(generator: &Generator<'_>, node: &SchemaNode<'_>) -> Result<(usize, Option<usize>), GenerationError> {
    let limit = generator.options().max_collection_size();
    let min = match node.get("minProperties").and_then(Value::as_u64) {
        Some(min) => generator.check_limit(node, "minProperties", min, limit)?,
        None => 0,
    };
    let max = node
        .get("maxProperties")
        .and_then(Value::as_u64)
        .map(|max| generator.check_limit(node, "maxProperties", max, limit))
        .transpose()?;
    Ok((min, max))
}

/// Sets of property names worth assembling objects over.
fn candidate_sets(
    closure: &StringSet,
    known: &StringSet,
    additional: Option<&str>,
    dependencies: Option<&Map<String, Value>>,
) -> Vec<StringSet> {
    let mut sets = vec![StringSet::empty(), closure.clone(), known.clone()];
    if let Some(name) = additional {
        sets.push(known.union(&StringSet::singleton(name)));
    }
    sets.extend(known.iter().map(StringSet::singleton));
    if let Some(dependencies) = dependencies {
        for property in dependencies.keys() {
            let seed = closure.union(&StringSet::singleton(property.as_str()));
            sets.push(StringSet::dependency_closure(&seed, dependencies));
        }
    }
    let mut seen = AHashSet::with_capacity(sets.len());
    sets.retain(|set| seen.insert(set.clone()));
    sets
}

pub(crate) fn generate<'s>(
    generator: &mut Generator<'_>,
    node: &SchemaNode<'s>,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    let (min, max) = bounds(generator, node)?;
    let schemas = PropertySchemas::of(node);
    let required = node
        .get("required")
        .and_then(Value::as_array)
        .map_or_else(StringSet::empty, |required| StringSet::from_array_of_strings(required));
    let dependencies = node.get("dependencies").and_then(Value::as_object);
    let closure = dependencies.map_or_else(
        || required.clone(),
        |dependencies| StringSet::dependency_closure(&required, dependencies),
    );
    let mut known: Vec<String> = schemas.properties().map(str::to_string).collect();
    known.extend(schemas.patterns().filter_map(regex::sample));
    if let Some(dependencies) = dependencies {
        for (property, dependency) in dependencies {
            known.push(property.clone());
            if let Value::Array(names) = dependency {
                known.extend(names.iter().filter_map(Value::as_str).map(str::to_string));
            }
        }
    }
    let known = known.into_iter().collect::<StringSet>().union(&closure);

    let needed = (min.max(max.unwrap_or(0)) + 1).saturating_sub(known.len()).max(1);
    let fresh = fresh_names(&known, needed.min(generator.options().max_collection_size() + 1));
    let unmatched = fresh_names(&known, needed + MAX_NAME_ATTEMPTS)
        .into_iter()
        .find(|name| !schemas.is_named(name));
    let additional = if schemas.forbids_additional() {
        None
    } else {
        fresh.first().map(String::as_str)
    };

    let mut coverage = Coverage::new(&schemas, node);
    let mut all_valid: AHashMap<StringSet, Map<String, Value>> = AHashMap::new();
    for names in candidate_sets(&closure, &known, additional, dependencies) {
        let mut slots = Slots::new();
        for name in &names {
            let (key, pool) = coverage.pool(generator, name)?;
            slots.push(key, || Ok(pool))?;
        }
        let mut round_robin = RoundRobin::default();
        for template in slots.templates() {
            if let Some(values) = slots.instantiate(&template, &mut round_robin) {
                let object: Map<String, Value> = names.iter().map(str::to_string).zip(values).collect();
                if template.is_all_valid() {
                    all_valid.entry(names.clone()).or_insert_with(|| object.clone());
                }
                output.insert(Value::Object(object));
            }
        }
    }

    let (Some(with_known), Some(with_closure)) = (all_valid.get(&known), all_valid.get(&closure)) else {
        return Ok(());
    };
    // Each required property missing in turn
    for property in &required {
        let mut object = with_known.clone();
        object.remove(property);
        output.insert(Value::Object(object));
    }
    // Around `minProperties`
    for target in [Some(min), min.checked_sub(1)].into_iter().flatten() {
        if with_known.len() > target {
            output.insert(Value::Object(
                with_known.iter().take(target).map(|(k, v)| (k.clone(), v.clone())).collect(),
            ));
        }
    }
    // Up to both bounds, with known names first
    let mut targets: Vec<usize> = [Some(min), min.checked_sub(1), max, max.map(|max| max + 1)]
        .into_iter()
        .flatten()
        .filter(|target| *target > with_closure.len())
        .collect();
    targets.sort_unstable();
    targets.dedup();
    if let Some(largest) = targets.last().copied() {
        let mut padded = with_closure.clone();
        let names = known
            .iter()
            .map(str::to_string)
            .chain(fresh.iter().cloned())
            .filter(|name| !with_closure.contains_key(name))
            .take(largest - with_closure.len())
            .collect::<Vec<_>>();
        for name in names {
            let value = coverage.valid_value(generator, &name)?;
            padded.insert(name, value);
            if targets.contains(&padded.len()) {
                output.insert(Value::Object(padded.clone()));
            }
        }
    }
    if schemas.forbids_additional() {
        if let Some(name) = unmatched {
            let mut object = with_known.clone();
            object.insert(name, Value::Null);
            output.insert(Value::Object(object));
        }
    }
    if let Some(dependencies) = dependencies {
        for (property, dependency) in dependencies {
            let seed = closure.union(&StringSet::singleton(property.as_str()));
            let Some(base) = all_valid.get(&StringSet::dependency_closure(&seed, dependencies)) else {
                continue;
            };
            match dependency {
                // The property present, its first dependency missing
                Value::Array(names) => {
                    if let Some(missing) = names.iter().filter_map(Value::as_str).find(|name| *name != property.as_str()) {
                        let mut object = base.clone();
                        object.remove(missing);
                        output.insert(Value::Object(object));
                    }
                }
                // The property present, merged with instances of its schema
                Value::Object(_) => {
                    let child = node.subschema(
                        dependency,
                        [LocationSegment::Property("dependencies"), LocationSegment::Property(property)],
                        false,
                    );
                    let pool = generator.pool(&child)?;
                    for instance in pool.iter() {
                        if let Value::Object(extra) = instance {
                            let mut object = base.clone();
                            for (name, value) in extra {
                                object.entry(name.clone()).or_insert_with(|| value.clone());
                            }
                            output.insert(Value::Object(object));
                        }
                    }
                }
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::fresh_names;
    use crate::{string_set::StringSet, tests_util};
    use serde_json::{json, Value};

    #[test]
    fn fresh_names_skip_known() {
        let known: StringSet = ["additional", "additional2"].into_iter().collect();
        assert_eq!(fresh_names(&known, 2), ["additional1", "additional3"]);
    }

    #[test]
    fn required_properties() {
        tests_util::assert_generates(
            &json!({"required": ["x", "y"], "properties": {}}),
            &[r#"{"x":null,"y":null}"#],
            &["{}", r#"{"y":null}"#],
        )
    }

    #[test]
    fn every_name_is_flipped() {
        tests_util::assert_generates(
            &json!({"required": ["x", "y", "z"], "additionalProperties": {"type": "integer"}}),
            &[r#"{"x":0,"y":0,"z":0}"#],
            &[
                r#"{"x":0.5,"y":0,"z":0}"#,
                r#"{"x":0,"y":0.5,"z":0}"#,
                r#"{"x":0,"y":0,"z":0.5}"#,
            ],
        )
    }

    #[test]
    fn property_values() {
        tests_util::assert_generates(
            &json!({"properties": {"a": {"type": "integer"}}}),
            &["{}", r#"{"a":0}"#],
            &[r#"{"a":0.5}"#],
        )
    }

    #[test]
    fn forbidden_additional_properties() {
        tests_util::assert_generates(
            &json!({"properties": {"a": {"type": "integer"}}, "additionalProperties": false}),
            &[r#"{"a":0}"#],
            &[r#"{"a":0,"additional":null}"#],
        )
    }

    #[test]
    fn pattern_properties() {
        tests_util::assert_generates(
            &json!({"patternProperties": {"^x-[a-z]$": {"type": "string"}}, "additionalProperties": false}),
            &[r#"{"x-a":""}"#],
            &[r#"{"x-a":null}"#],
        )
    }

    #[test]
    fn dependencies() {
        tests_util::assert_generates(
            &json!({"dependencies": {"a": ["b"]}}),
            &[r#"{"a":null,"b":null}"#, r#"{"b":null}"#],
            &[r#"{"a":null}"#],
        )
    }

    #[test]
    fn schema_dependencies() {
        tests_util::assert_generates(
            &json!({"dependencies": {"a": {"required": ["c"]}}}),
            &[],
            &[r#"{"a":null}"#],
        )
    }

    #[test]
    fn property_bounds() {
        tests_util::assert_generates(
            &json!({"minProperties": 1, "maxProperties": 2}),
            &[r#"{"additional":null}"#, r#"{"additional":null,"additional1":null}"#],
            &["{}", r#"{"additional":null,"additional1":null,"additional2":null}"#],
        )
    }

    #[test]
    fn limit_is_enforced() {
        tests_util::assert_limit_exceeded(&json!({"maxProperties": 100_000}), "maxProperties")
    }

    #[test]
    fn classification_matches_application() {
        let schema = json!({
            "properties": {"a": {"type": "string"}, "b": {"minimum": 3}},
            "patternProperties": {"^a": {"maxLength": 2}},
            "required": ["a"],
            "dependencies": {"b": ["c"]},
            "maxProperties": 3
        });
        let instances = tests_util::generate(&schema);
        assert!(instances.iter().any(|instance| instance.is_valid()));
        assert!(instances.iter().any(|instance| !instance.is_valid()));
        for instance in instances {
            let value: Value = serde_json::from_str(instance.text()).expect("Well-formed JSON");
            assert_eq!(crate::is_valid(&schema, &value), instance.is_valid(), "{}", instance.text());
        }
    }
}
