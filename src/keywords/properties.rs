//! The properties family: `properties`, `patternProperties`, `additionalProperties`,
//! `required`, `dependencies`, `maxProperties` and `minProperties`.
use crate::{
    application,
    error::ValidationError,
    keywords::{
        helpers::{expect_non_negative_integer, expect_object, expect_unique_strings, keyword_location},
        value_named,
    },
    node::SchemaNode,
    paths::{LazyLocation, LocationSegment},
    regex,
    validation::KeywordContext,
};
use serde_json::{Map, Value};

/// `maxProperties` and `minProperties`.
pub(crate) fn validate_count<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    expect_non_negative_integer(ctx, value);
}

pub(crate) fn validate_required<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    expect_unique_strings(ctx, value, &[]);
}

pub(crate) fn validate_additional_properties<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    match value {
        Value::Bool(_) => {}
        Value::Object(_) => {
            ctx.validate_subschema(value, &[]);
        }
        _ => ctx.error(format!("must be a boolean or a schema, found {value}")),
    }
}

pub(crate) fn validate_properties<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    if let Some(properties) = expect_object(ctx, value) {
        for (name, schema) in properties {
            ctx.validate_subschema(schema, &[LocationSegment::Property(name)]);
        }
    }
}

pub(crate) fn validate_pattern_properties<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    if let Some(patterns) = expect_object(ctx, value) {
        for (pattern, schema) in patterns {
            if let Err(message) = regex::compile(pattern) {
                ctx.error_at(
                    &[LocationSegment::Property(pattern)],
                    format!("has an invalid regular expression: {message}"),
                );
            }
            ctx.validate_subschema(schema, &[LocationSegment::Property(pattern)]);
        }
    }
}

/// Each dependency is either a list of property names or a schema.
pub(crate) fn validate_dependencies<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    if let Some(dependencies) = expect_object(ctx, value) {
        for (name, dependency) in dependencies {
            let segments = [LocationSegment::Property(name)];
            match dependency {
                Value::Array(_) => {
                    expect_unique_strings(ctx, dependency, &segments);
                }
                Value::Object(_) => {
                    ctx.validate_subschema(dependency, &segments);
                }
                _ => ctx.error_at(
                    &segments,
                    format!("must be an array of strings or a schema, found {dependency}"),
                ),
            }
        }
    }
}

/// The schemas that property values are checked against, by property name.
pub(crate) struct PropertySchemas<'s> {
    node: SchemaNode<'s>,
    properties: Option<&'s Map<String, Value>>,
    properties_defaulted: bool,
    patterns: Option<&'s Map<String, Value>>,
    patterns_defaulted: bool,
    additional: Option<SchemaNode<'s>>,
}

impl<'s> PropertySchemas<'s> {
    pub(crate) fn of(node: &SchemaNode<'s>) -> PropertySchemas<'s> {
        let (properties, properties_defaulted) = match value_named(node, "properties") {
            Some((value, defaulted)) => (value.as_object(), defaulted),
            None => (None, true),
        };
        let (patterns, patterns_defaulted) = match value_named(node, "patternProperties") {
            Some((value, defaulted)) => (value.as_object(), defaulted),
            None => (None, true),
        };
        let additional = match value_named(node, "additionalProperties") {
            Some((schema, defaulted)) if schema.is_object() => Some(node.subschema(
                schema,
                [LocationSegment::Property("additionalProperties")],
                defaulted,
            )),
            Some((Value::Bool(false), _)) => None,
            _ => Some(SchemaNode::empty(keyword_location(node, "additionalProperties"))),
        };
        PropertySchemas {
            node: node.clone(),
            properties,
            properties_defaulted,
            patterns,
            patterns_defaulted,
            additional,
        }
    }

    pub(crate) fn properties(&self) -> impl Iterator<Item = &'s str> {
        self.properties
            .into_iter()
            .flat_map(|properties| properties.keys().map(String::as_str))
    }

    pub(crate) fn patterns(&self) -> impl Iterator<Item = &'s str> {
        self.patterns
            .into_iter()
            .flat_map(|patterns| patterns.keys().map(String::as_str))
    }

    /// Whether `additionalProperties` is `false`.
    pub(crate) fn forbids_additional(&self) -> bool {
        self.additional.is_none()
    }

    /// Whether `name` is matched by `properties` or `patternProperties`.
    pub(crate) fn is_named(&self, name: &str) -> bool {
        self.properties
            .map_or(false, |properties| properties.contains_key(name))
            || self.patterns().any(|pattern| matches(pattern, name))
    }

    /// Every schema a value under `name` must satisfy.
    ///
    /// Empty when the name is not allowed at all.
    pub(crate) fn covering(&self, name: &str) -> Vec<SchemaNode<'s>> {
        let mut nodes = Vec::new();
        if let Some(schema) = self.properties.and_then(|properties| properties.get(name)) {
            nodes.push(self.node.subschema(
                schema,
                [LocationSegment::Property("properties"), LocationSegment::Property(name)],
                self.properties_defaulted,
            ));
        }
        if let Some(patterns) = self.patterns {
            for (pattern, schema) in patterns {
                if matches(pattern, name) {
                    nodes.push(self.node.subschema(
                        schema,
                        [
                            LocationSegment::Property("patternProperties"),
                            LocationSegment::Property(pattern),
                        ],
                        self.patterns_defaulted,
                    ));
                }
            }
        }
        if nodes.is_empty() {
            if let Some(additional) = &self.additional {
                nodes.push(additional.clone());
            }
        }
        nodes
    }
}

fn matches(pattern: &str, name: &str) -> bool {
    matches!(regex::is_match(pattern, name), Ok(true))
}

/// Counts, `required`, list dependencies and coverage first, then every value against the schemas
/// covering its name, then schema dependencies against the whole object.
pub(crate) fn apply<'s, 'i>(
    node: &SchemaNode<'s>,
    instance: &'i Value,
    location: &LazyLocation<'_>,
) -> Result<(), ValidationError<'i>> {
    let Value::Object(object) = instance else {
        return Ok(());
    };
    if let Some(limit) = node.get("maxProperties").and_then(Value::as_u64) {
        if (object.len() as u64) > limit {
            return Err(ValidationError::max_properties(
                keyword_location(node, "maxProperties"),
                location.into(),
                instance,
                limit,
            ));
        }
    }
    if let Some(limit) = node.get("minProperties").and_then(Value::as_u64) {
        if (object.len() as u64) < limit {
            return Err(ValidationError::min_properties(
                keyword_location(node, "minProperties"),
                location.into(),
                instance,
                limit,
            ));
        }
    }
    if let Some(Value::Array(required)) = node.get("required") {
        for property in required.iter().filter_map(Value::as_str) {
            if !object.contains_key(property) {
                return Err(ValidationError::required(
                    keyword_location(node, "required"),
                    location.into(),
                    instance,
                    property.to_string(),
                ));
            }
        }
    }
    let dependencies = node.get("dependencies").and_then(Value::as_object);
    if let Some(dependencies) = dependencies {
        for (property, dependency) in dependencies {
            if let (true, Value::Array(missing)) = (object.contains_key(property), dependency) {
                let missing = missing
                    .iter()
                    .filter_map(Value::as_str)
                    .find(|name| !object.contains_key(*name));
                if let Some(missing) = missing {
                    return Err(ValidationError::dependency(
                        node.location()
                            .join_all([LocationSegment::Property("dependencies"), LocationSegment::Property(property)]),
                        location.into(),
                        instance,
                        property.clone(),
                        missing.to_string(),
                    ));
                }
            }
        }
    }
    let schemas = PropertySchemas::of(node);
    let mut covered = Vec::with_capacity(object.len());
    let mut unexpected = Vec::new();
    for (name, value) in object {
        let nodes = schemas.covering(name);
        if nodes.is_empty() {
            unexpected.push(name.clone());
        } else {
            covered.push((name, value, nodes));
        }
    }
    if !unexpected.is_empty() {
        return Err(ValidationError::additional_properties(
            keyword_location(node, "additionalProperties"),
            location.into(),
            instance,
            unexpected,
        ));
    }
    for (name, value, nodes) in covered {
        let location = location.push(name);
        for child in &nodes {
            application::apply(child, value, &location)?;
        }
    }
    if let Some(dependencies) = dependencies {
        for (property, dependency) in dependencies {
            if dependency.is_object() && object.contains_key(property) {
                let child = node.subschema(
                    dependency,
                    [LocationSegment::Property("dependencies"), LocationSegment::Property(property)],
                    false,
                );
                application::apply(&child, instance, location)?;
            }
        }
    }
    Ok(())
}
