//! The items family: `items`, `additionalItems`, `maxItems`, `minItems` and `uniqueItems`.
use crate::{
    application,
    error::ValidationError,
    keywords::{
        helpers::{expect_boolean, expect_non_negative_integer, expect_schema_array, is_unique, keyword_location},
        value_named,
    },
    node::SchemaNode,
    paths::{LazyLocation, Location, LocationSegment},
    validation::KeywordContext,
};
use serde_json::Value;

pub(crate) fn validate_items<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    match value {
        Value::Object(_) => {
            ctx.validate_subschema(value, &[]);
        }
        Value::Array(_) => {
            expect_schema_array(ctx, value);
        }
        _ => ctx.error(format!("must be a schema or an array of schemas, found {value}")),
    }
}

pub(crate) fn validate_additional_items<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    match value {
        Value::Bool(_) => {}
        Value::Object(_) => {
            ctx.validate_subschema(value, &[]);
        }
        _ => ctx.error(format!("must be a boolean or a schema, found {value}")),
    }
}

/// `maxItems` and `minItems`.
pub(crate) fn validate_count<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    expect_non_negative_integer(ctx, value);
}

pub(crate) fn validate_unique_items<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    expect_boolean(ctx, value);
}

/// How `items` describes the elements.
pub(crate) enum Items<'s> {
    /// Every element shares one schema.
    Single(SchemaNode<'s>),
    /// One schema per leading position.
    Tuple(Vec<SchemaNode<'s>>),
}

/// Schema for the elements past a tuple.
pub(crate) enum Additional<'s> {
    Schema(SchemaNode<'s>),
    Forbidden,
}

/// The element schemas of an array, by position.
pub(crate) struct ItemSchemas<'s> {
    pub(crate) items: Items<'s>,
    pub(crate) additional: Additional<'s>,
    additional_location: Location,
}

impl<'s> ItemSchemas<'s> {
    pub(crate) fn of(node: &SchemaNode<'s>) -> ItemSchemas<'s> {
        let items = match value_named(node, "items") {
            Some((Value::Array(schemas), _)) => Items::Tuple(
                schemas
                    .iter()
                    .enumerate()
                    .map(|(idx, schema)| {
                        node.subschema(
                            schema,
                            [LocationSegment::Property("items"), LocationSegment::Index(idx)],
                            false,
                        )
                    })
                    .collect(),
            ),
            Some((schema, defaulted)) => Items::Single(node.subschema(
                schema,
                [LocationSegment::Property("items")],
                defaulted,
            )),
            None => Items::Single(SchemaNode::empty(keyword_location(node, "items"))),
        };
        let additional = match value_named(node, "additionalItems") {
            Some((Value::Bool(false), _)) => Additional::Forbidden,
            Some((schema, defaulted)) if schema.is_object() => Additional::Schema(node.subschema(
                schema,
                [LocationSegment::Property("additionalItems")],
                defaulted,
            )),
            _ => Additional::Schema(SchemaNode::empty(keyword_location(node, "additionalItems"))),
        };
        ItemSchemas {
            items,
            additional,
            additional_location: keyword_location(node, "additionalItems"),
        }
    }

    /// Number of positional schemas, if `items` is an array.
    pub(crate) fn tuple_len(&self) -> Option<usize> {
        match &self.items {
            Items::Tuple(schemas) => Some(schemas.len()),
            Items::Single(_) => None,
        }
    }

    /// The longest valid array, when `additionalItems` is `false` after a tuple.
    pub(crate) fn max_len(&self) -> Option<usize> {
        match self.additional {
            Additional::Forbidden => self.tuple_len(),
            Additional::Schema(_) => None,
        }
    }

    /// Schema for the element at `idx`, `None` where no element is allowed.
    pub(crate) fn at(&self, idx: usize) -> Option<&SchemaNode<'s>> {
        match &self.items {
            Items::Single(schema) => Some(schema),
            Items::Tuple(schemas) => schemas.get(idx).or(match &self.additional {
                Additional::Schema(schema) => Some(schema),
                Additional::Forbidden => None,
            }),
        }
    }

    /// Like [`ItemSchemas::at`], standing in the empty schema for forbidden positions.
    pub(crate) fn at_or_empty(&self, idx: usize) -> SchemaNode<'s> {
        self.at(idx)
            .cloned()
            .unwrap_or_else(|| SchemaNode::empty(self.additional_location.clone()))
    }
}

/// Length constraints first, then every element against its positional schema.
pub(crate) fn apply<'s, 'i>(
    node: &SchemaNode<'s>,
    instance: &'i Value,
    location: &LazyLocation<'_>,
) -> Result<(), ValidationError<'i>> {
    let Value::Array(items) = instance else {
        return Ok(());
    };
    let schemas = ItemSchemas::of(node);
    if let Some(limit) = schemas.max_len() {
        if items.len() > limit {
            return Err(ValidationError::additional_items(
                keyword_location(node, "additionalItems"),
                location.into(),
                instance,
                limit,
            ));
        }
    }
    if let Some(limit) = node.get("maxItems").and_then(Value::as_u64) {
        if (items.len() as u64) > limit {
            return Err(ValidationError::max_items(
                keyword_location(node, "maxItems"),
                location.into(),
                instance,
                limit,
            ));
        }
    }
    if let Some(limit) = node.get("minItems").and_then(Value::as_u64) {
        if (items.len() as u64) < limit {
            return Err(ValidationError::min_items(
                keyword_location(node, "minItems"),
                location.into(),
                instance,
                limit,
            ));
        }
    }
    if node.get("uniqueItems") == Some(&Value::Bool(true)) && !is_unique(items) {
        return Err(ValidationError::unique_items(
            keyword_location(node, "uniqueItems"),
            location.into(),
            instance,
        ));
    }
    for (idx, item) in items.iter().enumerate() {
        if let Some(schema) = schemas.at(idx) {
            application::apply(schema, item, &location.push(idx))?;
        }
    }
    Ok(())
}
