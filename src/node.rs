use crate::paths::{Location, LocationSegment};
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};

pub(crate) static EMPTY_SCHEMA: Lazy<Value> = Lazy::new(|| json!({}));

/// A schema object together with its location in the loaded document.
///
/// Nodes borrow from the document, so constructing one around a subschema is cheap. A node is
/// synthetic when it stands for a keyword default rather than for text in the document.
#[derive(Debug, Clone)]
pub(crate) struct SchemaNode<'s> {
    keywords: &'s Map<String, Value>,
    location: Location,
    synthetic: bool,
}

impl<'s> SchemaNode<'s> {
    /// The root node of a document.
    ///
    /// # Panics
    ///
    /// If `schema` is not an object.
    pub(crate) fn root(schema: &'s Value) -> SchemaNode<'s> {
        SchemaNode::new(schema, Location::new(), false)
    }

    pub(crate) fn new(schema: &'s Value, location: Location, synthetic: bool) -> SchemaNode<'s> {
        let keywords = schema
            .as_object()
            .unwrap_or_else(|| panic!("schema at '{location}' is not an object: {schema}"));
        SchemaNode {
            keywords,
            location,
            synthetic,
        }
    }

    /// The empty schema, located at `location`.
    pub(crate) fn empty(location: Location) -> SchemaNode<'static> {
        SchemaNode::new(&EMPTY_SCHEMA, location, true)
    }

    /// A node for the subschema found under `segments` of this node.
    ///
    /// A node built from a default value is synthetic along with all its descendants.
    pub(crate) fn subschema<'a>(
        &self,
        schema: &'s Value,
        segments: impl IntoIterator<Item = LocationSegment<'a>>,
        synthetic: bool,
    ) -> SchemaNode<'s> {
        SchemaNode::new(
            schema,
            self.location.join_all(segments),
            self.synthetic || synthetic,
        )
    }

    /// Value of a keyword present in the document.
    #[inline]
    pub(crate) fn get(&self, keyword: &str) -> Option<&'s Value> {
        self.keywords.get(keyword)
    }

    pub(crate) fn keywords(&self) -> &'s Map<String, Value> {
        self.keywords
    }

    /// `true` for `{}`, which accepts everything and has no subschemas.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub(crate) fn location(&self) -> &Location {
        &self.location
    }

    pub(crate) fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}
