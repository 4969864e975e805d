//! Facilities for working with paths within schemas or validated instances.
use std::{fmt, sync::Arc};

/// A location segment.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LocationSegment<'a> {
    /// Property name within a JSON object.
    Property(&'a str),
    /// Index within a JSON array.
    Index(usize),
}

impl fmt::Display for LocationSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationSegment::Property(property) => f.write_str(property),
            LocationSegment::Index(idx) => f.write_str(itoa::Buffer::new().format(*idx)),
        }
    }
}

impl<'a> From<&'a str> for LocationSegment<'a> {
    #[inline]
    fn from(value: &'a str) -> LocationSegment<'a> {
        LocationSegment::Property(value)
    }
}

impl<'a> From<&'a String> for LocationSegment<'a> {
    #[inline]
    fn from(value: &'a String) -> LocationSegment<'a> {
        LocationSegment::Property(value)
    }
}

impl From<usize> for LocationSegment<'_> {
    #[inline]
    fn from(value: usize) -> Self {
        LocationSegment::Index(value)
    }
}

/// An owned location segment.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum PathChunk {
    /// Property name within a JSON object.
    Property(Box<str>),
    /// Index within a JSON array.
    Index(usize),
}

impl From<LocationSegment<'_>> for PathChunk {
    fn from(value: LocationSegment<'_>) -> Self {
        match value {
            LocationSegment::Property(property) => PathChunk::Property(property.into()),
            LocationSegment::Index(idx) => PathChunk::Index(idx),
        }
    }
}

/// A lazily constructed location within a JSON instance.
///
/// Segments live on the stack while the application engine descends into an instance and are
/// only copied into a [`Location`] when an error is reported.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LazyLocation<'a> {
    segment: LocationSegment<'a>,
    parent: Option<&'a LazyLocation<'a>>,
}

impl Default for LazyLocation<'_> {
    fn default() -> Self {
        LazyLocation::new()
    }
}

impl<'a> LazyLocation<'a> {
    /// Create the root of an instance location.
    #[must_use]
    pub const fn new() -> Self {
        LazyLocation {
            // Never read for the root node
            segment: LocationSegment::Index(0),
            parent: None,
        }
    }

    /// Push a new segment.
    #[inline]
    #[must_use]
    pub fn push<'b>(&'b self, segment: impl Into<LocationSegment<'b>>) -> LazyLocation<'b> {
        LazyLocation {
            segment: segment.into(),
            parent: Some(self),
        }
    }
}

impl From<&LazyLocation<'_>> for Location {
    fn from(value: &LazyLocation<'_>) -> Self {
        let mut chunks = Vec::new();
        let mut head = value;
        while let Some(parent) = head.parent {
            chunks.push(PathChunk::from(head.segment));
            head = parent;
        }
        chunks.reverse();
        Location(Arc::from(chunks))
    }
}

/// A cheap to clone location of a node within a schema or an instance.
///
/// Locations identify schema occurrences, so two structurally identical subschemas at different
/// positions have different locations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location(Arc<[PathChunk]>);

impl Location {
    /// Create a new, empty `Location`.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::from(Vec::new()))
    }

    pub(crate) fn join<'a>(&self, segment: impl Into<LocationSegment<'a>>) -> Self {
        let mut chunks = Vec::with_capacity(self.0.len() + 1);
        chunks.extend_from_slice(&self.0);
        chunks.push(segment.into().into());
        Self(Arc::from(chunks))
    }

    pub(crate) fn join_all<'a>(
        &self,
        segments: impl IntoIterator<Item = LocationSegment<'a>>,
    ) -> Self {
        let mut chunks = self.0.to_vec();
        chunks.extend(segments.into_iter().map(PathChunk::from));
        Self(Arc::from(chunks))
    }

    /// Segments from the root to this location.
    #[must_use]
    pub fn chunks(&self) -> &[PathChunk] {
        &self.0
    }

    /// Render as a JSON pointer, e.g. `/properties/a~1b/0`.
    #[must_use]
    pub fn to_json_pointer(&self) -> String {
        let mut buffer = String::new();
        for chunk in self.0.iter() {
            buffer.push('/');
            match chunk {
                PathChunk::Property(property) => write_escaped_str(&mut buffer, property),
                PathChunk::Index(idx) => buffer.push_str(itoa::Buffer::new().format(*idx)),
            }
        }
        buffer
    }

    /// Render as a JSONPath expression, e.g. `$['properties']['a'][0]`.
    #[must_use]
    pub fn to_json_path(&self) -> String {
        let mut buffer = String::from("$");
        for chunk in self.0.iter() {
            match chunk {
                PathChunk::Property(property) => {
                    buffer.push_str("['");
                    for ch in property.chars() {
                        if ch == '\'' || ch == '\\' {
                            buffer.push('\\');
                        }
                        buffer.push(ch);
                    }
                    buffer.push_str("']");
                }
                PathChunk::Index(idx) => {
                    buffer.push('[');
                    buffer.push_str(itoa::Buffer::new().format(*idx));
                    buffer.push(']');
                }
            }
        }
        buffer
    }
}

fn write_escaped_str(buffer: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '~' => buffer.push_str("~0"),
            '/' => buffer.push_str("~1"),
            _ => buffer.push(ch),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_pointer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_location_default() {
        let loc = Location::default();
        assert_eq!(loc.to_json_pointer(), "");
        assert_eq!(loc.to_json_path(), "$");
    }

    #[test]
    fn test_location_join_multiple() {
        let loc = Location::new().join("items").join(0);
        assert_eq!(loc.to_json_pointer(), "/items/0");
        assert_eq!(loc.to_json_path(), "$['items'][0]");
    }

    #[test]
    fn test_json_path_quotes() {
        let loc = Location::new().join("it's");
        assert_eq!(loc.to_json_path(), r"$['it\'s']");
    }

    #[test_case("tilde~character", "/tilde~0character"; "escapes tilde")]
    #[test_case("slash/character", "/slash~1character"; "escapes slash")]
    #[test_case("combo~and/slash", "/combo~0and~1slash"; "escapes tilde and slash combined")]
    fn test_location_escaping(segment: &str, expected: &str) {
        let loc = Location::new().join(segment);
        assert_eq!(loc.to_string(), expected);
    }

    #[test]
    fn test_lazy_location() {
        let root = LazyLocation::new();
        let first = root.push("a");
        let second = first.push(3);
        assert_eq!(Location::from(&second).to_json_pointer(), "/a/3");
        assert_eq!(Location::from(&root), Location::new());
    }

    #[test]
    fn test_distinct_occurrences() {
        let root = Location::new();
        assert_ne!(root.join("items").join(0), root.join("items").join(1));
        assert_eq!(root.join_all(["a".into(), 1.into()]), root.join("a").join(1));
    }
}
