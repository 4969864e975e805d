//! Structured messages produced while checking a schema document.
use crate::paths::Location;
use std::fmt;

/// How serious a [`Diagnostic`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational, e.g. an unknown keyword that is ignored.
    Info,
    /// The schema loads, but some part of it has no effect.
    Warning,
    /// The schema is malformed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// A section of a published specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecReference {
    /// Document name, e.g. `draft-fge-json-schema-validation-00`.
    pub specification: &'static str,
    /// Section number within the document.
    pub section: &'static str,
}

pub(crate) const VALIDATION_SPEC: &str = "draft-fge-json-schema-validation-00";

impl SpecReference {
    pub(crate) const fn validation(section: &'static str) -> SpecReference {
        SpecReference {
            specification: VALIDATION_SPEC,
            section,
        }
    }

    /// Documentation URI for the referenced section.
    #[must_use]
    pub fn uri(&self) -> String {
        format!(
            "https://tools.ietf.org/html/{}#section-{}",
            self.specification, self.section
        )
    }
}

/// A message about a schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    location: Option<Location>,
    message: String,
    reference: Option<SpecReference>,
    children: Vec<Diagnostic>,
}

impl Diagnostic {
    pub(crate) fn new(
        severity: Severity,
        location: Option<Location>,
        message: impl Into<String>,
        reference: Option<SpecReference>,
    ) -> Diagnostic {
        Diagnostic {
            severity,
            location,
            message: message.into(),
            reference,
            children: Vec::new(),
        }
    }

    pub(crate) fn with_children(mut self, children: Vec<Diagnostic>) -> Diagnostic {
        self.children = children;
        self
    }

    /// Severity of this message.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// JSONPath of the offending node, or `(unknown node)` when the node was synthesized from a
    /// keyword default.
    #[must_use]
    pub fn location(&self) -> String {
        self.location
            .as_ref()
            .map_or_else(|| "(unknown node)".to_string(), Location::to_json_path)
    }

    /// Human readable text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Specification section that defines the violated rule.
    #[must_use]
    pub const fn reference(&self) -> Option<&SpecReference> {
        self.reference.as_ref()
    }

    /// Messages from subschemas that explain this one.
    #[must_use]
    pub fn children(&self) -> &[Diagnostic] {
        &self.children
    }

    /// Whether this message or any nested one is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error || self.children.iter().any(Diagnostic::is_error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.location(), self.message)?;
        if let Some(reference) = &self.reference {
            write!(f, " (see {})", reference.uri())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_location() {
        let diagnostic = Diagnostic::new(Severity::Warning, None, "ignored", None);
        assert_eq!(diagnostic.location(), "(unknown node)");
        assert_eq!(diagnostic.to_string(), "warning: (unknown node): ignored");
    }

    #[test]
    fn located_with_reference() {
        let diagnostic = Diagnostic::new(
            Severity::Error,
            Some(Location::new().join("properties").join("a")),
            "must be an object",
            Some(SpecReference::validation("5.4.4")),
        );
        assert_eq!(diagnostic.location(), "$['properties']['a']");
        assert_eq!(
            diagnostic.reference().map(SpecReference::uri).as_deref(),
            Some("https://tools.ietf.org/html/draft-fge-json-schema-validation-00#section-5.4.4")
        );
    }

    #[test]
    fn nested_errors() {
        let child = Diagnostic::new(Severity::Error, None, "bad", None);
        let parent = Diagnostic::new(Severity::Info, None, "wrapper", None).with_children(vec![child]);
        assert!(parent.is_error());
        assert_eq!(parent.children().len(), 1);
    }
}
