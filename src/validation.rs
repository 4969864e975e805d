//! Checks that a schema document is itself a well-formed draft 4 schema.
use crate::{
    diagnostics::{Diagnostic, Severity},
    keywords::{self, Keyword},
    node::SchemaNode,
    paths::{Location, LocationSegment},
};
use serde_json::Value;
use std::iter::once;

/// State handed to a keyword's schema check.
pub(crate) struct KeywordContext<'a, 's> {
    node: &'a SchemaNode<'s>,
    keyword: &'static Keyword,
    defaulted: bool,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a, 's> KeywordContext<'a, 's> {
    /// Location of the keyword value, unknown for synthesized nodes and defaults.
    fn location(&self, segments: &[LocationSegment<'_>]) -> Option<Location> {
        if self.defaulted || self.node.is_synthetic() {
            None
        } else {
            Some(self.node.location().join_all(
                once(LocationSegment::Property(self.keyword.name)).chain(segments.iter().copied()),
            ))
        }
    }

    fn report(&mut self, severity: Severity, segments: &[LocationSegment<'_>], message: String) {
        let reference = if severity == Severity::Info {
            None
        } else {
            self.keyword.reference
        };
        let message = format!("'{}' {}", self.keyword.name, message);
        let diagnostic = Diagnostic::new(severity, self.location(segments), message, reference);
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.report(Severity::Error, &[], message.into());
    }

    pub(crate) fn error_at(&mut self, segments: &[LocationSegment<'_>], message: impl Into<String>) {
        self.report(Severity::Error, segments, message.into());
    }

    pub(crate) fn warning(&mut self, message: impl Into<String>) {
        self.report(Severity::Warning, &[], message.into());
    }

    pub(crate) fn info(&mut self, message: impl Into<String>) {
        self.report(Severity::Info, &[], message.into());
    }

    /// A keyword present next to the one being checked.
    pub(crate) fn sibling(&self, name: &str) -> Option<&'s Value> {
        self.node.get(name)
    }

    /// Whether the checked value was synthesized from the keyword default.
    pub(crate) fn is_defaulted(&self) -> bool {
        self.defaulted
    }

    /// Check a nested schema found under `segments` of the keyword value.
    ///
    /// Errors in the subschema are reported as one error whose children explain it.
    pub(crate) fn validate_subschema(
        &mut self,
        schema: &'s Value,
        segments: &[LocationSegment<'_>],
    ) -> bool {
        match schema {
            // `{}` is the default of several keywords and must not be descended into
            Value::Object(object) if object.is_empty() => true,
            Value::Object(_) => {
                let child = self.node.subschema(
                    schema,
                    once(LocationSegment::Property(self.keyword.name)).chain(segments.iter().copied()),
                    self.defaulted,
                );
                let mut nested = Vec::new();
                if validate_node(&child, &mut nested) {
                    self.diagnostics.extend(nested);
                    true
                } else {
                    let diagnostic = Diagnostic::new(
                        Severity::Error,
                        self.location(segments),
                        format!("'{}' contains an invalid subschema", self.keyword.name),
                        self.keyword.reference,
                    )
                    .with_children(nested);
                    self.diagnostics.push(diagnostic);
                    false
                }
            }
            _ => {
                self.error_at(segments, format!("must be a schema object, found {schema}"));
                false
            }
        }
    }
}

/// Run every keyword check on `node`, appending messages to `diagnostics`.
pub(crate) fn validate_node(node: &SchemaNode<'_>, diagnostics: &mut Vec<Diagnostic>) -> bool {
    if node.is_empty() {
        return true;
    }
    let start = diagnostics.len();
    for keyword in keywords::all() {
        let Some((value, defaulted)) = keywords::value_of(node, keyword) else {
            continue;
        };
        if let Some(validate) = keyword.validate {
            let mut ctx = KeywordContext {
                node,
                keyword,
                defaulted,
                diagnostics: &mut *diagnostics,
            };
            validate(&mut ctx, value);
        }
    }
    for name in node.keywords().keys() {
        if keywords::lookup(name).is_none() {
            let location = if node.is_synthetic() {
                None
            } else {
                Some(node.location().join(name))
            };
            diagnostics.push(Diagnostic::new(
                Severity::Info,
                location,
                format!("unknown keyword '{name}' is ignored"),
                None,
            ));
        }
    }
    !diagnostics[start..].iter().any(Diagnostic::is_error)
}

/// Check a whole document. Messages are returned even when the schema is valid.
pub(crate) fn validate_schema(schema: &Value) -> (bool, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    if !schema.is_object() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            Some(Location::new()),
            format!("a schema must be an object, found {schema}"),
            None,
        ));
        return (false, diagnostics);
    }
    let valid = validate_node(&SchemaNode::root(schema), &mut diagnostics);
    (valid, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::validate_schema;
    use crate::diagnostics::{Diagnostic, Severity};
    use serde_json::{json, Value};
    use test_case::test_case;

    fn errors(schema: &Value) -> Vec<Diagnostic> {
        let (valid, diagnostics) = validate_schema(schema);
        let errors: Vec<_> = diagnostics
            .into_iter()
            .filter(|diagnostic| diagnostic.severity() == Severity::Error)
            .collect();
        assert_eq!(valid, errors.is_empty());
        errors
    }

    #[test_case(&json!({}))]
    #[test_case(&json!({"maximum": 5, "exclusiveMaximum": true}))]
    #[test_case(&json!({"items": [{}, {"type": "string"}], "additionalItems": false}))]
    #[test_case(&json!({"properties": {"a": {"minLength": 1}}, "required": ["a"]}))]
    #[test_case(&json!({"dependencies": {"a": ["b"], "c": {"required": ["d"]}}}))]
    #[test_case(&json!({"patternProperties": {"^x-": {}}}))]
    #[test_case(&json!({"definitions": {"a": {"type": "integer"}}}))]
    #[test_case(&json!({"type": ["string", "null"], "enum": ["a", null]}))]
    fn well_formed(schema: &Value) {
        assert_eq!(errors(schema), vec![])
    }

    #[test_case(&json!([]), "$"; "non-object document")]
    #[test_case(&json!({"exclusiveMaximum": true}), "$['exclusiveMaximum']"; "exclusive maximum without maximum")]
    #[test_case(&json!({"minimum": "1"}), "$['minimum']"; "string minimum")]
    #[test_case(&json!({"multipleOf": 0}), "$['multipleOf']"; "zero multiple")]
    #[test_case(&json!({"maxLength": -1}), "$['maxLength']"; "negative max length")]
    #[test_case(&json!({"maxItems": 1.5}), "$['maxItems']"; "fractional max items")]
    #[test_case(&json!({"pattern": "(abc"}), "$['pattern']"; "unbalanced pattern")]
    #[test_case(&json!({"enum": []}), "$['enum']"; "empty enum")]
    #[test_case(&json!({"enum": [1, 1.0]}), "$['enum']"; "duplicate enum")]
    #[test_case(&json!({"required": ["a", "a"]}), "$['required']"; "duplicate required")]
    #[test_case(&json!({"required": ["a", 1]}), "$['required'][1]"; "non-string required")]
    #[test_case(&json!({"type": "text"}), "$['type']"; "unknown type")]
    #[test_case(&json!({"allOf": []}), "$['allOf']"; "empty all of")]
    #[test_case(&json!({"not": true}), "$['not']"; "boolean not")]
    #[test_case(&json!({"uniqueItems": "yes"}), "$['uniqueItems']"; "string unique items")]
    #[test_case(&json!({"patternProperties": {"(": {}}}), "$['patternProperties']['(']"; "invalid pattern property")]
    #[test_case(&json!({"dependencies": {"a": []}}), "$['dependencies']['a']"; "empty dependency")]
    fn malformed(schema: &Value, location: &str) {
        let errors = errors(schema);
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert_eq!(errors[0].location(), location);
    }

    #[test]
    fn nested_errors_are_children() {
        let schema = json!({"properties": {"a": {"items": {"minItems": "x"}}}});
        let errors = errors(&schema);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location(), "$['properties']['a']");
        let nested = &errors[0].children()[0];
        assert_eq!(nested.location(), "$['properties']['a']['items']");
        assert_eq!(nested.children()[0].location(), "$['properties']['a']['items']['minItems']");
    }

    #[test]
    fn unknown_keywords_are_informational() {
        let (valid, diagnostics) = validate_schema(&json!({"foo": 1}));
        assert!(valid);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity(), Severity::Info);
        assert_eq!(diagnostics[0].location(), "$['foo']");
    }

    #[test]
    fn empty_type_array_warns() {
        let (valid, diagnostics) = validate_schema(&json!({"type": []}));
        assert!(valid);
        assert_eq!(diagnostics[0].severity(), Severity::Warning);
    }

    #[test]
    fn unimplemented_keywords_warn() {
        let (valid, diagnostics) = validate_schema(&json!({"$ref": "#/definitions/a", "format": "email"}));
        assert!(valid);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|diagnostic| diagnostic.severity() == Severity::Warning));
    }
}
