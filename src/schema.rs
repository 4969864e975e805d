use crate::{
    application,
    diagnostics::Diagnostic,
    error::{GenerationError, SchemaError, ValidationError},
    generation::{self, cache::GenerationCache, GeneratedInstance, SubschemaStatistics},
    node::SchemaNode,
    options::GenerationOptions,
    paths::LazyLocation,
    validation::validate_schema,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::io::Read;

/// A well-formed schema, ready for validation and instance generation.
///
/// Generated instances are memoized per subschema, so repeated generation passes are cheap. The
/// memo table is guarded by a mutex held for a whole pass; concurrent passes over one schema run
/// one after another.
#[derive(Debug)]
pub struct Schema {
    root: Value,
    diagnostics: Vec<Diagnostic>,
    cache: Mutex<GenerationCache>,
}

impl Schema {
    /// Check `schema` and wrap it.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Malformed`] with every diagnostic if any keyword is malformed.
    pub fn new(schema: Value) -> Result<Schema, SchemaError> {
        let (valid, diagnostics) = validate_schema(&schema);
        if !valid {
            tracing::debug!(
                diagnostics = diagnostics.len(),
                "schema is malformed"
            );
            return Err(SchemaError::Malformed { diagnostics });
        }
        tracing::debug!(
            keywords = schema.as_object().map_or(0, serde_json::Map::len),
            diagnostics = diagnostics.len(),
            "schema loaded"
        );
        Ok(Schema {
            root: schema,
            diagnostics,
            cache: Mutex::new(GenerationCache::default()),
        })
    }

    /// Parse JSON text and check it as a schema.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Parse`] for text that is not JSON, otherwise as [`Schema::new`].
    pub fn from_slice(bytes: &[u8]) -> Result<Schema, SchemaError> {
        Schema::new(crate::parse_json(bytes)?)
    }

    /// Read JSON text from `reader` and check it as a schema.
    ///
    /// # Errors
    ///
    /// As [`Schema::from_slice`]; I/O failures are reported as [`SchemaError::Parse`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Schema, SchemaError> {
        Schema::new(serde_json::from_reader(reader)?)
    }

    /// The schema document.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Warnings and informational messages collected while checking the schema.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn node(&self) -> SchemaNode<'_> {
        SchemaNode::root(&self.root)
    }

    /// Apply the schema to `instance`.
    ///
    /// # Errors
    ///
    /// The first failed constraint.
    pub fn validate<'i>(&self, instance: &'i Value) -> Result<(), ValidationError<'i>> {
        application::apply(&self.node(), instance, &LazyLocation::new())
    }

    /// Whether the schema accepts `instance`.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        application::is_valid(&self.node(), instance)
    }

    /// Generate instances with the default options.
    ///
    /// # Errors
    ///
    /// [`GenerationError::LimitExceeded`] if a bound of the schema exceeds a default limit.
    pub fn generate(&self) -> Result<Vec<GeneratedInstance>, GenerationError> {
        self.generate_with(&GenerationOptions::default())
    }

    /// Generate instances: valid ones first, then invalid ones, then the malformed text if
    /// requested.
    ///
    /// # Errors
    ///
    /// [`GenerationError::LimitExceeded`] if a bound of the schema exceeds a limit in `options`.
    pub fn generate_with(
        &self,
        options: &GenerationOptions,
    ) -> Result<Vec<GeneratedInstance>, GenerationError> {
        let mut cache = self.cache.lock();
        generation::generate(&self.root, options, &mut cache)
    }

    /// Figures for every subschema generated so far.
    #[must_use]
    pub fn statistics(&self) -> Vec<SubschemaStatistics> {
        self.cache.lock().statistics()
    }

    /// Forget every generated instance.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::Schema;
    use crate::{diagnostics::Severity, error::SchemaError};
    use serde_json::json;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn is_send_sync() {
        assert_send_sync::<Schema>();
    }

    #[test]
    fn malformed() {
        let error = Schema::new(json!({"minLength": -1, "required": []})).expect_err("Malformed");
        let SchemaError::Malformed { diagnostics } = &error else {
            panic!("Unexpected error: {error}");
        };
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|diagnostic| diagnostic.severity() == Severity::Error));
    }

    #[test]
    fn not_json() {
        let error = Schema::from_slice(b"{").expect_err("Not JSON");
        assert!(matches!(error, SchemaError::Parse(_)));
    }

    #[test]
    fn from_reader() {
        let schema = Schema::from_reader(&br#"{"type": "string"}"#[..]).expect("Valid schema");
        assert!(schema.is_valid(&json!("a")));
        assert!(!schema.is_valid(&json!(1)));
    }

    #[test]
    fn warnings_are_kept() {
        let schema = Schema::new(json!({"format": "email", "x-vendor": 1})).expect("Valid schema");
        let severities: Vec<_> = schema.diagnostics().iter().map(|d| d.severity()).collect();
        assert_eq!(severities, [Severity::Warning, Severity::Info]);
    }

    #[test]
    fn cache_is_reused() {
        let schema = Schema::new(json!({"items": {"type": "integer"}})).expect("Valid schema");
        let first = schema.generate().expect("Within limits");
        let second = schema.generate().expect("Within limits");
        assert_eq!(first, second);
        let statistics = schema.statistics();
        let root = statistics.iter().find(|entry| entry.id == "#").expect("Root is cached");
        assert_eq!(root.hits, 1);
        let items = statistics.iter().find(|entry| entry.id == "#/items").expect("Items are cached");
        assert!(items.hits >= 1);
        schema.clear_cache();
        assert!(schema.statistics().is_empty());
    }
}
