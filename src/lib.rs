//! JSON Schema (draft 4) validation and generation of boundary-probing test instances.
//!
//! - Checks that a schema document is itself well-formed, with structured diagnostics
//! - Applies a schema to instances
//! - Generates a compact family of valid and invalid instances for testing JSON consumers
//!
//! # Validation
//!
//! For one-off checks use [`is_valid`]:
//!
//! ```rust
//! use serde_json::json;
//!
//! let schema = json!({"maxLength": 5});
//! assert!(jsonschema_testgen::is_valid(&schema, &json!("foo")));
//! assert!(!jsonschema_testgen::is_valid(&schema, &json!("foobar")));
//! ```
//!
//! Load a [`Schema`] once to reuse it and to get the first failure:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use serde_json::json;
//!
//! let schema = jsonschema_testgen::Schema::new(json!({"required": ["id"]}))?;
//! let instance = json!({"name": "x"});
//! if let Err(error) = schema.validate(&instance) {
//!     assert_eq!(error.to_string(), "\"id\" is a required property");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Malformed schemas
//!
//! Loading reports every problem found in the document:
//!
//! ```rust
//! use jsonschema_testgen::SchemaError;
//!
//! let error = jsonschema_testgen::load(br#"{"minimum": "5", "enum": []}"#).unwrap_err();
//! if let SchemaError::Malformed { diagnostics } = error {
//!     for diagnostic in &diagnostics {
//!         println!("{diagnostic}");
//!     }
//! }
//! ```
//!
//! # Generation
//!
//! Each generated instance carries its canonical JSON text and whether the schema accepts it:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use serde_json::json;
//!
//! let schema = jsonschema_testgen::Schema::new(json!({"type": "integer", "maximum": 5}))?;
//! for instance in schema.generate()? {
//!     println!("{} {}", if instance.is_valid() { "valid  " } else { "invalid" }, instance.text());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Instances of every subschema are memoized inside the [`Schema`]; [`Schema::statistics`]
//! reports how often each was reused.
//!
//! # Unsupported keywords
//!
//! `$ref` and `format` are accepted with a warning and have no effect.
mod application;
pub mod diagnostics;
mod ecma;
pub mod error;
mod generation;
mod keywords;
mod node;
mod options;
pub mod paths;
pub mod primitive_type;
mod regex;
mod schema;
pub mod string_set;
mod validation;
pub mod value;

pub use diagnostics::{Diagnostic, Severity, SpecReference};
pub use error::{GenerationError, SchemaError, ValidationError, ValidationErrorKind};
pub use generation::{GeneratedInstance, SubschemaStatistics};
pub use options::GenerationOptions;
pub use primitive_type::PrimitiveType;
pub use schema::Schema;
pub use string_set::StringSet;
pub use value::{
    compare_numbers, equal, hash_value, number_to_canonical_string, to_canonical_string, HashedValue,
};

use serde_json::Value;

/// Parse JSON text.
///
/// # Errors
///
/// If `bytes` are not a JSON document.
pub fn parse_json(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Parse JSON text and check it as a schema.
///
/// # Errors
///
/// [`SchemaError::Parse`] for text that is not JSON, [`SchemaError::Malformed`] for a schema
/// with malformed keywords.
pub fn load(bytes: &[u8]) -> Result<Schema, SchemaError> {
    Schema::from_slice(bytes)
}

/// A shortcut for validating `instance` against `schema`.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
///
/// let schema = json!({"type": "array", "uniqueItems": true});
/// assert!(jsonschema_testgen::is_valid(&schema, &json!([1, 2])));
/// assert!(!jsonschema_testgen::is_valid(&schema, &json!([1, 1.0])));
/// ```
///
/// # Panics
///
/// This function panics if a malformed schema is passed.
#[must_use]
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    let (valid, diagnostics) = validation::validate_schema(schema);
    assert!(valid, "Invalid schema: {diagnostics:?}");
    application::is_valid(&node::SchemaNode::root(schema), instance)
}

/// Create a builder for generation options.
#[must_use]
pub fn options() -> GenerationOptions {
    GenerationOptions::default()
}

#[cfg(test)]
pub(crate) mod tests_util {
    use crate::{
        error::{GenerationError, ValidationError},
        generation::GeneratedInstance,
        Schema,
    };
    use serde_json::Value;

    fn load(schema: &Value) -> Schema {
        Schema::new(schema.clone()).unwrap_or_else(|error| panic!("{schema} should be a valid schema: {error}"))
    }

    pub(crate) fn is_valid(schema: &Value, instance: &Value) {
        let schema = load(schema);
        if let Err(error) = schema.validate(instance) {
            panic!(
                "{} should be valid (via validate). Error: {} at {}",
                instance, error, error.instance_path
            );
        }
        assert!(schema.is_valid(instance), "{instance} should be valid (via is_valid)");
    }

    pub(crate) fn is_not_valid(schema: &Value, instance: &Value) {
        let schema = load(schema);
        assert!(
            schema.validate(instance).is_err(),
            "{instance} should not be valid (via validate)"
        );
        assert!(!schema.is_valid(instance), "{instance} should not be valid (via is_valid)");
    }

    /// The failure reported for `instance`.
    pub(crate) fn expect_errors(schema: &Value, instance: &Value) -> Vec<ValidationError<'static>> {
        let error = load(schema)
            .validate(instance)
            .expect_err("Should be an error")
            .into_owned();
        vec![error]
    }

    pub(crate) fn assert_schema_location(schema: &Value, instance: &Value, expected: &str) {
        let errors = expect_errors(schema, instance);
        assert_eq!(errors[0].schema_path.to_string(), expected)
    }

    pub(crate) fn generate(schema: &Value) -> Vec<GeneratedInstance> {
        load(schema).generate().expect("Should be within limits")
    }

    /// Every text in `valid` is generated as valid and every text in `invalid` as invalid.
    pub(crate) fn assert_generates(schema: &Value, valid: &[&str], invalid: &[&str]) {
        let instances = generate(schema);
        let texts = |flag: bool| {
            instances
                .iter()
                .filter(|instance| instance.is_valid() == flag)
                .map(GeneratedInstance::text)
                .collect::<Vec<_>>()
        };
        let (generated_valid, generated_invalid) = (texts(true), texts(false));
        for text in valid {
            assert!(
                generated_valid.contains(text),
                "{text} should be generated as valid for {schema}; valid: {generated_valid:?}, invalid: {generated_invalid:?}"
            );
        }
        for text in invalid {
            assert!(
                generated_invalid.contains(text),
                "{text} should be generated as invalid for {schema}; valid: {generated_valid:?}, invalid: {generated_invalid:?}"
            );
        }
    }

    pub(crate) fn assert_limit_exceeded(schema: &Value, keyword: &str) {
        match load(schema).generate() {
            Err(GenerationError::LimitExceeded { keyword: reported, .. }) => assert_eq!(reported, keyword),
            Ok(_) => panic!("{schema} should exceed a generation limit"),
        }
    }
}
