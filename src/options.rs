/// Default upper bound for `maxLength` and `minLength` during generation.
pub const DEFAULT_MAX_STRING_LENGTH: usize = 65_536;
/// Default upper bound for item and property counts during generation.
pub const DEFAULT_MAX_COLLECTION_SIZE: usize = 1_024;

/// Configuration of a generation pass.
///
/// # Examples
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use serde_json::json;
/// use jsonschema_testgen::Schema;
///
/// let schema = Schema::new(json!({"type": "boolean"}))?;
/// let mut options = jsonschema_testgen::options();
/// options.without_invalid();
/// for instance in schema.generate_with(&options)? {
///     assert!(instance.is_valid());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    valid: bool,
    invalid: bool,
    malformed_json: bool,
    max_string_length: usize,
    max_collection_size: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationOptions {
            valid: true,
            invalid: true,
            malformed_json: false,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            max_collection_size: DEFAULT_MAX_COLLECTION_SIZE,
        }
    }
}

impl GenerationOptions {
    /// Leave out instances the schema accepts.
    pub fn without_valid(&mut self) -> &mut Self {
        self.valid = false;
        self
    }
    /// Leave out instances the schema rejects.
    pub fn without_invalid(&mut self) -> &mut Self {
        self.invalid = false;
        self
    }
    /// Append one text that is not well-formed JSON, flagged as invalid.
    pub fn with_malformed_json(&mut self) -> &mut Self {
        self.malformed_json = true;
        self
    }
    /// Reject schemas whose string length bounds exceed `limit`.
    pub fn with_max_string_length(&mut self, limit: usize) -> &mut Self {
        self.max_string_length = limit;
        self
    }
    /// Reject schemas whose item or property count bounds exceed `limit`.
    pub fn with_max_collection_size(&mut self, limit: usize) -> &mut Self {
        self.max_collection_size = limit;
        self
    }

    pub(crate) const fn valid(&self) -> bool {
        self.valid
    }
    pub(crate) const fn invalid(&self) -> bool {
        self.invalid
    }
    pub(crate) const fn malformed_json(&self) -> bool {
        self.malformed_json
    }
    #[must_use]
    pub const fn max_string_length(&self) -> usize {
        self.max_string_length
    }
    #[must_use]
    pub const fn max_collection_size(&self) -> usize {
        self.max_collection_size
    }
}
