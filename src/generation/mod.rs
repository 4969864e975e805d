//! Synthesis of valid and invalid instances that probe the boundaries of a schema.
//!
//! Each keyword contributes a few local instances; the items and properties families assemble
//! composite instances from the pools of their subschemas. Every instance is classified by
//! applying the schema to it, never by construction.
pub(crate) mod arrays;
pub(crate) mod cache;
pub(crate) mod objects;
pub(crate) mod template;

pub use cache::SubschemaStatistics;

use crate::{
    application,
    error::GenerationError,
    keywords::{self, helpers::keyword_location},
    node::SchemaNode,
    options::GenerationOptions,
    value::to_canonical_string,
};
use ahash::AHashSet;
use cache::GenerationCache;
use serde_json::{json, Value};
use std::{sync::Arc, time::Instant};

/// Text of the instance emitted on request that no JSON parser may accept.
pub(crate) const MALFORMED_JSON: &str = r#"{"unterminated": ["#;

/// Insertion-ordered set of instances, compared by their canonical text.
///
/// `5` and `5.0` are equal under schema equality but are both kept, since parsers may treat the
/// two spellings differently.
#[derive(Debug, Default)]
pub(crate) struct InstanceSet {
    values: Vec<Value>,
    seen: AHashSet<String>,
}

impl InstanceSet {
    pub(crate) fn new() -> InstanceSet {
        InstanceSet::default()
    }

    pub(crate) fn insert(&mut self, value: Value) -> bool {
        if self.seen.insert(to_canonical_string(&value)) {
            self.values.push(value);
            true
        } else {
            false
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl Extend<Value> for InstanceSet {
    fn extend<T: IntoIterator<Item = Value>>(&mut self, iter: T) {
        for value in iter {
            self.insert(value);
        }
    }
}

/// Instances generated for one subschema, split by their validity against it.
#[derive(Debug, Default)]
pub(crate) struct InstancePool {
    valid: Vec<Value>,
    invalid: Vec<Value>,
}

impl InstancePool {
    /// Split `instances` by applying every schema in `nodes` to them.
    pub(crate) fn classify(nodes: &[SchemaNode<'_>], instances: InstanceSet) -> InstancePool {
        let (valid, invalid): (Vec<Value>, Vec<Value>) = instances
            .into_values()
            .into_iter()
            .partition(|instance| nodes.iter().all(|node| application::is_valid(node, instance)));
        InstancePool { valid, invalid }
    }

    pub(crate) fn valid(&self) -> &[Value] {
        &self.valid
    }

    pub(crate) fn invalid(&self) -> &[Value] {
        &self.invalid
    }

    /// Instances of the requested validity, or of the other one when there are none.
    pub(crate) fn pick(&self, valid: bool) -> &[Value] {
        let (preferred, fallback) = if valid {
            (&self.valid, &self.invalid)
        } else {
            (&self.invalid, &self.valid)
        };
        if preferred.is_empty() {
            fallback
        } else {
            preferred
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    /// Valid instances first.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Value> {
        self.valid.iter().chain(self.invalid.iter())
    }
}

/// One instance of a generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedInstance {
    text: String,
    is_valid: bool,
    value: Option<Value>,
}

impl GeneratedInstance {
    fn new(value: Value, is_valid: bool) -> GeneratedInstance {
        GeneratedInstance {
            text: to_canonical_string(&value),
            is_valid,
            value: Some(value),
        }
    }

    fn malformed() -> GeneratedInstance {
        GeneratedInstance {
            text: MALFORMED_JSON.to_string(),
            is_valid: false,
            value: None,
        }
    }

    /// Canonical JSON text of the instance.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the schema accepts the instance.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// The instance as a value; `None` for the malformed JSON text.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

/// Walks a schema, memoizing the pool of every subschema it visits.
pub(crate) struct Generator<'g> {
    options: &'g GenerationOptions,
    cache: &'g mut GenerationCache,
}

impl<'g> Generator<'g> {
    pub(crate) fn new(options: &'g GenerationOptions, cache: &'g mut GenerationCache) -> Generator<'g> {
        Generator { options, cache }
    }

    pub(crate) fn options(&self) -> &GenerationOptions {
        self.options
    }

    /// Classified instances of `node`, generated on first use.
    pub(crate) fn pool(&mut self, node: &SchemaNode<'_>) -> Result<Arc<InstancePool>, GenerationError> {
        if let Some(pool) = self.cache.get(node.location()) {
            return Ok(pool);
        }
        let start = Instant::now();
        let instances = self.instances(node)?;
        let generated = instances.len();
        let pool = Arc::new(InstancePool::classify(std::slice::from_ref(node), instances));
        let duration = start.elapsed();
        tracing::trace!(
            location = %node.location(),
            generated,
            valid = pool.valid().len(),
            invalid = pool.invalid().len(),
            ?duration,
            "generated subschema instances"
        );
        self.cache.insert(node.location().clone(), Arc::clone(&pool), duration);
        Ok(pool)
    }

    /// Add the pool of `node` to `output`.
    pub(crate) fn extend_with(
        &mut self,
        node: &SchemaNode<'_>,
        output: &mut InstanceSet,
    ) -> Result<(), GenerationError> {
        let pool = self.pool(node)?;
        output.extend(pool.iter().cloned());
        Ok(())
    }

    /// Unclassified instances contributed by the keywords written on `node`.
    fn instances(&mut self, node: &SchemaNode<'_>) -> Result<InstanceSet, GenerationError> {
        let mut output = InstanceSet::new();
        if !node.is_empty() {
            for keyword in keywords::KEYWORDS {
                if let (Some(generate), Some(value)) = (keyword.generate, node.get(keyword.name)) {
                    generate(self, node, value, &mut output)?;
                }
            }
            for group in keywords::GROUPS {
                if group.is_present(node) {
                    tracing::trace!(family = group.name, location = %node.location(), "assembling composites");
                    (group.generate)(self, node, &mut output)?;
                }
            }
        }
        if output.is_empty() {
            output.extend(baseline());
        }
        Ok(output)
    }

    /// Convert a bound to `usize`, rejecting it when it exceeds `limit`.
    pub(crate) fn check_limit(
        &self,
        node: &SchemaNode<'_>,
        keyword: &'static str,
        value: u64,
        limit: usize,
    ) -> Result<usize, GenerationError> {
        match usize::try_from(value) {
            Ok(value) if value <= limit => Ok(value),
            _ => {
                let location = keyword_location(node, keyword);
                tracing::warn!(%location, value, limit, "bound exceeds the generation limit");
                Err(GenerationError::LimitExceeded {
                    keyword,
                    location,
                    value,
                    limit: limit as u64,
                })
            }
        }
    }
}

/// One value of every primitive type, used where a schema constrains nothing.
pub(crate) fn baseline() -> [Value; 7] {
    [
        Value::Null,
        Value::Bool(true),
        json!(0),
        json!(1.5),
        json!(""),
        json!([]),
        json!({}),
    ]
}

/// Run a generation pass over a whole document.
pub(crate) fn generate(
    root: &Value,
    options: &GenerationOptions,
    cache: &mut GenerationCache,
) -> Result<Vec<GeneratedInstance>, GenerationError> {
    cache.prepare(options);
    let node = SchemaNode::root(root);
    let start = Instant::now();
    let pool = Generator::new(options, cache).pool(&node)?;
    let mut instances = Vec::with_capacity(pool.len() + 1);
    if options.valid() {
        instances.extend(pool.valid().iter().cloned().map(|value| GeneratedInstance::new(value, true)));
    }
    if options.invalid() {
        instances.extend(pool.invalid().iter().cloned().map(|value| GeneratedInstance::new(value, false)));
    }
    if options.malformed_json() {
        instances.push(GeneratedInstance::malformed());
    }
    tracing::debug!(
        instances = instances.len(),
        subschemas = cache.len(),
        duration = ?start.elapsed(),
        "generation pass finished"
    );
    Ok(instances)
}
