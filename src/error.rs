//! Error types
use crate::{
    diagnostics::{Diagnostic, Severity},
    paths::Location,
    primitive_type::{PrimitiveType, PrimitiveTypesBitMap},
};
use serde_json::Value;
use std::{
    borrow::Cow,
    error,
    fmt::{self, Formatter},
};

/// An instance that does not conform to a schema.
#[derive(Debug)]
pub struct ValidationError<'a> {
    /// Value of the property that failed validation.
    pub instance: Cow<'a, Value>,
    /// Type of validation error.
    pub kind: ValidationErrorKind,
    /// Path to the value that failed validation.
    pub instance_path: Location,
    /// Path to the JSON Schema keyword that failed validation.
    pub schema_path: Location,
}

/// Kinds of errors that may happen during validation
#[derive(Debug)]
#[allow(missing_docs)]
pub enum ValidationErrorKind {
    /// The input array contains more items than the tuple form of `items` allows.
    AdditionalItems { limit: usize },
    /// Unexpected properties.
    AdditionalProperties { unexpected: Vec<String> },
    /// The input value is not valid under any of the schemas listed in the 'anyOf' keyword.
    AnyOf,
    /// The regex engine gave up on a `pattern`.
    BacktrackLimitExceeded { error: fancy_regex::Error },
    /// A property that another present property depends on is missing.
    Dependency { property: String, missing: String },
    /// The input value doesn't match any of specified options.
    Enum { options: Value },
    /// Value is too large.
    ExclusiveMaximum { limit: Value },
    /// Value is too small.
    ExclusiveMinimum { limit: Value },
    /// Too many items in an array.
    MaxItems { limit: u64 },
    /// Value is too large.
    Maximum { limit: Value },
    /// String is too long.
    MaxLength { limit: u64 },
    /// Too many properties in an object.
    MaxProperties { limit: u64 },
    /// Too few items in an array.
    MinItems { limit: u64 },
    /// Value is too small.
    Minimum { limit: Value },
    /// String is too short.
    MinLength { limit: u64 },
    /// Not enough properties in an object.
    MinProperties { limit: u64 },
    /// When some number is not a multiple of another number.
    MultipleOf { multiple_of: Value },
    /// Negated schema failed validation.
    Not { schema: Value },
    /// The given schema is valid under more than one of the schemas listed in the 'oneOf' keyword.
    OneOfMultipleValid,
    /// The given schema is not valid under any of the schemas listed in the 'oneOf' keyword.
    OneOfNotValid,
    /// When the input doesn't match to a pattern.
    Pattern { pattern: String },
    /// When a required property is missing.
    Required { property: String },
    /// When the input value doesn't match one or multiple required types.
    Type { kind: TypeKind },
    /// When the input array has non-unique elements.
    UniqueItems,
}

/// The expected type(s) of a failed `type` keyword.
#[derive(Debug)]
#[allow(missing_docs)]
pub enum TypeKind {
    Single(PrimitiveType),
    Multiple(PrimitiveTypesBitMap),
}

impl<'a> ValidationError<'a> {
    /// Detach the error from the lifetime of the validated instance.
    #[must_use]
    pub fn into_owned(self) -> ValidationError<'static> {
        ValidationError {
            instance_path: self.instance_path,
            instance: Cow::Owned(self.instance.into_owned()),
            kind: self.kind,
            schema_path: self.schema_path,
        }
    }

    const fn new(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        kind: ValidationErrorKind,
    ) -> ValidationError<'a> {
        ValidationError {
            instance_path,
            instance: Cow::Borrowed(instance),
            kind,
            schema_path,
        }
    }

    pub(crate) const fn additional_items(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        limit: usize,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::AdditionalItems { limit },
        )
    }
    pub(crate) const fn additional_properties(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        unexpected: Vec<String>,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::AdditionalProperties { unexpected },
        )
    }
    pub(crate) const fn any_of(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
    ) -> ValidationError<'a> {
        Self::new(schema_path, instance_path, instance, ValidationErrorKind::AnyOf)
    }
    pub(crate) const fn backtrack_limit(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        error: fancy_regex::Error,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::BacktrackLimitExceeded { error },
        )
    }
    pub(crate) const fn dependency(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        property: String,
        missing: String,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Dependency { property, missing },
        )
    }
    pub(crate) const fn enumeration(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        options: Value,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Enum { options },
        )
    }
    pub(crate) const fn exclusive_maximum(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        limit: Value,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::ExclusiveMaximum { limit },
        )
    }
    pub(crate) const fn exclusive_minimum(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        limit: Value,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::ExclusiveMinimum { limit },
        )
    }
    pub(crate) const fn max_items(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        limit: u64,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MaxItems { limit },
        )
    }
    pub(crate) const fn maximum(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        limit: Value,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Maximum { limit },
        )
    }
    pub(crate) const fn max_length(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        limit: u64,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MaxLength { limit },
        )
    }
    pub(crate) const fn max_properties(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        limit: u64,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MaxProperties { limit },
        )
    }
    pub(crate) const fn min_items(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        limit: u64,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MinItems { limit },
        )
    }
    pub(crate) const fn minimum(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        limit: Value,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Minimum { limit },
        )
    }
    pub(crate) const fn min_length(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        limit: u64,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MinLength { limit },
        )
    }
    pub(crate) const fn min_properties(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        limit: u64,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MinProperties { limit },
        )
    }
    pub(crate) const fn multiple_of(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        multiple_of: Value,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MultipleOf { multiple_of },
        )
    }
    pub(crate) const fn not(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        schema: Value,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Not { schema },
        )
    }
    pub(crate) const fn one_of_multiple_valid(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::OneOfMultipleValid,
        )
    }
    pub(crate) const fn one_of_not_valid(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::OneOfNotValid,
        )
    }
    pub(crate) const fn pattern(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        pattern: String,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Pattern { pattern },
        )
    }
    pub(crate) const fn required(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        property: String,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Required { property },
        )
    }
    pub(crate) const fn single_type_error(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        type_name: PrimitiveType,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Type {
                kind: TypeKind::Single(type_name),
            },
        )
    }
    pub(crate) const fn multiple_type_error(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
        types: PrimitiveTypesBitMap,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Type {
                kind: TypeKind::Multiple(types),
            },
        )
    }
    pub(crate) const fn unique_items(
        schema_path: Location,
        instance_path: Location,
        instance: &'a Value,
    ) -> ValidationError<'a> {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::UniqueItems,
        )
    }
}

impl error::Error for ValidationError<'_> {}

fn plural(limit: u64, singular: &'static str, plural: &'static str) -> &'static str {
    if limit == 1 {
        singular
    } else {
        plural
    }
}

impl fmt::Display for ValidationError<'_> {
    #[allow(clippy::too_many_lines)] // The function is long but it does formatting only
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationErrorKind::BacktrackLimitExceeded { error } => error.fmt(f),
            ValidationErrorKind::AdditionalItems { limit } => {
                let extras: Vec<String> = self
                    .instance
                    .as_array()
                    .map(|items| items.iter().skip(*limit).map(ToString::to_string).collect())
                    .unwrap_or_default();
                let verb = if extras.len() == 1 { "was" } else { "were" };
                write!(
                    f,
                    "Additional items are not allowed ({} {} unexpected)",
                    extras.join(", "),
                    verb
                )
            }
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                let verb = if unexpected.len() == 1 { "was" } else { "were" };
                write!(
                    f,
                    "Additional properties are not allowed ({} {} unexpected)",
                    unexpected
                        .iter()
                        .map(|x| format!("'{x}'"))
                        .collect::<Vec<String>>()
                        .join(", "),
                    verb
                )
            }
            ValidationErrorKind::AnyOf => write!(
                f,
                "{} is not valid under any of the schemas listed in the 'anyOf' keyword",
                self.instance
            ),
            ValidationErrorKind::OneOfNotValid => write!(
                f,
                "{} is not valid under any of the schemas listed in the 'oneOf' keyword",
                self.instance
            ),
            ValidationErrorKind::OneOfMultipleValid => write!(
                f,
                "{} is valid under more than one of the schemas listed in the 'oneOf' keyword",
                self.instance
            ),
            ValidationErrorKind::Dependency { property, missing } => {
                write!(f, "'{missing}' is a dependency of '{property}'")
            }
            ValidationErrorKind::Enum { options } => {
                write!(f, "{} is not one of {}", self.instance, options)
            }
            ValidationErrorKind::ExclusiveMaximum { limit } => write!(
                f,
                "{} is greater than or equal to the maximum of {}",
                self.instance, limit
            ),
            ValidationErrorKind::ExclusiveMinimum { limit } => write!(
                f,
                "{} is less than or equal to the minimum of {}",
                self.instance, limit
            ),
            ValidationErrorKind::Maximum { limit } => write!(
                f,
                "{} is greater than the maximum of {}",
                self.instance, limit
            ),
            ValidationErrorKind::Minimum { limit } => {
                write!(f, "{} is less than the minimum of {}", self.instance, limit)
            }
            ValidationErrorKind::MaxLength { limit } => write!(
                f,
                "{} is longer than {} character{}",
                self.instance,
                limit,
                plural(*limit, "", "s")
            ),
            ValidationErrorKind::MinLength { limit } => write!(
                f,
                "{} is shorter than {} character{}",
                self.instance,
                limit,
                plural(*limit, "", "s")
            ),
            ValidationErrorKind::MaxItems { limit } => write!(
                f,
                "{} has more than {} item{}",
                self.instance,
                limit,
                plural(*limit, "", "s")
            ),
            ValidationErrorKind::MinItems { limit } => write!(
                f,
                "{} has less than {} item{}",
                self.instance,
                limit,
                plural(*limit, "", "s")
            ),
            ValidationErrorKind::MaxProperties { limit } => write!(
                f,
                "{} has more than {} propert{}",
                self.instance,
                limit,
                plural(*limit, "y", "ies")
            ),
            ValidationErrorKind::MinProperties { limit } => write!(
                f,
                "{} has less than {} propert{}",
                self.instance,
                limit,
                plural(*limit, "y", "ies")
            ),
            ValidationErrorKind::MultipleOf { multiple_of } => {
                write!(f, "{} is not a multiple of {}", self.instance, multiple_of)
            }
            ValidationErrorKind::Not { schema } => {
                write!(f, "{} is not allowed for {}", schema, self.instance)
            }
            ValidationErrorKind::Pattern { pattern } => {
                write!(f, r#"{} does not match "{}""#, self.instance, pattern)
            }
            ValidationErrorKind::Required { property } => {
                write!(f, "\"{property}\" is a required property")
            }
            ValidationErrorKind::Type {
                kind: TypeKind::Single(type_),
            } => write!(f, r#"{} is not of type "{}""#, self.instance, type_),
            ValidationErrorKind::Type {
                kind: TypeKind::Multiple(types),
            } => write!(
                f,
                "{} is not of types {}",
                self.instance,
                types
                    .into_iter()
                    .map(|t| format!(r#""{t}""#))
                    .collect::<Vec<String>>()
                    .join(", ")
            ),
            ValidationErrorKind::UniqueItems => {
                write!(f, "{} has non-unique elements", self.instance)
            }
        }
    }
}

/// A schema document that can not be used.
#[derive(Debug)]
pub enum SchemaError {
    /// The input is not JSON text.
    Parse(serde_json::Error),
    /// The document is JSON but violates the rules for schemas.
    Malformed {
        /// Every message gathered while checking the document, including non-errors.
        diagnostics: Vec<Diagnostic>,
    },
}

impl SchemaError {
    /// Diagnostics of a malformed schema, empty for parse errors.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            SchemaError::Parse(_) => &[],
            SchemaError::Malformed { diagnostics } => diagnostics,
        }
    }
}

impl error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            SchemaError::Parse(error) => Some(error),
            SchemaError::Malformed { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(error: serde_json::Error) -> Self {
        SchemaError::Parse(error)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Parse(error) => write!(f, "Invalid JSON: {error}"),
            SchemaError::Malformed { diagnostics } => {
                let errors = diagnostics
                    .iter()
                    .filter(|diagnostic| diagnostic.severity() == Severity::Error)
                    .count();
                write!(f, "Malformed schema ({errors} error")?;
                if errors != 1 {
                    f.write_str("s")?;
                }
                f.write_str(")")?;
                for diagnostic in diagnostics
                    .iter()
                    .filter(|diagnostic| diagnostic.severity() == Severity::Error)
                {
                    write!(f, "\n  {diagnostic}")?;
                }
                Ok(())
            }
        }
    }
}

/// Instance generation refused to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// A size bound in the schema is larger than the configured limit.
    LimitExceeded {
        /// Keyword carrying the bound.
        keyword: &'static str,
        /// Schema location of the keyword.
        location: Location,
        /// The bound found in the schema.
        value: u64,
        /// The configured limit.
        limit: u64,
    },
}

impl error::Error for GenerationError {}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::LimitExceeded {
                keyword,
                location,
                value,
                limit,
            } => write!(
                f,
                "'{keyword}' at '{location}' is {value}, which exceeds the generation limit of {limit}"
            ),
        }
    }
}
