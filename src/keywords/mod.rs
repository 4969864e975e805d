//! The keyword table: schema checks, instance application and instance generation per keyword.
pub(crate) mod all_of;
pub(crate) mod any_of;
pub(crate) mod enum_;
pub(crate) mod helpers;
pub(crate) mod items;
pub(crate) mod max_length;
pub(crate) mod maximum;
pub(crate) mod metadata;
pub(crate) mod min_length;
pub(crate) mod minimum;
pub(crate) mod multiple_of;
pub(crate) mod not;
pub(crate) mod one_of;
pub(crate) mod pattern;
pub(crate) mod properties;
pub(crate) mod type_;
pub(crate) mod unsupported;

use crate::{
    diagnostics::SpecReference,
    error::{GenerationError, ValidationError},
    generation::{arrays, objects, Generator, InstanceSet},
    node::SchemaNode,
    paths::LazyLocation,
    validation::KeywordContext,
};
use serde_json::Value;

/// Checks the value of a keyword inside a schema document.
pub(crate) type ValidateFn = for<'a, 's> fn(&mut KeywordContext<'a, 's>, &'s Value);
/// Applies a keyword value to an instance.
pub(crate) type ApplyFn = for<'s, 'i, 'l> fn(
    &SchemaNode<'s>,
    &'s Value,
    &'i Value,
    &LazyLocation<'l>,
) -> Result<(), ValidationError<'i>>;
/// Adds instances probing a keyword to the set.
pub(crate) type GenerateFn = for<'g, 's> fn(
    &mut Generator<'g>,
    &SchemaNode<'s>,
    &'s Value,
    &mut InstanceSet,
) -> Result<(), GenerationError>;
/// Applies a whole keyword family to an instance.
pub(crate) type GroupApplyFn = for<'s, 'i, 'l> fn(
    &SchemaNode<'s>,
    &'i Value,
    &LazyLocation<'l>,
) -> Result<(), ValidationError<'i>>;
/// Adds instances probing a whole keyword family to the set.
pub(crate) type GroupGenerateFn =
    for<'g, 's> fn(&mut Generator<'g>, &SchemaNode<'s>, &mut InstanceSet) -> Result<(), GenerationError>;

/// Static description of one keyword.
pub(crate) struct Keyword {
    pub(crate) name: &'static str,
    /// Value the keyword behaves as having when it is absent.
    pub(crate) default: Option<fn() -> &'static Value>,
    pub(crate) reference: Option<SpecReference>,
    pub(crate) validate: Option<ValidateFn>,
    pub(crate) apply: Option<ApplyFn>,
    pub(crate) generate: Option<GenerateFn>,
}

impl Keyword {
    const fn new(name: &'static str) -> Keyword {
        Keyword {
            name,
            default: None,
            reference: None,
            validate: None,
            apply: None,
            generate: None,
        }
    }
    const fn section(mut self, section: &'static str) -> Keyword {
        self.reference = Some(SpecReference::validation(section));
        self
    }
    const fn default(mut self, default: fn() -> &'static Value) -> Keyword {
        self.default = Some(default);
        self
    }
    const fn validate(mut self, validate: ValidateFn) -> Keyword {
        self.validate = Some(validate);
        self
    }
    const fn apply(mut self, apply: ApplyFn) -> Keyword {
        self.apply = Some(apply);
        self
    }
    const fn generate(mut self, generate: GenerateFn) -> Keyword {
        self.generate = Some(generate);
        self
    }
}

/// Keywords whose effects are only meaningful together.
pub(crate) struct KeywordGroup {
    pub(crate) name: &'static str,
    pub(crate) keywords: &'static [Keyword],
    pub(crate) apply: GroupApplyFn,
    pub(crate) generate: GroupGenerateFn,
}

impl KeywordGroup {
    /// Whether any member keyword is written in the schema.
    pub(crate) fn is_present(&self, node: &SchemaNode<'_>) -> bool {
        self.keywords
            .iter()
            .any(|keyword| node.get(keyword.name).is_some())
    }
}

/// Keywords that are checked, applied and generated one at a time.
pub(crate) static KEYWORDS: &[Keyword] = &[
    Keyword::new("multipleOf")
        .section("5.1.1")
        .validate(multiple_of::validate)
        .apply(multiple_of::apply)
        .generate(multiple_of::generate),
    Keyword::new("maximum")
        .section("5.1.2")
        .validate(maximum::validate)
        .apply(maximum::apply)
        .generate(maximum::generate),
    Keyword::new("exclusiveMaximum")
        .section("5.1.2")
        .default(helpers::falsy)
        .validate(maximum::validate_exclusive),
    Keyword::new("minimum")
        .section("5.1.3")
        .validate(minimum::validate)
        .apply(minimum::apply)
        .generate(minimum::generate),
    Keyword::new("exclusiveMinimum")
        .section("5.1.3")
        .default(helpers::falsy)
        .validate(minimum::validate_exclusive),
    Keyword::new("maxLength")
        .section("5.2.1")
        .validate(max_length::validate)
        .apply(max_length::apply)
        .generate(max_length::generate),
    Keyword::new("minLength")
        .section("5.2.2")
        .default(helpers::zero)
        .validate(min_length::validate)
        .apply(min_length::apply)
        .generate(min_length::generate),
    Keyword::new("pattern")
        .section("5.2.3")
        .validate(pattern::validate)
        .apply(pattern::apply)
        .generate(pattern::generate),
    Keyword::new("enum")
        .section("5.5.1")
        .validate(enum_::validate)
        .apply(enum_::apply)
        .generate(enum_::generate),
    Keyword::new("type")
        .section("5.5.2")
        .validate(type_::validate)
        .apply(type_::apply)
        .generate(type_::generate),
    Keyword::new("allOf")
        .section("5.5.3")
        .validate(all_of::validate)
        .apply(all_of::apply)
        .generate(all_of::generate),
    Keyword::new("anyOf")
        .section("5.5.4")
        .validate(any_of::validate)
        .apply(any_of::apply)
        .generate(any_of::generate),
    Keyword::new("oneOf")
        .section("5.5.5")
        .validate(one_of::validate)
        .apply(one_of::apply)
        .generate(one_of::generate),
    Keyword::new("not")
        .section("5.5.6")
        .validate(not::validate)
        .apply(not::apply)
        .generate(not::generate),
    Keyword::new("definitions")
        .section("5.5.7")
        .validate(metadata::validate_definitions),
    Keyword::new("title")
        .section("6.1")
        .validate(metadata::validate_text),
    Keyword::new("description")
        .section("6.1")
        .validate(metadata::validate_text),
    Keyword::new("default")
        .section("6.2")
        .generate(metadata::generate_default),
    Keyword::new("format")
        .section("7")
        .validate(unsupported::validate),
    Keyword::new("$ref").validate(unsupported::validate),
    Keyword::new("$schema").validate(metadata::validate_dialect),
    Keyword::new("id").validate(metadata::validate_id),
];

const ITEMS: &[Keyword] = &[
    Keyword::new("additionalItems")
        .section("5.3.1")
        .default(helpers::empty_schema)
        .validate(items::validate_additional_items),
    Keyword::new("items")
        .section("5.3.1")
        .default(helpers::empty_schema)
        .validate(items::validate_items),
    Keyword::new("maxItems")
        .section("5.3.2")
        .validate(items::validate_count),
    Keyword::new("minItems")
        .section("5.3.3")
        .default(helpers::zero)
        .validate(items::validate_count),
    Keyword::new("uniqueItems")
        .section("5.3.4")
        .default(helpers::falsy)
        .validate(items::validate_unique_items),
];

const PROPERTIES: &[Keyword] = &[
    Keyword::new("maxProperties")
        .section("5.4.1")
        .validate(properties::validate_count),
    Keyword::new("minProperties")
        .section("5.4.2")
        .default(helpers::zero)
        .validate(properties::validate_count),
    Keyword::new("required")
        .section("5.4.3")
        .validate(properties::validate_required),
    Keyword::new("additionalProperties")
        .section("5.4.4")
        .default(helpers::empty_schema)
        .validate(properties::validate_additional_properties),
    Keyword::new("properties")
        .section("5.4.4")
        .default(helpers::empty_schema)
        .validate(properties::validate_properties),
    Keyword::new("patternProperties")
        .section("5.4.4")
        .default(helpers::empty_schema)
        .validate(properties::validate_pattern_properties),
    Keyword::new("dependencies")
        .section("5.4.5")
        .validate(properties::validate_dependencies),
];

/// Keyword families that are applied and generated jointly.
pub(crate) static GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        name: "items",
        keywords: ITEMS,
        apply: items::apply,
        generate: arrays::generate,
    },
    KeywordGroup {
        name: "properties",
        keywords: PROPERTIES,
        apply: properties::apply,
        generate: objects::generate,
    },
];

/// Every known keyword, independent ones first.
pub(crate) fn all() -> impl Iterator<Item = &'static Keyword> {
    KEYWORDS
        .iter()
        .chain(GROUPS.iter().flat_map(|group| group.keywords.iter()))
}

/// Look up a keyword by name.
pub(crate) fn lookup(name: &str) -> Option<&'static Keyword> {
    all().find(|keyword| keyword.name == name)
}

/// The value a keyword has on `node`, and whether it was taken from the keyword default.
pub(crate) fn value_of<'s>(
    node: &SchemaNode<'s>,
    keyword: &Keyword,
) -> Option<(&'s Value, bool)> {
    match node.get(keyword.name) {
        Some(value) => Some((value, false)),
        None => keyword.default.map(|default| (default(), true)),
    }
}

/// Like [`value_of`], for a keyword known by name.
pub(crate) fn value_named<'s>(node: &SchemaNode<'s>, name: &str) -> Option<(&'s Value, bool)> {
    lookup(name).and_then(|keyword| value_of(node, keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashSet;

    #[test]
    fn names_are_unique() {
        let mut seen = AHashSet::new();
        for keyword in all() {
            assert!(seen.insert(keyword.name), "{} registered twice", keyword.name);
        }
    }

    #[test]
    fn defaults() {
        for (name, expected) in [
            ("items", "{}"),
            ("additionalItems", "{}"),
            ("minItems", "0"),
            ("uniqueItems", "false"),
            ("properties", "{}"),
            ("patternProperties", "{}"),
            ("additionalProperties", "{}"),
            ("minProperties", "0"),
            ("exclusiveMaximum", "false"),
            ("exclusiveMinimum", "false"),
            ("minLength", "0"),
        ] {
            let keyword = lookup(name).expect("Registered keyword");
            let default = keyword.default.expect("Has a default");
            assert_eq!(default().to_string(), expected, "{name}");
        }
        assert!(lookup("maxItems").expect("Registered keyword").default.is_none());
        assert!(lookup("unknown").is_none());
    }
}
