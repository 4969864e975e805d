use jsonschema_testgen::{equal, hash_value, GeneratedInstance, Schema, StringSet};
use serde_json::{json, Value};
use test_case::test_case;

fn load(schema: &Value) -> Schema {
    Schema::new(schema.clone()).expect("Valid schema")
}

fn generate(schema: &Value) -> Vec<GeneratedInstance> {
    load(schema).generate().expect("Within limits")
}

fn texts(instances: &[GeneratedInstance], valid: bool) -> Vec<&str> {
    instances
        .iter()
        .filter(|instance| instance.is_valid() == valid)
        .map(GeneratedInstance::text)
        .collect()
}

#[test_case(&json!(null))]
#[test_case(&json!(1.5))]
#[test_case(&json!(18_446_744_073_709_551_615_u64))]
#[test_case(&json!("text"))]
#[test_case(&json!([1, [2, {"a": null}]]))]
#[test_case(&json!({"b": 1, "a": {"c": []}}))]
fn equality_is_reflexive_and_hash_is_stable(value: &Value) {
    assert!(equal(value, value));
    assert_eq!(hash_value(value), hash_value(value));
    assert_eq!(hash_value(value), hash_value(&value.clone()));
}

#[test_case(&json!({}); "empty")]
#[test_case(&json!({"type": ["string", "null"], "maxLength": 2}); "type and length")]
#[test_case(&json!({"multipleOf": 0.25, "minimum": -1, "exclusiveMinimum": true}); "float bounds")]
#[test_case(&json!({"enum": [1, "a", [null], {"k": true}]}); "enumeration")]
#[test_case(&json!({"pattern": "^x[0-9]+$", "minLength": 3}); "pattern")]
#[test_case(&json!({"oneOf": [{"type": "integer"}, {"maximum": 0}]}); "one of")]
#[test_case(&json!({"not": {"enum": [0]}}); "negation")]
#[test_case(&json!({
    "type": "array",
    "items": [{"type": "integer"}, {"type": "string"}],
    "additionalItems": {"type": "boolean"},
    "maxItems": 4,
    "uniqueItems": true
}); "tuple")]
#[test_case(&json!({
    "type": "object",
    "properties": {"id": {"type": "integer", "minimum": 1}, "tags": {"items": {"type": "string"}}},
    "patternProperties": {"^x-": {"type": "string"}},
    "additionalProperties": false,
    "required": ["id"],
    "dependencies": {"tags": ["id"], "x-a": {"maxProperties": 2}}
}); "object")]
fn classification_is_reproduced_by_application(schema: &Value) {
    let loaded = load(schema);
    let instances = loaded.generate().expect("Within limits");
    assert!(!instances.is_empty());
    for instance in &instances {
        let parsed: Value = serde_json::from_str(instance.text())
            .unwrap_or_else(|error| panic!("{} is not JSON: {error}", instance.text()));
        assert!(equal(instance.value().expect("Well-formed"), &parsed));
        assert_eq!(
            loaded.is_valid(&parsed),
            instance.is_valid(),
            "{} is misclassified for {schema}",
            instance.text()
        );
        assert_eq!(loaded.validate(&parsed).is_ok(), instance.is_valid());
    }
}

#[test]
fn generation_is_deterministic() {
    let schema = json!({"properties": {"a": {"type": "integer"}}, "required": ["a"]});
    assert_eq!(generate(&schema), generate(&schema));
}

#[test]
fn multiple_of() {
    let schema = json!({"multipleOf": 5});
    assert!(jsonschema_testgen::is_valid(&schema, &json!(10)));
    assert!(!jsonschema_testgen::is_valid(&schema, &json!(6)));
    let instances = generate(&schema);
    let valid = texts(&instances, true);
    for expected in ["0", "5", "10"] {
        assert!(valid.contains(&expected), "{expected} is missing from {valid:?}");
    }
    assert!(texts(&instances, false).contains(&"6"));
}

#[test]
fn maximum() {
    let schema = json!({"maximum": 5});
    assert!(jsonschema_testgen::is_valid(&schema, &json!(5)));
    assert!(!jsonschema_testgen::is_valid(&schema, &json!(6)));
    let schema = json!({"maximum": 5, "exclusiveMaximum": true});
    assert!(!jsonschema_testgen::is_valid(&schema, &json!(5)));
    assert!(jsonschema_testgen::is_valid(&schema, &json!(4)));
}

#[test_case(&json!([1, 2, 3]), true)]
#[test_case(&json!([1, 2, 3, 4]), false)]
#[test_case(&json!([]), true)]
fn tuple_without_additional_items(instance: &Value, expected: bool) {
    let schema = json!({"items": [{}, {}, {}], "additionalItems": false});
    assert_eq!(jsonschema_testgen::is_valid(&schema, instance), expected);
}

#[test]
fn union_of_equal_singletons() {
    let set = StringSet::singleton("a").union(&StringSet::singleton("a"));
    assert_eq!(set.len(), 1);
    assert!(set.contains("a"));
}

#[test]
fn required_properties() {
    let instances = generate(&json!({"required": ["x", "y"], "properties": {}}));
    let objects = |valid: bool| {
        instances
            .iter()
            .filter(move |instance| instance.is_valid() == valid)
            .filter_map(|instance| instance.value().and_then(Value::as_object))
    };
    assert!(objects(false).any(|object| !object.contains_key("x")));
    assert!(objects(true).any(|object| object.contains_key("x") && object.contains_key("y")));
}

#[test]
fn generated_text_is_json() {
    let schema = load(&json!({"items": {"type": ["object", "string"]}, "minItems": 1}));
    let mut options = jsonschema_testgen::options();
    options.with_malformed_json();
    let instances = schema.generate_with(&options).expect("Within limits");
    let (sentinel, rest) = instances.split_last().expect("Not empty");
    assert!(!sentinel.is_valid());
    assert!(sentinel.value().is_none());
    assert!(serde_json::from_str::<Value>(sentinel.text()).is_err());
    for instance in rest {
        assert!(serde_json::from_str::<Value>(instance.text()).is_ok());
    }
}
