//! Schema-defined equality, hashing, ordering and canonical text for JSON values.
use ahash::RandomState;
use num_cmp::NumCmp;
use once_cell::sync::Lazy;
use serde_json::{Map, Number, Value};
use std::{
    cmp::Ordering,
    hash::{BuildHasher, Hash, Hasher},
};

// Fixed seeds keep hashes stable across calls and processes.
static HASH_STATE: Lazy<RandomState> = Lazy::new(|| {
    RandomState::with_seeds(
        0x243f_6a88_85a3_08d3,
        0x1319_8a2e_0370_7344,
        0xa409_3822_299f_31d0,
        0x082e_fa98_ec4e_6c89,
    )
});

pub(crate) fn hasher() -> impl Hasher {
    HASH_STATE.build_hasher()
}

macro_rules! num_cmp {
    ($left:expr, $right:expr) => {
        if let Some(b) = $right.as_u64() {
            NumCmp::num_eq($left, b)
        } else if let Some(b) = $right.as_i64() {
            NumCmp::num_eq($left, b)
        } else {
            NumCmp::num_eq($left, $right.as_f64().expect("Always valid"))
        }
    };
}

macro_rules! num_ord {
    ($left:expr, $right:expr) => {
        if let Some(b) = $right.as_u64() {
            NumCmp::num_cmp($left, b)
        } else if let Some(b) = $right.as_i64() {
            NumCmp::num_cmp($left, b)
        } else {
            NumCmp::num_cmp($left, $right.as_f64().expect("Always valid"))
        }
    };
}

/// Schema equality: numbers compare by value across integer and floating point forms, object
/// member order is irrelevant.
#[inline]
#[must_use]
pub fn equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::Null, Value::Null) => true,
        (Value::Number(left), Value::Number(right)) => equal_numbers(left, right),
        (Value::Array(left), Value::Array(right)) => equal_arrays(left, right),
        (Value::Object(left), Value::Object(right)) => equal_objects(left, right),
        (_, _) => false,
    }
}

#[inline]
fn equal_numbers(left: &Number, right: &Number) -> bool {
    if let Some(a) = left.as_u64() {
        num_cmp!(a, right)
    } else if let Some(a) = left.as_i64() {
        num_cmp!(a, right)
    } else {
        let a = left.as_f64().expect("Always valid");
        num_cmp!(a, right)
    }
}

#[inline]
pub(crate) fn equal_arrays(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(a, b)| equal(a, b))
}

#[inline]
pub(crate) fn equal_objects(left: &Map<String, Value>, right: &Map<String, Value>) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|(key, value)| right.get(key).map_or(false, |other| equal(value, other)))
}

/// Total order over two JSON numbers.
///
/// Integer pairs never go through floating point.
///
/// # Panics
///
/// If either value is not a number.
#[must_use]
pub fn compare_numbers(left: &Value, right: &Value) -> Ordering {
    let (Value::Number(left), Value::Number(right)) = (left, right) else {
        panic!("compare_numbers called with a non-numeric value: {left} / {right}");
    };
    let ordering = if let Some(a) = left.as_u64() {
        num_ord!(a, right)
    } else if let Some(a) = left.as_i64() {
        num_ord!(a, right)
    } else {
        let a = left.as_f64().expect("Always valid");
        num_ord!(a, right)
    };
    // Non-finite numbers can not be represented by `serde_json`
    ordering.unwrap_or(Ordering::Equal)
}

/// A value wrapper whose `Hash` and `Eq` follow schema equality.
#[derive(Debug, Clone, Copy)]
pub struct HashedValue<'a>(pub &'a Value);

impl PartialEq for HashedValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        equal(self.0, other.0)
    }
}

impl Eq for HashedValue<'_> {}

impl Hash for HashedValue<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.0 {
            Value::Null => state.write_u32(3_221_225_473), // chosen randomly
            Value::Bool(ref item) => item.hash(state),
            Value::Number(ref item) => hash_number(item, state),
            Value::String(ref item) => item.hash(state),
            Value::Array(ref items) => {
                state.write_usize(items.len());
                for item in items {
                    HashedValue(item).hash(state);
                }
            }
            Value::Object(ref items) => {
                // Order independent
                let mut hash = 0;
                for (key, value) in items {
                    let mut item_hasher = hasher();
                    key.hash(&mut item_hasher);
                    HashedValue(value).hash(&mut item_hasher);
                    hash ^= item_hasher.finish();
                }
                state.write_u64(hash);
            }
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn hash_number<H: Hasher>(number: &Number, state: &mut H) {
    if let Some(value) = number.as_i64() {
        value.hash(state);
    } else if let Some(value) = number.as_u64() {
        value.hash(state);
    } else {
        let value = number.as_f64().expect("Always valid");
        // Integral floats must hash like the integer they are equal to
        if value.fract() == 0. && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            (value as i64).hash(state);
        } else if value.fract() == 0. && value >= 0. && value < u64::MAX as f64 {
            (value as u64).hash(state);
        } else {
            value.to_bits().hash(state);
        }
    }
}

/// Stable hash of `value`, consistent with [`equal`].
#[must_use]
pub fn hash_value(value: &Value) -> u64 {
    let mut state = hasher();
    HashedValue(value).hash(&mut state);
    state.finish()
}

/// Locale independent text for a number.
///
/// Floating point numbers always carry a decimal point, so re-parsing the text never yields an
/// integer.
///
/// # Panics
///
/// If `value` is not a number.
#[must_use]
pub fn number_to_canonical_string(value: &Value) -> String {
    let Value::Number(number) = value else {
        panic!("number_to_canonical_string called with a non-numeric value: {value}");
    };
    if let Some(value) = number.as_u64() {
        itoa::Buffer::new().format(value).to_string()
    } else if let Some(value) = number.as_i64() {
        itoa::Buffer::new().format(value).to_string()
    } else {
        let text = number.to_string();
        if text.contains('.') {
            text
        } else if let Some(exponent) = text.find(['e', 'E']) {
            format!("{}.0{}", &text[..exponent], &text[exponent..])
        } else {
            format!("{text}.0")
        }
    }
}

/// Compact JSON text for `value` with canonical numbers.
#[must_use]
pub fn to_canonical_string(value: &Value) -> String {
    let mut buffer = String::new();
    write_canonical(&mut buffer, value);
    buffer
}

fn write_canonical(buffer: &mut String, value: &Value) {
    match value {
        Value::Null => buffer.push_str("null"),
        Value::Bool(true) => buffer.push_str("true"),
        Value::Bool(false) => buffer.push_str("false"),
        Value::Number(_) => buffer.push_str(&number_to_canonical_string(value)),
        Value::String(string) => write_string(buffer, string),
        Value::Array(items) => {
            buffer.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    buffer.push(',');
                }
                write_canonical(buffer, item);
            }
            buffer.push(']');
        }
        Value::Object(members) => {
            buffer.push('{');
            for (idx, (key, item)) in members.iter().enumerate() {
                if idx > 0 {
                    buffer.push(',');
                }
                write_string(buffer, key);
                buffer.push(':');
                write_canonical(buffer, item);
            }
            buffer.push('}');
        }
    }
}

fn write_string(buffer: &mut String, value: &str) {
    buffer.push('"');
    for ch in value.chars() {
        match ch {
            '"' => buffer.push_str("\\\""),
            '\\' => buffer.push_str("\\\\"),
            '\n' => buffer.push_str("\\n"),
            '\r' => buffer.push_str("\\r"),
            '\t' => buffer.push_str("\\t"),
            '\u{08}' => buffer.push_str("\\b"),
            '\u{0c}' => buffer.push_str("\\f"),
            ch if u32::from(ch) < 0x20 => {
                buffer.push_str(&format!("\\u{:04x}", u32::from(ch)));
            }
            ch => buffer.push(ch),
        }
    }
    buffer.push('"');
}

/// Adds `delta` to a number, keeping integers integral when the result fits.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn offset_number(value: &Value, delta: i64) -> Option<Value> {
    let Value::Number(number) = value else {
        panic!("offset_number called with a non-numeric value: {value}");
    };
    if let Some(result) = number.as_i64().and_then(|integer| integer.checked_add(delta)) {
        return Some(Value::from(result));
    }
    if let Some(result) = number
        .as_u64()
        .and_then(|integer| integer.checked_add_signed(delta))
    {
        return Some(Value::from(result));
    }
    let result = number.as_f64().expect("Always valid") + delta as f64;
    Number::from_f64(result).map(Value::Number)
}

/// The same number written in the other numeric subtype: `5` becomes `5.0` and vice versa.
///
/// `None` for floats with a fractional part or out of the integer range.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn other_subtype(value: &Value) -> Option<Value> {
    let Value::Number(number) = value else {
        panic!("other_subtype called with a non-numeric value: {value}");
    };
    if number.is_i64() || number.is_u64() {
        let float = number.as_f64().expect("Always valid");
        Number::from_f64(float).map(Value::Number)
    } else {
        let float = number.as_f64().expect("Always valid");
        if float.fract() == 0. && float >= i64::MIN as f64 && float < i64::MAX as f64 {
            Some(Value::from(float as i64))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(&json!(1), &json!(1.0))]
    #[test_case(&json!([2]), &json!([2.0]))]
    #[test_case(&json!([-3]), &json!([-3.0]))]
    #[test_case(&json!({"a": 1, "b": [true]}), &json!({"b": [true], "a": 1.0}))]
    #[test_case(&json!(18_446_744_073_709_551_615_u64), &json!(18_446_744_073_709_551_615_u64))]
    fn are_equal(left: &Value, right: &Value) {
        assert!(equal(left, right));
        assert_eq!(hash_value(left), hash_value(right));
    }

    #[test_case(&json!(1), &json!(2.0))]
    #[test_case(&json!([]), &json!(["foo"]))]
    #[test_case(&json!([1, 2]), &json!([2, 1]))]
    #[test_case(&json!({"a": 1}), &json!({"a": 1.0, "b": 2}))]
    #[test_case(&json!(null), &json!(false))]
    #[test_case(&json!("1"), &json!(1))]
    fn are_not_equal(left: &Value, right: &Value) {
        assert!(!equal(left, right))
    }

    #[test_case(&json!(null))]
    #[test_case(&json!(1.5))]
    #[test_case(&json!({"a": [1, {"b": null}]}))]
    fn reflexive_and_stable(value: &Value) {
        assert!(equal(value, value));
        assert_eq!(hash_value(value), hash_value(value));
    }

    #[test_case(&json!(1), &json!(2), Ordering::Less)]
    #[test_case(&json!(2.5), &json!(2), Ordering::Greater)]
    #[test_case(&json!(-1), &json!(18_446_744_073_709_551_615_u64), Ordering::Less)]
    #[test_case(&json!(9_007_199_254_740_993_i64), &json!(9_007_199_254_740_992_i64), Ordering::Greater)]
    #[test_case(&json!(3), &json!(3.0), Ordering::Equal)]
    fn number_ordering(left: &Value, right: &Value, expected: Ordering) {
        assert_eq!(compare_numbers(left, right), expected)
    }

    #[test]
    #[should_panic(expected = "non-numeric")]
    fn compare_non_numbers() {
        let _ = compare_numbers(&json!("a"), &json!(1));
    }

    #[test_case(&json!(5), "5")]
    #[test_case(&json!(-5), "-5")]
    #[test_case(&json!(5.0), "5.0")]
    #[test_case(&json!(0.25), "0.25")]
    #[test_case(&json!(1e20), "1.0e20")]
    fn canonical_numbers(value: &Value, expected: &str) {
        let text = number_to_canonical_string(value);
        assert_eq!(text, expected);
        let parsed: Value = serde_json::from_str(&text).expect("Valid JSON");
        assert_eq!(parsed.is_f64(), value.is_f64());
    }

    #[test]
    fn canonical_text() {
        let value = json!({"b": [1, 2.0, "x\"y"], "a": null});
        let text = to_canonical_string(&value);
        assert_eq!(text, r#"{"a":null,"b":[1,2.0,"x\"y"]}"#);
        let parsed: Value = serde_json::from_str(&text).expect("Valid JSON");
        assert!(equal(&parsed, &value));
    }

    #[test_case(&json!(5), 1, Some(json!(6)))]
    #[test_case(&json!(5.5), -1, Some(json!(4.5)))]
    #[test_case(&json!(i64::MAX), 1, Some(json!(9_223_372_036_854_775_808_u64)))]
    fn offsets(value: &Value, delta: i64, expected: Option<Value>) {
        assert_eq!(offset_number(value, delta), expected)
    }

    #[test_case(&json!(5), Some("5.0"))]
    #[test_case(&json!(5.0), Some("5"))]
    #[test_case(&json!(5.5), None)]
    fn subtypes(value: &Value, expected: Option<&str>) {
        assert_eq!(
            other_subtype(value).map(|value| to_canonical_string(&value)),
            expected.map(str::to_string)
        )
    }
}
