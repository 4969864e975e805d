use crate::{
    error::{GenerationError, ValidationError},
    generation::{Generator, InstanceSet},
    keywords::helpers::{expect_number, keyword_location},
    node::SchemaNode,
    paths::LazyLocation,
    validation::KeywordContext,
};
use fraction::{BigFraction, BigUint};
use serde_json::{Number, Value};

pub(crate) fn validate<'s>(ctx: &mut KeywordContext<'_, 's>, value: &'s Value) {
    if let Some(number) = expect_number(ctx, value) {
        if number.as_f64().map_or(true, |divisor| divisor <= 0.) {
            ctx.error(format!("must be strictly greater than 0, found {value}"));
        }
    }
}

fn is_multiple_of_float(item: f64, multiple_of: f64) -> bool {
    let remainder = (item / multiple_of) % 1.;
    if remainder.is_nan() {
        // Involves heap allocations via the underlying `BigUint` type
        let fraction = BigFraction::from(item) / BigFraction::from(multiple_of);
        if let Some(denom) = fraction.denom() {
            denom == &BigUint::from(1_u8)
        } else {
            true
        }
    } else {
        remainder < f64::EPSILON
    }
}

/// Exact for integer pairs, otherwise follows floating point division.
pub(crate) fn is_multiple_of(item: &Number, multiple_of: &Number) -> bool {
    if let Some(divisor) = multiple_of.as_u64() {
        if let Some(dividend) = item.as_i64() {
            return i128::from(dividend) % i128::from(divisor) == 0;
        }
        if let Some(dividend) = item.as_u64() {
            return dividend % divisor == 0;
        }
        let item = item.as_f64().expect("Always valid");
        // As the divisor has its fractional part as zero, then any value with a non-zero
        // fractional part can't be a multiple of this divisor, therefore it is short-circuited
        #[allow(clippy::cast_precision_loss)]
        let divisor = divisor as f64;
        item.fract() == 0. && (item % divisor) == 0.
    } else {
        is_multiple_of_float(
            item.as_f64().expect("Always valid"),
            multiple_of.as_f64().expect("Always valid"),
        )
    }
}

pub(crate) fn apply<'s, 'i>(
    node: &SchemaNode<'s>,
    multiple_of: &'s Value,
    instance: &'i Value,
    location: &LazyLocation<'_>,
) -> Result<(), ValidationError<'i>> {
    if let (Value::Number(item), Value::Number(divisor)) = (instance, multiple_of) {
        if !is_multiple_of(item, divisor) {
            return Err(ValidationError::multiple_of(
                keyword_location(node, "multipleOf"),
                location.into(),
                instance,
                multiple_of.clone(),
            ));
        }
    }
    Ok(())
}

fn integer(value: i128) -> Option<Value> {
    if let Ok(value) = i64::try_from(value) {
        Some(Value::from(value))
    } else {
        u64::try_from(value).ok().map(Value::from)
    }
}

fn float(value: f64) -> Option<Value> {
    Number::from_f64(value).map(Value::Number)
}

/// Zero, a few multiples and one non-multiple.
///
/// Integer divisors are probed with `d + 1` (`0.5` when `d` is 1), fractional divisors with
/// `1.5 * d`.
pub(crate) fn generate<'s>(
    _: &mut Generator<'_>,
    _: &SchemaNode<'s>,
    multiple_of: &'s Value,
    output: &mut InstanceSet,
) -> Result<(), GenerationError> {
    let Value::Number(divisor) = multiple_of else {
        return Ok(());
    };
    output.insert(Value::from(0));
    if let Some(divisor) = divisor.as_u64() {
        let divisor = i128::from(divisor);
        output.extend(integer(divisor));
        output.extend(integer(divisor * 2));
        output.extend(integer(-divisor));
        if divisor == 1 {
            output.extend(float(0.5));
        } else {
            output.extend(integer(divisor + 1));
        }
    } else {
        let divisor = divisor.as_f64().expect("Always valid");
        output.extend(float(divisor));
        output.extend(float(divisor * 2.));
        output.extend(float(-divisor));
        output.extend(float(divisor * 1.5));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"multipleOf": 2}), &json!(4))]
    #[test_case(&json!({"multipleOf": 2}), &json!(4.0))]
    #[test_case(&json!({"multipleOf": 5}), &json!(10))]
    #[test_case(&json!({"multipleOf": 5}), &json!("6"))]
    #[test_case(&json!({"multipleOf": 1.5}), &json!(3.0))]
    #[test_case(&json!({"multipleOf": 0.25}), &json!(0.75))]
    #[test_case(&json!({"multipleOf": 3}), &json!(-9_223_372_036_854_775_806_i64))]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(&json!({"multipleOf": 2}), &json!(3))]
    #[test_case(&json!({"multipleOf": 2}), &json!(2.5))]
    #[test_case(&json!({"multipleOf": 5}), &json!(6))]
    #[test_case(&json!({"multipleOf": 1.5}), &json!(2.0))]
    #[test_case(&json!({"multipleOf": 0.02}), &json!(1.01))]
    fn invalid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test_case(&json!({"multipleOf": 5}), &["0", "5", "10", "-5"], &["6"])]
    #[test_case(&json!({"multipleOf": 1}), &["0", "1", "2"], &["0.5"])]
    #[test_case(&json!({"multipleOf": 0.5}), &["0", "0.5", "1.0"], &["0.75"])]
    fn generated(schema: &Value, valid: &[&str], invalid: &[&str]) {
        tests_util::assert_generates(schema, valid, invalid)
    }

    #[test]
    fn schema_location() {
        tests_util::assert_schema_location(&json!({"multipleOf": 2}), &json!(3), "/multipleOf")
    }
}
