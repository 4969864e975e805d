//! Keywords that are recognized but not evaluated.
use crate::validation::KeywordContext;
use serde_json::Value;

/// `$ref` and `format` load with a warning and accept every instance.
pub(crate) fn validate<'s>(ctx: &mut KeywordContext<'_, 's>, _: &'s Value) {
    ctx.warning("is not implemented and will be ignored");
}

#[cfg(test)]
mod tests {
    use crate::{diagnostics::Severity, tests_util, validation::validate_schema};
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"$ref": "#/definitions/a"}))]
    #[test_case(&json!({"format": "email"}))]
    fn warns(schema: &Value) {
        let (valid, diagnostics) = validate_schema(schema);
        assert!(valid);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity(), Severity::Warning);
    }

    #[test]
    fn ignored_during_application() {
        tests_util::is_valid(&json!({"format": "email"}), &json!("not an email"))
    }
}
