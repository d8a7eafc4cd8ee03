//! Fluent, fail-fast validation over a single named value.

use serde_json::Value as JsonValue;

use crate::error::{DomainError, DomainResult};

/// A single validation rule.
///
/// Type and length rules only apply to present values: `Null` (absent) passes
/// them, leaving presence to [`Rule::Required`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    String,
    Boolean,
    MaxLength(usize),
}

impl Rule {
    pub fn passes(&self, value: &JsonValue) -> bool {
        match self {
            Rule::Required => !matches!(value, JsonValue::Null) && value.as_str() != Some(""),
            Rule::String => value.is_null() || value.is_string(),
            Rule::Boolean => value.is_null() || value.is_boolean(),
            Rule::MaxLength(max) => match value {
                JsonValue::String(s) => s.chars().count() <= *max,
                _ => true,
            },
        }
    }

    pub fn message(&self, property: &str) -> String {
        match self {
            Rule::Required => format!("The {property} is required"),
            Rule::String => format!("The {property} must be a string"),
            Rule::Boolean => format!("The {property} must be a boolean"),
            Rule::MaxLength(max) => {
                format!("The {property} must be less or equal than {max} characters")
            }
        }
    }

    pub fn check(&self, value: &JsonValue, property: &str) -> DomainResult<()> {
        if self.passes(value) {
            Ok(())
        } else {
            Err(DomainError::validation(self.message(property)))
        }
    }
}

/// Validation chain bound to one `(value, property)` pair.
///
/// Every rule consumes the chain and hands it back on success, so rules compose
/// with `?` or `and_then`:
///
/// ```
/// use catalog_core::validation::ValidatorRules;
///
/// # fn run() -> catalog_core::DomainResult<()> {
/// ValidatorRules::values("aaaaa", "name").required()?.string()?.max_length(5)?;
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
///
/// The first failing rule ends the chain with `DomainError::Validation`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorRules {
    value: JsonValue,
    property: String,
}

impl ValidatorRules {
    pub fn values(value: impl Into<JsonValue>, property: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            property: property.into(),
        }
    }

    pub fn value(&self) -> &JsonValue {
        &self.value
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn required(self) -> DomainResult<Self> {
        self.apply(Rule::Required)
    }

    pub fn string(self) -> DomainResult<Self> {
        self.apply(Rule::String)
    }

    pub fn boolean(self) -> DomainResult<Self> {
        self.apply(Rule::Boolean)
    }

    pub fn max_length(self, max: usize) -> DomainResult<Self> {
        self.apply(Rule::MaxLength(max))
    }

    pub fn apply(self, rule: Rule) -> DomainResult<Self> {
        rule.check(&self.value, &self.property)?;
        Ok(self)
    }

    /// Apply `rules` in order, stopping at the first failure.
    pub fn apply_all(self, rules: &[Rule]) -> DomainResult<Self> {
        rules.iter().try_fold(self, |chain, rule| chain.apply(*rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_invalid(value: JsonValue, rule: Rule, expected: &str) {
        let err = ValidatorRules::values(value.clone(), "field").apply(rule).unwrap_err();
        assert_eq!(err, DomainError::validation(expected), "value {value} rule {rule:?}");
    }

    fn assert_valid(value: JsonValue, rule: Rule) {
        assert!(
            ValidatorRules::values(value.clone(), "field").apply(rule).is_ok(),
            "value {value} rule {rule:?}"
        );
    }

    #[test]
    fn values_binds_value_and_property() {
        let validator = ValidatorRules::values("some values", "field");
        assert_eq!(validator.value(), &json!("some values"));
        assert_eq!(validator.property(), "field");
    }

    #[test]
    fn required_rule() {
        for value in [JsonValue::Null, json!("")] {
            assert_invalid(value, Rule::Required, "The field is required");
        }
        for value in [json!("test"), json!(4), json!(true)] {
            assert_valid(value, Rule::Required);
        }
    }

    #[test]
    fn string_rule() {
        for value in [json!(8), json!({}), json!(false)] {
            assert_invalid(value, Rule::String, "The field must be a string");
        }
        for value in [json!("test"), JsonValue::Null] {
            assert_valid(value, Rule::String);
        }
    }

    #[test]
    fn max_length_rule() {
        assert_invalid(
            json!("aaaaaa"),
            Rule::MaxLength(5),
            "The field must be less or equal than 5 characters",
        );
        assert_valid(json!("aaaaa"), Rule::MaxLength(5));
        assert_valid(JsonValue::Null, Rule::MaxLength(5));
    }

    #[test]
    fn boolean_rule() {
        for value in [json!(8), json!({}), json!("true"), json!("false")] {
            assert_invalid(value, Rule::Boolean, "The field must be a boolean");
        }
        for value in [JsonValue::Null, json!(true), json!(false)] {
            assert_valid(value, Rule::Boolean);
        }
    }

    #[test]
    fn chain_stops_at_first_failure() {
        let err = ValidatorRules::values(JsonValue::Null, "field")
            .required()
            .and_then(ValidatorRules::string)
            .unwrap_err();
        assert_eq!(err.to_string(), "The field is required");

        let err = ValidatorRules::values(5, "field")
            .required()
            .and_then(ValidatorRules::string)
            .unwrap_err();
        assert_eq!(err.to_string(), "The field must be a string");

        let err = ValidatorRules::values("aaaaaa", "field")
            .apply_all(&[Rule::Required, Rule::String, Rule::MaxLength(5)])
            .unwrap_err();
        assert_eq!(err.to_string(), "The field must be less or equal than 5 characters");

        let err = ValidatorRules::values(JsonValue::Null, "field")
            .required()
            .and_then(ValidatorRules::boolean)
            .unwrap_err();
        assert_eq!(err.to_string(), "The field is required");

        let err = ValidatorRules::values(4, "field")
            .required()
            .and_then(ValidatorRules::boolean)
            .unwrap_err();
        assert_eq!(err.to_string(), "The field must be a boolean");
    }

    #[test]
    fn chain_passes_when_all_rules_hold() {
        fn run() -> DomainResult<()> {
            ValidatorRules::values("test", "field").required()?.string()?;
            ValidatorRules::values("aaaaa", "field").required()?.string()?.max_length(5)?;
            ValidatorRules::values(true, "field").required()?.boolean()?;
            ValidatorRules::values(false, "field").required()?.boolean()?;
            Ok(())
        }
        run().unwrap();
    }

    #[test]
    fn rules_never_mutate_the_value() {
        let chain = ValidatorRules::values("abc", "field")
            .apply_all(&[Rule::Required, Rule::String, Rule::MaxLength(10)])
            .unwrap();
        assert_eq!(chain.value(), &json!("abc"));
    }
}
