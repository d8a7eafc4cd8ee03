//! Entity-level structural validation.
//!
//! Unlike [`ValidatorRules`](super::ValidatorRules), which stops at the first
//! failure of one value, a fields validator checks every field of a record and
//! reports all violations at once as a field -> messages map. Each
//! [`Constraint`] is evaluated through the matching [`Rule`] of the chain, with
//! presence required on top.

use serde_json::Value as JsonValue;

use super::rules::{Rule, ValidatorRules};
use crate::error::{DomainError, DomainResult, FieldErrors};

/// Validation strategy injected into entities and mappers.
///
/// Implementations report structural failures as
/// [`DomainError::EntityValidation`]. Any other error variant is treated by
/// callers as an infrastructure failure and propagated untouched.
pub trait ValidatorFields<T: ?Sized>: Send + Sync {
    fn validate(&self, data: &T) -> DomainResult<()>;
}

/// Adapter turning a closure into a [`ValidatorFields`] strategy.
#[derive(Debug, Clone, Copy)]
pub struct FnValidator<F>(pub F);

impl<T, F> ValidatorFields<T> for FnValidator<F>
where
    T: ?Sized,
    F: Fn(&T) -> DomainResult<()> + Send + Sync,
{
    fn validate(&self, data: &T) -> DomainResult<()> {
        (self.0)(data)
    }
}

/// Field constraint, checked against a JSON view of the record.
///
/// A missing field (`Null`) fails every constraint unless the field is declared
/// optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    NotEmpty,
    IsString,
    IsBoolean,
    /// RFC 3339 timestamp.
    IsDate,
    MaxLength(usize),
}

impl Constraint {
    /// Chain rule backing this constraint; dates have none.
    pub fn rule(&self) -> Option<Rule> {
        match self {
            Constraint::NotEmpty => Some(Rule::Required),
            Constraint::IsString => Some(Rule::String),
            Constraint::IsBoolean => Some(Rule::Boolean),
            Constraint::MaxLength(max) => Some(Rule::MaxLength(*max)),
            Constraint::IsDate => None,
        }
    }

    pub fn passes(&self, value: &JsonValue) -> bool {
        let Some(rule) = self.rule() else {
            return value
                .as_str()
                .is_some_and(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok());
        };
        let present = match self {
            // Length only applies to strings; anything else fails it.
            Constraint::MaxLength(_) => value.is_string(),
            _ => !value.is_null(),
        };
        present && ValidatorRules::values(value.clone(), "").apply(rule).is_ok()
    }

    pub fn message(&self, field: &str) -> String {
        match self {
            Constraint::NotEmpty => format!("{field} should not be empty"),
            Constraint::IsString => format!("{field} must be a string"),
            Constraint::IsBoolean => format!("{field} must be a boolean value"),
            Constraint::IsDate => format!("{field} must be a Date instance"),
            Constraint::MaxLength(max) => {
                format!("{field} must be shorter than or equal to {max} characters")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldRules {
    name: String,
    optional: bool,
    constraints: Vec<Constraint>,
}

/// Declarative per-field schema over JSON records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaValidator {
    fields: Vec<FieldRules>,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a mandatory field.
    pub fn field(mut self, name: impl Into<String>, constraints: &[Constraint]) -> Self {
        self.fields.push(FieldRules {
            name: name.into(),
            optional: false,
            constraints: constraints.to_vec(),
        });
        self
    }

    /// Declare a field whose constraints are skipped when it is missing or null.
    pub fn optional_field(mut self, name: impl Into<String>, constraints: &[Constraint]) -> Self {
        self.fields.push(FieldRules {
            name: name.into(),
            optional: true,
            constraints: constraints.to_vec(),
        });
        self
    }

    /// Collect every violation without failing.
    pub fn errors(&self, data: &JsonValue) -> FieldErrors {
        let mut errors = FieldErrors::new();

        for field in &self.fields {
            let value = data.get(&field.name).unwrap_or(&JsonValue::Null);
            if field.optional && value.is_null() {
                continue;
            }

            let messages: Vec<String> = field
                .constraints
                .iter()
                .filter(|c| !c.passes(value))
                .map(|c| c.message(&field.name))
                .collect();

            if !messages.is_empty() {
                errors.insert(field.name.clone(), messages);
            }
        }

        errors
    }
}

impl ValidatorFields<JsonValue> for SchemaValidator {
    fn validate(&self, data: &JsonValue) -> DomainResult<()> {
        let errors = self.errors(data);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::EntityValidation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> SchemaValidator {
        SchemaValidator::new()
            .field(
                "name",
                &[Constraint::NotEmpty, Constraint::IsString, Constraint::MaxLength(10)],
            )
            .optional_field("is_active", &[Constraint::IsBoolean])
            .optional_field("created_at", &[Constraint::IsDate])
    }

    #[test]
    fn missing_mandatory_field_reports_every_constraint() {
        let errors = schema().errors(&json!({}));
        assert_eq!(
            errors.get("name").unwrap(),
            &vec![
                "name should not be empty".to_string(),
                "name must be a string".to_string(),
                "name must be shorter than or equal to 10 characters".to_string(),
            ]
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn optional_fields_are_skipped_when_null() {
        assert!(schema().validate(&json!({ "name": "ok", "is_active": null })).is_ok());
    }

    #[test]
    fn reports_wrong_types_of_optional_fields() {
        let err = schema()
            .validate(&json!({ "name": "ok", "is_active": "yes", "created_at": "yesterday" }))
            .unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors["is_active"], vec!["is_active must be a boolean value".to_string()]);
        assert_eq!(errors["created_at"], vec!["created_at must be a Date instance".to_string()]);
    }

    #[test]
    fn accepts_rfc3339_dates() {
        assert!(
            schema()
                .validate(&json!({ "name": "ok", "created_at": "2024-01-02T03:04:05.678Z" }))
                .is_ok()
        );
    }

    #[test]
    fn closures_can_act_as_strategies() {
        let stub = FnValidator(|_: &JsonValue| -> DomainResult<()> {
            Err(DomainError::unexpected("Generic Error"))
        });
        assert_eq!(
            stub.validate(&json!({})),
            Err(DomainError::unexpected("Generic Error"))
        );
    }

    #[test]
    fn constraints_follow_the_rule_chain() {
        for value in [json!("movie"), json!(""), json!(5), json!(true), JsonValue::Null] {
            for constraint in [Constraint::NotEmpty, Constraint::IsString, Constraint::IsBoolean] {
                let rule = constraint.rule().unwrap();
                assert_eq!(
                    constraint.passes(&value),
                    !value.is_null() && rule.passes(&value),
                    "{constraint:?} on {value}"
                );
            }
        }
        assert!(!Constraint::MaxLength(3).passes(&json!(5)));
        assert!(!Constraint::MaxLength(3).passes(&json!("four")));
        assert!(Constraint::MaxLength(3).passes(&json!("one")));
        assert_eq!(Constraint::IsDate.rule(), None);
    }
}
