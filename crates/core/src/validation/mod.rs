//! Validation building blocks: a fail-fast rule chain for single values and a
//! field-collecting schema validator for whole entities.

pub mod fields;
pub mod rules;

pub use fields::{Constraint, FnValidator, SchemaValidator, ValidatorFields};
pub use rules::{Rule, ValidatorRules};
