use crate::domain::{
    entities::{CompositionPlan, Config, WriteSet},
    error::{ConfigError, PlanError},
};
use std::collections::HashSet;

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
        config.validate()
    }

    pub fn validate_plan(plan: &CompositionPlan) -> Result<(), PlanError> {
        plan.validate()
    }

    /// A write set may append to a registry only once and create a path only
    /// once.
    pub fn validate_write_set(set: &WriteSet) -> Result<(), PlanError> {
        let mut seen = HashSet::new();
        for op in set.ops() {
            if !seen.insert(op.path().as_str()) {
                return Err(PlanError::DuplicatePath {
                    path: op.path().to_string(),
                });
            }
        }
        Ok(())
    }
}
