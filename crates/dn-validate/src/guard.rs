use dn_core::ValidationResult;
use tracing::warn;

use crate::error::ValidateResult;

/// Run a validator body, turning a fault into a structural error.
pub(crate) fn guarded<F>(name: &str, body: F) -> ValidationResult
where
    F: FnOnce(&mut ValidationResult) -> ValidateResult<()>,
{
    let mut result = ValidationResult::new();
    if let Err(fault) = body(&mut result) {
        warn!(validator = name, error = %fault, "validator fault");
        result.add_error(format!("Validation error in {name}: {fault}"));
    }
    result
}
