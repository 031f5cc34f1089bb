//! Config validation
//!
//! Rules:
//! - non-empty fields (derive-based, see `RealignConfig`)
//! - family prefixes mutually exclusive (neither a prefix of the other)
//! - prefixes do not start with `/` (leading separators are stripped before matching)
//! - output prefix is a plain file name fragment

use contracts::{ContractError, RealignConfig};
use ::validator::Validate;

/// Validate a RealignConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &RealignConfig) -> Result<(), ContractError> {
    validate_fields(config)?;
    validate_family_prefixes(config)?;
    validate_output_prefix(config)?;
    Ok(())
}

/// Field-level rules declared on the config types
fn validate_fields(config: &RealignConfig) -> Result<(), ContractError> {
    config
        .validate()
        .map_err(|e| ContractError::config_validation("config", e.to_string()))
}

/// Family prefixes must classify disjoint name sets
fn validate_family_prefixes(config: &RealignConfig) -> Result<(), ContractError> {
    let families = &config.families;

    for (field, prefix) in [("families.hose", &families.hose), ("families.shoot", &families.shoot)] {
        if prefix.starts_with('/') {
            return Err(ContractError::config_validation(
                field,
                format!("prefix '{prefix}' must not start with '/'"),
            ));
        }
    }

    if families.hose.starts_with(families.shoot.as_str())
        || families.shoot.starts_with(families.hose.as_str())
    {
        return Err(ContractError::config_validation(
            "families",
            format!(
                "prefixes '{}' and '{}' overlap, a name could match both families",
                families.hose, families.shoot
            ),
        ));
    }

    Ok(())
}

/// Output prefix is joined onto a base name
fn validate_output_prefix(config: &RealignConfig) -> Result<(), ContractError> {
    let prefix = &config.output_prefix;
    if prefix.contains(['/', '\\']) {
        return Err(ContractError::config_validation(
            "output_prefix",
            format!("output prefix '{prefix}' must not contain a path separator"),
        ));
    }
    Ok(())
}
