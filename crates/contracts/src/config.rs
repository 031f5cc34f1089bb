//! RealignConfig - Config Loader output
//!
//! Every field has a default, so an empty config file (or none at all)
//! reproduces the standard hose/shoot realignment on `/tf`.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RealignConfig {
    /// Channel carrying multi-transform messages
    #[validate(length(min = 1, message = "transform channel cannot be empty"))]
    pub transform_channel: String,

    /// Name prefixes of the two families
    #[validate(nested)]
    pub families: FamilyPrefixes,

    /// File name prefix of the corrected log
    #[validate(length(min = 1, message = "output prefix cannot be empty"))]
    pub output_prefix: String,

    /// What to do with a classified record that has no stamp
    pub unstamped_policy: UnstampedPolicy,
}

impl Default for RealignConfig {
    fn default() -> Self {
        Self {
            transform_channel: "/tf".to_string(),
            families: FamilyPrefixes::default(),
            output_prefix: "new_".to_string(),
            unstamped_policy: UnstampedPolicy::default(),
        }
    }
}

/// Channel / child-frame prefixes, matched after stripping leading `/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FamilyPrefixes {
    #[validate(length(min = 1, message = "hose prefix cannot be empty"))]
    pub hose: String,

    #[validate(length(min = 1, message = "shoot prefix cannot be empty"))]
    pub shoot: String,
}

impl Default for FamilyPrefixes {
    fn default() -> Self {
        Self {
            hose: "hose".to_string(),
            shoot: "shoot".to_string(),
        }
    }
}

/// Policy for classified records whose payload carries no stamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnstampedPolicy {
    /// Write the record unmodified
    #[default]
    Forward,
    /// Leave the record out of the output
    Drop,
}
