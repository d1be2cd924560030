//! Capability schema (caps.json): the device-type taxonomy.
//!
//! JSON shape:
//! {
//!   "devices": {
//!     "switch": {
//!       "attributes": { "power": ["on", "off"] },
//!       "actions": ["toggle"]
//!     }
//!   },
//!   "ops": ["==", "!="],
//!   "bool_ops": ["&&", "||"],
//!   "required_devices": ["presenceSensor", "motionSensor", "switch"]
//! }
//!
//! Parsed once, then passed by shared reference into every check. Never
//! mutated after load. Allowed values and actions are ordered sets so the
//! sorted allowed-lists in diagnostic messages fall out of iteration order.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Deserialize)]
pub struct CapsSpec {
    /// Device type -> capability table.
    #[serde(default)]
    pub devices: BTreeMap<String, CapabilityType>,

    /// Allowed comparison operators for atoms.
    #[serde(default)]
    pub ops: BTreeSet<String>,

    /// Boolean connectives for trigger expressions.
    #[serde(default = "default_bool_ops")]
    pub bool_ops: Vec<String>,

    /// Device ids that must exist in every bundle using this schema.
    #[serde(default)]
    pub required_devices: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapabilityType {
    /// Attribute name -> allowed value set.
    #[serde(default)]
    pub attributes: BTreeMap<String, BTreeSet<String>>,

    /// Allowed command names.
    #[serde(default)]
    pub actions: BTreeSet<String>,
}

fn default_bool_ops() -> Vec<String> {
    vec!["&&".to_string(), "||".to_string()]
}
