//! Bundle document (spec.json): devices, states, transitions.
//!
//! JSON shape:
//! {
//!   "bundle_name": "Bundle1",
//!   "devices": [
//!     { "id": "switch1", "type": "switch", "attributes": ["power"] }
//!   ],
//!   "states": [
//!     { "id": "Idle", "invariants": ["switch1.power == \"off\""] }
//!   ],
//!   "transitions": [
//!     { "source": "Idle", "target": "On",
//!       "trigger": "switch1.power == \"off\"",
//!       "action": "switch1.toggle()" }
//!   ],
//!   "notes": "free-form"
//! }
//!
//! Every top-level key is required, but a missing key is a validation
//! diagnostic rather than a parse failure, so the fields here are Options.
//! The validator owns all consistency checks; these types only describe
//! the document.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct BundleSpec {
    #[serde(default)]
    pub bundle_name: Option<String>,

    #[serde(default)]
    pub devices: Option<Vec<DeviceSpec>>,

    #[serde(default)]
    pub states: Option<Vec<StateSpec>>,

    #[serde(default)]
    pub transitions: Option<Vec<TransitionSpec>>,

    #[serde(default)]
    pub notes: Option<serde_json::Value>,
}

/// Raw device entry as it appears in spec.json.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSpec {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, rename = "type")]
    pub device_type: Option<String>,

    #[serde(default)]
    pub attributes: Option<Vec<String>>,
}

/// Raw state entry: id plus single-atom invariant texts in declared order.
#[derive(Debug, Clone, Deserialize)]
pub struct StateSpec {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub invariants: Vec<String>,
}

/// Raw transition entry. All four keys are required by the validator.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionSpec {
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub trigger: Option<String>,

    #[serde(default)]
    pub action: Option<String>,
}
