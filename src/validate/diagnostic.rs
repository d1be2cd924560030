//! Diagnostic taxonomy.
//!
//! One variant per violation the validator can record. Diagnostics are
//! values, never raised as errors: the validator returns them in an ordered
//! list and the caller decides pass/fail. The `#[error]` strings are the
//! user-visible message texts, printed one per line prefixed with `- `.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    // Structural
    #[error("Missing key: {key}")]
    MissingSection { key: String },

    #[error("Device missing keys: {device}")]
    DeviceMissingKeys { device: String },

    #[error("Duplicate device id: {id}")]
    DuplicateDeviceId { id: String },

    #[error("State missing id: {state}")]
    StateMissingId { state: String },

    #[error("Duplicate state id: {id}")]
    DuplicateStateId { id: String },

    #[error("Transition {index} missing {key}")]
    TransitionMissingKey { index: usize, key: &'static str },

    // Schema
    #[error("Unknown device type: {device_type}")]
    UnknownDeviceType { device_type: String },

    #[error("Device {id} attributes invalid: {attributes:?}")]
    InvalidDeviceAttributes { id: String, attributes: Vec<String> },

    #[error("Required device missing: {id}")]
    RequiredDeviceMissing { id: String },

    #[error("Invalid operator {op} in invariant")]
    InvalidInvariantOperator { op: String },

    #[error("Invalid value {value} for {device}.{attribute} in invariant; allowed={allowed:?}")]
    InvalidInvariantValue {
        value: String,
        device: String,
        attribute: String,
        allowed: Vec<String>,
    },

    #[error("Invalid operator {op} in {atom}")]
    InvalidTriggerOperator { op: String, atom: String },

    #[error("Invalid value {value} for {device}.{attribute}; allowed={allowed:?}")]
    InvalidTriggerValue {
        value: String,
        device: String,
        attribute: String,
        allowed: Vec<String>,
    },

    #[error("Command {command} not allowed for {device} (type {device_type}); allowed={allowed:?}")]
    CommandNotAllowed {
        command: String,
        device: String,
        device_type: String,
        allowed: Vec<String>,
    },

    // Grammar
    #[error("Bad invariant atom in state {state}: {text}")]
    BadInvariantAtom { state: String, text: String },

    #[error("Bad trigger atom: {text}")]
    BadTriggerAtom { text: String },

    #[error("Misplaced boolean operator {op} in trigger")]
    MisplacedOperator { op: String },

    #[error("Trigger expression ends with operator")]
    TrailingOperator,

    #[error("Bad action syntax: {text}")]
    BadActionSyntax { text: String },

    // Referential
    #[error("Unknown device in invariant: {device}")]
    UnknownInvariantDevice { device: String },

    #[error("Unknown attribute {device}.{attribute} in invariant")]
    UnknownInvariantAttribute { device: String, attribute: String },

    #[error("Unknown device in trigger: {device}")]
    UnknownTriggerDevice { device: String },

    #[error("Unknown attribute {device}.{attribute}")]
    UnknownTriggerAttribute { device: String, attribute: String },

    #[error("Unknown device in action: {device}")]
    UnknownActionDevice { device: String },

    #[error("Transition {index} unknown source: {id}")]
    UnknownSource { index: usize, id: String },

    #[error("Transition {index} unknown target: {id}")]
    UnknownTarget { index: usize, id: String },
}
