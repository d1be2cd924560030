//! Spec layer: JSON document shapes for bundles and capability schemas.
//!
//! This module is intentionally separate from grammar matching and rendering.
//! It owns:
//! - Bundle document types (devices, states, transitions)
//! - Capability schema types (device taxonomy, operators, connectives)

pub mod bundle;
pub mod caps;

pub use bundle::{BundleSpec, DeviceSpec, StateSpec, TransitionSpec};
pub use caps::{CapabilityType, CapsSpec};
