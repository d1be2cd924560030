//! Bundle validation against a capability schema.
//!
//! `validate` never aborts mid-check and never raises for well-formed but
//! invalid input: every violation becomes a [`Diagnostic`] and checking
//! continues, so one category of error cannot hide another. Each sub-check
//! returns its own ordered list and the orchestrator concatenates them in a
//! fixed order: top-level sections, then devices, then states, then
//! transitions, each in spec order. That ordering is part of the contract.

pub mod diagnostic;

pub use diagnostic::Diagnostic;

use crate::grammar::{self, ExprItem};
use crate::spec::{BundleSpec, CapabilityType, CapsSpec};
use std::collections::{BTreeMap, BTreeSet};

/// Device id -> declared type, as resolved by the device check.
///
/// On duplicate ids the last declaration wins, so later checks still have a
/// type to resolve against.
pub type DeviceMap = BTreeMap<String, String>;

pub fn validate(bundle: &BundleSpec, caps: &CapsSpec) -> Vec<Diagnostic> {
    let mut out = check_sections(bundle);

    let (devices, diags) = check_devices(bundle, caps);
    out.extend(diags);

    let (state_ids, diags) = check_states(bundle, caps, &devices);
    out.extend(diags);

    out.extend(check_transitions(bundle, caps, &devices, &state_ids));

    out
}

const REQUIRED_SECTIONS: [&str; 5] = ["bundle_name", "devices", "states", "transitions", "notes"];

fn check_sections(bundle: &BundleSpec) -> Vec<Diagnostic> {
    let present = [
        bundle.bundle_name.is_some(),
        bundle.devices.is_some(),
        bundle.states.is_some(),
        bundle.transitions.is_some(),
        bundle.notes.is_some(),
    ];

    REQUIRED_SECTIONS
        .iter()
        .zip(present)
        .filter(|(_, present)| !present)
        .map(|(key, _)| Diagnostic::MissingSection {
            key: key.to_string(),
        })
        .collect()
}

fn check_devices(bundle: &BundleSpec, caps: &CapsSpec) -> (DeviceMap, Vec<Diagnostic>) {
    let mut diags = Vec::new();
    let mut map = DeviceMap::new();

    for raw in bundle.devices.as_deref().unwrap_or_default() {
        let (Some(id), Some(device_type), Some(attributes)) =
            (&raw.id, &raw.device_type, &raw.attributes)
        else {
            diags.push(Diagnostic::DeviceMissingKeys {
                device: format!("{raw:?}"),
            });
            continue;
        };

        let Some(cap) = caps.devices.get(device_type) else {
            diags.push(Diagnostic::UnknownDeviceType {
                device_type: device_type.clone(),
            });
            continue;
        };

        if map.contains_key(id) {
            diags.push(Diagnostic::DuplicateDeviceId { id: id.clone() });
        }
        map.insert(id.clone(), device_type.clone());

        // Declared attributes must be a subset of the type's allowed set;
        // report the excess sorted and deduplicated.
        let excess: Vec<String> = attributes
            .iter()
            .filter(|a| !cap.attributes.contains_key(*a))
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        if !excess.is_empty() {
            diags.push(Diagnostic::InvalidDeviceAttributes {
                id: id.clone(),
                attributes: excess,
            });
        }
    }

    // The schema's baseline devices must exist in the final map no matter
    // how many devices were declared.
    for id in &caps.required_devices {
        if !map.contains_key(id) {
            diags.push(Diagnostic::RequiredDeviceMissing { id: id.clone() });
        }
    }

    (map, diags)
}

fn check_states(
    bundle: &BundleSpec,
    caps: &CapsSpec,
    devices: &DeviceMap,
) -> (BTreeSet<String>, Vec<Diagnostic>) {
    let mut diags = Vec::new();
    let mut ids = BTreeSet::new();

    for raw in bundle.states.as_deref().unwrap_or_default() {
        let Some(id) = &raw.id else {
            diags.push(Diagnostic::StateMissingId {
                state: format!("{raw:?}"),
            });
            continue;
        };

        if !ids.insert(id.clone()) {
            diags.push(Diagnostic::DuplicateStateId { id: id.clone() });
        }

        for text in &raw.invariants {
            diags.extend(check_invariant(id, text, caps, devices));
        }
    }

    (ids, diags)
}

/// Invariants are single atoms by construction. Text containing a connective
/// fails the atom match and is reported, never split into an expression.
fn check_invariant(
    state: &str,
    text: &str,
    caps: &CapsSpec,
    devices: &DeviceMap,
) -> Vec<Diagnostic> {
    let Some(atom) = grammar::match_atom(text) else {
        return vec![Diagnostic::BadInvariantAtom {
            state: state.to_string(),
            text: text.to_string(),
        }];
    };

    let Some(cap) = lookup_device(&atom.device, devices, caps) else {
        return vec![Diagnostic::UnknownInvariantDevice {
            device: atom.device,
        }];
    };

    let Some(allowed) = cap.attributes.get(&atom.attribute) else {
        return vec![Diagnostic::UnknownInvariantAttribute {
            device: atom.device,
            attribute: atom.attribute,
        }];
    };

    let mut diags = Vec::new();
    if !caps.ops.contains(&atom.op) {
        diags.push(Diagnostic::InvalidInvariantOperator {
            op: atom.op.clone(),
        });
    }
    if !allowed.contains(&atom.value) {
        diags.push(Diagnostic::InvalidInvariantValue {
            value: atom.value,
            device: atom.device,
            attribute: atom.attribute,
            allowed: allowed.iter().cloned().collect(),
        });
    }
    diags
}

fn check_transitions(
    bundle: &BundleSpec,
    caps: &CapsSpec,
    devices: &DeviceMap,
    state_ids: &BTreeSet<String>,
) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    for (n, raw) in bundle
        .transitions
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
    {
        let index = n + 1;

        for (key, present) in [
            ("source", raw.source.is_some()),
            ("target", raw.target.is_some()),
            ("trigger", raw.trigger.is_some()),
            ("action", raw.action.is_some()),
        ] {
            if !present {
                diags.push(Diagnostic::TransitionMissingKey { index, key });
            }
        }

        if let Some(source) = &raw.source {
            if !state_ids.contains(source) {
                diags.push(Diagnostic::UnknownSource {
                    index,
                    id: source.clone(),
                });
            }
        }
        if let Some(target) = &raw.target {
            if !state_ids.contains(target) {
                diags.push(Diagnostic::UnknownTarget {
                    index,
                    id: target.clone(),
                });
            }
        }

        if let Some(trigger) = &raw.trigger {
            diags.extend(check_trigger(trigger, caps, devices));
        }
        if let Some(action) = &raw.action {
            diags.extend(check_action(action, caps, devices));
        }
    }

    diags
}

fn check_trigger(expr: &str, caps: &CapsSpec, devices: &DeviceMap) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    for item in grammar::scan_expr(expr, &caps.bool_ops) {
        match item {
            ExprItem::Atom(text) => diags.extend(check_trigger_atom(&text, caps, devices)),
            ExprItem::MisplacedConnective(op) => {
                diags.push(Diagnostic::MisplacedOperator { op });
            }
            ExprItem::TrailingConnective => {
                diags.push(Diagnostic::TrailingOperator);
            }
        }
    }

    diags
}

fn check_trigger_atom(text: &str, caps: &CapsSpec, devices: &DeviceMap) -> Vec<Diagnostic> {
    let Some(atom) = grammar::match_atom(text) else {
        return vec![Diagnostic::BadTriggerAtom {
            text: text.to_string(),
        }];
    };

    let Some(cap) = lookup_device(&atom.device, devices, caps) else {
        return vec![Diagnostic::UnknownTriggerDevice {
            device: atom.device,
        }];
    };

    let Some(allowed) = cap.attributes.get(&atom.attribute) else {
        return vec![Diagnostic::UnknownTriggerAttribute {
            device: atom.device,
            attribute: atom.attribute,
        }];
    };

    let mut diags = Vec::new();
    if !caps.ops.contains(&atom.op) {
        diags.push(Diagnostic::InvalidTriggerOperator {
            op: atom.op.clone(),
            atom: text.to_string(),
        });
    }
    if !allowed.contains(&atom.value) {
        diags.push(Diagnostic::InvalidTriggerValue {
            value: atom.value,
            device: atom.device,
            attribute: atom.attribute,
            allowed: allowed.iter().cloned().collect(),
        });
    }
    diags
}

fn check_action(text: &str, caps: &CapsSpec, devices: &DeviceMap) -> Vec<Diagnostic> {
    let Some(action) = grammar::match_action(text) else {
        return vec![Diagnostic::BadActionSyntax {
            text: text.to_string(),
        }];
    };

    let Some(device_type) = devices.get(&action.device) else {
        return vec![Diagnostic::UnknownActionDevice {
            device: action.device,
        }];
    };

    // The device map only ever holds types present in the schema.
    let Some(cap) = caps.devices.get(device_type) else {
        return Vec::new();
    };

    if cap.actions.contains(&action.command) {
        Vec::new()
    } else {
        vec![Diagnostic::CommandNotAllowed {
            command: action.command,
            device: action.device,
            device_type: device_type.clone(),
            allowed: cap.actions.iter().cloned().collect(),
        }]
    }
}

fn lookup_device<'a>(
    id: &str,
    devices: &DeviceMap,
    caps: &'a CapsSpec,
) -> Option<&'a CapabilityType> {
    caps.devices.get(devices.get(id)?)
}
