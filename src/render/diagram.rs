//! PlantUML state-diagram renderer.
//!
//! Straight line-by-line assembly of the diagram text: title, style
//! preamble, legends, one declared state per bundle state with its invariant
//! note, one labeled arrow per transition, plus the initial and final arrows.
//!
//! No schema or grammar checks happen here; the input bundle is assumed to
//! have validated with zero diagnostics. Records without usable ids are
//! skipped rather than guessed at.

use crate::spec::BundleSpec;

/// Collapse line breaks so spliced text stays on one diagram line.
fn esc(s: &str) -> String {
    s.replace('\r', "").replace('\n', "\\n")
}

fn bundle_name(bundle: &BundleSpec) -> &str {
    bundle.bundle_name.as_deref().unwrap_or("Bundle1")
}

/// Output file name derived from the bundle's declared name.
pub fn diagram_file_name(bundle: &BundleSpec) -> String {
    format!("Bundle_{}.puml", bundle_name(bundle))
}

pub fn render_diagram(bundle: &BundleSpec) -> String {
    let devices = bundle.devices.as_deref().unwrap_or_default();
    let states = bundle.states.as_deref().unwrap_or_default();
    let transitions = bundle.transitions.as_deref().unwrap_or_default();

    let mut lines: Vec<String> = Vec::new();
    lines.push("@startuml".to_string());
    lines.push(format!(
        "title Bundle: {} — State Machine Preview",
        esc(bundle_name(bundle))
    ));
    lines.extend(
        [
            "",
            "' --------- Visual polish ----------",
            "skinparam backgroundColor #FFFFFF",
            "skinparam state {",
            "  BorderColor #222222",
            "  BackgroundColor #FAFAFA",
            "  FontColor #111111",
            "}",
            "skinparam note {",
            "  BackgroundColor #FFFFEE",
            "  BorderColor #DDDD99",
            "}",
            "skinparam ArrowColor #333333",
            "skinparam ArrowFontColor #111111",
            "skinparam ArrowThickness 1.2",
            "hide empty description",
            "",
            "' --------- Legend ----------",
            "legend right",
            "  == Legend ==",
            "  - State note: invariants (must hold in state)",
            "  - Transition label: trigger / action",
            "  - Devices legend lists known devices, their types & attributes",
            "end legend",
            "",
            "' --------- Devices (legend, safe for all diagram types) ----------",
            "legend left",
            "  == Devices ==",
        ]
        .map(String::from),
    );

    for device in devices {
        let id = device.id.as_deref().unwrap_or("");
        let device_type = device.device_type.as_deref().unwrap_or("");
        let attrs = device
            .attributes
            .as_deref()
            .unwrap_or_default()
            .join(", ");
        lines.push(format!(
            "  {} : {}  (attrs: {})",
            esc(id),
            esc(device_type),
            esc(&attrs)
        ));
    }

    lines.push("end legend".to_string());
    lines.push(String::new());

    // Initial arrow into the first declared state.
    let init_target = states
        .first()
        .and_then(|s| s.id.as_deref())
        .filter(|id| !id.is_empty())
        .unwrap_or("State1");
    lines.push(format!("[*] --> {}", esc(init_target)));
    lines.push(String::new());

    // States, with invariant notes attached outside the state.
    for state in states {
        let Some(id) = state.id.as_deref().filter(|id| !id.is_empty()) else {
            continue;
        };
        lines.push(format!("state \"{}\" as {}", esc(id), esc(id)));
        if !state.invariants.is_empty() {
            lines.push(format!("note right of {}", esc(id)));
            lines.push("  == invariants ==".to_string());
            for invariant in &state.invariants {
                lines.push(format!("  {}", esc(invariant)));
            }
            lines.push("end note".to_string());
        }
    }
    lines.push(String::new());

    // Transitions, labeled `trigger / action`.
    for transition in transitions {
        let src = transition.source.as_deref().unwrap_or("");
        let tgt = transition.target.as_deref().unwrap_or("");
        if src.is_empty() || tgt.is_empty() {
            continue;
        }
        let trigger = transition.trigger.as_deref().unwrap_or("");
        let action = transition.action.as_deref().unwrap_or("");
        let label = if action.is_empty() {
            esc(trigger)
        } else {
            format!("{} / {}", esc(trigger), esc(action))
        };
        lines.push(format!("{} --> {} : {}", esc(src), esc(tgt), label));
    }
    lines.push(String::new());

    // Final arrow out of the last declared state.
    if states.len() > 1 {
        if let Some(last) = states
            .last()
            .and_then(|s| s.id.as_deref())
            .filter(|id| !id.is_empty())
        {
            lines.push(format!("{} --> [*]", esc(last)));
        }
    }

    lines.push(String::new());
    lines.push("@enduml".to_string());

    lines.join("\n")
}
