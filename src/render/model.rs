//! UML/XMI structured-model renderer.
//!
//! Fills an externally supplied template by splicing generated blocks right
//! after three paired marker comments:
//!
//!   <!-- BEGIN_STATE_NODES -->        <!-- END_STATE_NODES -->
//!   <!-- BEGIN_TRANSITIONS -->        <!-- END_TRANSITIONS -->
//!   <!-- BEGIN_MDSSED_STEREOTYPES --> <!-- END_MDSSED_STEREOTYPES -->
//!
//! plus the `__BUNDLE_NAME__` placeholder. All ids come from the
//! deterministic assignment in [`crate::ids`]; the template's own
//! well-formedness is not checked here. The input bundle is assumed to have
//! validated with zero diagnostics.

use crate::ids::{self, ExternalIds};
use crate::spec::{BundleSpec, StateSpec, TransitionSpec};
use anyhow::Context;
use regex::Regex;
use std::sync::LazyLock;

const BUNDLE_NAME_PLACEHOLDER: &str = "__BUNDLE_NAME__";
const BEGIN_STATE_NODES: &str = "<!-- BEGIN_STATE_NODES -->";
const BEGIN_TRANSITIONS: &str = "<!-- BEGIN_TRANSITIONS -->";
const BEGIN_STEREOTYPES: &str = "<!-- BEGIN_MDSSED_STEREOTYPES -->";

static NOTPRESENT_EQ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(presenceSensor\.presence\s*==\s*)"notpresent""#).expect("notpresent pattern")
});
static NOTPRESENT_NEQ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(presenceSensor\.presence\s*!=\s*)"notpresent""#).expect("notpresent pattern")
});

/// XML-escape element text and attribute values.
fn h(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Rewrite the one literal the downstream verification vocabulary spells
/// differently. Display-only: the stored bundle keeps `"notpresent"`, and
/// only comparisons against `presenceSensor.presence` are touched.
fn normalize_expr(expr: &str) -> String {
    let expr = NOTPRESENT_EQ.replace_all(expr, "${1}\"not present\"");
    NOTPRESENT_NEQ
        .replace_all(&expr, "${1}\"not present\"")
        .into_owned()
}

/// Output file name derived from the bundle's declared name.
pub fn model_file_name(bundle: &BundleSpec) -> anyhow::Result<String> {
    let name = bundle
        .bundle_name
        .as_deref()
        .context("bundle_name missing from spec")?;
    Ok(format!("Bundle_{name}.uml"))
}

pub fn render_model(bundle: &BundleSpec, template: &str) -> anyhow::Result<String> {
    let name = bundle
        .bundle_name
        .as_deref()
        .context("bundle_name missing from spec")?;
    let states = bundle.states.as_deref().context("states missing from spec")?;
    let transitions = bundle
        .transitions
        .as_deref()
        .context("transitions missing from spec")?;

    let external = ExternalIds::assign(states);

    let state_xml = state_nodes(states, &external);
    let transition_xml = transition_nodes(states, transitions, &external)?;
    let stereotype_xml = stereotype_nodes(states, transitions, &external);

    Ok(template
        .replace(BUNDLE_NAME_PLACEHOLDER, &format!("Bundle_{}", h(name)))
        .replace(BEGIN_STATE_NODES, &splice(BEGIN_STATE_NODES, &state_xml))
        .replace(
            BEGIN_TRANSITIONS,
            &splice(BEGIN_TRANSITIONS, &transition_xml),
        )
        .replace(
            BEGIN_STEREOTYPES,
            &splice(BEGIN_STEREOTYPES, &stereotype_xml),
        ))
}

fn splice(marker: &str, lines: &[String]) -> String {
    format!("{}\n{}", marker, lines.join("\n"))
}

/// Region subvertex list: initial pseudostate, user states, final state.
fn state_nodes(states: &[StateSpec], external: &ExternalIds) -> Vec<String> {
    let mut out = Vec::new();
    out.push(format!(
        "      <subvertex xmi:type=\"uml:Pseudostate\" xmi:id=\"{}\"/>",
        ids::INITIAL_NODE
    ));
    for state in states {
        let Some(id) = state.id.as_deref() else {
            continue;
        };
        let Some(xid) = external.state(id) else {
            continue;
        };
        out.push(format!(
            "      <subvertex xmi:type=\"uml:State\" xmi:id=\"{}\" name=\"{}\"/>",
            xid,
            h(id)
        ));
    }
    out.push(format!(
        "      <subvertex xmi:type=\"uml:FinalState\" xmi:id=\"{}\"/>",
        ids::FINAL_NODE
    ));
    out
}

/// `t_init` into the first declared state, then the user transitions.
fn transition_nodes(
    states: &[StateSpec],
    transitions: &[TransitionSpec],
    external: &ExternalIds,
) -> anyhow::Result<Vec<String>> {
    let first = states
        .first()
        .and_then(|s| s.id.as_deref())
        .and_then(|id| external.state(id))
        .context("model rendering needs at least one declared state")?;

    let mut out = Vec::new();
    out.push(format!(
        "      <transition xmi:type=\"uml:Transition\" xmi:id=\"{}\" source=\"{}\" target=\"{}\"/>",
        ids::INITIAL_TRANSITION,
        ids::INITIAL_NODE,
        first
    ));

    for (n, transition) in transitions.iter().enumerate() {
        let index = n + 1;
        let src = transition
            .source
            .as_deref()
            .and_then(|id| external.state(id))
            .with_context(|| format!("transition {index} references an undeclared source"))?;
        let tgt = transition
            .target
            .as_deref()
            .and_then(|id| external.state(id))
            .with_context(|| format!("transition {index} references an undeclared target"))?;
        out.push(format!(
            "      <transition xmi:type=\"uml:Transition\" xmi:id=\"{}\" source=\"{}\" target=\"{}\"/>",
            ids::transition_id(index),
            src,
            tgt
        ));
    }

    Ok(out)
}

/// Annotation blocks: per-state invariants, then per-transition trigger and
/// action pairs. Nothing is emitted for `t_init`.
fn stereotype_nodes(
    states: &[StateSpec],
    transitions: &[TransitionSpec],
    external: &ExternalIds,
) -> Vec<String> {
    let mut out = Vec::new();

    for (k, state) in states.iter().enumerate() {
        let Some(base) = state.id.as_deref().and_then(|id| external.state(id)) else {
            continue;
        };
        out.push(format!(
            "  <MDSSED:states xmi:id=\"{}\" base_State=\"{}\">",
            ids::invariant_block_id(k + 1),
            base
        ));
        for invariant in &state.invariants {
            out.push(format!("    <state>{}</state>", h(&normalize_expr(invariant))));
        }
        out.push("  </MDSSED:states>".to_string());
    }

    for (n, transition) in transitions.iter().enumerate() {
        let index = n + 1;
        let tid = ids::transition_id(index);
        let trigger = transition.trigger.as_deref().unwrap_or_default();
        let action = transition.action.as_deref().unwrap_or_default();

        out.push(format!(
            "  <MDSSED:triggers xmi:id=\"{}\" base_Transition=\"{}\">",
            ids::trigger_block_id(index),
            tid
        ));
        out.push(format!(
            "    <trigger>{}</trigger>",
            h(&normalize_expr(trigger))
        ));
        out.push("  </MDSSED:triggers>".to_string());

        out.push(format!(
            "  <MDSSED:actions xmi:id=\"{}\" base_Transition=\"{}\">",
            ids::action_block_id(index),
            tid
        ));
        out.push(format!("    <action>{}</action>", h(action)));
        out.push("  </MDSSED:actions>".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const TEMPLATE: &str = "<uml name=\"__BUNDLE_NAME__\">\n\
        <!-- BEGIN_STATE_NODES -->\n\
        <!-- END_STATE_NODES -->\n\
        <!-- BEGIN_TRANSITIONS -->\n\
        <!-- END_TRANSITIONS -->\n\
        </uml>\n\
        <!-- BEGIN_MDSSED_STEREOTYPES -->\n\
        <!-- END_MDSSED_STEREOTYPES -->\n";

    fn bundle(value: serde_json::Value) -> BundleSpec {
        serde_json::from_value(value).unwrap()
    }

    fn demo() -> BundleSpec {
        bundle(json!({
            "bundle_name": "Demo",
            "devices": [
                { "id": "presenceSensor", "type": "sensor", "attributes": ["presence"] }
            ],
            "states": [
                { "id": "Away", "invariants": ["presenceSensor.presence == \"notpresent\""] },
                { "id": "Home", "invariants": [] }
            ],
            "transitions": [
                { "source": "Away", "target": "Home",
                  "trigger": "presenceSensor.presence != \"notpresent\"",
                  "action": "switch1.toggle()" }
            ],
            "notes": ""
        }))
    }

    #[test]
    fn file_name_comes_from_bundle_name() {
        assert_eq!(model_file_name(&demo()).unwrap(), "Bundle_Demo.uml");
    }

    #[test]
    fn fills_every_template_region() {
        let expected = "<uml name=\"Bundle_Demo\">\n\
            <!-- BEGIN_STATE_NODES -->\n\
            \u{20}     <subvertex xmi:type=\"uml:Pseudostate\" xmi:id=\"init_1\"/>\n\
            \u{20}     <subvertex xmi:type=\"uml:State\" xmi:id=\"s_Away\" name=\"Away\"/>\n\
            \u{20}     <subvertex xmi:type=\"uml:State\" xmi:id=\"s_Home\" name=\"Home\"/>\n\
            \u{20}     <subvertex xmi:type=\"uml:FinalState\" xmi:id=\"final_1\"/>\n\
            <!-- END_STATE_NODES -->\n\
            <!-- BEGIN_TRANSITIONS -->\n\
            \u{20}     <transition xmi:type=\"uml:Transition\" xmi:id=\"t_init\" source=\"init_1\" target=\"s_Away\"/>\n\
            \u{20}     <transition xmi:type=\"uml:Transition\" xmi:id=\"t_1\" source=\"s_Away\" target=\"s_Home\"/>\n\
            <!-- END_TRANSITIONS -->\n\
            </uml>\n\
            <!-- BEGIN_MDSSED_STEREOTYPES -->\n\
            \u{20} <MDSSED:states xmi:id=\"stinv_1\" base_State=\"s_Away\">\n\
            \u{20}   <state>presenceSensor.presence == &quot;not present&quot;</state>\n\
            \u{20} </MDSSED:states>\n\
            \u{20} <MDSSED:states xmi:id=\"stinv_2\" base_State=\"s_Home\">\n\
            \u{20} </MDSSED:states>\n\
            \u{20} <MDSSED:triggers xmi:id=\"trig_1\" base_Transition=\"t_1\">\n\
            \u{20}   <trigger>presenceSensor.presence != &quot;not present&quot;</trigger>\n\
            \u{20} </MDSSED:triggers>\n\
            \u{20} <MDSSED:actions xmi:id=\"act_1\" base_Transition=\"t_1\">\n\
            \u{20}   <action>switch1.toggle()</action>\n\
            \u{20} </MDSSED:actions>\n\
            <!-- END_MDSSED_STEREOTYPES -->\n";
        assert_eq!(render_model(&demo(), TEMPLATE).unwrap(), expected);
    }

    #[test]
    fn rendering_is_deterministic() {
        let first = render_model(&demo(), TEMPLATE).unwrap();
        let second = render_model(&demo(), TEMPLATE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn normalize_rewrites_only_the_presence_literal() {
        assert_eq!(
            normalize_expr(r#"presenceSensor.presence == "notpresent""#),
            r#"presenceSensor.presence == "not present""#
        );
        assert_eq!(
            normalize_expr(r#"presenceSensor.presence != "notpresent""#),
            r#"presenceSensor.presence != "not present""#
        );
        // Other devices and other values keep their spelling.
        assert_eq!(
            normalize_expr(r#"otherSensor.presence == "notpresent""#),
            r#"otherSensor.presence == "notpresent""#
        );
        assert_eq!(
            normalize_expr(r#"presenceSensor.presence == "present""#),
            r#"presenceSensor.presence == "present""#
        );
    }

    #[test]
    fn spliced_text_is_xml_escaped() {
        let mut b = demo();
        b.bundle_name = Some("A&B".to_string());
        let out = render_model(&b, TEMPLATE).unwrap();
        assert!(out.contains("<uml name=\"Bundle_A&amp;B\">"));
    }

    #[test]
    fn empty_state_list_is_an_error() {
        let b = bundle(json!({
            "bundle_name": "Empty",
            "devices": [],
            "states": [],
            "transitions": [],
            "notes": ""
        }));
        assert!(render_model(&b, TEMPLATE).is_err());
    }

    #[test]
    fn undeclared_transition_endpoint_is_an_error() {
        let mut b = demo();
        b.transitions.as_mut().unwrap()[0].target = Some("Nowhere".to_string());
        assert!(render_model(&b, TEMPLATE).is_err());
    }
}
