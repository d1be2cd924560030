//! Deterministic external ids for generated artifacts.
//!
//! Every id is a pure function of the bundle's declared state and transition
//! order, so regenerating artifacts from the same bundle yields byte-identical
//! output that diffs cleanly under version control. Nothing here depends on
//! map iteration order: the positions come from the bundle's sequences.
//!
//! Scheme:
//! - state `S`                      -> `s_<S>`
//! - initial pseudostate            -> `init_1`
//! - final state                    -> `final_1`
//! - initial transition             -> `t_init` (never annotated)
//! - user transition at position n  -> `t_<n>` (1-based)
//! - state invariant block k        -> `stinv_<k>` (1-based state position)
//! - transition trigger/action n    -> `trig_<n>` / `act_<n>`

use crate::spec::StateSpec;
use std::collections::BTreeMap;

pub const INITIAL_NODE: &str = "init_1";
pub const FINAL_NODE: &str = "final_1";
pub const INITIAL_TRANSITION: &str = "t_init";

/// State-id -> external-id lookup built from declared state order.
#[derive(Debug, Clone, Default)]
pub struct ExternalIds {
    states: BTreeMap<String, String>,
}

impl ExternalIds {
    pub fn assign(states: &[StateSpec]) -> Self {
        let mut map = BTreeMap::new();
        for state in states {
            if let Some(id) = &state.id {
                map.insert(id.clone(), state_id(id));
            }
        }
        Self { states: map }
    }

    /// External id for a declared state.
    pub fn state(&self, id: &str) -> Option<&str> {
        self.states.get(id).map(String::as_str)
    }
}

pub fn state_id(id: &str) -> String {
    format!("s_{id}")
}

pub fn transition_id(n: usize) -> String {
    format!("t_{n}")
}

pub fn invariant_block_id(k: usize) -> String {
    format!("stinv_{k}")
}

pub fn trigger_block_id(n: usize) -> String {
    format!("trig_{n}")
}

pub fn action_block_id(n: usize) -> String {
    format!("act_{n}")
}
