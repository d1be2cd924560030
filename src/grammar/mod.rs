//! Grammar engine: pure matchers for the three bundle micro-languages.
//!
//! - atom:    `device.attribute OP "value"`
//! - action:  `device.command()`
//! - trigger: atoms joined left to right by schema-supplied connectives
//!
//! Matchers are schema-agnostic. They decide syntax only; existence, typing
//! and value-range checks against the capability schema live in the
//! validator.

pub mod atom;
pub mod expr;

pub use atom::{ActionAtom, Atom, match_action, match_atom};
pub use expr::{ExprItem, Token, scan_expr, tokenize};
