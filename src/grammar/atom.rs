//! Atom and action matchers.
//!
//! An atom is a single comparison:
//!
//!   switch1.power == "on"
//!
//! Identifiers start with a letter or underscore, then letters, digits or
//! underscores. The value is any non-empty run of non-quote characters inside
//! double quotes. Whitespace around the whole atom is insignificant.
//!
//! An action is a no-argument call with no space before the parentheses:
//!
//!   switch1.toggle()
//!
//! Both matchers return None on any syntactic mismatch; the caller decides
//! how to report it.

use regex::Regex;
use std::sync::LazyLock;

static ATOM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*([a-zA-Z_]\w*)\.([a-zA-Z_]\w*)\s*(==|!=)\s*"([^"]+)"\s*$"#)
        .expect("atom pattern")
});

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([a-zA-Z_]\w*)\.([a-zA-Z_]\w*)\(\)\s*$").expect("action pattern")
});

/// Parsed `device.attribute OP "value"` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub device: String,
    pub attribute: String,
    pub op: String,
    pub value: String,
}

/// Parsed `device.command()` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionAtom {
    pub device: String,
    pub command: String,
}

pub fn match_atom(text: &str) -> Option<Atom> {
    let caps = ATOM_RE.captures(text)?;
    Some(Atom {
        device: caps[1].to_string(),
        attribute: caps[2].to_string(),
        op: caps[3].to_string(),
        value: caps[4].to_string(),
    })
}

pub fn match_action(text: &str) -> Option<ActionAtom> {
    let caps = ACTION_RE.captures(text)?;
    Some(ActionAtom {
        device: caps[1].to_string(),
        command: caps[2].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn atom_accepts_basic_comparison() {
        assert_eq!(
            match_atom(r#"switch1.power == "on""#),
            Some(Atom {
                device: "switch1".to_string(),
                attribute: "power".to_string(),
                op: "==".to_string(),
                value: "on".to_string(),
            })
        );
    }

    #[test]
    fn atom_accepts_surrounding_whitespace_and_neq() {
        let atom = match_atom("  _sensor.state_2  !=  \"not present\"  ").unwrap();
        assert_eq!(atom.device, "_sensor");
        assert_eq!(atom.attribute, "state_2");
        assert_eq!(atom.op, "!=");
        assert_eq!(atom.value, "not present");
    }

    #[test]
    fn atom_rejects_unquoted_value() {
        assert_eq!(match_atom("switch1.power == on"), None);
    }

    #[test]
    fn atom_rejects_empty_value() {
        assert_eq!(match_atom(r#"switch1.power == """#), None);
    }

    #[test]
    fn atom_rejects_unknown_operator_spelling() {
        assert_eq!(match_atom(r#"switch1.power = "on""#), None);
        assert_eq!(match_atom(r#"switch1.power >= "on""#), None);
    }

    #[test]
    fn atom_rejects_boolean_expression_text() {
        assert_eq!(match_atom(r#"a.b == "x" && c.d == "y""#), None);
    }

    #[test]
    fn atom_rejects_leading_digit_identifier() {
        assert_eq!(match_atom(r#"1switch.power == "on""#), None);
        assert_eq!(match_atom(r#"switch1.2power == "on""#), None);
    }

    #[test]
    fn action_accepts_call() {
        assert_eq!(
            match_action("switch1.toggle()"),
            Some(ActionAtom {
                device: "switch1".to_string(),
                command: "toggle".to_string(),
            })
        );
    }

    #[test]
    fn action_accepts_surrounding_whitespace() {
        assert_eq!(
            match_action("  light_2.turnOn()  "),
            Some(ActionAtom {
                device: "light_2".to_string(),
                command: "turnOn".to_string(),
            })
        );
    }

    #[test]
    fn action_rejects_space_before_parens() {
        assert_eq!(match_action("switch1.toggle ()"), None);
    }

    #[test]
    fn action_rejects_arguments() {
        assert_eq!(match_action(r#"switch1.toggle("on")"#), None);
    }

    #[test]
    fn action_rejects_atom_text() {
        assert_eq!(match_action(r#"switch1.power == "on""#), None);
    }
}
