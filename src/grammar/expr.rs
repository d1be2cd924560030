//! Boolean trigger expressions.
//!
//! A trigger is a flat, left-associative chain of atoms joined by connectives
//! drawn from the schema's `bool_ops` set. No precedence, no parentheses.
//!
//! Matching runs in two steps:
//! 1. `tokenize` scans left to right, emitting connective tokens wherever the
//!    input matches one, and flushing the accumulated text between them
//!    (trimmed, only if non-empty) as atom tokens.
//! 2. `scan_expr` walks the token stream with a two-state expectation
//!    machine and reports, in scan order, the atom texts to check plus any
//!    grammar faults.

/// Token produced by the connective scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(String),
    Connective(String),
}

/// One outcome of the expectation walk, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprItem {
    /// Atom text, ready for the atom matcher and schema checks.
    Atom(String),
    /// A connective arrived where an atom was expected.
    MisplacedConnective(String),
    /// The expression ended right after a connective.
    TrailingConnective,
}

/// Split `expr` into atom and connective tokens.
///
/// The connective set comes from the caller; nothing here is hard-coded to
/// `&&`/`||`.
pub fn tokenize(expr: &str, connectives: &[String]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut rest = expr;

    while let Some(ch) = rest.chars().next() {
        match connectives
            .iter()
            .find(|c| !c.is_empty() && rest.starts_with(c.as_str()))
        {
            Some(conn) => {
                flush(&mut buf, &mut tokens);
                tokens.push(Token::Connective(conn.clone()));
                rest = &rest[conn.len()..];
            }
            None => {
                buf.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    flush(&mut buf, &mut tokens);

    tokens
}

fn flush(buf: &mut String, tokens: &mut Vec<Token>) {
    let atom = buf.trim();
    if !atom.is_empty() {
        tokens.push(Token::Atom(atom.to_string()));
    }
    buf.clear();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Atom,
    Connective,
}

/// Tokenize `expr` and walk the tokens, yielding atoms and faults in order.
///
/// An empty expression yields nothing.
pub fn scan_expr(expr: &str, connectives: &[String]) -> Vec<ExprItem> {
    let tokens = tokenize(expr, connectives);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut expect = Expect::Atom;

    for token in tokens {
        match (expect, token) {
            (Expect::Atom, Token::Atom(text)) => {
                items.push(ExprItem::Atom(text));
                expect = Expect::Connective;
            }
            (Expect::Atom, Token::Connective(op)) => {
                // Doubled or leading connective. Keep expecting an atom so
                // the rest of the chain is still checked.
                items.push(ExprItem::MisplacedConnective(op));
            }
            (Expect::Connective, Token::Connective(_)) => {
                expect = Expect::Atom;
            }
            (Expect::Connective, Token::Atom(text)) => {
                // The tokenizer only flushes an atom at a connective
                // boundary, so two atoms never arrive back to back.
                items.push(ExprItem::Atom(text));
            }
        }
    }

    // Ending while an atom is still expected means the last token was a
    // connective.
    if expect == Expect::Atom {
        items.push(ExprItem::TrailingConnective);
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn conns() -> Vec<String> {
        vec!["&&".to_string(), "||".to_string()]
    }

    #[test]
    fn single_atom_passes_through() {
        assert_eq!(
            scan_expr(r#"a.b == "x""#, &conns()),
            vec![ExprItem::Atom(r#"a.b == "x""#.to_string())]
        );
    }

    #[test]
    fn chain_yields_atoms_in_order() {
        assert_eq!(
            scan_expr(r#"a.b == "x" && c.d != "y" || e.f == "z""#, &conns()),
            vec![
                ExprItem::Atom(r#"a.b == "x""#.to_string()),
                ExprItem::Atom(r#"c.d != "y""#.to_string()),
                ExprItem::Atom(r#"e.f == "z""#.to_string()),
            ]
        );
    }

    #[test]
    fn doubled_connective_is_one_misplaced_fault() {
        assert_eq!(
            scan_expr(r#"a.b == "x" || || c.d == "y""#, &conns()),
            vec![
                ExprItem::Atom(r#"a.b == "x""#.to_string()),
                ExprItem::MisplacedConnective("||".to_string()),
                ExprItem::Atom(r#"c.d == "y""#.to_string()),
            ]
        );
    }

    #[test]
    fn trailing_connective_is_flagged_once() {
        assert_eq!(
            scan_expr(r#"a.b == "x" &&"#, &conns()),
            vec![
                ExprItem::Atom(r#"a.b == "x""#.to_string()),
                ExprItem::TrailingConnective,
            ]
        );
    }

    #[test]
    fn leading_connective_is_misplaced() {
        assert_eq!(
            scan_expr(r#"&& a.b == "x""#, &conns()),
            vec![
                ExprItem::MisplacedConnective("&&".to_string()),
                ExprItem::Atom(r#"a.b == "x""#.to_string()),
            ]
        );
    }

    #[test]
    fn empty_expression_yields_nothing() {
        assert_eq!(scan_expr("", &conns()), Vec::<ExprItem>::new());
        assert_eq!(scan_expr("   ", &conns()), Vec::<ExprItem>::new());
    }

    #[test]
    fn connectives_only_yield_faults() {
        assert_eq!(
            scan_expr("&& ||", &conns()),
            vec![
                ExprItem::MisplacedConnective("&&".to_string()),
                ExprItem::MisplacedConnective("||".to_string()),
                ExprItem::TrailingConnective,
            ]
        );
    }

    #[test]
    fn connective_set_comes_from_caller() {
        let ops = vec!["AND".to_string()];
        assert_eq!(
            scan_expr(r#"a.b == "x" AND c.d == "y""#, &ops),
            vec![
                ExprItem::Atom(r#"a.b == "x""#.to_string()),
                ExprItem::Atom(r#"c.d == "y""#.to_string()),
            ]
        );
        // With the default set, "AND" is just part of the surrounding text.
        assert_eq!(
            scan_expr(r#"a.b == "x" AND c.d == "y""#, &conns()),
            vec![ExprItem::Atom(r#"a.b == "x" AND c.d == "y""#.to_string())]
        );
    }

    #[test]
    fn tokenizer_trims_atom_whitespace() {
        assert_eq!(
            tokenize("  a && b  ", &conns()),
            vec![
                Token::Atom("a".to_string()),
                Token::Connective("&&".to_string()),
                Token::Atom("b".to_string()),
            ]
        );
    }
}
