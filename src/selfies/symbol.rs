//! SELFIES symbol grammar.
//!
//! A string is a sequence of self-delimiting symbols: bracketed text or the
//! fragment separator `.`. Anything that does not parse as a known symbol is
//! a no-op.

use std::fmt;

use crate::atom::Chirality;
use crate::bond::{BondDirection, BondOrder};
use crate::element::Element;
use crate::valence::implicit_hydrogens;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(AtomSymbol),
    /// `[BranchL]`; `order` caps the branch budget for `[=BranchL]`,
    /// `[#BranchL]` and `[BranchL_k]`.
    Branch { order: Option<u8>, len: u8 },
    Ring { order: u8, len: u8 },
    Nop,
    Epsilon,
    Dot,
}

/// An atom symbol such as `[=13CH1+1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomSymbol {
    /// Requested order of the bond to the current atom.
    pub order: BondOrder,
    pub direction: BondDirection,
    pub isotope: u16,
    pub element: Element,
    pub chirality: Chirality,
    /// Explicit hydrogen count. `None` leaves hydrogens to the default
    /// valence rule.
    pub hydrogens: Option<u8>,
    pub charge: i8,
}

impl AtomSymbol {
    pub fn new(element: Element) -> Self {
        Self {
            order: BondOrder::Single,
            direction: BondDirection::None,
            isotope: 0,
            element,
            chirality: Chirality::None,
            hydrogens: None,
            charge: 0,
        }
    }

    /// Parse the text between the brackets.
    pub fn parse(inner: &str) -> Option<Self> {
        let mut rest = inner.strip_suffix("expl").unwrap_or(inner);

        let mut order = BondOrder::Single;
        if let Some(c) = rest.chars().next() {
            let prefix = match c {
                '-' => Some(BondOrder::Single),
                '=' => Some(BondOrder::Double),
                '#' => Some(BondOrder::Triple),
                _ => None,
            };
            if let Some(o) = prefix {
                order = o;
                rest = &rest[1..];
            }
        }
        let direction = match rest.chars().next() {
            Some('/') => BondDirection::Up,
            Some('\\') => BondDirection::Down,
            _ => BondDirection::None,
        };
        if direction != BondDirection::None {
            rest = &rest[1..];
        }

        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let isotope = if digits > 0 {
            rest[..digits].parse().ok()?
        } else {
            0
        };
        rest = &rest[digits..];

        let (element, len) = parse_element(rest)?;
        rest = &rest[len..];

        let chirality = if let Some(r) = rest.strip_prefix("@@") {
            rest = r;
            Chirality::Cw
        } else if let Some(r) = rest.strip_prefix('@') {
            rest = r;
            Chirality::Ccw
        } else {
            Chirality::None
        };

        let hydrogens = match rest.strip_prefix('H') {
            Some(r) => {
                let digits = r.len() - r.trim_start_matches(|c: char| c.is_ascii_digit()).len();
                rest = &r[digits..];
                Some(if digits > 0 { r[..digits].parse().ok()? } else { 1 })
            }
            None => None,
        };

        let charge = parse_charge(rest)?;

        Some(Self {
            order,
            direction,
            isotope,
            element,
            chirality,
            hydrogens,
            charge,
        })
    }

    /// Symbol-table key: element and charge, e.g. `[N+1]`.
    pub fn table_key(&self) -> String {
        let mut key = format!("[{}", self.element.symbol());
        push_charge(&mut key, self.charge);
        key.push(']');
        key
    }
}

impl fmt::Display for AtomSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::from("[");
        out.push_str(self.order.symbol());
        out.push_str(self.direction.symbol());
        if self.isotope != 0 {
            out.push_str(&self.isotope.to_string());
        }
        out.push_str(self.element.symbol());
        out.push_str(self.chirality.as_str());
        if let Some(h) = self.hydrogens {
            out.push('H');
            out.push_str(&h.to_string());
        }
        push_charge(&mut out, self.charge);
        out.push(']');
        f.write_str(&out)
    }
}

/// Hydrogens an atom written without an explicit count receives: neutral
/// atoms fill up to their next default valence, all others get none.
pub(crate) fn implied_hydrogens(element: Element, charge: i8, bond_sum: u8) -> u8 {
    if charge != 0 {
        return 0;
    }
    implicit_hydrogens(element, false, bond_sum)
}

fn push_charge(out: &mut String, charge: i8) {
    if charge > 0 {
        out.push_str(&format!("+{charge}"));
    } else if charge < 0 {
        out.push_str(&format!("-{}", charge.unsigned_abs()));
    }
}

fn parse_element(s: &str) -> Option<(Element, usize)> {
    let mut chars = s.chars();
    let first = chars.next().filter(char::is_ascii_uppercase)?;
    if let Some(second) = chars.next().filter(char::is_ascii_lowercase) {
        let two: String = [first, second].iter().collect();
        if let Some(e) = Element::from_symbol(&two) {
            return Some((e, 2));
        }
    }
    Element::from_symbol(&first.to_string()).map(|e| (e, 1))
}

/// Charges as `+1`, `-2`, `+`, `++` or `--`. The whole remainder must be
/// consumed.
fn parse_charge(s: &str) -> Option<i8> {
    let sign = match s.chars().next() {
        None => return Some(0),
        Some('+') => 1i8,
        Some('-') => -1i8,
        Some(_) => return None,
    };
    let body = &s[1..];
    if body.is_empty() {
        return Some(sign);
    }
    if body.chars().all(|c| c == s.as_bytes()[0] as char) {
        let magnitude = i8::try_from(body.len() + 1).ok()?;
        return Some(sign * magnitude);
    }
    if body.chars().all(|c| c.is_ascii_digit()) {
        let magnitude: i8 = body.parse().ok()?;
        return Some(sign * magnitude);
    }
    None
}

impl Token {
    /// Classify one raw symbol. Never fails: unknown text is [`Token::Nop`].
    pub fn parse(symbol: &str) -> Token {
        if symbol == "." {
            return Token::Dot;
        }
        let Some(inner) = symbol.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
            return Token::Nop;
        };
        match inner {
            "nop" => return Token::Nop,
            "epsilon" => return Token::Epsilon,
            _ => {}
        }
        if let Some(token) = parse_branch(inner).or_else(|| parse_ring(inner)) {
            return token;
        }
        AtomSymbol::parse(inner).map_or(Token::Nop, Token::Atom)
    }
}

fn split_order_prefix(s: &str) -> (Option<u8>, &str) {
    match s.chars().next() {
        Some('=') => (Some(2), &s[1..]),
        Some('#') => (Some(3), &s[1..]),
        _ => (None, s),
    }
}

fn parse_len(s: &str) -> Option<u8> {
    match s {
        "1" => Some(1),
        "2" => Some(2),
        "3" => Some(3),
        _ => None,
    }
}

fn parse_branch(inner: &str) -> Option<Token> {
    let (order, rest) = split_order_prefix(inner);
    let rest = rest.strip_prefix("Branch")?;
    let (len, cap) = match rest.split_once('_') {
        Some((len, cap)) if order.is_none() => (len, Some(parse_len(cap)?)),
        Some(_) => return None,
        None => (rest, order),
    };
    Some(Token::Branch {
        order: cap,
        len: parse_len(len)?,
    })
}

fn parse_ring(inner: &str) -> Option<Token> {
    let rest = inner.strip_prefix("Expl").unwrap_or(inner);
    let (order, rest) = split_order_prefix(rest);
    let rest = rest.strip_prefix("Ring")?;
    Some(Token::Ring {
        order: order.unwrap_or(1),
        len: parse_len(rest)?,
    })
}

/// Split a string into raw symbols: bracketed runs, `.`, and any other
/// single character. An unterminated bracket runs to the end of input.
pub fn split_selfies(s: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = s;
    std::iter::from_fn(move || {
        let c = rest.chars().next()?;
        let len = if c == '[' {
            rest.find(']').map_or(rest.len(), |i| i + 1)
        } else {
            c.len_utf8()
        };
        let (symbol, tail) = rest.split_at(len);
        rest = tail;
        Some(symbol)
    })
}

/// A raw symbol together with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol<'a> {
    pub text: &'a str,
    pub token: Token,
}

/// Split and classify, dropping every no-op.
///
/// Operand positions are counted over the result, so inserting `[nop]`
/// anywhere never changes how the rest of the string is read.
pub fn filter_nops(s: &str) -> Vec<Symbol<'_>> {
    split_selfies(s)
        .filter_map(|text| match Token::parse(text) {
            Token::Nop => None,
            token => Some(Symbol { text, token }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(s: &str) -> AtomSymbol {
        match Token::parse(s) {
            Token::Atom(a) => a,
            other => panic!("{s} parsed as {other:?}"),
        }
    }

    #[test]
    fn split_keeps_brackets_and_dots() {
        let parts: Vec<&str> = split_selfies("[C].[=O]x[Ring1").collect();
        assert_eq!(parts, vec!["[C]", ".", "[=O]", "x", "[Ring1"]);
    }

    #[test]
    fn reserved_symbols() {
        assert_eq!(Token::parse("[nop]"), Token::Nop);
        assert_eq!(Token::parse("[epsilon]"), Token::Epsilon);
        assert_eq!(Token::parse("."), Token::Dot);
        assert_eq!(Token::parse("x"), Token::Nop);
        assert_eq!(Token::parse("[Ring1"), Token::Nop);
        assert_eq!(Token::parse("[Xx]"), Token::Nop);
        assert_eq!(Token::parse("[c]"), Token::Nop);
    }

    #[test]
    fn branch_and_ring_forms() {
        assert_eq!(Token::parse("[Branch2]"), Token::Branch { order: None, len: 2 });
        assert_eq!(Token::parse("[=Branch1]"), Token::Branch { order: Some(2), len: 1 });
        assert_eq!(Token::parse("[Branch1_3]"), Token::Branch { order: Some(3), len: 1 });
        assert_eq!(Token::parse("[Ring3]"), Token::Ring { order: 1, len: 3 });
        assert_eq!(Token::parse("[#Ring1]"), Token::Ring { order: 3, len: 1 });
        assert_eq!(Token::parse("[Expl=Ring1]"), Token::Ring { order: 2, len: 1 });
        assert_eq!(Token::parse("[Branch4]"), Token::Nop);
        assert_eq!(Token::parse("[=Branch1_2]"), Token::Nop);
    }

    #[test]
    fn atom_fields() {
        let a = atom("[=13C@@H1+1]");
        assert_eq!(a.order, BondOrder::Double);
        assert_eq!(a.isotope, 13);
        assert_eq!(a.element, Element::C);
        assert_eq!(a.chirality, Chirality::Cw);
        assert_eq!(a.hydrogens, Some(1));
        assert_eq!(a.charge, 1);
        assert_eq!(a.to_string(), "[=13C@@H1+1]");
    }

    #[test]
    fn compatibility_spellings() {
        assert_eq!(atom("[NH4+expl]").to_string(), "[NH4+1]");
        assert_eq!(atom("[O--]").charge, -2);
        assert_eq!(atom("[Fe++]").charge, 2);
        assert_eq!(atom("[-C]").to_string(), "[C]");
        assert_eq!(atom("[CH]").hydrogens, Some(1));
        assert_eq!(atom("[/C]").direction, BondDirection::Up);
        assert_eq!(atom("[\\N]").direction, BondDirection::Down);
        assert_eq!(atom("[=/C]").to_string(), "[=/C]");
    }

    #[test]
    fn two_letter_elements() {
        assert_eq!(atom("[Cl]").element, Element::Cl);
        assert_eq!(atom("[Sc]").element, Element::Sc);
        assert_eq!(atom("[Co]").element, Element::Co);
        assert_eq!(atom("[H]").element, Element::H);
    }

    #[test]
    fn table_key_drops_everything_but_element_and_charge() {
        assert_eq!(atom("[=15N@H2-1]").table_key(), "[N-1]");
        assert_eq!(atom("[#C]").table_key(), "[C]");
    }

    #[test]
    fn filter_drops_nops() {
        let filtered = filter_nops("[nop][C]junk[Branch1][nop].[O]");
        let texts: Vec<&str> = filtered.iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["[C]", "[Branch1]", ".", "[O]"]);
    }
}
