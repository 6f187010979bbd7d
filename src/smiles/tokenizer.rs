use crate::atom::Chirality;
use crate::element::Element;
use crate::smiles::error::SmilesError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(AtomToken),
    Bond(BondToken),
    RingClosure {
        bond: Option<BondToken>,
        digit: u16,
        pos: usize,
    },
    OpenParen(usize),
    CloseParen(usize),
    Dot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomToken {
    pub element: Element,
    pub is_aromatic: bool,
    pub isotope: u16,
    pub chirality: Chirality,
    pub hcount: Option<u8>,
    pub charge: i8,
    pub is_bracket: bool,
    pub pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondToken {
    Single,
    Double,
    Triple,
    Aromatic,
    Up,
    Down,
}

// Two-letter symbols first so `Cl` wins over `C`.
const ORGANIC: [(&str, Element, bool); 16] = [
    ("Cl", Element::Cl, false),
    ("Br", Element::Br, false),
    ("B", Element::B, false),
    ("C", Element::C, false),
    ("N", Element::N, false),
    ("O", Element::O, false),
    ("P", Element::P, false),
    ("S", Element::S, false),
    ("F", Element::F, false),
    ("I", Element::I, false),
    ("b", Element::B, true),
    ("c", Element::C, true),
    ("n", Element::N, true),
    ("o", Element::O, true),
    ("p", Element::P, true),
    ("s", Element::S, true),
];

const AROMATIC_BRACKET: [(&str, Element); 8] = [
    ("se", Element::Se),
    ("te", Element::Te),
    ("as", Element::As),
    ("b", Element::B),
    ("c", Element::C),
    ("n", Element::N),
    ("o", Element::O),
    ("p", Element::P),
];

pub fn tokenize(input: &str) -> Result<Vec<Token>, SmilesError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let bond = match chars[i] {
            '-' => Some(BondToken::Single),
            '=' => Some(BondToken::Double),
            '#' => Some(BondToken::Triple),
            ':' => Some(BondToken::Aromatic),
            '/' => Some(BondToken::Up),
            '\\' => Some(BondToken::Down),
            _ => None,
        };
        if let Some(b) = bond {
            tokens.push(Token::Bond(b));
            i += 1;
            continue;
        }

        match chars[i] {
            ' ' | '\t' | '\r' | '\n' => i += 1,
            '[' => {
                let (tok, next) = parse_bracket_atom(&chars, i)?;
                tokens.push(Token::Atom(tok));
                i = next;
            }
            '(' => {
                tokens.push(Token::OpenParen(i));
                i += 1;
            }
            ')' => {
                tokens.push(Token::CloseParen(i));
                i += 1;
            }
            '.' => {
                tokens.push(Token::Dot(i));
                i += 1;
            }
            '%' => {
                let (digit, next) = parse_percent_ring(&chars, i)?;
                let bond = take_pending_bond(&mut tokens);
                tokens.push(Token::RingClosure { bond, digit, pos: i });
                i = next;
            }
            d @ '0'..='9' => {
                let bond = take_pending_bond(&mut tokens);
                tokens.push(Token::RingClosure {
                    bond,
                    digit: d as u16 - '0' as u16,
                    pos: i,
                });
                i += 1;
            }
            ch => {
                let (element, aromatic, len) = match_organic(&chars[i..])
                    .ok_or(SmilesError::UnexpectedChar { pos: i, ch })?;
                tokens.push(Token::Atom(AtomToken {
                    element,
                    is_aromatic: aromatic,
                    isotope: 0,
                    chirality: Chirality::None,
                    hcount: None,
                    charge: 0,
                    is_bracket: false,
                    pos: i,
                }));
                i += len;
            }
        }
    }

    Ok(tokens)
}

fn match_organic(rest: &[char]) -> Option<(Element, bool, usize)> {
    ORGANIC.iter().find_map(|&(sym, elem, aromatic)| {
        let len = sym.len();
        (rest.len() >= len && sym.chars().eq(rest[..len].iter().copied()))
            .then_some((elem, aromatic, len))
    })
}

fn take_pending_bond(tokens: &mut Vec<Token>) -> Option<BondToken> {
    if let Some(Token::Bond(b)) = tokens.last() {
        let b = *b;
        tokens.pop();
        return Some(b);
    }
    None
}

fn parse_percent_ring(chars: &[char], start: usize) -> Result<(u16, usize), SmilesError> {
    let err = SmilesError::UnexpectedChar {
        pos: start,
        ch: '%',
    };
    let i = start + 1;
    if chars.get(i) == Some(&'(') {
        let mut j = i + 1;
        let mut value: u16 = 0;
        while let Some(d) = chars.get(j).and_then(|c| c.to_digit(10)) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(d as u16))
                .ok_or(err.clone())?;
            j += 1;
        }
        if j == i + 1 || chars.get(j) != Some(&')') {
            return Err(err);
        }
        return Ok((value, j + 1));
    }
    match (
        chars.get(i).and_then(|c| c.to_digit(10)),
        chars.get(i + 1).and_then(|c| c.to_digit(10)),
    ) {
        (Some(d1), Some(d2)) => Ok(((d1 * 10 + d2) as u16, i + 2)),
        _ => Err(err),
    }
}

fn parse_bracket_atom(chars: &[char], start: usize) -> Result<(AtomToken, usize), SmilesError> {
    let mut i = start + 1;

    let isotope = parse_number(chars, &mut i).unwrap_or(0);
    let (element, is_aromatic) = parse_bracket_element(chars, &mut i, start)?;
    let chirality = parse_chirality(chars, &mut i);
    let hcount = parse_hcount(chars, &mut i);
    let charge = parse_charge(chars, &mut i, start)?;

    // Atom classes are accepted and discarded.
    if chars.get(i) == Some(&':') {
        i += 1;
        parse_number(chars, &mut i);
    }

    if chars.get(i) != Some(&']') {
        return Err(SmilesError::UnclosedBracket { pos: start });
    }

    Ok((
        AtomToken {
            element,
            is_aromatic,
            isotope,
            chirality,
            hcount: Some(hcount.unwrap_or(0)),
            charge,
            is_bracket: true,
            pos: start,
        },
        i + 1,
    ))
}

fn parse_number(chars: &[char], i: &mut usize) -> Option<u16> {
    let mut val: Option<u16> = None;
    while let Some(d) = chars.get(*i).and_then(|c| c.to_digit(10)) {
        val = Some(val.unwrap_or(0).saturating_mul(10).saturating_add(d as u16));
        *i += 1;
    }
    val
}

fn parse_bracket_element(
    chars: &[char],
    i: &mut usize,
    bracket_start: usize,
) -> Result<(Element, bool), SmilesError> {
    let rest = &chars[(*i).min(chars.len())..];
    if rest.is_empty() {
        return Err(SmilesError::UnclosedBracket { pos: bracket_start });
    }

    for &(pat, elem) in &AROMATIC_BRACKET {
        let len = pat.len();
        if rest.len() >= len && pat.chars().eq(rest[..len].iter().copied()) {
            *i += len;
            return Ok((elem, true));
        }
    }

    if rest.len() >= 2 && rest[0].is_ascii_uppercase() && rest[1].is_ascii_lowercase() {
        let sym: String = rest[..2].iter().collect();
        if let Some(e) = Element::from_symbol(&sym) {
            *i += 2;
            return Ok((e, false));
        }
    }
    if rest[0].is_ascii_uppercase() {
        if let Some(e) = Element::from_symbol(&rest[0].to_string()) {
            *i += 1;
            return Ok((e, false));
        }
    }

    Err(SmilesError::InvalidElement {
        pos: *i,
        text: rest[0].to_string(),
    })
}

fn parse_chirality(chars: &[char], i: &mut usize) -> Chirality {
    if chars.get(*i) != Some(&'@') {
        return Chirality::None;
    }
    *i += 1;
    if chars.get(*i) == Some(&'@') {
        *i += 1;
        Chirality::Cw
    } else {
        Chirality::Ccw
    }
}

fn parse_hcount(chars: &[char], i: &mut usize) -> Option<u8> {
    if chars.get(*i) != Some(&'H') {
        return None;
    }
    *i += 1;
    match chars.get(*i).and_then(|c| c.to_digit(10)) {
        Some(d) => {
            *i += 1;
            Some(d as u8)
        }
        None => Some(1),
    }
}

fn parse_charge(chars: &[char], i: &mut usize, bracket_start: usize) -> Result<i8, SmilesError> {
    let sign: i8 = match chars.get(*i) {
        Some('+') => 1,
        Some('-') => -1,
        _ => return Ok(0),
    };
    let sign_char = chars[*i];
    *i += 1;

    let err = SmilesError::InvalidCharge { pos: bracket_start };
    if chars.get(*i) == Some(&sign_char) {
        let mut magnitude: i8 = 1;
        while chars.get(*i) == Some(&sign_char) {
            magnitude = magnitude.checked_add(1).ok_or(err.clone())?;
            *i += 1;
        }
        return Ok(sign * magnitude);
    }

    let mut magnitude: Option<i8> = None;
    while let Some(d) = chars.get(*i).and_then(|c| c.to_digit(10)) {
        magnitude = Some(
            magnitude
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(d as i8))
                .ok_or(err.clone())?,
        );
        *i += 1;
    }
    Ok(sign * magnitude.unwrap_or(1))
}
