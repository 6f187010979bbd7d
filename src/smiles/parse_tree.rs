use std::collections::HashMap;

use crate::atom::Chirality;
use crate::element::Element;
use crate::smiles::error::SmilesError;
use crate::smiles::tokenizer::{AtomToken, BondToken, Token};

#[derive(Debug, Clone)]
pub struct ParseAtom {
    pub element: Element,
    pub is_aromatic: bool,
    pub isotope: u16,
    pub chirality: Chirality,
    pub hcount: Option<u8>,
    pub charge: i8,
    pub is_bracket: bool,
    /// Whether the atom was reached from a preceding atom in its chain.
    pub has_predecessor: bool,
    /// Neighbours in written order. Ring-opening digits reserve their slot
    /// here, so the list matches what a chirality tag refers to.
    pub neighbors: Vec<usize>,
}

/// A bond in creation order. `bond` is read from `from` towards `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseBond {
    pub from: usize,
    pub to: usize,
    pub bond: Option<BondToken>,
}

#[derive(Debug, Clone, Default)]
pub struct ParseTree {
    pub atoms: Vec<ParseAtom>,
    pub bonds: Vec<ParseBond>,
}

struct RingOpen {
    atom: usize,
    slot: usize,
    bond: Option<BondToken>,
}

pub fn build_parse_tree(tokens: &[Token]) -> Result<ParseTree, SmilesError> {
    let mut atoms: Vec<ParseAtom> = Vec::new();
    let mut slots: Vec<Vec<Option<usize>>> = Vec::new();
    let mut bonds: Vec<ParseBond> = Vec::new();
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut current: Option<usize> = None;
    let mut pending_bond: Option<BondToken> = None;
    let mut ring_opens: HashMap<u16, RingOpen> = HashMap::new();

    for token in tokens {
        match token {
            Token::Atom(atom_tok) => {
                let idx = atoms.len();
                atoms.push(parse_atom_from_token(atom_tok));
                slots.push(Vec::new());

                if let Some(cur) = current {
                    let bond = pending_bond.take();
                    slots[cur].push(Some(idx));
                    slots[idx].push(Some(cur));
                    atoms[idx].has_predecessor = true;
                    bonds.push(ParseBond {
                        from: cur,
                        to: idx,
                        bond,
                    });
                } else {
                    pending_bond = None;
                }

                current = Some(idx);
            }
            Token::Bond(b) => {
                pending_bond = Some(*b);
            }
            Token::RingClosure { bond, digit, pos } => {
                let cur = current.ok_or(SmilesError::InvalidRingBond {
                    digit: *digit,
                    pos: *pos,
                })?;
                let bond = bond.or(pending_bond.take());

                let Some(open) = ring_opens.remove(digit) else {
                    ring_opens.insert(
                        *digit,
                        RingOpen {
                            atom: cur,
                            slot: slots[cur].len(),
                            bond,
                        },
                    );
                    slots[cur].push(None);
                    continue;
                };

                if open.atom == cur {
                    return Err(SmilesError::InvalidRingBond {
                        digit: *digit,
                        pos: *pos,
                    });
                }
                if bonds.iter().any(|b| {
                    (b.from == open.atom && b.to == cur) || (b.from == cur && b.to == open.atom)
                }) {
                    return Err(SmilesError::DuplicateBond {
                        a: open.atom,
                        b: cur,
                    });
                }

                // A direction written at the closing digit reads from the
                // closing atom back to the opening one.
                let ring_bond = match (open.bond, bond.map(flip_direction)) {
                    (None, None) => None,
                    (Some(b), None) | (None, Some(b)) => Some(b),
                    (Some(b1), Some(b2)) if b1 == b2 => Some(b1),
                    _ => return Err(SmilesError::RingBondConflict { digit: *digit }),
                };

                slots[open.atom][open.slot] = Some(cur);
                slots[cur].push(Some(open.atom));
                bonds.push(ParseBond {
                    from: open.atom,
                    to: cur,
                    bond: ring_bond,
                });
            }
            Token::OpenParen(pos) => {
                let cur = current.ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                stack.push((cur, *pos));
            }
            Token::CloseParen(pos) => {
                let (cur, _) = stack.pop().ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                current = Some(cur);
                pending_bond = None;
            }
            Token::Dot(_) => {
                current = None;
                pending_bond = None;
            }
        }
    }

    if let Some(&(_, pos)) = stack.last() {
        return Err(SmilesError::UnmatchedParen { pos });
    }

    if let Some(digit) = ring_opens.keys().min() {
        return Err(SmilesError::UnclosedRing { digit: *digit });
    }

    for (atom, atom_slots) in atoms.iter_mut().zip(slots) {
        atom.neighbors = atom_slots.into_iter().flatten().collect();
    }

    Ok(ParseTree { atoms, bonds })
}

fn flip_direction(bond: BondToken) -> BondToken {
    match bond {
        BondToken::Up => BondToken::Down,
        BondToken::Down => BondToken::Up,
        other => other,
    }
}

fn parse_atom_from_token(tok: &AtomToken) -> ParseAtom {
    ParseAtom {
        element: tok.element,
        is_aromatic: tok.is_aromatic,
        isotope: tok.isotope,
        chirality: tok.chirality,
        hcount: tok.hcount,
        charge: tok.charge,
        is_bracket: tok.is_bracket,
        has_predecessor: false,
        neighbors: Vec::new(),
    }
}
