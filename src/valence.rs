//! Valence rules: implicit hydrogen derivation shared by both notations, and
//! the validity check used to accept or reject decoded molecules.

use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::element::Element;
use crate::mol::Mol;
use crate::traits::{HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("atom {} ({}): valence {actual_valence} not in {allowed_valences:?}", atom_idx.index(), symbol_of(*atomic_num))]
pub struct ValenceError {
    pub atom_idx: NodeIndex,
    pub atomic_num: u8,
    pub actual_valence: u8,
    pub allowed_valences: Vec<u8>,
}

fn symbol_of(atomic_num: u8) -> &'static str {
    Element::from_atomic_num(atomic_num)
        .map(|e| e.symbol())
        .unwrap_or("?")
}

/// Hydrogens a bare SMILES atom receives given the valence its bonds use.
///
/// The target is the smallest default valence not below `bond_sum`; aromatic
/// atoms give one hydrogen up to the aromatic system.
pub fn implicit_hydrogens(element: Element, is_aromatic: bool, bond_sum: u8) -> u8 {
    let Some(target) = element
        .default_valences()
        .iter()
        .copied()
        .find(|&v| v >= bond_sum)
    else {
        return 0;
    };
    let h = target - bond_sum;
    if is_aromatic && h > 0 {
        h - 1
    } else {
        h
    }
}

/// Sum of bond orders around `atom`.
pub fn bond_valence<A, B: HasBondOrder>(mol: &Mol<A, B>, atom: NodeIndex) -> u8 {
    mol.bonds_of(atom)
        .map(|ei| mol.bond(ei).bond_order().valence())
        .fold(0u8, u8::saturating_add)
}

pub fn total_valence<A, B>(mol: &Mol<A, B>, atom: NodeIndex) -> u8
where
    A: HasHydrogenCount,
    B: HasBondOrder,
{
    bond_valence(mol, atom).saturating_add(mol.atom(atom).hydrogen_count())
}

/// Check that no neutral atom exceeds its largest default valence.
///
/// Under-valent atoms are radicals and pass. Charged atoms and elements
/// without default valences are accepted as-is.
pub fn check_valence<A, B>(mol: &Mol<A, B>) -> Result<(), Vec<ValenceError>>
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    let errors: Vec<ValenceError> = mol
        .atoms()
        .filter_map(|idx| {
            let atom = mol.atom(idx);
            if atom.formal_charge() != 0 {
                return None;
            }
            let elem = Element::from_atomic_num(atom.atomic_num())?;
            let allowed = elem.default_valences();
            let max = elem.max_default_valence()?;
            let v = total_valence(mol, idx);
            if v <= max {
                return None;
            }
            Some(ValenceError {
                atom_idx: idx,
                atomic_num: atom.atomic_num(),
                actual_valence: v,
                allowed_valences: allowed.to_vec(),
            })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
