//! Kekulization assigns alternating single and double bonds to aromatic
//! systems read from SMILES.
//!
//! The input is a `Mol<Atom, SmilesBond>` whose aromatic bonds come from
//! lowercase atoms (e.g. `c1ccccc1`). The output is a `Mol<Atom, Bond>` with
//! concrete orders, built by augmenting-path matching over the atoms that
//! still need a double bond. Atoms and bonds keep their indices, so chirality
//! tags stay valid across the conversion.

use std::collections::{HashSet, VecDeque};

use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder, SmilesBond, SmilesBondOrder};
use crate::element::Element;
use crate::mol::Mol;

/// Error returned when no valid Kekulé structure exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KekulizeError {
    /// The given atoms could not be assigned a double bond.
    #[error("cannot kekulize aromatic system: unmatched atoms {}", format_atoms(.0))]
    Unkekulizable(Vec<NodeIndex>),
}

fn format_atoms(atoms: &[NodeIndex]) -> String {
    let listed: Vec<String> = atoms.iter().map(|a| a.index().to_string()).collect();
    format!("[{}]", listed.join(", "))
}

/// Convert a molecule with aromatic bonds into one with explicit Kekulé bonds.
pub fn kekulize(mol: Mol<Atom, SmilesBond>) -> Result<Mol<Atom, Bond>, KekulizeError> {
    let n = mol.atom_count();

    let mut aromatic_adj: Vec<Vec<(NodeIndex, EdgeIndex)>> = vec![vec![]; n];
    for e in mol.bonds() {
        if mol.bond(e).order != SmilesBondOrder::Aromatic {
            continue;
        }
        if let Some((a, b)) = mol.bond_endpoints(e) {
            aromatic_adj[a.index()].push((b, e));
            aromatic_adj[b.index()].push((a, e));
        }
    }

    let needs_double: Vec<bool> = mol
        .atoms()
        .map(|node| !aromatic_adj[node.index()].is_empty() && needs_double_bond(&mol, node))
        .collect();

    let mut matched_edge: Vec<Option<EdgeIndex>> = vec![None; n];
    for start in mol.atoms() {
        if needs_double[start.index()] && matched_edge[start.index()].is_none() {
            augment(&mol, &aromatic_adj, &needs_double, &mut matched_edge, start);
        }
    }

    let unmatched: Vec<NodeIndex> = mol
        .atoms()
        .filter(|v| needs_double[v.index()] && matched_edge[v.index()].is_none())
        .collect();
    if !unmatched.is_empty() {
        return Err(KekulizeError::Unkekulizable(unmatched));
    }

    let doubles: HashSet<EdgeIndex> = matched_edge.iter().filter_map(|e| *e).collect();

    let mut result = Mol::new();
    for node in mol.atoms() {
        result.add_atom(mol.atom(node).clone());
    }
    for edge in mol.bonds() {
        let Some((a, b)) = mol.bond_endpoints(edge) else {
            continue;
        };
        let smiles_bond = mol.bond(edge);
        let order = match smiles_bond.order {
            SmilesBondOrder::Aromatic if doubles.contains(&edge) => BondOrder::Double,
            SmilesBondOrder::Aromatic | SmilesBondOrder::Implicit | SmilesBondOrder::Single => {
                BondOrder::Single
            }
            SmilesBondOrder::Double => BondOrder::Double,
            SmilesBondOrder::Triple => BondOrder::Triple,
        };
        result.add_bond(
            a,
            b,
            Bond {
                order,
                direction: smiles_bond.direction,
            },
        );
    }

    Ok(result)
}

fn needs_double_bond(mol: &Mol<Atom, SmilesBond>, node: NodeIndex) -> bool {
    let atom = mol.atom(node);
    let Some(elem) = Element::from_atomic_num(atom.atomic_num) else {
        return false;
    };
    let bond_sum: u8 = mol
        .bonds_of(node)
        .map(|e| mol.bond(e).order.valence())
        .fold(0, u8::saturating_add);
    let used = bond_sum.saturating_add(atom.hydrogen_count);
    match target_valence(elem, used, atom.formal_charge) {
        Some(tv) => {
            let gap = tv - used;
            gap == 1 || (gap == 2 && atom.hydrogen_count == 0 && atom.formal_charge != 0)
        }
        None => false,
    }
}

fn target_valence(elem: Element, used: u8, formal_charge: i8) -> Option<u8> {
    elem.default_valences()
        .iter()
        .filter_map(|&v| {
            let adjusted = v as i16 + formal_charge as i16;
            (adjusted > 0).then_some(adjusted as u8)
        })
        .find(|&v| v >= used)
}

fn augment(
    mol: &Mol<Atom, SmilesBond>,
    aromatic_adj: &[Vec<(NodeIndex, EdgeIndex)>],
    needs_double: &[bool],
    matched_edge: &mut [Option<EdgeIndex>],
    start: NodeIndex,
) -> bool {
    let n = mol.atom_count();
    let mut prev: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();

    visited[start.index()] = true;
    queue.push_back(start);

    while let Some(u) = queue.pop_front() {
        for &(v, e) in &aromatic_adj[u.index()] {
            if !needs_double[v.index()] || visited[v.index()] {
                continue;
            }
            if Some(e) == matched_edge[u.index()] {
                continue;
            }
            visited[v.index()] = true;
            prev[v.index()] = Some((u, e));

            let Some(matched_e) = matched_edge[v.index()] else {
                flip_path(matched_edge, &prev, start, v);
                return true;
            };
            let Some(w) = mol.other_end(matched_e, v) else {
                continue;
            };
            if !visited[w.index()] {
                visited[w.index()] = true;
                prev[w.index()] = Some((v, matched_e));
                queue.push_back(w);
            }
        }
    }
    false
}

fn flip_path(
    matched_edge: &mut [Option<EdgeIndex>],
    prev: &[Option<(NodeIndex, EdgeIndex)>],
    start: NodeIndex,
    end: NodeIndex,
) {
    let mut cur = end;
    let mut is_new_match = true;
    while cur != start {
        let Some((p, e)) = prev[cur.index()] else {
            break;
        };
        if is_new_match {
            matched_edge[cur.index()] = Some(e);
            matched_edge[p.index()] = Some(e);
        }
        is_new_match = !is_new_match;
        cur = p;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::BondDirection;
    use crate::smiles::parse_smiles;

    fn count_double_bonds(mol: &Mol<Atom, Bond>) -> usize {
        mol.bonds()
            .filter(|&e| mol.bond(e).order == BondOrder::Double)
            .count()
    }

    fn at_most_one_double_per_atom(mol: &Mol<Atom, Bond>) -> bool {
        mol.atoms().all(|node| {
            mol.bonds_of(node)
                .filter(|&e| mol.bond(e).order == BondOrder::Double)
                .count()
                <= 1
        })
    }

    #[test]
    fn benzene() {
        let mol = kekulize(parse_smiles("c1ccccc1").unwrap()).unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
        assert_eq!(count_double_bonds(&mol), 3);
        assert!(at_most_one_double_per_atom(&mol));
        for node in mol.atoms() {
            assert_eq!(mol.atom(node).hydrogen_count, 1);
        }
    }

    #[test]
    fn naphthalene() {
        let mol = kekulize(parse_smiles("c1ccc2ccccc2c1").unwrap()).unwrap();
        assert_eq!(count_double_bonds(&mol), 5);
        assert!(at_most_one_double_per_atom(&mol));
    }

    #[test]
    fn pyrrole_nitrogen_stays_single() {
        let mol = kekulize(parse_smiles("[nH]1cccc1").unwrap()).unwrap();
        assert_eq!(count_double_bonds(&mol), 2);
        let n = NodeIndex::new(0);
        assert!(mol
            .bonds_of(n)
            .all(|e| mol.bond(e).order == BondOrder::Single));
    }

    #[test]
    fn pyridinium() {
        let mol = kekulize(parse_smiles("C[n+]1ccccc1").unwrap()).unwrap();
        assert_eq!(count_double_bonds(&mol), 3);
    }

    #[test]
    fn odd_ring_unkekulizable() {
        let err = kekulize(parse_smiles("c1cccc1").unwrap()).unwrap_err();
        let KekulizeError::Unkekulizable(atoms) = &err;
        assert!(!atoms.is_empty());
        assert!(err.to_string().starts_with("cannot kekulize aromatic system"));
    }

    #[test]
    fn non_aromatic_passthrough_keeps_directions() {
        let mol = kekulize(parse_smiles("F/C=C/F").unwrap()).unwrap();
        assert_eq!(count_double_bonds(&mol), 1);
        let first = mol.bond_between(NodeIndex::new(0), NodeIndex::new(1)).unwrap();
        assert_eq!(mol.bond(first).direction, BondDirection::Up);
    }
}
