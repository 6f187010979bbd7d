use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::{Atom, Chirality};
use crate::bond::Bond;
use crate::element::Element;
use crate::graph_ops::{connected_components, spanning_tree};
use crate::mol::{reorient, written_order, Mol};
use crate::valence::{bond_valence, implicit_hydrogens};

/// Write a molecule as Kekulé SMILES.
///
/// Fragments are written in order of their lowest atom index, each rooted at
/// that atom, and joined with `.`. Neighbours are visited in bond creation
/// order, so a molecule read with [`from_smiles`](crate::smiles::from_smiles)
/// is written back with its atoms in the same order.
pub fn to_smiles(mol: &Mol<Atom, Bond>) -> String {
    connected_components(mol)
        .iter()
        .map(|component| write_fragment(mol, component[0]))
        .collect::<Vec<_>>()
        .join(".")
}

enum Step {
    Enter(NodeIndex),
    Open,
    Close,
}

fn write_fragment(mol: &Mol<Atom, Bond>, start: NodeIndex) -> String {
    let t = spanning_tree(mol, start);
    let mut out = String::new();
    let mut ring_ids: HashMap<EdgeIndex, usize> = HashMap::new();
    let mut in_use: BTreeSet<usize> = BTreeSet::new();
    let mut steps = vec![Step::Enter(start)];

    while let Some(step) = steps.pop() {
        let node = match step {
            Step::Open => {
                out.push('(');
                continue;
            }
            Step::Close => {
                out.push(')');
                continue;
            }
            Step::Enter(node) => node,
        };
        let parent = t.parent[node.index()];

        let mut written: Vec<NodeIndex> = Vec::with_capacity(4);
        if let Some((p, e)) = parent {
            write_bond(mol, e, p, node, &mut out);
            written.push(p);
        }

        let mut digits = String::new();
        let mut closed = Vec::new();
        for &(other, edge) in &t.ring_bonds[node.index()] {
            written.push(other);
            let id = match ring_ids.get(&edge) {
                Some(&id) => {
                    closed.push(id);
                    id
                }
                None => {
                    let id = lowest_free_id(&in_use);
                    in_use.insert(id);
                    ring_ids.insert(edge, id);
                    write_bond(mol, edge, node, other, &mut digits);
                    id
                }
            };
            digits.push_str(&ring_label(id));
        }
        for id in closed {
            in_use.remove(&id);
        }

        let kids: Vec<NodeIndex> = t.children[node.index()].iter().map(|&(c, _)| c).collect();
        written.extend(kids.iter().copied());

        let chirality = written_chirality(mol, node, &written, parent.is_some());
        write_atom(mol, node, chirality, &mut out);
        out.push_str(&digits);

        if let Some((&last, rest)) = kids.split_last() {
            steps.push(Step::Enter(last));
            for &child in rest.iter().rev() {
                steps.push(Step::Close);
                steps.push(Step::Enter(child));
                steps.push(Step::Open);
            }
        }
    }

    out
}

fn lowest_free_id(in_use: &BTreeSet<usize>) -> usize {
    let mut id = 1;
    while in_use.contains(&id) {
        id += 1;
    }
    id
}

fn ring_label(id: usize) -> String {
    match id {
        0..=9 => id.to_string(),
        10..=99 => format!("%{id}"),
        _ => format!("%({id})"),
    }
}

/// Bond symbol for `edge` written from `from` towards `to`.
fn write_bond(mol: &Mol<Atom, Bond>, edge: EdgeIndex, from: NodeIndex, to: NodeIndex, out: &mut String) {
    let bond = mol.bond(edge);
    let direction = match mol.bond_endpoints(edge) {
        Some((a, b)) if (a, b) == (to, from) => bond.direction.flip(),
        _ => bond.direction,
    };
    out.push_str(bond.order.symbol());
    out.push_str(direction.symbol());
}

fn written_chirality(
    mol: &Mol<Atom, Bond>,
    node: NodeIndex,
    written: &[NodeIndex],
    has_predecessor: bool,
) -> Chirality {
    let atom = mol.atom(node);
    if atom.chirality == Chirality::None {
        return Chirality::None;
    }
    let reference = mol.stereo_neighbors(node);
    let order = written_order(written, has_predecessor, atom.hydrogen_count > 0);
    reorient(atom.chirality, &reference, &order)
}

fn write_atom(mol: &Mol<Atom, Bond>, node: NodeIndex, chirality: Chirality, out: &mut String) {
    let atom = mol.atom(node);
    let elem = Element::from_atomic_num(atom.atomic_num);

    match elem {
        Some(e) if can_write_bare(mol, node, e) => out.push_str(e.symbol()),
        _ => write_bracket_atom(atom, elem, chirality, out),
    }
}

fn can_write_bare(mol: &Mol<Atom, Bond>, node: NodeIndex, elem: Element) -> bool {
    let atom = mol.atom(node);
    if !elem.is_organic_subset() {
        return false;
    }
    if atom.isotope != 0 || atom.formal_charge != 0 || atom.chirality != Chirality::None {
        return false;
    }
    atom.hydrogen_count == implicit_hydrogens(elem, false, bond_valence(mol, node))
}

fn write_bracket_atom(atom: &Atom, elem: Option<Element>, chirality: Chirality, out: &mut String) {
    out.push('[');
    if atom.isotope != 0 {
        out.push_str(&atom.isotope.to_string());
    }
    out.push_str(elem.map(|e| e.symbol()).unwrap_or("*"));
    out.push_str(chirality.as_str());

    if atom.hydrogen_count > 0 {
        out.push('H');
        if atom.hydrogen_count > 1 {
            out.push_str(&atom.hydrogen_count.to_string());
        }
    }

    if atom.formal_charge > 0 {
        out.push('+');
        if atom.formal_charge > 1 {
            out.push_str(&atom.formal_charge.to_string());
        }
    } else if atom.formal_charge < 0 {
        out.push('-');
        if atom.formal_charge < -1 {
            out.push_str(&atom.formal_charge.unsigned_abs().to_string());
        }
    }

    out.push(']');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::BondOrder;
    use crate::smiles::from_smiles;

    fn rewrite(smiles: &str) -> String {
        to_smiles(&from_smiles(smiles).unwrap())
    }

    fn count_double_bonds(mol: &Mol<Atom, Bond>) -> usize {
        mol.bonds()
            .filter(|&e| mol.bond(e).order == BondOrder::Double)
            .count()
    }

    #[test]
    fn simple_molecules_unchanged() {
        for smiles in [
            "C",
            "CC",
            "C=C",
            "C#C",
            "CCO",
            "CC(C)C",
            "CC(=O)O",
            "C1CCCCC1",
            "[NH4+]",
            "[O-2]",
            "[13CH4]",
            "[2H]",
            "[Na+].[Cl-]",
            "[Fe]",
            "S(F)(F)(F)(F)(F)F",
        ] {
            assert_eq!(rewrite(smiles), smiles, "{smiles}");
        }
    }

    #[test]
    fn charge_forms_normalized() {
        assert_eq!(rewrite("[O--]"), "[O-2]");
        assert_eq!(rewrite("[Fe+++]"), "[Fe+3]");
    }

    #[test]
    fn empty_mol() {
        assert_eq!(to_smiles(&Mol::new()), "");
    }

    #[test]
    fn benzene_written_kekule() {
        let smiles = rewrite("c1ccccc1");
        assert!(!smiles.contains('c'));
        let mol = from_smiles(&smiles).unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(count_double_bonds(&mol), 3);
    }

    #[test]
    fn pyrrole_nitrogen_is_bare() {
        assert!(rewrite("[nH]1cccc1").starts_with("N1"));
    }

    #[test]
    fn ring_ids_are_reused() {
        assert_eq!(rewrite("C1CC1C1CC1"), "C1CC1C1CC1");
        assert_eq!(rewrite("C1CC2CC12"), "C1CC2CC12");
    }

    #[test]
    fn ring_labels() {
        assert_eq!(ring_label(7), "7");
        assert_eq!(ring_label(12), "%12");
        assert_eq!(ring_label(123), "%(123)");
    }

    #[test]
    fn bond_directions_round_trip() {
        assert_eq!(rewrite("F/C=C/F"), "F/C=C/F");
        assert_eq!(rewrite("F/C=C\\F"), "F/C=C\\F");
        assert_eq!(rewrite("C(\\F)=C/F"), "C(\\F)=C/F");
    }

    #[test]
    fn tetrahedral_round_trip() {
        for smiles in ["F[C@H](Cl)Br", "F[C@@H](Cl)Br", "N[C@@H](C)C(=O)O", "F[C@](Cl)(Br)I"] {
            assert_eq!(rewrite(smiles), smiles, "{smiles}");
        }
    }

    #[test]
    fn chirality_survives_ring_digits() {
        let once = rewrite("[C@@H]1(F)CCC1");
        let twice = rewrite(&once);
        assert_eq!(once, twice);
        let a = from_smiles("[C@@H]1(F)CCC1").unwrap();
        let b = from_smiles(&once).unwrap();
        assert_eq!(
            a.atom(NodeIndex::new(0)).chirality,
            b.atom(NodeIndex::new(0)).chirality
        );
    }
}
