use petgraph::graph::NodeIndex;

use crate::atom::{Atom, Chirality};
use crate::bond::{BondDirection, SmilesBond, SmilesBondOrder};
use crate::mol::{reorient, written_order, Mol};
use crate::smiles::parse_tree::{ParseAtom, ParseTree};
use crate::smiles::tokenizer::BondToken;
use crate::valence::implicit_hydrogens;

pub fn build_mol(tree: &ParseTree) -> Mol<Atom, SmilesBond> {
    let mut mol = Mol::new();
    let node_indices: Vec<NodeIndex> = tree
        .atoms
        .iter()
        .map(|parse_atom| {
            mol.add_atom(Atom {
                atomic_num: parse_atom.element.atomic_num(),
                formal_charge: parse_atom.charge,
                isotope: parse_atom.isotope,
                hydrogen_count: 0,
                is_aromatic: parse_atom.is_aromatic,
                chirality: Chirality::None,
            })
        })
        .collect();

    for pb in &tree.bonds {
        let (order, direction) = resolve_bond(
            pb.bond,
            tree.atoms[pb.from].is_aromatic,
            tree.atoms[pb.to].is_aromatic,
        );
        mol.add_bond(
            node_indices[pb.from],
            node_indices[pb.to],
            SmilesBond { order, direction },
        );
    }

    for (i, parse_atom) in tree.atoms.iter().enumerate() {
        let h = hydrogen_count(&mol, node_indices[i], parse_atom);
        mol.atom_mut(node_indices[i]).hydrogen_count = h;
    }

    for (i, parse_atom) in tree.atoms.iter().enumerate() {
        if parse_atom.chirality == Chirality::None {
            continue;
        }
        let idx = node_indices[i];
        let neighbors: Vec<NodeIndex> = parse_atom.neighbors.iter().map(|&n| node_indices[n]).collect();
        let written = written_order(
            &neighbors,
            parse_atom.has_predecessor,
            mol.atom(idx).hydrogen_count > 0,
        );
        let reference = mol.stereo_neighbors(idx);
        mol.atom_mut(idx).chirality = reorient(parse_atom.chirality, &written, &reference);
    }

    mol
}

fn resolve_bond(
    bond_tok: Option<BondToken>,
    from_aromatic: bool,
    to_aromatic: bool,
) -> (SmilesBondOrder, BondDirection) {
    match bond_tok {
        Some(BondToken::Single) => (SmilesBondOrder::Single, BondDirection::None),
        Some(BondToken::Double) => (SmilesBondOrder::Double, BondDirection::None),
        Some(BondToken::Triple) => (SmilesBondOrder::Triple, BondDirection::None),
        Some(BondToken::Aromatic) => (SmilesBondOrder::Aromatic, BondDirection::None),
        Some(BondToken::Up) => (SmilesBondOrder::Single, BondDirection::Up),
        Some(BondToken::Down) => (SmilesBondOrder::Single, BondDirection::Down),
        None if from_aromatic && to_aromatic => (SmilesBondOrder::Aromatic, BondDirection::None),
        None => (SmilesBondOrder::Implicit, BondDirection::None),
    }
}

fn hydrogen_count(mol: &Mol<Atom, SmilesBond>, node: NodeIndex, parse_atom: &ParseAtom) -> u8 {
    if parse_atom.is_bracket {
        return parse_atom.hcount.unwrap_or(0);
    }
    let bond_sum = mol
        .bonds_of(node)
        .map(|e| mol.bond(e).order.valence())
        .fold(0u8, u8::saturating_add);
    implicit_hydrogens(parse_atom.element, parse_atom.is_aromatic, bond_sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_tree::build_parse_tree;
    use crate::smiles::tokenizer::tokenize;

    fn parse(s: &str) -> Mol<Atom, SmilesBond> {
        let tokens = tokenize(s).unwrap();
        let tree = build_parse_tree(&tokens).unwrap();
        build_mol(&tree)
    }

    #[test]
    fn methane_h_count() {
        let mol = parse("C");
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(mol.atom(NodeIndex::new(0)).hydrogen_count, 4);
    }

    #[test]
    fn ethene_h_counts() {
        let mol = parse("C=C");
        assert_eq!(mol.atom(NodeIndex::new(0)).hydrogen_count, 2);
        assert_eq!(mol.atom(NodeIndex::new(1)).hydrogen_count, 2);
    }

    #[test]
    fn bracket_atom_h() {
        assert_eq!(parse("[CH4]").atom(NodeIndex::new(0)).hydrogen_count, 4);
        assert_eq!(parse("[C]").atom(NodeIndex::new(0)).hydrogen_count, 0);
    }

    #[test]
    fn aromatic_carbon_benzene() {
        let mol = parse("c1ccccc1");
        for i in 0..6 {
            let atom = mol.atom(NodeIndex::new(i));
            assert!(atom.is_aromatic);
            assert_eq!(atom.hydrogen_count, 1, "atom {i} should have 1 H");
        }
    }

    #[test]
    fn bonds_follow_creation_order() {
        let mol = parse("C1CC1");
        let ring = mol.bonds().last().unwrap();
        assert_eq!(
            mol.bond_endpoints(ring),
            Some((NodeIndex::new(0), NodeIndex::new(2)))
        );
    }

    #[test]
    fn direction_is_relative_to_endpoints() {
        let mol = parse("F/C=C\\F");
        let first = mol.bonds().next().unwrap();
        let last = mol.bonds().last().unwrap();
        assert_eq!(mol.bond(first).direction, BondDirection::Up);
        assert_eq!(mol.bond(last).direction, BondDirection::Down);
    }

    #[test]
    fn chirality_relative_to_reference_order() {
        // Written order F, H, Cl, Br; reference order H, F, Cl, Br is one swap away.
        let mol = parse("F[C@H](Cl)Br");
        assert_eq!(mol.atom(NodeIndex::new(1)).chirality, Chirality::Cw);
        // No hydrogen: written and reference orders agree.
        let mol = parse("F[C@](Cl)(Br)I");
        assert_eq!(mol.atom(NodeIndex::new(1)).chirality, Chirality::Ccw);
        // Root with hydrogen: H is written first in both orders.
        let mol = parse("[C@@H](F)(Cl)Br");
        assert_eq!(mol.atom(NodeIndex::new(0)).chirality, Chirality::Cw);
    }
}
