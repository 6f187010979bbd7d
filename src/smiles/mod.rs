//! SMILES reading and writing.
//!
//! Reading goes tokenizer → parse tree → [`Mol<Atom, SmilesBond>`], then
//! [`from_smiles`] kekulizes into the concrete-order graph that the SELFIES
//! encoder consumes. Writing always produces Kekulé SMILES.

mod builder;
pub mod error;
mod parse_tree;
mod tokenizer;
mod writer;

use tracing::trace;

use crate::atom::Atom;
use crate::bond::{Bond, SmilesBond};
use crate::kekulize;
use crate::mol::Mol;
pub use error::SmilesError;
pub use writer::to_smiles;

/// Parse SMILES into a graph that still carries aromatic bond orders.
pub fn parse_smiles(s: &str) -> Result<Mol<Atom, SmilesBond>, SmilesError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tokens = tokenizer::tokenize(trimmed)?;
    if tokens.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tree = parse_tree::build_parse_tree(&tokens)?;
    trace!(atoms = tree.atoms.len(), bonds = tree.bonds.len(), "parsed smiles");
    Ok(builder::build_mol(&tree))
}

/// Parse SMILES and kekulize it.
pub fn from_smiles(s: &str) -> Result<Mol<Atom, Bond>, SmilesError> {
    let mol = parse_smiles(s)?;
    Ok(kekulize::kekulize(mol)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Chirality;
    use crate::bond::{BondDirection, SmilesBondOrder};
    use petgraph::graph::NodeIndex;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn atom(mol: &Mol<Atom, SmilesBond>, i: usize) -> &Atom {
        mol.atom(n(i))
    }

    fn h_counts(smiles: &str) -> Vec<u8> {
        let mol = parse_smiles(smiles).unwrap();
        mol.atoms().map(|i| mol.atom(i).hydrogen_count).collect()
    }

    #[test]
    fn implicit_hydrogen_counts() {
        let cases: &[(&str, &[u8])] = &[
            ("C", &[4]),
            ("CC", &[3, 3]),
            ("C=C", &[2, 2]),
            ("C#C", &[1, 1]),
            ("O", &[2]),
            ("N", &[3]),
            ("F", &[1]),
            ("Cl", &[1]),
            ("Br", &[1]),
            ("I", &[1]),
            ("P", &[3]),
            ("S", &[2]),
            ("B", &[3]),
            ("CO", &[3, 1]),
            ("CC(=O)O", &[3, 0, 0, 1]),
            ("CC(C)C", &[3, 1, 3, 3]),
            ("CC(C)(C)C", &[3, 0, 3, 3, 3]),
            ("C1CC1", &[2, 2, 2]),
            ("CS(=O)C", &[3, 0, 0, 3]),
            ("P(=O)(O)(O)O", &[0, 0, 1, 1, 1]),
            ("C-C", &[3, 3]),
        ];
        for (smiles, expected) in cases {
            assert_eq!(h_counts(smiles), *expected, "{smiles}");
        }
    }

    #[test]
    fn bracket_hydrogen_counts() {
        assert_eq!(h_counts("[CH4]"), vec![4]);
        assert_eq!(h_counts("[NH3]"), vec![3]);
        assert_eq!(h_counts("[OH2]"), vec![2]);
        assert_eq!(h_counts("[HH]"), vec![1]);
        assert_eq!(h_counts("[Fe]"), vec![0]);
        assert_eq!(h_counts("[O-]"), vec![0]);
    }

    #[test]
    fn aromatic_hydrogen_counts() {
        assert_eq!(h_counts("c1ccccc1"), vec![1; 6]);
        assert_eq!(h_counts("c1ccncc1"), vec![1, 1, 1, 0, 1, 1]);
        assert_eq!(h_counts("o1cccc1"), vec![0, 1, 1, 1, 1]);
        assert_eq!(h_counts("s1cccc1"), vec![0, 1, 1, 1, 1]);
        assert_eq!(h_counts("[nH]1cccc1"), vec![1; 5]);
    }

    #[test]
    fn charges_and_isotopes() {
        let mol = parse_smiles("[NH4+]").unwrap();
        assert_eq!(atom(&mol, 0).formal_charge, 1);
        let mol = parse_smiles("[13C]").unwrap();
        assert_eq!(atom(&mol, 0).isotope, 13);
        let mol = parse_smiles("[2H]").unwrap();
        assert_eq!((atom(&mol, 0).atomic_num, atom(&mol, 0).isotope), (1, 2));
        let mol = parse_smiles("C[N+](=O)[O-]").unwrap();
        assert_eq!(atom(&mol, 1).formal_charge, 1);
        assert_eq!(atom(&mol, 3).formal_charge, -1);
    }

    #[test]
    fn ring_closures() {
        let mol = parse_smiles("C%10CC%10").unwrap();
        assert_eq!(mol.bond_count(), 3);
        let mol = parse_smiles("C%(100)CC%(100)").unwrap();
        assert_eq!(mol.bond_count(), 3);
        let mol = parse_smiles("C1CC2C1CC2").unwrap();
        assert_eq!((mol.atom_count(), mol.bond_count()), (6, 7));
        let mol = parse_smiles("c1ccc2ccccc2c1").unwrap();
        assert_eq!((mol.atom_count(), mol.bond_count()), (10, 11));
    }

    #[test]
    fn aromatic_bonds() {
        let mol = parse_smiles("Oc1ccccc1").unwrap();
        let o_c = mol.bond_between(n(0), n(1)).unwrap();
        assert_eq!(mol.bond(o_c).order, SmilesBondOrder::Implicit);
        let c_c = mol.bond_between(n(1), n(2)).unwrap();
        assert_eq!(mol.bond(c_c).order, SmilesBondOrder::Aromatic);
    }

    #[test]
    fn caffeine_atom_count() {
        let mol = parse_smiles("Cn1cnc2c1c(=O)n(c(=O)n2C)C").unwrap();
        assert_eq!(mol.atom_count(), 14);
        assert!(from_smiles("Cn1cnc2c1c(=O)n(c(=O)n2C)C").is_ok());
    }

    #[test]
    fn tetrahedral() {
        let mol = parse_smiles("[C@](F)(Cl)(Br)I").unwrap();
        assert_eq!(atom(&mol, 0).chirality, Chirality::Ccw);
        let mol = parse_smiles("[C@@](F)(Cl)(Br)I").unwrap();
        assert_eq!(atom(&mol, 0).chirality, Chirality::Cw);
        let mol = parse_smiles("[C@@H](F)(Cl)Br").unwrap();
        assert_eq!(atom(&mol, 0).chirality, Chirality::Cw);
        assert_eq!(atom(&mol, 0).hydrogen_count, 1);
    }

    #[test]
    fn directional_bonds() {
        let mol = parse_smiles(r"Cl/C=C\Cl").unwrap();
        let double = mol.bond_between(n(1), n(2)).unwrap();
        assert_eq!(mol.bond(double).order, SmilesBondOrder::Double);
        let last = mol.bond_between(n(2), n(3)).unwrap();
        assert_eq!(mol.bond(last).direction, BondDirection::Down);
    }

    #[test]
    fn disconnected() {
        let mol = parse_smiles("[Na+].[Cl-]").unwrap();
        assert_eq!((mol.atom_count(), mol.bond_count()), (2, 0));
        assert_eq!(atom(&mol, 0).atomic_num, 11);
        assert_eq!(atom(&mol, 1).formal_charge, -1);
    }

    #[test]
    fn atom_class_is_accepted() {
        assert_eq!(parse_smiles("[C:1]").unwrap().atom_count(), 1);
    }

    #[test]
    fn errors() {
        assert_eq!(parse_smiles("").unwrap_err(), SmilesError::EmptyInput);
        assert_eq!(parse_smiles("   ").unwrap_err(), SmilesError::EmptyInput);
        for bad in ["C(C", "C)C", "C1CC", "X", "[C", "*"] {
            assert!(parse_smiles(bad).is_err(), "{bad}");
        }
        assert!(matches!(
            from_smiles("c1cccc1"),
            Err(SmilesError::Kekulize(_))
        ));
    }
}
