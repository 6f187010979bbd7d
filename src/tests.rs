use crate::*;

#[test]
fn mol_add_atoms_and_bonds() {
    let mut mol = Mol::<Atom, Bond>::new();
    let c = mol.add_atom(Atom {
        atomic_num: 6,
        ..Atom::default()
    });
    let o = mol.add_atom(Atom {
        atomic_num: 8,
        ..Atom::default()
    });
    let bond_idx = mol.add_bond(
        c,
        o,
        Bond {
            order: BondOrder::Double,
            ..Bond::default()
        },
    );

    assert_eq!(mol.atom_count(), 2);
    assert_eq!(mol.bond_count(), 1);
    assert_eq!(mol.atom(c).atomic_num, 6);
    assert_eq!(mol.atom(o).atomic_num, 8);
    assert_eq!(mol.bond(bond_idx).order, BondOrder::Double);
}

#[test]
fn mol_neighbors_and_bonds_of() {
    let mut mol = Mol::<Atom, Bond>::new();
    let a = mol.add_atom(Atom::default());
    let b = mol.add_atom(Atom::default());
    let c = mol.add_atom(Atom::default());
    mol.add_bond(a, b, Bond::default());
    mol.add_bond(a, c, Bond::default());

    let neighbors: Vec<_> = mol.neighbors(a).collect();
    assert_eq!(neighbors.len(), 2);

    let incident: Vec<_> = mol.bonds_of(a).collect();
    assert_eq!(incident.len(), 2);
}

#[test]
fn mol_bond_between_and_endpoints() {
    let mut mol = Mol::<Atom, Bond>::new();
    let a = mol.add_atom(Atom::default());
    let b = mol.add_atom(Atom::default());
    let c = mol.add_atom(Atom::default());
    let e = mol.add_bond(a, b, Bond::default());

    assert_eq!(mol.bond_between(a, b), Some(e));
    assert_eq!(mol.bond_between(a, c), None);

    let (src, dst) = mol.bond_endpoints(e).unwrap();
    assert!((src == a && dst == b) || (src == b && dst == a));
}

#[test]
fn mol_iterators() {
    let mut mol = Mol::<Atom, Bond>::new();
    mol.add_atom(Atom::default());
    mol.add_atom(Atom::default());

    assert_eq!(mol.atoms().count(), 2);
    assert_eq!(mol.bonds().count(), 0);
}

#[test]
fn mol_atom_mut() {
    let mut mol = Mol::<Atom, Bond>::new();
    let idx = mol.add_atom(Atom::default());
    mol.atom_mut(idx).atomic_num = 7;
    assert_eq!(mol.atom(idx).atomic_num, 7);
}

#[test]
fn atom_trait_impls() {
    let atom = Atom {
        atomic_num: 6,
        formal_charge: -1,
        isotope: 13,
        chirality: Chirality::Cw,
        hydrogen_count: 3,
        is_aromatic: true,
    };

    assert_eq!(HasAtomicNum::atomic_num(&atom), 6);
    assert_eq!(HasFormalCharge::formal_charge(&atom), -1);
    assert_eq!(HasHydrogenCount::hydrogen_count(&atom), 3);
}

#[test]
fn bond_trait_impls() {
    let bond = Bond {
        order: BondOrder::Triple,
        direction: BondDirection::None,
    };

    assert_eq!(HasBondOrder::bond_order(&bond), BondOrder::Triple);
}

#[test]
fn bond_direction_flips() {
    assert_eq!(BondDirection::Up.flip(), BondDirection::Down);
    assert_eq!(BondDirection::None.flip(), BondDirection::None);
    assert_eq!(Bond::with_order(BondOrder::Double).direction, BondDirection::None);
}

#[test]
fn stereo_neighbors_put_hydrogen_first() {
    use petgraph::graph::NodeIndex;

    let mol = from_smiles("F[C@H](Cl)Br").unwrap();
    let c = NodeIndex::new(1);
    assert_eq!(
        mol.stereo_neighbors(c),
        vec![
            StereoNeighbor::Hydrogen,
            StereoNeighbor::Atom(NodeIndex::new(0)),
            StereoNeighbor::Atom(NodeIndex::new(2)),
            StereoNeighbor::Atom(NodeIndex::new(3)),
        ]
    );
}

#[test]
fn decoded_molecules_are_valid() {
    let codec = Codec::default();
    for s in [
        "[C][=C][F]",
        "[#N][#C][#N]",
        "[O][=O][=O]",
        "[C][Branch1][C][C][C][C][Ring1][Ring2]",
    ] {
        assert!(check_valence(&codec.decode(s)).is_ok(), "{s}");
    }
}

#[test]
fn reexported_entry_points_agree() {
    let codec = Codec::new(SymbolTable::default());
    assert_eq!(
        codec.encode_smiles("CCO").unwrap(),
        selfies::encode_mol(&from_smiles("CCO").unwrap(), &SymbolTable::default()).unwrap()
    );
    assert_eq!(codec.decode_to_smiles("[C][C][O]"), "CCO");
    assert_eq!(to_smiles(&codec.decode("[O].[C]")), "O.C");
}

#[test]
fn chirality_default_is_none() {
    assert_eq!(Chirality::default(), Chirality::None);
}

#[test]
fn bond_order_default_is_single() {
    assert_eq!(BondOrder::default(), BondOrder::Single);
}

#[test]
fn atom_default() {
    let atom = Atom::default();
    assert_eq!(atom.atomic_num, 0);
    assert_eq!(atom.formal_charge, 0);
    assert_eq!(atom.isotope, 0);
    assert_eq!(atom.chirality, Chirality::None);
    assert_eq!(atom.hydrogen_count, 0);
    assert!(!atom.is_aromatic);
}

#[test]
fn mol_default() {
    let mol = Mol::<Atom, Bond>::default();
    assert_eq!(mol.atom_count(), 0);
    assert_eq!(mol.bond_count(), 0);
}

#[test]
fn mol_graph_access() {
    let mut mol = Mol::<Atom, Bond>::new();
    mol.add_atom(Atom::default());
    assert_eq!(mol.graph().node_count(), 1);
}
