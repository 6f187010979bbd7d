//! Molecular graph → SELFIES.
//!
//! Each fragment is written as a depth-first walk rooted at its lowest atom,
//! taking bonds in creation order. Every branch but the last is wrapped in a
//! `Branch` symbol, and every bond outside the spanning tree becomes a
//! `Ring` symbol on the later of its two atoms.

use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::debug;

use crate::atom::{Atom, Chirality};
use crate::bond::{Bond, BondDirection, BondOrder};
use crate::element::Element;
use crate::graph_ops::{connected_components, spanning_tree, SpanningTree};
use crate::mol::{reorient, written_order, Mol};
use crate::selfies::alphabet::SymbolTable;
use crate::selfies::error::EncodeError;
use crate::selfies::index::{encode_index, index_width, MAX_INDEX};
use crate::selfies::symbol::{implied_hydrogens, AtomSymbol};
use crate::valence::bond_valence;

/// Encode `mol` against `table`.
///
/// Fails when an atom has no element, when an atom carries more bond order
/// than `table` grants its symbol, or when a branch or ring operand needs
/// more than three index symbols. A successful result decodes back to the
/// same molecule under the same table.
pub fn encode_mol(mol: &Mol<Atom, Bond>, table: &SymbolTable) -> Result<String, EncodeError> {
    let fragments = connected_components(mol)
        .iter()
        .map(|component| encode_fragment(mol, table, component[0]))
        .collect::<Result<Vec<_>, _>>()?;
    let selfies = fragments.join(".");
    debug!(
        atoms = mol.atom_count(),
        bonds = mol.bond_count(),
        fragments = fragments.len(),
        "encoded molecule"
    );
    Ok(selfies)
}

#[derive(Debug, Clone, Copy)]
enum Piece {
    Atom {
        node: NodeIndex,
        parent: Option<(NodeIndex, EdgeIndex)>,
    },
    Ring {
        node: NodeIndex,
        other: NodeIndex,
        edge: EdgeIndex,
        q: usize,
    },
    Branch {
        order: BondOrder,
        q: usize,
    },
}

enum Step {
    Enter(NodeIndex),
    Open(NodeIndex, EdgeIndex),
}

fn width(q: usize) -> Result<usize, EncodeError> {
    index_width(q).ok_or(EncodeError::IndexOverflow {
        value: q,
        max: MAX_INDEX,
    })
}

/// Ring bonds of `node` that close onto an atom written earlier, with their
/// ring operands.
fn back_rings<'a>(
    tree: &'a SpanningTree,
    pos: &'a [Option<usize>],
    node: NodeIndex,
) -> impl Iterator<Item = (NodeIndex, EdgeIndex, usize)> + 'a {
    let here = pos[node.index()].unwrap_or(0);
    tree.ring_bonds[node.index()]
        .iter()
        .filter_map(move |&(other, edge)| {
            let there = pos[other.index()]?;
            (there < here).then(|| (other, edge, here - there - 1))
        })
}

fn encode_fragment(
    mol: &Mol<Atom, Bond>,
    table: &SymbolTable,
    root: NodeIndex,
) -> Result<String, EncodeError> {
    let tree = spanning_tree(mol, root);
    let pos = tree.positions();

    let mut symbols: Vec<Option<AtomSymbol>> = vec![None; mol.atom_count()];
    for &node in &tree.preorder {
        symbols[node.index()] = Some(atom_symbol(mol, table, node)?);
    }

    // Symbols written for each atom's subtree.
    let mut len = vec![0usize; mol.atom_count()];
    for &node in tree.preorder.iter().rev() {
        let mut total = 1;
        for (_, _, q) in back_rings(&tree, &pos, node) {
            total += 1 + width(q)?;
        }
        let children = &tree.children[node.index()];
        if let Some((&(last, _), rest)) = children.split_last() {
            for &(child, _) in rest {
                let body = len[child.index()];
                total += 1 + width(body - 1)? + body;
            }
            total += len[last.index()];
        }
        len[node.index()] = total;
    }

    let mut pieces = Vec::with_capacity(len[root.index()]);
    let mut steps = vec![Step::Enter(root)];
    while let Some(step) = steps.pop() {
        let node = match step {
            Step::Open(child, edge) => {
                pieces.push(Piece::Branch {
                    order: mol.bond(edge).order,
                    q: len[child.index()] - 1,
                });
                continue;
            }
            Step::Enter(node) => node,
        };
        pieces.push(Piece::Atom {
            node,
            parent: tree.parent[node.index()],
        });
        for (other, edge, q) in back_rings(&tree, &pos, node) {
            pieces.push(Piece::Ring {
                node,
                other,
                edge,
                q,
            });
        }
        let children = &tree.children[node.index()];
        if let Some((&(last, _), rest)) = children.split_last() {
            steps.push(Step::Enter(last));
            for &(child, edge) in rest.iter().rev() {
                steps.push(Step::Enter(child));
                steps.push(Step::Open(child, edge));
            }
        }
    }

    // Neighbours in the order the decoder will create their bonds.
    let mut events: Vec<Vec<NodeIndex>> = vec![Vec::new(); mol.atom_count()];
    for piece in &pieces {
        match *piece {
            Piece::Atom {
                node,
                parent: Some((parent, _)),
            } => {
                events[node.index()].push(parent);
                events[parent.index()].push(node);
            }
            Piece::Ring { node, other, .. } => {
                events[node.index()].push(other);
                events[other.index()].push(node);
            }
            _ => {}
        }
    }

    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Atom { node, parent } => {
                let Some(mut symbol) = symbols[node.index()].take() else {
                    continue;
                };
                if let Some((from, edge)) = parent {
                    let (order, direction) = tree_bond(mol, edge, from, node);
                    symbol.order = order;
                    symbol.direction = direction;
                }
                symbol.chirality = written_chirality(mol, node, &events[node.index()], parent.is_some());
                out.push_str(&symbol.to_string());
            }
            Piece::Ring { edge, q, .. } => {
                let w = width(q)?;
                out.push_str(&format!("[{}Ring{w}]", mol.bond(edge).order.symbol()));
                out.extend(encode_index(q, w));
            }
            Piece::Branch { order, q } => {
                let w = width(q)?;
                out.push_str(&format!("[{}Branch{w}]", order.symbol()));
                out.extend(encode_index(q, w));
            }
        }
    }
    Ok(out)
}

/// Atom symbol without its bond prefix or chirality, checked against the
/// capacity the decoder will grant it.
fn atom_symbol(
    mol: &Mol<Atom, Bond>,
    table: &SymbolTable,
    node: NodeIndex,
) -> Result<AtomSymbol, EncodeError> {
    let atom = mol.atom(node);
    let element = Element::from_atomic_num(atom.atomic_num)
        .filter(|_| atom.atomic_num != 0)
        .ok_or(EncodeError::UnknownElement {
            atom: node.index(),
            atomic_num: atom.atomic_num,
        })?;

    let bonds = bond_valence(mol, node);
    let implied = implied_hydrogens(element, atom.formal_charge, bonds);
    let chiral_h = atom.chirality != Chirality::None && atom.hydrogen_count > 0;
    let hydrogens = (atom.hydrogen_count != implied || chiral_h).then_some(atom.hydrogen_count);

    let symbol = AtomSymbol {
        isotope: atom.isotope,
        hydrogens,
        charge: atom.formal_charge,
        ..AtomSymbol::new(element)
    };
    let capacity = table
        .capacity(&symbol)
        .value
        .saturating_sub(hydrogens.unwrap_or(0));
    if bonds > capacity {
        return Err(EncodeError::ExceedsCapacity {
            atom: node.index(),
            symbol: symbol.table_key(),
            bonds,
            capacity,
        });
    }
    Ok(symbol)
}

/// Order and direction of tree bond `edge` written from `from` to `to`.
fn tree_bond(
    mol: &Mol<Atom, Bond>,
    edge: EdgeIndex,
    from: NodeIndex,
    to: NodeIndex,
) -> (BondOrder, BondDirection) {
    let bond = mol.bond(edge);
    if bond.order != BondOrder::Single {
        return (bond.order, BondDirection::None);
    }
    let direction = match mol.bond_endpoints(edge) {
        Some((a, b)) if (a, b) == (to, from) => bond.direction.flip(),
        _ => bond.direction,
    };
    (bond.order, direction)
}

fn written_chirality(
    mol: &Mol<Atom, Bond>,
    node: NodeIndex,
    neighbors: &[NodeIndex],
    has_predecessor: bool,
) -> Chirality {
    let atom = mol.atom(node);
    if atom.chirality == Chirality::None {
        return Chirality::None;
    }
    let written = written_order(neighbors, has_predecessor, atom.hydrogen_count > 0);
    reorient(atom.chirality, &mol.stereo_neighbors(node), &written)
}
