use std::collections::BTreeSet;

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::mol::Mol;

/// Connected components, each sorted by atom index, ordered by their
/// lowest atom index.
pub fn connected_components<A, B>(mol: &Mol<A, B>) -> Vec<Vec<NodeIndex>> {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut components = Vec::new();
    for node in mol.atoms() {
        if visited[node.index()] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if visited[current.index()] {
                continue;
            }
            visited[current.index()] = true;
            component.push(current);
            for neighbor in mol.neighbors(current) {
                if !visited[neighbor.index()] {
                    stack.push(neighbor);
                }
            }
        }
        component.sort();
        components.push(component);
    }
    components
}

pub fn num_components<A, B>(mol: &Mol<A, B>) -> usize {
    connected_components(mol).len()
}

/// Depth-first spanning tree of the fragment containing `root`, exploring
/// each atom's bonds in creation order.
///
/// Per-atom vectors are indexed by atom index and sized for the whole
/// molecule; atoms outside the fragment keep empty entries.
#[derive(Debug, Clone)]
pub struct SpanningTree {
    /// Atoms in visiting order.
    pub preorder: Vec<NodeIndex>,
    /// Parent atom and the tree bond to it.
    pub parent: Vec<Option<(NodeIndex, EdgeIndex)>>,
    /// Children with their tree bonds, in visiting order.
    pub children: Vec<Vec<(NodeIndex, EdgeIndex)>>,
    /// Bonds outside the tree, listed on both endpoints in bond order.
    pub ring_bonds: Vec<Vec<(NodeIndex, EdgeIndex)>>,
}

impl SpanningTree {
    /// Position of every fragment atom in `preorder`.
    pub fn positions(&self) -> Vec<Option<usize>> {
        let mut pos = vec![None; self.parent.len()];
        for (i, node) in self.preorder.iter().enumerate() {
            pos[node.index()] = Some(i);
        }
        pos
    }
}

pub fn spanning_tree<A, B>(mol: &Mol<A, B>, root: NodeIndex) -> SpanningTree {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut preorder = vec![root];
    let mut parent: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; n];
    let mut children: Vec<Vec<(NodeIndex, EdgeIndex)>> = vec![Vec::new(); n];
    let mut ring_bonds: Vec<Vec<(NodeIndex, EdgeIndex)>> = vec![Vec::new(); n];
    let mut seen_ring: BTreeSet<EdgeIndex> = BTreeSet::new();

    let mut stack: Vec<(NodeIndex, Vec<EdgeIndex>, usize)> =
        vec![(root, mol.ordered_bonds_of(root), 0)];
    visited[root.index()] = true;

    while let Some((node, bonds, next)) = stack.last_mut() {
        let node = *node;
        let Some(&edge) = bonds.get(*next) else {
            stack.pop();
            continue;
        };
        *next += 1;
        let Some(other) = mol.other_end(edge, node) else {
            continue;
        };
        if parent[node.index()].map(|(_, e)| e) == Some(edge) {
            continue;
        }
        if !visited[other.index()] {
            visited[other.index()] = true;
            preorder.push(other);
            parent[other.index()] = Some((node, edge));
            children[node.index()].push((other, edge));
            stack.push((other, mol.ordered_bonds_of(other), 0));
        } else if seen_ring.insert(edge) {
            ring_bonds[node.index()].push((other, edge));
            ring_bonds[other.index()].push((node, edge));
        }
    }

    for list in &mut ring_bonds {
        list.sort_by_key(|&(_, e)| e);
    }

    SpanningTree {
        preorder,
        parent,
        children,
        ring_bonds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(mol: &mut Mol<(), ()>, len: usize) -> Vec<NodeIndex> {
        let nodes: Vec<NodeIndex> = (0..len).map(|_| mol.add_atom(())).collect();
        for w in nodes.windows(2) {
            mol.add_bond(w[0], w[1], ());
        }
        nodes
    }

    #[test]
    fn empty_has_no_components() {
        let mol = Mol::<(), ()>::new();
        assert!(connected_components(&mol).is_empty());
    }

    #[test]
    fn two_chains() {
        let mut mol = Mol::<(), ()>::new();
        let a = chain(&mut mol, 3);
        let b = chain(&mut mol, 2);
        let comps = connected_components(&mol);
        assert_eq!(comps, vec![a, b]);
        assert_eq!(num_components(&mol), 2);
    }

    #[test]
    fn ring_bond_found_once() {
        let mut mol = Mol::<(), ()>::new();
        let nodes = chain(&mut mol, 4);
        let closing = mol.add_bond(nodes[3], nodes[0], ());
        let tree = spanning_tree(&mol, nodes[0]);
        assert_eq!(tree.preorder, nodes);
        assert_eq!(tree.ring_bonds[0], vec![(nodes[3], closing)]);
        assert_eq!(tree.ring_bonds[3], vec![(nodes[0], closing)]);
        assert!(tree.ring_bonds[1].is_empty());
        assert_eq!(tree.parent[0], None);
        assert_eq!(tree.children[0].len(), 1);
    }

    #[test]
    fn children_follow_bond_order() {
        let mut mol = Mol::<(), ()>::new();
        let center = mol.add_atom(());
        let a = mol.add_atom(());
        let b = mol.add_atom(());
        mol.add_bond(center, b, ());
        mol.add_bond(center, a, ());
        let tree = spanning_tree(&mol, center);
        let kids: Vec<NodeIndex> = tree.children[0].iter().map(|&(c, _)| c).collect();
        assert_eq!(kids, vec![b, a]);
        assert_eq!(tree.positions()[b.index()], Some(1));
    }

    #[test]
    fn tree_stays_in_fragment() {
        let mut mol = Mol::<(), ()>::new();
        chain(&mut mol, 2);
        let other = chain(&mut mol, 2);
        let tree = spanning_tree(&mol, other[0]);
        assert_eq!(tree.preorder, other);
        assert_eq!(tree.positions()[0], None);
    }
}
