use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::traits::HasHydrogenCount;

/// One entry in a stereo neighbour list: a bonded atom or the atom's single
/// implicit hydrogen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StereoNeighbor {
    Atom(NodeIndex),
    Hydrogen,
}

/// Undirected molecular graph.
///
/// Bond indices grow monotonically; nothing is ever removed, so bond index
/// order doubles as bond creation order. Chirality tags are defined against
/// that order (see [`Mol::stereo_neighbors`]).
pub struct Mol<A, B> {
    graph: UnGraph<A, B>,
}

impl<A, B> Mol<A, B> {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
        }
    }

    pub fn graph(&self) -> &UnGraph<A, B> {
        &self.graph
    }

    pub fn atom(&self, idx: NodeIndex) -> &A {
        &self.graph[idx]
    }

    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut A {
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &B {
        &self.graph[idx]
    }

    pub fn bond_mut(&mut self, idx: EdgeIndex) -> &mut B {
        &mut self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: A) -> NodeIndex {
        self.graph.add_node(atom)
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: B) -> EdgeIndex {
        self.graph.add_edge(a, b, bond)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Neighbours in petgraph adjacency order (most recent bond first).
    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    /// Bonds of `idx` in creation order.
    pub fn ordered_bonds_of(&self, idx: NodeIndex) -> Vec<EdgeIndex> {
        let mut bonds: Vec<EdgeIndex> = self.bonds_of(idx).collect();
        bonds.sort();
        bonds
    }

    /// Neighbours of `idx` in bond creation order.
    pub fn ordered_neighbors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.ordered_bonds_of(idx)
            .into_iter()
            .filter_map(|e| self.other_end(e, idx))
            .collect()
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// The endpoint of `bond` that is not `atom`.
    pub fn other_end(&self, bond: EdgeIndex, atom: NodeIndex) -> Option<NodeIndex> {
        let (a, b) = self.bond_endpoints(bond)?;
        if a == atom {
            Some(b)
        } else if b == atom {
            Some(a)
        } else {
            None
        }
    }
}

impl<A: HasHydrogenCount, B> Mol<A, B> {
    /// Reference neighbour order for tetrahedral chirality: the implicit
    /// hydrogen first (when there is one), then bonded atoms in bond
    /// creation order.
    pub fn stereo_neighbors(&self, idx: NodeIndex) -> Vec<StereoNeighbor> {
        let mut order = Vec::with_capacity(4);
        if self.atom(idx).hydrogen_count() > 0 {
            order.push(StereoNeighbor::Hydrogen);
        }
        order.extend(self.ordered_neighbors(idx).into_iter().map(StereoNeighbor::Atom));
        order
    }
}

impl<A: Clone, B: Clone> Clone for Mol<A, B> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
        }
    }
}

impl<A, B> Default for Mol<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: PartialEq, B: PartialEq> PartialEq for Mol<A, B> {
    fn eq(&self, other: &Self) -> bool {
        if self.atom_count() != other.atom_count() || self.bond_count() != other.bond_count() {
            return false;
        }
        self.atoms().all(|idx| self.atom(idx) == other.atom(idx))
            && self.bonds().all(|idx| {
                self.bond(idx) == other.bond(idx)
                    && self.bond_endpoints(idx) == other.bond_endpoints(idx)
            })
    }
}

impl<A: std::fmt::Debug, B: std::fmt::Debug> std::fmt::Debug for Mol<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mol")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .finish()
    }
}

/// `true` when `to` is an even permutation of `from`.
///
/// Lists of different lengths, or lists that are not permutations of each
/// other, report `true` so callers leave the tag untouched.
pub(crate) fn permutation_parity<T: Eq>(from: &[T], to: &[T]) -> bool {
    let n = from.len();
    if n != to.len() {
        return true;
    }
    let mut perm = Vec::with_capacity(n);
    for f in from {
        match to.iter().position(|t| t == f) {
            Some(p) => perm.push(p),
            None => return true,
        }
    }
    let mut visited = vec![false; n];
    let mut swaps = 0usize;
    for i in 0..n {
        if visited[i] {
            continue;
        }
        let mut cycle_len = 0;
        let mut j = i;
        while !visited[j] {
            visited[j] = true;
            j = perm[j];
            cycle_len += 1;
        }
        swaps += cycle_len - 1;
    }
    swaps % 2 == 0
}

/// Re-express a chirality tag written against `from` as one against `to`.
pub(crate) fn reorient(
    chirality: crate::atom::Chirality,
    from: &[StereoNeighbor],
    to: &[StereoNeighbor],
) -> crate::atom::Chirality {
    if permutation_parity(from, to) {
        chirality
    } else {
        chirality.inverted()
    }
}

/// Neighbour order as written by a linear notation: the atom's first
/// neighbour (its predecessor, when it has one), then the implicit hydrogen,
/// then the remaining neighbours. Root atoms list the hydrogen first.
pub(crate) fn written_order(
    neighbors: &[NodeIndex],
    has_predecessor: bool,
    has_hydrogen: bool,
) -> Vec<StereoNeighbor> {
    let mut order: Vec<StereoNeighbor> = neighbors.iter().map(|&n| StereoNeighbor::Atom(n)).collect();
    if has_hydrogen {
        let at = if has_predecessor && !order.is_empty() { 1 } else { 0 };
        order.insert(at, StereoNeighbor::Hydrogen);
    }
    order
}
