//! SELFIES → molecular graph.
//!
//! A single pass over the no-op-free symbol buffer with an explicit frame
//! stack. Every transition is total: requests that do not fit are clamped,
//! skipped or served by the fallback capacity, and each transition reports
//! which of those happened.

use petgraph::graph::NodeIndex;
use tracing::{debug, trace};

use crate::atom::{Atom, Chirality};
use crate::bond::{Bond, BondDirection, BondOrder};
use crate::element::Element;
use crate::mol::{reorient, written_order, Mol};
use crate::selfies::alphabet::{CapacitySource, SymbolTable};
use crate::selfies::index::decode_indices;
use crate::selfies::symbol::{filter_nops, implied_hydrogens, AtomSymbol, Symbol, Token};

/// What one transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Applied as written.
    Placed,
    /// Applied with a lower bond order, or fewer explicit hydrogens, than
    /// written.
    Clamped,
    /// Consumed without changing the graph.
    Skipped,
    /// Applied, with the atom's capacity taken from the fallback entry.
    Fallback,
}

/// A decoded molecule together with one outcome per transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub mol: Mol<Atom, Bond>,
    pub outcomes: Vec<Outcome>,
}

impl Derivation {
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.iter().filter(|&&o| o == outcome).count()
    }
}

/// Decode `selfies` against `table`. Never fails.
pub fn derive(selfies: &str, table: &SymbolTable) -> Derivation {
    let symbols = filter_nops(selfies);
    let mut engine = Engine::new(table, &symbols);
    engine.run();
    engine.finish()
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Atom the next bond attaches to; `None` before a fragment's first atom.
    current: Option<NodeIndex>,
    /// Bond order a branch may still draw from its root. Cleared once the
    /// branch moves past its root.
    budget: Option<u8>,
    /// Buffer position where the frame's body ends.
    end: usize,
}

impl Frame {
    fn root() -> Self {
        Self {
            current: None,
            budget: None,
            end: usize::MAX,
        }
    }

    fn is_dead(&self) -> bool {
        self.budget == Some(0)
    }
}

struct Engine<'a> {
    table: &'a SymbolTable,
    symbols: &'a [Symbol<'a>],
    cursor: usize,
    frames: Vec<Frame>,
    mol: Mol<Atom, Bond>,
    capacity: Vec<u8>,
    used: Vec<u8>,
    explicit_h: Vec<Option<u8>>,
    tags: Vec<Chirality>,
    has_predecessor: Vec<bool>,
    /// Placement order of the current fragment.
    placed: Vec<NodeIndex>,
    /// Each atom's position in its fragment's placement order.
    position: Vec<usize>,
    outcomes: Vec<Outcome>,
}

impl<'a> Engine<'a> {
    fn new(table: &'a SymbolTable, symbols: &'a [Symbol<'a>]) -> Self {
        Self {
            table,
            symbols,
            cursor: 0,
            frames: vec![Frame::root()],
            mol: Mol::new(),
            capacity: Vec::new(),
            used: Vec::new(),
            explicit_h: Vec::new(),
            tags: Vec::new(),
            has_predecessor: Vec::new(),
            placed: Vec::new(),
            position: Vec::new(),
            outcomes: Vec::with_capacity(symbols.len()),
        }
    }

    fn frame(&self) -> &Frame {
        // The root frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    fn frame_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn run(&mut self) {
        let symbols = self.symbols;
        while self.cursor < symbols.len() {
            while self.frames.len() > 1 && self.frame().end <= self.cursor {
                self.frames.pop();
            }

            let at = self.cursor;
            let symbol = &symbols[at];
            self.cursor += 1;

            let outcome = match &symbol.token {
                Token::Dot => self.end_fragment(),
                _ if self.frame().is_dead() => Outcome::Skipped,
                Token::Atom(atom) => self.place_atom(atom),
                Token::Branch { order, len } => self.open_branch(*order, *len),
                Token::Ring { order, len } => self.close_ring(*order, *len),
                Token::Epsilon | Token::Nop => Outcome::Skipped,
            };
            if matches!(outcome, Outcome::Clamped | Outcome::Skipped) {
                trace!(position = at, symbol = symbol.text, ?outcome, "degraded transition");
            }
            self.outcomes.push(outcome);
        }
    }

    fn free(&self, atom: NodeIndex) -> u8 {
        self.capacity[atom.index()].saturating_sub(self.used[atom.index()])
    }

    /// Free valence of `atom` as seen from the active frame.
    fn available(&self, atom: NodeIndex) -> u8 {
        let free = self.free(atom);
        let frame = self.frame();
        match frame.budget {
            Some(budget) if frame.current == Some(atom) => free.min(budget),
            _ => free,
        }
    }

    /// Operand run of at most `len` symbols, stopping at `.` or the end of
    /// the active body.
    fn read_operand(&mut self, len: u8) -> usize {
        let end = self.frame().end.min(self.symbols.len());
        let start = self.cursor;
        while self.cursor < end
            && self.cursor - start < len as usize
            && self.symbols[self.cursor].token != Token::Dot
        {
            self.cursor += 1;
        }
        decode_indices(self.symbols[start..self.cursor].iter().map(|s| s.text))
    }

    fn end_fragment(&mut self) -> Outcome {
        self.frames.truncate(1);
        self.frames[0] = Frame::root();
        self.placed.clear();
        Outcome::Placed
    }

    fn add_atom(
        &mut self,
        atom: &AtomSymbol,
        hydrogens: Option<u8>,
        capacity: u8,
        has_predecessor: bool,
    ) -> NodeIndex {
        let node = self.mol.add_atom(Atom {
            atomic_num: atom.element.atomic_num(),
            formal_charge: atom.charge,
            isotope: atom.isotope,
            ..Atom::default()
        });
        self.capacity.push(capacity);
        self.used.push(0);
        self.explicit_h.push(hydrogens);
        self.tags.push(atom.chirality);
        self.has_predecessor.push(has_predecessor);
        self.position.push(self.placed.len());
        self.placed.push(node);
        node
    }

    /// Book `order` units on both ends and charge them to every branch
    /// budget held on `from`.
    fn consume(&mut self, from: NodeIndex, to: NodeIndex, order: u8) {
        self.used[from.index()] = self.used[from.index()].saturating_add(order);
        self.used[to.index()] = self.used[to.index()].saturating_add(order);
        for frame in &mut self.frames {
            if frame.current == Some(from) {
                if let Some(budget) = frame.budget.as_mut() {
                    *budget = budget.saturating_sub(order);
                }
            }
        }
    }

    fn place_atom(&mut self, atom: &AtomSymbol) -> Outcome {
        let cap = self.table.capacity(atom);
        // Explicit hydrogens never exceed the symbol's capacity.
        let hydrogens = atom.hydrogens.map(|h| h.min(cap.value));
        let capacity = cap.value - hydrogens.unwrap_or(0);
        let applied = if hydrogens != atom.hydrogens {
            Outcome::Clamped
        } else if cap.source == CapacitySource::Fallback {
            Outcome::Fallback
        } else {
            Outcome::Placed
        };

        let Some(current) = self.frame().current else {
            let node = self.add_atom(atom, hydrogens, capacity, false);
            self.frame_mut().current = Some(node);
            return applied;
        };

        let requested = atom.order.valence();
        let order = requested.min(self.available(current)).min(capacity);
        let Some(bond_order) = BondOrder::from_valence(order) else {
            return Outcome::Skipped;
        };

        let node = self.add_atom(atom, hydrogens, capacity, true);
        let direction = if bond_order == BondOrder::Single {
            atom.direction
        } else {
            BondDirection::None
        };
        self.mol.add_bond(
            current,
            node,
            Bond {
                order: bond_order,
                direction,
            },
        );
        self.consume(current, node, order);

        let frame = self.frame_mut();
        frame.current = Some(node);
        frame.budget = None;

        if order < requested {
            Outcome::Clamped
        } else {
            applied
        }
    }

    fn open_branch(&mut self, order: Option<u8>, len: u8) -> Outcome {
        let q = self.read_operand(len);
        let end = self
            .cursor
            .saturating_add(q)
            .saturating_add(1)
            .min(self.frame().end);

        let (current, budget) = match self.frame().current {
            None => (None, 0),
            Some(root) => {
                // One unit stays with the root for the main chain.
                let spare = self.available(root).saturating_sub(1);
                (Some(root), order.map_or(spare, |o| o.min(spare)))
            }
        };
        self.frames.push(Frame {
            current,
            budget: Some(budget),
            end,
        });

        if budget > 0 {
            Outcome::Placed
        } else {
            Outcome::Skipped
        }
    }

    fn close_ring(&mut self, requested: u8, len: u8) -> Outcome {
        let q = self.read_operand(len);
        let Some(current) = self.frame().current else {
            return Outcome::Skipped;
        };

        let n = self.placed.len();
        let p = self.position[current.index()];
        let back = (q % n + 1) % n;
        let target = self.placed[(p + n - back) % n];
        if target == current {
            return Outcome::Skipped;
        }

        let existing = self.mol.bond_between(current, target);
        let existing_order = existing.map_or(0, |e| self.mol.bond(e).order.valence());
        let order = requested
            .min(self.available(current))
            .min(self.free(target))
            .min(3 - existing_order);
        let Some(bond_order) = BondOrder::from_valence(existing_order + order).filter(|_| order > 0)
        else {
            return Outcome::Skipped;
        };

        match existing {
            Some(edge) => {
                let bond = self.mol.bond_mut(edge);
                bond.order = bond_order;
                bond.direction = BondDirection::None;
            }
            None => {
                self.mol.add_bond(current, target, Bond::with_order(bond_order));
            }
        }
        self.consume(current, target, order);

        if order < requested {
            Outcome::Clamped
        } else {
            Outcome::Placed
        }
    }

    fn finish(mut self) -> Derivation {
        let atoms: Vec<NodeIndex> = self.mol.atoms().collect();
        for &node in &atoms {
            let i = node.index();
            let atom = self.mol.atom(node);
            let h = match self.explicit_h[i] {
                Some(h) => h,
                None => match Element::from_atomic_num(atom.atomic_num) {
                    Some(element) => implied_hydrogens(element, atom.formal_charge, self.used[i]),
                    None => 0,
                },
            };
            self.mol.atom_mut(node).hydrogen_count = h;
        }

        for &node in &atoms {
            let i = node.index();
            if self.tags[i] == Chirality::None {
                continue;
            }
            let h = self.mol.atom(node).hydrogen_count;
            let neighbors = self.mol.ordered_neighbors(node);
            if h > 1 || neighbors.len() + usize::from(h > 0) < 3 {
                continue;
            }
            let written = written_order(&neighbors, self.has_predecessor[i], h > 0);
            let reference = self.mol.stereo_neighbors(node);
            self.mol.atom_mut(node).chirality = reorient(self.tags[i], &written, &reference);
        }

        let derivation = Derivation {
            mol: self.mol,
            outcomes: self.outcomes,
        };
        debug!(
            symbols = self.symbols.len(),
            atoms = derivation.mol.atom_count(),
            bonds = derivation.mol.bond_count(),
            clamped = derivation.count(Outcome::Clamped),
            skipped = derivation.count(Outcome::Skipped),
            fallback = derivation.count(Outcome::Fallback),
            "derived molecule"
        );
        derivation
    }
}
