//! Robust molecular string codec.
//!
//! SELFIES strings are read and written over a small molecular graph model
//! ([`Mol`] of [`Atom`] and [`Bond`]). Every SELFIES string decodes to a
//! molecule in which no neutral atom exceeds its largest default valence, so
//! it passes [`check_valence`]. Radicals such as `[CH1][C]` are kept. SMILES
//! is supported in both directions as the interchange notation.

pub mod atom;
pub mod bond;
pub mod element;
pub mod graph_ops;
pub mod kekulize;
pub mod mol;
pub mod selfies;
pub mod smiles;
pub mod traits;
pub mod valence;

pub use atom::{Atom, Chirality};
pub use bond::{Bond, BondDirection, BondOrder, SmilesBond, SmilesBondOrder};
pub use element::Element;
pub use kekulize::{kekulize, KekulizeError};
pub use mol::{Mol, StereoNeighbor};
pub use selfies::{
    decoder, encoder, get_alphabet, get_atom_dict, set_alphabet, Codec, Derivation,
    EncodeError, EncodingError, Outcome, SymbolTable,
};
pub use smiles::{from_smiles, parse_smiles, to_smiles, SmilesError};
pub use traits::{HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount};
pub use valence::{check_valence, ValenceError};

#[cfg(test)]
mod tests;
