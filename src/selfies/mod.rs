//! SELFIES: a molecular string notation in which every string decodes to a
//! valid molecule.
//!
//! Decoding walks the symbol stream once, placing atoms and bonds while
//! tracking each atom's remaining bonding capacity; anything that does not
//! fit is clamped or skipped instead of rejected. Encoding writes a
//! depth-first derivation of the graph that decodes back to it.
//!
//! The free functions [`decoder`] and [`encoder`] use a process-wide
//! [`SymbolTable`] that [`set_alphabet`] replaces. [`Codec`] carries its own
//! table and is unaffected by it.
//!
//! ```
//! use selfies::{decoder, encoder};
//!
//! assert_eq!(decoder("[C][=C][F]"), "C=CF");
//! assert_eq!(encoder("CC(=O)O").unwrap(), "[C][C][=Branch1][C][=O][O]");
//! ```

pub mod alphabet;
pub mod decode;
pub mod encode;
pub mod error;
pub mod index;
pub mod symbol;
pub mod utils;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;
use crate::smiles::{from_smiles, to_smiles};

pub use alphabet::{
    current_table, get_alphabet, get_atom_dict, set_alphabet, Capacity, CapacitySource,
    SymbolTable,
};
pub use decode::{derive, Derivation, Outcome};
pub use encode::encode_mol;
pub use error::{EncodeError, EncodingError};
pub use symbol::{split_selfies, AtomSymbol, Token};

/// Decode `selfies` to Kekulé SMILES with the process-wide table.
///
/// Never fails; an empty or all-`[nop]` string gives `""`.
pub fn decoder(selfies: &str) -> String {
    to_smiles(&derive(selfies, &current_table()).mol)
}

/// Encode SMILES as SELFIES with the process-wide table.
pub fn encoder(smiles: &str) -> Result<String, EncodeError> {
    let mol = from_smiles(smiles)?;
    encode_mol(&mol, &current_table())
}

/// SELFIES encoder and decoder bound to one symbol table.
///
/// ```
/// use selfies::{Codec, SymbolTable};
///
/// let codec = Codec::new(SymbolTable::default().with_capacity("[Fe]", 2));
/// assert_eq!(codec.decode_to_smiles("[C][Fe][C]"), "C[Fe]C");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Codec {
    table: SymbolTable,
}

impl Codec {
    pub fn new(table: SymbolTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn decode(&self, selfies: &str) -> Mol<Atom, Bond> {
        self.derive(selfies).mol
    }

    /// Decode and report what each symbol did.
    pub fn derive(&self, selfies: &str) -> Derivation {
        derive(selfies, &self.table)
    }

    pub fn decode_to_smiles(&self, selfies: &str) -> String {
        to_smiles(&self.decode(selfies))
    }

    pub fn encode(&self, mol: &Mol<Atom, Bond>) -> Result<String, EncodeError> {
        encode_mol(mol, &self.table)
    }

    pub fn encode_smiles(&self, smiles: &str) -> Result<String, EncodeError> {
        let mol = from_smiles(smiles)?;
        self.encode(&mol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::SmilesError;

    #[test]
    fn codec_uses_its_own_table() {
        let strict = Codec::new(SymbolTable::default().with_capacity("[C]", 1));
        assert_eq!(strict.table().get("[C]"), Some(1));
        assert_eq!(strict.decode_to_smiles("[C][C][C]"), "CC");
        assert_eq!(Codec::default().decode_to_smiles("[C][C][C]"), "CCC");
    }

    #[test]
    fn codec_round_trip() {
        let codec = Codec::default();
        let selfies = codec.encode_smiles("C1=CC=CC=C1O").unwrap();
        let mol = codec.decode(&selfies);
        assert_eq!(mol.atom_count(), 7);
        assert_eq!(mol.bond_count(), 7);
    }

    #[test]
    fn derivation_counts_outcomes() {
        let derivation = Codec::default().derive("[F][=C][Fe]");
        assert_eq!(derivation.count(Outcome::Clamped), 1);
        assert_eq!(derivation.count(Outcome::Fallback), 1);
    }

    #[test]
    fn invalid_smiles_surfaces_parser_error() {
        assert!(matches!(
            Codec::default().encode_smiles("C1CC"),
            Err(EncodeError::InvalidInputGraph(SmilesError::UnclosedRing { .. }))
        ));
    }
}
