use thiserror::Error;

use crate::smiles::SmilesError;

/// Errors produced when encoding a molecule as SELFIES.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The SMILES input could not be turned into a molecular graph.
    #[error("invalid input graph: {0}")]
    InvalidInputGraph(#[from] SmilesError),
    /// An atom has no element symbol (atomic number 0 or out of range).
    #[error("atom {atom} has no element (atomic number {atomic_num})")]
    UnknownElement { atom: usize, atomic_num: u8 },
    /// An atom carries more bond order than its symbol allows, so the
    /// decoder would clamp it.
    #[error("atom {atom} ({symbol}) has bond order {bonds}, capacity is {capacity}")]
    ExceedsCapacity {
        atom: usize,
        symbol: String,
        bonds: u8,
        capacity: u8,
    },
    /// A branch length or ring distance does not fit in three index symbols.
    #[error("index {value} exceeds the largest encodable index {max}")]
    IndexOverflow { value: usize, max: usize },
}

/// Errors produced by label and one-hot encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("symbol {0} is not in the vocabulary")]
    UnknownSymbol(String),
    #[error("label {0} is not in the vocabulary")]
    UnknownLabel(usize),
    #[error("{len} symbols do not fit in a padded length of {pad_to}")]
    TooLong { len: usize, pad_to: usize },
    #[error("the vocabulary has no [nop] entry to pad with")]
    MissingPadding,
}
