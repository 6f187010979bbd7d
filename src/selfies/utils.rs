//! Helpers for working with SELFIES as token sequences: lengths, alphabets
//! and label/one-hot encodings for machine-learning pipelines.

use std::collections::{HashMap, HashSet};

use crate::selfies::error::EncodingError;
pub use crate::selfies::symbol::split_selfies;

/// Symbol used to pad label encodings to a fixed length.
pub const PAD_SYMBOL: &str = "[nop]";

/// Number of symbols in `selfies`, counting `.` and any no-ops.
pub fn len_selfies(selfies: &str) -> usize {
    split_selfies(selfies).count()
}

/// Every distinct symbol used across `strings`, without `.`.
pub fn get_alphabet_from_selfies<I, S>(strings: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut alphabet = HashSet::new();
    for s in strings {
        for symbol in split_selfies(s.as_ref()) {
            if symbol != "." {
                alphabet.insert(symbol.to_string());
            }
        }
    }
    alphabet
}

/// Label and one-hot encodings of `selfies` over `vocab_stoi`.
///
/// With `pad_to`, the sequence is padded with `[nop]` up to that length;
/// a longer sequence is rejected rather than truncated.
pub fn selfies_to_encoding(
    selfies: &str,
    vocab_stoi: &HashMap<String, usize>,
    pad_to: Option<usize>,
) -> Result<(Vec<usize>, Vec<Vec<u8>>), EncodingError> {
    let mut labels = split_selfies(selfies)
        .map(|symbol| {
            vocab_stoi
                .get(symbol)
                .copied()
                .ok_or_else(|| EncodingError::UnknownSymbol(symbol.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(pad_to) = pad_to {
        if labels.len() > pad_to {
            return Err(EncodingError::TooLong {
                len: labels.len(),
                pad_to,
            });
        }
        if labels.len() < pad_to {
            let pad = *vocab_stoi
                .get(PAD_SYMBOL)
                .ok_or(EncodingError::MissingPadding)?;
            labels.resize(pad_to, pad);
        }
    }

    let width = vocab_stoi.values().max().map_or(0, |&m| m + 1);
    let one_hot = labels
        .iter()
        .map(|&label| {
            let mut row = vec![0u8; width];
            row[label] = 1;
            row
        })
        .collect();
    Ok((labels, one_hot))
}

/// Inverse of the label encoding. Padding symbols are dropped.
pub fn encoding_to_selfies(
    labels: &[usize],
    vocab_itos: &HashMap<usize, String>,
) -> Result<String, EncodingError> {
    let mut out = String::new();
    for &label in labels {
        let symbol = vocab_itos
            .get(&label)
            .ok_or(EncodingError::UnknownLabel(label))?;
        if symbol != PAD_SYMBOL {
            out.push_str(symbol);
        }
    }
    Ok(out)
}
