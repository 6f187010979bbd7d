//! Positional numerals over the index sub-alphabet.
//!
//! Branch and ring operands are written as runs of ordinary symbols read in
//! their index role. The first symbol is the most significant digit.

/// Index symbols in digit order; the position of a symbol is its value.
pub const INDEX_ALPHABET: [&str; 16] = [
    "[C]",
    "[Ring1]",
    "[Ring2]",
    "[Branch1]",
    "[=Branch1]",
    "[#Branch1]",
    "[Branch2]",
    "[=Branch2]",
    "[#Branch2]",
    "[O]",
    "[N]",
    "[=N]",
    "[=C]",
    "[#C]",
    "[S]",
    "[P]",
];

pub const INDEX_BASE: usize = INDEX_ALPHABET.len();

/// Longest operand run a `Branch` or `Ring` symbol can announce.
pub const MAX_INDEX_WIDTH: usize = 3;

/// Largest operand value that fits in [`MAX_INDEX_WIDTH`] digits.
pub const MAX_INDEX: usize = INDEX_BASE * INDEX_BASE * INDEX_BASE - 1;

/// Digit value of `symbol`, or `None` when it is not an index symbol.
pub fn index_of(symbol: &str) -> Option<usize> {
    INDEX_ALPHABET.iter().position(|&s| s == symbol)
}

/// Write `n` as exactly `length` index symbols. Digits above `length` are
/// dropped.
pub fn encode_index(n: usize, length: usize) -> Vec<&'static str> {
    let mut digits = vec![INDEX_ALPHABET[0]; length];
    let mut rest = n;
    for slot in digits.iter_mut().rev() {
        *slot = INDEX_ALPHABET[rest % INDEX_BASE];
        rest /= INDEX_BASE;
    }
    digits
}

/// Read a run of symbols as a base-16 number. Symbols outside the index
/// alphabet count as zero; an empty run is zero.
pub fn decode_indices<'a, I>(symbols: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    symbols.into_iter().fold(0usize, |acc, s| {
        acc.saturating_mul(INDEX_BASE)
            .saturating_add(index_of(s).unwrap_or(0))
    })
}

/// Fewest digits that represent `n`, or `None` past [`MAX_INDEX_WIDTH`].
pub fn index_width(n: usize) -> Option<usize> {
    let mut width = 1;
    let mut limit = INDEX_BASE;
    while n >= limit {
        width += 1;
        limit = limit.checked_mul(INDEX_BASE)?;
    }
    (width <= MAX_INDEX_WIDTH).then_some(width)
}
