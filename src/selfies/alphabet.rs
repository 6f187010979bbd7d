//! Bonding capacities of atom symbols, and the process-wide table used by the
//! free-function entry points.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::selfies::symbol::AtomSymbol;

/// Key of the entry used when nothing else matches.
pub const FALLBACK_KEY: &str = "?";

const DEFAULT_CAPACITIES: [(&str, u8); 24] = [
    ("[H]", 1),
    ("[F]", 1),
    ("[Cl]", 1),
    ("[Br]", 1),
    ("[I]", 1),
    ("[B]", 3),
    ("[B+1]", 2),
    ("[B-1]", 4),
    ("[O]", 2),
    ("[O+1]", 3),
    ("[O-1]", 1),
    ("[N]", 3),
    ("[N+1]", 4),
    ("[N-1]", 2),
    ("[C]", 4),
    ("[C+1]", 3),
    ("[C-1]", 3),
    ("[P]", 5),
    ("[P+1]", 4),
    ("[P-1]", 6),
    ("[S]", 6),
    ("[S+1]", 5),
    ("[S-1]", 5),
    (FALLBACK_KEY, 1),
];

/// Where a capacity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacitySource {
    Table,
    /// The element's largest default valence; only for neutral atoms.
    DefaultValence,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub value: u8,
    pub source: CapacitySource,
}

/// Map from atom key (`[C]`, `[N+1]`, …) to bonding capacity.
///
/// Keys are stored in bracketed element-and-charge form; anything else a
/// caller passes in is normalised on insertion. Serialises as a plain map:
///
/// ```
/// use selfies::SymbolTable;
///
/// let table: SymbolTable = serde_json::from_str(r#"{"[C]": 4, "?": 2}"#).unwrap();
/// assert_eq!(table.get("[C]"), Some(4));
/// assert_eq!(table.get("?"), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u8>", into = "BTreeMap<String, u8>")]
pub struct SymbolTable {
    capacities: BTreeMap<String, u8>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::from(
            DEFAULT_CAPACITIES
                .iter()
                .map(|&(k, v)| (k.to_string(), v))
                .collect::<BTreeMap<_, _>>(),
        )
    }
}

impl From<BTreeMap<String, u8>> for SymbolTable {
    fn from(map: BTreeMap<String, u8>) -> Self {
        let mut table = Self::empty();
        for (key, value) in map {
            table.insert(&key, value);
        }
        table
    }
}

impl From<SymbolTable> for BTreeMap<String, u8> {
    fn from(table: SymbolTable) -> Self {
        table.capacities
    }
}

impl SymbolTable {
    /// The built-in table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with no entries. Lookups still succeed through the element
    /// default valences and a fallback capacity of 1.
    pub fn empty() -> Self {
        Self {
            capacities: BTreeMap::new(),
        }
    }

    pub fn with_capacity(mut self, key: &str, capacity: u8) -> Self {
        self.insert(key, capacity);
        self
    }

    pub fn with_entries<K, I>(mut self, entries: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, u8)>,
    {
        for (key, capacity) in entries {
            self.insert(key.as_ref(), capacity);
        }
        self
    }

    pub fn insert(&mut self, key: &str, capacity: u8) -> Option<u8> {
        self.capacities.insert(normalize_key(key), capacity)
    }

    pub fn remove(&mut self, key: &str) -> Option<u8> {
        self.capacities.remove(&normalize_key(key))
    }

    pub fn get(&self, key: &str) -> Option<u8> {
        self.capacities.get(&normalize_key(key)).copied()
    }

    pub fn len(&self) -> usize {
        self.capacities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> + '_ {
        self.capacities.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Total bonding capacity of `atom`, before explicit hydrogens.
    ///
    /// Never fails: exact key, then the element's default valence for neutral
    /// atoms, then the fallback entry.
    pub fn capacity(&self, atom: &AtomSymbol) -> Capacity {
        if let Some(&value) = self.capacities.get(&atom.table_key()) {
            return Capacity {
                value,
                source: CapacitySource::Table,
            };
        }
        if atom.charge == 0 {
            if let Some(value) = atom.element.max_default_valence() {
                return Capacity {
                    value,
                    source: CapacitySource::DefaultValence,
                };
            }
        }
        Capacity {
            value: self.fallback(),
            source: CapacitySource::Fallback,
        }
    }

    pub fn fallback(&self) -> u8 {
        self.capacities.get(FALLBACK_KEY).copied().unwrap_or(1)
    }

    /// Every symbol a generator may draw from: atoms with the bond prefixes
    /// their capacity allows, branch and ring symbols, and `[nop]`.
    pub fn alphabet(&self) -> HashSet<String> {
        let mut alphabet = HashSet::new();
        for (key, &capacity) in &self.capacities {
            let Some(inner) = key.strip_prefix('[') else {
                continue;
            };
            alphabet.insert(key.clone());
            for (prefix, needed) in [("=", 2), ("#", 3)] {
                if capacity >= needed {
                    alphabet.insert(format!("[{prefix}{inner}"));
                }
            }
        }
        for len in 1..=3 {
            for prefix in ["", "=", "#"] {
                alphabet.insert(format!("[{prefix}Branch{len}]"));
                alphabet.insert(format!("[{prefix}Ring{len}]"));
            }
        }
        alphabet.insert("[nop]".to_string());
        alphabet
    }

    pub fn atom_dict(&self) -> HashMap<String, u8> {
        self.capacities.clone().into_iter().collect()
    }
}

/// `C`, `[C]` and `[-C]` all name the `[C]` entry; `?` stays as it is.
/// Text that is not an atom symbol is kept verbatim.
fn normalize_key(key: &str) -> String {
    let inner = key
        .strip_prefix('[')
        .and_then(|k| k.strip_suffix(']'))
        .unwrap_or(key);
    match AtomSymbol::parse(inner) {
        Some(atom) => atom.table_key(),
        None => key.to_string(),
    }
}

static GLOBAL_TABLE: LazyLock<RwLock<Arc<SymbolTable>>> =
    LazyLock::new(|| RwLock::new(Arc::new(SymbolTable::default())));

/// The process-wide table as of now. Later [`set_alphabet`] calls do not
/// affect the returned snapshot.
pub fn current_table() -> Arc<SymbolTable> {
    GLOBAL_TABLE.read().clone()
}

/// A fresh copy of the process-wide alphabet.
pub fn get_alphabet() -> HashSet<String> {
    current_table().alphabet()
}

/// A fresh copy of the process-wide capacity map, including the `?` entry.
pub fn get_atom_dict() -> HashMap<String, u8> {
    current_table().atom_dict()
}

/// Replace the process-wide table.
///
/// `None` restores the built-in table; `Some(map)` installs the built-in
/// table overlaid with `map`. The swap is whole: readers see the old or the
/// new table, never a mix.
pub fn set_alphabet(overrides: Option<HashMap<String, u8>>) {
    let table = match overrides {
        None => SymbolTable::default(),
        Some(map) => SymbolTable::default().with_entries(map),
    };
    *GLOBAL_TABLE.write() = Arc::new(table);
}
