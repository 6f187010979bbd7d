//! The process-wide table is shared by every test in a binary, so all
//! `set_alphabet` checks live in this single test.

use std::collections::HashMap;

use selfies::{decoder, encoder, get_alphabet, get_atom_dict, set_alphabet, EncodeError};

#[test]
fn process_wide_table() {
    // Contents of the built-in table.
    let alphabet = get_alphabet();
    for symbol in ["[C]", "[=C]", "[#C]", "[Branch1]", "[=Ring3]", "[nop]", "[N+1]"] {
        assert!(alphabet.contains(symbol), "{symbol}");
    }
    for symbol in ["[epsilon]", ".", "?", "[#O]"] {
        assert!(!alphabet.contains(symbol), "{symbol}");
    }
    let dict = get_atom_dict();
    assert_eq!(dict.get("?"), Some(&1));
    assert_eq!(dict.get("[C]"), Some(&4));

    // Snapshots are independent copies.
    let mut snapshot = get_atom_dict();
    snapshot.insert("[C]".to_string(), 1);
    let mut alphabet_copy = get_alphabet();
    alphabet_copy.clear();
    assert_eq!(get_atom_dict().get("[C]"), Some(&4));
    assert!(!get_alphabet().is_empty());

    // Overlay.
    assert_eq!(decoder("[C][Fe][C]"), "C[Fe]");
    set_alphabet(Some(HashMap::from([
        ("[Fe]".to_string(), 2),
        ("[C]".to_string(), 3),
    ])));
    assert_eq!(get_atom_dict().get("[Fe]"), Some(&2));
    assert_eq!(get_atom_dict().get("[O]"), Some(&2));
    assert!(get_alphabet().contains("[=Fe]"));
    assert_eq!(decoder("[C][Fe][C]"), "C[Fe]C");
    assert!(matches!(
        encoder("CC(C)(C)C"),
        Err(EncodeError::ExceedsCapacity { atom: 1, .. })
    ));
    assert_eq!(dict.get("[C]"), Some(&4), "earlier snapshot changed");

    // Reset.
    set_alphabet(None);
    assert_eq!(get_atom_dict().get("[Fe]"), None);
    assert_eq!(get_atom_dict().get("[C]"), Some(&4));
    assert_eq!(encoder("CC(C)(C)C").unwrap(), "[C][C][Branch1][C][C][Branch1][C][C][C]");
}
