/// Tetrahedral chirality tag.
///
/// The tag is only meaningful together with a neighbour order. On a
/// [`Mol`](crate::Mol) it is always relative to the reference order returned by
/// [`Mol::stereo_neighbors`](crate::Mol::stereo_neighbors); SMILES and SELFIES
/// text express it relative to their own written order and are converted at
/// the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chirality {
    #[default]
    None,
    /// Clockwise (`@@`).
    Cw,
    /// Counterclockwise (`@`).
    Ccw,
}

impl Chirality {
    pub fn inverted(self) -> Self {
        match self {
            Chirality::Cw => Chirality::Ccw,
            Chirality::Ccw => Chirality::Cw,
            Chirality::None => Chirality::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Chirality::None => "",
            Chirality::Ccw => "@",
            Chirality::Cw => "@@",
        }
    }
}

/// Default atom type for a molecular graph node.
///
/// `Atom` stores the properties that survive a round trip through both
/// string notations: element, charge, isotope, hydrogen count and
/// tetrahedral chirality.
///
/// # Examples
///
/// ```
/// use selfies::Atom;
///
/// let carbon = Atom {
///     atomic_num: 6,
///     hydrogen_count: 3,
///     ..Atom::default()
/// };
/// assert_eq!(carbon.atomic_num, 6);
/// assert_eq!(carbon.formal_charge, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Atom {
    /// Atomic number (1 = H, 6 = C, 7 = N, …).
    pub atomic_num: u8,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Mass number. `0` means natural isotopic abundance.
    pub isotope: u16,
    /// Number of virtual (suppressed) hydrogens on this atom.
    ///
    /// Hydrogens are never graph nodes; this count is the single source of
    /// truth for how many an atom carries.
    pub hydrogen_count: u8,
    /// Whether the atom was written aromatic in SMILES.
    ///
    /// Bonds always carry concrete Kekulé orders regardless of this flag.
    pub is_aromatic: bool,
    pub chirality: Chirality,
}

impl crate::traits::HasAtomicNum for Atom {
    fn atomic_num(&self) -> u8 {
        self.atomic_num
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i8 {
        self.formal_charge
    }
}

impl crate::traits::HasHydrogenCount for Atom {
    fn hydrogen_count(&self) -> u8 {
        self.hydrogen_count
    }
}
