#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
}

impl BondOrder {
    /// Number of valence units the bond consumes on each endpoint.
    pub fn valence(self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }

    /// Inverse of [`valence`](Self::valence). `None` outside `1..=3`.
    pub fn from_valence(v: u8) -> Option<Self> {
        match v {
            1 => Some(BondOrder::Single),
            2 => Some(BondOrder::Double),
            3 => Some(BondOrder::Triple),
            _ => None,
        }
    }

    /// Prefix character in SMILES and SELFIES; empty for single bonds.
    pub fn symbol(self) -> &'static str {
        match self {
            BondOrder::Single => "",
            BondOrder::Double => "=",
            BondOrder::Triple => "#",
        }
    }
}

/// Directional marker of a single bond (`/` or `\`).
///
/// Stored relative to the bond's endpoints as returned by
/// [`Mol::bond_endpoints`](crate::Mol::bond_endpoints): `Up` means the bond
/// reads `a/b` when written from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondDirection {
    #[default]
    None,
    Up,
    Down,
}

impl BondDirection {
    pub fn flip(self) -> Self {
        match self {
            BondDirection::Up => BondDirection::Down,
            BondDirection::Down => BondDirection::Up,
            BondDirection::None => BondDirection::None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BondDirection::None => "",
            BondDirection::Up => "/",
            BondDirection::Down => "\\",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bond {
    pub order: BondOrder,
    pub direction: BondDirection,
}

impl Bond {
    pub fn with_order(order: BondOrder) -> Self {
        Self {
            order,
            direction: BondDirection::None,
        }
    }
}

impl crate::traits::HasBondOrder for Bond {
    fn bond_order(&self) -> BondOrder {
        self.order
    }
}

/// Bond order as written in SMILES, before kekulization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SmilesBondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
    #[default]
    Implicit,
}

impl SmilesBondOrder {
    /// Valence units the SMILES reader attributes to the bond when deriving
    /// implicit hydrogens (aromatic and implicit bonds count as one).
    pub fn valence(self) -> u8 {
        match self {
            SmilesBondOrder::Double => 2,
            SmilesBondOrder::Triple => 3,
            SmilesBondOrder::Single | SmilesBondOrder::Aromatic | SmilesBondOrder::Implicit => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SmilesBond {
    pub order: SmilesBondOrder,
    pub direction: BondDirection,
}
