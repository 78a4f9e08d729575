/// Player symbol: the two fixed marks on the grid.
///
/// X always moves first. Turn order alternates via [`Symbol::other`].
/// Serialized on the wire as the bare strings `"X"` and `"O"`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// Both symbols in seating order.
    pub const fn all() -> [Symbol; 2] {
        [Symbol::X, Symbol::O]
    }
    /// The opposing symbol.
    pub const fn other(&self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

/// str isomorphism
impl TryFrom<&str> for Symbol {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim() {
            "X" | "x" => Ok(Symbol::X),
            "O" | "o" => Ok(Symbol::O),
            _ => Err(format!("invalid symbol str: {}", s)),
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Symbol::X => write!(f, "X"),
            Symbol::O => write!(f, "O"),
        }
    }
}
