use super::Outcome;
use super::Symbol;
use xoxo_core::CELLS;

/// The 8 uniform triples that decide a game: 3 rows, 3 columns, 2 diagonals.
const WINS: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Row-major 9-cell grid. Cells are empty until marked; marks are never
/// erased except by a full reset.
///
/// Serializes to the wire shape directly: a 9-array of `null`, `"X"`, `"O"`.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Board([Option<Symbol>; CELLS]);

impl Board {
    /// The mark at a cell, if any. Out-of-range indices read as empty.
    pub fn get(&self, index: usize) -> Option<Symbol> {
        self.0.get(index).copied().flatten()
    }
    /// True when the cell exists and holds no mark.
    pub fn is_open(&self, index: usize) -> bool {
        index < CELLS && self.0[index].is_none()
    }
    /// True when every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }
    /// Writes a mark. Out-of-range indices are ignored.
    pub fn mark(&mut self, index: usize, symbol: Symbol) {
        if index < CELLS {
            self.0[index] = Some(symbol);
        }
    }
    /// Evaluates the grid for a terminal state.
    ///
    /// A uniform non-empty triple wins for its symbol; a full grid with no
    /// winner is a draw; anything else means the game continues.
    pub fn evaluate(&self) -> Option<Outcome> {
        for [a, b, c] in WINS {
            if let Some(symbol) = self.0[a] {
                if self.0[b] == Some(symbol) && self.0[c] == Some(symbol) {
                    return Some(Outcome::Win(symbol));
                }
            }
        }
        if self.is_full() {
            return Some(Outcome::Draw);
        }
        None
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in self.0.chunks(3) {
            for cell in row {
                match cell {
                    Some(symbol) => write!(f, "{}", symbol)?,
                    None => write!(f, ".")?,
                }
            }
            write!(f, " ")?;
        }
        Ok(())
    }
}
