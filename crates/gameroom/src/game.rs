use xoxo_board::Board;
use xoxo_board::Outcome;
use xoxo_board::Symbol;
use xoxo_core::Score;

/// Win tallies per symbol. Persist across restarts for the server lifetime.
/// Serialized as `{"X": n, "O": n}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Scores {
    #[serde(rename = "X")]
    x: Score,
    #[serde(rename = "O")]
    o: Score,
}

impl Scores {
    /// Credits one win to a symbol.
    pub fn tally(&mut self, symbol: Symbol) {
        match symbol {
            Symbol::X => self.x += 1,
            Symbol::O => self.o += 1,
        }
    }
    pub fn get(&self, symbol: Symbol) -> Score {
        match symbol {
            Symbol::X => self.x,
            Symbol::O => self.o,
        }
    }
}

/// What a move did to the game, and therefore what to tell the players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move was illegal; state unchanged, nothing to send.
    Ignored,
    /// Move applied, game continues with the turn flipped.
    Update,
    /// Move applied and ended the game.
    Ended(Outcome),
}

/// Turn state machine for one game instance.
///
/// Lives for the process lifetime. `InProgress` and `Over` are the only
/// states; a restart is the sole transition out of `Over`. Scores survive
/// restarts, the board and turn do not.
#[derive(Debug)]
pub struct Game {
    board: Board,
    turn: Symbol,
    over: bool,
    scores: Scores,
}

impl Default for Game {
    fn default() -> Self {
        Self {
            board: Board::default(),
            turn: Symbol::X,
            over: false,
            scores: Scores::default(),
        }
    }
}

impl Game {
    pub fn board(&self) -> &Board {
        &self.board
    }
    /// Symbol to move. Once the game is over this freezes at the symbol
    /// that played last, which is what reconnecting clients are shown.
    pub fn turn(&self) -> Symbol {
        self.turn
    }
    pub fn scores(&self) -> Scores {
        self.scores
    }
    pub fn over(&self) -> bool {
        self.over
    }

    /// Applies a move. Illegal moves are dropped without state change:
    /// game over, occupied or out-of-range cell, or a symbol out of turn.
    /// A decisive result credits exactly one win before entering `Over`.
    pub fn play(&mut self, symbol: Symbol, index: usize) -> Transition {
        if self.over || symbol != self.turn || !self.board.is_open(index) {
            return Transition::Ignored;
        }
        self.board.mark(index, symbol);
        match self.board.evaluate() {
            Some(outcome) => {
                if let Outcome::Win(winner) = outcome {
                    self.scores.tally(winner);
                }
                self.over = true;
                Transition::Ended(outcome)
            }
            None => {
                self.turn = symbol.other();
                Transition::Update
            }
        }
    }

    /// Resets board and turn, re-entering `InProgress`. Allowed in any
    /// state; never touches the scores.
    pub fn restart(&mut self) {
        self.board = Board::default();
        self.turn = Symbol::X;
        self.over = false;
    }
}
