use super::Scores;
use serde::Deserialize;
use serde::Serialize;
use xoxo_board::Board;
use xoxo_board::Outcome;
use xoxo_board::Symbol;

/// Messages sent from client to server over WebSocket.
/// Unknown types and malformed frames are dropped at the protocol layer.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Claims or reclaims a seat with a durable opaque identity.
    #[serde(rename_all = "camelCase")]
    Identify { client_id: String },
    /// Attaches display metadata to the sender's seat.
    PlayerInfo { info: serde_json::Value },
    /// Plays the sender's symbol at a cell.
    Move { index: usize, symbol: Symbol },
    /// Starts a fresh round, keeping scores.
    Restart,
}

/// Messages sent from server to client over WebSocket.
/// Every state-bearing message carries the full snapshot rather than a
/// delta, so clients never need to reconcile.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Seat assignment plus the current snapshot, sent once per identify.
    #[serde(rename_all = "camelCase")]
    Init {
        symbol: Symbol,
        board: Board,
        current_player: Symbol,
        scores: Scores,
    },
    /// Board state after a non-terminal move.
    #[serde(rename_all = "camelCase")]
    Update { board: Board, current_player: Symbol },
    /// The game ended; result is the winning symbol or `draw`.
    GameOver {
        board: Board,
        result: String,
        scores: Scores,
    },
    /// A fresh round began.
    #[serde(rename_all = "camelCase")]
    Restart {
        board: Board,
        current_player: Symbol,
        scores: Scores,
    },
    /// Display metadata for all seats that have provided any.
    #[serde(rename_all = "camelCase")]
    PlayerInfo { player_info: serde_json::Value },
    /// Rejection notice; the connection closes immediately after.
    Error { message: String },
}

impl ServerMessage {
    pub fn init(symbol: Symbol, board: &Board, current_player: Symbol, scores: Scores) -> Self {
        Self::Init {
            symbol,
            board: board.clone(),
            current_player,
            scores,
        }
    }
    pub fn update(board: &Board, current_player: Symbol) -> Self {
        Self::Update {
            board: board.clone(),
            current_player,
        }
    }
    pub fn game_over(board: &Board, outcome: Outcome, scores: Scores) -> Self {
        Self::GameOver {
            board: board.clone(),
            result: outcome.to_string(),
            scores,
        }
    }
    pub fn restart(board: &Board, current_player: Symbol, scores: Scores) -> Self {
        Self::Restart {
            board: board.clone(),
            current_player,
            scores,
        }
    }
    pub fn player_info(player_info: serde_json::Value) -> Self {
        Self::PlayerInfo { player_info }
    }
    pub fn error(message: &str) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_wire_shape() {
        let mut board = Board::default();
        board.mark(4, Symbol::O);
        let json = ServerMessage::init(Symbol::X, &board, Symbol::X, Scores::default()).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "init");
        assert_eq!(value["symbol"], "X");
        assert_eq!(value["currentPlayer"], "X");
        assert_eq!(value["board"][4], "O");
        assert_eq!(value["board"][0], serde_json::Value::Null);
        assert_eq!(value["scores"]["X"], 0);
        assert_eq!(value["scores"]["O"], 0);
    }

    #[test]
    fn game_over_result_tokens() {
        let board = Board::default();
        let scores = Scores::default();
        let win = ServerMessage::game_over(&board, Outcome::Win(Symbol::O), scores).to_json();
        let draw = ServerMessage::game_over(&board, Outcome::Draw, scores).to_json();
        let win: serde_json::Value = serde_json::from_str(&win).unwrap();
        let draw: serde_json::Value = serde_json::from_str(&draw).unwrap();
        assert_eq!(win["type"], "gameOver");
        assert_eq!(win["result"], "O");
        assert_eq!(draw["result"], "draw");
    }

    #[test]
    fn error_wire_shape() {
        let value: serde_json::Value =
            serde_json::from_str(&ServerMessage::error("Game full").to_json()).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["message"], "Game full");
    }
}
