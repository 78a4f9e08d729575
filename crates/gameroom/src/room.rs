use super::*;
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use xoxo_board::Symbol;

/// Cloneable handle for feeding connection events into the room.
/// Held by every WebSocket bridge task.
#[derive(Clone, Debug)]
pub struct RoomHandle {
    events: UnboundedSender<RoomEvent>,
}

impl RoomHandle {
    pub fn connect(&self, conn: Connection, tx: Tx) {
        let _ = self.events.send(RoomEvent::Connect { conn, tx });
    }
    pub fn inbound(&self, conn: Connection, text: String) {
        let _ = self.events.send(RoomEvent::Inbound { conn, text });
    }
    pub fn disconnect(&self, conn: Connection) {
        let _ = self.events.send(RoomEvent::Disconnect { conn });
    }
}

/// Live game coordinator.
/// Imperative shell that owns the Game (functional core) and the Table,
/// draining one event at a time so state mutation never interleaves.
pub struct Room {
    game: Game,
    table: Table,
    /// Connections that have opened but not yet identified.
    lobby: HashMap<Connection, Tx>,
    events: UnboundedReceiver<RoomEvent>,
}

impl Room {
    /// Spawns the room task for the process lifetime and returns the
    /// handle the transport layer feeds.
    pub fn spawn() -> RoomHandle {
        let (tx, rx) = unbounded_channel();
        let room = Self {
            game: Game::default(),
            table: Table::default(),
            lobby: HashMap::new(),
            events: rx,
        };
        tokio::spawn(room.run());
        RoomHandle { events: tx }
    }

    async fn run(mut self) {
        log::info!("[room] open, waiting for players");
        while let Some(event) = self.events.recv().await {
            self.handle(event);
        }
        log::info!("[room] all handles dropped, closing");
    }

    fn handle(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::Connect { conn, tx } => {
                log::debug!("[room] {} connected", conn);
                self.lobby.insert(conn, tx);
            }
            RoomEvent::Inbound { conn, text } => self.on_inbound(conn, text),
            RoomEvent::Disconnect { conn } => self.on_disconnect(conn),
        }
    }

    fn on_inbound(&mut self, conn: Connection, text: String) {
        match Protocol::decode(&text) {
            Ok(ClientMessage::Identify { client_id }) => self.on_identify(conn, client_id),
            Ok(ClientMessage::Move { index, symbol }) => self.on_move(conn, index, symbol),
            Ok(ClientMessage::PlayerInfo { info }) => self.on_info(conn, info),
            Ok(ClientMessage::Restart) => self.on_restart(conn),
            Err(e) => log::debug!("[room] dropping frame from {}: {}", conn, e),
        }
    }

    /// Seats or re-seats an identity and answers with the init snapshot.
    /// A full table gets an error reply and the socket is dropped closed.
    fn on_identify(&mut self, conn: Connection, identity: String) {
        let Some(tx) = self.lobby.remove(&conn) else {
            log::debug!("[room] {} re-identified, ignoring", conn);
            return;
        };
        if !self.table.admits(&identity) {
            log::info!("[room] rejecting {}: game full", conn);
            let _ = tx.send(ServerMessage::error("Game full").to_json());
            return;
        }
        let symbol = self
            .table
            .identify(&identity, conn, tx)
            .expect("admission checked");
        self.table.unicast(
            symbol,
            &ServerMessage::init(symbol, self.game.board(), self.game.turn(), self.game.scores()),
        );
    }

    /// Applies a move from an identified connection. The seat is
    /// authoritative; a claimed symbol that contradicts it is dropped.
    fn on_move(&mut self, conn: Connection, index: usize, claimed: Symbol) {
        let Some(symbol) = self.table.seat_of(conn) else {
            log::debug!("[room] move from unidentified {}", conn);
            return;
        };
        if claimed != symbol {
            log::debug!("[room] {} claims {} but sits at {}", conn, claimed, symbol);
            return;
        }
        match self.game.play(symbol, index) {
            Transition::Ignored => {
                log::debug!("[room] ignored move {} by {}", index, symbol);
            }
            Transition::Update => {
                log::debug!("[room] {} played {}: {}", symbol, index, self.game.board());
                self.table
                    .broadcast(&ServerMessage::update(self.game.board(), self.game.turn()));
            }
            Transition::Ended(outcome) => {
                log::info!("[room] game over: {}", outcome);
                self.table.broadcast(&ServerMessage::game_over(
                    self.game.board(),
                    outcome,
                    self.game.scores(),
                ));
            }
        }
    }

    fn on_info(&mut self, conn: Connection, info: serde_json::Value) {
        let Some(symbol) = self.table.seat_of(conn) else {
            log::debug!("[room] playerInfo from unidentified {}", conn);
            return;
        };
        self.table.set_info(symbol, info);
        self.table
            .broadcast(&ServerMessage::player_info(self.table.infos()));
    }

    /// Begins a fresh round. Allowed in any state, keeps the tallies.
    fn on_restart(&mut self, conn: Connection) {
        if self.table.seat_of(conn).is_none() {
            log::debug!("[room] restart from unidentified {}", conn);
            return;
        }
        self.game.restart();
        log::info!("[room] restarted");
        self.table.broadcast(&ServerMessage::restart(
            self.game.board(),
            self.game.turn(),
            self.game.scores(),
        ));
    }

    fn on_disconnect(&mut self, conn: Connection) {
        if self.lobby.remove(&conn).is_some() {
            log::debug!("[room] {} left before identifying", conn);
        } else {
            self.table.vacate(conn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Opens a socket to the room and identifies with the given identity.
    fn join(room: &RoomHandle, identity: &str) -> (Connection, UnboundedReceiver<String>) {
        let conn = Connection::default();
        let (tx, rx) = unbounded_channel();
        room.connect(conn, tx);
        room.inbound(
            conn,
            format!(r#"{{"type":"identify","clientId":"{}"}}"#, identity),
        );
        (conn, rx)
    }

    async fn next(rx: &mut UnboundedReceiver<String>) -> serde_json::Value {
        serde_json::from_str(&rx.recv().await.expect("message")).expect("json")
    }

    #[tokio::test]
    async fn identify_assigns_x_then_o_with_init_snapshots() {
        let room = Room::spawn();
        let (_, mut rx_x) = join(&room, "alice");
        let (_, mut rx_o) = join(&room, "bob");
        let init_x = next(&mut rx_x).await;
        let init_o = next(&mut rx_o).await;
        assert_eq!(init_x["type"], "init");
        assert_eq!(init_x["symbol"], "X");
        assert_eq!(init_o["symbol"], "O");
        assert_eq!(init_x["currentPlayer"], "X");
        assert_eq!(init_x["scores"]["X"], 0);
    }

    #[tokio::test]
    async fn left_column_win_is_broadcast_with_scores() {
        let room = Room::spawn();
        let (conn_x, mut rx_x) = join(&room, "alice");
        let (conn_o, mut rx_o) = join(&room, "bob");
        next(&mut rx_x).await;
        next(&mut rx_o).await;
        for (conn, symbol, index) in [
            (conn_x, "X", 0),
            (conn_o, "O", 1),
            (conn_x, "X", 3),
            (conn_o, "O", 4),
            (conn_x, "X", 6),
        ] {
            room.inbound(
                conn,
                format!(r#"{{"type":"move","index":{},"symbol":"{}"}}"#, index, symbol),
            );
        }
        for _ in 0..4 {
            assert_eq!(next(&mut rx_o).await["type"], "update");
        }
        let over = next(&mut rx_o).await;
        assert_eq!(over["type"], "gameOver");
        assert_eq!(over["result"], "X");
        assert_eq!(over["scores"]["X"], 1);
        assert_eq!(over["scores"]["O"], 0);
        assert_eq!(over["board"][0], "X");
        assert_eq!(over["board"][2], serde_json::Value::Null);
        // the winner saw the same terminal broadcast
        for _ in 0..4 {
            next(&mut rx_x).await;
        }
        assert_eq!(next(&mut rx_x).await["type"], "gameOver");
    }

    #[tokio::test]
    async fn third_identity_is_rejected_and_closed() {
        let room = Room::spawn();
        let (_, mut rx_x) = join(&room, "alice");
        let (_, mut rx_o) = join(&room, "bob");
        next(&mut rx_x).await;
        next(&mut rx_o).await;
        let (_, mut rx_c) = join(&room, "carol");
        let error = next(&mut rx_c).await;
        assert_eq!(error["type"], "error");
        assert_eq!(error["message"], "Game full");
        // the room dropped the sender, closing the socket
        assert!(rx_c.recv().await.is_none());
    }

    #[tokio::test]
    async fn reconnection_restores_symbol_and_board() {
        let room = Room::spawn();
        let (conn_x, mut rx_x) = join(&room, "alice");
        let (_, mut rx_o) = join(&room, "bob");
        next(&mut rx_x).await;
        next(&mut rx_o).await;
        room.inbound(conn_x, r#"{"type":"move","index":4,"symbol":"X"}"#.to_string());
        next(&mut rx_x).await;
        room.disconnect(conn_x);
        let (_, mut rx_back) = join(&room, "alice");
        let init = next(&mut rx_back).await;
        assert_eq!(init["symbol"], "X");
        assert_eq!(init["board"][4], "X");
        assert_eq!(init["currentPlayer"], "O");
    }

    #[tokio::test]
    async fn moves_before_identify_and_spoofed_symbols_are_dropped() {
        let room = Room::spawn();
        let (conn_x, mut rx_x) = join(&room, "alice");
        next(&mut rx_x).await;
        // unidentified socket tries to play
        let ghost = Connection::default();
        let (ghost_tx, _ghost_rx) = unbounded_channel();
        room.connect(ghost, ghost_tx);
        room.inbound(ghost, r#"{"type":"move","index":0,"symbol":"X"}"#.to_string());
        // seated X tries to play as O
        room.inbound(conn_x, r#"{"type":"move","index":0,"symbol":"O"}"#.to_string());
        // a restart flushes the room; nothing arrived in between
        room.inbound(conn_x, r#"{"type":"restart"}"#.to_string());
        let flushed = next(&mut rx_x).await;
        assert_eq!(flushed["type"], "restart");
        assert_eq!(flushed["board"][0], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn player_info_is_recorded_and_broadcast() {
        let room = Room::spawn();
        let (conn_x, mut rx_x) = join(&room, "alice");
        let (_, mut rx_o) = join(&room, "bob");
        next(&mut rx_x).await;
        next(&mut rx_o).await;
        room.inbound(
            conn_x,
            r#"{"type":"playerInfo","info":{"name":"alice","avatar":"cat"}}"#.to_string(),
        );
        let seen = next(&mut rx_o).await;
        assert_eq!(seen["type"], "playerInfo");
        assert_eq!(seen["playerInfo"]["X"]["name"], "alice");
        assert!(seen["playerInfo"].get("O").is_none());
    }

    #[tokio::test]
    async fn restart_after_win_keeps_scores() {
        let room = Room::spawn();
        let (conn_x, mut rx_x) = join(&room, "alice");
        let (conn_o, mut rx_o) = join(&room, "bob");
        next(&mut rx_x).await;
        next(&mut rx_o).await;
        for (conn, symbol, index) in [
            (conn_x, "X", 0),
            (conn_o, "O", 1),
            (conn_x, "X", 3),
            (conn_o, "O", 4),
            (conn_x, "X", 6),
        ] {
            room.inbound(
                conn,
                format!(r#"{{"type":"move","index":{},"symbol":"{}"}}"#, index, symbol),
            );
        }
        room.inbound(conn_o, r#"{"type":"restart"}"#.to_string());
        for _ in 0..5 {
            next(&mut rx_o).await;
        }
        let restarted = next(&mut rx_o).await;
        assert_eq!(restarted["type"], "restart");
        assert_eq!(restarted["currentPlayer"], "X");
        assert_eq!(restarted["scores"]["X"], 1);
        assert_eq!(restarted["board"][6], serde_json::Value::Null);
    }
}
