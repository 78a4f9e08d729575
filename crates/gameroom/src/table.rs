use super::Connection;
use super::ServerMessage;
use super::Tx;
use xoxo_board::Symbol;
use xoxo_core::N;

/// One of the two fixed seats. Seats are never created or destroyed;
/// only their identity, connection, and display fields mutate.
#[derive(Debug, Default)]
struct Seat {
    /// Durable opaque identity, stable across reconnects.
    identity: Option<String>,
    /// Live connection, absent while the player is disconnected.
    /// At most one connection is attached at a time.
    sender: Option<(Connection, Tx)>,
    /// Display metadata supplied by the client.
    info: Option<serde_json::Value>,
}

/// Both seats hold a recorded identity and a new one asked to sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFull;

impl std::fmt::Display for TableFull {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game full")
    }
}

impl std::error::Error for TableFull {}

/// Fixed two-seat registry mapping durable client identities to symbols
/// and live connections. Seats are a slot-indexed array, not a dynamic
/// collection; X is seated before O.
#[derive(Debug, Default)]
pub struct Table {
    seats: [Seat; N],
}

impl Table {
    fn index(symbol: Symbol) -> usize {
        match symbol {
            Symbol::X => 0,
            Symbol::O => 1,
        }
    }
    fn seat(&self, symbol: Symbol) -> &Seat {
        &self.seats[Self::index(symbol)]
    }
    fn seat_mut(&mut self, symbol: Symbol) -> &mut Seat {
        &mut self.seats[Self::index(symbol)]
    }

    /// True when this identity can be seated: it is already recorded, or
    /// some seat has no recorded identity yet.
    pub fn admits(&self, identity: &str) -> bool {
        Symbol::all().iter().any(|&s| {
            self.seat(s)
                .identity
                .as_deref()
                .map_or(true, |known| known == identity)
        })
    }

    /// Seats an identity: a recorded identity rebinds its seat's
    /// connection (reconnection, even over a stale handle), an unseen one
    /// claims the first free seat, and a full table rejects.
    pub fn identify(
        &mut self,
        identity: &str,
        conn: Connection,
        tx: Tx,
    ) -> Result<Symbol, TableFull> {
        for symbol in Symbol::all() {
            if self.seat(symbol).identity.as_deref() == Some(identity) {
                self.seat_mut(symbol).sender = Some((conn, tx));
                log::info!("[table] {} reconnected as {}", conn, symbol);
                return Ok(symbol);
            }
        }
        for symbol in Symbol::all() {
            let seat = self.seat_mut(symbol);
            if seat.identity.is_none() {
                seat.identity = Some(identity.to_string());
                seat.sender = Some((conn, tx));
                log::info!("[table] {} seated as {}", conn, symbol);
                return Ok(symbol);
            }
        }
        Err(TableFull)
    }

    /// The symbol whose seat holds this live connection, if any.
    pub fn seat_of(&self, conn: Connection) -> Option<Symbol> {
        Symbol::all().into_iter().find(|&s| {
            self.seat(s)
                .sender
                .as_ref()
                .map_or(false, |(c, _)| *c == conn)
        })
    }

    /// Detaches a closed connection from its seat. Identity, display info,
    /// and the seat reservation itself are retained.
    pub fn vacate(&mut self, conn: Connection) -> Option<Symbol> {
        let symbol = self.seat_of(conn)?;
        self.seat_mut(symbol).sender = None;
        log::info!("[table] {} vacated by {}", symbol, conn);
        Some(symbol)
    }

    /// Records display metadata for a seat.
    pub fn set_info(&mut self, symbol: Symbol, info: serde_json::Value) {
        self.seat_mut(symbol).info = Some(info);
    }

    /// The full symbol-to-info mapping for seats that provided any.
    pub fn infos(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for symbol in Symbol::all() {
            if let Some(info) = &self.seat(symbol).info {
                map.insert(symbol.to_string(), info.clone());
            }
        }
        serde_json::Value::Object(map)
    }

    /// Sends a message to one seat, best-effort.
    pub fn unicast(&self, symbol: Symbol, message: &ServerMessage) {
        match &self.seat(symbol).sender {
            Some((conn, tx)) => match tx.send(message.to_json()) {
                Ok(()) => log::debug!("[table] unicast to {} ({})", symbol, conn),
                Err(e) => log::warn!("[table] unicast to {} failed: {:?}", symbol, e),
            },
            None => log::debug!("[table] unicast to {}: seat empty", symbol),
        }
    }

    /// Sends a message to every seated connection. Empty seats are
    /// skipped; a failed send to one seat never blocks the other.
    pub fn broadcast(&self, message: &ServerMessage) {
        let json = message.to_json();
        for symbol in Symbol::all() {
            if let Some((_, tx)) = &self.seat(symbol).sender {
                match tx.send(json.clone()) {
                    Ok(()) => {}
                    Err(e) => log::warn!("[table] broadcast to {} failed: {:?}", symbol, e),
                }
            }
        }
    }

    #[cfg(test)]
    pub fn identity(&self, symbol: Symbol) -> Option<&str> {
        self.seat(symbol).identity.as_deref()
    }
    #[cfg(test)]
    pub fn attached(&self, symbol: Symbol) -> bool {
        self.seat(symbol).sender.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn seats_fill_x_then_o() {
        let mut table = Table::default();
        let (tx, _rx) = unbounded_channel();
        assert_eq!(table.identify("alice", Connection::default(), tx.clone()), Ok(Symbol::X));
        assert_eq!(table.identify("bob", Connection::default(), tx), Ok(Symbol::O));
    }

    #[test]
    fn reconnection_restores_symbol_without_consuming_a_seat() {
        let mut table = Table::default();
        let (tx, _rx) = unbounded_channel();
        let stale = Connection::default();
        table.identify("alice", stale, tx.clone()).unwrap();
        table.identify("bob", Connection::default(), tx.clone()).unwrap();
        // alice returns on a fresh connection while her old handle is dead
        let fresh = Connection::default();
        assert_eq!(table.identify("alice", fresh, tx), Ok(Symbol::X));
        assert_eq!(table.seat_of(fresh), Some(Symbol::X));
        assert_eq!(table.seat_of(stale), None);
        assert_eq!(table.identity(Symbol::O), Some("bob"));
    }

    #[test]
    fn third_identity_is_rejected_and_seats_unchanged() {
        let mut table = Table::default();
        let (tx, _rx) = unbounded_channel();
        table.identify("alice", Connection::default(), tx.clone()).unwrap();
        table.identify("bob", Connection::default(), tx.clone()).unwrap();
        assert!(!table.admits("carol"));
        assert_eq!(table.identify("carol", Connection::default(), tx), Err(TableFull));
        assert_eq!(table.identity(Symbol::X), Some("alice"));
        assert_eq!(table.identity(Symbol::O), Some("bob"));
    }

    #[test]
    fn vacate_clears_connection_but_keeps_identity() {
        let mut table = Table::default();
        let (tx, _rx) = unbounded_channel();
        let conn = Connection::default();
        table.identify("alice", conn, tx).unwrap();
        assert_eq!(table.vacate(conn), Some(Symbol::X));
        assert!(!table.attached(Symbol::X));
        assert_eq!(table.identity(Symbol::X), Some("alice"));
        assert!(table.admits("alice"));
    }

    #[test]
    fn broadcast_skips_empty_and_dead_seats() {
        let mut table = Table::default();
        let (tx_x, mut rx_x) = unbounded_channel();
        let (tx_o, rx_o) = unbounded_channel();
        table.identify("alice", Connection::default(), tx_x).unwrap();
        table.identify("bob", Connection::default(), tx_o).unwrap();
        // bob's bridge died without a disconnect event yet
        drop(rx_o);
        table.broadcast(&ServerMessage::error("still here"));
        assert!(rx_x.try_recv().is_ok());
    }

    #[test]
    fn infos_maps_only_provided_seats() {
        let mut table = Table::default();
        let (tx, _rx) = unbounded_channel();
        table.identify("alice", Connection::default(), tx).unwrap();
        table.set_info(Symbol::X, serde_json::json!({"name": "alice"}));
        let infos = table.infos();
        assert_eq!(infos["X"]["name"], "alice");
        assert!(infos.get("O").is_none());
    }
}
