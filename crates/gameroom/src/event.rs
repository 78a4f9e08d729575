use tokio::sync::mpsc::UnboundedSender;
use xoxo_core::ID;

/// Marker type for connection identifiers.
pub struct Socket;

/// Identifier of one live WebSocket connection.
/// Distinct from the durable client identity, which survives reconnects.
pub type Connection = ID<Socket>;

/// Outbound channel carrying serialized server messages to one socket.
/// Dropping the sender closes the socket's bridge task.
pub type Tx = UnboundedSender<String>;

/// Connection lifecycle and traffic events fed into the room.
/// The room drains these from a single channel, so no two events are
/// ever processed concurrently.
#[derive(Debug)]
pub enum RoomEvent {
    /// A socket opened and is ready to receive server messages.
    Connect { conn: Connection, tx: Tx },
    /// A text frame arrived from a socket.
    Inbound { conn: Connection, text: String },
    /// A socket closed or its bridge failed.
    Disconnect { conn: Connection },
}
