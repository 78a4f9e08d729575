use tokio::sync::mpsc::unbounded_channel;
use xoxo_gameroom::Connection;
use xoxo_gameroom::Room;
use xoxo_gameroom::RoomHandle;

/// Front door for WebSocket connections.
/// Owns the handle to the one room, spawned for the process lifetime —
/// the game itself outlives every socket.
pub struct Lobby {
    room: RoomHandle,
}

impl Lobby {
    pub fn open() -> Self {
        Self { room: Room::spawn() }
    }

    /// Spawns the bridge task between one WebSocket and the room.
    /// Pumps room messages out to the socket and text frames in to the
    /// room; any close, error, or dropped channel tears the session down
    /// and reports the disconnect.
    pub fn bridge(&self, mut session: actix_ws::Session, mut stream: actix_ws::MessageStream) {
        use futures::StreamExt;
        let conn = Connection::default();
        let (tx, mut rx) = unbounded_channel::<String>();
        let room = self.room.clone();
        room.connect(conn, tx);
        log::info!("[lobby] socket {} connected", conn);
        actix_web::rt::spawn(async move {
            'sesh: loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Some(json) => if session.text(json).await.is_err() { break 'sesh },
                        None => break 'sesh,
                    },
                    msg = stream.next() => match msg {
                        Some(Ok(actix_ws::Message::Text(text))) => room.inbound(conn, text.to_string()),
                        Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                        Some(Err(_)) => break 'sesh,
                        None => break 'sesh,
                        _ => continue 'sesh,
                    },
                }
            }
            room.disconnect(conn);
            log::info!("[lobby] socket {} closed", conn);
        });
    }
}
