use super::ClientMessage;

/// Errors that can occur while decoding client traffic.
#[derive(Debug, Clone)]
pub enum ProtocolError {
    Malformed(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(s) => write!(f, "malformed message: {}", s),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Wire codec between JSON text frames and typed client messages.
/// Decoding failures are surfaced to the room, which drops the frame.
pub struct Protocol;

impl Protocol {
    /// Parses a client text frame into a typed message.
    pub fn decode(s: &str) -> Result<ClientMessage, ProtocolError> {
        serde_json::from_str(s).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }
}
