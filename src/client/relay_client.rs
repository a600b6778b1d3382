use tokio::sync::mpsc::UnboundedSender;
use tungstenite::protocol::Message as WsMessage;

pub type ClientId = String;

/// A connected WebSocket client, as seen by the relay.
///
/// The `sender` is the write half of the per-connection channel; the
/// connection's send task drains it onto the socket. A closed channel means
/// the connection is gone.
#[derive(Debug)]
pub struct Client {
    pub id: ClientId,
    pub sender: UnboundedSender<WsMessage>,
}

impl Client {
    /// Creates a client with a freshly generated unique id.
    pub fn new(sender: UnboundedSender<WsMessage>) -> Self {
        Self {
            id: format!("client-{}", uuid::Uuid::new_v4()),
            sender,
        }
    }
}
