use std::collections::HashMap;

use tracing::{debug, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::client::{Client, ClientId};

/// Represents the relay that manages the connected-client set.
/// Clients are registered when their WebSocket handshake completes and
/// removed when their connection closes or errors. On receipt of a message
/// from any client, the relay delivers a copy to every registered client,
/// including the one it came from.
#[derive(Debug, Default)]
pub struct Relay {
    pub(crate) clients: HashMap<ClientId, Client>,
}

impl Relay {
    /// Creates a new relay with an empty connected-client set.
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    /// Registers a new client with the relay.
    /// The client becomes a broadcast target for every subsequent message.
    pub fn register_client(&mut self, client: Client) {
        debug!("Registered {}", client.id);
        self.clients.insert(client.id.clone(), client);
    }

    /// Removes a client from the relay.
    /// Removing a client that is already absent is a no-op, so the transport
    /// layer may call this from both its send and receive paths.
    pub fn remove_client(&mut self, client_id: &ClientId) {
        if self.clients.remove(client_id).is_some() {
            debug!("Removed {}", client_id);
        }
    }

    /// Number of currently connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Delivers `payload` verbatim, as one text frame, to every connected
    /// client. Delivery is fire-and-forget through each client's send
    /// channel: a failed send is logged and does not abort delivery to the
    /// remaining clients. Broadcasting with no clients connected is a no-op.
    pub fn broadcast(&self, payload: &str) {
        let ws_msg = WsMessage::text(payload);
        for (client_id, client) in &self.clients {
            if let Err(e) = client.sender.send(ws_msg.clone()) {
                warn!("Failed to send to {}: {}", client_id, e);
            }
        }
    }
}
