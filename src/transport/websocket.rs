use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::spawn;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tracing::{info, warn};
use tungstenite::protocol::Message as WsMessage;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::client::Client;
use crate::relay::Relay;

/// Runs the WebSocket server: one task per connection, all connections
/// sharing the relay behind the mutex. The relay lock is only ever held for
/// the duration of a membership update or a channel-level fan-out, never
/// across an `.await`, so a slow peer cannot stall the accept loop or the
/// other connections.
pub async fn start_websocket_server(addr: &str, relay: Arc<Mutex<Relay>>) {
    let listener = TcpListener::bind(addr).await.expect("Can't bind");

    info!("WebSocket relay listening on ws://{addr}");

    while let Ok((stream, peer)) = listener.accept().await {
        let relay = relay.clone();

        tokio::spawn(async move {
            let ws_stream = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    warn!("WebSocket handshake error from {peer}: {e}");
                    return;
                }
            };

            let (mut ws_sender, mut ws_receiver) = ws_stream.split();
            let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
            let client = Client::new(tx);
            let client_id = client.id.clone();

            {
                let mut relay = relay.lock().unwrap();
                relay.register_client(client);
                info!("{client_id} connected ({} online)", relay.client_count());
            }

            // Removal may be triggered from the send loop or the receive
            // loop, whichever notices the disconnect first.
            let cleanup_called = Arc::new(AtomicBool::new(false));

            let do_cleanup = {
                let relay = relay.clone();
                let client_id = client_id.clone();
                let cleanup_called = cleanup_called.clone();

                move || {
                    if !cleanup_called.swap(true, Ordering::SeqCst) {
                        let mut relay = relay.lock().unwrap();
                        relay.remove_client(&client_id);
                        info!("{client_id} disconnected ({} online)", relay.client_count());
                    }
                }
            };

            // Forward frames queued by broadcasts to this client's socket.
            {
                let client_id = client_id.clone();
                let do_cleanup = do_cleanup.clone();

                spawn(async move {
                    while let Some(msg) = rx.recv().await {
                        if let Err(e) = ws_sender.send(msg).await {
                            warn!("Failed to send to {client_id}: {e}");
                            break;
                        }
                    }

                    do_cleanup();
                });
            }

            loop {
                match ws_receiver.next().await {
                    Some(Ok(WsMessage::Text(text))) => {
                        info!("{client_id} sent {} bytes", text.len());
                        let relay = relay.lock().unwrap();
                        relay.broadcast(text.as_str());
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {
                        // The contract is framed text; ping/pong is handled
                        // by tungstenite and anything else is dropped.
                    }
                    Some(Err(e)) => {
                        warn!("Connection error for {client_id}: {e}");
                        break;
                    }
                }
            }

            do_cleanup();
        });
    }
}
