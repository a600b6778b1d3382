use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tungstenite::protocol::Message as WsMessage;

use crate::relay::Relay;
use crate::transport::websocket::start_websocket_server;

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_relay_server() -> (String, Arc<Mutex<Relay>>) {
    let addr = format!(
        "127.0.0.1:{}",
        portpicker::pick_unused_port().expect("No free ports")
    );
    let relay = Arc::new(Mutex::new(Relay::new()));

    let server_addr = addr.clone();
    let server_relay = relay.clone();
    tokio::spawn(async move {
        start_websocket_server(&server_addr, server_relay).await;
    });

    // Give the server a moment to start up
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, relay)
}

async fn connect(addr: &str) -> WsClient {
    let (ws_stream, _) = connect_async(format!("ws://{addr}"))
        .await
        .expect("WebSocket handshake failed");
    ws_stream
}

/// Waits until the relay has seen the expected number of registrations or
/// removals; connection bookkeeping happens on the server's own tasks.
async fn wait_for_client_count(relay: &Arc<Mutex<Relay>>, expected: usize) {
    for _ in 0..50 {
        if relay.lock().unwrap().client_count() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!(
        "Relay never reached {} clients (currently {})",
        expected,
        relay.lock().unwrap().client_count()
    );
}

async fn send_text(ws: &mut WsClient, text: &str) {
    ws.send(WsMessage::Text(text.to_string().into()))
        .await
        .expect("Failed to send message");
}

async fn recv_text(ws: &mut WsClient) -> String {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("Timed out waiting for a message")
        .expect("Connection closed while waiting for a message")
        .expect("Connection errored while waiting for a message");
    match msg {
        WsMessage::Text(text) => text.to_string(),
        other => panic!("Expected a text message, got {:?}", other),
    }
}

#[tokio::test]
async fn test_broadcast_reaches_all_clients_then_respects_disconnect() {
    let (addr, relay) = start_relay_server().await;

    let mut ws_a = connect(&addr).await;
    let mut ws_b = connect(&addr).await;
    wait_for_client_count(&relay, 2).await;

    // A sends; both A (echo) and B receive exactly that payload.
    send_text(&mut ws_a, "hello").await;
    assert_eq!(recv_text(&mut ws_a).await, "hello");
    assert_eq!(recv_text(&mut ws_b).await, "hello");

    // B leaves; the relay must notice before the next broadcast.
    ws_b.close(None).await.expect("Failed to close WebSocket");
    wait_for_client_count(&relay, 1).await;

    send_text(&mut ws_a, "world").await;
    assert_eq!(recv_text(&mut ws_a).await, "world");

    // Nothing else is in flight for A.
    let extra = tokio::time::timeout(Duration::from_millis(200), ws_a.next()).await;
    assert!(extra.is_err(), "Unexpected extra frame: {:?}", extra);
}

#[tokio::test]
async fn test_lone_client_rapid_fire_is_echoed_in_order() {
    let (addr, relay) = start_relay_server().await;

    let mut ws = connect(&addr).await;
    wait_for_client_count(&relay, 1).await;

    for i in 0..100 {
        send_text(&mut ws, &format!("msg-{i}")).await;
    }

    // The sender is itself a member of the connected set, so each message
    // comes straight back, in send order.
    for i in 0..100 {
        assert_eq!(recv_text(&mut ws).await, format!("msg-{i}"));
    }
}

#[tokio::test]
async fn test_disconnect_cleans_up_membership() {
    let (addr, relay) = start_relay_server().await;

    let mut ws = connect(&addr).await;
    wait_for_client_count(&relay, 1).await;

    ws.close(None).await.expect("Failed to close WebSocket");
    wait_for_client_count(&relay, 0).await;

    assert_eq!(relay.lock().unwrap().client_count(), 0);
}

#[tokio::test]
async fn test_abrupt_disconnect_terminates_only_that_connection() {
    let (addr, relay) = start_relay_server().await;

    let ws_dropped = connect(&addr).await;
    let mut ws_survivor = connect(&addr).await;
    wait_for_client_count(&relay, 2).await;

    // Drop without a close frame; the server sees a broken connection.
    drop(ws_dropped);
    wait_for_client_count(&relay, 1).await;

    // The surviving client still gets broadcasts.
    send_text(&mut ws_survivor, "still here").await;
    assert_eq!(recv_text(&mut ws_survivor).await, "still here");
}

#[tokio::test]
async fn test_payload_relayed_verbatim() {
    let (addr, relay) = start_relay_server().await;

    let mut ws_a = connect(&addr).await;
    let mut ws_b = connect(&addr).await;
    wait_for_client_count(&relay, 2).await;

    let payload = "{\"looks\":\"like json\"} but is opaque \u{1f680}  ";
    send_text(&mut ws_a, payload).await;
    assert_eq!(recv_text(&mut ws_b).await, payload);
    assert_eq!(recv_text(&mut ws_a).await, payload);
}
