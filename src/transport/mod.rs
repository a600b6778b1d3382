//! The `transport` module is responsible for handling network communication
//! with clients via WebSockets.
//!
//! It implements the WebSocket server itself: accepting connections,
//! registering each one with the relay, forwarding inbound text frames to
//! the relay for broadcast, and cleaning membership up on disconnect.

pub mod websocket;

#[cfg(test)]
mod tests;
