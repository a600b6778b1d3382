//! The `relay` module is the heart of the broadcast server.
//!
//! It owns the connected-client set and fans each inbound message out to
//! every member of that set. Membership changes (register on connect,
//! remove on disconnect) and broadcasts are serialized by the mutex the
//! transport layer wraps the `Relay` in.

pub mod engine;

pub use engine::Relay;
