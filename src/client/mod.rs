//! The `client` module defines the representation of a connected peer.
//!
//! It provides the `Client` struct, which encapsulates the state of a single
//! connected client: its unique identifier and the channel for sending
//! frames to it.

pub mod relay_client;

pub use relay_client::{Client, ClientId};
