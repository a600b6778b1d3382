//! # relaycast
//!
//! `relaycast` is a minimalist WebSocket broadcast relay built with Rust.
//! Every text message received from a connected client is fanned out,
//! verbatim, to every currently connected client, including the sender.
//! There are no topics, no message envelope, and nothing is persisted.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `relay`: The central component that owns the connected-client set and performs the fan-out.
//! - `client`: Represents a connected WebSocket client.
//! - `config`: Handles loading and managing server configuration.
//! - `transport`: Manages the WebSocket server and communication with clients.
//! - `utils`: Contains shared utilities, such as logging setup.

pub mod client;
pub mod config;
pub mod relay;
pub mod transport;
pub mod utils;
