//! maskrelay — the anonymous group chat fan-out engine.
//!
//! This crate implements the engine side only: the member directory, role
//! lattice, ban matrix, mask pool, message map and per-group operation queue
//! that turn one member's message into a fan-out to every other member.
//! Wiring a concrete bot-API [`transport::Transport`] and the event loop that
//! feeds member actions into [`engine::GroupRegistry::enqueue`] is left to
//! the binary that embeds this crate.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod http;
pub mod metrics;
pub mod transport;
