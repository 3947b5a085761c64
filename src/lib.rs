//! WhizDesk agent library.
//!
//! Core pieces: a shape-tolerant normalizer for the loosely typed
//! backend ([`normalize`]), a chat command interpreter with guided
//! flows ([`chat`]), the REST client split by audience ([`api`]), and
//! the services that compose them into dashboard panels ([`services`]).

pub mod api;
pub mod bus;
pub mod chat;
pub mod config;
pub mod error;
pub mod normalize;
pub mod services;
pub mod state;
pub mod types;
