//! Go Arena - automated matches between GTP Go engines.
//!
//! This crate runs games between two engines that speak the Go Text
//! Protocol, optionally refereed by the built-in rules engine so results do
//! not depend on either engine's own scoring.
//!
//! # Modules
//!
//! - [`gtp_client`] - GTP client bound to an engine subprocess
//! - [`match_runner`] - Game execution: move relay, referee, termination
//! - [`config`] - `arena.toml` engines and presets
//! - [`json_output`] - JSON records for finished games

pub mod config;
pub mod gtp_client;
pub mod json_output;
pub mod match_runner;
