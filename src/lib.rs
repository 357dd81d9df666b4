//! Gate library.
//!
//! This library provides the core functionality for the Gate Discord bot:
//! the claim store, claim statistics, the Mazoku API client and command cooldowns.

pub mod error;
pub mod config;
pub mod cooldown;
pub mod database;
pub mod mazoku;
pub mod stats;
pub mod utils;

pub use error::{GateError, Result};
pub use config::Config;
