//! ChatZiPT signal engine.
//!
//! Multi-timeframe technical-analysis signals over exchange and metals
//! price feeds, plus the conversational wrapper used by the bot front ends.

pub mod chat;
pub mod cli;
pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use config::Config;
pub use error::ProviderError;
