//! Run gpg as a subprocess and turn what it says into something safe to show.
//!
//! The engine binary is trusted as installed, but its diagnostic stream
//! describes untrusted input (signer names, recipient user IDs), so every
//! string taken from it is sanitized before it leaves this crate.

pub mod adapters;
pub mod config;
pub mod core;

pub use crate::adapters::engine::gpg_engine::GpgEngine;
pub use crate::config::engine_options::EngineOptions;
pub use crate::core::errors::{Result, SigwardError};
pub use crate::core::models::status::Status;
pub use crate::core::traits::engine::{Decrypted, SignatureEngine};
