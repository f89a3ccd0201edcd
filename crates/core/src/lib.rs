//! # EcoChat Core
//!
//! Domain types, traits, and error definitions for the EcoChat
//! conversation backend. This crate has no framework dependencies; it
//! defines the model that the other crates implement against.
//!
//! Every seam is a trait here and the implementations live in their own
//! crates:
//! - [`SessionStore`] (in-memory store in `ecochat-memory`)
//! - [`Provider`] (network and offline providers in `ecochat-providers`)

pub mod error;
pub mod message;
pub mod provider;
pub mod session;

// Re-export key types at crate root for ergonomics
pub use error::{DispatchError, Error, ProviderError, Result, SessionError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use session::{DEFAULT_SESSION_ID, Session, SessionStore};
