//! Session store implementations for EcoChat.

pub mod in_memory;

pub use in_memory::InMemorySessionStore;
