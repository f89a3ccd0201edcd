//! Generation providers for EcoChat.
//!
//! Network providers implement the `ecochat_core::Provider` trait over the
//! OpenAI-compatible chat-completions contract. Offline providers answer
//! through the rule-based [`FallbackResponder`]. The router picks the
//! configured provider and substitutes a fallback reply on failure.

pub mod fallback;
pub mod offline;
pub mod openai_compat;
pub mod random;
pub mod router;
pub mod templates;

pub use fallback::FallbackResponder;
pub use offline::OfflineProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use random::{RandomSource, SequenceRandom, StdRandom};
pub use router::{DEGRADED_NOTE, ProviderRouter, RawReply, build_from_config};
