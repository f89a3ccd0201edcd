//! Chat turn orchestration — the heart of EcoChat.
//!
//! Each user message follows one pass through the pipeline:
//!
//! 1. **Load** the session's recent turns
//! 2. **Assemble** the persona, trimmed history and the new turn
//! 3. **Dispatch** to the configured provider (fallback on failure)
//! 4. **Normalize** the reply into canonical presentation format
//! 5. **Record** the user turn and the reply in the session
//!
//! There is no retry loop: a failed upstream call is answered once by the
//! fallback responder.

pub mod assembler;
pub mod normalizer;
pub mod orchestrator;
pub mod persona;

pub use assembler::PromptAssembler;
pub use normalizer::normalize;
pub use orchestrator::{ChatError, ChatOrchestrator, ChatReply, NO_MESSAGE, session_or_default};
pub use persona::Persona;
