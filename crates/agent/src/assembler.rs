//! Prompt assembly: persona, trimmed history, new user turn.

use crate::persona::Persona;
use ecochat_core::message::{Message, Role};

/// Builds the outbound message list for one turn.
///
/// The history slice keeps the last `window - 1` turns so history plus the
/// new user turn never exceeds the retention window.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    persona: Persona,
    window: usize,
}

impl PromptAssembler {
    pub fn new(persona: Persona, window: usize) -> Self {
        Self {
            persona,
            window: window.max(1),
        }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn assemble(&self, history: &[Message], user_message: &str) -> Vec<Message> {
        let turns: Vec<&Message> = history.iter().filter(|m| m.role != Role::System).collect();
        let keep = self.window - 1;
        let start = turns.len().saturating_sub(keep);

        let mut messages = Vec::with_capacity(keep + 2);
        messages.push(self.persona.to_message());
        messages.extend(turns[start..].iter().map(|&m| m.clone()));
        messages.push(Message::user(user_message));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("q{i}"))
                } else {
                    Message::assistant(format!("a{i}"))
                }
            })
            .collect()
    }

    #[test]
    fn empty_history_yields_persona_and_turn() {
        let assembler = PromptAssembler::new(Persona::custom("persona"), 10);
        let messages = assembler.assemble(&[], "Tell me about solar");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::system("persona"));
        assert_eq!(messages[1], Message::user("Tell me about solar"));
    }

    #[test]
    fn history_is_trimmed_to_window_minus_one() {
        let assembler = PromptAssembler::new(Persona::custom("persona"), 10);
        let messages = assembler.assemble(&history(10), "next");

        // persona + 9 history turns + new turn
        assert_eq!(messages.len(), 11);
        assert_eq!(messages[1].content, "a1");
        assert_eq!(messages[9].content, "a9");
        assert_eq!(messages[10].content, "next");
    }

    #[test]
    fn short_history_is_kept_whole_and_ordered() {
        let assembler = PromptAssembler::new(Persona::default(), 10);
        let messages = assembler.assemble(&history(3), "next");
        let contents: Vec<&str> = messages[1..].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["q0", "a1", "q2", "next"]);
    }

    #[test]
    fn stored_system_turns_are_not_forwarded() {
        let assembler = PromptAssembler::new(Persona::custom("persona"), 4);
        let stored = vec![Message::system("stale persona"), Message::user("hi")];
        let messages = assembler.assemble(&stored, "again");
        assert_eq!(
            messages.iter().filter(|m| m.role == Role::System).count(),
            1
        );
        assert_eq!(messages.len(), 3);
    }
}
