//! Fallback responder — deterministic, offline, rule-based replies.
//!
//! Used when the selected provider is offline (MOCK, HUGGINGFACE) and as
//! the substitute reply whenever a network provider fails. Classification
//! is keyword based over the lowercased message. Topical continuity ("is
//! this a cost follow-up to a solar question?") is judged over the message
//! together with the last few history turns.

use crate::random::{RandomSource, StdRandom};
use crate::templates;
use ecochat_core::message::Message;
use std::sync::Arc;

/// How many trailing turns, the current message included, are scanned for
/// continuity.
pub const CONTINUITY_DEPTH: usize = 4;

/// A keyword matched against the tokens of a message.
#[derive(Debug, Clone, Copy)]
enum Keyword {
    /// Token starts with the stem ("recycl" matches "recycling").
    Prefix(&'static str),
    /// Token is the word or its plural ("car", "cars" but not "carbon").
    Word(&'static str),
}

use Keyword::{Prefix, Word};

const CARBON: &[Keyword] = &[Prefix("carbon"), Prefix("footprint"), Prefix("emission")];
const RENEWABLE: &[Keyword] = &[Prefix("renewable"), Prefix("solar"), Prefix("energ")];
const RECYCLING: &[Keyword] = &[Prefix("recycl"), Prefix("waste"), Prefix("plastic")];
const WATER: &[Keyword] = &[Prefix("water"), Prefix("conserv"), Prefix("save")];
const FOOD: &[Keyword] = &[Prefix("food"), Prefix("organic"), Prefix("farm")];
const TREES: &[Keyword] = &[Prefix("tree"), Prefix("plant"), Prefix("forest")];
const TRANSPORT: &[Keyword] = &[
    Prefix("transport"),
    Prefix("matatu"),
    Word("car"),
    Prefix("fuel"),
];
const COMMUTE: &[Keyword] = &[Prefix("transport"), Word("car")];
const COST: &[Keyword] = &[Prefix("cost"), Prefix("afford"), Prefix("expensive")];

/// Lowercased alphanumeric tokens of a text.
struct Tokens(Vec<String>);

impl Tokens {
    fn of<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let tokens = texts
            .into_iter()
            .flat_map(|t| t.split(|c: char| !c.is_alphanumeric()))
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self(tokens)
    }

    fn mentions(&self, keywords: &[Keyword]) -> bool {
        self.0.iter().any(|token| {
            keywords.iter().any(|kw| match kw {
                Prefix(stem) => token.starts_with(stem),
                Word(word) => token == word || token.strip_suffix('s') == Some(word),
            })
        })
    }
}

/// Rule-based substitute reply generator. Never fails, performs no I/O.
pub struct FallbackResponder {
    random: Arc<dyn RandomSource>,
}

impl FallbackResponder {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// Produce a reply for `message`, using `history` for continuity.
    pub fn respond(&self, message: &str, history: &[Message]) -> String {
        self.select(message, history).to_string()
    }

    /// Pick the template answering `message`.
    pub fn select(&self, message: &str, history: &[Message]) -> &'static str {
        let msg = Tokens::of([message]);
        let start = history.len().saturating_sub(CONTINUITY_DEPTH - 1);
        let recent = Tokens::of(
            history[start..]
                .iter()
                .map(|m| m.content.as_str())
                .chain([message]),
        );

        if msg.mentions(CARBON) {
            if recent.mentions(COMMUTE) {
                templates::PUBLIC_TRANSPORT
            } else {
                templates::CARBON_FOOTPRINT
            }
        } else if msg.mentions(RENEWABLE) {
            if recent.mentions(COST) {
                templates::SOLAR_COST
            } else {
                templates::SOLAR
            }
        } else if msg.mentions(RECYCLING) {
            templates::RECYCLING
        } else if msg.mentions(WATER) {
            templates::WATER
        } else if msg.mentions(FOOD) {
            templates::FOOD
        } else if msg.mentions(TREES) {
            templates::TREES
        } else if msg.mentions(TRANSPORT) {
            templates::TRANSPORT
        } else if msg.mentions(COST) && recent.mentions(RENEWABLE) {
            // A bare "how much does it cost?" right after a solar exchange.
            templates::SOLAR_COST
        } else {
            templates::GENERIC[self.random.pick(templates::GENERIC.len())]
        }
    }
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self::new(Arc::new(StdRandom::from_entropy()))
    }
}
