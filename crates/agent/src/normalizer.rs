//! Response normalization — canonical presentation for every reply.
//!
//! Upstream models ignore formatting instructions often enough that every
//! reply, whatever its origin, passes through an ordered pipeline of pure
//! text stages:
//!
//! 1. [`strip_emphasis`] drops paired `**`/`__` markers.
//! 2. [`remove_artifacts`] drops leaked scaffolding phrases.
//! 3. [`normalize_bullets`] rewrites `-`/`*` list markers to `•`.
//! 4. [`space_bullet_blocks`] puts one blank line between a list intro and its list.
//! 5. [`space_trailing_question`] moves the closing question onto its own line.
//! 6. [`collapse_blank_lines`] caps blank runs at two lines.
//!
//! The pipeline is idempotent: `normalize(normalize(x)) == normalize(x)`.

use regex_lite::Regex;
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("static pattern"));
static UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__(.*?)__").expect("static pattern"));
static ARTIFACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Question to continue conversation:\s*").expect("static pattern")
});
static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{4,}").expect("static pattern"));

/// The bullet glyph used in canonical output.
pub const BULLET: char = '•';

/// Interrogative openers that mark the closing question.
const QUESTION_LEADS: [&str; 9] = [
    "Your fun question:",
    "What",
    "How",
    "Where",
    "Which",
    "Do",
    "Have",
    "Are",
    "Would",
];

/// Run the whole pipeline.
pub fn normalize(text: &str) -> String {
    let mut out = text.to_string();
    // Removing one kind of markup can expose the other.
    loop {
        let next = remove_artifacts(&strip_emphasis(&out));
        if next == out {
            break;
        }
        out = next;
    }
    let out = normalize_bullets(&out);
    let out = space_bullet_blocks(&out);
    let out = space_trailing_question(&out);
    let out = collapse_blank_lines(&out);
    out.trim().to_string()
}

/// Apply `f` until the text stops changing.
fn fixed_point(text: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = text.to_string();
    loop {
        let next = f(&out);
        if next == out {
            return out;
        }
        out = next;
    }
}

/// Remove paired `**…**` and `__…__` markers, keeping the inner text.
pub fn strip_emphasis(text: &str) -> String {
    fixed_point(text, |t| {
        let t = BOLD.replace_all(t, "$1");
        UNDERLINE.replace_all(&t, "$1").into_owned()
    })
}

/// Remove "Question to continue conversation:" scaffolding, any case.
pub fn remove_artifacts(text: &str) -> String {
    fixed_point(text, |t| ARTIFACT.replace_all(t, "").into_owned())
}

/// Rewrite lines starting with `-` or `*` plus whitespace as `• ` lines.
pub fn normalize_bullets(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let trimmed = line.trim_start();
            let mut chars = trimmed.chars();
            match (chars.next(), chars.next()) {
                (Some('-' | '*'), Some(c)) if c.is_whitespace() => {
                    format!("{BULLET} {}", trimmed[1..].trim_start())
                }
                _ => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_bullet(line: &str) -> bool {
    line.trim_start().starts_with(BULLET)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Ensure exactly one blank line between a line ending in `:` and the
/// bullet list it introduces.
pub fn space_bullet_blocks(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        out.push(line);
        if !is_bullet(line) && line.trim_end().ends_with(':') {
            let mut j = i + 1;
            while j < lines.len() && is_blank(lines[j]) {
                j += 1;
            }
            if j < lines.len() && is_bullet(lines[j]) {
                out.push("");
                i = j;
                continue;
            }
        }
        i += 1;
    }
    out.join("\n")
}

/// Byte offset where the closing question of `line` starts, if any.
///
/// Candidates are the line start and every position following a sentence
/// terminator plus whitespace; the earliest candidate that opens with a
/// question lead and contains `?` wins. A line ending in `?` with no such
/// candidate is a question as a whole.
fn question_start(line: &str) -> Option<usize> {
    let mut candidates = vec![0];
    let mut chars = line.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let mut saw_space = false;
            while let Some(&(_, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                saw_space = true;
                chars.next();
            }
            if saw_space {
                if let Some(&(idx, _)) = chars.peek() {
                    candidates.push(idx);
                }
            }
        }
    }

    let opens_question = |rest: &str| {
        QUESTION_LEADS.iter().any(|lead| {
            rest.strip_prefix(lead).is_some_and(|after| {
                lead.ends_with(':') || !after.starts_with(|c: char| c.is_alphanumeric())
            })
        }) && rest.contains('?')
    };

    candidates
        .into_iter()
        .find(|&p| opens_question(&line[p..]))
        .or_else(|| line.ends_with('?').then_some(0))
}

/// Put the closing question on its own line, preceded by exactly two blank
/// lines when anything comes before it.
pub fn space_trailing_question(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let Some(k) = lines.iter().rposition(|l| !is_blank(l)) else {
        return text.to_string();
    };
    if is_bullet(lines[k]) {
        return text.to_string();
    }

    let line = lines[k].trim();
    let Some(p) = question_start(line) else {
        return text.to_string();
    };
    let (before, question) = (line[..p].trim_end(), &line[p..]);

    let mut head: Vec<&str> = lines[..k].to_vec();
    while head.last().is_some_and(|l| is_blank(l)) {
        head.pop();
    }
    if !before.is_empty() {
        head.push(before);
    }

    if head.is_empty() {
        question.to_string()
    } else {
        format!("{}\n\n\n{question}", head.join("\n"))
    }
}

/// Replace runs of four or more newlines with exactly three.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN.replace_all(text, "\n\n\n").into_owned()
}
