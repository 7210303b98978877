//! Negation scope tagging.
//!
//! Every token inside the window that follows a negation cue gets its
//! `negated` flag set. The flag is a field on [`Token`], not a string prefix.

use serde::{Deserialize, Serialize};

/// Negation cues recognised after slang normalization.
pub const NEGATION_CUES: &[&str] = &["tidak", "bukan", "nggak", "gak", "tdk", "tak"];

/// Surface prefix used when a negated token is fed to the vectorizer.
pub const NEGATION_PREFIX: &str = "NOT_";

/// Default number of tokens covered by a negation cue.
pub const DEFAULT_NEGATION_WINDOW: usize = 3;

/// A word token with its negation flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub negated: bool,
}

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Token {
            text: text.into(),
            negated: false,
        }
    }

    pub fn negated(text: impl Into<String>) -> Self {
        Token {
            text: text.into(),
            negated: true,
        }
    }

    /// Vectorizer surface form: `NOT_<text>` when negated, `<text>` otherwise.
    pub fn surface(&self) -> String {
        if self.negated {
            format!("{}{}", NEGATION_PREFIX, self.text)
        } else {
            self.text.clone()
        }
    }
}

pub fn is_negation_cue(word: &str) -> bool {
    NEGATION_CUES.contains(&word)
}

/// Mark up to `window` tokens after each negation cue as negated.
///
/// A token that is already negated keeps its single flag, so overlapping
/// windows never stack. Cue tokens are never marked by an earlier cue.
pub fn tag_negation(words: Vec<String>, window: usize) -> Vec<Token> {
    let mut tokens: Vec<Token> = words.into_iter().map(Token::new).collect();

    for i in 0..tokens.len() {
        if !is_negation_cue(&tokens[i].text) {
            continue;
        }
        let end = i.saturating_add(window).min(tokens.len() - 1);
        for token in &mut tokens[i + 1..=end] {
            if !is_negation_cue(&token.text) {
                token.negated = true;
            }
        }
    }

    tokens
}
