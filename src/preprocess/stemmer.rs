//! Rule-based Indonesian stemmer.
//!
//! Confix stripping in the style of the Tala algorithm: particles, possessive
//! pronouns, first-order prefixes, derivational suffixes and second-order
//! prefixes are removed in turn, each only while the word has more than two
//! syllables (vowels). An optional root-word dictionary short-circuits the process:
//! as soon as the current form is a known root it is returned, and nasal
//! prefixes try their recoded forms (`mem-akai` -> `pakai`) against the
//! dictionary before falling back to plain stripping.

use std::collections::HashSet;
use std::sync::Arc;

const PARTICLES: &[&str] = &["kah", "lah", "tah", "pun"];
const POSSESSIVES: &[&str] = &["nya", "ku", "mu"];
const SUFFIXES: &[&str] = &["kan", "an", "i"];
/// Longest first so `meng` wins over `me`.
const FIRST_ORDER_PREFIXES: &[&str] = &[
    "meng", "meny", "men", "mem", "me", "peng", "peny", "pen", "pem", "di", "ter", "ke",
];
const SECOND_ORDER_PREFIXES: &[&str] = &["ber", "bel", "be", "per", "pel", "pe"];

/// Words at or below this length are never stemmed.
const MIN_STEMMABLE_CHARS: usize = 3;

/// Indonesian stemmer backed by an optional root-word dictionary.
#[derive(Debug, Clone, Default)]
pub struct IndonesianStemmer {
    dictionary: Arc<HashSet<String>>,
}

impl IndonesianStemmer {
    pub fn new(dictionary: Arc<HashSet<String>>) -> Self {
        IndonesianStemmer { dictionary }
    }

    /// A stemmer that relies on the stripping rules alone.
    pub fn without_dictionary() -> Self {
        IndonesianStemmer::default()
    }

    /// Reduce a lowercase word to its stem.
    pub fn stem(&self, word: &str) -> String {
        if word.chars().count() <= MIN_STEMMABLE_CHARS || self.is_root(word) {
            return word.to_string();
        }

        let mut current = word.to_string();

        for step in [PARTICLES, POSSESSIVES] {
            current = strip_suffix(&current, step);
            if self.is_root(&current) {
                return current;
            }
        }

        let (after_prefix, prefix_removed) = self.strip_first_order_prefix(&current);
        if self.is_root(&after_prefix) {
            return after_prefix;
        }

        if prefix_removed {
            let after_suffix = self.strip_derivational(&after_prefix);
            if self.is_root(&after_suffix) {
                return after_suffix;
            }
            strip_prefix(&after_suffix, SECOND_ORDER_PREFIXES)
        } else {
            let after_second = strip_prefix(&current, SECOND_ORDER_PREFIXES);
            if self.is_root(&after_second) {
                return after_second;
            }
            self.strip_derivational(&after_second)
        }
    }

    fn is_root(&self, word: &str) -> bool {
        self.dictionary.contains(word)
    }

    /// Strip `-kan|-an|-i`, preferring whichever removal leaves a known root.
    ///
    /// `kebaik-an` must not lose the root's final `k` to `-kan`.
    fn strip_derivational(&self, word: &str) -> String {
        if !self.dictionary.is_empty() && syllables(word) > 2 {
            for suffix in SUFFIXES {
                if let Some(rest) = word.strip_suffix(suffix) {
                    if self.is_root(rest) {
                        return rest.to_string();
                    }
                }
            }
        }
        strip_suffix(word, SUFFIXES)
    }

    /// Strip a first-order prefix, trying recoded roots for nasal prefixes.
    fn strip_first_order_prefix(&self, word: &str) -> (String, bool) {
        if syllables(word) <= 2 {
            return (word.to_string(), false);
        }

        for prefix in FIRST_ORDER_PREFIXES {
            let Some(rest) = word.strip_prefix(prefix) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }

            if !self.dictionary.is_empty() {
                for candidate in recoded_candidates(prefix, rest) {
                    if self.is_root(&candidate) {
                        return (candidate, true);
                    }
                    let unsuffixed = self.strip_derivational(&candidate);
                    if self.is_root(&unsuffixed) {
                        return (unsuffixed, true);
                    }
                }
            }

            let stripped = match *prefix {
                // meny-apu / peny-apu -> sapu
                "meny" | "peny" => format!("s{}", rest),
                _ => rest.to_string(),
            };
            return (stripped, true);
        }

        (word.to_string(), false)
    }
}

/// Alternative roots for a nasal prefix followed by a vowel.
fn recoded_candidates(prefix: &str, rest: &str) -> Vec<String> {
    let starts_with_vowel = rest.chars().next().is_some_and(is_vowel);
    if !starts_with_vowel {
        return Vec::new();
    }
    let onsets: &[&str] = match prefix {
        "mem" | "pem" => &["p", "m"],
        "men" | "pen" => &["t", "n"],
        "meng" | "peng" => &["k", ""],
        "meny" | "peny" => &["s"],
        "me" => &["m", "n"],
        _ => &[],
    };
    onsets.iter().map(|onset| format!("{}{}", onset, rest)).collect()
}

fn strip_suffix(word: &str, suffixes: &[&str]) -> String {
    if syllables(word) <= 2 {
        return word.to_string();
    }
    for suffix in suffixes {
        if let Some(rest) = word.strip_suffix(suffix) {
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    word.to_string()
}

fn strip_prefix(word: &str, prefixes: &[&str]) -> String {
    if syllables(word) <= 2 {
        return word.to_string();
    }
    for prefix in prefixes {
        if let Some(rest) = word.strip_prefix(prefix) {
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    word.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Syllable estimate: the number of vowels.
fn syllables(word: &str) -> usize {
    word.chars().filter(|&c| is_vowel(c)).count()
}
