//! Stemmed trait lexicon and keyword-count scoring.

use crate::bigfive::{Trait, TraitMap};
use crate::preprocess::{IndonesianStemmer, Token};
use crate::resources::Resources;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Default raw keyword lists (surface forms, stemmed at build time).
pub const DEFAULT_KEYWORDS: [(Trait, &[&str]); 5] = [
    (
        Trait::Openness,
        &["imajinasi", "ide", "baru", "pikir", "kreatif", "open minded", "kepo", "penasaran"],
    ),
    (
        Trait::Conscientiousness,
        &["disiplin", "tepat", "rapi", "teratur", "kerja", "on time", "niat", "serius", "telaten"],
    ),
    (
        Trait::Extraversion,
        &[
            "teman", "bicara", "senang", "ramai", "ngobrol", "koneksi", "nongkrong", "mabar",
            "gabut", "hangout",
        ],
    ),
    (
        Trait::Agreeableness,
        &["bantu", "baik", "peduli", "teman", "sopan", "ramah", "support", "care", "solid"],
    ),
    (
        Trait::Neuroticism,
        &["cemas", "khawatir", "takut", "gelisah", "panik", "galau", "baper", "overthinking"],
    ),
];

/// Whether negated stems contribute to keyword counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegationPolicy {
    /// Negated occurrences count like plain ones
    Count,
    /// Negated occurrences are skipped
    #[default]
    Exclude,
}

/// Per-trait keyword stems.
#[derive(Debug, Clone)]
pub struct Lexicon {
    keywords: TraitMap<Vec<String>>,
    policy: NegationPolicy,
}

/// Raw keyword counts and their max-normalized form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexiconScores {
    pub raw: TraitMap<u32>,
    pub normalized: TraitMap<f64>,
}

impl Lexicon {
    /// Build from the default keyword lists.
    pub fn new(stemmer: &IndonesianStemmer, policy: NegationPolicy) -> Self {
        Lexicon::from_keywords(&DEFAULT_KEYWORDS, stemmer, policy)
    }

    /// Stem every raw keyword with the same stemmer the text pipeline uses.
    ///
    /// Multi-word keywords ("on time") are stemmed word by word; such entries
    /// can never equal a single token and are kept only for completeness.
    pub fn from_keywords(
        raw: &[(Trait, &[&str])],
        stemmer: &IndonesianStemmer,
        policy: NegationPolicy,
    ) -> Self {
        let mut keywords: TraitMap<Vec<String>> = TraitMap::default();
        for (t, words) in raw {
            for word in words.iter() {
                let stemmed = word
                    .to_lowercase()
                    .split_whitespace()
                    .map(|w| stemmer.stem(w))
                    .collect::<Vec<_>>()
                    .join(" ");
                // duplicates after stemming collapse to one entry
                if !stemmed.is_empty() && !keywords[*t].contains(&stemmed) {
                    keywords[*t].push(stemmed);
                }
            }
        }
        Lexicon { keywords, policy }
    }

    /// Log keywords that the stopword filter makes unreachable.
    pub fn check_against(&self, resources: &Resources) {
        for (t, words) in self.keywords.iter() {
            for word in words.iter().filter(|w| resources.is_stopword(w)) {
                warn!(
                    trait_name = t.name(),
                    keyword = word.as_str(),
                    "lexicon keyword is a stopword and will never match"
                );
            }
        }
    }

    pub fn keywords(&self, t: Trait) -> &[String] {
        &self.keywords[t]
    }

    pub fn policy(&self) -> NegationPolicy {
        self.policy
    }

    /// Count keyword occurrences per trait in a processed token stream.
    ///
    /// Scoring is a pure multiset count, so token order never matters.
    pub fn score(&self, tokens: &[Token]) -> LexiconScores {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for token in tokens {
            if token.negated && self.policy == NegationPolicy::Exclude {
                continue;
            }
            *counts.entry(token.text.as_str()).or_insert(0) += 1;
        }

        let raw = TraitMap::from_fn(|t| {
            self.keywords[t]
                .iter()
                .map(|w| counts.get(w.as_str()).copied().unwrap_or(0))
                .sum()
        });

        LexiconScores::from_raw(raw)
    }
}

impl LexiconScores {
    /// Normalize by the largest count; an all-zero vector stays all zero.
    pub fn from_raw(raw: TraitMap<u32>) -> Self {
        let max = raw.values().iter().copied().max().unwrap_or(0);
        let divisor = if max > 0 { max as f64 } else { 1.0 };
        let normalized = raw.map(|_, &count| count as f64 / divisor);
        LexiconScores { raw, normalized }
    }

    /// True when no keyword matched at all.
    pub fn is_empty(&self) -> bool {
        self.raw.values().iter().all(|&c| c == 0)
    }

    /// First trait (canonical order) with the maximum score, or `None` when
    /// nothing matched. An all-zero vector means "no dominant trait", not
    /// "all traits equally present".
    pub fn dominant(&self) -> Option<Trait> {
        if self.is_empty() {
            return None;
        }
        Trait::ALL
            .into_iter()
            .find(|&t| self.normalized[t] >= 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::{PreprocessConfig, TextPipeline};
    use std::sync::Arc;

    fn pipeline() -> TextPipeline {
        TextPipeline::new(Arc::new(Resources::builtin()), PreprocessConfig::strict())
    }

    fn lexicon(pipeline: &TextPipeline, policy: NegationPolicy) -> Lexicon {
        Lexicon::new(pipeline.stemmer(), policy)
    }

    #[test]
    fn test_conscientiousness_example() {
        let p = pipeline();
        let tokens = p.process("saya sangat disiplin dan tepat waktu");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert!(texts.contains(&"disiplin"));
        assert!(texts.contains(&"tepat"));

        let scores = lexicon(&p, NegationPolicy::default()).score(&tokens);
        assert_eq!(scores.raw[Trait::Conscientiousness], 2);
        for t in [Trait::Openness, Trait::Extraversion, Trait::Agreeableness, Trait::Neuroticism] {
            assert_eq!(scores.raw[t], 0, "{} should be zero", t);
        }
        assert_eq!(scores.normalized[Trait::Conscientiousness], 1.0);
        assert_eq!(scores.dominant(), Some(Trait::Conscientiousness));
    }

    #[test]
    fn test_derived_form_scores_agreeableness() {
        let p = pipeline();
        let scores = lexicon(&p, NegationPolicy::default()).score(&p.process("kebaikan"));
        assert_eq!(scores.raw[Trait::Agreeableness], 1);
        assert_eq!(scores.dominant(), Some(Trait::Agreeableness));
    }

    #[test]
    fn test_negated_stems_excluded_by_default() {
        let p = pipeline();
        let tokens = p.process("saya tidak senang");
        assert_eq!(tokens, vec![Token::negated("senang")]);

        let scores = lexicon(&p, NegationPolicy::default()).score(&tokens);
        assert_eq!(NegationPolicy::default(), NegationPolicy::Exclude);
        assert_eq!(scores.raw[Trait::Extraversion], 0);
        assert!(scores.is_empty());
        assert_eq!(scores.dominant(), None);
    }

    #[test]
    fn test_negated_stems_counted_under_count_policy() {
        let p = pipeline();
        let tokens = p.process("saya tidak senang");
        let scores = lexicon(&p, NegationPolicy::Count).score(&tokens);
        assert_eq!(scores.raw[Trait::Extraversion], 1);
        assert_eq!(scores.normalized[Trait::Extraversion], 1.0);
    }

    #[test]
    fn test_shared_keyword_counts_for_both_traits() {
        let p = pipeline();
        let scores = lexicon(&p, NegationPolicy::Exclude).score(&p.process("teman teman"));
        assert_eq!(scores.raw[Trait::Extraversion], 2);
        assert_eq!(scores.raw[Trait::Agreeableness], 2);
        assert_eq!(scores.dominant(), Some(Trait::Extraversion));
    }

    #[test]
    fn test_order_invariance() {
        let p = pipeline();
        let lex = lexicon(&p, NegationPolicy::Count);
        let mut tokens = p.process("aku cemas dan takut, tapi teman selalu bantu dan peduli, ide baru");
        let forward = lex.score(&tokens);
        tokens.reverse();
        assert_eq!(lex.score(&tokens), forward);
        tokens.rotate_left(2);
        assert_eq!(lex.score(&tokens), forward);
    }

    #[test]
    fn test_normalized_range_and_max() {
        let p = pipeline();
        let lex = lexicon(&p, NegationPolicy::Exclude);
        for text in [
            "cemas cemas takut teman",
            "disiplin rapi kreatif",
            "panik",
            "",
            "tidak ada apa-apa di sini",
        ] {
            let scores = lex.score(&p.process(text));
            for (_, &v) in scores.normalized.iter() {
                assert!((0.0..=1.0).contains(&v));
            }
            if scores.raw.values().iter().any(|&c| c > 0) {
                assert!(scores.normalized.values().iter().any(|&v| v == 1.0));
            } else {
                assert!(scores.normalized.values().iter().all(|&v| v == 0.0));
            }
        }
    }

    #[test]
    fn test_all_traits_present_in_output() {
        let p = pipeline();
        let scores = lexicon(&p, NegationPolicy::Exclude).score(&[]);
        let json = serde_json::to_value(&scores).unwrap();
        for t in Trait::ALL {
            assert_eq!(json["raw"][t.name()], 0);
            assert_eq!(json["normalized"][t.name()], 0.0);
        }
    }

    #[test]
    fn test_keywords_stemmed_like_text() {
        let p = pipeline();
        let words: &[&str] = &["membantu"];
        let lex = Lexicon::from_keywords(
            &[(Trait::Agreeableness, words)],
            p.stemmer(),
            NegationPolicy::Count,
        );
        assert_eq!(lex.keywords(Trait::Agreeableness), &["bantu".to_string()]);
        let scores = lex.score(&p.process("bantuan dan dibantu"));
        assert_eq!(scores.raw[Trait::Agreeableness], 2);
    }

    #[test]
    fn test_duplicate_keywords_do_not_double_count() {
        let p = pipeline();
        let words: &[&str] = &["takut", "ketakutan", "takut"];
        let lex = Lexicon::from_keywords(
            &[(Trait::Neuroticism, words)],
            p.stemmer(),
            NegationPolicy::Count,
        );
        let scores = lex.score(&p.process("takut"));
        assert_eq!(scores.raw[Trait::Neuroticism], 1);
    }
}
