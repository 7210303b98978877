//! Lowercasing, URL/mention stripping, Unicode word tokenization and slang
//! normalization.

use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::resources::Resources;

/// Splits raw chat text into lowercase canonical word tokens.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    url_regex: Regex,
    mention_regex: Regex,
    word_regex: Regex,
    resources: Arc<Resources>,
}

impl TextNormalizer {
    pub fn new(resources: Arc<Resources>) -> Self {
        TextNormalizer {
            url_regex: Regex::new(r"http\S+").expect("static regex"),
            mention_regex: Regex::new(r"[@#]\w+").expect("static regex"),
            // \w is Unicode-aware in the regex crate
            word_regex: Regex::new(r"\w+").expect("static regex"),
            resources,
        }
    }

    /// Tokenize `text` and map every token through the slang table.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let without_urls = self.url_regex.replace_all(text, " ");
        let cleaned = self.mention_regex.replace_all(&without_urls, " ");
        let lowercase = cleaned.to_lowercase();

        self.word_regex
            .find_iter(&lowercase)
            .map(|m| normalize_token(&self.resources.slang, m.as_str()))
            .collect()
    }
}

fn normalize_token(slang: &HashMap<String, String>, token: &str) -> String {
    slang
        .get(token)
        .cloned()
        .unwrap_or_else(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new(Arc::new(Resources::builtin()))
    }

    #[test]
    fn test_lowercase_and_punctuation() {
        let tokens = normalizer().normalize("Halo, Dunia! Apa KABAR?");
        assert_eq!(tokens, vec!["halo", "dunia", "apa", "kabar"]);
    }

    #[test]
    fn test_slang_mapping() {
        let tokens = normalizer().normalize("gw gak tau lo sm siapa");
        assert_eq!(tokens, vec!["saya", "tidak", "tau", "kamu", "sama", "siapa"]);
    }

    #[test]
    fn test_urls_and_mentions_removed() {
        let tokens = normalizer().normalize("cek https://example.com/a?b=1 dong @budi #santai ok");
        assert_eq!(tokens, vec!["cek", "dong", "ok"]);
    }

    #[test]
    fn test_unicode_words_kept() {
        let tokens = normalizer().normalize("Café naïve — résumé");
        assert_eq!(tokens, vec!["café", "naïve", "résumé"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(normalizer().normalize("").is_empty());
        assert!(normalizer().normalize("  ...!!  ").is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = normalizer();
        for text in [
            "Gw gak suka nongkrong, lo gimana?",
            "saya sangat disiplin dan tepat waktu",
            "Kalo udh capek ya udah istirahat aja bgt 123",
        ] {
            let once = n.normalize(text);
            let twice = n.normalize(&once.join(" "));
            assert_eq!(once, twice, "not idempotent for {:?}", text);
        }
    }
}
