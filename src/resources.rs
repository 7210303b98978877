//! Word-list resources: stopwords, slang normalization table and root words.
//!
//! Resources are loaded once (from files or from the lists embedded in the
//! crate) and shared read-only behind an `Arc` by every pipeline built from
//! them. Nothing here is a process-wide global.

use crate::config::ResourceConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const BUILTIN_STOPWORDS: &str = include_str!("../data/stopwords.txt");
const BUILTIN_SLANG: &str = include_str!("../data/slangwords.txt");
const BUILTIN_ROOT_WORDS: &str = include_str!("../data/rootwords.txt");

/// Immutable word lists consumed by the text pipeline.
#[derive(Debug, Clone)]
pub struct Resources {
    pub stopwords: HashSet<String>,
    pub slang: HashMap<String, String>,
    /// Known root words; guards the stemmer against over-stripping.
    pub root_words: Arc<HashSet<String>>,
}

/// Entry counts of each list, recorded in trained bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub stopwords: usize,
    pub slang: usize,
    pub root_words: usize,
}

impl Resources {
    /// Lists embedded in the crate under `data/`.
    pub fn builtin() -> Self {
        Resources {
            stopwords: parse_stopwords(BUILTIN_STOPWORDS),
            slang: parse_slang(BUILTIN_SLANG),
            root_words: Arc::new(parse_stopwords(BUILTIN_ROOT_WORDS)),
        }
    }

    /// Empty lists: no stopwords, no slang, dictionary-free stemming.
    pub fn empty() -> Self {
        Resources {
            stopwords: HashSet::new(),
            slang: HashMap::new(),
            root_words: Arc::new(HashSet::new()),
        }
    }

    /// Load each configured list from disk, falling back to the embedded
    /// list when no path is given.
    pub fn from_config(config: &ResourceConfig) -> Result<Self> {
        let builtin = Resources::builtin();

        let stopwords = match &config.stopwords {
            Some(path) => parse_stopwords(&read_resource(path)?),
            None => builtin.stopwords,
        };
        let slang = match &config.slang {
            Some(path) => parse_slang(&read_resource(path)?),
            None => builtin.slang,
        };
        let root_words = match &config.root_words {
            Some(path) => Arc::new(parse_stopwords(&read_resource(path)?)),
            None => builtin.root_words,
        };

        let resources = Resources {
            stopwords,
            slang,
            root_words,
        };
        let summary = resources.summary();
        info!(
            stopwords = summary.stopwords,
            slang = summary.slang,
            root_words = summary.root_words,
            "word lists loaded"
        );
        Ok(resources)
    }

    pub fn summary(&self) -> ResourceSummary {
        ResourceSummary {
            stopwords: self.stopwords.len(),
            slang: self.slang.len(),
            root_words: self.root_words.len(),
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }
}

fn read_resource(path: &str) -> Result<String> {
    debug!(path, "reading word list");
    std::fs::read_to_string(Path::new(path)).map_err(|e| Error::Resource {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

fn is_content(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#')
}

/// Parse a one-term-per-line list. Blank lines and `#` comments are skipped.
pub fn parse_stopwords(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| is_content(line))
        .map(str::to_lowercase)
        .collect()
}

/// Parse `slang:canonical` lines. Lines without a colon are ignored.
pub fn parse_slang(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| is_content(line))
        .filter_map(|line| line.split_once(':'))
        .map(|(slang, formal)| (slang.trim().to_lowercase(), formal.trim().to_lowercase()))
        .filter(|(slang, formal)| !slang.is_empty() && !formal.is_empty())
        .collect()
}
