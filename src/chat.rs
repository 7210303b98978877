//! Chat transcript parsing and the per-speaker personality report.
//!
//! Transcripts are plain text exports with one message per line:
//!
//! ```text
//! [08/01/24 21:15] Budi: aku sih santai aja, yang penting kerja rapi
//! Budi: besok nongkrong yuk
//! ```
//!
//! The bracketed timestamp is optional. Lines that do not look like
//! `Speaker: message` (system notices, wrapped continuation lines) are skipped.

use crate::bigfive::Trait;
use crate::error::Result;
use crate::lexicon::LexiconScores;
use crate::model::predict::{Prediction, PredictionStatus};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

static MESSAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\[[^\]]*\]\s*)?([^:\[\]]+?)\s*:\s?(.*)$").expect("static regex")
});

/// Speaker used when the transcript has no parseable line.
pub const UNKNOWN_SPEAKER: &str = "Unknown";

/// A parsed chat export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTranscript {
    /// Sender of the first parsed line
    pub speaker: String,
    pub messages: Vec<String>,
    /// All messages joined by single spaces
    pub text: String,
}

impl ChatTranscript {
    pub fn parse(content: &str) -> Self {
        let mut speaker: Option<String> = None;
        let mut messages = Vec::new();

        for line in content.lines() {
            let Some(caps) = MESSAGE_RE.captures(line) else {
                continue;
            };
            let name = caps[1].trim();
            let message = caps[2].trim();
            if speaker.is_none() {
                speaker = Some(name.to_string());
            }
            if !message.is_empty() {
                messages.push(message.to_string());
            }
        }

        let text = messages.join(" ");
        ChatTranscript {
            speaker: speaker.unwrap_or_else(|| UNKNOWN_SPEAKER.to_string()),
            messages,
            text,
        }
    }
}

/// Read and parse a UTF-8 chat export.
pub fn read_chat_file(path: impl AsRef<Path>) -> Result<ChatTranscript> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let transcript = ChatTranscript::parse(&content);
    debug!(
        path = %path.display(),
        speaker = transcript.speaker.as_str(),
        messages = transcript.messages.len(),
        "chat transcript parsed"
    );
    Ok(transcript)
}

/// Lexicon scores (and optionally a model prediction) for one speaker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReport {
    pub speaker: String,
    pub scores: LexiconScores,
    pub prediction: Option<Prediction>,
}

impl ChatReport {
    /// Dominant lexicon trait, if any keyword matched.
    pub fn dominant(&self) -> Option<Trait> {
        self.scores.dominant()
    }

    /// One-sentence Indonesian interpretation of the dominant trait.
    pub fn interpretation(&self) -> String {
        match self.dominant() {
            Some(t) => format!(
                "{} cenderung memiliki kepribadian {}.",
                self.speaker,
                t.description()
            ),
            None => format!(
                "Tidak ditemukan kecenderungan kepribadian yang dominan pada {}.",
                self.speaker
            ),
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for ChatReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nama Pengirim: {}", self.speaker)?;
        writeln!(f)?;
        writeln!(f, "=== Personality Scores (normalized) ===")?;
        for (t, v) in self.scores.normalized.iter() {
            writeln!(f, "{}: {:.2}", capitalize(t.name()), v)?;
        }
        writeln!(f)?;
        write!(f, "Interpretasi: {}", self.interpretation())?;

        if let Some(prediction) = &self.prediction {
            writeln!(f)?;
            writeln!(f)?;
            writeln!(f, "Model-based prediction:")?;
            for (t, v) in prediction.labels.iter() {
                writeln!(f, "{}: {}", t.name(), v)?;
            }
            if let PredictionStatus::Failed(reason) = &prediction.status {
                write!(f, "Model prediction failed: {}", reason)?;
            }
        }
        Ok(())
    }
}
