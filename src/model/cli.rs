//! Command-line interface.

use crate::api::Analyzer;
use crate::chat::read_chat_file;
use crate::config::Config;
use crate::model::predict::{predict_with_bundle, PredictionStatus, Predictor};
use crate::model::train::train_from_config;
use crate::preprocess::PreprocessConfig;
use crate::resources::Resources;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "sifat")]
#[command(author, version, about = "Big-Five trait signals from Indonesian chat text", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lexicon scores for a piece of text
    Score {
        /// Text to score
        text: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Personality report for a chat export
    Analyze {
        /// Chat file (`[time] Speaker: message` per line)
        #[arg(long)]
        chat: PathBuf,

        /// Also run a trained model bundle
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Train a classifier bundle from a labelled CSV
    Train {
        /// Dataset CSV (overrides `[data] csv_path`)
        #[arg(long)]
        csv: Option<String>,

        /// Keep surface forms and stopwords instead of stemming
        #[arg(long)]
        light: bool,
    },

    /// Predict binary trait labels with a trained bundle
    Predict {
        /// Text to classify
        text: String,

        /// Bundle path (defaults to `[output]` in the config)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Print per-trait probabilities
        #[arg(long)]
        proba: bool,
    },
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Score { text, json } => {
            let analyzer = Analyzer::from_config(&config)?;
            let scores = analyzer.lexicon_scores(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&scores)?);
                return Ok(());
            }
            println!("+-------------------+-------+------------+");
            println!("| Trait             | Count | Normalized |");
            println!("+-------------------+-------+------------+");
            for (t, count) in scores.raw.iter() {
                println!(
                    "| {:<17} | {:>5} | {:>10.2} |",
                    t.name(),
                    count,
                    scores.normalized[t]
                );
            }
            println!("+-------------------+-------+------------+");
            match scores.dominant() {
                Some(t) => println!("Dominant: {} ({})", t, t.description()),
                None => println!("Dominant: none"),
            }
        }
        Command::Analyze { chat, model } => {
            let analyzer = Analyzer::from_config(&config)?;
            let transcript = read_chat_file(&chat)
                .with_context(|| format!("reading chat file {}", chat.display()))?;
            if transcript.messages.is_empty() {
                warn!(path = %chat.display(), "no messages found in chat file");
            }
            let report = analyzer.analyze_chat(&transcript, model.as_deref());
            println!("{}", report);
        }
        Command::Train { csv, light } => {
            if let Some(csv) = csv {
                config.data.csv_path = csv;
            }
            if light {
                config.preprocess = PreprocessConfig::light();
            }
            let resources = Arc::new(config_resources(&config)?);
            let outcome = train_from_config(&config, resources)
                .with_context(|| format!("training from {}", config.data.csv_path))?;

            println!("{}", outcome.report);
            for warning in &outcome.warnings {
                println!("warning: {}", warning);
            }
            if let Some(path) = &outcome.bundle_path {
                println!("Model saved to {}", path.display());
            }
        }
        Command::Predict { text, model, proba } => {
            let path = model.unwrap_or_else(|| config.output.bundle_path());
            let resources = Arc::new(config_resources(&config)?);

            if proba {
                let predictor = Predictor::load(&path, resources)
                    .with_context(|| format!("loading model bundle {}", path.display()))?;
                for (t, p) in predictor.predict_proba(&text)?.iter() {
                    println!("{}: {}", t.name(), p);
                }
                return Ok(());
            }

            let prediction = predict_with_bundle(&text, &path, resources);
            for (t, label) in prediction.labels.iter() {
                println!("{}: {}", t.name(), label);
            }
            match prediction.status {
                PredictionStatus::Predicted => {}
                PredictionStatus::EmptyText => println!("(no tokens left after preprocessing)"),
                PredictionStatus::Failed(reason) => bail!("model prediction failed: {}", reason),
            }
        }
    }

    Ok(())
}

fn config_resources(config: &Config) -> Result<Resources> {
    Resources::from_config(&config.resources).context("loading word lists")
}
