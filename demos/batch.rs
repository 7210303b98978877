/// Batch prediction example
///
/// Trains a throwaway bundle on a handful of labelled lines, then predicts a
/// batch of texts with it.
///
/// Run with:
/// ```
/// cargo run --example batch
/// ```
use sifat::config::Config;
use sifat::model::{Predictor, TraitRecord, TrainingPipeline};
use sifat::Resources;
use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Sifat Big-Five Classifier - Batch Prediction Example\n");

    let training = vec![
        TraitRecord::new("aku disiplin, kerja rapi dan teratur", [0, 1, 0, 0, 0]),
        TraitRecord::new("selalu tepat waktu, serius kalau kerja", [0, 1, 0, 0, 1]),
        TraitRecord::new("suka nongkrong dan ngobrol sama teman", [0, 0, 1, 1, 0]),
        TraitRecord::new("mabar tiap malam, hangout terus", [0, 0, 1, 0, 0]),
        TraitRecord::new("kepo sama ide baru, imajinasi liar", [1, 0, 0, 0, 0]),
        TraitRecord::new("penasaran, pikir hal kreatif", [1, 0, 0, 0, 0]),
        TraitRecord::new("cemas, gelisah, overthinking terus", [0, 0, 0, 0, 1]),
        TraitRecord::new("baper dan galau, takut ditinggal", [0, 0, 0, 1, 1]),
    ];

    let resources = Arc::new(Resources::builtin());
    let outcome = TrainingPipeline::new(&Config::default(), Arc::clone(&resources)).fit(&training)?;
    println!("{}\n", outcome.report);

    let predictor = Predictor::from_bundle(outcome.bundle, resources);

    let texts = [
        "gw gak pernah telat, selalu on time",
        "ayo mabar, nongkrong bareng teman",
        "aku takut banget, panik terus",
        "ada ide kreatif baru nih",
        "yang dan di",
    ];

    println!("Predicting {} texts in batch...\n", texts.len());

    let start = Instant::now();
    let results = texts
        .iter()
        .map(|text| predictor.predict(text))
        .collect::<Result<Vec<_>, _>>()?;
    let elapsed = start.elapsed();

    println!("{}", "=".repeat(90));
    println!("{:<40} | {}", "Text (truncated)", "Labels (O C E A N)");
    println!("{}", "=".repeat(90));

    for (text, result) in texts.iter().zip(results.iter()) {
        let truncated: String = if text.chars().count() > 37 {
            format!("{}...", text.chars().take(37).collect::<String>())
        } else {
            text.to_string()
        };
        let labels: Vec<String> = result.labels.values().iter().map(|l| l.to_string()).collect();
        println!("{:<40} | {} {:?}", truncated, labels.join(" "), result.status);
    }

    println!("{}", "=".repeat(90));
    println!("\n✓ Batch prediction complete");
    println!(
        "  Time: {:.2}ms ({:.2}ms per text)",
        elapsed.as_secs_f64() * 1000.0,
        elapsed.as_secs_f64() * 1000.0 / texts.len() as f64
    );

    Ok(())
}
