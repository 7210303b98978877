/// Simple example of lexicon scoring with the built-in word lists
///
/// Run with:
/// ```
/// cargo run --example simple
/// ```
use sifat::api::Analyzer;

fn main() {
    println!("Sifat Big-Five Lexicon - Simple Example\n");

    let analyzer = Analyzer::builtin();

    let examples = [
        "Saya sangat disiplin dan selalu tepat waktu",
        "gw suka nongkrong sama teman, rame bgt",
        "aku cemas terus, takut gagal ujian besok",
        "saya tidak senang kalau harus ngobrol lama",
        "coba cek https://example.com ya @budi",
    ];

    println!("{}", "=".repeat(70));

    for text in examples {
        let tokens = analyzer.process(text);
        let scores = analyzer.lexicon_scores_tokens(&tokens);

        println!("\nText: \"{}\"", text);
        let surfaces: Vec<String> = tokens.iter().map(|t| t.surface()).collect();
        println!("Tokens: [{}]", surfaces.join(", "));

        println!("Scores:");
        for (t, v) in scores.normalized.iter() {
            println!("  {:<18} {:.2} (raw {})", t.name(), v, scores.raw[t]);
        }
        match scores.dominant() {
            Some(t) => println!("Dominant: {} - {}", t, t.description()),
            None => println!("Dominant: none"),
        }
        println!("{}", "-".repeat(70));
    }

    println!("\n✓ Done!");
}
