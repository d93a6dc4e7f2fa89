use medrag_core::Error;
use medrag_eval::{corpus_bleu, evaluate, exact_match, meteor_score, rouge_l, token_f1};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn token_f1_boundaries() {
    assert_eq!(token_f1("", "anything"), 0.0);
    assert_eq!(token_f1("anything", "   "), 0.0);
    assert_eq!(token_f1("x y", "y x"), 1.0);
    assert_eq!(token_f1("alpha", "beta"), 0.0);
    assert!(close(token_f1("the cat", "the dog"), 0.5));
}

#[test]
fn token_f1_penalizes_repeated_tokens() {
    // one shared type, three predicted tokens: P = 1/3, R = 1
    assert!(close(token_f1("a a a", "a"), 0.5));
}

#[test]
fn token_f1_keeps_decimals_and_splits_clitics() {
    // [take, 3.5, mg] vs [3.5, mg, daily]
    assert!(close(token_f1("take 3.5 mg", "3.5 mg daily"), 2.0 / 3.0));
    // [it, 's, fine] vs [it, is, fine]
    assert!(close(token_f1("it's fine", "it is fine"), 2.0 / 3.0));
}

#[test]
fn exact_match_ignores_case_and_outer_space() {
    assert_eq!(exact_match("Hello ", "hello"), 1);
    assert_eq!(exact_match("hello world", "hello  world"), 0);
}

#[test]
fn bleu_of_identical_text_is_one() {
    let text = strings(&["the cat sat on the mat"]);
    let score = corpus_bleu(&text, &text, 4, true);
    assert!(close(score.bleu, 1.0));
    assert!(score.precisions.iter().all(|&p| close(p, 1.0)));
    assert_eq!(score.brevity_penalty, 1.0);
}

#[test]
fn bleu_smoothing_and_brevity_penalty() {
    let predictions = strings(&["the cat"]);
    let references = strings(&["the cat sat on the mat"]);

    let smoothed = corpus_bleu(&predictions, &references, 4, true);
    assert_eq!(smoothed.translation_length, 2);
    assert_eq!(smoothed.reference_length, 6);
    assert!(close(smoothed.brevity_penalty, (-2.0f64).exp()));
    assert!(close(smoothed.bleu, (-2.0f64).exp()));

    let raw = corpus_bleu(&predictions, &references, 4, false);
    assert_eq!(raw.precisions[2], 0.0);
    assert_eq!(raw.bleu, 0.0);
}

#[test]
fn rouge_l_on_prefix() {
    let score = rouge_l("the cat sat", "the cat sat on the mat");
    assert!(close(score.precision, 1.0));
    assert!(close(score.recall, 0.5));
    assert!(close(score.fmeasure, 2.0 / 3.0));
    assert_eq!(rouge_l("", "the cat").fmeasure, 0.0);
}

#[test]
fn meteor_exact_and_reordered() {
    assert!(close(meteor_score("the cat sat", "the cat sat"), 1.0 - 0.5 / 27.0));
    // two chunks over three matches
    assert!(close(meteor_score("sat the cat", "the cat sat"), 1.0 - 0.5 * 8.0 / 27.0));
    assert_eq!(meteor_score("unrelated", "the cat sat"), 0.0);
}

#[test]
fn meteor_matches_stems() {
    assert!(close(meteor_score("running dogs", "run dog"), 0.9375));
}

#[test]
fn evaluate_rejects_mismatched_lengths() {
    let err = evaluate(&strings(&["a", "b", "c"]), &strings(&["a", "b"])).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(matches!(evaluate(&[], &[]), Err(Error::InvalidInput(_))));
}

#[test]
fn evaluate_reports_every_metric() {
    let predictions = strings(&["Aspirin thins the blood.", "I don't know"]);
    let references = strings(&["aspirin thins the blood.", "Rest and fluids."]);
    let report = evaluate(&predictions, &references).unwrap();

    assert_eq!(report.count, 2);
    assert_eq!(report.em_scores, vec![1, 0]);
    assert!(close(report.exact_match, 0.5));
    assert_eq!(report.f1_scores.len(), 2);
    assert!(close(report.f1_scores[0], 1.0));
    assert!(close(report.token_f1, 0.5));

    let scores = report.scores();
    for key in ["BLEU-1", "BLEU-2", "BLEU-3", "BLEU-4", "BLEU", "ROUGE-L", "METEOR", "Token F1", "Exact Match"] {
        let value = scores[key];
        assert!((0.0..=1.0).contains(&value), "{key} = {value}");
    }

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["count"], 2);
    assert!(json["bleu"]["precisions"].is_array());
}
