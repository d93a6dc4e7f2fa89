use medrag_generate::prompt::{context_passages, SYSTEM_PREAMBLE};
use medrag_generate::{build_prompt, ExtractiveGenerator, GenerationRequest, Generator, OpenAiGenerator};

fn passages() -> Vec<String> {
    vec!["glaucoma is a group of eye diseases.".to_string(), "it damages the optic nerve.".to_string()]
}

#[test]
fn prompt_has_documented_layout() {
    let prompt = build_prompt("what is glaucoma?", &passages());
    let expected = format!(
        "{SYSTEM_PREAMBLE}\n\nContext:\nglaucoma is a group of eye diseases.\n\nit damages the optic nerve.\n\nQuestion: what is glaucoma?\nAnswer:"
    );
    assert_eq!(prompt, expected);
    assert!(prompt.contains("say \"I don't know\""));
    assert_eq!(build_prompt("q", &passages()), build_prompt("q", &passages()));
}

#[test]
fn context_round_trips_through_prompt() {
    let prompt = build_prompt("q?", &passages());
    assert_eq!(context_passages(&prompt), vec!["glaucoma is a group of eye diseases.", "it damages the optic nerve."]);
    assert!(context_passages(&build_prompt("q?", &[])).is_empty());
    assert!(context_passages("no layout here").is_empty());
}

#[tokio::test]
async fn extractive_generator_answers_with_nearest_passage() {
    let request = GenerationRequest {
        prompt: build_prompt("what is glaucoma?", &passages()),
        model: "offline".to_string(),
        temperature: 0.0,
        max_tokens: 64,
    };
    let answer = ExtractiveGenerator.generate(&request).await.unwrap();
    assert_eq!(answer, "glaucoma is a group of eye diseases.");

    let empty = GenerationRequest { prompt: build_prompt("q", &[]), ..request };
    assert_eq!(ExtractiveGenerator.generate(&empty).await.unwrap(), "I don't know");
}

#[test]
fn endpoint_resolution() {
    let ep = |base: &str| OpenAiGenerator::new(base, None).unwrap().endpoint();
    assert_eq!(ep("https://api.openai.com/v1"), "https://api.openai.com/v1/chat/completions");
    assert_eq!(ep("http://localhost:1234/v1/"), "http://localhost:1234/v1/chat/completions");
    assert_eq!(ep("http://localhost:8080"), "http://localhost:8080/v1/chat/completions");
    assert_eq!(ep("http://host/v1/chat/completions"), "http://host/v1/chat/completions");
}
