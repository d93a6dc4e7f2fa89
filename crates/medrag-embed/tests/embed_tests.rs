use medrag_core::config::ModelsConfig;
use medrag_core::traits::Embedder;
use medrag_embed::{get_default_embedder, FakeEmbedder, FAKE_EMBEDDING_DIM};

fn l2(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum() }

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force fake embedder to avoid loading a model
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");
    let models = ModelsConfig {
        embedding_model: "sentence-transformers/all-MiniLM-L6-v2".into(),
        embedding_model_dir: None,
        generation_model: "gpt-4o-mini".into(),
        api_base_url: "https://api.openai.com/v1".into(),
    };

    let embedder = get_default_embedder(&models).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    assert_eq!(embs.len(), 2);
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), FAKE_EMBEDDING_DIM);
    assert_eq!(embedder.dim(), FAKE_EMBEDDING_DIM);

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn fake_embedder_places_overlapping_texts_closer() {
    let e = FakeEmbedder::new(64);
    let embs = e
        .embed_batch(&[
            "glaucoma damages the optic nerve".to_string(),
            "glaucoma damages the optic nerve slowly".to_string(),
            "insulin regulates blood sugar".to_string(),
        ])
        .unwrap();
    assert!(l2(&embs[0], &embs[1]) < l2(&embs[0], &embs[2]));
    assert_eq!(e.embed_one("glaucoma damages the optic nerve").unwrap(), embs[0]);
    assert!(e.model_id().contains("d64"));
}
