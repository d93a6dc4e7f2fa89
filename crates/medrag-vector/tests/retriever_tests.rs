use medrag_core::error::{Error, Result};
use medrag_core::traits::Embedder;
use medrag_embed::FakeEmbedder;
use medrag_vector::{embed_and_build, FlatIndex, Retriever};

/// Embeds a text as its counts of the letters a..d.
struct LetterCounts;

impl Embedder for LetterCounts {
    fn model_id(&self) -> &str { "letter-counts" }
    fn dim(&self) -> usize { 4 }
    fn max_len(&self) -> usize { 64 }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| ['a', 'b', 'c', 'd'].iter().map(|l| t.chars().filter(|c| c == l).count() as f32).collect())
            .collect())
    }
}

fn passages() -> Vec<String> {
    vec!["aaa".to_string(), "bbb".to_string(), "ccc".to_string()]
}

#[test]
fn retrieve_maps_hits_to_passages_nearest_first() {
    let passages = passages();
    let embedder = LetterCounts;
    let index = embed_and_build(&embedder, &passages, 2).expect("build");
    assert_eq!(index.model_id(), "letter-counts");
    let retriever = Retriever::new(&index, &passages, &embedder).expect("retriever");

    let hits = retriever.retrieve("BBB", 2).expect("retrieve");
    assert_eq!(hits[0].text, "bbb");
    assert_eq!(hits[0].distance, 0.0);
    assert_eq!(hits.len(), 2);
    assert!(hits[0].distance <= hits[1].distance);

    let texts = retriever.retrieve_texts("<i>cc</i>", 5).expect("retrieve");
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0], "ccc");
}

#[test]
fn retriever_checks_its_inputs_line_up() {
    let passages = passages();
    let embedder = LetterCounts;
    let index = embed_and_build(&embedder, &passages, 8).unwrap();
    assert!(matches!(Retriever::new(&index, &passages[..2], &embedder), Err(Error::InvalidInput(_))));

    let fake = FakeEmbedder::new(4);
    assert!(matches!(Retriever::new(&index, &passages, &fake), Err(Error::InvalidConfiguration(_))));

    let fake8 = FakeEmbedder::new(8);
    assert!(matches!(Retriever::new(&index, &passages, &fake8), Err(Error::InvalidConfiguration(_))));

    let untagged = FlatIndex::build(&embedder.embed_batch(&passages).unwrap()).unwrap();
    assert!(Retriever::new(&untagged, &passages, &fake).is_ok());
}
