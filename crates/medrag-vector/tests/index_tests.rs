use tempfile::TempDir;

use medrag_core::error::Error;
use medrag_core::types::SearchHit;
use medrag_vector::FlatIndex;

fn three_by_four() -> Vec<Vec<f32>> {
    vec![
        vec![0.0, 0.0, 0.0, 0.0],
        vec![1.0, 0.0, 0.0, 0.0],
        vec![0.0, 2.0, 0.0, 1.0],
    ]
}

#[test]
fn stored_vector_is_its_own_nearest_neighbour() {
    let embs = three_by_four();
    let index = FlatIndex::build(&embs).expect("build");
    assert_eq!(index.len(), 3);
    assert_eq!(index.dim(), 4);
    for (i, e) in embs.iter().enumerate() {
        assert_eq!(index.vector(i), Some(e.as_slice()));
        let hits = index.search(e, 3).expect("search");
        assert_eq!(hits[0], SearchHit { distance: 0.0, index: i });
    }
    assert_eq!(index.vector(3), None);
}

#[test]
fn results_are_sorted_by_squared_distance() {
    let index = FlatIndex::build(&three_by_four()).unwrap();
    let hits = index.search(&[1.0, 1.0, 0.0, 0.0], 3).unwrap();
    let order: Vec<usize> = hits.iter().map(|h| h.index).collect();
    assert_eq!(order, vec![1, 0, 2]);
    assert_eq!(hits[0].distance, 1.0);
    assert_eq!(hits[1].distance, 2.0);
    assert_eq!(hits[2].distance, 3.0);
    assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
}

#[test]
fn ties_resolve_by_stored_order() {
    let embs = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0], vec![0.0, -1.0], vec![5.0, 5.0]];
    let index = FlatIndex::build(&embs).unwrap();
    let hits = index.search(&[0.0, 0.0], 4).unwrap();
    assert_eq!(hits.iter().map(|h| h.index).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    let top2 = index.search(&[0.0, 0.0], 2).unwrap();
    assert_eq!(top2.iter().map(|h| h.index).collect::<Vec<_>>(), vec![0, 1]);
}

#[test]
fn k_is_clamped_to_index_size() {
    let index = FlatIndex::build(&three_by_four()).unwrap();
    assert_eq!(index.search(&[0.0; 4], 10).unwrap().len(), 3);
    assert!(matches!(index.search(&[0.0; 4], 0), Err(Error::InvalidK(0))));
}

#[test]
fn malformed_requests_are_rejected() {
    let index = FlatIndex::build(&three_by_four()).unwrap();
    assert!(matches!(index.search(&[0.0; 3], 1), Err(Error::InvalidQuery { expected: 4, found: 3 })));
    // The index stays usable after a rejected query.
    assert_eq!(index.search(&[0.0; 4], 1).unwrap()[0].index, 0);

    let ragged = vec![vec![0.0; 4], vec![0.0; 4], vec![0.0; 5]];
    assert!(matches!(
        FlatIndex::build(&ragged),
        Err(Error::DimensionMismatch { expected: 4, found: 5, position: 2 })
    ));
    assert!(matches!(FlatIndex::build(&[]), Err(Error::InvalidInput(_))));
}

#[test]
fn persisted_index_answers_identically() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested/answers.idx");
    let embs: Vec<Vec<f32>> = (0..50)
        .map(|i| (0..8).map(|j| ((i * 31 + j * 17) % 23) as f32 * 0.173 - 1.9).collect())
        .collect();
    let index = FlatIndex::build(&embs).unwrap().with_model_id("test-model");
    index.save(&path).expect("save");
    let reloaded = FlatIndex::load(&path).expect("load");

    assert_eq!(reloaded, index);
    assert_eq!(reloaded.model_id(), "test-model");
    assert_eq!(reloaded.to_bytes(), index.to_bytes());
    for q in embs.iter().step_by(7) {
        for k in [1, 5, 50, 80] {
            assert_eq!(reloaded.search(q, k).unwrap(), index.search(q, k).unwrap());
        }
    }
}

#[test]
fn corrupted_artifacts_are_rejected() {
    let index = FlatIndex::build(&three_by_four()).unwrap();
    let bytes = index.to_bytes();

    let mut flipped = bytes.clone();
    flipped[40] ^= 0x01;
    assert!(matches!(FlatIndex::from_bytes(&flipped), Err(Error::CorruptIndex(_))));

    assert!(matches!(FlatIndex::from_bytes(&bytes[..bytes.len() - 5]), Err(Error::CorruptIndex(_))));
    assert!(matches!(FlatIndex::from_bytes(b"not an index"), Err(Error::CorruptIndex(_))));
}

#[test]
fn oversized_header_counts_are_rejected() {
    // dim 1 and count 2^62 fit in usize but their byte length does not
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MEDRAGIX");
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&(1u64 << 62).to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    let checksum = blake3::hash(&bytes);
    bytes.extend_from_slice(checksum.as_bytes());

    assert!(matches!(FlatIndex::from_bytes(&bytes), Err(Error::CorruptIndex(_))));
}
