//! Ranking properties over a small crawled site.

use super::fixtures::chunk;
use crate::chunk::ChunkStore;
use crate::rank::{query_terms, rank, score_chunk};
use crate::types::Chunk;

fn site() -> Vec<Chunk> {
    vec![
        chunk("https://lab.example.org/about", "About", 0, "The lab opened in 2019."),
        chunk("https://lab.example.org/lounge", "Lounge", 0, "The lounge seats forty."),
        chunk("https://lab.example.org/xr", "XR Space", 0, "Motion capture and the lounge corridor."),
        chunk("https://lab.example.org/booking", "Booking", 0, "Book the lounge or the XR space online."),
        chunk("https://lab.example.org/faq", "FAQ", 0, "Parking is not available."),
    ]
}

#[test]
fn test_results_are_a_sorted_subset() {
    let chunks = site();
    for query in ["lounge", "xr space booking", "the", "parking lounge", "nothing-here"] {
        let terms = query_terms(query);
        let ranked = rank(&chunks, query, 10);

        for hit in &ranked {
            assert!(chunks.iter().any(|c| c.id == hit.id), "{} not from input", hit.id);
        }

        let scores: Vec<usize> = ranked.iter().map(|c| score_chunk(c, &terms)).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{:?} for {}", scores, query);
        assert!(scores.iter().all(|s| *s > 0));
    }
}

#[test]
fn test_equal_scores_keep_input_order() {
    let chunks = site();
    let ranked: Vec<&str> = rank(&chunks, "the", 10).iter().map(|c| c.title.as_str()).collect();
    assert_eq!(ranked, vec!["About", "Lounge", "XR Space", "Booking"]);

    let mut reversed = chunks.clone();
    reversed.reverse();
    let ranked: Vec<&str> = rank(&reversed, "the", 10).iter().map(|c| c.title.as_str()).collect();
    assert_eq!(ranked, vec!["Booking", "XR Space", "Lounge", "About"]);
}

#[test]
fn test_title_hits_outrank_body_hits() {
    let store = ChunkStore::new(site());
    let ranked = store.search("lounge", 3);
    assert_eq!(ranked[0].title, "Lounge");
    assert_eq!(ranked.len(), 3);
}

#[test]
fn test_search_is_deterministic() {
    let store = ChunkStore::new(site());
    let first: Vec<String> = store.search("xr space booking", 2).iter().map(|c| c.id.clone()).collect();
    for _ in 0..5 {
        let again: Vec<String> =
            store.search("xr space booking", 2).iter().map(|c| c.id.clone()).collect();
        assert_eq!(first, again);
    }
}

#[test]
fn test_empty_store() {
    assert!(ChunkStore::default().search("lounge", 3).is_empty());
}
