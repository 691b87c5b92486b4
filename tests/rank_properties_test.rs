// Property-based coverage for the pagination-totality and rank-arithmetic
// invariants (testable properties 3-4): randomly sized, randomly scored
// populations must page back out as a contiguous 1..N rank sequence with
// entries[i].rank == offset + i + 1 on every page.

use std::sync::Arc;

use pinnacle_board::service::SnapshotReader;
use pinnacle_board::testutil::{InMemoryCache, InMemoryDirectory, InMemoryStore};
use proptest::collection::vec;
use proptest::prelude::*;

const PAGE_LIMIT: u32 = 10;

fn drain_all_pages(scores: &[i64]) -> Vec<(String, u64)> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let cache = InMemoryCache::new();
        for (i, score) in scores.iter().enumerate() {
            cache.update_score(&format!("u{i}"), *score).await.unwrap();
        }

        let reader = SnapshotReader::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(cache),
            Arc::new(InMemoryDirectory::new()),
        );

        let mut seen = Vec::new();
        let mut offset = 0u64;

        loop {
            let page = reader.get_page(PAGE_LIMIT, offset).await.unwrap();
            if page.entries.is_empty() {
                break;
            }

            for (i, entry) in page.entries.iter().enumerate() {
                assert_eq!(
                    entry.rank,
                    offset + i as u64 + 1,
                    "rank arithmetic violated at offset {offset}, index {i}"
                );
                seen.push((entry.user_id.clone(), entry.rank));
            }

            offset += PAGE_LIMIT as u64;
        }

        seen
    })
}

proptest! {
    #[test]
    fn pagination_totality_and_rank_arithmetic(scores in vec(any::<i16>().prop_map(i64::from), 0..200)) {
        let n = scores.len();
        let seen = drain_all_pages(&scores);

        prop_assert_eq!(seen.len(), n, "pagination must surface exactly N entries");

        let mut ids: Vec<_> = seen.iter().map(|(id, _)| id.clone()).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), n, "every entry must be distinct");

        let mut ranks: Vec<u64> = seen.iter().map(|(_, r)| *r).collect();
        ranks.sort_unstable();
        let expected: Vec<u64> = (1..=n as u64).collect();
        prop_assert_eq!(ranks, expected, "ranks must form the contiguous sequence 1..N");
    }
}
