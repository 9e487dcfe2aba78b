use proptest::prelude::*;

use skill_browse::search::{FilterKey, FilterSet, FilterStore, PageToken, decode, encode, page_window};

fn filter_set() -> impl Strategy<Value = FilterSet> {
    prop::collection::vec((0usize..FilterKey::ALL.len(), ".{0,16}"), 0..6).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(idx, value)| (FilterKey::ALL[idx], value))
            .collect()
    })
}

proptest! {
    #[test]
    fn test_address_round_trip(filters in filter_set(), page in 1u32..10_000) {
        let state = decode(&encode(&filters, page));
        prop_assert_eq!(state.filters, filters);
        prop_assert_eq!(state.page, page);
    }

    #[test]
    fn test_encode_is_canonical(filters in filter_set(), page in 1u32..10_000) {
        let first = encode(&filters, page);
        let state = decode(&format!("?{first}"));
        prop_assert_eq!(encode(&state.filters, state.page), first);
    }

    #[test]
    fn test_decode_never_yields_page_zero(query in ".{0,40}") {
        prop_assert!(decode(&query).page >= 1);
    }

    #[test]
    fn test_window_shape(current in 0u32..200, total in 0u32..200, max_visible in 0u32..15) {
        let window = page_window(current, total, max_visible);
        if total <= 1 {
            prop_assert!(window.is_empty());
            return Ok(());
        }

        prop_assert_eq!(window.first(), Some(&PageToken::Page(1)));
        prop_assert_eq!(window.last(), Some(&PageToken::Page(total)));
        prop_assert!(window.contains(&PageToken::Page(current.clamp(1, total))));
        prop_assert!(window.len() as u32 <= max_visible.max(3) + 2);

        let mut previous = 0;
        for pair in window.windows(2) {
            prop_assert!(!(pair[0] == PageToken::Ellipsis && pair[1] == PageToken::Ellipsis));
        }
        for (i, token) in window.iter().enumerate() {
            match token {
                PageToken::Page(page) => {
                    prop_assert!(*page > previous);
                    previous = *page;
                }
                PageToken::Ellipsis => {
                    let next = match window.get(i + 1) {
                        Some(PageToken::Page(page)) => *page,
                        _ => return Err(TestCaseError::fail("ellipsis must precede a page")),
                    };
                    prop_assert!(next > previous + 1, "ellipsis must hide at least one page");
                }
            }
        }
    }

    #[test]
    fn test_window_is_deterministic(current in 1u32..100, total in 1u32..100) {
        prop_assert_eq!(page_window(current, total, 7), page_window(current, total, 7));
    }

    #[test]
    fn test_filter_edit_resets_page(filters in filter_set(), page in 2u32..50, value in "[a-z]{1,8}") {
        let mut store = FilterStore::hydrated(filters, page);
        let change = store.set_filter(FilterKey::Location, value);
        if change.changed {
            prop_assert_eq!(store.page(), 1);
        } else {
            prop_assert_eq!(store.page(), page);
        }
    }
}
