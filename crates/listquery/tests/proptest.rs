//! Property-based tests for the list query engine using proptest.

use proptest::prelude::*;
use listquery::{
    evaluate, Dir, EngineConfig, Number, QueryDescriptor, QueryResult, SortSpec, Value,
};

// ============================================================================
// Test helpers
// ============================================================================

const KINDS: [&str; 3] = ["create", "update", "delete"];
const TAGS: [&str; 4] = ["billing", "wallet", "urgent", "vip"];

#[derive(Debug, Clone)]
struct Item {
    id: usize,
    name: String,
    value: Option<i64>,
    kind: &'static str,
    tags: Vec<&'static str>,
}

fn config() -> EngineConfig<Item> {
    EngineConfig::builder()
        .search(|i: &Item| Value::String(&i.name))
        .search(|i: &Item| Value::String(i.kind))
        .facet("kind", |i: &Item| Value::String(i.kind))
        .facet("tag", |i: &Item| {
            Value::List(i.tags.iter().map(|t| Value::String(t)).collect())
        })
        .sort("value", |i: &Item| Value::from(i.value.map(Number::I64)))
        .sort("name", |i: &Item| Value::String(&i.name))
        .page_sizes([5, 10, 100], 10)
        .build()
        .expect("valid config")
}

fn items_strategy() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec(
        (
            "[a-zA-Z]{1,6}",
            prop::option::weighted(0.8, 0i64..4),
            0usize..KINDS.len(),
            prop::collection::btree_set(0usize..TAGS.len(), 0..3),
        ),
        0..80,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(id, (name, value, kind, tags))| Item {
                id,
                name,
                value,
                kind: KINDS[kind],
                tags: tags.into_iter().map(|t| TAGS[t]).collect(),
            })
            .collect()
    })
}

fn ids(result: &QueryResult<'_, Item>) -> Vec<usize> {
    result.visible.iter().map(|i| i.id).collect()
}

fn all_ids(items: &[Item], query: &QueryDescriptor, config: &EngineConfig<Item>) -> Vec<usize> {
    let result = evaluate(items, &query.with_page_size(100), config).expect("evaluates");
    ids(&result)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Evaluating the same inputs twice gives the same output.
    #[test]
    fn evaluation_is_idempotent(
        items in items_strategy(),
        search in "[a-e]{0,2}",
        kind in 0usize..KINDS.len(),
        desc in any::<bool>(),
    ) {
        let config = config();
        let dir = if desc { Dir::Desc } else { Dir::Asc };
        let query = QueryDescriptor::from_config(&config)
            .with_search_text(search)
            .toggle_facet("kind", KINDS[kind])
            .with_sort(SortSpec::new("value", dir));

        let first = evaluate(&items, &query, &config).unwrap();
        let second = evaluate(&items, &query, &config).unwrap();

        prop_assert_eq!(ids(&first), ids(&second));
        prop_assert_eq!(first.total, second.total);
        prop_assert_eq!(first.facet_counts, second.facet_counts);
        prop_assert_eq!(first.page, second.page);
    }

    /// Walking every page reproduces the full filtered and sorted list.
    #[test]
    fn pages_concatenate_to_full_list(
        items in items_strategy(),
        page_size in prop::sample::select(vec![5usize, 10]),
        desc in any::<bool>(),
    ) {
        let config = config();
        let dir = if desc { Dir::Desc } else { Dir::Asc };
        let query = QueryDescriptor::from_config(&config)
            .with_sort(SortSpec::new("value", dir))
            .with_page_size(page_size);

        let full = all_ids(&items, &query, &config);
        let first = evaluate(&items, &query, &config).unwrap();
        let pages = first.page.total_pages;

        let mut walked = Vec::new();
        for page in 1..=pages {
            let result = evaluate(&items, &query.with_page(page), &config).unwrap();
            prop_assert!(result.visible.len() <= page_size);
            walked.extend(ids(&result));
        }

        prop_assert_eq!(walked, full);
        prop_assert_eq!(first.total, items.len());
    }

    /// Records with equal sort keys keep their input order in both directions.
    #[test]
    fn sorting_is_stable(items in items_strategy(), desc in any::<bool>()) {
        let config = config();
        let dir = if desc { Dir::Desc } else { Dir::Asc };
        let query = QueryDescriptor::from_config(&config).with_sort(SortSpec::new("value", dir));

        let sorted = all_ids(&items, &query, &config);
        for pair in sorted.windows(2) {
            let (a, b) = (&items[pair[0]], &items[pair[1]]);
            if a.value == b.value {
                prop_assert!(a.id < b.id, "tie {:?} / {:?} out of input order", a, b);
            }
        }
    }

    /// Absent sort values come last whatever the direction.
    #[test]
    fn absent_values_sort_last(items in items_strategy(), desc in any::<bool>()) {
        let config = config();
        let dir = if desc { Dir::Desc } else { Dir::Asc };
        let query = QueryDescriptor::from_config(&config).with_sort(SortSpec::new("value", dir));

        let sorted = all_ids(&items, &query, &config);
        let first_absent = sorted.iter().position(|id| items[*id].value.is_none());
        if let Some(pos) = first_absent {
            prop_assert!(sorted[pos..].iter().all(|id| items[*id].value.is_none()));
        }
    }

    /// Adding a value to an already active facet never shrinks the result.
    #[test]
    fn more_values_in_one_facet_keep_or_grow(
        items in items_strategy(),
        first in 0usize..KINDS.len(),
        second in 0usize..KINDS.len(),
    ) {
        let config = config();
        let narrow = QueryDescriptor::from_config(&config).select_facet("kind", KINDS[first]);
        let wide = narrow.select_facet("kind", KINDS[second]);

        let narrow_total = evaluate(&items, &narrow, &config).unwrap().total;
        let wide_total = evaluate(&items, &wide, &config).unwrap().total;
        prop_assert!(wide_total >= narrow_total);
    }

    /// Activating a new facet never grows the result.
    #[test]
    fn new_facet_keeps_or_shrinks(
        items in items_strategy(),
        kind in 0usize..KINDS.len(),
        tag in 0usize..TAGS.len(),
    ) {
        let config = config();
        let base = QueryDescriptor::from_config(&config).select_facet("kind", KINDS[kind]);
        let narrowed = base.select_facet("tag", TAGS[tag]);

        let base_total = evaluate(&items, &base, &config).unwrap().total;
        let narrowed_total = evaluate(&items, &narrowed, &config).unwrap().total;
        prop_assert!(narrowed_total <= base_total);

        let unfiltered = evaluate(&items, &QueryDescriptor::from_config(&config), &config)
            .unwrap()
            .total;
        prop_assert!(base_total <= unfiltered);
    }

    /// Search ignores case.
    #[test]
    fn search_ignores_case(items in items_strategy(), term in "[a-zA-Z]{1,2}") {
        let config = config();
        let base = QueryDescriptor::from_config(&config);
        let upper = all_ids(&items, &base.with_search_text(term.to_uppercase()), &config);
        let lower = all_ids(&items, &base.with_search_text(term.to_lowercase()), &config);
        prop_assert_eq!(upper, lower);
    }

    /// Facet counts for an unselected facet add up to the records carrying it.
    #[test]
    fn kind_counts_sum_to_total(items in items_strategy(), search in "[a-e]{0,1}") {
        let config = config();
        let query = QueryDescriptor::from_config(&config).with_search_text(search);
        let result = evaluate(&items, &query, &config).unwrap();
        let sum: usize = result.facet_counts["kind"].values().sum();
        prop_assert_eq!(sum, result.total);
    }

    /// Pages past the end are empty but still report the total.
    #[test]
    fn page_past_end_is_empty(items in items_strategy(), extra in 1usize..1000) {
        let config = config();
        let query = QueryDescriptor::from_config(&config);
        let pages = evaluate(&items, &query, &config).unwrap().page.total_pages;
        let result = evaluate(&items, &query.with_page(pages + extra), &config).unwrap();
        prop_assert!(result.visible.is_empty());
        prop_assert_eq!(result.total, items.len());
    }
}
