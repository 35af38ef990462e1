//! Property tests for the facet and filter engine
//!
//! Records and selections are drawn from small vocabularies so that generated
//! selections actually hit generated records.

use fundex_core::{
    FilterSelection, FundRecord, ListQuery, SUBCATEGORY_SEPARATOR, UNKNOWN_BUCKET, apply_filter,
    build_facets,
};
use proptest::collection::{btree_map, btree_set, vec};
use proptest::prelude::*;
use std::collections::BTreeSet;

const CATEGORIES: [&str; 3] = ["Debt", "Equity", "Hybrid"];
const SUBCATEGORIES: [&str; 4] = ["Large Cap", "Liquid", "Mid Cap", "Gilt"];
const RISKS: [&str; 3] = ["Low", "Moderate", "Very High"];
const NAMES: [&str; 3] = ["Alpha Growth", "Beta Income", "Gamma House Fund"];
const SEARCHES: [&str; 5] = ["", "  ", "alpha", "HOUSE", "fund"];

fn optional_word(words: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(words).prop_map(str::to_string))
}

fn bucket() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(&CATEGORIES[..]).prop_map(str::to_string),
        Just(UNKNOWN_BUCKET.to_string()),
    ]
}

fn sub_bucket() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(&SUBCATEGORIES[..]).prop_map(str::to_string),
        Just(UNKNOWN_BUCKET.to_string()),
    ]
}

fn record_strategy() -> impl Strategy<Value = FundRecord> {
    (
        optional_word(&CATEGORIES),
        optional_word(&SUBCATEGORIES),
        optional_word(&RISKS),
        prop::option::of(-50.0f64..150.0),
        optional_word(&NAMES),
        optional_word(&NAMES),
    )
        .prop_map(|(category, sub_category, risk, return_1y, scheme_name, fund_house)| FundRecord {
            id: Some("fund".to_string()),
            scheme_name,
            fund_house,
            category,
            sub_category,
            risk,
            return_1y,
            ..Default::default()
        })
}

fn selection_strategy() -> impl Strategy<Value = FilterSelection> {
    (
        btree_set(bucket(), 0..3),
        btree_map(bucket(), btree_set(sub_bucket(), 0..3), 0..3),
        btree_set(
            prop_oneof![
                prop::sample::select(&RISKS[..]).prop_map(str::to_string),
                Just(UNKNOWN_BUCKET.to_string()),
            ],
            0..2,
        ),
        optional_word(&SEARCHES),
    )
        .prop_map(|(categories, subcategories_by_category, risks, search)| FilterSelection {
            categories,
            subcategories_by_category,
            risks,
            search,
        })
}

/// Independent restatement of the selection predicate
fn oracle(record: &FundRecord, selection: &FilterSelection) -> bool {
    let category = record.category.clone().unwrap_or_else(|| UNKNOWN_BUCKET.to_string());
    let sub_category = record.sub_category.clone().unwrap_or_else(|| UNKNOWN_BUCKET.to_string());
    let risk = record.risk.clone().unwrap_or_else(|| UNKNOWN_BUCKET.to_string());

    let category_ok = if selection.categories.is_empty() {
        true
    } else if !selection.categories.contains(&category) {
        false
    } else {
        let narrowing: Vec<_> = selection
            .subcategories_by_category
            .iter()
            .filter(|(_, subs)| !subs.is_empty())
            .collect();
        if narrowing.is_empty() {
            true
        } else {
            match narrowing.iter().find(|(cat, _)| **cat == category) {
                Some((_, subs)) => subs.contains(&sub_category),
                None => true,
            }
        }
    };
    let risk_ok = selection.risks.is_empty() || selection.risks.contains(&risk);
    let search_ok = match selection.search.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(text) => {
            let needle = text.to_lowercase();
            [&record.scheme_name, &record.fund_house, &record.fund_manager]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
        }
    };
    category_ok && risk_ok && search_ok
}

proptest! {
    #[test]
    fn empty_selection_is_identity(records in vec(record_strategy(), 0..40)) {
        prop_assert_eq!(apply_filter(&records, &FilterSelection::default()), records);
    }

    #[test]
    fn filter_is_idempotent(
        records in vec(record_strategy(), 0..40),
        selection in selection_strategy(),
    ) {
        let once = apply_filter(&records, &selection);
        let twice = apply_filter(&once, &selection);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filter_is_sound_and_complete(
        records in vec(record_strategy(), 0..40),
        selection in selection_strategy(),
    ) {
        let kept = apply_filter(&records, &selection);
        let expected: Vec<FundRecord> =
            records.iter().filter(|r| oracle(r, &selection)).cloned().collect();
        prop_assert_eq!(&kept, &expected);
        for record in &records {
            prop_assert_eq!(selection.matches(record), oracle(record, &selection));
        }
    }

    #[test]
    fn facets_are_strictly_ascending(records in vec(record_strategy(), 0..40)) {
        let facets = build_facets(&records);
        let categories: Vec<&str> = facets.categories().collect();
        prop_assert!(categories.windows(2).all(|w| w[0] < w[1]));
        for category in &categories {
            let subs: Vec<&str> = facets.subcategories(category).collect();
            prop_assert!(!subs.is_empty());
            prop_assert!(subs.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn every_record_is_reachable_from_its_facet(records in vec(record_strategy(), 1..40)) {
        let facets = build_facets(&records);
        for record in &records {
            prop_assert!(facets.contains(record.category_bucket(), record.sub_category_bucket()));
            let selection = FilterSelection::default()
                .with_subcategory(record.category_bucket(), record.sub_category_bucket());
            prop_assert!(apply_filter(&records, &selection).contains(record));
        }
    }
}

#[test]
fn scenario_equity_large_cap() {
    let records = scenario_records();
    let selection = FilterSelection::default().with_subcategory("Equity", "Large Cap");
    assert_eq!(apply_filter(&records, &selection), vec![records[0].clone()]);
}

#[test]
fn scenario_equity_without_subcategory() {
    let records = scenario_records();
    let selection = FilterSelection::default().with_category("Equity");
    assert_eq!(apply_filter(&records, &selection), records[..2].to_vec());
}

#[test]
fn scenario_no_selection() {
    let records = scenario_records();
    assert_eq!(apply_filter(&records, &FilterSelection::default()), records);
}

#[test]
fn scenario_null_category_is_unknown() {
    let records = vec![FundRecord {
        category: None,
        sub_category: Some("Liquid".into()),
        ..Default::default()
    }];
    let facets = build_facets(&records);
    let categories: BTreeSet<&str> = facets.categories().collect();
    assert_eq!(categories, BTreeSet::from([UNKNOWN_BUCKET]));
}

#[test]
fn every_facet_value_is_selectable_through_query_pairs() {
    let records: Vec<FundRecord> = [
        (Some("Equity"), Some("")),
        (Some("Equity"), Some("Large Cap")),
        (Some(""), Some("Liquid")),
        (None, None),
        (Some("Fund::Of::Funds"), Some("Overseas")),
    ]
    .into_iter()
    .map(|(category, sub_category): (Option<&str>, Option<&str>)| FundRecord {
        category: category.map(str::to_string),
        sub_category: sub_category.map(str::to_string),
        ..Default::default()
    })
    .collect();

    let facets = build_facets(&records);
    for (category, subs) in facets.iter() {
        let query = ListQuery::from_pairs([("category", category.to_string())]).unwrap();
        let expected: Vec<FundRecord> =
            records.iter().filter(|r| r.category_bucket() == category).cloned().collect();
        assert_eq!(apply_filter(&records, &query.selection), expected, "category {category:?}");

        for sub in subs {
            let key = format!("{category}{SUBCATEGORY_SEPARATOR}{sub}");
            let query = ListQuery::from_pairs([
                ("category", category.to_string()),
                ("subcategory", key.clone()),
            ])
            .unwrap();
            let expected: Vec<FundRecord> = records
                .iter()
                .filter(|r| {
                    r.category_bucket() == category && r.sub_category_bucket() == sub.as_str()
                })
                .cloned()
                .collect();
            assert_eq!(apply_filter(&records, &query.selection), expected, "key {key:?}");
        }
    }
}

fn scenario_records() -> Vec<FundRecord> {
    [("Equity", "Large Cap"), ("Equity", "Mid Cap"), ("Debt", "Liquid")]
        .into_iter()
        .map(|(category, sub_category)| FundRecord {
            category: Some(category.into()),
            sub_category: Some(sub_category.into()),
            ..Default::default()
        })
        .collect()
}
