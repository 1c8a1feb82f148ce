//! Resolution algorithm coverage: outcome taxonomy, the native-format
//! gate, and batch/individual equivalence.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{FixtureReferenceRepository, MockReferenceRepository};

const DEPT_KEY: &str = "64f1a000000000000000a001";
const DEPT_KEY_2: &str = "64f1a000000000000000a002";
const MISSING_KEY: &str = "64f1a00000000000000000ff";

fn department(key: &str, legacy: Option<&str>, name: &str) -> ReferenceEntity {
    ReferenceEntity {
        key: NativeKey::parse(key).expect("fixture keys are valid"),
        legacy_code: legacy.map(str::to_owned),
        display_name: name.to_owned(),
        parent_ref: None,
        sequence: None,
        image_link: None,
    }
}

fn grocery_fixture() -> FixtureReferenceRepository {
    FixtureReferenceRepository::new().with(
        EntityType::Department,
        department(DEPT_KEY, Some("18"), "Grocery"),
    )
}

fn resolver(repo: FixtureReferenceRepository) -> (ReferenceResolver, Arc<FixtureReferenceRepository>) {
    let repo = Arc::new(repo);
    (ReferenceResolver::new(repo.clone()), repo)
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
#[tokio::test]
async fn empty_input_is_absent_without_store_access(#[case] raw: Option<&str>) {
    let (resolver, repo) = resolver(grocery_fixture());

    let outcome = resolver
        .resolve(EntityType::Department, raw)
        .await
        .expect("store reachable");

    assert_eq!(outcome, Resolution::Absent);
    assert_eq!(repo.query_count(), 0);
}

#[tokio::test]
async fn legacy_code_resolves_to_canonical_record() {
    let (resolver, _) = resolver(grocery_fixture());

    let outcome = resolver
        .resolve(EntityType::Department, Some("18"))
        .await
        .expect("store reachable");

    let Resolution::Resolved(resolved) = outcome else {
        panic!("expected resolved outcome, got {outcome:?}");
    };
    assert_eq!(resolved.key.as_str(), DEPT_KEY);
    assert_eq!(resolved.entity.display_name, "Grocery");
}

#[tokio::test]
async fn native_key_resolves_by_key_lookup() {
    let (resolver, _) = resolver(grocery_fixture());

    let outcome = resolver
        .resolve(EntityType::Department, Some(DEPT_KEY))
        .await
        .expect("store reachable");

    assert!(outcome.is_resolved());
}

#[tokio::test]
async fn unknown_code_is_unresolved_not_an_error() {
    let (resolver, _) = resolver(grocery_fixture());

    let outcome = resolver
        .resolve(EntityType::Department, Some("no-such-code"))
        .await
        .expect("store reachable");

    assert_eq!(
        outcome,
        Resolution::Unresolved {
            raw: "no-such-code".to_owned()
        }
    );
}

/// A syntactically valid key that matches no record must not fall through
/// to a legacy-code lookup, even when a legacy code equals that string.
#[tokio::test]
async fn missing_key_never_falls_back_to_legacy_lookup() {
    let fixture = FixtureReferenceRepository::new().with(
        EntityType::Department,
        department(DEPT_KEY, Some(MISSING_KEY), "Colliding"),
    );
    let (resolver, repo) = resolver(fixture);

    let outcome = resolver
        .resolve(EntityType::Department, Some(MISSING_KEY))
        .await
        .expect("store reachable");

    assert_eq!(
        outcome,
        Resolution::Unresolved {
            raw: MISSING_KEY.to_owned()
        }
    );
    // Exactly one lookup: the key probe. No legacy retry.
    assert_eq!(repo.query_count(), 1);
}

#[tokio::test]
async fn resolution_is_idempotent_for_fixed_store_state() {
    let (resolver, _) = resolver(grocery_fixture());

    let first = resolver
        .resolve(EntityType::Department, Some("18"))
        .await
        .expect("store reachable");
    let second = resolver
        .resolve(EntityType::Department, Some("18"))
        .await
        .expect("store reachable");

    assert_eq!(first, second);
}

#[tokio::test]
async fn type_mismatch_is_unresolved() {
    let (resolver, _) = resolver(grocery_fixture());

    // "18" exists as a department code, not a category code.
    let outcome = resolver
        .resolve(EntityType::Category, Some("18"))
        .await
        .expect("store reachable");

    assert!(matches!(outcome, Resolution::Unresolved { .. }));
}

#[tokio::test]
async fn batch_matches_individual_outcomes_with_two_queries() {
    let fixture = grocery_fixture().with(
        EntityType::Department,
        department(DEPT_KEY_2, Some("89"), "Bakery"),
    );
    let (resolver, repo) = resolver(fixture);

    let map = resolver
        .resolve_all(
            EntityType::Department,
            [Some("89"), Some(DEPT_KEY), Some("89"), Some(""), None],
        )
        .await
        .expect("store reachable");

    // One key batch plus one legacy batch, duplicates and empties skipped.
    assert_eq!(repo.query_count(), 2);
    assert_eq!(map.len(), 2);

    for raw in [Some("89"), Some(DEPT_KEY), Some("89"), Some(""), None] {
        let individual = resolver
            .resolve(EntityType::Department, raw)
            .await
            .expect("store reachable");
        assert_eq!(map.get(raw), individual, "batch diverged for {raw:?}");
    }
}

#[tokio::test]
async fn batch_with_single_syntactic_class_issues_one_query() {
    let (resolver, repo) = resolver(grocery_fixture());

    let map = resolver
        .resolve_all(EntityType::Department, [Some("18"), Some("19"), Some("18")])
        .await
        .expect("store reachable");

    assert_eq!(repo.query_count(), 1);
    assert!(map.get(Some("18")).is_resolved());
    assert!(matches!(map.get(Some("19")), Resolution::Unresolved { .. }));
}

#[tokio::test]
async fn empty_batch_touches_the_store_not_at_all() {
    let (resolver, repo) = resolver(grocery_fixture());

    let map = resolver
        .resolve_all(EntityType::Department, [None, Some("  ")])
        .await
        .expect("store reachable");

    assert!(map.is_empty());
    assert_eq!(repo.query_count(), 0);
}

/// The store matches legacy codes numerically as well as textually, so a
/// zero-padded request must resolve identically through both paths.
#[tokio::test]
async fn numeric_equivalent_codes_resolve_the_same_in_batch_and_single() {
    let (resolver, _) = resolver(grocery_fixture());

    let single = resolver
        .resolve(EntityType::Department, Some("018"))
        .await
        .expect("store reachable");
    let batched = resolver
        .resolve_all(EntityType::Department, [Some("018")])
        .await
        .expect("store reachable");

    let Resolution::Resolved(resolved) = single else {
        panic!("zero-padded code must match the row storing 18");
    };
    assert_eq!(resolved.key.as_str(), DEPT_KEY);
    assert_eq!(
        batched.get(Some("018")),
        Resolution::Resolved(resolved),
        "batch outcome must equal single resolve outcome"
    );
}

/// The unresolved marker echoes the identifier as supplied; key
/// classification lowercases for lookup only.
#[tokio::test]
async fn unresolved_native_key_echoes_the_supplied_form() {
    let (resolver, _) = resolver(grocery_fixture());
    let supplied = MISSING_KEY.to_ascii_uppercase();

    let single = resolver
        .resolve(EntityType::Department, Some(supplied.as_str()))
        .await
        .expect("store reachable");
    let batched = resolver
        .resolve_all(EntityType::Department, [Some(supplied.as_str())])
        .await
        .expect("store reachable");

    assert_eq!(
        single,
        Resolution::Unresolved {
            raw: supplied.clone()
        }
    );
    assert_eq!(batched.get(Some(supplied.as_str())), single);
}

/// Duplicate legacy codes are a source-data defect; resolution keeps the
/// first match in key order so the outcome is at least deterministic.
#[tokio::test]
async fn duplicate_legacy_codes_resolve_first_match() {
    let fixture = FixtureReferenceRepository::new()
        .with(
            EntityType::Department,
            department(DEPT_KEY_2, Some("18"), "Later duplicate"),
        )
        .with(
            EntityType::Department,
            department(DEPT_KEY, Some("18"), "First by key"),
        );
    let (resolver, _) = resolver(fixture);

    let single = resolver
        .resolve(EntityType::Department, Some("18"))
        .await
        .expect("store reachable");
    let batched = resolver
        .resolve_all(EntityType::Department, [Some("18")])
        .await
        .expect("store reachable");

    let Resolution::Resolved(resolved) = single else {
        panic!("expected resolved outcome");
    };
    assert_eq!(resolved.key.as_str(), DEPT_KEY);
    assert_eq!(batched.get(Some("18")), Resolution::Resolved(resolved));
}

#[tokio::test]
async fn store_failure_propagates_as_error() {
    let mut repo = MockReferenceRepository::new();
    repo.expect_find_by_legacy_code()
        .times(1)
        .return_once(|_, _| Err(ReferenceStoreError::connection("store offline")));

    let resolver = ReferenceResolver::new(Arc::new(repo));
    let result = resolver.resolve(EntityType::Department, Some("18")).await;

    assert_eq!(
        result,
        Err(ReferenceStoreError::connection("store offline"))
    );
}
