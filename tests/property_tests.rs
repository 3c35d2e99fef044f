//! Property-based tests for demo-mcp-server
//!
//! These tests verify invariants that must hold for all inputs:
//! - Parsers never panic
//! - Store writes never lose or duplicate snippets
//! - Owner scoping holds for every interleaving
//!
//! Run with: cargo test --test property_tests

use proptest::prelude::*;

// ============================================================================
// URI TEMPLATE TESTS
// ============================================================================

mod uri_template_tests {
    use super::*;
    use demo_mcp::mcp::UriTemplate;

    proptest! {
        /// Invariant: parsing any pattern never panics
        #[test]
        fn parse_never_panics(pattern in ".*") {
            let _ = UriTemplate::parse(&pattern);
        }

        /// Invariant: matching any URI against a valid template never panics
        #[test]
        fn match_never_panics(uri in ".*") {
            let template = UriTemplate::parse("users://{userId}/profile").unwrap();
            let _ = template.matches(&uri);
        }

        /// Invariant: a segment without '/' is captured verbatim
        #[test]
        fn captures_single_segment(segment in "[^/]{1,32}") {
            let template = UriTemplate::parse("greeting://{name}").unwrap();
            let params = template.matches(&format!("greeting://{segment}"));
            prop_assert_eq!(params.and_then(|p| p.get("name").cloned()), Some(segment));
        }

        /// Invariant: placeholders never span a '/'
        #[test]
        fn never_crosses_separator(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
            let template = UriTemplate::parse("greeting://{name}").unwrap();
            let uri = format!("greeting://{a}/{b}");
            prop_assert!(template.matches(&uri).is_none());
        }
    }
}

// ============================================================================
// INPUT SHAPE TESTS
// ============================================================================

mod shape_tests {
    use super::*;
    use demo_mcp::mcp::{FieldKind, Shape};
    use serde_json::json;

    fn operands() -> Shape {
        Shape::empty()
            .field("a", FieldKind::Number)
            .field("b", FieldKind::Number)
    }

    proptest! {
        /// Invariant: validation never panics on arbitrary JSON text
        #[test]
        fn validate_never_panics(s in ".*") {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&s) {
                let _ = operands().validate(&value);
            }
        }

        /// Invariant: any pair of numbers is accepted, extra fields ignored
        #[test]
        fn accepts_all_numbers(a in any::<f64>().prop_filter("finite", |f| f.is_finite()),
                               b in any::<i64>(),
                               extra in "[a-z]{0,8}") {
            let value = json!({"a": a, "b": b, "extra": extra});
            prop_assert!(operands().validate(&value).is_ok());
        }

        /// Invariant: a string where a number is declared is always rejected
        #[test]
        fn rejects_strings_for_numbers(a in ".*") {
            let value = json!({"a": a, "b": 1});
            prop_assert!(operands().validate(&value).is_err());
        }
    }
}

// ============================================================================
// SNIPPET STORE TESTS
// ============================================================================

mod store_tests {
    use super::*;
    use std::collections::HashSet;

    use demo_mcp::storage::SnippetStore;
    use demo_mcp::types::SnippetDraft;

    fn draft(title: &str) -> SnippetDraft {
        SnippetDraft {
            title: title.to_string(),
            language: "rust".to_string(),
            code: "fn main() {}".to_string(),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Invariant: every created snippet is listed exactly once, in order, with a unique id
        #[test]
        fn creates_are_all_listed(titles in prop::collection::vec("\\PC{0,24}", 1..12)) {
            let dir = tempfile::tempdir().unwrap();
            let store = SnippetStore::open(dir.path().join("snippets.json"));

            let listed = tokio_test::block_on(async {
                for title in &titles {
                    store.create("user123", draft(title)).await.unwrap();
                }
                store.list("user123").await.unwrap()
            });

            let listed_titles: Vec<String> = listed.iter().map(|s| s.title.clone()).collect();
            prop_assert_eq!(&listed_titles, &titles);

            let ids: HashSet<&str> = listed.iter().map(|s| s.id.as_str()).collect();
            prop_assert_eq!(ids.len(), titles.len());
        }

        /// Invariant: mutations by one owner never affect another owner's snippets
        #[test]
        fn owners_are_isolated(ops in prop::collection::vec((any::<bool>(), 0u8..3), 1..16)) {
            let dir = tempfile::tempdir().unwrap();
            let store = SnippetStore::open(dir.path().join("snippets.json"));

            tokio_test::block_on(async {
                let kept = store.create("owner_b", draft("kept")).await.unwrap();

                for (first, action) in &ops {
                    let owner = if *first { "owner_a" } else { "owner_x" };
                    match action {
                        0 => {
                            store.create(owner, draft("tmp")).await.unwrap();
                        }
                        1 => {
                            let updated = store
                                .update(owner, &kept.id, draft("stolen"))
                                .await
                                .unwrap();
                            assert!(updated.is_none());
                        }
                        _ => {
                            assert!(!store.delete(owner, &kept.id).await.unwrap());
                        }
                    }
                }

                let remaining = store.list("owner_b").await.unwrap();
                assert_eq!(remaining, vec![kept]);
            });
        }
    }
}
