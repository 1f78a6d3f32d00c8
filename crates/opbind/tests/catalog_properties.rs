//! Property-based tests for catalog operations and CLI parameter parsing.
//!
//! Tests invariants:
//! 1. A non-blank title always validates and lands in the contract
//! 2. A whitespace-only title always fails with a single title error
//! 3. `KEY=VALUE` parameters keep their key and read JSON values as JSON

// Integration tests have relaxed clippy settings for test ergonomics.
// Production code (src/) must use strict zero-unwrap/panic patterns.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::uninlined_format_args,
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

use opbind::catalog::CatalogOperation;
use opbind::cli::handlers::parse_param;
use opbind_core::Params;
use proptest::prelude::*;
use serde_json::{json, Value};

fn fast_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        max_shrink_iters: 256,
        ..ProptestConfig::default()
    }
}

fn title_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ]{0,30}"
}

proptest! {
    #![proptest_config(fast_config())]

    #[test]
    fn prop_present_title_validates(title in title_strategy(), artist in title_strategy()) {
        let params = Params::new().with("album", json!({"title": title, "artist": {"name": artist}}));
        let outcome = CatalogOperation::CreateAlbum.execute(params, None).unwrap();

        prop_assert!(outcome.success);
        prop_assert!(outcome.errors.is_empty());
        let contract = outcome.contract.unwrap();
        prop_assert_eq!(&contract["title"], &Value::from(title));
        prop_assert_eq!(&contract["artist"]["name"], &Value::from(artist));
    }

    #[test]
    fn prop_blank_title_fails(spaces in " {0,8}", artist in title_strategy()) {
        let params = Params::new().with("album", json!({"title": spaces, "artist": {"name": artist}}));
        let outcome = CatalogOperation::CreateAlbum.execute(params, None).unwrap();

        prop_assert!(!outcome.success);
        prop_assert_eq!(outcome.errors.len(), 1);
        prop_assert_eq!(
            outcome.errors.get("title"),
            Some(&["can't be blank".to_string()][..])
        );
    }

    #[test]
    fn prop_param_integer_is_json(key in "[a-z][a-z_]{0,12}", value in any::<i64>()) {
        let (parsed_key, parsed_value) = parse_param(&format!("{key}={value}")).unwrap();
        prop_assert_eq!(parsed_key, key);
        prop_assert_eq!(parsed_value, json!(value));
    }

    #[test]
    fn prop_param_keeps_text_after_first_equals(key in "[a-z]{1,8}", text in "[a-z]{1,8}=[a-z]{0,8}") {
        let (parsed_key, parsed_value) = parse_param(&format!("{key}={text}")).unwrap();
        prop_assert_eq!(parsed_key, key);
        prop_assert_eq!(parsed_value, Value::from(text));
    }
}
