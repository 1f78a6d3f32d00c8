//! Property-based tests for representer rendering and parsing using proptest.
//!
//! Tests representer invariants:
//! 1. Keys render in declaration order, with no extras
//! 2. `include` renders exactly the requested subset, still in order
//! 3. Links are computed from the represented object at render time
//! 4. Parsing writes back every declared scalar it renders

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

use opbind_core::{
    integer_value, text, text_value, ContractSchema, Error, FieldContract, Fields, RenderOptions,
    Representer, Result, Slot,
};
use proptest::prelude::*;
use serde_json::Value;

/// Optimized proptest config for fast representer property tests.
fn fast_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        max_shrink_iters: 256,
        ..ProptestConfig::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Track {
    title: Option<String>,
    position: Option<i64>,
    genre: Option<String>,
}

impl Fields for Track {
    fn type_name(&self) -> &str {
        "Track"
    }

    fn read(&self, name: &str) -> Slot<'_> {
        match name {
            "title" => Slot::text(self.title.as_deref()),
            "position" => Slot::integer(self.position),
            "genre" => Slot::text(self.genre.as_deref()),
            _ => Slot::Empty,
        }
    }

    fn write(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "title" => text_value(name, value).map(|v| self.title = v),
            "position" => integer_value(name, value).map(|v| self.position = v),
            "genre" => text_value(name, value).map(|v| self.genre = v),
            _ => Err(Error::unknown_field(self.type_name(), name)),
        }
    }
}

const KEYS: [&str; 3] = ["title", "position", "genre"];

fn track_representer() -> Representer {
    let schema = ContractSchema::builder("TrackContract")
        .field(FieldContract::builder("title").required().build())
        .property("position")
        .property("genre")
        .build();
    Representer::infer(&schema)
}

fn track_strategy() -> impl Strategy<Value = Track> {
    (
        "[a-zA-Z0-9 ]{1,30}",
        0_i64..1000,
        "[a-z]{1,12}",
    )
        .prop_map(|(title, position, genre)| Track {
            title: Some(title),
            position: Some(position),
            genre: Some(genre),
        })
}

fn rendered_keys(value: &Value) -> Vec<String> {
    value
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default()
}

proptest! {
    #![proptest_config(fast_config())]

    #[test]
    fn prop_keys_render_in_declaration_order(track in track_strategy()) {
        let value = track_representer().to_value(&track, &RenderOptions::default());
        prop_assert_eq!(rendered_keys(&value), KEYS.to_vec());
    }

    #[test]
    fn prop_include_renders_exact_subset(
        track in track_strategy(),
        mask in proptest::collection::vec(any::<bool>(), 3),
    ) {
        let include: Vec<&str> = KEYS
            .iter()
            .zip(&mask)
            .filter(|(_, keep)| **keep)
            .map(|(k, _)| *k)
            .collect();
        let value = track_representer().to_value(&track, &RenderOptions::include(include.clone()));
        prop_assert_eq!(rendered_keys(&value), include);
    }

    #[test]
    fn prop_links_follow_represented_title(track in track_strategy()) {
        let representer = track_representer()
            .link("self", |t| format!("//track/{}", text(t, "title")));
        let value = representer.to_value(&track, &RenderOptions::default());
        let href = value["_links"]["self"]["href"].as_str().map(str::to_string);
        prop_assert_eq!(href, track.title.as_ref().map(|t| format!("//track/{t}")));
        let keys = rendered_keys(&value);
        prop_assert_eq!(keys.last().map(String::as_str), Some("_links"));
    }

    #[test]
    fn prop_parse_writes_back_rendered_scalars(track in track_strategy()) {
        let representer = track_representer();
        let json = representer.render(&track, &RenderOptions::default()).unwrap();
        let mut parsed = Track::default();
        representer.parse(&json, &mut parsed).unwrap();
        prop_assert_eq!(parsed, track);
    }
}

#[test]
fn test_missing_fields_are_not_rendered() {
    let track = Track {
        title: Some("Out In The Fields".into()),
        ..Track::default()
    };
    let json = track_representer()
        .render(&track, &RenderOptions::default())
        .unwrap();
    assert_eq!(json, r#"{"title":"Out In The Fields"}"#);
}
