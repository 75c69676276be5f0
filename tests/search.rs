//! Integration tests for search index tokens.
//! Tests: token order for real descriptions, cap behavior, determinism

use cashwatch_core::{MAX_INDEX_TOKENS, build_search_index};

/// Queries typed by auditors should hit the tokens of the entries they mean.
#[test]
fn auditor_prefix_queries_match() {
    let tokens = build_search_index("Office Depot Supplies");
    for query in ["o", "offic", "depo", "sup", "supplies", "office depot supplies"] {
        assert!(tokens.iter().any(|t| t == query), "missing {query}");
    }
    // Third-word prefixes stop at three characters.
    assert!(!tokens.iter().any(|t| t == "supp"));
}

#[test]
fn whitespace_variants_normalize_to_one_phrase() {
    let spaced = build_search_index("  Office\tDepot \n Supplies ");
    assert_eq!(spaced, build_search_index("office depot supplies"));
    assert_eq!(spaced.last().map(String::as_str), Some("office depot supplies"));
}

#[test]
fn long_descriptions_stay_bounded() {
    let description = (0..60)
        .map(|i| format!("item{i:02}"))
        .collect::<Vec<_>>()
        .join(" ");
    let tokens = build_search_index(&description);

    assert_eq!(tokens.len(), MAX_INDEX_TOKENS + 1);
    assert_eq!(tokens.last(), Some(&description));
    assert!(tokens.iter().any(|t| t == "item00"));
    assert!(!tokens.iter().any(|t| t == "item59"));
}

#[test]
fn identical_input_yields_identical_tokens() {
    let text = "Cash Drop for Armored Car pickup";
    assert_eq!(build_search_index(text), build_search_index(text));
}
