/// Tests for ShaderKeyword and ShaderKeywordBuilder

use super::*;
use rustc_hash::FxHashMap;
use xxhash_rust::xxh32::xxh32;

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_insertion_order_does_not_matter() {
    let ab = ShaderKeyword::from_keywords(["FOG", "SHADOWS"]);
    let ba = ShaderKeyword::from_keywords(["SHADOWS", "FOG"]);

    assert_eq!(ab, ba);
    assert_eq!(ab.hash_code(), ba.hash_code());
    assert_eq!(ab.name(), "_FOG_SHADOWS");
    assert_eq!(ba.name(), "_FOG_SHADOWS");
}

#[test]
fn test_hash_is_xxh32_of_canonical_name() {
    let keyword = ShaderKeyword::from_keywords(["B", "A"]);
    assert_eq!(keyword.hash_code(), xxh32(b"_A_B", 0));
}

#[test]
fn test_empty_set_is_valid() {
    let empty = ShaderKeyword::new();
    assert!(empty.is_empty());
    assert_eq!(empty.name(), "");
    assert_eq!(empty.hash_code(), xxh32(b"", 0));
    assert_eq!(empty, ShaderKeyword::default());
    assert_eq!(format!("{}", empty), "<none>");
}

#[test]
fn test_duplicates_and_empty_names_ignored() {
    let keyword = ShaderKeyword::from_keywords(["FOG", "FOG", ""]);
    assert_eq!(keyword.len(), 1);
    assert_eq!(keyword, ShaderKeyword::from_keywords(["FOG"]));
}

#[test]
fn test_keywords_iterate_sorted() {
    let keyword: ShaderKeyword = ["ZETA", "ALPHA", "MID"].into_iter().collect();
    let names: Vec<&str> = keyword.keywords().collect();
    assert_eq!(names, vec!["ALPHA", "MID", "ZETA"]);
}

#[test]
fn test_contains() {
    let keyword = ShaderKeyword::from_keywords(["FOG"]);
    assert!(keyword.contains("FOG"));
    assert!(!keyword.contains("SHADOWS"));
    assert!(!keyword.contains("KEYWORD_TEST_NEVER_INTERNED"));
}

#[test]
fn test_usable_as_map_key() {
    let mut map = FxHashMap::default();
    map.insert(ShaderKeyword::from_keywords(["A", "B"]), 1);
    map.insert(ShaderKeyword::from_keywords(["B"]), 2);

    assert_eq!(map.get(&ShaderKeyword::from_keywords(["B", "A"])), Some(&1));
    assert_eq!(map.get(&ShaderKeyword::from_keywords(["B"])), Some(&2));
    assert_eq!(map.get(&ShaderKeyword::new()), None);
}

#[test]
fn test_ordering_follows_hash() {
    let a = ShaderKeyword::from_keywords(["A"]);
    let b = ShaderKeyword::from_keywords(["B"]);
    assert_eq!(a.cmp(&b), a.hash_code().cmp(&b.hash_code()));
}

// ============================================================================
// Builder
// ============================================================================

#[test]
fn test_builder_add_remove() {
    let mut builder = ShaderKeyword::builder();
    builder.add("FOG").add("SHADOWS").add("FOG");
    assert_eq!(builder.len(), 2);
    assert!(builder.contains("SHADOWS"));

    builder.remove("SHADOWS").remove("NOT_THERE");
    assert!(!builder.contains("SHADOWS"));
    assert_eq!(builder.build(), ShaderKeyword::from_keywords(["FOG"]));
}

#[test]
fn test_builder_from_existing_set_recomputes_hash() {
    let base = ShaderKeyword::from_keywords(["FOG"]);
    let extended = base.to_builder().add("SKINNED").build();

    assert_ne!(base, extended);
    assert_eq!(extended.name(), "_FOG_SKINNED");
    // the source set is untouched
    assert_eq!(base.name(), "_FOG");
}

#[test]
fn test_builder_union_and_difference() {
    let current = ShaderKeyword::from_keywords(["FOG", "SHADOWS"]);
    let enable = ShaderKeyword::from_keywords(["SKINNED"]);
    let disable = ShaderKeyword::from_keywords(["FOG", "UNKNOWN"]);

    let next = current.to_builder().union(&enable).difference(&disable).build();
    assert_eq!(next, ShaderKeyword::from_keywords(["SHADOWS", "SKINNED"]));
}
