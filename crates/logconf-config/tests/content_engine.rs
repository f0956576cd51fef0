//! Content engine integration tests.
//!
//! These tests exercise the public surface end to end:
//!
//! 1. Text format - comments, blank lines, duplicates, escapes
//! 2. Round trip - mapping → text → mapping
//! 3. Fingerprints - equal content ⇔ equal fingerprint
//! 4. Lazy parsing - idempotent, safe under concurrent first reads
//! 5. Layering - defaults < file < environment

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use logconf_config::{
    resolve, unescape, ContentStore, EnvOverrides, Fingerprint, LayeredResolver, Mapping,
    TypedAccess,
};
use proptest::prelude::*;

fn mapping(pairs: &[(&str, &str)]) -> Mapping {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// =============================================================================
// Text format
// =============================================================================

#[test]
fn test_comments_and_blank_lines_are_ignored() {
    let store = ContentStore::from_text("# comment\n\nkey=val\n// also comment\n");
    assert_eq!(*store.get_all(), mapping(&[("key", "val")]));
}

#[test]
fn test_lines_without_equals_are_dropped() {
    let store = ContentStore::from_text("justtext\nkey=val");
    assert_eq!(*store.get_all(), mapping(&[("key", "val")]));
}

#[test]
fn test_duplicate_keys_last_occurrence_wins() {
    let store = ContentStore::from_text("k=1\nk=2\n");
    assert_eq!(*store.get_all(), mapping(&[("k", "2")]));
}

#[test]
fn test_escape_decoding() {
    assert_eq!(unescape(r"a\tb\n\u0041").unwrap(), "a\tb\nA");
    assert_eq!(unescape(r"abc\").unwrap(), r"abc\");

    let store = ContentStore::from_text(r"greeting=a\tb\n\u0041");
    assert_eq!(store.get("greeting"), Some("a\tb\nA".to_string()));
}

#[test]
fn test_malformed_escape_only_drops_its_key() {
    let store = ContentStore::from_text("a=1\nb=\\u00zz\nc=\\u004\nd=4\n");
    let all = store.get_all();
    assert_eq!(all.len(), 2);
    assert_eq!(all["a"], "1");
    assert_eq!(all["d"], "4");
    assert_eq!(store.get_or("b", "fallback"), "fallback");
}

#[test]
fn test_unpaired_surrogate_value_is_kept() {
    let store = ContentStore::from_text("a=x\\uD800y\nb=2\n");
    assert_eq!(store.get("a"), Some("x\u{FFFD}y".to_string()));
    assert_eq!(store.get("b"), Some("2".to_string()));
}

#[test]
fn test_write_path_does_not_escape() {
    // Escapes are decoded on read but never re-encoded on write.
    let store = ContentStore::from_text(r"tab=a\tb");
    store.put_all([("other", "x")]);
    assert_eq!(store.content_string(), "tab=a\tb\nother=x\n");
}

// =============================================================================
// Typed access
// =============================================================================

#[test]
fn test_typed_fallback() {
    let malformed = ContentStore::from_mapping(mapping(&[("x", "notanumber")]));
    let missing = ContentStore::from_mapping(Mapping::new());
    let valid = ContentStore::from_mapping(mapping(&[("x", "42")]));

    assert_eq!(malformed.get_int("x", 5), 5);
    assert_eq!(missing.get_int("x", 5), 5);
    assert_eq!(valid.get_int("x", 5), 42);
}

// =============================================================================
// Round trip and fingerprints
// =============================================================================

fn plain_key() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9._-]{0,15}"
}

fn plain_value() -> impl Strategy<Value = String> {
    "([a-zA-Z0-9._:=/-]([a-zA-Z0-9 ._:=/-]{0,18}[a-zA-Z0-9._:=/-])?)?"
}

proptest! {
    #[test]
    fn prop_mapping_round_trips_through_text(
        pairs in prop::collection::vec((plain_key(), plain_value()), 0..24)
    ) {
        let original: Mapping = pairs.into_iter().collect();

        let store = ContentStore::from_mapping(original.clone());
        prop_assert_eq!(&*store.get_all(), &original);

        let reparsed = ContentStore::from_text(store.content());
        prop_assert_eq!(&*reparsed.get_all(), &original);
        prop_assert_eq!(reparsed.fingerprint(), store.fingerprint());
    }

    #[test]
    fn prop_fingerprint_tracks_content(
        a in prop::collection::vec(any::<u8>(), 0..64),
        b in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let fa = ContentStore::from_text(a.clone()).fingerprint();
        let fb = ContentStore::from_text(b.clone()).fingerprint();
        prop_assert_eq!(fa == fb, a == b);
    }
}

#[test]
fn test_many_distinct_contents_have_distinct_fingerprints() {
    let prints: HashSet<Fingerprint> = (0..5000)
        .map(|i| ContentStore::from_text(format!("key={i}\n")).fingerprint())
        .collect();
    assert_eq!(prints.len(), 5000);
}

#[test]
fn test_fingerprint_follows_every_write() {
    let store = ContentStore::from_text("a=1\n");
    let original = store.fingerprint();

    store.put_all([("b", "2")]);
    let after_put = store.fingerprint();
    assert_ne!(after_put, original);
    assert_eq!(after_put, Fingerprint::of(&store.content()));

    store.copy_of_text("a=1\n");
    assert_eq!(store.fingerprint(), original);

    store.copy_of_mapping(mapping(&[("a", "1")]));
    assert_eq!(store.fingerprint(), original);
}

// =============================================================================
// Lazy parsing
// =============================================================================

#[test]
fn test_lazy_parse_is_idempotent() {
    let store = ContentStore::from_text("a=1\nb=2\n");
    assert!(!store.is_parsed());

    let first = store.get_all();
    let second = store.get_all();
    assert_eq!(first, second);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_concurrent_first_reads_see_complete_mapping() {
    const ENTRIES: usize = 2000;
    const THREADS: usize = 16;

    for _ in 0..20 {
        let text: String = (0..ENTRIES).map(|i| format!("key{i}=value{i}\n")).collect();
        let store = Arc::new(ContentStore::from_text(text));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let all = store.get_all();
                    assert_eq!(all.len(), ENTRIES);
                    assert_eq!(all["key1999"], "value1999");
                    all
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        // Parsed exactly once: every reader got the same mapping.
        assert!(results.iter().all(|m| Arc::ptr_eq(m, &results[0])));
    }
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn test_precedence_merge() {
    let store = resolve(
        &mapping(&[("a", "1"), ("b", "2")]),
        Some("a=10".as_bytes()),
        &mapping(&[("b", "20")]),
    );
    assert_eq!(*store.get_all(), mapping(&[("a", "10"), ("b", "20")]));
}

#[test]
fn test_layering_with_prefixed_environment() {
    let env = EnvOverrides::from_vars_with_prefix(
        [
            ("SVC__PROCESS__NAME", "from-env"),
            ("SVC__PROCESS__APP_ID", "77"),
            ("UNRELATED", "x"),
        ],
        "svc",
    );

    let store = LayeredResolver::new()
        .with_defaults([("process.name", "unknown"), ("process.appId", "0")])
        .with_file("process.name=from-file\nlog.level=warn\n")
        .with_env(env.mapping())
        .resolve();

    assert_eq!(store.get_or("process.name", ""), "from-env");
    assert_eq!(store.get_long("process.appId", 0), 77);
    assert_eq!(store.get_or("log.level", ""), "warn");
    assert!(!store.has("UNRELATED"));
}
