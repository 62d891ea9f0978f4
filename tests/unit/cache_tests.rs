/*!
 * Tests for translation cache functionality
 */

use papertrans::cache::TranslationCache;

#[test]
fn test_cache_get_with_missing_key_should_return_none() {
    let cache = TranslationCache::new();
    assert!(cache.get("google", "en", "zh-CN", "hello").is_none());
}

#[test]
fn test_cache_store_should_return_stored_translation() {
    let cache = TranslationCache::new();
    cache.store("google", "en", "zh-CN", "hello", "你好");

    assert_eq!(
        cache.get("google", "en", "zh-CN", "hello"),
        Some("你好".to_string())
    );
}

#[test]
fn test_cache_get_with_different_backend_should_return_none() {
    let cache = TranslationCache::new();
    cache.store("google", "en", "zh-CN", "hello", "你好");

    // Same text and languages, different backend
    assert!(cache.get("bing", "en", "zh-CN", "hello").is_none());
}

#[test]
fn test_cache_get_with_different_languages_should_return_none() {
    let cache = TranslationCache::new();
    cache.store("google", "en", "zh-CN", "hello", "你好");

    assert!(cache.get("google", "de", "zh-CN", "hello").is_none());
    assert!(cache.get("google", "en", "fr", "hello").is_none());
}

#[test]
fn test_cache_store_with_same_key_should_overwrite() {
    let cache = TranslationCache::new();
    cache.store("google", "en", "fr", "hello", "bonjour");
    cache.store("google", "en", "fr", "hello", "salut");

    assert_eq!(
        cache.get("google", "en", "fr", "hello"),
        Some("salut".to_string())
    );
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_stats_should_count_hits_and_misses() {
    let cache = TranslationCache::new();
    cache.store("google", "en", "fr", "hello", "bonjour");

    cache.get("google", "en", "fr", "hello");
    cache.get("google", "en", "fr", "goodbye");

    let (hits, misses, hit_rate) = cache.stats();
    assert_eq!(hits, 1);
    assert_eq!(misses, 1);
    assert!((hit_rate - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_cache_clear_should_reset_entries_and_counters() {
    let cache = TranslationCache::new();
    cache.store("google", "en", "fr", "hello", "bonjour");
    cache.get("google", "en", "fr", "hello");

    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.stats(), (0, 0, 0.0));
}

#[test]
fn test_cache_clone_should_share_storage() {
    let cache1 = TranslationCache::new();
    let cache2 = cache1.clone();

    cache1.store("google", "en", "fr", "hello", "bonjour");

    assert_eq!(
        cache2.get("google", "en", "fr", "hello"),
        Some("bonjour".to_string())
    );
}

#[test]
fn test_cache_with_unicode_text_should_handle_correctly() {
    let cache = TranslationCache::new();
    let source = "こんにちは";
    let translation = "你好";

    cache.store("deepl", "ja", "ZH", source, translation);
    assert_eq!(
        cache.get("deepl", "ja", "ZH", source),
        Some(translation.to_string())
    );
}
