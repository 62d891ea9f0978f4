/*!
 * Tests for the shared translator contract: caching, bypass, sanitization
 */

use std::sync::atomic::Ordering;

use papertrans::translators::Translator;

use crate::common::mock_backends::MockBackend;

fn translator_with(backend: MockBackend, ignore_cache: bool) -> Translator {
    Translator::new(Box::new(backend), "en", "zh-CN", None, ignore_cache)
}

#[tokio::test]
async fn test_translate_twice_should_issue_one_backend_call() {
    let backend = MockBackend::new();
    let calls = backend.call_counter();
    let translator = translator_with(backend, false);

    let first = translator.translate("hello").await.unwrap();
    let second = translator.translate("hello").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_translate_different_texts_should_each_hit_backend() {
    let backend = MockBackend::new();
    let calls = backend.call_counter();
    let translator = translator_with(backend, false);

    translator.translate("hello").await.unwrap();
    translator.translate("world").await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_translate_with_ignore_cache_should_neither_read_nor_write() {
    let backend = MockBackend::new();
    let calls = backend.call_counter();
    let translator = translator_with(backend, true);

    translator.translate("hello").await.unwrap();
    translator.translate("hello").await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(translator.cache().is_empty());
}

#[tokio::test]
async fn test_translate_with_bypass_should_skip_stored_entry() {
    let backend = MockBackend::new();
    let calls = backend.call_counter();
    let translator = translator_with(backend, false);

    translator.translate("hello").await.unwrap();
    assert_eq!(translator.cache().len(), 1);

    // Bypass forces recomputation and leaves the cache untouched.
    translator.translate_with("hello", true).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(translator.cache().len(), 1);
}

#[tokio::test]
async fn test_translate_should_strip_control_characters() {
    let backend = MockBackend::with_reply("你\u{0000}好\u{0008}世界");
    let translator = translator_with(backend, false);

    let result = translator.translate("hello world").await.unwrap();
    assert_eq!(result, "你好世界");
}

#[tokio::test]
async fn test_translate_should_cache_sanitized_value() {
    let backend = MockBackend::with_reply("a\u{0007}b");
    let translator = translator_with(backend, false);

    translator.translate("x").await.unwrap();
    assert_eq!(
        translator.cache().get("mock", "en", "zh-CN", "x"),
        Some("ab".to_string())
    );
}

#[tokio::test]
async fn test_translate_failure_should_propagate_and_not_cache() {
    let backend = MockBackend::new();
    let calls = backend.call_counter();
    backend.fail_next_call();
    let translator = translator_with(backend, false);

    assert!(translator.translate("hello").await.is_err());
    assert!(translator.cache().is_empty());

    // No retry happened at this layer.
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // The next call reaches the backend again and succeeds.
    assert_eq!(translator.translate("hello").await.unwrap(), "echo:hello");
}
