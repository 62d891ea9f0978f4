/*!
 * Language code utilities.
 *
 * Backends disagree on how languages are spelled ("zh" vs "zh-CN" vs "ZH");
 * each service descriptor carries a small remap table applied before any
 * request is made. This module also hosts the output sanitizer shared by all
 * backends.
 */

/// Remap a language code through a backend table, falling back to the input.
///
/// Table keys are matched case-insensitively; the mapped value is returned
/// verbatim.
pub fn remap_language(table: &[(&str, &str)], code: &str) -> String {
    for (from, to) in table {
        if from.eq_ignore_ascii_case(code) {
            return (*to).to_string();
        }
    }
    code.to_string()
}

/// Normalize a source language for the DeepL wire format.
///
/// DeepL expects uppercase ISO codes; an empty source means auto-detection
/// and is passed through for the caller to handle.
pub fn deepl_source_lang(code: &str) -> String {
    code.to_uppercase()
}

/// Normalize a target language for the DeepL wire format.
///
/// Uppercases the code and folds "ZH-HANS" down to "ZH", which is how DeepL
/// spells simplified Chinese.
pub fn deepl_target_lang(code: &str) -> String {
    let upper = code.to_uppercase();
    if upper == "ZH-HANS" {
        "ZH".to_string()
    } else {
        upper
    }
}

/// Strip control characters from translated text.
///
/// Backends occasionally return stray control codes; left in place they
/// corrupt the downstream document layout.
pub fn remove_control_characters(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

/// Truncate a string to at most `max_chars` characters.
///
/// Several public endpoints cap the input length; truncation counts
/// characters, not bytes, so multi-byte text is never split mid-codepoint.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
