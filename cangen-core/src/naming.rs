//! Identifier case conversions shared by every generator.
//!
//! All artifact names of one run (C files, Java classes, JNI symbols, CMake
//! targets) are derived through these functions, so they must stay pure and
//! deterministic.

use std::sync::LazyLock;

use regex::Regex;

static WORD_AFTER_ANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"));
static UPPER_AFTER_LOWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));
static NON_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("valid regex"));
static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid regex"));

/// Replace anything but `a-z`, `A-Z` and `0-9` with `_`.
pub fn sanitize(s: &str) -> String {
    NON_IDENTIFIER.replace_all(s, "_").into_owned()
}

/// Convert arbitrary text to snake_case (e.g., "CANOpenMessage" -> "can_open_message").
///
/// Acronym runs stay together (`HTTPServer` -> `http_server`) and any run of
/// punctuation collapses to a single underscore. The result only contains
/// `[a-z0-9_]`, which makes the conversion idempotent.
pub fn to_snake_case(s: &str) -> String {
    let value = WORD_AFTER_ANY.replace_all(s, "${1}_${2}");
    let value = UPPER_AFTER_LOWER.replace_all(&value, "${1}_${2}");
    let value = sanitize(&value.to_lowercase());
    UNDERSCORE_RUN.replace_all(&value, "_").into_owned()
}

/// Convert snake_case to camelCase (e.g., "engine_rpm" -> "engineRpm")
pub fn to_camel_case(s: &str) -> String {
    let mut parts = s.split('_');
    let first = parts.next().unwrap_or_default().to_string();
    parts.fold(first, |mut out, part| {
        out.push_str(&title_case(part));
        out
    })
}

/// Convert snake_case to PascalCase (e.g., "engine_rpm" -> "EngineRpm")
pub fn to_pascal_case(s: &str) -> String {
    s.split('_').map(title_case).collect()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("hello"), "hello");
        assert_eq!(sanitize("my-file.dbc"), "my_file_dbc");
        assert_eq!(sanitize("a b"), "a_b");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("fooBar"), "foo_bar");
        assert_eq!(to_snake_case("FooBar"), "foo_bar");
        assert_eq!(to_snake_case("CANOpenMessage"), "can_open_message");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("abc123"), "abc123");
        assert_eq!(to_snake_case(""), "");
    }

    #[test]
    fn test_to_snake_case_file_stem() {
        assert_eq!(to_snake_case("My Motor-Controller"), "my_motor_controller");
        assert_eq!(to_snake_case("motor--ctrl..v2"), "motor_ctrl_v2");
    }

    #[test]
    fn test_to_snake_case_acronyms() {
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("HTTPServerCAN"), "http_server_can");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("engine_rpm"), "engineRpm");
        assert_eq!(to_camel_case("engine"), "engine");
        assert_eq!(to_camel_case("get_user_id"), "getUserId");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("engine_rpm"), "EngineRpm");
        assert_eq!(to_pascal_case("my_motor_controller"), "MyMotorController");
        assert_eq!(to_pascal_case("demo"), "Demo");
        assert_eq!(to_pascal_case("a__b"), "AB");
        assert_eq!(to_pascal_case(""), "");
    }

    proptest! {
        #[test]
        fn test_snake_case_is_idempotent(s in "[ -~]{0,40}") {
            let once = to_snake_case(&s);
            prop_assert_eq!(to_snake_case(&once), once);
        }

        #[test]
        fn test_sanitize_alphabet(s in ".{0,40}") {
            let out = sanitize(&s);
            prop_assert!(out.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        }

        #[test]
        fn test_snake_case_alphabet(s in ".{0,40}") {
            let out = to_snake_case(&s);
            prop_assert!(out.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        }
    }
}
