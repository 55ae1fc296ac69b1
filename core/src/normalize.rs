use serde_json::Value;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize text for keyword matching: lowercase, NFD with combining marks removed,
/// whitespace runs collapsed to a single space and trimmed.
///
/// Lowercasing runs first so that characters whose lowercase form carries a combining
/// mark (e.g. `İ`) are stripped in the same pass, which keeps the function idempotent.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    let mut out = String::with_capacity(stripped.len());
    for word in stripped.split_whitespace() {
        if !out.is_empty() { out.push(' '); }
        out.push_str(word);
    }
    out
}

/// Normalize an arbitrary JSON cell. `null` is empty text, strings are taken as-is,
/// anything else is rendered to its textual form first.
pub fn normalize_value(value: &Value) -> String {
    normalize(&value_to_text(value))
}

pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(normalize("Contrafação"), "contrafacao");
        assert_eq!(normalize("Contrafação"), normalize("CONTRAFACAO"));
        assert_eq!(normalize("IMITAÇÃO"), "imitacao");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("  Propriedade \t\n  Intelectual  "), "propriedade intelectual");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn is_idempotent() {
        for s in ["Registro da nova cor", "İstanbul ÇA", "trade\u{00a0}dress", "ﬁ café", ""] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn decomposed_input_matches_precomposed() {
        // "ação" written with combining tilde and cedilla
        assert_eq!(normalize("ac\u{0327}a\u{0303}o"), normalize("ação"));
    }

    #[test]
    fn coerces_non_strings() {
        assert_eq!(normalize_value(&Value::Null), "");
        assert_eq!(normalize_value(&json!(42)), "42");
        assert_eq!(normalize_value(&json!(true)), "true");
        assert_eq!(normalize_value(&json!("Marca")), "marca");
    }
}
