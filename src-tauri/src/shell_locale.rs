use std::env;

const LOCALE_ENV_KEYS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Locale sent to the chat page as `setlang`, taken from the first usable
/// locale environment variable.
pub fn resolve_content_locale(default_locale: &'static str) -> String {
    resolve_content_locale_from(default_locale, |key| env::var(key).ok())
}

pub(crate) fn resolve_content_locale_from<F>(default_locale: &'static str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    LOCALE_ENV_KEYS
        .iter()
        .filter_map(|key| lookup(key))
        .find_map(|value| normalize_content_locale(&value))
        .unwrap_or_else(|| default_locale.to_string())
}

/// Turns POSIX locale names (`en_US.UTF-8`, `zh_CN@pinyin`) into BCP-47
/// tags (`en-US`, `zh-CN`). `C` and `POSIX` carry no language.
pub(crate) fn normalize_content_locale(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let base = raw
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base.eq_ignore_ascii_case("C") || base.eq_ignore_ascii_case("POSIX") {
        return None;
    }

    let mut parts = base.split(['_', '-']);
    let language = parts.next()?.to_ascii_lowercase();
    if language.len() < 2 || language.len() > 3 || !language.chars().all(|c| c.is_ascii_alphabetic())
    {
        return None;
    }

    match parts.next() {
        Some(region) if !region.is_empty() && region.chars().all(|c| c.is_ascii_alphanumeric()) => {
            Some(format!("{language}-{}", region.to_ascii_uppercase()))
        }
        _ => Some(language),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_content_locale_converts_posix_names() {
        assert_eq!(normalize_content_locale("en_US.UTF-8"), Some("en-US".to_string()));
        assert_eq!(normalize_content_locale("zh_CN@pinyin"), Some("zh-CN".to_string()));
        assert_eq!(normalize_content_locale("de"), Some("de".to_string()));
        assert_eq!(normalize_content_locale("ja-jp"), Some("ja-JP".to_string()));
    }

    #[test]
    fn normalize_content_locale_rejects_language_free_values() {
        assert_eq!(normalize_content_locale("C"), None);
        assert_eq!(normalize_content_locale("POSIX"), None);
        assert_eq!(normalize_content_locale("C.UTF-8"), None);
        assert_eq!(normalize_content_locale(""), None);
        assert_eq!(normalize_content_locale("1234"), None);
    }

    #[test]
    fn resolve_content_locale_prefers_lc_all_then_falls_back() {
        let locale = resolve_content_locale_from("en-US", |key| match key {
            "LC_ALL" => Some("C".to_string()),
            "LANG" => Some("fr_FR.UTF-8".to_string()),
            _ => None,
        });
        assert_eq!(locale, "fr-FR");

        let fallback = resolve_content_locale_from("en-US", |_| None);
        assert_eq!(fallback, "en-US");
    }
}
