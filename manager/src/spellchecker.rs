//! Spellchecker locale lookup

use crate::constants::defaults::FALLBACK_LOCALE;
use tracing::debug;

/// Locales a service spellchecker can switch to, in lookup order.
pub const SPELLCHECKER_LOCALES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("bg", "Bulgarian"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en-AU", "English (Australia)"),
    ("en-CA", "English (Canada)"),
    ("en-GB", "English (United Kingdom)"),
    ("en-US", "English (United States)"),
    ("es", "Spanish"),
    ("es-419", "Spanish (Latin America)"),
    ("es-AR", "Spanish (Argentina)"),
    ("es-ES", "Spanish (Spain)"),
    ("es-MX", "Spanish (Mexico)"),
    ("es-US", "Spanish (United States)"),
    ("et", "Estonian"),
    ("fa", "Persian"),
    ("fo", "Faroese"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("hy", "Armenian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ko", "Korean"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("nb", "Norwegian"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("pt-BR", "Portuguese (Brazil)"),
    ("pt-PT", "Portuguese (Portugal)"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sh", "Serbo-Croatian"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("ta", "Tamil"),
    ("tg", "Tajik"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("vi", "Vietnamese"),
];

/// Resolve `de`, `DE`, `en-gb` or `en` style identifiers to a known locale.
/// A bare language matches the first locale of that language.
pub fn locale_by_fuzzy_identifier(identifier: &str) -> Option<&'static str> {
    let needle = identifier.to_lowercase();
    SPELLCHECKER_LOCALES
        .iter()
        .map(|(key, _)| *key)
        .find(|key| {
            key.to_lowercase() == needle || key.split('-').next() == Some(needle.as_str())
        })
}

/// Dictionaries to load for `locale`: the resolved locale, then the system
/// default, then the fallback locale, without duplicates.
pub fn dictionary_chain(locale: &str, default_locale: Option<&str>) -> Vec<String> {
    let mut chain: Vec<String> = Vec::with_capacity(3);
    let candidates = [
        locale_by_fuzzy_identifier(locale),
        default_locale,
        Some(FALLBACK_LOCALE),
    ];

    for candidate in candidates.into_iter().flatten() {
        if !chain.iter().any(|c| c == candidate) {
            chain.push(candidate.to_string());
        }
    }

    debug!("Spellchecker dictionaries for {}: {:?}", locale, chain);
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("de" => Some("de"); "exact")]
    #[test_case("DE" => Some("de"); "case insensitive")]
    #[test_case("en-gb" => Some("en-GB"); "region case insensitive")]
    #[test_case("en" => Some("en-AU"); "bare language picks first region")]
    #[test_case("pt" => Some("pt-BR"); "portuguese")]
    #[test_case("xx" => None; "unknown")]
    fn test_fuzzy_lookup(identifier: &str) -> Option<&'static str> {
        locale_by_fuzzy_identifier(identifier)
    }

    #[test]
    fn test_chain_deduplicates() {
        assert_eq!(dictionary_chain("en-US", Some("en-US")), vec!["en-US"]);
        assert_eq!(
            dictionary_chain("fr", Some("de")),
            vec!["fr".to_string(), "de".to_string(), "en-US".to_string()]
        );
    }

    #[test]
    fn test_chain_unknown_locale_falls_back() {
        assert_eq!(dictionary_chain("klingon", None), vec!["en-US"]);
    }
}
