use std::collections::HashMap;

use fluent_templates::{
    fluent_bundle::{FluentArgs, FluentValue},
    static_loader, Loader,
};
use once_cell::sync::Lazy;
use unic_langid::LanguageIdentifier;

static_loader! {
    static LOCALES = {
        locales: "./locales",
        fallback_language: "ru",
        // Route titles and review texts go into captions verbatim.
        customise: |bundle| bundle.set_use_isolating(false),
    };
}

/// Supported languages (code, human-readable name).
pub static SUPPORTED_LANGS: &[(&str, &str)] = &[("ru", "Русский"), ("en", "English")];

/// Default language identifier used as a fallback.
static DEFAULT_LANG: Lazy<LanguageIdentifier> = Lazy::new(|| "ru".parse().unwrap_or_default());

/// Normalizes a language code into a LanguageIdentifier (falls back to default).
pub fn lang_from_code(code: &str) -> LanguageIdentifier {
    let normalized = match is_language_supported(code) {
        Some("en") => "en-US",
        Some(other) => other,
        None => return DEFAULT_LANG.clone(),
    };
    normalized.parse().unwrap_or_else(|_| DEFAULT_LANG.clone())
}

/// Language for a Telegram user's `language_code`, Russian when absent.
pub fn user_lang(telegram_lang_code: Option<&str>) -> LanguageIdentifier {
    telegram_lang_code.map(lang_from_code).unwrap_or_else(|| DEFAULT_LANG.clone())
}

/// Returns a localized string for the given key.
/// Multi-line texts are written as Fluent multiline values in the `.ftl` files.
pub fn t(lang: &LanguageIdentifier, key: &str) -> String {
    LOCALES
        .lookup(lang, key)
        .unwrap_or_else(|| LOCALES.lookup(&DEFAULT_LANG, key).unwrap_or_else(|| key.to_string()))
}

/// Returns a localized string with arguments for interpolation.
/// Argument values are inserted verbatim.
pub fn t_args(lang: &LanguageIdentifier, key: &str, args: &FluentArgs) -> String {
    let args_map: HashMap<String, FluentValue> = args.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();

    LOCALES.lookup_with_args(lang, key, &args_map).unwrap_or_else(|| {
        LOCALES
            .lookup_with_args(&DEFAULT_LANG, key, &args_map)
            .unwrap_or_else(|| key.to_string())
    })
}

/// Checks if a language code is supported by the bot.
/// Returns the normalized language code if supported, None otherwise.
pub fn is_language_supported(code: &str) -> Option<&'static str> {
    // "en-GB" -> "en"
    let normalized = code.split(['-', '_']).next().unwrap_or(code).to_lowercase();

    SUPPORTED_LANGS
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(&normalized))
        .map(|(c, _)| *c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn loads_known_translation() {
        let ru = lang_from_code("ru");
        let en = lang_from_code("en");

        assert_eq!(t(&ru, "main-menu-title"), "Главное меню:");
        assert_eq!(t(&en, "main-menu-title"), "Main menu:");
    }

    #[test]
    fn interpolated_values_are_not_rewritten() {
        let mut args = FluentArgs::new();
        args.set("review", r"C:\new\n");
        let text = t_args(&lang_from_code("ru"), "card-own-review", &args);
        assert_eq!(text, r"Ваш отзыв: C:\new\n");
    }

    #[test]
    fn multiline_values_have_newlines() {
        let text = t(&lang_from_code("ru"), "welcome");
        assert!(text.contains('\n'));
        assert!(!text.contains("\\n"));
        assert!(text.contains("НеМаршруты"));
    }

    #[test]
    fn interpolates_without_isolation_marks() {
        let mut args = FluentArgs::new();
        args.set("tag", "bogus:tag");
        let text = t_args(&lang_from_code("ru"), "notice-unknown-command", &args);
        assert_eq!(text, "Неизвестная команда: bogus:tag");
    }

    #[test]
    fn unsupported_language_falls_back_to_russian() {
        assert_eq!(user_lang(Some("ja")), lang_from_code("ru"));
        assert_eq!(user_lang(None), lang_from_code("ru"));
        assert_eq!(t(&user_lang(Some("es")), "btn-search"), "Поиск");
    }

    #[test]
    fn test_is_language_supported() {
        assert_eq!(is_language_supported("en"), Some("en"));
        assert_eq!(is_language_supported("en-GB"), Some("en"));
        assert_eq!(is_language_supported("RU"), Some("ru"));
        assert_eq!(is_language_supported("de"), None);
    }

    #[test]
    fn missing_key_returns_key() {
        assert_eq!(t(&lang_from_code("en"), "no-such-key"), "no-such-key");
    }
}
