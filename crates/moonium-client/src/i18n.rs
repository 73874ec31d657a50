/*
[INPUT]:  Translation keys (`errors.no_metamask`) and interpolation variables
[OUTPUT]: Localized user-facing messages
[POS]:    Presentation support - turns error keys into notification text
[UPDATE]: When adding locales or translation keys
*/

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const EN_TABLE: &str = include_str!("../locales/en.json");
const IT_TABLE: &str = include_str!("../locales/it.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    It,
}

impl Locale {
    /// Italian for an `it` language tag (`it`, `it-IT`), English otherwise.
    pub fn from_language(tag: &str) -> Self {
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("it") {
            Locale::It
        } else {
            Locale::En
        }
    }

    fn table(&self) -> &'static str {
        match self {
            Locale::En => EN_TABLE,
            Locale::It => IT_TABLE,
        }
    }
}

/// Key based message lookup over an embedded locale table
#[derive(Debug, Clone)]
pub struct Translator {
    locale: Locale,
    table: Value,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        let table = serde_json::from_str(locale.table()).unwrap_or_else(|err| {
            tracing::warn!(?locale, error = %err, "locale table is not valid JSON");
            Value::Null
        });
        Self { locale, table }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Resolve a dotted key; unknown keys resolve to the key itself.
    pub fn translate(&self, key: &str) -> String {
        key.split('.')
            .try_fold(&self.table, |node, segment| node.get(segment))
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// Resolve a key and substitute every `{{name}}` placeholder.
    pub fn translate_with(&self, key: &str, vars: &HashMap<&str, String>) -> String {
        vars.iter()
            .fold(self.translate(key), |message, (name, value)| {
                message.replace(&format!("{{{{{name}}}}}"), value)
            })
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_language() {
        assert_eq!(Locale::from_language("it"), Locale::It);
        assert_eq!(Locale::from_language("it-IT"), Locale::It);
        assert_eq!(Locale::from_language("en-US"), Locale::En);
        assert_eq!(Locale::from_language(""), Locale::En);
    }

    #[test]
    fn test_translate_known_and_unknown_keys() {
        let t = Translator::new(Locale::En);
        assert!(t.translate("errors.no_metamask").contains("Metamask"));
        assert_eq!(t.translate("errors.does_not_exist"), "errors.does_not_exist");
        // Intermediate nodes are not messages.
        assert_eq!(t.translate("errors"), "errors");
    }

    #[test]
    fn test_every_english_error_key_has_an_italian_message() {
        let en = Translator::new(Locale::En);
        let it = Translator::new(Locale::It);
        for key in [
            "errors.title",
            "errors.no_metamask",
            "errors.no_phantom",
            "errors.cant_disconnect",
            "errors.unsupported_blockchain",
            "errors.auth_failed",
            "errors.token_expired",
            "errors.not_found",
            "errors.api_call_failed",
        ] {
            assert_ne!(en.translate(key), key);
            assert_ne!(it.translate(key), key);
            assert_ne!(en.translate(key), it.translate(key));
        }
    }

    #[test]
    fn test_translate_with_interpolation() {
        let t = Translator::new(Locale::En);
        let vars = HashMap::from([("wallet", "ETHEREUM:0xabc".to_string())]);
        assert_eq!(
            t.translate_with("success.wallet_connected", &vars),
            "Connected ETHEREUM:0xabc"
        );
    }
}
