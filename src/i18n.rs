// i18n.rs — UI string catalog
//
// English ships inside the binary. Other languages are read at runtime from
// assets/i18n/<lang>.json (flat { "key": "value" } maps), searched next to the
// executable first and then in the working directory.
// Lookup order: selected language -> embedded English -> the key itself.

use once_cell::sync::OnceCell;
use std::{collections::HashMap, path::Path, sync::RwLock};

use crate::config::find_asset;

const EMBEDDED_EN: &str = include_str!("../assets/i18n/en.json");
pub const FALLBACK_LANG: &str = "en";

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub lang: String,
    strings: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Catalog {
    pub fn from_maps(
        lang: impl Into<String>,
        strings: HashMap<String, String>,
        fallback: HashMap<String, String>,
    ) -> Self {
        Self {
            lang: lang.into(),
            strings,
            fallback,
        }
    }

    pub fn load(lang: &str) -> Self {
        let fallback = embedded_english();
        let strings = if lang == FALLBACK_LANG {
            HashMap::new()
        } else {
            match load_lang_file(lang) {
                Some(map) => map,
                None => {
                    log::warn!("no strings for language '{lang}', falling back to {FALLBACK_LANG}");
                    HashMap::new()
                }
            }
        };
        Self::from_maps(lang, strings, fallback)
    }

    pub fn get(&self, key: &str) -> String {
        self.strings
            .get(key)
            .or_else(|| self.fallback.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Substitute `{name}` placeholders; unknown placeholders are left alone.
    pub fn get_with(&self, key: &str, args: &[(&str, String)]) -> String {
        args.iter().fold(self.get(key), |s, (k, v)| {
            s.replace(&format!("{{{}}}", k), v)
        })
    }
}

fn parse_map(text: &str) -> Option<HashMap<String, String>> {
    serde_json::from_str(text).ok()
}

fn embedded_english() -> HashMap<String, String> {
    parse_map(EMBEDDED_EN).unwrap_or_default()
}

fn load_lang_file(lang: &str) -> Option<HashMap<String, String>> {
    let rel = Path::new("assets")
        .join("i18n")
        .join(format!("{}.json", lang));
    let path = find_asset(&rel)?;
    let text = std::fs::read_to_string(&path).ok()?;
    let map = parse_map(&text);
    if map.is_none() {
        log::warn!("ignoring malformed language file {}", path.display());
    }
    map
}

static CATALOG: OnceCell<RwLock<Catalog>> = OnceCell::new();

/// Install the catalog for `lang`. Later calls replace the active language.
pub fn init(lang: &str) {
    let catalog = Catalog::load(lang);
    let lock = CATALOG.get_or_init(|| RwLock::new(Catalog::default()));
    match lock.write() {
        Ok(mut w) => *w = catalog,
        Err(_) => log::warn!("string catalog lock poisoned, keeping previous language"),
    }
}

/// Code of the active language, empty before `init`.
pub fn current_lang() -> String {
    CATALOG
        .get()
        .and_then(|l| l.read().ok())
        .map(|c| c.lang.clone())
        .unwrap_or_default()
}

pub fn tr(key: &str) -> String {
    match CATALOG.get().and_then(|l| l.read().ok()) {
        Some(c) => c.get(key),
        None => key.to_string(),
    }
}

pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    match CATALOG.get().and_then(|l| l.read().ok()) {
        Some(c) => c.get_with(key, args),
        None => key.to_string(),
    }
}
