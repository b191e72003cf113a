use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{Mutex, Once},
};

use serde_json::{Map, Value};

use crate::{append_desktop_log, DEFAULT_SHELL_LOCALE, LOCALES_DIR_ENV};

/// Shell-specific strings consulted before any caller-supplied fallback when a
/// key is missing from the loaded locale document.
fn builtin_shell_text(key: &str) -> Option<&'static str> {
    match key {
        "app.starting" => Some("Starting n8n..."),
        "app.startingDescription" => Some("Please wait, the server is starting"),
        "app.error" => Some("Failed to start n8n server"),
        "app.errorDescription" => Some("Please check the console logs for details"),
        "app.errorAfterAttempts" => Some("Failed to start n8n server after {attempts} attempts"),
        _ => None,
    }
}

/// Process-wide translation table. Either empty (load failed) or a fully
/// parsed nested string mapping; a JSON parse failure discards the whole
/// document.
#[derive(Debug)]
pub(crate) struct Translations {
    table: Mutex<Map<String, Value>>,
    locale: Mutex<&'static str>,
    lazy_init: Once,
}

impl Default for Translations {
    fn default() -> Self {
        Self {
            table: Mutex::new(Map::new()),
            locale: Mutex::new(DEFAULT_SHELL_LOCALE),
            lazy_init: Once::new(),
        }
    }
}

impl Translations {
    /// Loads the locale document and replaces the table wholesale. Never
    /// fails; on any load or parse error the table ends up empty and a
    /// warning is logged.
    pub(crate) fn initialize(&self, locale: &str, locales_dir: Option<&Path>) {
        let effective = effective_locale(locale);
        let loaded = load_locale_document(effective, locales_dir).unwrap_or_else(|| {
            append_desktop_log(&format!(
                "failed to load translations for locale '{locale}', using built-in fallback"
            ));
            Map::new()
        });

        match self.table.lock() {
            Ok(mut guard) => *guard = loaded,
            Err(poisoned) => *poisoned.into_inner() = loaded,
        }
        match self.locale.lock() {
            Ok(mut guard) => *guard = effective,
            Err(poisoned) => *poisoned.into_inner() = effective,
        }
    }

    /// Resolves a dotted key against the table, consulting the built-in shell
    /// catalog and then `fallback` for missing keys, and interpolates every
    /// `{name}` placeholder present in `params`.
    pub(crate) fn translate(
        &self,
        key: &str,
        fallback: Option<&str>,
        params: &[(&str, String)],
    ) -> String {
        self.lazy_init.call_once(|| {
            if self.is_empty() {
                self.initialize(DEFAULT_SHELL_LOCALE, None);
            }
        });

        let resolved = {
            let guard = match self.table.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            lookup_leaf(&guard, key).map(str::to_string)
        };

        let mut result = resolved
            .or_else(|| builtin_shell_text(key).map(str::to_string))
            .or_else(|| fallback.map(str::to_string))
            .unwrap_or_else(|| key.to_string());

        for (name, value) in params {
            result = result.replace(&format!("{{{name}}}"), value);
        }
        result
    }

    pub(crate) fn current_locale(&self) -> &'static str {
        match self.locale.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn is_empty(&self) -> bool {
        match self.table.lock() {
            Ok(guard) => guard.is_empty(),
            Err(poisoned) => poisoned.into_inner().is_empty(),
        }
    }
}

/// Only one locale document ships with the shell; every requested locale
/// resolves to it.
fn effective_locale(_locale: &str) -> &'static str {
    DEFAULT_SHELL_LOCALE
}

/// Walks the nested mapping level by level. Returns `None` when a segment is
/// missing, an intermediate value is not an object, or the leaf is not a
/// string.
fn lookup_leaf<'a>(table: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    let mut current = table;
    let mut segments = key.split('.').peekable();

    while let Some(segment) = segments.next() {
        let value = current.get(segment)?;
        if segments.peek().is_none() {
            return value.as_str();
        }
        current = value.as_object()?;
    }
    None
}

fn locale_file_candidates(locale: &str, locales_dir: Option<&Path>) -> Vec<PathBuf> {
    let file_name = format!("{locale}.json");
    let mut candidates = Vec::new();

    if let Ok(dir) = env::var(LOCALES_DIR_ENV) {
        let dir = dir.trim();
        if !dir.is_empty() {
            candidates.push(PathBuf::from(dir).join(&file_name));
        }
    }
    if let Some(dir) = locales_dir {
        candidates.push(dir.join(&file_name));
    }
    // Source-tree fallback for development runs.
    candidates.push(
        PathBuf::from("packages")
            .join("frontend")
            .join("@n8n")
            .join("i18n")
            .join("src")
            .join("locales")
            .join(&file_name),
    );
    candidates
}

fn load_locale_document(locale: &str, locales_dir: Option<&Path>) -> Option<Map<String, Value>> {
    for candidate in locale_file_candidates(locale, locales_dir) {
        let Ok(raw) = fs::read_to_string(&candidate) else {
            continue;
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => return Some(map),
            Ok(_) => {
                append_desktop_log(&format!(
                    "locale document {} has a non-object root, ignoring it",
                    candidate.display()
                ));
            }
            Err(error) => {
                append_desktop_log(&format!(
                    "failed to parse locale document {}: {error}",
                    candidate.display()
                ));
            }
        }
    }
    None
}
