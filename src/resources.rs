//! Resource resolver: localizable strings of a schema, per locale
//!
//! Resource folders hold one file per locale. Only the
//! `Name="LocalizableStrings.<key>.Value" Value="<value>"` entries matter, so
//! files are scanned as text rather than parsed as XML. Results are cached per
//! source file and keyed by the descriptor timestamp; a new timestamp means a
//! rescan.

use once_cell::sync::Lazy;
use quick_xml::escape::unescape;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::data::UNKNOWN_PLACEHOLDER;
use crate::descriptor;
use crate::error::{LensError, Result};
use crate::extractors::schema::CaptionLookup;
use crate::utils::paths::{self, locale_of};

/// Locale reported for the placeholder entry of an unknown key
pub const UNKNOWN_LOCALE: &str = "unknown";

static LOCALIZABLE_STRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"Name="LocalizableStrings\.(?P<key>\w+)\.Value" Value="(?P<value>.*)""#)
        .expect("valid localizable string pattern")
});

/// `<x>.Strings.<key>`, `<x>.localizableStrings.<key>` or `captionName: "<key>"`
static RESOURCE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"((\w+)?\.(Strings|localizableStrings)\.|"?captionName"?:\s+)"?(?P<key>\w+)"?"#)
        .expect("valid resource reference pattern")
});

/// One localized value of a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceValue {
    pub locale: String,
    pub value: String,
}

/// key -> value
pub type LocaleStrings = BTreeMap<String, String>;

/// Every localizable string of one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSet {
    pub source: PathBuf,
    pub schema_name: String,
    /// Descriptor timestamp the set was read at
    pub time: String,
    /// locale -> key -> value
    pub locales: BTreeMap<String, LocaleStrings>,
}

impl ResourceSet {
    /// Values of `key`, one per locale that defines it
    pub fn values(&self, key: &str) -> Vec<ResourceValue> {
        self.locales
            .iter()
            .filter_map(|(locale, strings)| {
                strings.get(key).map(|value| ResourceValue {
                    locale: locale.clone(),
                    value: value.clone(),
                })
            })
            .collect()
    }

    /// Like `values`, but an unknown key yields a single placeholder entry
    pub fn format_values(&self, key: &str) -> Vec<ResourceValue> {
        let values = self.values(key);
        if values.is_empty() {
            return vec![ResourceValue {
                locale: UNKNOWN_LOCALE.to_string(),
                value: UNKNOWN_PLACEHOLDER.to_string(),
            }];
        }
        values
    }

    /// All keys across locales, sorted and deduplicated
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .locales
            .values()
            .flat_map(|strings| strings.keys().map(String::as_str))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Hover text: `<locale>: <value>` lines
    pub fn hover_text(&self, key: &str) -> String {
        format_hover(&self.format_values(key))
    }
}

impl CaptionLookup for ResourceSet {
    fn caption(&self, key: &str) -> Option<String> {
        Some(self.hover_text(key))
    }
}

/// Markdown hover body for resolved values (hard line breaks between locales)
pub fn format_hover(values: &[ResourceValue]) -> String {
    values
        .iter()
        .map(|v| format!("{}: {}", v.locale, v.value))
        .collect::<Vec<_>>()
        .join("  \n")
}

/// Resource key referenced on `line`
///
/// With an `offset`, the match nearest before it wins; otherwise the first match.
pub fn resource_key_from_line(line: &str, offset: Option<usize>) -> Option<String> {
    let mut matches = RESOURCE_REFERENCE.captures_iter(line);
    let captures = match offset {
        None => matches.next(),
        Some(offset) => matches
            .take_while(|c| c.get(0).is_some_and(|m| m.start() < offset))
            .last(),
    }?;
    captures.name("key").map(|m| m.as_str().to_string())
}

/// Entries of one locale file; the first value of a key wins and empty values are skipped
pub fn parse_locale_file(content: &str) -> LocaleStrings {
    let mut strings = LocaleStrings::new();
    for captures in LOCALIZABLE_STRING.captures_iter(content) {
        let (Some(key), Some(raw)) = (captures.name("key"), captures.name("value")) else {
            continue;
        };
        if strings.contains_key(key.as_str()) {
            continue;
        }
        let value = match unescape(raw.as_str()) {
            Ok(decoded) => decoded.into_owned(),
            Err(e) => {
                debug!("Keeping undecodable value of {}: {}", key.as_str(), e);
                raw.as_str().to_string()
            }
        };
        if value.is_empty() {
            continue;
        }
        strings.insert(key.as_str().to_string(), value);
    }
    strings
}

/// Read every locale file of a resource folder in parallel
pub fn scan_resource_dir(dir: &Path) -> Result<BTreeMap<String, LocaleStrings>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| LensError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let locales = files
        .par_iter()
        .filter_map(|file| {
            let locale = locale_of(file)?;
            match fs::read(file) {
                Ok(bytes) => {
                    let content = String::from_utf8_lossy(&bytes);
                    Some((locale, parse_locale_file(&content)))
                }
                Err(e) => {
                    warn!("Skipping unreadable resource file {}: {}", file.display(), e);
                    None
                }
            }
        })
        .collect::<Vec<_>>();

    Ok(locales.into_iter().collect())
}

/// Resolves and caches localizable strings per source file
#[derive(Debug, Default)]
pub struct ResourceResolver {
    cache: Mutex<HashMap<PathBuf, Arc<ResourceSet>>>,
}

impl ResourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every localizable string of `source`
    ///
    /// `Ok(None)` when there is no descriptor, the file kind has no resources,
    /// or the resource folder does not exist.
    pub fn load(&self, source: &Path) -> Result<Option<Arc<ResourceSet>>> {
        let Some(descriptor_file) = paths::descriptor_path(source) else {
            return Ok(None);
        };
        let Some(time) = descriptor::read_timestamp(&descriptor_file)? else {
            return Ok(None);
        };

        if let Some(cached) = self.cached(source) {
            if cached.time == time {
                debug!("Resource cache hit: {}", source.display());
                return Ok(Some(cached));
            }
        }

        let Some(dir) = paths::resource_dir(source) else {
            return Ok(None);
        };
        if !dir.is_dir() {
            debug!("No resource folder for {}", source.display());
            return Ok(None);
        }

        debug!("Scanning resources: {}", dir.display());
        let set = Arc::new(ResourceSet {
            source: source.to_path_buf(),
            schema_name: paths::schema_name(source).unwrap_or_default(),
            time,
            locales: scan_resource_dir(&dir)?,
        });
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(source.to_path_buf(), Arc::clone(&set));
        Ok(Some(set))
    }

    /// Values of `key` for `source`, with the placeholder entry for unknown keys
    pub fn resolve(&self, source: &Path, key: &str) -> Result<Option<Vec<ResourceValue>>> {
        Ok(self.load(source)?.map(|set| set.format_values(key)))
    }

    /// Like `resolve`, inferring the key from a source line
    pub fn resolve_line(
        &self,
        source: &Path,
        line: &str,
        offset: Option<usize>,
    ) -> Result<Option<Vec<ResourceValue>>> {
        let key = resource_key_from_line(line, offset).unwrap_or_default();
        self.resolve(source, &key)
    }

    fn cached(&self, source: &Path) -> Option<Arc<ResourceSet>> {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(source)
            .cloned()
    }

    pub fn clear(&self) {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

/// Insertable references to a resource key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSnippets {
    /// `Resources.Strings.<key>` (bindings in `diff`)
    pub binding: String,
    /// `resources.localizableStrings.<key>` (module code)
    pub module: String,
    /// `UserConnection.GetLocalizableString("<schema>", "<key>")` (server code)
    pub server: String,
}

impl ResourceSnippets {
    pub fn new(schema_name: &str, key: &str) -> Self {
        ResourceSnippets {
            binding: format!("Resources.Strings.{}", key),
            module: format!("resources.localizableStrings.{}", key),
            server: format!(
                "UserConnection.GetLocalizableString(\"{}\", \"{}\")",
                schema_name, key
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// `<root>/Custom/Schemas/SomePage1/{SomePage1.js,descriptor.json}` and
    /// `<root>/Custom/Resources/SomePage1.ClientUnit/`
    struct Package {
        _root: TempDir,
        source: PathBuf,
        resources: PathBuf,
    }

    impl Package {
        fn new() -> Self {
            let root = TempDir::new().unwrap();
            let schema_dir = root.path().join("Custom").join("Schemas").join("SomePage1");
            let resources = root
                .path()
                .join("Custom")
                .join("Resources")
                .join("SomePage1.ClientUnit");
            fs::create_dir_all(&schema_dir).unwrap();
            fs::create_dir_all(&resources).unwrap();

            let source = schema_dir.join("SomePage1.js");
            fs::write(&source, "define(\"SomePage1\", [], function() { return {}; });").unwrap();
            let package = Package {
                _root: root,
                source,
                resources,
            };
            package.set_time(1);
            package
        }

        fn set_time(&self, millis: u64) {
            fs::write(
                self.source.parent().unwrap().join("descriptor.json"),
                format!(r#"{{"Descriptor": {{"ModifiedOnUtc": "\/Date({})\/"}}}}"#, millis),
            )
            .unwrap();
        }

        fn write_locale(&self, locale: &str, entries: &[(&str, &str)]) {
            let body: String = entries
                .iter()
                .map(|(key, value)| {
                    format!(
                        "  <Item Name=\"LocalizableStrings.{}.Value\" Value=\"{}\" />\n",
                        key, value
                    )
                })
                .collect();
            fs::write(
                self.resources.join(format!("{}.xml", locale)),
                format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Resources>\n{}</Resources>\n", body),
            )
            .unwrap();
        }
    }

    #[test]
    fn test_entity_decoded_value() {
        let package = Package::new();
        package.write_locale("en-US", &[("Foo", "Bar &amp; Baz")]);

        let values = ResourceResolver::new().resolve(&package.source, "Foo").unwrap().unwrap();
        assert_eq!(
            values,
            vec![ResourceValue {
                locale: "en-US".into(),
                value: "Bar & Baz".into()
            }]
        );
    }

    #[test]
    fn test_locales_without_key_are_omitted() {
        let package = Package::new();
        package.write_locale("en-US", &[("Foo", "Foo"), ("Bar", "Bar")]);
        package.write_locale("ru-RU", &[("Foo", "Фу")]);

        let resolver = ResourceResolver::new();
        let foo = resolver.resolve(&package.source, "Foo").unwrap().unwrap();
        assert_eq!(foo.len(), 2);
        assert_eq!(foo[1].value, "Фу");

        let bar = resolver.resolve(&package.source, "Bar").unwrap().unwrap();
        assert_eq!(bar.len(), 1);
        assert_eq!(bar[0].locale, "en-US");
    }

    #[test]
    fn test_unknown_key_yields_placeholder() {
        let package = Package::new();
        package.write_locale("en-US", &[("Foo", "Foo")]);

        let values = ResourceResolver::new()
            .resolve(&package.source, "Missing")
            .unwrap()
            .unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].locale, UNKNOWN_LOCALE);
        assert_eq!(values[0].value, UNKNOWN_PLACEHOLDER);
    }

    #[test]
    fn test_first_value_wins_and_empty_skipped() {
        let strings = parse_locale_file(
            r#"<Item Name="LocalizableStrings.A.Value" Value="" />
<Item Name="LocalizableStrings.A.Value" Value="first" />
<Item Name="LocalizableStrings.A.Value" Value="second" />
<Item Name="LocalizableStrings.B.Caption" Value="ignored" />"#,
        );
        assert_eq!(strings.len(), 1);
        assert_eq!(strings["A"], "first");
    }

    #[test]
    fn test_no_descriptor_no_resources() {
        let package = Package::new();
        package.write_locale("en-US", &[("Foo", "Foo")]);
        fs::remove_file(package.source.parent().unwrap().join("descriptor.json")).unwrap();

        assert!(ResourceResolver::new().resolve(&package.source, "Foo").unwrap().is_none());
    }

    #[test]
    fn test_missing_resource_dir() {
        let package = Package::new();
        fs::remove_dir_all(&package.resources).unwrap();
        assert!(ResourceResolver::new().load(&package.source).unwrap().is_none());
    }

    #[test]
    fn test_timestamp_change_rescans() {
        let package = Package::new();
        package.write_locale("en-US", &[("Foo", "old")]);
        let resolver = ResourceResolver::new();
        assert_eq!(resolver.resolve(&package.source, "Foo").unwrap().unwrap()[0].value, "old");

        // same timestamp: served from cache
        package.write_locale("en-US", &[("Foo", "new")]);
        assert_eq!(resolver.resolve(&package.source, "Foo").unwrap().unwrap()[0].value, "old");

        package.set_time(2);
        assert_eq!(resolver.resolve(&package.source, "Foo").unwrap().unwrap()[0].value, "new");
    }

    #[test]
    fn test_key_from_line() {
        assert_eq!(
            resource_key_from_line("this.get(\"Resources.Strings.SomeResource2\");", None).as_deref(),
            Some("SomeResource2")
        );
        assert_eq!(
            resource_key_from_line("resources.localizableStrings.SomeResource1;", None).as_deref(),
            Some("SomeResource1")
        );
        assert_eq!(
            resource_key_from_line("\"captionName\": \"FileDetailCaption\",", None).as_deref(),
            Some("FileDetailCaption")
        );
        assert!(resource_key_from_line("var x = 1;", None).is_none());
    }

    #[test]
    fn test_key_nearest_before_offset() {
        let line = "a(resources.localizableStrings.First, resources.localizableStrings.Second);";
        let second = line.find("resources.localizableStrings.Second").unwrap();
        assert_eq!(resource_key_from_line(line, Some(second + 5)).as_deref(), Some("Second"));
        assert_eq!(resource_key_from_line(line, Some(second - 1)).as_deref(), Some("First"));
        assert!(resource_key_from_line(line, Some(0)).is_none());
    }

    #[test]
    fn test_resolve_from_line() {
        let package = Package::new();
        package.write_locale("en-US", &[("SomeResource1", "One")]);

        let values = ResourceResolver::new()
            .resolve_line(&package.source, "resources.localizableStrings.SomeResource1;", None)
            .unwrap()
            .unwrap();
        assert_eq!(values[0].value, "One");
    }

    #[test]
    fn test_hover_and_keys() {
        let package = Package::new();
        package.write_locale("en-US", &[("Foo", "Foo"), ("Bar", "Bar")]);
        package.write_locale("ru-RU", &[("Foo", "Фу")]);

        let set = ResourceResolver::new().load(&package.source).unwrap().unwrap();
        assert_eq!(set.hover_text("Foo"), "en-US: Foo  \nru-RU: Фу");
        assert_eq!(set.keys(), vec!["Bar", "Foo"]);
        assert_eq!(set.schema_name, "SomePage1");
    }

    #[test]
    fn test_snippets() {
        let snippets = ResourceSnippets::new("SomePage1", "Caption");
        assert_eq!(snippets.binding, "Resources.Strings.Caption");
        assert_eq!(snippets.module, "resources.localizableStrings.Caption");
        assert_eq!(
            snippets.server,
            "UserConnection.GetLocalizableString(\"SomePage1\", \"Caption\")"
        );
    }
}
