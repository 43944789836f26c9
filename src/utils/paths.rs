// Package layout paths
//
// A schema lives at `<Package>/Schemas/<Name>/<Name>.js` next to its
// `descriptor.json`; localizable strings live at
// `<Package>/Resources/<Name>.<Tag>/<locale>.xml`.

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use crate::language::SourceKind;

pub const DESCRIPTOR_FILE: &str = "descriptor.json";

/// Directory holding every package's resource folders, relative to a schema directory
const RESOURCES_FROM_SCHEMA_DIR: [&str; 3] = ["..", "..", "Resources"];

/// The `descriptor.json` next to `source`, if it exists
pub fn descriptor_path(source: &Path) -> Option<PathBuf> {
    let path = source.parent()?.join(DESCRIPTOR_FILE);
    path.is_file().then_some(path)
}

/// Schema name of a source file (`SomePage1` for `.../SomePage1.js`)
pub fn schema_name(source: &Path) -> Option<String> {
    source
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// Where the resource folder of `source` should be; `None` for unknown source kinds
///
/// The folder may not exist.
pub fn resource_dir(source: &Path) -> Option<PathBuf> {
    let tag = SourceKind::from_path(source).resource_tag()?;
    let name = schema_name(source)?;
    let mut dir = source.parent()?.to_path_buf();
    for segment in RESOURCES_FROM_SCHEMA_DIR {
        dir.push(segment);
    }
    dir.push(format!("{}.{}", name, tag));
    Some(normalize(&dir))
}

/// Resolve `.` and `..` components without touching the file system
///
/// `..` at the root (or at the start of a relative path) is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    result.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    result.pop();
                } else if !matches!(
                    result.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    result.push("..");
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Locale of a resource file (`en-US` for `.../en-US.xml`)
pub fn locale_of(resource_file: &Path) -> Option<String> {
    resource_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// `path` as a `/`-separated string, used for stable tree item ids
pub fn to_unix_style(path: &Path) -> Result<String> {
    let path_str = path.to_str().context("Path contains invalid UTF-8")?;
    Ok(if MAIN_SEPARATOR == '\\' {
        path_str.replace('\\', "/")
    } else {
        path_str.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resource_dir_for_client_unit() {
        let source = Path::new("/pkg/Custom/Schemas/SomePage1/SomePage1.js");
        assert_eq!(
            resource_dir(source).unwrap(),
            PathBuf::from("/pkg/Custom/Resources/SomePage1.ClientUnit")
        );
    }

    #[test]
    fn test_resource_dir_for_source_code() {
        let source = Path::new("/pkg/Custom/Schemas/Helper/Helper.cs");
        assert_eq!(
            resource_dir(source).unwrap(),
            PathBuf::from("/pkg/Custom/Resources/Helper.SourceCode")
        );
    }

    #[test]
    fn test_unknown_kind_has_no_resource_dir() {
        assert!(resource_dir(Path::new("/pkg/Custom/Schemas/Data/Data.json")).is_none());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("../a/../../b")), PathBuf::from("../../b"));
    }

    #[test]
    fn test_descriptor_path_requires_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("SomePage1.js");
        assert!(descriptor_path(&source).is_none());

        fs::write(dir.path().join(DESCRIPTOR_FILE), "{}").unwrap();
        assert_eq!(descriptor_path(&source).unwrap(), dir.path().join(DESCRIPTOR_FILE));
    }

    #[test]
    fn test_locale_of() {
        assert_eq!(locale_of(Path::new("/r/en-US.xml")).as_deref(), Some("en-US"));
        assert_eq!(locale_of(Path::new("/r/ru-RU")).as_deref(), Some("ru-RU"));
    }

    #[test]
    fn test_to_unix_style() {
        let path = Path::new("pkg").join("Schemas").join("A.js");
        assert_eq!(to_unix_style(&path).unwrap(), "pkg/Schemas/A.js");
    }
}
