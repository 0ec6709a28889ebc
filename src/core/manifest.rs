// Museum - core/manifest.rs
//
// Exhibit manifests: TOML files that attach exhibit metadata to functions
// registered by symbol name.
//
// A manifest directory is walked with `walkdir`; every `*.exhibits.toml`
// below it is one container whose name is derived from its relative path
// (`ui/buttons.exhibits.toml` -> `ui::buttons`). Files are only read when
// discovery loads the container, so excluded manifests are never opened.
//
// Non-fatal problems inside a manifest (unknown symbol, malformed entry) are
// logged and the entry is dropped; the rest of the manifest still loads.

use crate::core::model::{Container, Metadata, UnitFn, UnitResult};
use crate::core::source::{ExhibitSource, Member};
use crate::util::constants;
use crate::util::error::{ManifestError, SourceError};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

// =============================================================================
// Symbol table
// =============================================================================

/// Functions that manifests may reference by name.
pub struct SymbolTable<C: Container> {
    symbols: HashMap<String, Arc<UnitFn<C>>>,
}

impl<C: Container> SymbolTable<C> {
    pub fn new() -> Self {
        Self {
            symbols: HashMap::new(),
        }
    }

    /// Register `func` under `name`. A later registration replaces an earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&mut C) -> UnitResult<C> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.symbols.insert(name.clone(), Arc::new(func)).is_some() {
            tracing::debug!(symbol = %name, "Symbol re-registered");
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<UnitFn<C>>> {
        self.symbols.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<C: Container> Default for SymbolTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Container> fmt::Debug for SymbolTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.symbols.keys().collect();
        names.sort();
        f.debug_struct("SymbolTable").field("symbols", &names).finish()
    }
}

// =============================================================================
// TOML shape
// =============================================================================

/// Raw manifest file as deserialised from TOML.
///
/// Exhibits stay as raw values so one malformed entry does not reject the file.
#[derive(Debug, Default, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    source: SourceSection,

    #[serde(default)]
    exhibit: Vec<toml::Value>,
}

/// `[source]` section.
#[derive(Debug, Default, Deserialize)]
struct SourceSection {
    /// Names of other manifest containers under the same root.
    #[serde(default)]
    nested: Vec<String>,
}

/// One `[[exhibit]]` entry.
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    symbol: String,
    title: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    description: String,
}

impl ManifestEntry {
    fn into_parts(self) -> (String, Metadata) {
        let metadata = Metadata {
            title: self.title,
            path: self.path,
            tags: self.tags,
            description: self.description,
        };
        (self.symbol, metadata)
    }
}

// =============================================================================
// Manifest source
// =============================================================================

/// A container backed by one manifest file.
pub struct ManifestSource<C: Container> {
    name: String,
    root: PathBuf,
    members: Vec<Member<C>>,
    nested: Vec<String>,
    symbols: Arc<SymbolTable<C>>,
}

impl<C: Container> ManifestSource<C> {
    /// Read and parse the manifest for container `name` under `root`.
    pub fn load(
        root: &Path,
        name: &str,
        symbols: Arc<SymbolTable<C>>,
    ) -> Result<Self, ManifestError> {
        let path = manifest_path(root, name);
        let content = read_manifest(&path)?;
        let file: ManifestFile =
            toml::from_str(&content).map_err(|e| ManifestError::TomlParse {
                path: path.clone(),
                source: e,
            })?;

        let mut members = Vec::with_capacity(file.exhibit.len());
        for (index, raw) in file.exhibit.into_iter().enumerate() {
            match resolve_entry(&path, index, raw, &symbols) {
                Ok(member) => members.push(member),
                Err(e) => tracing::warn!(container = name, error = %e, "Manifest entry skipped"),
            }
        }

        tracing::debug!(
            container = name,
            manifest = %path.display(),
            members = members.len(),
            nested = file.source.nested.len(),
            "Manifest loaded"
        );

        Ok(Self {
            name: name.to_string(),
            root: root.to_path_buf(),
            members,
            nested: file.source.nested,
            symbols,
        })
    }
}

impl<C: Container> ExhibitSource<C> for ManifestSource<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn members(&self) -> Result<Vec<Member<C>>, SourceError> {
        Ok(self.members.clone())
    }

    fn nested(&self) -> Result<Vec<Arc<dyn ExhibitSource<C>>>, SourceError> {
        Ok(self
            .nested
            .iter()
            .map(|name| {
                Arc::new(DeferredManifest {
                    name: name.clone(),
                    root: self.root.clone(),
                    symbols: Arc::clone(&self.symbols),
                    loaded: OnceLock::new(),
                }) as Arc<dyn ExhibitSource<C>>
            })
            .collect())
    }
}

/// A nested manifest known only by name until first use.
///
/// The file is read when discovery first asks for its members, so a
/// container already visited through another path is never parsed again,
/// and a missing file fails only its own container.
struct DeferredManifest<C: Container> {
    name: String,
    root: PathBuf,
    symbols: Arc<SymbolTable<C>>,
    loaded: OnceLock<ManifestSource<C>>,
}

impl<C: Container> DeferredManifest<C> {
    fn source(&self) -> Result<&ManifestSource<C>, ManifestError> {
        if let Some(source) = self.loaded.get() {
            return Ok(source);
        }
        let source = ManifestSource::load(&self.root, &self.name, Arc::clone(&self.symbols))?;
        Ok(self.loaded.get_or_init(|| source))
    }
}

impl<C: Container> ExhibitSource<C> for DeferredManifest<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn members(&self) -> Result<Vec<Member<C>>, SourceError> {
        self.source()?.members()
    }

    fn nested(&self) -> Result<Vec<Arc<dyn ExhibitSource<C>>>, SourceError> {
        // A load failure was already reported by `members`.
        match self.source() {
            Ok(source) => source.nested(),
            Err(_) => Ok(Vec::new()),
        }
    }
}

/// Turn one raw `[[exhibit]]` value into a member, resolving its symbol.
fn resolve_entry<C: Container>(
    path: &Path,
    index: usize,
    raw: toml::Value,
    symbols: &SymbolTable<C>,
) -> Result<Member<C>, ManifestError> {
    let entry = raw.try_into::<ManifestEntry>().map_err(|e| ManifestError::InvalidEntry {
        path: path.to_path_buf(),
        index,
        source: e,
    })?;
    let (symbol, metadata) = entry.into_parts();
    let func = symbols
        .get(&symbol)
        .ok_or_else(|| ManifestError::UnknownSymbol {
            path: path.to_path_buf(),
            symbol: symbol.clone(),
        })?;
    Ok(Member::from_shared(symbol, Some(metadata), func))
}

/// Read a manifest, refusing files above the size limit.
fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    let metadata = std::fs::metadata(path).map_err(|e| ManifestError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    if metadata.len() > constants::MAX_MANIFEST_FILE_SIZE {
        return Err(ManifestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_MANIFEST_FILE_SIZE,
        });
    }
    std::fs::read_to_string(path).map_err(|e| ManifestError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

// =============================================================================
// Naming and directory scan
// =============================================================================

/// Container name for a manifest file below `root`, or `None` if the file is
/// not a manifest (wrong suffix, outside root, non-UTF-8 components).
pub fn container_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<&str>>>()?;
    let file_name = parts.pop()?;
    let stem = file_name.strip_suffix(constants::MANIFEST_SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    parts.push(stem);
    Some(parts.join(constants::NAMESPACE_SEPARATOR))
}

/// Inverse of [`container_name`].
pub fn manifest_path(root: &Path, name: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    let mut parts: Vec<&str> = name.split(constants::NAMESPACE_SEPARATOR).collect();
    let last = parts.pop().unwrap_or_default();
    for part in parts {
        path.push(part);
    }
    path.push(format!("{last}{}", constants::MANIFEST_SUFFIX));
    path
}

/// List the manifest containers below `root`, sorted by name.
///
/// Returns `Err` only when `root` itself cannot be read; entries that cannot
/// be accessed further down are logged and skipped.
pub fn scan_manifest_dir(root: &Path) -> Result<Vec<String>, ManifestError> {
    let meta = std::fs::metadata(root).map_err(|e| ManifestError::Io {
        path: root.to_path_buf(),
        source: e,
    })?;
    if !meta.is_dir() {
        return Err(ManifestError::Io {
            path: root.to_path_buf(),
            source: std::io::Error::other("manifest root is not a directory"),
        });
    }

    let mut names = Vec::new();
    let walker = walkdir::WalkDir::new(root)
        .max_depth(constants::MAX_MANIFEST_DEPTH)
        .follow_links(false)
        .sort_by_file_name();

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                let e = ManifestError::Walk {
                    path: root.to_path_buf(),
                    source: e,
                };
                tracing::debug!(error = %e, "Manifest walk warning");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(name) = container_name(root, entry.path()) {
            tracing::trace!(container = %name, "Manifest found");
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::testing::Sketch;
    use std::fs;

    fn symbols() -> Arc<SymbolTable<Sketch>> {
        let mut table = SymbolTable::new();
        table.register("dark_titlebar", |_: &mut Sketch| -> UnitResult<Sketch> {
            Ok(None)
        });
        table.register("light_titlebar", |_: &mut Sketch| -> UnitResult<Sketch> {
            Ok(None)
        });
        Arc::new(table)
    }

    #[test]
    fn test_container_name_round_trips_path() {
        let root = Path::new("/m");
        let path = Path::new("/m/ui/buttons.exhibits.toml");
        assert_eq!(container_name(root, path).as_deref(), Some("ui::buttons"));
        assert_eq!(manifest_path(root, "ui::buttons"), path);
        assert_eq!(container_name(root, Path::new("/m/readme.toml")), None);
        assert_eq!(container_name(root, Path::new("/m/.exhibits.toml")), None);
    }

    #[test]
    fn test_scan_finds_manifests_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("ui")).unwrap();
        fs::write(dir.path().join("ui/titlebars.exhibits.toml"), "").unwrap();
        fs::write(dir.path().join("top.exhibits.toml"), "").unwrap();
        fs::write(dir.path().join("notes.toml"), "").unwrap();

        let names = scan_manifest_dir(dir.path()).unwrap();
        assert_eq!(names, vec!["top".to_string(), "ui::titlebars".to_string()]);
    }

    #[test]
    fn test_scan_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = scan_manifest_dir(&dir.path().join("absent"));
        assert!(matches!(result, Err(ManifestError::Io { .. })));
    }

    #[test]
    fn test_load_skips_bad_entries_but_keeps_good_ones() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("titlebars.exhibits.toml"),
            r#"
[[exhibit]]
symbol = "dark_titlebar"
title = "Dark Titlebar"
path = "Titlebars"
tags = ["Titlebar", "Dark"]

[[exhibit]]
symbol = "missing_symbol"
title = "Ghost"

[[exhibit]]
symbol = "light_titlebar"
# no title: malformed entry

[[exhibit]]
symbol = "light_titlebar"
title = "Light Titlebar"
path = "Titlebars"
"#,
        )
        .unwrap();

        let source = ManifestSource::load(dir.path(), "titlebars", symbols()).unwrap();
        let members = source.members().unwrap();
        let titles: Vec<_> = members
            .iter()
            .map(|m| m.attribute().unwrap().title.clone())
            .collect();
        assert_eq!(titles, vec!["Dark Titlebar", "Light Titlebar"]);
        assert_eq!(
            members[0].attribute().unwrap().tags,
            vec!["Titlebar".to_string(), "Dark".to_string()]
        );
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.exhibits.toml"), "[[exhibit]\n").unwrap();
        let result = ManifestSource::load(dir.path(), "broken", symbols());
        assert!(matches!(result, Err(ManifestError::TomlParse { .. })));
    }

    #[test]
    fn test_nested_manifests_resolve_under_same_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("design")).unwrap();
        fs::write(
            dir.path().join("design.exhibits.toml"),
            "[source]\nnested = [\"design::widgets\"]\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("design/widgets.exhibits.toml"),
            "[[exhibit]]\nsymbol = \"dark_titlebar\"\ntitle = \"Demo View\"\npath = \"Misc\"\n",
        )
        .unwrap();

        let source = ManifestSource::load(dir.path(), "design", symbols()).unwrap();
        let nested = source.nested().unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].name(), "design::widgets");
        assert_eq!(nested[0].members().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_nested_manifest_fails_only_itself() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("design")).unwrap();
        fs::write(
            dir.path().join("design.exhibits.toml"),
            "[source]\nnested = [\"design::gone\", \"design::widgets\"]\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("design/widgets.exhibits.toml"),
            "[[exhibit]]\nsymbol = \"dark_titlebar\"\ntitle = \"Demo View\"\n",
        )
        .unwrap();

        let source = ManifestSource::load(dir.path(), "design", symbols()).unwrap();
        let nested = source.nested().expect("listing children reads no files");
        let names: Vec<_> = nested.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["design::gone", "design::widgets"]);

        assert!(matches!(
            nested[0].members(),
            Err(SourceError::Manifest(ManifestError::Io { .. }))
        ));
        assert!(nested[0].nested().unwrap().is_empty());
        assert_eq!(nested[1].members().unwrap().len(), 1);
    }
}
