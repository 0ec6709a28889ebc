// Museum - tests/e2e_catalog.rs
//
// End-to-end tests for the discovery -> catalog -> filter pipeline.
//
// These tests go through the public library API only: real registries,
// real manifest files on disk, the real background discovery thread. The
// exhibits draw into a headless container that records what they drew.

use museum::app::showcase::Showcase;
use museum::core::catalog::Catalog;
use museum::core::discovery::{discover, DiscoveryConfig};
use museum::core::export;
use museum::core::filter::project;
use museum::core::manifest::SymbolTable;
use museum::core::model::{Container, Metadata, UnitResult};
use museum::core::registry::Registry;
use museum::core::source::{ExhibitSource, Member, StaticSource};
use museum::util::error::{ExhibitFailure, SourceError};
use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};

// =============================================================================
// Helpers
// =============================================================================

/// Headless container: exhibits append lines to it.
#[derive(Debug, Default)]
struct Canvas {
    drawn: Vec<String>,
}

impl Container for Canvas {
    type Handle = usize;
}

fn label(canvas: &mut Canvas) -> UnitResult<Canvas> {
    canvas.drawn.push("label".to_string());
    Ok(Some(canvas.drawn.len() - 1))
}

fn broken(_: &mut Canvas) -> UnitResult<Canvas> {
    Err(Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        "asset missing",
    )))
}

fn titles(entries: &[&museum::core::model::Entry<Canvas>]) -> Vec<String> {
    entries.iter().map(|e| e.title().to_string()).collect()
}

fn pump_until_ready(showcase: &mut Showcase<Canvas>) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while showcase.is_discovering() {
        assert!(Instant::now() < deadline, "discovery did not finish in time");
        showcase.pump();
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn gallery_registry() -> Registry<Canvas> {
    let mut registry = Registry::new();
    registry.register(
        StaticSource::new("gallery::views")
            .exhibit(
                "awesome",
                Metadata::new("My Awesome View")
                    .with_path("Text")
                    .with_tags(["Text"]),
                label,
            )
            .exhibit(
                "dark",
                Metadata::new("Dark Titlebar")
                    .with_path("Titlebars")
                    .with_tags(["Titlebar", "Dark"]),
                label,
            )
            .exhibit(
                "light",
                Metadata::new("Light Titlebar")
                    .with_path("Titlebars")
                    .with_tags(["Titlebar", "Light"]),
                label,
            ),
    );
    registry.register(
        StaticSource::new("gallery::misc").exhibit(
            "demo",
            Metadata::new("Demo View").with_path("Misc"),
            label,
        ),
    );
    registry
}

// =============================================================================
// Pipeline
// =============================================================================

/// Two exhibits registered B then A with no path come out A, B.
#[test]
fn e2e_catalog_orders_by_sort_key() {
    let mut registry = Registry::new();
    registry.register(
        StaticSource::new("gallery::x")
            .exhibit("b", Metadata::new("B"), label)
            .exhibit("a", Metadata::new("A"), label),
    );

    let (discovered, warnings) = discover(&registry, &DiscoveryConfig::default());
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

    let catalog = Catalog::build(discovered);
    assert_eq!(titles(&project(&catalog, "")), vec!["A", "B"]);
    let first = catalog.get(0).expect("two entries");
    assert_eq!(first.path_components(), &[String::new()]);
    assert_eq!(first.sort_key(), "/a");
}

/// Same path, and mixed path/no-path entries, still order by sort key.
#[test]
fn e2e_catalog_orders_within_a_path() {
    let mut registry = Registry::new();
    registry.register(
        StaticSource::new("gallery::x")
            .exhibit("b", Metadata::new("B").with_path("X"), label)
            .exhibit("a", Metadata::new("A").with_path("X"), label)
            .exhibit("z", Metadata::new("Z"), label),
    );

    let (discovered, _) = discover(&registry, &DiscoveryConfig::default());
    let catalog = Catalog::build(discovered);
    assert_eq!(titles(&project(&catalog, "")), vec!["Z", "A", "B"]);
}

#[test]
fn e2e_filter_narrows_titlebars() {
    let (discovered, _) = discover(&gallery_registry(), &DiscoveryConfig::default());
    let catalog = Catalog::build(discovered);

    assert_eq!(
        titles(&project(&catalog, "")),
        vec!["Demo View", "My Awesome View", "Dark Titlebar", "Light Titlebar"]
    );
    assert_eq!(
        titles(&project(&catalog, "Titlebar")),
        vec!["Dark Titlebar", "Light Titlebar"]
    );
    assert_eq!(titles(&project(&catalog, "Titlebar Dark")), vec!["Dark Titlebar"]);
    assert!(project(&catalog, "light dark").is_empty());
}

#[test]
fn e2e_invoking_entries_draws_into_container() {
    let (discovered, _) = discover(&gallery_registry(), &DiscoveryConfig::default());
    let catalog = Catalog::build(discovered);

    let mut canvas = Canvas::default();
    for entry in project(&catalog, "view") {
        let handle = entry.unit().invoke(&mut canvas).expect("label never fails");
        assert!(handle.is_some());
    }
    assert_eq!(canvas.drawn.len(), 2);
}

#[test]
fn e2e_failure_surfaces_original_error() {
    let mut registry = Registry::new();
    registry.register(StaticSource::new("gallery::broken").exhibit(
        "broken",
        Metadata::new("Broken"),
        broken,
    ));
    let (discovered, _) = discover(&registry, &DiscoveryConfig::default());
    let catalog = Catalog::build(discovered);

    let entry = catalog.get(0).expect("one entry");
    let failure = entry
        .unit()
        .invoke(&mut Canvas::default())
        .expect_err("exhibit fails");
    assert_eq!(failure.unit(), "gallery::broken::broken");
    assert!(matches!(failure, ExhibitFailure::Failed { .. }));
    let cause = failure.into_cause().expect("failed exhibits carry a cause");
    let io = cause
        .downcast_ref::<std::io::Error>()
        .expect("original error type preserved");
    assert_eq!(io.kind(), std::io::ErrorKind::InvalidData);
}

/// A container whose member listing always fails.
struct Unreadable;

impl ExhibitSource<Canvas> for Unreadable {
    fn name(&self) -> &str {
        "gallery::unreadable"
    }

    fn members(&self) -> Result<Vec<Member<Canvas>>, SourceError> {
        Err(SourceError::custom(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "locked",
        )))
    }
}

/// One bad container produces a warning and leaves its siblings intact.
#[test]
fn e2e_unreadable_source_does_not_hide_siblings() {
    let mut registry = gallery_registry();
    registry.register(Unreadable);

    let (discovered, warnings) = discover(&registry, &DiscoveryConfig::default());
    assert_eq!(warnings.len(), 1, "expected one warning: {warnings:?}");
    assert!(warnings[0].contains("gallery::unreadable"), "{warnings:?}");
    assert_eq!(Catalog::build(discovered).len(), 4);
}

#[test]
fn e2e_text_listing_of_filtered_catalog() {
    let (discovered, _) = discover(&gallery_registry(), &DiscoveryConfig::default());
    let catalog = Catalog::build(discovered);
    let visible = project(&catalog, "dark");

    let mut out = Vec::new();
    let count = export::write_text(&visible, &mut out).unwrap();
    assert_eq!(count, 1);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Titlebars \u{203a} Dark Titlebar [Dark, Titlebar]\n"
    );
}

// =============================================================================
// Manifests
// =============================================================================

#[test]
fn e2e_manifest_directory_contributes_exhibits() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("chrome")).unwrap();
    fs::write(
        dir.path().join("chrome/titlebars.exhibits.toml"),
        r#"
[source]
nested = ["chrome::titlebars::extra"]

[[exhibit]]
symbol = "label"
title = "Dark Titlebar"
path = "Titlebars"
tags = ["Titlebar", "Dark"]
"#,
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("chrome/titlebars")).unwrap();
    fs::write(
        dir.path().join("chrome/titlebars/extra.exhibits.toml"),
        "[[exhibit]]\nsymbol = \"label\"\ntitle = \"Light Titlebar\"\npath = \"Titlebars\"\n",
    )
    .unwrap();
    // Excluded by prefix: never read, so its broken TOML is harmless.
    fs::write(dir.path().join("vendor.exhibits.toml"), "not [valid toml").unwrap();

    let mut symbols = SymbolTable::new();
    symbols.register("label", label);
    let mut registry = Registry::new();
    registry.register_manifest_dir(dir.path(), Arc::new(symbols));

    let config = DiscoveryConfig {
        exclude_prefixes: vec!["vendor".to_string()],
        ..Default::default()
    };
    let (discovered, warnings) = discover(&registry, &config);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

    let catalog = Catalog::build(discovered);
    assert_eq!(
        titles(&project(&catalog, "")),
        vec!["Dark Titlebar", "Light Titlebar"]
    );
    // The nested manifest is reachable both directly and through [source]
    // nested; it must appear once.
    assert_eq!(catalog.len(), 2);
}

/// A bad manifest directory is one warning; built-in sources still show.
#[test]
fn e2e_missing_manifest_dir_keeps_builtin_exhibits() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = gallery_registry();
    registry.register_manifest_dir(dir.path().join("not-here"), Arc::new(SymbolTable::new()));

    let (discovered, warnings) = discover(&registry, &DiscoveryConfig::default());
    assert_eq!(warnings.len(), 1, "expected one warning: {warnings:?}");
    assert!(warnings[0].contains("not-here"), "{warnings:?}");
    assert_eq!(Catalog::build(discovered).len(), 4);
}

/// A nested manifest that does not exist fails alone; its sibling loads.
#[test]
fn e2e_missing_nested_manifest_warns_once() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("design.exhibits.toml"),
        "[source]\nnested = [\"design::gone\", \"design::widgets\"]\n",
    )
    .unwrap();
    fs::create_dir(dir.path().join("design")).unwrap();
    fs::write(
        dir.path().join("design/widgets.exhibits.toml"),
        "[[exhibit]]\nsymbol = \"label\"\ntitle = \"Demo View\"\npath = \"Misc\"\n",
    )
    .unwrap();

    let mut symbols = SymbolTable::new();
    symbols.register("label", label);
    let mut registry = Registry::new();
    registry.register_manifest_dir(dir.path(), Arc::new(symbols));

    let (discovered, warnings) = discover(&registry, &DiscoveryConfig::default());
    assert_eq!(warnings.len(), 1, "expected one warning: {warnings:?}");
    assert!(warnings[0].contains("design::gone"), "{warnings:?}");
    assert_eq!(titles(&project(&Catalog::build(discovered), "")), vec!["Demo View"]);
}

// =============================================================================
// Showcase
// =============================================================================

#[test]
fn e2e_showcase_publishes_and_filters_from_other_threads() {
    let mut showcase = Showcase::new(gallery_registry(), DiscoveryConfig::default(), false);
    pump_until_ready(&mut showcase);
    assert_eq!(showcase.state.item_count(), 4);

    let poster = showcase.poster();
    std::thread::spawn(move || {
        poster.post_filter("titlebar");
    })
    .join()
    .unwrap();
    showcase.pump();
    assert_eq!(showcase.state.item_count(), 2);

    // A rescan republishes the catalog with the filter still applied.
    showcase.rescan();
    pump_until_ready(&mut showcase);
    assert_eq!(showcase.state.item_count(), 2);
    assert_eq!(
        showcase.state.entry_at(1).map(|e| e.title()),
        Some("Light Titlebar")
    );
}
