// Museum - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Museum";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "Museum";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Discovery
// =============================================================================

/// Container-name prefixes that are never loaded during discovery.
///
/// Matched with a plain `starts_with`, so `"egui"` also covers `"egui_extras"`.
/// These are infrastructure namespaces: the standard library, the GUI stack,
/// and the tooling crates the gallery itself is built on.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &[
    "std",
    "core",
    "alloc",
    "egui",
    "eframe",
    "epaint",
    "emath",
    "winit",
    "tracing",
    "serde",
    "toml",
    "clap",
    "directories",
];

/// Default maximum number of containers visited in a single discovery pass.
pub const DEFAULT_MAX_SOURCES: usize = 2_000;

/// Minimum sensible value for the max-sources limit.
pub const MIN_MAX_SOURCES: usize = 1;

/// Hard upper bound on containers visited (guards against runaway nesting).
pub const ABSOLUTE_MAX_SOURCES: usize = 50_000;

// =============================================================================
// Manifests
// =============================================================================

/// Filename suffix identifying an exhibit manifest.
pub const MANIFEST_SUFFIX: &str = ".exhibits.toml";

/// Maximum manifest file size in bytes. Larger files fail to load.
pub const MAX_MANIFEST_FILE_SIZE: u64 = 1024 * 1024; // 1 MB

/// Maximum directory depth walked under a manifest root.
pub const MAX_MANIFEST_DEPTH: usize = 16;

/// Separator used when turning a manifest's relative path into a container name.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Subdirectory of the platform config directory holding user manifests.
pub const MANIFESTS_DIR_NAME: &str = "manifests";

// =============================================================================
// UI
// =============================================================================

/// Default minimum height of a row's preview area, in points.
pub const DEFAULT_PREVIEW_MIN_HEIGHT: f32 = 24.0;

/// Minimum configurable preview height.
pub const MIN_PREVIEW_MIN_HEIGHT: f32 = 0.0;

/// Maximum configurable preview height.
pub const MAX_PREVIEW_MIN_HEIGHT: f32 = 600.0;

/// Placeholder text of the search box.
pub const SEARCH_HINT: &str = "Search by title or tags";

/// Separator drawn between breadcrumb components.
pub const BREADCRUMB_SEPARATOR: &str = "\u{203a}";

// =============================================================================
// Configuration & logging
// =============================================================================

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default log level when neither RUST_LOG, --debug, nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted by `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
