// Museum - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Registry assembly (built-in demos + manifest directory)
// 4. Headless listing (--list) or eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can use `crate::app::...`, `crate::core::...` etc.
pub use museum::app;
pub use museum::core;
pub use museum::demo;
pub use museum::platform;
pub use museum::ui;
pub use museum::util;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Museum - component showcase gallery.
///
/// Discovers registered exhibits, catalogs them, and renders each one as a
/// live preview in a searchable list.
#[derive(Parser, Debug)]
#[command(name = "museum", version, about)]
struct Cli {
    /// Initial search filter.
    #[arg(short = 'f', long = "filter")]
    filter: Option<String>,

    /// Directory of *.exhibits.toml manifests to register.
    #[arg(short = 'm', long = "manifest-dir")]
    manifest_dir: Option<PathBuf>,

    /// Configuration directory (defaults to the platform config directory).
    #[arg(short = 'c', long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Print the catalog and exit instead of opening the gallery.
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// With --list, print JSON instead of text.
    #[arg(long = "json", requires = "list")]
    json: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Resolve platform paths and load config before logging so the
    // configured level and file take effect.
    let platform_paths = match cli.config_dir.clone() {
        Some(dir) => platform::config::PlatformPaths::from_config_dir(dir),
        None => platform::config::PlatformPaths::resolve(),
    };
    let (config, config_warnings) = platform::config::load_config(&platform_paths.config_dir);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "Museum starting"
    );
    for warning in &config_warnings {
        tracing::warn!(error = %warning, "Config warning");
    }

    let registry = build_registry(&cli, &config, &platform_paths);
    let discovery_config = core::discovery::DiscoveryConfig {
        exclude_prefixes: config.exclude_prefixes.clone(),
        max_sources: config.max_sources,
        cancel_flag: None,
    };

    if cli.list {
        let filter = cli.filter.as_deref().unwrap_or("");
        if let Err(e) = run_list(&registry, &discovery_config, filter, cli.json) {
            tracing::error!(error = %e, "Listing failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return;
    }

    let mut showcase = app::showcase::Showcase::new(registry, discovery_config, cli.debug);
    if let Some(ref filter) = cli.filter {
        showcase.state.update_filter(filter.as_str());
    }
    let prefs = gui::GalleryPrefs {
        dark_mode: config.dark_mode,
        preview_min_height: config.preview_min_height,
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |_cc| Ok(Box::new(gui::MuseumApp::new(showcase, prefs)))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch Museum GUI: {e}");
        std::process::exit(1);
    }
}

/// Built-in demo sources plus a manifest directory.
///
/// A manifest directory named on the CLI or in config is always registered,
/// so a bad path is reported by discovery. The platform default is only
/// registered when it exists.
fn build_registry(
    cli: &Cli,
    config: &platform::config::AppConfig,
    paths: &platform::config::PlatformPaths,
) -> core::registry::Registry<egui::Ui> {
    let mut registry = core::registry::Registry::new();
    demo::register_builtin(&mut registry);

    let explicit = cli.manifest_dir.clone().or_else(|| config.manifest_dir.clone());
    let manifest_dir = match explicit {
        Some(dir) => Some(dir),
        None if paths.manifests_dir.is_dir() => Some(paths.manifests_dir.clone()),
        None => None,
    };
    if let Some(dir) = manifest_dir {
        tracing::info!(dir = %dir.display(), "Registering manifest directory");
        registry.register_manifest_dir(dir, Arc::new(demo::builtin_symbols()));
    }

    registry
}

/// Headless mode: discover synchronously, filter, print.
fn run_list(
    registry: &core::registry::Registry<egui::Ui>,
    config: &core::discovery::DiscoveryConfig,
    filter: &str,
    json: bool,
) -> util::error::Result<()> {
    let (discovered, warnings) = core::discovery::discover(registry, config);
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    let catalog = core::catalog::Catalog::build(discovered);
    let visible = core::filter::project(&catalog, filter);

    let stdout = std::io::stdout();
    let count = if json {
        core::export::write_json(&visible, stdout.lock())?
    } else {
        core::export::write_text(&visible, stdout.lock())?
    };
    tracing::info!(listed = count, total = catalog.len(), "Listing complete");
    Ok(())
}
