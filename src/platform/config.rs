// Museum - platform/config.rs
//
// Platform-specific configuration, directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for Museum configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/museum/ or %APPDATA%\Museum\config\)
    pub config_dir: PathBuf,

    /// Default manifest directory (e.g. ~/.config/museum/manifests/)
    pub manifests_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self::from_config_dir(config_dir)
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self::from_config_dir(PathBuf::from("."))
        }
    }

    /// Paths rooted at an explicit config directory (`--config-dir`).
    pub fn from_config_dir(config_dir: PathBuf) -> Self {
        let manifests_dir = config_dir.join(constants::MANIFESTS_DIR_NAME);
        Self {
            config_dir,
            manifests_dir,
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file still works with
/// an older binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Replaces the built-in exclusion prefixes.
    pub exclude_prefixes: Option<Vec<String>>,
    /// Appended to the exclusion prefixes.
    pub extra_exclude_prefixes: Option<Vec<String>>,
    /// Maximum containers visited per pass.
    pub max_sources: Option<usize>,
    /// Manifest directory to register.
    pub manifest_dir: Option<String>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Minimum height of a row's preview, in points.
    pub preview_min_height: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Discovery --
    /// Container-name prefixes never loaded.
    pub exclude_prefixes: Vec<String>,
    /// Maximum containers visited per pass.
    pub max_sources: usize,
    /// Manifest directory from config, if any.
    pub manifest_dir: Option<PathBuf>,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Minimum preview height in points.
    pub preview_min_height: f32,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exclude_prefixes: constants::DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_sources: constants::DEFAULT_MAX_SOURCES,
            manifest_dir: None,
            dark_mode: true,
            preview_min_height: constants::DEFAULT_PREVIEW_MIN_HEIGHT,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` from `config_dir`.
///
/// Returns the validated config and the non-fatal problems found.
/// A missing file yields defaults with no warnings (first run).
/// An unreadable or unparseable file yields defaults with one warning.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<ConfigError>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path,
                source: e,
            };
            tracing::warn!(error = %err, "Config unreadable");
            return (AppConfig::default(), vec![err]);
        }
    };

    match parse_config(&content, &config_path) {
        Ok((config, warnings)) => {
            tracing::info!(path = %config_path.display(), "Loaded config.toml");
            if !warnings.is_empty() {
                tracing::warn!(
                    count = warnings.len(),
                    "Config validation produced warnings"
                );
            }
            (config, warnings)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Config unparseable");
            (AppConfig::default(), vec![err])
        }
    }
}

/// Parse and validate config text. `path` is used for error context only.
pub fn parse_config(
    content: &str,
    path: &Path,
) -> Result<(AppConfig, Vec<ConfigError>), ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(validate(raw))
}

/// Validate each field against named constants, accumulating all errors.
fn validate(raw: RawConfig) -> (AppConfig, Vec<ConfigError>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<ConfigError> = Vec::new();

    // -- Discovery: exclusion prefixes --
    if let Some(prefixes) = raw.discovery.exclude_prefixes {
        config.exclude_prefixes = prefixes;
    }
    if let Some(extra) = raw.discovery.extra_exclude_prefixes {
        config.exclude_prefixes.extend(extra);
    }
    let before = config.exclude_prefixes.len();
    config.exclude_prefixes.retain(|p| !p.trim().is_empty());
    if config.exclude_prefixes.len() != before {
        // An empty prefix would exclude everything.
        warnings.push(ConfigError::ValueOutOfRange {
            field: "[discovery] exclude_prefixes".to_string(),
            value: "\"\"".to_string(),
            expected: "non-empty prefixes; empty entries were dropped".to_string(),
        });
    }

    // -- Discovery: max_sources --
    if let Some(max) = raw.discovery.max_sources {
        if (constants::MIN_MAX_SOURCES..=constants::ABSOLUTE_MAX_SOURCES).contains(&max) {
            config.max_sources = max;
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[discovery] max_sources".to_string(),
                value: max.to_string(),
                expected: format!(
                    "{}-{} (default {})",
                    constants::MIN_MAX_SOURCES,
                    constants::ABSOLUTE_MAX_SOURCES,
                    constants::DEFAULT_MAX_SOURCES
                ),
            });
        }
    }

    // -- Discovery: manifest_dir --
    if let Some(dir) = raw.discovery.manifest_dir {
        if !dir.trim().is_empty() {
            config.manifest_dir = Some(PathBuf::from(dir));
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => warnings.push(ConfigError::ValueOutOfRange {
                field: "[ui] theme".to_string(),
                value: other.to_string(),
                expected: "\"dark\" or \"light\" (default dark)".to_string(),
            }),
        }
    }

    // -- UI: preview_min_height --
    if let Some(height) = raw.ui.preview_min_height {
        if (constants::MIN_PREVIEW_MIN_HEIGHT..=constants::MAX_PREVIEW_MIN_HEIGHT).contains(&height)
        {
            config.preview_min_height = height;
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[ui] preview_min_height".to_string(),
                value: height.to_string(),
                expected: format!(
                    "{}-{} (default {})",
                    constants::MIN_PREVIEW_MIN_HEIGHT,
                    constants::MAX_PREVIEW_MIN_HEIGHT,
                    constants::DEFAULT_PREVIEW_MIN_HEIGHT
                ),
            });
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let lower = level.to_lowercase();
        if constants::VALID_LOG_LEVELS.contains(&lower.as_str()) {
            config.log_level = Some(lower);
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[logging] level".to_string(),
                value: level.clone(),
                expected: format!(
                    "one of {} (default {})",
                    constants::VALID_LOG_LEVELS.join(", "),
                    constants::DEFAULT_LOG_LEVEL
                ),
            });
        }
    }

    // -- Logging: file --
    if let Some(file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(PathBuf::from(file));
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(content: &str) -> (AppConfig, Vec<ConfigError>) {
        parse_config(content, Path::new("config.toml")).unwrap()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
        assert_eq!(config.max_sources, constants::DEFAULT_MAX_SOURCES);
        assert!(config.exclude_prefixes.iter().any(|p| p == "std"));
        assert!(config.dark_mode);
    }

    #[test]
    fn test_valid_values_are_applied() {
        let (config, warnings) = parse(
            r#"
[discovery]
extra_exclude_prefixes = ["vendor::"]
max_sources = 10
manifest_dir = "/tmp/manifests"

[ui]
theme = "Light"
preview_min_height = 48.0

[logging]
level = "DEBUG"
file = "museum.log"
"#,
        );
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert!(config.exclude_prefixes.iter().any(|p| p == "vendor::"));
        assert!(config.exclude_prefixes.iter().any(|p| p == "std"));
        assert_eq!(config.max_sources, 10);
        assert_eq!(config.manifest_dir, Some(PathBuf::from("/tmp/manifests")));
        assert!(!config.dark_mode);
        assert_eq!(config.preview_min_height, 48.0);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_file, Some(PathBuf::from("museum.log")));
    }

    #[test]
    fn test_exclude_prefixes_replace_defaults() {
        let (config, _) = parse("[discovery]\nexclude_prefixes = [\"internal\"]\n");
        assert_eq!(config.exclude_prefixes, vec!["internal".to_string()]);
    }

    #[test]
    fn test_out_of_range_values_fall_back_with_warnings() {
        let (config, warnings) = parse(
            "[discovery]\nmax_sources = 0\nexclude_prefixes = [\"\"]\n[ui]\ntheme = \"blue\"\npreview_min_height = -1.0\n[logging]\nlevel = \"loud\"\n",
        );
        assert_eq!(warnings.len(), 5, "got {warnings:?}");
        assert!(warnings
            .iter()
            .all(|w| matches!(w, ConfigError::ValueOutOfRange { .. })));
        assert_eq!(config.max_sources, constants::DEFAULT_MAX_SOURCES);
        assert!(config.exclude_prefixes.is_empty());
        assert!(config.dark_mode);
        assert_eq!(config.preview_min_height, constants::DEFAULT_PREVIEW_MIN_HEIGHT);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_unparseable_file_gives_defaults_and_one_warning() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(constants::CONFIG_FILE_NAME), "[ui\ntheme=").unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], ConfigError::TomlParse { .. }));
        assert!(config.dark_mode);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (_, warnings) = parse("[future]\nsetting = 1\n[ui]\nnew_knob = true\n");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_manifests_dir_lives_under_config_dir() {
        let paths = PlatformPaths::from_config_dir(PathBuf::from("/cfg"));
        assert_eq!(paths.manifests_dir, PathBuf::from("/cfg/manifests"));
    }
}
