// Museum - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every error keeps its causal chain so log lines can show the root cause.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Boxed error produced by exhibit code and hand-written sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned by the headless listing path.
#[derive(Debug)]
pub enum MuseumError {
    /// JSON serialisation of a catalog listing failed.
    Json(serde_json::Error),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for MuseumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for MuseumError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for MuseumError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ---------------------------------------------------------------------------
// Metadata errors
// ---------------------------------------------------------------------------

/// An exhibit attribute that does not satisfy the metadata contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// `title` is empty or whitespace-only.
    EmptyTitle,
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "exhibit title must not be empty"),
        }
    }
}

impl std::error::Error for MetadataError {}

// ---------------------------------------------------------------------------
// Source errors
// ---------------------------------------------------------------------------

/// Failure raised by an exhibit source while loading or listing members.
#[derive(Debug)]
pub enum SourceError {
    /// The manifest backing the source could not be read or parsed.
    Manifest(ManifestError),

    /// Failure raised by an application-defined source.
    Custom(BoxError),
}

impl SourceError {
    /// Wrap any error raised by a hand-written source.
    pub fn custom<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Custom(error.into())
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manifest(e) => write!(f, "{e}"),
            Self::Custom(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Manifest(e) => Some(e),
            Self::Custom(e) => Some(&**e),
        }
    }
}

impl From<ManifestError> for SourceError {
    fn from(e: ManifestError) -> Self {
        Self::Manifest(e)
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors recorded during exhibit discovery.
///
/// Discovery never returns these to its caller; they are logged and turned
/// into warnings so a partial catalog is always produced.
#[derive(Debug)]
pub enum DiscoveryError {
    /// A provider (a manifest directory) could not be expanded. Its
    /// containers are missing; the rest of the registry is still walked.
    ProviderUnavailable { source: SourceError },

    /// A container could not be loaded.
    LoadFailed {
        container: String,
        source: SourceError,
    },

    /// Listing the members of a loaded container failed.
    MemberListing {
        container: String,
        source: SourceError,
    },

    /// Listing the nested containers of a loaded container failed.
    NestedListing {
        container: String,
        source: SourceError,
    },

    /// A member's exhibit attribute failed validation.
    InvalidMetadata {
        container: String,
        member: String,
        source: MetadataError,
    },

    /// The visited-container bound was reached; the rest was not scanned.
    SourceLimitExceeded { max: usize },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderUnavailable { source } => {
                write!(f, "Exhibit provider skipped: {source}")
            }
            Self::LoadFailed { container, source } => {
                write!(f, "Cannot load '{container}': {source}")
            }
            Self::MemberListing { container, source } => {
                write!(f, "Cannot list exhibits of '{container}': {source}")
            }
            Self::NestedListing { container, source } => {
                write!(f, "Cannot list nested sources of '{container}': {source}")
            }
            Self::InvalidMetadata {
                container,
                member,
                source,
            } => write!(f, "'{container}::{member}': invalid exhibit metadata: {source}"),
            Self::SourceLimitExceeded { max } => write!(
                f,
                "Discovery stopped after visiting {max} sources. \
                 Increase [discovery] max_sources in config or narrow the registry."
            ),
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ProviderUnavailable { source } => Some(source),
            Self::LoadFailed { source, .. } => Some(source),
            Self::MemberListing { source, .. } => Some(source),
            Self::NestedListing { source, .. } => Some(source),
            Self::InvalidMetadata { source, .. } => Some(source),
            Self::SourceLimitExceeded { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Manifest errors
// ---------------------------------------------------------------------------

/// Errors related to exhibit manifest files.
#[derive(Debug)]
pub enum ManifestError {
    /// I/O error reading a manifest or its directory.
    Io { path: PathBuf, source: io::Error },

    /// Directory traversal error below a manifest root.
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// The manifest is not valid TOML or does not match the manifest shape.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Manifest file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// An `[[exhibit]]` entry references a symbol nobody registered.
    UnknownSymbol { path: PathBuf, symbol: String },

    /// An `[[exhibit]]` entry could not be deserialised.
    InvalidEntry {
        path: PathBuf,
        index: usize,
        source: toml::de::Error,
    },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "I/O error reading manifest '{}': {source}", path.display())
            }
            Self::Walk { path, source } => {
                write!(f, "Error traversing '{}': {source}", path.display())
            }
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse manifest '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Manifest '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::UnknownSymbol { path, symbol } => write!(
                f,
                "Manifest '{}': symbol '{symbol}' is not registered",
                path.display()
            ),
            Self::InvalidEntry {
                path,
                index,
                source,
            } => write!(
                f,
                "Manifest '{}': exhibit #{index} is invalid: {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Walk { source, .. } => Some(source),
            Self::TomlParse { source, .. } => Some(source),
            Self::InvalidEntry { source, .. } => Some(source),
            Self::FileTooLarge { .. } | Self::UnknownSymbol { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Exhibit invocation failures
// ---------------------------------------------------------------------------

/// Failure of a single exhibit while rendering into its container.
///
/// Unlike discovery errors these are never swallowed: they point at a defect
/// in the showcased code and are handed back to whoever invoked the unit.
#[derive(Debug)]
pub enum ExhibitFailure {
    /// The exhibit returned an error. `source` is the exhibit's own error value.
    Failed { unit: String, source: BoxError },

    /// The exhibit panicked.
    Panicked { unit: String, message: String },
}

impl ExhibitFailure {
    /// Qualified name of the unit that failed.
    pub fn unit(&self) -> &str {
        match self {
            Self::Failed { unit, .. } | Self::Panicked { unit, .. } => unit,
        }
    }

    /// Unwrap into the exhibit's original error so callers can downcast it.
    pub fn into_cause(self) -> Option<BoxError> {
        match self {
            Self::Failed { source, .. } => Some(source),
            Self::Panicked { .. } => None,
        }
    }
}

impl fmt::Display for ExhibitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { unit, source } => write!(f, "'{unit}' failed: {source}"),
            Self::Panicked { unit, message } => write!(f, "'{unit}' panicked: {message}"),
        }
    }
}

impl std::error::Error for ExhibitFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Failed { source, .. } => Some(&**source),
            Self::Panicked { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => write!(
                f,
                "Config parse error '{}': {source}. Using defaults.",
                path.display()
            ),
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}. Using default."
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::ValueOutOfRange { .. } => None,
        }
    }
}

/// Convenience type alias for Museum results.
pub type Result<T> = std::result::Result<T, MuseumError>;
