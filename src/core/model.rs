// Museum - core/model.rs
//
// Core data model types: exhibit metadata, invocable units, catalog entries.
// Pure data definitions shared by every layer. No I/O, no UI.

use crate::util::error::{BoxError, ExhibitFailure, MetadataError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

// =============================================================================
// Container
// =============================================================================

/// Mutable rendering target an exhibit draws into.
///
/// The engine never looks inside a container; it only hands `&mut C` to the
/// exhibit and passes back whatever handle the exhibit returns.
pub trait Container: 'static {
    /// Renderable handle an exhibit may return after drawing.
    type Handle;
}

/// What an exhibit function returns: an optional handle, or its own error.
pub type UnitResult<C> = Result<Option<<C as Container>::Handle>, BoxError>;

/// Signature of an exhibit function.
pub type UnitFn<C> = dyn Fn(&mut C) -> UnitResult<C> + Send + Sync;

// =============================================================================
// Metadata
// =============================================================================

/// Author-supplied description attached to an exhibit function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Display title. Required and non-empty.
    pub title: String,

    /// Slash-delimited hierarchy, e.g. `"Controls/Buttons"`.
    #[serde(default)]
    pub path: String,

    /// Free-form search tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Longer prose shown under the title.
    #[serde(default)]
    pub description: String,
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: String::new(),
            tags: Vec::new(),
            description: String::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check the attribute contract. Invalid metadata keeps an exhibit out
    /// of the catalog.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.title.trim().is_empty() {
            return Err(MetadataError::EmptyTitle);
        }
        Ok(())
    }
}

// =============================================================================
// Units
// =============================================================================

/// Identity of a discovered unit: `<container>::<symbol>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    pub fn new(container: &str, symbol: &str) -> Self {
        Self(format!("{container}::{symbol}"))
    }

    /// Wrap an already-qualified name.
    pub fn from_qualified(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An invocable exhibit function together with its identity.
pub struct Unit<C: Container> {
    id: UnitId,
    func: Arc<UnitFn<C>>,
}

impl<C: Container> Unit<C> {
    pub fn new(id: UnitId, func: Arc<UnitFn<C>>) -> Self {
        Self { id, func }
    }

    pub fn id(&self) -> &UnitId {
        &self.id
    }

    /// Run the exhibit against `container`.
    ///
    /// Errors returned by the exhibit come back as `ExhibitFailure::Failed`
    /// carrying the original error value; panics are caught and reported as
    /// `ExhibitFailure::Panicked` so one broken exhibit cannot take down the
    /// whole gallery.
    pub fn invoke(&self, container: &mut C) -> Result<Option<C::Handle>, ExhibitFailure> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.func)(container))) {
            Ok(Ok(handle)) => Ok(handle),
            Ok(Err(source)) => Err(ExhibitFailure::Failed {
                unit: self.id.to_string(),
                source,
            }),
            Err(payload) => Err(ExhibitFailure::Panicked {
                unit: self.id.to_string(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

impl<C: Container> Clone for Unit<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<C: Container> fmt::Debug for Unit<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit").field("id", &self.id).finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// A unit found by discovery, paired with its validated metadata.
pub struct DiscoveredExhibit<C: Container> {
    pub unit: Unit<C>,
    pub metadata: Metadata,
}

impl<C: Container> fmt::Debug for DiscoveredExhibit<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredExhibit")
            .field("unit", &self.unit)
            .field("metadata", &self.metadata)
            .finish()
    }
}

// =============================================================================
// Entry
// =============================================================================

/// Immutable catalog row derived from a discovered exhibit.
///
/// Case-folded copies of the searchable fields are computed once here so the
/// filter never re-lowercases on each keystroke.
pub struct Entry<C: Container> {
    title: String,
    path_components: Vec<String>,
    tags: BTreeSet<String>,
    description: String,
    unit: Unit<C>,
    sort_key: String,
    folded_title: String,
    folded_path: Vec<String>,
    folded_tags: Vec<String>,
}

impl<C: Container> Entry<C> {
    /// Build an entry. An empty `path` yields a single empty component.
    pub fn new(unit: Unit<C>, metadata: Metadata) -> Self {
        let Metadata {
            title,
            path,
            tags,
            description,
        } = metadata;

        let path_components: Vec<String> = path.split('/').map(str::to_string).collect();
        let tags: BTreeSet<String> = tags.into_iter().collect();

        let folded_title = title.to_lowercase();
        let folded_path: Vec<String> = path_components.iter().map(|c| c.to_lowercase()).collect();
        let folded_tags = tags.iter().map(|t| t.to_lowercase()).collect();
        let sort_key = format!("{}/{}", folded_path.join("/"), folded_title);

        Self {
            title,
            path_components,
            tags,
            description,
            unit,
            sort_key,
            folded_title,
            folded_path,
            folded_tags,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn path_components(&self) -> &[String] {
        &self.path_components
    }

    /// Components joined back with "/".
    pub fn path(&self) -> String {
        self.path_components.join("/")
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn unit(&self) -> &Unit<C> {
        &self.unit
    }

    /// Ordering key: lowercased path, "/", lowercased title. Not an identity.
    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    pub(crate) fn folded_title(&self) -> &str {
        &self.folded_title
    }

    pub(crate) fn folded_path(&self) -> &[String] {
        &self.folded_path
    }

    pub(crate) fn folded_tags(&self) -> &[String] {
        &self.folded_tags
    }
}

impl<C: Container> Clone for Entry<C> {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            path_components: self.path_components.clone(),
            tags: self.tags.clone(),
            description: self.description.clone(),
            unit: self.unit.clone(),
            sort_key: self.sort_key.clone(),
            folded_title: self.folded_title.clone(),
            folded_path: self.folded_path.clone(),
            folded_tags: self.folded_tags.clone(),
        }
    }
}

impl<C: Container> fmt::Debug for Entry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("title", &self.title)
            .field("path_components", &self.path_components)
            .field("tags", &self.tags)
            .field("unit", self.unit.id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Headless container and helpers shared by the core tests.

    use super::*;

    /// Records what exhibits "drew" into it.
    #[derive(Debug, Default)]
    pub struct Sketch {
        pub lines: Vec<String>,
    }

    impl Container for Sketch {
        type Handle = usize;
    }

    /// A unit that writes its id into the sketch and returns the line index.
    pub fn unit(container: &str, symbol: &str) -> Unit<Sketch> {
        let id = UnitId::new(container, symbol);
        let label = id.to_string();
        Unit::new(
            id,
            Arc::new(move |sketch: &mut Sketch| -> UnitResult<Sketch> {
                sketch.lines.push(label.clone());
                Ok(Some(sketch.lines.len() - 1))
            }),
        )
    }

    pub fn entry(symbol: &str, metadata: Metadata) -> Entry<Sketch> {
        Entry::new(unit("test", symbol), metadata)
    }
}
