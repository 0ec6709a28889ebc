// Museum - core/registry.rs
//
// The explicit list of exhibit sources discovery is allowed to look at.
//
// Sources are registered up front, either already built or behind a lazy
// loader. Discovery checks a registration's name against the exclusion
// prefixes before calling its loader, so excluded sources are never built.
// Manifest directories expand into one lazy registration per manifest file
// each time the registry is enumerated, so a rescan picks up new files.

use crate::core::manifest::{self, ManifestSource, SymbolTable};
use crate::core::model::Container;
use crate::core::source::ExhibitSource;
use crate::util::error::SourceError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Deferred constructor for a source.
pub type Loader<C> =
    Arc<dyn Fn() -> Result<Arc<dyn ExhibitSource<C>>, SourceError> + Send + Sync>;

/// A named, not-yet-loaded source.
pub struct Registration<C: Container> {
    name: String,
    loader: Loader<C>,
}

impl<C: Container> Registration<C> {
    pub fn new(name: impl Into<String>, loader: Loader<C>) -> Self {
        Self {
            name: name.into(),
            loader,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the source. May fail or be expensive.
    pub fn load(&self) -> Result<Arc<dyn ExhibitSource<C>>, SourceError> {
        (self.loader)()
    }
}

impl<C: Container> Clone for Registration<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            loader: Arc::clone(&self.loader),
        }
    }
}

impl<C: Container> fmt::Debug for Registration<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

enum Provider<C: Container> {
    Single(Registration<C>),
    ManifestDir {
        root: PathBuf,
        symbols: Arc<SymbolTable<C>>,
    },
}

/// Ordered collection of source providers.
pub struct Registry<C: Container> {
    providers: Vec<Provider<C>>,
}

impl<C: Container> Registry<C> {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register an already-built source.
    pub fn register<S>(&mut self, source: S) -> &mut Self
    where
        S: ExhibitSource<C> + 'static,
    {
        self.register_shared(Arc::new(source))
    }

    pub fn register_shared(&mut self, source: Arc<dyn ExhibitSource<C>>) -> &mut Self {
        let name = source.name().to_string();
        let loader: Loader<C> = Arc::new(move || Ok(Arc::clone(&source)));
        self.providers
            .push(Provider::Single(Registration::new(name, loader)));
        self
    }

    /// Register a source that is only built if discovery decides to visit it.
    pub fn register_lazy<F>(&mut self, name: impl Into<String>, loader: F) -> &mut Self
    where
        F: Fn() -> Result<Arc<dyn ExhibitSource<C>>, SourceError> + Send + Sync + 'static,
    {
        self.providers
            .push(Provider::Single(Registration::new(name, Arc::new(loader))));
        self
    }

    /// Register every `*.exhibits.toml` below `root`.
    pub fn register_manifest_dir(
        &mut self,
        root: impl Into<PathBuf>,
        symbols: Arc<SymbolTable<C>>,
    ) -> &mut Self {
        self.providers.push(Provider::ManifestDir {
            root: root.into(),
            symbols,
        });
        self
    }

    /// Number of providers (a manifest directory counts once).
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Expand every provider into its registrations, in registration order.
    ///
    /// Nothing is loaded. A manifest directory that cannot be scanned
    /// contributes no registrations and one error; the other providers are
    /// unaffected.
    pub fn enumerate(&self) -> (Vec<Registration<C>>, Vec<SourceError>) {
        let mut registrations = Vec::new();
        let mut failures = Vec::new();
        for provider in &self.providers {
            match provider {
                Provider::Single(registration) => registrations.push(registration.clone()),
                Provider::ManifestDir { root, symbols } => match manifest::scan_manifest_dir(root) {
                    Ok(names) => {
                        for name in names {
                            registrations.push(manifest_registration(root, name, symbols));
                        }
                    }
                    Err(e) => {
                        tracing::warn!(root = %root.display(), error = %e, "Manifest directory skipped");
                        failures.push(SourceError::Manifest(e));
                    }
                },
            }
        }
        (registrations, failures)
    }
}

fn manifest_registration<C: Container>(
    root: &Path,
    name: String,
    symbols: &Arc<SymbolTable<C>>,
) -> Registration<C> {
    let root = root.to_path_buf();
    let symbols = Arc::clone(symbols);
    let container = name.clone();
    let loader: Loader<C> = Arc::new(move || {
        let source = ManifestSource::load(&root, &container, Arc::clone(&symbols))?;
        Ok(Arc::new(source) as Arc<dyn ExhibitSource<C>>)
    });
    Registration::new(name, loader)
}

impl<C: Container> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Container> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .providers
            .iter()
            .map(|p| match p {
                Provider::Single(r) => r.name().to_string(),
                Provider::ManifestDir { root, .. } => format!("{}/*", root.display()),
            })
            .collect();
        f.debug_struct("Registry").field("providers", &names).finish()
    }
}
