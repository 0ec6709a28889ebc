// Museum - core/discovery.rs
//
// Exhibit discovery: walk every registered source and collect the members
// that carry exhibit metadata.
//
// Error policy:
//   - Nothing escapes `discover`. A failed load, member listing, nested
//     listing or invalid attribute is logged and recorded as a warning; the
//     offending container (or member) is skipped and the walk continues.
//   - A manifest directory that cannot be scanned is one warning; the other
//     providers are still walked.
//   - Excluded registrations are skipped by name before their loader runs.
//   - Nested sources are walked breadth-first with a visited set keyed on the
//     container name, so cycles and diamonds visit each container once.

use crate::core::model::{Container, DiscoveredExhibit, UnitId};
use crate::core::registry::Registry;
use crate::core::source::ExhibitSource;
use crate::util::constants;
use crate::util::error::DiscoveryError;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a discovery pass.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Registrations whose name starts with any of these are never loaded.
    pub exclude_prefixes: Vec<String>,

    /// Maximum number of containers visited in one pass.
    pub max_sources: usize,

    /// Optional cancel flag, checked before each container. When set the
    /// pass stops and returns what it has collected so far.
    pub cancel_flag: Option<Arc<AtomicBool>>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            exclude_prefixes: constants::DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_sources: constants::DEFAULT_MAX_SOURCES,
            cancel_flag: None,
        }
    }
}

impl DiscoveryConfig {
    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// True when `name` starts with any of `prefixes`.
pub fn is_excluded(name: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| name.starts_with(p.as_str()))
}

// =============================================================================
// Discovery
// =============================================================================

/// Discover every exhibit reachable from `registry`.
///
/// Returns the exhibits found (unordered, no duplicate unit ids) and the
/// human-readable warnings recorded along the way.
pub fn discover<C: Container>(
    registry: &Registry<C>,
    config: &DiscoveryConfig,
) -> (Vec<DiscoveredExhibit<C>>, Vec<String>) {
    let max_sources = config
        .max_sources
        .clamp(constants::MIN_MAX_SOURCES, constants::ABSOLUTE_MAX_SOURCES);

    let (registrations, failures) = registry.enumerate();
    let warnings: Vec<String> = failures
        .into_iter()
        .map(|source| DiscoveryError::ProviderUnavailable { source }.to_string())
        .collect();

    tracing::debug!(
        registrations = registrations.len(),
        max_sources,
        exclude = ?config.exclude_prefixes,
        "Discovery starting"
    );

    let mut walk = Walk {
        visited: HashSet::new(),
        seen_units: HashSet::new(),
        exhibits: Vec::new(),
        warnings,
        max_sources,
        limit_hit: false,
    };

    for registration in &registrations {
        if config.is_cancelled() {
            tracing::debug!("Discovery cancelled by request");
            break;
        }
        if walk.limit_hit {
            break;
        }

        let name = registration.name();
        if is_excluded(name, &config.exclude_prefixes) {
            tracing::trace!(container = name, "Excluded by prefix");
            continue;
        }
        if walk.visited.contains(name) {
            continue;
        }

        let source = match registration.load() {
            Ok(s) => s,
            Err(source) => {
                walk.warn(DiscoveryError::LoadFailed {
                    container: name.to_string(),
                    source,
                });
                continue;
            }
        };

        walk.visit_tree(source, config);
    }

    let Walk {
        visited,
        exhibits,
        warnings,
        ..
    } = walk;

    tracing::debug!(
        containers = visited.len(),
        exhibits = exhibits.len(),
        warnings = warnings.len(),
        "Discovery complete"
    );

    (exhibits, warnings)
}

/// Mutable state of one discovery pass.
struct Walk<C: Container> {
    visited: HashSet<String>,
    seen_units: HashSet<UnitId>,
    exhibits: Vec<DiscoveredExhibit<C>>,
    warnings: Vec<String>,
    max_sources: usize,
    limit_hit: bool,
}

impl<C: Container> Walk<C> {
    fn warn(&mut self, e: DiscoveryError) {
        tracing::warn!(error = %e, "Discovery warning");
        self.warnings.push(e.to_string());
    }

    /// Visit `root` and everything nested under it, breadth-first.
    fn visit_tree(&mut self, root: Arc<dyn ExhibitSource<C>>, config: &DiscoveryConfig) {
        let mut queue: VecDeque<Arc<dyn ExhibitSource<C>>> = VecDeque::new();
        queue.push_back(root);

        while let Some(source) = queue.pop_front() {
            if config.is_cancelled() {
                return;
            }
            let name = source.name().to_string();
            if self.visited.contains(&name) {
                continue;
            }
            if self.visited.len() >= self.max_sources {
                self.limit_hit = true;
                self.warn(DiscoveryError::SourceLimitExceeded {
                    max: self.max_sources,
                });
                return;
            }
            self.visited.insert(name.clone());

            self.extract(source.as_ref(), &name);

            match source.nested() {
                Ok(nested) => {
                    for child in nested {
                        if !self.visited.contains(child.name()) {
                            queue.push_back(child);
                        }
                    }
                }
                Err(source) => self.warn(DiscoveryError::NestedListing {
                    container: name,
                    source,
                }),
            }
        }
    }

    /// Collect the exhibits declared directly by `source`.
    fn extract(&mut self, source: &dyn ExhibitSource<C>, name: &str) {
        let members = match source.members() {
            Ok(m) => m,
            Err(source) => {
                self.warn(DiscoveryError::MemberListing {
                    container: name.to_string(),
                    source,
                });
                return;
            }
        };

        let mut found = 0usize;
        for member in members {
            let Some(metadata) = member.attribute() else {
                continue;
            };
            if let Err(source) = metadata.validate() {
                self.warn(DiscoveryError::InvalidMetadata {
                    container: name.to_string(),
                    member: member.symbol().to_string(),
                    source,
                });
                continue;
            }
            let unit = member.to_unit(name);
            if !self.seen_units.insert(unit.id().clone()) {
                tracing::debug!(unit = %unit.id(), "Duplicate unit skipped");
                continue;
            }
            self.exhibits.push(DiscoveredExhibit {
                unit,
                metadata: metadata.clone(),
            });
            found += 1;
        }

        tracing::trace!(container = name, exhibits = found, "Container scanned");
    }
}

// =============================================================================
// Tests
// =============================================================================
