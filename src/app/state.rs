// Museum - app/state.rs
//
// Display state: the published catalog snapshot, the filter string and the
// visible projection. Mutated only on the interaction thread.

use crate::app::scan::DiscoveryProgress;
use crate::core::catalog::Catalog;
use crate::core::filter;
use crate::core::model::{Container, Entry, UnitId};
use crate::util::error::ExhibitFailure;
use std::collections::HashSet;

/// Everything the gallery needs to draw a frame.
pub struct ShowcaseState<C: Container> {
    catalog: Catalog<C>,
    filter: String,

    /// Indices into `catalog` matching `filter`, in catalog order.
    visible: Vec<usize>,

    /// Whether a discovery pass is currently running.
    pub discovery_in_progress: bool,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings from the most recent discovery pass.
    pub warnings: Vec<String>,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,

    /// Units that already failed while rendering (logged once each).
    failed_units: HashSet<UnitId>,
}

impl<C: Container> ShowcaseState<C> {
    pub fn new(debug_mode: bool) -> Self {
        Self {
            catalog: Catalog::empty(),
            filter: String::new(),
            visible: Vec::new(),
            discovery_in_progress: false,
            status_message: "Ready.".to_string(),
            warnings: Vec::new(),
            debug_mode,
            failed_units: HashSet::new(),
        }
    }

    /// Number of rows the display should show.
    pub fn item_count(&self) -> usize {
        self.visible.len()
    }

    /// Entry at visible row `index`.
    pub fn entry_at(&self, index: usize) -> Option<&Entry<C>> {
        self.visible
            .get(index)
            .and_then(|&idx| self.catalog.get(idx))
    }

    /// Every visible entry in order.
    pub fn visible_entries(&self) -> impl Iterator<Item = &Entry<C>> + '_ {
        self.visible.iter().filter_map(|&idx| self.catalog.get(idx))
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn catalog(&self) -> &Catalog<C> {
        &self.catalog
    }

    /// Replace the filter string and recompute the projection.
    pub fn update_filter(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.filter {
            return;
        }
        self.filter = text;
        self.refresh_visible();
        tracing::trace!(filter = %self.filter, visible = self.visible.len(), "Filter updated");
    }

    /// Publish a new catalog snapshot.
    pub fn on_catalog_replaced(&mut self, catalog: Catalog<C>) {
        self.catalog = catalog;
        self.failed_units.clear();
        self.refresh_visible();
    }

    /// Apply one message from the discovery thread.
    ///
    /// Returns true when the display needs a repaint.
    pub fn apply_progress(&mut self, msg: DiscoveryProgress<C>) -> bool {
        match msg {
            DiscoveryProgress::Started => {
                self.discovery_in_progress = true;
                self.warnings.clear();
                self.status_message = "Discovering exhibits...".to_string();
            }
            DiscoveryProgress::Warning { message } => {
                self.warnings.push(message);
            }
            DiscoveryProgress::CatalogReady { catalog, duration } => {
                self.discovery_in_progress = false;
                self.status_message = format!(
                    "{} exhibits discovered in {:.2}s",
                    catalog.len(),
                    duration.as_secs_f64()
                );
                self.on_catalog_replaced(catalog);
            }
            DiscoveryProgress::Cancelled => {
                self.discovery_in_progress = false;
                self.status_message = "Discovery cancelled.".to_string();
            }
        }
        true
    }

    /// Note a rendering failure. Returns true the first time a unit fails.
    pub fn record_failure(&mut self, failure: &ExhibitFailure) -> bool {
        let first = self
            .failed_units
            .insert(UnitId::from_qualified(failure.unit()));
        if first {
            tracing::error!(unit = failure.unit(), error = %failure, "Exhibit failed");
        }
        first
    }

    fn refresh_visible(&mut self) {
        self.visible = filter::apply_filter(self.catalog.entries(), &self.filter);
    }
}
