// Museum - app/showcase.rs
//
// The showcase context: registry, discovery manager and display state bundled
// into one object owned by the host (the egui app or a headless driver).
//
// All mutation of the display state happens in `pump`, on the thread that
// owns the showcase. Other threads talk to it through a `ShowcasePoster`.

use crate::app::scan::DiscoveryManager;
use crate::app::state::ShowcaseState;
use crate::core::discovery::DiscoveryConfig;
use crate::core::model::Container;
use crate::core::registry::Registry;
use std::sync::{mpsc, Arc};

/// Messages other threads may post to the showcase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowcaseMessage {
    /// Replace the filter text.
    FilterChanged(String),
}

/// Cloneable handle for posting messages from any thread.
#[derive(Debug, Clone)]
pub struct ShowcasePoster {
    tx: mpsc::Sender<ShowcaseMessage>,
}

impl ShowcasePoster {
    /// Post a new filter. Returns false if the showcase is gone.
    pub fn post_filter(&self, text: impl Into<String>) -> bool {
        self.tx
            .send(ShowcaseMessage::FilterChanged(text.into()))
            .is_ok()
    }
}

/// A running showcase.
pub struct Showcase<C: Container> {
    pub state: ShowcaseState<C>,
    registry: Arc<Registry<C>>,
    config: DiscoveryConfig,
    discovery: DiscoveryManager<C>,
    message_tx: mpsc::Sender<ShowcaseMessage>,
    message_rx: mpsc::Receiver<ShowcaseMessage>,
}

impl<C: Container> Showcase<C> {
    /// Create the showcase and start the first discovery pass.
    pub fn new(registry: Registry<C>, config: DiscoveryConfig, debug_mode: bool) -> Self {
        let (message_tx, message_rx) = mpsc::channel();
        let mut showcase = Self {
            state: ShowcaseState::new(debug_mode),
            registry: Arc::new(registry),
            config,
            discovery: DiscoveryManager::new(),
            message_tx,
            message_rx,
        };
        showcase.rescan();
        showcase
    }

    /// Start a new discovery pass, cancelling one already in flight.
    pub fn rescan(&mut self) {
        self.discovery.start_discovery(
            Arc::clone(&self.registry),
            self.config.clone(),
            self.state.catalog().clone(),
        );
        self.state.discovery_in_progress = true;
    }

    /// Stop the running pass. The published catalog stays as it is.
    pub fn cancel(&mut self) {
        self.discovery.cancel_discovery();
    }

    pub fn poster(&self) -> ShowcasePoster {
        ShowcasePoster {
            tx: self.message_tx.clone(),
        }
    }

    /// Apply pending discovery progress and posted messages.
    ///
    /// Returns true when something changed. Of several posted filters only
    /// the last is applied.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        for msg in self.discovery.poll_progress() {
            changed |= self.state.apply_progress(msg);
        }

        let mut latest_filter = None;
        while let Ok(msg) = self.message_rx.try_recv() {
            match msg {
                ShowcaseMessage::FilterChanged(text) => latest_filter = Some(text),
            }
        }
        if let Some(text) = latest_filter {
            self.state.update_filter(text);
            changed = true;
        }
        changed
    }

    pub fn is_discovering(&self) -> bool {
        self.state.discovery_in_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::testing::Sketch;
    use crate::core::model::{Metadata, UnitResult};
    use crate::core::source::StaticSource;
    use std::time::{Duration, Instant};

    fn noop(_: &mut Sketch) -> UnitResult<Sketch> {
        Ok(None)
    }

    fn pump_until_ready(showcase: &mut Showcase<Sketch>) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while showcase.is_discovering() {
            assert!(Instant::now() < deadline, "discovery did not finish");
            showcase.pump();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_last_posted_filter_wins() {
        let mut registry = Registry::new();
        registry.register(
            StaticSource::new("app::views")
                .exhibit("dark", Metadata::new("Dark Titlebar").with_tags(["Dark"]), noop)
                .exhibit("light", Metadata::new("Light Titlebar").with_tags(["Light"]), noop),
        );
        let mut showcase = Showcase::new(registry, DiscoveryConfig::default(), false);
        pump_until_ready(&mut showcase);
        assert_eq!(showcase.state.item_count(), 2);

        let poster = showcase.poster();
        let worker = std::thread::spawn(move || {
            poster.post_filter("dark");
            poster.post_filter("light");
        });
        worker.join().unwrap();

        assert!(showcase.pump());
        assert_eq!(showcase.state.filter(), "light");
        assert_eq!(
            showcase.state.entry_at(0).map(|e| e.title()),
            Some("Light Titlebar")
        );
    }
}
