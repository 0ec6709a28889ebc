// Museum - app/scan.rs
//
// Discovery lifecycle management. Runs a discovery pass on a background
// thread and hands the finished catalog to the interaction thread over an
// mpsc channel.
//
// Architecture:
//   - `DiscoveryManager` lives on the interaction thread; `run_discovery`
//     runs on a background thread.
//   - An `Arc<AtomicBool>` cancel flag stops a pass cooperatively.
//   - Starting a pass cancels the previous one and replaces the receiver, so
//     a stale pass can never publish.
//   - The catalog is published exactly once per pass (`CatalogReady`).

use crate::core::catalog::Catalog;
use crate::core::discovery::{self, DiscoveryConfig};
use crate::core::model::Container;
use crate::core::registry::Registry;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

// =============================================================================
// Progress messages
// =============================================================================

/// Messages sent from the discovery thread to the interaction thread.
pub enum DiscoveryProgress<C: Container> {
    /// The pass has begun.
    Started,

    /// A non-fatal problem was recorded.
    Warning { message: String },

    /// The pass finished; `catalog` replaces the published snapshot.
    CatalogReady { catalog: Catalog<C>, duration: Duration },

    /// The pass was cancelled; nothing is published.
    Cancelled,
}

impl<C: Container> fmt::Debug for DiscoveryProgress<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str("Started"),
            Self::Warning { message } => f.debug_struct("Warning").field("message", message).finish(),
            Self::CatalogReady { catalog, duration } => f
                .debug_struct("CatalogReady")
                .field("entries", &catalog.len())
                .field("duration", duration)
                .finish(),
            Self::Cancelled => f.write_str("Cancelled"),
        }
    }
}

// =============================================================================
// DiscoveryManager
// =============================================================================

/// Manages discovery passes on a background thread.
pub struct DiscoveryManager<C: Container> {
    /// Channel receiver for the current pass.
    progress_rx: Option<mpsc::Receiver<DiscoveryProgress<C>>>,

    /// Cancel flag shared with the current pass.
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl<C: Container> DiscoveryManager<C> {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
        }
    }

    /// Start a discovery pass over `registry`.
    ///
    /// `previous` is the currently published catalog; the new snapshot is
    /// built as its replacement. A pass already running is cancelled first.
    pub fn start_discovery(
        &mut self,
        registry: Arc<Registry<C>>,
        mut config: DiscoveryConfig,
        previous: Catalog<C>,
    ) {
        self.cancel_discovery();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        config.cancel_flag = Some(Arc::clone(&cancel));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        std::thread::spawn(move || {
            run_discovery(&*registry, &config, &previous, &tx, &*cancel);
        });

        tracing::info!("Discovery started");
    }

    /// Request cancellation of the running pass.
    /// The background thread sends `DiscoveryProgress::Cancelled` and exits.
    pub fn cancel_discovery(&mut self) {
        if let Some(flag) = self.cancel_flag.take() {
            flag.store(true, Ordering::SeqCst);
        }
    }

    /// Poll for progress messages without blocking. Returns all pending messages.
    pub fn poll_progress(&self) -> Vec<DiscoveryProgress<C>> {
        let mut messages = Vec::new();
        if let Some(ref rx) = self.progress_rx {
            while let Ok(msg) = rx.try_recv() {
                messages.push(msg);
            }
        }
        messages
    }
}

impl<C: Container> Default for DiscoveryManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Container> Drop for DiscoveryManager<C> {
    fn drop(&mut self) {
        self.cancel_discovery();
    }
}

impl<C: Container> fmt::Debug for DiscoveryManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveryManager")
            .field("active", &self.cancel_flag.is_some())
            .finish()
    }
}

// =============================================================================
// Background pass
// =============================================================================

/// One discovery pass: discover, build the replacement catalog, publish.
fn run_discovery<C: Container>(
    registry: &Registry<C>,
    config: &DiscoveryConfig,
    previous: &Catalog<C>,
    tx: &mpsc::Sender<DiscoveryProgress<C>>,
    cancel: &AtomicBool,
) {
    macro_rules! send {
        ($msg:expr) => {
            if tx.send($msg).is_err() {
                return; // Receiver dropped (host torn down); exit quietly.
            }
        };
    }

    macro_rules! check_cancel {
        () => {
            if cancel.load(Ordering::SeqCst) {
                tracing::info!("Discovery cancelled");
                send!(DiscoveryProgress::Cancelled);
                return;
            }
        };
    }

    let start = Instant::now();
    send!(DiscoveryProgress::Started);

    let (discovered, warnings) = discovery::discover(registry, config);
    check_cancel!();

    for warning in warnings {
        send!(DiscoveryProgress::Warning { message: warning });
    }

    let catalog = Catalog::replace(previous, discovered);
    check_cancel!();

    let duration = start.elapsed();
    tracing::info!(
        entries = catalog.len(),
        duration_ms = duration.as_millis() as u64,
        "Discovery complete"
    );
    send!(DiscoveryProgress::CatalogReady { catalog, duration });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::testing::Sketch;
    use crate::core::model::{Metadata, UnitResult};
    use crate::core::source::{ExhibitSource, StaticSource};
    use std::sync::Mutex;

    fn noop(_: &mut Sketch) -> UnitResult<Sketch> {
        Ok(None)
    }

    /// Poll until `done` returns true for a message, or give up after 5 s.
    fn poll_until(
        manager: &DiscoveryManager<Sketch>,
        mut done: impl FnMut(&DiscoveryProgress<Sketch>) -> bool,
    ) -> Vec<DiscoveryProgress<Sketch>> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        while Instant::now() < deadline {
            for msg in manager.poll_progress() {
                let finished = done(&msg);
                seen.push(msg);
                if finished {
                    return seen;
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("discovery did not finish in time; saw {seen:?}");
    }

    #[test]
    fn test_pass_publishes_catalog_once() {
        let mut registry = Registry::new();
        registry.register(
            StaticSource::new("app::views")
                .exhibit("b", Metadata::new("B").with_path("X"), noop)
                .exhibit("a", Metadata::new("A").with_path("X"), noop),
        );

        let mut manager = DiscoveryManager::new();
        manager.start_discovery(Arc::new(registry), DiscoveryConfig::default(), Catalog::empty());

        let seen = poll_until(&manager, |m| matches!(m, DiscoveryProgress::CatalogReady { .. }));
        assert!(matches!(seen[0], DiscoveryProgress::Started));
        let catalogs: Vec<&Catalog<Sketch>> = seen
            .iter()
            .filter_map(|m| match m {
                DiscoveryProgress::CatalogReady { catalog, .. } => Some(catalog),
                _ => None,
            })
            .collect();
        assert_eq!(catalogs.len(), 1);
        let titles: Vec<&str> = catalogs[0].iter().map(|e| e.title()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_cancel_suppresses_catalog() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let gate = Mutex::new(gate_rx);
        let mut registry: Registry<Sketch> = Registry::new();
        registry.register_lazy("app::gated", move || {
            let _ = gate.lock().unwrap().recv();
            Ok(Arc::new(
                StaticSource::new("app::gated").exhibit("v", Metadata::new("V"), noop),
            ) as Arc<dyn ExhibitSource<Sketch>>)
        });

        let mut manager = DiscoveryManager::new();
        manager.start_discovery(Arc::new(registry), DiscoveryConfig::default(), Catalog::empty());
        manager.cancel_discovery();
        let _ = gate_tx.send(());

        let seen = poll_until(&manager, |m| matches!(m, DiscoveryProgress::Cancelled));
        assert!(
            !seen
                .iter()
                .any(|m| matches!(m, DiscoveryProgress::CatalogReady { .. })),
            "cancelled pass must not publish: {seen:?}"
        );
    }

    #[test]
    fn test_restart_discards_previous_receiver() {
        let mut manager: DiscoveryManager<Sketch> = DiscoveryManager::new();
        let registry = Arc::new(Registry::new());
        manager.start_discovery(Arc::clone(&registry), DiscoveryConfig::default(), Catalog::empty());
        manager.start_discovery(registry, DiscoveryConfig::default(), Catalog::empty());

        let seen = poll_until(&manager, |m| matches!(m, DiscoveryProgress::CatalogReady { .. }));
        let started = seen
            .iter()
            .filter(|m| matches!(m, DiscoveryProgress::Started))
            .count();
        assert_eq!(started, 1, "only the latest pass reports: {seen:?}");
    }
}
