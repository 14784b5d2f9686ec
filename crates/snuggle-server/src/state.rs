use std::sync::Arc;

use tracing::{debug, warn};

use snuggle_core::{
    config::Config,
    visitor::{VisitorCounter, VisitorTracker},
    VisitorStore,
};

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// The store is constructed once in `main` and handed in here; the tracker
/// and counter hold clones of the same `Arc`, so all requests share one
/// connection.
pub struct AppState {
    pub store: Arc<dyn VisitorStore>,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    pub tracker: VisitorTracker,
    pub counter: VisitorCounter,
}

impl AppState {
    pub fn new(store: Arc<dyn VisitorStore>, config: Config) -> Self {
        Self {
            tracker: VisitorTracker::new(Arc::clone(&store)),
            counter: VisitorCounter::new(Arc::clone(&store)),
            store,
            config: Arc::new(config),
        }
    }

    /// Record a visit in the background.
    ///
    /// The tracking task is detached: the caller never waits on it and a
    /// store failure only produces a log line.
    pub fn record_visit(&self, identifier: String) {
        let tracker = self.tracker.clone();
        tokio::spawn(async move {
            match tracker.track(&identifier).await {
                Ok(()) => debug!(identifier = %identifier, "Visit recorded"),
                Err(e) => {
                    warn!(identifier = %identifier, error = %e, "Visit tracking failed")
                }
            }
        });
    }
}
