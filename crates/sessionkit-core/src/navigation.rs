//! Navigation seam.
//!
//! The session core never routes on its own; it asks a [`Navigator`] to go
//! somewhere (always the login route) and moves on. Redirects are
//! fire-and-forget.

use parking_lot::Mutex;
use tracing::info;

pub trait Navigator: Send + Sync {
    fn navigate_to(&self, destination: &str);
}

/// Navigator that records every destination it was sent to.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All destinations, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.history.lock().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.history.lock().len()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate_to(&self, destination: &str) {
        info!(destination, "Navigating");
        self.history.lock().push(destination.to_string());
    }
}
